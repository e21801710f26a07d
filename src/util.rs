//! Utility functions for general-purpose use across the application.

use chrono::Duration;

/// Parse a textual duration such as `"15m"`, `"1h30m"`, `"2.5s"` or `"-15m"`.
///
/// The text is an optional sign followed by a sequence of decimal numbers,
/// each with an optional fraction and a unit suffix (`ns`, `us`/`µs`, `ms`,
/// `s`, `m`, `h`). A bare `"0"` is accepted. The result is signed; callers
/// decide what a negative value means.
///
/// # Examples
///
/// ```
/// use greenlight::util::parse_duration;
/// use chrono::Duration;
///
/// assert_eq!(parse_duration("15m").unwrap(), Duration::minutes(15));
/// assert_eq!(parse_duration("-15m").unwrap(), Duration::minutes(-15));
/// assert!(parse_duration("15zz").is_err());
/// ```
pub fn parse_duration(text: &str) -> Result<Duration, String> {
    let invalid = || format!("invalid duration {:?}", text);

    let mut s = text;
    let mut negative = false;
    if let Some(rest) = s.strip_prefix('-') {
        negative = true;
        s = rest;
    } else if let Some(rest) = s.strip_prefix('+') {
        s = rest;
    }
    if s == "0" {
        return Ok(Duration::zero());
    }
    if s.is_empty() {
        return Err(invalid());
    }

    let mut total: u128 = 0;
    while !s.is_empty() {
        let int_len = s.bytes().take_while(u8::is_ascii_digit).count();
        let (int_part, mut rest) = s.split_at(int_len);

        let mut frac_part = "";
        if let Some(after_dot) = rest.strip_prefix('.') {
            let frac_len = after_dot.bytes().take_while(u8::is_ascii_digit).count();
            frac_part = &after_dot[..frac_len];
            rest = &after_dot[frac_len..];
        }
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }

        let unit_len = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (unit, tail) = rest.split_at(unit_len);
        let scale: u128 = match unit {
            "ns" => 1,
            "us" | "µs" | "μs" => 1_000,
            "ms" => 1_000_000,
            "s" => 1_000_000_000,
            "m" => 60 * 1_000_000_000,
            "h" => 3_600 * 1_000_000_000,
            "" => return Err(format!("missing unit in duration {:?}", text)),
            other => return Err(format!("unknown unit {:?} in duration {:?}", other, text)),
        };

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| invalid())?
        };
        let mut nanos = whole.checked_mul(scale).ok_or_else(invalid)?;
        if !frac_part.is_empty() {
            let fraction: f64 = format!("0.{}", frac_part).parse().map_err(|_| invalid())?;
            nanos += (fraction * scale as f64) as u128;
        }

        total = total.checked_add(nanos).ok_or_else(invalid)?;
        s = tail;
    }

    // Same ceiling as a signed 64-bit nanosecond count.
    if total > i64::MAX as u128 {
        return Err(invalid());
    }

    let nanos = total as i64;
    Ok(Duration::nanoseconds(if negative { -nanos } else { nanos }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_single_unit() {
        assert_eq!(parse_duration("15m").unwrap(), Duration::minutes(15));
        assert_eq!(parse_duration("300ms").unwrap(), Duration::milliseconds(300));
        assert_eq!(parse_duration("2h").unwrap(), Duration::hours(2));
        assert_eq!(parse_duration("10us").unwrap(), Duration::microseconds(10));
        assert_eq!(parse_duration("10µs").unwrap(), Duration::microseconds(10));
    }

    #[test]
    fn test_parse_duration_compound_and_fraction() {
        assert_eq!(parse_duration("1h30m").unwrap(), Duration::minutes(90));
        assert_eq!(parse_duration("1.5h").unwrap(), Duration::minutes(90));
        assert_eq!(parse_duration(".5s").unwrap(), Duration::milliseconds(500));
    }

    #[test]
    fn test_parse_duration_signed() {
        assert_eq!(parse_duration("+5s").unwrap(), Duration::seconds(5));
        assert_eq!(parse_duration("-15m").unwrap(), Duration::minutes(-15));
        assert_eq!(parse_duration("-1h30m").unwrap(), Duration::minutes(-90));
        assert_eq!(parse_duration("-0").unwrap(), Duration::zero());
    }

    #[test]
    fn test_parse_duration_zero() {
        assert_eq!(parse_duration("0").unwrap(), Duration::zero());
        assert_eq!(parse_duration("0s").unwrap(), Duration::zero());
    }

    #[test]
    fn test_parse_duration_rejects_invalid() {
        for raw in ["", "-", "+-5s", "15", "15zz", "m", ".s", "15 m", "9999999999999h"] {
            assert!(parse_duration(raw).is_err(), "{:?} should be rejected", raw);
        }
    }
}
