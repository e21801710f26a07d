use crate::error::AppError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A running time in whole minutes.
///
/// Encodes to JSON as a quoted string such as `"102 mins"` and decodes only
/// from that exact shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Runtime(pub i32);

impl Runtime {
    pub fn minutes(self) -> i32 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mins", self.0)
    }
}

impl FromStr for Runtime {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || AppError::MalformedDuration(format!("{:?} is not of the form \"<N> mins\"", s));

        let (number, unit) = s.split_once(' ').ok_or_else(malformed)?;
        if unit != "mins" {
            return Err(malformed());
        }
        // i32::from_str tolerates a leading '+', the encoder never emits one.
        if number.starts_with('+') {
            return Err(malformed());
        }

        number.parse::<i32>().map(Runtime).map_err(|_| malformed())
    }
}

impl Serialize for Runtime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Runtime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RuntimeVisitor;

        impl de::Visitor<'_> for RuntimeVisitor {
            type Value = Runtime;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string of the form \"<N> mins\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Runtime, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(RuntimeVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_encodes_as_quoted_text() {
        assert_eq!(serde_json::to_string(&Runtime(102)).unwrap(), r#""102 mins""#);
        assert_eq!(serde_json::to_string(&Runtime(0)).unwrap(), r#""0 mins""#);
        assert_eq!(serde_json::to_string(&Runtime(-5)).unwrap(), r#""-5 mins""#);
    }

    #[test]
    fn test_runtime_decodes_exact_shape() {
        let runtime: Runtime = serde_json::from_str(r#""102 mins""#).unwrap();
        assert_eq!(runtime, Runtime(102));
        assert_eq!("0 mins".parse::<Runtime>().unwrap(), Runtime(0));
    }

    #[test]
    fn test_runtime_rejects_other_shapes() {
        for raw in ["102", "102mins", "102 Mins", "102  mins", "102 min", "+102 mins", " mins", "abc mins", ""] {
            assert!(
                matches!(raw.parse::<Runtime>(), Err(AppError::MalformedDuration(_))),
                "{:?} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_runtime_rejects_json_number() {
        let result: Result<Runtime, _> = serde_json::from_str("102");
        assert!(result.is_err());
    }
}
