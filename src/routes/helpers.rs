use crate::error::{AppError, AppResult};
use axum::body::{Body, Bytes};
use axum::extract::rejection::BytesRejection;
use axum::extract::{FromRequestParts, Path};
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;
use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::error::Category;
use serde_json::ser::PrettyFormatter;
use std::borrow::Cow;
use std::collections::HashMap;

/// Largest request body the JSON reader accepts (1 MiB).
pub const MAX_BODY_BYTES: usize = 1_048_576;

/// A JSON object with exactly one top-level key naming the payload.
#[derive(Debug, Clone)]
pub struct Envelope<T> {
    key: Cow<'static, str>,
    payload: T,
}

impl<T> Envelope<T> {
    pub fn new(key: impl Into<Cow<'static, str>>, payload: T) -> Self {
        Self {
            key: key.into(),
            payload,
        }
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.key.as_ref(), &self.payload)?;
        map.end()
    }
}

/// Parse a routing token into a positive identifier.
///
/// Zero is rejected along with anything that is not a base-10 `i64`.
pub fn read_id_param(raw: &str) -> AppResult<i64> {
    match raw.parse::<i64>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(AppError::InvalidIdentifier),
    }
}

/// Extracts the `id` path parameter, rejecting with the error envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdParam(pub i64);

impl<S> FromRequestParts<S> for IdParam
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::InvalidIdentifier)?;

        let raw = params.get("id").map(String::as_str).unwrap_or_default();
        read_id_param(raw).map(IdParam)
    }
}

/// Encode an envelope as a tab-indented JSON response.
///
/// The whole body is serialized before the response exists, so a failure
/// leaves nothing written. `headers` replace any same-named header and
/// `Content-Type` is always `application/json`.
pub fn write_json<T: Serialize>(
    status: StatusCode,
    data: &Envelope<T>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let mut body = Vec::with_capacity(256);
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut body, PrettyFormatter::with_indent(b"\t"));
    data.serialize(&mut serializer)?;
    body.push(b'\n');

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    merge_headers(response.headers_mut(), headers);
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Ok(response)
}

fn merge_headers(target: &mut HeaderMap, extra: HeaderMap) {
    // Follow-up values of a multi-valued header arrive with no name.
    let mut current = None;
    for (name, value) in extra {
        match name {
            Some(name) => {
                target.insert(name.clone(), value);
                current = Some(name);
            }
            None => {
                if let Some(name) = &current {
                    target.append(name.clone(), value);
                }
            }
        }
    }
}

/// Decode a request body into `T`, translating failures into client errors.
pub fn read_json<T: DeserializeOwned>(body: Result<Bytes, BytesRejection>) -> AppResult<T> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::BadRequest(format!(
                "body must not be larger than {} bytes",
                MAX_BODY_BYTES
            ))
        } else {
            AppError::BadRequest(rejection.body_text())
        }
    })?;

    if body.is_empty() {
        return Err(AppError::BadRequest("body must not be empty".to_string()));
    }

    serde_json::from_slice(&body).map_err(|e| match e.classify() {
        Category::Syntax => {
            AppError::BadRequest(format!("body contains badly-formed JSON (at column {})", e.column()))
        }
        Category::Eof => AppError::BadRequest("body contains badly-formed JSON".to_string()),
        Category::Data => AppError::BadRequest(format!("body contains invalid data: {}", e)),
        Category::Io => AppError::Internal(e.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;
    use serde::Deserialize;

    #[test]
    fn test_read_id_param_accepts_positive() {
        assert_eq!(read_id_param("1").unwrap(), 1);
        assert_eq!(read_id_param("42").unwrap(), 42);
        assert_eq!(read_id_param("9223372036854775807").unwrap(), i64::MAX);
    }

    #[test]
    fn test_read_id_param_rejects_invalid() {
        for raw in ["", "0", "-1", "abc", "1.5", " 7", "9223372036854775808"] {
            assert!(
                matches!(read_id_param(raw), Err(AppError::InvalidIdentifier)),
                "{:?} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_envelope_has_single_root_key() {
        let envelope = Envelope::new("movie", serde_json::json!({"title": "Casablanca"}));
        let value = serde_json::to_value(&envelope).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(object["movie"]["title"], "Casablanca");
    }

    #[test]
    fn test_write_json_overrides_content_type() {
        let mut headers = HeaderMap::new();
        headers.insert("x-custom", HeaderValue::from_static("v"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));

        let response = write_json(StatusCode::CREATED, &Envelope::new("ok", true), headers).unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(response.headers()["x-custom"], "v");
        assert_eq!(response.headers().get_all(CONTENT_TYPE).iter().count(), 1);
    }

    #[test]
    fn test_merge_headers_overwrites_existing() {
        let mut target = HeaderMap::new();
        target.insert("vary", HeaderValue::from_static("origin"));

        let mut extra = HeaderMap::new();
        extra.append("vary", HeaderValue::from_static("accept"));
        extra.append("vary", HeaderValue::from_static("authorization"));
        merge_headers(&mut target, extra);

        let values: Vec<_> = target.get_all("vary").iter().collect();
        assert_eq!(values, vec!["accept", "authorization"]);
    }

    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("unsupported value"))
        }
    }

    #[test]
    fn test_write_json_returns_serialization_error() {
        let result = write_json(
            StatusCode::OK,
            &Envelope::new("movie", Unencodable),
            HeaderMap::new(),
        );
        assert!(matches!(result, Err(AppError::Serialization(_))));
    }

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Input {
        title: String,
    }

    #[test]
    fn test_read_json_decodes_body() {
        let input: Input = read_json(Ok(Bytes::from_static(br#"{"title":"Moana"}"#))).unwrap();
        assert_eq!(input.title, "Moana");
    }

    #[test]
    fn test_read_json_rejects_bad_bodies() {
        for raw in [&b""[..], b"{\"title\":", b"<xml/>", b"{\"title\":1}", b"{\"rating\":\"PG\"}"] {
            let result: AppResult<Input> = read_json(Ok(Bytes::copy_from_slice(raw)));
            assert!(matches!(result, Err(AppError::BadRequest(_))), "{:?}", raw);
        }
    }
}
