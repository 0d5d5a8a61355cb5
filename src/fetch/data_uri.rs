//! Inline `data:[<mediatype>][;base64],<payload>` resolution.
//!
//! Parsed directly over the raw URI string: the payload is not a legal
//! authority/path, so a generic URL parser must not see it.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue};
use percent_encoding::percent_decode_str;

use crate::errors::FetchError;
use crate::fetch::response::FetchResponse;
use crate::observability::messages::fetch::ResolvedDataUri;
use crate::observability::messages::StructuredLog;

const DEFAULT_MEDIA_TYPE: &str = "text/plain;charset=US-ASCII";

fn malformed(reason: impl Into<String>) -> FetchError {
    FetchError::DataUriMalformed { reason: reason.into() }
}

/// Decode a data URI into a synthetic `200 OK` response.
pub(crate) fn resolve(uri: &str) -> Result<FetchResponse, FetchError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| malformed("missing 'data:' scheme"))?;
    let (media, payload) = rest
        .split_once(',')
        .ok_or_else(|| malformed("missing ',' separator"))?;

    let mut base64_encoded = false;
    let media_parts: Vec<&str> = media
        .split(';')
        .map(str::trim)
        .filter(|part| {
            if part.eq_ignore_ascii_case("base64") {
                base64_encoded = true;
                false
            } else {
                !part.is_empty()
            }
        })
        .collect();

    let media_type = if media_parts.is_empty() {
        DEFAULT_MEDIA_TYPE.to_string()
    } else {
        media_parts.join(";")
    };

    let body = if base64_encoded {
        BASE64
            .decode(payload)
            .map_err(|e| malformed(format!("invalid base64 payload: {}", e)))?
    } else {
        percent_decode_str(payload).collect()
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_str(&media_type)
            .map_err(|_| malformed(format!("invalid media type '{}'", media_type)))?,
    );

    ResolvedDataUri { content_type: &media_type }.log();
    Ok(FetchResponse::synthetic_ok(headers, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content_type(response: &FetchResponse) -> &str {
        response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap()
    }

    #[test]
    fn base64_payload_is_decoded() {
        let response = resolve("data:text/plain;base64,SGk=").unwrap();

        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(response.reason(), "OK");
        assert_eq!(response.body(), b"Hi");
        assert_eq!(content_type(&response), "text/plain");
    }

    #[test]
    fn percent_encoded_payload_is_decoded() {
        let response = resolve("data:text/html,%3Cp%3Ex%3C%2Fp%3E").unwrap();

        assert_eq!(response.body(), b"<p>x</p>");
        assert_eq!(content_type(&response), "text/html");
    }

    #[test]
    fn missing_media_type_defaults_to_us_ascii_text() {
        let response = resolve("data:,hello").unwrap();

        assert_eq!(response.body(), b"hello");
        assert_eq!(content_type(&response), "text/plain;charset=US-ASCII");
    }

    #[test]
    fn media_type_parameters_survive_base64_stripping() {
        let response = resolve("data:text/plain;charset=utf-8;base64,SGk=").unwrap();

        assert_eq!(response.body(), b"Hi");
        assert_eq!(content_type(&response), "text/plain;charset=utf-8");
    }

    #[test]
    fn missing_comma_is_malformed() {
        let err = resolve("data:text/plain").unwrap_err();
        assert!(matches!(err, FetchError::DataUriMalformed { .. }));
    }

    #[test]
    fn invalid_base64_is_malformed() {
        let err = resolve("data:;base64,###").unwrap_err();
        assert!(matches!(err, FetchError::DataUriMalformed { .. }));
    }
}
