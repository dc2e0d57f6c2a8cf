//! Module: codec
//! Responsibility: request decoding and response encoding for the wire
//! formats this protocol speaks.
//! Does not own: message shapes (entities/requests/responses) or any query
//! semantics.
//! Boundary: the only place format crates are invoked for protocol payloads.

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error as ThisError;

///
/// CodecError
///

#[derive(Debug, ThisError)]
pub enum CodecError {
    #[error("request payload is not a valid {kind} message: {message}")]
    Decode { kind: &'static str, message: String },

    #[error("response encode failed ({format}): {message}")]
    Encode {
        format: ResponseFormat,
        message: String,
    },
}

///
/// ResponseFormat
///
/// Output encoding negotiated per request. Requests are always JSON; the
/// response body may be JSON or CBOR.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ResponseFormat {
    #[default]
    Json,
    Cbor,
}

impl ResponseFormat {
    /// Mime type emitted alongside a response in this format.
    #[must_use]
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Cbor => "application/cbor",
        }
    }

    /// Resolve a requested mime type; unknown types get no format.
    #[must_use]
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim() {
            "application/json" => Some(Self::Json),
            "application/cbor" => Some(Self::Cbor),
            _ => None,
        }
    }
}

impl std::fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mime())
    }
}

/// Decode one JSON request payload into its typed message.
pub fn decode_request<T>(bytes: &[u8]) -> Result<T, CodecError>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(bytes).map_err(|source| CodecError::Decode {
        kind: std::any::type_name::<T>(),
        message: source.to_string(),
    })
}

/// Encode one response message in the requested output format.
pub fn encode_response<T>(value: &T, format: ResponseFormat) -> Result<Vec<u8>, CodecError>
where
    T: Serialize,
{
    match format {
        ResponseFormat::Json => serde_json::to_vec(value).map_err(|source| CodecError::Encode {
            format,
            message: source.to_string(),
        }),
        ResponseFormat::Cbor => serde_cbor::to_vec(value).map_err(|source| CodecError::Encode {
            format,
            message: source.to_string(),
        }),
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requests::SearchDatasetsRequest;
    use crate::responses::SearchDatasetsResponse;

    #[test]
    fn decode_request_accepts_empty_object_with_defaults() {
        let request: SearchDatasetsRequest =
            decode_request(b"{}").expect("empty object should decode");
        assert_eq!(request.page_size, 0);
        assert!(request.page_token.is_empty());
    }

    #[test]
    fn decode_request_rejects_malformed_payload() {
        let err = decode_request::<SearchDatasetsRequest>(b"{not json")
            .expect_err("malformed payload should be rejected");
        assert!(matches!(err, CodecError::Decode { .. }));
    }

    #[test]
    fn decode_request_rejects_wrong_shape() {
        let err = decode_request::<SearchDatasetsRequest>(br#"{"pageSize": "ten"}"#)
            .expect_err("wrong field type should be rejected");
        assert!(matches!(err, CodecError::Decode { .. }));
    }

    #[test]
    fn encode_response_round_trips_both_formats() {
        let response = SearchDatasetsResponse::default();

        let json = encode_response(&response, ResponseFormat::Json).expect("json encode");
        let decoded: SearchDatasetsResponse =
            serde_json::from_slice(&json).expect("json decode");
        assert_eq!(decoded, response);

        let cbor = encode_response(&response, ResponseFormat::Cbor).expect("cbor encode");
        let decoded: SearchDatasetsResponse =
            serde_cbor::from_slice(&cbor).expect("cbor decode");
        assert_eq!(decoded, response);
    }

    #[test]
    fn from_mime_resolves_known_types_only() {
        assert_eq!(
            ResponseFormat::from_mime("application/json"),
            Some(ResponseFormat::Json)
        );
        assert_eq!(
            ResponseFormat::from_mime(" application/cbor "),
            Some(ResponseFormat::Cbor)
        );
        assert_eq!(ResponseFormat::from_mime("text/plain"), None);
    }
}
