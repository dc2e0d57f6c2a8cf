use seqsearch_protocol::CodecError;
use thiserror::Error as ThisError;

///
/// ServerError
///
/// Request-level fault taxonomy. Every failure is raised synchronously at the
/// point of detection and propagates uncaught to the dispatch boundary; the
/// transport collaborator turns a variant into a wire error response. Each
/// variant carries the offending field or identifier so that boundary can
/// produce a precise message.
///

#[derive(Debug, ThisError)]
pub enum ServerError {
    #[error("request payload is not a valid {kind} message: {message}")]
    InvalidJson { kind: &'static str, message: String },

    #[error("bad page size: {page_size}")]
    BadPageSize { page_size: i32 },

    #[error("bad request: {message}")]
    BadRequest { message: String },

    #[error("malformed page token '{token}': expected {expected_arity} numeric segments")]
    MalformedPageToken {
        token: String,
        expected_arity: usize,
    },

    #[error("malformed identifier '{id}': expected a {expected} compound id")]
    MalformedId { id: String, expected: &'static str },

    #[error("object not found: {id}")]
    ObjectNotFound { id: String },

    #[error("a feature set id (or a parent feature id) must be specified")]
    FeatureSetNotSpecified,

    #[error("a continuous set id must be specified")]
    ContinuousSetNotSpecified,

    #[error("an rna quantification set id must be specified")]
    RnaQuantificationSetNotSpecified,

    #[error(
        "parent feature '{parent_id}' does not belong to the supplied feature set '{feature_set_id}'"
    )]
    ParentIncompatibleWithFeatureSet {
        parent_id: String,
        feature_set_id: String,
    },

    #[error("searching over unmapped reads is not supported: a reference id is required")]
    UnmappedReadsNotSupported,

    #[error("read group set '{id}' is not mapped to any reference set")]
    ReadGroupSetNotMappedToReferenceSet { id: String },

    #[error("response encode failed: {message}")]
    ResponseEncode { message: String },
}

impl ServerError {
    /// Construct a structurally-invalid-request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Construct a not-found error for the supplied identifier.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::ObjectNotFound { id: id.into() }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ObjectNotFound { .. })
    }
}

impl From<CodecError> for ServerError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Decode { kind, message } => Self::InvalidJson { kind, message },
            CodecError::Encode { message, .. } => Self::ResponseEncode { message },
        }
    }
}
