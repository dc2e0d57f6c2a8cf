//! Wire protocol for seqsearch: entity messages, search requests/responses,
//! and the request/response codec.
//!
//! This crate owns message shapes and encoding only. Query semantics,
//! pagination and repository access live in `seqsearch-core`.

pub mod codec;
pub mod entities;
pub mod requests;
pub mod responses;

pub use codec::{CodecError, ResponseFormat, decode_request, encode_response};
pub use requests::PagedRequest;
pub use responses::PagedResponse;

/// Protocol version reported by the info endpoint.
pub const PROTOCOL_VERSION: &str = "0.6.0a10";
