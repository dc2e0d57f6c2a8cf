//! Core engine for seqsearch: cursor-paged enumeration over hierarchical
//! genomics repositories, compound identifier resolution, response bounding,
//! and the per-endpoint request dispatcher.
//!
//! Wire message shapes and encoding live in `seqsearch-protocol`; this crate
//! owns everything between a decoded request and an encoded response.

// public exports are one module level down
pub mod backend;
pub mod compound;
pub mod error;
pub mod obs;
pub mod paging;
pub mod repo;
pub mod response;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

///
/// CONSTANTS
///

/// Page size applied when a request leaves `pageSize` unset.
pub const DEFAULT_PAGE_SIZE: i32 = 100;

/// Approximate response-size budget (1 MiB). Accumulation stops once the
/// estimated serialized size of the result list crosses this bound.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 1 << 20;

///
/// Prelude
///
/// Prelude contains only the surface a caller needs to stand up a backend.
///

pub mod prelude {
    pub use crate::{
        backend::{Backend, BackendConfig},
        error::ServerError,
        repo::{DataRepository, memory::MemoryRepository},
    };
    pub use seqsearch_protocol::ResponseFormat;
}
