//! Module: paging
//! Responsibility: the page-token wire codec and the pull-based enumeration
//! contract every strategy implements.
//! Does not own: endpoint selection, filtering semantics, or response
//! bounding.

pub mod cursor;
pub mod stream;

pub use cursor::{compose_page_token, parse_page_token};
pub use stream::{BoxedStream, IndexedStream, ListStream, PageStream};
