//! Module: response
//! Responsibility: bounded accumulation of search results into a paged
//! response envelope — the count bound and the approximate byte bound.
//! Does not own: item production (streams) or wire encoding (protocol codec).
//!
//! Invariants:
//! - Add-then-check: an item is always admitted before the bounds are
//!   consulted, so a page is never empty while the stream has items.
//! - The byte bound is an estimate over the serialized items, not the final
//!   envelope; the envelope adds only fixed framing.

use crate::error::ServerError;
use seqsearch_protocol::responses::PagedResponse;

///
/// SearchResponseAccumulator
///
/// One accumulator per dispatch. The driving loop feeds it `(item, token)`
/// pairs until it reports full or the stream ends; `finish` seals the
/// envelope with the token of the next unreturned item (empty when the
/// sequence is exhausted).
///

pub struct SearchResponseAccumulator<R: PagedResponse> {
    response: R,
    page_size: usize,
    max_bytes: usize,
    count: usize,
    bytes_so_far: usize,
    next_page_token: Option<String>,
}

impl<R: PagedResponse> SearchResponseAccumulator<R> {
    /// `page_size` has already been defaulted and validated as positive.
    #[must_use]
    pub fn new(page_size: usize, max_bytes: usize) -> Self {
        Self {
            response: R::default(),
            page_size,
            max_bytes,
            count: 0,
            bytes_so_far: 0,
            next_page_token: None,
        }
    }

    /// Admit one item unconditionally and charge its serialized size
    /// against the byte budget.
    pub fn add_value(&mut self, item: R::Item) -> Result<(), ServerError> {
        let estimate = serde_json::to_vec(&item)
            .map_err(|err| ServerError::ResponseEncode {
                message: err.to_string(),
            })?
            .len();

        self.bytes_so_far += estimate;
        self.count += 1;
        self.response.results_mut().push(item);

        Ok(())
    }

    /// Record the resumption token of the next unreturned item. `None`
    /// means the stream is exhausted.
    pub fn set_next_page_token(&mut self, token: Option<String>) {
        self.next_page_token = token;
    }

    /// Whether either bound has been reached.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.count >= self.page_size || self.bytes_so_far >= self.max_bytes
    }

    /// Seal the envelope: the recorded token, or empty for end of sequence.
    #[must_use]
    pub fn finish(mut self) -> R {
        self.response
            .set_next_page_token(self.next_page_token.unwrap_or_default());
        self.response
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::SearchResponseAccumulator;
    use crate::DEFAULT_MAX_RESPONSE_BYTES;
    use seqsearch_protocol::{entities::Dataset, responses::SearchDatasetsResponse};

    fn dataset(name: &str) -> Dataset {
        Dataset {
            id: format!("dataset:{name}"),
            name: name.to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn count_bound_fills_after_page_size_items() {
        let mut acc: SearchResponseAccumulator<SearchDatasetsResponse> =
            SearchResponseAccumulator::new(2, DEFAULT_MAX_RESPONSE_BYTES);

        assert!(!acc.is_full());
        acc.add_value(dataset("a")).expect("add should succeed");
        assert!(!acc.is_full());
        acc.add_value(dataset("b")).expect("add should succeed");
        assert!(acc.is_full());
    }

    #[test]
    fn byte_bound_admits_the_crossing_item() {
        // Budget smaller than a single item: add-then-check still admits it.
        let mut acc: SearchResponseAccumulator<SearchDatasetsResponse> =
            SearchResponseAccumulator::new(100, 1);

        acc.add_value(dataset("a")).expect("add should succeed");
        assert!(acc.is_full());

        let response = acc.finish();
        assert_eq!(response.datasets.len(), 1);
    }

    #[test]
    fn finish_seals_token_or_empty() {
        let mut acc: SearchResponseAccumulator<SearchDatasetsResponse> =
            SearchResponseAccumulator::new(5, DEFAULT_MAX_RESPONSE_BYTES);
        acc.add_value(dataset("a")).expect("add should succeed");
        acc.set_next_page_token(Some("1".to_string()));
        assert_eq!(acc.finish().next_page_token, "1");

        let mut acc: SearchResponseAccumulator<SearchDatasetsResponse> =
            SearchResponseAccumulator::new(5, DEFAULT_MAX_RESPONSE_BYTES);
        acc.add_value(dataset("a")).expect("add should succeed");
        acc.set_next_page_token(None);
        assert_eq!(acc.finish().next_page_token, "");
    }
}
