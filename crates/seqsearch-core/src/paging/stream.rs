//! Module: stream
//! Responsibility: the lazy, resumable enumeration contract and the two
//! position-cursor strategies (indexed collections and materialized lists).
//! Does not own: interval filtering (repository iterators) or the
//! read-group-set projection (dispatcher strategy).

use crate::{
    error::ServerError,
    paging::cursor::{compose_page_token, parse_page_token},
};

///
/// PageStream
///
/// Pull-based producer of `(item, next_token)` pairs. `next_token` is `None`
/// exactly when `item` is the last element of the sequence. A stream is
/// finite and non-restartable; a new stream created from a previously emitted
/// token resumes at the corresponding logical position.
///

pub trait PageStream {
    type Item;

    fn next_pair(&mut self) -> Result<Option<(Self::Item, Option<String>)>, ServerError>;
}

/// Boxed stream handed from a strategy factory to the driving loop.
pub type BoxedStream<'a, T> = Box<dyn PageStream<Item = T> + 'a>;

///
/// IndexedStream
///
/// Enumeration over an index-addressable collection of known size. Cursor is
/// the single index of the next element to produce.
///

pub struct IndexedStream<'a, T> {
    len: u64,
    next_index: u64,
    get: Box<dyn Fn(usize) -> T + 'a>,
}

impl<'a, T> IndexedStream<'a, T> {
    /// Start or resume enumeration; an empty token means the beginning.
    pub fn resume(
        page_token: &str,
        len: usize,
        get: impl Fn(usize) -> T + 'a,
    ) -> Result<Self, ServerError> {
        let next_index = if page_token.is_empty() {
            0
        } else {
            parse_page_token(page_token, 1)?[0]
        };

        Ok(Self {
            len: len as u64,
            next_index,
            get: Box::new(get),
        })
    }
}

impl<T> PageStream for IndexedStream<'_, T> {
    type Item = T;

    fn next_pair(&mut self) -> Result<Option<(T, Option<String>)>, ServerError> {
        if self.next_index >= self.len {
            return Ok(None);
        }

        let item = (self.get)(self.next_index as usize);
        self.next_index += 1;

        let token =
            (self.next_index < self.len).then(|| compose_page_token(&[self.next_index]));

        Ok(Some((item, token)))
    }
}

///
/// ListStream
///
/// Enumeration over a list materialized once per request (the filtered-list
/// strategy, and the in-memory interval iterators). The filter that produced
/// the list is deterministic for a given request, so the index cursor stays
/// valid across resumptions.
///

pub struct ListStream<T> {
    items: Vec<T>,
    next_index: u64,
}

impl<T: Clone> ListStream<T> {
    /// Start or resume enumeration over an already-filtered list.
    pub fn resume(page_token: &str, items: Vec<T>) -> Result<Self, ServerError> {
        let next_index = if page_token.is_empty() {
            0
        } else {
            parse_page_token(page_token, 1)?[0]
        };

        Ok(Self { items, next_index })
    }
}

impl<T: Clone> PageStream for ListStream<T> {
    type Item = T;

    fn next_pair(&mut self) -> Result<Option<(T, Option<String>)>, ServerError> {
        let len = self.items.len() as u64;
        if self.next_index >= len {
            return Ok(None);
        }

        let item = self.items[self.next_index as usize].clone();
        self.next_index += 1;

        let token = (self.next_index < len).then(|| compose_page_token(&[self.next_index]));

        Ok(Some((item, token)))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::{IndexedStream, ListStream, PageStream};
    use crate::error::ServerError;

    fn drain<S: PageStream>(stream: &mut S) -> Vec<(S::Item, Option<String>)> {
        let mut out = Vec::new();
        while let Some(pair) = stream.next_pair().expect("stream should not fail") {
            out.push(pair);
        }
        out
    }

    #[test]
    fn indexed_stream_emits_next_token_except_for_last_item() {
        let mut stream =
            IndexedStream::resume("", 3, |i| i * 10).expect("stream should construct");
        let pairs = drain(&mut stream);

        assert_eq!(
            pairs,
            vec![
                (0, Some("1".to_string())),
                (10, Some("2".to_string())),
                (20, None),
            ]
        );
    }

    #[test]
    fn indexed_stream_resumes_mid_sequence() {
        let mut stream =
            IndexedStream::resume("2", 4, |i| i).expect("stream should construct");
        let pairs = drain(&mut stream);

        assert_eq!(pairs, vec![(2, Some("3".to_string())), (3, None)]);
    }

    #[test]
    fn indexed_stream_is_empty_for_empty_collection() {
        let mut stream =
            IndexedStream::resume("", 0, |i| i).expect("stream should construct");
        assert!(stream.next_pair().expect("next_pair").is_none());
    }

    #[test]
    fn indexed_stream_past_end_token_yields_nothing() {
        let mut stream =
            IndexedStream::resume("9", 3, |i| i).expect("stream should construct");
        assert!(stream.next_pair().expect("next_pair").is_none());
    }

    #[test]
    fn indexed_stream_rejects_malformed_token() {
        // The stream holds a boxed closure, so the Ok arm has no Debug.
        let err = match IndexedStream::resume("1:2", 3, |i| i) {
            Ok(_) => panic!("two-segment token should be rejected"),
            Err(err) => err,
        };
        assert!(matches!(err, ServerError::MalformedPageToken { .. }));
    }

    #[test]
    fn list_stream_pages_concatenate_without_gaps_or_duplicates() {
        let items: Vec<u32> = (0..10).collect();

        // Page through three at a time, feeding each emitted token back in.
        let mut collected = Vec::new();
        let mut token = String::new();
        loop {
            let mut stream =
                ListStream::resume(&token, items.clone()).expect("stream should construct");
            let mut last_token = None;
            for _ in 0..3 {
                match stream.next_pair().expect("next_pair") {
                    Some((item, next)) => {
                        collected.push(item);
                        last_token = next;
                    }
                    None => {
                        last_token = None;
                        break;
                    }
                }
            }
            match last_token {
                Some(next) => token = next,
                None => break,
            }
        }

        assert_eq!(collected, items);
    }
}
