///
/// Cursor codec helpers.
///
/// This module owns the opaque wire-token format used for resumption cursors.
/// It intentionally contains only token encoding/decoding logic and no query
/// semantics. A token is an ordered tuple of non-negative integers; each
/// enumeration strategy fixes the arity it expects, and a token produced for
/// one strategy is never valid input for another.
///
use crate::error::ServerError;

// Defensive decode bound for untrusted page-token input.
const MAX_PAGE_TOKEN_LEN: usize = 1024;

/// Encode an ordered tuple of cursor values as one opaque token.
#[must_use]
pub fn compose_page_token(values: &[u64]) -> String {
    let mut out = String::new();
    for (idx, value) in values.iter().enumerate() {
        use std::fmt::Write as _;
        if idx > 0 {
            out.push(':');
        }
        let _ = write!(out, "{value}");
    }
    out
}

/// Decode a page token into exactly `expected_arity` cursor values.
///
/// The empty token is the distinct "start of sequence" case and must be
/// handled by the caller before decoding; it never reaches this parser.
pub fn parse_page_token(token: &str, expected_arity: usize) -> Result<Vec<u64>, ServerError> {
    let malformed = || ServerError::MalformedPageToken {
        token: token.to_string(),
        expected_arity,
    };

    if token.is_empty() || token.len() > MAX_PAGE_TOKEN_LEN {
        return Err(malformed());
    }

    let mut values = Vec::with_capacity(expected_arity);
    for segment in token.split(':') {
        let value = segment.parse::<u64>().map_err(|_| malformed())?;
        values.push(value);
    }

    if values.len() != expected_arity {
        return Err(malformed());
    }

    Ok(values)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::{MAX_PAGE_TOKEN_LEN, compose_page_token, parse_page_token};
    use crate::error::ServerError;
    use proptest::prelude::*;

    #[test]
    fn parse_page_token_rejects_empty_token() {
        let err = parse_page_token("", 1).expect_err("empty token should be rejected");
        assert!(matches!(err, ServerError::MalformedPageToken { .. }));
    }

    #[test]
    fn parse_page_token_rejects_wrong_arity() {
        let err = parse_page_token("3:7", 1).expect_err("extra segment should be rejected");
        assert!(matches!(
            err,
            ServerError::MalformedPageToken {
                expected_arity: 1,
                ..
            }
        ));

        let err = parse_page_token("3", 2).expect_err("missing segment should be rejected");
        assert!(matches!(
            err,
            ServerError::MalformedPageToken {
                expected_arity: 2,
                ..
            }
        ));
    }

    #[test]
    fn parse_page_token_rejects_non_numeric_segments() {
        for token in ["abc", "1:x", "-1", "1.5", "1:"] {
            let err = parse_page_token(token, token.split(':').count())
                .expect_err("non-numeric segment should be rejected");
            assert!(matches!(err, ServerError::MalformedPageToken { .. }));
        }
    }

    #[test]
    fn parse_page_token_enforces_max_token_length() {
        let oversized = "1".repeat(MAX_PAGE_TOKEN_LEN + 1);
        let err = parse_page_token(&oversized, 1).expect_err("oversized token should be rejected");
        assert!(matches!(err, ServerError::MalformedPageToken { .. }));
    }

    #[test]
    fn compose_parse_round_trip_is_stable() {
        let values = vec![0, 1, 42, u64::MAX];
        let token = compose_page_token(&values);
        assert_eq!(token, format!("0:1:42:{}", u64::MAX));

        let decoded = parse_page_token(&token, values.len()).expect("token should decode");
        assert_eq!(decoded, values);
    }

    proptest! {
        #[test]
        fn round_trip_holds_for_all_arities(values in proptest::collection::vec(any::<u64>(), 1..6)) {
            let token = compose_page_token(&values);
            let decoded = parse_page_token(&token, values.len()).expect("token should decode");
            prop_assert_eq!(decoded, values);
        }
    }
}
