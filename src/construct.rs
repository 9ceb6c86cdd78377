//!
//! Shared token-stream walking helpers used by every per-kind `from_tokens`
//! constructor (spec §4.2).
//!
//! Grounded in `original_source/src/ogc_temporal_crs.cpp`'s `from_tokens`:
//! every kind there (1) locates its own subtree's token span, (2) counts its
//! "leading" scalar tokens before the first recognized child keyword, (3)
//! walks remaining children dispatching on keyword, skipping anything it
//! doesn't recognize rather than erroring (forward-compatible with future
//! WKT revisions, per spec §4.2 step 5). The exact leading-count loop in the
//! C++ source does not admit a literal line-for-line port (see DESIGN.md);
//! this module implements the prose rule from spec §4.2 step 3 directly.
//!
use crate::errors::{Error, Result};
use crate::registry;
use crate::strutil::kwd_is_one_of;
use crate::token::TokenStream;

/// Outcome of offering a child token index to a clause-specific consumer
/// (e.g. `CommonTail::try_consume`): either it recognized and consumed the
/// subtree rooted there, or it's not one of its clauses and the caller
/// should try something else.
pub enum ChildOutcome {
    Consumed(usize),
    NotMine,
}

/// Find the end of the subtree rooted at `start` (the index one past its
/// closing bracket) and the count of "leading" tokens: scalar (quoted
/// string or number) tokens immediately at `level == start.level + 1`
/// that precede the first child whose own text is a recognized node
/// keyword. Stops at end-of-subtree if every child is a leading scalar
/// (a childless leaf like `ID["EPSG",4326]`).
pub fn span(stream: &TokenStream, start: usize) -> (usize, usize) {
    let root_level = stream.tokens[start].level;
    let mut i = start + 1;
    let mut same = 0usize;
    let mut counting = true;
    while i < stream.len() && stream.tokens[i].level > root_level {
        if counting && stream.tokens[i].level == root_level + 1 {
            if registry::is_known_keyword(&stream.tokens[i].text) {
                counting = false;
            } else {
                same += 1;
            }
        } else if stream.tokens[i].level == root_level + 1 {
            counting = false;
        }
        i += 1;
    }
    (i, same)
}

/// Advance past the subtree rooted at `start`, returning the index one
/// past its end. Used to skip children a node doesn't recognize.
pub fn skip_subtree(stream: &TokenStream, start: usize) -> usize {
    span(stream, start).0
}

/// Validate that the keyword at `start` is one of `alts` (case-insensitive),
/// returning it as a canonical owned string for diagnostics.
pub fn check_keyword(kind: &'static str, stream: &TokenStream, start: usize, alts: &[&str]) -> Result<()> {
    let kwd = &stream.tokens[start].text;
    if kwd_is_one_of(kwd, alts) {
        Ok(())
    } else {
        Err(Error::WktInvalidKeyword(kind, kwd.clone()))
    }
}

/// Enforce a `[min, max]` leading-token-count range. Under
/// `strict_parsing` (the default) both bounds apply; when disabled only
/// the lower bound is enforced, mirroring `ogc_object::get_strict_parsing`
/// callers in the original source, who use it to parse older/looser WKT
/// written before a mandatory leading value was added to a kind.
pub fn enforce_leading(kind: &'static str, same: usize, min: usize, max: usize) -> Result<()> {
    if same < min {
        return Err(Error::WktInsufficientTokens(kind, same));
    }
    if crate::strict_parsing() && same > max {
        return Err(Error::WktTooManyTokens(kind, same));
    }
    Ok(())
}

/// Parse a token's text as `f64`, mapping failure to a kind-tagged error.
pub fn parse_f64(kind: &'static str, text: &str) -> Result<f64> {
    text.parse::<f64>()
        .map_err(|_| Error::Wkt(format!("{kind}: invalid number {text:?}")))
}

/// Parse a token's text as `u32`, mapping failure to a kind-tagged error.
pub fn parse_u32(kind: &'static str, text: &str) -> Result<u32> {
    text.parse::<u32>()
        .map_err(|_| Error::Wkt(format!("{kind}: invalid integer {text:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_of_leaf_node() {
        let ts = TokenStream::tokenize(r#"ID["EPSG",4326]"#, "ID").unwrap();
        let (end, same) = span(&ts, 0);
        assert_eq!(end, 3);
        assert_eq!(same, 2);
    }

    #[test]
    fn span_stops_counting_at_first_child_keyword() {
        let ts = TokenStream::tokenize(
            r#"GEODCRS["WGS 84", DATUM["World Geodetic System 1984", ELLIPSOID["WGS 84",6378137,298.257223563]], CS[ellipsoidal,2], AXIS["lat",north], AXIS["lon",east]]"#,
            "GEODCRS",
        )
        .unwrap();
        let (end, same) = span(&ts, 0);
        assert_eq!(end, ts.len());
        assert_eq!(same, 1);
    }

    #[test]
    fn skip_subtree_advances_past_nested_brackets() {
        let ts = TokenStream::tokenize(r#"FOO[BAR["x",BAZ[1,2]],9]"#, "FOO").unwrap();
        let next = skip_subtree(&ts, 1);
        assert_eq!(ts.tokens[next].text, "9");
    }
}
