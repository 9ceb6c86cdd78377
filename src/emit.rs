//!
//! WKT re-emission options and the shared child-joining helper.
//!
//! Grounded in `original_source/src/ogc_object.cpp`'s `OGC_WKT_OPT_*` bit
//! flags, carried over here as a plain `Copy` struct of `bool` fields rather
//! than a bitmask -- the teacher repo (`proj4wkt`) has no `bitflags`
//! dependency and none of the pack's other repos pull it in either, so a
//! struct keeps the dependency stack unchanged (see DESIGN.md).
//!
use crate::errors::{Error, Result};

/// Controls how `Node::to_wkt` renders an object tree (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmitOptions {
    /// Use `()` instead of `[]` for delimiters.
    pub parens: bool,
    /// Omit every `ID`/`AUTHORITY` clause.
    pub no_ids: bool,
    /// Emit `ID`/`AUTHORITY` only on the outermost node.
    pub top_id_only: bool,
    /// Use WKT1-era keyword spellings where a node has one (`AUTHORITY`
    /// instead of `ID`, etc.).
    pub old_syntax: bool,
    /// Pretty-print with one child per indented line.
    pub expand: bool,
    /// Internal recursive call: suppresses `expand`'s top-level-only
    /// indentation reset so nested calls don't re-trigger it.
    pub internal: bool,
}

impl EmitOptions {
    pub fn open(&self) -> char {
        if self.parens {
            '('
        } else {
            '['
        }
    }

    pub fn close(&self) -> char {
        if self.parens {
            ')'
        } else {
            ']'
        }
    }

    /// The options a recursive call on a child node should use: identical
    /// except `internal` is forced on so nested `expand` reindentation
    /// only happens once, at the outermost call.
    pub fn nested(self) -> EmitOptions {
        EmitOptions {
            internal: true,
            ..self
        }
    }
}

/// Assemble `kwd<open>leading, child, child, ...<close>` from already
/// rendered pieces, then pretty-print if `expand` is set and this is the
/// outermost call.
pub fn assemble(kwd: &str, leading: &[String], children: &[String], opts: EmitOptions) -> String {
    let mut body: Vec<&str> = Vec::with_capacity(leading.len() + children.len());
    body.extend(leading.iter().map(String::as_str));
    body.extend(children.iter().map(String::as_str));
    let joined = body.join(",");
    let flat = format!("{kwd}{}{joined}{}", opts.open(), opts.close());
    if opts.expand && !opts.internal {
        reindent(&flat)
    } else {
        flat
    }
}

/// Bounded output contract: fail rather than silently truncate, mirroring
/// `OGC_TBUF`'s fixed-size overflow behavior from the original source with
/// a `String`'s growable-but-still-bounded analogue.
pub fn check_bound(kind: &'static str, out: &str, max_len: usize) -> Result<()> {
    if out.len() > max_len {
        Err(Error::Wkt(format!("{kind}: emitted WKT exceeds {max_len} bytes")))
    } else {
        Ok(())
    }
}

/// One-child-per-line reindentation for `EXPAND`. Walks the flat string
/// tracking bracket depth; a comma at depth `d` (outside a quoted string)
/// becomes a newline plus `2*d` spaces of indent.
fn reindent(flat: &str) -> String {
    let mut out = String::with_capacity(flat.len() * 2);
    let mut depth: usize = 0;
    let mut in_quotes = false;
    for c in flat.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                out.push(c);
            }
            '[' | '(' if !in_quotes => {
                depth += 1;
                out.push(c);
            }
            ']' | ')' if !in_quotes => {
                depth -= 1;
                out.push(c);
            }
            ',' if !in_quotes => {
                out.push(',');
                out.push('\n');
                out.push_str(&" ".repeat(depth * 4));
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assemble_flat() {
        let opts = EmitOptions::default();
        let s = assemble("ID", &["\"EPSG\"".into(), "4326".into()], &[], opts);
        assert_eq!(s, r#"ID["EPSG",4326]"#);
    }

    #[test]
    fn assemble_parens() {
        let opts = EmitOptions {
            parens: true,
            ..Default::default()
        };
        let s = assemble("ID", &["\"EPSG\"".into(), "4326".into()], &[], opts);
        assert_eq!(s, r#"ID("EPSG",4326)"#);
    }

    #[test]
    fn expand_adds_newlines() {
        let opts = EmitOptions {
            expand: true,
            ..Default::default()
        };
        let s = assemble("FOO", &["1".into()], &["BAR[2]".into()], opts);
        assert!(s.contains('\n'));
    }
}
