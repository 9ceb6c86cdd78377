//!
//! Tokenizer: turns a raw WKT string into a flat, level-annotated token
//! stream (spec §3.1/§4.1).
//!
//! Grounded in `proj4wkt::parser`'s lexeme recognizers (`quoted_string`,
//! `number`, `keyword`) but restructured into a single left-to-right scan
//! that emits a flat `Vec<Token>` instead of recursively building domain
//! objects -- the constructor (`crate::node`) walks this stream in a
//! second, independent pass, per spec §4.1 vs §4.2.
//!
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag},
    character::complete::{alpha1, alphanumeric1, char, multispace0},
    combinator::{map, recognize},
    multi::{fold_many0, many0_count},
    number::complete::recognize_float,
    sequence::{delimited, pair},
    IResult,
};

use crate::errors::{Error, Result};
use crate::log;

/// One lexeme: a keyword, a quoted name (unescaped), or a number (kept as
/// text; leaf constructors parse it into its numeric form).
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    pub level: u32,
    pub idx: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    pub tokens: Vec<Token>,
}

impl TokenStream {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&Token> {
        self.tokens.get(i)
    }

    /// Tokenize `input`. `root_kwd` is used only to name the empty-input
    /// error, as in the original `ogc_token::tokenize(wkt, obj_kwd(), err)`
    /// contract.
    pub fn tokenize(input: &str, root_kwd: &'static str) -> Result<TokenStream> {
        if input.trim().is_empty() {
            log::error!("empty WKT input for {root_kwd}");
            return Err(Error::WktEmptyString(root_kwd));
        }

        let mut tokens = Vec::new();
        let mut idx_counters: Vec<u32> = vec![0];
        let mut depth: i64 = 0;
        let mut rest = input;

        loop {
            let (r, _) = multispace0::<_, nom::error::Error<&str>>(rest).unwrap();
            rest = r;
            if rest.is_empty() {
                break;
            }

            let c = rest.as_bytes()[0];
            match c {
                b'[' | b'(' => {
                    rest = &rest[1..];
                    depth += 1;
                    if depth as usize >= idx_counters.len() {
                        idx_counters.push(0);
                    } else {
                        idx_counters[depth as usize] = 0;
                    }
                }
                b']' | b')' => {
                    rest = &rest[1..];
                    depth -= 1;
                    if depth < 0 {
                        log::error!("unbalanced brackets in WKT input");
                        return Err(Error::WktUnbalancedBrackets(root_kwd));
                    }
                }
                b',' => {
                    rest = &rest[1..];
                }
                b'"' => {
                    let (r, s) = quoted_string(rest).map_err(|_| {
                        log::error!("unterminated quoted string");
                        Error::WktBadQuote(root_kwd)
                    })?;
                    rest = r;
                    emit(&mut tokens, &mut idx_counters, depth, s.to_string());
                }
                _ => {
                    if let Ok((r, s)) = keyword(rest) {
                        rest = r;
                        emit(&mut tokens, &mut idx_counters, depth, s.to_string());
                    } else if let Ok((r, s)) = number(rest) {
                        rest = r;
                        emit(&mut tokens, &mut idx_counters, depth, s.to_string());
                    } else {
                        log::error!("stray character {:?} in WKT input", c as char);
                        return Err(Error::Wkt(format!(
                            "stray character {:?} in WKT input",
                            c as char
                        )));
                    }
                }
            }
        }

        if depth != 0 {
            log::error!("unbalanced brackets in WKT input");
            return Err(Error::WktUnbalancedBrackets(root_kwd));
        }

        Ok(TokenStream { tokens })
    }
}

fn emit(tokens: &mut Vec<Token>, idx_counters: &mut [u32], depth: i64, text: String) {
    let level = depth as u32;
    let idx = idx_counters[depth as usize];
    idx_counters[depth as usize] += 1;
    tokens.push(Token { text, level, idx });
}

fn quoted_string(i: &str) -> IResult<&str, &str> {
    delimited(char('"'), quoted_string_body, char('"'))(i)
}

fn quoted_string_body(s: &str) -> IResult<&str, &str> {
    map(
        fold_many0(
            alt((tag("\"\""), is_not("\""))),
            || 0,
            |n, item: &str| n + item.len(),
        ),
        move |len| &s[..len],
    )(s)
}

fn number(i: &str) -> IResult<&str, &str> {
    recognize_float(i)
}

fn keyword(i: &str) -> IResult<&str, &str> {
    recognize(pair(alpha1, many0_count(alt((alphanumeric1, tag("_"))))))(i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_simple() {
        let ts = TokenStream::tokenize(r#"FOO["foo", BAR["bar"], 1.5]"#, "FOO").unwrap();
        let texts: Vec<&str> = ts.tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["FOO", "foo", "BAR", "bar", "1.5"]);
        assert_eq!(ts.tokens[0].level, 0);
        assert_eq!(ts.tokens[0].idx, 0);
        assert_eq!(ts.tokens[1].level, 1);
        assert_eq!(ts.tokens[1].idx, 0);
        assert_eq!(ts.tokens[2].level, 1);
        assert_eq!(ts.tokens[2].idx, 1);
        assert_eq!(ts.tokens[3].level, 2);
        assert_eq!(ts.tokens[3].idx, 0);
        assert_eq!(ts.tokens[4].level, 1);
        assert_eq!(ts.tokens[4].idx, 2);
    }

    #[test]
    fn empty_input_is_error() {
        assert!(matches!(
            TokenStream::tokenize("   ", "FOO"),
            Err(Error::WktEmptyString("FOO"))
        ));
    }

    #[test]
    fn unbalanced_brackets() {
        assert!(matches!(
            TokenStream::tokenize(r#"FOO["foo""#, "FOO"),
            Err(Error::WktUnbalancedBrackets(_))
        ));
        assert!(matches!(
            TokenStream::tokenize(r#"FOO["foo"]]"#, "FOO"),
            Err(Error::WktUnbalancedBrackets(_))
        ));
    }

    #[test]
    fn bad_quote() {
        assert!(matches!(
            TokenStream::tokenize(r#"FOO["foo]"#, "FOO"),
            Err(Error::WktBadQuote(_))
        ));
    }

    #[test]
    fn mixed_brackets_allowed() {
        let ts = TokenStream::tokenize(r#"FOO("foo")"#, "FOO").unwrap();
        assert_eq!(ts.tokens.len(), 2);
    }

    #[test]
    fn negative_numbers() {
        let ts = TokenStream::tokenize(r#"PARAMETER["x",-41.5]"#, "PARAMETER").unwrap();
        assert_eq!(ts.tokens[2].text, "-41.5");
    }
}
