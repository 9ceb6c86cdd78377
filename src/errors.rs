//!
//! Crate errors
//!
//! Closed taxonomy: lexical, syntactic, structural-duplicate, missing-required,
//! bounds and resource errors. Only the first error of a given construction is
//! material; callers tear down and propagate it (see `crate::node`).
//!

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    // -- Lexical --
    #[error("{0}: empty WKT string")]
    WktEmptyString(&'static str),
    #[error("{0}: unbalanced brackets")]
    WktUnbalancedBrackets(&'static str),
    #[error("{0}: unterminated or malformed quoted string")]
    WktBadQuote(&'static str),
    #[error("{0}: token index {1} out of range")]
    WktIndexOutOfRange(&'static str, usize),

    // -- Syntactic --
    #[error("{0}: invalid keyword {1:?}")]
    WktInvalidKeyword(&'static str, String),
    #[error("{0}: unknown keyword {1:?}")]
    WktUnknownKeyword(&'static str, String),
    #[error("{0}: insufficient leading tokens ({1})")]
    WktInsufficientTokens(&'static str, usize),
    #[error("{0}: too many leading tokens ({1})")]
    WktTooManyTokens(&'static str, usize),

    // -- Structural duplicates --
    #[error("{parent}: duplicate {child}")]
    DuplicateChild {
        parent: &'static str,
        child: &'static str,
    },
    #[error("{parent}: duplicate id {authority}:{code}")]
    DuplicateId {
        parent: &'static str,
        authority: String,
        code: String,
    },
    #[error("{parent}: duplicate extent of kind {kind}")]
    DuplicateExtent {
        parent: &'static str,
        kind: &'static str,
    },

    // -- Missing required children --
    #[error("{parent}: missing {child}")]
    MissingChild {
        parent: &'static str,
        child: &'static str,
    },

    // -- Bounds --
    #[error("{0}: name too long ({1} bytes)")]
    NameTooLong(&'static str, usize),
    #[error("{0}: axis count mismatch: cs declares {1}, found {2}")]
    AxisCountMismatch(&'static str, u32, usize),
    #[error("{0}: unit kind mismatch for {1}")]
    UnitKindMismatch(&'static str, &'static str),
    #[error("{0}: duplicate axis order {1}")]
    AxisDuplicateOrder(&'static str, u32),
    #[error("{0}: axis direction {1:?} not permitted for cs category {2}")]
    AxisDirectionNotPermitted(&'static str, String, &'static str),

    // -- Resource (never actually raised by safe Rust; kept to close the taxonomy) --
    #[error("{0}: out of memory")]
    NoMemory(&'static str),

    // -- Catch-all for messages that don't warrant a dedicated variant --
    #[error("{0}")]
    Wkt(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
