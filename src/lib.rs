//!
//! # wktcrs
//!
//! Parse, validate and re-emit WKT-2 (ISO 19162) coordinate reference
//! system descriptions.
//!
//! The pipeline is two phases: [`token::TokenStream::tokenize`] turns raw
//! WKT text into a flat, bracket-depth-annotated token stream, then
//! [`node::Node::from_tokens`] walks that stream building a typed AST,
//! validating axis counts, unit families and duplicate children as it
//! goes. [`node::Node::to_wkt`] re-emits an AST back to WKT text under a
//! configurable [`emit::EmitOptions`].
//!
//! ```
//! use wktcrs::Node;
//!
//! let wkt = concat!(
//!     r#"GEODCRS["WGS 84","#,
//!     r#"DATUM["World Geodetic System 1984","#,
//!     r#"ELLIPSOID["WGS 84",6378137,298.257223563]],"#,
//!     r#"CS[ellipsoidal,2],"#,
//!     r#"AXIS["geodetic latitude (Lat)",north],"#,
//!     r#"AXIS["geodetic longitude (Lon)",east],"#,
//!     r#"ANGLEUNIT["degree",0.0174532925199433],"#,
//!     r#"ID["EPSG",4326]]"#,
//! );
//!
//! let node = Node::from_wkt(wkt).unwrap();
//! let crs = node.as_crs().expect("GEODCRS parses to a CRS");
//! assert_eq!(crs.to_wkt(Default::default()).contains("WGS 84"), true);
//! ```
//!
mod common;
mod construct;
mod conversion;
mod cs;
mod datum;
mod emit;
mod errors;
mod node;
mod registry;
mod strutil;
mod token;
mod units;
mod validate;
mod crs;

pub use common::{Anchor, Citation, CommonTail, Extent, Id, Remark, Scope, TimeOrigin, Uri};
pub use conversion::{AbrTrans, Conversion, CoordOp, DerivingConv, Method, ParamFile, Parameter};
pub use crs::{BoundCrs, CompoundCrs, Crs, EngrCrs, GeodCrs, ImageCrs, ParamCrs, ProjCrs, TimeCrs, VertCrs};
pub use cs::{Axis, AxisDirection, Cs, CsCategory, Meridian};
pub use datum::{Ellipsoid, EngrDatum, GeodDatum, ImageDatum, ParamDatum, PrimeMeridian, TimeDatum, VertDatum};
pub use emit::EmitOptions;
pub use errors::{Error, Result};
pub use node::Node;
pub use registry::KindTag;
pub use token::{Token, TokenStream};
pub use units::{AngleUnit, AnyUnit, LengthUnit, ParametricUnit, ScaleUnit, TimeUnit, UnitKind};

use std::sync::atomic::{AtomicBool, Ordering};

/// Global default for leading-token-count strictness (spec §4.2 step 3,
/// §9). Mirrors `ogc_object::get_strict_parsing`/`set_strict_parsing` in
/// the original source: a single process-wide flag, since the original
/// had no per-call option at all. New code should prefer the per-call
/// [`ParseOptions`] instead, which is safe across concurrently embedding
/// callers; this flag remains for parity with the original global and for
/// callers who parse in a single-threaded batch context.
static STRICT_PARSING: AtomicBool = AtomicBool::new(true);

/// Current value of the strict-parsing flag.
pub fn strict_parsing() -> bool {
    STRICT_PARSING.load(Ordering::Relaxed)
}

/// Set the strict-parsing flag. Not reentrant-safe across concurrent
/// parses with different desired strictness -- use [`ParseOptions`] in
/// that case.
pub fn set_strict_parsing(strict: bool) {
    STRICT_PARSING.store(strict, Ordering::Relaxed);
}

/// Per-call parsing configuration, the preferred alternative to the
/// global [`strict_parsing`] flag for embedders running concurrent
/// parses with differing strictness needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub strict: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions { strict: true }
    }
}

// log for logging (optional).
#[cfg(feature = "logging")]
pub(crate) use log;

#[cfg(not(feature = "logging"))]
pub(crate) mod log {
    // Use __XXX__ to prevent 'ambiguous name' error when exporting.
    macro_rules! __trace__    ( ($($tt:tt)*) => {{}} );
    macro_rules! __debug__    ( ($($tt:tt)*) => {{}} );
    macro_rules! __error__    ( ($($tt:tt)*) => {{}} );
    macro_rules! __info__     ( ($($tt:tt)*) => {{}} );
    macro_rules! __warn__     ( ($($tt:tt)*) => {{}} );

    #[allow(unused_imports)]
    pub(crate) use {
        __debug__ as debug, __error__ as error, __info__ as info, __trace__ as trace,
        __warn__ as warn,
    };
}

#[cfg(test)]
mod tests;
