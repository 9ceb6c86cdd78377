//!
//! Object facade: the `Node` tagged union over every kind, and the
//! generic `from_wkt`/`from_tokens`/`to_wkt`/`is_equal`/`is_identical`
//! dispatch (spec §6.1).
//!
//! Grounded in `original_source/src/ogc_object.cpp`'s `CHECK`/`CASE`
//! dispatch macros (one arm per kind, same null-handling contract for the
//! `Option<&Node>`-level free functions) and `proj4wkt::builder::Node<'a>`
//! (the teacher's own flat tagged-union-over-kinds precedent, generalized
//! from its handful of model types to the full registry).
//!
use crate::common::{Anchor, Citation, Extent, Id, Remark, Scope, TimeOrigin, Uri};
use crate::construct;
use crate::conversion::{AbrTrans, Conversion, CoordOp, DerivingConv, Method, ParamFile, Parameter};
use crate::cs::{Axis, Cs, Meridian};
use crate::datum::{EngrDatum, GeodDatum, ImageDatum, ParamDatum, PrimeMeridian, TimeDatum, VertDatum};
use crate::datum::Ellipsoid;
use crate::emit::EmitOptions;
use crate::errors::{Error, Result};
use crate::registry::{self, KindTag};
use crate::token::TokenStream;
use crate::units::{AngleUnit, LengthUnit, ParametricUnit, ScaleUnit, TimeUnit};
use crate::crs::{BoundCrs, CompoundCrs, Crs, EngrCrs, GeodCrs, ImageCrs, ParamCrs, ProjCrs, TimeCrs, VertCrs};

/// The union of every constructible kind. Root-level parsing
/// (`Node::from_wkt`) accepts any of these; most callers will narrow to
/// `Crs` via `Node::as_crs` once parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    GeodCrs(GeodCrs),
    ProjCrs(ProjCrs),
    VertCrs(VertCrs),
    EngrCrs(EngrCrs),
    TimeCrs(TimeCrs),
    ParamCrs(ParamCrs),
    ImageCrs(ImageCrs),
    CompoundCrs(CompoundCrs),
    BoundCrs(BoundCrs),
    GeodDatum(GeodDatum),
    VertDatum(VertDatum),
    EngrDatum(EngrDatum),
    ParamDatum(ParamDatum),
    ImageDatum(ImageDatum),
    TimeDatum(TimeDatum),
    Ellipsoid(Ellipsoid),
    PrimeMeridian(PrimeMeridian),
    Cs(Cs),
    Axis(Axis),
    Meridian(Meridian),
    Conversion(Conversion),
    DerivingConv(DerivingConv),
    AbrTrans(AbrTrans),
    CoordOp(CoordOp),
    Method(Method),
    Parameter(Parameter),
    ParamFile(ParamFile),
    AngleUnit(AngleUnit),
    LengthUnit(LengthUnit),
    ScaleUnit(ScaleUnit),
    TimeUnit(TimeUnit),
    ParametricUnit(ParametricUnit),
    Id(Id),
    Citation(Citation),
    Uri(Uri),
    Anchor(Anchor),
    Scope(Scope),
    Remark(Remark),
    TimeOrigin(TimeOrigin),
    Extent(Extent),
}

impl Node {
    /// Tokenize and construct in one call — the top-level entry point
    /// (spec §6.1, `Node::from_wkt`).
    pub fn from_wkt(input: &str) -> Result<Node> {
        let stream = TokenStream::tokenize(input, "WKT")?;
        if stream.is_empty() {
            return Err(Error::WktEmptyString("WKT"));
        }
        let (node, end) = Node::from_tokens(&stream, 0)?;
        if end != stream.len() {
            return Err(Error::WktTooManyTokens("WKT", stream.len() - end));
        }
        Ok(node)
    }

    /// Construct a `Node` from an already-tokenized stream at `start`,
    /// dispatching on the keyword's kind tag (spec §4.2 step 1/§6.1).
    pub fn from_tokens(stream: &TokenStream, start: usize) -> Result<(Node, usize)> {
        let kwd = stream.tokens[start].text.clone();
        let tag = registry::lookup(&kwd).ok_or_else(|| Error::WktUnknownKeyword("NODE", kwd.clone()))?;
        Ok(match tag {
            KindTag::GeodCrs => {
                let (n, e) = GeodCrs::from_tokens(stream, start)?;
                (Node::GeodCrs(n), e)
            }
            KindTag::ProjCrs => {
                let (n, e) = ProjCrs::from_tokens(stream, start)?;
                (Node::ProjCrs(n), e)
            }
            KindTag::VertCrs => {
                let (n, e) = VertCrs::from_tokens(stream, start)?;
                (Node::VertCrs(n), e)
            }
            KindTag::EngrCrs => {
                let (n, e) = EngrCrs::from_tokens(stream, start)?;
                (Node::EngrCrs(n), e)
            }
            KindTag::TimeCrs => {
                let (n, e) = TimeCrs::from_tokens(stream, start)?;
                (Node::TimeCrs(n), e)
            }
            KindTag::ParamCrs => {
                let (n, e) = ParamCrs::from_tokens(stream, start)?;
                (Node::ParamCrs(n), e)
            }
            KindTag::ImageCrs => {
                let (n, e) = ImageCrs::from_tokens(stream, start)?;
                (Node::ImageCrs(n), e)
            }
            KindTag::CompoundCrs => {
                let (n, e) = CompoundCrs::from_tokens(stream, start)?;
                (Node::CompoundCrs(n), e)
            }
            KindTag::BoundCrs => {
                let (n, e) = BoundCrs::from_tokens(stream, start)?;
                (Node::BoundCrs(n), e)
            }
            KindTag::GeodDatum => {
                let (n, e) = GeodDatum::from_tokens(stream, start)?;
                (Node::GeodDatum(n), e)
            }
            KindTag::VertDatum => {
                let (n, e) = VertDatum::from_tokens(stream, start)?;
                (Node::VertDatum(n), e)
            }
            KindTag::EngrDatum => {
                let (n, e) = EngrDatum::from_tokens(stream, start)?;
                (Node::EngrDatum(n), e)
            }
            KindTag::ParamDatum => {
                let (n, e) = ParamDatum::from_tokens(stream, start)?;
                (Node::ParamDatum(n), e)
            }
            KindTag::ImageDatum => {
                let (n, e) = ImageDatum::from_tokens(stream, start)?;
                (Node::ImageDatum(n), e)
            }
            KindTag::TimeDatum => {
                let (n, e) = TimeDatum::from_tokens(stream, start)?;
                (Node::TimeDatum(n), e)
            }
            KindTag::Ellipsoid => {
                let (n, e) = Ellipsoid::from_tokens(stream, start)?;
                (Node::Ellipsoid(n), e)
            }
            KindTag::PrimeMeridian => {
                let (n, e) = PrimeMeridian::from_tokens(stream, start)?;
                (Node::PrimeMeridian(n), e)
            }
            KindTag::Cs => {
                let (n, e) = Cs::from_tokens(stream, start)?;
                (Node::Cs(n), e)
            }
            KindTag::Axis => {
                let (n, e) = Axis::from_tokens(stream, start, crate::units::UnitKind::Angle)?;
                (Node::Axis(n), e)
            }
            KindTag::Meridian => {
                let (n, e) = Meridian::from_tokens(stream, start)?;
                (Node::Meridian(n), e)
            }
            KindTag::Conversion => {
                let (n, e) = Conversion::from_tokens(stream, start)?;
                (Node::Conversion(n), e)
            }
            KindTag::DerivingConv => {
                let (n, e) = DerivingConv::from_tokens(stream, start)?;
                (Node::DerivingConv(n), e)
            }
            KindTag::AbrTrans => {
                let (n, e) = AbrTrans::from_tokens(stream, start)?;
                (Node::AbrTrans(n), e)
            }
            KindTag::CoordOp => {
                let (n, e) = CoordOp::from_tokens(stream, start)?;
                (Node::CoordOp(n), e)
            }
            KindTag::Method => {
                let (n, e) = Method::from_tokens(stream, start)?;
                (Node::Method(n), e)
            }
            KindTag::Parameter => {
                let (n, e) = Parameter::from_tokens(stream, start)?;
                (Node::Parameter(n), e)
            }
            KindTag::ParamFile => {
                let (n, e) = ParamFile::from_tokens(stream, start)?;
                (Node::ParamFile(n), e)
            }
            KindTag::AngleUnit => {
                let (n, e) = AngleUnit::from_tokens(stream, start)?;
                (Node::AngleUnit(n), e)
            }
            KindTag::LengthUnit => {
                let (n, e) = LengthUnit::from_tokens(stream, start)?;
                (Node::LengthUnit(n), e)
            }
            KindTag::ScaleUnit => {
                let (n, e) = ScaleUnit::from_tokens(stream, start)?;
                (Node::ScaleUnit(n), e)
            }
            KindTag::TimeUnit => {
                let (n, e) = TimeUnit::from_tokens(stream, start)?;
                (Node::TimeUnit(n), e)
            }
            KindTag::ParametricUnit => {
                let (n, e) = ParametricUnit::from_tokens(stream, start)?;
                (Node::ParametricUnit(n), e)
            }
            KindTag::Unit => {
                // A bare generic UNIT at the root has no context to infer
                // a family from; treat it as length, the most common case.
                let (n, e) = LengthUnit::from_tokens(stream, start)?;
                (Node::LengthUnit(n), e)
            }
            KindTag::Id => {
                let (n, e) = Id::from_tokens(stream, start)?;
                (Node::Id(n), e)
            }
            KindTag::Citation => {
                let (end, same) = construct::span(stream, start);
                construct::enforce_leading("CITATION", same, 1, 1)?;
                (
                    Node::Citation(Citation::new(crate::strutil::unescape(&stream.tokens[start + 1].text))),
                    end,
                )
            }
            KindTag::Uri => {
                let (end, same) = construct::span(stream, start);
                construct::enforce_leading("URI", same, 1, 1)?;
                (
                    Node::Uri(Uri::new(crate::strutil::unescape(&stream.tokens[start + 1].text))),
                    end,
                )
            }
            KindTag::Anchor => {
                let (end, same) = construct::span(stream, start);
                construct::enforce_leading("ANCHOR", same, 1, 1)?;
                (
                    Node::Anchor(Anchor::new(crate::strutil::unescape(&stream.tokens[start + 1].text))),
                    end,
                )
            }
            KindTag::Scope => {
                let (end, same) = construct::span(stream, start);
                construct::enforce_leading("SCOPE", same, 1, 1)?;
                (
                    Node::Scope(Scope::new(crate::strutil::unescape(&stream.tokens[start + 1].text))),
                    end,
                )
            }
            KindTag::Remark => {
                let (end, same) = construct::span(stream, start);
                construct::enforce_leading("REMARK", same, 1, 1)?;
                (
                    Node::Remark(Remark::new(crate::strutil::unescape(&stream.tokens[start + 1].text))),
                    end,
                )
            }
            KindTag::TimeOrigin => {
                let (end, same) = construct::span(stream, start);
                construct::enforce_leading("TIMEORIGIN", same, 1, 1)?;
                (
                    Node::TimeOrigin(TimeOrigin::new(crate::strutil::unescape(&stream.tokens[start + 1].text))),
                    end,
                )
            }
            KindTag::AreaExtent | KindTag::BboxExtent | KindTag::VertExtent | KindTag::TimeExtent => {
                let (n, e) = Extent::from_tokens(stream, start)?;
                (Node::Extent(n), e)
            }
            KindTag::Order | KindTag::Bearing | KindTag::OpAccuracy => {
                // Bare scalar leaves with no dedicated Node variant: fold
                // into a generic one-token read, used only when these
                // appear detached from their usual parent (AXIS/MERIDIAN/
                // COORDINATEOPERATION) during standalone round-trips.
                return Err(Error::WktUnknownKeyword("NODE", kwd));
            }
        })
    }

    /// Emit WKT, failing rather than returning a string longer than
    /// `max_len` -- the bounded-output contract of spec §4.5, generalized
    /// from the original's fixed `OGC_TBUF` buffers.
    pub fn to_wkt_bounded(&self, opts: EmitOptions, max_len: usize) -> Result<String> {
        let out = self.to_wkt(opts);
        crate::emit::check_bound("NODE", &out, max_len)?;
        Ok(out)
    }

    pub fn to_wkt(&self, opts: EmitOptions) -> String {
        match self {
            Node::GeodCrs(n) => n.to_wkt(opts),
            Node::ProjCrs(n) => n.to_wkt(opts),
            Node::VertCrs(n) => n.to_wkt(opts),
            Node::EngrCrs(n) => n.to_wkt(opts),
            Node::TimeCrs(n) => n.to_wkt(opts),
            Node::ParamCrs(n) => n.to_wkt(opts),
            Node::ImageCrs(n) => n.to_wkt(opts),
            Node::CompoundCrs(n) => n.to_wkt(opts),
            Node::BoundCrs(n) => n.to_wkt(opts),
            Node::GeodDatum(n) => n.to_wkt(opts),
            Node::VertDatum(n) => n.to_wkt(opts),
            Node::EngrDatum(n) => n.to_wkt(opts),
            Node::ParamDatum(n) => n.to_wkt(opts),
            Node::ImageDatum(n) => n.to_wkt(opts),
            Node::TimeDatum(n) => n.to_wkt(opts),
            Node::Ellipsoid(n) => n.to_wkt(opts),
            Node::PrimeMeridian(n) => n.to_wkt(opts),
            Node::Cs(n) => n.to_wkt(opts),
            Node::Axis(n) => n.to_wkt(opts),
            Node::Meridian(n) => n.to_wkt(opts),
            Node::Conversion(n) => n.to_wkt(opts),
            Node::DerivingConv(n) => n.to_wkt(opts),
            Node::AbrTrans(n) => n.to_wkt(opts),
            Node::CoordOp(n) => n.to_wkt(opts),
            Node::Method(n) => n.to_wkt(opts),
            Node::Parameter(n) => n.to_wkt(opts),
            Node::ParamFile(n) => n.to_wkt(opts),
            Node::AngleUnit(n) => n.to_wkt(opts),
            Node::LengthUnit(n) => n.to_wkt(opts),
            Node::ScaleUnit(n) => n.to_wkt(opts),
            Node::TimeUnit(n) => n.to_wkt(opts),
            Node::ParametricUnit(n) => n.to_wkt(opts),
            Node::Id(n) => n.to_wkt(opts),
            Node::Citation(n) => n.to_wkt("CITATION"),
            Node::Uri(n) => n.to_wkt("URI"),
            Node::Anchor(n) => n.to_wkt("ANCHOR"),
            Node::Scope(n) => n.to_wkt("SCOPE"),
            Node::Remark(n) => n.to_wkt("REMARK"),
            Node::TimeOrigin(n) => n.to_wkt("TIMEORIGIN"),
            Node::Extent(n) => n.to_wkt(opts),
        }
    }

    /// Narrow to a `Crs`, the common case for callers who parsed a root
    /// object expecting a coordinate reference system.
    pub fn as_crs(self) -> Option<Crs> {
        match self {
            Node::GeodCrs(n) => Some(Crs::Geod(n)),
            Node::ProjCrs(n) => Some(Crs::Proj(n)),
            Node::VertCrs(n) => Some(Crs::Vert(n)),
            Node::EngrCrs(n) => Some(Crs::Engr(n)),
            Node::TimeCrs(n) => Some(Crs::Time(n)),
            Node::ParamCrs(n) => Some(Crs::Param(n)),
            Node::ImageCrs(n) => Some(Crs::Image(n)),
            Node::CompoundCrs(n) => Some(Crs::Compound(n)),
            Node::BoundCrs(n) => Some(Crs::Bound(n)),
            _ => None,
        }
    }

    /// Identifying-subset equality: presentation metadata (scope, extents,
    /// ids, remark) is ignored, matching `ogc_object::is_equal` (spec §4.6).
    pub fn is_equal(a: Option<&Node>, b: Option<&Node>) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(_), None) | (None, Some(_)) => false,
            (Some(x), Some(y)) => match (x, y) {
                (Node::GeodCrs(p), Node::GeodCrs(q)) => GeodCrs::is_equal_ignoring_tail(p, q),
                (Node::ProjCrs(p), Node::ProjCrs(q)) => {
                    p.header.name == q.header.name
                        && GeodCrs::is_equal_ignoring_tail(&p.base, &q.base)
                        && p.conversion.0.name == q.conversion.0.name
                        && (p.cs.category, p.cs.dimension) == (q.cs.category, q.cs.dimension)
                        && p.axes.len() == q.axes.len()
                }
                (Node::Ellipsoid(p), Node::Ellipsoid(q)) => Ellipsoid::is_equal(p, q),
                (Node::Id(p), Node::Id(q)) => Id::is_equal(p, q),
                _ => x == y,
            },
        }
    }

    /// Full structural equality including presentation metadata
    /// (spec §4.6).
    pub fn is_identical(a: Option<&Node>, b: Option<&Node>) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(_), None) | (None, Some(_)) => false,
            (Some(x), Some(y)) => x == y,
        }
    }
}

impl GeodDatum {
    fn is_equal_ignoring_tail(a: &GeodDatum, b: &GeodDatum) -> bool {
        a.name == b.name
            && match (&a.ellipsoid, &b.ellipsoid) {
                (Some(x), Some(y)) => Ellipsoid::is_equal(x, y),
                (None, None) => true,
                _ => false,
            }
    }
}

impl GeodCrs {
    fn is_equal_ignoring_tail(a: &GeodCrs, b: &GeodCrs) -> bool {
        a.header.name == b.header.name
            && GeodDatum::is_equal_ignoring_tail(&a.datum, &b.datum)
            && a.cs.as_ref().map(|c| (c.category, c.dimension)) == b.cs.as_ref().map(|c| (c.category, c.dimension))
            && a.axes.len() == b.axes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_wkt_geodcrs() {
        let wkt = r#"GEODCRS["WGS 84",
            DATUM["World Geodetic System 1984",
                ELLIPSOID["WGS 84",6378137,298.257223563]],
            CS[ellipsoidal,2],
            AXIS["geodetic latitude (Lat)",north],
            AXIS["geodetic longitude (Lon)",east],
            ANGLEUNIT["degree",0.0174532925199433]]"#;
        let node = Node::from_wkt(wkt).unwrap();
        assert!(matches!(node, Node::GeodCrs(_)));
        let crs = node.as_crs().unwrap();
        let back = crs.to_wkt(EmitOptions::default());
        assert!(back.starts_with("GEODCRS["));
    }

    #[test]
    fn is_equal_ignores_ids() {
        let a = Node::from_wkt(
            r#"ELLIPSOID["WGS 84",6378137,298.257223563,ID["EPSG",7030]]"#,
        )
        .unwrap();
        let b = Node::from_wkt(r#"ELLIPSOID["WGS 84",6378137,298.257223563]"#).unwrap();
        assert!(Node::is_equal(Some(&a), Some(&b)));
        assert!(!Node::is_identical(Some(&a), Some(&b)));
    }

    #[test]
    fn unknown_keyword_errors() {
        assert!(Node::from_wkt(r#"NOTAKEYWORD["x"]"#).is_err());
    }
}
