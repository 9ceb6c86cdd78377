//!
//! Coordinate reference system nodes (spec §3.2, "CRS nodes").
//!
//! Grounded in `proj4wkt::model::{Horizontalcrs, Projcs, Verticalcrs,
//! Compoundcrs}`, generalized to the full WKT-2 CRS family (engineering,
//! temporal, parametric, image, bound) the teacher never needed since it
//! only emits PROJ strings for geographic/projected/vertical/compound
//! inputs. "Base CRS" keyword variants (`BASEGEODCRS`, `BASEPROJCRS`, ...)
//! reuse the *same* struct as their non-base sibling and are distinguished
//! only by `visible: false`, mirroring the teacher's own precedent of
//! merging alternate spellings into one `Key`/`Node` variant in
//! `builder::Key`.
//!
use crate::common::CommonTail;
use crate::construct::{self, ChildOutcome};
use crate::conversion::Conversion;
use crate::cs::{Axis, Cs};
use crate::datum::{EngrDatum, GeodDatum, ImageDatum, ParamDatum, PrimeMeridian, TimeDatum, VertDatum};
use crate::emit::{self, EmitOptions};
use crate::errors::{Error, Result};
use crate::registry::KindTag;
use crate::strutil::escape;
use crate::token::TokenStream;
use crate::units::{AnyUnit, UnitKind};

/// Every container node shares this header: its kind, its declared name,
/// and whether it was written as a top-level keyword or a `BASE...`
/// variant (spec §3.2's "common header").
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub kind_tag: KindTag,
    pub name: String,
    pub visible: bool,
}

fn is_base_keyword(kwd: &str) -> bool {
    kwd.to_ascii_uppercase().starts_with("BASE")
}

/// `GEODCRS["name",DATUM[...],CS[...],AXIS[...],...]`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeodCrs {
    pub header: Header,
    pub datum: GeodDatum,
    pub cs: Option<Cs>,
    pub axes: Vec<Axis>,
    pub unit: Option<AnyUnit>,
    pub tail: CommonTail,
}

impl GeodCrs {
    pub fn from_tokens(stream: &TokenStream, start: usize) -> Result<(GeodCrs, usize)> {
        let kwd = stream.tokens[start].text.clone();
        construct::check_keyword(
            "GEODCRS",
            stream,
            start,
            &[
                "GEOGCS", "GEOGCRS", "GEOGRAPHICCRS", "GEOCCS", "GEODCRS", "GEODETICCRS",
                "BASEGEODCRS", "BASEGEOGCRS",
            ],
        )?;
        let (end, same) = construct::span(stream, start);
        construct::enforce_leading("GEODCRS", same, 1, 1)?;
        let name = crate::common::validate_name("GEODCRS", &stream.tokens[start + 1].text)?;

        let mut datum: Option<GeodDatum> = None;
        let mut cs = None;
        let mut axes = Vec::new();
        let mut unit: Option<AnyUnit> = None;
        let mut tail = CommonTail::default();
        let mut i = start + 2;
        while i < end {
            if let ChildOutcome::Consumed(next) = tail.try_consume("GEODCRS", stream, i)? {
                i = next;
                continue;
            }
            let tag = crate::registry::lookup(&stream.tokens[i].text);
            match tag {
                Some(KindTag::GeodDatum) if datum.is_none() => {
                    let (d, next) = GeodDatum::from_tokens(stream, i)?;
                    datum = Some(d);
                    i = next;
                }
                // PRIMEM is written as a sibling of DATUM[...] inside the
                // enclosing CRS but belongs conceptually to the geodetic
                // datum (ISO 19162's <geodetic datum> production), so it
                // folds into the already-built GeodDatum here.
                Some(KindTag::PrimeMeridian) if datum.as_ref().map_or(false, |d| d.prime_meridian.is_none()) => {
                    let (p, next) = PrimeMeridian::from_tokens(stream, i)?;
                    if let Some(d) = datum.as_mut() {
                        d.prime_meridian = Some(p);
                    }
                    i = next;
                }
                Some(KindTag::Cs) if cs.is_none() => {
                    let (c, next) = Cs::from_tokens(stream, i)?;
                    cs = Some(c);
                    i = next;
                }
                Some(KindTag::Axis) => {
                    let unit_kind = cs
                        .as_ref()
                        .map(|c| c.category.default_unit_kind())
                        .unwrap_or(UnitKind::Angle);
                    let (a, next) = Axis::from_tokens(stream, i, unit_kind)?;
                    axes.push(a);
                    i = next;
                }
                Some(t) if crate::units::is_unit_tag(t) => {
                    if unit.is_some() {
                        return Err(Error::DuplicateChild {
                            parent: "GEODCRS",
                            child: "UNIT",
                        });
                    }
                    let unit_kind = cs
                        .as_ref()
                        .map(|c| c.category.default_unit_kind())
                        .unwrap_or(UnitKind::Angle);
                    let (u, next) = AnyUnit::from_tokens(stream, i, unit_kind)?;
                    unit = Some(u);
                    i = next;
                }
                _ => i = construct::skip_subtree(stream, i),
            }
        }
        let datum = datum.ok_or(Error::MissingChild {
            parent: "GEODCRS",
            child: "DATUM",
        })?;
        crate::validate::validate_cs("GEODCRS", cs.as_ref(), &axes, unit.as_ref())?;
        Ok((
            GeodCrs {
                header: Header {
                    kind_tag: KindTag::GeodCrs,
                    name,
                    visible: !is_base_keyword(&kwd),
                },
                datum,
                cs,
                axes,
                unit,
                tail,
            },
            end,
        ))
    }

    pub fn to_wkt(&self, opts: EmitOptions) -> String {
        let kwd = if self.header.visible { "GEODCRS" } else { "BASEGEODCRS" };
        let mut children = vec![self.datum.to_wkt(opts)];
        if let Some(cs) = &self.cs {
            children.push(cs.to_wkt(opts));
        }
        for a in &self.axes {
            children.push(a.to_wkt(opts));
        }
        if let Some(u) = &self.unit {
            children.push(u.to_wkt(opts));
        }
        self.tail.emit(&mut children, opts, self.header.visible);
        emit::assemble(kwd, &[format!("\"{}\"", escape(&self.header.name))], &children, opts)
    }
}

/// `PROJCRS["name",BASEGEODCRS[...],CONVERSION[...],CS[...],AXIS[...],...]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjCrs {
    pub header: Header,
    pub base: Box<GeodCrs>,
    pub conversion: Conversion,
    pub cs: Cs,
    pub axes: Vec<Axis>,
    pub unit: Option<AnyUnit>,
    pub tail: CommonTail,
}

impl ProjCrs {
    pub fn from_tokens(stream: &TokenStream, start: usize) -> Result<(ProjCrs, usize)> {
        let kwd = stream.tokens[start].text.clone();
        construct::check_keyword(
            "PROJCRS",
            stream,
            start,
            &["PROJCS", "PROJCRS", "PROJECTEDCRS", "BASEPROJCRS"],
        )?;
        let (end, same) = construct::span(stream, start);
        construct::enforce_leading("PROJCRS", same, 1, 1)?;
        let name = crate::common::validate_name("PROJCRS", &stream.tokens[start + 1].text)?;

        let mut base = None;
        let mut conversion = None;
        let mut cs = None;
        let mut axes = Vec::new();
        let mut unit: Option<AnyUnit> = None;
        let mut tail = CommonTail::default();
        let mut i = start + 2;
        while i < end {
            if let ChildOutcome::Consumed(next) = tail.try_consume("PROJCRS", stream, i)? {
                i = next;
                continue;
            }
            let tag = crate::registry::lookup(&stream.tokens[i].text);
            match tag {
                Some(KindTag::GeodCrs) if base.is_none() => {
                    let (b, next) = GeodCrs::from_tokens(stream, i)?;
                    base = Some(b);
                    i = next;
                }
                Some(KindTag::Conversion) if conversion.is_none() => {
                    let (c, next) = Conversion::from_tokens(stream, i)?;
                    conversion = Some(c);
                    i = next;
                }
                Some(KindTag::Cs) if cs.is_none() => {
                    let (c, next) = Cs::from_tokens(stream, i)?;
                    cs = Some(c);
                    i = next;
                }
                Some(KindTag::Axis) => {
                    let unit_kind = cs
                        .as_ref()
                        .map(|c| c.category.default_unit_kind())
                        .unwrap_or(UnitKind::Length);
                    let (a, next) = Axis::from_tokens(stream, i, unit_kind)?;
                    axes.push(a);
                    i = next;
                }
                Some(t) if crate::units::is_unit_tag(t) => {
                    if unit.is_some() {
                        return Err(Error::DuplicateChild {
                            parent: "PROJCRS",
                            child: "UNIT",
                        });
                    }
                    let unit_kind = cs
                        .as_ref()
                        .map(|c| c.category.default_unit_kind())
                        .unwrap_or(UnitKind::Length);
                    let (u, next) = AnyUnit::from_tokens(stream, i, unit_kind)?;
                    unit = Some(u);
                    i = next;
                }
                _ => i = construct::skip_subtree(stream, i),
            }
        }
        let base = base.ok_or(Error::MissingChild {
            parent: "PROJCRS",
            child: "BASEGEODCRS",
        })?;
        let conversion = conversion.ok_or(Error::MissingChild {
            parent: "PROJCRS",
            child: "CONVERSION",
        })?;
        let cs = cs.ok_or(Error::MissingChild {
            parent: "PROJCRS",
            child: "CS",
        })?;
        crate::validate::validate_cs("PROJCRS", Some(&cs), &axes, unit.as_ref())?;
        Ok((
            ProjCrs {
                header: Header {
                    kind_tag: KindTag::ProjCrs,
                    name,
                    visible: !is_base_keyword(&kwd),
                },
                base: Box::new(base),
                conversion,
                cs,
                axes,
                unit,
                tail,
            },
            end,
        ))
    }

    pub fn to_wkt(&self, opts: EmitOptions) -> String {
        let kwd = if self.header.visible { "PROJCRS" } else { "BASEPROJCRS" };
        let mut children = vec![self.base.to_wkt(opts), self.conversion.to_wkt(opts), self.cs.to_wkt(opts)];
        for a in &self.axes {
            children.push(a.to_wkt(opts));
        }
        if let Some(u) = &self.unit {
            children.push(u.to_wkt(opts));
        }
        self.tail.emit(&mut children, opts, self.header.visible);
        emit::assemble(kwd, &[format!("\"{}\"", escape(&self.header.name))], &children, opts)
    }
}

macro_rules! simple_crs {
    ($name:ident, $datum_ty:ty, $datum_tag:ident, $kwd:expr, $base_kwd:expr, $alts:expr, $unit_kind:expr) => {
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            pub header: Header,
            pub datum: $datum_ty,
            pub cs: Cs,
            pub axes: Vec<Axis>,
            pub unit: Option<AnyUnit>,
            pub tail: CommonTail,
        }

        impl $name {
            pub fn from_tokens(stream: &TokenStream, start: usize) -> Result<(Self, usize)> {
                let kwd = stream.tokens[start].text.clone();
                construct::check_keyword($kwd, stream, start, $alts)?;
                let (end, same) = construct::span(stream, start);
                construct::enforce_leading($kwd, same, 1, 1)?;
                let name = crate::common::validate_name($kwd, &stream.tokens[start + 1].text)?;

                let mut datum = None;
                let mut cs = None;
                let mut axes = Vec::new();
                let mut unit: Option<AnyUnit> = None;
                let mut tail = CommonTail::default();
                let mut i = start + 2;
                while i < end {
                    if let ChildOutcome::Consumed(next) = tail.try_consume($kwd, stream, i)? {
                        i = next;
                        continue;
                    }
                    let tag = crate::registry::lookup(&stream.tokens[i].text);
                    match tag {
                        Some(KindTag::$datum_tag) if datum.is_none() => {
                            let (d, next) = <$datum_ty>::from_tokens(stream, i)?;
                            datum = Some(d);
                            i = next;
                        }
                        Some(KindTag::Cs) if cs.is_none() => {
                            let (c, next) = Cs::from_tokens(stream, i)?;
                            cs = Some(c);
                            i = next;
                        }
                        Some(KindTag::Axis) => {
                            let (a, next) = Axis::from_tokens(stream, i, $unit_kind)?;
                            axes.push(a);
                            i = next;
                        }
                        Some(t) if crate::units::is_unit_tag(t) => {
                            if unit.is_some() {
                                return Err(Error::DuplicateChild {
                                    parent: $kwd,
                                    child: "UNIT",
                                });
                            }
                            let (u, next) = AnyUnit::from_tokens(stream, i, $unit_kind)?;
                            unit = Some(u);
                            i = next;
                        }
                        _ => i = construct::skip_subtree(stream, i),
                    }
                }
                let datum = datum.ok_or(Error::MissingChild {
                    parent: $kwd,
                    child: stringify!($datum_tag),
                })?;
                let cs = cs.ok_or(Error::MissingChild {
                    parent: $kwd,
                    child: "CS",
                })?;
                crate::validate::validate_cs($kwd, Some(&cs), &axes, unit.as_ref())?;
                Ok((
                    $name {
                        header: Header {
                            kind_tag: KindTag::$datum_tag,
                            name,
                            visible: !is_base_keyword(&kwd),
                        },
                        datum,
                        cs,
                        axes,
                        unit,
                        tail,
                    },
                    end,
                ))
            }

            pub fn to_wkt(&self, opts: EmitOptions) -> String {
                let kwd = if self.header.visible { $kwd } else { $base_kwd };
                let mut children = vec![self.datum.to_wkt(opts), self.cs.to_wkt(opts)];
                for a in &self.axes {
                    children.push(a.to_wkt(opts));
                }
                if let Some(u) = &self.unit {
                    children.push(u.to_wkt(opts));
                }
                self.tail.emit(&mut children, opts, self.header.visible);
                emit::assemble(kwd, &[format!("\"{}\"", escape(&self.header.name))], &children, opts)
            }
        }
    };
}

simple_crs!(
    VertCrs,
    VertDatum,
    VertDatum,
    "VERTCRS",
    "BASEVERTCRS",
    &["VERT_CS", "VERTCRS", "VERTICALCRS", "BASEVERTCRS"],
    UnitKind::Length
);
simple_crs!(
    EngrCrs,
    EngrDatum,
    EngrDatum,
    "ENGCRS",
    "BASEENGCRS",
    &["LOCAL_CS", "ENGCRS", "ENGINEERINGCRS", "BASEENGCRS", "BASEENGINEERINGCRS"],
    UnitKind::Length
);
simple_crs!(
    ParamCrs,
    ParamDatum,
    ParamDatum,
    "PARAMETRICCRS",
    "BASEPARAMCRS",
    &["PARAMETRICCRS", "BASEPARAMCRS", "BASEPARAMETRICCRS"],
    UnitKind::Parametric
);
simple_crs!(
    ImageCrs,
    ImageDatum,
    ImageDatum,
    "IMAGECRS",
    "BASEIMAGECRS",
    &["IMAGECRS", "BASEIMAGECRS"],
    UnitKind::Length
);

/// `TIMECRS["name",TDATUM[...],CS[...],AXIS[...]]`.
///
/// Grounded directly in `original_source/src/ogc_temporal_crs.cpp`'s
/// `from_tokens`/`to_wkt` shape (datum, cs, axis, then the common tail).
#[derive(Debug, Clone, PartialEq)]
pub struct TimeCrs {
    pub header: Header,
    pub datum: TimeDatum,
    pub cs: Cs,
    pub axes: Vec<Axis>,
    pub unit: Option<AnyUnit>,
    pub tail: CommonTail,
}

impl TimeCrs {
    pub fn from_tokens(stream: &TokenStream, start: usize) -> Result<(TimeCrs, usize)> {
        let kwd = stream.tokens[start].text.clone();
        construct::check_keyword("TIMECRS", stream, start, &["TIMECRS", "BASETIMECRS"])?;
        let (end, same) = construct::span(stream, start);
        construct::enforce_leading("TIMECRS", same, 1, 1)?;
        let name = crate::common::validate_name("TIMECRS", &stream.tokens[start + 1].text)?;

        let mut datum = None;
        let mut cs = None;
        let mut axes = Vec::new();
        let mut unit: Option<AnyUnit> = None;
        let mut tail = CommonTail::default();
        let mut i = start + 2;
        while i < end {
            if let ChildOutcome::Consumed(next) = tail.try_consume("TIMECRS", stream, i)? {
                i = next;
                continue;
            }
            let tag = crate::registry::lookup(&stream.tokens[i].text);
            match tag {
                Some(KindTag::TimeDatum) if datum.is_none() => {
                    let (d, next) = TimeDatum::from_tokens(stream, i)?;
                    datum = Some(d);
                    i = next;
                }
                Some(KindTag::Cs) if cs.is_none() => {
                    let (c, next) = Cs::from_tokens(stream, i)?;
                    cs = Some(c);
                    i = next;
                }
                Some(KindTag::Axis) => {
                    let (a, next) = Axis::from_tokens(stream, i, UnitKind::Time)?;
                    axes.push(a);
                    i = next;
                }
                Some(t) if crate::units::is_unit_tag(t) => {
                    if unit.is_some() {
                        return Err(Error::DuplicateChild {
                            parent: "TIMECRS",
                            child: "UNIT",
                        });
                    }
                    let (u, next) = AnyUnit::from_tokens(stream, i, UnitKind::Time)?;
                    unit = Some(u);
                    i = next;
                }
                _ => i = construct::skip_subtree(stream, i),
            }
        }
        let datum = datum.ok_or(Error::MissingChild {
            parent: "TIMECRS",
            child: "TDATUM",
        })?;
        let cs = cs.ok_or(Error::MissingChild {
            parent: "TIMECRS",
            child: "CS",
        })?;
        crate::validate::validate_cs("TIMECRS", Some(&cs), &axes, unit.as_ref())?;
        Ok((
            TimeCrs {
                header: Header {
                    kind_tag: KindTag::TimeCrs,
                    name,
                    visible: !is_base_keyword(&kwd),
                },
                datum,
                cs,
                axes,
                unit,
                tail,
            },
            end,
        ))
    }

    pub fn to_wkt(&self, opts: EmitOptions) -> String {
        let kwd = if self.header.visible { "TIMECRS" } else { "BASETIMECRS" };
        let mut children = vec![self.datum.to_wkt(opts), self.cs.to_wkt(opts)];
        for a in &self.axes {
            children.push(a.to_wkt(opts));
        }
        if let Some(u) = &self.unit {
            children.push(u.to_wkt(opts));
        }
        self.tail.emit(&mut children, opts, self.header.visible);
        emit::assemble(kwd, &[format!("\"{}\"", escape(&self.header.name))], &children, opts)
    }
}

/// `COMPD_CS["name",<horizontal CRS>,<vertical CRS>]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundCrs {
    pub name: String,
    pub components: Vec<Crs>,
    pub tail: CommonTail,
}

impl CompoundCrs {
    pub fn from_tokens(stream: &TokenStream, start: usize) -> Result<(CompoundCrs, usize)> {
        construct::check_keyword("COMPOUNDCRS", stream, start, &["COMPD_CS", "COMPOUNDCRS"])?;
        let (end, same) = construct::span(stream, start);
        construct::enforce_leading("COMPOUNDCRS", same, 1, 1)?;
        let name = crate::common::validate_name("COMPOUNDCRS", &stream.tokens[start + 1].text)?;

        let mut components = Vec::new();
        let mut tail = CommonTail::default();
        let mut i = start + 2;
        while i < end {
            if let ChildOutcome::Consumed(next) = tail.try_consume("COMPOUNDCRS", stream, i)? {
                i = next;
                continue;
            }
            if Crs::is_crs_keyword(&stream.tokens[i].text) {
                let (c, next) = Crs::from_tokens(stream, i)?;
                components.push(c);
                i = next;
            } else {
                i = construct::skip_subtree(stream, i);
            }
        }
        if components.len() < 2 {
            return Err(Error::MissingChild {
                parent: "COMPOUNDCRS",
                child: "component CRS",
            });
        }
        Ok((
            CompoundCrs {
                name,
                components,
                tail,
            },
            end,
        ))
    }

    pub fn to_wkt(&self, opts: EmitOptions) -> String {
        let mut children: Vec<String> = self.components.iter().map(|c| c.to_wkt(opts)).collect();
        self.tail.emit(&mut children, opts, false);
        emit::assemble(
            "COMPOUNDCRS",
            &[format!("\"{}\"", escape(&self.name))],
            &children,
            opts,
        )
    }
}

/// `BOUNDCRS[SOURCECRS[...],TARGETCRS[...],ABRIDGEDTRANSFORMATION[...]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundCrs {
    pub source: Box<Crs>,
    pub target: Box<Crs>,
    pub transformation: crate::conversion::AbrTrans,
}

impl BoundCrs {
    pub fn from_tokens(stream: &TokenStream, start: usize) -> Result<(BoundCrs, usize)> {
        construct::check_keyword("BOUNDCRS", stream, start, &["BOUNDCRS"])?;
        let (end, _) = construct::span(stream, start);

        let mut source = None;
        let mut target = None;
        let mut transformation = None;
        let mut i = start + 1;
        while i < end {
            if Crs::is_crs_keyword(&stream.tokens[i].text) {
                if source.is_none() {
                    let (c, next) = Crs::from_tokens(stream, i)?;
                    source = Some(c);
                    i = next;
                } else if target.is_none() {
                    let (c, next) = Crs::from_tokens(stream, i)?;
                    target = Some(c);
                    i = next;
                } else {
                    i = construct::skip_subtree(stream, i);
                }
            } else if crate::registry::lookup(&stream.tokens[i].text) == Some(KindTag::AbrTrans)
                && transformation.is_none()
            {
                let (t, next) = crate::conversion::AbrTrans::from_tokens(stream, i)?;
                transformation = Some(t);
                i = next;
            } else {
                i = construct::skip_subtree(stream, i);
            }
        }
        let source = source.ok_or(Error::MissingChild {
            parent: "BOUNDCRS",
            child: "SOURCECRS",
        })?;
        let target = target.ok_or(Error::MissingChild {
            parent: "BOUNDCRS",
            child: "TARGETCRS",
        })?;
        let transformation = transformation.ok_or(Error::MissingChild {
            parent: "BOUNDCRS",
            child: "ABRIDGEDTRANSFORMATION",
        })?;
        Ok((
            BoundCrs {
                source: Box::new(source),
                target: Box::new(target),
                transformation,
            },
            end,
        ))
    }

    pub fn to_wkt(&self, opts: EmitOptions) -> String {
        let children = vec![
            self.source.to_wkt(opts),
            self.target.to_wkt(opts),
            self.transformation.to_wkt(opts),
        ];
        emit::assemble("BOUNDCRS", &[], &children, opts)
    }
}

/// The union of every CRS flavor (spec §3.2). `CompoundCrs`/`BoundCrs` are
/// boxed-by-variant since `Crs` itself nests inside them.
#[derive(Debug, Clone, PartialEq)]
pub enum Crs {
    Geod(GeodCrs),
    Proj(ProjCrs),
    Vert(VertCrs),
    Engr(EngrCrs),
    Time(TimeCrs),
    Param(ParamCrs),
    Image(ImageCrs),
    Compound(CompoundCrs),
    Bound(BoundCrs),
}

impl Crs {
    pub fn is_crs_keyword(kwd: &str) -> bool {
        matches!(
            crate::registry::lookup(kwd),
            Some(
                KindTag::GeodCrs
                    | KindTag::ProjCrs
                    | KindTag::VertCrs
                    | KindTag::EngrCrs
                    | KindTag::TimeCrs
                    | KindTag::ParamCrs
                    | KindTag::ImageCrs
                    | KindTag::CompoundCrs
                    | KindTag::BoundCrs
            )
        )
    }

    pub fn from_tokens(stream: &TokenStream, start: usize) -> Result<(Crs, usize)> {
        let kwd = stream.tokens[start].text.clone();
        match crate::registry::lookup(&kwd) {
            Some(KindTag::GeodCrs) => GeodCrs::from_tokens(stream, start).map(|(n, e)| (Crs::Geod(n), e)),
            Some(KindTag::ProjCrs) => ProjCrs::from_tokens(stream, start).map(|(n, e)| (Crs::Proj(n), e)),
            Some(KindTag::VertCrs) => VertCrs::from_tokens(stream, start).map(|(n, e)| (Crs::Vert(n), e)),
            Some(KindTag::EngrCrs) => EngrCrs::from_tokens(stream, start).map(|(n, e)| (Crs::Engr(n), e)),
            Some(KindTag::TimeCrs) => TimeCrs::from_tokens(stream, start).map(|(n, e)| (Crs::Time(n), e)),
            Some(KindTag::ParamCrs) => ParamCrs::from_tokens(stream, start).map(|(n, e)| (Crs::Param(n), e)),
            Some(KindTag::ImageCrs) => ImageCrs::from_tokens(stream, start).map(|(n, e)| (Crs::Image(n), e)),
            Some(KindTag::CompoundCrs) => {
                CompoundCrs::from_tokens(stream, start).map(|(n, e)| (Crs::Compound(n), e))
            }
            Some(KindTag::BoundCrs) => BoundCrs::from_tokens(stream, start).map(|(n, e)| (Crs::Bound(n), e)),
            _ => Err(Error::WktUnknownKeyword("CRS", kwd)),
        }
    }

    pub fn to_wkt(&self, opts: EmitOptions) -> String {
        match self {
            Crs::Geod(c) => c.to_wkt(opts),
            Crs::Proj(c) => c.to_wkt(opts),
            Crs::Vert(c) => c.to_wkt(opts),
            Crs::Engr(c) => c.to_wkt(opts),
            Crs::Time(c) => c.to_wkt(opts),
            Crs::Param(c) => c.to_wkt(opts),
            Crs::Image(c) => c.to_wkt(opts),
            Crs::Compound(c) => c.to_wkt(opts),
            Crs::Bound(c) => c.to_wkt(opts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geod_crs_wgs84() {
        let ts = TokenStream::tokenize(
            r#"GEODCRS["WGS 84",
                DATUM["World Geodetic System 1984",
                    ELLIPSOID["WGS 84",6378137,298.257223563]],
                CS[ellipsoidal,2],
                AXIS["geodetic latitude (Lat)",north],
                AXIS["geodetic longitude (Lon)",east],
                ANGLEUNIT["degree",0.0174532925199433]]"#,
            "GEODCRS",
        )
        .unwrap();
        let (crs, end) = GeodCrs::from_tokens(&ts, 0).unwrap();
        assert_eq!(crs.header.name, "WGS 84");
        assert_eq!(crs.axes.len(), 2);
        assert_eq!(end, ts.len());
    }

    #[test]
    fn base_geod_crs_is_invisible() {
        let ts = TokenStream::tokenize(
            r#"BASEGEODCRS["WGS 84",DATUM["World Geodetic System 1984",ELLIPSOID["WGS 84",6378137,298.257223563]]]"#,
            "BASEGEODCRS",
        )
        .unwrap();
        let (crs, _) = GeodCrs::from_tokens(&ts, 0).unwrap();
        assert!(!crs.header.visible);
    }

    #[test]
    fn compound_requires_two_components() {
        let ts = TokenStream::tokenize(
            r#"COMPOUNDCRS["x",GEODCRS["g",DATUM["d",ELLIPSOID["e",1,1]]]]"#,
            "COMPOUNDCRS",
        )
        .unwrap();
        assert!(CompoundCrs::from_tokens(&ts, 0).is_err());
    }
}
