//!
//! Unit-of-measure clauses (spec §3.2, "unit-clause nodes").
//!
//! Grounded in `proj4wkt::builder::Builder::unit` / `model::Unit` (which
//! recognized `UNIT`/`ANGUNIT`/`LENGTHUNIT` by string match into one
//! `UnitType` tag), generalized here into one shape per WKT keyword family
//! plus the untyped generic `UNIT`, which a parent node reinterprets
//! according to its own family (spec §5.2).
//!
use crate::common::Id;
use crate::construct;
use crate::emit::EmitOptions;
use crate::errors::{Error, Result};
use crate::registry::KindTag;
use crate::strutil::unescape;
use crate::token::TokenStream;

/// The unit-family classification used by the validator to check a unit
/// against the CRS kind it's attached to (spec §5.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Angle,
    Length,
    Scale,
    Time,
    Parametric,
}

impl UnitKind {
    pub fn label(self) -> &'static str {
        match self {
            UnitKind::Angle => "angle",
            UnitKind::Length => "length",
            UnitKind::Scale => "scale",
            UnitKind::Time => "time",
            UnitKind::Parametric => "parametric",
        }
    }
}

macro_rules! unit_struct {
    ($name:ident, $tag:ident, $kwd:expr, $kind:expr) => {
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            pub name: String,
            pub conversion_factor: Option<f64>,
            pub id: Option<Id>,
        }

        impl $name {
            pub const UNIT_KIND: UnitKind = $kind;

            pub fn accepts(tag: KindTag) -> bool {
                matches!(tag, KindTag::$tag | KindTag::Unit)
            }

            pub fn from_tokens(stream: &TokenStream, start: usize) -> Result<(Self, usize)> {
                let (end, same) = construct::span(stream, start);
                construct::enforce_leading($kwd, same, 1, 2)?;
                let name = unescape(&stream.tokens[start + 1].text);
                let conversion_factor = if same >= 2 {
                    Some(construct::parse_f64($kwd, &stream.tokens[start + 2].text)?)
                } else {
                    None
                };
                let mut id = None;
                let mut i = start + 1 + same;
                while i < end {
                    match crate::registry::lookup(&stream.tokens[i].text) {
                        Some(KindTag::Id) if id.is_none() => {
                            let (parsed, next) = Id::from_tokens(stream, i)?;
                            id = Some(parsed);
                            i = next;
                        }
                        Some(KindTag::Id) => {
                            return Err(Error::DuplicateChild {
                                parent: $kwd,
                                child: "ID",
                            })
                        }
                        _ => i = construct::skip_subtree(stream, i),
                    }
                }
                Ok((
                    $name {
                        name,
                        conversion_factor,
                        id,
                    },
                    end,
                ))
            }

            pub fn to_wkt(&self, opts: EmitOptions) -> String {
                let mut s = format!("{}[\"{}\"", $kwd, crate::strutil::escape(&self.name));
                if let Some(f) = self.conversion_factor {
                    s.push_str(&format!(",{f}"));
                }
                if let Some(id) = &self.id {
                    s.push(',');
                    s.push_str(&id.to_wkt(opts));
                }
                s.push(']');
                s
            }

            pub fn is_equal(a: &Self, b: &Self) -> bool {
                a.name == b.name && a.conversion_factor == b.conversion_factor
            }

            pub fn is_identical(a: &Self, b: &Self) -> bool {
                Self::is_equal(a, b) && Id::opt_is_identical(a.id.as_ref(), b.id.as_ref())
            }
        }
    };
}

unit_struct!(AngleUnit, AngleUnit, "ANGLEUNIT", UnitKind::Angle);
unit_struct!(LengthUnit, LengthUnit, "LENGTHUNIT", UnitKind::Length);
unit_struct!(ScaleUnit, ScaleUnit, "SCALEUNIT", UnitKind::Scale);
unit_struct!(TimeUnit, TimeUnit, "TIMEUNIT", UnitKind::Time);
unit_struct!(ParametricUnit, ParametricUnit, "PARAMETRICUNIT", UnitKind::Parametric);

impl Id {
    fn opt_is_identical(a: Option<&Id>, b: Option<&Id>) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(x), Some(y)) => Id::is_identical(x, y),
            _ => false,
        }
    }
}

/// A generic, untyped `UNIT[...]` clause, for grammar positions where the
/// family isn't fixed by the keyword alone (e.g. a `PARAMETER`'s unit,
/// whose family follows the parameter's own declared kind).
#[derive(Debug, Clone, PartialEq)]
pub enum AnyUnit {
    Angle(AngleUnit),
    Length(LengthUnit),
    Scale(ScaleUnit),
    Time(TimeUnit),
    Parametric(ParametricUnit),
}

impl AnyUnit {
    pub fn kind(&self) -> UnitKind {
        match self {
            AnyUnit::Angle(_) => UnitKind::Angle,
            AnyUnit::Length(_) => UnitKind::Length,
            AnyUnit::Scale(_) => UnitKind::Scale,
            AnyUnit::Time(_) => UnitKind::Time,
            AnyUnit::Parametric(_) => UnitKind::Parametric,
        }
    }

    /// Parse a unit clause, interpreting a bare generic `UNIT` keyword as
    /// belonging to `default_kind` (spec §5.2).
    pub fn from_tokens(stream: &TokenStream, start: usize, default_kind: UnitKind) -> Result<(Self, usize)> {
        let tag = crate::registry::lookup(&stream.tokens[start].text);
        let kind = match tag {
            Some(KindTag::AngleUnit) => UnitKind::Angle,
            Some(KindTag::LengthUnit) => UnitKind::Length,
            Some(KindTag::ScaleUnit) => UnitKind::Scale,
            Some(KindTag::TimeUnit) => UnitKind::Time,
            Some(KindTag::ParametricUnit) => UnitKind::Parametric,
            Some(KindTag::Unit) => default_kind,
            _ => return Err(Error::WktInvalidKeyword("UNIT", stream.tokens[start].text.clone())),
        };
        Ok(match kind {
            UnitKind::Angle => {
                let (u, end) = AngleUnit::from_tokens(stream, start)?;
                (AnyUnit::Angle(u), end)
            }
            UnitKind::Length => {
                let (u, end) = LengthUnit::from_tokens(stream, start)?;
                (AnyUnit::Length(u), end)
            }
            UnitKind::Scale => {
                let (u, end) = ScaleUnit::from_tokens(stream, start)?;
                (AnyUnit::Scale(u), end)
            }
            UnitKind::Time => {
                let (u, end) = TimeUnit::from_tokens(stream, start)?;
                (AnyUnit::Time(u), end)
            }
            UnitKind::Parametric => {
                let (u, end) = ParametricUnit::from_tokens(stream, start)?;
                (AnyUnit::Parametric(u), end)
            }
        })
    }

    pub fn to_wkt(&self, opts: EmitOptions) -> String {
        match self {
            AnyUnit::Angle(u) => u.to_wkt(opts),
            AnyUnit::Length(u) => u.to_wkt(opts),
            AnyUnit::Scale(u) => u.to_wkt(opts),
            AnyUnit::Time(u) => u.to_wkt(opts),
            AnyUnit::Parametric(u) => u.to_wkt(opts),
        }
    }

    pub fn is_identical(a: &AnyUnit, b: &AnyUnit) -> bool {
        match (a, b) {
            (AnyUnit::Angle(x), AnyUnit::Angle(y)) => AngleUnit::is_identical(x, y),
            (AnyUnit::Length(x), AnyUnit::Length(y)) => LengthUnit::is_identical(x, y),
            (AnyUnit::Scale(x), AnyUnit::Scale(y)) => ScaleUnit::is_identical(x, y),
            (AnyUnit::Time(x), AnyUnit::Time(y)) => TimeUnit::is_identical(x, y),
            (AnyUnit::Parametric(x), AnyUnit::Parametric(y)) => ParametricUnit::is_identical(x, y),
            _ => false,
        }
    }
}

/// True if `tag` is any unit-clause keyword, regardless of family --
/// used where a caller needs to recognize "this child is a unit" before
/// it knows (or cares) which family, e.g. to detect a duplicate CRS-level
/// `UNIT` clause.
pub fn is_unit_tag(tag: KindTag) -> bool {
    matches!(
        tag,
        KindTag::AngleUnit | KindTag::LengthUnit | KindTag::ScaleUnit | KindTag::TimeUnit | KindTag::ParametricUnit | KindTag::Unit
    )
}

/// True if `kwd` could introduce a unit of `kind`, either by its own
/// family-specific keyword or the generic `UNIT`.
pub fn matches_kind(kwd: &str, kind: UnitKind) -> bool {
    match crate::registry::lookup(kwd) {
        Some(KindTag::Unit) => true,
        Some(KindTag::AngleUnit) => kind == UnitKind::Angle,
        Some(KindTag::LengthUnit) => kind == UnitKind::Length,
        Some(KindTag::ScaleUnit) => kind == UnitKind::Scale,
        Some(KindTag::TimeUnit) => kind == UnitKind::Time,
        Some(KindTag::ParametricUnit) => kind == UnitKind::Parametric,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_unit_with_factor_and_id() {
        let ts = TokenStream::tokenize(r#"LENGTHUNIT["metre",1,ID["EPSG",9001]]"#, "LENGTHUNIT").unwrap();
        let (u, end) = LengthUnit::from_tokens(&ts, 0).unwrap();
        assert_eq!(u.name, "metre");
        assert_eq!(u.conversion_factor, Some(1.0));
        assert!(u.id.is_some());
        assert_eq!(end, ts.len());
    }

    #[test]
    fn generic_unit_resolves_to_default_kind() {
        let ts = TokenStream::tokenize(r#"UNIT["degree",0.0174532925199433]"#, "UNIT").unwrap();
        let (u, _) = AnyUnit::from_tokens(&ts, 0, UnitKind::Angle).unwrap();
        assert_eq!(u.kind(), UnitKind::Angle);
    }

    #[test]
    fn matches_kind_generic_and_specific() {
        assert!(matches_kind("UNIT", UnitKind::Length));
        assert!(matches_kind("LENGTHUNIT", UnitKind::Length));
        assert!(!matches_kind("LENGTHUNIT", UnitKind::Angle));
        assert!(matches_kind("ANGUNIT", UnitKind::Angle));
    }
}
