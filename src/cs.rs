//!
//! Coordinate system and axis nodes (spec §3.2, "CS/axis nodes").
//!
//! Grounded in `proj4wkt::model::{Horizontalcrs, Verticalcrs}` axis
//! handling, generalized to the full `CS[<category>,<dimension>]` grammar
//! and the axis-direction-vs-category validation spec §5.3 requires, which
//! the teacher (a PROJ-string-output-only parser) never needed.
//!
use crate::common::Id;
use crate::construct;
use crate::emit::EmitOptions;
use crate::errors::{Error, Result};
use crate::registry::KindTag;
use crate::strutil::unescape;
use crate::token::TokenStream;
use crate::units::{AnyUnit, UnitKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsCategory {
    Affine,
    Cartesian,
    Cylindrical,
    Ellipsoidal,
    Linear,
    Parametric,
    Polar,
    Spherical,
    Vertical,
    Temporal,
    TemporalCount,
    TemporalMeasure,
    TemporalDateTime,
    Ordinal,
}

impl CsCategory {
    pub fn from_keyword(s: &str) -> Option<Self> {
        Some(match s.to_ascii_lowercase().as_str() {
            "affine" => CsCategory::Affine,
            "cartesian" => CsCategory::Cartesian,
            "cylindrical" => CsCategory::Cylindrical,
            "ellipsoidal" => CsCategory::Ellipsoidal,
            "linear" => CsCategory::Linear,
            "parametric" => CsCategory::Parametric,
            "polar" => CsCategory::Polar,
            "spherical" => CsCategory::Spherical,
            "vertical" => CsCategory::Vertical,
            "temporal" => CsCategory::Temporal,
            "temporalcount" => CsCategory::TemporalCount,
            "temporalmeasure" => CsCategory::TemporalMeasure,
            "temporaldatetime" => CsCategory::TemporalDateTime,
            "ordinal" => CsCategory::Ordinal,
            _ => return None,
        })
    }

    pub fn keyword(self) -> &'static str {
        match self {
            CsCategory::Affine => "affine",
            CsCategory::Cartesian => "Cartesian",
            CsCategory::Cylindrical => "cylindrical",
            CsCategory::Ellipsoidal => "ellipsoidal",
            CsCategory::Linear => "linear",
            CsCategory::Parametric => "parametric",
            CsCategory::Polar => "polar",
            CsCategory::Spherical => "spherical",
            CsCategory::Vertical => "vertical",
            CsCategory::Temporal => "temporal",
            CsCategory::TemporalCount => "TemporalCount",
            CsCategory::TemporalMeasure => "TemporalMeasure",
            CsCategory::TemporalDateTime => "TemporalDateTime",
            CsCategory::Ordinal => "ordinal",
        }
    }

    /// The unit family a CS of this category is expected to carry (spec
    /// §4.4(c)/§5.2): ellipsoidal/spherical CS use angular units, the
    /// various linear/planar categories use length, parametric and
    /// temporal categories use their own matching unit kind.
    pub fn default_unit_kind(self) -> UnitKind {
        match self {
            CsCategory::Ellipsoidal | CsCategory::Spherical => UnitKind::Angle,
            CsCategory::Cartesian
            | CsCategory::Linear
            | CsCategory::Vertical
            | CsCategory::Cylindrical
            | CsCategory::Polar
            | CsCategory::Affine
            | CsCategory::Ordinal => UnitKind::Length,
            CsCategory::Parametric => UnitKind::Parametric,
            CsCategory::Temporal
            | CsCategory::TemporalCount
            | CsCategory::TemporalMeasure
            | CsCategory::TemporalDateTime => UnitKind::Time,
        }
    }

    /// Axis directions permitted for this category (spec §5.3). Kept
    /// intentionally permissive for categories whose direction vocabulary
    /// the spec leaves open (`affine`, `ordinal`, `parametric`).
    pub fn permits_direction(self, dir: &AxisDirection) -> bool {
        use AxisDirection::*;
        match self {
            CsCategory::Ellipsoidal => matches!(dir, North | South | East | West | Up | Down),
            CsCategory::Cartesian | CsCategory::Linear => {
                matches!(dir, North | South | East | West | Up | Down | GeocentricX | GeocentricY | GeocentricZ)
            }
            CsCategory::Vertical => matches!(dir, Up | Down),
            CsCategory::Spherical => matches!(dir, North | South | East | West | Up | Down),
            CsCategory::Polar => matches!(dir, Towards(_) | AwayFrom(_) | ClockwiseFrom(_) | CounterClockwiseFrom(_)),
            CsCategory::Temporal | CsCategory::TemporalCount | CsCategory::TemporalMeasure | CsCategory::TemporalDateTime => {
                matches!(dir, Future | Past)
            }
            CsCategory::Cylindrical => matches!(dir, Up | Down | Towards(_) | AwayFrom(_)),
            CsCategory::Affine | CsCategory::Ordinal | CsCategory::Parametric => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AxisDirection {
    North,
    South,
    East,
    West,
    Up,
    Down,
    Future,
    Past,
    GeocentricX,
    GeocentricY,
    GeocentricZ,
    Towards(String),
    AwayFrom(String),
    ClockwiseFrom(String),
    CounterClockwiseFrom(String),
    Other(String),
}

impl AxisDirection {
    pub fn parse(s: &str) -> AxisDirection {
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "north" => AxisDirection::North,
            "south" => AxisDirection::South,
            "east" => AxisDirection::East,
            "west" => AxisDirection::West,
            "up" => AxisDirection::Up,
            "down" => AxisDirection::Down,
            "future" => AxisDirection::Future,
            "past" => AxisDirection::Past,
            "geocentricx" => AxisDirection::GeocentricX,
            "geocentricy" => AxisDirection::GeocentricY,
            "geocentricz" => AxisDirection::GeocentricZ,
            _ => {
                if let Some(rest) = lower.strip_prefix("towards ") {
                    AxisDirection::Towards(rest.to_string())
                } else if let Some(rest) = lower.strip_prefix("awayfrom ") {
                    AxisDirection::AwayFrom(rest.to_string())
                } else if let Some(rest) = lower.strip_prefix("clockwise from ") {
                    AxisDirection::ClockwiseFrom(rest.to_string())
                } else if let Some(rest) = lower.strip_prefix("counterclockwise from ") {
                    AxisDirection::CounterClockwiseFrom(rest.to_string())
                } else {
                    AxisDirection::Other(s.to_string())
                }
            }
        }
    }

    pub fn to_wkt(&self) -> String {
        match self {
            AxisDirection::North => "north".into(),
            AxisDirection::South => "south".into(),
            AxisDirection::East => "east".into(),
            AxisDirection::West => "west".into(),
            AxisDirection::Up => "up".into(),
            AxisDirection::Down => "down".into(),
            AxisDirection::Future => "future".into(),
            AxisDirection::Past => "past".into(),
            AxisDirection::GeocentricX => "geocentricX".into(),
            AxisDirection::GeocentricY => "geocentricY".into(),
            AxisDirection::GeocentricZ => "geocentricZ".into(),
            AxisDirection::Towards(m) => format!("towards {m}"),
            AxisDirection::AwayFrom(m) => format!("awayFrom {m}"),
            AxisDirection::ClockwiseFrom(m) => format!("clockwise from {m}"),
            AxisDirection::CounterClockwiseFrom(m) => format!("counterclockwise from {m}"),
            AxisDirection::Other(s) => s.clone(),
        }
    }
}

/// `CS[<category>,<dimension>]` -- declares the axis count and geometric
/// family the following `AXIS` nodes must agree with (spec §5.1).
#[derive(Debug, Clone, PartialEq)]
pub struct Cs {
    pub category: CsCategory,
    pub dimension: u32,
    pub id: Option<Id>,
}

impl Cs {
    pub fn from_tokens(stream: &TokenStream, start: usize) -> Result<(Cs, usize)> {
        construct::check_keyword("CS", stream, start, &["CS"])?;
        let (end, same) = construct::span(stream, start);
        construct::enforce_leading("CS", same, 2, 2)?;
        let category = CsCategory::from_keyword(&stream.tokens[start + 1].text)
            .ok_or_else(|| Error::WktInvalidKeyword("CS", stream.tokens[start + 1].text.clone()))?;
        let dimension = construct::parse_u32("CS", &stream.tokens[start + 2].text)?;

        let mut id = None;
        let mut i = start + 3;
        while i < end {
            match crate::registry::lookup(&stream.tokens[i].text) {
                Some(KindTag::Id) if id.is_none() => {
                    let (parsed, next) = Id::from_tokens(stream, i)?;
                    id = Some(parsed);
                    i = next;
                }
                _ => i = construct::skip_subtree(stream, i),
            }
        }
        Ok((
            Cs {
                category,
                dimension,
                id,
            },
            end,
        ))
    }

    pub fn to_wkt(&self, opts: EmitOptions) -> String {
        let mut s = format!("CS[{},{}", self.category.keyword(), self.dimension);
        if let Some(id) = &self.id {
            s.push(',');
            s.push_str(&id.to_wkt(opts));
        }
        s.push(']');
        s
    }

    pub fn is_equal(a: &Cs, b: &Cs) -> bool {
        a.category == b.category && a.dimension == b.dimension
    }
}

/// `AXIS["name (abbrev)",direction,ORDER[n],UNIT[...]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub name: String,
    pub abbrev: Option<String>,
    pub direction: AxisDirection,
    pub meridian: Option<Meridian>,
    pub order: Option<u32>,
    pub unit: Option<AnyUnit>,
    pub id: Option<Id>,
}

impl Axis {
    pub fn from_tokens(stream: &TokenStream, start: usize, default_unit_kind: UnitKind) -> Result<(Axis, usize)> {
        construct::check_keyword("AXIS", stream, start, &["AXIS"])?;
        let (end, same) = construct::span(stream, start);
        construct::enforce_leading("AXIS", same, 2, 2)?;
        let raw_name = unescape(&stream.tokens[start + 1].text);
        let (name, abbrev) = split_axis_name(&raw_name);
        let direction = AxisDirection::parse(&stream.tokens[start + 2].text);

        let mut meridian = None;
        let mut order = None;
        let mut unit = None;
        let mut id = None;
        let mut i = start + 3;
        while i < end {
            let kwd = stream.tokens[i].text.clone();
            match crate::registry::lookup(&kwd) {
                Some(KindTag::Meridian) if meridian.is_none() => {
                    let (m, next) = Meridian::from_tokens(stream, i)?;
                    meridian = Some(m);
                    i = next;
                }
                Some(KindTag::Order) if order.is_none() => {
                    let (next, same) = construct::span(stream, i);
                    construct::enforce_leading("ORDER", same, 1, 1)?;
                    order = Some(construct::parse_u32("ORDER", &stream.tokens[i + 1].text)?);
                    i = next;
                }
                _ if crate::units::matches_kind(&kwd, default_unit_kind) && unit.is_none() => {
                    let (u, next) = AnyUnit::from_tokens(stream, i, default_unit_kind)?;
                    unit = Some(u);
                    i = next;
                }
                Some(KindTag::Id) if id.is_none() => {
                    let (parsed, next) = Id::from_tokens(stream, i)?;
                    id = Some(parsed);
                    i = next;
                }
                _ => i = construct::skip_subtree(stream, i),
            }
        }

        Ok((
            Axis {
                name,
                abbrev,
                direction,
                meridian,
                order,
                unit,
                id,
            },
            end,
        ))
    }

    pub fn to_wkt(&self, opts: EmitOptions) -> String {
        let display_name = match &self.abbrev {
            Some(a) => format!("{} ({})", self.name, a),
            None => self.name.clone(),
        };
        let mut s = format!(
            "AXIS[\"{}\",{}",
            crate::strutil::escape(&display_name),
            self.direction.to_wkt()
        );
        if let Some(m) = &self.meridian {
            s.push(',');
            s.push_str(&m.to_wkt(opts));
        }
        if let Some(o) = self.order {
            s.push_str(&format!(",ORDER[{o}]"));
        }
        if let Some(u) = &self.unit {
            s.push(',');
            s.push_str(&u.to_wkt(opts));
        }
        if let Some(id) = &self.id {
            s.push(',');
            s.push_str(&id.to_wkt(opts));
        }
        s.push(']');
        s
    }

    pub fn is_identical(a: &Axis, b: &Axis) -> bool {
        a.name == b.name
            && a.abbrev == b.abbrev
            && a.direction == b.direction
            && a.order == b.order
            && match (&a.unit, &b.unit) {
                (None, None) => true,
                (Some(x), Some(y)) => AnyUnit::is_identical(x, y),
                _ => false,
            }
    }
}

fn split_axis_name(raw: &str) -> (String, Option<String>) {
    if let Some(open) = raw.rfind('(') {
        if raw.ends_with(')') {
            let name = raw[..open].trim_end().to_string();
            let abbrev = raw[open + 1..raw.len() - 1].to_string();
            return (name, Some(abbrev));
        }
    }
    (raw.to_string(), None)
}

/// `MERIDIAN[<bearing>,ANGLEUNIT[...]]`, attached to a polar-CS axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Meridian {
    pub bearing: f64,
    pub unit: crate::units::AngleUnit,
}

impl Meridian {
    pub fn from_tokens(stream: &TokenStream, start: usize) -> Result<(Meridian, usize)> {
        let (end, same) = construct::span(stream, start);
        construct::enforce_leading("MERIDIAN", same, 1, 1)?;
        let bearing = construct::parse_f64("MERIDIAN", &stream.tokens[start + 1].text)?;
        let mut unit = None;
        let mut i = start + 2;
        while i < end {
            match crate::registry::lookup(&stream.tokens[i].text) {
                Some(KindTag::AngleUnit) | Some(KindTag::Unit) if unit.is_none() => {
                    let (u, next) = crate::units::AngleUnit::from_tokens(stream, i)?;
                    unit = Some(u);
                    i = next;
                }
                _ => i = construct::skip_subtree(stream, i),
            }
        }
        let unit = unit.ok_or(Error::MissingChild {
            parent: "MERIDIAN",
            child: "ANGLEUNIT",
        })?;
        Ok((Meridian { bearing, unit }, end))
    }

    pub fn to_wkt(&self, opts: EmitOptions) -> String {
        format!("MERIDIAN[{},{}]", self.bearing, self.unit.to_wkt(opts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ellipsoidal_cs() {
        let ts = TokenStream::tokenize("CS[ellipsoidal,2]", "CS").unwrap();
        let (cs, end) = Cs::from_tokens(&ts, 0).unwrap();
        assert_eq!(cs.category, CsCategory::Ellipsoidal);
        assert_eq!(cs.dimension, 2);
        assert_eq!(end, ts.len());
    }

    #[test]
    fn axis_with_abbrev_and_unit() {
        let ts = TokenStream::tokenize(
            r#"AXIS["geodetic latitude (Lat)",north,ORDER[1],ANGLEUNIT["degree",0.0174532925199433]]"#,
            "AXIS",
        )
        .unwrap();
        let (axis, _) = Axis::from_tokens(&ts, 0, UnitKind::Angle).unwrap();
        assert_eq!(axis.name, "geodetic latitude");
        assert_eq!(axis.abbrev.as_deref(), Some("Lat"));
        assert_eq!(axis.direction, AxisDirection::North);
        assert_eq!(axis.order, Some(1));
        assert!(axis.unit.is_some());
    }

    #[test]
    fn vertical_permits_only_up_down() {
        assert!(CsCategory::Vertical.permits_direction(&AxisDirection::Up));
        assert!(!CsCategory::Vertical.permits_direction(&AxisDirection::North));
    }
}
