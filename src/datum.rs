//!
//! Datum nodes (spec §3.2, "datum nodes").
//!
//! `Ellipsoid`/`PrimeMeridian` are grounded directly in
//! `proj4wkt::builder::Builder::ellipsoid` and the teacher's `TOWGS84`
//! handling (now folded into `crate::conversion::AbrTrans`); the remaining
//! datum kinds (vertical/engineering/parametric/image/temporal) have no
//! teacher counterpart and are built in the same field-collection idiom,
//! generalized from `original_source/src/ogc_temporal_crs.cpp`'s
//! `ogc_time_datum` handling.
//!
use crate::common::{validate_name, Anchor, CommonTail, Id, TimeOrigin};
use crate::construct::{self, ChildOutcome};
use crate::emit::{self, EmitOptions};
use crate::errors::{Error, Result};
use crate::registry::KindTag;
use crate::token::TokenStream;
use crate::units::AngleUnit;

/// `ELLIPSOID["name",semi_major_axis,inverse_flattening,LENGTHUNIT[...]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipsoid {
    pub name: String,
    pub semi_major_axis: f64,
    pub inverse_flattening: f64,
    pub unit: Option<crate::units::LengthUnit>,
    pub ids: Vec<Id>,
}

impl Ellipsoid {
    pub fn from_tokens(stream: &TokenStream, start: usize) -> Result<(Ellipsoid, usize)> {
        construct::check_keyword("ELLIPSOID", stream, start, &["ELLIPSOID", "SPHEROID"])?;
        let (end, same) = construct::span(stream, start);
        construct::enforce_leading("ELLIPSOID", same, 3, 3)?;
        let name = validate_name("ELLIPSOID", &stream.tokens[start + 1].text)?;
        let semi_major_axis = construct::parse_f64("ELLIPSOID", &stream.tokens[start + 2].text)?;
        let inverse_flattening = construct::parse_f64("ELLIPSOID", &stream.tokens[start + 3].text)?;

        let mut unit = None;
        let mut ids = Vec::new();
        let mut i = start + 4;
        while i < end {
            match crate::registry::lookup(&stream.tokens[i].text) {
                Some(KindTag::LengthUnit) | Some(KindTag::Unit) if unit.is_none() => {
                    let (u, next) = crate::units::LengthUnit::from_tokens(stream, i)?;
                    unit = Some(u);
                    i = next;
                }
                Some(KindTag::Id) => {
                    let (id, next) = Id::from_tokens(stream, i)?;
                    ids.push(id);
                    i = next;
                }
                _ => i = construct::skip_subtree(stream, i),
            }
        }
        Ok((
            Ellipsoid {
                name,
                semi_major_axis,
                inverse_flattening,
                unit,
                ids,
            },
            end,
        ))
    }

    pub fn to_wkt(&self, opts: EmitOptions) -> String {
        let mut s = format!(
            "ELLIPSOID[\"{}\",{},{}",
            crate::strutil::escape(&self.name),
            self.semi_major_axis,
            self.inverse_flattening
        );
        if let Some(u) = &self.unit {
            s.push(',');
            s.push_str(&u.to_wkt(opts));
        }
        for id in &self.ids {
            s.push(',');
            s.push_str(&id.to_wkt(opts));
        }
        s.push(']');
        s
    }

    pub fn is_equal(a: &Ellipsoid, b: &Ellipsoid) -> bool {
        a.name == b.name
            && a.semi_major_axis == b.semi_major_axis
            && a.inverse_flattening == b.inverse_flattening
    }
}

/// `PRIMEM["name",longitude,ANGLEUNIT[...]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimeMeridian {
    pub name: String,
    pub longitude: f64,
    pub unit: Option<AngleUnit>,
    pub id: Option<Id>,
}

impl PrimeMeridian {
    pub fn from_tokens(stream: &TokenStream, start: usize) -> Result<(PrimeMeridian, usize)> {
        construct::check_keyword("PRIMEM", stream, start, &["PRIMEM", "PRIMEMERIDIAN"])?;
        let (end, same) = construct::span(stream, start);
        construct::enforce_leading("PRIMEM", same, 2, 2)?;
        let name = validate_name("PRIMEM", &stream.tokens[start + 1].text)?;
        let longitude = construct::parse_f64("PRIMEM", &stream.tokens[start + 2].text)?;

        let mut unit = None;
        let mut id = None;
        let mut i = start + 3;
        while i < end {
            match crate::registry::lookup(&stream.tokens[i].text) {
                Some(KindTag::AngleUnit) | Some(KindTag::Unit) if unit.is_none() => {
                    let (u, next) = AngleUnit::from_tokens(stream, i)?;
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
            PrimeMeridian {
                name,
                longitude,
                unit,
                id,
            },
            end,
        ))
    }

    pub fn to_wkt(&self, opts: EmitOptions) -> String {
        let mut s = format!(
            "PRIMEM[\"{}\",{}",
            crate::strutil::escape(&self.name),
            self.longitude
        );
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
}

macro_rules! simple_datum {
    ($name:ident, $kwd:expr, $alts:expr) => {
        #[doc = concat!("`", $kwd, "[\"name\",ANCHOR[...]]` plus the common tail.")]
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct $name {
            pub name: String,
            pub anchor: Option<Anchor>,
            pub tail: CommonTail,
        }

        impl $name {
            pub fn from_tokens(stream: &TokenStream, start: usize) -> Result<(Self, usize)> {
                construct::check_keyword($kwd, stream, start, $alts)?;
                let (end, same) = construct::span(stream, start);
                construct::enforce_leading($kwd, same, 1, 1)?;
                let name = validate_name($kwd, &stream.tokens[start + 1].text)?;

                let mut anchor = None;
                let mut tail = CommonTail::default();
                let mut i = start + 2;
                while i < end {
                    if let ChildOutcome::Consumed(next) = tail.try_consume($kwd, stream, i)? {
                        i = next;
                        continue;
                    }
                    match crate::registry::lookup(&stream.tokens[i].text) {
                        Some(KindTag::Anchor) if anchor.is_none() => {
                            let (a_end, a_same) = construct::span(stream, i);
                            construct::enforce_leading("ANCHOR", a_same, 1, 1)?;
                            anchor = Some(Anchor::new(crate::strutil::unescape(&stream.tokens[i + 1].text)));
                            i = a_end;
                        }
                        _ => i = construct::skip_subtree(stream, i),
                    }
                }
                Ok((
                    $name {
                        name,
                        anchor,
                        tail,
                    },
                    end,
                ))
            }

            pub fn to_wkt(&self, opts: EmitOptions) -> String {
                let mut children = Vec::new();
                if let Some(a) = &self.anchor {
                    children.push(a.to_wkt("ANCHOR"));
                }
                self.tail.emit(&mut children, opts, false);
                emit::assemble(
                    $kwd,
                    &[format!("\"{}\"", crate::strutil::escape(&self.name))],
                    &children,
                    opts,
                )
            }
        }
    };
}

simple_datum!(VertDatum, "VDATUM", &["VERT_DATUM", "VDATUM", "VERTICALDATUM", "VRF"]);
simple_datum!(EngrDatum, "EDATUM", &["LOCAL_DATUM", "EDATUM", "ENGINEERINGDATUM"]);
simple_datum!(ParamDatum, "PDATUM", &["PARAMETRICDATUM"]);
simple_datum!(ImageDatum, "IDATUM", &["IMAGEDATUM"]);

/// `GEODETICDATUM["name",ELLIPSOID[...],ANCHOR[...]]` (plus common tail).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeodDatum {
    pub name: String,
    pub ellipsoid: Option<Ellipsoid>,
    pub anchor: Option<Anchor>,
    pub prime_meridian: Option<PrimeMeridian>,
    pub tail: CommonTail,
}

impl GeodDatum {
    pub fn from_tokens(stream: &TokenStream, start: usize) -> Result<(GeodDatum, usize)> {
        construct::check_keyword("DATUM", stream, start, &["DATUM", "GEODETICDATUM", "TRF"])?;
        let (end, same) = construct::span(stream, start);
        construct::enforce_leading("DATUM", same, 1, 1)?;
        let name = validate_name("DATUM", &stream.tokens[start + 1].text)?;

        let mut ellipsoid = None;
        let mut anchor = None;
        let mut prime_meridian = None;
        let mut tail = CommonTail::default();
        let mut i = start + 2;
        while i < end {
            if let ChildOutcome::Consumed(next) = tail.try_consume("DATUM", stream, i)? {
                i = next;
                continue;
            }
            match crate::registry::lookup(&stream.tokens[i].text) {
                Some(KindTag::Ellipsoid) if ellipsoid.is_none() => {
                    let (e, next) = Ellipsoid::from_tokens(stream, i)?;
                    ellipsoid = Some(e);
                    i = next;
                }
                Some(KindTag::PrimeMeridian) if prime_meridian.is_none() => {
                    let (p, next) = PrimeMeridian::from_tokens(stream, i)?;
                    prime_meridian = Some(p);
                    i = next;
                }
                Some(KindTag::Anchor) if anchor.is_none() => {
                    let (a_end, a_same) = construct::span(stream, i);
                    construct::enforce_leading("ANCHOR", a_same, 1, 1)?;
                    anchor = Some(Anchor::new(crate::strutil::unescape(&stream.tokens[i + 1].text)));
                    i = a_end;
                }
                _ => i = construct::skip_subtree(stream, i),
            }
        }
        let ellipsoid = ellipsoid.ok_or(Error::MissingChild {
            parent: "DATUM",
            child: "ELLIPSOID",
        })?;
        Ok((
            GeodDatum {
                name,
                ellipsoid: Some(ellipsoid),
                anchor,
                prime_meridian,
                tail,
            },
            end,
        ))
    }

    pub fn to_wkt(&self, opts: EmitOptions) -> String {
        let mut children = Vec::new();
        if let Some(e) = &self.ellipsoid {
            children.push(e.to_wkt(opts));
        }
        if let Some(a) = &self.anchor {
            children.push(a.to_wkt("ANCHOR"));
        }
        self.tail.emit(&mut children, opts, false);
        let mut s = emit::assemble(
            "DATUM",
            &[format!("\"{}\"", crate::strutil::escape(&self.name))],
            &children,
            opts,
        );
        if let Some(pm) = &self.prime_meridian {
            // PRIMEM is a sibling of DATUM in the enclosing CRS, not a
            // child of DATUM itself; callers append it after this string.
            s = format!("{s},{}", pm.to_wkt(opts));
        }
        s
    }
}

/// `TDATUM["name",TIMEORIGIN[...]]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeDatum {
    pub name: String,
    pub origin: Option<TimeOrigin>,
    pub anchor: Option<Anchor>,
    pub tail: CommonTail,
}

impl TimeDatum {
    pub fn from_tokens(stream: &TokenStream, start: usize) -> Result<(TimeDatum, usize)> {
        construct::check_keyword("TDATUM", stream, start, &["TIMEDATUM", "TDATUM", "TEMPORALDATUM"])?;
        let (end, same) = construct::span(stream, start);
        construct::enforce_leading("TDATUM", same, 1, 1)?;
        let name = validate_name("TDATUM", &stream.tokens[start + 1].text)?;

        let mut origin = None;
        let mut anchor = None;
        let mut tail = CommonTail::default();
        let mut i = start + 2;
        while i < end {
            if let ChildOutcome::Consumed(next) = tail.try_consume("TDATUM", stream, i)? {
                i = next;
                continue;
            }
            match crate::registry::lookup(&stream.tokens[i].text) {
                Some(KindTag::TimeOrigin) if origin.is_none() => {
                    let (o_end, o_same) = construct::span(stream, i);
                    construct::enforce_leading("TIMEORIGIN", o_same, 1, 1)?;
                    origin = Some(TimeOrigin::new(crate::strutil::unescape(&stream.tokens[i + 1].text)));
                    i = o_end;
                }
                Some(KindTag::Anchor) if anchor.is_none() => {
                    let (a_end, a_same) = construct::span(stream, i);
                    construct::enforce_leading("ANCHOR", a_same, 1, 1)?;
                    anchor = Some(Anchor::new(crate::strutil::unescape(&stream.tokens[i + 1].text)));
                    i = a_end;
                }
                _ => i = construct::skip_subtree(stream, i),
            }
        }
        Ok((
            TimeDatum {
                name,
                origin,
                anchor,
                tail,
            },
            end,
        ))
    }

    pub fn to_wkt(&self, opts: EmitOptions) -> String {
        let mut children = Vec::new();
        if let Some(o) = &self.origin {
            children.push(o.to_wkt("TIMEORIGIN"));
        }
        if let Some(a) = &self.anchor {
            children.push(a.to_wkt("ANCHOR"));
        }
        self.tail.emit(&mut children, opts, false);
        emit::assemble(
            "TDATUM",
            &[format!("\"{}\"", crate::strutil::escape(&self.name))],
            &children,
            opts,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ellipsoid_wgs84() {
        let ts = TokenStream::tokenize(
            r#"ELLIPSOID["WGS 84",6378137,298.257223563,LENGTHUNIT["metre",1]]"#,
            "ELLIPSOID",
        )
        .unwrap();
        let (e, end) = Ellipsoid::from_tokens(&ts, 0).unwrap();
        assert_eq!(e.name, "WGS 84");
        assert_eq!(e.semi_major_axis, 6378137.0);
        assert_eq!(end, ts.len());
    }

    #[test]
    fn geod_datum_requires_ellipsoid() {
        let ts = TokenStream::tokenize(r#"DATUM["D",SCOPE["x"]]"#, "DATUM").unwrap();
        assert!(matches!(
            GeodDatum::from_tokens(&ts, 0),
            Err(Error::MissingChild { child: "ELLIPSOID", .. })
        ));
    }

    #[test]
    fn geod_datum_full() {
        let ts = TokenStream::tokenize(
            r#"DATUM["World Geodetic System 1984",ELLIPSOID["WGS 84",6378137,298.257223563]]"#,
            "DATUM",
        )
        .unwrap();
        let (d, end) = GeodDatum::from_tokens(&ts, 0).unwrap();
        assert_eq!(d.name, "World Geodetic System 1984");
        assert!(d.ellipsoid.is_some());
        assert_eq!(end, ts.len());
    }
}
