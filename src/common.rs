//!
//! Shared leaf kinds and the common optional clause set (`scope`, `extents`,
//! `ids`, `remark`) carried by every container node that the grammar allows
//! it on (spec §3.2).
//!
//! Grounded in `original_source/src/ogc_temporal_crs.cpp`'s child-dispatch
//! loop: scope/extent/id/remark are recognized and folded into the same
//! four slots in every `from_tokens` across the original source, so here
//! they are factored into one `CommonTail` rather than repeated per kind.
//!
use crate::construct::{self, ChildOutcome};
use crate::emit::EmitOptions;
use crate::errors::{Error, Result};
use crate::registry::KindTag;
use crate::strutil::{escape, unescape, unescape_len, NAME_MAX};
use crate::token::TokenStream;

/// Validate and unescape a leading quoted name, per spec §4.4.
pub fn validate_name(kind: &'static str, raw: &str) -> Result<String> {
    let len = unescape_len(raw);
    if len >= NAME_MAX {
        return Err(Error::NameTooLong(kind, len));
    }
    Ok(unescape(raw))
}

macro_rules! text_leaf {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            pub text: String,
        }

        impl $name {
            pub fn new(text: impl Into<String>) -> Self {
                Self { text: text.into() }
            }

            pub fn is_equal(a: Option<&Self>, b: Option<&Self>) -> bool {
                match (a, b) {
                    (None, None) => true,
                    (Some(x), Some(y)) => x.text == y.text,
                    _ => false,
                }
            }

            pub fn is_identical(a: Option<&Self>, b: Option<&Self>) -> bool {
                Self::is_equal(a, b)
            }

            pub fn to_wkt(&self, kwd: &'static str) -> String {
                format!("{kwd}[\"{}\"]", escape(&self.text))
            }
        }
    };
}

text_leaf!(Scope, "Natural-language statement of intended use.");
text_leaf!(Remark, "Free-text remark attached to an object.");
text_leaf!(Anchor, "Datum anchor description.");
text_leaf!(Citation, "Bibliographic citation for an identifier.");
text_leaf!(Uri, "URI naming an identifier's online definition.");
text_leaf!(TimeOrigin, "Calendar origin of a temporal datum.");

/// Authority + code identifier, e.g. `ID["EPSG",4326]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Id {
    pub authority: String,
    pub code: String,
    pub version: Option<String>,
    pub citation: Option<Citation>,
    pub uri: Option<Uri>,
}

impl Id {
    pub fn key(&self) -> (&str, &str) {
        (&self.authority, &self.code)
    }

    pub fn is_equal(a: &Id, b: &Id) -> bool {
        a.authority == b.authority && a.code == b.code
    }

    pub fn is_identical(a: &Id, b: &Id) -> bool {
        a.authority == b.authority
            && a.code == b.code
            && a.version == b.version
            && Citation::is_identical(a.citation.as_ref(), b.citation.as_ref())
            && Uri::is_identical(a.uri.as_ref(), b.uri.as_ref())
    }

    pub fn from_tokens(stream: &TokenStream, start: usize) -> Result<(Id, usize)> {
        let (end, same) = construct::span(stream, start);
        construct::enforce_leading("ID", same, 2, 2)?;
        let authority = validate_name("ID", &stream.tokens[start + 1].text)?;
        let code = stream.tokens[start + 2].text.clone();

        let mut version = None;
        let mut citation = None;
        let mut uri = None;
        let mut i = start + 3;
        while i < end {
            let kwd = &stream.tokens[i].text;
            if stream.tokens[i].level == stream.tokens[start].level + 1
                && crate::registry::lookup(kwd).is_none()
                && version.is_none()
                && citation.is_none()
            {
                // A bare 3rd leading scalar (version), only before any
                // sub-object has been seen.
                version = Some(stream.tokens[i].text.clone());
                i += 1;
                continue;
            }
            match crate::registry::lookup(kwd) {
                Some(KindTag::Citation) if citation.is_none() => {
                    let (c, next) = Citation::from_tokens(stream, i, "CITATION")?;
                    citation = Some(c);
                    i = next;
                }
                Some(KindTag::Uri) if uri.is_none() => {
                    let (u, next) = Uri::from_tokens(stream, i, "URI")?;
                    uri = Some(u);
                    i = next;
                }
                _ => i = construct::skip_subtree(stream, i),
            }
        }

        Ok((
            Id {
                authority,
                code,
                version,
                citation,
                uri,
            },
            end,
        ))
    }

    pub fn to_wkt(&self, opts: EmitOptions) -> String {
        let kwd = if opts.old_syntax { "AUTHORITY" } else { "ID" };
        let mut s = format!("{kwd}[\"{}\",\"{}\"", escape(&self.authority), escape(&self.code));
        if let Some(v) = &self.version {
            s.push_str(&format!(",\"{}\"", escape(v)));
        }
        if let Some(c) = &self.citation {
            s.push(',');
            s.push_str(&c.to_wkt("CITATION"));
        }
        if let Some(u) = &self.uri {
            s.push(',');
            s.push_str(&u.to_wkt("URI"));
        }
        s.push(']');
        s
    }
}

impl Citation {
    fn from_tokens(stream: &TokenStream, start: usize, kind: &'static str) -> Result<(Citation, usize)> {
        let (end, same) = construct::span(stream, start);
        construct::enforce_leading(kind, same, 1, 1)?;
        Ok((Citation::new(unescape(&stream.tokens[start + 1].text)), end))
    }
}

impl Uri {
    fn from_tokens(stream: &TokenStream, start: usize, kind: &'static str) -> Result<(Uri, usize)> {
        let (end, same) = construct::span(stream, start);
        construct::enforce_leading(kind, same, 1, 1)?;
        Ok((Uri::new(unescape(&stream.tokens[start + 1].text)), end))
    }
}

/// Area, bounding-box, vertical or temporal extent record. Duplicates are
/// keyed by *subtype*, not content (spec §4.4 set-uniqueness rule).
#[derive(Debug, Clone, PartialEq)]
pub enum Extent {
    Area(String),
    Bbox {
        south: f64,
        west: f64,
        north: f64,
        east: f64,
    },
    Vertical {
        min: f64,
        max: f64,
        unit: Option<Box<crate::units::LengthUnit>>,
    },
    Time {
        start: String,
        end: String,
    },
}

impl Extent {
    pub fn subtype(&self) -> &'static str {
        match self {
            Extent::Area(_) => "AREA",
            Extent::Bbox { .. } => "BBOX",
            Extent::Vertical { .. } => "VERTICALEXTENT",
            Extent::Time { .. } => "TIMEEXTENT",
        }
    }

    pub fn is_identical(a: &Extent, b: &Extent) -> bool {
        a == b
    }

    pub fn from_tokens(stream: &TokenStream, start: usize) -> Result<(Extent, usize)> {
        let kwd = stream.tokens[start].text.clone();
        let tag = crate::registry::lookup(&kwd);
        match tag {
            Some(KindTag::AreaExtent) => {
                let (end, same) = construct::span(stream, start);
                construct::enforce_leading("AREA", same, 1, 1)?;
                Ok((Extent::Area(unescape(&stream.tokens[start + 1].text)), end))
            }
            Some(KindTag::BboxExtent) => {
                let (end, same) = construct::span(stream, start);
                construct::enforce_leading("BBOX", same, 4, 4)?;
                let nums: Result<Vec<f64>> = (1..=4)
                    .map(|k| construct::parse_f64("BBOX", &stream.tokens[start + k].text))
                    .collect();
                let nums = nums?;
                Ok((
                    Extent::Bbox {
                        south: nums[0],
                        west: nums[1],
                        north: nums[2],
                        east: nums[3],
                    },
                    end,
                ))
            }
            Some(KindTag::VertExtent) => {
                let (end, same) = construct::span(stream, start);
                construct::enforce_leading("VERTICALEXTENT", same, 2, 2)?;
                let min = construct::parse_f64("VERTICALEXTENT", &stream.tokens[start + 1].text)?;
                let max = construct::parse_f64("VERTICALEXTENT", &stream.tokens[start + 2].text)?;
                let mut unit = None;
                let mut i = start + 3;
                while i < end {
                    match crate::registry::lookup(&stream.tokens[i].text) {
                        Some(KindTag::LengthUnit) | Some(KindTag::Unit) if unit.is_none() => {
                            let (u, next) = crate::units::LengthUnit::from_tokens(stream, i)?;
                            unit = Some(Box::new(u));
                            i = next;
                        }
                        _ => i = construct::skip_subtree(stream, i),
                    }
                }
                Ok((Extent::Vertical { min, max, unit }, end))
            }
            Some(KindTag::TimeExtent) => {
                let (end, same) = construct::span(stream, start);
                construct::enforce_leading("TIMEEXTENT", same, 2, 2)?;
                Ok((
                    Extent::Time {
                        start: unescape(&stream.tokens[start + 1].text),
                        end: unescape(&stream.tokens[start + 2].text),
                    },
                    end,
                ))
            }
            _ => Err(Error::WktInvalidKeyword("EXTENT", kwd)),
        }
    }

    pub fn to_wkt(&self, opts: EmitOptions) -> String {
        match self {
            Extent::Area(name) => format!("AREA[\"{}\"]", escape(name)),
            Extent::Bbox {
                south,
                west,
                north,
                east,
            } => format!("BBOX[{south},{west},{north},{east}]"),
            Extent::Vertical { min, max, unit } => {
                let mut s = format!("VERTICALEXTENT[{min},{max}");
                if let Some(u) = unit {
                    s.push(',');
                    s.push_str(&u.to_wkt(opts));
                }
                s.push(']');
                s
            }
            Extent::Time { start, end } => {
                format!("TIMEEXTENT[\"{}\",\"{}\"]", escape(start), escape(end))
            }
        }
    }
}

/// The four optional clauses shared by (almost) every container node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommonTail {
    pub scope: Option<Scope>,
    pub extents: Vec<Extent>,
    pub ids: Vec<Id>,
    pub remark: Option<Remark>,
}

impl CommonTail {
    /// Try to consume the child at `i` as scope/extent/id/remark. Returns
    /// `ChildOutcome::Consumed(next)` on success, `ChildOutcome::NotMine`
    /// if `i`'s keyword isn't one of these, so the caller can try its own
    /// kind-specific children next.
    pub fn try_consume(
        &mut self,
        kind: &'static str,
        stream: &TokenStream,
        i: usize,
    ) -> Result<ChildOutcome> {
        let kwd = stream.tokens[i].text.clone();
        match crate::registry::lookup(&kwd) {
            Some(KindTag::Scope) => {
                if self.scope.is_some() {
                    return Err(Error::DuplicateChild {
                        parent: kind,
                        child: "SCOPE",
                    });
                }
                let (end, same) = construct::span(stream, i);
                construct::enforce_leading("SCOPE", same, 1, 1)?;
                self.scope = Some(Scope::new(unescape(&stream.tokens[i + 1].text)));
                Ok(ChildOutcome::Consumed(end))
            }
            Some(KindTag::Remark) => {
                if self.remark.is_some() {
                    return Err(Error::DuplicateChild {
                        parent: kind,
                        child: "REMARK",
                    });
                }
                let (end, same) = construct::span(stream, i);
                construct::enforce_leading("REMARK", same, 1, 1)?;
                self.remark = Some(Remark::new(unescape(&stream.tokens[i + 1].text)));
                Ok(ChildOutcome::Consumed(end))
            }
            Some(KindTag::AreaExtent) | Some(KindTag::BboxExtent) | Some(KindTag::VertExtent)
            | Some(KindTag::TimeExtent) => {
                let (extent, end) = Extent::from_tokens(stream, i)?;
                if self.extents.iter().any(|e| e.subtype() == extent.subtype()) {
                    return Err(Error::DuplicateExtent {
                        parent: kind,
                        kind: extent.subtype(),
                    });
                }
                self.extents.push(extent);
                Ok(ChildOutcome::Consumed(end))
            }
            Some(KindTag::Id) => {
                let (id, end) = Id::from_tokens(stream, i)?;
                if self.ids.iter().any(|x| Id::is_equal(x, &id)) {
                    return Err(Error::DuplicateId {
                        parent: kind,
                        authority: id.authority,
                        code: id.code,
                    });
                }
                self.ids.push(id);
                Ok(ChildOutcome::Consumed(end))
            }
            _ => Ok(ChildOutcome::NotMine),
        }
    }

    /// Append WKT for each populated clause, honoring `NO_IDS`/`TOP_ID_ONLY`.
    pub fn emit(&self, parts: &mut Vec<String>, opts: EmitOptions, is_root: bool) {
        if let Some(s) = &self.scope {
            parts.push(s.to_wkt("SCOPE"));
        }
        for e in &self.extents {
            parts.push(e.to_wkt(opts));
        }
        let emit_ids = if opts.no_ids {
            false
        } else if opts.top_id_only {
            is_root
        } else {
            true
        };
        if emit_ids {
            for id in &self.ids {
                parts.push(id.to_wkt(opts));
            }
        }
        if let Some(r) = &self.remark {
            parts.push(r.to_wkt("REMARK"));
        }
    }

    pub fn is_identical(a: &CommonTail, b: &CommonTail) -> bool {
        Scope::is_identical(a.scope.as_ref(), b.scope.as_ref())
            && a.extents.len() == b.extents.len()
            && a.extents
                .iter()
                .zip(b.extents.iter())
                .all(|(x, y)| Extent::is_identical(x, y))
            && a.ids.len() == b.ids.len()
            && a.ids.iter().zip(b.ids.iter()).all(|(x, y)| Id::is_identical(x, y))
            && Remark::is_identical(a.remark.as_ref(), b.remark.as_ref())
    }
}
