//!
//! Coordinate-operation nodes: methods, parameters, conversions and
//! transformations (spec §3.2, "conversion/coordinate-operation nodes").
//!
//! `Method`/`Parameter` are grounded in `proj4wkt::builder::Builder::method`
//! /`parameter` (which collected `PARAMETER["name",value,UNIT[...]]`
//! children into a `Vec<Parameter>`); `AbrTrans` generalizes the teacher's
//! `towgs84` special-case and `original_source/src/ogc_abrtrans.cpp`'s
//! method+parameters+param_files collection into one struct that also
//! covers full `COORDINATEOPERATION`/`CONVERSION` nodes.
//!
use crate::common::{CommonTail, Id};
use crate::construct::{self, ChildOutcome};
use crate::emit::{self, EmitOptions};
use crate::errors::{Error, Result};
use crate::registry::KindTag;
use crate::strutil::{escape, unescape};
use crate::token::TokenStream;
use crate::units::{AnyUnit, UnitKind};

fn validate_name(kind: &'static str, raw: &str) -> Result<String> {
    crate::common::validate_name(kind, raw)
}

/// `METHOD["name",ID[...]]` (alternate spelling `PROJECTION`).
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub id: Option<Id>,
}

impl Method {
    pub fn from_tokens(stream: &TokenStream, start: usize) -> Result<(Method, usize)> {
        construct::check_keyword("METHOD", stream, start, &["PROJECTION", "METHOD"])?;
        let (end, same) = construct::span(stream, start);
        construct::enforce_leading("METHOD", same, 1, 1)?;
        let name = validate_name("METHOD", &stream.tokens[start + 1].text)?;

        let mut id = None;
        let mut i = start + 2;
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
        Ok((Method { name, id }, end))
    }

    pub fn to_wkt(&self, opts: EmitOptions) -> String {
        let mut s = format!("METHOD[\"{}\"", escape(&self.name));
        if let Some(id) = &self.id {
            s.push(',');
            s.push_str(&id.to_wkt(opts));
        }
        s.push(']');
        s
    }
}

/// `PARAMETER["name",value,UNIT[...],ID[...]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub value: f64,
    pub unit: Option<AnyUnit>,
    pub id: Option<Id>,
}

impl Parameter {
    pub fn from_tokens(stream: &TokenStream, start: usize) -> Result<(Parameter, usize)> {
        construct::check_keyword("PARAMETER", stream, start, &["PARAMETER"])?;
        let (end, same) = construct::span(stream, start);
        construct::enforce_leading("PARAMETER", same, 2, 2)?;
        let name = validate_name("PARAMETER", &stream.tokens[start + 1].text)?;
        let value = construct::parse_f64("PARAMETER", &stream.tokens[start + 2].text)?;

        let mut unit = None;
        let mut id = None;
        let mut i = start + 3;
        while i < end {
            let kwd = stream.tokens[i].text.clone();
            if unit.is_none()
                && (crate::units::matches_kind(&kwd, UnitKind::Length)
                    || crate::units::matches_kind(&kwd, UnitKind::Angle)
                    || crate::units::matches_kind(&kwd, UnitKind::Scale))
            {
                // A bare generic UNIT on a parameter defaults to length
                // (the common case: false easting/northing, etc.); angle
                // and scale parameters use their own specific keyword.
                let (u, next) = AnyUnit::from_tokens(stream, i, UnitKind::Length)?;
                unit = Some(u);
                i = next;
                continue;
            }
            match crate::registry::lookup(&kwd) {
                Some(KindTag::Id) if id.is_none() => {
                    let (parsed, next) = Id::from_tokens(stream, i)?;
                    id = Some(parsed);
                    i = next;
                }
                _ => i = construct::skip_subtree(stream, i),
            }
        }
        Ok((
            Parameter {
                name,
                value,
                unit,
                id,
            },
            end,
        ))
    }

    pub fn to_wkt(&self, opts: EmitOptions) -> String {
        let mut s = format!("PARAMETER[\"{}\",{}", escape(&self.name), self.value);
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

    pub fn matches(a: &Parameter, b: &Parameter) -> bool {
        crate::strutil::kwd_eq(&a.name, &b.name)
    }
}

/// `PARAMETERFILE["name","filename"]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamFile {
    pub name: String,
    pub filename: String,
    pub id: Option<Id>,
}

impl ParamFile {
    pub fn from_tokens(stream: &TokenStream, start: usize) -> Result<(ParamFile, usize)> {
        construct::check_keyword("PARAMETERFILE", stream, start, &["PARAMETERFILE"])?;
        let (end, same) = construct::span(stream, start);
        construct::enforce_leading("PARAMETERFILE", same, 2, 2)?;
        let name = validate_name("PARAMETERFILE", &stream.tokens[start + 1].text)?;
        let filename = unescape(&stream.tokens[start + 2].text);

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
            ParamFile {
                name,
                filename,
                id,
            },
            end,
        ))
    }

    pub fn to_wkt(&self, opts: EmitOptions) -> String {
        let mut s = format!(
            "PARAMETERFILE[\"{}\",\"{}\"",
            escape(&self.name),
            escape(&self.filename)
        );
        if let Some(id) = &self.id {
            s.push(',');
            s.push_str(&id.to_wkt(opts));
        }
        s.push(']');
        s
    }

    pub fn matches(a: &ParamFile, b: &ParamFile) -> bool {
        crate::strutil::kwd_eq(&a.name, &b.name)
    }
}

/// Shared body for `CONVERSION`/`DERIVINGCONVERSION`/`ABRIDGEDTRANSFORMATION`
/// /`COORDINATEOPERATION`: a name, a method, a set of parameters or
/// parameter files, plus the common tail.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OperationBody {
    pub name: String,
    pub method: Option<Method>,
    pub parameters: Vec<Parameter>,
    pub param_files: Vec<ParamFile>,
    pub tail: CommonTail,
}

impl OperationBody {
    fn parse(kind: &'static str, stream: &TokenStream, start: usize, name_idx: usize) -> Result<(OperationBody, usize)> {
        let (end, _) = construct::span(stream, start);
        let name = validate_name(kind, &stream.tokens[name_idx].text)?;

        let mut method = None;
        let mut parameters = Vec::new();
        let mut param_files = Vec::new();
        let mut tail = CommonTail::default();
        let mut i = name_idx + 1;
        while i < end {
            if let ChildOutcome::Consumed(next) = tail.try_consume(kind, stream, i)? {
                i = next;
                continue;
            }
            match crate::registry::lookup(&stream.tokens[i].text) {
                Some(KindTag::Method) if method.is_none() => {
                    let (m, next) = Method::from_tokens(stream, i)?;
                    method = Some(m);
                    i = next;
                }
                Some(KindTag::Parameter) => {
                    let (p, next) = Parameter::from_tokens(stream, i)?;
                    if parameters.iter().any(|x| Parameter::matches(x, &p)) {
                        return Err(Error::DuplicateChild {
                            parent: kind,
                            child: "PARAMETER",
                        });
                    }
                    parameters.push(p);
                    i = next;
                }
                Some(KindTag::ParamFile) => {
                    let (p, next) = ParamFile::from_tokens(stream, i)?;
                    if param_files.iter().any(|x| ParamFile::matches(x, &p)) {
                        return Err(Error::DuplicateChild {
                            parent: kind,
                            child: "PARAMETERFILE",
                        });
                    }
                    param_files.push(p);
                    i = next;
                }
                _ => i = construct::skip_subtree(stream, i),
            }
        }
        Ok((
            OperationBody {
                name,
                method,
                parameters,
                param_files,
                tail,
            },
            end,
        ))
    }

    fn to_wkt_children(&self, opts: EmitOptions) -> Vec<String> {
        let mut children = Vec::new();
        if let Some(m) = &self.method {
            children.push(m.to_wkt(opts));
        }
        for p in &self.parameters {
            children.push(p.to_wkt(opts));
        }
        for p in &self.param_files {
            children.push(p.to_wkt(opts));
        }
        self.tail.emit(&mut children, opts, false);
        children
    }
}

macro_rules! operation_node {
    ($name:ident, $kwd:expr, $alts:expr) => {
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct $name(pub OperationBody);

        impl $name {
            pub fn from_tokens(stream: &TokenStream, start: usize) -> Result<(Self, usize)> {
                construct::check_keyword($kwd, stream, start, $alts)?;
                let (body, end) = OperationBody::parse($kwd, stream, start, start + 1)?;
                Ok((Self(body), end))
            }

            pub fn to_wkt(&self, opts: EmitOptions) -> String {
                emit::assemble(
                    $kwd,
                    &[format!("\"{}\"", escape(&self.0.name))],
                    &self.0.to_wkt_children(opts),
                    opts,
                )
            }
        }
    };
}

operation_node!(Conversion, "CONVERSION", &["CONVERSION"]);
operation_node!(DerivingConv, "DERIVINGCONVERSION", &["DERIVINGCONVERSION"]);
operation_node!(AbrTrans, "ABRIDGEDTRANSFORMATION", &["ABRIDGEDTRANSFORMATION", "TOWGS84"]);

/// `COORDINATEOPERATION["name",SOURCECRS[...],TARGETCRS[...],METHOD[...],...]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoordOp {
    pub body: OperationBody,
    pub accuracy: Option<f64>,
}

impl CoordOp {
    pub fn from_tokens(stream: &TokenStream, start: usize) -> Result<(CoordOp, usize)> {
        construct::check_keyword("COORDINATEOPERATION", stream, start, &["COORDINATEOPERATION"])?;
        let (body, end) = OperationBody::parse("COORDINATEOPERATION", stream, start, start + 1)?;

        let mut accuracy = None;
        let mut i = start + 2;
        while i < end {
            if crate::registry::lookup(&stream.tokens[i].text) == Some(KindTag::OpAccuracy) && accuracy.is_none() {
                let (a_end, a_same) = construct::span(stream, i);
                construct::enforce_leading("OPERATIONACCURACY", a_same, 1, 1)?;
                accuracy = Some(construct::parse_f64("OPERATIONACCURACY", &stream.tokens[i + 1].text)?);
                i = a_end;
            } else {
                i = construct::skip_subtree(stream, i);
            }
        }
        Ok((CoordOp { body, accuracy }, end))
    }

    pub fn to_wkt(&self, opts: EmitOptions) -> String {
        let mut children = self.body.to_wkt_children(opts);
        if let Some(a) = self.accuracy {
            children.push(format!("OPERATIONACCURACY[{a}]"));
        }
        emit::assemble(
            "COORDINATEOPERATION",
            &[format!("\"{}\"", escape(&self.body.name))],
            &children,
            opts,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_with_method_and_parameters() {
        let ts = TokenStream::tokenize(
            r#"CONVERSION["UTM zone 31N",METHOD["Transverse Mercator"],PARAMETER["Latitude of natural origin",0],PARAMETER["Longitude of natural origin",3]]"#,
            "CONVERSION",
        )
        .unwrap();
        let (c, end) = Conversion::from_tokens(&ts, 0).unwrap();
        assert_eq!(c.0.name, "UTM zone 31N");
        assert!(c.0.method.is_some());
        assert_eq!(c.0.parameters.len(), 2);
        assert_eq!(end, ts.len());
    }

    #[test]
    fn duplicate_parameter_rejected() {
        let ts = TokenStream::tokenize(
            r#"CONVERSION["x",PARAMETER["a",1],PARAMETER["a",2]]"#,
            "CONVERSION",
        )
        .unwrap();
        assert!(matches!(
            Conversion::from_tokens(&ts, 0),
            Err(Error::DuplicateChild { child: "PARAMETER", .. })
        ));
    }
}
