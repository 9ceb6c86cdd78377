//!
//! Node registry: keyword -> kind tag, and the full ISO 19162 alternate
//! keyword set per kind.
//!
//! Grounded in `proj4wkt::builder::Key`/`From<&str> for Key`, generalized
//! from the teacher's partial alternate-keyword list to the full WKT-2
//! alternate set (spec §9 open question, resolved in favor of completeness
//! -- see DESIGN.md).
//!
use crate::strutil::kwd_is_one_of;

#[allow(non_camel_case_types)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum KindTag {
    AbrTrans,
    Anchor,
    AngleUnit,
    AreaExtent,
    Axis,
    BboxExtent,
    Bearing,
    BoundCrs,
    Citation,
    CompoundCrs,
    Conversion,
    CoordOp,
    Cs,
    DerivingConv,
    Ellipsoid,
    EngrCrs,
    EngrDatum,
    GeodCrs,
    GeodDatum,
    Id,
    ImageCrs,
    ImageDatum,
    LengthUnit,
    Meridian,
    Method,
    OpAccuracy,
    Order,
    Parameter,
    ParamFile,
    ParamCrs,
    ParamDatum,
    ParametricUnit,
    PrimeMeridian,
    ProjCrs,
    Remark,
    ScaleUnit,
    Scope,
    TimeCrs,
    TimeDatum,
    TimeExtent,
    TimeOrigin,
    TimeUnit,
    Unit,
    Uri,
    VertCrs,
    VertDatum,
    VertExtent,
}

macro_rules! kinds {
    ($($tag:ident => [$($kw:expr),+ $(,)?]),+ $(,)?) => {
        pub const KIND_KEYWORDS: &[(KindTag, &[&str])] = &[
            $( (KindTag::$tag, &[$($kw),+]) ),+
        ];
    };
}

// Single source of truth: both `keyword -> KindTag` lookup and the
// `is_known_keyword` test below are derived from this one table, so they
// cannot drift (spec §4.3).
kinds! {
    AbrTrans       => ["ABRIDGEDTRANSFORMATION", "TOWGS84"],
    Anchor         => ["ANCHOR", "ANCHOREPOCH"],
    AngleUnit      => ["ANGLEUNIT", "ANGUNIT"],
    AreaExtent     => ["AREA"],
    Axis           => ["AXIS"],
    BboxExtent     => ["BBOX"],
    Bearing        => ["BEARING"],
    BoundCrs       => ["BOUNDCRS"],
    Citation       => ["CITATION"],
    CompoundCrs    => ["COMPD_CS", "COMPOUNDCRS"],
    Conversion     => ["CONVERSION"],
    CoordOp        => ["COORDINATEOPERATION"],
    Cs             => ["CS"],
    DerivingConv   => ["DERIVINGCONVERSION"],
    Ellipsoid      => ["ELLIPSOID", "SPHEROID"],
    EngrCrs        => ["LOCAL_CS", "ENGCRS", "ENGINEERINGCRS", "BASEENGCRS", "BASEENGINEERINGCRS"],
    EngrDatum      => ["LOCAL_DATUM", "EDATUM", "ENGINEERINGDATUM"],
    GeodCrs        => ["GEOGCS", "GEOGCRS", "GEOGRAPHICCRS", "GEOCCS", "GEODCRS", "GEODETICCRS",
                        "BASEGEODCRS", "BASEGEOGCRS"],
    GeodDatum      => ["DATUM", "GEODETICDATUM", "TRF"],
    Id             => ["ID", "AUTHORITY"],
    ImageCrs       => ["IMAGECRS", "BASEIMAGECRS"],
    ImageDatum     => ["IMAGEDATUM"],
    LengthUnit     => ["LENGTHUNIT", "LENUNIT"],
    Meridian       => ["MERIDIAN"],
    Method         => ["PROJECTION", "METHOD"],
    OpAccuracy     => ["OPERATIONACCURACY"],
    Order          => ["ORDER"],
    Parameter      => ["PARAMETER"],
    ParamFile      => ["PARAMETERFILE"],
    ParamCrs       => ["PARAMETRICCRS", "BASEPARAMCRS", "BASEPARAMETRICCRS"],
    ParamDatum     => ["PARAMETRICDATUM"],
    ParametricUnit => ["PARAMETRICUNIT", "PARAMUNIT"],
    PrimeMeridian  => ["PRIMEM", "PRIMEMERIDIAN"],
    ProjCrs        => ["PROJCS", "PROJCRS", "PROJECTEDCRS", "BASEPROJCRS"],
    Remark         => ["REMARK"],
    ScaleUnit      => ["SCALEUNIT", "SCALUNIT"],
    Scope          => ["SCOPE"],
    TimeCrs        => ["TIMECRS", "BASETIMECRS"],
    TimeDatum      => ["TIMEDATUM", "TDATUM", "TEMPORALDATUM"],
    TimeExtent     => ["TIMEEXTENT"],
    TimeOrigin     => ["TIMEORIGIN"],
    TimeUnit       => ["TIMEUNIT", "TEMPORALQUANTITY"],
    Unit           => ["UNIT"],
    Uri            => ["URI"],
    VertCrs        => ["VERT_CS", "VERTCRS", "VERTICALCRS", "BASEVERTCRS"],
    VertDatum      => ["VERT_DATUM", "VDATUM", "VERTICALDATUM", "VRF"],
    VertExtent     => ["VERTICALEXTENT"],
}

/// Look up the kind tag for `kwd`, case-insensitively, trying every
/// documented alternate spelling.
pub fn lookup(kwd: &str) -> Option<KindTag> {
    KIND_KEYWORDS
        .iter()
        .find(|(_, kws)| kwd_is_one_of(kwd, kws))
        .map(|(tag, _)| *tag)
}

/// True if `kwd` names any recognized node kind (used by the leading-token
/// counter to tell a scalar leading value from the start of a child object,
/// spec §4.2 step 3).
pub fn is_known_keyword(kwd: &str) -> bool {
    lookup(kwd).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_primary_and_alternates() {
        assert_eq!(lookup("GEODCRS"), Some(KindTag::GeodCrs));
        assert_eq!(lookup("geodcrs"), Some(KindTag::GeodCrs));
        assert_eq!(lookup("BASEGEODCRS"), Some(KindTag::GeodCrs));
        assert_eq!(lookup("ID"), Some(KindTag::Id));
        assert_eq!(lookup("AUTHORITY"), Some(KindTag::Id));
        assert_eq!(lookup("LENGTHUNIT"), Some(KindTag::LengthUnit));
        assert_eq!(lookup("LENUNIT"), Some(KindTag::LengthUnit));
        assert_eq!(lookup("FOOBAR"), None);
    }

    #[test]
    fn is_known_keyword_matches_lookup() {
        assert!(is_known_keyword("AXIS"));
        assert!(!is_known_keyword("FOOBAR"));
    }
}
