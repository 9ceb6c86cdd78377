//!
//! Structural validation shared across CRS/datum/operation constructors
//! (spec §4.4/§5).
//!
//! Grounded in the `ogc_utils::validate_cs`/`ogc_utils::compare_extent`
//! calls visible in `original_source/src/ogc_temporal_crs.cpp` and
//! `ogc_abrtrans.cpp` -- both call into a shared utility rather than
//! inlining axis/extent/id comparison in every kind, which this module
//! mirrors.
//!
use crate::cs::{Axis, Cs};
use crate::errors::{Error, Result};
use crate::units::AnyUnit;

/// Check that a CS's declared dimension matches the number of axes
/// actually present, that every axis direction is one the CS category
/// permits (spec §5.3), and that the CRS-level unit and any per-axis
/// units agree with the unit family the CS category implies (spec
/// §4.4(c)/(d)). A CS with zero parsed axes is left unchecked on count
/// (the axes may legitimately live on the enclosing node's sibling list
/// and be validated by the caller once collected).
pub fn validate_cs(kind: &'static str, cs: Option<&Cs>, axes: &[Axis], unit: Option<&AnyUnit>) -> Result<()> {
    let Some(cs) = cs else { return Ok(()) };
    let expected_unit_kind = cs.category.default_unit_kind();
    if !axes.is_empty() && cs.dimension as usize != axes.len() {
        return Err(Error::AxisCountMismatch(kind, cs.dimension, axes.len()));
    }
    if let Some(u) = unit {
        if u.kind() != expected_unit_kind {
            return Err(Error::UnitKindMismatch(kind, "UNIT"));
        }
    }
    for axis in axes {
        if !cs.category.permits_direction(&axis.direction) {
            return Err(Error::AxisDirectionNotPermitted(
                kind,
                axis.direction.to_wkt(),
                cs.category.keyword(),
            ));
        }
        if let Some(u) = &axis.unit {
            if u.kind() != expected_unit_kind {
                return Err(Error::UnitKindMismatch(kind, "AXIS"));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cs::{AxisDirection, CsCategory};
    use crate::token::TokenStream;

    #[test]
    fn rejects_axis_count_mismatch() {
        let ts = TokenStream::tokenize("CS[ellipsoidal,2]", "CS").unwrap();
        let (cs, _) = Cs::from_tokens(&ts, 0).unwrap();
        let ts2 = TokenStream::tokenize(r#"AXIS["lat",north]"#, "AXIS").unwrap();
        let (axis, _) = Axis::from_tokens(&ts2, 0, crate::units::UnitKind::Angle).unwrap();
        assert!(validate_cs("GEODCRS", Some(&cs), &[axis], None).is_err());
    }

    #[test]
    fn rejects_direction_not_permitted_for_vertical() {
        let ts = TokenStream::tokenize("CS[vertical,1]", "CS").unwrap();
        let (cs, _) = Cs::from_tokens(&ts, 0).unwrap();
        let axis = Axis {
            name: "h".into(),
            abbrev: None,
            direction: AxisDirection::North,
            meridian: None,
            order: None,
            unit: None,
            id: None,
        };
        assert!(validate_cs("VERTCRS", Some(&cs), std::slice::from_ref(&axis), None).is_err());
        assert_eq!(cs.category, CsCategory::Vertical);
    }

    #[test]
    fn rejects_unit_kind_mismatch_against_cs_family() {
        let ts = TokenStream::tokenize("CS[ellipsoidal,2]", "CS").unwrap();
        let (cs, _) = Cs::from_tokens(&ts, 0).unwrap();
        let ts2 = TokenStream::tokenize(r#"LENGTHUNIT["metre",1]"#, "LENGTHUNIT").unwrap();
        let (u, _) = crate::units::LengthUnit::from_tokens(&ts2, 0).unwrap();
        let unit = AnyUnit::Length(u);
        assert!(validate_cs("GEODCRS", Some(&cs), &[], Some(&unit)).is_err());
    }
}
