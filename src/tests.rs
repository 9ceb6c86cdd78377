//!
//!  Tests
//!
use crate::{EmitOptions, Node};

const WKT_PROJCS_NAD83: &str = concat!(
    r#"PROJCRS["NAD83 / Massachusetts Mainland","#,
    r#"BASEGEODCRS["NAD83","#,
    r#"DATUM["North American Datum 1983","#,
    r#"ELLIPSOID["GRS 1980",6378137,298.257222101,LENGTHUNIT["metre",1]]],"#,
    r#"PRIMEM["Greenwich",0,ANGLEUNIT["degree",0.0174532925199433]]],"#,
    r#"CONVERSION["SPCS83 Massachusetts Mainland zone",METHOD["Lambert Conic Conformal (2SP)"],"#,
    r#"PARAMETER["Latitude of false origin",41,ANGLEUNIT["degree",0.0174532925199433]],"#,
    r#"PARAMETER["Longitude of false origin",-71.5,ANGLEUNIT["degree",0.0174532925199433]],"#,
    r#"PARAMETER["Latitude of 1st standard parallel",42.68333333333333,ANGLEUNIT["degree",0.0174532925199433]],"#,
    r#"PARAMETER["Latitude of 2nd standard parallel",41.71666666666667,ANGLEUNIT["degree",0.0174532925199433]],"#,
    r#"PARAMETER["Easting at false origin",200000,LENGTHUNIT["metre",1]],"#,
    r#"PARAMETER["Northing at false origin",750000,LENGTHUNIT["metre",1]]],"#,
    r#"CS[Cartesian,2],"#,
    r#"AXIS["easting (X)",east],"#,
    r#"AXIS["northing (Y)",north],"#,
    r#"LENGTHUNIT["metre",1],"#,
    r#"ID["EPSG",26986]]"#,
);

const WKT_COMPOUND: &str = concat!(
    r#"COMPOUNDCRS["WGS 84 + EGM2008 height","#,
    r#"GEODCRS["WGS 84",DATUM["World Geodetic System 1984","#,
    r#"ELLIPSOID["WGS 84",6378137,298.257223563]],"#,
    r#"CS[ellipsoidal,2],AXIS["lat",north],AXIS["lon",east],ANGLEUNIT["degree",0.0174532925199433]],"#,
    r#"VERTCRS["EGM2008 height",VDATUM["EGM2008 geoid"],"#,
    r#"CS[vertical,1],AXIS["gravity-related height (H)",up],LENGTHUNIT["metre",1]]]"#,
);

#[test]
fn parses_projcrs_and_round_trips_name() {
    let node = Node::from_wkt(WKT_PROJCS_NAD83).unwrap();
    let crs = node.as_crs().expect("PROJCRS parses to a CRS");
    let wkt = crs.to_wkt(EmitOptions::default());
    assert!(wkt.starts_with(r#"PROJCRS["NAD83 / Massachusetts Mainland""#));
    assert!(wkt.contains("Lambert Conic Conformal (2SP)"));
    assert!(wkt.contains(r#"ID["EPSG",26986]"#));
}

#[test]
fn parses_compound_crs_with_two_components() {
    let node = Node::from_wkt(WKT_COMPOUND).unwrap();
    let crs = node.as_crs().unwrap();
    match &crs {
        crate::Crs::Compound(c) => assert_eq!(c.components.len(), 2),
        other => panic!("expected CompoundCrs, got {other:?}"),
    }
}

#[test]
fn old_syntax_authority_keyword_accepted() {
    let wkt = r#"GEODCRS["NAD83",DATUM["North American Datum 1983",ELLIPSOID["GRS 1980",6378137,298.257222101]],AUTHORITY["EPSG","4269"]]"#;
    let node = Node::from_wkt(wkt).unwrap();
    assert!(node.as_crs().is_some());
}

#[test]
fn unbalanced_brackets_is_rejected() {
    let wkt = r#"GEODCRS["x",DATUM["d",ELLIPSOID["e",1,1]]"#;
    assert!(Node::from_wkt(wkt).is_err());
}

#[test]
fn emit_no_ids_omits_identifiers() {
    let node = Node::from_wkt(
        r#"GEODCRS["WGS 84",DATUM["World Geodetic System 1984",ELLIPSOID["WGS 84",6378137,298.257223563]],ID["EPSG",4326]]"#,
    )
    .unwrap();
    let crs = node.as_crs().unwrap();
    let opts = EmitOptions {
        no_ids: true,
        ..Default::default()
    };
    let wkt = crs.to_wkt(opts);
    assert!(!wkt.contains("EPSG"));
}
