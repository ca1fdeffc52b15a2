use super::{CovariateKind, CovariateSet, CovariateSpec, CovariateValue};
use crate::error::CovariateError;

#[test]
fn test_parse_ordinal_level() {
    let spec = CovariateSpec::ordinal("who_grade", "WHO Grade", &[1, 2, 3]);
    assert_eq!(spec.parse(" 2 ").unwrap(), CovariateValue::Level(2));
    assert!(matches!(
        spec.parse("4"),
        Err(CovariateError::InvalidValue { .. })
    ));
    assert!(matches!(
        spec.parse("two"),
        Err(CovariateError::InvalidValue { .. })
    ));
}

#[test]
fn test_parse_binary_spellings() {
    let spec = CovariateSpec::binary("cirrhosis", "Cirrhosis");
    for raw in ["yes", "Y", "true", "1"] {
        assert_eq!(spec.parse(raw).unwrap(), CovariateValue::Flag(true));
    }
    for raw in ["no", "N", "FALSE", "0"] {
        assert_eq!(spec.parse(raw).unwrap(), CovariateValue::Flag(false));
    }
    assert!(spec.parse("maybe").is_err());
}

#[test]
fn test_parse_numeric_domain() {
    let spec = CovariateSpec::numeric("nuclear_area", "Mean Nuclear Area %", 0.0, 100.0);
    assert_eq!(spec.parse("17.5").unwrap(), CovariateValue::Number(17.5));
    assert_eq!(spec.parse("0").unwrap(), CovariateValue::Number(0.0));
    assert_eq!(spec.parse("100").unwrap(), CovariateValue::Number(100.0));
    assert!(spec.parse("100.01").is_err());
    assert!(spec.parse("-1").is_err());
    assert!(spec.parse("NaN").is_err());
}

#[test]
fn test_integer_rejects_fraction() {
    let spec = CovariateSpec::integer("r_rpa", "r-RPA %", 0, 100);
    assert_eq!(spec.parse("25").unwrap(), CovariateValue::Number(25.0));
    assert!(spec.parse("25.5").is_err());
}

#[test]
fn test_categorical_is_case_insensitive() {
    let spec = CovariateSpec::categorical("hepar", "Hepar", &["high", "low"]);
    assert_eq!(
        spec.parse("LOW").unwrap(),
        CovariateValue::Category("low".to_string())
    );
    assert!(spec.parse("medium").is_err());
}

#[test]
fn test_coerce_kind_mismatch() {
    let spec = CovariateSpec::binary("multifocality", "Multifocality");
    let err = spec.coerce(&CovariateValue::Number(1.0)).unwrap_err();
    assert!(err.to_string().contains("multifocality"));

    let ordinal = CovariateSpec::ordinal("t_stage", "T Stage", &[1, 2, 3, 4]);
    assert_eq!(
        ordinal.coerce(&CovariateValue::Number(3.0)).unwrap(),
        CovariateValue::Level(3)
    );
    assert!(ordinal.coerce(&CovariateValue::Number(3.5)).is_err());
}

#[test]
fn test_domain_strings() {
    assert_eq!(
        CovariateKind::Ordinal {
            levels: vec![1, 2, 3]
        }
        .domain(),
        "{1, 2, 3}"
    );
    assert_eq!(CovariateKind::Binary.domain(), "{no, yes}");
    assert_eq!(
        CovariateSpec::integer("age", "Age", 0, 80).kind.domain(),
        "integer in [0, 80]"
    );
}

#[test]
fn test_spec_json_shape() {
    let spec = CovariateSpec::integer("age", "Age (years)", 0, 80);
    let json = serde_json::to_value(&spec).unwrap();
    assert_eq!(json["kind"], "numeric");
    assert_eq!(json["integer"], true);
    let back: CovariateSpec = serde_json::from_value(json).unwrap();
    assert_eq!(back, spec);
}

#[test]
fn test_set_builder_and_serialization() {
    let set = CovariateSet::new()
        .with("who_grade", 2i64)
        .with("cirrhosis", true)
        .with("nuclear_area", 12.5)
        .with("hepar", "low");
    assert_eq!(set.len(), 4);
    assert_eq!(set.get("who_grade"), Some(&CovariateValue::Level(2)));
    assert!(set.get("gpc").is_none());

    let json = serde_json::to_string(&set).unwrap();
    assert_eq!(
        json,
        r#"{"cirrhosis":true,"hepar":"low","nuclear_area":12.5,"who_grade":2}"#
    );
}

#[test]
fn test_value_display() {
    assert_eq!(CovariateValue::Flag(true).to_string(), "yes");
    assert_eq!(CovariateValue::Flag(false).to_string(), "no");
    assert_eq!(CovariateValue::Number(25.0).to_string(), "25");
    assert_eq!(CovariateValue::Level(3).to_string(), "3");
}
