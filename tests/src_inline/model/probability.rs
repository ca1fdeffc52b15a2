use super::{Percent, PercentError, format_fraction_pct, is_three_decimal};

#[test]
fn test_complement_is_exact() {
    for milli in [0, 1, 43, 32_357, 49_541, 99_999, 100_000] {
        let p = Percent::from_milli(milli);
        assert_eq!(p.milli() + p.complement().milli(), 100_000);
        assert_eq!(p.complement().complement(), p);
    }
}

#[test]
fn test_small_value_double_complement() {
    let p = Percent::from_literal(0.043);
    assert_eq!(p.complement(), Percent::from_literal(99.957));
    assert_eq!(p.complement().complement().as_f64(), 0.043);
}

#[test]
fn test_from_literal_rounds_to_thousandths() {
    assert_eq!(Percent::from_literal(32.357).milli(), 32_357);
    assert_eq!(Percent::from_literal(1.68).milli(), 1_680);
    assert_eq!(Percent::from_literal(12.3456).milli(), 12_346);
}

#[test]
fn test_from_percent_bounds() {
    assert_eq!(Percent::from_percent(0.0).unwrap(), Percent::ZERO);
    assert_eq!(Percent::from_percent(100.0).unwrap(), Percent::HUNDRED);
    assert!(matches!(
        Percent::from_percent(100.5),
        Err(PercentError::OutOfBounds(_))
    ));
    assert!(matches!(
        Percent::from_percent(-0.1),
        Err(PercentError::OutOfBounds(_))
    ));
    assert!(matches!(
        Percent::from_percent(f64::NAN),
        Err(PercentError::NotFinite)
    ));
}

#[test]
fn test_display_trims_trailing_zeros() {
    assert_eq!(Percent::from_milli(32_357).to_string(), "32.357");
    assert_eq!(Percent::from_milli(5_200).to_string(), "5.2");
    assert_eq!(Percent::from_milli(6_085).to_string(), "6.085");
    assert_eq!(Percent::HUNDRED.to_string(), "100.0");
    assert_eq!(Percent::from_milli(43).to_string(), "0.043");
}

#[test]
fn test_serde_as_plain_number() {
    let p = Percent::from_milli(67_643);
    assert_eq!(serde_json::to_string(&p).unwrap(), "67.643");
    let back: Percent = serde_json::from_str("67.643").unwrap();
    assert_eq!(back, p);
    assert!(serde_json::from_str::<Percent>("101").is_err());
}

#[test]
fn test_three_decimal_detection() {
    assert!(is_three_decimal(32.357));
    assert!(is_three_decimal(5.0));
    assert!(!is_three_decimal(0.12345));
}

#[test]
fn test_format_fraction_pct() {
    assert_eq!(format_fraction_pct(0.7231218, 2), "72.31");
    assert_eq!(format_fraction_pct(0.5, 1), "50.0");
}
