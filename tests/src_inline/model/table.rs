use super::{Horizon, ScoreTable, lookup_outcome};
use crate::error::TableError;
use crate::model::probability::Percent;

fn small_table() -> ScoreTable {
    ScoreTable::new(
        -2,
        vec![
            Horizon::from_literals("3-year", &[1.0, 2.5, 4.0, 8.125]),
            Horizon::from_literals("5-year", &[2.0, 3.5, 6.0, 10.0]),
        ],
    )
    .unwrap()
}

#[test]
fn test_lookup_exact_rows() {
    let table = small_table();
    assert_eq!(table.min_score(), -2);
    assert_eq!(table.max_score(), 1);
    assert_eq!(table.len(), 4);

    let row = table.lookup(-2.0).unwrap();
    assert_eq!(row.score, -2);
    assert_eq!(row.horizons[0].risk, Percent::from_milli(1_000));
    assert_eq!(row.horizons[1].complement, Percent::from_milli(98_000));

    let row = lookup_outcome(1.0, &table).unwrap();
    assert_eq!(row.horizons[0].label, "3-year");
    assert_eq!(row.horizons[0].risk, Percent::from_milli(8_125));
    assert_eq!(row.horizons[0].complement, Percent::from_milli(91_875));
}

#[test]
fn test_lookup_outside_range() {
    let table = small_table();
    let err = table.lookup(2.0).unwrap_err();
    assert_eq!((err.min, err.max), (-2, 1));
    assert!(table.lookup(-3.0).is_err());
}

#[test]
fn test_lookup_non_integral_is_out_of_range() {
    let table = small_table();
    assert!(table.lookup(-0.5).is_err());
    assert!(table.lookup(0.4).is_err());
    assert!(table.lookup(f64::NAN).is_err());
}

#[test]
fn test_complements_exact_for_every_row() {
    let table = small_table();
    for row in table.rows() {
        for h in &row.horizons {
            assert_eq!(h.risk.milli() + h.complement.milli(), 100_000);
        }
    }
    assert_eq!(table.rows().count(), 4);
}

#[test]
fn test_validation_errors() {
    assert!(matches!(
        ScoreTable::new(0, vec![]),
        Err(TableError::NoHorizons)
    ));
    assert!(matches!(
        ScoreTable::new(0, vec![Horizon::from_literals("3-year", &[])]),
        Err(TableError::Empty)
    ));
    assert!(matches!(
        ScoreTable::new(
            0,
            vec![
                Horizon::from_literals("3-year", &[1.0, 2.0]),
                Horizon::from_literals("5-year", &[1.0]),
            ]
        ),
        Err(TableError::RaggedColumn { .. })
    ));
    assert!(matches!(
        ScoreTable::new(5, vec![Horizon::from_literals("3-year", &[1.0, 3.0, 2.0])]),
        Err(TableError::NonMonotonic { score: 7, .. })
    ));
    assert!(matches!(
        ScoreTable::new(0, vec![Horizon::from_literals("3-year", &[1.0, 101.0])]),
        Err(TableError::ValueOutOfBounds { score: 1, .. })
    ));
}

#[test]
fn test_from_rows_sorts_and_checks_contiguity() {
    let labels = vec!["5-year".to_string()];
    let table = ScoreTable::from_rows(
        &labels,
        vec![
            (1, vec![Percent::from_milli(3_000)]),
            (-1, vec![Percent::from_milli(1_000)]),
            (0, vec![Percent::from_milli(2_000)]),
        ],
    )
    .unwrap();
    assert_eq!(table.min_score(), -1);
    assert_eq!(
        table.lookup(0.0).unwrap().horizons[0].risk,
        Percent::from_milli(2_000)
    );

    let gap = ScoreTable::from_rows(
        &labels,
        vec![
            (0, vec![Percent::from_milli(1_000)]),
            (2, vec![Percent::from_milli(2_000)]),
        ],
    );
    assert!(matches!(
        gap,
        Err(TableError::NonContiguous {
            expected: 1,
            found: 2
        })
    ));

    let duplicate = ScoreTable::from_rows(
        &labels,
        vec![
            (0, vec![Percent::from_milli(1_000)]),
            (0, vec![Percent::from_milli(1_000)]),
        ],
    );
    assert!(matches!(duplicate, Err(TableError::NonContiguous { .. })));

    assert!(matches!(
        ScoreTable::from_rows(&labels, vec![]),
        Err(TableError::Empty)
    ));
}

#[test]
fn test_deserialize_validates() {
    let ok: ScoreTable = serde_json::from_str(
        r#"{"min_score":0,"horizons":[{"label":"5-year","values":[1.5,2.0]}]}"#,
    )
    .unwrap();
    assert_eq!(ok.max_score(), 1);

    let bad = serde_json::from_str::<ScoreTable>(
        r#"{"min_score":0,"horizons":[{"label":"5-year","values":[2.0,1.5]}]}"#,
    );
    assert!(bad.is_err());
}

#[test]
fn test_score_range_must_fit_i64() {
    let top = ScoreTable::new(i64::MAX, vec![Horizon::from_literals("5-year", &[1.0])]).unwrap();
    assert_eq!(top.min_score(), i64::MAX);
    assert_eq!(top.max_score(), i64::MAX);

    let past_top = ScoreTable::new(i64::MAX, vec![Horizon::from_literals("5-year", &[1.0, 2.0])]);
    assert!(matches!(
        past_top,
        Err(TableError::ScoreOverflow {
            min_score: i64::MAX,
            rows: 2
        })
    ));

    let labels = vec!["5-year".to_string()];
    let repeated_top = ScoreTable::from_rows(
        &labels,
        vec![
            (i64::MAX, vec![Percent::from_milli(1_000)]),
            (i64::MAX, vec![Percent::from_milli(1_000)]),
        ],
    );
    assert!(matches!(repeated_top, Err(TableError::ScoreOverflow { .. })));

    let json = serde_json::from_str::<ScoreTable>(
        r#"{"min_score":9223372036854775807,"horizons":[{"label":"5-year","values":[1.0,2.0]}]}"#,
    );
    assert!(json.is_err());
}

#[test]
fn test_from_percents_counts_rounded_values() {
    let (horizon, rounded) = Horizon::from_percents("5-year", &[1.0, 1.23456, 2.5]).unwrap();
    assert_eq!(rounded, 1);
    assert_eq!(horizon.label, "5-year");
    assert_eq!(
        horizon.values,
        vec![
            Percent::from_milli(1_000),
            Percent::from_milli(1_235),
            Percent::from_milli(2_500)
        ]
    );

    assert!(Horizon::from_percents("5-year", &[120.0]).is_err());
}

#[test]
fn test_deserialize_rounds_extra_decimals() {
    let table: ScoreTable = serde_json::from_str(
        r#"{"min_score":0,"horizons":[{"label":"5-year","values":[1.23456,2.0]}]}"#,
    )
    .unwrap();
    assert_eq!(
        table.lookup(0.0).unwrap().horizons[0].risk,
        Percent::from_milli(1_235)
    );

    let out_of_bounds = serde_json::from_str::<ScoreTable>(
        r#"{"min_score":0,"horizons":[{"label":"5-year","values":[120.0]}]}"#,
    );
    assert!(out_of_bounds.is_err());
}
