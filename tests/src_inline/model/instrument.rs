use super::{Instrument, OutcomeDef, OutcomeModel};
use crate::error::{ConfigError, RuleError};
use crate::model::covariates::CovariateSpec;
use crate::model::logistic::LogisticModel;
use crate::model::rules::ScoreRule;

fn toy() -> Instrument {
    Instrument {
        id: "toy".to_string(),
        name: "Toy".to_string(),
        description: String::new(),
        covariates: vec![
            CovariateSpec::binary("smoker", "Smoker"),
            CovariateSpec::integer("age", "Age", 0, 90),
        ],
        outcomes: vec![OutcomeDef {
            id: "event".to_string(),
            label: "Event".to_string(),
            risk_label: "Event".to_string(),
            complement_label: None,
            rules: vec![
                ScoreRule::flag("smoker", 5.0),
                ScoreRule::capped_step("age", 10.0, 6.0, 2.0),
            ],
            model: OutcomeModel::Logistic {
                logistic: LogisticModel::new(0.1, -2.0),
            },
        }],
    }
}

#[test]
fn test_valid_instrument() {
    let toy = toy();
    assert!(toy.validate().is_ok());
    assert!(!toy.needs_external_table());
    assert!(toy.covariate("age").is_some());
    assert!(toy.covariate("height").is_none());
    assert_eq!(toy.outcome("event").unwrap().model.kind(), "logistic");
}

#[test]
fn test_unknown_outcome() {
    assert!(matches!(
        toy().outcome("death"),
        Err(ConfigError::UnknownOutcome { .. })
    ));
}

#[test]
fn test_score_domain_sums_rule_ranges() {
    let toy = toy();
    let (lo, hi) = toy.outcomes[0].score_domain(&toy.covariates).unwrap();
    assert_eq!((lo, hi), (0.0, 17.0));
}

#[test]
fn test_rejects_duplicates_and_empty() {
    let mut dup = toy();
    dup.covariates.push(CovariateSpec::binary("smoker", "Smoker again"));
    assert!(matches!(dup.validate(), Err(ConfigError::Invalid { .. })));

    let mut dup = toy();
    let again = dup.outcomes[0].clone();
    dup.outcomes.push(again);
    assert!(matches!(dup.validate(), Err(ConfigError::Invalid { .. })));

    let mut empty = toy();
    empty.outcomes.clear();
    assert!(empty.validate().is_err());

    let mut no_rules = toy();
    no_rules.outcomes[0].rules.clear();
    assert!(no_rules.validate().is_err());
}

#[test]
fn test_rule_errors_carry_context() {
    let mut bad = toy();
    bad.outcomes[0].rules.push(ScoreRule::flag("diabetes", 1.0));
    match bad.validate() {
        Err(ConfigError::Rule {
            instrument,
            outcome,
            source: RuleError::UndeclaredCovariate(name),
        }) => {
            assert_eq!(instrument, "toy");
            assert_eq!(outcome, "event");
            assert_eq!(name, "diabetes");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn test_non_finite_logistic_rejected() {
    let mut bad = toy();
    bad.outcomes[0].model = OutcomeModel::Logistic {
        logistic: LogisticModel::new(f64::NAN, 0.0),
    };
    assert!(bad.validate().is_err());
}

#[test]
fn test_json_round_trip() {
    let toy = toy();
    let json = serde_json::to_string(&toy).unwrap();
    let back: Instrument = serde_json::from_str(&json).unwrap();
    assert_eq!(back, toy);
}
