use super::{classic, remodeling};
use crate::model::covariates::CovariateSet;
use crate::model::instrument::OutcomeModel;
use crate::pipeline::stage2_score::compute_score;

fn example() -> CovariateSet {
    CovariateSet::new()
        .with("age", 25.0)
        .with("duration", 3.0)
        .with("eosinophils", 50.0)
        .with("fibrosis", 80.0)
}

fn probability(instrument: &crate::model::instrument::Instrument, id: &str, score: f64) -> f64 {
    match &instrument.outcome(id).unwrap().model {
        OutcomeModel::Logistic { logistic } => logistic.predict(score),
        other => panic!("expected logistic, got {}", other.kind()),
    }
}

#[test]
fn test_classic_scores() {
    let eoe = classic();
    let scores: Vec<f64> = eoe
        .outcomes
        .iter()
        .map(|o| compute_score(&o.rules, &example()).unwrap().total)
        .collect();
    assert_eq!(scores, vec![84.0, 76.0, 41.0]);
}

#[test]
fn test_classic_probabilities() {
    let eoe = classic();
    assert!((probability(&eoe, "stricture", 84.0) - 0.723122).abs() < 1e-4);
    assert!((probability(&eoe, "stricture_dilation", 76.0) - 0.58904).abs() < 1e-4);
    assert!((probability(&eoe, "rings", 41.0) - 0.389361).abs() < 1e-4);
}

#[test]
fn test_remodeling_adds_capped_term() {
    let eoe = remodeling();
    let covariates = example().with("remodeling", 1200.0);
    let stricture = eoe.outcome("stricture").unwrap();
    let score = compute_score(&stricture.rules, &covariates).unwrap();
    assert_eq!(score.total, 108.0);
    assert!((probability(&eoe, "stricture", score.total) - 0.700987).abs() < 1e-4);

    let capped = example().with("remodeling", 2000.0);
    assert_eq!(compute_score(&stricture.rules, &capped).unwrap().total, 124.0);
}

#[test]
fn test_age_and_duration_caps() {
    let eoe = classic();
    let stricture = eoe.outcome("stricture").unwrap();
    let old = CovariateSet::new()
        .with("age", 80.0)
        .with("duration", 15.0)
        .with("eosinophils", 100.0)
        .with("fibrosis", 300.0);
    let score = compute_score(&stricture.rules, &old).unwrap();
    assert_eq!(score.total, 4.0 * 30.0 + 2.0 * 10.0 + 3.0 * 8.0 + 12.0 * 15.0);
    let (_, hi) = stricture.score_domain(&eoe.covariates).unwrap();
    assert_eq!(hi, score.total);
}

#[test]
fn test_instruments_validate() {
    classic().validate().unwrap();
    remodeling().validate().unwrap();
    assert_eq!(remodeling().covariates.len(), 5);
}

#[test]
fn test_remodeling_reports_stricture_only() {
    let eoe = remodeling();
    let ids: Vec<&str> = eoe.outcomes.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["stricture"]);
    assert!(eoe.outcome("rings").is_err());
    assert!(eoe.outcome("stricture_dilation").is_err());
    match &eoe.outcomes[0].model {
        OutcomeModel::Logistic { logistic } => {
            assert_eq!((logistic.coefficient, logistic.intercept), (0.044, -3.9));
        }
        other => panic!("expected logistic, got {}", other.kind()),
    }
}
