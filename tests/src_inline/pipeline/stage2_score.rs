use super::compute_score;
use crate::error::CovariateError;
use crate::model::covariates::CovariateSet;
use crate::model::rules::ScoreRule;

#[test]
fn test_breakdown_lists_every_term() {
    let rules = vec![
        ScoreRule::ordinal("who_grade", &[(1, 0.0), (2, 4.0), (3, 24.0)]),
        ScoreRule::flag("multifocality", 1.0),
        ScoreRule::scaled_round("r_rpa", 10.0, -2.0),
    ];
    let set = CovariateSet::new()
        .with("who_grade", 2i64)
        .with("multifocality", true)
        .with("r_rpa", 30.0);
    let score = compute_score(&rules, &set).unwrap();
    assert_eq!(score.total, -1.0);
    let terms: Vec<(&str, f64)> = score
        .contributions
        .iter()
        .map(|c| (c.term.as_str(), c.points))
        .collect();
    assert_eq!(
        terms,
        vec![("who_grade", 4.0), ("multifocality", 1.0), ("r_rpa", -6.0)]
    );
}

#[test]
fn test_negative_zero_is_normalized() {
    let rules = vec![ScoreRule::scaled_round("r_rpa", 10.0, -2.0)];
    let set = CovariateSet::new().with("r_rpa", 0.0);
    let score = compute_score(&rules, &set).unwrap();
    assert!(score.total.is_sign_positive());
    assert!(score.contributions[0].points.is_sign_positive());
}

#[test]
fn test_first_missing_covariate_fails() {
    let rules = vec![
        ScoreRule::flag("cirrhosis", 6.0),
        ScoreRule::flag("portal_hypertension", 11.0),
    ];
    let set = CovariateSet::new().with("cirrhosis", true);
    assert!(matches!(
        compute_score(&rules, &set),
        Err(CovariateError::Missing(name)) if name == "portal_hypertension"
    ));
}

#[test]
fn test_empty_rules_score_zero() {
    let score = compute_score(&[], &CovariateSet::new()).unwrap();
    assert_eq!(score.total, 0.0);
    assert!(score.contributions.is_empty());
}
