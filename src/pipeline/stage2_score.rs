use serde::Serialize;

use crate::error::CovariateError;
use crate::model::covariates::CovariateSet;
use crate::model::rules::ScoreRule;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    pub term: String,
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub total: f64,
    pub contributions: Vec<Contribution>,
}

/// Sums the contribution of every rule. Fails on the first covariate that
/// is missing or outside what its rule can score.
pub fn compute_score(
    rules: &[ScoreRule],
    covariates: &CovariateSet,
) -> Result<ScoreBreakdown, CovariateError> {
    let mut total = 0.0;
    let mut contributions = Vec::with_capacity(rules.len());
    for rule in rules {
        let points = positive_zero(rule.contribution(covariates)?);
        total += points;
        contributions.push(Contribution {
            term: rule.label(),
            points,
        });
    }
    Ok(ScoreBreakdown {
        total: positive_zero(total),
        contributions,
    })
}

// -2 * round(0) is -0.0
fn positive_zero(x: f64) -> f64 {
    if x == 0.0 { 0.0 } else { x }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_score.rs"]
mod tests;
