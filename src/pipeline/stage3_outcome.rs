use serde::Serialize;

use crate::error::{ConfigError, OutOfRange, RiskError};
use crate::model::covariates::CovariateSet;
use crate::model::instrument::{Instrument, OutcomeDef, OutcomeModel};
use crate::model::table::{HorizonProbability, lookup_outcome};
use crate::pipeline::stage1_covariates::validate_covariates;
use crate::pipeline::stage2_score::{ScoreBreakdown, compute_score};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Prediction {
    Tabulated {
        horizons: Vec<HorizonProbability>,
    },
    Logistic {
        log_odds: f64,
        probability: f64,
        complement: f64,
    },
    OutOfRange(OutOfRange),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeEvaluation {
    pub id: String,
    pub label: String,
    pub risk_label: String,
    pub complement_label: Option<String>,
    pub score: ScoreBreakdown,
    pub prediction: Prediction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub instrument: String,
    pub name: String,
    pub covariates: CovariateSet,
    pub outcomes: Vec<OutcomeEvaluation>,
}

/// Scores every outcome of `instrument`. Covariates are checked against the
/// instrument's declared domains first.
pub fn evaluate(instrument: &Instrument, covariates: &CovariateSet) -> Result<Evaluation, RiskError> {
    let covariates = validate_covariates(instrument, covariates)?;
    let mut outcomes = Vec::with_capacity(instrument.outcomes.len());
    for outcome in &instrument.outcomes {
        outcomes.push(evaluate_outcome(outcome, &covariates)?);
    }
    Ok(Evaluation {
        instrument: instrument.id.clone(),
        name: instrument.name.clone(),
        covariates,
        outcomes,
    })
}

pub fn evaluate_outcome(
    outcome: &OutcomeDef,
    covariates: &CovariateSet,
) -> Result<OutcomeEvaluation, RiskError> {
    let score = compute_score(&outcome.rules, covariates)?;
    let prediction = predict(outcome, score.total)?;
    if let Prediction::OutOfRange(err) = &prediction {
        tracing::warn!(outcome = %outcome.id, "{err}");
    } else {
        tracing::debug!(outcome = %outcome.id, score = score.total, "outcome evaluated");
    }
    Ok(OutcomeEvaluation {
        id: outcome.id.clone(),
        label: outcome.label.clone(),
        risk_label: outcome.risk_label.clone(),
        complement_label: outcome.complement_label.clone(),
        score,
        prediction,
    })
}

fn predict(outcome: &OutcomeDef, score: f64) -> Result<Prediction, ConfigError> {
    match &outcome.model {
        OutcomeModel::Table { table } => Ok(match lookup_outcome(score, table) {
            Ok(row) => Prediction::Tabulated {
                horizons: row.horizons,
            },
            Err(out_of_range) => Prediction::OutOfRange(out_of_range),
        }),
        OutcomeModel::Logistic { logistic } => {
            let probability = logistic.predict(score);
            Ok(Prediction::Logistic {
                log_odds: logistic.log_odds(score),
                probability,
                complement: 1.0 - probability,
            })
        }
        OutcomeModel::ExternalTable { .. } => Err(ConfigError::UnresolvedTable {
            outcome: outcome.id.clone(),
        }),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveValue {
    pub label: String,
    pub risk_pct: f64,
    pub complement_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurvePoint {
    pub score: f64,
    pub values: Vec<CurveValue>,
}

/// Widest logistic score domain a reference curve is rendered for.
pub const MAX_CURVE_SPAN: i64 = 100_000;

/// Score -> probability pairs over the whole domain of an outcome: every
/// table row, or every integer score the rules can produce.
pub fn reference_curve(
    instrument: &Instrument,
    outcome: &OutcomeDef,
) -> Result<Vec<CurvePoint>, RiskError> {
    match &outcome.model {
        OutcomeModel::Table { table } => Ok(table
            .rows()
            .map(|row| CurvePoint {
                score: row.score as f64,
                values: row
                    .horizons
                    .into_iter()
                    .map(|h| CurveValue {
                        label: h.label,
                        risk_pct: h.risk.as_f64(),
                        complement_pct: h.complement.as_f64(),
                    })
                    .collect(),
            })
            .collect()),
        OutcomeModel::Logistic { logistic } => {
            let (lo, hi) = outcome.score_domain(&instrument.covariates)?;
            let (lo, hi) = (lo.floor(), hi.ceil());
            if !lo.is_finite() || !hi.is_finite() || hi - lo > MAX_CURVE_SPAN as f64 {
                return Err(ConfigError::Invalid {
                    instrument: instrument.id.clone(),
                    reason: format!(
                        "outcome '{}': score domain [{lo}, {hi}] is too wide for a reference curve \
                         (at most {MAX_CURVE_SPAN} integer steps)",
                        outcome.id
                    ),
                }
                .into());
            }
            let (lo, hi) = (lo as i64, hi as i64);
            Ok((lo..=hi)
                .map(|s| {
                    let p = logistic.predict(s as f64);
                    CurvePoint {
                        score: s as f64,
                        values: vec![CurveValue {
                            label: outcome.risk_label.clone(),
                            risk_pct: p * 100.0,
                            complement_pct: (1.0 - p) * 100.0,
                        }],
                    }
                })
                .collect())
        }
        OutcomeModel::ExternalTable { .. } => Err(ConfigError::UnresolvedTable {
            outcome: outcome.id.clone(),
        }
        .into()),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_outcome.rs"]
mod tests;
