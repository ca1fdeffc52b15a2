use serde::{Deserialize, Serialize};

use crate::error::{CovariateError, RuleError};
use crate::model::covariates::{CovariateKind, CovariateSet, CovariateSpec, CovariateValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    #[default]
    HalfAwayFromZero,
    HalfToEven,
}

impl RoundingMode {
    pub fn apply(self, x: f64) -> f64 {
        match self {
            RoundingMode::HalfAwayFromZero => x.round(),
            RoundingMode::HalfToEven => x.round_ties_even(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdinalWeight {
    pub level: i64,
    pub weight: f64,
}

/// Half-open interval `[lower, next.lower)`; the last bucket is unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub lower: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointCell {
    pub first: String,
    pub second: String,
    pub weight: f64,
}

/// One additive term of a risk score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ScoreRule {
    Ordinal {
        field: String,
        weights: Vec<OrdinalWeight>,
    },
    Flag {
        field: String,
        weight: f64,
    },
    Buckets {
        field: String,
        buckets: Vec<Bucket>,
    },
    /// `multiplier * round(x / divisor)`
    ScaledRound {
        field: String,
        divisor: f64,
        multiplier: f64,
        #[serde(default)]
        rounding: RoundingMode,
    },
    /// `multiplier * (x / divisor)`
    Linear {
        field: String,
        divisor: f64,
        multiplier: f64,
    },
    /// `min(floor(x / step), cap) * weight`
    CappedStep {
        field: String,
        step: f64,
        cap: f64,
        weight: f64,
    },
    Joint {
        first: String,
        second: String,
        cells: Vec<JointCell>,
    },
}

impl ScoreRule {
    pub fn ordinal(field: &str, weights: &[(i64, f64)]) -> Self {
        ScoreRule::Ordinal {
            field: field.to_string(),
            weights: weights
                .iter()
                .map(|&(level, weight)| OrdinalWeight { level, weight })
                .collect(),
        }
    }

    pub fn flag(field: &str, weight: f64) -> Self {
        ScoreRule::Flag {
            field: field.to_string(),
            weight,
        }
    }

    pub fn buckets(field: &str, buckets: &[(f64, f64)]) -> Self {
        ScoreRule::Buckets {
            field: field.to_string(),
            buckets: buckets
                .iter()
                .map(|&(lower, weight)| Bucket { lower, weight })
                .collect(),
        }
    }

    pub fn scaled_round(field: &str, divisor: f64, multiplier: f64) -> Self {
        ScoreRule::ScaledRound {
            field: field.to_string(),
            divisor,
            multiplier,
            rounding: RoundingMode::HalfAwayFromZero,
        }
    }

    pub fn linear(field: &str, divisor: f64, multiplier: f64) -> Self {
        ScoreRule::Linear {
            field: field.to_string(),
            divisor,
            multiplier,
        }
    }

    pub fn capped_step(field: &str, step: f64, cap: f64, weight: f64) -> Self {
        ScoreRule::CappedStep {
            field: field.to_string(),
            step,
            cap,
            weight,
        }
    }

    pub fn joint(first: &str, second: &str, cells: &[(&str, &str, f64)]) -> Self {
        ScoreRule::Joint {
            first: first.to_string(),
            second: second.to_string(),
            cells: cells
                .iter()
                .map(|&(a, b, weight)| JointCell {
                    first: a.to_string(),
                    second: b.to_string(),
                    weight,
                })
                .collect(),
        }
    }

    /// Display name of the term, e.g. `who_grade` or `hepar/gpc`.
    pub fn label(&self) -> String {
        match self {
            ScoreRule::Joint { first, second, .. } => format!("{first}/{second}"),
            ScoreRule::Ordinal { field, .. }
            | ScoreRule::Flag { field, .. }
            | ScoreRule::Buckets { field, .. }
            | ScoreRule::ScaledRound { field, .. }
            | ScoreRule::Linear { field, .. }
            | ScoreRule::CappedStep { field, .. } => field.clone(),
        }
    }

    pub fn fields(&self) -> Vec<&str> {
        match self {
            ScoreRule::Joint { first, second, .. } => vec![first.as_str(), second.as_str()],
            ScoreRule::Ordinal { field, .. }
            | ScoreRule::Flag { field, .. }
            | ScoreRule::Buckets { field, .. }
            | ScoreRule::ScaledRound { field, .. }
            | ScoreRule::Linear { field, .. }
            | ScoreRule::CappedStep { field, .. } => vec![field.as_str()],
        }
    }

    pub fn contribution(&self, covariates: &CovariateSet) -> Result<f64, CovariateError> {
        match self {
            ScoreRule::Ordinal { field, weights } => {
                let value = require(covariates, field)?;
                let level = value
                    .as_level()
                    .ok_or_else(|| CovariateError::invalid(field, value, "expected a level"))?;
                ordinal_weight(weights, level)
                    .ok_or_else(|| CovariateError::invalid(field, value, "level has no weight"))
            }
            ScoreRule::Flag { field, weight } => {
                let value = require(covariates, field)?;
                let flag = value
                    .as_flag()
                    .ok_or_else(|| CovariateError::invalid(field, value, "expected yes/no"))?;
                Ok(if flag { *weight } else { 0.0 })
            }
            ScoreRule::Buckets { field, buckets } => {
                let value = require(covariates, field)?;
                let x = number(field, value)?;
                bucket_weight(buckets, x).ok_or_else(|| {
                    CovariateError::invalid(field, value, "below the lowest bucket")
                })
            }
            ScoreRule::ScaledRound {
                field,
                divisor,
                multiplier,
                rounding,
            } => {
                let x = number(field, require(covariates, field)?)?;
                Ok(scaled_round(x, *divisor, *multiplier, *rounding))
            }
            ScoreRule::Linear {
                field,
                divisor,
                multiplier,
            } => {
                let x = number(field, require(covariates, field)?)?;
                Ok(multiplier * (x / divisor))
            }
            ScoreRule::CappedStep {
                field,
                step,
                cap,
                weight,
            } => {
                let x = number(field, require(covariates, field)?)?;
                Ok(capped_step(x, *step, *cap, *weight))
            }
            ScoreRule::Joint {
                first,
                second,
                cells,
            } => {
                let a_value = require(covariates, first)?;
                let b_value = require(covariates, second)?;
                let a = a_value
                    .as_category()
                    .ok_or_else(|| CovariateError::invalid(first, a_value, "expected a category"))?;
                let b = b_value.as_category().ok_or_else(|| {
                    CovariateError::invalid(second, b_value, "expected a category")
                })?;
                joint_weight(cells, a, b).ok_or_else(|| {
                    CovariateError::invalid(
                        &self.label(),
                        format!("{a}/{b}"),
                        "combination has no weight",
                    )
                })
            }
        }
    }

    /// Checks that the rule only refers to declared covariates of a
    /// compatible kind and covers their whole domain.
    pub fn validate(&self, specs: &[CovariateSpec]) -> Result<(), RuleError> {
        match self {
            ScoreRule::Ordinal { field, weights } => {
                let levels = ordinal_levels(specs, field)?;
                for &level in levels {
                    if ordinal_weight(weights, level).is_none() {
                        return Err(RuleError::UnmappedLevel {
                            name: field.clone(),
                            level,
                        });
                    }
                }
                Ok(())
            }
            ScoreRule::Flag { field, .. } => {
                let spec = find_spec(specs, field)?;
                match spec.kind {
                    CovariateKind::Binary => Ok(()),
                    _ => Err(mismatch(spec, "binary")),
                }
            }
            ScoreRule::Buckets { field, buckets } => {
                let (min, _) = numeric_domain(specs, field)?;
                let Some(first) = buckets.first() else {
                    return Err(invalid_param(field, "no buckets"));
                };
                if first.lower > min {
                    return Err(invalid_param(
                        field,
                        format!("lowest bucket starts at {} above domain minimum {min}", first.lower),
                    ));
                }
                for pair in buckets.windows(2) {
                    if !(pair[0].lower < pair[1].lower) {
                        return Err(invalid_param(field, "bucket bounds must strictly ascend"));
                    }
                }
                Ok(())
            }
            ScoreRule::ScaledRound { field, divisor, .. } | ScoreRule::Linear { field, divisor, .. } => {
                numeric_domain(specs, field)?;
                if !divisor.is_finite() || *divisor == 0.0 {
                    return Err(invalid_param(field, "divisor must be finite and non-zero"));
                }
                Ok(())
            }
            ScoreRule::CappedStep { field, step, cap, .. } => {
                numeric_domain(specs, field)?;
                if !step.is_finite() || *step <= 0.0 {
                    return Err(invalid_param(field, "step must be positive"));
                }
                if !cap.is_finite() {
                    return Err(invalid_param(field, "cap must be finite"));
                }
                Ok(())
            }
            ScoreRule::Joint {
                first,
                second,
                cells,
            } => {
                let a_levels = categorical_levels(specs, first)?;
                let b_levels = categorical_levels(specs, second)?;
                for a in a_levels {
                    for b in b_levels {
                        let matches = cells
                            .iter()
                            .filter(|c| c.first == *a && c.second == *b)
                            .count();
                        if matches == 0 {
                            return Err(RuleError::UnmappedCombination {
                                first: first.clone(),
                                second: second.clone(),
                                a: a.clone(),
                                b: b.clone(),
                            });
                        }
                        if matches > 1 {
                            return Err(invalid_param(
                                &self.label(),
                                format!("combination ({a}, {b}) listed {matches} times"),
                            ));
                        }
                    }
                }
                Ok(())
            }
        }
    }

    /// Smallest and largest contribution over the declared covariate domain.
    pub fn contribution_range(&self, specs: &[CovariateSpec]) -> Result<(f64, f64), RuleError> {
        match self {
            ScoreRule::Ordinal { field, weights } => {
                let levels = ordinal_levels(specs, field)?;
                min_max(levels.iter().filter_map(|&l| ordinal_weight(weights, l)))
                    .ok_or_else(|| invalid_param(field, "no weights"))
            }
            ScoreRule::Flag { weight, .. } => Ok((weight.min(0.0), weight.max(0.0))),
            ScoreRule::Buckets { field, buckets } => {
                let (min, max) = numeric_domain(specs, field)?;
                let reachable = buckets.iter().enumerate().filter(|(i, b)| {
                    let upper = buckets.get(i + 1).map_or(f64::INFINITY, |n| n.lower);
                    b.lower <= max && upper > min
                });
                min_max(reachable.map(|(_, b)| b.weight))
                    .ok_or_else(|| invalid_param(field, "no bucket covers the domain"))
            }
            ScoreRule::ScaledRound {
                field,
                divisor,
                multiplier,
                rounding,
            } => {
                let (min, max) = numeric_domain(specs, field)?;
                let ends = [
                    scaled_round(min, *divisor, *multiplier, *rounding),
                    scaled_round(max, *divisor, *multiplier, *rounding),
                ];
                Ok(ordered(ends))
            }
            ScoreRule::Linear {
                field,
                divisor,
                multiplier,
            } => {
                let (min, max) = numeric_domain(specs, field)?;
                Ok(ordered([multiplier * (min / divisor), multiplier * (max / divisor)]))
            }
            ScoreRule::CappedStep {
                field,
                step,
                cap,
                weight,
            } => {
                let (min, max) = numeric_domain(specs, field)?;
                Ok(ordered([
                    capped_step(min, *step, *cap, *weight),
                    capped_step(max, *step, *cap, *weight),
                ]))
            }
            ScoreRule::Joint { cells, .. } => min_max(cells.iter().map(|c| c.weight))
                .ok_or_else(|| invalid_param(&self.label(), "no combinations")),
        }
    }
}

fn scaled_round(x: f64, divisor: f64, multiplier: f64, rounding: RoundingMode) -> f64 {
    multiplier * rounding.apply(x / divisor)
}

fn capped_step(x: f64, step: f64, cap: f64, weight: f64) -> f64 {
    (x / step).floor().min(cap) * weight
}

fn ordinal_weight(weights: &[OrdinalWeight], level: i64) -> Option<f64> {
    weights.iter().find(|w| w.level == level).map(|w| w.weight)
}

fn bucket_weight(buckets: &[Bucket], x: f64) -> Option<f64> {
    buckets
        .iter()
        .take_while(|b| b.lower <= x)
        .last()
        .map(|b| b.weight)
}

fn joint_weight(cells: &[JointCell], a: &str, b: &str) -> Option<f64> {
    cells
        .iter()
        .find(|c| c.first == a && c.second == b)
        .map(|c| c.weight)
}

fn require<'a>(covariates: &'a CovariateSet, field: &str) -> Result<&'a CovariateValue, CovariateError> {
    covariates
        .get(field)
        .ok_or_else(|| CovariateError::Missing(field.to_string()))
}

fn number(field: &str, value: &CovariateValue) -> Result<f64, CovariateError> {
    value
        .as_f64()
        .ok_or_else(|| CovariateError::invalid(field, value, "expected a number"))
}

fn find_spec<'a>(specs: &'a [CovariateSpec], field: &str) -> Result<&'a CovariateSpec, RuleError> {
    specs
        .iter()
        .find(|s| s.name == field)
        .ok_or_else(|| RuleError::UndeclaredCovariate(field.to_string()))
}

fn ordinal_levels<'a>(specs: &'a [CovariateSpec], field: &str) -> Result<&'a [i64], RuleError> {
    let spec = find_spec(specs, field)?;
    match &spec.kind {
        CovariateKind::Ordinal { levels } => Ok(levels),
        _ => Err(mismatch(spec, "ordinal")),
    }
}

fn categorical_levels<'a>(
    specs: &'a [CovariateSpec],
    field: &str,
) -> Result<&'a [String], RuleError> {
    let spec = find_spec(specs, field)?;
    match &spec.kind {
        CovariateKind::Categorical { levels } => Ok(levels),
        _ => Err(mismatch(spec, "categorical")),
    }
}

fn numeric_domain(specs: &[CovariateSpec], field: &str) -> Result<(f64, f64), RuleError> {
    let spec = find_spec(specs, field)?;
    match spec.kind {
        CovariateKind::Numeric { min, max, .. } => Ok((min, max)),
        _ => Err(mismatch(spec, "numeric")),
    }
}

fn mismatch(spec: &CovariateSpec, expected: &'static str) -> RuleError {
    RuleError::KindMismatch {
        name: spec.name.clone(),
        expected,
        found: spec.kind.name(),
    }
}

fn invalid_param(field: &str, reason: impl Into<String>) -> RuleError {
    RuleError::InvalidParameter {
        name: field.to_string(),
        reason: reason.into(),
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

fn ordered([a, b]: [f64; 2]) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/rules.rs"]
mod tests;
