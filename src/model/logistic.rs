use serde::{Deserialize, Serialize};

/// Largest `f64` strictly below 1.
const P_MAX: f64 = 1.0 - f64::EPSILON / 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub coefficient: f64,
    pub intercept: f64,
}

impl LogisticModel {
    pub const fn new(coefficient: f64, intercept: f64) -> Self {
        Self {
            coefficient,
            intercept,
        }
    }

    pub fn log_odds(&self, score: f64) -> f64 {
        self.coefficient * score + self.intercept
    }

    pub fn predict(&self, score: f64) -> f64 {
        predict_probability(score, self.coefficient, self.intercept)
    }
}

/// `1 / (1 + exp(-(coefficient * score + intercept)))`, kept inside (0, 1).
pub fn predict_probability(score: f64, coefficient: f64, intercept: f64) -> f64 {
    let z = coefficient * score + intercept;
    let p = if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    };
    p.clamp(f64::MIN_POSITIVE, P_MAX)
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/logistic.rs"]
mod tests;
