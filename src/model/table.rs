use serde::{Deserialize, Serialize};

use crate::error::{OutOfRange, TableError};
use crate::model::probability::{Percent, PercentError, is_three_decimal};

/// One probability column of a score table, e.g. "3-year".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Horizon {
    pub label: String,
    pub values: Vec<Percent>,
}

impl Horizon {
    pub fn new(label: &str, values: Vec<Percent>) -> Self {
        Self {
            label: label.to_string(),
            values,
        }
    }

    pub fn from_literals(label: &str, values: &[f64]) -> Self {
        Self::new(label, values.iter().map(|&v| Percent::from_literal(v)).collect())
    }

    /// Converts percentages read from a definition file. Also returns how
    /// many values carried more than three decimals and were rounded.
    pub fn from_percents(label: &str, values: &[f64]) -> Result<(Self, usize), PercentError> {
        let mut rounded = 0;
        let mut out = Vec::with_capacity(values.len());
        for &v in values {
            if !is_three_decimal(v) {
                rounded += 1;
            }
            out.push(Percent::from_percent(v)?);
        }
        Ok((Self::new(label, out), rounded))
    }
}

/// Score -> probability table over contiguous integer scores starting at
/// `min_score`. Row `i` holds the probabilities for score `min_score + i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawScoreTable")]
pub struct ScoreTable {
    min_score: i64,
    horizons: Vec<Horizon>,
}

#[derive(Deserialize)]
struct RawScoreTable {
    min_score: i64,
    horizons: Vec<RawHorizon>,
}

#[derive(Deserialize)]
struct RawHorizon {
    label: String,
    values: Vec<f64>,
}

impl TryFrom<RawScoreTable> for ScoreTable {
    type Error = TableError;

    fn try_from(raw: RawScoreTable) -> Result<Self, Self::Error> {
        let mut rounded = 0;
        let mut horizons = Vec::with_capacity(raw.horizons.len());
        for h in raw.horizons {
            let (horizon, n) = Horizon::from_percents(&h.label, &h.values).map_err(|source| {
                TableError::InvalidProbability {
                    label: h.label.clone(),
                    source,
                }
            })?;
            rounded += n;
            horizons.push(horizon);
        }
        warn_rounded(rounded);
        ScoreTable::new(raw.min_score, horizons)
    }
}

/// Logs once per table when probabilities lost digits on load.
pub(crate) fn warn_rounded(rounded: usize) {
    if rounded > 0 {
        tracing::warn!(
            values = rounded,
            "probabilities with more than three decimals were rounded"
        );
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HorizonProbability {
    pub label: String,
    pub risk: Percent,
    pub complement: Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub score: i64,
    pub horizons: Vec<HorizonProbability>,
}

impl ScoreTable {
    pub fn new(min_score: i64, horizons: Vec<Horizon>) -> Result<Self, TableError> {
        let table = Self::from_trusted(min_score, horizons);
        table.validate()?;
        Ok(table)
    }

    /// Builds a table from rows keyed by score. Rows may come in any order
    /// but must cover a contiguous range exactly once.
    pub fn from_rows(
        labels: &[String],
        mut rows: Vec<(i64, Vec<Percent>)>,
    ) -> Result<Self, TableError> {
        rows.sort_by_key(|(score, _)| *score);
        let Some(&(min_score, _)) = rows.first() else {
            return Err(TableError::Empty);
        };
        let mut horizons: Vec<Horizon> = labels
            .iter()
            .map(|l| Horizon::new(l, Vec::with_capacity(rows.len())))
            .collect();
        for (i, (score, values)) in rows.into_iter().enumerate() {
            let expected = min_score
                .checked_add(i as i64)
                .ok_or(TableError::ScoreOverflow {
                    min_score,
                    rows: i + 1,
                })?;
            if score != expected {
                return Err(TableError::NonContiguous {
                    expected,
                    found: score,
                });
            }
            if values.len() != horizons.len() {
                return Err(TableError::Parse {
                    line: i as u64 + 1,
                    reason: format!("expected {} values, found {}", horizons.len(), values.len()),
                });
            }
            for (h, v) in horizons.iter_mut().zip(values) {
                h.values.push(v);
            }
        }
        Self::new(min_score, horizons)
    }

    /// Skips validation; used for embedded literal tables.
    pub(crate) fn from_trusted(min_score: i64, horizons: Vec<Horizon>) -> Self {
        Self {
            min_score,
            horizons,
        }
    }

    pub fn validate(&self) -> Result<(), TableError> {
        let Some(first) = self.horizons.first() else {
            return Err(TableError::NoHorizons);
        };
        let n = first.values.len();
        if n == 0 {
            return Err(TableError::Empty);
        }
        if i64::try_from(n - 1)
            .ok()
            .and_then(|span| self.min_score.checked_add(span))
            .is_none()
        {
            return Err(TableError::ScoreOverflow {
                min_score: self.min_score,
                rows: n,
            });
        }
        for h in &self.horizons {
            if h.values.len() != n {
                return Err(TableError::RaggedColumn {
                    label: h.label.clone(),
                    expected: n,
                    found: h.values.len(),
                });
            }
            for (i, v) in h.values.iter().enumerate() {
                if *v < Percent::ZERO || *v > Percent::HUNDRED {
                    return Err(TableError::ValueOutOfBounds {
                        label: h.label.clone(),
                        score: self.min_score + i as i64,
                        value: v.as_f64(),
                    });
                }
            }
            for (i, pair) in h.values.windows(2).enumerate() {
                if pair[1] < pair[0] {
                    return Err(TableError::NonMonotonic {
                        label: h.label.clone(),
                        score: self.min_score + i as i64 + 1,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn min_score(&self) -> i64 {
        self.min_score
    }

    pub fn max_score(&self) -> i64 {
        self.min_score + (self.len() as i64 - 1)
    }

    pub fn len(&self) -> usize {
        self.horizons.first().map_or(0, |h| h.values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn horizons(&self) -> &[Horizon] {
        &self.horizons
    }

    /// Exact-match lookup. Non-integral scores and scores outside the table
    /// never match; nothing is interpolated or clamped.
    pub fn lookup(&self, score: f64) -> Result<TableRow, OutOfRange> {
        let out_of_range = OutOfRange {
            score,
            min: self.min_score,
            max: self.max_score(),
        };
        if !score.is_finite() || score.fract() != 0.0 {
            return Err(out_of_range);
        }
        if score < self.min_score as f64 || score > self.max_score() as f64 {
            return Err(out_of_range);
        }
        let key = score as i64;
        Ok(self.row((key - self.min_score) as usize))
    }

    pub fn rows(&self) -> impl Iterator<Item = TableRow> + '_ {
        (0..self.len()).map(|i| self.row(i))
    }

    fn row(&self, idx: usize) -> TableRow {
        TableRow {
            score: self.min_score + idx as i64,
            horizons: self
                .horizons
                .iter()
                .map(|h| HorizonProbability {
                    label: h.label.clone(),
                    risk: h.values[idx],
                    complement: h.values[idx].complement(),
                })
                .collect(),
        }
    }
}

pub fn lookup_outcome(score: f64, table: &ScoreTable) -> Result<TableRow, OutOfRange> {
    table.lookup(score)
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/table.rs"]
mod tests;
