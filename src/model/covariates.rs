use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CovariateError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CovariateKind {
    Ordinal { levels: Vec<i64> },
    Binary,
    Numeric { min: f64, max: f64, integer: bool },
    Categorical { levels: Vec<String> },
}

impl CovariateKind {
    pub fn name(&self) -> &'static str {
        match self {
            CovariateKind::Ordinal { .. } => "ordinal",
            CovariateKind::Binary => "binary",
            CovariateKind::Numeric { .. } => "numeric",
            CovariateKind::Categorical { .. } => "categorical",
        }
    }

    pub fn domain(&self) -> String {
        match self {
            CovariateKind::Ordinal { levels } => {
                let parts: Vec<String> = levels.iter().map(|l| l.to_string()).collect();
                format!("{{{}}}", parts.join(", "))
            }
            CovariateKind::Binary => "{no, yes}".to_string(),
            CovariateKind::Numeric { min, max, integer } => {
                if *integer {
                    format!("integer in [{min}, {max}]")
                } else {
                    format!("[{min}, {max}]")
                }
            }
            CovariateKind::Categorical { levels } => format!("{{{}}}", levels.join(", ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CovariateSpec {
    pub name: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: CovariateKind,
}

impl CovariateSpec {
    pub fn ordinal(name: &str, label: &str, levels: &[i64]) -> Self {
        Self::new(
            name,
            label,
            CovariateKind::Ordinal {
                levels: levels.to_vec(),
            },
        )
    }

    pub fn binary(name: &str, label: &str) -> Self {
        Self::new(name, label, CovariateKind::Binary)
    }

    pub fn numeric(name: &str, label: &str, min: f64, max: f64) -> Self {
        Self::new(
            name,
            label,
            CovariateKind::Numeric {
                min,
                max,
                integer: false,
            },
        )
    }

    pub fn integer(name: &str, label: &str, min: i64, max: i64) -> Self {
        Self::new(
            name,
            label,
            CovariateKind::Numeric {
                min: min as f64,
                max: max as f64,
                integer: true,
            },
        )
    }

    pub fn categorical(name: &str, label: &str, levels: &[&str]) -> Self {
        Self::new(
            name,
            label,
            CovariateKind::Categorical {
                levels: levels.iter().map(|s| s.to_string()).collect(),
            },
        )
    }

    fn new(name: &str, label: &str, kind: CovariateKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
        }
    }

    /// Parses raw user text into a value of this covariate's kind.
    pub fn parse(&self, raw: &str) -> Result<CovariateValue, CovariateError> {
        let text = raw.trim();
        let candidate = match &self.kind {
            CovariateKind::Ordinal { .. } => CovariateValue::Level(
                text.parse::<i64>()
                    .map_err(|_| CovariateError::invalid(&self.name, raw, "expected an integer level"))?,
            ),
            CovariateKind::Binary => CovariateValue::Flag(parse_flag(text).ok_or_else(|| {
                CovariateError::invalid(&self.name, raw, "expected yes/no")
            })?),
            CovariateKind::Numeric { .. } => CovariateValue::Number(
                text.parse::<f64>()
                    .map_err(|_| CovariateError::invalid(&self.name, raw, "expected a number"))?,
            ),
            CovariateKind::Categorical { .. } => CovariateValue::Category(text.to_string()),
        };
        self.coerce(&candidate)
    }

    /// Checks `value` against the declared domain and returns its canonical form.
    pub fn coerce(&self, value: &CovariateValue) -> Result<CovariateValue, CovariateError> {
        match (&self.kind, value) {
            (CovariateKind::Ordinal { levels }, v) => {
                let level = v.as_level().ok_or_else(|| {
                    CovariateError::invalid(&self.name, v, "expected an integer level")
                })?;
                if !levels.contains(&level) {
                    return Err(CovariateError::invalid(
                        &self.name,
                        v,
                        format!("level must be one of {}", self.kind.domain()),
                    ));
                }
                Ok(CovariateValue::Level(level))
            }
            (CovariateKind::Binary, CovariateValue::Flag(flag)) => Ok(CovariateValue::Flag(*flag)),
            (CovariateKind::Numeric { min, max, integer }, v) => {
                let x = v
                    .as_f64()
                    .ok_or_else(|| CovariateError::invalid(&self.name, v, "expected a number"))?;
                if !x.is_finite() {
                    return Err(CovariateError::invalid(&self.name, v, "not a finite number"));
                }
                if *integer && x.fract() != 0.0 {
                    return Err(CovariateError::invalid(&self.name, v, "expected an integer"));
                }
                if x < *min || x > *max {
                    return Err(CovariateError::invalid(
                        &self.name,
                        v,
                        format!("must be within {}", self.kind.domain()),
                    ));
                }
                Ok(CovariateValue::Number(x))
            }
            (CovariateKind::Categorical { levels }, CovariateValue::Category(c)) => levels
                .iter()
                .find(|level| level.eq_ignore_ascii_case(c.trim()))
                .map(|level| CovariateValue::Category(level.clone()))
                .ok_or_else(|| {
                    CovariateError::invalid(
                        &self.name,
                        c,
                        format!("must be one of {}", self.kind.domain()),
                    )
                }),
            (kind, v) => Err(CovariateError::invalid(
                &self.name,
                v,
                format!("expected a {} value", kind.name()),
            )),
        }
    }
}

fn parse_flag(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Some(true),
        "no" | "n" | "false" | "0" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CovariateValue {
    Level(i64),
    Flag(bool),
    Number(f64),
    Category(String),
}

impl CovariateValue {
    pub fn as_level(&self) -> Option<i64> {
        match self {
            CovariateValue::Level(l) => Some(*l),
            CovariateValue::Number(x) if x.fract() == 0.0 => Some(*x as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CovariateValue::Level(l) => Some(*l as f64),
            CovariateValue::Number(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            CovariateValue::Flag(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_category(&self) -> Option<&str> {
        match self {
            CovariateValue::Category(c) => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for CovariateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CovariateValue::Level(l) => write!(f, "{l}"),
            CovariateValue::Flag(true) => f.write_str("yes"),
            CovariateValue::Flag(false) => f.write_str("no"),
            CovariateValue::Number(x) => write!(f, "{x}"),
            CovariateValue::Category(c) => f.write_str(c),
        }
    }
}

impl From<i64> for CovariateValue {
    fn from(value: i64) -> Self {
        CovariateValue::Level(value)
    }
}

impl From<bool> for CovariateValue {
    fn from(value: bool) -> Self {
        CovariateValue::Flag(value)
    }
}

impl From<f64> for CovariateValue {
    fn from(value: f64) -> Self {
        CovariateValue::Number(value)
    }
}

impl From<&str> for CovariateValue {
    fn from(value: &str) -> Self {
        CovariateValue::Category(value.to_string())
    }
}

/// Named inputs for one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CovariateSet {
    values: BTreeMap<String, CovariateValue>,
}

impl CovariateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<CovariateValue>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    pub fn insert(&mut self, name: String, value: CovariateValue) -> Option<CovariateValue> {
        self.values.insert(name, value)
    }

    pub fn get(&self, name: &str) -> Option<&CovariateValue> {
        self.values.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CovariateValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/covariates.rs"]
mod tests;
