use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CovariateError {
    #[error("unknown covariate '{0}'")]
    Unknown(String),
    #[error("missing covariate '{0}'")]
    Missing(String),
    #[error("covariate '{0}' given more than once")]
    Duplicate(String),
    #[error("malformed assignment '{0}' (expected NAME=VALUE)")]
    MalformedAssignment(String),
    #[error("invalid value '{value}' for covariate '{name}': {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },
}

impl CovariateError {
    pub fn invalid(name: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        CovariateError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rule references undeclared covariate '{0}'")]
    UndeclaredCovariate(String),
    #[error("covariate '{name}' is {found}, rule expects {expected}")]
    KindMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("ordinal rule for '{name}' has no weight for level {level}")]
    UnmappedLevel { name: String, level: i64 },
    #[error("joint rule for '{first}'/'{second}' has no weight for ({a}, {b})")]
    UnmappedCombination {
        first: String,
        second: String,
        a: String,
        b: String,
    },
    #[error("rule for '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("score table has no rows")]
    Empty,
    #[error("score table has no probability columns")]
    NoHorizons,
    #[error("column '{label}' has {found} rows, expected {expected}")]
    RaggedColumn {
        label: String,
        expected: usize,
        found: usize,
    },
    #[error("column '{label}' decreases at score {score}")]
    NonMonotonic { label: String, score: i64 },
    #[error("column '{label}' has value {value} at score {score}, outside [0, 100]")]
    ValueOutOfBounds {
        label: String,
        score: i64,
        value: f64,
    },
    #[error("score keys are not contiguous: expected {expected}, found {found}")]
    NonContiguous { expected: i64, found: i64 },
    #[error("score key {0} is not an integer")]
    NonIntegralKey(f64),
    #[error("score key {0} is outside the representable range")]
    KeyOutOfRange(f64),
    #[error("{rows} rows starting at score {min_score} overflow the score range")]
    ScoreOverflow { min_score: i64, rows: usize },
    #[error("column '{label}': {source}")]
    InvalidProbability {
        label: String,
        #[source]
        source: crate::model::probability::PercentError,
    },
    #[error("missing column '{0}'")]
    MissingColumn(String),
    #[error("line {line}: {reason}")]
    Parse { line: u64, reason: String },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A score with no row in the table it was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Error, serde::Serialize)]
#[error("score {score} has no entry in table [{min}, {max}]")]
pub struct OutOfRange {
    pub score: f64,
    pub min: i64,
    pub max: i64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown instrument '{0}' (see `list`)")]
    UnknownInstrument(String),
    #[error("instrument '{instrument}' has no outcome '{outcome}'")]
    UnknownOutcome { instrument: String, outcome: String },
    #[error("instrument '{instrument}': {reason}")]
    Invalid { instrument: String, reason: String },
    #[error("instrument '{instrument}', outcome '{outcome}': {source}")]
    Rule {
        instrument: String,
        outcome: String,
        #[source]
        source: RuleError,
    },
    #[error("outcome '{outcome}' needs an external table; pass --table")]
    UnresolvedTable { outcome: String },
    #[error("failed to load table {path}: {source}")]
    Table {
        path: PathBuf,
        #[source]
        source: TableError,
    },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed instrument definition: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum RiskError {
    #[error(transparent)]
    Covariate(#[from] CovariateError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Rule(#[from] RuleError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
