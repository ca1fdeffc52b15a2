use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, RuleError};
use crate::model::covariates::CovariateSpec;
use crate::model::logistic::LogisticModel;
use crate::model::rules::ScoreRule;
use crate::model::table::ScoreTable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableColumn {
    pub column: String,
    pub label: String,
}

/// Where an outcome table lives when it is not embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSource {
    pub default_path: PathBuf,
    pub score_column: String,
    pub columns: Vec<TableColumn>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum OutcomeModel {
    Table { table: ScoreTable },
    ExternalTable { source: TableSource },
    Logistic { logistic: LogisticModel },
}

impl OutcomeModel {
    pub fn kind(&self) -> &'static str {
        match self {
            OutcomeModel::Table { .. } => "table",
            OutcomeModel::ExternalTable { .. } => "external table",
            OutcomeModel::Logistic { .. } => "logistic",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeDef {
    pub id: String,
    pub label: String,
    pub risk_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complement_label: Option<String>,
    pub rules: Vec<ScoreRule>,
    pub model: OutcomeModel,
}

impl OutcomeDef {
    /// Smallest and largest attainable score over the covariate domains.
    pub fn score_domain(&self, specs: &[CovariateSpec]) -> Result<(f64, f64), RuleError> {
        let mut lo = 0.0;
        let mut hi = 0.0;
        for rule in &self.rules {
            let (a, b) = rule.contribution_range(specs)?;
            lo += a;
            hi += b;
        }
        Ok((lo, hi))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub covariates: Vec<CovariateSpec>,
    pub outcomes: Vec<OutcomeDef>,
}

impl Instrument {
    pub fn covariate(&self, name: &str) -> Option<&CovariateSpec> {
        self.covariates.iter().find(|c| c.name == name)
    }

    pub fn outcome(&self, id: &str) -> Result<&OutcomeDef, ConfigError> {
        self.outcomes
            .iter()
            .find(|o| o.id == id)
            .ok_or_else(|| ConfigError::UnknownOutcome {
                instrument: self.id.clone(),
                outcome: id.to_string(),
            })
    }

    pub fn needs_external_table(&self) -> bool {
        self.external_table_count() > 0
    }

    pub fn external_table_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.model, OutcomeModel::ExternalTable { .. }))
            .count()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id.trim().is_empty() {
            return Err(self.invalid("empty instrument id"));
        }
        if self.outcomes.is_empty() {
            return Err(self.invalid("no outcomes defined"));
        }

        let mut names = BTreeSet::new();
        for spec in &self.covariates {
            if !names.insert(spec.name.as_str()) {
                return Err(self.invalid(format!("covariate '{}' declared twice", spec.name)));
            }
        }

        let mut ids = BTreeSet::new();
        for outcome in &self.outcomes {
            if !ids.insert(outcome.id.as_str()) {
                return Err(self.invalid(format!("outcome '{}' declared twice", outcome.id)));
            }
            if outcome.rules.is_empty() {
                return Err(self.invalid(format!("outcome '{}' has no rules", outcome.id)));
            }
            for rule in &outcome.rules {
                rule.validate(&self.covariates)
                    .map_err(|source| ConfigError::Rule {
                        instrument: self.id.clone(),
                        outcome: outcome.id.clone(),
                        source,
                    })?;
            }
            match &outcome.model {
                OutcomeModel::Table { table } => table
                    .validate()
                    .map_err(|e| self.invalid(format!("outcome '{}': {e}", outcome.id)))?,
                OutcomeModel::ExternalTable { source } => {
                    if source.columns.is_empty() {
                        return Err(self.invalid(format!(
                            "outcome '{}': external table has no columns",
                            outcome.id
                        )));
                    }
                }
                OutcomeModel::Logistic { logistic } => {
                    if !logistic.coefficient.is_finite() || !logistic.intercept.is_finite() {
                        return Err(self.invalid(format!(
                            "outcome '{}': logistic parameters must be finite",
                            outcome.id
                        )));
                    }
                }
            }
        }

        for spec in &self.covariates {
            let used = self
                .outcomes
                .iter()
                .flat_map(|o| o.rules.iter())
                .any(|r| r.fields().contains(&spec.name.as_str()));
            if !used {
                tracing::warn!(
                    instrument = %self.id,
                    covariate = %spec.name,
                    "covariate is declared but no rule uses it"
                );
            }
        }

        Ok(())
    }

    fn invalid(&self, reason: impl Into<String>) -> ConfigError {
        ConfigError::Invalid {
            instrument: self.id.clone(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/instrument.rs"]
mod tests;
