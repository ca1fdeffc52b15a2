pub mod eoe;
pub mod hcc;

use std::path::Path;
use std::sync::OnceLock;

use crate::error::ConfigError;
use crate::input::config::load_instruments;
use crate::input::tables::load_table;
use crate::model::instrument::{Instrument, OutcomeModel};

static BUILTIN: OnceLock<Vec<Instrument>> = OnceLock::new();

pub fn builtin_instruments() -> &'static [Instrument] {
    BUILTIN.get_or_init(|| {
        vec![
            hcc::dfs(),
            hcc::os(),
            hcc::recmet(),
            eoe::classic(),
            eoe::remodeling(),
        ]
    })
}

pub fn find_builtin(id: &str) -> Option<&'static Instrument> {
    builtin_instruments().iter().find(|i| i.id == id)
}

/// Looks `id` up in the optional definitions file first, then in the
/// built-in registry.
pub fn find_instrument(id: &str, config: Option<&Path>) -> Result<Instrument, ConfigError> {
    if let Some(path) = config {
        let loaded = load_instruments(path)?;
        tracing::info!(
            path = %path.display(),
            count = loaded.len(),
            "loaded instrument definitions"
        );
        if let Some(instrument) = loaded.into_iter().find(|i| i.id == id) {
            return Ok(instrument);
        }
    }
    find_builtin(id)
        .cloned()
        .ok_or_else(|| ConfigError::UnknownInstrument(id.to_string()))
}

/// [`find_instrument`] followed by loading any external tables it needs.
pub fn resolve_instrument(
    id: &str,
    config: Option<&Path>,
    table: Option<&Path>,
) -> Result<Instrument, ConfigError> {
    attach_external_tables(find_instrument(id, config)?, table)
}

/// Replaces every external table reference with the loaded table. `table`
/// overrides the path declared by the instrument.
pub fn attach_external_tables(
    mut instrument: Instrument,
    table: Option<&Path>,
) -> Result<Instrument, ConfigError> {
    if let Some(path) = table {
        match instrument.external_table_count() {
            0 => tracing::warn!(
                instrument = %instrument.id,
                path = %path.display(),
                "instrument has no external table; --table is ignored"
            ),
            1 => {}
            n => tracing::warn!(
                instrument = %instrument.id,
                path = %path.display(),
                outcomes = n,
                "the same --table is used for every external-table outcome"
            ),
        }
    }
    for outcome in &mut instrument.outcomes {
        let OutcomeModel::ExternalTable { source } = &outcome.model else {
            continue;
        };
        let path = table.unwrap_or(source.default_path.as_path());
        if !path.exists() {
            if table.is_none() {
                tracing::warn!(
                    outcome = %outcome.id,
                    path = %path.display(),
                    "default probability table not found"
                );
                return Err(ConfigError::UnresolvedTable {
                    outcome: outcome.id.clone(),
                });
            }
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
            });
        }
        let loaded = load_table(source, path).map_err(|source| ConfigError::Table {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(
            outcome = %outcome.id,
            path = %path.display(),
            min_score = loaded.min_score(),
            max_score = loaded.max_score(),
            "loaded probability table"
        );
        outcome.model = OutcomeModel::Table { table: loaded };
    }
    Ok(instrument)
}

#[cfg(test)]
#[path = "../../tests/src_inline/instruments/mod.rs"]
mod tests;
