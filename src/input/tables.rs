use std::path::Path;

use crate::error::TableError;
use crate::input::{effective_extension, open_maybe_gz};
use crate::model::instrument::TableSource;
use crate::model::probability::{Percent, is_three_decimal};
use crate::model::table::{ScoreTable, warn_rounded};

/// Largest magnitude at which every integer is exactly representable in `f64`.
const MAX_EXACT_KEY: f64 = 9_007_199_254_740_992.0;

/// Loads a score -> probability table from a delimited text file.
/// `.tsv`/`.txt` files are tab separated, everything else comma separated.
pub fn load_table(source: &TableSource, path: &Path) -> Result<ScoreTable, TableError> {
    let delimiter = match effective_extension(path).as_deref() {
        Some("tsv") | Some("txt") => b'\t',
        _ => b',',
    };
    let reader = open_maybe_gz(path)?;
    read_table(source, reader, delimiter)
}

pub fn read_table<R: std::io::Read>(
    source: &TableSource,
    reader: R,
    delimiter: u8,
) -> Result<ScoreTable, TableError> {
    let mut csv = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv.headers()?.clone();
    let column_index = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    };
    let score_idx = column_index(&source.score_column)?;
    let value_idx = source
        .columns
        .iter()
        .map(|c| column_index(&c.column))
        .collect::<Result<Vec<_>, _>>()?;

    let mut rows = Vec::new();
    let mut rounded = 0usize;
    for record in csv.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        let score = parse_field(&record, score_idx, line)?;
        if score.fract() != 0.0 {
            return Err(TableError::NonIntegralKey(score));
        }
        if score.abs() > MAX_EXACT_KEY {
            return Err(TableError::KeyOutOfRange(score));
        }
        let mut values = Vec::with_capacity(value_idx.len());
        for &idx in &value_idx {
            let raw = parse_field(&record, idx, line)?;
            if !is_three_decimal(raw) {
                rounded += 1;
            }
            let pct = Percent::from_percent(raw).map_err(|e| TableError::Parse {
                line,
                reason: e.to_string(),
            })?;
            values.push(pct);
        }
        rows.push((score as i64, values));
    }

    warn_rounded(rounded);

    let labels: Vec<String> = source.columns.iter().map(|c| c.label.clone()).collect();
    ScoreTable::from_rows(&labels, rows)
}

fn parse_field(record: &csv::StringRecord, idx: usize, line: u64) -> Result<f64, TableError> {
    let raw = record.get(idx).ok_or_else(|| TableError::Parse {
        line,
        reason: format!("missing field {}", idx + 1),
    })?;
    raw.parse::<f64>().map_err(|_| TableError::Parse {
        line,
        reason: format!("'{raw}' is not a number"),
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tables.rs"]
mod tests;
