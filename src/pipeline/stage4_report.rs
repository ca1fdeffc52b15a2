use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::RiskError;
use crate::model::instrument::Instrument;
use crate::pipeline::stage3_outcome::{Evaluation, reference_curve};
use crate::report::json::render_evaluation_json;
use crate::report::render_curve_tsv;
use crate::report::text::render_report_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

pub fn render_evaluation(
    instrument: &Instrument,
    evaluation: &Evaluation,
    format: ReportFormat,
) -> Result<String, RiskError> {
    match format {
        ReportFormat::Text => Ok(render_report_text(instrument, evaluation)),
        ReportFormat::Json => Ok(render_evaluation_json(evaluation)?),
    }
}

/// Writes `evaluation.json`, `report.txt` and one `curve_<outcome>.tsv`
/// per outcome into `out_dir`. Returns the written paths.
pub fn write_reports(
    instrument: &Instrument,
    evaluation: &Evaluation,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, RiskError> {
    fs::create_dir_all(out_dir)?;
    let mut written = Vec::new();

    let json_path = out_dir.join("evaluation.json");
    write_text(&json_path, &render_evaluation_json(evaluation)?)?;
    written.push(json_path);

    let report_path = out_dir.join("report.txt");
    write_text(&report_path, &render_report_text(instrument, evaluation))?;
    written.push(report_path);

    for outcome in &evaluation.outcomes {
        let def = instrument.outcome(&outcome.id)?;
        let points = reference_curve(instrument, def)?;
        let curve_path = out_dir.join(format!("curve_{}.tsv", outcome.id));
        write_text(
            &curve_path,
            &render_curve_tsv(&points, Some(outcome.score.total)),
        )?;
        written.push(curve_path);
    }

    for path in &written {
        tracing::info!(path = %path.display(), "wrote report");
    }
    Ok(written)
}

pub fn write_text(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(contents.as_bytes())?;
    w.flush()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_report.rs"]
mod tests;
