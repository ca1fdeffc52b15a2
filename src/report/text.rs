use std::fmt::Write;

use crate::model::instrument::{Instrument, OutcomeModel};
use crate::model::probability::format_fraction_pct;
use crate::model::rules::{RoundingMode, ScoreRule};
use crate::pipeline::stage3_outcome::{Evaluation, OutcomeEvaluation, Prediction};
use crate::report::{format_points, format_score};

pub const OUT_OF_RANGE: &str = "Score out of range.";

pub fn render_report_text(instrument: &Instrument, evaluation: &Evaluation) -> String {
    let mut out = String::new();

    out.push_str(&evaluation.name);
    out.push('\n');
    out.push_str(&"=".repeat(evaluation.name.chars().count()));
    out.push_str("\n\n");

    out.push_str("Input parameters\n");
    for spec in &instrument.covariates {
        if let Some(value) = evaluation.covariates.get(&spec.name) {
            let _ = writeln!(out, "  {}: {}", spec.label, value);
        }
    }

    for outcome in &evaluation.outcomes {
        out.push('\n');
        render_outcome(&mut out, outcome);
    }

    out
}

fn render_outcome(out: &mut String, outcome: &OutcomeEvaluation) {
    let score = format_score(outcome.score.total);
    match &outcome.prediction {
        Prediction::Tabulated { horizons } => {
            let _ = writeln!(out, "{}", outcome.label);
            let _ = writeln!(out, "Calculated Risk Score: {score}");
            render_contributions(out, outcome);
            for h in horizons {
                let _ = writeln!(
                    out,
                    "Associated {} {} Probability: {}%",
                    h.label, outcome.risk_label, h.risk
                );
            }
            if let Some(complement) = &outcome.complement_label {
                for h in horizons {
                    let _ = writeln!(
                        out,
                        "Associated {} {} Probability: {}%",
                        h.label, complement, h.complement
                    );
                }
            }
        }
        Prediction::Logistic { probability, .. } => {
            let _ = writeln!(
                out,
                "{}: {}% (Score: {score})",
                outcome.risk_label,
                format_fraction_pct(*probability, 2)
            );
            render_contributions(out, outcome);
        }
        Prediction::OutOfRange(err) => {
            let _ = writeln!(out, "{}", outcome.label);
            let _ = writeln!(out, "Calculated Risk Score: {score}");
            render_contributions(out, outcome);
            let _ = writeln!(
                out,
                "{} Probability: {OUT_OF_RANGE} (table covers {} to {})",
                outcome.risk_label, err.min, err.max
            );
        }
    }
}

fn render_contributions(out: &mut String, outcome: &OutcomeEvaluation) {
    for c in &outcome.score.contributions {
        let _ = writeln!(out, "  {}: {}", c.term, format_points(c.points));
    }
}

pub fn render_instrument_text(instrument: &Instrument) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", instrument.name, instrument.id);
    if !instrument.description.is_empty() {
        let _ = writeln!(out, "{}", instrument.description);
    }

    out.push_str("\nCovariates\n");
    for spec in &instrument.covariates {
        let _ = writeln!(
            out,
            "  {} ({}): {} {}",
            spec.name,
            spec.label,
            spec.kind.name(),
            spec.kind.domain()
        );
    }

    for outcome in &instrument.outcomes {
        let _ = writeln!(out, "\nOutcome {} ({})", outcome.id, outcome.label);
        match &outcome.model {
            OutcomeModel::Table { table } => {
                let labels: Vec<&str> = table.horizons().iter().map(|h| h.label.as_str()).collect();
                let _ = writeln!(
                    out,
                    "  model: table, scores {} to {}, horizons {}",
                    table.min_score(),
                    table.max_score(),
                    labels.join(", ")
                );
            }
            OutcomeModel::ExternalTable { source } => {
                let _ = writeln!(
                    out,
                    "  model: external table (default {})",
                    source.default_path.display()
                );
            }
            OutcomeModel::Logistic { logistic } => {
                let _ = writeln!(
                    out,
                    "  model: logistic, log-odds = {} * score + {}",
                    logistic.coefficient, logistic.intercept
                );
            }
        }
        if let Ok((lo, hi)) = outcome.score_domain(&instrument.covariates) {
            let _ = writeln!(
                out,
                "  score range: {} to {}",
                format_score(lo),
                format_score(hi)
            );
        }
        for rule in &outcome.rules {
            let _ = writeln!(out, "  {}", describe_rule(rule));
        }
    }

    out
}

pub fn describe_rule(rule: &ScoreRule) -> String {
    match rule {
        ScoreRule::Ordinal { field, weights } => {
            let parts: Vec<String> = weights
                .iter()
                .map(|w| format!("{}->{}", w.level, format_score(w.weight)))
                .collect();
            format!("{field}: {}", parts.join(", "))
        }
        ScoreRule::Flag { field, weight } => format!("{field}: yes -> {}", format_points(*weight)),
        ScoreRule::Buckets { field, buckets } => {
            let parts: Vec<String> = buckets
                .iter()
                .enumerate()
                .map(|(i, b)| {
                    let upper = buckets
                        .get(i + 1)
                        .map_or("inf".to_string(), |n| format_score(n.lower));
                    format!("[{}, {})->{}", format_score(b.lower), upper, format_score(b.weight))
                })
                .collect();
            format!("{field}: {}", parts.join(", "))
        }
        ScoreRule::ScaledRound {
            field,
            divisor,
            multiplier,
            rounding,
        } => {
            let mode = match rounding {
                RoundingMode::HalfAwayFromZero => "ties away from zero",
                RoundingMode::HalfToEven => "ties to even",
            };
            format!(
                "{field}: {} * round({field} / {}) ({mode})",
                format_score(*multiplier),
                format_score(*divisor)
            )
        }
        ScoreRule::Linear {
            field,
            divisor,
            multiplier,
        } => format!(
            "{field}: {} * ({field} / {})",
            format_score(*multiplier),
            format_score(*divisor)
        ),
        ScoreRule::CappedStep {
            field,
            step,
            cap,
            weight,
        } => format!(
            "{field}: {} * min(floor({field} / {}), {})",
            format_score(*weight),
            format_score(*step),
            format_score(*cap)
        ),
        ScoreRule::Joint {
            first,
            second,
            cells,
        } => {
            let parts: Vec<String> = cells
                .iter()
                .map(|c| format!("{}/{}->{}", c.first, c.second, format_score(c.weight)))
                .collect();
            format!("{first}/{second}: {}", parts.join(", "))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/text.rs"]
mod tests;
