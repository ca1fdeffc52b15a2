use serde::Serialize;

use crate::pipeline::stage3_outcome::Evaluation;

#[derive(Serialize)]
struct EvaluationDocument<'a> {
    tool: &'static str,
    version: &'static str,
    #[serde(flatten)]
    evaluation: &'a Evaluation,
}

pub fn render_evaluation_json(evaluation: &Evaluation) -> serde_json::Result<String> {
    let doc = EvaluationDocument {
        tool: "kira-clinrisk",
        version: env!("CARGO_PKG_VERSION"),
        evaluation,
    };
    serde_json::to_string_pretty(&doc)
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/json.rs"]
mod tests;
