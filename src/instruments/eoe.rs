use crate::model::covariates::CovariateSpec;
use crate::model::instrument::{Instrument, OutcomeDef, OutcomeModel};
use crate::model::logistic::LogisticModel;
use crate::model::rules::ScoreRule;

/// Per-outcome weights on the capped inputs, in the order
/// fibrosis, eosinophils, age, duration, remodeling.
struct OutcomeWeights {
    id: &'static str,
    label: &'static str,
    weights: [f64; 5],
    model: LogisticModel,
}

const CLASSIC: &[OutcomeWeights] = &[
    OutcomeWeights {
        id: "stricture",
        label: "Stricture",
        weights: [4.0, 2.0, 3.0, 12.0, 0.0],
        model: LogisticModel::new(0.065, -4.5),
    },
    OutcomeWeights {
        id: "stricture_dilation",
        label: "Stricture + Dilation",
        weights: [3.0, 2.0, 3.0, 12.0, 0.0],
        model: LogisticModel::new(0.06, -4.2),
    },
    OutcomeWeights {
        id: "rings",
        label: "Rings",
        weights: [2.0, 3.0, 2.0, 2.0, 0.0],
        model: LogisticModel::new(0.05, -2.5),
    },
];

// Only the stricture model is published for the remodeling calculator.
const REMODELING: &[OutcomeWeights] = &[OutcomeWeights {
    id: "stricture",
    label: "Stricture",
    weights: [4.0, 2.0, 3.0, 12.0, 2.0],
    model: LogisticModel::new(0.044, -3.9),
}];

pub fn classic() -> Instrument {
    Instrument {
        id: "eoe".to_string(),
        name: "EoE Fibrosis Risk Calculator".to_string(),
        description: "Eosinophilic esophagitis: probability of strictures, strictures with \
                      dilation, and rings."
            .to_string(),
        covariates: base_covariates(),
        outcomes: CLASSIC.iter().map(|w| outcome(w, false)).collect(),
    }
}

pub fn remodeling() -> Instrument {
    let mut covariates = base_covariates();
    covariates.push(CovariateSpec::integer(
        "remodeling",
        "AI Remodeling Score",
        0,
        2000,
    ));
    Instrument {
        id: "eoe-remodeling".to_string(),
        name: "EoE Fibrosis and Remodeling Risk Calculator".to_string(),
        description: "Eosinophilic esophagitis with AI remodeling score: probability of \
                      strictures."
            .to_string(),
        covariates,
        outcomes: REMODELING.iter().map(|w| outcome(w, true)).collect(),
    }
}

fn base_covariates() -> Vec<CovariateSpec> {
    vec![
        CovariateSpec::integer("age", "Age (years)", 0, 80),
        CovariateSpec::integer("duration", "Disease duration (years)", 0, 15),
        CovariateSpec::integer("eosinophils", "Eosinophils (per HPF)", 0, 100),
        CovariateSpec::integer("fibrosis", "AI Fibrosis Score", 0, 300),
    ]
}

fn outcome(w: &OutcomeWeights, with_remodeling: bool) -> OutcomeDef {
    let [fib, eos, age, dur, remodeling] = w.weights;
    let mut rules = vec![
        ScoreRule::capped_step("fibrosis", 10.0, 30.0, fib),
        ScoreRule::capped_step("eosinophils", 10.0, 10.0, eos),
        ScoreRule::capped_step("age", 10.0, 8.0, age),
        ScoreRule::capped_step("duration", 1.0, 15.0, dur),
    ];
    if with_remodeling {
        rules.push(ScoreRule::capped_step("remodeling", 100.0, 20.0, remodeling));
    }
    OutcomeDef {
        id: w.id.to_string(),
        label: w.label.to_string(),
        risk_label: w.label.to_string(),
        complement_label: None,
        rules,
        model: OutcomeModel::Logistic { logistic: w.model },
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/instruments/eoe.rs"]
mod tests;
