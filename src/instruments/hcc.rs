use std::path::PathBuf;

use crate::model::covariates::CovariateSpec;
use crate::model::instrument::{Instrument, OutcomeDef, OutcomeModel, TableColumn, TableSource};
use crate::model::rules::ScoreRule;
use crate::model::table::{Horizon, ScoreTable};

pub const RECMET_TABLE_FILE: &str = "full_range_probabilities.csv";

const DFS_MIN_SCORE: i64 = -20;
const OS_MIN_SCORE: i64 = -30;

pub fn dfs() -> Instrument {
    let covariates = vec![
        who_grade(),
        t_stage(),
        CovariateSpec::binary("multifocality", "Multifocality"),
        CovariateSpec::numeric("nuclear_area", "Mean Nuclear Area %", 0.0, 100.0),
        r_rpa(),
        hepar(),
        gpc(),
    ];
    let rules = vec![
        ScoreRule::ordinal("who_grade", &[(1, 0.0), (2, 4.0), (3, 24.0)]),
        ScoreRule::ordinal("t_stage", &[(1, 0.0), (2, 2.0), (3, 9.0), (4, 10.0)]),
        ScoreRule::flag("multifocality", 1.0),
        ScoreRule::buckets(
            "nuclear_area",
            &[(0.0, 0.0), (15.0, 3.0), (20.0, 6.0), (25.0, 9.0)],
        ),
        ScoreRule::scaled_round("r_rpa", 10.0, -2.0),
        ScoreRule::joint(
            "hepar",
            "gpc",
            &[
                ("high", "negative", 0.0),
                ("high", "positive", 1.0),
                ("low", "negative", 1.0),
                ("low", "positive", 1.0),
            ],
        ),
    ];
    let table = ScoreTable::from_trusted(
        DFS_MIN_SCORE,
        vec![
            Horizon::from_literals("3-year", DFS_ANY_EVENT_3Y),
            Horizon::from_literals("5-year", DFS_ANY_EVENT_5Y),
        ],
    );
    Instrument {
        id: "hcc-dfs".to_string(),
        name: "HCC Any Event Probability Calculator".to_string(),
        description: "Hepatocellular carcinoma: probability of any event and disease-free survival."
            .to_string(),
        covariates,
        outcomes: vec![OutcomeDef {
            id: "any_event".to_string(),
            label: "Any event".to_string(),
            risk_label: "Any Event Risk".to_string(),
            complement_label: Some("Disease-Free Survival".to_string()),
            rules,
            model: OutcomeModel::Table { table },
        }],
    }
}

pub fn os() -> Instrument {
    let covariates = vec![
        who_grade(),
        t_stage(),
        CovariateSpec::binary("cirrhosis", "Cirrhosis"),
        CovariateSpec::binary("portal_hypertension", "Portal Hypertension"),
        hepar(),
        gpc(),
        r_rpa(),
    ];
    let rules = vec![
        ScoreRule::ordinal("who_grade", &[(1, 0.0), (2, 11.0), (3, 34.0)]),
        ScoreRule::ordinal("t_stage", &[(1, 0.0), (2, 0.0), (3, 9.0), (4, 16.0)]),
        ScoreRule::flag("cirrhosis", 6.0),
        ScoreRule::flag("portal_hypertension", 11.0),
        ScoreRule::joint(
            "hepar",
            "gpc",
            &[
                ("high", "negative", 0.0),
                ("high", "positive", 1.0),
                ("low", "negative", 1.0),
                ("low", "positive", 10.0),
            ],
        ),
        ScoreRule::scaled_round("r_rpa", 10.0, -3.0),
    ];
    let table = ScoreTable::from_trusted(
        OS_MIN_SCORE,
        vec![
            Horizon::from_literals("3-year", OS_DEATH_3Y),
            Horizon::from_literals("5-year", OS_DEATH_5Y),
        ],
    );
    Instrument {
        id: "hcc-os".to_string(),
        name: "HCC Overall Survival Probability Calculator".to_string(),
        description: "Hepatocellular carcinoma: probability of death and overall survival."
            .to_string(),
        covariates,
        outcomes: vec![OutcomeDef {
            id: "death".to_string(),
            label: "Death".to_string(),
            risk_label: "Death Risk".to_string(),
            complement_label: Some("Overall Survival".to_string()),
            rules,
            model: OutcomeModel::Table { table },
        }],
    }
}

pub fn recmet() -> Instrument {
    let covariates = vec![
        who_grade(),
        t_stage(),
        hepar(),
        gpc(),
        CovariateSpec::numeric("nuclear_area", "Nuclear Area (%)", 0.0, 100.0),
        r_rpa(),
    ];
    // Low Hepar and positive GPC together score the same as either alone.
    let rules = vec![
        ScoreRule::ordinal("who_grade", &[(1, 0.0), (2, 6.0), (3, 26.0)]),
        ScoreRule::ordinal("t_stage", &[(1, 0.0), (2, 4.0), (3, 12.0), (4, 12.0)]),
        ScoreRule::joint(
            "hepar",
            "gpc",
            &[
                ("high", "negative", 0.0),
                ("high", "positive", 4.0),
                ("low", "negative", 4.0),
                ("low", "positive", 4.0),
            ],
        ),
        ScoreRule::buckets(
            "nuclear_area",
            &[(0.0, 0.0), (5.0, 3.0), (15.0, 6.0), (25.0, 9.0)],
        ),
        ScoreRule::linear("r_rpa", 10.0, -2.0),
    ];
    Instrument {
        id: "hcc-recmet".to_string(),
        name: "5 Year Rec-Met Risk Prediction Calculator".to_string(),
        description: "Hepatocellular carcinoma: 5-year probability of recurrence or metastasis."
            .to_string(),
        covariates,
        outcomes: vec![OutcomeDef {
            id: "recmet".to_string(),
            label: "Recurrence/metastasis".to_string(),
            risk_label: "Recurrence/Metastasis".to_string(),
            complement_label: None,
            rules,
            model: OutcomeModel::ExternalTable {
                source: TableSource {
                    default_path: PathBuf::from(RECMET_TABLE_FILE),
                    score_column: "risk_score".to_string(),
                    columns: vec![TableColumn {
                        column: "Predicted".to_string(),
                        label: "5-year".to_string(),
                    }],
                },
            },
        }],
    }
}

fn who_grade() -> CovariateSpec {
    CovariateSpec::ordinal("who_grade", "WHO Grade", &[1, 2, 3])
}

fn t_stage() -> CovariateSpec {
    CovariateSpec::ordinal("t_stage", "T Stage", &[1, 2, 3, 4])
}

fn r_rpa() -> CovariateSpec {
    CovariateSpec::integer("r_rpa", "r-RPA %", 0, 100)
}

fn hepar() -> CovariateSpec {
    CovariateSpec::categorical("hepar", "Hepar", &["high", "low"])
}

fn gpc() -> CovariateSpec {
    CovariateSpec::categorical("gpc", "GPC", &["negative", "positive"])
}

const DFS_ANY_EVENT_3Y: &[f64] = &[
    1.68, 1.979, 2.329, 2.74, 3.22, 3.782, 4.437, 5.2, 6.085, 7.11, 8.292, 9.65, 11.203, 12.971,
    14.97, 17.216, 19.722, 22.493, 25.529, 28.823, 32.357, 36.105, 40.03, 44.088, 48.225, 52.388,
    56.517, 60.558, 64.46, 68.178, 71.678, 74.935, 77.933, 80.664, 83.131, 85.34, 87.304, 89.039,
    90.562, 91.893, 93.051, 94.054, 94.92, 95.666, 96.306, 96.855, 97.325, 97.726, 98.068, 98.36,
    98.608, 98.819, 98.999, 99.151, 99.28, 99.39, 99.483, 99.562, 99.629, 99.686, 99.734, 99.775,
    99.809, 99.838, 99.863, 99.884,
];

const DFS_ANY_EVENT_5Y: &[f64] = &[
    3.494, 4.095, 4.795, 5.607, 6.547, 7.632, 8.879, 10.308, 11.937, 13.783, 15.863, 18.192,
    20.777, 23.624, 26.729, 30.082, 33.662, 37.44, 41.378, 45.429, 49.541, 53.66, 57.729, 61.696,
    65.513, 69.14, 72.546, 75.707, 78.612, 81.256, 83.64, 85.775, 87.672, 89.347, 90.819, 92.105,
    93.225, 94.196, 95.035, 95.758, 96.38, 96.914, 97.371, 97.762, 98.096, 98.381, 98.624, 98.831,
    99.007, 99.156, 99.284, 99.392, 99.484, 99.562, 99.629, 99.685, 99.733, 99.773, 99.808, 99.837,
    99.862, 99.883, 99.901, 99.916, 99.928, 99.939,
];

const OS_DEATH_3Y: &[f64] = &[
    0.043, 0.051, 0.061, 0.072, 0.085, 0.101, 0.119, 0.141, 0.166, 0.197, 0.233, 0.275, 0.326,
    0.385, 0.455, 0.539, 0.637, 0.752, 0.889, 1.05, 1.24, 1.464, 1.728, 2.039, 2.403, 2.831, 3.333,
    3.92, 4.605, 5.404, 6.331, 7.406, 8.646, 10.071, 11.701, 13.555, 15.65, 18.002, 20.622, 23.512,
    26.673, 30.09, 33.744, 37.603, 41.627, 45.765, 49.962, 54.16, 58.299, 62.325, 66.187, 69.845,
    73.268, 76.433, 79.328, 81.952, 84.309, 86.409, 88.268, 89.901, 91.33, 92.573, 93.651, 94.581,
    95.381, 96.069, 96.657, 97.16, 97.59, 97.955, 98.267, 98.531, 98.756, 98.946, 99.108, 99.245,
    99.361, 99.46, 99.543, 99.614, 99.673, 99.724, 99.766, 99.803, 99.833, 99.859, 99.881, 99.899,
    99.915, 99.928, 99.939, 99.949, 99.957, 99.963, 99.969, 99.974, 99.978, 99.981, 99.984, 99.987,
    99.989, 99.99, 99.992, 99.993, 99.994, 99.995, 99.996, 99.997,
];

const OS_DEATH_5Y: &[f64] = &[
    0.483, 0.551, 0.629, 0.717, 0.818, 0.934, 1.065, 1.214, 1.384, 1.578, 1.798, 2.048, 2.333,
    2.655, 3.021, 3.435, 3.904, 4.435, 5.033, 5.707, 6.466, 7.317, 8.27, 9.336, 10.522, 11.84,
    13.299, 14.907, 16.671, 18.599, 20.695, 22.96, 25.393, 27.991, 30.745, 33.644, 36.671, 39.807,
    43.029, 46.311, 49.625, 52.943, 56.234, 59.472, 62.63, 65.683, 68.612, 71.4, 74.034, 76.505,
    78.809, 80.942, 82.908, 84.709, 86.351, 87.843, 89.192, 90.407, 91.499, 92.477, 93.351, 94.129,
    94.822, 95.436, 95.981, 96.464, 96.89, 97.266, 97.598, 97.891, 98.148, 98.375, 98.574, 98.749,
    98.903, 99.038, 99.157, 99.261, 99.352, 99.432, 99.503, 99.564, 99.618, 99.666, 99.707, 99.743,
    99.775, 99.803, 99.828, 99.849, 99.868, 99.884, 99.899, 99.911, 99.922, 99.932, 99.94, 99.948,
    99.954, 99.96, 99.965, 99.969, 99.973, 99.976, 99.979, 99.982, 99.984, 99.986,
];

#[cfg(test)]
#[path = "../../tests/src_inline/instruments/hcc.rs"]
mod tests;
