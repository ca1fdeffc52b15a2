pub mod error;
pub mod input;
pub mod instruments;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod tracing;

pub use error::{ConfigError, CovariateError, OutOfRange, RiskError};
pub use model::covariates::{CovariateSet, CovariateValue};
pub use model::instrument::Instrument;
pub use model::logistic::predict_probability;
pub use model::table::lookup_outcome;
pub use pipeline::stage2_score::compute_score;
pub use pipeline::stage3_outcome::{Evaluation, Prediction, evaluate};
