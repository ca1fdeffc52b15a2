pub mod covariates;
pub mod instrument;
pub mod logistic;
pub mod probability;
pub mod rules;
pub mod table;
