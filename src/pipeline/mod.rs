pub mod stage1_covariates;
pub mod stage2_score;
pub mod stage3_outcome;
pub mod stage4_report;
