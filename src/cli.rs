use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use kira_clinrisk::pipeline::stage4_report::ReportFormat;

#[derive(Debug, Parser)]
#[command(
    name = "kira-clinrisk",
    version,
    about = "Clinical risk scores and outcome probabilities (HCC, EoE)"
)]
pub struct Cli {
    #[arg(long, global = true, default_value_t = false, help = "Debug logging")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List available instruments
    List(ListArgs),
    /// Describe an instrument's covariates, rules and models
    Show(ShowArgs),
    /// Score one set of covariates
    Score(ScoreArgs),
    /// Print the score -> probability reference curve
    Curve(CurveArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long, help = "Instrument definitions (JSON) to list alongside the built-ins")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[arg(long)]
    pub instrument: String,

    #[arg(long, help = "Instrument definitions file (JSON)")]
    pub config: Option<PathBuf>,

    #[arg(long, default_value_t = false, help = "Print the definition as JSON")]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ScoreArgs {
    #[arg(long)]
    pub instrument: String,

    #[arg(
        long = "set",
        value_name = "NAME=VALUE",
        help = "Covariate value (repeatable)"
    )]
    pub set: Vec<String>,

    #[arg(long, help = "Instrument definitions file (JSON)")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Probability table for instruments with an external table")]
    pub table: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = FormatArg::Text)]
    pub format: FormatArg,

    #[arg(long, help = "Write evaluation.json, report.txt and curves into this directory")]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CurveArgs {
    #[arg(long)]
    pub instrument: String,

    #[arg(long, help = "Outcome id (default: every outcome)")]
    pub outcome: Option<String>,

    #[arg(long, help = "Instrument definitions file (JSON)")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Probability table for instruments with an external table")]
    pub table: Option<PathBuf>,

    #[arg(long, help = "Output TSV path (default: stdout)")]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for ReportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Text => ReportFormat::Text,
            FormatArg::Json => ReportFormat::Json,
        }
    }
}
