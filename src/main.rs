mod cli;

use clap::Parser;

use kira_clinrisk::error::RiskError;
use kira_clinrisk::input::config::load_instruments;
use kira_clinrisk::instruments::{builtin_instruments, find_instrument, resolve_instrument};
use kira_clinrisk::model::instrument::{Instrument, OutcomeDef};
use kira_clinrisk::pipeline::stage1_covariates::build_covariates;
use kira_clinrisk::pipeline::stage3_outcome::{evaluate, reference_curve};
use kira_clinrisk::pipeline::stage4_report::{render_evaluation, write_reports, write_text};
use kira_clinrisk::report::render_curve_tsv;
use kira_clinrisk::report::text::render_instrument_text;

use crate::cli::{Cli, Commands, CurveArgs, FormatArg, ListArgs, ScoreArgs, ShowArgs};

fn main() {
    let cli = Cli::parse();
    kira_clinrisk::tracing::init(cli.verbose);
    if let Err(err) = run(cli) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), RiskError> {
    match cli.command {
        Commands::List(args) => list(&args),
        Commands::Show(args) => show(&args),
        Commands::Score(args) => score(&args),
        Commands::Curve(args) => curve(&args),
    }
}

fn list(args: &ListArgs) -> Result<(), RiskError> {
    let mut instruments: Vec<Instrument> = builtin_instruments().to_vec();
    if let Some(path) = &args.config {
        instruments.extend(load_instruments(path)?);
    }
    for instrument in &instruments {
        let outcomes: Vec<String> = instrument
            .outcomes
            .iter()
            .map(|o| format!("{} [{}]", o.id, o.model.kind()))
            .collect();
        println!(
            "{}\t{}\t{}",
            instrument.id,
            instrument.name,
            outcomes.join(", ")
        );
    }
    Ok(())
}

fn show(args: &ShowArgs) -> Result<(), RiskError> {
    let instrument = find_instrument(&args.instrument, args.config.as_deref())?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&instrument)?);
    } else {
        print!("{}", render_instrument_text(&instrument));
    }
    Ok(())
}

fn score(args: &ScoreArgs) -> Result<(), RiskError> {
    let instrument = resolve_instrument(
        &args.instrument,
        args.config.as_deref(),
        args.table.as_deref(),
    )?;
    let covariates = build_covariates(&instrument, &args.set)?;
    tracing::info!(
        instrument = %instrument.id,
        covariates = covariates.len(),
        "scoring"
    );

    let evaluation = evaluate(&instrument, &covariates)?;
    for outcome in &evaluation.outcomes {
        tracing::info!(outcome = %outcome.id, score = outcome.score.total, "risk score");
    }

    print!(
        "{}",
        render_evaluation(&instrument, &evaluation, args.format.into())?
    );
    if args.format == FormatArg::Json {
        println!();
    }
    if let Some(out_dir) = &args.out {
        write_reports(&instrument, &evaluation, out_dir)?;
    }
    Ok(())
}

fn curve(args: &CurveArgs) -> Result<(), RiskError> {
    let instrument = resolve_instrument(
        &args.instrument,
        args.config.as_deref(),
        args.table.as_deref(),
    )?;
    let outcomes: Vec<&OutcomeDef> = match &args.outcome {
        Some(id) => vec![instrument.outcome(id)?],
        None => instrument.outcomes.iter().collect(),
    };

    let mut out = String::new();
    for (i, outcome) in outcomes.iter().enumerate() {
        if outcomes.len() > 1 {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&format!("# {}\n", outcome.id));
        }
        let points = reference_curve(&instrument, outcome)?;
        out.push_str(&render_curve_tsv(&points, None));
    }

    match &args.out {
        Some(path) => {
            write_text(path, &out)?;
            tracing::info!(path = %path.display(), "wrote curve");
        }
        None => print!("{out}"),
    }
    Ok(())
}
