//! Prepost: pre/post questionnaire comparison CLI

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use prepost::analyzer::{Aggregator, ItemScorer};
use prepost::catalog::Catalog;
use prepost::compare::{build_report, CompareError};
use prepost::config::{load_config, Config};
use prepost::ingest;
use prepost::reporter::{ConsoleReporter, JsonReporter};
use prepost::watcher::UploadWatcher;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Prepost: score a pre/post questionnaire and report the deltas
#[derive(Parser, Debug)]
#[command(name = "prepost")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Initial-round (pre) CSV upload
    #[arg(value_name = "INITIAL")]
    initial: PathBuf,

    /// Final-round (post) CSV upload
    #[arg(value_name = "FINAL")]
    final_: PathBuf,

    /// Respondent id for the per-respondent views
    #[arg(long, short)]
    respondent: Option<String>,

    /// Print the selectable common respondent ids, one per line, and exit
    #[arg(long)]
    list: bool,

    /// Output the report as JSON
    #[arg(long, short)]
    json: bool,

    /// Quiet mode (per-respondent totals only)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output (include the common-respondent list)
    #[arg(long, short)]
    verbose: bool,

    /// Re-run the analysis whenever either upload changes
    #[arg(long)]
    watch: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Path to config file (default: search .prepostrc.json upward from the
    /// initial upload's directory)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();

    if args.no_color {
        colored::control::set_override(false);
    }

    // Config search starts next to the initial upload
    let work_dir = args
        .initial
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let config =
        load_config(work_dir, args.config.as_deref())?.merge_with_cli(args.respondent.clone());

    if let Some(color) = config.color {
        if !args.no_color {
            colored::control::set_override(color);
        }
    }

    if args.watch {
        return run_watch(&args, &config);
    }

    run_once(&args, &config)
}

fn run_once(args: &Args, config: &Config) -> Result<ExitCode> {
    let catalog = Catalog::standard();
    let scorer = match &config.yes_token {
        Some(token) => ItemScorer::with_yes_token(token.clone()),
        None => ItemScorer::new(),
    };

    let pre = ingest::load_dataset(&args.initial)?;
    let post = ingest::load_dataset(&args.final_)?;

    let aggregator = Aggregator::new(&catalog).with_scorer(scorer);
    let pre_scores = aggregator.aggregate(&pre);
    let post_scores = aggregator.aggregate(&post);

    let report = match build_report(
        &catalog,
        &pre_scores,
        &post_scores,
        config.respondent.as_deref(),
    ) {
        Ok(report) => report,
        Err(CompareError::NoCommonRespondents) => {
            // Empty state, not a failure: nothing to align yet.
            eprintln!(
                "{}: No common respondents between the two uploads",
                "Info".blue()
            );
            return Ok(ExitCode::SUCCESS);
        }
        Err(CompareError::UnknownRespondent(id)) => {
            anyhow::bail!(
                "respondent {:?} is not present in both uploads (use --list to see the selectable ids)",
                id
            );
        }
    };

    if args.list {
        for id in &report.respondents {
            println!("{}", id);
        }
        return Ok(ExitCode::SUCCESS);
    }

    if args.json {
        println!("{}", JsonReporter::new().pretty().report(&report));
    } else if args.quiet {
        ConsoleReporter::new().report_quiet(&report);
    } else {
        let mut reporter = ConsoleReporter::new();
        if args.verbose {
            reporter = reporter.verbose();
        }
        reporter.report(&report, &args.initial, &args.final_);
    }

    Ok(ExitCode::SUCCESS)
}

fn run_watch(args: &Args, config: &Config) -> Result<ExitCode> {
    // First run immediately; later runs are triggered by file changes.
    // Per-run errors are reported but do not stop the loop.
    report_or_warn(args, config);

    let watcher = UploadWatcher::watch(&args.initial, &args.final_)
        .context("Failed to create file watcher")?;
    eprintln!("{}: Watching for changes... (Ctrl+C to stop)", "Info".blue());

    loop {
        let changed = watcher.next_changes();
        if changed.is_empty() {
            continue;
        }
        report_or_warn(args, config);
    }
}

fn report_or_warn(args: &Args, config: &Config) {
    if let Err(e) = run_once(args, config) {
        eprintln!("{}: {}", "Error".red(), e);
    }
}
