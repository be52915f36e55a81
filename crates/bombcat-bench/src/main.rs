use std::path::PathBuf;

use clap::Parser;

use bombcat_bench::config::{BenchConfig, ResolvedOutputs};
use bombcat_bench::logging::init_logging;
use bombcat_bench::runner::SeriesRunner;

/// Match-series harness for the bombcat policies.
#[derive(Debug, Parser)]
#[command(
    name = "bombcat-bench",
    author,
    version,
    about = "Deterministic bombcat match-series harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of matches to play.
    #[arg(long, value_name = "COUNT")]
    matches: Option<usize>,

    /// Override the master RNG seed.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Policy standing in for the human seat (random or heuristic).
    #[arg(long, value_name = "POLICY")]
    human: Option<String>,

    /// Policy playing the bot seat (random or heuristic).
    #[arg(long, value_name = "POLICY")]
    bot: Option<String>,

    /// Exit after validating the configuration (no match is played).
    #[arg(long)]
    validate_only: bool,

    /// Keep match narration in the telemetry log.
    #[arg(long)]
    log_narration: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(matches) = cli.matches {
        config.matches.count = matches;
    }

    if let Some(seed) = cli.seed {
        config.matches.seed = Some(seed);
    }

    if let Some(human) = cli.human {
        config.agents.human = human;
    }

    if let Some(bot) = cli.bot {
        config.agents.bot = bot;
    }

    if cli.log_narration {
        config.logging.narration = true;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let count = config.matches.count;

    println!(
        "Loaded configuration '{run_id}': {count} match{} of {} (human seat) vs {} (bot seat)",
        if count == 1 { "" } else { "es" },
        config.agents.human,
        config.agents.bot,
    );

    let _logging_guard = init_logging(&config.logging, &outputs, &run_id)?;
    let runner = SeriesRunner::new(config, outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: series execution skipped.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Series complete for '{run_id}': {} matches → human {} / bot {} / draws {} / unfinished {}",
        summary.matches_played,
        summary.human_wins,
        summary.bot_wins,
        summary.draws,
        summary.unfinished
    );
    println!("Match rows: {}", summary.jsonl_path.display());
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(telemetry_path) = summary.telemetry_path.as_ref() {
        println!("Telemetry log: {}", telemetry_path.display());
    }

    Ok(())
}
