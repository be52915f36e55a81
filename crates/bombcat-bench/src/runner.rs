use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use bombcat_bot::{DriverError, PolicyInput, PolicyKind, drive_match};
use bombcat_core::game::{Game, MatchOutcome, MatchRecord, TracingPresentation};
use bombcat_core::model::contestant::Seat;
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{BenchConfig, ResolvedOutputs, ValidationError};
use crate::logging::telemetry_dir;

const HUMAN_SEED_SALT: u64 = 0x6875_6d61_6e00_0000;

/// Plays a seeded series of matches between two stand-in policies.
pub struct SeriesRunner {
    config: BenchConfig,
    outputs: ResolvedOutputs,
    human: PolicyKind,
    bot: PolicyKind,
}

/// Summary details returned after a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub matches_played: usize,
    pub human_wins: usize,
    pub bot_wins: usize,
    pub draws: usize,
    pub unfinished: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub telemetry_path: Option<PathBuf>,
}

impl SeriesRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let (human, bot) = config.agents.kinds()?;
        config.rules.validate().map_err(ValidationError::from)?;
        Ok(Self {
            config,
            outputs,
            human,
            bot,
        })
    }

    /// Execute the series, streaming one JSONL row per match to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.matches.seed.unwrap_or(0));
        let mut tally = SeriesTally::default();

        for match_index in 0..self.config.matches.count {
            let match_seed = rng.next_u64();
            let row = self.play_match(match_index, match_seed)?;
            tally.record(&row);
            serde_json::to_writer(&mut writer, &row)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;

        fs::write(
            &self.outputs.summary_md,
            tally.to_markdown(&self.config.run_id, self.human, self.bot),
        )?;

        let telemetry_path = self
            .config
            .logging
            .enable_structured
            .then(|| telemetry_dir(&self.outputs).join("telemetry.jsonl"));

        Ok(RunSummary {
            matches_played: tally.matches,
            human_wins: tally.human_wins,
            bot_wins: tally.bot_wins,
            draws: tally.draws,
            unfinished: tally.unfinished,
            rows_written: tally.matches,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            telemetry_path,
        })
    }

    fn play_match(&self, match_index: usize, match_seed: u64) -> Result<MatchRow, RunnerError> {
        let mut game = Game::with_presentation(self.config.rules.clone(), match_seed, TracingPresentation)
            .map_err(ValidationError::from)?;
        let mut human = PolicyInput::new(self.human.build(), match_seed ^ HUMAN_SEED_SALT);
        let mut bot = self.bot.build();
        let mut bot_rng = StdRng::seed_from_u64(match_seed.rotate_left(17));

        let started = Instant::now();
        let result = drive_match(
            &mut game,
            &mut human,
            bot.as_mut(),
            &mut bot_rng,
            self.config.matches.max_sub_turns,
        );
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        let record = game.record();
        let error = result.err().map(|err: DriverError| err.to_string());
        event!(
            target: "bombcat_bench::match",
            Level::INFO,
            match_index,
            match_seed,
            outcome = outcome_label(record.outcome),
            sub_turns = record.sub_turns,
            elapsed_ms,
            error = error.as_deref().unwrap_or(""),
        );

        Ok(MatchRow {
            run_id: self.config.run_id.clone(),
            match_index,
            human_agent: self.human.as_str(),
            bot_agent: self.bot.as_str(),
            record,
            error,
            elapsed_ms,
        })
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn outcome_label(outcome: Option<MatchOutcome>) -> &'static str {
    match outcome {
        Some(MatchOutcome::Winner(seat)) => match seat {
            Seat::Human => "human",
            Seat::Bot => "bot",
        },
        Some(MatchOutcome::Draw) => "draw",
        None => "unfinished",
    }
}

#[derive(Debug, Serialize)]
struct MatchRow {
    run_id: String,
    match_index: usize,
    human_agent: &'static str,
    bot_agent: &'static str,
    #[serde(flatten)]
    record: MatchRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    elapsed_ms: f64,
}

#[derive(Debug, Default)]
struct SeriesTally {
    matches: usize,
    human_wins: usize,
    bot_wins: usize,
    draws: usize,
    unfinished: usize,
    sub_turns: u64,
    bombs_defused: [u64; 2],
    cards_played: [u64; 2],
    elapsed_ms: f64,
}

impl SeriesTally {
    fn record(&mut self, row: &MatchRow) {
        self.matches += 1;
        match row.record.outcome {
            Some(MatchOutcome::Winner(Seat::Human)) => self.human_wins += 1,
            Some(MatchOutcome::Winner(Seat::Bot)) => self.bot_wins += 1,
            Some(MatchOutcome::Draw) => self.draws += 1,
            None => self.unfinished += 1,
        }
        self.sub_turns += row.record.sub_turns;
        for (seat, tally) in [(Seat::Human, row.record.human), (Seat::Bot, row.record.bot)] {
            self.bombs_defused[seat.index()] += u64::from(tally.bombs_defused);
            self.cards_played[seat.index()] += u64::from(tally.cards_played);
        }
        self.elapsed_ms += row.elapsed_ms;
    }

    fn rate(&self, count: usize) -> f64 {
        if self.matches == 0 {
            0.0
        } else {
            count as f64 * 100.0 / self.matches as f64
        }
    }

    fn average(&self, total: f64) -> f64 {
        if self.matches == 0 {
            0.0
        } else {
            total / self.matches as f64
        }
    }

    fn to_markdown(&self, run_id: &str, human: PolicyKind, bot: PolicyKind) -> String {
        let mut out = String::new();
        out.push_str("# Match Series Summary\n\n");
        out.push_str(&format!("Run `{run_id}`: {} matches\n\n", self.matches));
        out.push_str("| Seat | Policy | Wins | Win % | Avg cards played | Avg bombs defused |\n");
        out.push_str("|------|--------|------|-------|------------------|-------------------|\n");
        for (seat, kind, wins) in [
            (Seat::Human, human, self.human_wins),
            (Seat::Bot, bot, self.bot_wins),
        ] {
            out.push_str(&format!(
                "| {seat} | {kind} | {wins} | {win:.1}% | {played:.2} | {defused:.2} |\n",
                win = self.rate(wins),
                played = self.average(self.cards_played[seat.index()] as f64),
                defused = self.average(self.bombs_defused[seat.index()] as f64),
            ));
        }
        out.push('\n');
        out.push_str(&format!(
            "Draws: {} · Unfinished: {}\n\n",
            self.draws, self.unfinished
        ));
        out.push_str(&format!(
            "Average sub-turns per match: {:.2}\n\nAverage ms per match: {:.3}\n",
            self.average(self.sub_turns as f64),
            self.average(self.elapsed_ms),
        ));
        out
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ValidationError),
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
}
