use std::{io::Write as _, path::PathBuf};

use anyhow::Context;
use blockfall_engine::{GameStats, PieceSequence};
use blockfall_evaluator::turn_evaluator::TurnEvaluator;
use rand::Rng as _;
use serde::Serialize;

use crate::{util::Output, view};

const PROGRESS_INTERVAL: usize = 1000;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Random seed (chosen at random if omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Number of pieces in the generated sequence
    #[arg(long, default_value_t = 10000)]
    length: usize,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
    /// Output file path (standard output if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    seed: u64,
    length: usize,
    deadline_touched: bool,
    stats: GameStats,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    eprintln!("Simulating {} pieces with seed {seed}", arg.length);

    let evaluator = TurnEvaluator::default();
    let final_state = evaluator.play_session_with(PieceSequence::new(seed, arg.length), |_, state| {
        let placed = state.stats().placed_pieces();
        if placed % PROGRESS_INTERVAL == 0 {
            eprintln!("  {placed} pieces placed, score {}", state.stats().score());
        }
    })?;

    let report = SimulationReport {
        seed,
        length: arg.length,
        deadline_touched: final_state
            .as_ref()
            .is_some_and(blockfall_engine::GameState::is_deadline_touched),
        stats: final_state
            .map(|state| state.stats().clone())
            .unwrap_or_default(),
    };

    let mut output = Output::from_output_path(arg.output.clone())?;
    if arg.json {
        output.write_json(&report)?;
    } else {
        let reason = if report.deadline_touched {
            "deadline touched"
        } else {
            "piece supply exhausted"
        };
        writeln!(output, "game over because of {reason}")
            .and_then(|()| view::write_stats(&mut output, &report.stats))
            .and_then(|()| output.flush())
            .with_context(|| format!("Failed to write report to {}", output.display_path()))?;
    }
    Ok(())
}
