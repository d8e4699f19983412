use std::{
    io::{BufRead, Write},
    path::PathBuf,
};

use anyhow::Context;
use blockfall_engine::GameState;
use blockfall_evaluator::turn_evaluator::TurnEvaluator;

use crate::{
    protocol::{PieceToken, ProtocolReader},
    util::{self, Output},
    view::{self, OutputFormat},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Protocol input file (standard input if omitted)
    #[arg(long)]
    input: Option<PathBuf>,
    /// How every turn is printed
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,
}

/// Why a game stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub(crate) enum Termination {
    #[display("deadline touched")]
    DeadlineTouched,
    #[display("piece supply exhausted")]
    SupplyExhausted,
    #[display("input ended")]
    InputEnded,
}

#[derive(Debug)]
pub(crate) struct PlayOutcome {
    pub(crate) termination: Termination,
    /// Last state reached; `None` if the input held no pieces.
    pub(crate) state: Option<GameState>,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let input = util::open_input(arg.input.as_ref())?;
    let mut output = Output::stdout();

    let outcome = play(input, &mut output, arg.format)?;

    eprintln!("game over because of {}", outcome.termination);
    if let Some(state) = &outcome.state {
        eprintln!(
            "score: {}, placed pieces: {}, cleared lines: {}",
            state.stats().score(),
            state.stats().placed_pieces(),
            state.stats().total_cleared_lines()
        );
    }
    Ok(())
}

/// Plays the pieces read from `input`, writing every turn to `output`.
pub(crate) fn play<R, W>(input: R, output: &mut W, format: OutputFormat) -> anyhow::Result<PlayOutcome>
where
    R: BufRead,
    W: Write,
{
    let evaluator = TurnEvaluator::default();
    let mut reader = ProtocolReader::new(input);

    let Some((falling, next)) = reader.read_header()? else {
        return Ok(PlayOutcome {
            termination: Termination::InputEnded,
            state: None,
        });
    };
    let mut state = GameState::new(falling, next);

    let mut turn = 0;
    let termination = loop {
        let plan = evaluator.select_best_move(&state)?;
        state = state.advance(plan.placement().placement())?;
        turn += 1;

        let evaluation = evaluator.explain(&plan);
        view::write_turn(output, format, turn, &plan, &evaluation, &state)
            .and_then(|()| output.flush())
            .with_context(|| format!("Failed to write turn {turn}"))?;

        if state.is_deadline_touched() {
            break Termination::DeadlineTouched;
        }
        if state.falling_piece().is_none() {
            break Termination::SupplyExhausted;
        }
        state = match reader.next_token()? {
            Some(PieceToken::Piece(kind)) => state.with_next_piece(kind)?,
            Some(PieceToken::Exhausted) => state.with_supply_exhausted()?,
            Some(PieceToken::Stop) | None => break Termination::InputEnded,
        };
    };

    Ok(PlayOutcome {
        termination,
        state: Some(state),
    })
}

#[cfg(test)]
mod tests {
    use blockfall_engine::PieceSequence;

    use super::*;
    use crate::{command::generate::write_sequence, protocol::ProtocolError};

    fn play_str(input: &str, format: OutputFormat) -> (PlayOutcome, String) {
        let mut output = Vec::new();
        let outcome = play(input.as_bytes(), &mut output, format).unwrap();
        (outcome, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_empty_input() {
        let (outcome, output) = play_str("", OutputFormat::Pretty);
        assert_eq!(outcome.termination, Termination::InputEnded);
        assert!(outcome.state.is_none());
        assert!(output.is_empty());
    }

    #[test]
    fn test_stop_token() {
        let (outcome, output) = play_str("OI\nE\nT\n", OutputFormat::Compact);
        assert_eq!(outcome.termination, Termination::InputEnded);
        let state = outcome.state.unwrap();
        assert_eq!(state.stats().placed_pieces(), 1);
        assert_eq!(output, "3 8\nscore: 0\n");
    }

    #[test]
    fn test_end_of_input_stops_after_first_turn() {
        let (outcome, _) = play_str("OI", OutputFormat::Compact);
        assert_eq!(outcome.termination, Termination::InputEnded);
        assert_eq!(outcome.state.unwrap().stats().placed_pieces(), 1);
    }

    #[test]
    fn test_exhausted_supply() {
        let (outcome, output) = play_str("OI\nX\n", OutputFormat::Compact);
        assert_eq!(outcome.termination, Termination::SupplyExhausted);
        assert_eq!(outcome.state.unwrap().stats().placed_pieces(), 2);
        assert_eq!(output.lines().count(), 4);

        let (outcome, _) = play_str("TX\n", OutputFormat::Compact);
        assert_eq!(outcome.termination, Termination::SupplyExhausted);
        assert_eq!(outcome.state.unwrap().stats().placed_pieces(), 1);
    }

    #[test]
    fn test_malformed_token_is_rejected() {
        let mut output = Vec::new();
        let err = play("OI\nQ\n".as_bytes(), &mut output, OutputFormat::Compact).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ProtocolError>(),
            Some(ProtocolError::InvalidToken { line: 2, .. })
        ));
    }

    #[test]
    fn test_matches_in_process_session() {
        for seed in [0, 1, 42] {
            let mut input = Vec::new();
            write_sequence(&mut input, PieceSequence::new(seed, 150)).unwrap();

            let mut output = Vec::new();
            let outcome = play(input.as_slice(), &mut output, OutputFormat::Json).unwrap();
            let state = outcome.state.unwrap();

            let expected = TurnEvaluator::default()
                .play_session(PieceSequence::new(seed, 150))
                .unwrap()
                .unwrap();
            assert_eq!(state, expected);
            assert_eq!(
                outcome.termination,
                if expected.is_deadline_touched() {
                    Termination::DeadlineTouched
                } else {
                    Termination::SupplyExhausted
                }
            );
            let turns = String::from_utf8(output).unwrap().lines().count();
            assert_eq!(turns, expected.stats().placed_pieces());
        }
    }

    #[test]
    fn test_json_turns_carry_state() {
        let (_, output) = play_str("IO\nX\n", OutputFormat::Json);
        let records: Vec<serde_json::Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["state"]["falling_piece"], "O");
        assert_eq!(records[1]["state"]["falling_piece"], serde_json::Value::Null);
        assert_eq!(records[1]["state"]["stats"]["placed_pieces"], 2);
    }
}
