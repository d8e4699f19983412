//! Text renderings of turns and statistics.

use std::io::{self, Write};

use blockfall_engine::{BitGrid, GameState, GameStats, MAX_LINES_PER_CLEAR, PieceKind, PieceRotation};
use blockfall_evaluator::{placement_evaluator::FeatureBreakdown, turn_evaluator::MovePlan};
use serde::Serialize;

const CELL_OCCUPIED: &str = "[]";
const CELL_EMPTY: &str = "  ";
const PREVIEW_ROWS: usize = 4;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// Piece preview, applied action, grid and statistics
    #[default]
    Pretty,
    /// Applied action and score
    Compact,
    /// One JSON object per line
    Json,
}

#[derive(Debug, Serialize)]
struct TurnRecord<'a> {
    turn: usize,
    rotation: PieceRotation,
    column: usize,
    row: usize,
    evaluation: &'a FeatureBreakdown,
    state: &'a GameState,
}

/// Writes the outcome of one turn: the chosen move and the state it produced.
pub(crate) fn write_turn<W>(
    w: &mut W,
    format: OutputFormat,
    turn: usize,
    plan: &MovePlan,
    evaluation: &FeatureBreakdown,
    state: &GameState,
) -> io::Result<()>
where
    W: Write,
{
    let placement = plan.placement();
    match format {
        OutputFormat::Pretty => {
            write_falling_piece(w, state.falling_piece())?;
            writeln!(
                w,
                "    applied action: {} {}",
                placement.rotation(),
                placement.column()
            )?;
            writeln!(w)?;
            write_grid(w, state.grid())?;
            write_stats(w, state.stats())?;
            writeln!(w)?;
            writeln!(w)
        }
        OutputFormat::Compact => {
            writeln!(w, "{} {}", placement.rotation(), placement.column())?;
            writeln!(w, "score: {}", state.stats().score())
        }
        OutputFormat::Json => {
            let record = TurnRecord {
                turn,
                rotation: placement.rotation(),
                column: placement.column(),
                row: placement.row(),
                evaluation,
                state,
            };
            serde_json::to_writer(&mut *w, &record)?;
            writeln!(w)
        }
    }
}

/// Boxed preview of the falling piece in its spawn rotation.
pub(crate) fn write_falling_piece<W>(w: &mut W, kind: Option<PieceKind>) -> io::Result<()>
where
    W: Write,
{
    let mut rows: Vec<String> = kind
        .map(|kind| {
            kind.shape(PieceRotation::SPAWN)
                .rows()
                .map(|cells| cells.map(cell_str).collect())
                .collect()
        })
        .unwrap_or_default();
    rows.resize(PREVIEW_ROWS, String::new());

    writeln!(w, "       falling piece")?;
    writeln!(w, "       +------------+")?;
    writeln!(w, "       |            |")?;
    for row in rows {
        writeln!(w, "       |  {row:<8}  |")?;
    }
    writeln!(w, "       |            |")?;
    writeln!(w, "       +------------+")
}

/// The grid between column and row rulers, two characters per cell.
pub(crate) fn write_grid<W>(w: &mut W, grid: &BitGrid) -> io::Result<()>
where
    W: Write,
{
    let border = "-".repeat(BitGrid::WIDTH * CELL_OCCUPIED.len());
    let ruler: String = BitGrid::X_RANGE.map(|x| format!(" {x}")).collect();

    writeln!(w, "    {ruler}")?;
    writeln!(w, "   +{border}+")?;
    for (y, row) in grid.rows().enumerate() {
        let cells: String = row.iter_cells().map(cell_str).collect();
        writeln!(w, "{y:2} |{cells}|")?;
    }
    writeln!(w, "   +{border}+")
}

pub(crate) fn write_stats<W>(w: &mut W, stats: &GameStats) -> io::Result<()>
where
    W: Write,
{
    writeln!(w, "statistics:")?;
    writeln!(w, "- score: {}", stats.score())?;
    writeln!(w, "- placed_pieces: {}", stats.placed_pieces())?;
    writeln!(w, "- total_cleared_lines: {}", stats.total_cleared_lines())?;
    writeln!(w, "- cleared_lines:")?;
    for lines in 1..=MAX_LINES_PER_CLEAR {
        writeln!(w, "  - {lines} lines: {}", stats.line_clears(lines))?;
    }
    Ok(())
}

fn cell_str(occupied: bool) -> &'static str {
    if occupied { CELL_OCCUPIED } else { CELL_EMPTY }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{NextPiece, Placement};
    use blockfall_evaluator::turn_evaluator::TurnEvaluator;

    use super::*;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_falling_piece_preview() {
        let text = render(|w| write_falling_piece(w, Some(PieceKind::T)));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[3], "       |    []      |");
        assert_eq!(lines[4], "       |  [][][]    |");
        assert_eq!(lines[5], "       |            |");
    }

    #[test]
    fn test_empty_preview() {
        let text = render(|w| write_falling_piece(w, None));
        assert_eq!(
            text.lines().filter(|line| *line == "       |            |").count(),
            6
        );
    }

    #[test]
    fn test_grid() {
        let grid = BitGrid::from_ascii(
            r"
            #........#
            ",
        );
        let text = render(|w| write_grid(w, &grid));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 23);
        assert_eq!(lines[0], "     0 1 2 3 4 5 6 7 8 9");
        assert_eq!(lines[1], "   +--------------------+");
        assert_eq!(lines[2], " 0 |                    |");
        assert_eq!(lines[21], "19 |[]                []|");
        assert_eq!(lines[22], "   +--------------------+");
    }

    #[test]
    fn test_stats() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(2);
        let text = render(|w| write_stats(w, &stats));
        assert!(text.contains("- score: 300\n"));
        assert!(text.contains("- placed_pieces: 1\n"));
        assert!(text.contains("  - 2 lines: 1\n"));
        assert!(text.contains("  - 4 lines: 0\n"));
    }

    #[test]
    fn test_turn_formats() {
        let evaluator = TurnEvaluator::default();
        let state = GameState::new(PieceKind::O, NextPiece::Ready(PieceKind::I));
        let plan = evaluator.select_best_move(&state).unwrap();
        let evaluation = evaluator.explain(&plan);
        let next: GameState = state.advance(plan.placement().placement()).unwrap();
        assert_eq!(plan.placement().placement(), Placement::new(PieceRotation::new(3).unwrap(), 8));

        let compact = render(|w| write_turn(w, OutputFormat::Compact, 1, &plan, &evaluation, &next));
        assert_eq!(compact, "3 8\nscore: 0\n");

        let pretty = render(|w| write_turn(w, OutputFormat::Pretty, 1, &plan, &evaluation, &next));
        assert!(pretty.contains("    applied action: 3 8\n"));
        assert!(pretty.contains("19 |                [][]|\n"));

        let json = render(|w| write_turn(w, OutputFormat::Json, 1, &plan, &evaluation, &next));
        assert_eq!(json.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["turn"], 1);
        assert_eq!(value["rotation"], 3);
        assert_eq!(value["column"], 8);
        assert_eq!(value["row"], 18);
        assert_eq!(value["evaluation"]["score"], -61.0);
        assert_eq!(value["state"]["falling_piece"], "I");
        assert_eq!(value["state"]["next_piece"], "awaiting");
    }
}
