use serde::{Deserialize, Serialize};

/// Score values for line clears.
///
/// Index corresponds to number of lines cleared simultaneously:
/// - 0 lines: 0 points
/// - 1 line: 100 points
/// - 2 lines: 300 points
/// - 3 lines: 500 points
/// - 4 lines: 800 points
const SCORE_TABLE: [usize; 5] = [0, 100, 300, 500, 800];

/// Largest number of rows a single piece can clear.
pub const MAX_LINES_PER_CLEAR: usize = 4;

/// Game statistics tracking score, lines cleared, and piece count.
///
/// - **Score**: Points earned from line clears
/// - **Placed pieces**: Total number of pieces locked
/// - **Line clear distribution**: Count of single, double, triple, quad line clears
///
/// All counters only ever grow.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(4);
///
/// assert_eq!(stats.score(), 800);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.line_clears(4), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    score: usize,
    placed_pieces: usize,
    total_cleared_lines: usize,
    line_clear_counter: [usize; MAX_LINES_PER_CLEAR],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a new game statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            placed_pieces: 0,
            total_cleared_lines: 0,
            line_clear_counter: [0; MAX_LINES_PER_CLEAR],
        }
    }

    /// Returns the current score (sum of all line clear points).
    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Returns the total number of pieces that have been locked into place.
    #[must_use]
    pub const fn placed_pieces(&self) -> usize {
        self.placed_pieces
    }

    /// Returns the total number of lines cleared across all line clears.
    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns how many drops cleared exactly `lines` rows at once.
    ///
    /// Only 1 to 4 are tracked; any other count reports zero.
    #[must_use]
    pub fn line_clears(&self, lines: usize) -> usize {
        lines
            .checked_sub(1)
            .and_then(|i| self.line_clear_counter.get(i))
            .copied()
            .unwrap_or(0)
    }

    /// Returns the histogram of line clears.
    ///
    /// Array indices represent:
    /// - `[0]`: Number of singles (1 line)
    /// - `[1]`: Number of doubles (2 lines)
    /// - `[2]`: Number of triples (3 lines)
    /// - `[3]`: Number of quads (4 lines)
    #[must_use]
    pub const fn line_clear_counter(&self) -> &[usize; MAX_LINES_PER_CLEAR] {
        &self.line_clear_counter
    }

    /// Updates statistics after a piece drop.
    ///
    /// This should be called each time a piece is locked into place.
    ///
    /// # Arguments
    ///
    /// * `cleared_lines` - Number of lines cleared (0-4)
    pub fn complete_piece_drop(&mut self, cleared_lines: usize) {
        debug_assert!(cleared_lines <= MAX_LINES_PER_CLEAR);
        self.placed_pieces += 1;
        if cleared_lines == 0 {
            return;
        }
        self.total_cleared_lines += cleared_lines;
        if let Some(count) = self.line_clear_counter.get_mut(cleared_lines - 1) {
            *count += 1;
        }
        self.score += SCORE_TABLE.get(cleared_lines).copied().unwrap_or(0);
    }
}
