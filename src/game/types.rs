/// One of the two marks that can occupy a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// The mark belonging to the other side.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Display form, also used as a Fluent message argument.
    pub fn as_str(self) -> &'static str {
        match self {
            Mark::X => "X",
            Mark::O => "O",
        }
    }
}

/// Outcome of the game. `Running` until a line is completed or the board
/// fills up; terminal states are only left via `GameState::new_game`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Running,
    Win(Mark),
    Tie,
}

/// Strength of the computer opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Position on the settings scale (0–2).
    pub fn index(self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }

    pub fn from_index(idx: usize) -> Self {
        *Self::ALL.get(idx).unwrap_or(&Difficulty::Hard)
    }

    /// Fluent message identifier for the localized name.
    pub fn label_key(self) -> &'static str {
        match self {
            Difficulty::Easy => "difficulty-easy",
            Difficulty::Medium => "difficulty-medium",
            Difficulty::Hard => "difficulty-hard",
        }
    }
}

/// Cumulative per-mark win/tie counters across rounds. In-memory only;
/// reset from the settings dialog, never by starting a new round.
#[derive(Debug, Clone, Copy, Default)]
pub struct Statistics {
    pub x_wins: u32,
    pub o_wins: u32,
    pub ties: u32,
}

impl Statistics {
    pub fn record(&mut self, outcome: GameOutcome) {
        match outcome {
            GameOutcome::Win(Mark::X) => self.x_wins += 1,
            GameOutcome::Win(Mark::O) => self.o_wins += 1,
            GameOutcome::Tie => self.ties += 1,
            GameOutcome::Running => {}
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_increments_matching_counter() {
        let mut stats = Statistics::default();
        stats.record(GameOutcome::Win(Mark::X));
        stats.record(GameOutcome::Win(Mark::X));
        stats.record(GameOutcome::Win(Mark::O));
        stats.record(GameOutcome::Tie);
        assert_eq!(stats.x_wins, 2);
        assert_eq!(stats.o_wins, 1);
        assert_eq!(stats.ties, 1);
    }

    #[test]
    fn record_running_is_a_no_op() {
        let mut stats = Statistics::default();
        stats.record(GameOutcome::Running);
        assert_eq!(stats.x_wins, 0);
        assert_eq!(stats.o_wins, 0);
        assert_eq!(stats.ties, 0);
    }

    #[test]
    fn reset_clears_all_counters() {
        let mut stats = Statistics {
            x_wins: 3,
            o_wins: 1,
            ties: 4,
        };
        stats.reset();
        assert_eq!(stats.x_wins, 0);
        assert_eq!(stats.o_wins, 0);
        assert_eq!(stats.ties, 0);
    }

    #[test]
    fn difficulty_index_roundtrip() {
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::from_index(d.index()), d);
        }
        // Out-of-range input falls back to the strongest level.
        assert_eq!(Difficulty::from_index(7), Difficulty::Hard);
    }
}
