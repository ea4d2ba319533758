use rand::Rng;

use super::board::{Board, BOARD_SIZE};
use super::types::{Difficulty, GameOutcome, Mark, Statistics};
use crate::ai;

/// Central game state holding everything needed for one round.
#[derive(Debug, Clone)]
pub struct GameState {
    pub board: Board,
    /// Whose turn is next. Alternates on every applied move; X opens.
    pub current_player: Mark,
    pub outcome: GameOutcome,
    /// Which side the engine controls. O unless the computer opens the round.
    pub computer_mark: Mark,
    pub difficulty: Difficulty,
    pub moves_made: u32,
    pub tip: Option<(usize, usize)>,
    pub hovered: Option<(usize, usize)>,
    pub statistics: Statistics,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_player: Mark::X,
            outcome: GameOutcome::Running,
            computer_mark: Mark::O,
            difficulty: Difficulty::Medium,
            moves_made: 0,
            tip: None,
            hovered: None,
            statistics: Statistics::default(),
        }
    }

    /// Start a fresh round, keeping statistics and difficulty.
    pub fn new_game(&mut self) {
        self.board = Board::new();
        self.current_player = Mark::X;
        self.outcome = GameOutcome::Running;
        self.computer_mark = Mark::O;
        self.moves_made = 0;
        self.tip = None;
        self.hovered = None;
    }

    /// Returns `true` if (row, col) is a legal target for the side to move.
    /// Out-of-range coordinates are rejected here rather than panicking.
    pub fn is_valid_move(&self, row: usize, col: usize) -> bool {
        if self.outcome != GameOutcome::Running {
            return false;
        }
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return false;
        }
        self.board.is_empty(row, col)
    }

    /// Place the current player's mark at (row, col). On an invalid request
    /// nothing is touched and `MoveResult::Invalid` comes back; the caller
    /// simply drops the input event.
    pub fn make_move(&mut self, row: usize, col: usize) -> MoveResult {
        if !self.is_valid_move(row, col) {
            return MoveResult::Invalid;
        }

        self.board.set(row, col, self.current_player);
        self.outcome = Self::derive_outcome(&self.board);
        self.current_player = self.current_player.opponent();
        self.moves_made += 1;
        self.tip = None;

        if self.outcome != GameOutcome::Running {
            self.finish();
            return MoveResult::GameOver;
        }
        MoveResult::Continue
    }

    /// Recompute the outcome for a board: a completed line wins, a full
    /// board without one ties, anything else keeps the game running.
    fn derive_outcome(board: &Board) -> GameOutcome {
        if let Some(mark) = board.winner() {
            GameOutcome::Win(mark)
        } else if board.is_full() {
            GameOutcome::Tie
        } else {
            GameOutcome::Running
        }
    }

    /// Let the engine pick a move for the computer's side. `None` only if
    /// called with no empty cell left, which a correct driver never does.
    pub fn compute_ai_move<R: Rng>(&self, rng: &mut R) -> Option<(usize, usize)> {
        ai::calculate_move(self.difficulty, &self.board, self.computer_mark, rng)
    }

    /// Calculate and store a suggested move for the side to move.
    pub fn get_tip(&mut self) {
        if self.outcome != GameOutcome::Running {
            return;
        }
        self.tip = ai::best_move(&self.board, self.current_player);
    }

    /// Hand the opening move to the computer. Only meaningful before
    /// anything has been played.
    pub fn computer_begins(&mut self) {
        if self.moves_made == 0 && self.outcome == GameOutcome::Running {
            self.computer_mark = self.current_player;
        }
    }

    /// Update the hover position (for highlighting).
    pub fn update_hover(&mut self, row: usize, col: usize) {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            self.hovered = None;
            return;
        }
        self.hovered = if self.is_valid_move(row, col) {
            Some((row, col))
        } else {
            None
        };
    }

    pub fn clear_hover(&mut self) {
        self.hovered = None;
    }

    fn finish(&mut self) {
        // Called exactly once per round, on the transition out of Running.
        self.statistics.record(self.outcome);
    }
}

/// Result of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    /// Move was invalid / rejected.
    Invalid,
    /// Move applied, game is still running (opponent's turn next).
    Continue,
    /// Move applied, game is now over.
    GameOver,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Play a sequence of (row, col) moves, asserting each one is accepted.
    fn play(state: &mut GameState, moves: &[(usize, usize)]) {
        for &(row, col) in moves {
            assert_ne!(state.make_move(row, col), MoveResult::Invalid);
        }
    }

    #[test]
    fn x_opens_and_turns_alternate() {
        let mut state = GameState::new();
        assert_eq!(state.current_player, Mark::X);
        state.make_move(0, 0);
        assert_eq!(state.current_player, Mark::O);
        state.make_move(1, 1);
        assert_eq!(state.current_player, Mark::X);
        assert_eq!(state.board.get(0, 0), Some(Mark::X));
        assert_eq!(state.board.get(1, 1), Some(Mark::O));
    }

    #[test]
    fn occupied_cell_is_rejected_without_mutation() {
        let mut state = GameState::new();
        state.make_move(0, 0);
        let before = state.clone();

        assert_eq!(state.make_move(0, 0), MoveResult::Invalid);
        assert_eq!(state.board, before.board);
        assert_eq!(state.current_player, before.current_player);
        assert_eq!(state.outcome, before.outcome);
        assert_eq!(state.moves_made, before.moves_made);
    }

    #[test]
    fn out_of_range_is_rejected_without_panic() {
        let mut state = GameState::new();
        assert_eq!(state.make_move(3, 0), MoveResult::Invalid);
        assert_eq!(state.make_move(0, 3), MoveResult::Invalid);
        assert_eq!(state.make_move(usize::MAX, usize::MAX), MoveResult::Invalid);
        assert_eq!(state.moves_made, 0);
    }

    #[test]
    fn completed_line_ends_the_game() {
        let mut state = GameState::new();
        // X: top row. O: scattered.
        play(&mut state, &[(0, 0), (1, 0), (0, 1), (1, 1)]);
        assert_eq!(state.make_move(0, 2), MoveResult::GameOver);
        assert_eq!(state.outcome, GameOutcome::Win(Mark::X));
        assert_eq!(state.statistics.x_wins, 1);
    }

    #[test]
    fn moves_after_game_over_are_rejected() {
        let mut state = GameState::new();
        play(&mut state, &[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);
        let before = state.clone();

        assert_eq!(state.make_move(2, 2), MoveResult::Invalid);
        assert_eq!(state.board, before.board);
        assert_eq!(state.outcome, before.outcome);
        // The win is counted once, on the terminal transition only.
        assert_eq!(state.statistics.x_wins, 1);
    }

    #[test]
    fn full_board_without_line_is_a_tie() {
        let mut state = GameState::new();
        // X O X / X X O / O X O, played in a legal order.
        let moves = [
            (0, 0),
            (0, 1),
            (0, 2),
            (1, 2),
            (1, 0),
            (2, 0),
            (1, 1),
            (2, 2),
            (2, 1),
        ];
        for (i, &(row, col)) in moves.iter().enumerate() {
            let result = state.make_move(row, col);
            if i < moves.len() - 1 {
                assert_eq!(result, MoveResult::Continue);
            } else {
                assert_eq!(result, MoveResult::GameOver);
            }
        }
        assert_eq!(state.outcome, GameOutcome::Tie);
        assert_eq!(state.statistics.ties, 1);
    }

    #[test]
    fn new_game_restores_initial_state_but_keeps_statistics() {
        let mut state = GameState::new();
        state.difficulty = Difficulty::Hard;
        state.computer_begins();
        play(&mut state, &[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);
        assert_eq!(state.outcome, GameOutcome::Win(Mark::X));

        state.new_game();
        assert_eq!(state.board, Board::new());
        assert_eq!(state.current_player, Mark::X);
        assert_eq!(state.outcome, GameOutcome::Running);
        assert_eq!(state.computer_mark, Mark::O);
        assert_eq!(state.moves_made, 0);
        assert_eq!(state.tip, None);
        // Accumulated counters and the chosen difficulty survive the reset.
        assert_eq!(state.statistics.x_wins, 1);
        assert_eq!(state.difficulty, Difficulty::Hard);
    }

    #[test]
    fn computer_begins_only_before_the_first_move() {
        let mut state = GameState::new();
        state.make_move(0, 0);
        state.computer_begins();
        assert_eq!(state.computer_mark, Mark::O);

        state.new_game();
        state.computer_begins();
        assert_eq!(state.computer_mark, Mark::X);
    }

    #[test]
    fn hover_tracks_only_legal_targets() {
        let mut state = GameState::new();
        state.update_hover(1, 1);
        assert_eq!(state.hovered, Some((1, 1)));

        state.make_move(1, 1);
        state.update_hover(1, 1);
        assert_eq!(state.hovered, None);

        state.update_hover(5, 5);
        assert_eq!(state.hovered, None);
    }

    /// Walk every reachable game, checking that each terminal state carries
    /// exactly one verdict and that wins match a completed line on the board.
    #[test]
    fn every_reachable_game_ends_consistently() {
        fn visit(state: &GameState, terminals: &mut u32) {
            if state.outcome != GameOutcome::Running {
                *terminals += 1;
                match state.outcome {
                    GameOutcome::Win(mark) => {
                        assert_eq!(state.board.winner(), Some(mark));
                    }
                    GameOutcome::Tie => {
                        assert!(state.board.is_full());
                        assert_eq!(state.board.winner(), None);
                    }
                    GameOutcome::Running => unreachable!(),
                }
                return;
            }
            assert_eq!(state.board.winner(), None);
            for (row, col) in state.board.empty_cells() {
                let mut child = state.clone();
                assert_ne!(child.make_move(row, col), MoveResult::Invalid);
                visit(&child, terminals);
            }
        }

        let mut terminals = 0;
        visit(&GameState::new(), &mut terminals);
        // The full 3×3 game tree has exactly 255168 distinct playouts.
        assert_eq!(terminals, 255_168);
    }
}
