use std::collections::BTreeSet;
use std::time::Duration;

use rand::{rngs::StdRng, seq::index::sample};

use super::{Difficulty, GameInput, MiniGame, ScoreEvent};
use crate::timer::count_down;

pub const ROWS: usize = 3;
pub const COLS: usize = 4;
pub const CELL_COUNT: usize = ROWS * COLS;
pub const REVEAL_MS: u64 = 2_000;
pub const POINTS_PER_HIT: i64 = 5;
pub const PENALTY_PER_MISS: i64 = 2;

pub type CellPos = (usize, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Showing,
    Selecting,
}

/// Tally of one submitted selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecallScore {
    pub correct: usize,
    pub incorrect: usize,
}

impl RecallScore {
    pub fn delta(&self) -> i64 {
        self.correct as i64 * POINTS_PER_HIT - self.incorrect as i64 * PENALTY_PER_MISS
    }
}

/// "Memory Recall": remember the lit cells, then select them
#[derive(Debug)]
pub struct MemoryRecallGame {
    difficulty: Difficulty,
    highlighted: BTreeSet<CellPos>,
    selected: BTreeSet<CellPos>,
    phase: Phase,
    reveal_left: Duration,
    round: u32,
    rng: StdRng,
}

impl MemoryRecallGame {
    pub fn new(difficulty: Difficulty, rng: StdRng) -> Self {
        let mut game = Self {
            difficulty,
            highlighted: BTreeSet::new(),
            selected: BTreeSet::new(),
            phase: Phase::Showing,
            reveal_left: Duration::ZERO,
            round: 0,
            rng,
        };
        game.init_round();
        game
    }

    /// Install a specific highlight pattern, skipping straight to selection
    pub fn load_round(&mut self, highlighted: impl IntoIterator<Item = CellPos>) {
        self.highlighted = highlighted
            .into_iter()
            .filter(|&(r, c)| r < ROWS && c < COLS)
            .collect();
        self.selected.clear();
        self.phase = Phase::Selecting;
        self.reveal_left = Duration::ZERO;
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn highlighted(&self) -> &BTreeSet<CellPos> {
        &self.highlighted
    }

    pub fn selected(&self) -> &BTreeSet<CellPos> {
        &self.selected
    }

    /// Add the cell if absent, remove it if present. Ignored outside the
    /// selection phase or the grid.
    pub fn toggle_cell(&mut self, row: usize, col: usize) {
        if self.phase != Phase::Selecting || row >= ROWS || col >= COLS {
            return;
        }
        let pos = (row, col);
        if !self.selected.remove(&pos) {
            self.selected.insert(pos);
        }
    }

    /// Missed highlights are not penalized; only selected cells count.
    pub fn evaluate(&self) -> RecallScore {
        let correct = self.selected.intersection(&self.highlighted).count();
        RecallScore {
            correct,
            incorrect: self.selected.len() - correct,
        }
    }

    /// Score the selection and immediately start the next round
    pub fn submit(&mut self, score: &mut i64) -> Option<ScoreEvent> {
        if self.phase != Phase::Selecting {
            return None;
        }
        let result = self.evaluate();
        let delta = result.delta();
        *score += delta;
        self.init_round();
        Some(ScoreEvent {
            success: result.correct > 0,
            delta,
        })
    }
}

impl MiniGame for MemoryRecallGame {
    fn init_round(&mut self) {
        let count = self.difficulty.highlight_count().min(CELL_COUNT);
        self.highlighted = sample(&mut self.rng, CELL_COUNT, count)
            .into_iter()
            .map(|idx| (idx / COLS, idx % COLS))
            .collect();
        self.selected.clear();
        self.phase = Phase::Showing;
        self.reveal_left = Duration::from_millis(REVEAL_MS);
        self.round += 1;
    }

    fn handle_input(&mut self, input: GameInput, score: &mut i64) -> Option<ScoreEvent> {
        match input {
            GameInput::Select(idx) if idx < CELL_COUNT => {
                self.toggle_cell(idx / COLS, idx % COLS);
                None
            }
            GameInput::Select(_) => None,
            GameInput::Submit => self.submit(score),
        }
    }

    fn tick(&mut self, elapsed: Duration) {
        if self.phase == Phase::Showing && count_down(&mut self.reveal_left, elapsed) {
            self.phase = Phase::Selecting;
        }
    }

    fn is_awaiting_input(&self) -> bool {
        self.phase == Phase::Selecting
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn selecting_game(highlighted: &[CellPos]) -> MemoryRecallGame {
        let mut game = MemoryRecallGame::new(Difficulty::Hard, StdRng::seed_from_u64(21));
        game.load_round(highlighted.iter().copied());
        game
    }

    #[test]
    fn test_highlight_count_by_difficulty() {
        for (difficulty, expected) in [
            (Difficulty::Easy, 3),
            (Difficulty::Medium, 5),
            (Difficulty::Hard, 7),
        ] {
            let mut game = MemoryRecallGame::new(difficulty, StdRng::seed_from_u64(1));
            for _ in 0..50 {
                game.init_round();
                assert_eq!(game.highlighted().len(), expected);
                assert!(game
                    .highlighted()
                    .iter()
                    .all(|&(r, c)| r < ROWS && c < COLS));
            }
        }
    }

    #[test]
    fn test_reveal_window_then_selecting() {
        let mut game = MemoryRecallGame::new(Difficulty::Easy, StdRng::seed_from_u64(2));
        assert_eq!(game.phase(), Phase::Showing);
        assert!(!game.is_awaiting_input());

        let mut score = 0;
        game.handle_input(GameInput::Select(0), &mut score);
        assert!(game.selected().is_empty());
        assert_eq!(game.handle_input(GameInput::Submit, &mut score), None);

        game.tick(Duration::from_millis(1_999));
        assert_eq!(game.phase(), Phase::Showing);
        game.tick(Duration::from_millis(1));
        assert_eq!(game.phase(), Phase::Selecting);
        assert!(game.is_awaiting_input());
    }

    #[test]
    fn test_scoring_counts_only_selected_cells() {
        let mut game = selecting_game(&[(0, 0), (1, 2), (2, 3)]);
        game.toggle_cell(0, 0);
        game.toggle_cell(1, 2);
        game.toggle_cell(0, 1);

        assert_eq!(
            game.evaluate(),
            RecallScore {
                correct: 2,
                incorrect: 1
            }
        );

        let mut score = 0;
        let event = game.submit(&mut score);
        assert_eq!(score, 8);
        assert_eq!(
            event,
            Some(ScoreEvent {
                success: true,
                delta: 8
            })
        );
    }

    #[test]
    fn test_empty_submission_scores_nothing() {
        let mut game = selecting_game(&[(0, 0), (1, 1), (2, 2)]);
        let mut score = 4;
        let event = game.submit(&mut score);
        assert_eq!(score, 4);
        assert_eq!(event.map(|e| e.success), Some(false));
    }

    #[test]
    fn test_score_is_not_clamped() {
        let mut game = selecting_game(&[(0, 0)]);
        game.toggle_cell(2, 3);
        game.toggle_cell(2, 2);
        let mut score = 0;
        game.submit(&mut score);
        assert_eq!(score, -4);
    }

    #[test]
    fn test_double_toggle_restores_selection() {
        let mut game = selecting_game(&[(0, 0)]);
        game.toggle_cell(1, 1);
        let before = game.selected().clone();
        game.toggle_cell(2, 0);
        game.toggle_cell(2, 0);
        assert_eq!(game.selected(), &before);
    }

    #[test]
    fn test_select_index_maps_row_major() {
        let mut game = selecting_game(&[(0, 0)]);
        let mut score = 0;
        game.handle_input(GameInput::Select(6), &mut score);
        game.handle_input(GameInput::Select(11), &mut score);
        game.handle_input(GameInput::Select(12), &mut score);
        assert_eq!(
            game.selected().iter().copied().collect::<Vec<_>>(),
            vec![(1, 2), (2, 3)]
        );
    }

    #[test]
    fn test_submit_starts_next_round_immediately() {
        let mut game = selecting_game(&[(0, 0)]);
        let round = game.round();
        game.toggle_cell(0, 0);
        let mut score = 0;
        game.handle_input(GameInput::Submit, &mut score);
        assert_eq!(game.round(), round + 1);
        assert_eq!(game.phase(), Phase::Showing);
        assert!(game.selected().is_empty());
        assert_eq!(game.highlighted().len(), Difficulty::Hard.highlight_count());
    }

    #[test]
    fn test_out_of_grid_toggle_ignored() {
        let mut game = selecting_game(&[(0, 0)]);
        game.toggle_cell(3, 0);
        game.toggle_cell(0, 4);
        assert!(game.selected().is_empty());
    }
}
