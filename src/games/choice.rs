use std::time::Duration;

use rand::{rngs::StdRng, Rng};

use super::{GameInput, MiniGame, ScoreEvent};
use crate::timer::count_down;

pub const FEEDBACK_MS: u64 = 500;
pub const CORRECT_POINTS: i64 = 10;
pub const WRONG_PENALTY: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn from_index(idx: usize) -> Option<Self> {
        match idx {
            0 => Some(Side::Left),
            1 => Some(Side::Right),
            _ => None,
        }
    }
}

/// Result of the last answer, shown while the feedback window runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceFeedback {
    pub picked: Side,
    pub correct: bool,
}

/// "Pick the Bigger": two numbers, choose the larger
#[derive(Debug)]
pub struct ChoiceGame {
    left: u32,
    right: u32,
    awaiting_input: bool,
    feedback_left: Duration,
    feedback: Option<ChoiceFeedback>,
    rng: StdRng,
}

impl ChoiceGame {
    pub fn new(rng: StdRng) -> Self {
        let mut game = Self {
            left: 0,
            right: 0,
            awaiting_input: false,
            feedback_left: Duration::ZERO,
            feedback: None,
            rng,
        };
        game.init_round();
        game
    }

    /// Install a specific pair of values as the current round
    pub fn load_round(&mut self, left: u32, right: u32) {
        self.left = left;
        self.right = right;
        self.awaiting_input = true;
        self.feedback_left = Duration::ZERO;
        self.feedback = None;
    }

    pub fn values(&self) -> (u32, u32) {
        (self.left, self.right)
    }

    pub fn feedback(&self) -> Option<ChoiceFeedback> {
        self.feedback
    }

    /// The larger side. Ties favor Right.
    pub fn larger(&self) -> Side {
        if self.left > self.right {
            Side::Left
        } else {
            Side::Right
        }
    }

    pub fn evaluate(&self, picked: Side) -> bool {
        picked == self.larger()
    }
}

impl MiniGame for ChoiceGame {
    fn init_round(&mut self) {
        self.left = self.rng.gen_range(1..=100);
        self.right = self.rng.gen_range(1..=100);
        self.awaiting_input = true;
    }

    fn handle_input(&mut self, input: GameInput, score: &mut i64) -> Option<ScoreEvent> {
        if !self.awaiting_input {
            return None;
        }
        let GameInput::Select(idx) = input else {
            return None;
        };
        let picked = Side::from_index(idx)?;

        let correct = self.evaluate(picked);
        let delta = if correct {
            CORRECT_POINTS
        } else {
            -WRONG_PENALTY
        };
        *score += delta;

        self.init_round();
        self.feedback = Some(ChoiceFeedback { picked, correct });
        self.feedback_left = Duration::from_millis(FEEDBACK_MS);
        self.awaiting_input = false;

        Some(ScoreEvent {
            success: correct,
            delta,
        })
    }

    fn tick(&mut self, elapsed: Duration) {
        if count_down(&mut self.feedback_left, elapsed) {
            self.feedback = None;
            self.awaiting_input = true;
        }
    }

    fn is_awaiting_input(&self) -> bool {
        self.awaiting_input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn game_with(left: u32, right: u32) -> ChoiceGame {
        let mut game = ChoiceGame::new(StdRng::seed_from_u64(7));
        game.load_round(left, right);
        game
    }

    #[test]
    fn test_values_in_range() {
        let mut game = ChoiceGame::new(StdRng::seed_from_u64(42));
        for _ in 0..500 {
            game.init_round();
            let (l, r) = game.values();
            assert!((1..=100).contains(&l));
            assert!((1..=100).contains(&r));
        }
    }

    #[test]
    fn test_picking_larger_scores_ten() {
        let mut game = game_with(30, 70);
        let mut score = 0;
        let event = game.handle_input(GameInput::Select(1), &mut score);
        assert_eq!(score, 10);
        assert_eq!(
            event,
            Some(ScoreEvent {
                success: true,
                delta: 10
            })
        );
    }

    #[test]
    fn test_picking_smaller_costs_five_and_may_go_negative() {
        let mut game = game_with(30, 70);
        let mut score = 0;
        let event = game.handle_input(GameInput::Select(0), &mut score);
        assert_eq!(score, -5);
        assert_eq!(event.map(|e| e.success), Some(false));
    }

    #[test]
    fn test_ties_favor_right() {
        let mut game = game_with(50, 50);
        assert_eq!(game.larger(), Side::Right);
        let mut score = 0;
        game.handle_input(GameInput::Select(1), &mut score);
        assert_eq!(score, 10);

        let mut game = game_with(50, 50);
        let mut score = 0;
        game.handle_input(GameInput::Select(0), &mut score);
        assert_eq!(score, -5);
    }

    #[test]
    fn test_input_blocked_during_feedback_window() {
        let mut game = game_with(80, 20);
        let mut score = 0;
        game.handle_input(GameInput::Select(0), &mut score);
        assert!(!game.is_awaiting_input());
        assert!(game.feedback().is_some());

        assert_eq!(game.handle_input(GameInput::Select(0), &mut score), None);
        assert_eq!(score, 10);

        game.tick(Duration::from_millis(300));
        assert!(!game.is_awaiting_input());
        game.tick(Duration::from_millis(200));
        assert!(game.is_awaiting_input());
        assert!(game.feedback().is_none());
    }

    #[test]
    fn test_next_round_generated_immediately() {
        let mut game = game_with(200, 300);
        let mut score = 0;
        game.handle_input(GameInput::Select(1), &mut score);
        let (l, r) = game.values();
        // the loaded values were out of the generated range
        assert!(l <= 100 && r <= 100);
    }

    #[test]
    fn test_invalid_inputs_are_ignored() {
        let mut game = game_with(10, 20);
        let mut score = 0;
        assert_eq!(game.handle_input(GameInput::Select(2), &mut score), None);
        assert_eq!(game.handle_input(GameInput::Submit, &mut score), None);
        assert_eq!(score, 0);
        assert!(game.is_awaiting_input());
    }
}
