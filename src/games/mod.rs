pub mod choice;
pub mod memory_recall;
pub mod shape_match;

use std::time::Duration;

use clap::ValueEnum;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

pub use choice::ChoiceGame;
pub use memory_recall::MemoryRecallGame;
pub use shape_match::ShapeMatchGame;

/// The three mini-games offered by the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum GameVariant {
    #[strum(to_string = "Pick the Bigger")]
    Choice,
    #[strum(to_string = "Find the Shape")]
    ShapeMatch,
    #[strum(to_string = "Memory Recall")]
    MemoryRecall,
}

impl GameVariant {
    pub const ALL: [GameVariant; 3] = [
        GameVariant::Choice,
        GameVariant::ShapeMatch,
        GameVariant::MemoryRecall,
    ];

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    pub fn index(&self) -> usize {
        match self {
            GameVariant::Choice => 0,
            GameVariant::ShapeMatch => 1,
            GameVariant::MemoryRecall => 2,
        }
    }

    /// Identifier used as the high-score key
    pub fn key(&self) -> &'static str {
        match self {
            GameVariant::Choice => "two_choice",
            GameVariant::ShapeMatch => "shape_grid",
            GameVariant::MemoryRecall => "memory_grid",
        }
    }

    pub fn rules(&self) -> &'static [&'static str] {
        match self {
            GameVariant::Choice => &[
                "Two numbers appear side by side.",
                "Pick the larger one with the LEFT/RIGHT arrows or a click.",
                "Correct: +10 points. Wrong: -5 points.",
                "When both are equal the right one counts as larger.",
            ],
            GameVariant::ShapeMatch => &[
                "A 3x3 grid of shapes appears with a target above it.",
                "Select a matching shape with keys 1-9 or a click.",
                "If a color is named, the color must match too.",
                "Correct: +15 points. Wrong: -5 points (never below 0).",
            ],
            GameVariant::MemoryRecall => &[
                "Some squares light up for two seconds. Remember them!",
                "Then toggle the squares you saw with 1-9, 0, - and = or a click.",
                "Press ENTER to submit your selection.",
                "Each correct square: +5 points. Each wrong square: -2 points.",
            ],
        }
    }
}

/// Number of cells lit in each memory round
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    #[default]
    Hard,
}

impl Difficulty {
    pub fn highlight_count(&self) -> usize {
        match self {
            Difficulty::Easy => 3,
            Difficulty::Medium => 5,
            Difficulty::Hard => 7,
        }
    }
}

/// Normalized input delivered to an engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameInput {
    /// Cell, box or item index; the engine decides what it addresses
    Select(usize),
    Submit,
}

/// Emitted by an engine every time it scores an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreEvent {
    pub success: bool,
    pub delta: i64,
}

/// Capability set shared by every mini-game
pub trait MiniGame {
    /// Replace the current round with a freshly generated one
    fn init_round(&mut self);

    /// Apply one input to the round. The engine mutates `score` in place and
    /// returns the scoring event when the input was evaluated.
    fn handle_input(&mut self, input: GameInput, score: &mut i64) -> Option<ScoreEvent>;

    /// Advance feedback and reveal countdowns
    fn tick(&mut self, elapsed: Duration);

    fn is_awaiting_input(&self) -> bool;
}

/// The active engine, selected by variant
#[derive(Debug)]
pub enum Engine {
    Choice(ChoiceGame),
    ShapeMatch(ShapeMatchGame),
    MemoryRecall(MemoryRecallGame),
}

impl Engine {
    pub fn new(variant: GameVariant, difficulty: Difficulty, rng: StdRng) -> Self {
        match variant {
            GameVariant::Choice => Engine::Choice(ChoiceGame::new(rng)),
            GameVariant::ShapeMatch => Engine::ShapeMatch(ShapeMatchGame::new(rng)),
            GameVariant::MemoryRecall => {
                Engine::MemoryRecall(MemoryRecallGame::new(difficulty, rng))
            }
        }
    }

    pub fn variant(&self) -> GameVariant {
        match self {
            Engine::Choice(_) => GameVariant::Choice,
            Engine::ShapeMatch(_) => GameVariant::ShapeMatch,
            Engine::MemoryRecall(_) => GameVariant::MemoryRecall,
        }
    }

    fn as_game(&self) -> &dyn MiniGame {
        match self {
            Engine::Choice(g) => g,
            Engine::ShapeMatch(g) => g,
            Engine::MemoryRecall(g) => g,
        }
    }

    fn as_game_mut(&mut self) -> &mut dyn MiniGame {
        match self {
            Engine::Choice(g) => g,
            Engine::ShapeMatch(g) => g,
            Engine::MemoryRecall(g) => g,
        }
    }
}

impl MiniGame for Engine {
    fn init_round(&mut self) {
        self.as_game_mut().init_round()
    }

    fn handle_input(&mut self, input: GameInput, score: &mut i64) -> Option<ScoreEvent> {
        self.as_game_mut().handle_input(input, score)
    }

    fn tick(&mut self, elapsed: Duration) {
        self.as_game_mut().tick(elapsed)
    }

    fn is_awaiting_input(&self) -> bool {
        self.as_game().is_awaiting_input()
    }
}
