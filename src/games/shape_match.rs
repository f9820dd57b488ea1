use std::time::Duration;

use rand::{rngs::StdRng, seq::SliceRandom, Rng};

use super::{GameInput, MiniGame, ScoreEvent};
use crate::timer::count_down;

pub const GRID_SIZE: usize = 3;
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;
pub const FEEDBACK_MS: u64 = 800;
pub const CORRECT_POINTS: i64 = 15;
pub const WRONG_PENALTY: i64 = 5;
pub const SHAKE_MAGNITUDE: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "title_case")]
pub enum Shape {
    Circle,
    Square,
    Triangle,
    Star,
    Diamond,
}

impl Shape {
    pub const ALL: [Shape; 5] = [
        Shape::Circle,
        Shape::Square,
        Shape::Triangle,
        Shape::Star,
        Shape::Diamond,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "title_case")]
pub enum ShapeColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
}

impl ShapeColor {
    pub const ALL: [ShapeColor; 5] = [
        ShapeColor::Red,
        ShapeColor::Blue,
        ShapeColor::Green,
        ShapeColor::Yellow,
        ShapeColor::Purple,
    ];
}

pub const ROTATIONS: [u16; 4] = [0, 90, 180, 270];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub shape: Shape,
    pub color: ShapeColor,
    pub rotation: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub shape: Shape,
    pub color: ShapeColor,
    pub color_constrained: bool,
}

impl Target {
    pub fn matches(&self, cell: &Cell) -> bool {
        cell.shape == self.shape && (!self.color_constrained || cell.color == self.color)
    }

    /// Prompt text, e.g. "Find: Star (Blue)"
    pub fn describe(&self) -> String {
        if self.color_constrained {
            format!("Find: {} ({})", self.shape, self.color)
        } else {
            format!("Find: {}", self.shape)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeFeedback {
    pub cell: usize,
    pub correct: bool,
}

/// "Find the Shape": pick a cell matching the target
#[derive(Debug)]
pub struct ShapeMatchGame {
    cells: [Cell; CELL_COUNT],
    target: Target,
    feedback_left: Duration,
    feedback: Option<ShapeFeedback>,
    shake: u8,
    rng: StdRng,
}

impl ShapeMatchGame {
    pub fn new(rng: StdRng) -> Self {
        let placeholder = Cell {
            shape: Shape::Circle,
            color: ShapeColor::Red,
            rotation: 0,
        };
        let mut game = Self {
            cells: [placeholder; CELL_COUNT],
            target: Target {
                shape: Shape::Circle,
                color: ShapeColor::Red,
                color_constrained: false,
            },
            feedback_left: Duration::ZERO,
            feedback: None,
            shake: 0,
            rng,
        };
        game.init_round();
        game
    }

    /// Install a specific grid and target as the current round
    pub fn load_round(&mut self, cells: [Cell; CELL_COUNT], target: Target) {
        self.cells = cells;
        self.target = target;
        self.feedback_left = Duration::ZERO;
        self.feedback = None;
    }

    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn feedback(&self) -> Option<ShapeFeedback> {
        self.feedback
    }

    /// Current shake magnitude; zero when the grid is at rest
    pub fn shake(&self) -> u8 {
        self.shake
    }

    pub fn evaluate(&self, idx: usize) -> Option<bool> {
        self.cells.get(idx).map(|cell| self.target.matches(cell))
    }

    fn random_cell(rng: &mut StdRng) -> Cell {
        Cell {
            shape: *Shape::ALL.choose(rng).unwrap_or(&Shape::Circle),
            color: *ShapeColor::ALL.choose(rng).unwrap_or(&ShapeColor::Red),
            rotation: *ROTATIONS.choose(rng).unwrap_or(&0),
        }
    }
}

impl MiniGame for ShapeMatchGame {
    fn init_round(&mut self) {
        for cell in self.cells.iter_mut() {
            *cell = Self::random_cell(&mut self.rng);
        }
        let source = self.cells[self.rng.gen_range(0..CELL_COUNT)];
        self.target = Target {
            shape: source.shape,
            color: source.color,
            color_constrained: self.rng.gen_bool(0.5),
        };
        self.feedback = None;
    }

    fn handle_input(&mut self, input: GameInput, score: &mut i64) -> Option<ScoreEvent> {
        if !self.feedback_left.is_zero() {
            return None;
        }
        let GameInput::Select(idx) = input else {
            return None;
        };
        let correct = self.evaluate(idx)?;

        let before = *score;
        if correct {
            *score += CORRECT_POINTS;
        } else {
            *score = (*score - WRONG_PENALTY).max(0);
            self.shake = SHAKE_MAGNITUDE;
        }
        self.feedback = Some(ShapeFeedback { cell: idx, correct });
        self.feedback_left = Duration::from_millis(FEEDBACK_MS);

        Some(ScoreEvent {
            success: correct,
            delta: *score - before,
        })
    }

    fn tick(&mut self, elapsed: Duration) {
        self.shake = self.shake.saturating_sub(1);
        if count_down(&mut self.feedback_left, elapsed) {
            self.init_round();
        }
    }

    fn is_awaiting_input(&self) -> bool {
        self.feedback_left.is_zero()
    }
}
