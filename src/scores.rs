use std::cell::{Cell, RefCell};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs::AppDirs;
use crate::games::GameVariant;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("high score file i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("high score file is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Best score per variant, as persisted on disk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScores {
    #[serde(default)]
    pub two_choice: u32,
    #[serde(default)]
    pub shape_grid: u32,
    #[serde(default)]
    pub memory_grid: u32,
}

impl HighScores {
    pub fn best(&self, variant: GameVariant) -> u32 {
        match variant {
            GameVariant::Choice => self.two_choice,
            GameVariant::ShapeMatch => self.shape_grid,
            GameVariant::MemoryRecall => self.memory_grid,
        }
    }

    fn slot_mut(&mut self, variant: GameVariant) -> &mut u32 {
        match variant {
            GameVariant::Choice => &mut self.two_choice,
            GameVariant::ShapeMatch => &mut self.shape_grid,
            GameVariant::MemoryRecall => &mut self.memory_grid,
        }
    }

    /// Raise the stored best when `score` strictly beats it.
    /// Returns true if the record changed.
    pub fn record(&mut self, variant: GameVariant, score: i64) -> bool {
        let slot = self.slot_mut(variant);
        if score > i64::from(*slot) {
            *slot = u32::try_from(score).unwrap_or(u32::MAX);
            true
        } else {
            false
        }
    }
}

pub trait HighScoreStore {
    fn load(&self) -> Result<HighScores, StoreError>;
    fn save(&self, scores: &HighScores) -> Result<(), StoreError>;
}

/// JSON file store. Saves replace the whole file through a rename so a
/// failed write never leaves a truncated record behind.
#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::highscores_path().unwrap_or_else(|| PathBuf::from("highscores.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileHighScoreStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn load(&self) -> Result<HighScores, StoreError> {
        let bytes = fs::read(&self.path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn save(&self, scores: &HighScores) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let data = serde_json::to_vec_pretty(scores)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-process store for headless runs and tests. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScoreStore {
    scores: Rc<RefCell<Option<HighScores>>>,
    saves: Rc<Cell<usize>>,
}

impl MemoryHighScoreStore {
    pub fn with_scores(scores: HighScores) -> Self {
        Self {
            scores: Rc::new(RefCell::new(Some(scores))),
            saves: Rc::default(),
        }
    }

    pub fn stored(&self) -> Option<HighScores> {
        *self.scores.borrow()
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load(&self) -> Result<HighScores, StoreError> {
        self.scores.borrow().ok_or_else(|| {
            StoreError::Io(io::Error::new(io::ErrorKind::NotFound, "no scores saved"))
        })
    }

    fn save(&self, scores: &HighScores) -> Result<(), StoreError> {
        *self.scores.borrow_mut() = Some(*scores);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
