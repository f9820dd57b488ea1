use std::time::Duration;

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::games::{Difficulty, Engine, GameInput, GameVariant, MiniGame};
use crate::scores::{HighScoreStore, HighScores};
use crate::timer::{RoundTimer, SESSION_DURATION_MS};

/// Normalized events delivered by the presentation adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    PointerSelect(usize),
    KeySelect(usize),
    Submit,
    Confirm,
    Cancel,
    ToggleMute,
    ShowRules,
    Previous,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Menu,
    Rules(GameVariant),
    Playing(GameVariant),
    GameOver {
        variant: GameVariant,
        final_score: i64,
    },
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub difficulty: Difficulty,
    pub sound_enabled: bool,
    pub duration_ms: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            sound_enabled: true,
            duration_ms: SESSION_DURATION_MS,
        }
    }
}

/// One timed play-through of a single variant
#[derive(Debug)]
struct Session {
    score: i64,
    timer: RoundTimer,
    engine: Engine,
    rules_open: bool,
}

/// Drives the menu → rules → game → game-over flow
pub struct SessionController {
    state: SessionState,
    session: Option<Session>,
    clock: Duration,
    menu_cursor: usize,
    settings: SessionSettings,
    high_scores: HighScores,
    store: Box<dyn HighScoreStore>,
    feedback: Vec<bool>,
    new_best: bool,
    rng: StdRng,
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("state", &self.state)
            .field("session", &self.session)
            .field("clock", &self.clock)
            .field("high_scores", &self.high_scores)
            .finish_non_exhaustive()
    }
}

impl SessionController {
    pub fn new(store: Box<dyn HighScoreStore>, settings: SessionSettings) -> Self {
        Self::with_rng(store, settings, StdRng::from_entropy())
    }

    /// Deterministic controller for tests and replays
    pub fn with_seed(store: Box<dyn HighScoreStore>, settings: SessionSettings, seed: u64) -> Self {
        Self::with_rng(store, settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(store: Box<dyn HighScoreStore>, settings: SessionSettings, rng: StdRng) -> Self {
        let high_scores = match store.load() {
            Ok(scores) => scores,
            Err(err) => {
                warn!(%err, "using empty high scores");
                HighScores::default()
            }
        };
        Self {
            state: SessionState::Menu,
            session: None,
            clock: Duration::ZERO,
            menu_cursor: 0,
            settings,
            high_scores,
            store,
            feedback: Vec::new(),
            new_best: false,
            rng,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn score(&self) -> Option<i64> {
        match self.state {
            SessionState::GameOver { final_score, .. } => Some(final_score),
            _ => self.session.as_ref().map(|s| s.score),
        }
    }

    pub fn time_left(&self) -> Option<Duration> {
        self.session
            .as_ref()
            .map(|s| s.timer.time_left(self.now_ms()))
    }

    /// Remaining fraction of the session timer
    pub fn time_progress(&self) -> Option<f64> {
        self.session
            .as_ref()
            .map(|s| s.timer.progress(self.now_ms()))
    }

    pub fn engine(&self) -> Option<&Engine> {
        self.session.as_ref().map(|s| &s.engine)
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn menu_cursor(&self) -> usize {
        self.menu_cursor
    }

    pub fn sound_enabled(&self) -> bool {
        self.settings.sound_enabled
    }

    pub fn difficulty(&self) -> Difficulty {
        self.settings.difficulty
    }

    /// True on the game-over screen when the finished session raised the
    /// stored best; a tie with the old best does not count
    pub fn is_new_best(&self) -> bool {
        self.new_best
    }

    pub fn rules_open(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.rules_open)
    }

    /// Drain the success/fail signals produced since the last call
    pub fn take_feedback(&mut self) -> Vec<bool> {
        std::mem::take(&mut self.feedback)
    }

    pub fn handle(&mut self, event: InputEvent) {
        if event == InputEvent::ToggleMute {
            self.settings.sound_enabled = !self.settings.sound_enabled;
            debug!(sound_enabled = self.settings.sound_enabled, "toggled sound");
            return;
        }

        match self.state {
            SessionState::Menu => self.on_menu(event),
            SessionState::Rules(variant) => match event {
                InputEvent::Confirm => self.start(variant),
                InputEvent::Cancel => self.to_menu(),
                _ => {}
            },
            SessionState::Playing(_) => self.on_playing(event),
            SessionState::GameOver { variant, .. } => match event {
                InputEvent::Confirm => self.start(variant),
                InputEvent::Cancel => self.to_menu(),
                _ => {}
            },
        }
    }

    /// Advance the clock, engine countdowns and timer expiry
    pub fn tick(&mut self, elapsed: Duration) {
        self.clock = self.clock.saturating_add(elapsed);
        let now = self.now_ms();

        let SessionState::Playing(variant) = self.state else {
            return;
        };
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.rules_open {
            return;
        }
        session.engine.tick(elapsed);
        if session.timer.is_expired(now) {
            let final_score = session.score;
            self.finish(variant, final_score);
        }
    }

    /// Whole milliseconds on the session clock. The clock itself keeps the
    /// sub-millisecond remainder, so short ticks still add up.
    fn now_ms(&self) -> u64 {
        u64::try_from(self.clock.as_millis()).unwrap_or(u64::MAX)
    }

    fn on_menu(&mut self, event: InputEvent) {
        let count = GameVariant::ALL.len();
        match event {
            InputEvent::Previous => self.menu_cursor = (self.menu_cursor + count - 1) % count,
            InputEvent::Next => self.menu_cursor = (self.menu_cursor + 1) % count,
            InputEvent::Confirm => {
                if let Some(variant) = GameVariant::from_index(self.menu_cursor) {
                    self.select(variant);
                }
            }
            InputEvent::KeySelect(idx) | InputEvent::PointerSelect(idx) => {
                if let Some(variant) = GameVariant::from_index(idx) {
                    self.menu_cursor = idx;
                    self.select(variant);
                }
            }
            _ => {}
        }
    }

    fn on_playing(&mut self, event: InputEvent) {
        let now = self.now_ms();
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if session.rules_open {
            if matches!(
                event,
                InputEvent::Confirm | InputEvent::Cancel | InputEvent::ShowRules
            ) {
                session.rules_open = false;
                session.timer.resume(now);
                debug!("resumed session");
            }
            return;
        }

        let input = match event {
            InputEvent::PointerSelect(idx) | InputEvent::KeySelect(idx) => GameInput::Select(idx),
            InputEvent::Submit => GameInput::Submit,
            InputEvent::ShowRules => {
                session.rules_open = true;
                session.timer.pause(now);
                debug!("paused session for rules");
                return;
            }
            InputEvent::Cancel => {
                debug!(score = session.score, "abandoned session");
                self.to_menu();
                return;
            }
            _ => return,
        };

        if let Some(scored) = session.engine.handle_input(input, &mut session.score) {
            debug!(delta = scored.delta, score = session.score, "scored answer");
            self.feedback.push(scored.success);
        }
    }

    fn select(&mut self, variant: GameVariant) {
        debug!(%variant, "showing rules");
        self.state = SessionState::Rules(variant);
    }

    fn start(&mut self, variant: GameVariant) {
        let seed: u64 = self.rng.gen();
        // constructing an engine generates its first round
        let engine = Engine::new(
            variant,
            self.settings.difficulty,
            StdRng::seed_from_u64(seed),
        );
        self.session = Some(Session {
            score: 0,
            timer: RoundTimer::start(self.settings.duration_ms, self.now_ms()),
            engine,
            rules_open: false,
        });
        self.feedback.clear();
        self.new_best = false;
        self.state = SessionState::Playing(variant);
        debug!(%variant, "started session");
    }

    fn finish(&mut self, variant: GameVariant, final_score: i64) {
        self.session = None;
        self.state = SessionState::GameOver {
            variant,
            final_score,
        };
        debug!(%variant, final_score, "session over");

        self.new_best = self.high_scores.record(variant, final_score);
        if self.new_best {
            info!(%variant, final_score, "new high score");
            if let Err(err) = self.store.save(&self.high_scores) {
                // not retried; the improvement lives only in memory now
                warn!(%err, "failed to save high scores");
            }
        }
    }

    fn to_menu(&mut self) {
        self.session = None;
        self.new_best = false;
        self.state = SessionState::Menu;
    }
}
