use ratatui::Frame;

use crate::games::GameVariant;
use crate::session::{SessionController, SessionState};
use crate::ui::{render_game_over, render_menu, render_playing, render_rules};

/// A UI Screen boundary: responsible for rendering one controller state
pub trait Screen {
    fn render(&self, ctl: &SessionController, f: &mut Frame);
}

/// Game picker with best scores
pub struct MenuScreen;

impl Screen for MenuScreen {
    fn render(&self, ctl: &SessionController, f: &mut Frame) {
        render_menu(ctl, f);
    }
}

/// Rules modal shown before a session starts
pub struct RulesScreen(pub GameVariant);

impl Screen for RulesScreen {
    fn render(&self, _ctl: &SessionController, f: &mut Frame) {
        render_rules(self.0, f);
    }
}

/// Top bar plus the active engine's board
pub struct PlayingScreen(pub GameVariant);

impl Screen for PlayingScreen {
    fn render(&self, ctl: &SessionController, f: &mut Frame) {
        render_playing(ctl, self.0, f);
    }
}

pub struct GameOverScreen {
    pub variant: GameVariant,
    pub final_score: i64,
}

impl Screen for GameOverScreen {
    fn render(&self, ctl: &SessionController, f: &mut Frame) {
        render_game_over(ctl, self.variant, self.final_score, f);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &SessionState) -> Box<dyn Screen> {
    match *state {
        SessionState::Menu => Box::new(MenuScreen),
        SessionState::Rules(variant) => Box::new(RulesScreen(variant)),
        SessionState::Playing(variant) => Box::new(PlayingScreen(variant)),
        SessionState::GameOver {
            variant,
            final_score,
        } => Box::new(GameOverScreen {
            variant,
            final_score,
        }),
    }
}
