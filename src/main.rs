use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use mindgym::{
    app_dirs::AppDirs,
    audio::{self, AudioSink, TerminalBell},
    config::{Config, ConfigStore, FileConfigStore},
    games::Difficulty,
    keymap::{self, Command},
    runtime::{ChannelEventSource, FixedTicker, GameEvent, Runner},
    scores::FileHighScoreStore,
    session::{SessionController, SessionSettings},
    ui,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    sync::Mutex,
    time::Duration,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const TICK_RATE_MS: u64 = 50;

/// timed reaction and memory mini-games for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Three 30-second brain workouts: pick the bigger number, find the matching shape and recall the highlighted squares. Best scores are kept between runs."
)]
pub struct Cli {
    /// how many squares light up in Memory Recall (defaults to the saved setting)
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// start with sound turned off
    #[clap(long)]
    mute: bool,

    /// high score file to use instead of the default location
    #[clap(long)]
    scores: Option<PathBuf>,
}

impl Cli {
    /// Stored config with command line overrides applied
    fn settings(&self, config: &Config) -> SessionSettings {
        SessionSettings {
            difficulty: self.difficulty.unwrap_or(config.difficulty),
            sound_enabled: config.sound_enabled && !self.mute,
            ..SessionSettings::default()
        }
    }
}

pub struct App {
    pub controller: SessionController,
    pub audio: Box<dyn AudioSink>,
    pub should_quit: bool,
}

impl App {
    pub fn new(controller: SessionController, audio: Box<dyn AudioSink>) -> Self {
        Self {
            controller,
            audio,
            should_quit: false,
        }
    }

    /// Apply one terminal event to the controller
    pub fn on_event(&mut self, event: GameEvent, screen: ratatui::layout::Rect) {
        match event {
            GameEvent::Key(key) => {
                let state = self.controller.state();
                match keymap::map_key(key, state, self.controller.rules_open()) {
                    Some(Command::Quit) => self.should_quit = true,
                    Some(Command::Input(input)) => self.controller.handle(input),
                    None => {}
                }
            }
            GameEvent::Click { column, row } => {
                if let Some(input) = ui::layout::hit_test(screen, &self.controller, column, row) {
                    self.controller.handle(input);
                }
            }
            GameEvent::Resize | GameEvent::Tick => {}
        }
    }

    /// Advance timers and flush audio cues
    pub fn on_tick(&mut self, elapsed: Duration) {
        self.controller.tick(elapsed);
        let signals = self.controller.take_feedback();
        audio::play_all(
            self.audio.as_mut(),
            &signals,
            self.controller.sound_enabled(),
        );
    }
}

/// Logs go to a file because the TUI owns stdout
fn init_logging() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    let filter = EnvFilter::try_from_env("MINDGYM_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging();

    let config_store = FileConfigStore::new();
    let config = config_store.load();
    let store = match &cli.scores {
        Some(path) => FileHighScoreStore::with_path(path),
        None => FileHighScoreStore::new(),
    };
    info!(path = %store.path().display(), "starting");
    let controller = SessionController::new(Box::new(store), cli.settings(&config));
    let mut app = App::new(controller, Box::new(TerminalBell::stdout()));

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    let updated = Config {
        sound_enabled: app.controller.sound_enabled(),
        ..config
    };
    if let Err(err) = config_store.save(&updated) {
        warn!(%err, "failed to save config");
    }
    debug!("exiting");

    result
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(
        ChannelEventSource::crossterm(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    while !app.should_quit {
        terminal.draw(|f| ui::draw(&app.controller, f))?;

        let event = runner.step();
        let size = terminal.size()?;
        let screen = ratatui::layout::Rect::new(0, 0, size.width, size.height);
        app.on_event(event, screen);
        app.on_tick(runner.elapsed());
    }

    Ok(())
}
