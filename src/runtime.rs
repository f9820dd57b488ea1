use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseButton, MouseEventKind};

/// Terminal input as the game loop sees it
#[derive(Clone, Debug)]
pub enum GameEvent {
    Key(KeyEvent),
    /// Left click at a terminal cell
    Click { column: u16, row: u16 },
    Resize,
    Tick,
}

impl GameEvent {
    /// Keep the crossterm events the game reacts to, drop the rest
    pub fn from_crossterm(ev: CtEvent) -> Option<Self> {
        match ev {
            CtEvent::Key(key) => Some(GameEvent::Key(key)),
            CtEvent::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                Some(GameEvent::Click {
                    column: mouse.column,
                    row: mouse.row,
                })
            }
            CtEvent::Resize(..) => Some(GameEvent::Resize),
            _ => None,
        }
    }
}

/// Anything that can hand the loop its next event within a deadline
pub trait GameEventSource: Send + 'static {
    /// Err(Timeout) when nothing arrived in time
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError>;
}

/// Events delivered over a channel. Tests feed it directly; the terminal
/// source fills it from a reader thread.
pub struct ChannelEventSource {
    rx: Receiver<GameEvent>,
}

impl ChannelEventSource {
    pub fn new(rx: Receiver<GameEvent>) -> Self {
        Self { rx }
    }

    /// Spawn a thread that blocks on crossterm and forwards what it reads.
    /// The thread exits once the receiving side is dropped.
    pub fn crossterm() -> Self {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            while let Ok(ev) = event::read() {
                let Some(ev) = GameEvent::from_crossterm(ev) else {
                    continue;
                };
                if tx.send(ev).is_err() {
                    break;
                }
            }
        });
        Self::new(rx)
    }
}

impl GameEventSource for ChannelEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Pulls one event per step and measures the wall time between steps
pub struct Runner<E: GameEventSource, T: Ticker> {
    source: E,
    ticker: T,
    last_step: Instant,
}

impl<E: GameEventSource, T: Ticker> Runner<E, T> {
    pub fn new(source: E, ticker: T) -> Self {
        Self {
            source,
            ticker,
            last_step: Instant::now(),
        }
    }

    /// Next event, or `Tick` once the interval passes without one
    pub fn step(&self) -> GameEvent {
        self.source
            .recv_timeout(self.ticker.interval())
            .unwrap_or(GameEvent::Tick)
    }

    /// Wall-clock time since the previous call
    pub fn elapsed(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now.duration_since(self.last_step);
        self.last_step = now;
        dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let es = ChannelEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let runner = Runner::new(es, ticker);

        assert!(matches!(runner.step(), GameEvent::Tick));
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(GameEvent::Click { column: 3, row: 4 }).unwrap();
        let es = ChannelEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(10));
        let runner = Runner::new(es, ticker);

        match runner.step() {
            GameEvent::Click { column: 3, row: 4 } => {}
            other => panic!("expected Click event, got {other:?}"),
        }
    }

    #[test]
    fn step_yields_tick_after_sender_dropped() {
        let (tx, rx) = mpsc::channel::<GameEvent>();
        drop(tx);
        let runner = Runner::new(
            ChannelEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(1)),
        );
        assert!(matches!(runner.step(), GameEvent::Tick));
    }

    #[test]
    fn only_left_clicks_become_events() {
        use crossterm::event::{KeyModifiers, MouseEvent};

        let mouse = |kind| {
            CtEvent::Mouse(MouseEvent {
                kind,
                column: 7,
                row: 2,
                modifiers: KeyModifiers::NONE,
            })
        };
        assert!(matches!(
            GameEvent::from_crossterm(mouse(MouseEventKind::Down(MouseButton::Left))),
            Some(GameEvent::Click { column: 7, row: 2 })
        ));
        assert!(GameEvent::from_crossterm(mouse(MouseEventKind::Down(MouseButton::Right))).is_none());
        assert!(GameEvent::from_crossterm(mouse(MouseEventKind::Moved)).is_none());
        assert!(GameEvent::from_crossterm(CtEvent::FocusGained).is_none());
        assert!(matches!(
            GameEvent::from_crossterm(CtEvent::Resize(80, 24)),
            Some(GameEvent::Resize)
        ));
    }

    #[test]
    fn elapsed_measures_between_calls() {
        let (_tx, rx) = mpsc::channel();
        let mut runner = Runner::new(
            ChannelEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(5)),
        );
        runner.elapsed();
        runner.step();
        assert!(runner.elapsed() >= Duration::from_millis(5));
    }
}
