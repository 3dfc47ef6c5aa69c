use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::session::InputSource;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum SpotEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait SpotEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<SpotEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<SpotEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => SpotEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => SpotEvent::Resize,
                Ok(_) => continue,
                Err(e) => {
                    log::error!("terminal event stream closed: {e}");
                    break;
                }
            };
            if tx.send(evt).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SpotEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<SpotEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms.max(1)))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<SpotEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<SpotEvent>) -> Self {
        Self { rx }
    }
}

impl SpotEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<SpotEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time.
///
/// Ticks are due on a fixed schedule; a burst of key events cannot postpone them.
pub struct Runner<E: SpotEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    next_tick: Instant,
}

impl<E: SpotEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        let next_tick = Instant::now() + ticker.interval();
        Self {
            event_source,
            ticker,
            next_tick,
        }
    }

    /// Blocks until the next tick is due and returns the next event, or Tick on timeout
    pub fn step(&mut self) -> SpotEvent {
        let now = Instant::now();
        if now >= self.next_tick {
            return self.fire_tick(now);
        }

        match self.event_source.recv_timeout(self.next_tick - now) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                self.fire_tick(Instant::now())
            }
        }
    }

    fn fire_tick(&mut self, now: Instant) -> SpotEvent {
        self.next_tick = now + self.ticker.interval();
        SpotEvent::Tick
    }
}

/// What a key press means to the mini-game
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Confirm,
    Cancel,
    Retry,
    Quit,
    Ignore,
}

impl KeyAction {
    pub fn from_key(key: &KeyEvent) -> Self {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('z') => KeyAction::Confirm,
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('x') => KeyAction::Cancel,
            KeyCode::Char('r') => KeyAction::Retry,
            KeyCode::Char('q') => KeyAction::Quit,
            _ => KeyAction::Ignore,
        }
    }
}

/// Input source fed by key events between ticks.
///
/// Presses are latched until the next tick samples them, so a press landing
/// between two frames is never lost.
#[derive(Clone, Copy, Debug, Default)]
pub struct LatchedInput {
    confirm: bool,
    cancel: bool,
}

impl LatchedInput {
    pub fn press(&mut self, action: KeyAction) {
        match action {
            KeyAction::Confirm => self.confirm = true,
            KeyAction::Cancel => self.cancel = true,
            _ => {}
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_pending(&self) -> bool {
        self.confirm || self.cancel
    }
}

impl InputSource for LatchedInput {
    fn cancel_asserted(&mut self) -> bool {
        std::mem::take(&mut self.cancel)
    }

    fn confirm_asserted(&mut self) -> bool {
        std::mem::take(&mut self.confirm)
    }
}
