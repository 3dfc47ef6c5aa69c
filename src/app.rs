use std::io::{self, Write};

use crossterm::event::{KeyEvent, KeyEventKind};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::Config;
use crate::diagnostics::DiagnosticsSink;
use crate::difficulty::{self, DifficultyId, DifficultySettings};
use crate::motion::BarGeometry;
use crate::runtime::{KeyAction, LatchedInput};
use crate::session::{AttemptResult, AttemptSession, Phase};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Playing,
    Finished(Outcome),
}

/// Whether the host loop should keep going after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Everything the host needs to start attempts
#[derive(Debug, Clone)]
pub struct AppParams {
    pub difficulty: DifficultyId,
    pub recipient: String,
    pub seed: Option<u64>,
}

/// Terminal host: runs one attempt at a time and collects resolved results
#[derive(Debug)]
pub struct App {
    pub difficulty: DifficultyId,
    pub settings: DifficultySettings,
    pub geometry: BarGeometry,
    pub gauge_outer_color: [u8; 3],
    pub gauge_inner_color: [u8; 3],
    pub state: AppState,
    pub attempts: u32,
    recipient: String,
    session: AttemptSession<String>,
    input: LatchedInput,
    results: Vec<AttemptResult<String>>,
    rng: ChaCha8Rng,
}

impl App {
    pub fn new(config: &Config, params: AppParams, diagnostics: &mut dyn DiagnosticsSink) -> Self {
        let settings = difficulty::resolve(&params.difficulty, &config.difficulties, diagnostics);
        let geometry = config.geometry();
        let mut rng = match params.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let session = AttemptSession::start(settings, geometry, params.recipient.clone(), &mut rng);

        Self {
            difficulty: params.difficulty,
            settings,
            geometry,
            gauge_outer_color: config.gauge_outer_color,
            gauge_inner_color: config.gauge_inner_color,
            state: AppState::Playing,
            attempts: 1,
            recipient: params.recipient,
            session,
            input: LatchedInput::default(),
            results: Vec::new(),
            rng,
        }
    }

    pub fn session(&self) -> &AttemptSession<String> {
        &self.session
    }

    pub fn results(&self) -> &[AttemptResult<String>] {
        &self.results
    }

    pub fn into_results(self) -> Vec<AttemptResult<String>> {
        self.results
    }

    /// Hand every resolved attempt to the recipient, one JSON object per line
    pub fn write_results<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for result in &self.results {
            serde_json::to_writer(&mut *out, result).map_err(io::Error::from)?;
            writeln!(out)?;
        }
        Ok(())
    }

    pub fn on_tick(&mut self) {
        if self.state != AppState::Playing {
            return;
        }

        let outcome = match self.session.tick(&mut self.input, &mut self.results) {
            Phase::Running => return,
            Phase::Cancelled => Outcome::Cancelled,
            Phase::Resolved => match self.results.last() {
                Some(result) if result.succeeded => Outcome::Succeeded,
                _ => Outcome::Failed,
            },
        };
        self.state = AppState::Finished(outcome);
    }

    pub fn on_key(&mut self, key: &KeyEvent) -> Control {
        let action = KeyAction::from_key(key);
        match (self.state, action) {
            (_, KeyAction::Quit) => {
                self.session.terminate();
                Control::Quit
            }
            (AppState::Playing, _) => {
                self.input.press(action);
                Control::Continue
            }
            // a held stop or cancel key must not skip past the result
            (AppState::Finished(_), _) if key.kind == KeyEventKind::Repeat => Control::Continue,
            (AppState::Finished(_), KeyAction::Retry) => {
                self.restart();
                Control::Continue
            }
            (AppState::Finished(_), KeyAction::Cancel) => Control::Quit,
            (AppState::Finished(_), _) => Control::Continue,
        }
    }

    /// Begin a fresh attempt with the same settings and a new start offset
    pub fn restart(&mut self) {
        self.session.terminate();
        self.session = AttemptSession::start(
            self.settings,
            self.geometry,
            self.recipient.clone(),
            &mut self.rng,
        );
        self.input.clear();
        self.attempts += 1;
        self.state = AppState::Playing;
    }
}
