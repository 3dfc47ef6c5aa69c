use std::ops::Range;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::difficulty::DifficultySettings;
use crate::hit::is_hit;
use crate::motion::{self, BarGeometry, CursorState, Direction};

/// Two logical buttons, sampled once per tick
pub trait InputSource {
    fn cancel_asserted(&mut self) -> bool;
    fn confirm_asserted(&mut self) -> bool;
}

/// Where a resolved attempt is handed off
pub trait ResultSink<T> {
    fn receive(&mut self, result: AttemptResult<T>);
}

impl<T> ResultSink<T> for Vec<AttemptResult<T>> {
    fn receive(&mut self, result: AttemptResult<T>) {
        self.push(result);
    }
}

/// Uniform integer draw over a half-open range
pub trait RandomSource {
    fn draw(&mut self, range: Range<i32>) -> i32;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn draw(&mut self, range: Range<i32>) -> i32 {
        self.gen_range(range)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Resolved,
    Cancelled,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Phase::Running)
    }
}

/// Outcome of a resolved attempt, carrying the host's recipient token untouched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptResult<T> {
    pub succeeded: bool,
    pub recipient: T,
}

/// One mini-game attempt from start to its single terminal transition
#[derive(Debug)]
pub struct AttemptSession<T> {
    settings: DifficultySettings,
    geometry: BarGeometry,
    cursor: CursorState,
    phase: Phase,
    // taken on resolution, so it can only be handed out once
    recipient: Option<T>,
    ticks: u64,
}

impl<T> AttemptSession<T> {
    /// Start with a randomly drawn cursor offset
    pub fn start<R>(
        settings: DifficultySettings,
        geometry: BarGeometry,
        recipient: T,
        rng: &mut R,
    ) -> Self
    where
        R: RandomSource + ?Sized,
    {
        let cursor = motion::start_position(rng, &settings, &geometry);
        Self::from_state(settings, geometry, recipient, cursor)
    }

    pub fn from_state(
        settings: DifficultySettings,
        geometry: BarGeometry,
        recipient: T,
        cursor: CursorState,
    ) -> Self {
        log::debug!(
            "attempt started at offset {} (width {}, speed {})",
            cursor.position,
            settings.sweet_spot_width,
            settings.cursor_speed
        );
        Self {
            settings,
            geometry,
            cursor,
            phase: Phase::Running,
            recipient: Some(recipient),
            ticks: 0,
        }
    }

    /// Run one frame: cancel poll, motion update, confirm poll.
    ///
    /// Once terminal this does nothing: no polls, no motion, no emission.
    pub fn tick<I, S>(&mut self, input: &mut I, results: &mut S) -> Phase
    where
        I: InputSource + ?Sized,
        S: ResultSink<T> + ?Sized,
    {
        if self.phase.is_terminal() {
            return self.phase;
        }

        if input.cancel_asserted() {
            self.cancel();
            return self.phase;
        }

        self.cursor = motion::advance(self.cursor, &self.settings, &self.geometry);
        self.ticks += 1;

        if input.confirm_asserted() {
            self.resolve(results);
        }

        self.phase
    }

    /// Host abandonment. Cancels a running attempt; no-op once terminal.
    pub fn terminate(&mut self) {
        if !self.phase.is_terminal() {
            self.cancel();
        }
    }

    fn cancel(&mut self) {
        log::info!("attempt cancelled after {} ticks", self.ticks);
        self.phase = Phase::Cancelled;
        self.recipient = None;
    }

    fn resolve<S>(&mut self, results: &mut S)
    where
        S: ResultSink<T> + ?Sized,
    {
        let succeeded = is_hit(self.cursor.position, self.settings.sweet_spot_width);
        if succeeded {
            log::info!("attempt succeeded at offset {}", self.cursor.position);
        } else {
            log::info!("attempt failed at offset {}", self.cursor.position);
        }

        self.phase = Phase::Resolved;
        if let Some(recipient) = self.recipient.take() {
            results.receive(AttemptResult {
                succeeded,
                recipient,
            });
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn position(&self) -> i32 {
        self.cursor.position
    }

    pub fn direction(&self) -> Direction {
        self.cursor.direction
    }

    pub fn cursor(&self) -> CursorState {
        self.cursor
    }

    pub fn settings(&self) -> &DifficultySettings {
        &self.settings
    }

    pub fn geometry(&self) -> &BarGeometry {
        &self.geometry
    }

    /// Ticks processed while running
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Recipient token, until it has been handed to a result sink
    pub fn recipient(&self) -> Option<&T> {
        self.recipient.as_ref()
    }
}
