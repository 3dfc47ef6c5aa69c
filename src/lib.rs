// Library surface for headless/integration tests and reuse.
// The simulation core (difficulty, motion, hit, session) has no terminal types;
// app, runtime and ui are the terminal host built on top of it.
pub mod app;
pub mod config;
pub mod diagnostics;
pub mod difficulty;
pub mod error;
pub mod hit;
pub mod motion;
pub mod runtime;
pub mod session;
pub mod ui;

pub use difficulty::{resolve, DifficultyId, DifficultySettings, DifficultyTable};
pub use session::{AttemptResult, AttemptSession, Phase};
