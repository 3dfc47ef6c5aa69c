use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use sweetspot::app::{App, AppParams, AppState, Control, Outcome};
use sweetspot::config::Config;
use sweetspot::diagnostics::Diagnostic;

fn app(difficulty: &str) -> App {
    let mut diags: Vec<Diagnostic> = Vec::new();
    App::new(
        &Config::default(),
        AppParams {
            difficulty: difficulty.into(),
            recipient: "chest-7".to_string(),
            seed: Some(2024),
        },
        &mut diags,
    )
}

fn key(code: KeyCode) -> sweetspot::runtime::SpotEvent {
    sweetspot::runtime::SpotEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

// Headless integration using the internal runtime + App without a TTY
// Verifies that a confirm press lands on the next tick and resolves once.
#[test]
fn headless_confirm_flow_resolves() {
    let mut app = app("normal");

    let (tx, rx) = mpsc::channel();
    let es = sweetspot::runtime::TestEventSource::new(rx);
    let ticker = sweetspot::runtime::FixedTicker::new(Duration::from_millis(5));
    let mut runner = sweetspot::runtime::Runner::new(es, ticker);

    tx.send(key(KeyCode::Char(' '))).unwrap();

    for _ in 0..100u32 {
        match runner.step() {
            sweetspot::runtime::SpotEvent::Tick => app.on_tick(),
            sweetspot::runtime::SpotEvent::Resize => {}
            sweetspot::runtime::SpotEvent::Key(key) => {
                assert_eq!(app.on_key(&key), Control::Continue);
            }
        }
        if app.state != AppState::Playing {
            break;
        }
    }

    assert!(matches!(
        app.state,
        AppState::Finished(Outcome::Succeeded | Outcome::Failed)
    ));
    let results = app.into_results();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].recipient, "chest-7");
}

#[test]
fn headless_cancel_flow_has_no_result() {
    let mut app = app("hard");

    let (tx, rx) = mpsc::channel();
    let es = sweetspot::runtime::TestEventSource::new(rx);
    let ticker = sweetspot::runtime::FixedTicker::new(Duration::from_millis(5));
    let mut runner = sweetspot::runtime::Runner::new(es, ticker);

    // cancel and confirm within the same frame: cancel wins
    tx.send(key(KeyCode::Enter)).unwrap();
    tx.send(key(KeyCode::Esc)).unwrap();

    for _ in 0..100u32 {
        match runner.step() {
            sweetspot::runtime::SpotEvent::Tick => app.on_tick(),
            sweetspot::runtime::SpotEvent::Resize => {}
            sweetspot::runtime::SpotEvent::Key(key) => {
                app.on_key(&key);
            }
        }
        if app.state != AppState::Playing {
            break;
        }
    }

    assert_eq!(app.state, AppState::Finished(Outcome::Cancelled));
    assert!(app.results().is_empty());
}

#[test]
fn headless_cursor_keeps_moving_without_input() {
    let mut app = app("insane");
    let (_tx, rx) = mpsc::channel();
    let es = sweetspot::runtime::TestEventSource::new(rx);
    let ticker = sweetspot::runtime::FixedTicker::new(Duration::from_millis(1));
    let mut runner = sweetspot::runtime::Runner::new(es, ticker);

    let start = app.session().position();
    for _ in 0..5u32 {
        if let sweetspot::runtime::SpotEvent::Tick = runner.step() {
            app.on_tick();
        }
    }

    assert_eq!(app.state, AppState::Playing);
    assert_eq!(app.session().ticks(), 5);
    assert_ne!(app.session().position(), start);
}
