use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin, Write},
    path::PathBuf,
};
use sweetspot::{
    app::{App, AppParams, Control},
    config::{Config, ConfigStore, FileConfigStore},
    diagnostics::LogSink,
    difficulty::{resolve, DifficultyId},
    runtime::{CrosstermEventSource, FixedTicker, Runner, SpotEvent, SpotEventSource, Ticker},
};

/// stop the sliding cursor inside the sweet spot
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A timing bar skill check: a cursor sweeps back and forth across a bar and you must stop it inside the sweet spot. Each resolved attempt is printed as a JSON line on exit."
)]
pub struct Cli {
    /// difficulty to play (any id from the configured table)
    #[clap(short = 'd', long, default_value = DifficultyId::NORMAL)]
    difficulty: String,

    /// opaque token identifying where the result should be written
    #[clap(short = 'r', long, default_value = "A")]
    recipient: String,

    /// path to a JSON config file (defaults to the per-user config dir)
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// seed for the cursor start offsets
    #[clap(long)]
    seed: Option<u64>,

    /// milliseconds per frame, overrides the config
    #[clap(long = "tick-rate")]
    tick_rate_ms: Option<u64>,

    /// do not report configuration problems
    #[clap(short = 'q', long)]
    quiet: bool,

    /// print the resolved difficulty table and exit
    #[clap(long)]
    list_difficulties: bool,

    /// write the default config to the config path and exit
    #[clap(long)]
    write_default_config: bool,
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let store = cli.config_store();

    if cli.write_default_config {
        store.save(&Config::default())?;
        println!("{}", store.path().display());
        return Ok(());
    }

    let config = store.load();
    let mut diagnostics = LogSink::new(!(config.disable_debug || cli.quiet));

    if cli.list_difficulties {
        return list_difficulties(&config, &mut diagnostics);
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    // resolve before the alternate screen so diagnostics stay visible
    let mut app = App::new(
        &config,
        AppParams {
            difficulty: DifficultyId::new(cli.difficulty.clone()),
            recipient: cli.recipient.clone(),
            seed: cli.seed,
        },
        &mut diagnostics,
    );
    let ticker = FixedTicker::from_millis(cli.tick_rate_ms.unwrap_or(config.tick_rate_ms));

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run = start_tui(
        &mut terminal,
        &mut app,
        Runner::new(CrosstermEventSource::new(), ticker),
    );

    let restore = restore_terminal(&mut terminal);
    finish(&app, run.and(restore), &mut io::stdout().lock())
}

fn restore_terminal<B: Backend + Write>(terminal: &mut Terminal<B>) -> Result<(), Box<dyn Error>> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Report resolved attempts even when the loop ended with an error
fn finish<W: Write>(
    app: &App,
    run: Result<(), Box<dyn Error>>,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    app.write_results(out)?;
    run
}

fn start_tui<B: Backend, E: SpotEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut runner: Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        match runner.step() {
            SpotEvent::Tick => app.on_tick(),
            SpotEvent::Resize => {}
            SpotEvent::Key(key) => {
                if app.on_key(&key) == Control::Quit {
                    break;
                }
            }
        }
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    Ok(())
}

fn list_difficulties(config: &Config, diagnostics: &mut LogSink) -> Result<(), Box<dyn Error>> {
    let mut out = io::stdout().lock();
    for (id, _) in config.difficulties.iter() {
        let settings = resolve(id, &config.difficulties, &mut *diagnostics);
        writeln!(
            out,
            "{:<12} sweet spot {:>4}  speed {:>3}",
            id.as_str(),
            settings.sweet_spot_width,
            settings.cursor_speed
        )?;
    }
    Ok(())
}
