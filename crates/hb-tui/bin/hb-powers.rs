//! Power menu playground
//!
//! Loads or builds a character and lets you cast, browse and use powers
//! through the selection menus.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use crossterm::{
    cursor, execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use strum::IntoEnumIterator;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hb_core::player::{PlayerClass, PlayerState, Race};
use hb_core::rng::GameRng;
use hb_core::testing::{sample_blue_mage, sample_mage, sample_magic_eater};
use hb_core::{Dispatcher, OptionsError, Session, UiError, UiOptions};
use hb_tui::{App, CrosstermEvents, TerminalUi, Theme};

/// Selectable-power menus in a terminal
#[derive(Parser, Debug)]
#[command(name = "hb-powers")]
#[command(author, version, about = "Pick and use spells, powers and items", long_about = None)]
struct Args {
    /// Character file (JSON)
    #[arg(short = 'f', long = "player")]
    player: Option<PathBuf>,

    /// Class (e.g., Mage, Blue-Mage, Magic-Eater, Smith)
    #[arg(short = 'c', long = "class")]
    class: Option<String>,

    /// Race (e.g., Human, Elf, Dwarf)
    #[arg(short = 'r', long = "race")]
    race: Option<String>,

    /// Player name
    #[arg(short = 'u', long = "name")]
    name: Option<String>,

    /// Options file (defaults to the user config directory)
    #[arg(short = 'o', long = "options")]
    options: Option<PathBuf>,

    /// Write a trace log to this file
    #[arg(long = "log")]
    log: Option<PathBuf>,

    /// RNG seed
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Start with menu navigation
    #[arg(short = 'm', long = "menu")]
    menu: bool,
}

#[derive(Debug, Error)]
enum LaunchError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Ui(#[from] UiError),

    #[error(transparent)]
    Options(#[from] OptionsError),

    #[error("bad character file: {0}")]
    Player(#[from] serde_json::Error),

    #[error("unknown {kind} '{value}' (one of: {choices})")]
    Unknown {
        kind: &'static str,
        value: String,
        choices: String,
    },
}

fn main() -> Result<(), LaunchError> {
    let args = Args::parse();

    if let Some(path) = &args.log {
        init_logging(path)?;
    }

    let options_path = args.options.clone().or_else(default_options_path);
    let mut options = match &options_path {
        Some(path) if path.exists() => UiOptions::load_from_file(path)?,
        _ => UiOptions::default(),
    };
    if args.menu {
        options.use_menu = true;
    }

    let player = load_player(&args)?;
    let rng = match args.seed {
        Some(seed) => GameRng::new(seed),
        None => GameRng::from_entropy(),
    };
    tracing::info!(name = %player.name, class = %player.class, seed = rng.seed(), "starting");

    let mut app = App::new(Session::new(player), Dispatcher::new(options, rng));
    if let Some(path) = options_path {
        app = app.with_options_path(path);
    }

    // Setup terminal; the guard restores it on every exit path
    enable_raw_mode()?;
    let guard = TerminalGuard::new(restore_terminal);
    let result = run_in_terminal(&mut app);
    drop(guard);

    let session = app.session();
    println!(
        "{} used {} powers ({} failed) in {} turns.",
        session.player.name,
        session.uses,
        session.failures,
        session.turns()
    );
    result
}

fn run_in_terminal(app: &mut App) -> Result<(), LaunchError> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    let mut ui = TerminalUi::new(terminal, CrosstermEvents, Theme::detect()).with_audible_bell(true);
    match app.run(&mut ui) {
        Ok(()) | Err(UiError::InputClosed) => Ok(()),
        Err(err) => Err(err.into()),
    }
}

/// Runs `restore` when dropped
struct TerminalGuard<F: FnMut()> {
    restore: F,
}

impl<F: FnMut()> TerminalGuard<F> {
    fn new(restore: F) -> Self {
        Self { restore }
    }
}

impl<F: FnMut()> Drop for TerminalGuard<F> {
    fn drop(&mut self) {
        (self.restore)();
    }
}

fn restore_terminal() {
    if let Err(err) = disable_raw_mode() {
        tracing::warn!(%err, "could not leave raw mode");
    }
    if let Err(err) = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show) {
        tracing::warn!(%err, "could not restore the screen");
    }
}

fn init_logging(path: &Path) -> Result<(), LaunchError> {
    let file = File::create(path)?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hb_core=info,hb_tui=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

fn default_options_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("hb-powers").join("options.rc"))
}

fn load_player(args: &Args) -> Result<PlayerState, LaunchError> {
    if let Some(path) = &args.player {
        let contents = std::fs::read_to_string(path)?;
        return Ok(serde_json::from_str(&contents)?);
    }

    let class = match &args.class {
        Some(value) => value.parse::<PlayerClass>().map_err(|_| LaunchError::Unknown {
            kind: "class",
            value: value.clone(),
            choices: names(PlayerClass::iter()),
        })?,
        None => PlayerClass::Mage,
    };

    let mut player = match class {
        PlayerClass::Mage => sample_mage(),
        PlayerClass::BlueMage => sample_blue_mage(),
        PlayerClass::MagicEater => sample_magic_eater(),
        other => {
            let mut player = PlayerState::new("Adventurer", other, Race::Human);
            player.level = 20;
            player
        }
    };

    if let Some(value) = &args.race {
        player.race = value.parse::<Race>().map_err(|_| LaunchError::Unknown {
            kind: "race",
            value: value.clone(),
            choices: names(Race::iter()),
        })?;
    }
    if let Some(name) = &args.name {
        player.name = name.clone();
    }
    Ok(player)
}

fn names<T: ToString>(values: impl Iterator<Item = T>) -> String {
    values.map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
}
