mod config;
mod console;
mod interpreter;
mod persistence;
mod ui;
mod world;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::io;
use std::path::{Path, PathBuf};

use config::Config;
use console::{Console, StartChoice};
use interpreter::Session;
use persistence::SaveStore;
use world::{default_world, load_world};

#[derive(Parser)]
#[command(name = "riddle-house")]
#[command(about = "Explore a house of locked doors, riddles and keys")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "riddle-house.toml")]
    config: PathBuf,

    /// World file to play instead of the bundled house
    #[arg(long)]
    world: Option<PathBuf>,

    /// Directory for save slots
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// Slot used by bare `save` and `load`
    #[arg(long)]
    slot: Option<String>,

    /// Plain line-by-line console instead of the full-screen interface
    #[arg(long)]
    plain: bool,

    /// Start a new game without asking
    #[arg(long, conflicts_with = "load")]
    new: bool,

    /// Resume the saved game in the default slot
    #[arg(long)]
    load: bool,

    /// Append log output to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)?;
    if let Some(dir) = cli.save_dir.clone() {
        config.save_dir = dir;
    }
    if let Some(slot) = cli.slot.clone() {
        config.default_slot = slot;
    }
    if cli.world.is_some() {
        config.world = cli.world.clone();
    }
    if cli.log_file.is_some() {
        config.log_file = cli.log_file.clone();
    }

    init_logging(cli.verbose, config.log_file.as_deref(), cli.plain)?;
    info!("Starting riddle-house v{}", env!("CARGO_PKG_VERSION"));

    let world = match &config.world {
        Some(path) => load_world(path)?,
        None => default_world()?,
    };
    info!(
        "world ready: {} rooms, {} locked doors",
        world.rooms().count(),
        world.locked_exit_count()
    );
    let store = SaveStore::new(&config.save_dir);
    let mut session = Session::new(world, store, config.default_slot.clone());

    if cli.plain {
        return run_plain(&cli, &mut session);
    }

    if cli.load {
        session
            .restore(None)
            .context("loading the saved game")?;
    }
    let resumed = cli.load || cli.new;
    let farewell = ui::run(session, resumed)?;
    println!("Thanks for playing!");
    if let Some(farewell) = farewell {
        println!("{}", farewell);
    }
    Ok(())
}

fn run_plain(cli: &Cli, session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());

    let choice = if cli.new {
        StartChoice::New
    } else if cli.load {
        StartChoice::Load
    } else {
        console.choose_start()?
    };

    if let StartChoice::Load = choice {
        if let Err(e) = session.restore(None) {
            warn!("falling back to a new game: {}", e);
            console.say(&format!("Could not load the game ({}). Starting a new one.", e))?;
        }
    }

    console.run(session)?;
    Ok(())
}

/// Sets up env_logger. Full-screen mode stays quiet on stderr unless a log
/// file or `RUST_LOG` is given, since stderr shares the terminal.
fn init_logging(verbosity: u8, log_file: Option<&Path>, console: bool) -> Result<()> {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    let mut builder = env_logger::Builder::new();
    if log_file.is_some() || console {
        builder.filter_level(level);
    } else {
        builder.filter_level(log::LevelFilter::Off);
    }
    builder.parse_default_env();

    if let Some(path) = log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.try_init().context("initialising logger")?;
    Ok(())
}
