use anyhow::Context;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{info, warn};
use zcalc::calculator::{Calculator, OperationRegistry};
use zcalc::config::CalculatorConfig;
use zcalc::history::{AutoSaveObserver, LoggingObserver};
use zcalc::logging;
use zcalc::repl::Repl;

#[derive(Parser)]
#[command(name = "zcalc")]
#[command(about = "An interactive decimal calculator with undo/redo and persistent history")]
#[command(version)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding logs and history (overrides the configuration)
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Do not save history after every calculation
    #[arg(long)]
    no_auto_save: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config =
        CalculatorConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(base_dir) = cli.base_dir {
        config.base_dir = base_dir;
    }
    if cli.no_auto_save {
        config.auto_save = false;
    }
    config.validate()?;

    logging::init(&config)?;

    let mut calculator = Calculator::new(config.clone())?;
    match calculator.load_history() {
        Ok(()) => info!(
            "Loaded {} calculations from {}",
            calculator.history().len(),
            config.history_file().display()
        ),
        Err(err) => {
            warn!("Could not load existing history: {err}");
            eprintln!("Warning: {err}");
        }
    }

    calculator.add_observer(Rc::new(LoggingObserver));
    calculator.add_observer(Rc::new(AutoSaveObserver::from_config(&config)));

    let stdin = io::stdin();
    let mut repl = Repl::new(
        calculator,
        OperationRegistry::default(),
        stdin.lock(),
        io::stdout(),
    );
    repl.run()?;

    info!("Calculator session ended");
    Ok(())
}
