use clap::{Parser, Subcommand};
use kuratowski::config;
use kuratowski::gui::app::{AppInit, AppModel};
use kuratowski::sys::runtime;
use kuratowski_core::{AngleState, CircleLayout, Orchestrator};
use relm4::prelude::*;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "kuratowski", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Read the configuration from this file instead of the default location
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Do not reload the configuration when the file changes
    #[arg(long)]
    no_watch: bool,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Write the default configuration file (if missing) and print its path
    InitConfig,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config_path = config::resolve_config_path(cli.config)?;

    if let Some(Commands::InitConfig) = cli.command {
        let path = config::write_default_config(&config_path)?;
        println!("{}", path.display());
        return Ok(());
    }

    let config = config::load_or_default(&config_path);
    let state = config.initial_state().unwrap_or_else(|e| {
        log::error!("{}, starting from the default angles", e);
        AngleState::default()
    });
    let orchestrator = Orchestrator::new(state, config.settings(CircleLayout::default()));

    let (tx, rx) = async_channel::bounded(32);

    if !cli.no_watch {
        runtime::start_background_services(tx, config_path.clone());
    }

    // clap already consumed the command line
    let app = RelmApp::new("org.kuratowski.map").with_args(Vec::new());

    app.run::<AppModel>(AppInit {
        config,
        config_path,
        orchestrator,
        events: rx,
    });

    Ok(())
}
