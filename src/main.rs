//! Auto Scene Switcher agent
//!
//! Connects to OBS Studio via WebSocket and runs the switch engine until OBS
//! exits or Ctrl+C is pressed.

use anyhow::Result;
use tracing::{error, info, warn};

use auto_scene_switcher::config::Config;
use auto_scene_switcher::engine::{
    create_engine_channels, watch_settings, EngineCommand, SwitchEngine,
};
use auto_scene_switcher::logging::init_logging;
use auto_scene_switcher::obs::OBSController;
use auto_scene_switcher::settings::TomlStore;
use auto_scene_switcher::ui::LogPanel;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let _log_guard = init_logging()?;

    info!("{} starting...", auto_scene_switcher::NAME);

    // Load configuration
    let config = Config::load()?;
    info!("Configuration loaded from {:?}", config.config_path()?);

    let store = TomlStore::open(config.settings_path()?)?;
    info!("Switcher settings at {:?}", store.path());

    // Initialize OBS controller (connects via websocket)
    let obs = match OBSController::new(&config).await {
        Ok(obs) => obs,
        Err(e) => {
            error!("Failed to connect to OBS: {:#}", e);
            error!("Make sure OBS is running and WebSocket server is enabled.");
            return Err(e);
        }
    };
    info!("Connected to OBS WebSocket");

    let events = obs.subscribe_events()?;
    let (cmd_tx, cmd_rx) = create_engine_channels();

    // Edits to the settings file are the panel's input while running
    let _settings_watcher = match watch_settings(store.path(), cmd_tx.clone()) {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            warn!("Settings file changes will not be picked up: {:#}", e);
            None
        }
    };

    // Ctrl+C saves settings through the normal exit path
    ctrlc::set_handler(move || {
        info!("Ctrl+C received, shutting down...");
        let _ = cmd_tx.try_send(EngineCommand::Shutdown);
    })?;

    let engine = SwitchEngine::new(obs, LogPanel::new(), store, events, cmd_rx);
    engine.run().await?;

    info!("Shutdown complete");
    Ok(())
}

fn print_help() {
    println!("{} - {}", auto_scene_switcher::NAME, auto_scene_switcher::DESCRIPTION);
    println!();
    println!("USAGE:");
    println!("    auto-scene-switcher [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help    Print this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    RUST_LOG                         Set log level (e.g., debug, info, warn)");
    println!("    AUTO_SCENE_SWITCHER_LOG_PATH     Override the log directory");
}
