//! Settings file watcher
//!
//! Edits made to the settings file while the agent runs are forwarded to the
//! engine as [`EngineCommand::ReloadSettings`], so they are adopted instead of
//! being overwritten by the save on exit.

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::EngineCommand;

/// Watch `path` and send a reload command whenever it is written.
///
/// The watcher stops when the returned handle is dropped.
pub fn watch_settings(path: &Path, cmd_tx: mpsc::Sender<EngineCommand>) -> Result<RecommendedWatcher> {
    let dir = path
        .parent()
        .context("Settings path has no parent directory")?
        .to_path_buf();

    // The file may not exist yet; watch its directory instead
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create settings directory: {:?}", dir))?;

    let target: PathBuf = path.to_path_buf();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) if is_settings_change(&event, &target) => {
            debug!("Settings file event: {:?}", event.kind);
            let _ = cmd_tx.try_send(EngineCommand::ReloadSettings);
        }
        Ok(_) => {}
        Err(e) => warn!("Settings watcher error: {}", e),
    })
    .context("Failed to create settings watcher")?;

    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("Failed to watch settings directory: {:?}", dir))?;

    Ok(watcher)
}

fn is_settings_change(event: &Event, target: &Path) -> bool {
    if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
        return false;
    }

    event
        .paths
        .iter()
        .any(|p| p.file_name().is_some() && p.file_name() == target.file_name())
}
