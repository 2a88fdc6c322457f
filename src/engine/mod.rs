//! Switch engine - runs the switcher against a live scene host

mod runner;
mod watch;

pub use runner::{create_engine_channels, SwitchEngine};
pub use watch::watch_settings;

use anyhow::Result;
use std::future::Future;

use crate::switcher::{PanelEdit, SceneSnapshot};

/// Commands that can be sent to the switch engine
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// User edit on the panel
    Edit(PanelEdit),
    /// The settings file changed on disk
    ReloadSettings,
    /// Save settings and stop
    Shutdown,
}

/// The application whose scenes are being switched
pub trait SceneHost {
    /// Current scenes, program scene and streaming state
    fn snapshot(&self) -> impl Future<Output = Result<SceneSnapshot>> + Send;

    /// Make `name` the program scene
    fn activate_scene(&self, name: &str) -> impl Future<Output = Result<()>> + Send;
}
