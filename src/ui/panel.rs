//! Headless panel
//!
//! Stands in for the dock widget when the agent runs outside the host
//! window: it keeps what a dock would display and reports changes in the log.

use tracing::{debug, info};

use crate::switcher::{PanelView, PanelVisibility};

#[derive(Debug, Default)]
pub struct LogPanel {
    scenes: Vec<String>,
    delay: u32,
    from_scene: String,
    to_scene: String,
    visibility: PanelVisibility,
}

impl LogPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// One-line summary of the rule as displayed
    pub fn summary(&self) -> String {
        format!(
            "{:?} -> {:?} after {}s",
            self.from_scene, self.to_scene, self.delay
        )
    }
}

impl PanelView for LogPanel {
    fn set_scene_lists(&mut self, scenes: &[String]) {
        if self.scenes != scenes {
            info!("Available scenes: {:?}", scenes);
        }
        self.scenes = scenes.to_vec();
    }

    fn show_delay(&mut self, seconds: u32) {
        self.delay = seconds;
    }

    fn show_from_scene(&mut self, name: &str) {
        self.from_scene = name.to_string();
        debug!("Switch rule now {}", self.summary());
    }

    fn show_to_scene(&mut self, name: &str) {
        self.to_scene = name.to_string();
        debug!("Switch rule now {}", self.summary());
    }

    fn show_dock(&mut self, visibility: PanelVisibility) {
        self.visibility = visibility;
        debug!(
            "Panel docked {:?}, visible={}",
            visibility.dock_area, visibility.visible
        );
    }
}
