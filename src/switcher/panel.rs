//! Panel controller: the editable switch rule and dock state
//!
//! The controller owns the values; a [`PanelView`] only displays them. This
//! keeps the controller independent of any GUI toolkit.

use tracing::{debug, info};

use super::directory::SceneDirectory;
use super::rule::{clamp_delay, DockArea, PanelVisibility, SwitchRule, DEFAULT_DELAY_SECS};
use crate::settings::{
    ConfigStore, StoreError, CONFIG_SECTION, KEY_DOCK_LOCATION, KEY_DOCK_VISIBLE, KEY_SCENE_FROM,
    KEY_SCENE_TO, KEY_TIME,
};

/// Display surface of the panel
pub trait PanelView {
    /// Replace the entries of both scene selectors
    fn set_scene_lists(&mut self, scenes: &[String]);

    fn show_delay(&mut self, seconds: u32);
    fn show_from_scene(&mut self, name: &str);
    fn show_to_scene(&mut self, name: &str);

    /// Dock the panel and show or hide it
    fn show_dock(&mut self, visibility: PanelVisibility);
}

pub struct PanelController<V> {
    view: V,
    rule: SwitchRule,
    visibility: PanelVisibility,
}

impl<V: PanelView> PanelController<V> {
    pub fn new(view: V) -> Self {
        let mut controller = Self {
            view,
            rule: SwitchRule::default(),
            visibility: PanelVisibility::default(),
        };
        controller.view.show_delay(controller.rule.delay_seconds);
        controller
    }

    pub fn rule(&self) -> &SwitchRule {
        &self.rule
    }

    pub fn visibility(&self) -> PanelVisibility {
        self.visibility
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Repopulate both selectors from the scene directory.
    ///
    /// A selection that no longer exists falls back to the first entry.
    pub fn refresh_scene_list(&mut self, directory: &impl SceneDirectory) {
        let scenes = directory.scene_names();
        debug!("Refreshing scene list ({} scenes)", scenes.len());

        self.view.set_scene_lists(&scenes);

        let first = scenes.first().cloned().unwrap_or_default();
        if !scenes.contains(&self.rule.from_scene) {
            self.rule.from_scene = first.clone();
        }
        if !scenes.contains(&self.rule.to_scene) {
            self.rule.to_scene = first;
        }

        self.view.show_from_scene(&self.rule.from_scene);
        self.view.show_to_scene(&self.rule.to_scene);
    }

    /// Read stored settings. Missing values fall back to defaults; missing
    /// scene names leave the current selection alone.
    pub fn load(&mut self, store: &impl ConfigStore) {
        self.rule.delay_seconds = store
            .get_int(CONFIG_SECTION, KEY_TIME)
            .map(clamp_delay)
            .unwrap_or(DEFAULT_DELAY_SECS);

        if let Some(from) = store.get_string(CONFIG_SECTION, KEY_SCENE_FROM) {
            self.rule.from_scene = from;
        }
        if let Some(to) = store.get_string(CONFIG_SECTION, KEY_SCENE_TO) {
            self.rule.to_scene = to;
        }

        self.visibility = PanelVisibility {
            dock_area: store
                .get_int(CONFIG_SECTION, KEY_DOCK_LOCATION)
                .and_then(DockArea::from_raw)
                .unwrap_or_default(),
            visible: store.get_bool(CONFIG_SECTION, KEY_DOCK_VISIBLE).unwrap_or(true),
        };

        info!(
            "Loaded switch rule: {:?} -> {:?} after {}s",
            self.rule.from_scene, self.rule.to_scene, self.rule.delay_seconds
        );

        self.view.show_delay(self.rule.delay_seconds);
        self.view.show_from_scene(&self.rule.from_scene);
        self.view.show_to_scene(&self.rule.to_scene);
        self.view.show_dock(self.visibility);
    }

    /// Write all five fields and persist them. Not atomic across keys.
    pub fn save(&self, store: &mut impl ConfigStore) -> Result<(), StoreError> {
        store.set_int(CONFIG_SECTION, KEY_TIME, i64::from(self.rule.delay_seconds));
        store.set_string(CONFIG_SECTION, KEY_SCENE_FROM, &self.rule.from_scene);
        store.set_string(CONFIG_SECTION, KEY_SCENE_TO, &self.rule.to_scene);
        store.set_int(CONFIG_SECTION, KEY_DOCK_LOCATION, self.visibility.dock_area.to_raw());
        store.set_bool(CONFIG_SECTION, KEY_DOCK_VISIBLE, self.visibility.visible);
        store.flush()
    }

    pub fn on_dock_moved(&mut self, area: DockArea) {
        self.visibility.dock_area = area;
    }

    pub fn on_visibility_toggled(&mut self, visible: bool) {
        self.visibility.visible = visible;
    }

    pub fn on_delay_changed(&mut self, seconds: i64) {
        self.rule.delay_seconds = clamp_delay(seconds);
        self.view.show_delay(self.rule.delay_seconds);
    }

    pub fn on_from_selected(&mut self, name: &str) {
        self.rule.from_scene = name.to_string();
    }

    pub fn on_to_selected(&mut self, name: &str) {
        self.rule.to_scene = name.to_string();
    }
}
