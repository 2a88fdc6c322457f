//! Automatic scene switcher
//!
//! [`AutoSwitcher`] ties the panel controller, the switch timer, the settings
//! store and the scene directory together behind a single event dispatch.

mod directory;
mod events;
mod panel;
mod rule;
mod timer;

pub use directory::{SceneDirectory, SceneSnapshot, StreamingStatus};
pub use events::{HostEvent, PanelEdit};
pub use panel::{PanelController, PanelView};
pub use rule::{DockArea, PanelVisibility, SwitchRule};
pub use timer::{SwitchTimer, TimerState};

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::settings::ConfigStore;

pub struct AutoSwitcher<V, S, D> {
    panel: PanelController<V>,
    timer: SwitchTimer,
    store: S,
    directory: D,
}

impl<V, S, D> AutoSwitcher<V, S, D>
where
    V: PanelView,
    S: ConfigStore,
    D: SceneDirectory + StreamingStatus,
{
    pub fn new(view: V, store: S, directory: D) -> Self {
        Self {
            panel: PanelController::new(view),
            timer: SwitchTimer::new(),
            store,
            directory,
        }
    }

    pub fn panel(&self) -> &PanelController<V> {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut PanelController<V> {
        &mut self.panel
    }

    pub fn timer(&self) -> &SwitchTimer {
        &self.timer
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn directory_mut(&mut self) -> &mut D {
        &mut self.directory
    }

    /// Pending switch deadline, if the timer is armed
    pub fn deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// Dispatch one host event
    pub fn handle(&mut self, event: HostEvent, now: Instant) {
        debug!("Handling host event: {:?}", event);

        match event {
            HostEvent::SceneChanged | HostEvent::StreamingChanged => self.evaluate(now),
            HostEvent::SceneListChanged | HostEvent::SceneCollectionChanged | HostEvent::ProfileChanged => {
                self.panel.refresh_scene_list(&self.directory);
            }
            HostEvent::FinishedLoading => {
                self.panel.refresh_scene_list(&self.directory);
                self.panel.load(&self.store);
                // The host may already be streaming on the source scene
                self.evaluate(now);
            }
            HostEvent::Exiting => {
                // Cancel before saving so no expiry can fire during teardown
                self.timer.cancel();
                if let Err(e) = self.panel.save(&mut self.store) {
                    warn!("Failed to save switcher settings: {}", e);
                }
            }
        }
    }

    /// Apply a panel edit, then re-evaluate against the current scene
    pub fn edit(&mut self, edit: PanelEdit, now: Instant) {
        debug!("Applying panel edit: {:?}", edit);

        match edit {
            PanelEdit::Delay(seconds) => self.panel.on_delay_changed(seconds),
            PanelEdit::FromScene(name) => self.panel.on_from_selected(&name),
            PanelEdit::ToScene(name) => self.panel.on_to_selected(&name),
            PanelEdit::DockMoved(area) => self.panel.on_dock_moved(area),
            PanelEdit::VisibilityToggled(visible) => self.panel.on_visibility_toggled(visible),
        }

        self.evaluate(now);
    }

    /// Re-read the settings store (it was changed outside the panel) and
    /// adopt its values
    pub fn reload_settings(&mut self, now: Instant) {
        if let Err(e) = self.store.reload() {
            warn!("Failed to reload switcher settings, keeping current: {}", e);
            return;
        }

        self.panel.load(&self.store);
        self.evaluate(now);
    }

    /// Fire the timer if its deadline has passed.
    ///
    /// Returns the scene whose activation was requested.
    pub fn poll_expired(&mut self, now: Instant) -> Option<String> {
        if !self.timer.expire(now) {
            return None;
        }

        if !self.directory.is_streaming() {
            debug!("Switch timer expired after streaming stopped, ignoring");
            return None;
        }

        let target = self.panel.rule().to_scene.clone();
        info!("Switching scene to {:?}", target);
        self.directory.activate_scene(&target);
        Some(target)
    }

    fn evaluate(&mut self, now: Instant) {
        let current = self.directory.current_scene().unwrap_or_default();
        let streaming = self.directory.is_streaming();
        self.timer.evaluate(&current, streaming, self.panel.rule(), now);
    }
}

#[cfg(test)]
mod tests {
    use super::panel::tests::RecordingView;
    use super::*;
    use crate::settings::memory::MemoryStore;
    use crate::settings::{
        CONFIG_SECTION, KEY_DOCK_LOCATION, KEY_DOCK_VISIBLE, KEY_SCENE_FROM, KEY_SCENE_TO, KEY_TIME,
    };
    use std::time::Duration;

    fn switcher(delay: i64) -> AutoSwitcher<RecordingView, MemoryStore, SceneSnapshot> {
        let mut store = MemoryStore::default();
        store.set_int(CONFIG_SECTION, KEY_TIME, delay);
        store.set_string(CONFIG_SECTION, KEY_SCENE_FROM, "Intro");
        store.set_string(CONFIG_SECTION, KEY_SCENE_TO, "Main");

        let directory = SceneSnapshot::new(
            vec!["Intro".into(), "Main".into(), "Outro".into()],
            Some("Outro".into()),
            true,
        );

        let mut switcher = AutoSwitcher::new(RecordingView::default(), store, directory);
        switcher.handle(HostEvent::FinishedLoading, Instant::now());
        switcher
    }

    fn change_scene(switcher: &mut AutoSwitcher<RecordingView, MemoryStore, SceneSnapshot>, scene: &str, now: Instant) {
        switcher.directory_mut().current = Some(scene.to_string());
        switcher.handle(HostEvent::SceneChanged, now);
    }

    #[test]
    fn test_finished_loading_refreshes_then_loads() {
        let switcher = switcher(5);
        assert_eq!(switcher.panel().view().scenes.len(), 3);
        assert_eq!(switcher.panel().rule(), &SwitchRule::new(5, "Intro", "Main"));
    }

    #[test]
    fn test_switches_once_after_delay() {
        let mut switcher = switcher(5);
        let start = Instant::now();
        change_scene(&mut switcher, "Intro", start);

        assert_eq!(switcher.poll_expired(start + Duration::from_secs(4)), None);
        assert_eq!(
            switcher.poll_expired(start + Duration::from_secs(5)).as_deref(),
            Some("Main")
        );
        assert_eq!(switcher.poll_expired(start + Duration::from_secs(10)), None);
        assert_eq!(switcher.directory_mut().take_pending(), vec!["Main".to_string()]);
        assert_eq!(switcher.timer().state(), &TimerState::Idle);
    }

    #[test]
    fn test_streaming_stop_prevents_switch() {
        let mut switcher = switcher(5);
        let start = Instant::now();
        change_scene(&mut switcher, "Intro", start);

        switcher.directory_mut().streaming = false;
        switcher.handle(HostEvent::StreamingChanged, start + Duration::from_secs(3));

        assert_eq!(switcher.poll_expired(start + Duration::from_secs(5)), None);
        assert!(switcher.directory_mut().take_pending().is_empty());
    }

    #[test]
    fn test_leaving_from_scene_cancels() {
        let mut switcher = switcher(5);
        let start = Instant::now();
        change_scene(&mut switcher, "Intro", start);
        change_scene(&mut switcher, "Outro", start + Duration::from_secs(1));

        assert!(!switcher.timer().is_armed());
        assert_eq!(switcher.poll_expired(start + Duration::from_secs(5)), None);
    }

    #[test]
    fn test_missing_target_scene_is_silent_noop() {
        let mut switcher = switcher(5);
        let start = Instant::now();
        change_scene(&mut switcher, "Intro", start);

        switcher.directory_mut().scenes = vec!["Intro".into(), "Outro".into()];
        switcher.handle(HostEvent::SceneListChanged, start + Duration::from_secs(1));

        // The refresh resets the stale target selection to the first entry
        assert_eq!(switcher.panel().rule().to_scene, "Intro");
        switcher.panel_mut().on_to_selected("Main");

        switcher.poll_expired(start + Duration::from_secs(5));
        assert!(switcher.directory_mut().take_pending().is_empty());
        assert_eq!(switcher.directory().current.as_deref(), Some("Intro"));
        assert_eq!(switcher.timer().state(), &TimerState::Idle);
    }

    #[test]
    fn test_exit_cancels_then_saves() {
        let mut switcher = switcher(5);
        let start = Instant::now();
        change_scene(&mut switcher, "Intro", start);
        switcher.panel_mut().on_delay_changed(9);

        switcher.handle(HostEvent::Exiting, start + Duration::from_secs(1));

        assert!(!switcher.timer().is_armed());
        assert_eq!(switcher.store().get_int(CONFIG_SECTION, KEY_TIME), Some(9));
        assert_eq!(switcher.store().flushes, 1);
        assert_eq!(switcher.poll_expired(start + Duration::from_secs(10)), None);
    }

    #[test]
    fn test_finished_loading_mid_stream_arms() {
        let mut store = MemoryStore::default();
        store.set_int(CONFIG_SECTION, KEY_TIME, 5);
        store.set_string(CONFIG_SECTION, KEY_SCENE_FROM, "Intro");
        store.set_string(CONFIG_SECTION, KEY_SCENE_TO, "Main");
        let directory = SceneSnapshot::new(vec!["Intro".into(), "Main".into()], Some("Intro".into()), true);

        let mut switcher = AutoSwitcher::new(RecordingView::default(), store, directory);
        let start = Instant::now();
        switcher.handle(HostEvent::FinishedLoading, start);

        assert_eq!(switcher.deadline(), Some(start + Duration::from_secs(5)));
    }

    #[test]
    fn test_from_scene_edit_arms_on_current_scene() {
        let mut switcher = switcher(5);
        let start = Instant::now();
        change_scene(&mut switcher, "Outro", start);
        assert!(!switcher.timer().is_armed());

        switcher.edit(PanelEdit::FromScene("Outro".into()), start);
        assert_eq!(switcher.deadline(), Some(start + Duration::from_secs(5)));

        switcher.edit(PanelEdit::FromScene("Intro".into()), start);
        assert!(!switcher.timer().is_armed());
    }

    #[test]
    fn test_edits_are_saved_on_exit() {
        let mut switcher = switcher(5);
        let now = Instant::now();
        switcher.edit(PanelEdit::Delay(12), now);
        switcher.edit(PanelEdit::ToScene("Outro".into()), now);
        switcher.edit(PanelEdit::DockMoved(DockArea::Top), now);
        switcher.edit(PanelEdit::VisibilityToggled(false), now);

        switcher.handle(HostEvent::Exiting, now);

        let store = switcher.store();
        assert_eq!(store.get_int(CONFIG_SECTION, KEY_TIME), Some(12));
        assert_eq!(store.get_string(CONFIG_SECTION, KEY_SCENE_TO).as_deref(), Some("Outro"));
        assert_eq!(store.get_int(CONFIG_SECTION, KEY_DOCK_LOCATION), Some(4));
        assert_eq!(store.get_bool(CONFIG_SECTION, KEY_DOCK_VISIBLE), Some(false));
    }

    #[test]
    fn test_not_streaming_never_arms() {
        let mut switcher = switcher(0);
        switcher.directory_mut().streaming = false;
        let start = Instant::now();
        change_scene(&mut switcher, "Intro", start);

        assert!(!switcher.timer().is_armed());
        assert_eq!(switcher.poll_expired(start), None);
    }

    #[test]
    fn test_streaming_start_on_from_scene_arms() {
        let mut switcher = switcher(5);
        switcher.directory_mut().streaming = false;
        let start = Instant::now();
        change_scene(&mut switcher, "Intro", start);

        switcher.directory_mut().streaming = true;
        switcher.handle(HostEvent::StreamingChanged, start);

        assert_eq!(switcher.deadline(), Some(start + Duration::from_secs(5)));
    }
}
