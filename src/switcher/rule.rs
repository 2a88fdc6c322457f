//! Switch rule and panel visibility state

use std::time::Duration;

/// Delay used when no value has been stored yet
pub const DEFAULT_DELAY_SECS: u32 = 60;

/// Largest delay the panel accepts, in seconds (the spinner works in
/// milliseconds internally and must stay within an `i32`)
pub const MAX_DELAY_SECS: u32 = (i32::MAX / 1000) as u32;

/// Clamp a raw delay value into `0..=MAX_DELAY_SECS`
pub fn clamp_delay(secs: i64) -> u32 {
    secs.clamp(0, MAX_DELAY_SECS as i64) as u32
}

/// The single from/to switching rule edited through the panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchRule {
    /// Seconds to wait on `from_scene` before switching
    pub delay_seconds: u32,

    /// Scene whose activation arms the timer
    pub from_scene: String,

    /// Scene activated when the timer expires
    pub to_scene: String,
}

impl SwitchRule {
    pub fn new(delay_seconds: u32, from_scene: impl Into<String>, to_scene: impl Into<String>) -> Self {
        Self {
            delay_seconds: delay_seconds.min(MAX_DELAY_SECS),
            from_scene: from_scene.into(),
            to_scene: to_scene.into(),
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_secs(u64::from(self.delay_seconds))
    }

    /// Exact, case-sensitive match against the source scene.
    /// An unset source scene never matches.
    pub fn matches_from(&self, scene: &str) -> bool {
        !self.from_scene.is_empty() && self.from_scene == scene
    }
}

impl Default for SwitchRule {
    fn default() -> Self {
        Self {
            delay_seconds: DEFAULT_DELAY_SECS,
            from_scene: String::new(),
            to_scene: String::new(),
        }
    }
}

/// Where the panel is docked on the host window.
///
/// Stored as the host toolkit's dock-area flag values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DockArea {
    #[default]
    Left,
    Right,
    Top,
    Bottom,
}

impl DockArea {
    pub fn to_raw(self) -> i64 {
        match self {
            DockArea::Left => 1,
            DockArea::Right => 2,
            DockArea::Top => 4,
            DockArea::Bottom => 8,
        }
    }

    /// Decode a stored value, `None` for anything that is not a single dock area
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            1 => Some(DockArea::Left),
            2 => Some(DockArea::Right),
            4 => Some(DockArea::Top),
            8 => Some(DockArea::Bottom),
            _ => None,
        }
    }
}

/// Dock placement and visibility of the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelVisibility {
    pub dock_area: DockArea,
    pub visible: bool,
}

impl Default for PanelVisibility {
    fn default() -> Self {
        Self {
            dock_area: DockArea::Left,
            visible: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rule() {
        let rule = SwitchRule::default();
        assert_eq!(rule.delay_seconds, 60);
        assert!(rule.from_scene.is_empty());
        assert!(rule.to_scene.is_empty());
    }

    #[test]
    fn test_clamp_delay() {
        assert_eq!(clamp_delay(-5), 0);
        assert_eq!(clamp_delay(30), 30);
        assert_eq!(clamp_delay(i64::MAX), 2_147_483);
        assert_eq!(SwitchRule::new(u32::MAX, "a", "b").delay_seconds, MAX_DELAY_SECS);
    }

    #[test]
    fn test_matches_from_is_case_sensitive() {
        let rule = SwitchRule::new(5, "Intro", "Main");
        assert!(rule.matches_from("Intro"));
        assert!(!rule.matches_from("intro"));
        assert!(!SwitchRule::default().matches_from(""));
    }

    #[test]
    fn test_dock_area_raw_values() {
        for area in [DockArea::Left, DockArea::Right, DockArea::Top, DockArea::Bottom] {
            assert_eq!(DockArea::from_raw(area.to_raw()), Some(area));
        }
        assert_eq!(DockArea::from_raw(0), None);
        assert_eq!(DockArea::from_raw(15), None);
    }
}
