//! Key-value settings persistence
//!
//! Mirrors the host's global config facility: integers, strings and booleans
//! stored under `section` / `key` pairs. A missing key (or a value of the
//! wrong type) reads back as `None` so callers can fall back to defaults.

mod toml_store;

pub use toml_store::TomlStore;

use std::path::PathBuf;
use thiserror::Error;

/// Section all switcher settings live under
pub const CONFIG_SECTION: &str = "obs-auto-scene-switcher";

pub const KEY_TIME: &str = "Time";
pub const KEY_SCENE_FROM: &str = "SceneFrom";
pub const KEY_SCENE_TO: &str = "SceneTo";
pub const KEY_DOCK_LOCATION: &str = "DockLocation";
pub const KEY_DOCK_VISIBLE: &str = "DockVisible";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read settings file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse settings file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to write settings file {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Host-style key-value configuration store
pub trait ConfigStore {
    fn get_int(&self, section: &str, key: &str) -> Option<i64>;
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_bool(&self, section: &str, key: &str) -> Option<bool>;

    fn set_int(&mut self, section: &str, key: &str, value: i64);
    fn set_string(&mut self, section: &str, key: &str, value: &str);
    fn set_bool(&mut self, section: &str, key: &str, value: bool);

    /// Persist pending writes
    fn flush(&mut self) -> Result<(), StoreError>;

    /// Drop cached values and read the backing storage again
    fn reload(&mut self) -> Result<(), StoreError>;
}
