//! Auto Scene Switcher
//!
//! Switches the OBS program scene to a destination scene once a source scene
//! has been on air for a configured delay while streaming.

pub mod config;
pub mod engine;
pub mod logging;
pub mod obs;
pub mod settings;
pub mod switcher;
pub mod ui;

pub const NAME: &str = "Auto scene switcher";

pub const DESCRIPTION: &str = "Automatically changes the scene after a specified time has passed \
    after transitioning to a specified scene.";
