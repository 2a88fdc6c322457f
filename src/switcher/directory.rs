//! Scene directory and streaming state seen by the switcher

use tracing::debug;

/// Enumeration and activation of the host's scenes
pub trait SceneDirectory {
    /// Scene names in host order
    fn scene_names(&self) -> Vec<String>;

    /// Currently active program scene, if any
    fn current_scene(&self) -> Option<String>;

    /// Request activation of `name`. Unknown names are ignored.
    fn activate_scene(&mut self, name: &str);
}

/// Streaming state query
pub trait StreamingStatus {
    fn is_streaming(&self) -> bool;
}

/// Cached view of the host's scenes.
///
/// The engine refreshes it from OBS before dispatching each event.
/// Activation requests are queued and sent to OBS afterwards.
#[derive(Debug, Clone, Default)]
pub struct SceneSnapshot {
    pub scenes: Vec<String>,
    pub current: Option<String>,
    pub streaming: bool,
    pending: Vec<String>,
}

impl SceneSnapshot {
    pub fn new(scenes: Vec<String>, current: Option<String>, streaming: bool) -> Self {
        Self {
            scenes,
            current,
            streaming,
            pending: Vec::new(),
        }
    }

    /// Take the queued activation requests
    pub fn take_pending(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending)
    }
}

impl SceneDirectory for SceneSnapshot {
    fn scene_names(&self) -> Vec<String> {
        self.scenes.clone()
    }

    fn current_scene(&self) -> Option<String> {
        self.current.clone()
    }

    fn activate_scene(&mut self, name: &str) {
        if !self.scenes.iter().any(|s| s == name) {
            debug!("Ignoring activation of unknown scene {:?}", name);
            return;
        }
        self.current = Some(name.to_string());
        self.pending.push(name.to_string());
    }
}

impl StreamingStatus for SceneSnapshot {
    fn is_streaming(&self) -> bool {
        self.streaming
    }
}
