//! Host lifecycle and state-change notifications

use super::rule::DockArea;

/// Closed set of events the switcher reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The active program scene changed
    SceneChanged,
    /// Scenes were added, removed or renamed
    SceneListChanged,
    SceneCollectionChanged,
    ProfileChanged,
    /// Streaming started or stopped
    StreamingChanged,
    /// The host finished loading (or the connection to it was established)
    FinishedLoading,
    /// The host is shutting down (or the connection was lost)
    Exiting,
}

/// A user edit made on the panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEdit {
    Delay(i64),
    FromScene(String),
    ToScene(String),
    DockMoved(DockArea),
    VisibilityToggled(bool),
}
