//! OBS WebSocket controller implementation

use anyhow::{Context, Result};
use futures::StreamExt;
use obws::events::{Event, OutputState};
use obws::Client;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::Config;
use crate::engine::SceneHost;
use crate::switcher::{HostEvent, SceneSnapshot};

/// Controller for OBS WebSocket communication
pub struct OBSController {
    client: Client,
}

impl OBSController {
    /// Create a new OBS controller and connect to OBS
    pub async fn new(config: &Config) -> Result<Self> {
        let client = Client::connect(
            &config.obs.host,
            config.obs.port,
            config.obs.password.as_deref(),
        )
        .await
        .context("Failed to connect to OBS WebSocket")?;

        Ok(Self { client })
    }

    /// Query scenes, the program scene and the streaming state
    pub async fn fetch_snapshot(&self) -> Result<SceneSnapshot> {
        let list = self
            .client
            .scenes()
            .list()
            .await
            .context("Failed to list OBS scenes")?;

        // GetSceneList reports the bottom scene first; the UI lists it last
        let scenes: Vec<String> = list
            .scenes
            .into_iter()
            .rev()
            .map(|scene| scene.id.name)
            .collect();

        let current = self
            .client
            .scenes()
            .current_program_scene()
            .await
            .map(|scene| scene.id.name)
            .ok();

        let stream_status = self
            .client
            .streaming()
            .status()
            .await
            .context("Failed to get OBS stream status")?;

        debug!(
            "OBS state: {} scenes, current={:?}, streaming={}",
            scenes.len(),
            current,
            stream_status.active
        );

        Ok(SceneSnapshot::new(scenes, current, stream_status.active))
    }

    /// Make `name` the program scene
    pub async fn set_program_scene(&self, name: &str) -> Result<()> {
        self.client
            .scenes()
            .set_current_program_scene(name)
            .await
            .with_context(|| format!("Failed to switch OBS to scene {:?}", name))?;
        info!("Switched OBS program scene to {:?}", name);
        Ok(())
    }

    /// Subscribe to OBS events and forward them to a channel
    ///
    /// Spawns a background task that maps OBS events to [`HostEvent`]s.
    /// The end of the event stream (OBS closed or the connection dropped)
    /// is reported as [`HostEvent::Exiting`].
    pub fn subscribe_events(&self) -> Result<mpsc::UnboundedReceiver<HostEvent>> {
        let raw_events = self
            .client
            .events()
            .context("Failed to subscribe to OBS events")?;

        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            tokio::pin!(raw_events);

            while let Some(event) = raw_events.next().await {
                if let Some(e) = map_event(&event) {
                    let exiting = e == HostEvent::Exiting;
                    if tx.send(e).is_err() || exiting {
                        return;
                    }
                }
            }

            debug!("OBS event stream ended");
            let _ = tx.send(HostEvent::Exiting);
        });

        Ok(rx)
    }
}

/// Map an OBS event to the switcher's event set
pub fn map_event(event: &Event) -> Option<HostEvent> {
    match event {
        Event::CurrentProgramSceneChanged { .. } => Some(HostEvent::SceneChanged),
        Event::SceneListChanged { .. }
        | Event::SceneCreated { .. }
        | Event::SceneRemoved { .. }
        | Event::SceneNameChanged { .. } => Some(HostEvent::SceneListChanged),
        Event::CurrentSceneCollectionChanged { .. } => Some(HostEvent::SceneCollectionChanged),
        Event::CurrentProfileChanged { .. } => Some(HostEvent::ProfileChanged),
        Event::StreamStateChanged { state, .. } => match state {
            OutputState::Started | OutputState::Stopped => Some(HostEvent::StreamingChanged),
            _ => None,
        },
        Event::ExitStarted => Some(HostEvent::Exiting),
        _ => None,
    }
}

impl SceneHost for OBSController {
    async fn snapshot(&self) -> Result<SceneSnapshot> {
        self.fetch_snapshot().await
    }

    async fn activate_scene(&self, name: &str) -> Result<()> {
        self.set_program_scene(name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_state_mapping() {
        let started = Event::StreamStateChanged {
            active: true,
            state: OutputState::Started,
        };
        let starting = Event::StreamStateChanged {
            active: false,
            state: OutputState::Starting,
        };
        let stopped = Event::StreamStateChanged {
            active: false,
            state: OutputState::Stopped,
        };

        assert_eq!(map_event(&started), Some(HostEvent::StreamingChanged));
        assert_eq!(map_event(&starting), None);
        assert_eq!(map_event(&stopped), Some(HostEvent::StreamingChanged));
    }

    #[test]
    fn test_exit_mapping() {
        assert_eq!(map_event(&Event::ExitStarted), Some(HostEvent::Exiting));
    }
}
