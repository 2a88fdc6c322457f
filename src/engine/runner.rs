//! Switch engine implementation
//!
//! Single task owning the switcher. Host events, shutdown commands and the
//! armed switch deadline are all awaited in one `select!`, so events are
//! handled strictly in delivery order and a cancelled timer can never fire.

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::{EngineCommand, SceneHost};
use crate::settings::ConfigStore;
use crate::switcher::{AutoSwitcher, HostEvent, PanelView, SceneSnapshot};

/// Create the command channel used to stop the engine
pub fn create_engine_channels() -> (mpsc::Sender<EngineCommand>, mpsc::Receiver<EngineCommand>) {
    mpsc::channel(8)
}

pub struct SwitchEngine<H, V, S> {
    host: H,
    switcher: AutoSwitcher<V, S, SceneSnapshot>,
    events: mpsc::UnboundedReceiver<HostEvent>,
    cmd_rx: mpsc::Receiver<EngineCommand>,
}

impl<H, V, S> SwitchEngine<H, V, S>
where
    H: SceneHost + Send + Sync,
    V: PanelView + Send,
    S: ConfigStore + Send,
{
    pub fn new(
        host: H,
        view: V,
        store: S,
        events: mpsc::UnboundedReceiver<HostEvent>,
        cmd_rx: mpsc::Receiver<EngineCommand>,
    ) -> Self {
        Self {
            host,
            switcher: AutoSwitcher::new(view, store, SceneSnapshot::default()),
            events,
            cmd_rx,
        }
    }

    /// Run until the host exits or a shutdown command arrives.
    ///
    /// The connection being up counts as the host having finished loading.
    pub async fn run(mut self) -> Result<()> {
        info!("Switch engine starting");
        self.dispatch(HostEvent::FinishedLoading).await;

        loop {
            let deadline = self.switcher.deadline();

            tokio::select! {
                event = self.events.recv() => {
                    match event {
                        Some(HostEvent::Exiting) | None => {
                            info!("OBS is exiting");
                            break;
                        }
                        Some(event) => self.dispatch(event).await,
                    }
                }

                Some(cmd) = self.cmd_rx.recv() => {
                    match cmd {
                        EngineCommand::Edit(edit) => {
                            self.switcher.edit(edit, Instant::now());
                        }
                        EngineCommand::ReloadSettings => {
                            info!("Settings file changed, reloading");
                            self.switcher.reload_settings(Instant::now());
                        }
                        EngineCommand::Shutdown => {
                            info!("Shutdown requested");
                            break;
                        }
                    }
                }

                _ = async {
                    match deadline {
                        Some(deadline) => tokio::time::sleep_until(deadline).await,
                        None => std::future::pending().await,
                    }
                } => {
                    self.switcher.poll_expired(Instant::now());
                    self.send_activations().await;
                }
            }
        }

        self.switcher.handle(HostEvent::Exiting, Instant::now());
        info!("Switch engine shutting down");
        Ok(())
    }

    /// Refresh the scene snapshot, then hand the event to the switcher
    async fn dispatch(&mut self, event: HostEvent) {
        match self.host.snapshot().await {
            Ok(snapshot) => *self.switcher.directory_mut() = snapshot,
            Err(e) => warn!("Failed to refresh scene state, using last known: {:#}", e),
        }

        self.switcher.handle(event, Instant::now());
        self.send_activations().await;
    }

    async fn send_activations(&mut self) {
        for scene in self.switcher.directory_mut().take_pending() {
            if let Err(e) = self.host.activate_scene(&scene).await {
                warn!("{:#}", e);
            } else {
                debug!("Activation of {:?} sent", scene);
            }
        }
    }
}
