use std::path::PathBuf;
use std::time::Duration;

use async_channel::Sender;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::{ConfigPaths, SkybarSettings};
use crate::messages::ShellEvent;

const DEBOUNCE: Duration = Duration::from_millis(100);

/// Service that watches settings.json for changes using inotify
pub struct ConfigWatcher {
    paths: ConfigPaths,
    event_tx: Sender<ShellEvent>,
}

impl ConfigWatcher {
    pub fn new(paths: ConfigPaths, event_tx: Sender<ShellEvent>) -> Self {
        Self { paths, event_tx }
    }

    /// Run the config watcher (blocks forever)
    pub async fn run(self) -> anyhow::Result<()> {
        info!("Starting config watcher");

        // Watch the parent dir since the file might not exist yet
        let config_dir = self.paths.config_dir();
        tokio::fs::create_dir_all(&config_dir).await?;

        let (notify_tx, mut notify_rx) = mpsc::channel::<PathBuf>(32);

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                        for path in event.paths {
                            let _ = notify_tx.blocking_send(path);
                        }
                    }
                }
            },
            notify::Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&config_dir, RecursiveMode::NonRecursive)?;
        debug!("Watching directory: {:?}", config_dir);

        // Wait for rapid changes to settle
        let mut debounce_deadline: Option<tokio::time::Instant> = None;

        loop {
            tokio::select! {
                Some(path) = notify_rx.recv() => {
                    if path == self.paths.settings {
                        debounce_deadline = Some(tokio::time::Instant::now() + DEBOUNCE);
                    }
                }

                _ = async {
                    match debounce_deadline {
                        Some(deadline) => tokio::time::sleep_until(deadline).await,
                        None => std::future::pending::<()>().await,
                    }
                } => {
                    debounce_deadline = None;
                    if !self.reload_settings().await {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Reload settings and send event; returns false once nobody listens anymore
    async fn reload_settings(&self) -> bool {
        debug!("Reloading settings: {:?}", self.paths.settings);

        match tokio::fs::read(&self.paths.settings).await {
            Ok(data) => match serde_json::from_slice::<SkybarSettings>(&data) {
                Ok(settings) => {
                    info!("Settings reloaded, 24-hour clock: {}", settings.twenty_four_time);
                    return self.event_tx.send(ShellEvent::SettingsReloaded(settings)).await.is_ok();
                }
                Err(e) => warn!("Failed to parse settings: {}", e),
            },
            // Removed mid-write, the next event picks it up
            Err(e) => debug!("Could not read settings: {}", e),
        }

        true
    }
}
