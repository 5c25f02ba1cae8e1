use std::sync::Arc;

use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::{error, info};

use super::{ActivityTracker, BatteryService, ConfigWatcher, DisplayWatcher, ProcessLauncher, ProcessService};
use crate::config::ConfigPaths;
use crate::messages::{ShellCommand, ShellEvent};
use crate::platform::DisplayProtocol;

/// Central hub for managing all async services
pub struct ServiceHub {
    /// Event sender shared by services and GTK signal handlers
    event_tx: async_channel::Sender<ShellEvent>,
    /// Event receiver drained on the GTK main loop
    event_rx: async_channel::Receiver<ShellEvent>,
    /// Command sender for GTK to use
    command_tx: mpsc::Sender<ShellCommand>,
    /// Tokio runtime
    runtime: Arc<Runtime>,
}

impl ServiceHub {
    /// Create a new ServiceHub with its own tokio runtime
    pub fn new(protocol: DisplayProtocol, paths: ConfigPaths) -> anyhow::Result<Self> {
        let runtime = Arc::new(Runtime::new()?);

        // Unbounded: GTK signal handlers must never block the main loop
        let (event_tx, event_rx) = async_channel::unbounded::<ShellEvent>();
        let (command_tx, command_rx) = mpsc::channel::<ShellCommand>(64);

        runtime.spawn(async move {
            if let Err(e) = ProcessService::new(command_rx).run().await {
                error!("Process service error: {}", e);
            }
        });

        let event_tx_config = event_tx.clone();
        runtime.spawn(async move {
            let watcher = ConfigWatcher::new(paths, event_tx_config);
            if let Err(e) = watcher.run().await {
                error!("Config watcher error: {}", e);
            }
        });

        let event_tx_battery = event_tx.clone();
        runtime.spawn(async move {
            if let Err(e) = BatteryService::new(event_tx_battery).run().await {
                error!("Battery service error: {}", e);
            }
        });

        let event_tx_activity = event_tx.clone();
        runtime.spawn(async move {
            if let Err(e) = ActivityTracker::new(event_tx_activity).run(protocol).await {
                error!("Activity tracker error: {}", e);
            }
        });

        if protocol.is_legacy() {
            let event_tx_displays = event_tx.clone();
            runtime.spawn(async move {
                if let Err(e) = DisplayWatcher::new(event_tx_displays).run().await {
                    error!("Display watcher error: {}", e);
                }
            });
        }

        info!("ServiceHub initialized with all services");

        Ok(Self {
            event_tx,
            event_rx,
            command_tx,
            runtime,
        })
    }

    /// Get a clone of the event receiver
    pub fn event_receiver(&self) -> async_channel::Receiver<ShellEvent> {
        self.event_rx.clone()
    }

    /// Get a clone of the event sender
    pub fn event_sender(&self) -> async_channel::Sender<ShellEvent> {
        self.event_tx.clone()
    }

    /// Launcher bound to the process service
    pub fn launcher(&self) -> ProcessLauncher {
        ProcessLauncher::new(self.command_tx.clone())
    }

    /// Enter the runtime context (for GTK callbacks)
    pub fn enter_runtime(&self) -> tokio::runtime::EnterGuard<'_> {
        self.runtime.enter()
    }

    /// Get a reference to the runtime
    pub fn runtime(&self) -> &Arc<Runtime> {
        &self.runtime
    }
}
