//! D-Bus control surface: `org.skybar.Statusbar` at `/Statusbar`

use std::future::Future;

use async_channel::{Receiver, Sender};
use tracing::{debug, info, warn};
use zbus::object_server::SignalContext;

use skybar_core::{ExportedProperty, SharedProperties, ShellEvent};

pub const BUS_NAME: &str = "org.skybar.Statusbar";
pub const OBJECT_PATH: &str = "/Statusbar";

pub struct StatusbarService {
    properties: SharedProperties,
    events: Sender<ShellEvent>,
}

impl StatusbarService {
    pub fn new(properties: SharedProperties, events: Sender<ShellEvent>) -> Self {
        Self { properties, events }
    }

    fn forward(&self, event: ShellEvent) -> zbus::fdo::Result<()> {
        self.events
            .try_send(event)
            .map_err(|e| zbus::fdo::Error::Failed(e.to_string()))
    }
}

#[zbus::interface(name = "org.skybar.Statusbar")]
impl StatusbarService {
    /// Show or hide the battery level next to the indicator
    async fn set_battery_percentage(&self, enabled: bool) -> zbus::fdo::Result<()> {
        debug!("D-Bus: SetBatteryPercentage({})", enabled);
        self.forward(ShellEvent::SetBatteryPercentage(enabled))
    }

    async fn set_twenty_four_time(&self, enabled: bool) -> zbus::fdo::Result<()> {
        debug!("D-Bus: SetTwentyFourTime({})", enabled);
        self.forward(ShellEvent::SetTwentyFourTime(enabled))
    }

    #[zbus(property)]
    async fn twenty_four_time(&self) -> bool {
        self.properties.read().twenty_four_time
    }

    /// Geometry of the display the panel is on
    #[zbus(property)]
    async fn screen_rect(&self) -> (i32, i32, i32, i32) {
        self.properties.read().screen_rect.to_tuple()
    }
}

#[zbus::proxy(
    interface = "org.skybar.Statusbar",
    default_service = "org.skybar.Statusbar",
    default_path = "/Statusbar"
)]
pub trait Statusbar {
    fn set_battery_percentage(&self, enabled: bool) -> zbus::Result<()>;

    fn set_twenty_four_time(&self, enabled: bool) -> zbus::Result<()>;

    #[zbus(property)]
    fn twenty_four_time(&self) -> zbus::Result<bool>;

    #[zbus(property)]
    fn screen_rect(&self) -> zbus::Result<(i32, i32, i32, i32)>;
}

/// Own the bus name and serve the panel until `changes` closes, emitting
/// PropertiesChanged for every property it reports
pub async fn serve(
    properties: SharedProperties,
    events: Sender<ShellEvent>,
    changes: Receiver<ExportedProperty>,
) -> anyhow::Result<()> {
    let connection = zbus::connection::Builder::session()?
        .name(BUS_NAME)?
        .serve_at(OBJECT_PATH, StatusbarService::new(properties, events))?
        .build()
        .await?;

    info!("D-Bus service {} ready at {}", BUS_NAME, OBJECT_PATH);

    let iface_ref = connection
        .object_server()
        .interface::<_, StatusbarService>(OBJECT_PATH)
        .await?;

    let iface_ref = &iface_ref;
    announce_changes(changes, |property| async move {
        let ctxt: &SignalContext<'_> = iface_ref.signal_context();
        let iface = iface_ref.get().await;
        match property {
            ExportedProperty::TwentyFourTime => iface.twenty_four_time_changed(ctxt).await,
            ExportedProperty::ScreenRect => iface.screen_rect_changed(ctxt).await,
        }
    })
    .await;

    Ok(())
}

/// Emit every reported change until `changes` closes. A failed emission is
/// logged and the next change is still announced. Returns the number handled.
async fn announce_changes<F, Fut>(changes: Receiver<ExportedProperty>, mut emit: F) -> usize
where
    F: FnMut(ExportedProperty) -> Fut,
    Fut: Future<Output = zbus::Result<()>>,
{
    let mut handled = 0;
    while let Ok(property) = changes.recv().await {
        if let Err(e) = emit(property).await {
            warn!("Failed to announce {:?} change: {}", property, e);
        }
        handled += 1;
    }
    handled
}
