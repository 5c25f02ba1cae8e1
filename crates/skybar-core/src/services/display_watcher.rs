use std::time::Duration;

use async_channel::Sender;
use tracing::{debug, info};
use x11rb::connection::Connection;
use x11rb::protocol::randr::{ConnectionExt as _, NotifyMask};
use x11rb::protocol::Event;

use crate::messages::ShellEvent;

/// Wait for a burst of RandR notifications to settle
const DEBOUNCE: Duration = Duration::from_millis(100);

/// Follows RandR on X11 so primary output changes that keep the monitor
/// list intact still reach the controller
pub struct DisplayWatcher {
    event_tx: Sender<ShellEvent>,
}

impl DisplayWatcher {
    pub fn new(event_tx: Sender<ShellEvent>) -> Self {
        Self { event_tx }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        info!("Watching RandR for display layout changes");
        let tx = self.event_tx;
        tokio::task::spawn_blocking(move || watch_randr(tx)).await?
    }
}

fn watch_randr(tx: Sender<ShellEvent>) -> anyhow::Result<()> {
    let (conn, screen_num) = x11rb::connect(None)?;
    let root = conn.setup().roots[screen_num].root;

    let version = conn.randr_query_version(1, 3)?.reply()?;
    debug!("RandR {}.{}", version.major_version, version.minor_version);

    conn.randr_select_input(
        root,
        NotifyMask::SCREEN_CHANGE | NotifyMask::OUTPUT_CHANGE | NotifyMask::CRTC_CHANGE,
    )?;
    conn.flush()?;

    loop {
        let event = conn.wait_for_event()?;
        if !is_layout_event(&event) {
            continue;
        }

        // GDK handles the same burst; let it update its monitors first
        std::thread::sleep(DEBOUNCE);
        while conn.poll_for_event()?.is_some() {}

        if !notify_layout(&tx) {
            return Ok(());
        }
    }
}

/// RandR notifications that can move the primary output
fn is_layout_event(event: &Event) -> bool {
    matches!(event, Event::RandrScreenChangeNotify(_) | Event::RandrNotify(_))
}

/// Returns false once nobody listens anymore
fn notify_layout(tx: &Sender<ShellEvent>) -> bool {
    debug!("RandR layout changed");
    tx.try_send(ShellEvent::DisplayLayoutChanged).is_ok()
}
