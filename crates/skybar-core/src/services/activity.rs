use std::time::Duration;

use async_channel::Sender;
use compact_str::CompactString;
use hyprland::data::Client;
use hyprland::event_listener::EventListener;
use hyprland::shared::HyprDataActiveOptional;
use tracing::{debug, info, warn};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{AtomEnum, ChangeWindowAttributesAux, ConnectionExt as _, EventMask, Window};
use x11rb::protocol::Event;

use crate::messages::ShellEvent;
use crate::platform::DisplayProtocol;

x11rb::atom_manager! {
    ActivityAtoms: ActivityAtomsCookie {
        _NET_ACTIVE_WINDOW,
        _NET_WM_NAME,
        UTF8_STRING,
    }
}

/// Service that follows the focused window so the panel can track the launchpad
pub struct ActivityTracker {
    event_tx: Sender<ShellEvent>,
}

impl ActivityTracker {
    pub fn new(event_tx: Sender<ShellEvent>) -> Self {
        Self { event_tx }
    }

    /// Check if Hyprland is running by looking for its instance signature
    fn is_hyprland_running() -> bool {
        std::env::var_os("HYPRLAND_INSTANCE_SIGNATURE").is_some()
    }

    /// Pick an active-window source for the session and follow it
    pub async fn run(self, protocol: DisplayProtocol) -> anyhow::Result<()> {
        if Self::is_hyprland_running() {
            info!("Tracking active window through Hyprland IPC");
            self.run_hyprland().await
        } else if protocol.is_legacy() {
            info!("Tracking active window through _NET_ACTIVE_WINDOW");
            let tx = self.event_tx;
            tokio::task::spawn_blocking(move || watch_x11(tx)).await?
        } else {
            info!("No active window source for this compositor, launchpad tracking disabled");
            Ok(())
        }
    }

    async fn run_hyprland(self) -> anyhow::Result<()> {
        match Client::get_active_async().await {
            Ok(Some(client)) => send_active(&self.event_tx, &client.class, &client.title),
            Ok(None) => {}
            Err(e) => warn!("Failed to query the active Hyprland window: {}", e),
        }

        loop {
            if let Err(e) = Self::run_event_listener(self.event_tx.clone()).await {
                warn!("Hyprland event listener error: {}, reconnecting...", e);
            }
            if self.event_tx.is_closed() {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_secs(2)).await;
        }
    }

    /// Run the event listener (blocks until error)
    async fn run_event_listener(tx: Sender<ShellEvent>) -> anyhow::Result<()> {
        let mut listener = EventListener::new();

        listener.add_active_window_change_handler(move |data| match data {
            Some(data) => send_active(&tx, &data.window_class, &data.window_title),
            None => send_active(&tx, "", ""),
        });

        debug!("Starting Hyprland event listener");
        listener.start_listener_async().await?;

        Ok(())
    }
}

fn send_active(tx: &Sender<ShellEvent>, class: &str, title: &str) {
    let _ = tx.try_send(ShellEvent::ActiveWindowChanged {
        class: CompactString::from(class),
        title: CompactString::from(title),
    });
}

/// Follow `_NET_ACTIVE_WINDOW` on the root window until the receiver is gone
fn watch_x11(tx: Sender<ShellEvent>) -> anyhow::Result<()> {
    let (conn, screen_num) = x11rb::connect(None)?;
    let root = conn.setup().roots[screen_num].root;
    let atoms = ActivityAtoms::new(&conn)?.reply()?;

    conn.change_window_attributes(
        root,
        &ChangeWindowAttributesAux::new().event_mask(EventMask::PROPERTY_CHANGE),
    )?;
    conn.flush()?;

    let (class, title) = active_window(&conn, root, &atoms);
    send_active(&tx, &class, &title);

    loop {
        let event = conn.wait_for_event()?;
        if tx.is_closed() {
            return Ok(());
        }

        if let Event::PropertyNotify(notify) = event {
            if notify.window == root && notify.atom == atoms._NET_ACTIVE_WINDOW {
                let (class, title) = active_window(&conn, root, &atoms);
                send_active(&tx, &class, &title);
            }
        }
    }
}

/// Class and title of the active window; empty when there is none or it vanished
fn active_window(conn: &impl Connection, root: Window, atoms: &ActivityAtoms) -> (String, String) {
    let window = conn
        .get_property(false, root, atoms._NET_ACTIVE_WINDOW, AtomEnum::WINDOW, 0, 1)
        .ok()
        .and_then(|cookie| cookie.reply().ok())
        .and_then(|reply| reply.value32().and_then(|mut values| values.next()))
        .filter(|window| *window != x11rb::NONE);

    let Some(window) = window else {
        return (String::new(), String::new());
    };

    let class = conn
        .get_property(false, window, AtomEnum::WM_CLASS, AtomEnum::STRING, 0, 256)
        .ok()
        .and_then(|cookie| cookie.reply().ok())
        .map(|reply| parse_wm_class(&reply.value))
        .unwrap_or_default();

    let title = conn
        .get_property(false, window, atoms._NET_WM_NAME, atoms.UTF8_STRING, 0, 1024)
        .ok()
        .and_then(|cookie| cookie.reply().ok())
        .map(|reply| String::from_utf8_lossy(&reply.value).into_owned())
        .unwrap_or_default();

    (class, title)
}

/// `WM_CLASS` holds "instance\0class\0"; prefer the class part
fn parse_wm_class(value: &[u8]) -> String {
    let mut parts = value
        .split(|b| *b == 0)
        .filter(|part| !part.is_empty())
        .map(|part| String::from_utf8_lossy(part).into_owned());

    let instance = parts.next();
    parts.next().or(instance).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wm_class_prefers_class() {
        assert_eq!(parse_wm_class(b"navigator\0Firefox\0"), "Firefox");
    }

    #[test]
    fn test_parse_wm_class_instance_only() {
        assert_eq!(parse_wm_class(b"skybar-launcher\0"), "skybar-launcher");
        assert_eq!(parse_wm_class(b""), "");
    }

    #[test]
    fn test_send_active_forwards_window() {
        let (tx, rx) = async_channel::unbounded();
        send_active(&tx, "kitty", "~");
        assert_eq!(
            rx.try_recv().unwrap(),
            ShellEvent::ActiveWindowChanged {
                class: "kitty".into(),
                title: "~".into(),
            }
        );
    }
}
