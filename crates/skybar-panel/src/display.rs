use async_channel::Sender;
use gdk4_x11::X11Display;
use gtk4::gdk;
use gtk4::prelude::*;
use tracing::debug;

use skybar_core::{DisplayBackend, DisplayInfo, DisplayProtocol, Rect, ShellEvent};

/// Protocol of the GDK display; falls back to the session environment
pub fn detect_protocol(display: &gdk::Display) -> DisplayProtocol {
    if display.is::<X11Display>() {
        DisplayProtocol::Legacy
    } else {
        DisplayProtocol::detect()
    }
}

fn to_rect(rect: gdk::Rectangle) -> Rect {
    Rect::new(rect.x(), rect.y(), rect.width(), rect.height())
}

/// GDK monitors as seen by the panel controller
pub struct GdkDisplays {
    display: gdk::Display,
    events: Sender<ShellEvent>,
    layout_handler: Option<glib::SignalHandlerId>,
}

impl GdkDisplays {
    /// Watch the monitor list of `display`; changes arrive as [`ShellEvent::DisplayLayoutChanged`]
    pub fn new(display: gdk::Display, events: Sender<ShellEvent>) -> Self {
        let tx = events.clone();
        let layout_handler = display.monitors().connect_items_changed(move |_, position, removed, added| {
            debug!("Monitors changed at {}: -{} +{}", position, removed, added);
            let _ = tx.try_send(ShellEvent::DisplayLayoutChanged);
        });

        Self {
            display,
            events,
            layout_handler: Some(layout_handler),
        }
    }

    fn monitors(&self) -> Vec<gdk::Monitor> {
        let model = self.display.monitors();
        (0..model.n_items())
            .filter_map(|i| model.item(i))
            .filter_map(|object| object.downcast::<gdk::Monitor>().ok())
            .collect()
    }

    /// Monitor containing `position`, if any
    pub fn monitor_at(display: &gdk::Display, position: skybar_core::Point) -> Option<gdk::Monitor> {
        let model = display.monitors();
        (0..model.n_items())
            .filter_map(|i| model.item(i))
            .filter_map(|object| object.downcast::<gdk::Monitor>().ok())
            .find(|monitor| to_rect(monitor.geometry()).contains(position))
    }
}

impl DisplayBackend for GdkDisplays {
    type Output = gdk::Monitor;
    type Subscription = Vec<glib::SignalHandlerId>;

    fn primary(&self) -> Option<gdk::Monitor> {
        // Only X11 has a notion of a primary monitor; elsewhere the first one wins
        if let Some(x11) = self.display.downcast_ref::<X11Display>() {
            return Some(x11.primary_monitor());
        }
        self.monitors().into_iter().next()
    }

    fn info(&self, output: &gdk::Monitor) -> DisplayInfo {
        let virtual_geometry = self
            .monitors()
            .iter()
            .map(|monitor| to_rect(monitor.geometry()))
            .fold(Rect::default(), |acc, rect| acc.united(&rect));

        DisplayInfo::new(to_rect(output.geometry()), virtual_geometry)
    }

    fn subscribe(&mut self, output: &gdk::Monitor) -> Vec<glib::SignalHandlerId> {
        let tx = self.events.clone();
        let geometry = output.connect_geometry_notify(move |_| {
            let _ = tx.try_send(ShellEvent::DisplayGeometryChanged);
        });

        let tx = self.events.clone();
        let scale = output.connect_scale_factor_notify(move |_| {
            let _ = tx.try_send(ShellEvent::DisplayGeometryChanged);
        });

        vec![geometry, scale]
    }

    fn unsubscribe(&mut self, output: &gdk::Monitor, subscription: Vec<glib::SignalHandlerId>) {
        for handler in subscription {
            output.disconnect(handler);
        }
    }
}

impl Drop for GdkDisplays {
    fn drop(&mut self) {
        if let Some(handler) = self.layout_handler.take() {
            self.display.monitors().disconnect(handler);
        }
    }
}
