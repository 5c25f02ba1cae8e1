use async_channel::Sender;
use gdk4_x11::X11Display;
use gtk4::prelude::*;
use gtk4::ApplicationWindow;
use gtk4_layer_shell::{Edge, KeyboardMode, Layer, LayerShell};
use tracing::{debug, trace};

use skybar_core::{
    PanelBehavior, PanelRole, PanelShell, PlacementError, Point, ShellAnnouncement, ShellEvent, Stacking,
    SurfaceRole,
};

use crate::display::GdkDisplays;

/// Protocol interface of the panel shell service
const LAYER_SHELL_INTERFACE: &str = "zwlr_layer_shell_v1";

/// Namespace the compositor sees for the panel surface
const PANEL_NAMESPACE: &str = "skybar-panel";

/// Panel shell backed by wlr-layer-shell
pub struct LayerShellBackend {
    window: ApplicationWindow,
    events: Sender<ShellEvent>,
}

impl LayerShellBackend {
    pub fn new(window: ApplicationWindow, events: Sender<ShellEvent>) -> Self {
        Self { window, events }
    }
}

impl PanelShell for LayerShellBackend {
    type Panel = LayerPanel;

    fn connect(&mut self) -> Result<(), PlacementError> {
        let display = gtk4::gdk::Display::default().ok_or(PlacementError::NoConnection)?;
        if display.is::<X11Display>() {
            return Err(PlacementError::NoConnection);
        }
        if !gtk4_layer_shell::is_supported() {
            return Err(PlacementError::NoShellService);
        }

        // Must run before the window is realized
        self.window.init_layer_shell();

        // The registry is bound by now; report the service from the main loop
        let events = self.events.clone();
        glib::idle_add_local_once(move || {
            let announcement = ShellAnnouncement::new(LAYER_SHELL_INTERFACE);
            if let Err(e) = events.try_send(ShellEvent::ShellAnnounced(announcement)) {
                debug!("Dropping panel shell announcement: {}", e);
            }
        });

        Ok(())
    }

    fn create_panel(&mut self, announcement: &ShellAnnouncement) -> Result<LayerPanel, PlacementError> {
        if announcement.interface != LAYER_SHELL_INTERFACE {
            return Err(PlacementError::NoShellService);
        }
        if !self.window.is_layer_window() {
            return Err(PlacementError::NoProtocolSurface);
        }

        Ok(LayerPanel {
            window: self.window.clone(),
        })
    }
}

/// The panel window's layer surface
pub struct LayerPanel {
    window: ApplicationWindow,
}

impl PanelRole for LayerPanel {
    fn set_role(&mut self, role: SurfaceRole) {
        match role {
            SurfaceRole::Panel => {
                self.window.set_namespace(PANEL_NAMESPACE);
                self.window.set_anchor(Edge::Top, true);
                self.window.set_anchor(Edge::Left, true);
                self.window.set_anchor(Edge::Right, true);
                self.window.set_anchor(Edge::Bottom, false);
            }
        }
    }

    fn set_panel_behavior(&mut self, behavior: PanelBehavior) {
        match behavior {
            PanelBehavior::AlwaysVisible => self.window.auto_exclusive_zone_enable(),
            PanelBehavior::WindowsGoBelow => self.window.set_exclusive_zone(0),
        }
    }

    fn set_skip_taskbar(&mut self, skip: bool) {
        // Layer surfaces never appear in task lists
        trace!("skip taskbar: {}", skip);
    }

    fn set_skip_switcher(&mut self, skip: bool) {
        trace!("skip switcher: {}", skip);
    }

    fn set_takes_focus(&mut self, takes_focus: bool) {
        let mode = if takes_focus {
            KeyboardMode::OnDemand
        } else {
            KeyboardMode::None
        };
        self.window.set_keyboard_mode(mode);
    }

    fn set_position(&mut self, position: Point) {
        let display = WidgetExt::display(&self.window);
        let Some(monitor) = GdkDisplays::monitor_at(&display, position) else {
            debug!("No monitor at {:?}, keeping the panel where it is", position);
            return;
        };

        let area = monitor.geometry();
        self.window.set_monitor(&monitor);
        self.window.set_margin(Edge::Left, position.x - area.x());
        self.window.set_margin(Edge::Top, position.y - area.y());
        self.window.set_margin(Edge::Right, 0);
    }

    fn set_stacking(&mut self, stacking: Stacking) {
        let layer = match stacking {
            Stacking::Above => Layer::Top,
            Stacking::Below => Layer::Bottom,
        };
        self.window.set_layer(layer);
    }
}
