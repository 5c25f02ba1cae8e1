//! Platform backends behind the core placement strategies

mod layer_shell;
mod x11;

pub use layer_shell::{LayerPanel, LayerShellBackend};
pub use x11::X11Hints;

use async_channel::Sender;
use gdk4_x11::X11Surface;
use gtk4::prelude::*;
use tracing::info;

use skybar_core::{CompositorShell, DisplayProtocol, LegacyHints, PlacementStrategy, ShellEvent};

use crate::error::BackendError;
use crate::window::PanelWindow;

/// Build the placement strategy for `protocol`.
///
/// On X11 the window is realized here to obtain its XID, and mapping it
/// raises [`ShellEvent::SurfaceMapped`]. On Wayland it must still be
/// unrealized so the layer surface can be set up.
pub fn placement_for(
    protocol: DisplayProtocol,
    window: &PanelWindow,
    events: Sender<ShellEvent>,
) -> Result<Box<dyn PlacementStrategy>, BackendError> {
    match protocol {
        DisplayProtocol::Legacy => {
            let window = window.window();
            window.realize();

            let xid = window
                .surface()
                .and_downcast::<X11Surface>()
                .ok_or(BackendError::NoSurface)?
                .xid();

            info!("Panel window has XID {:#x}", xid);
            let hints = X11Hints::connect(xid as u32, WidgetExt::display(window))?;

            // GDK resets desktop and stacking hints when it maps the window
            window.connect_map(move |_| {
                let _ = events.try_send(ShellEvent::SurfaceMapped);
            });

            Ok(Box::new(LegacyHints::new(hints)))
        }
        DisplayProtocol::Compositor => {
            let shell = LayerShellBackend::new(window.window().clone(), events);
            Ok(Box::new(CompositorShell::new(shell)))
        }
    }
}
