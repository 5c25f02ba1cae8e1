use tracing::{debug, warn};

use super::{PlacementError, PlacementStrategy, Stacking};
use crate::geometry::{DisplayInfo, ExtendedStrut, Rect};
use crate::platform::DisplayProtocol;

/// EWMH requests the legacy strategy needs from the window manager
pub trait WindowManagerHints {
    /// Show the window on every virtual desktop
    fn set_on_all_desktops(&mut self) -> Result<(), PlacementError>;

    /// Mark the window as a dock
    fn set_dock_type(&mut self) -> Result<(), PlacementError>;

    /// Keep above or keep below
    fn set_stacking(&mut self, stacking: Stacking) -> Result<(), PlacementError>;

    fn move_resize(&mut self, rect: Rect) -> Result<(), PlacementError>;

    /// Replace the window's strut declaration
    fn set_extended_strut(&mut self, strut: &ExtendedStrut) -> Result<(), PlacementError>;

    fn enable_blur_behind(&mut self, enable: bool) -> Result<(), PlacementError>;
}

/// Placement through window manager hints and struts (X11)
pub struct LegacyHints<W> {
    wm: W,
}

impl<W: WindowManagerHints> LegacyHints<W> {
    pub fn new(wm: W) -> Self {
        Self { wm }
    }

    pub fn wm(&self) -> &W {
        &self.wm
    }
}

fn log_failure(request: &str, result: Result<(), PlacementError>) {
    if let Err(e) = result {
        warn!("Failed to {} for panel: {}", request, e);
    }
}

impl<W: WindowManagerHints> PlacementStrategy for LegacyHints<W> {
    fn protocol(&self) -> DisplayProtocol {
        DisplayProtocol::Legacy
    }

    fn prepare(&mut self) {
        log_failure("show on all desktops", self.wm.set_on_all_desktops());
        log_failure("set dock window type", self.wm.set_dock_type());
    }

    fn apply_placement(&mut self, panel: Rect) {
        log_failure("move panel window", self.wm.move_resize(panel));
    }

    fn apply_reservation(&mut self, panel: Rect, display: &DisplayInfo) {
        let strut = ExtendedStrut::top(panel, display.top_offset());
        debug!(
            "Reserving top strut: width={} start={} end={}",
            strut.top_width, strut.top_start, strut.top_end
        );

        log_failure("set extended strut", self.wm.set_extended_strut(&strut));
        log_failure("enable blur", self.wm.enable_blur_behind(true));
    }

    fn set_stacking(&mut self, stacking: Stacking) {
        log_failure("set stacking", self.wm.set_stacking(stacking));
    }

    fn on_surface_mapped(&mut self) {
        debug!("Panel window mapped, re-sending window manager hints");
        self.prepare();
    }
}
