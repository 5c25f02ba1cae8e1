//! Platform-specific panel placement.
//!
//! The controller talks to one [`PlacementStrategy`], picked once at startup:
//! [`LegacyHints`] on X11, [`CompositorShell`] on Wayland. Each strategy hides
//! its protocol calls behind a small backend trait so it can be driven by fakes
//! in tests.

mod compositor;
mod legacy;

pub use compositor::{CompositorShell, PanelRole, PanelShell};
pub use legacy::{LegacyHints, WindowManagerHints};

use crate::geometry::{DisplayInfo, Rect};
use crate::messages::ShellAnnouncement;
use crate::platform::DisplayProtocol;

/// Whether the panel stays above or below other windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stacking {
    #[default]
    Above,
    Below,
}

impl Stacking {
    /// Stay below the launchpad while it is open
    pub fn for_launchpad(launchpad_open: bool) -> Self {
        if launchpad_open {
            Self::Below
        } else {
            Self::Above
        }
    }
}

/// How the compositor treats windows overlapping the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelBehavior {
    /// Space is reserved, windows never overlap the panel
    AlwaysVisible,
    /// Windows may extend below the panel
    WindowsGoBelow,
}

/// Role of a compositor shell surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceRole {
    Panel,
}

/// Errors raised by platform backends
#[derive(Debug, thiserror::Error)]
pub enum PlacementError {
    #[error("display server connection not available")]
    NoConnection,

    #[error("compositor does not provide a panel shell service")]
    NoShellService,

    #[error("failed to acquire a protocol surface for the panel window")]
    NoProtocolSurface,

    #[error("failed to create the panel shell surface")]
    PanelCreation,

    #[error("window manager request failed: {0}")]
    WindowManager(String),
}

/// Placement and screen reservation for one platform
pub trait PlacementStrategy {
    /// Protocol this strategy targets
    fn protocol(&self) -> DisplayProtocol;

    /// One-time setup before the first placement
    fn prepare(&mut self);

    /// Move and resize the panel to `panel`
    fn apply_placement(&mut self, panel: Rect);

    /// Reserve screen space for `panel` on `display`, replacing any previous reservation
    fn apply_reservation(&mut self, panel: Rect, display: &DisplayInfo);

    /// Keep the panel above or below other windows
    fn set_stacking(&mut self, stacking: Stacking);

    /// The panel window was mapped; hints the display server drops on map must be re-sent
    fn on_surface_mapped(&mut self) {}

    /// The compositor announced its panel shell service
    fn on_shell_announced(&mut self, _announcement: ShellAnnouncement) {}

    /// Whether the panel is registered with the display server
    fn is_registered(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stacking_for_launchpad() {
        assert_eq!(Stacking::for_launchpad(true), Stacking::Below);
        assert_eq!(Stacking::for_launchpad(false), Stacking::Above);
    }
}
