pub mod clock;
pub mod config;
pub mod controller;
pub mod geometry;
pub mod messages;
pub mod placement;
pub mod platform;
pub mod services;
pub mod state;

pub use config::{ConfigPaths, SkybarSettings};
pub use controller::{Collaborators, DisplayBackend, PanelController, PanelSurface};
pub use geometry::{panel_rect, DisplayInfo, ExtendedStrut, Point, Rect, PANEL_HEIGHT};
pub use messages::{
    BatteryReading, ExportedProperty, PropertyChange, ShellAnnouncement, ShellCommand, ShellEvent,
};
pub use placement::{
    CompositorShell, LegacyHints, PanelBehavior, PanelRole, PanelShell, PlacementError,
    PlacementStrategy, Stacking, SurfaceRole, WindowManagerHints,
};
pub use platform::DisplayProtocol;
pub use services::{ProcessLauncher, ServiceHub};
pub use state::{ActivityState, BatteryState, PanelProperties, SharedProperties};
