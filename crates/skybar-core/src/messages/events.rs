use compact_str::CompactString;

use crate::config::SkybarSettings;

/// Events the panel controller reacts to, delivered on the GTK main loop
#[derive(Debug, Clone, PartialEq)]
pub enum ShellEvent {
    // =========== Display Events ===========

    /// Geometry of the bound display changed
    DisplayGeometryChanged,

    /// Displays were added or removed; the primary display or the
    /// virtual geometry may have changed
    DisplayLayoutChanged,

    /// The panel window was mapped by the display server
    SurfaceMapped,

    // =========== Compositor Events ===========

    /// The compositor announced its panel shell service
    ShellAnnounced(ShellAnnouncement),

    // =========== Activity Events ===========

    /// The focused window changed
    ActiveWindowChanged {
        class: CompactString,
        title: CompactString,
    },

    // =========== Battery Events ===========

    /// Battery status changed
    BatteryChanged(BatteryReading),

    // =========== Configuration Events ===========

    /// settings.json was reloaded
    SettingsReloaded(SkybarSettings),

    // =========== Control Events ===========

    /// Switch the clock between 24-hour and 12-hour format
    SetTwentyFourTime(bool),

    /// Show or hide the battery percentage
    SetBatteryPercentage(bool),
}

/// Announcement of a panel shell global by the compositor registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellAnnouncement {
    pub interface: CompactString,
}

impl ShellAnnouncement {
    pub fn new(interface: impl Into<CompactString>) -> Self {
        Self {
            interface: interface.into(),
        }
    }
}

/// A single battery sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatteryReading {
    pub available: bool,
    pub level: u8,
    pub charging: bool,
}
