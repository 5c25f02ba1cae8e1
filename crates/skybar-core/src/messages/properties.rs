use compact_str::CompactString;

use crate::geometry::{panel_rect, Rect};
use crate::state::BatteryState;

/// Property change notifications FROM the controller TO the panel view
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyChange {
    /// Geometry of the bound display changed
    ScreenRectChanged(Rect),

    /// Clock format changed
    TwentyFourTimeChanged(bool),

    /// Title of the focused window changed
    ActiveWindowTitleChanged(CompactString),

    /// Launchpad opened or closed
    LaunchpadChanged(bool),

    /// Battery level, charging state or percentage visibility changed
    BatteryChanged(BatteryState),
}

/// Properties readable over the control interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportedProperty {
    TwentyFourTime,
    ScreenRect,
}

impl PropertyChange {
    /// Size of the bar for a new display geometry. The height never follows the display.
    pub fn panel_size(&self) -> Option<(i32, i32)> {
        match self {
            Self::ScreenRectChanged(display) => {
                let panel = panel_rect(*display);
                Some((panel.width, panel.height))
            }
            _ => None,
        }
    }

    /// Exported property whose value this change alters
    pub fn exported(&self) -> Option<ExportedProperty> {
        match self {
            Self::TwentyFourTimeChanged(_) => Some(ExportedProperty::TwentyFourTime),
            Self::ScreenRectChanged(_) => Some(ExportedProperty::ScreenRect),
            _ => None,
        }
    }
}
