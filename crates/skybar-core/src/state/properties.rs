use std::sync::Arc;

use parking_lot::RwLock;

use crate::geometry::Rect;

/// Properties the panel exposes to its UI and to the control service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelProperties {
    pub screen_rect: Rect,
    pub twenty_four_time: bool,
    pub battery_percentage: bool,
}

/// Read-mostly snapshot shared with the async side
pub type SharedProperties = Arc<RwLock<PanelProperties>>;
