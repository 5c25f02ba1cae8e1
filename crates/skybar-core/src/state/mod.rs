mod activity;
mod battery;
mod properties;

pub use activity::{ActivityState, ActivityUpdate};
pub use battery::BatteryState;
pub use properties::{PanelProperties, SharedProperties};
