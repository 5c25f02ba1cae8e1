mod activity;
mod battery;
mod config_watcher;
mod display_watcher;
mod hub;
mod process;

pub use activity::ActivityTracker;
pub use battery::{read_battery, BatteryService};
pub use config_watcher::ConfigWatcher;
pub use display_watcher::DisplayWatcher;
pub use hub::ServiceHub;
pub use process::{ProcessLauncher, ProcessService};
