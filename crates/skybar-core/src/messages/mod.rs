mod commands;
mod events;
mod properties;

pub use commands::ShellCommand;
pub use events::{BatteryReading, ShellAnnouncement, ShellEvent};
pub use properties::{ExportedProperty, PropertyChange};
