mod daemon;
mod dbus;
mod ipc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

#[derive(Parser)]
#[command(name = "skybar")]
#[command(about = "Status panel for X11 and Wayland desktops")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the panel (default)
    Daemon,
    /// Switch the clock between 24-hour and 12-hour format
    TwentyFourTime {
        #[arg(value_enum)]
        state: Switch,
    },
    /// Show or hide the battery percentage
    BatteryPercentage {
        #[arg(value_enum)]
        state: Switch,
    },
    /// Show the state of the running panel
    Status,
}

#[derive(Clone, Copy, ValueEnum)]
enum Switch {
    On,
    Off,
}

impl Switch {
    fn enabled(self) -> bool {
        matches!(self, Switch::On)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("skybar=info".parse()?)
                .add_directive("skybar_core=info".parse()?)
                .add_directive("skybar_panel=info".parse()?)
                .add_directive("hyprland=warn".parse()?)
                .add_directive("zbus=warn".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Command::Daemon) | None => {
            info!("Starting Skybar");
            daemon::run()
        }
        Some(Command::TwentyFourTime { state }) => ipc::send_twenty_four_time(state.enabled()),
        Some(Command::BatteryPercentage { state }) => ipc::send_battery_percentage(state.enabled()),
        Some(Command::Status) => ipc::show_status(),
    }
}
