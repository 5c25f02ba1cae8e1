use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "skybar-ctl")]
#[command(about = "Control utility for Skybar")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
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

#[zbus::proxy(
    interface = "org.skybar.Statusbar",
    default_service = "org.skybar.Statusbar",
    default_path = "/Statusbar"
)]
trait Statusbar {
    fn set_battery_percentage(&self, enabled: bool) -> zbus::Result<()>;

    fn set_twenty_four_time(&self, enabled: bool) -> zbus::Result<()>;

    #[zbus(property)]
    fn twenty_four_time(&self) -> zbus::Result<bool>;

    #[zbus(property)]
    fn screen_rect(&self) -> zbus::Result<(i32, i32, i32, i32)>;
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let connection = zbus::blocking::Connection::session()?;
    let proxy = StatusbarProxyBlocking::new(&connection)
        .map_err(|e| anyhow::anyhow!("Skybar is not running on the session bus: {}", e))?;

    match cli.command {
        Command::TwentyFourTime { state } => {
            proxy.set_twenty_four_time(matches!(state, Switch::On))?;
        }
        Command::BatteryPercentage { state } => {
            proxy.set_battery_percentage(matches!(state, Switch::On))?;
        }
        Command::Status => {
            let (x, y, width, height) = proxy.screen_rect()?;
            println!("twenty-four-time: {}", proxy.twenty_four_time()?);
            println!("screen: {}x{}+{}+{}", width, height, x, y);
        }
    }

    Ok(())
}
