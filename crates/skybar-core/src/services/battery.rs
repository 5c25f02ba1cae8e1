use std::path::{Path, PathBuf};
use std::time::Duration;

use async_channel::Sender;
use tracing::{debug, info};

use crate::messages::{BatteryReading, ShellEvent};

const POWER_SUPPLY_DIR: &str = "/sys/class/power_supply";
const POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Service that polls the kernel power supply class for the battery level
pub struct BatteryService {
    root: PathBuf,
    event_tx: Sender<ShellEvent>,
}

impl BatteryService {
    pub fn new(event_tx: Sender<ShellEvent>) -> Self {
        Self::with_root(POWER_SUPPLY_DIR, event_tx)
    }

    pub fn with_root(root: impl Into<PathBuf>, event_tx: Sender<ShellEvent>) -> Self {
        Self {
            root: root.into(),
            event_tx,
        }
    }

    /// Poll until the event receiver is gone
    pub async fn run(self) -> anyhow::Result<()> {
        info!("Starting battery service");

        let mut last: Option<BatteryReading> = None;
        let mut interval = tokio::time::interval(POLL_INTERVAL);

        loop {
            interval.tick().await;

            let reading = read_battery(&self.root);
            if last == Some(reading) {
                continue;
            }

            debug!("Battery: {:?}", reading);
            last = Some(reading);
            if self.event_tx.send(ShellEvent::BatteryChanged(reading)).await.is_err() {
                return Ok(());
            }
        }
    }
}

/// Read the first battery under `root`; unavailable when there is none
pub fn read_battery(root: &Path) -> BatteryReading {
    let Ok(entries) = std::fs::read_dir(root) else {
        return BatteryReading::default();
    };

    let mut supplies: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
    supplies.sort();

    supplies
        .iter()
        .find(|path| read_attr(path, "type").as_deref() == Some("Battery"))
        .and_then(|path| {
            let level = read_attr(path, "capacity")?.parse::<u8>().ok()?.min(100);
            let status = read_attr(path, "status").unwrap_or_default();
            Some(BatteryReading {
                available: true,
                level,
                charging: matches!(status.as_str(), "Charging" | "Full"),
            })
        })
        .unwrap_or_default()
}

fn read_attr(supply: &Path, name: &str) -> Option<String> {
    std::fs::read_to_string(supply.join(name))
        .ok()
        .map(|s| s.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supply(root: &Path, name: &str, attrs: &[(&str, &str)]) {
        let dir = root.join(name);
        std::fs::create_dir_all(&dir).unwrap();
        for (attr, value) in attrs {
            std::fs::write(dir.join(attr), format!("{}\n", value)).unwrap();
        }
    }

    #[test]
    fn test_reads_first_battery() {
        let root = tempfile::tempdir().unwrap();
        supply(root.path(), "AC", &[("type", "Mains"), ("online", "1")]);
        supply(root.path(), "BAT0", &[("type", "Battery"), ("capacity", "57"), ("status", "Discharging")]);
        supply(root.path(), "BAT1", &[("type", "Battery"), ("capacity", "90"), ("status", "Charging")]);

        let reading = read_battery(root.path());
        assert_eq!(
            reading,
            BatteryReading {
                available: true,
                level: 57,
                charging: false,
            }
        );
    }

    #[test]
    fn test_full_counts_as_charging() {
        let root = tempfile::tempdir().unwrap();
        supply(root.path(), "BAT0", &[("type", "Battery"), ("capacity", "100"), ("status", "Full")]);

        let reading = read_battery(root.path());
        assert!(reading.charging);
        assert_eq!(reading.level, 100);
    }

    #[test]
    fn test_no_battery() {
        let root = tempfile::tempdir().unwrap();
        supply(root.path(), "AC", &[("type", "Mains")]);
        assert!(!read_battery(root.path()).available);
        assert!(!read_battery(&root.path().join("missing")).available);
    }

    #[test]
    fn test_unreadable_capacity_is_unavailable() {
        let root = tempfile::tempdir().unwrap();
        supply(root.path(), "BAT0", &[("type", "Battery"), ("capacity", "n/a")]);
        assert!(!read_battery(root.path()).available);
    }
}
