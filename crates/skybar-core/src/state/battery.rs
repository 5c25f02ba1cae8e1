use crate::messages::BatteryReading;

/// Battery status as shown by the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatteryState {
    pub reading: BatteryReading,
    pub show_percentage: bool,
}

impl BatteryState {
    pub fn new(show_percentage: bool) -> Self {
        Self {
            reading: BatteryReading::default(),
            show_percentage,
        }
    }

    pub fn available(&self) -> bool {
        self.reading.available
    }

    /// Text next to the indicator; `None` when there is no battery
    pub fn label(&self) -> Option<String> {
        if !self.reading.available {
            return None;
        }
        if self.show_percentage {
            Some(format!("{}%", self.reading.level))
        } else {
            Some(String::new())
        }
    }

    /// Freedesktop symbolic icon name for the current level
    pub fn icon_name(&self) -> &'static str {
        const LEVELS: [&str; 11] = [
            "battery-level-0-symbolic",
            "battery-level-10-symbolic",
            "battery-level-20-symbolic",
            "battery-level-30-symbolic",
            "battery-level-40-symbolic",
            "battery-level-50-symbolic",
            "battery-level-60-symbolic",
            "battery-level-70-symbolic",
            "battery-level-80-symbolic",
            "battery-level-90-symbolic",
            "battery-level-100-symbolic",
        ];
        const CHARGING: [&str; 11] = [
            "battery-level-0-charging-symbolic",
            "battery-level-10-charging-symbolic",
            "battery-level-20-charging-symbolic",
            "battery-level-30-charging-symbolic",
            "battery-level-40-charging-symbolic",
            "battery-level-50-charging-symbolic",
            "battery-level-60-charging-symbolic",
            "battery-level-70-charging-symbolic",
            "battery-level-80-charging-symbolic",
            "battery-level-90-charging-symbolic",
            "battery-level-100-charged-symbolic",
        ];

        if !self.reading.available {
            return "battery-missing-symbolic";
        }

        let step = (self.reading.level.min(100) as usize + 5) / 10;
        if self.reading.charging {
            CHARGING[step]
        } else {
            LEVELS[step]
        }
    }
}
