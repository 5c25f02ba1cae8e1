use chrono::NaiveTime;

/// Clock text for the panel
pub fn format_time(time: NaiveTime, twenty_four: bool) -> String {
    let pattern = if twenty_four { "%H:%M" } else { "%-I:%M %p" };
    time.format(pattern).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_twenty_four_hour_format() {
        assert_eq!(format_time(at(13, 5), true), "13:05");
        assert_eq!(format_time(at(0, 30), true), "00:30");
    }

    #[test]
    fn test_twelve_hour_format() {
        assert_eq!(format_time(at(13, 5), false), "1:05 PM");
        assert_eq!(format_time(at(0, 30), false), "12:30 AM");
        assert_eq!(format_time(at(9, 0), false), "9:00 AM");
    }
}
