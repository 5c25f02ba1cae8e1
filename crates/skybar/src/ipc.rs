use crate::dbus::StatusbarProxyBlocking;

fn proxy() -> anyhow::Result<StatusbarProxyBlocking<'static>> {
    let connection = zbus::blocking::Connection::session()?;
    StatusbarProxyBlocking::new(&connection).map_err(|e| {
        anyhow::anyhow!("Skybar is not running on the session bus: {}", e)
    })
}

/// Toggle the 24-hour clock of the running panel
pub fn send_twenty_four_time(enabled: bool) -> anyhow::Result<()> {
    proxy()?.set_twenty_four_time(enabled)?;
    println!("twenty-four-time {}", on_off(enabled));
    Ok(())
}

/// Toggle the battery percentage of the running panel
pub fn send_battery_percentage(enabled: bool) -> anyhow::Result<()> {
    proxy()?.set_battery_percentage(enabled)?;
    println!("battery-percentage {}", on_off(enabled));
    Ok(())
}

/// Print the panel's exported properties
pub fn show_status() -> anyhow::Result<()> {
    let proxy = proxy()?;
    let (x, y, width, height) = proxy.screen_rect()?;
    println!("twenty-four-time: {}", on_off(proxy.twenty_four_time()?));
    println!("screen: {}x{}+{}+{}", width, height, x, y);
    Ok(())
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}
