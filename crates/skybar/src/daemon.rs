use std::sync::Arc;

use anyhow::Context;
use gtk4::prelude::*;
use gtk4::{gdk, Application};
use tracing::{error, info, warn};

use skybar_core::{
    ActivityState, BatteryState, Collaborators, ConfigPaths, DisplayBackend, DisplayProtocol, ExportedProperty,
    PanelController, PropertyChange, ServiceHub, ShellEvent, SkybarSettings,
};
use skybar_panel::{detect_protocol, load_css, placement_for, GdkDisplays, PanelView, PanelWindow};

use crate::dbus;

const APP_ID: &str = "org.skybar.Panel";

/// Run the panel until the GTK application quits
pub fn run() -> anyhow::Result<()> {
    info!("Initializing Skybar");

    let paths = ConfigPaths::new();
    let settings = SkybarSettings::load(&paths.settings);

    // Services start before GTK, so the session environment picks the tracker
    let services = Arc::new(ServiceHub::new(DisplayProtocol::detect(), paths.clone())?);
    let _guard = services.enter_runtime();

    let app = Application::builder()
        .application_id(APP_ID)
        .flags(gtk4::gio::ApplicationFlags::NON_UNIQUE)
        .build();

    app.connect_activate(move |app| {
        if let Err(e) = activate(app, &services, &paths, &settings) {
            error!("Failed to start the panel: {:#}", e);
            app.quit();
        }
    });

    // Arguments were handled by clap
    let exit_code = app.run_with_args::<&str>(&[]);

    info!("Skybar exiting");

    std::process::exit(exit_code.into());
}

fn activate(
    app: &Application,
    services: &Arc<ServiceHub>,
    paths: &ConfigPaths,
    settings: &SkybarSettings,
) -> anyhow::Result<()> {
    load_css();

    let display = gdk::Display::default().context("No display available")?;
    let protocol = detect_protocol(&display);
    info!("Display protocol: {}", protocol);

    let events = services.event_sender();
    let window = PanelWindow::new(app);
    let strategy = placement_for(protocol, &window, events.clone())?;

    let displays = GdkDisplays::new(display, events.clone());
    let output = displays.primary().context("No monitor to place the panel on")?;

    let (changes_tx, changes_rx) = async_channel::unbounded::<PropertyChange>();
    let collaborators = Collaborators {
        activity: ActivityState::new(settings.launcher_class.as_str()),
        battery: BatteryState::new(settings.battery_percentage),
        launcher: services.launcher(),
    };

    let mut controller = PanelController::new(
        displays,
        output,
        Box::new(window.clone()),
        strategy,
        collaborators,
        settings,
        changes_tx,
    );

    let view = PanelView::new(
        controller.launcher().clone(),
        settings.battery_command_parts(),
        controller.twenty_four_time(),
        *controller.battery(),
        controller.activity().title(),
    );
    window.set_child(Some(view.widget()));

    let (bus_tx, bus_rx) = async_channel::unbounded::<ExportedProperty>();
    let properties = controller.properties();
    let bus_events = events.clone();
    services.runtime().spawn(async move {
        if let Err(e) = dbus::serve(properties, bus_events, bus_rx).await {
            error!("D-Bus service error: {:#}", e);
        }
    });

    let event_rx = services.event_receiver();
    let settings_path = paths.settings.clone();
    let runtime = services.runtime().clone();
    glib::spawn_future_local(async move {
        while let Ok(event) = event_rx.recv().await {
            match event {
                ShellEvent::SetBatteryPercentage(enabled) => {
                    if controller.set_battery_percentage(enabled) {
                        let path = settings_path.clone();
                        runtime.spawn(async move {
                            if let Err(e) = SkybarSettings::store_battery_percentage(&path, enabled).await {
                                warn!("Failed to save settings: {:#}", e);
                            }
                        });
                    }
                }
                event => controller.handle_event(event),
            }
        }
    });

    glib::spawn_future_local(async move {
        while let Ok(change) = changes_rx.recv().await {
            view.apply(&change);

            if let Some(property) = change.exported() {
                let _ = bus_tx.try_send(property);
            }
        }
    });

    window.present();
    info!("Skybar activated");

    Ok(())
}
