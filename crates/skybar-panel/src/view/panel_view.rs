use std::cell::Cell;
use std::rc::Rc;

use gtk4::pango::EllipsizeMode;
use gtk4::prelude::*;
use gtk4::{Box as GtkBox, Button, Image, Label, Orientation};
use tracing::debug;

use skybar_core::clock::format_time;
use skybar_core::{BatteryState, ProcessLauncher, PropertyChange};

/// Widgets of the bar: active window title, battery and clock
#[derive(Clone)]
pub struct PanelView {
    root: GtkBox,
    title: Label,
    battery_icon: Image,
    battery_label: Label,
    battery_button: Button,
    clock: Label,
    twenty_four: Rc<Cell<bool>>,
}

impl PanelView {
    /// Build the bar; clicking the battery runs `battery_command` when set
    pub fn new(
        launcher: ProcessLauncher,
        battery_command: Option<(String, Vec<String>)>,
        twenty_four_time: bool,
        battery: BatteryState,
        title: &str,
    ) -> Self {
        let root = GtkBox::new(Orientation::Horizontal, 0);
        root.add_css_class("skybar-bar");

        let title_label = Label::new(Some(title));
        title_label.add_css_class("skybar-title");
        title_label.set_ellipsize(EllipsizeMode::End);
        title_label.set_xalign(0.0);
        title_label.set_hexpand(true);
        root.append(&title_label);

        let battery_box = GtkBox::new(Orientation::Horizontal, 4);
        let battery_icon = Image::new();
        let battery_label = Label::new(None);
        battery_box.append(&battery_icon);
        battery_box.append(&battery_label);

        let battery_button = Button::new();
        battery_button.add_css_class("skybar-battery");
        battery_button.set_focusable(false);
        battery_button.set_child(Some(&battery_box));
        battery_button.connect_clicked(move |_| match &battery_command {
            Some((exec, args)) => {
                launcher.start_detached(exec, args);
            }
            None => debug!("No battery command configured"),
        });
        root.append(&battery_button);

        let clock = Label::new(None);
        clock.add_css_class("skybar-clock");
        root.append(&clock);

        let view = Self {
            root,
            title: title_label,
            battery_icon,
            battery_label,
            battery_button,
            clock,
            twenty_four: Rc::new(Cell::new(twenty_four_time)),
        };

        view.set_battery(battery);
        view.tick();
        view.start_clock();
        view
    }

    pub fn widget(&self) -> &GtkBox {
        &self.root
    }

    /// Reflect a controller property change
    pub fn apply(&self, change: &PropertyChange) {
        match change {
            PropertyChange::ScreenRectChanged(_) => {
                if let Some((width, height)) = change.panel_size() {
                    self.root.set_size_request(width, height);
                }
            }
            PropertyChange::TwentyFourTimeChanged(enabled) => {
                self.twenty_four.set(*enabled);
                self.tick();
            }
            PropertyChange::ActiveWindowTitleChanged(title) => {
                self.title.set_label(title);
            }
            PropertyChange::LaunchpadChanged(open) => {
                debug!("Launchpad open: {}", open);
            }
            PropertyChange::BatteryChanged(battery) => self.set_battery(*battery),
        }
    }

    fn set_battery(&self, battery: BatteryState) {
        self.battery_button.set_visible(battery.available());
        self.battery_icon.set_icon_name(Some(battery.icon_name()));

        match battery.label() {
            Some(label) => {
                self.battery_label.set_label(&label);
                self.battery_label.set_visible(!label.is_empty());
            }
            None => self.battery_label.set_visible(false),
        }
    }

    /// Redraw the clock with the current local time
    pub fn tick(&self) {
        let now = chrono::Local::now().time();
        self.clock.set_label(&format_time(now, self.twenty_four.get()));
    }

    fn start_clock(&self) {
        let view = self.clone();
        glib::timeout_add_seconds_local(1, move || {
            view.tick();
            glib::ControlFlow::Continue
        });
    }
}
