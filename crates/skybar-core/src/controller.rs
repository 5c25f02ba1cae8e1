//! The panel window controller.
//!
//! Owns the panel surface and the placement strategy, keeps the panel on the
//! primary display and turns [`ShellEvent`]s into placement updates and
//! [`PropertyChange`] notifications for the view.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::config::SkybarSettings;
use crate::geometry::{panel_rect, DisplayInfo, Rect};
use crate::messages::{BatteryReading, PropertyChange, ShellEvent};
use crate::placement::{PlacementStrategy, Stacking};
use crate::services::ProcessLauncher;
use crate::state::{ActivityState, BatteryState, PanelProperties, SharedProperties};

/// Display lookup and change subscriptions
pub trait DisplayBackend {
    /// Handle to a physical display
    type Output: Clone + PartialEq + fmt::Debug;
    /// Token returned by `subscribe`, handed back to `unsubscribe`
    type Subscription;

    /// Current primary display
    fn primary(&self) -> Option<Self::Output>;

    fn info(&self, output: &Self::Output) -> DisplayInfo;

    /// Start delivering geometry changes of `output` as [`ShellEvent::DisplayGeometryChanged`]
    fn subscribe(&mut self, output: &Self::Output) -> Self::Subscription;

    fn unsubscribe(&mut self, output: &Self::Output, subscription: Self::Subscription);
}

/// The panel's visual surface
pub trait PanelSurface {
    fn set_geometry(&mut self, rect: Rect);
}

/// Collaborators handed to the controller and exposed to the view
pub struct Collaborators {
    pub activity: ActivityState,
    pub battery: BatteryState,
    pub launcher: ProcessLauncher,
}

pub struct PanelController<D: DisplayBackend> {
    displays: D,
    output: D::Output,
    subscription: Option<D::Subscription>,
    surface: Box<dyn PanelSurface>,
    strategy: Box<dyn PlacementStrategy>,
    properties: SharedProperties,
    changes: async_channel::Sender<PropertyChange>,
    activity: ActivityState,
    battery: BatteryState,
    launcher: ProcessLauncher,
    /// Settings file contents as last seen
    settings: SkybarSettings,
    geometry: Rect,
}

impl<D: DisplayBackend> PanelController<D> {
    /// Place the panel on `output` and start following its changes
    pub fn new(
        displays: D,
        output: D::Output,
        surface: Box<dyn PanelSurface>,
        strategy: Box<dyn PlacementStrategy>,
        collaborators: Collaborators,
        settings: &SkybarSettings,
        changes: async_channel::Sender<PropertyChange>,
    ) -> Self {
        let properties = Arc::new(RwLock::new(PanelProperties {
            screen_rect: Rect::default(),
            twenty_four_time: settings.twenty_four_time,
            battery_percentage: collaborators.battery.show_percentage,
        }));

        info!("Placing panel using the {} protocol", strategy.protocol());

        let mut controller = Self {
            displays,
            output,
            subscription: None,
            surface,
            strategy,
            properties,
            changes,
            activity: collaborators.activity,
            battery: collaborators.battery,
            launcher: collaborators.launcher,
            settings: settings.clone(),
            geometry: Rect::default(),
        };

        controller.strategy.prepare();
        controller.update_geometry();
        controller.apply_stacking();
        controller.subscription = Some(controller.displays.subscribe(&controller.output));

        controller
    }

    /// React to an event from the display, the services or the control interface
    pub fn handle_event(&mut self, event: ShellEvent) {
        match event {
            ShellEvent::DisplayGeometryChanged => self.update_geometry(),

            ShellEvent::DisplayLayoutChanged => match self.displays.primary() {
                Some(primary) if primary != self.output => self.on_primary_display_changed(primary),
                Some(_) => self.update_geometry(),
                None => debug!("No display available, keeping the current placement"),
            },

            ShellEvent::SurfaceMapped => {
                self.strategy.on_surface_mapped();
                self.update_geometry();
                self.apply_stacking();
            }

            ShellEvent::ShellAnnounced(announcement) => {
                self.strategy.on_shell_announced(announcement);
            }

            ShellEvent::ActiveWindowChanged { class, title } => {
                self.set_active_window(&class, &title);
            }

            ShellEvent::BatteryChanged(reading) => self.set_battery_reading(reading),

            ShellEvent::SettingsReloaded(settings) => self.apply_settings(settings),

            ShellEvent::SetTwentyFourTime(enabled) => self.set_twenty_four_time(enabled),

            ShellEvent::SetBatteryPercentage(enabled) => {
                self.set_battery_percentage(enabled);
            }
        }
    }

    /// Apply the fields that changed in the settings file. Values set over the
    /// control interface survive reloads that leave their field untouched.
    fn apply_settings(&mut self, settings: SkybarSettings) {
        if settings.twenty_four_time != self.settings.twenty_four_time {
            self.set_twenty_four_time(settings.twenty_four_time);
        }
        if settings.battery_percentage != self.settings.battery_percentage {
            self.set_battery_percentage(settings.battery_percentage);
        }
        if self.activity.set_launcher_class(&settings.launcher_class) {
            self.on_launchpad_changed();
        }
        self.settings = settings;
    }

    /// Recompute the panel rectangle from the bound display and re-apply the reservation
    pub fn update_geometry(&mut self) {
        let info = self.displays.info(&self.output);

        let changed = {
            let mut properties = self.properties.write();
            let changed = properties.screen_rect != info.geometry;
            properties.screen_rect = info.geometry;
            changed
        };
        if changed {
            debug!("Screen geometry changed: {:?}", info.geometry);
            self.notify(PropertyChange::ScreenRectChanged(info.geometry));
        }

        let panel = panel_rect(info.geometry);
        self.geometry = panel;
        self.surface.set_geometry(panel);
        self.strategy.apply_placement(panel);
        self.strategy.apply_reservation(panel, &info);
    }

    /// Move the panel to a new primary display
    pub fn on_primary_display_changed(&mut self, output: D::Output) {
        if let Some(subscription) = self.subscription.take() {
            self.displays.unsubscribe(&self.output, subscription);
        }

        info!("Primary display changed to {:?}", output);
        self.output = output;
        self.update_geometry();

        self.subscription = Some(self.displays.subscribe(&self.output));
    }

    pub fn set_twenty_four_time(&mut self, enabled: bool) {
        let changed = {
            let mut properties = self.properties.write();
            let changed = properties.twenty_four_time != enabled;
            properties.twenty_four_time = enabled;
            changed
        };
        if changed {
            self.notify(PropertyChange::TwentyFourTimeChanged(enabled));
        }
    }

    /// Show or hide the battery percentage; returns true when it changed
    pub fn set_battery_percentage(&mut self, enabled: bool) -> bool {
        if self.battery.show_percentage == enabled {
            return false;
        }

        self.battery.show_percentage = enabled;
        self.properties.write().battery_percentage = enabled;
        self.notify(PropertyChange::BatteryChanged(self.battery));
        true
    }

    fn set_battery_reading(&mut self, reading: BatteryReading) {
        if self.battery.reading != reading {
            self.battery.reading = reading;
            self.notify(PropertyChange::BatteryChanged(self.battery));
        }
    }

    fn set_active_window(&mut self, class: &str, title: &str) {
        let update = self.activity.apply_active_window(class, title);

        if update.title_changed {
            self.notify(PropertyChange::ActiveWindowTitleChanged(self.activity.title().into()));
        }
        if update.launchpad_changed {
            self.on_launchpad_changed();
        }
    }

    fn on_launchpad_changed(&mut self) {
        let open = self.activity.launchpad();
        debug!("Launchpad {}", if open { "opened" } else { "closed" });
        self.notify(PropertyChange::LaunchpadChanged(open));
        self.apply_stacking();
    }

    /// Stay below the launchpad, above everything else
    fn apply_stacking(&mut self) {
        self.strategy.set_stacking(Stacking::for_launchpad(self.activity.launchpad()));
    }

    fn notify(&self, change: PropertyChange) {
        if let Err(e) = self.changes.try_send(change) {
            debug!("Dropping property change: {}", e);
        }
    }

    /// Current panel rectangle
    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    pub fn screen_rect(&self) -> Rect {
        self.properties.read().screen_rect
    }

    pub fn twenty_four_time(&self) -> bool {
        self.properties.read().twenty_four_time
    }

    pub fn properties(&self) -> SharedProperties {
        self.properties.clone()
    }

    pub fn activity(&self) -> &ActivityState {
        &self.activity
    }

    pub fn battery(&self) -> &BatteryState {
        &self.battery
    }

    pub fn launcher(&self) -> &ProcessLauncher {
        &self.launcher
    }

    pub fn output(&self) -> &D::Output {
        &self.output
    }

    /// Whether the panel is registered with the display server
    pub fn is_registered(&self) -> bool {
        self.strategy.is_registered()
    }
}

impl<D: DisplayBackend> Drop for PanelController<D> {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.displays.unsubscribe(&self.output, subscription);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use crate::geometry::PANEL_HEIGHT;
    use crate::messages::ShellAnnouncement;
    use crate::platform::DisplayProtocol;

    #[derive(Default)]
    struct Screens {
        infos: HashMap<u32, DisplayInfo>,
        primary: Option<u32>,
        subscriptions: Vec<(u32, usize)>,
        next_token: usize,
    }

    #[derive(Clone, Default)]
    struct FakeDisplays(Rc<RefCell<Screens>>);

    impl FakeDisplays {
        fn with(displays: &[(u32, Rect)], primary: u32) -> Self {
            let fake = Self::default();
            {
                let mut screens = fake.0.borrow_mut();
                for (id, rect) in displays {
                    screens.infos.insert(*id, DisplayInfo::new(*rect, *rect));
                }
                screens.primary = Some(primary);
            }
            fake
        }

        fn set_geometry(&self, id: u32, rect: Rect) {
            self.0.borrow_mut().infos.insert(id, DisplayInfo::new(rect, rect));
        }

        fn set_primary(&self, id: u32) {
            self.0.borrow_mut().primary = Some(id);
        }

        fn subscribed(&self) -> Vec<u32> {
            self.0.borrow().subscriptions.iter().map(|(id, _)| *id).collect()
        }
    }

    impl DisplayBackend for FakeDisplays {
        type Output = u32;
        type Subscription = usize;

        fn primary(&self) -> Option<u32> {
            self.0.borrow().primary
        }

        fn info(&self, output: &u32) -> DisplayInfo {
            self.0.borrow().infos.get(output).copied().unwrap_or_default()
        }

        fn subscribe(&mut self, output: &u32) -> usize {
            let mut screens = self.0.borrow_mut();
            screens.next_token += 1;
            let token = screens.next_token;
            screens.subscriptions.push((*output, token));
            token
        }

        fn unsubscribe(&mut self, output: &u32, subscription: usize) {
            self.0
                .borrow_mut()
                .subscriptions
                .retain(|entry| *entry != (*output, subscription));
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Prepare,
        Placement(Rect),
        Reservation(Rect, DisplayInfo),
        Stacking(Stacking),
        Announced(ShellAnnouncement),
        Mapped,
        Surface(Rect),
    }

    type Log = Rc<RefCell<Vec<Call>>>;

    struct FakeStrategy {
        log: Log,
    }

    impl PlacementStrategy for FakeStrategy {
        fn protocol(&self) -> DisplayProtocol {
            DisplayProtocol::Legacy
        }
        fn prepare(&mut self) {
            self.log.borrow_mut().push(Call::Prepare);
        }
        fn apply_placement(&mut self, panel: Rect) {
            self.log.borrow_mut().push(Call::Placement(panel));
        }
        fn apply_reservation(&mut self, panel: Rect, display: &DisplayInfo) {
            self.log.borrow_mut().push(Call::Reservation(panel, *display));
        }
        fn set_stacking(&mut self, stacking: Stacking) {
            self.log.borrow_mut().push(Call::Stacking(stacking));
        }
        fn on_surface_mapped(&mut self) {
            self.log.borrow_mut().push(Call::Mapped);
        }
        fn on_shell_announced(&mut self, announcement: ShellAnnouncement) {
            self.log.borrow_mut().push(Call::Announced(announcement));
        }
    }

    struct FakeSurface {
        log: Log,
    }

    impl PanelSurface for FakeSurface {
        fn set_geometry(&mut self, rect: Rect) {
            self.log.borrow_mut().push(Call::Surface(rect));
        }
    }

    const FULL_HD: Rect = Rect { x: 0, y: 0, width: 1920, height: 1080 };
    const QHD_RIGHT: Rect = Rect { x: 1920, y: 0, width: 2560, height: 1440 };

    struct Harness {
        controller: PanelController<FakeDisplays>,
        displays: FakeDisplays,
        log: Log,
        changes: async_channel::Receiver<PropertyChange>,
    }

    fn harness(displays: FakeDisplays, output: u32) -> Harness {
        let log = Log::default();
        let (tx, rx) = async_channel::unbounded();
        let (command_tx, _command_rx) = tokio::sync::mpsc::channel(4);

        let controller = PanelController::new(
            displays.clone(),
            output,
            Box::new(FakeSurface { log: log.clone() }),
            Box::new(FakeStrategy { log: log.clone() }),
            Collaborators {
                activity: ActivityState::new("skybar-launcher"),
                battery: BatteryState::new(false),
                launcher: ProcessLauncher::new(command_tx),
            },
            &SkybarSettings::default(),
            tx,
        );

        Harness {
            controller,
            displays,
            log,
            changes: rx,
        }
    }

    fn drain(rx: &async_channel::Receiver<PropertyChange>) -> Vec<PropertyChange> {
        std::iter::from_fn(|| rx.try_recv().ok()).collect()
    }

    #[test]
    fn test_construction_places_panel_and_subscribes() {
        let h = harness(FakeDisplays::with(&[(1, FULL_HD)], 1), 1);

        let panel = Rect::new(0, 0, 1920, 25);
        assert_eq!(
            *h.log.borrow(),
            vec![
                Call::Prepare,
                Call::Surface(panel),
                Call::Placement(panel),
                Call::Reservation(panel, DisplayInfo::new(FULL_HD, FULL_HD)),
                Call::Stacking(Stacking::Above),
            ]
        );
        assert_eq!(h.controller.geometry(), panel);
        assert_eq!(h.controller.screen_rect(), FULL_HD);
        assert_eq!(h.displays.subscribed(), vec![1]);
        assert_eq!(drain(&h.changes), vec![PropertyChange::ScreenRectChanged(FULL_HD)]);
    }

    #[test]
    fn test_unchanged_geometry_raises_no_notification() {
        let mut h = harness(FakeDisplays::with(&[(1, FULL_HD)], 1), 1);
        drain(&h.changes);

        h.controller.handle_event(ShellEvent::DisplayGeometryChanged);
        h.controller.update_geometry();

        assert!(drain(&h.changes).is_empty());
        assert_eq!(h.controller.geometry(), Rect::new(0, 0, 1920, 25));
    }

    #[test]
    fn test_geometry_change_updates_panel() {
        let mut h = harness(FakeDisplays::with(&[(1, FULL_HD)], 1), 1);
        drain(&h.changes);

        let resized = Rect::new(0, 0, 1280, 720);
        h.displays.set_geometry(1, resized);
        h.controller.handle_event(ShellEvent::DisplayGeometryChanged);

        assert_eq!(drain(&h.changes), vec![PropertyChange::ScreenRectChanged(resized)]);
        assert_eq!(h.controller.geometry(), Rect::new(0, 0, 1280, 25));
        assert!(h.log.borrow().contains(&Call::Surface(Rect::new(0, 0, 1280, 25))));
    }

    #[test]
    fn test_primary_change_rebinds_subscription() {
        let mut h = harness(FakeDisplays::with(&[(1, FULL_HD), (2, QHD_RIGHT)], 1), 1);
        h.log.borrow_mut().clear();

        h.displays.set_primary(2);
        h.controller.handle_event(ShellEvent::DisplayLayoutChanged);

        assert_eq!(*h.controller.output(), 2);
        assert_eq!(h.displays.subscribed(), vec![2]);
        assert_eq!(h.controller.geometry(), Rect::new(1920, 0, 2560, 25));
        assert!(h
            .log
            .borrow()
            .contains(&Call::Reservation(Rect::new(1920, 0, 2560, 25), DisplayInfo::new(QHD_RIGHT, QHD_RIGHT))));

        // Geometry changes on the old display no longer matter
        h.displays.set_geometry(1, Rect::new(0, 0, 800, 600));
        h.controller.handle_event(ShellEvent::DisplayGeometryChanged);
        assert_eq!(h.controller.geometry(), Rect::new(1920, 0, 2560, 25));
    }

    #[test]
    fn test_layout_change_without_new_primary_keeps_subscription() {
        let mut h = harness(FakeDisplays::with(&[(1, FULL_HD)], 1), 1);

        h.controller.handle_event(ShellEvent::DisplayLayoutChanged);
        h.controller.handle_event(ShellEvent::DisplayLayoutChanged);

        assert_eq!(h.displays.subscribed(), vec![1]);
    }

    #[test]
    fn test_launchpad_toggles_stacking_only() {
        let mut h = harness(FakeDisplays::with(&[(1, FULL_HD)], 1), 1);
        h.log.borrow_mut().clear();
        drain(&h.changes);

        h.controller.handle_event(ShellEvent::ActiveWindowChanged {
            class: "skybar-launcher".into(),
            title: "Launcher".into(),
        });
        assert_eq!(*h.log.borrow(), vec![Call::Stacking(Stacking::Below)]);
        assert_eq!(drain(&h.changes), vec![PropertyChange::LaunchpadChanged(true)]);

        h.log.borrow_mut().clear();
        h.controller.handle_event(ShellEvent::ActiveWindowChanged {
            class: "kitty".into(),
            title: "~".into(),
        });
        assert_eq!(*h.log.borrow(), vec![Call::Stacking(Stacking::Above)]);
    }

    #[test]
    fn test_twenty_four_time_notifies_on_change_only() {
        let mut h = harness(FakeDisplays::with(&[(1, FULL_HD)], 1), 1);
        drain(&h.changes);

        h.controller.handle_event(ShellEvent::SetTwentyFourTime(false));
        assert!(drain(&h.changes).is_empty());

        h.controller.handle_event(ShellEvent::SetTwentyFourTime(true));
        h.controller.handle_event(ShellEvent::SetTwentyFourTime(true));
        assert_eq!(drain(&h.changes), vec![PropertyChange::TwentyFourTimeChanged(true)]);
        assert!(h.controller.twenty_four_time());
        assert!(h.controller.properties().read().twenty_four_time);
    }

    #[test]
    fn test_settings_reload_applies_preferences() {
        let mut h = harness(FakeDisplays::with(&[(1, FULL_HD)], 1), 1);
        drain(&h.changes);

        let settings = SkybarSettings {
            twenty_four_time: true,
            battery_percentage: true,
            ..Default::default()
        };
        h.controller.handle_event(ShellEvent::SettingsReloaded(settings));

        assert!(h.controller.twenty_four_time());
        assert!(h.controller.battery().show_percentage);
        assert_eq!(drain(&h.changes).len(), 2);
    }

    #[test]
    fn test_settings_reload_keeps_untouched_runtime_values() {
        let mut h = harness(FakeDisplays::with(&[(1, FULL_HD)], 1), 1);
        h.controller.handle_event(ShellEvent::SetTwentyFourTime(true));
        drain(&h.changes);

        let settings = SkybarSettings {
            battery_percentage: true,
            ..Default::default()
        };
        h.controller.handle_event(ShellEvent::SettingsReloaded(settings));

        assert!(h.controller.twenty_four_time());
        assert!(h.controller.battery().show_percentage);
        assert_eq!(drain(&h.changes).len(), 1);
    }

    #[test]
    fn test_battery_reading_notifies_on_change() {
        let mut h = harness(FakeDisplays::with(&[(1, FULL_HD)], 1), 1);
        drain(&h.changes);

        let reading = BatteryReading {
            available: true,
            level: 64,
            charging: true,
        };
        h.controller.handle_event(ShellEvent::BatteryChanged(reading));
        h.controller.handle_event(ShellEvent::BatteryChanged(reading));

        let changes = drain(&h.changes);
        assert_eq!(changes.len(), 1);
        assert_eq!(h.controller.battery().reading, reading);
    }

    #[test]
    fn test_shell_announcement_reaches_strategy() {
        let mut h = harness(FakeDisplays::with(&[(1, FULL_HD)], 1), 1);
        h.log.borrow_mut().clear();

        let announcement = ShellAnnouncement::new("zwlr_layer_shell_v1");
        h.controller.handle_event(ShellEvent::ShellAnnounced(announcement.clone()));

        assert_eq!(*h.log.borrow(), vec![Call::Announced(announcement)]);
    }

    #[test]
    fn test_mapping_reapplies_hints_then_stacking() {
        let mut h = harness(FakeDisplays::with(&[(1, FULL_HD)], 1), 1);
        h.log.borrow_mut().clear();
        drain(&h.changes);

        h.controller.handle_event(ShellEvent::SurfaceMapped);

        let panel = Rect::new(0, 0, 1920, 25);
        assert_eq!(
            *h.log.borrow(),
            vec![
                Call::Mapped,
                Call::Surface(panel),
                Call::Placement(panel),
                Call::Reservation(panel, DisplayInfo::new(FULL_HD, FULL_HD)),
                Call::Stacking(Stacking::Above),
            ]
        );
        assert!(drain(&h.changes).is_empty());
    }

    #[test]
    fn test_first_screen_rect_sizes_bar_to_panel_height() {
        let h = harness(FakeDisplays::with(&[(1, FULL_HD)], 1), 1);
        let changes = drain(&h.changes);

        assert_eq!(changes, vec![PropertyChange::ScreenRectChanged(FULL_HD)]);
        assert_eq!(changes[0].panel_size(), Some((1920, PANEL_HEIGHT)));
        assert_eq!(h.controller.geometry().height, PANEL_HEIGHT);
    }

    #[test]
    fn test_drop_releases_subscription() {
        let h = harness(FakeDisplays::with(&[(1, FULL_HD)], 1), 1);
        let displays = h.displays.clone();
        drop(h);
        assert!(displays.subscribed().is_empty());
    }
}
