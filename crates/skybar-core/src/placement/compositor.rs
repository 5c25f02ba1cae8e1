use tracing::{debug, info, warn};

use super::{PanelBehavior, PlacementError, PlacementStrategy, Stacking, SurfaceRole};
use crate::geometry::{DisplayInfo, Point, Rect};
use crate::messages::ShellAnnouncement;
use crate::platform::DisplayProtocol;

/// Compositor connection and panel shell registry
pub trait PanelShell {
    type Panel: PanelRole;

    /// Look up the connection and set up the registry. The shell service is
    /// announced later through [`PlacementStrategy::on_shell_announced`].
    fn connect(&mut self) -> Result<(), PlacementError>;

    /// Bind the announced service, wrap the panel window and create its shell surface
    fn create_panel(&mut self, announcement: &ShellAnnouncement) -> Result<Self::Panel, PlacementError>;
}

/// A panel shell surface
pub trait PanelRole {
    fn set_role(&mut self, role: SurfaceRole);
    fn set_panel_behavior(&mut self, behavior: PanelBehavior);
    fn set_skip_taskbar(&mut self, skip: bool);
    fn set_skip_switcher(&mut self, skip: bool);
    fn set_takes_focus(&mut self, takes_focus: bool);
    fn set_position(&mut self, position: Point);
    fn set_stacking(&mut self, stacking: Stacking);
}

/// Placement through a compositor panel shell (Wayland)
pub struct CompositorShell<P: PanelShell> {
    shell: P,
    connected: bool,
    panel: Option<P::Panel>,
    position: Option<Point>,
    stacking: Stacking,
}

impl<P: PanelShell> CompositorShell<P> {
    pub fn new(shell: P) -> Self {
        Self {
            shell,
            connected: false,
            panel: None,
            position: None,
            stacking: Stacking::default(),
        }
    }

    pub fn panel(&self) -> Option<&P::Panel> {
        self.panel.as_ref()
    }

    /// Re-assert the panel behavior and move it to the window's top-left corner
    fn update_panel(&mut self) {
        let Some(panel) = self.panel.as_mut() else {
            return;
        };

        panel.set_panel_behavior(PanelBehavior::WindowsGoBelow);
        if let Some(position) = self.position {
            panel.set_position(position);
        }
    }
}

impl<P: PanelShell> PlacementStrategy for CompositorShell<P> {
    fn protocol(&self) -> DisplayProtocol {
        DisplayProtocol::Compositor
    }

    fn prepare(&mut self) {
        match self.shell.connect() {
            Ok(()) => {
                self.connected = true;
                debug!("Waiting for the compositor to announce its panel shell");
            }
            Err(e) => warn!("Panel shell registration aborted: {}", e),
        }
    }

    fn apply_placement(&mut self, panel: Rect) {
        self.position = Some(panel.top_left());
    }

    fn apply_reservation(&mut self, panel: Rect, _display: &DisplayInfo) {
        self.position = Some(panel.top_left());
        self.update_panel();
    }

    fn set_stacking(&mut self, stacking: Stacking) {
        self.stacking = stacking;
        if let Some(panel) = self.panel.as_mut() {
            panel.set_stacking(stacking);
        }
    }

    fn on_shell_announced(&mut self, announcement: ShellAnnouncement) {
        if !self.connected || self.panel.is_some() {
            debug!("Ignoring panel shell announcement: {}", announcement.interface);
            return;
        }

        let mut panel = match self.shell.create_panel(&announcement) {
            Ok(panel) => panel,
            Err(e) => {
                warn!("Panel shell registration aborted: {}", e);
                return;
            }
        };

        panel.set_role(SurfaceRole::Panel);
        panel.set_panel_behavior(PanelBehavior::WindowsGoBelow);
        panel.set_skip_taskbar(true);
        panel.set_skip_switcher(true);
        panel.set_takes_focus(false);
        panel.set_stacking(self.stacking);

        info!("Registered panel with {}", announcement.interface);
        self.panel = Some(panel);
        self.update_panel();
    }

    fn is_registered(&self) -> bool {
        self.panel.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Role(SurfaceRole),
        Behavior(PanelBehavior),
        SkipTaskbar(bool),
        SkipSwitcher(bool),
        TakesFocus(bool),
        Position(Point),
        Stacking(Stacking),
    }

    type Log = Rc<RefCell<Vec<Call>>>;

    struct FakePanel {
        log: Log,
    }

    impl PanelRole for FakePanel {
        fn set_role(&mut self, role: SurfaceRole) {
            self.log.borrow_mut().push(Call::Role(role));
        }
        fn set_panel_behavior(&mut self, behavior: PanelBehavior) {
            self.log.borrow_mut().push(Call::Behavior(behavior));
        }
        fn set_skip_taskbar(&mut self, skip: bool) {
            self.log.borrow_mut().push(Call::SkipTaskbar(skip));
        }
        fn set_skip_switcher(&mut self, skip: bool) {
            self.log.borrow_mut().push(Call::SkipSwitcher(skip));
        }
        fn set_takes_focus(&mut self, takes_focus: bool) {
            self.log.borrow_mut().push(Call::TakesFocus(takes_focus));
        }
        fn set_position(&mut self, position: Point) {
            self.log.borrow_mut().push(Call::Position(position));
        }
        fn set_stacking(&mut self, stacking: Stacking) {
            self.log.borrow_mut().push(Call::Stacking(stacking));
        }
    }

    #[derive(Default)]
    struct FakeShell {
        log: Log,
        no_connection: bool,
        no_surface: bool,
        created: usize,
    }

    impl PanelShell for FakeShell {
        type Panel = FakePanel;

        fn connect(&mut self) -> Result<(), PlacementError> {
            if self.no_connection {
                Err(PlacementError::NoConnection)
            } else {
                Ok(())
            }
        }

        fn create_panel(&mut self, _: &ShellAnnouncement) -> Result<FakePanel, PlacementError> {
            if self.no_surface {
                return Err(PlacementError::NoProtocolSurface);
            }
            self.created += 1;
            Ok(FakePanel { log: self.log.clone() })
        }
    }

    fn announcement() -> ShellAnnouncement {
        ShellAnnouncement::new("zwlr_layer_shell_v1")
    }

    fn display() -> (Rect, DisplayInfo) {
        let geometry = Rect::new(0, 0, 1920, 1080);
        (Rect::new(0, 0, 1920, 25), DisplayInfo::new(geometry, geometry))
    }

    #[test]
    fn test_repositioning_without_announcement_is_noop() {
        let log = Log::default();
        let mut shell = CompositorShell::new(FakeShell {
            log: log.clone(),
            ..Default::default()
        });
        shell.prepare();

        let (panel, info) = display();
        shell.apply_placement(panel);
        shell.apply_reservation(panel, &info);
        shell.set_stacking(Stacking::Below);

        assert!(!shell.is_registered());
        assert!(shell.panel().is_none());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_announcement_configures_panel() {
        let log = Log::default();
        let mut shell = CompositorShell::new(FakeShell {
            log: log.clone(),
            ..Default::default()
        });
        shell.prepare();

        let (panel, info) = display();
        shell.apply_placement(panel);
        shell.apply_reservation(panel, &info);
        shell.on_shell_announced(announcement());

        assert!(shell.is_registered());
        assert_eq!(
            *log.borrow(),
            vec![
                Call::Role(SurfaceRole::Panel),
                Call::Behavior(PanelBehavior::WindowsGoBelow),
                Call::SkipTaskbar(true),
                Call::SkipSwitcher(true),
                Call::TakesFocus(false),
                Call::Stacking(Stacking::Above),
                Call::Behavior(PanelBehavior::WindowsGoBelow),
                Call::Position(Point::new(0, 0)),
            ]
        );
    }

    #[test]
    fn test_reservation_moves_registered_panel() {
        let log = Log::default();
        let mut shell = CompositorShell::new(FakeShell {
            log: log.clone(),
            ..Default::default()
        });
        shell.prepare();
        shell.on_shell_announced(announcement());
        log.borrow_mut().clear();

        let geometry = Rect::new(1920, 0, 2560, 1440);
        let panel = Rect::new(1920, 0, 2560, 25);
        shell.apply_placement(panel);
        shell.apply_reservation(panel, &DisplayInfo::new(geometry, geometry));

        assert_eq!(
            *log.borrow(),
            vec![
                Call::Behavior(PanelBehavior::WindowsGoBelow),
                Call::Position(Point::new(1920, 0)),
            ]
        );
    }

    #[test]
    fn test_failed_connection_ignores_announcement() {
        let log = Log::default();
        let mut shell = CompositorShell::new(FakeShell {
            log: log.clone(),
            no_connection: true,
            ..Default::default()
        });
        shell.prepare();
        shell.on_shell_announced(announcement());

        assert!(!shell.is_registered());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_missing_surface_aborts_without_retry() {
        let mut shell = CompositorShell::new(FakeShell {
            no_surface: true,
            ..Default::default()
        });
        shell.prepare();
        shell.on_shell_announced(announcement());
        assert!(!shell.is_registered());

        let (panel, info) = display();
        shell.apply_reservation(panel, &info);
        assert!(!shell.is_registered());
    }

    #[test]
    fn test_second_announcement_is_ignored() {
        let mut shell = CompositorShell::new(FakeShell::default());
        shell.prepare();
        shell.on_shell_announced(announcement());
        shell.on_shell_announced(announcement());
        assert_eq!(shell.shell.created, 1);
    }

    #[test]
    fn test_stacking_reaches_registered_panel() {
        let log = Log::default();
        let mut shell = CompositorShell::new(FakeShell {
            log: log.clone(),
            ..Default::default()
        });
        shell.prepare();
        shell.set_stacking(Stacking::Below);
        shell.on_shell_announced(announcement());
        assert!(log.borrow().contains(&Call::Stacking(Stacking::Below)));

        log.borrow_mut().clear();
        shell.set_stacking(Stacking::Above);
        assert_eq!(*log.borrow(), vec![Call::Stacking(Stacking::Above)]);
    }
}
