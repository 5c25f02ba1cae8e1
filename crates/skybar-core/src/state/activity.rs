use compact_str::CompactString;

/// Focused-window state and the launchpad flag derived from it
#[derive(Debug, Clone, Default)]
pub struct ActivityState {
    launcher_class: CompactString,
    class: CompactString,
    title: CompactString,
    launchpad: bool,
}

/// What changed after applying an active-window event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActivityUpdate {
    pub title_changed: bool,
    pub launchpad_changed: bool,
}

impl ActivityState {
    pub fn new(launcher_class: impl Into<CompactString>) -> Self {
        Self {
            launcher_class: launcher_class.into(),
            ..Default::default()
        }
    }

    /// Whether the launchpad is the active window
    pub fn launchpad(&self) -> bool {
        self.launchpad
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    /// Record a new active window
    pub fn apply_active_window(&mut self, class: &str, title: &str) -> ActivityUpdate {
        let launchpad = self.is_launcher(class);
        // The launchpad is fullscreen; keep showing the previous title underneath it
        let title: CompactString = if launchpad {
            self.title.clone()
        } else {
            title.into()
        };

        let update = ActivityUpdate {
            title_changed: self.title != title,
            launchpad_changed: self.launchpad != launchpad,
        };

        self.title = title;
        self.class = class.into();
        self.launchpad = launchpad;

        update
    }

    /// Change the launcher class; returns true when the launchpad flag flipped
    pub fn set_launcher_class(&mut self, launcher_class: &str) -> bool {
        self.launcher_class = launcher_class.into();
        let launchpad = self.is_launcher(&self.class);
        let changed = launchpad != self.launchpad;
        self.launchpad = launchpad;
        changed
    }

    fn is_launcher(&self, class: &str) -> bool {
        !class.is_empty() && class.eq_ignore_ascii_case(&self.launcher_class)
    }
}
