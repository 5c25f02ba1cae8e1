use std::fmt;

/// Display server protocol the session runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayProtocol {
    /// X11 with an EWMH window manager
    Legacy,
    /// Wayland compositor
    Compositor,
}

impl DisplayProtocol {
    /// Detect the protocol from the session environment
    pub fn detect() -> Self {
        Self::from_env(
            std::env::var("XDG_SESSION_TYPE").ok().as_deref(),
            std::env::var("WAYLAND_DISPLAY").ok().as_deref(),
        )
    }

    fn from_env(session_type: Option<&str>, wayland_display: Option<&str>) -> Self {
        match session_type.map(str::to_ascii_lowercase).as_deref() {
            Some("wayland") => Self::Compositor,
            Some("x11") => Self::Legacy,
            _ if wayland_display.is_some_and(|d| !d.is_empty()) => Self::Compositor,
            _ => Self::Legacy,
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy)
    }

    pub fn is_compositor(&self) -> bool {
        matches!(self, Self::Compositor)
    }
}

impl fmt::Display for DisplayProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => write!(f, "x11"),
            Self::Compositor => write!(f, "wayland"),
        }
    }
}
