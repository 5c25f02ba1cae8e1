use x11rb::errors::{ConnectError, ConnectionError, ReplyError};

/// Errors setting up a platform backend
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("failed to connect to the X server: {0}")]
    Connect(#[from] ConnectError),

    #[error("X11 connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("X11 request failed: {0}")]
    Reply(#[from] ReplyError),

    #[error("panel window has no X11 surface")]
    NoSurface,
}
