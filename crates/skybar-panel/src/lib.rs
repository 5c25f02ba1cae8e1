pub mod backend;
pub mod display;
pub mod error;
pub mod view;
pub mod window;

pub use backend::{placement_for, LayerPanel, LayerShellBackend, X11Hints};
pub use display::{detect_protocol, GdkDisplays};
pub use error::BackendError;
pub use view::{load_css, PanelView, PANEL_CSS};
pub use window::PanelWindow;
