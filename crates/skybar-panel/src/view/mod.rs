mod panel_view;
mod theme;

pub use panel_view::PanelView;
pub use theme::{load_css, PANEL_CSS};
