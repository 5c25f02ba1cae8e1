use gtk4::prelude::*;
use gtk4::{Application, ApplicationWindow};

use skybar_core::{PanelSurface, Rect};

/// The panel's top-level window: frameless, transparent, never focused
#[derive(Clone)]
pub struct PanelWindow {
    window: ApplicationWindow,
}

impl PanelWindow {
    pub fn new(app: &Application) -> Self {
        let window = ApplicationWindow::builder()
            .application(app)
            .title("Skybar")
            .decorated(false)
            .resizable(false)
            .focusable(false)
            .build();

        // Background comes from the CSS theme
        window.add_css_class("skybar");

        Self { window }
    }

    /// Get the underlying GTK window
    pub fn window(&self) -> &ApplicationWindow {
        &self.window
    }

    pub fn set_child(&self, child: Option<&impl IsA<gtk4::Widget>>) {
        self.window.set_child(child);
    }

    pub fn present(&self) {
        self.window.present();
    }
}

impl PanelSurface for PanelWindow {
    fn set_geometry(&mut self, rect: Rect) {
        self.window.set_default_size(rect.width, rect.height);
        self.window.set_size_request(rect.width, rect.height);
    }
}
