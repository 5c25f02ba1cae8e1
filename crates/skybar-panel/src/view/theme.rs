use gtk4::gdk::Display;
use gtk4::CssProvider;
use tracing::debug;

/// Panel stylesheet
pub const PANEL_CSS: &str = r#"
window.skybar {
    background-color: transparent;
}

.skybar-bar {
    background-color: rgba(20, 20, 24, 0.72);
    color: #e8e8ec;
    font-size: 12px;
    min-height: 25px;
}

.skybar-title {
    padding: 0 10px;
    font-weight: bold;
}

.skybar-battery {
    padding: 0 6px;
    min-height: 0;
    border: none;
    border-radius: 0;
    background: none;
    color: inherit;
}

.skybar-battery:hover {
    background-color: rgba(255, 255, 255, 0.1);
}

.skybar-clock {
    padding: 0 10px;
}
"#;

/// Install the panel stylesheet on the default display
pub fn load_css() {
    let provider = CssProvider::new();
    provider.load_from_data(PANEL_CSS);

    if let Some(display) = Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
        debug!("Panel stylesheet loaded");
    }
}
