//! Built-in stylesheet and user CSS loading.

use gtk4::gdk;
use log::{debug, info, warn};
use std::fs;
use std::io;
use std::path::Path;

pub(crate) const DEFAULT_CSS: &str = r#"
window.panel,
window.launcher,
window.indicators-menu {
    background-color: rgba(30, 30, 30, 0.95);
    color: #eeeeec;
}

window.grab,
window.grab.background {
    background-color: transparent;
    background: none;
}

window.curtain {
    background-color: #000000;
}

.background-fill {
    background-color: SteelBlue;
}

.panel-button {
    background: none;
    border: none;
    box-shadow: none;
    padding: 8px;
    border-radius: 6px;
}

.panel-button:hover,
.indicators.prelight {
    background-color: rgba(255, 255, 255, 0.12);
}

.indicators {
    padding: 8px 0;
}

.clock-label {
    font-weight: bold;
}

.launcher-grid {
    padding: 24px;
}

.app-button {
    background: none;
    border: none;
    border-radius: 8px;
    padding: 12px;
}

.app-button:hover {
    background-color: rgba(255, 255, 255, 0.12);
}

.indicators-menu-box {
    padding: 16px;
}

.menu-weekday {
    font-size: 1.4em;
}

.menu-date {
    opacity: 0.7;
}

.volume-scale {
    min-width: 160px;
}
"#;

/// Install the built-in sheet on `display`, then the user's sheet from
/// `css_path` above it.  User rules override the built-in ones
/// selector by selector instead of replacing the whole sheet.
pub(crate) fn load_css(display: &gdk::Display, css_path: Option<&Path>) {
    add_provider(display, DEFAULT_CSS, gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION);
    match css_path.map(user_css) {
        Some(Ok(Some(css))) => {
            add_provider(display, &css, gtk4::STYLE_PROVIDER_PRIORITY_USER);
        }
        Some(Ok(None)) | None => debug!("no user CSS"),
        Some(Err(e)) => warn!("user CSS not applied: {}", e),
    }
}

fn add_provider(display: &gdk::Display, css: &str, priority: u32) {
    let provider = gtk4::CssProvider::new();
    #[allow(deprecated)]
    provider.load_from_data(css);
    gtk4::style_context_add_provider_for_display(display, &provider, priority);
}

/// Contents of the user stylesheet, `None` if there is none or it is
/// blank.
fn user_css(path: &Path) -> io::Result<Option<String>> {
    let css = match fs::read_to_string(path) {
        Ok(css) => css,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    if css.trim().is_empty() {
        return Ok(None);
    }
    info!("user CSS: {} ({} bytes)", path.display(), css.len());
    Ok(Some(css))
}
