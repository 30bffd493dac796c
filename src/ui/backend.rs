//! [`ShellBackend`] over one layer-shell window per surface role.

use crate::surface::{Size, SurfaceRole};
use crate::traits::ShellBackend;
use gtk4::prelude::*;
use gtk4_layer_shell::{Edge, KeyboardMode, Layer, LayerShell};
use log::{debug, info};
use std::collections::HashMap;
use std::convert::Infallible;

/// Create an undecorated layer-shell window for `role`.
///
/// Panel and overlays are anchored top-left so that a position is just a
/// pair of margins.  Full-screen roles are anchored on all edges.
pub(crate) fn layer_window(role: SurfaceRole) -> gtk4::Window {
    let window = gtk4::Window::new();
    window.set_decorated(false);
    window.init_layer_shell();
    window.set_namespace(&format!("maynard-{}", role));
    window.set_keyboard_mode(KeyboardMode::None);
    if role == SurfaceRole::Grab {
        window.remove_css_class("background");
    }
    window.add_css_class(&role.to_string());

    let layer = match role {
        SurfaceRole::Background => Layer::Background,
        SurfaceRole::Grab => Layer::Top,
        SurfaceRole::Panel
        | SurfaceRole::Launcher
        | SurfaceRole::IndicatorsMenu
        | SurfaceRole::Curtain => Layer::Overlay,
    };
    window.set_layer(layer);

    match role {
        SurfaceRole::Background | SurfaceRole::Grab | SurfaceRole::Curtain => {
            for edge in [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right] {
                window.set_anchor(edge, true);
            }
            window.set_exclusive_zone(-1);
        }
        SurfaceRole::Panel => {
            window.set_anchor(Edge::Top, true);
            window.set_anchor(Edge::Bottom, true);
            window.set_anchor(Edge::Left, true);
        }
        SurfaceRole::Launcher | SurfaceRole::IndicatorsMenu => {
            window.set_anchor(Edge::Top, true);
            window.set_anchor(Edge::Left, true);
            window.set_exclusive_zone(-1);
        }
    }
    window
}

/// Places shell windows through layer-shell margins.
pub struct GtkBackend {
    windows: HashMap<SurfaceRole, gtk4::Window>,
}

impl GtkBackend {
    pub(crate) fn new(windows: HashMap<SurfaceRole, gtk4::Window>) -> Self {
        Self { windows }
    }

    fn window(&self, role: SurfaceRole) -> Option<&gtk4::Window> {
        self.windows.get(&role)
    }
}

impl ShellBackend for GtkBackend {
    type Error = Infallible;

    fn move_surface(&self, role: SurfaceRole, x: i32, y: i32) -> Result<(), Infallible> {
        if let Some(w) = self.window(role) {
            w.set_margin(Edge::Left, x);
            w.set_margin(Edge::Top, y);
        }
        Ok(())
    }

    fn resize_surface(&self, role: SurfaceRole, size: Size) -> Result<(), Infallible> {
        let Some(w) = self.window(role) else {
            return Ok(());
        };
        match role {
            // Anchored on every edge; the compositor sizes these.
            SurfaceRole::Background | SurfaceRole::Grab | SurfaceRole::Curtain => {}
            SurfaceRole::Panel => {
                w.set_default_size(size.width, size.height);
                w.set_exclusive_zone(size.width);
            }
            SurfaceRole::Launcher | SurfaceRole::IndicatorsMenu => {
                w.set_default_size(size.width, size.height);
                w.set_size_request(size.width, size.height);
            }
        }
        Ok(())
    }

    fn preferred_size(&self, role: SurfaceRole) -> Size {
        match self.window(role) {
            Some(w) => {
                let (_, natural) = w.preferred_size();
                Size::new(natural.width(), natural.height())
            }
            None => Size::default(),
        }
    }

    fn allocation(&self, role: SurfaceRole) -> Size {
        match self.window(role) {
            Some(w) if w.is_realized() => Size::new(w.width(), w.height()),
            _ => Size::default(),
        }
    }

    fn set_grab_active(&self, active: bool) -> Result<(), Infallible> {
        if let Some(grab) = self.window(SurfaceRole::Grab) {
            debug!("grab surface {}", if active { "mapped" } else { "unmapped" });
            grab.set_visible(active);
        }
        Ok(())
    }

    fn desktop_ready(&self) -> Result<(), Infallible> {
        if let Some(curtain) = self.window(SurfaceRole::Curtain) {
            curtain.set_visible(false);
        }
        Ok(())
    }

    fn unlock(&self) -> Result<(), Infallible> {
        info!("lock requested, no lock screen: releasing");
        Ok(())
    }
}
