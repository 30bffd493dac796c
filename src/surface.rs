//! Registry of the compositor surfaces the shell owns.
//!
//! Every shell window is backed by exactly one surface, identified by its
//! [`SurfaceRole`].  The registry remembers the last position the shell
//! asked the compositor for and the last known size of each surface, so the
//! toggle logic can compute off-screen offsets without querying the toolkit
//! for things it already knows.

use std::collections::HashMap;
use std::fmt;

/// The job a surface does in the desktop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceRole {
    /// Wallpaper, covers the whole output.
    Background,
    /// The vertical panel docked to the left edge.
    Panel,
    /// The application grid overlay.
    Launcher,
    /// The popup holding the clock and volume menus.
    IndicatorsMenu,
    /// Full-output cover shown until the desktop is ready.
    Curtain,
    /// Full-output input catcher placed beneath the overlays.
    Grab,
}

impl SurfaceRole {
    /// All roles, in creation order.
    pub const ALL: [SurfaceRole; 6] = [
        SurfaceRole::Background,
        SurfaceRole::Curtain,
        SurfaceRole::Panel,
        SurfaceRole::IndicatorsMenu,
        SurfaceRole::Launcher,
        SurfaceRole::Grab,
    ];
}

impl fmt::Display for SurfaceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceRole::Background => write!(f, "background"),
            SurfaceRole::Panel => write!(f, "panel"),
            SurfaceRole::Launcher => write!(f, "launcher"),
            SurfaceRole::IndicatorsMenu => write!(f, "indicators-menu"),
            SurfaceRole::Curtain => write!(f, "curtain"),
            SurfaceRole::Grab => write!(f, "grab"),
        }
    }
}

/// Width and height in surface-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// A compositor-managed drawable region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surface {
    pub role: SurfaceRole,
    /// Last position requested from the compositor.
    pub x: i32,
    pub y: i32,
    /// Last known size.
    pub size: Size,
}

impl Surface {
    fn new(role: SurfaceRole) -> Self {
        Self {
            role,
            x: 0,
            y: 0,
            size: Size::default(),
        }
    }

    /// Position as `(x, y)`.
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

/// Tracks one [`Surface`] per [`SurfaceRole`].
#[derive(Debug, Clone)]
pub struct SurfaceRegistry {
    surfaces: HashMap<SurfaceRole, Surface>,
}

impl Default for SurfaceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceRegistry {
    /// Create a registry with every role registered at the origin with a
    /// zero size.
    pub fn new() -> Self {
        let surfaces = SurfaceRole::ALL
            .iter()
            .map(|&role| (role, Surface::new(role)))
            .collect();
        Self { surfaces }
    }

    pub fn get(&self, role: SurfaceRole) -> &Surface {
        // Every role is inserted by `new`, and nothing removes entries.
        &self.surfaces[&role]
    }

    fn get_mut(&mut self, role: SurfaceRole) -> &mut Surface {
        self.surfaces
            .entry(role)
            .or_insert_with(|| Surface::new(role))
    }

    /// Record that `role` was moved to `(x, y)`.
    pub fn set_position(&mut self, role: SurfaceRole, x: i32, y: i32) {
        let s = self.get_mut(role);
        s.x = x;
        s.y = y;
    }

    /// Record the current size of `role`.
    pub fn set_size(&mut self, role: SurfaceRole, size: Size) {
        self.get_mut(role).size = size;
    }

    pub fn size(&self, role: SurfaceRole) -> Size {
        self.get(role).size
    }

    pub fn position(&self, role: SurfaceRole) -> (i32, i32) {
        self.get(role).position()
    }
}
