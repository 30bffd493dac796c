//! Events and types shared by the shell components.
//!
//! [`ShellEvent`] is the vocabulary the toolkit and compositor glue use to
//! talk to the [`DesktopSession`](crate::session::DesktopSession): every
//! widget signal and compositor notification is one variant here.
//! [`EventKind`] is the payload-free tag used to key the dispatch table.

use crate::surface::SurfaceRole;
use std::fmt;

/// A transient popup surface the session can slide on and off screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Overlay {
    Launcher,
    IndicatorsMenu,
}

impl Overlay {
    /// Both overlays, in the order they are closed by an outside click.
    pub const ALL: [Overlay; 2] = [Overlay::Launcher, Overlay::IndicatorsMenu];

    /// The overlay that must be hidden before this one is shown.
    pub fn other(self) -> Overlay {
        match self {
            Overlay::Launcher => Overlay::IndicatorsMenu,
            Overlay::IndicatorsMenu => Overlay::Launcher,
        }
    }

    /// The surface backing this overlay.
    pub fn role(self) -> SurfaceRole {
        match self {
            Overlay::Launcher => SurfaceRole::Launcher,
            Overlay::IndicatorsMenu => SurfaceRole::IndicatorsMenu,
        }
    }
}

impl fmt::Display for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Overlay::Launcher => write!(f, "launcher"),
            Overlay::IndicatorsMenu => write!(f, "indicators-menu"),
        }
    }
}

/// Pointer button state, as reported by `wl_pointer.button`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Everything that can happen to the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    /// The app-grid button on the panel was clicked.
    LauncherToggled,
    /// The indicators area on the panel was clicked.
    IndicatorsMenuToggled,
    /// A favorite on the panel was launched.
    FavoriteLaunched,
    /// An application was activated in the launcher grid.
    AppLaunched,
    /// The pointer entered the panel surface.
    PanelEnter,
    /// The pointer left the panel surface.
    PanelLeave,
    /// A pointer button changed state anywhere on a shell surface.
    PointerButton { button: u32, state: ButtonState },
    PointerMotion,
    PointerAxis,
    /// The compositor announced the output geometry.
    Configure { edges: u32, width: i32, height: i32 },
    /// The compositor wants a lock surface.
    PrepareLockSurface,
    /// The compositor asked for a specific cursor on the grab surface.
    GrabCursor(u32),
    /// Start honouring panel enter/leave notifications.
    ArmCrossing,
}

/// Payload-free tag of a [`ShellEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    LauncherToggled,
    IndicatorsMenuToggled,
    FavoriteLaunched,
    AppLaunched,
    PanelEnter,
    PanelLeave,
    PointerButton,
    PointerMotion,
    PointerAxis,
    Configure,
    PrepareLockSurface,
    GrabCursor,
    ArmCrossing,
}

impl EventKind {
    /// Whether events of this kind are meaningful before the first
    /// configure.  Everything else touches surfaces that are not placed yet.
    pub fn allowed_before_configure(self) -> bool {
        matches!(
            self,
            EventKind::Configure
                | EventKind::PrepareLockSurface
                | EventKind::GrabCursor
                | EventKind::PanelEnter
                | EventKind::PanelLeave
                | EventKind::ArmCrossing
                | EventKind::PointerMotion
                | EventKind::PointerAxis
        )
    }
}

impl ShellEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ShellEvent::LauncherToggled => EventKind::LauncherToggled,
            ShellEvent::IndicatorsMenuToggled => EventKind::IndicatorsMenuToggled,
            ShellEvent::FavoriteLaunched => EventKind::FavoriteLaunched,
            ShellEvent::AppLaunched => EventKind::AppLaunched,
            ShellEvent::PanelEnter => EventKind::PanelEnter,
            ShellEvent::PanelLeave => EventKind::PanelLeave,
            ShellEvent::PointerButton { .. } => EventKind::PointerButton,
            ShellEvent::PointerMotion => EventKind::PointerMotion,
            ShellEvent::PointerAxis => EventKind::PointerAxis,
            ShellEvent::Configure { .. } => EventKind::Configure,
            ShellEvent::PrepareLockSurface => EventKind::PrepareLockSurface,
            ShellEvent::GrabCursor(_) => EventKind::GrabCursor,
            ShellEvent::ArmCrossing => EventKind::ArmCrossing,
        }
    }
}
