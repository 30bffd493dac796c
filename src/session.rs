//! The desktop session: visibility state and the toggle controller.
//!
//! [`DesktopSession`] owns the [`SurfaceRegistry`], the two overlay flags
//! and the pointer-outside-panel flag, and reacts to [`ShellEvent`]s by
//! issuing calls to the [`ShellBackend`] trait.

use crate::dispatch::DispatchTable;
use crate::event::{ButtonState, Overlay, ShellEvent};
use crate::handshake::ConfigureLayout;
use crate::surface::{Size, SurfaceRegistry, SurfaceRole};
use crate::traits::ShellBackend;
use log::{debug, info, warn};

/// Possible errors from the session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// An overlay was toggled before the compositor configured the output.
    #[error("{0} toggled before the desktop was configured")]
    NotConfigured(Overlay),
    /// The backend failed during setup.
    #[error("shell backend error: {0}")]
    Backend(String),
}

/// Orchestrates overlay visibility and surface placement.
///
/// The session is generic over any [`ShellBackend`], so the same state
/// machine drives the GTK front-end and the test recorders.
///
/// # Typical usage
///
/// ```ignore
/// let mut session = DesktopSession::new(backend);
/// session.handle(ShellEvent::Configure { edges: 0, width: 1920, height: 1080 })?;
/// session.handle(ShellEvent::LauncherToggled)?;
/// ```
pub struct DesktopSession<B: ShellBackend> {
    backend: B,
    surfaces: SurfaceRegistry,
    layout: Option<ConfigureLayout>,
    launcher_visible: bool,
    indicators_menu_visible: bool,
    pointer_out_of_panel: bool,
    crossing_armed: bool,
    grab_active: bool,
    dispatch: DispatchTable<B>,
}

impl<B: ShellBackend> DesktopSession<B> {
    /// Create a session with both overlays hidden and the standard
    /// dispatch table.
    pub fn new(backend: B) -> Self {
        Self::with_dispatch(backend, DispatchTable::standard())
    }

    pub fn with_dispatch(backend: B, dispatch: DispatchTable<B>) -> Self {
        Self {
            backend,
            surfaces: SurfaceRegistry::new(),
            layout: None,
            launcher_visible: false,
            indicators_menu_visible: false,
            pointer_out_of_panel: false,
            crossing_armed: false,
            grab_active: false,
            dispatch,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn surfaces(&self) -> &SurfaceRegistry {
        &self.surfaces
    }

    /// The layout from the last configure, if any.
    pub fn layout(&self) -> Option<&ConfigureLayout> {
        self.layout.as_ref()
    }

    pub fn is_configured(&self) -> bool {
        self.layout.is_some()
    }

    pub fn is_visible(&self, overlay: Overlay) -> bool {
        match overlay {
            Overlay::Launcher => self.launcher_visible,
            Overlay::IndicatorsMenu => self.indicators_menu_visible,
        }
    }

    pub fn pointer_out_of_panel(&self) -> bool {
        self.pointer_out_of_panel
    }

    /// Whether panel enter/leave notifications are being honoured yet.
    pub fn crossing_armed(&self) -> bool {
        self.crossing_armed
    }

    /// Process a single [`ShellEvent`].
    ///
    /// Events that need placed surfaces are dropped until the first
    /// configure.  Kinds without a handler are ignored.
    pub fn handle(&mut self, event: ShellEvent) -> Result<(), SessionError> {
        let kind = event.kind();
        if !self.is_configured() && !kind.allowed_before_configure() {
            debug!("dropping {:?} before configure", kind);
            return Ok(());
        }
        match self.dispatch.get(kind) {
            Some(handler) => handler(self, event),
            None => Ok(()),
        }
    }

    /// Show `overlay` if hidden, hide it if shown.
    ///
    /// Any other visible overlay is hidden first, so at most one overlay
    /// is on screen.  A failing move is logged and the flag is flipped
    /// anyway; the compositor is the source of truth for placement and a
    /// later toggle retries.
    pub fn toggle(&mut self, overlay: Overlay) -> Result<(), SessionError> {
        if !self.is_configured() {
            return Err(SessionError::NotConfigured(overlay));
        }

        let other = overlay.other();
        if self.is_visible(other) {
            self.move_overlay(other, false);
        }
        let show = !self.is_visible(overlay);
        self.move_overlay(overlay, show);
        self.sync_grab();
        Ok(())
    }

    /// Hide every visible overlay.
    pub fn close_overlays(&mut self) -> Result<(), SessionError> {
        for overlay in Overlay::ALL {
            if self.is_visible(overlay) {
                if !self.is_configured() {
                    return Err(SessionError::NotConfigured(overlay));
                }
                self.move_overlay(overlay, false);
            }
        }
        self.sync_grab();
        Ok(())
    }

    /// Apply the layout for an output of size `output`.
    ///
    /// Resizes every surface, docks the panel at the origin, parks both
    /// overlays off-screen and tells the compositor the desktop is ready.
    pub fn configure(&mut self, output: Size) -> Result<(), SessionError> {
        let layout = ConfigureLayout::compute(
            output,
            self.backend.preferred_size(SurfaceRole::Panel),
            self.backend.preferred_size(SurfaceRole::IndicatorsMenu),
        );
        info!(
            "configure {}x{}: panel {}x{}, launcher {}x{}, menu {}x{}",
            output.width,
            output.height,
            layout.panel.width,
            layout.panel.height,
            layout.launcher.width,
            layout.launcher.height,
            layout.indicators_menu.width,
            layout.indicators_menu.height
        );

        for (role, size) in layout.sizes() {
            self.backend
                .resize_surface(role, size)
                .map_err(|e| SessionError::Backend(e.to_string()))?;
            self.surfaces.set_size(role, size);
        }

        self.move_surface(SurfaceRole::Panel, 0, 0);
        let (lx, ly) = layout.launcher_hidden();
        self.move_surface(SurfaceRole::Launcher, lx, ly);
        let (mx, my) = layout.indicators_menu_hidden();
        self.move_surface(SurfaceRole::IndicatorsMenu, mx, my);

        self.launcher_visible = false;
        self.indicators_menu_visible = false;
        self.layout = Some(layout);
        self.sync_grab();

        self.backend
            .desktop_ready()
            .map_err(|e| SessionError::Backend(e.to_string()))?;
        info!("desktop ready");
        Ok(())
    }

    //  Handlers (installed by `DispatchTable::standard`)

    pub(crate) fn on_launcher_toggled(&mut self, _: ShellEvent) -> Result<(), SessionError> {
        self.toggle(Overlay::Launcher)
    }

    pub(crate) fn on_indicators_menu_toggled(
        &mut self,
        _: ShellEvent,
    ) -> Result<(), SessionError> {
        self.toggle(Overlay::IndicatorsMenu)
    }

    pub(crate) fn on_favorite_launched(&mut self, _: ShellEvent) -> Result<(), SessionError> {
        if self.launcher_visible {
            self.toggle(Overlay::Launcher)?;
        }
        // The favorite's window will appear under the pointer.
        self.pointer_out_of_panel = true;
        Ok(())
    }

    pub(crate) fn on_app_launched(&mut self, _: ShellEvent) -> Result<(), SessionError> {
        if self.launcher_visible {
            self.toggle(Overlay::Launcher)?;
        }
        Ok(())
    }

    pub(crate) fn on_panel_enter(&mut self, _: ShellEvent) -> Result<(), SessionError> {
        if self.crossing_armed {
            self.pointer_out_of_panel = false;
        }
        Ok(())
    }

    pub(crate) fn on_panel_leave(&mut self, _: ShellEvent) -> Result<(), SessionError> {
        if self.crossing_armed {
            self.pointer_out_of_panel = true;
        }
        Ok(())
    }

    pub(crate) fn on_pointer_button(&mut self, event: ShellEvent) -> Result<(), SessionError> {
        let ShellEvent::PointerButton { state, .. } = event else {
            return Ok(());
        };
        if state != ButtonState::Released || !self.pointer_out_of_panel {
            return Ok(());
        }
        debug!("click outside the panel, closing overlays");
        self.close_overlays()
    }

    pub(crate) fn on_configure(&mut self, event: ShellEvent) -> Result<(), SessionError> {
        let ShellEvent::Configure { width, height, .. } = event else {
            return Ok(());
        };
        self.configure(Size::new(width, height))
    }

    pub(crate) fn on_prepare_lock_surface(&mut self, _: ShellEvent) -> Result<(), SessionError> {
        // No lock screen: release the lock straight away.
        self.backend
            .unlock()
            .map_err(|e| SessionError::Backend(e.to_string()))
    }

    pub(crate) fn on_arm_crossing(&mut self, _: ShellEvent) -> Result<(), SessionError> {
        debug!("panel enter/leave armed");
        self.crossing_armed = true;
        Ok(())
    }

    //  internals

    fn set_visible(&mut self, overlay: Overlay, visible: bool) {
        match overlay {
            Overlay::Launcher => self.launcher_visible = visible,
            Overlay::IndicatorsMenu => self.indicators_menu_visible = visible,
        }
    }

    /// Current size of `role`: the toolkit allocation if there is one,
    /// otherwise whatever configure last assigned.
    fn current_size(&mut self, role: SurfaceRole) -> Size {
        let alloc = self.backend.allocation(role);
        if alloc.width > 0 || alloc.height > 0 {
            self.surfaces.set_size(role, alloc);
            alloc
        } else {
            self.surfaces.size(role)
        }
    }

    /// Target position for `overlay`, computed from current allocations.
    fn placement(&mut self, overlay: Overlay, on_screen: bool) -> (i32, i32) {
        let own = self.current_size(overlay.role());
        let panel_width = self.current_size(SurfaceRole::Panel).width;
        let x = if on_screen { panel_width } else { -own.width };
        let y = match overlay {
            Overlay::Launcher => 0,
            Overlay::IndicatorsMenu => {
                self.current_size(SurfaceRole::Background).height - own.height
            }
        };
        (x, y)
    }

    /// Slide `overlay` on or off screen and record it.  The grab surface is
    /// left alone; callers sync it once they are done.
    fn move_overlay(&mut self, overlay: Overlay, show: bool) {
        let (x, y) = self.placement(overlay, show);
        debug!("{} {} at ({}, {})", if show { "show" } else { "hide" }, overlay, x, y);
        self.move_surface(overlay.role(), x, y);
        self.set_visible(overlay, show);
    }

    fn move_surface(&mut self, role: SurfaceRole, x: i32, y: i32) {
        if let Err(e) = self.backend.move_surface(role, x, y) {
            warn!("moving {} to ({}, {}) failed: {}", role, x, y, e);
        }
        self.surfaces.set_position(role, x, y);
    }

    fn sync_grab(&mut self) {
        let want = self.launcher_visible || self.indicators_menu_visible;
        if want == self.grab_active {
            return;
        }
        if let Err(e) = self.backend.set_grab_active(want) {
            warn!("grab surface {}: {}", if want { "map" } else { "unmap" }, e);
        }
        self.grab_active = want;
    }
}

//  Tests
