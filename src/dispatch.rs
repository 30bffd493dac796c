//! Routing table from [`EventKind`] to session handlers.
//!
//! The table is a plain map of function pointers.  Kinds without an entry
//! (motion, axis, grab-cursor by default) are ignored by the session.

use crate::event::{EventKind, ShellEvent};
use crate::session::{DesktopSession, SessionError};
use crate::traits::ShellBackend;
use std::collections::HashMap;

/// A handler for one kind of event.
pub type Handler<B> = fn(&mut DesktopSession<B>, ShellEvent) -> Result<(), SessionError>;

/// Maps event kinds to handlers.
pub struct DispatchTable<B: ShellBackend> {
    handlers: HashMap<EventKind, Handler<B>>,
}

impl<B: ShellBackend> Default for DispatchTable<B> {
    fn default() -> Self {
        Self::standard()
    }
}

impl<B: ShellBackend> DispatchTable<B> {
    /// An empty table: every event is ignored.
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// The table the desktop runs with.
    pub fn standard() -> Self {
        let mut table = Self::empty();
        table.set(EventKind::LauncherToggled, DesktopSession::on_launcher_toggled);
        table.set(
            EventKind::IndicatorsMenuToggled,
            DesktopSession::on_indicators_menu_toggled,
        );
        table.set(EventKind::FavoriteLaunched, DesktopSession::on_favorite_launched);
        table.set(EventKind::AppLaunched, DesktopSession::on_app_launched);
        table.set(EventKind::PanelEnter, DesktopSession::on_panel_enter);
        table.set(EventKind::PanelLeave, DesktopSession::on_panel_leave);
        table.set(EventKind::PointerButton, DesktopSession::on_pointer_button);
        table.set(EventKind::Configure, DesktopSession::on_configure);
        table.set(EventKind::PrepareLockSurface, DesktopSession::on_prepare_lock_surface);
        table.set(EventKind::ArmCrossing, DesktopSession::on_arm_crossing);
        table
    }

    /// Install (or replace) the handler for `kind`.
    pub fn set(&mut self, kind: EventKind, handler: Handler<B>) {
        self.handlers.insert(kind, handler);
    }

    /// Remove the handler for `kind`, so those events are ignored.
    pub fn remove(&mut self, kind: EventKind) {
        self.handlers.remove(&kind);
    }

    pub fn get(&self, kind: EventKind) -> Option<Handler<B>> {
        self.handlers.get(&kind).copied()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{Size, SurfaceRole};
    use std::convert::Infallible;

    struct NullBackend;

    impl ShellBackend for NullBackend {
        type Error = Infallible;

        fn move_surface(&self, _: SurfaceRole, _: i32, _: i32) -> Result<(), Infallible> {
            Ok(())
        }

        fn resize_surface(&self, _: SurfaceRole, _: Size) -> Result<(), Infallible> {
            Ok(())
        }

        fn preferred_size(&self, _: SurfaceRole) -> Size {
            Size::default()
        }

        fn allocation(&self, _: SurfaceRole) -> Size {
            Size::default()
        }

        fn set_grab_active(&self, _: bool) -> Result<(), Infallible> {
            Ok(())
        }

        fn desktop_ready(&self) -> Result<(), Infallible> {
            Ok(())
        }

        fn unlock(&self) -> Result<(), Infallible> {
            Ok(())
        }
    }

    #[test]
    fn standard_table_ignores_motion_axis_and_cursor() {
        let table: DispatchTable<NullBackend> = DispatchTable::standard();
        assert_eq!(table.len(), 10);
        assert!(table.get(EventKind::PointerMotion).is_none());
        assert!(table.get(EventKind::PointerAxis).is_none());
        assert!(table.get(EventKind::GrabCursor).is_none());
        assert!(table.get(EventKind::PointerButton).is_some());
    }

    #[test]
    fn empty_table_routes_nothing() {
        let mut table: DispatchTable<NullBackend> = DispatchTable::empty();
        assert!(table.is_empty());
        table.set(EventKind::ArmCrossing, DesktopSession::on_arm_crossing);
        assert_eq!(table.len(), 1);
        table.remove(EventKind::ArmCrossing);
        assert!(table.is_empty());
    }

    #[test]
    fn handler_runs_through_session() {
        let mut session = DesktopSession::with_dispatch(NullBackend, DispatchTable::empty());
        session.handle(ShellEvent::ArmCrossing).unwrap();
        assert!(!session.crossing_armed());

        let mut table = DispatchTable::empty();
        table.set(EventKind::ArmCrossing, DesktopSession::on_arm_crossing);
        let mut session = DesktopSession::with_dispatch(NullBackend, table);
        session.handle(ShellEvent::ArmCrossing).unwrap();
        assert!(session.crossing_armed());
    }
}
