//! [`GlobalSource`] backed by a real Wayland connection.
//!
//! The probe opens its own connection to the compositor named by
//! `WAYLAND_DISPLAY`, collects the registry and answers the handshake.  The
//! toolkit keeps a separate connection for drawing.

use crate::handshake::Advertisement;
use crate::traits::GlobalSource;
use log::debug;
use wayland_client::globals::{registry_queue_init, GlobalError, GlobalList, GlobalListContents};
use wayland_client::protocol::wl_registry;
use wayland_client::{ConnectError, Connection, Dispatch, DispatchError, EventQueue, QueueHandle};

/// Errors produced by the Wayland probe.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("failed to connect to the compositor: {0}")]
    Connect(#[from] ConnectError),
    #[error("failed to read the registry: {0}")]
    Registry(#[from] GlobalError),
    #[error("dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Registry events are tracked by [`GlobalListContents`]; nothing else is
/// dispatched on the probe's queue.
struct ProbeState;

impl Dispatch<wl_registry::WlRegistry, GlobalListContents> for ProbeState {
    fn event(
        _: &mut Self,
        _: &wl_registry::WlRegistry,
        event: wl_registry::Event,
        _: &GlobalListContents,
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        if let wl_registry::Event::Global { interface, .. } = event {
            debug!("late global {}", interface);
        }
    }
}

pub struct WaylandProbe {
    _conn: Connection,
    globals: GlobalList,
    queue: EventQueue<ProbeState>,
    state: ProbeState,
}

impl WaylandProbe {
    /// Connect and read the initial registry.
    pub fn connect() -> Result<Self, ProbeError> {
        let conn = Connection::connect_to_env()?;
        let (globals, queue) = registry_queue_init::<ProbeState>(&conn)?;
        Ok(Self {
            _conn: conn,
            globals,
            queue,
            state: ProbeState,
        })
    }
}

impl GlobalSource for WaylandProbe {
    type Error = ProbeError;

    fn globals(&self) -> Vec<Advertisement> {
        self.globals.contents().with_list(|list| {
            list.iter()
                .map(|g| Advertisement::new(g.name, g.interface.clone(), g.version))
                .collect()
        })
    }

    fn roundtrip(&mut self) -> Result<(), ProbeError> {
        self.queue.roundtrip(&mut self.state)?;
        Ok(())
    }
}
