//! One-shot negotiation with the compositor.
//!
//! Two steps, both strictly sequential:
//!
//! 1. [`negotiate`] checks that every required global is advertised.  If
//!    something is missing it performs exactly **one** extra roundtrip and
//!    checks again; there is no other retry and no timeout.
//! 2. [`ConfigureLayout::compute`] turns the output size delivered by the
//!    compositor's configure into sizes and initial positions for every
//!    shell surface.  The session applies it.

use crate::surface::{Size, SurfaceRole};
use crate::traits::GlobalSource;
use log::{debug, info};
use std::collections::HashMap;
use std::fmt;

/// A global as announced by `wl_registry.global`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advertisement {
    pub name: u32,
    pub interface: String,
    pub version: u32,
}

impl Advertisement {
    pub fn new(name: u32, interface: impl Into<String>, version: u32) -> Self {
        Self {
            name,
            interface: interface.into(),
            version,
        }
    }
}

/// What the shell needs a global for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlobalRole {
    /// The output the desktop is drawn on.
    Output,
    /// The channel used to register shell surfaces and place them.
    ShellControl,
    /// Pointer input.
    Seat,
}

impl fmt::Display for GlobalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlobalRole::Output => write!(f, "output"),
            GlobalRole::ShellControl => write!(f, "shell"),
            GlobalRole::Seat => write!(f, "seat"),
        }
    }
}

/// A global the shell binds, and whether it can live without it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalRequirement {
    pub role: GlobalRole,
    pub interface: &'static str,
    pub required: bool,
}

/// Globals the layer-shell based desktop needs.
///
/// Layer-shell both registers the panel/background and lets us place a
/// surface anywhere on the output, so it covers the shell-control role on
/// its own.
pub const SHELL_GLOBALS: [GlobalRequirement; 3] = [
    GlobalRequirement {
        role: GlobalRole::Output,
        interface: "wl_output",
        required: true,
    },
    GlobalRequirement {
        role: GlobalRole::ShellControl,
        interface: "zwlr_layer_shell_v1",
        required: true,
    },
    GlobalRequirement {
        role: GlobalRole::Seat,
        interface: "wl_seat",
        required: false,
    },
];

/// Errors from the handshake.
#[derive(Debug, thiserror::Error)]
pub enum HandshakeError {
    /// Required globals were still absent after the retry roundtrip.
    #[error("could not find required compositor globals: {}", .0.join(", "))]
    MissingGlobals(Vec<&'static str>),
    /// The retry roundtrip itself failed.
    #[error("roundtrip failed: {0}")]
    Roundtrip(String),
}

/// The globals found for each role.
#[derive(Debug, Clone, Default)]
pub struct BoundGlobals {
    found: HashMap<GlobalRole, Advertisement>,
}

impl BoundGlobals {
    pub fn get(&self, role: GlobalRole) -> Option<&Advertisement> {
        self.found.get(&role)
    }

    pub fn len(&self) -> usize {
        self.found.len()
    }

    pub fn is_empty(&self) -> bool {
        self.found.is_empty()
    }

    fn collect(globals: &[Advertisement], requirements: &[GlobalRequirement]) -> Self {
        let mut found = HashMap::new();
        for req in requirements {
            // First advertisement wins; only one output is driven.
            if let Some(ad) = globals.iter().find(|g| g.interface == req.interface) {
                found.insert(req.role, ad.clone());
            }
        }
        Self { found }
    }

    fn missing(&self, requirements: &[GlobalRequirement]) -> Vec<&'static str> {
        requirements
            .iter()
            .filter(|r| r.required && !self.found.contains_key(&r.role))
            .map(|r| r.interface)
            .collect()
    }
}

/// Check that every required global is advertised, retrying once.
pub fn negotiate<S: GlobalSource>(
    source: &mut S,
    requirements: &[GlobalRequirement],
) -> Result<BoundGlobals, HandshakeError> {
    let mut bound = BoundGlobals::collect(&source.globals(), requirements);
    let missing = bound.missing(requirements);
    if !missing.is_empty() {
        debug!("missing {:?} after first pass, doing one roundtrip", missing);
        source
            .roundtrip()
            .map_err(|e| HandshakeError::Roundtrip(e.to_string()))?;
        bound = BoundGlobals::collect(&source.globals(), requirements);
    }

    let missing = bound.missing(requirements);
    if !missing.is_empty() {
        return Err(HandshakeError::MissingGlobals(missing));
    }

    for req in requirements {
        match bound.get(req.role) {
            Some(ad) => info!("{}: {} v{}", req.role, ad.interface, ad.version),
            None => info!("{}: {} not available", req.role, req.interface),
        }
    }
    Ok(bound)
}

/// Sizes and initial placement computed from a configure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigureLayout {
    /// The whole output.
    pub output: Size,
    pub panel: Size,
    pub indicators_menu: Size,
    pub launcher: Size,
}

impl ConfigureLayout {
    /// Compute the layout for an output of size `output`.
    ///
    /// The panel keeps its preferred width and spans the full height, the
    /// indicators menu keeps its preferred size and the launcher takes
    /// whatever is left to the right of the panel.
    pub fn compute(output: Size, panel_preferred: Size, menu_preferred: Size) -> Self {
        let panel = Size::new(panel_preferred.width, output.height);
        let launcher = Size::new((output.width - panel.width).max(0), output.height);
        Self {
            output,
            panel,
            indicators_menu: menu_preferred,
            launcher,
        }
    }

    /// Size of every surface, in the order they should be resized.
    pub fn sizes(&self) -> [(SurfaceRole, Size); 6] {
        [
            (SurfaceRole::Background, self.output),
            (SurfaceRole::Curtain, self.output),
            (SurfaceRole::Grab, self.output),
            (SurfaceRole::Panel, self.panel),
            (SurfaceRole::IndicatorsMenu, self.indicators_menu),
            (SurfaceRole::Launcher, self.launcher),
        ]
    }

    /// Where the launcher sits while hidden.
    pub fn launcher_hidden(&self) -> (i32, i32) {
        (-self.launcher.width, 0)
    }

    /// Where the indicators menu sits while hidden: just left of the output,
    /// bottom-aligned.
    pub fn indicators_menu_hidden(&self) -> (i32, i32) {
        (
            -self.indicators_menu.width,
            self.output.height - self.indicators_menu.height,
        )
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug, thiserror::Error)]
    #[error("broken pipe")]
    struct PipeErr;

    /// Source that counts roundtrips and reveals `late` after the first.
    struct CountingSource {
        early: Vec<Advertisement>,
        late: Vec<Advertisement>,
        roundtrips: Cell<u32>,
        fail_roundtrip: bool,
    }

    impl CountingSource {
        fn new(early: Vec<Advertisement>, late: Vec<Advertisement>) -> Self {
            Self {
                early,
                late,
                roundtrips: Cell::new(0),
                fail_roundtrip: false,
            }
        }
    }

    impl GlobalSource for CountingSource {
        type Error = PipeErr;

        fn globals(&self) -> Vec<Advertisement> {
            let mut all = self.early.clone();
            if self.roundtrips.get() > 0 {
                all.extend(self.late.iter().cloned());
            }
            all
        }

        fn roundtrip(&mut self) -> Result<(), PipeErr> {
            self.roundtrips.set(self.roundtrips.get() + 1);
            if self.fail_roundtrip {
                Err(PipeErr)
            } else {
                Ok(())
            }
        }
    }

    fn output() -> Advertisement {
        Advertisement::new(1, "wl_output", 4)
    }

    fn layer_shell() -> Advertisement {
        Advertisement::new(2, "zwlr_layer_shell_v1", 4)
    }

    fn seat() -> Advertisement {
        Advertisement::new(3, "wl_seat", 8)
    }

    #[test]
    fn everything_present_needs_no_roundtrip() {
        let mut src = CountingSource::new(vec![output(), layer_shell(), seat()], vec![]);
        let bound = negotiate(&mut src, &SHELL_GLOBALS).unwrap();
        assert_eq!(src.roundtrips.get(), 0);
        assert_eq!(bound.len(), 3);
        assert_eq!(bound.get(GlobalRole::ShellControl).unwrap().name, 2);
    }

    #[test]
    fn late_globals_found_after_one_roundtrip() {
        let mut src = CountingSource::new(vec![output()], vec![layer_shell()]);
        let bound = negotiate(&mut src, &SHELL_GLOBALS).unwrap();
        assert_eq!(src.roundtrips.get(), 1);
        assert!(bound.get(GlobalRole::ShellControl).is_some());
        assert!(bound.get(GlobalRole::Seat).is_none());
    }

    #[test]
    fn missing_after_retry_names_the_interfaces() {
        let mut src = CountingSource::new(vec![seat()], vec![]);
        let err = negotiate(&mut src, &SHELL_GLOBALS).unwrap_err();
        assert_eq!(src.roundtrips.get(), 1, "exactly one retry");
        match err {
            HandshakeError::MissingGlobals(names) => {
                assert_eq!(names, vec!["wl_output", "zwlr_layer_shell_v1"]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn optional_seat_does_not_trigger_retry() {
        let mut src = CountingSource::new(vec![output(), layer_shell()], vec![seat()]);
        negotiate(&mut src, &SHELL_GLOBALS).unwrap();
        assert_eq!(src.roundtrips.get(), 0);
    }

    #[test]
    fn failed_roundtrip_is_reported() {
        let mut src = CountingSource::new(vec![], vec![]);
        src.fail_roundtrip = true;
        let err = negotiate(&mut src, &SHELL_GLOBALS).unwrap_err();
        assert!(matches!(err, HandshakeError::Roundtrip(_)));
    }

    #[test]
    fn first_output_wins() {
        let mut src = CountingSource::new(
            vec![output(), Advertisement::new(9, "wl_output", 4), layer_shell()],
            vec![],
        );
        let bound = negotiate(&mut src, &SHELL_GLOBALS).unwrap();
        assert_eq!(bound.get(GlobalRole::Output).unwrap().name, 1);
    }

    #[test]
    fn layout_splits_output_between_panel_and_launcher() {
        let l = ConfigureLayout::compute(
            Size::new(1920, 1080),
            Size::new(56, 300),
            Size::new(240, 160),
        );
        assert_eq!(l.panel, Size::new(56, 1080));
        assert_eq!(l.launcher, Size::new(1864, 1080));
        assert_eq!(l.indicators_menu, Size::new(240, 160));
        assert_eq!(l.launcher_hidden(), (-1864, 0));
        assert_eq!(l.indicators_menu_hidden(), (-240, 920));
    }

    #[test]
    fn layout_never_gives_launcher_negative_width() {
        let l = ConfigureLayout::compute(Size::new(40, 600), Size::new(56, 1), Size::new(1, 1));
        assert_eq!(l.launcher.width, 0);
    }

    #[test]
    fn layout_sizes_cover_every_role() {
        let l = ConfigureLayout::compute(Size::new(800, 600), Size::new(50, 0), Size::new(100, 80));
        let roles: Vec<SurfaceRole> = l.sizes().iter().map(|(r, _)| *r).collect();
        for role in SurfaceRole::ALL {
            assert!(roles.contains(&role), "{} missing", role);
        }
    }
}
