//! Core traits that decouple the shell logic from the toolkit, the
//! compositor connection and the audio stack.
//!
//! Every concrete backend (GTK4 + layer-shell, a Wayland registry probe, an
//! ALSA mixer, a test double, …) implements one of these traits.  The
//! [`DesktopSession`](crate::session::DesktopSession) and the
//! [`handshake`](crate::handshake) only depend on these abstractions.

use crate::handshake::Advertisement;
use crate::mixer::{MixerError, VolumeRange};
use crate::surface::{Size, SurfaceRole};
use std::time::Duration;

/// Abstraction over whatever actually places shell surfaces on the output.
///
/// With layer-shell this is a GTK window per role whose margins are
/// adjusted; in tests it is a recorder.
pub trait ShellBackend {
    /// The error type produced by this backend.
    type Error: std::error::Error + Send + 'static;

    /// Move the surface for `role` so its top-left corner is at `(x, y)` in
    /// output coordinates.  Negative coordinates are allowed and are how
    /// overlays are hidden.
    fn move_surface(&self, role: SurfaceRole, x: i32, y: i32) -> Result<(), Self::Error>;

    /// Resize the surface for `role`.
    fn resize_surface(&self, role: SurfaceRole, size: Size) -> Result<(), Self::Error>;

    /// The size the toolkit would like to give the content of `role`.
    fn preferred_size(&self, role: SurfaceRole) -> Size;

    /// The size currently allocated to `role`.  Zero before the surface has
    /// been mapped.
    fn allocation(&self, role: SurfaceRole) -> Size;

    /// Map or unmap the input catcher that sits beneath the overlays.
    fn set_grab_active(&self, active: bool) -> Result<(), Self::Error>;

    /// Tell the compositor the desktop is fully set up.
    fn desktop_ready(&self) -> Result<(), Self::Error>;

    /// Release a lock the compositor asked us to prepare.
    fn unlock(&self) -> Result<(), Self::Error>;
}

/// Something that can list the globals a compositor advertises.
pub trait GlobalSource {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Globals seen so far.
    fn globals(&self) -> Vec<Advertisement>;

    /// Block until the compositor has processed every request sent so far,
    /// so late advertisements are delivered.
    fn roundtrip(&mut self) -> Result<(), Self::Error>;
}

/// A playback mixer element.
///
/// Unlike the other seams this one uses a concrete error type: the volume
/// indicator stores its device as a trait object.
pub trait MixerDevice {
    /// Raw volume bounds of the element.  `min` is not always zero.
    fn volume_range(&self) -> VolumeRange;

    /// Current raw playback volume of the first channel.
    fn playback_volume(&self) -> Result<i64, MixerError>;

    /// Whether the playback switch is on.  Elements without a switch report
    /// `true`.
    fn playback_unmuted(&self) -> Result<bool, MixerError>;

    /// Set every playback channel to `raw`.
    fn set_playback_volume(&self, raw: i64) -> Result<(), MixerError>;

    /// Wait up to `timeout` for device events and process them.  Returns
    /// `true` if something changed.
    fn wait(&self, timeout: Duration) -> Result<bool, MixerError>;
}
