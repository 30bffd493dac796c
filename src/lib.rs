//! **maynard**: a desktop shell for Wayland compositors.
//!
//! The shell draws a vertical panel on the left edge, a full-screen
//! application launcher and an indicators menu (clock, volume).  The two
//! popups are *overlays*: they are parked just off the left edge of the
//! output and slid in next to the panel when toggled.
//!
//! # Architecture
//!
//! The crate is organised around a handful of traits:
//!
//! * [`traits::ShellBackend`] places shell surfaces, so the overlay state
//!   machine in [`session`] is not coupled to any toolkit.
//! * [`traits::GlobalSource`] lists compositor globals for the
//!   [`handshake`].
//! * [`traits::MixerDevice`] abstracts the audio mixer behind the volume
//!   indicator.
//!
//! Concrete implementations live in [`ui`] (GTK4 + layer-shell, feature
//! `shell-gtk`), [`wayland`] (registry probe) and [`mixer`] (ALSA, feature
//! `mixer-alsa`).

pub mod apps;
pub mod config;
pub mod dispatch;
pub mod event;
pub mod handshake;
pub mod indicator;
pub mod ini;
pub mod mixer;
pub mod session;
pub mod surface;
pub mod traits;
#[cfg(feature = "shell-gtk")]
pub mod ui;
pub mod wayland;
