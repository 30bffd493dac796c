//! Playback volume: conversions, icon policy and device access.
//!
//! The toolkit only ever sees percentages in `[0, 100]`.  Devices work in
//! raw units between [`VolumeRange::min`] and [`VolumeRange::max`], and the
//! minimum is not always zero, so every conversion goes through the range.
//!
//! [`watcher::MixerWatcher`] polls a device on a background thread and
//! posts [`VolumeState`] snapshots over a bounded channel.  With the
//! `mixer-alsa` feature, [`alsa::AlsaMixer`] is the real device.

#[cfg(feature = "mixer-alsa")]
pub mod alsa;
pub mod watcher;

use crate::traits::MixerDevice;
use std::time::Duration;

/// Errors from mixer devices.
#[derive(Debug, thiserror::Error)]
pub enum MixerError {
    /// The card could not be opened or loaded.
    #[error("failed to open mixer {card}: {reason}")]
    Open { card: String, reason: String },
    /// None of the candidate elements exist on the card.
    #[error("no mixer element named {}", .0.join(" or "))]
    NoElement(Vec<String>),
    /// A read, write or wait on an open device failed.
    #[error("mixer device error: {0}")]
    Device(String),
    /// This build has no mixer backend.
    #[error("no mixer support compiled in")]
    Unsupported,
    /// The polling thread could not be started.
    #[error("failed to spawn mixer thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Raw volume bounds of a mixer element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeRange {
    pub min: i64,
    pub max: i64,
}

impl VolumeRange {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    fn span(&self) -> i64 {
        self.max - self.min
    }

    /// Convert a raw device value to a percentage.
    ///
    /// A degenerate range (`max <= min`) maps everything to `0.0`.
    pub fn to_percentage(&self, raw: i64) -> f64 {
        let span = self.span();
        if span <= 0 {
            return 0.0;
        }
        (raw - self.min) as f64 / span as f64 * 100.0
    }

    /// Convert a percentage back to the nearest raw device value.
    ///
    /// The percentage is clamped to `[0, 100]` first.
    pub fn to_raw(&self, percentage: f64) -> i64 {
        let pct = percentage.clamp(0.0, 100.0);
        (self.span().max(0) as f64 * pct / 100.0).round() as i64 + self.min
    }
}

/// Which icon the volume indicator shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeIcon {
    High,
    Medium,
    Low,
    Muted,
}

impl VolumeIcon {
    /// Above 70 % is high, above 30 % medium, anything audible low.
    pub fn for_percentage(percentage: f64) -> Self {
        if percentage > 70.0 {
            VolumeIcon::High
        } else if percentage > 30.0 {
            VolumeIcon::Medium
        } else if percentage > 0.0 {
            VolumeIcon::Low
        } else {
            VolumeIcon::Muted
        }
    }

    /// Symbolic icon name from the freedesktop icon theme.
    pub fn icon_name(self) -> &'static str {
        match self {
            VolumeIcon::High => "audio-volume-high-symbolic",
            VolumeIcon::Medium => "audio-volume-medium-symbolic",
            VolumeIcon::Low => "audio-volume-low-symbolic",
            VolumeIcon::Muted => "audio-volume-muted-symbolic",
        }
    }
}

/// A snapshot of the playback volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeState {
    /// `0.0` while muted.
    pub percentage: f64,
    pub muted: bool,
}

impl VolumeState {
    /// What the indicator shows when there is no device.
    pub const MUTED: VolumeState = VolumeState {
        percentage: 0.0,
        muted: true,
    };

    pub fn icon(&self) -> VolumeIcon {
        VolumeIcon::for_percentage(self.percentage)
    }
}

/// Read the current state of `device`.  A muted device reads as 0 %.
pub fn read_state(device: &dyn MixerDevice) -> Result<VolumeState, MixerError> {
    if !device.playback_unmuted()? {
        return Ok(VolumeState::MUTED);
    }
    let raw = device.playback_volume()?;
    Ok(VolumeState {
        percentage: device.volume_range().to_percentage(raw),
        muted: false,
    })
}

/// Open the configured mixer, or explain why there is none.
pub fn open_default(card: &str, elements: &[String]) -> Result<Box<dyn MixerDevice>, MixerError> {
    #[cfg(feature = "mixer-alsa")]
    {
        alsa::AlsaMixer::open(card, elements).map(|m| Box::new(m) as Box<dyn MixerDevice>)
    }
    #[cfg(not(feature = "mixer-alsa"))]
    {
        let _ = (card, elements);
        Err(MixerError::Unsupported)
    }
}

/// `timeout` as a `poll(2)` argument, saturating at `i32::MAX` ms.
#[cfg_attr(not(feature = "mixer-alsa"), allow(dead_code))]
pub(crate) fn poll_millis(timeout: Duration) -> i32 {
    i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::Cell;

    /// In-memory device used by the mixer and indicator tests.
    pub(crate) struct FakeMixer {
        pub range: VolumeRange,
        pub raw: Cell<i64>,
        pub unmuted: Cell<bool>,
        pub fail_reads: bool,
    }

    impl FakeMixer {
        pub fn new(min: i64, max: i64, raw: i64) -> Self {
            Self {
                range: VolumeRange::new(min, max),
                raw: Cell::new(raw),
                unmuted: Cell::new(true),
                fail_reads: false,
            }
        }
    }

    impl MixerDevice for FakeMixer {
        fn volume_range(&self) -> VolumeRange {
            self.range
        }

        fn playback_volume(&self) -> Result<i64, MixerError> {
            if self.fail_reads {
                return Err(MixerError::Device("read failed".into()));
            }
            Ok(self.raw.get())
        }

        fn playback_unmuted(&self) -> Result<bool, MixerError> {
            Ok(self.unmuted.get())
        }

        fn set_playback_volume(&self, raw: i64) -> Result<(), MixerError> {
            self.raw.set(raw);
            Ok(())
        }

        fn wait(&self, timeout: Duration) -> Result<bool, MixerError> {
            std::thread::sleep(timeout);
            Ok(false)
        }
    }

    #[test]
    fn percentage_respects_nonzero_min() {
        let r = VolumeRange::new(-10239, 400);
        assert_eq!(r.to_percentage(-10239), 0.0);
        assert_eq!(r.to_percentage(400), 100.0);
        assert_eq!(r.to_raw(0.0), -10239);
        assert_eq!(r.to_raw(100.0), 400);
    }

    #[test]
    fn to_raw_clamps_out_of_range_percentages() {
        let r = VolumeRange::new(0, 87);
        assert_eq!(r.to_raw(-5.0), 0);
        assert_eq!(r.to_raw(250.0), 87);
    }

    #[test]
    fn degenerate_range_is_silent() {
        let r = VolumeRange::new(5, 5);
        assert_eq!(r.to_percentage(5), 0.0);
        assert_eq!(r.to_raw(50.0), 5);
    }

    #[test]
    fn icon_thresholds() {
        assert_eq!(VolumeIcon::for_percentage(100.0), VolumeIcon::High);
        assert_eq!(VolumeIcon::for_percentage(70.5), VolumeIcon::High);
        assert_eq!(VolumeIcon::for_percentage(70.0), VolumeIcon::Medium);
        assert_eq!(VolumeIcon::for_percentage(30.0), VolumeIcon::Low);
        assert_eq!(VolumeIcon::for_percentage(0.1), VolumeIcon::Low);
        assert_eq!(VolumeIcon::for_percentage(0.0), VolumeIcon::Muted);
        assert_eq!(VolumeIcon::Muted.icon_name(), "audio-volume-muted-symbolic");
    }

    #[test]
    fn muted_device_reads_as_zero() {
        let dev = FakeMixer::new(0, 100, 80);
        dev.unmuted.set(false);
        let state = read_state(&dev).unwrap();
        assert_eq!(state, VolumeState::MUTED);
        assert_eq!(state.icon(), VolumeIcon::Muted);
    }

    #[test]
    fn unmuted_device_reads_percentage() {
        let dev = FakeMixer::new(0, 200, 150);
        let state = read_state(&dev).unwrap();
        assert!(!state.muted);
        assert_eq!(state.percentage, 75.0);
        assert_eq!(state.icon(), VolumeIcon::High);
    }

    #[test]
    fn poll_millis_saturates() {
        assert_eq!(poll_millis(Duration::from_millis(250)), 250);
        assert_eq!(poll_millis(Duration::from_millis(i32::MAX as u64)), i32::MAX);
        // 2^32 ms would wrap to 0 with a plain cast and spin the watcher.
        assert_eq!(poll_millis(Duration::from_millis(1 << 32)), i32::MAX);
        assert_eq!(poll_millis(Duration::from_secs(u64::MAX)), i32::MAX);
    }

    #[cfg(not(feature = "mixer-alsa"))]
    #[test]
    fn no_backend_means_unsupported() {
        assert!(matches!(
            open_default("default", &["Master".to_string()]),
            Err(MixerError::Unsupported)
        ));
    }

    proptest! {
        #[test]
        fn raw_percentage_round_trip(
            (min, max, raw) in (-65536i64..65536, 1i64..131072)
                .prop_flat_map(|(min, span)| (Just(min), Just(min + span), min..=min + span))
        ) {
            let r = VolumeRange::new(min, max);
            let back = r.to_raw(r.to_percentage(raw));
            prop_assert!((back - raw).abs() <= 1, "{} -> {} in [{}, {}]", raw, back, min, max);
        }
    }
}
