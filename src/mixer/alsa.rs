//! ALSA simple-mixer device.

use super::{poll_millis, MixerError, VolumeRange};
use crate::traits::MixerDevice;
use alsa::mixer::{Mixer, SelemChannelId, SelemId};
use alsa::PollDescriptors;
use log::{debug, info};
use std::time::Duration;

/// A playback element on an ALSA card.
///
/// `Selem` borrows the `Mixer`, so only the element name is stored and the
/// element is looked up again on every call.
pub struct AlsaMixer {
    mixer: Mixer,
    element: String,
    range: VolumeRange,
}

impl AlsaMixer {
    /// Open `card` and use the first of `elements` that exists on it.
    pub fn open(card: &str, elements: &[String]) -> Result<Self, MixerError> {
        let mixer = Mixer::new(card, false).map_err(|e| MixerError::Open {
            card: card.to_string(),
            reason: e.to_string(),
        })?;

        for name in elements {
            let Some(selem) = mixer.find_selem(&SelemId::new(name, 0)) else {
                debug!("{}: no element {}", card, name);
                continue;
            };
            let (min, max) = selem.get_playback_volume_range();
            info!("mixer {}: using {} (range {}..{})", card, name, min, max);
            let range = VolumeRange::new(min as i64, max as i64);
            return Ok(Self {
                mixer,
                element: name.clone(),
                range,
            });
        }
        Err(MixerError::NoElement(elements.to_vec()))
    }

    fn with_selem<T>(
        &self,
        f: impl FnOnce(&alsa::mixer::Selem<'_>) -> alsa::Result<T>,
    ) -> Result<T, MixerError> {
        let selem = self
            .mixer
            .find_selem(&SelemId::new(&self.element, 0))
            .ok_or_else(|| MixerError::NoElement(vec![self.element.clone()]))?;
        f(&selem).map_err(device_err)
    }
}

fn device_err(e: alsa::Error) -> MixerError {
    MixerError::Device(e.to_string())
}

impl MixerDevice for AlsaMixer {
    fn volume_range(&self) -> VolumeRange {
        self.range
    }

    fn playback_volume(&self) -> Result<i64, MixerError> {
        self.with_selem(|s| s.get_playback_volume(SelemChannelId::FrontLeft))
            .map(|v| v as i64)
    }

    fn playback_unmuted(&self) -> Result<bool, MixerError> {
        self.with_selem(|s| {
            if !s.has_playback_switch() {
                return Ok(true);
            }
            s.get_playback_switch(SelemChannelId::FrontLeft).map(|v| v != 0)
        })
    }

    fn set_playback_volume(&self, raw: i64) -> Result<(), MixerError> {
        let raw = raw.clamp(self.range.min, self.range.max);
        self.with_selem(|s| s.set_playback_volume_all(raw as _))
    }

    fn wait(&self, timeout: Duration) -> Result<bool, MixerError> {
        let mut fds = self.mixer.get().map_err(device_err)?;
        let ready = alsa::poll::poll(&mut fds, poll_millis(timeout)).map_err(device_err)?;
        if ready == 0 {
            return Ok(false);
        }
        let handled = self.mixer.handle_events().map_err(device_err)?;
        Ok(handled > 0)
    }
}
