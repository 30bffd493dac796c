//! Volume indicator: an icon in the panel, a slider in the menu.

use super::{Indicator, IndicatorMenu, IndicatorWidget};
use crate::mixer::{read_state, MixerError, VolumeIcon, VolumeState};
use crate::traits::MixerDevice;
use log::{debug, warn};

/// Shows the playback volume of a mixer device, if there is one.
///
/// Without a device the indicator stays muted and ignores the slider.
pub struct VolumeIndicator {
    device: Option<Box<dyn MixerDevice>>,
    state: VolumeState,
}

impl VolumeIndicator {
    pub fn new(device: Result<Box<dyn MixerDevice>, MixerError>) -> Self {
        let device = match device {
            Ok(d) => Some(d),
            Err(e) => {
                warn!("volume indicator disabled: {}", e);
                None
            }
        };
        let mut indicator = Self {
            device,
            state: VolumeState::MUTED,
        };
        indicator.refresh();
        indicator
    }

    pub fn has_device(&self) -> bool {
        self.device.is_some()
    }

    /// Re-read the device.  A failed read leaves the last state in place.
    pub fn refresh(&mut self) {
        let Some(device) = self.device.as_deref() else {
            return;
        };
        match read_state(device) {
            Ok(state) => self.state = state,
            Err(e) => warn!("reading volume: {}", e),
        }
    }

    /// Take a snapshot posted by the watcher thread.  Returns `true` if it
    /// differs from what is shown.
    pub fn apply(&mut self, state: VolumeState) -> bool {
        if state == self.state {
            return false;
        }
        self.state = state;
        true
    }

    /// Set the playback volume from the menu slider.
    pub fn set_percentage(&mut self, percentage: f64) -> Result<(), MixerError> {
        let Some(device) = self.device.as_deref() else {
            return Ok(());
        };
        let raw = device.volume_range().to_raw(percentage);
        debug!("volume {:.0}% -> raw {}", percentage, raw);
        device.set_playback_volume(raw)?;
        self.refresh();
        Ok(())
    }

    pub fn state(&self) -> VolumeState {
        self.state
    }

    pub fn icon(&self) -> VolumeIcon {
        self.state.icon()
    }
}

impl Indicator for VolumeIndicator {
    fn name(&self) -> &'static str {
        "volume"
    }

    fn widget(&self) -> IndicatorWidget {
        IndicatorWidget::Icon(self.icon().icon_name())
    }

    fn menu(&self) -> IndicatorMenu {
        IndicatorMenu::Volume {
            icon: self.icon().icon_name(),
            percentage: self.state.percentage,
        }
    }
}
