//! Panel indicators.
//!
//! An indicator has two faces: a small widget that lives in the panel and a
//! section of the indicators menu.  Both are described as plain data here;
//! the GTK front-end turns them into widgets.

pub mod clock;
pub mod volume;

pub use clock::ClockIndicator;
pub use volume::VolumeIndicator;

/// What an indicator shows in the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndicatorWidget {
    /// A named icon from the icon theme.
    Icon(&'static str),
    Label(String),
}

/// What an indicator contributes to the indicators menu.
#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorMenu {
    Clock { weekday: String, date: String },
    Volume { icon: &'static str, percentage: f64 },
}

/// Something that sits in the panel's indicator area.
pub trait Indicator {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn widget(&self) -> IndicatorWidget;

    fn menu(&self) -> IndicatorMenu;
}
