//! Clock indicator: the time in the panel, weekday and date in the menu.

use super::{Indicator, IndicatorMenu, IndicatorWidget};
use crate::config::ClockConfig;
use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDateTime;
use log::warn;
use std::fmt::Write;

pub struct ClockIndicator {
    time_format: String,
    weekday_format: String,
    date_format: String,
    time: String,
    weekday: String,
    date: String,
}

impl ClockIndicator {
    /// Build the clock showing `now`.  Format strings that do not parse, or
    /// that a naive local time cannot render (`%Z`, `%z`), are replaced by
    /// the defaults.
    pub fn new(config: &ClockConfig, now: NaiveDateTime) -> Self {
        let defaults = ClockConfig::default();
        let mut clock = Self {
            time_format: checked(&config.time_format, &defaults.time_format, now),
            weekday_format: checked(&config.weekday_format, &defaults.weekday_format, now),
            date_format: checked(&config.date_format, &defaults.date_format, now),
            time: String::new(),
            weekday: String::new(),
            date: String::new(),
        };
        clock.update(now);
        clock
    }

    /// Re-render for `now`.  Returns `true` if any text changed.
    pub fn update(&mut self, now: NaiveDateTime) -> bool {
        let time = render(&self.time_format, now).unwrap_or_default();
        let weekday = render(&self.weekday_format, now).unwrap_or_default();
        // "%e" pads single-digit days with a space.
        let date = render(&self.date_format, now)
            .unwrap_or_default()
            .trim()
            .to_string();
        let changed = time != self.time || weekday != self.weekday || date != self.date;
        self.time = time;
        self.weekday = weekday;
        self.date = date;
        changed
    }

    pub fn time(&self) -> &str {
        &self.time
    }
}

/// `None` if `now` cannot be rendered with `format`.
fn render(format: &str, now: NaiveDateTime) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", now.format(format)).ok()?;
    Some(out)
}

fn checked(format: &str, fallback: &str, now: NaiveDateTime) -> String {
    let parses = !StrftimeItems::new(format).any(|item| matches!(item, Item::Error));
    if !parses || render(format, now).is_none() {
        warn!("invalid clock format {:?}, using {:?}", format, fallback);
        fallback.to_string()
    } else {
        format.to_string()
    }
}

impl Indicator for ClockIndicator {
    fn name(&self) -> &'static str {
        "clock"
    }

    fn widget(&self) -> IndicatorWidget {
        IndicatorWidget::Label(self.time.clone())
    }

    fn menu(&self) -> IndicatorMenu {
        IndicatorMenu::Clock {
            weekday: self.weekday.clone(),
            date: self.date.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn default_formats() {
        let clock = ClockIndicator::new(&ClockConfig::default(), at(9, 7, 0));
        assert_eq!(clock.widget(), IndicatorWidget::Label("09:07".into()));
        assert_eq!(
            clock.menu(),
            IndicatorMenu::Clock {
                weekday: "Tuesday".into(),
                date: "5 March 2024".into(),
            }
        );
    }

    #[test]
    fn update_reports_minute_changes_only() {
        let mut clock = ClockIndicator::new(&ClockConfig::default(), at(9, 7, 0));
        assert!(!clock.update(at(9, 7, 30)));
        assert!(clock.update(at(9, 8, 0)));
        assert_eq!(clock.time(), "09:08");
    }

    #[test]
    fn bad_format_falls_back() {
        let config = ClockConfig {
            time_format: "%Q".into(),
            ..ClockConfig::default()
        };
        let clock = ClockIndicator::new(&config, at(23, 59, 0));
        assert_eq!(clock.time(), "23:59");
    }

    #[test]
    fn timezone_format_falls_back() {
        // Parses, but a NaiveDateTime has no offset to print.
        let config = ClockConfig {
            time_format: "%H:%M %Z".into(),
            date_format: "%d %b %z".into(),
            ..ClockConfig::default()
        };
        let mut clock = ClockIndicator::new(&config, at(8, 30, 0));
        assert_eq!(clock.time(), "08:30");
        assert!(clock.update(at(8, 31, 0)));
        assert_eq!(
            clock.menu(),
            IndicatorMenu::Clock {
                weekday: "Tuesday".into(),
                date: "5 March 2024".into(),
            }
        );
    }

    #[test]
    fn custom_format_is_used() {
        let config = ClockConfig {
            time_format: "%I:%M %p".into(),
            ..ClockConfig::default()
        };
        let clock = ClockIndicator::new(&config, at(14, 5, 0));
        assert_eq!(clock.time(), "02:05 PM");
    }
}
