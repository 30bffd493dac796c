//! Widgets for the clock and volume indicators.
//!
//! Each indicator appears twice: in the panel's indicator area and in the
//! indicators menu.  [`IndicatorViews`] owns both sets and re-renders them
//! from the [`Indicator`] descriptions.

use crate::event::ShellEvent;
use crate::indicator::{ClockIndicator, Indicator, IndicatorMenu, IndicatorWidget, VolumeIndicator};
use gtk4::glib::SignalHandlerId;
use gtk4::prelude::*;
use log::warn;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc;

pub(crate) struct IndicatorViews {
    /// Goes at the bottom of the panel.
    pub(crate) panel_area: gtk4::Box,
    clock_label: gtk4::Label,
    weekday: gtk4::Label,
    date: gtk4::Label,
    volume_icon: gtk4::Image,
    menu_volume_icon: gtk4::Image,
    scale: gtk4::Scale,
    scale_handler: SignalHandlerId,
}

impl IndicatorViews {
    pub(crate) fn new(
        menu_window: &gtk4::Window,
        volume: &Rc<RefCell<VolumeIndicator>>,
        events: &mpsc::Sender<ShellEvent>,
    ) -> Self {
        //  Panel area
        let panel_area = gtk4::Box::new(gtk4::Orientation::Vertical, 6);
        panel_area.add_css_class("indicators");
        let volume_icon = gtk4::Image::from_icon_name("audio-volume-muted-symbolic");
        let clock_label = gtk4::Label::new(None);
        clock_label.add_css_class("clock-label");
        panel_area.append(&volume_icon);
        panel_area.append(&clock_label);

        let click = gtk4::GestureClick::new();
        let tx = events.clone();
        click.connect_released(move |_, _, _, _| {
            let _ = tx.send(ShellEvent::IndicatorsMenuToggled);
        });
        panel_area.add_controller(click);

        let hover = gtk4::EventControllerMotion::new();
        let area = panel_area.clone();
        hover.connect_enter(move |_, _, _| area.add_css_class("prelight"));
        let area = panel_area.clone();
        hover.connect_leave(move |_| area.remove_css_class("prelight"));
        panel_area.add_controller(hover);

        //  Menu
        let menu = gtk4::Box::new(gtk4::Orientation::Vertical, 12);
        menu.add_css_class("indicators-menu-box");

        let weekday = gtk4::Label::new(None);
        weekday.add_css_class("menu-weekday");
        weekday.set_halign(gtk4::Align::Start);
        let date = gtk4::Label::new(None);
        date.add_css_class("menu-date");
        date.set_halign(gtk4::Align::Start);
        menu.append(&weekday);
        menu.append(&date);

        let row = gtk4::Box::new(gtk4::Orientation::Horizontal, 8);
        let menu_volume_icon = gtk4::Image::from_icon_name("audio-volume-muted-symbolic");
        let scale = gtk4::Scale::with_range(gtk4::Orientation::Horizontal, 0.0, 100.0, 1.0);
        scale.add_css_class("volume-scale");
        scale.set_draw_value(false);
        scale.set_hexpand(true);
        scale.set_sensitive(volume.borrow().has_device());
        row.append(&menu_volume_icon);
        row.append(&scale);
        menu.append(&row);
        menu_window.set_child(Some(&menu));

        let scale_handler = {
            let volume = Rc::clone(volume);
            let panel_icon = volume_icon.clone();
            let menu_icon = menu_volume_icon.clone();
            scale.connect_value_changed(move |s| {
                let mut v = volume.borrow_mut();
                if let Err(e) = v.set_percentage(s.value()) {
                    warn!("setting volume: {}", e);
                }
                let name = v.icon().icon_name();
                panel_icon.set_icon_name(Some(name));
                menu_icon.set_icon_name(Some(name));
            })
        };

        Self {
            panel_area,
            clock_label,
            weekday,
            date,
            volume_icon,
            menu_volume_icon,
            scale,
            scale_handler,
        }
    }

    pub(crate) fn sync_clock(&self, clock: &ClockIndicator) {
        if let IndicatorWidget::Label(text) = clock.widget() {
            self.clock_label.set_text(&text);
        }
        if let IndicatorMenu::Clock { weekday, date } = clock.menu() {
            self.weekday.set_text(&weekday);
            self.date.set_text(&date);
        }
    }

    /// Show `volume` without feeding the change back into the mixer.
    pub(crate) fn sync_volume(&self, volume: &VolumeIndicator) {
        if let IndicatorWidget::Icon(name) = volume.widget() {
            self.volume_icon.set_icon_name(Some(name));
        }
        if let IndicatorMenu::Volume { icon, percentage } = volume.menu() {
            self.menu_volume_icon.set_icon_name(Some(icon));
            self.scale.block_signal(&self.scale_handler);
            self.scale.set_value(percentage);
            self.scale.unblock_signal(&self.scale_handler);
        }
    }
}
