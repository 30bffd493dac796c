//! The vertical panel: launcher button, favorites, indicators.

use super::launcher::{app_image, launch};
use crate::apps::AppInfo;
use crate::event::ShellEvent;
use gtk4::prelude::*;
use log::debug;
use std::sync::mpsc;

const FAVORITE_ICON_SIZE: i32 = 32;

/// Fill the panel window and hook up its crossing notifications.
pub(crate) fn build_panel(
    window: &gtk4::Window,
    favorites: &[&AppInfo],
    indicators: &gtk4::Box,
    events: &mpsc::Sender<ShellEvent>,
) {
    let column = gtk4::Box::new(gtk4::Orientation::Vertical, 4);
    column.set_margin_top(8);
    column.set_margin_bottom(8);

    let grid_button = gtk4::Button::from_icon_name("view-app-grid-symbolic");
    grid_button.add_css_class("panel-button");
    grid_button.set_tooltip_text(Some("Applications"));
    let tx = events.clone();
    grid_button.connect_clicked(move |_| {
        let _ = tx.send(ShellEvent::LauncherToggled);
    });
    column.append(&grid_button);

    let favorites_box = gtk4::Box::new(gtk4::Orientation::Vertical, 4);
    for app in favorites {
        let button = gtk4::Button::new();
        button.add_css_class("panel-button");
        button.set_child(Some(&app_image(app, FAVORITE_ICON_SIZE)));
        button.set_tooltip_text(Some(&app.name));
        let id = app.id.clone();
        let tx = events.clone();
        button.connect_clicked(move |_| {
            debug!("favorite: {}", id);
            launch(&id);
            let _ = tx.send(ShellEvent::FavoriteLaunched);
        });
        favorites_box.append(&button);
    }
    column.append(&favorites_box);

    let spacer = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
    spacer.set_vexpand(true);
    column.append(&spacer);
    column.append(indicators);

    window.set_child(Some(&column));

    let crossing = gtk4::EventControllerMotion::new();
    let tx = events.clone();
    crossing.connect_enter(move |_, _, _| {
        let _ = tx.send(ShellEvent::PanelEnter);
    });
    let tx = events.clone();
    crossing.connect_leave(move |_| {
        let _ = tx.send(ShellEvent::PanelLeave);
    });
    window.add_controller(crossing);
}
