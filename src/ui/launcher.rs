//! Application grid and GIO glue.

use crate::apps::{AppInfo, AppRegistry, AppSource};
use crate::event::ShellEvent;
use gtk4::prelude::*;
use gtk4::{gdk, gio};
use log::{debug, info, warn};
use std::convert::Infallible;
use std::sync::mpsc;

/// Lists applications through `g_app_info_get_all`, honouring
/// `NoDisplay`/`OnlyShowIn`.
pub struct GioAppSource;

impl AppSource for GioAppSource {
    type Error = Infallible;

    fn apps(&self) -> Result<Vec<AppInfo>, Infallible> {
        let apps = gio::AppInfo::all()
            .into_iter()
            .filter(|a| a.should_show())
            .filter_map(|a| {
                let id = a.id()?;
                let icon = a.icon().and_then(|i| gio::prelude::IconExt::to_string(&i));
                let mut info = AppInfo::new(id.as_str(), a.display_name().as_str());
                info.icon = icon.map(|s| s.to_string());
                Some(info)
            })
            .collect();
        Ok(apps)
    }
}

/// Launch the application with desktop id `id`.  Returns `false` if it is
/// not installed or fails to start.
pub(crate) fn launch(id: &str) -> bool {
    let Some(app) = gio::AppInfo::all()
        .into_iter()
        .find(|a| a.id().is_some_and(|i| i.as_str() == id))
    else {
        warn!("cannot launch {}: not installed", id);
        return false;
    };

    let context = gdk::Display::default().map(|d| d.app_launch_context());
    match app.launch(&[], context.as_ref()) {
        Ok(()) => {
            info!("launched {}", id);
            true
        }
        Err(e) => {
            warn!("launching {} failed: {}", id, e);
            false
        }
    }
}

/// Image for an app icon string, falling back to a generic icon.
pub(crate) fn app_image(app: &AppInfo, pixel_size: i32) -> gtk4::Image {
    let image = match app.icon.as_deref().map(gio::Icon::for_string) {
        Some(Ok(icon)) => gtk4::Image::from_gicon(&icon),
        _ => gtk4::Image::from_icon_name("application-x-executable"),
    };
    image.set_pixel_size(pixel_size);
    image
}

/// The scrollable grid of every installed application.
pub(crate) struct LauncherView {
    scrolled: gtk4::ScrolledWindow,
}

impl LauncherView {
    pub(crate) fn new(
        window: &gtk4::Window,
        apps: &AppRegistry,
        icon_size: i32,
        events: &mpsc::Sender<ShellEvent>,
    ) -> Self {
        let grid = gtk4::FlowBox::new();
        grid.add_css_class("launcher-grid");
        grid.set_selection_mode(gtk4::SelectionMode::None);
        grid.set_homogeneous(true);
        grid.set_valign(gtk4::Align::Start);
        grid.set_max_children_per_line(10);

        for app in apps.sorted() {
            let content = gtk4::Box::new(gtk4::Orientation::Vertical, 6);
            content.append(&app_image(app, icon_size));
            let label = gtk4::Label::new(Some(&app.name));
            label.set_max_width_chars(14);
            label.set_ellipsize(gtk4::pango::EllipsizeMode::End);
            content.append(&label);

            let button = gtk4::Button::new();
            button.add_css_class("app-button");
            button.set_child(Some(&content));
            button.set_tooltip_text(Some(&app.name));

            let id = app.id.clone();
            let tx = events.clone();
            button.connect_clicked(move |_| {
                debug!("launcher: {}", id);
                launch(&id);
                let _ = tx.send(ShellEvent::AppLaunched);
            });
            grid.insert(&button, -1);
        }

        let scrolled = gtk4::ScrolledWindow::new();
        scrolled.set_policy(gtk4::PolicyType::Never, gtk4::PolicyType::Automatic);
        scrolled.set_child(Some(&grid));
        window.set_child(Some(&scrolled));

        info!("launcher grid: {} applications", apps.len());
        Self { scrolled }
    }

    pub(crate) fn scroll_to_top(&self) {
        self.scrolled.vadjustment().set_value(0.0);
    }
}
