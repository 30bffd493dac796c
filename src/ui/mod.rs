//! GTK4 + layer-shell front-end that runs on the **main thread**.
//!
//! # Windows
//!
//! ```text
//! background       (Background layer, full screen, image or SteelBlue)
//! grab             (Top layer, full screen, mapped while an overlay is open)
//! panel            (Overlay layer, left edge, exclusive zone)
//! ├ launcher button
//! ├ favorites
//! └ .indicators    (volume icon, clock; click opens the menu)
//! launcher         (Overlay layer, app grid, parked off-screen)
//! indicators-menu  (Overlay layer, weekday/date + volume slider)
//! curtain          (Overlay layer, black, hidden once the desktop is ready)
//! ```
//!
//! Toolkit callbacks never touch the session.  They post [`ShellEvent`]s
//! into a channel that a ~60 fps tick drains into the
//! [`DesktopSession`]; the same tick drains mixer snapshots.
//!
//! # CSS selectors
//!
//! | Selector                  | Targets                                    |
//! |---------------------------|--------------------------------------------|
//! | `window.panel`            | The panel                                  |
//! | `window.launcher`         | The launcher overlay                       |
//! | `window.indicators-menu`  | The indicators menu                        |
//! | `window.curtain`          | Startup cover                              |
//! | `.background-fill`        | Background when no image is configured     |
//! | `.panel-button`           | Launcher and favorite buttons              |
//! | `.indicators`             | Indicator area (`.prelight` while hovered) |
//! | `.app-button`             | Launcher grid entries                      |

mod backend;
mod indicators;
mod launcher;
mod panel;
mod style;

pub use backend::GtkBackend;
pub use launcher::GioAppSource;

use crate::apps::AppRegistry;
use crate::config::Config;
use crate::event::{ButtonState, EventKind, Overlay, ShellEvent};
use crate::indicator::{ClockIndicator, VolumeIndicator};
use crate::ini::ShellSettings;
use crate::mixer::watcher::MixerWatcher;
use crate::mixer::{self, VolumeState};
use crate::session::DesktopSession;
use crate::surface::SurfaceRole;
use backend::layer_window;
use chrono::Local;
use gtk4::prelude::*;
use gtk4::{gdk, glib};
use indicators::IndicatorViews;
use launcher::LauncherView;
use log::{debug, error, info, warn};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::mpsc;
use std::time::Duration;

/// Run the shell on the **current** (main) thread until a shell window is
/// closed.
pub fn run_main_loop(config: Config, settings: ShellSettings, css_path: Option<PathBuf>) {
    gtk4::init().expect("failed to initialise GTK4");
    info!("GTK4 initialised on main thread");

    let Some(display) = gdk::Display::default() else {
        error!("no default GDK display");
        std::process::exit(1);
    };
    info!("display: {}", display.name());
    style::load_css(&display, css_path.as_deref());

    let mut apps = AppRegistry::new();
    apps.reload(&GioAppSource);

    let (tx, rx) = mpsc::channel::<ShellEvent>();
    let main_loop = glib::MainLoop::new(None, false);

    //  Windows
    let mut windows: HashMap<SurfaceRole, gtk4::Window> = HashMap::new();
    for role in SurfaceRole::ALL {
        let window = layer_window(role);
        let ml = main_loop.clone();
        window.connect_close_request(move |_| {
            info!("shell window closed");
            ml.quit();
            glib::Propagation::Proceed
        });
        windows.insert(role, window);
    }
    let window = |role: SurfaceRole| windows[&role].clone();

    if let Err(e) = set_background(&window(SurfaceRole::Background), settings.background_image.as_deref()) {
        error!("failed to load background image: {}", e);
        std::process::exit(1);
    }

    let catcher = gtk4::DrawingArea::new();
    catcher.set_hexpand(true);
    catcher.set_vexpand(true);
    window(SurfaceRole::Grab).set_child(Some(&catcher));

    // The indicators menu is left out so dragging its slider does not
    // close it.
    for role in [SurfaceRole::Background, SurfaceRole::Grab, SurfaceRole::Launcher] {
        forward_clicks(&window(role), &tx);
    }

    //  Indicators
    let mut clock = ClockIndicator::new(&config.clock, Local::now().naive_local());
    let volume = Rc::new(RefCell::new(VolumeIndicator::new(mixer::open_default(
        &config.mixer.card,
        &config.mixer.elements,
    ))));
    let views = Rc::new(IndicatorViews::new(
        &window(SurfaceRole::IndicatorsMenu),
        &volume,
        &tx,
    ));
    views.sync_clock(&clock);
    views.sync_volume(&volume.borrow());

    //  Panel and launcher
    let favorites = apps.favorites(&config.favorites);
    panel::build_panel(&window(SurfaceRole::Panel), &favorites, &views.panel_area, &tx);
    let launcher = LauncherView::new(
        &window(SurfaceRole::Launcher),
        &apps,
        config.panel.launcher_icon_size,
        &tx,
    );

    //  Mixer watcher
    let (mut watcher, mixer_rx) = if volume.borrow().has_device() {
        spawn_watcher(&config)
    } else {
        (None, None)
    };

    for role in [
        SurfaceRole::Background,
        SurfaceRole::Panel,
        SurfaceRole::Launcher,
        SurfaceRole::IndicatorsMenu,
        SurfaceRole::Curtain,
    ] {
        window(role).present();
    }

    let mut session = DesktopSession::new(GtkBackend::new(windows.clone()));

    //  Configure from the first monitor
    let Some(monitor) = first_monitor(&display) else {
        error!("no monitor on {}", display.name());
        std::process::exit(1);
    };
    send_configure(&monitor, &tx);
    {
        let tx = tx.clone();
        monitor.connect_geometry_notify(move |m| {
            debug!("monitor geometry changed");
            send_configure(m, &tx);
        });
    }

    //  Clock (1 Hz)
    {
        let views = Rc::clone(&views);
        glib::timeout_add_seconds_local(1, move || {
            if clock.update(Local::now().naive_local()) {
                views.sync_clock(&clock);
            }
            glib::ControlFlow::Continue
        });
    }

    //  Main event loop (~60 fps)
    let crossing_delay = Duration::from_millis(config.panel.crossing_delay_ms);
    let arm_tx = tx.clone();
    glib::timeout_add_local(Duration::from_millis(16), move || {
        // 1. Drain shell events.
        loop {
            match rx.try_recv() {
                Ok(event) => {
                    let kind = event.kind();
                    let launcher_was_visible = session.is_visible(Overlay::Launcher);
                    if let Err(e) = session.handle(event) {
                        warn!("{:?}: {}", kind, e);
                    }
                    if kind == EventKind::Configure && session.is_configured() {
                        let tx = arm_tx.clone();
                        glib::timeout_add_local_once(crossing_delay, move || {
                            let _ = tx.send(ShellEvent::ArmCrossing);
                        });
                    }
                    if !launcher_was_visible && session.is_visible(Overlay::Launcher) {
                        launcher.scroll_to_top();
                    }
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => break,
            }
        }

        // 2. Drain mixer snapshots.
        if let Some(mixer_rx) = &mixer_rx {
            let mut latest: Option<VolumeState> = None;
            while let Ok(state) = mixer_rx.try_recv() {
                latest = Some(state);
            }
            if let Some(state) = latest {
                if volume.borrow_mut().apply(state) {
                    views.sync_volume(&volume.borrow());
                }
            }
        }

        glib::ControlFlow::Continue
    });

    info!("entering GLib main loop");
    main_loop.run();
    info!("GLib main loop exited");

    if let Some(w) = watcher.as_mut() {
        w.shutdown();
    }
}

//  Helpers

fn set_background(window: &gtk4::Window, image: Option<&Path>) -> Result<(), glib::Error> {
    match image {
        Some(path) => {
            let texture = gdk::Texture::from_filename(path)?;
            let picture = gtk4::Picture::for_paintable(&texture);
            picture.set_content_fit(gtk4::ContentFit::Cover);
            window.set_child(Some(&picture));
            info!("background: {}", path.display());
        }
        None => {
            let fill = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
            fill.add_css_class("background-fill");
            fill.set_hexpand(true);
            fill.set_vexpand(true);
            window.set_child(Some(&fill));
        }
    }
    Ok(())
}

/// Report every button press and release on `window` to the session.
fn forward_clicks(window: &gtk4::Window, events: &mpsc::Sender<ShellEvent>) {
    let click = gtk4::GestureClick::new();
    click.set_button(0);
    let tx = events.clone();
    click.connect_pressed(move |g, _, _, _| {
        let _ = tx.send(ShellEvent::PointerButton {
            button: g.current_button(),
            state: ButtonState::Pressed,
        });
    });
    let tx = events.clone();
    click.connect_released(move |g, _, _, _| {
        let _ = tx.send(ShellEvent::PointerButton {
            button: g.current_button(),
            state: ButtonState::Released,
        });
    });
    window.add_controller(click);
}

fn first_monitor(display: &gdk::Display) -> Option<gdk::Monitor> {
    display
        .monitors()
        .item(0)
        .and_then(|obj| obj.downcast::<gdk::Monitor>().ok())
}

fn send_configure(monitor: &gdk::Monitor, events: &mpsc::Sender<ShellEvent>) {
    let geometry = monitor.geometry();
    let _ = events.send(ShellEvent::Configure {
        edges: 0,
        width: geometry.width(),
        height: geometry.height(),
    });
}

fn spawn_watcher(
    config: &Config,
) -> (Option<MixerWatcher>, Option<mpsc::Receiver<VolumeState>>) {
    let card = config.mixer.card.clone();
    let elements = config.mixer.elements.clone();
    match MixerWatcher::spawn(
        Box::new(move || mixer::open_default(&card, &elements)),
        config.mixer.poll_timeout(),
        config.mixer.channel_capacity,
    ) {
        Ok((watcher, rx)) => (Some(watcher), Some(rx)),
        Err(e) => {
            warn!("volume changes will not be tracked: {}", e);
            (None, None)
        }
    }
}
