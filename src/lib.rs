pub mod billing;
pub mod config;
pub mod db;
pub mod desk;
pub mod error;
pub mod form;
pub mod logging;
pub mod models;
pub mod receipt;
pub mod rooms;

#[cfg(feature = "desktop")]
mod commands;


pub use crate::config::DeskConfig;
pub use crate::desk::FrontDesk;
pub use crate::error::{DeskError, DeskResult};

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use commands::{bills, rooms};
    use tauri::{
        menu::{Menu, MenuItem},
        tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
        Manager,
    };

    let result = tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            let mut config = DeskConfig::load(None)?;
            logging::init(&config.log_level);

            // Relative paths live in the app data directory
            let app_dir = app.path().app_data_dir()?;
            config.resolve_paths(&app_dir);

            let desk = FrontDesk::open(&config)?;
            app.manage(desk);

            let show = MenuItem::with_id(app, "show", "Show Front Desk", true, None::<&str>)?;
            let quit = MenuItem::with_id(app, "quit", "Quit", true, None::<&str>)?;
            let menu = Menu::with_items(app, &[&show, &quit])?;

            let mut tray = TrayIconBuilder::with_id("front-desk")
                .tooltip("Hotel Front Desk")
                .menu(&menu)
                .show_menu_on_left_click(false)
                .on_tray_icon_event(|tray, event| {
                    if let TrayIconEvent::Click {
                        button: MouseButton::Left,
                        button_state: MouseButtonState::Up,
                        ..
                    } = event
                    {
                        desk_window(tray.app_handle(), WindowAction::Toggle);
                    }
                })
                .on_menu_event(|app, event| match event.id.as_ref() {
                    "show" => desk_window(app, WindowAction::Show),
                    "quit" => {
                        tracing::info!("front desk closed from tray");
                        app.exit(0);
                    }
                    _ => {}
                });
            if let Some(icon) = app.default_window_icon() {
                tray = tray.icon(icon.clone());
            }
            tray.build(app)?;

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Rooms
            rooms::list_rooms,
            rooms::select_room,
            rooms::checkout_room,
            rooms::room_history,
            // Bills
            bills::generate_bill,
            bills::settle_and_checkout,
            bills::print_receipt,
            bills::get_bill,
            bills::list_bills,
        ])
        .run(tauri::generate_context!());

    if let Err(e) = result {
        tracing::error!(error = %e, "front desk exited with an error");
        std::process::exit(1);
    }
}

#[cfg(feature = "desktop")]
enum WindowAction {
    Show,
    Toggle,
}

/// Brings the dashboard forward, or hides it again on a second tray click.
#[cfg(feature = "desktop")]
fn desk_window(app: &tauri::AppHandle, action: WindowAction) {
    use tauri::Manager;

    let Some(window) = app.get_webview_window("main") else {
        tracing::warn!("dashboard window is not available");
        return;
    };
    let visible = window.is_visible().unwrap_or(false);
    if visible && matches!(action, WindowAction::Toggle) {
        let _ = window.hide();
    } else {
        let _ = window.show();
        let _ = window.unminimize();
        let _ = window.set_focus();
    }
}
