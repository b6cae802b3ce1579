// Hide console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! Markpad - Main Entry Point
//!
//! A two-pane markdown editor with a live preview. Built with Rust and egui.

mod app;
mod config;
mod editor;
mod error;
mod export;
mod files;
mod markdown;
mod preview;
mod state;
mod ui;

use app::MarkpadApp;
use config::{load_config, Theme};
use log::info;

/// Application name constant.
const APP_NAME: &str = "Markpad";

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting {}", APP_NAME);

    let settings = load_config();
    let window_size = settings.window_size;

    info!(
        "Window configuration: {}x{}, maximized: {}",
        window_size.width, window_size.height, window_size.maximized
    );

    let viewport = egui::ViewportBuilder::default()
        .with_title(APP_NAME)
        .with_inner_size([window_size.width, window_size.height])
        .with_min_inner_size([400.0, 300.0])
        .with_maximized(window_size.maximized)
        .with_drag_and_drop(true);

    let native_options = eframe::NativeOptions {
        viewport,
        follow_system_theme: settings.theme == Theme::System,
        default_theme: match settings.theme {
            Theme::Light => eframe::Theme::Light,
            Theme::Dark | Theme::System => eframe::Theme::Dark,
        },
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(move |cc| Ok(Box::new(MarkpadApp::new(cc, settings)))),
    )
}
