//! Basecamp Analytics - Himalayan Expedition Dashboard
//!
//! A Rust application for exploring expedition trends from the top
//! climbing nations, across all time or a single year.

mod charts;
mod data;
mod gui;
mod views;

use eframe::egui;
use gui::BasecampApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 850.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("Basecamp Analytics"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Basecamp Analytics",
        options,
        Box::new(|cc| {
            // Install image loaders so the header image URL can render.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(BasecampApp::new(cc)))
        }),
    )
}
