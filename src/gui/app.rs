//! Basecamp Analytics Main Application
//! Main window with sidebar controls and the chart dashboard.

use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::thread;

use egui::SidePanel;

use crate::charts::ReportRenderer;
use crate::data::{self, filter, ExpeditionData, YearScope};
use crate::gui::{ControlPanel, ControlPanelAction, Dashboard};
use crate::views::Aggregator;

/// Dataset loading result from the background thread
enum LoadResult {
    Progress(String),
    Complete(Box<ExpeditionData>),
    Error(String),
}

/// Main application window.
pub struct BasecampApp {
    control_panel: ControlPanel,
    dashboard: Dashboard,
    dataset: Option<ExpeditionData>,

    /// Scope the current dashboard views were computed for.
    computed_scope: Option<YearScope>,

    // Async dataset loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl BasecampApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let mut app = Self {
            control_panel: ControlPanel::new(),
            dashboard: Dashboard::new(),
            dataset: None,
            computed_scope: None,
            load_rx: None,
            is_loading: false,
        };

        // Auto-load the conventional data directory when present.
        let default_dir = PathBuf::from("data");
        if default_dir.is_dir() {
            app.start_load(default_dir);
        }
        app
    }

    /// Handle data directory selection.
    fn handle_browse(&mut self) {
        if self.is_loading {
            return; // Already loading
        }

        if let Some(dir) = rfd::FileDialog::new()
            .set_title("Select data directory")
            .pick_folder()
        {
            self.start_load(dir);
        }
    }

    /// Load the expedition files in a background thread.
    fn start_load(&mut self, dir: PathBuf) {
        self.dashboard.clear();
        self.computed_scope = None;
        self.control_panel.settings.data_dir = Some(dir.clone());
        self.control_panel.export_enabled = false;
        self.control_panel.set_status("Loading expedition files...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress(
                "Reading expedition files...".to_string(),
            ));
            match data::load_dir(&dir) {
                Ok(dataset) => {
                    let _ = tx.send(LoadResult::Complete(Box::new(dataset)));
                }
                Err(e) => {
                    log::error!("Failed to load {}: {e}", dir.display());
                    let _ = tx.send(LoadResult::Error(e.to_string()));
                }
            }
        });
    }

    /// Check for dataset loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(status) => {
                        self.control_panel.set_status(&status);
                    }
                    LoadResult::Complete(dataset) => {
                        self.control_panel.set_year_bounds(dataset.year_bounds());
                        self.control_panel.set_status(&format!(
                            "Loaded {} of {} expeditions across the top {} nations",
                            dataset.filtered.height(),
                            dataset.expeditions.height(),
                            dataset.top_nations.len()
                        ));
                        self.dataset = Some(*dataset);
                        self.computed_scope = None;
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(error) => {
                        self.control_panel.set_status(&format!("Error: {error}"));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            // Put receiver back if still needed
            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    /// Rebuild the dashboard views when the scope changed since last frame.
    fn refresh_views(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };

        let scope = self.control_panel.settings.scope();
        if self.computed_scope == Some(scope) && self.dashboard.has_views() {
            return;
        }

        let scoped = match filter::apply_scope(&dataset.filtered, &dataset.valid_years, scope) {
            Ok(df) => df,
            Err(e) => {
                self.control_panel.set_status(&format!("Error: {e}"));
                return;
            }
        };

        match Aggregator::build(&scoped, &dataset.peaks, &dataset.top_nations, scope) {
            Ok(views) => {
                self.control_panel.export_enabled = views.total > 0;
                self.dashboard.set_views(views);
                self.computed_scope = Some(scope);
            }
            Err(e) => {
                self.control_panel.set_status(&format!("Error: {e}"));
            }
        }
    }

    /// Handle report export - render current views to a PNG.
    fn handle_export(&mut self) {
        let Some(views) = &self.dashboard.views else {
            self.control_panel.set_status("No charts to export");
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name("basecamp_report.png")
            .save_file()
        else {
            return; // User cancelled
        };

        match ReportRenderer::render_report(views, &path) {
            Ok(()) => {
                self.control_panel
                    .set_status(&format!("Report exported to {}", path.display()));
                if let Err(e) = open::that(&path) {
                    log::warn!("Could not open exported report: {e}");
                }
            }
            Err(e) => {
                self.control_panel.set_status(&format!("Error: {e:#}"));
            }
        }
    }
}

impl eframe::App for BasecampApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseDataDir => self.handle_browse(),
                        ControlPanelAction::ScopeChanged => {
                            // Picked up by refresh_views below.
                        }
                        ControlPanelAction::ExportReport => self.handle_export(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        self.refresh_views();

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            self.dashboard.show(ui, self.is_loading);
        });
    }
}
