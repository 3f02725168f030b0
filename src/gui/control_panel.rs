//! Control Panel Widget
//! Left side panel with the dashboard controls and status.

use egui::{Color32, RichText};
use std::path::PathBuf;

use crate::data::YearScope;

/// Header image shown above the controls.
const HERO_IMAGE_URL: &str =
    "https://cdn.britannica.com/74/114874-050-6E04C88C/North-Face-Mount-Everest-Tibet-Autonomous-Region.jpg";

/// Slider default before a dataset pins the observed range.
const DEFAULT_YEAR: i64 = 2024;

/// User settings driving the dashboard scope.
#[derive(Clone)]
pub struct UserSettings {
    pub data_dir: Option<PathBuf>,
    pub all_time: bool,
    pub selected_year: i64,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            data_dir: None,
            all_time: true,
            selected_year: DEFAULT_YEAR,
        }
    }
}

impl UserSettings {
    /// The year scope the current control values describe.
    pub fn scope(&self) -> YearScope {
        if self.all_time {
            YearScope::AllTime
        } else {
            YearScope::Year(self.selected_year)
        }
    }
}

/// Left side control panel with data source, year scope and export controls.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub year_bounds: Option<(i64, i64)>,
    pub status: String,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
            year_bounds: None,
            status: "Ready".to_string(),
            export_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the year slider to the observed range after a dataset loads.
    pub fn set_year_bounds(&mut self, bounds: Option<(i64, i64)>) {
        self.year_bounds = bounds;
        if let Some((min, max)) = bounds {
            self.settings.selected_year = self.settings.selected_year.clamp(min, max);
        }
    }

    /// Set the status line.
    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("Project Himalaya")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Basecamp Analytics")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(8.0);

        ui.add(
            egui::Image::new(HERO_IMAGE_URL)
                .max_width(ui.available_width())
                .max_height(140.0)
                .rounding(4.0),
        );
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let dir_text = self
                        .settings
                        .data_dir
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No directory selected".to_string());

                    ui.label(RichText::new(&dir_text).size(12.0).color(
                        if self.settings.data_dir.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Browse").clicked() {
                            action = ControlPanelAction::BrowseDataDir;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Year Select Section =====
        ui.label(RichText::new("Year Select").size(14.0).strong());
        ui.add_space(5.0);

        if ui
            .checkbox(&mut self.settings.all_time, "Show All Time Data")
            .changed()
        {
            action = ControlPanelAction::ScopeChanged;
        }

        if !self.settings.all_time {
            match self.year_bounds {
                Some((min, max)) => {
                    let slider = egui::Slider::new(&mut self.settings.selected_year, min..=max)
                        .text("Select a Year");
                    if ui.add(slider).changed() {
                        action = ControlPanelAction::ScopeChanged;
                    }
                }
                None => {
                    ui.label(
                        RichText::new("Load a dataset to choose a year")
                            .size(11.0)
                            .color(Color32::GRAY),
                    );
                }
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("Export Report").size(14.0))
                    .min_size(egui::vec2(160.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportReport;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Loaded") || self.status.contains("exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseDataDir,
    ScopeChanged,
    ExportReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_map_to_the_expected_scope() {
        let mut settings = UserSettings::default();
        assert_eq!(settings.scope(), YearScope::AllTime);

        settings.all_time = false;
        settings.selected_year = 1999;
        assert_eq!(settings.scope(), YearScope::Year(1999));
    }

    #[test]
    fn year_bounds_clamp_the_selected_year() {
        let mut panel = ControlPanel::new();
        panel.settings.selected_year = 2024;
        panel.set_year_bounds(Some((1950, 2010)));
        assert_eq!(panel.settings.selected_year, 2010);

        panel.settings.selected_year = 1900;
        panel.set_year_bounds(Some((1950, 2010)));
        assert_eq!(panel.settings.selected_year, 1950);

        // No bounds leaves the selection alone.
        panel.settings.selected_year = 2005;
        panel.set_year_bounds(None);
        assert_eq!(panel.settings.selected_year, 2005);
    }
}
