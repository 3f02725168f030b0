//! Dashboard Widget
//! Central scrollable panel with the total-count heading and chart cards.

use egui::{Color32, RichText, ScrollArea};

use crate::charts::ChartPlotter;
use crate::views::DashboardViews;

const CARD_SPACING: f32 = 15.0;

/// Scrollable chart display area. Holds the most recently computed views;
/// cleared whenever a new dataset starts loading.
pub struct Dashboard {
    pub views: Option<DashboardViews>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self { views: None }
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.views = None;
    }

    pub fn set_views(&mut self, views: DashboardViews) {
        self.views = Some(views);
    }

    pub fn has_views(&self) -> bool {
        self.views.is_some()
    }

    /// Draw the dashboard. The time-series card renders only when the
    /// aggregator produced a timeline (all-time scope); the warning label
    /// replaces every chart when the scoped frame was empty.
    pub fn show(&self, ui: &mut egui::Ui, loading: bool) {
        let Some(views) = &self.views else {
            ui.centered_and_justified(|ui| {
                let message = if loading {
                    "Loading expedition data..."
                } else {
                    "Select a data directory to begin"
                };
                ui.label(RichText::new(message).size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.add_space(5.0);
                ui.label(
                    RichText::new(
                        "Explore expedition trends from top nations across all time or a specific year.",
                    )
                    .size(13.0)
                    .color(Color32::GRAY),
                );
                ui.add_space(8.0);
                ui.label(
                    RichText::new(format!(
                        "Total Expeditions: {} ({})",
                        thousands(views.total),
                        views.scope_label
                    ))
                    .size(18.0)
                    .strong(),
                );
                ui.add_space(CARD_SPACING);

                if views.total == 0 {
                    ui.label(
                        RichText::new("No expeditions found for the selected view.")
                            .size(15.0)
                            .color(Color32::from_rgb(255, 193, 7)),
                    );
                    return;
                }

                Self::chart_card(
                    ui,
                    &format!("Top Peaks Climbed by Nation ({})", views.scope_label),
                    |ui| ChartPlotter::draw_top_peaks(ui, views),
                );
                Self::chart_card(
                    ui,
                    &format!("Summit Success Rate by Nation ({})", views.scope_label),
                    |ui| ChartPlotter::draw_success_rates(ui, views),
                );
                if !views.timeline.is_empty() {
                    Self::chart_card(ui, "Expeditions Over Time by Nation", |ui| {
                        ChartPlotter::draw_timeline(ui, views)
                    });
                }
                Self::chart_card(
                    ui,
                    &format!("Expeditions by Country ({})", views.scope_label),
                    |ui| ChartPlotter::draw_world_map(ui, views),
                );
            });
    }

    /// Draw a single framed chart card with a title.
    fn chart_card(ui: &mut egui::Ui, title: &str, add_chart: impl FnOnce(&mut egui::Ui)) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, Color32::from_gray(70)))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width() - 10.0);
                ui.vertical(|ui| {
                    ui.label(RichText::new(title).size(16.0).strong());
                    ui.add_space(8.0);
                    add_chart(ui);
                });
            });
        ui.add_space(CARD_SPACING);
    }
}

/// Format a count with thousands separators.
fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::thousands;

    #[test]
    fn thousands_separators() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(1234567), "1,234,567");
    }
}
