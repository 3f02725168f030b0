//! Chart Plotter Module
//! Creates the four interactive dashboard views using egui_plot.

use egui::{Align2, Color32};
use egui_plot::{
    Bar, BarChart, Legend, Line, MarkerShape, Plot, PlotPoint, PlotPoints, Points, Text,
};

use crate::charts::geo;
use crate::views::DashboardViews;

/// Color palette for nations
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(255, 87, 34),  // Deep Orange
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

const CHART_HEIGHT: f32 = 320.0;

/// Creates dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Stable color for a nation, fixed by its slot in the top-nation order.
    pub fn nation_color(nation: &str, nations: &[String]) -> Color32 {
        nations
            .iter()
            .position(|n| n == nation)
            .map(|i| PALETTE[i % PALETTE.len()])
            .unwrap_or(Color32::GRAY)
    }

    /// Sequential blue scale for the map view, `t` in [0, 1].
    pub fn blues(t: f64) -> Color32 {
        let t = t.clamp(0.0, 1.0) as f32;
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color32::from_rgb(lerp(222, 8), lerp(235, 81), lerp(247, 156))
    }

    /// Peak names on the x-axis, ordered by total count across nations.
    pub(crate) fn peak_axis_order(views: &DashboardViews) -> Vec<String> {
        let mut totals: Vec<(String, u32)> = Vec::new();
        for row in &views.top_peaks {
            match totals.iter_mut().find(|(peak, _)| peak == &row.peak) {
                Some((_, count)) => *count += row.count,
                None => totals.push((row.peak.clone(), row.count)),
            }
        }
        totals.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        totals.into_iter().map(|(peak, _)| peak).collect()
    }

    /// Grouped bar chart: expeditions per peak, one bar group per peak,
    /// one color per nation.
    pub fn draw_top_peaks(ui: &mut egui::Ui, views: &DashboardViews) {
        let peak_labels = Self::peak_axis_order(views);
        if peak_labels.is_empty() {
            ui.label("No peaks matched the peak lookup for this view.");
            return;
        }

        let present_nations: Vec<String> = views
            .nations
            .iter()
            .filter(|n| views.top_peaks.iter().any(|row| &row.nation == *n))
            .cloned()
            .collect();

        let group_count = present_nations.len().max(1);
        let bar_width = 0.8 / group_count as f64;

        let labels = peak_labels.clone();
        Plot::new("top_peaks")
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Peak Name")
            .y_axis_label("Expeditions")
            .x_axis_formatter(move |mark, _range| {
                let value = mark.value;
                if (value - value.round()).abs() > 1e-6 {
                    return String::new();
                }
                let idx = value.round() as usize;
                if value >= 0.0 && idx < labels.len() {
                    labels[idx].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                for (slot, nation) in present_nations.iter().enumerate() {
                    let color = Self::nation_color(nation, &views.nations);
                    let offset =
                        (slot as f64 - (group_count as f64 - 1.0) / 2.0) * bar_width;

                    let bars: Vec<Bar> = views
                        .top_peaks
                        .iter()
                        .filter(|row| &row.nation == nation)
                        .filter_map(|row| {
                            let peak_idx =
                                peak_labels.iter().position(|p| p == &row.peak)?;
                            Some(
                                Bar::new(peak_idx as f64 + offset, row.count as f64)
                                    .width(bar_width * 0.95),
                            )
                        })
                        .collect();

                    plot_ui.bar_chart(BarChart::new(bars).color(color).name(nation));
                }
            });
    }

    /// Horizontal bar chart of per-nation summit success rates with
    /// percentage labels outside the bars.
    pub fn draw_success_rates(ui: &mut egui::Ui, views: &DashboardViews) {
        let rows = &views.success_rates;
        if rows.is_empty() {
            return;
        }

        let labels: Vec<String> = rows.iter().map(|r| r.nation.clone()).collect();

        Plot::new("success_rate")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Success Rate")
            .y_axis_label("Country")
            .include_x(0.0)
            .include_x(1.15)
            .x_axis_formatter(|mark, _range| {
                let value = mark.value;
                if (0.0..=1.0).contains(&value) {
                    format!("{:.0}%", value * 100.0)
                } else {
                    String::new()
                }
            })
            .y_axis_formatter(move |mark, _range| {
                let value = mark.value;
                if (value - value.round()).abs() > 1e-6 {
                    return String::new();
                }
                let idx = value.round() as usize;
                if value >= 0.0 && idx < labels.len() {
                    labels[idx].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                for (i, row) in rows.iter().enumerate() {
                    let color = Self::nation_color(&row.nation, &views.nations);
                    let bar = Bar::new(i as f64, row.rate).width(0.6);
                    plot_ui.bar_chart(
                        BarChart::new(vec![bar])
                            .horizontal()
                            .color(color)
                            .name(&row.nation),
                    );
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(row.rate + 0.02, i as f64),
                            format!("{:.1}%", row.rate * 100.0),
                        )
                        .anchor(Align2::LEFT_CENTER)
                        .color(color),
                    );
                }
            });
    }

    /// Multi-line chart: expeditions per year, one line per nation.
    pub fn draw_timeline(ui: &mut egui::Ui, views: &DashboardViews) {
        if views.timeline.is_empty() {
            return;
        }

        Plot::new("timeline")
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Year")
            .y_axis_label("Expeditions")
            .x_axis_formatter(|mark, _range| {
                let value = mark.value;
                if (value - value.round()).abs() > 1e-6 {
                    String::new()
                } else {
                    format!("{:.0}", value)
                }
            })
            .show(ui, |plot_ui| {
                for nation in &views.nations {
                    let points: Vec<[f64; 2]> = views
                        .timeline
                        .iter()
                        .filter(|row| &row.nation == nation)
                        .map(|row| [row.year as f64, row.count as f64])
                        .collect();
                    if points.is_empty() {
                        continue;
                    }

                    plot_ui.line(
                        Line::new(PlotPoints::from(points))
                            .color(Self::nation_color(nation, &views.nations))
                            .width(2.0)
                            .name(nation),
                    );
                }
            });
    }

    /// World-map view: one bubble per nation at its centroid, size and
    /// blue intensity encoding the expedition count. Nations without a
    /// centroid entry are left off the map.
    pub fn draw_world_map(ui: &mut egui::Ui, views: &DashboardViews) {
        let rows = &views.nation_counts;
        if rows.is_empty() {
            return;
        }
        let max_count = rows.iter().map(|r| r.count).max().unwrap_or(1).max(1);

        Plot::new("world_map")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .data_aspect(1.0)
            .show_axes([false, false])
            .show_grid([false, false])
            .include_x(-180.0)
            .include_x(180.0)
            .include_y(-60.0)
            .include_y(90.0)
            .show(ui, |plot_ui| {
                for row in rows {
                    let Some((lon, lat)) = geo::centroid(&row.nation) else {
                        log::debug!("No centroid for nation '{}'", row.nation);
                        continue;
                    };

                    let t = row.count as f64 / max_count as f64;
                    let radius = 4.0 + (t.sqrt() * 10.0) as f32;

                    plot_ui.points(
                        Points::new(PlotPoints::from(vec![[lon, lat]]))
                            .radius(radius)
                            .shape(MarkerShape::Circle)
                            .filled(true)
                            .color(Self::blues(t))
                            .name(format!("{} ({})", row.nation, row.count)),
                    );
                    plot_ui.text(
                        Text::new(PlotPoint::new(lon, lat), &row.nation)
                            .anchor(Align2::CENTER_TOP)
                            .color(Color32::GRAY),
                    );
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::PeakCount;

    #[test]
    fn nation_colors_are_stable_per_slot() {
        let nations = vec!["Nepal".to_string(), "Japan".to_string()];
        assert_eq!(ChartPlotter::nation_color("Nepal", &nations), PALETTE[0]);
        assert_eq!(ChartPlotter::nation_color("Japan", &nations), PALETTE[1]);
        assert_eq!(
            ChartPlotter::nation_color("Unknown", &nations),
            Color32::GRAY
        );
    }

    #[test]
    fn blues_scale_is_clamped() {
        assert_eq!(ChartPlotter::blues(-1.0), ChartPlotter::blues(0.0));
        assert_eq!(ChartPlotter::blues(2.0), ChartPlotter::blues(1.0));
    }

    #[test]
    fn peak_axis_orders_by_total_count() {
        let views = DashboardViews {
            top_peaks: vec![
                PeakCount {
                    nation: "Nepal".into(),
                    peak: "Ama Dablam".into(),
                    count: 2,
                },
                PeakCount {
                    nation: "Nepal".into(),
                    peak: "Everest".into(),
                    count: 3,
                },
                PeakCount {
                    nation: "Japan".into(),
                    peak: "Ama Dablam".into(),
                    count: 4,
                },
            ],
            ..Default::default()
        };
        assert_eq!(
            ChartPlotter::peak_axis_order(&views),
            vec!["Ama Dablam".to_string(), "Everest".to_string()]
        );
    }
}
