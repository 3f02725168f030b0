//! Static Report Renderer
//! Renders the current dashboard views into a single 2x2 PNG report
//! using plotters' bitmap backend.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::charts::geo;
use crate::charts::plotter::ChartPlotter;
use crate::views::DashboardViews;

const REPORT_WIDTH: u32 = 1600;
const REPORT_HEIGHT: u32 = 1200;
const CAPTION_FONT: (&str, u32) = ("sans-serif", 24);

fn rgb(color: egui::Color32) -> RGBColor {
    RGBColor(color.r(), color.g(), color.b())
}

/// Renders the dashboard views to a static PNG report.
pub struct ReportRenderer;

impl ReportRenderer {
    pub fn render_report(views: &DashboardViews, path: &Path) -> Result<()> {
        let root = BitMapBackend::new(path, (REPORT_WIDTH, REPORT_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| anyhow!("{e}"))?;

        let quads = root.split_evenly((2, 2));
        Self::draw_top_peaks(&quads[0], views).context("top-peaks chart")?;
        Self::draw_success_rates(&quads[1], views).context("success-rate chart")?;
        Self::draw_timeline(&quads[2], views).context("timeline chart")?;
        Self::draw_world_map(&quads[3], views).context("world-map chart")?;

        root.present().map_err(|e| anyhow!("{e}"))?;
        log::info!("Report written to {}", path.display());
        Ok(())
    }

    fn draw_top_peaks<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        views: &DashboardViews,
    ) -> Result<()> {
        let peak_labels = ChartPlotter::peak_axis_order(views);
        if peak_labels.is_empty() {
            return Self::draw_placeholder(area, "No peak data for this view");
        }

        let max = views
            .top_peaks
            .iter()
            .map(|row| row.count)
            .max()
            .unwrap_or(1) as f64;

        let mut chart = ChartBuilder::on(area)
            .caption(
                format!("Top Peaks Climbed by Nation ({})", views.scope_label),
                CAPTION_FONT,
            )
            .margin(10)
            .x_label_area_size(80)
            .y_label_area_size(60)
            .build_cartesian_2d(-0.5f64..peak_labels.len() as f64 - 0.5, 0f64..max * 1.15)
            .map_err(|e| anyhow!("{e}"))?;

        let labels = peak_labels.clone();
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(peak_labels.len())
            .x_label_formatter(&move |value| {
                let idx = value.round();
                if (value - idx).abs() > 1e-6 || idx < 0.0 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .x_desc("Peak Name")
            .y_desc("Expeditions")
            .draw()
            .map_err(|e| anyhow!("{e}"))?;

        let present_nations: Vec<String> = views
            .nations
            .iter()
            .filter(|n| views.top_peaks.iter().any(|row| &row.nation == *n))
            .cloned()
            .collect();
        let group_count = present_nations.len().max(1);
        let bar_width = 0.8 / group_count as f64;

        for (slot, nation) in present_nations.iter().enumerate() {
            let color = rgb(ChartPlotter::nation_color(nation, &views.nations));
            let offset = (slot as f64 - (group_count as f64 - 1.0) / 2.0) * bar_width;

            let bars: Vec<Rectangle<(f64, f64)>> = views
                .top_peaks
                .iter()
                .filter(|row| &row.nation == nation)
                .filter_map(|row| {
                    let idx = peak_labels.iter().position(|p| p == &row.peak)? as f64;
                    let x0 = idx + offset - bar_width * 0.45;
                    let x1 = idx + offset + bar_width * 0.45;
                    Some(Rectangle::new(
                        [(x0, 0.0), (x1, row.count as f64)],
                        color.filled(),
                    ))
                })
                .collect();

            chart
                .draw_series(bars)
                .map_err(|e| anyhow!("{e}"))?
                .label(nation.clone())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                });
        }

        chart
            .configure_series_labels()
            .border_style(BLACK)
            .background_style(WHITE.mix(0.8))
            .draw()
            .map_err(|e| anyhow!("{e}"))?;
        Ok(())
    }

    fn draw_success_rates<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        views: &DashboardViews,
    ) -> Result<()> {
        let rows = &views.success_rates;
        if rows.is_empty() {
            return Self::draw_placeholder(area, "No success-rate data for this view");
        }

        let mut chart = ChartBuilder::on(area)
            .caption(
                format!("Summit Success Rate by Nation ({})", views.scope_label),
                CAPTION_FONT,
            )
            .margin(10)
            .x_label_area_size(50)
            .y_label_area_size(120)
            .build_cartesian_2d(0f64..1.15, -0.5f64..rows.len() as f64 - 0.5)
            .map_err(|e| anyhow!("{e}"))?;

        let labels: Vec<String> = rows.iter().map(|r| r.nation.clone()).collect();
        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(rows.len())
            .y_label_formatter(&move |value| {
                let idx = value.round();
                if (value - idx).abs() > 1e-6 || idx < 0.0 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .x_label_formatter(&|value| {
                if *value > 1.0 {
                    String::new()
                } else {
                    format!("{:.0}%", value * 100.0)
                }
            })
            .x_desc("Success Rate")
            .y_desc("Country")
            .draw()
            .map_err(|e| anyhow!("{e}"))?;

        for (i, row) in rows.iter().enumerate() {
            let color = rgb(ChartPlotter::nation_color(&row.nation, &views.nations));
            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(0.0, i as f64 - 0.3), (row.rate, i as f64 + 0.3)],
                    color.filled(),
                )))
                .map_err(|e| anyhow!("{e}"))?;
            chart
                .draw_series(std::iter::once(Text::new(
                    format!("{:.1}%", row.rate * 100.0),
                    (row.rate + 0.01, i as f64),
                    ("sans-serif", 14),
                )))
                .map_err(|e| anyhow!("{e}"))?;
        }
        Ok(())
    }

    fn draw_timeline<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        views: &DashboardViews,
    ) -> Result<()> {
        let rows = &views.timeline;
        if rows.is_empty() {
            return Self::draw_placeholder(area, "Time series is available in all-time view");
        }

        let min_year = rows.iter().map(|r| r.year).min().unwrap_or(0) as f64;
        let max_year = rows.iter().map(|r| r.year).max().unwrap_or(1) as f64;
        let max_count = rows.iter().map(|r| r.count).max().unwrap_or(1) as f64;

        let mut chart = ChartBuilder::on(area)
            .caption("Expeditions Over Time by Nation", CAPTION_FONT)
            .margin(10)
            .x_label_area_size(50)
            .y_label_area_size(60)
            // Half-year padding keeps the range non-degenerate when every
            // record falls in a single year.
            .build_cartesian_2d(min_year - 0.5..max_year + 0.5, 0f64..max_count * 1.1)
            .map_err(|e| anyhow!("{e}"))?;

        chart
            .configure_mesh()
            .x_label_formatter(&|value| format!("{:.0}", value))
            .x_desc("Year")
            .y_desc("Expeditions")
            .draw()
            .map_err(|e| anyhow!("{e}"))?;

        for nation in &views.nations {
            let points: Vec<(f64, f64)> = rows
                .iter()
                .filter(|row| &row.nation == nation)
                .map(|row| (row.year as f64, row.count as f64))
                .collect();
            if points.is_empty() {
                continue;
            }

            let color = rgb(ChartPlotter::nation_color(nation, &views.nations));
            chart
                .draw_series(LineSeries::new(points, color.stroke_width(2)))
                .map_err(|e| anyhow!("{e}"))?
                .label(nation.clone())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 10, y)], color.stroke_width(2))
                });
        }

        chart
            .configure_series_labels()
            .border_style(BLACK)
            .background_style(WHITE.mix(0.8))
            .draw()
            .map_err(|e| anyhow!("{e}"))?;
        Ok(())
    }

    fn draw_world_map<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        views: &DashboardViews,
    ) -> Result<()> {
        let rows = &views.nation_counts;
        if rows.is_empty() {
            return Self::draw_placeholder(area, "No map data for this view");
        }
        let max_count = rows.iter().map(|r| r.count).max().unwrap_or(1).max(1);

        let mut chart = ChartBuilder::on(area)
            .caption(
                format!("Expeditions by Country ({})", views.scope_label),
                CAPTION_FONT,
            )
            .margin(10)
            .build_cartesian_2d(-180f64..180f64, -60f64..90f64)
            .map_err(|e| anyhow!("{e}"))?;

        for row in rows {
            let Some((lon, lat)) = geo::centroid(&row.nation) else {
                continue;
            };
            let t = row.count as f64 / max_count as f64;
            let radius = 4 + (t.sqrt() * 10.0) as i32;
            let color = rgb(ChartPlotter::blues(t));

            chart
                .draw_series(std::iter::once(Circle::new((lon, lat), radius, color.filled())))
                .map_err(|e| anyhow!("{e}"))?;
            chart
                .draw_series(std::iter::once(Text::new(
                    row.nation.clone(),
                    (lon, lat - 4.0),
                    ("sans-serif", 12),
                )))
                .map_err(|e| anyhow!("{e}"))?;
        }
        Ok(())
    }

    fn draw_placeholder<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        message: &str,
    ) -> Result<()> {
        area.draw(&Text::new(
            message.to_string(),
            (60, 60),
            ("sans-serif", 18),
        ))
        .map_err(|e| anyhow!("{e}"))?;
        Ok(())
    }
}
