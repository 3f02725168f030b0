//! Charts module - interactive plotting, static report rendering, geo lookup

pub mod geo;
mod plotter;
mod renderer;

pub use plotter::ChartPlotter;
pub use renderer::ReportRenderer;
