//! Views module - summary aggregation behind the dashboard

mod aggregator;

pub use aggregator::{
    Aggregator, AggregateError, DashboardViews, NationCount, PeakCount, SuccessRate, YearCount,
};
