//! Data module - CSV loading and the filter stage

pub mod filter;
pub mod loader;

pub use filter::YearScope;
pub use loader::{load_dir, ExpeditionData, LoaderError};
