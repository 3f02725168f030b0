//! CSV Data Loader Module
//! Reads the expedition and peak tables from a data directory using Polars.

use polars::prelude::*;
use std::path::Path;
use thiserror::Error;

use super::filter::{self, FilterError};

/// Expedition file name inside the data directory.
pub const EXPED_FILE: &str = "exped.csv";
/// Peak lookup file name inside the data directory.
pub const PEAKS_FILE: &str = "peaks.csv";

/// Required columns of the expedition table.
pub const COL_NATION: &str = "nation";
pub const COL_YEAR: &str = "year";
pub const COL_PEAK_ID: &str = "peakid";
pub const COL_SUMMIT_MEMBERS: &str = "smtmembers";
/// Required columns of the peak table.
pub const COL_PEAK_NAME: &str = "pkname";

/// How many nations the dashboard keeps.
pub const TOP_NATION_COUNT: usize = 10;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("{file} is missing required column '{column}'")]
    MissingColumn { file: String, column: String },
    #[error("Expedition file has no rows")]
    NoData,
    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// A fully loaded dataset together with the products of the filter stage.
pub struct ExpeditionData {
    /// Raw expedition rows.
    pub expeditions: DataFrame,
    /// Peak id → display name lookup.
    pub peaks: DataFrame,
    /// The 10 most frequent nations, in descending frequency order.
    pub top_nations: Vec<String>,
    /// Expedition rows restricted to the top nations.
    pub filtered: DataFrame,
    /// Sorted distinct years with at least one filtered record.
    pub valid_years: Vec<i64>,
}

impl ExpeditionData {
    /// Inclusive bounds of the observed years.
    /// `None` only when the filtered frame itself is empty.
    pub fn year_bounds(&self) -> Option<(i64, i64)> {
        match (self.valid_years.first(), self.valid_years.last()) {
            (Some(&min), Some(&max)) => Some((min, max)),
            _ => None,
        }
    }
}

/// Load `exped.csv` and `peaks.csv` from `dir` and run the filter stage.
pub fn load_dir(dir: &Path) -> Result<ExpeditionData, LoaderError> {
    let expeditions = load_expeditions(&dir.join(EXPED_FILE))?;
    let peaks = load_peaks(&dir.join(PEAKS_FILE))?;

    if expeditions.height() == 0 {
        return Err(LoaderError::NoData);
    }

    let top_nations = filter::top_nations(&expeditions, TOP_NATION_COUNT)?;
    let filtered = filter::restrict_to_nations(&expeditions, &top_nations)?;
    let valid_years = filter::observed_years(&filtered)?;

    log::info!(
        "Loaded {} expeditions ({} after top-{} nation filter), {} peaks, years {:?}..{:?}",
        expeditions.height(),
        filtered.height(),
        TOP_NATION_COUNT,
        peaks.height(),
        valid_years.first(),
        valid_years.last(),
    );

    Ok(ExpeditionData {
        expeditions,
        peaks,
        top_nations,
        filtered,
        valid_years,
    })
}

fn load_expeditions(path: &Path) -> Result<DataFrame, LoaderError> {
    let df = scan_csv(path)?;
    require_columns(
        &df,
        path,
        &[COL_NATION, COL_YEAR, COL_PEAK_ID, COL_SUMMIT_MEMBERS],
    )?;

    // Inference can land on floats when a numeric column carries nulls;
    // pin the two numeric columns to Int64.
    let df = df
        .lazy()
        .with_columns([
            col(COL_YEAR).cast(DataType::Int64),
            col(COL_SUMMIT_MEMBERS).cast(DataType::Int64),
        ])
        .collect()?;

    Ok(df)
}

fn load_peaks(path: &Path) -> Result<DataFrame, LoaderError> {
    let df = scan_csv(path)?;
    require_columns(&df, path, &[COL_PEAK_ID, COL_PEAK_NAME])?;
    Ok(df)
}

/// Load a CSV file using Polars lazy scanning.
fn scan_csv(path: &Path) -> Result<DataFrame, LoaderError> {
    let df = LazyCsvReader::new(path.to_string_lossy().to_string())
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()?
        .collect()?;
    Ok(df)
}

fn require_columns(df: &DataFrame, path: &Path, columns: &[&str]) -> Result<(), LoaderError> {
    for column in columns {
        if df.column(column).is_err() {
            return Err(LoaderError::MissingColumn {
                file: path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string()),
                column: (*column).to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_fixtures(dir: &Path, exped: &str, peaks: &str) {
        fs::write(dir.join(EXPED_FILE), exped).unwrap();
        fs::write(dir.join(PEAKS_FILE), peaks).unwrap();
    }

    #[test]
    fn loads_a_well_formed_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_fixtures(
            dir.path(),
            "nation,year,peakid,smtmembers\n\
             Nepal,2019,EVER,4\n\
             Nepal,2020,EVER,\n\
             Japan,2019,AMAD,2\n",
            "peakid,pkname\nEVER,Everest\nAMAD,Ama Dablam\n",
        );

        let data = load_dir(dir.path()).unwrap();
        assert_eq!(data.expeditions.height(), 3);
        assert_eq!(data.peaks.height(), 2);
        assert_eq!(data.top_nations, vec!["Nepal", "Japan"]);
        assert_eq!(data.valid_years, vec![2019, 2020]);
        assert_eq!(data.year_bounds(), Some((2019, 2020)));

        // The empty smtmembers cell must come through as a null Int64.
        let smt = data
            .expeditions
            .column(COL_SUMMIT_MEMBERS)
            .unwrap()
            .i64()
            .unwrap();
        assert_eq!(smt.null_count(), 1);
    }

    #[test]
    fn rejects_a_file_with_a_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        write_fixtures(
            dir.path(),
            "nation,year,peakid\nNepal,2019,EVER\n",
            "peakid,pkname\nEVER,Everest\n",
        );

        let err = load_dir(dir.path()).unwrap_err();
        match err {
            LoaderError::MissingColumn { file, column } => {
                assert_eq!(file, EXPED_FILE);
                assert_eq!(column, COL_SUMMIT_MEMBERS);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_a_csv_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_dir(dir.path()),
            Err(LoaderError::CsvError(_))
        ));
    }
}
