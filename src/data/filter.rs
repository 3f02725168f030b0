//! Filter Stage Module
//! Restricts the expedition table to the most frequent nations and applies
//! the user's year scope.

use polars::prelude::*;
use thiserror::Error;

use super::loader::{COL_NATION, COL_YEAR};

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// The user's year selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearScope {
    AllTime,
    Year(i64),
}

impl YearScope {
    /// Label interpolated into chart titles and the total-count heading.
    pub fn label(&self) -> String {
        match self {
            YearScope::AllTime => "All Time".to_string(),
            YearScope::Year(year) => year.to_string(),
        }
    }
}

/// The `k` most frequent nation values, descending by record count.
/// Ties break alphabetically so the ordering is deterministic.
pub fn top_nations(exped: &DataFrame, k: usize) -> Result<Vec<String>, FilterError> {
    let counts = exped
        .clone()
        .lazy()
        .group_by([col(COL_NATION)])
        .agg([len().alias("count")])
        .sort(
            ["count", COL_NATION],
            SortMultipleOptions::default().with_order_descending_multi([true, false]),
        )
        .limit(k as IdxSize)
        .collect()?;

    let nations = counts.column(COL_NATION)?.str()?;
    Ok(nations
        .into_iter()
        .flatten()
        .map(|s| s.to_string())
        .collect())
}

/// Retain only rows whose nation is in `nations`.
pub fn restrict_to_nations(
    exped: &DataFrame,
    nations: &[String],
) -> Result<DataFrame, FilterError> {
    let members = Series::new("nations".into(), nations);
    let df = exped
        .clone()
        .lazy()
        .filter(col(COL_NATION).is_in(lit(members)))
        .collect()?;
    Ok(df)
}

/// Sorted distinct years with at least one record.
pub fn observed_years(filtered: &DataFrame) -> Result<Vec<i64>, FilterError> {
    let years = filtered.column(COL_YEAR)?.i64()?;
    let mut out: Vec<i64> = years.into_iter().flatten().collect();
    out.sort_unstable();
    out.dedup();
    Ok(out)
}

/// Apply the year scope to the nation-filtered frame.
///
/// A selected year absent from `valid_years` is not an error: it degrades
/// to an empty frame and the presenter shows a warning instead of charts.
pub fn apply_scope(
    filtered: &DataFrame,
    valid_years: &[i64],
    scope: YearScope,
) -> Result<DataFrame, FilterError> {
    match scope {
        YearScope::AllTime => Ok(filtered.clone()),
        YearScope::Year(year) if valid_years.contains(&year) => {
            let df = filtered
                .clone()
                .lazy()
                .filter(col(COL_YEAR).eq(lit(year)))
                .collect()?;
            Ok(df)
        }
        YearScope::Year(_) => Ok(filtered.clear()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn sample() -> DataFrame {
        df!(
            COL_NATION => ["Nepal", "Nepal", "Nepal", "Japan", "Japan", "UK"],
            COL_YEAR => [2018i64, 2018, 2020, 2018, 2020, 2020],
            "peakid" => ["EVER", "EVER", "AMAD", "EVER", "AMAD", "EVER"],
            "smtmembers" => [Some(2i64), None, Some(0), Some(1), None, Some(3)],
        )
        .unwrap()
    }

    #[test]
    fn top_nations_orders_by_frequency() {
        let exped = sample();
        assert_eq!(
            top_nations(&exped, 2).unwrap(),
            vec!["Nepal".to_string(), "Japan".to_string()]
        );
        // Asking for more than exist returns them all.
        assert_eq!(top_nations(&exped, 10).unwrap().len(), 3);
    }

    #[test]
    fn restrict_drops_other_nations() {
        let exped = sample();
        let top = vec!["Nepal".to_string(), "Japan".to_string()];
        let filtered = restrict_to_nations(&exped, &top).unwrap();
        assert_eq!(filtered.height(), 5);

        let nations = filtered.column(COL_NATION).unwrap().str().unwrap();
        assert!(nations.into_iter().flatten().all(|n| n != "UK"));
    }

    #[test]
    fn observed_years_are_sorted_and_distinct() {
        let filtered = sample();
        assert_eq!(observed_years(&filtered).unwrap(), vec![2018, 2020]);
    }

    #[test]
    fn single_year_scope_keeps_only_that_year() {
        let filtered = sample();
        let years = observed_years(&filtered).unwrap();
        let scoped = apply_scope(&filtered, &years, YearScope::Year(2018)).unwrap();
        assert_eq!(scoped.height(), 3);

        let year_col = scoped.column(COL_YEAR).unwrap().i64().unwrap();
        assert!(year_col.into_iter().flatten().all(|y| y == 2018));
    }

    #[test]
    fn year_outside_the_observed_set_is_empty_not_an_error() {
        let filtered = sample();
        let years = observed_years(&filtered).unwrap();
        // 2019 lies inside the bounds but has no records; 1900 is out of range.
        for year in [2019, 1900] {
            let scoped = apply_scope(&filtered, &years, YearScope::Year(year)).unwrap();
            assert_eq!(scoped.height(), 0);
        }
    }

    #[test]
    fn all_time_scope_is_a_passthrough() {
        let filtered = sample();
        let years = observed_years(&filtered).unwrap();
        let scoped = apply_scope(&filtered, &years, YearScope::AllTime).unwrap();
        assert_eq!(scoped.height(), filtered.height());
    }

    #[test]
    fn scope_labels() {
        assert_eq!(YearScope::AllTime.label(), "All Time");
        assert_eq!(YearScope::Year(2024).label(), "2024");
    }
}
