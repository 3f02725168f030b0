//! View Aggregator Module
//! Derives the four dashboard summary tables from the scoped expedition frame.

use polars::prelude::*;
use thiserror::Error;

use crate::data::filter::YearScope;
use crate::data::loader::{
    COL_NATION, COL_PEAK_ID, COL_PEAK_NAME, COL_SUMMIT_MEMBERS, COL_YEAR,
};

/// How many peaks each nation keeps in the top-peaks view.
pub const TOP_PEAKS_PER_NATION: usize = 5;

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// One bar of the top-peaks view.
#[derive(Debug, Clone, PartialEq)]
pub struct PeakCount {
    pub nation: String,
    pub peak: String,
    pub count: u32,
}

/// One bar of the success-rate view. `rate` is the share of expeditions
/// with at least one summiting member, always in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct SuccessRate {
    pub nation: String,
    pub rate: f64,
}

/// One point of the expeditions-over-time view.
#[derive(Debug, Clone, PartialEq)]
pub struct YearCount {
    pub year: i64,
    pub nation: String,
    pub count: u32,
}

/// One entry of the world-map view.
#[derive(Debug, Clone, PartialEq)]
pub struct NationCount {
    pub nation: String,
    pub count: u32,
}

/// All summary tables for one render pass. Built fresh on every scope
/// change, never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct DashboardViews {
    pub scope_label: String,
    /// Top nations in descending frequency order; fixes per-nation colors.
    pub nations: Vec<String>,
    pub total: usize,
    pub top_peaks: Vec<PeakCount>,
    pub success_rates: Vec<SuccessRate>,
    /// Populated only for the all-time scope.
    pub timeline: Vec<YearCount>,
    pub nation_counts: Vec<NationCount>,
}

/// Runs the four grouping operations over the scoped frame.
pub struct Aggregator;

impl Aggregator {
    /// Build all views. A zero-row frame short-circuits to empty views so
    /// the presenter can take the warning path without touching polars.
    pub fn build(
        scoped: &DataFrame,
        peaks: &DataFrame,
        top_nations: &[String],
        scope: YearScope,
    ) -> Result<DashboardViews, AggregateError> {
        let total = scoped.height();
        let mut views = DashboardViews {
            scope_label: scope.label(),
            nations: top_nations.to_vec(),
            total,
            ..Default::default()
        };
        if total == 0 {
            return Ok(views);
        }

        // The four builders are independent; fan them out.
        let (top_peaks, (success_rates, (timeline, nation_counts))) = rayon::join(
            || Self::top_peaks(scoped, peaks),
            || {
                rayon::join(
                    || Self::success_rates(scoped),
                    || {
                        rayon::join(
                            || Self::timeline(scoped, scope),
                            || Self::nation_counts(scoped),
                        )
                    },
                )
            },
        );

        views.top_peaks = top_peaks?;
        views.success_rates = success_rates?;
        views.timeline = timeline?;
        views.nation_counts = nation_counts?;
        Ok(views)
    }

    /// Expedition counts per (nation, peak), joined against the peak-name
    /// lookup. Unmatched peak ids are dropped; each nation keeps its 5
    /// highest counts.
    fn top_peaks(scoped: &DataFrame, peaks: &DataFrame) -> Result<Vec<PeakCount>, AggregateError> {
        let df = scoped
            .clone()
            .lazy()
            .group_by([col(COL_NATION), col(COL_PEAK_ID)])
            .agg([len().alias("count")])
            .join(
                peaks
                    .clone()
                    .lazy()
                    .select([col(COL_PEAK_ID), col(COL_PEAK_NAME)]),
                [col(COL_PEAK_ID)],
                [col(COL_PEAK_ID)],
                JoinArgs::new(JoinType::Left),
            )
            .drop_nulls(Some(vec![col(COL_PEAK_NAME)]))
            .sort(
                ["count", COL_PEAK_NAME],
                SortMultipleOptions::default().with_order_descending_multi([true, false]),
            )
            .group_by_stable([col(COL_NATION)])
            .head(Some(TOP_PEAKS_PER_NATION))
            .collect()?;

        let nations = df.column(COL_NATION)?.str()?;
        let names = df.column(COL_PEAK_NAME)?.str()?;
        let counts = df.column("count")?.u32()?;

        let mut rows = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            if let (Some(nation), Some(peak), Some(count)) =
                (nations.get(i), names.get(i), counts.get(i))
            {
                rows.push(PeakCount {
                    nation: nation.to_string(),
                    peak: peak.to_string(),
                    count,
                });
            }
        }
        Ok(rows)
    }

    /// Per-nation mean of the success flag, ascending by rate so the
    /// longest horizontal bar lands at the top of the chart. A null
    /// summit-member count is a failed expedition.
    fn success_rates(scoped: &DataFrame) -> Result<Vec<SuccessRate>, AggregateError> {
        let df = scoped
            .clone()
            .lazy()
            .with_column(
                col(COL_SUMMIT_MEMBERS)
                    .fill_null(lit(0))
                    .gt(lit(0))
                    .alias("was_successful"),
            )
            .group_by([col(COL_NATION)])
            .agg([col("was_successful")
                .cast(DataType::Float64)
                .mean()
                .alias("success_rate")])
            .sort(["success_rate", COL_NATION], SortMultipleOptions::default())
            .collect()?;

        let nations = df.column(COL_NATION)?.str()?;
        let rates = df.column("success_rate")?.f64()?;

        let mut rows = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            if let (Some(nation), Some(rate)) = (nations.get(i), rates.get(i)) {
                rows.push(SuccessRate {
                    nation: nation.to_string(),
                    rate,
                });
            }
        }
        Ok(rows)
    }

    /// Expedition counts per (year, nation), all-time scope only.
    fn timeline(scoped: &DataFrame, scope: YearScope) -> Result<Vec<YearCount>, AggregateError> {
        if scope != YearScope::AllTime {
            return Ok(Vec::new());
        }

        let df = scoped
            .clone()
            .lazy()
            .group_by([col(COL_YEAR), col(COL_NATION)])
            .agg([len().alias("count")])
            .sort([COL_YEAR, COL_NATION], SortMultipleOptions::default())
            .collect()?;

        let years = df.column(COL_YEAR)?.i64()?;
        let nations = df.column(COL_NATION)?.str()?;
        let counts = df.column("count")?.u32()?;

        let mut rows = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            if let (Some(year), Some(nation), Some(count)) =
                (years.get(i), nations.get(i), counts.get(i))
            {
                rows.push(YearCount {
                    year,
                    nation: nation.to_string(),
                    count,
                });
            }
        }
        Ok(rows)
    }

    /// Total expedition count per nation, descending.
    fn nation_counts(scoped: &DataFrame) -> Result<Vec<NationCount>, AggregateError> {
        let df = scoped
            .clone()
            .lazy()
            .group_by([col(COL_NATION)])
            .agg([len().alias("count")])
            .sort(
                ["count", COL_NATION],
                SortMultipleOptions::default().with_order_descending_multi([true, false]),
            )
            .collect()?;

        let nations = df.column(COL_NATION)?.str()?;
        let counts = df.column("count")?.u32()?;

        let mut rows = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            if let (Some(nation), Some(count)) = (nations.get(i), counts.get(i)) {
                rows.push(NationCount {
                    nation: nation.to_string(),
                    count,
                });
            }
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn peaks() -> DataFrame {
        df!(
            COL_PEAK_ID => ["EVER", "AMAD", "CHOY", "DHA1", "MAKA", "LHOT", "MANA", "ANN1"],
            COL_PEAK_NAME => [
                "Everest", "Ama Dablam", "Cho Oyu", "Dhaulagiri I",
                "Makalu", "Lhotse", "Manaslu", "Annapurna I",
            ],
        )
        .unwrap()
    }

    fn scoped() -> DataFrame {
        df!(
            COL_NATION => ["Nepal", "Nepal", "Nepal", "Japan", "Japan", "Japan"],
            COL_YEAR => [2018i64, 2018, 2020, 2018, 2020, 2020],
            COL_PEAK_ID => ["EVER", "EVER", "AMAD", "EVER", "AMAD", "CHOY"],
            COL_SUMMIT_MEMBERS => [Some(2i64), None, Some(0), Some(1), Some(4), None],
        )
        .unwrap()
    }

    fn nations() -> Vec<String> {
        vec!["Nepal".to_string(), "Japan".to_string()]
    }

    #[test]
    fn zero_rows_short_circuit_to_empty_views() {
        let empty = scoped().clear();
        let views =
            Aggregator::build(&empty, &peaks(), &nations(), YearScope::Year(1900)).unwrap();
        assert_eq!(views.total, 0);
        assert!(views.top_peaks.is_empty());
        assert!(views.success_rates.is_empty());
        assert!(views.timeline.is_empty());
        assert!(views.nation_counts.is_empty());
        assert_eq!(views.scope_label, "1900");
    }

    #[test]
    fn top_peaks_never_exceed_five_per_nation() {
        // Six distinct peaks for one nation; only five may survive.
        let scoped = df!(
            COL_NATION => ["Nepal"; 9],
            COL_YEAR => [2020i64; 9],
            COL_PEAK_ID => ["EVER", "EVER", "EVER", "AMAD", "AMAD", "CHOY", "DHA1", "MAKA", "LHOT"],
            COL_SUMMIT_MEMBERS => [Some(1i64); 9],
        )
        .unwrap();

        let views =
            Aggregator::build(&scoped, &peaks(), &nations(), YearScope::AllTime).unwrap();
        let nepal: Vec<_> = views
            .top_peaks
            .iter()
            .filter(|p| p.nation == "Nepal")
            .collect();
        assert_eq!(nepal.len(), TOP_PEAKS_PER_NATION);
        // Highest counts first: Everest (3) then Ama Dablam (2).
        assert_eq!(nepal[0].peak, "Everest");
        assert_eq!(nepal[0].count, 3);
        assert_eq!(nepal[1].peak, "Ama Dablam");
    }

    #[test]
    fn top_peaks_drop_unmatched_peak_ids() {
        let scoped = df!(
            COL_NATION => ["Nepal", "Nepal"],
            COL_YEAR => [2020i64, 2020],
            COL_PEAK_ID => ["EVER", "ZZZZ"],
            COL_SUMMIT_MEMBERS => [Some(1i64), Some(1)],
        )
        .unwrap();

        let views =
            Aggregator::build(&scoped, &peaks(), &nations(), YearScope::AllTime).unwrap();
        assert_eq!(views.top_peaks.len(), 1);
        assert_eq!(views.top_peaks[0].peak, "Everest");
    }

    #[test]
    fn success_rates_stay_in_unit_interval_and_treat_null_as_failure() {
        let views =
            Aggregator::build(&scoped(), &peaks(), &nations(), YearScope::AllTime).unwrap();
        assert_eq!(views.success_rates.len(), 2);
        for row in &views.success_rates {
            assert!((0.0..=1.0).contains(&row.rate), "rate out of range: {row:?}");
        }

        // Nepal: smtmembers [2, null, 0] → one success in three.
        let nepal = views
            .success_rates
            .iter()
            .find(|r| r.nation == "Nepal")
            .unwrap();
        assert!((nepal.rate - 1.0 / 3.0).abs() < 1e-12);

        // Ascending order: Nepal (1/3) before Japan (2/3).
        assert_eq!(views.success_rates[0].nation, "Nepal");
    }

    #[test]
    fn all_time_total_equals_sum_of_timeline_counts() {
        let views =
            Aggregator::build(&scoped(), &peaks(), &nations(), YearScope::AllTime).unwrap();
        let timeline_sum: u32 = views.timeline.iter().map(|r| r.count).sum();
        assert_eq!(views.total as u32, timeline_sum);

        // Also equals the sum of the map view's per-nation counts.
        let map_sum: u32 = views.nation_counts.iter().map(|r| r.count).sum();
        assert_eq!(views.total as u32, map_sum);
    }

    #[test]
    fn timeline_is_built_only_for_all_time() {
        let all_time =
            Aggregator::build(&scoped(), &peaks(), &nations(), YearScope::AllTime).unwrap();
        assert!(!all_time.timeline.is_empty());

        let single = df!(
            COL_NATION => ["Nepal"],
            COL_YEAR => [2018i64],
            COL_PEAK_ID => ["EVER"],
            COL_SUMMIT_MEMBERS => [Some(1i64)],
        )
        .unwrap();
        let year_view =
            Aggregator::build(&single, &peaks(), &nations(), YearScope::Year(2018)).unwrap();
        assert!(year_view.timeline.is_empty());
        assert_eq!(year_view.total, 1);
    }

    #[test]
    fn nation_counts_are_descending() {
        let views =
            Aggregator::build(&scoped(), &peaks(), &nations(), YearScope::AllTime).unwrap();
        let counts: Vec<u32> = views.nation_counts.iter().map(|r| r.count).collect();
        let mut sorted = counts.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(counts, sorted);
    }
}
