//! Time-windowed metrics aggregation for the dashboard.
//!
//! Everything in this module is pure and synchronous: the server fans out the
//! raw count/sum queries, then hands the results here. Windows are half-open
//! `[start, end)`; an absent bound means unbounded on that side.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Dashboard period selector.
///
/// `All` is special-cased throughout: both windows are unbounded and every
/// growth figure is pinned to 0 (product rule, not the generic formula).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Week,
    #[default]
    Month,
    Year,
    All,
}

impl Granularity {
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        match raw.map(str::trim) {
            None | Some("") | Some("month") => Ok(Self::Month),
            Some("week") => Ok(Self::Week),
            Some("year") => Ok(Self::Year),
            Some("all") => Ok(Self::All),
            Some(_) => Err(anyhow!(
                "granularity must be one of: week, month, year, all"
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::All => "all",
        }
    }
}

/// Half-open interval `[start, end)` bounding one count/sum query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl MetricWindow {
    pub fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        if let Some(start) = self.start {
            if ts < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if ts >= end {
                return false;
            }
        }
        true
    }
}

/// The current window plus the immediately preceding window of equal
/// semantic length, both derived from the same anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPair {
    pub current: MetricWindow,
    pub previous: MetricWindow,
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// First day of the month `offset` months away from (`year`, `month`).
fn shifted_month_start(year: i32, month: u32, offset: i32) -> NaiveDate {
    let total = year * 12 + month as i32 - 1 + offset;
    let (y, m) = (total.div_euclid(12), total.rem_euclid(12) as u32 + 1);
    // Day 1 of any month is always representable.
    NaiveDate::from_ymd_opt(y, m, 1).unwrap_or(NaiveDate::MIN)
}

/// Derive the current/previous query windows for `granularity`, anchored at
/// `now`. Total over the whole input domain — no failure path.
///
/// Week starts on Sunday (the behavior the dashboard has always shipped;
/// see DESIGN.md for the open first-day-of-week question).
pub fn compute_window(granularity: Granularity, now: DateTime<Utc>) -> WindowPair {
    match granularity {
        Granularity::All => WindowPair {
            current: MetricWindow::unbounded(),
            previous: MetricWindow::unbounded(),
        },
        Granularity::Week => {
            let days_back = now.weekday().num_days_from_sunday() as i64;
            let start = midnight(now.date_naive() - Duration::days(days_back));
            WindowPair {
                current: MetricWindow {
                    start: Some(start),
                    end: None,
                },
                previous: MetricWindow {
                    start: Some(start - Duration::days(7)),
                    end: Some(start),
                },
            }
        }
        Granularity::Month => {
            let start = midnight(shifted_month_start(now.year(), now.month(), 0));
            let prev_start = midnight(shifted_month_start(now.year(), now.month(), -1));
            WindowPair {
                current: MetricWindow {
                    start: Some(start),
                    end: None,
                },
                previous: MetricWindow {
                    start: Some(prev_start),
                    end: Some(start),
                },
            }
        }
        Granularity::Year => {
            let start = midnight(shifted_month_start(now.year(), 1, 0));
            let prev_start = midnight(shifted_month_start(now.year() - 1, 1, 0));
            WindowPair {
                current: MetricWindow {
                    start: Some(start),
                    end: None,
                },
                previous: MetricWindow {
                    start: Some(prev_start),
                    end: Some(start),
                },
            }
        }
    }
}

/// First day of the oldest month a `month_count`-long trailing series
/// covers, as a UTC timestamp. Rows older than this cannot land in any
/// bucket [`bucket_trailing_months`] produces, so callers can use it as a
/// scan floor. Expects `month_count >= 1`.
pub fn trailing_floor(anchor: DateTime<Utc>, month_count: usize) -> DateTime<Utc> {
    midnight(shifted_month_start(
        anchor.year(),
        anchor.month(),
        -(month_count as i32 - 1),
    ))
}

/// Percentage change between two non-negative period totals.
///
/// `previous == 0` is not an error: a metric appearing from nothing reads as
/// +100%, and two empty periods read as flat.
pub fn growth_rate(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        if current > 0.0 {
            100.0
        } else {
            0.0
        }
    } else {
        ((current - previous) / previous) * 100.0
    }
}

/// [`growth_rate`] with the `All` product rule applied: an unbounded window
/// has no "previous" to compare against, so growth is always 0.
pub fn growth_for(granularity: Granularity, current: f64, previous: f64) -> f64 {
    if granularity == Granularity::All {
        return 0.0;
    }
    growth_rate(current, previous)
}

/// One timestamped input row for the trailing-month series. `amount` is the
/// deal amount where applicable; cars contribute counts only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyRecord {
    pub created_at: DateTime<Utc>,
    pub amount: Option<f64>,
}

/// One calendar month of the trailing series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBucket {
    /// `YYYY-MM` label of the bucket's month.
    pub month: String,
    pub count: i64,
    pub amount: f64,
}

/// Bucket `records` into exactly `month_count` trailing calendar months
/// ending at the anchor's month, oldest first.
///
/// Records outside `[oldest month start, next month after anchor)` are
/// silently dropped. Absent amounts count as 0. Pure function of its inputs.
pub fn bucket_trailing_months(
    records: &[MonthlyRecord],
    month_count: usize,
    anchor: DateTime<Utc>,
) -> Vec<MonthlyBucket> {
    if month_count == 0 {
        return Vec::new();
    }

    let oldest = shifted_month_start(anchor.year(), anchor.month(), -(month_count as i32 - 1));
    let upper = shifted_month_start(anchor.year(), anchor.month(), 1);

    let mut buckets: Vec<MonthlyBucket> = (0..month_count)
        .map(|i| {
            let start = shifted_month_start(oldest.year(), oldest.month(), i as i32);
            MonthlyBucket {
                month: start.format("%Y-%m").to_string(),
                count: 0,
                amount: 0.0,
            }
        })
        .collect();

    for record in records {
        let date = record.created_at.date_naive();
        if date < oldest || date >= upper {
            continue;
        }
        let idx = (date.year() - oldest.year()) * 12 + date.month() as i32
            - oldest.month() as i32;
        debug_assert!(idx >= 0 && (idx as usize) < month_count);
        if let Some(bucket) = buckets.get_mut(idx as usize) {
            bucket.count += 1;
            bucket.amount += record.amount.unwrap_or(0.0);
        }
    }

    buckets
}

/// Raw counts/sums read for one window. Immutable once built; carries no
/// identity beyond the window it was computed for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MetricSnapshot {
    pub cars: i64,
    pub deals: i64,
    pub customers: i64,
    pub providers: i64,
    pub revenue: f64,
    pub inventory_value: f64,
}

/// Everything one dashboard load renders.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub granularity: Granularity,
    pub current: MetricSnapshot,
    pub previous: MetricSnapshot,
    pub cars_growth: f64,
    pub deals_growth: f64,
    pub customers_growth: f64,
    pub providers_growth: f64,
    pub revenue_growth: f64,
    pub monthly_deals: Vec<MonthlyBucket>,
    pub monthly_cars: Vec<MonthlyBucket>,
}

/// Assemble the dashboard response from already-fetched window snapshots and
/// trailing-month series. Pure; runs after every fan-out query has resolved.
pub fn summarize(
    granularity: Granularity,
    current: MetricSnapshot,
    previous: MetricSnapshot,
    monthly_deals: Vec<MonthlyBucket>,
    monthly_cars: Vec<MonthlyBucket>,
) -> DashboardSummary {
    DashboardSummary {
        granularity,
        cars_growth: growth_for(granularity, current.cars as f64, previous.cars as f64),
        deals_growth: growth_for(granularity, current.deals as f64, previous.deals as f64),
        customers_growth: growth_for(
            granularity,
            current.customers as f64,
            previous.customers as f64,
        ),
        providers_growth: growth_for(
            granularity,
            current.providers as f64,
            previous.providers as f64,
        ),
        revenue_growth: growth_for(granularity, current.revenue, previous.revenue),
        current,
        previous,
        monthly_deals,
        monthly_cars,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 30, 0).single().expect("valid date")
    }

    #[test]
    fn trailing_floor_is_first_day_of_oldest_month() {
        let floor = trailing_floor(at(2024, 3, 15), 6);
        assert_eq!(floor, midnight(NaiveDate::from_ymd_opt(2023, 10, 1).expect("date")));
    }

    #[test]
    fn trailing_floor_crosses_year_boundaries() {
        let floor = trailing_floor(at(2024, 1, 2), 6);
        assert_eq!(floor, midnight(NaiveDate::from_ymd_opt(2023, 8, 1).expect("date")));
    }

    #[test]
    fn growth_rate_zero_previous_zero_current_is_flat() {
        assert_eq!(growth_rate(0.0, 0.0), 0.0);
    }

    #[test]
    fn growth_rate_zero_previous_positive_current_is_100() {
        assert_eq!(growth_rate(5.0, 0.0), 100.0);
        assert_eq!(growth_rate(0.1, 0.0), 100.0);
    }

    #[test]
    fn growth_rate_matches_generic_formula() {
        assert!((growth_rate(120.0, 100.0) - 20.0).abs() < 1e-9);
        assert!((growth_rate(50.0, 100.0) + 50.0).abs() < 1e-9);
        assert!((growth_rate(3.0, 8.0) - (3.0 - 8.0) / 8.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn growth_for_all_granularity_is_always_zero() {
        assert_eq!(growth_for(Granularity::All, 120.0, 100.0), 0.0);
        assert_eq!(growth_for(Granularity::All, 5.0, 0.0), 0.0);
        assert_eq!(growth_for(Granularity::All, 0.0, 9000.0), 0.0);
        // Other granularities still use the generic formula.
        assert_eq!(growth_for(Granularity::Month, 120.0, 100.0), 20.0);
    }

    #[test]
    fn month_window_starts_on_day_one_with_full_prior_month() {
        // Spec example: anchor = 2024-03-15.
        let pair = compute_window(Granularity::Month, at(2024, 3, 15));
        assert_eq!(pair.current.start, Some(midnight(NaiveDate::from_ymd_opt(2024, 3, 1).expect("date"))));
        assert_eq!(pair.current.end, None);
        assert_eq!(pair.previous.start, Some(midnight(NaiveDate::from_ymd_opt(2024, 2, 1).expect("date"))));
        assert_eq!(pair.previous.end, Some(midnight(NaiveDate::from_ymd_opt(2024, 3, 1).expect("date"))));
    }

    #[test]
    fn month_window_at_january_uses_december_of_prior_year() {
        let pair = compute_window(Granularity::Month, at(2024, 1, 10));
        assert_eq!(pair.previous.start, Some(midnight(NaiveDate::from_ymd_opt(2023, 12, 1).expect("date"))));
        assert_eq!(pair.previous.end, Some(midnight(NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"))));
    }

    #[test]
    fn week_window_starts_on_most_recent_sunday() {
        // 2024-03-15 is a Friday; the week began Sunday 2024-03-10.
        let pair = compute_window(Granularity::Week, at(2024, 3, 15));
        let sunday = midnight(NaiveDate::from_ymd_opt(2024, 3, 10).expect("date"));
        assert_eq!(pair.current.start, Some(sunday));
        assert_eq!(pair.previous.start, Some(sunday - Duration::days(7)));
        assert_eq!(pair.previous.end, Some(sunday));
    }

    #[test]
    fn week_window_on_a_sunday_starts_that_day() {
        let pair = compute_window(Granularity::Week, at(2024, 3, 10));
        let sunday = midnight(NaiveDate::from_ymd_opt(2024, 3, 10).expect("date"));
        assert_eq!(pair.current.start, Some(sunday));
    }

    #[test]
    fn year_window_starts_january_first() {
        let pair = compute_window(Granularity::Year, at(2024, 3, 15));
        assert_eq!(pair.current.start, Some(midnight(NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"))));
        assert_eq!(pair.previous.start, Some(midnight(NaiveDate::from_ymd_opt(2023, 1, 1).expect("date"))));
        assert_eq!(pair.previous.end, Some(midnight(NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"))));
    }

    #[test]
    fn all_window_is_unbounded_on_both_sides() {
        let pair = compute_window(Granularity::All, at(2024, 3, 15));
        assert_eq!(pair.current, MetricWindow::unbounded());
        assert_eq!(pair.previous, MetricWindow::unbounded());
        assert!(pair.current.contains(at(1971, 1, 1)));
        assert!(pair.current.contains(at(2099, 1, 1)));
    }

    #[test]
    fn window_contains_is_half_open() {
        let pair = compute_window(Granularity::Month, at(2024, 3, 15));
        let feb_start = midnight(NaiveDate::from_ymd_opt(2024, 2, 1).expect("date"));
        let mar_start = midnight(NaiveDate::from_ymd_opt(2024, 3, 1).expect("date"));
        assert!(pair.previous.contains(feb_start));
        assert!(!pair.previous.contains(mar_start));
        assert!(pair.current.contains(mar_start));
    }

    #[test]
    fn buckets_cover_six_trailing_months_oldest_first() {
        // Spec example: anchor = 2024-03-15 → Oct 2023 .. Mar 2024.
        let buckets = bucket_trailing_months(&[], 6, at(2024, 3, 15));
        let months: Vec<&str> = buckets.iter().map(|b| b.month.as_str()).collect();
        assert_eq!(
            months,
            vec!["2023-10", "2023-11", "2023-12", "2024-01", "2024-02", "2024-03"]
        );
    }

    #[test]
    fn record_lands_only_in_its_own_month() {
        let records = vec![MonthlyRecord {
            created_at: at(2024, 1, 10),
            amount: Some(500.0),
        }];
        let buckets = bucket_trailing_months(&records, 6, at(2024, 3, 15));
        for bucket in &buckets {
            if bucket.month == "2024-01" {
                assert_eq!(bucket.count, 1);
                assert_eq!(bucket.amount, 500.0);
            } else {
                assert_eq!(bucket.count, 0);
                assert_eq!(bucket.amount, 0.0);
            }
        }
    }

    #[test]
    fn out_of_range_records_are_silently_dropped() {
        let records = vec![
            MonthlyRecord {
                created_at: at(2023, 9, 30), // older than six months
                amount: Some(100.0),
            },
            MonthlyRecord {
                created_at: at(2024, 4, 1), // after the anchor month
                amount: Some(100.0),
            },
        ];
        let buckets = bucket_trailing_months(&records, 6, at(2024, 3, 15));
        assert_eq!(buckets.len(), 6);
        assert!(buckets.iter().all(|b| b.count == 0 && b.amount == 0.0));
    }

    #[test]
    fn absent_amount_counts_as_zero() {
        let records = vec![
            MonthlyRecord {
                created_at: at(2024, 2, 3),
                amount: None,
            },
            MonthlyRecord {
                created_at: at(2024, 2, 20),
                amount: Some(250.0),
            },
        ];
        let buckets = bucket_trailing_months(&records, 6, at(2024, 3, 15));
        let feb = buckets.iter().find(|b| b.month == "2024-02").expect("feb bucket");
        assert_eq!(feb.count, 2);
        assert_eq!(feb.amount, 250.0);
    }

    #[test]
    fn bucketing_is_idempotent() {
        let records = vec![
            MonthlyRecord {
                created_at: at(2024, 1, 10),
                amount: Some(500.0),
            },
            MonthlyRecord {
                created_at: at(2024, 3, 2),
                amount: Some(125.5),
            },
        ];
        let first = bucket_trailing_months(&records, 6, at(2024, 3, 15));
        let second = bucket_trailing_months(&records, 6, at(2024, 3, 15));
        assert_eq!(first, second);
    }

    #[test]
    fn year_boundary_bucketing() {
        let records = vec![MonthlyRecord {
            created_at: at(2023, 12, 31),
            amount: Some(40.0),
        }];
        let buckets = bucket_trailing_months(&records, 6, at(2024, 3, 15));
        let dec = buckets.iter().find(|b| b.month == "2023-12").expect("dec bucket");
        assert_eq!(dec.count, 1);
    }

    #[test]
    fn zero_month_count_yields_no_buckets() {
        assert!(bucket_trailing_months(&[], 0, at(2024, 3, 15)).is_empty());
    }

    #[test]
    fn summarize_computes_per_metric_growth() {
        let current = MetricSnapshot {
            cars: 120,
            deals: 10,
            customers: 0,
            providers: 4,
            revenue: 5000.0,
            inventory_value: 90000.0,
        };
        let previous = MetricSnapshot {
            cars: 100,
            deals: 0,
            customers: 0,
            providers: 8,
            revenue: 2500.0,
            inventory_value: 80000.0,
        };
        let summary = summarize(Granularity::Month, current, previous, vec![], vec![]);
        assert_eq!(summary.cars_growth, 20.0); // spec example: 120 vs 100
        assert_eq!(summary.deals_growth, 100.0);
        assert_eq!(summary.customers_growth, 0.0);
        assert_eq!(summary.providers_growth, -50.0);
        assert_eq!(summary.revenue_growth, 100.0);
    }

    #[test]
    fn summarize_all_pins_every_growth_to_zero() {
        let current = MetricSnapshot {
            cars: 120,
            deals: 10,
            customers: 5,
            providers: 4,
            revenue: 5000.0,
            inventory_value: 90000.0,
        };
        let previous = MetricSnapshot::default();
        let summary = summarize(Granularity::All, current, previous, vec![], vec![]);
        assert_eq!(summary.cars_growth, 0.0);
        assert_eq!(summary.deals_growth, 0.0);
        assert_eq!(summary.revenue_growth, 0.0);
    }

    #[test]
    fn granularity_parse_accepts_known_values() {
        assert_eq!(Granularity::parse(None).expect("default"), Granularity::Month);
        assert_eq!(Granularity::parse(Some("week")).expect("week"), Granularity::Week);
        assert_eq!(Granularity::parse(Some("all")).expect("all"), Granularity::All);
        assert!(Granularity::parse(Some("fortnight")).is_err());
    }
}
