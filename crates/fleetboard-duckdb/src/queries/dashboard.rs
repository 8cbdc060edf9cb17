//! Windowed count/sum queries feeding the dashboard aggregator.
//!
//! Each method reads one scalar (or one row set) for a [`MetricWindow`];
//! the growth math and month bucketing live in `fleetboard_core::metrics`
//! and run only after the caller has fanned out and joined all of these.

use anyhow::Result;
use chrono::{DateTime, NaiveDateTime, Utc};

use fleetboard_core::metrics::{MetricWindow, MonthlyRecord};

use crate::FleetDb;

fn ts_param(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Build `created_at` range predicates for `window`, appending bound values
/// to `params`. Unbounded sides contribute no predicate (the `all` case).
fn window_sql(
    window: &MetricWindow,
    params: &mut Vec<Box<dyn duckdb::types::ToSql>>,
    param_idx: &mut usize,
) -> String {
    let mut sql = String::new();
    if let Some(start) = window.start {
        sql.push_str(&format!(" AND created_at >= CAST(?{} AS TIMESTAMP)", param_idx));
        params.push(Box::new(ts_param(start)));
        *param_idx += 1;
    }
    if let Some(end) = window.end {
        sql.push_str(&format!(" AND created_at < CAST(?{} AS TIMESTAMP)", param_idx));
        params.push(Box::new(ts_param(end)));
        *param_idx += 1;
    }
    sql
}

fn count_created_in(
    conn: &duckdb::Connection,
    table: &str,
    window: &MetricWindow,
) -> Result<i64> {
    let mut params: Vec<Box<dyn duckdb::types::ToSql>> = Vec::new();
    let mut param_idx = 1;
    let clause = window_sql(window, &mut params, &mut param_idx);
    // `table` is one of the fixed names below, never caller input.
    let sql = format!("SELECT COUNT(*) FROM {table} WHERE 1=1{clause}");
    let param_refs: Vec<&dyn duckdb::types::ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let count: i64 = conn
        .prepare(&sql)?
        .query_row(param_refs.as_slice(), |row| row.get(0))?;
    Ok(count)
}

impl FleetDb {
    pub async fn count_cars_in(&self, window: &MetricWindow) -> Result<i64> {
        let conn = self.conn.lock().await;
        count_created_in(&conn, "cars", window)
    }

    pub async fn count_deals_in(&self, window: &MetricWindow) -> Result<i64> {
        let conn = self.conn.lock().await;
        count_created_in(&conn, "deals", window)
    }

    pub async fn count_customers_in(&self, window: &MetricWindow) -> Result<i64> {
        let conn = self.conn.lock().await;
        count_created_in(&conn, "customers", window)
    }

    pub async fn count_providers_in(&self, window: &MetricWindow) -> Result<i64> {
        let conn = self.conn.lock().await;
        count_created_in(&conn, "providers", window)
    }

    /// Revenue recognised in `window`: sum of completed deal amounts.
    pub async fn revenue_in(&self, window: &MetricWindow) -> Result<f64> {
        let conn = self.conn.lock().await;
        let mut params: Vec<Box<dyn duckdb::types::ToSql>> = Vec::new();
        let mut param_idx = 1;
        let clause = window_sql(window, &mut params, &mut param_idx);
        let sql =
            format!("SELECT COALESCE(SUM(amount), 0) FROM deals WHERE status = 'completed'{clause}");
        let param_refs: Vec<&dyn duckdb::types::ToSql> =
            params.iter().map(|p| p.as_ref()).collect();
        let sum: f64 = conn
            .prepare(&sql)?
            .query_row(param_refs.as_slice(), |row| row.get(0))?;
        Ok(sum)
    }

    /// Sticker value of unsold inventory. Not window-bounded: it is a
    /// point-in-time figure, the same for current and previous periods.
    pub async fn inventory_value(&self) -> Result<f64> {
        let conn = self.conn.lock().await;
        let value: f64 = conn
            .prepare("SELECT COALESCE(SUM(sale_price), 0) FROM cars WHERE status = 'available'")?
            .query_row([], |row| row.get(0))?;
        Ok(value)
    }

    /// Raw `(created_at, amount)` rows for deals created since `since`,
    /// for the trailing-month series. One fetch; bucketing happens in core.
    pub async fn monthly_deal_rows(&self, since: DateTime<Utc>) -> Result<Vec<MonthlyRecord>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT CAST(created_at AS VARCHAR), amount FROM deals \
             WHERE created_at >= CAST(?1 AS TIMESTAMP)",
        )?;
        let rows = stmt.query_map(duckdb::params![ts_param(since)], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (created_at, amount) = row?;
            records.push(MonthlyRecord {
                created_at: parse_db_timestamp(&created_at)?,
                amount: Some(amount),
            });
        }
        Ok(records)
    }

    /// Same as [`monthly_deal_rows`](Self::monthly_deal_rows) for cars.
    /// Cars carry no amount; they contribute counts only.
    pub async fn monthly_car_rows(&self, since: DateTime<Utc>) -> Result<Vec<MonthlyRecord>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT CAST(created_at AS VARCHAR) FROM cars \
             WHERE created_at >= CAST(?1 AS TIMESTAMP)",
        )?;
        let rows = stmt.query_map(duckdb::params![ts_param(since)], |row| {
            row.get::<_, String>(0)
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(MonthlyRecord {
                created_at: parse_db_timestamp(&row?)?,
                amount: None,
            });
        }
        Ok(records)
    }
}

/// DuckDB renders TIMESTAMP as `YYYY-MM-DD HH:MM:SS[.ffffff]` when cast to
/// VARCHAR. Fractional seconds are optional.
fn parse_db_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")?;
    Ok(naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::parse_db_timestamp;

    #[test]
    fn parses_timestamps_with_and_without_fraction() {
        assert!(parse_db_timestamp("2024-01-10 00:00:00").is_ok());
        assert!(parse_db_timestamp("2024-01-10 13:45:09.123456").is_ok());
        assert!(parse_db_timestamp("not a timestamp").is_err());
    }
}
