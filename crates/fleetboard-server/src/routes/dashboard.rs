use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use fleetboard_core::metrics::{
    bucket_trailing_months, compute_window, summarize, trailing_floor, Granularity,
    MetricSnapshot,
};

use crate::{error::AppError, state::AppState};

/// The trailing series always shows half a year.
const TRAILING_MONTHS: usize = 6;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub granularity: Option<String>,
}

/// `GET /api/dashboard?granularity=week|month|year|all` — One call
/// returning everything the dashboard screen renders: current and
/// previous window snapshots, growth rates, and the six-month trailing
/// series for deals and cars.
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> Result<impl IntoResponse, AppError> {
    let granularity = Granularity::parse(query.granularity.as_deref())
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let now = Utc::now();
    let windows = compute_window(granularity, now);
    let floor = trailing_floor(now, TRAILING_MONTHS);

    let db = &state.db;
    let (
        cars_current,
        deals_current,
        customers_current,
        providers_current,
        revenue_current,
        cars_previous,
        deals_previous,
        customers_previous,
        providers_previous,
        revenue_previous,
        inventory_value,
        monthly_deal_rows,
        monthly_car_rows,
    ) = tokio::join!(
        db.count_cars_in(&windows.current),
        db.count_deals_in(&windows.current),
        db.count_customers_in(&windows.current),
        db.count_providers_in(&windows.current),
        db.revenue_in(&windows.current),
        db.count_cars_in(&windows.previous),
        db.count_deals_in(&windows.previous),
        db.count_customers_in(&windows.previous),
        db.count_providers_in(&windows.previous),
        db.revenue_in(&windows.previous),
        db.inventory_value(),
        db.monthly_deal_rows(floor),
        db.monthly_car_rows(floor),
    );

    let inventory_value = inventory_value.map_err(AppError::Internal)?;
    let current = MetricSnapshot {
        cars: cars_current.map_err(AppError::Internal)?,
        deals: deals_current.map_err(AppError::Internal)?,
        customers: customers_current.map_err(AppError::Internal)?,
        providers: providers_current.map_err(AppError::Internal)?,
        revenue: revenue_current.map_err(AppError::Internal)?,
        inventory_value,
    };
    let previous = MetricSnapshot {
        cars: cars_previous.map_err(AppError::Internal)?,
        deals: deals_previous.map_err(AppError::Internal)?,
        customers: customers_previous.map_err(AppError::Internal)?,
        providers: providers_previous.map_err(AppError::Internal)?,
        revenue: revenue_previous.map_err(AppError::Internal)?,
        inventory_value,
    };

    let monthly_deals = bucket_trailing_months(
        &monthly_deal_rows.map_err(AppError::Internal)?,
        TRAILING_MONTHS,
        now,
    );
    let monthly_cars = bucket_trailing_months(
        &monthly_car_rows.map_err(AppError::Internal)?,
        TRAILING_MONTHS,
        now,
    );

    let summary = summarize(granularity, current, previous, monthly_deals, monthly_cars);
    Ok(Json(json!({ "data": summary })))
}
