use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;

use fleetboard_duckdb::deals::Deal;
use fleetboard_pdf::contract::{contract_html, ContractData};
use fleetboard_pdf::lang::Language;
use fleetboard_pdf::renderer::PdfOptions;
use fleetboard_pdf::summary::{summary_html, SummaryData};

use crate::{error::AppError, state::AppState};

/// All amounts in the system are shekel-denominated.
const CURRENCY: &str = "ILS";

#[derive(Debug, Deserialize)]
pub struct PdfQuery {
    pub lang: Option<String>,
}

/// The date half of a `YYYY-MM-DD HH:MM:SS` database timestamp.
fn date_part(ts: &str) -> String {
    ts.chars().take(10).collect()
}

fn pdf_response(deal_id: &str, doc: &str, bytes: Vec<u8>) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{doc}-{deal_id}.pdf\""),
            ),
        ],
        bytes,
    )
}

async fn load_deal(state: &AppState, deal_id: &str) -> Result<Deal, AppError> {
    state
        .db
        .get_deal(deal_id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound("Deal not found".to_string()))
}

/// `GET /api/deals/{id}/contract.pdf?lang=en|he|ar` — Vehicle sale
/// contract for a sale deal.
pub async fn deal_contract(
    State(state): State<Arc<AppState>>,
    Path(deal_id): Path<String>,
    Query(query): Query<PdfQuery>,
) -> Result<impl IntoResponse, AppError> {
    let lang = Language::parse(query.lang.as_deref())
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let deal = load_deal(&state, &deal_id).await?;
    if deal.kind != "sale" {
        return Err(AppError::BadRequest(
            "contracts are only available for sale deals".to_string(),
        ));
    }
    let Some(car_id) = &deal.car_id else {
        return Err(AppError::BadRequest("deal has no car attached".to_string()));
    };

    let car = state
        .db
        .get_car(car_id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound("Car not found".to_string()))?;
    let customer = state
        .db
        .get_customer(&deal.customer_id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))?;
    let shop = match &car.shop_id {
        Some(shop_id) => state.db.get_shop(shop_id).await.map_err(AppError::Internal)?,
        None => None,
    };

    let data = ContractData {
        contract_number: deal.id.clone(),
        date: date_part(&deal.created_at),
        buyer_name: customer.name,
        buyer_phone: customer.phone,
        shop_name: shop
            .as_ref()
            .map(|s| s.name.clone())
            .unwrap_or_else(|| "Head office".to_string()),
        shop_address: shop.and_then(|s| s.address),
        car_make: car.make,
        car_model: car.model,
        car_year: car.year,
        price: deal.amount,
        currency: CURRENCY.to_string(),
    };

    let html = contract_html(&data, lang);
    let bytes = state
        .renderer
        .render(&html, &PdfOptions::default())
        .await
        .map_err(AppError::Internal)?;

    Ok(pdf_response(&deal_id, "contract", bytes))
}

/// `GET /api/deals/{id}/summary.pdf?lang=en|he|ar` — Booking summary
/// for a trip deal.
pub async fn deal_summary(
    State(state): State<Arc<AppState>>,
    Path(deal_id): Path<String>,
    Query(query): Query<PdfQuery>,
) -> Result<impl IntoResponse, AppError> {
    let lang = Language::parse(query.lang.as_deref())
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let deal = load_deal(&state, &deal_id).await?;
    if deal.kind != "trip" {
        return Err(AppError::BadRequest(
            "summaries are only available for trip deals".to_string(),
        ));
    }

    let customer = state
        .db
        .get_customer(&deal.customer_id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))?;
    let provider = match &deal.provider_id {
        Some(provider_id) => state
            .db
            .get_provider(provider_id)
            .await
            .map_err(AppError::Internal)?,
        None => None,
    };

    let data = SummaryData {
        booking_number: deal.id.clone(),
        date: date_part(&deal.created_at),
        customer_name: customer.name,
        destination: deal.destination.clone(),
        trip_date: deal.trip_date.clone(),
        seats: deal.seats,
        provider_name: provider.map(|p| p.name),
        amount: deal.amount,
        currency: CURRENCY.to_string(),
        status: deal.status.clone(),
    };

    let html = summary_html(&data, lang);
    let bytes = state
        .renderer
        .render(&html, &PdfOptions::default())
        .await
        .map_err(AppError::Internal)?;

    Ok(pdf_response(&deal_id, "summary", bytes))
}
