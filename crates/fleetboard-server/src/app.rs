use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use fleetboard_core::config::AuthMode;

use crate::{auth, routes, state::AppState};

/// Construct the Axum [`Router`] with all routes and middleware attached.
///
/// Middleware is applied in outer-to-inner order (outermost runs first on
/// request, last on response):
///
/// 1. `TraceLayer` — structured request/response logging via `tracing`.
/// 2. `CorsLayer` — permissive CORS so the dashboard frontend can run on
///    a separate origin during development.
///
/// In `local` auth mode everything under `/api` except the login and
/// signup endpoints requires a bearer JWT. In `none` mode the API is
/// open and the auth endpoints are not registered at all.
pub fn build_app(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/api/cars", post(routes::cars::create_car).get(routes::cars::list_cars))
        .route(
            "/api/cars/{id}",
            get(routes::cars::get_car)
                .put(routes::cars::update_car)
                .delete(routes::cars::delete_car),
        )
        .route("/api/cars/{id}/image", post(routes::cars::upload_car_image))
        .route(
            "/api/shops",
            post(routes::shops::create_shop).get(routes::shops::list_shops),
        )
        .route(
            "/api/shops/{id}",
            get(routes::shops::get_shop)
                .put(routes::shops::update_shop)
                .delete(routes::shops::delete_shop),
        )
        .route("/api/shops/{id}/image", post(routes::shops::upload_shop_image))
        .route(
            "/api/customers",
            post(routes::customers::create_customer).get(routes::customers::list_customers),
        )
        .route("/api/customers/{id}", get(routes::customers::get_customer))
        .route(
            "/api/providers",
            post(routes::providers::create_provider).get(routes::providers::list_providers),
        )
        .route(
            "/api/providers/{id}",
            get(routes::providers::get_provider)
                .put(routes::providers::update_provider)
                .delete(routes::providers::delete_provider),
        )
        .route(
            "/api/providers/{id}/balance",
            get(routes::providers::provider_balance),
        )
        .route(
            "/api/deals",
            post(routes::deals::create_deal).get(routes::deals::list_deals),
        )
        .route(
            "/api/deals/{id}",
            get(routes::deals::get_deal)
                .put(routes::deals::update_deal)
                .delete(routes::deals::delete_deal),
        )
        .route("/api/deals/{id}/status", post(routes::deals::set_deal_status))
        .route("/api/deals/{id}/contract.pdf", get(routes::pdf::deal_contract))
        .route("/api/deals/{id}/summary.pdf", get(routes::pdf::deal_summary))
        .route("/api/payouts", post(routes::payouts::create_payout).get(routes::payouts::list_payouts))
        .route("/api/explore", get(routes::explore::explore))
        .route("/api/dashboard", get(routes::dashboard::dashboard));

    let router = match state.config.auth_mode {
        AuthMode::Local => {
            let protected = api
                .route("/api/auth/me", get(auth::handlers::me))
                .layer(middleware::from_fn_with_state(
                    Arc::clone(&state),
                    auth::middleware::require_auth,
                ));
            Router::new()
                .route("/api/auth/signup", post(auth::handlers::signup))
                .route("/api/auth/login", post(auth::handlers::login))
                .merge(protected)
        }
        AuthMode::None => api,
    };

    router
        .route("/health", get(routes::health::health))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
