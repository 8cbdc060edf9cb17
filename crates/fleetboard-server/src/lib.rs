//! HTTP layer of the dealership operations dashboard: Axum routes over the
//! DuckDB backend, bearer-JWT auth, file uploads, and PDF document routes.

pub mod app;
pub mod auth;
pub mod error;
pub mod routes;
pub mod state;
pub mod storage;
