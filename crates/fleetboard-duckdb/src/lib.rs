pub mod backend;
pub mod cars;
pub mod customers;
pub mod deals;
pub mod payouts;
pub mod providers;
pub mod queries;
pub mod schema;
pub mod shops;
pub mod users;

pub use backend::FleetDb;

/// Re-export the `duckdb` crate so consumers (especially tests) can use
/// `fleetboard_duckdb::duckdb::params!` without an extra dependency.
pub use duckdb;
