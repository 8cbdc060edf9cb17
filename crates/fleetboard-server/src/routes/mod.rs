pub mod cars;
pub mod customers;
pub mod dashboard;
pub mod deals;
pub mod explore;
pub mod health;
pub mod payouts;
pub mod pdf;
pub mod providers;
pub mod shops;
