pub mod dashboard;
pub mod explore;
