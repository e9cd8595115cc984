pub mod dashboard;
pub mod in_flight;
