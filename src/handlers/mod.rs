pub mod passengers;
pub mod service;
