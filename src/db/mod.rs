//! Database module: the passenger table, its row model and the MySQL access layer.
//!
//! Layout:
//! - `models.rs`: Rust struct mirroring a `passengers` row
//! - `schema.rs`: SQL text for the table and the bulk load
//! - `mysql.rs`: pooled reads for the API and the importer's session

pub mod models;
pub mod mysql;
pub mod schema;

pub use models::Passenger;
pub use mysql::{ImportSession, MySqlPool, PassengerStorage};
