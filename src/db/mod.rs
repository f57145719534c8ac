//! Database module: the player model and its SQLite storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows and insert payloads
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: pool bootstrap and the `PlayersStorage` queries

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{NewPlayer, Player};
pub use schema::SQLITE_INIT;
pub use sqlite::{PlayersStorage, SqlitePool, connect};
