//! `PostgreSQL` data layer for the EPL predictions service.
//!
//! The crate owns the connection pool, the table definitions, and one store
//! per entity. All work happens inside a [`Session`], which is a single
//! transaction on a pooled connection.
//!
//! # Architecture
//!
//! ```text
//! DatabaseManager (one per process, shared via Arc)
//!     |
//!     +-- initialize / shutdown ----> PgPool
//!     +-- create_schema / drop_schema
//!     +-- session() --> Session (one transaction)
//!                         |-- TeamStore
//!                         |-- MatchStore       (status machine, result recording)
//!                         |-- PredictionStore  (settled when a result lands)
//!                         +-- StatisticStore
//! ```
//!
//! # Modules
//!
//! - [`manager`] -- pool lifecycle and sessions
//! - [`postgres`] -- pool sizing and connection configuration
//! - [`schema`] -- DDL for the four tables
//! - [`team_store`], [`match_store`], [`prediction_store`], [`statistic_store`]
//!   -- per-entity queries
//! - [`error`] -- shared error type

pub mod error;
pub mod manager;
pub mod match_store;
pub mod postgres;
pub mod prediction_store;
pub mod schema;
pub mod statistic_store;
pub mod team_store;

// Re-export primary types for convenience.
pub use error::DbError;
pub use manager::{DatabaseManager, Session};
pub use match_store::{MatchFilter, MatchStore};
pub use postgres::PostgresConfig;
pub use prediction_store::PredictionStore;
pub use statistic_store::StatisticStore;
pub use team_store::TeamStore;
