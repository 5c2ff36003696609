//! Infrastructure layer - Framework implementations
//!
//! This layer contains:
//! - Database connection and schema (db)
//! - Configuration loading (config)
//! - Record store, relationship index and rule engine
//! - Repository implementations (repositories)
//! - The catalog handle (catalog)
//! - Demo data (seed)

pub mod catalog;
pub mod config;
pub mod db;
pub mod record_store;
pub mod relationship_index;
pub mod repositories;
pub mod rule_engine;
pub mod seed;

pub use catalog::{Catalog, CatalogSnapshot};
pub use relationship_index::SeaOrmRelationshipIndex;
pub use repositories::*;
