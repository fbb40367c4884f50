//! Persistence layer for the plant plan tracker.
//!
//! Holds the record model, database configuration, the PostgreSQL pool with
//! embedded migrations, and raw query functions for the `plant_plans` table.

pub mod config;
pub mod models;
pub mod pool;
pub mod queries;
