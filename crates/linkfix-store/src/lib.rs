//! # linkfix-store
//!
//! Durable state for linkfix (SQLite-backed): per-user opt-out preferences
//! and per-platform fix counters.

pub mod store;

pub use store::Store;
