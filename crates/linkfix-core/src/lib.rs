//! # linkfix-core
//!
//! Core types, traits, configuration, rewrite rules, and error handling
//! for the linkfix bot.

pub mod config;
pub mod error;
pub mod message;
pub mod rewrite;
pub mod rules;
pub mod traits;

pub use config::shellexpand;
