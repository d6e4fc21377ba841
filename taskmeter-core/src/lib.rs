//! # taskmeter-core
//!
//! Core library for taskmeter - a personal task tracker with productivity
//! analytics.
//!
//! This library provides:
//! - Domain types for one-off tasks and daily routines
//! - SQLite storage layer with completion-history tracking
//! - A completion statistics engine (streaks, rates, heatmap, comparison)
//! - Nominal login sessions
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! The store owns all persistent state; the analytics engine is pure and
//! recomputes every result from a fresh routine snapshot plus an explicit
//! `today`, so repeated calls are independent and side-effect-free.
//!
//! ## Example
//!
//! ```rust,no_run
//! use taskmeter_core::analytics::{self, StatsRange};
//! use taskmeter_core::{Config, Store};
//!
//! let store = Store::open(&Config::database_path()).expect("failed to open store");
//! store.migrate().expect("failed to run migrations");
//!
//! let today = chrono::Local::now().date_naive();
//! let stats = analytics::completion_stats(&store, StatsRange::Week, today)
//!     .expect("failed to compute stats");
//! println!("current streak: {}", stats.streak);
//! ```

// Re-export commonly used items at the crate root
pub use auth::Session;
pub use config::Config;
pub use error::{Error, Result};
pub use store::Store;
pub use types::*;

// Public modules
pub mod analytics;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod store;
pub mod types;
