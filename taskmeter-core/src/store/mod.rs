//! Storage layer for taskmeter
//!
//! This module provides the persistence layer using SQLite with:
//! - Schema migrations
//! - Repository pattern for queries
//! - Completion-history maintenance for routines

pub mod repo;
pub mod schema;

pub use repo::Store;
