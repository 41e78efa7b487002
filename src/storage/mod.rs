//! Local storage module for the SQLite project store.
//!
//! This module owns the SeaORM connection and schema for:
//! - Projects
//! - Photos (with their embedded annotation JSON)
//! - Tasks

pub mod db;

pub use db::LocalStorage;
