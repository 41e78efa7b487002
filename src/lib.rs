//! Sitelens - data layer for a field project-management client
//!
//! This library stores projects, photos and project tasks, and keeps the
//! to-do items annotated on photos in step with the project's task list.
//!
//! # Modules
//!
//! The library is organized into several key modules:
//!
//! * [`annotations`] - Typed view of the JSON arrays embedded in photos
//! * [`backend`] - Backend abstraction and the SQLite store
//! * [`config`] - Application configuration management
//! * [`context`] - Explicit session state
//! * [`storage`] - Database connection and schema
//! * [`sync`] - Photo-task synchronization service

/// Annotation tasks and embedded JSON parsing
pub mod annotations;

/// Backend abstraction layer for the project data store
pub mod backend;

/// Configuration module for managing application settings
pub mod config;

/// Application constants and default values
pub mod constants;

/// Application state with explicit init and teardown
pub mod context;

/// SeaORM entity models for database tables
pub mod entities;

/// Logging setup and in-memory log buffer
pub mod logger;

/// Repository layer for database operations
pub mod repositories;

/// Local storage layer (SQLite via SeaORM)
pub mod storage;

/// Synchronization between photo annotations and project tasks
pub mod sync;

/// Utility functions for date/time handling
pub mod utils;

// Re-export entity models for convenient access
pub use entities::{photo, project, task};
