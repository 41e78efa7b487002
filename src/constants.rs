//! Constants used throughout the application
//!
//! This module centralizes magic strings, log text, and other constant values
//! to improve maintainability and consistency.

// Task defaults
/// Category assigned to tasks created from photo annotations
pub const DEFAULT_TASK_CATEGORY: &str = "Photo Annotation";
/// Prefix of the description written on tasks created from a photo
pub const PHOTO_TASK_DESCRIPTION_PREFIX: &str = "Created from photo annotation on";

// Configuration
pub const SUPPORTED_BACKENDS: &[&str] = &["sqlite"];
pub const SUPPORTED_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];
pub const CONFIG_GENERATED: &str = "✅ Generated default configuration file";

// Logging
/// Number of entries kept by the in-memory log buffer
pub const LOG_BUFFER_CAPACITY: usize = 500;
/// Timestamp format of log lines
pub const LOG_TIMESTAMP_FORMAT: &str = "%H:%M:%S%.3f";
pub const LOG_FILE_NAME: &str = "sitelens.log";
