//! Utility modules for the sitelens crate.
//!
//! # Available Utilities
//!
//! - [`datetime`] - Timestamp formatting and parsing for stored rows

pub mod datetime;
