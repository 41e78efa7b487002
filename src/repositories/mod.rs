//! Repository layer for database operations.
//!
//! This module provides repository structs that encapsulate database queries
//! and operations, following the Data Mapper pattern recommended by SeaORM.
//! Repositories keep entities as pure data models while providing reusable
//! database access methods.

pub mod photo;
pub mod project;
pub mod task;

pub use photo::PhotoRepository;
pub use project::ProjectRepository;
pub use task::TaskRepository;
