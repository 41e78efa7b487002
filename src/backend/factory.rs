//! Backend factory for creating backend instances from configuration.

use anyhow::{anyhow, Result};
use serde_json::Value;

use super::{sqlite::SqliteBackend, Backend};

/// Create a backend instance from backend type and credentials.
///
/// # Arguments
/// * `backend_type` - The type of backend (e.g., "sqlite")
/// * `credentials` - JSON-encoded credentials string
///
/// # Returns
/// A boxed Backend trait object
///
/// # Errors
/// Returns error if:
/// - Backend type is unknown
/// - Credentials are invalid JSON
/// - Required credentials are missing
/// - The store cannot be opened
pub async fn create_backend(backend_type: &str, credentials: &str) -> Result<Box<dyn Backend>> {
    let creds: Value =
        serde_json::from_str(credentials).map_err(|e| anyhow!("Failed to parse credentials JSON: {}", e))?;

    match backend_type {
        "sqlite" => {
            let database_url = creds["database_url"]
                .as_str()
                .ok_or_else(|| anyhow!("Missing 'database_url' in sqlite credentials"))?;
            Ok(Box::new(SqliteBackend::open(database_url).await?))
        }
        _ => Err(anyhow!("Unknown backend type: {}", backend_type)),
    }
}
