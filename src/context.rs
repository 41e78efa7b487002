//! Application context.
//!
//! [`AppContext`] holds everything a session needs: the configured backend,
//! the sync service built on it, the signed-in user and the active project.
//! It is created once with [`AppContext::initialize`] and passed to whoever
//! needs it; [`AppContext::clear`] ends the session (logout) without
//! tearing down the backend.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use log::info;
use tokio::sync::RwLock;

use crate::backend::{factory, Backend};
use crate::config::Config;
use crate::logger::{self, Logger};
use crate::sync::SyncService;

#[derive(Debug, Default)]
struct Session {
    user_id: Option<String>,
    active_project_id: Option<String>,
}

/// Explicit, shareable application state.
#[derive(Clone)]
pub struct AppContext {
    pub config: Config,
    pub sync_service: SyncService,
    pub logger: Logger,
    backend: Arc<dyn Backend>,
    session: Arc<RwLock<Session>>,
}

impl AppContext {
    /// Build the context from configuration: logging, backend, sync service.
    pub async fn initialize(config: Config) -> Result<Self> {
        config.validate()?;

        let logger = Logger::new();
        logger::init(&config.logging, &logger)?;

        let backend: Arc<dyn Backend> = Arc::from(
            factory::create_backend(&config.backend.backend_type, &config.backend_credentials())
                .await
                .context("Failed to create backend")?,
        );
        info!("✅ Using {} backend", backend.backend_type());

        Ok(Self::with_backend(config, backend, logger))
    }

    /// Build a context around an existing backend.
    pub fn with_backend(config: Config, backend: Arc<dyn Backend>, logger: Logger) -> Self {
        let sync_service = SyncService::new(Arc::clone(&backend), config.sync.clone());
        Self {
            config,
            sync_service,
            logger,
            backend,
            session: Arc::new(RwLock::new(Session::default())),
        }
    }

    pub fn backend(&self) -> Arc<dyn Backend> {
        Arc::clone(&self.backend)
    }

    /// Start a session for `user_id`, replacing any previous one.
    pub async fn sign_in(&self, user_id: &str) {
        let mut session = self.session.write().await;
        *session = Session {
            user_id: Some(user_id.to_string()),
            active_project_id: None,
        };
        info!("👤 Signed in as {}", user_id);
    }

    pub async fn user_id(&self) -> Option<String> {
        self.session.read().await.user_id.clone()
    }

    /// Select the active project. The project must exist in the backend.
    pub async fn set_active_project(&self, project_id: &str) -> Result<()> {
        let exists = self
            .backend
            .fetch_project(project_id)
            .await
            .with_context(|| format!("Failed to look up project {project_id}"))?
            .is_some();
        if !exists {
            anyhow::bail!("Project not found: {}", project_id);
        }

        self.session.write().await.active_project_id = Some(project_id.to_string());
        info!("📁 Active project set to {}", project_id);
        Ok(())
    }

    pub async fn active_project(&self) -> Option<String> {
        self.session.read().await.active_project_id.clone()
    }

    /// End the session: forget the user and the active project.
    pub async fn clear(&self) {
        let mut session = self.session.write().await;
        *session = Session::default();
        info!("👋 Session cleared");
    }
}
