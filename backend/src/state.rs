//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.

use crate::config::AppConfig;
use crate::repositories::{InMemorySessionRepository, SessionRepository};
use std::sync::Arc;
use triflow_shared::PlannerPolicy;

/// Shared application state
///
/// All fields are behind `Arc`, so cloning per request is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Training session storage
    pub sessions: Arc<dyn SessionRepository>,
}

impl AppState {
    /// Create application state with an in-memory session store
    pub fn new(config: AppConfig) -> Self {
        Self::with_repository(config, Arc::new(InMemorySessionRepository::new()))
    }

    pub fn with_repository(config: AppConfig, sessions: Arc<dyn SessionRepository>) -> Self {
        Self {
            config: Arc::new(config),
            sessions,
        }
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Planner policy in effect
    #[inline]
    pub fn planner(&self) -> &PlannerPolicy {
        &self.config.planner
    }

    /// Get a reference to the session repository
    #[inline]
    pub fn sessions(&self) -> &dyn SessionRepository {
        self.sessions.as_ref()
    }
}
