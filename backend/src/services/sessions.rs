//! Training session service
//!
//! CRUD over standalone training sessions. Sessions are independent of any
//! generated plan.

use crate::error::ApiError;
use crate::repositories::{SessionFilter, SessionRepository, UpdateSession};
use chrono::Utc;
use tracing::info;
use triflow_shared::{
    CreateSessionRequest, SessionsQuery, TrainingSession, UpdateSessionRequest, GUEST_USER_ID,
};
use uuid::Uuid;
use validator::Validate;

/// Session service for business logic
pub struct SessionService;

impl SessionService {
    /// List sessions in a date range, optionally for one user
    pub async fn list(
        repo: &dyn SessionRepository,
        query: SessionsQuery,
    ) -> Result<Vec<TrainingSession>, ApiError> {
        if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
            if start > end {
                return Err(ApiError::BadRequest(
                    "startDate must not be after endDate".to_string(),
                ));
            }
        }

        let filter = SessionFilter {
            user_id: query.user_id.filter(|u| !u.trim().is_empty()),
            start_date: query.start_date,
            end_date: query.end_date,
        };
        Ok(repo.list(&filter).await?)
    }

    /// Create a session
    pub async fn create(
        repo: &dyn SessionRepository,
        req: CreateSessionRequest,
    ) -> Result<TrainingSession, ApiError> {
        req.validate()?;

        let now = Utc::now();
        let session = TrainingSession {
            id: format!("session-{}", Uuid::new_v4()),
            user_id: req
                .user_id
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| GUEST_USER_ID.to_string()),
            session_type: req.session_type,
            title: req.title.trim().to_string(),
            duration: req.duration,
            intensity: req.intensity,
            completed: req.completed,
            date: req.date,
            notes: req.notes.filter(|n| !n.trim().is_empty()),
            created_at: now,
            updated_at: now,
        };

        let session = repo.insert(session).await?;
        info!(session_id = %session.id, user_id = %session.user_id, "Training session created");
        Ok(session)
    }

    /// Apply a partial update
    pub async fn update(
        repo: &dyn SessionRepository,
        id: &str,
        req: UpdateSessionRequest,
    ) -> Result<TrainingSession, ApiError> {
        req.validate()?;
        if req.is_empty() {
            return Err(ApiError::BadRequest("No fields to update".to_string()));
        }

        let input = UpdateSession {
            session_type: req.session_type,
            title: req.title.map(|t| t.trim().to_string()),
            duration: req.duration,
            intensity: req.intensity,
            date: req.date,
            completed: req.completed,
            notes: req.notes,
        };

        let session = repo
            .update(id, input)
            .await?
            .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))?;
        info!(session_id = %session.id, "Training session updated");
        Ok(session)
    }

    /// Delete a session
    pub async fn delete(repo: &dyn SessionRepository, id: &str) -> Result<(), ApiError> {
        if !repo.delete(id).await? {
            return Err(ApiError::NotFound("Session not found".to_string()));
        }
        info!(session_id = %id, "Training session deleted");
        Ok(())
    }
}
