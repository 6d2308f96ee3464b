//! Training session repository
//!
//! Sessions live in process memory for the lifetime of the server.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use triflow_shared::{Intensity, SessionType, TrainingSession};

/// Filter for listing sessions; bounds are inclusive
#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    pub user_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl SessionFilter {
    fn matches(&self, session: &TrainingSession) -> bool {
        self.user_id.as_deref().map_or(true, |u| session.user_id == u)
            && self.start_date.map_or(true, |d| session.date >= d)
            && self.end_date.map_or(true, |d| session.date <= d)
    }
}

/// Fields to change on an existing session
#[derive(Debug, Clone, Default)]
pub struct UpdateSession {
    pub session_type: Option<SessionType>,
    pub title: Option<String>,
    pub duration: Option<u32>,
    pub intensity: Option<Intensity>,
    pub date: Option<NaiveDate>,
    pub completed: Option<bool>,
    pub notes: Option<String>,
}

/// Storage for training sessions
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn insert(&self, session: TrainingSession) -> Result<TrainingSession>;

    /// Matching sessions ordered by date, then creation
    async fn list(&self, filter: &SessionFilter) -> Result<Vec<TrainingSession>>;

    async fn find(&self, id: &str) -> Result<Option<TrainingSession>>;

    /// Apply an update and bump `updated_at`; `None` when the id is unknown
    async fn update(&self, id: &str, input: UpdateSession) -> Result<Option<TrainingSession>>;

    /// Returns whether a session was removed
    async fn delete(&self, id: &str) -> Result<bool>;
}

/// In-memory session repository
#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<Vec<TrainingSession>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn insert(&self, session: TrainingSession) -> Result<TrainingSession> {
        let mut sessions = self.sessions.write().await;
        if sessions.iter().any(|s| s.id == session.id) {
            anyhow::bail!("Session {} already exists", session.id);
        }
        sessions.push(session.clone());
        Ok(session)
    }

    async fn list(&self, filter: &SessionFilter) -> Result<Vec<TrainingSession>> {
        let sessions = self.sessions.read().await;
        let mut matching: Vec<TrainingSession> = sessions
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        // Stable sort keeps insertion order within a day
        matching.sort_by_key(|s| s.date);
        Ok(matching)
    }

    async fn find(&self, id: &str) -> Result<Option<TrainingSession>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.iter().find(|s| s.id == id).cloned())
    }

    async fn update(&self, id: &str, input: UpdateSession) -> Result<Option<TrainingSession>> {
        let mut sessions = self.sessions.write().await;
        let Some(session) = sessions.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };

        if let Some(session_type) = input.session_type {
            session.session_type = session_type;
        }
        if let Some(title) = input.title {
            session.title = title;
        }
        if let Some(duration) = input.duration {
            session.duration = duration;
        }
        if let Some(intensity) = input.intensity {
            session.intensity = intensity;
        }
        if let Some(date) = input.date {
            session.date = date;
        }
        if let Some(completed) = input.completed {
            session.completed = completed;
        }
        if let Some(notes) = input.notes {
            session.notes = Some(notes);
        }
        session.updated_at = Utc::now();

        Ok(Some(session.clone()))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|s| s.id != id);
        Ok(sessions.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn session(id: &str, user: &str, date: (i32, u32, u32)) -> TrainingSession {
        let now = Utc::now();
        TrainingSession {
            id: id.to_string(),
            user_id: user.to_string(),
            session_type: SessionType::Run,
            title: "Easy run".to_string(),
            duration: 45,
            intensity: Intensity::Easy,
            completed: false,
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_list_orders_by_date_then_insertion() {
        let repo = InMemorySessionRepository::new();
        repo.insert(session("b", "u1", (2024, 1, 16))).await.unwrap();
        repo.insert(session("a", "u1", (2024, 1, 15))).await.unwrap();
        repo.insert(session("c", "u1", (2024, 1, 15))).await.unwrap();

        let ids: Vec<String> = repo
            .list(&SessionFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
    }

    #[tokio::test]
    async fn test_filter_by_range_and_user() {
        let repo = InMemorySessionRepository::new();
        repo.insert(session("a", "u1", (2024, 1, 10))).await.unwrap();
        repo.insert(session("b", "u1", (2024, 1, 15))).await.unwrap();
        repo.insert(session("c", "u2", (2024, 1, 15))).await.unwrap();
        repo.insert(session("d", "u1", (2024, 1, 20))).await.unwrap();

        let filter = SessionFilter {
            user_id: Some("u1".to_string()),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 15),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 20),
        };
        let ids: Vec<String> = repo
            .list(&filter)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["b", "d"]);
    }

    #[tokio::test]
    async fn test_update_changes_only_given_fields() {
        let repo = InMemorySessionRepository::new();
        let original = repo.insert(session("a", "u1", (2024, 1, 15))).await.unwrap();

        let updated = repo
            .update(
                "a",
                UpdateSession {
                    completed: Some(true),
                    ..UpdateSession::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert!(updated.completed);
        assert_eq!(updated.title, original.title);
        assert_eq!(updated.duration, 45);
        assert!(updated.updated_at >= original.updated_at);
        assert!(repo.update("missing", UpdateSession::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemorySessionRepository::new();
        repo.insert(session("a", "u1", (2024, 1, 15))).await.unwrap();
        assert!(repo.delete("a").await.unwrap());
        assert!(!repo.delete("a").await.unwrap());
        assert!(repo.find("a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let repo = InMemorySessionRepository::new();
        repo.insert(session("a", "u1", (2024, 1, 15))).await.unwrap();
        assert!(repo.insert(session("a", "u2", (2024, 1, 16))).await.is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn test_list_is_date_ordered_within_bounds(
            days in prop::collection::vec(0i64..60, 1..30),
            start in 0i64..30,
            span in 0i64..30
        ) {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            let origin = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
            let start_date = origin + chrono::Duration::days(start);
            let end_date = start_date + chrono::Duration::days(span);

            let listed = runtime.block_on(async {
                let repo = InMemorySessionRepository::new();
                for (i, offset) in days.iter().enumerate() {
                    let mut s = session(&format!("s{i}"), "u1", (2024, 1, 1));
                    s.date = origin + chrono::Duration::days(*offset);
                    repo.insert(s).await.unwrap();
                }
                let filter = SessionFilter {
                    user_id: None,
                    start_date: Some(start_date),
                    end_date: Some(end_date),
                };
                repo.list(&filter).await.unwrap()
            });

            let expected = days
                .iter()
                .filter(|d| **d >= start && **d <= start + span)
                .count();
            prop_assert_eq!(listed.len(), expected);
            prop_assert!(listed.windows(2).all(|w| w[0].date <= w[1].date));
            prop_assert!(listed.iter().all(|s| s.date >= start_date && s.date <= end_date));
        }
    }
}
