//! In-memory store backend.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::onboarding::session::Session;
use crate::profile::Profile;

use super::traits::{ProfileStore, SessionStore};

#[derive(Default)]
struct Inner {
    sessions: HashMap<String, Session>,
    profiles: HashMap<String, Profile>,
}

/// Process-local backend. The finalization commit holds the single write
/// lock for both maps, so the profile insert and session archive land
/// together or not at all.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn load_session(&self, user_id: &str) -> Result<Option<Session>, StoreError> {
        Ok(self.inner.read().await.sessions.get(user_id).cloned())
    }

    async fn save_session(&self, session: &Session) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .sessions
            .insert(session.user_id.clone(), session.clone());
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, StoreError> {
        Ok(self.inner.read().await.profiles.get(user_id).cloned())
    }

    async fn commit_profile(
        &self,
        profile: &Profile,
        session: &Session,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.profiles.contains_key(&profile.user_id) {
            return Err(StoreError::Conflict(format!(
                "profile already exists for user {}",
                profile.user_id
            )));
        }
        if !session.archived {
            return Err(StoreError::Backend(
                "finalization requires an archived session snapshot".into(),
            ));
        }
        inner
            .profiles
            .insert(profile.user_id.clone(), profile.clone());
        inner
            .sessions
            .insert(session.user_id.clone(), session.clone());
        Ok(())
    }
}
