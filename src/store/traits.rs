//! Backend-agnostic store traits.
//!
//! The engine only ever talks to these traits; the durable backend (SQL,
//! document store, …) is an integration concern outside this crate.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::onboarding::session::Session;
use crate::profile::Profile;

/// Session persistence.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the session for a user, if one exists.
    async fn load_session(&self, user_id: &str) -> Result<Option<Session>, StoreError>;

    /// Persist a session snapshot.
    async fn save_session(&self, session: &Session) -> Result<(), StoreError>;
}

/// Profile persistence and the finalization transaction.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Look up a user's locked profile.
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, StoreError>;

    /// Finalization transaction: persist the locked profile and the archived
    /// session snapshot together, or neither.
    ///
    /// Must fail with [`StoreError::Conflict`] if a profile already exists
    /// for the user, leaving everything untouched.
    async fn commit_profile(&self, profile: &Profile, session: &Session)
    -> Result<(), StoreError>;
}

/// Convenience bound for backends serving the whole engine.
pub trait OnboardingStore: SessionStore + ProfileStore {}

impl<T: SessionStore + ProfileStore> OnboardingStore for T {}
