//! OnboardingEngine — coordinates sessions, intent extraction, stage
//! dispatch, and finalization.
//!
//! Utterances for one user serialize on that user's session mutex, so two
//! concurrent "yes" messages can never double-commit a stage. The intent
//! extractor call is the only await point inside a turn, and nothing is
//! committed before it returns.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::error::{AssemblyError, Error, OnboardingError, Result};
use crate::intent::IntentExtractor;
use crate::onboarding::router::{AdvanceOutcome, StageRouter};
use crate::onboarding::session::{Progress, Session};
use crate::onboarding::stages::{StageReply, dispatch};
use crate::onboarding::state::{Stage, StageStatus};
use crate::profile::{Profile, ProfileAssembler};
use crate::store::OnboardingStore;

/// What one processed utterance produced.
#[derive(Debug, Clone)]
pub struct EngineReply {
    /// User-facing message.
    pub message: String,
    /// The stage the session is in after this turn.
    pub stage: Stage,
    /// Its status after this turn.
    pub status: StageStatus,
    /// Set when this turn committed a stage.
    pub completed_stage: Option<Stage>,
    /// True when this turn finished onboarding.
    pub onboarding_complete: bool,
    /// The assembled profile, when `onboarding_complete`.
    pub profile: Option<Profile>,
}

/// The onboarding orchestration engine.
pub struct OnboardingEngine {
    extractor: Arc<dyn IntentExtractor>,
    store: Arc<dyn OnboardingStore>,
    router: StageRouter,
    sessions: RwLock<HashMap<String, Arc<Mutex<Session>>>>,
}

impl OnboardingEngine {
    pub fn new(
        config: EngineConfig,
        extractor: Arc<dyn IntentExtractor>,
        store: Arc<dyn OnboardingStore>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            extractor,
            store,
            router: StageRouter::new(&config),
            sessions: RwLock::new(HashMap::new()),
        })
    }

    /// Process one utterance for a user.
    pub async fn handle_utterance(&self, user_id: &str, utterance: &str) -> Result<EngineReply> {
        let handle = self.session_handle(user_id, true).await?;
        let mut session = handle.lock().await;

        if session.archived {
            return Err(OnboardingError::AlreadyComplete {
                user_id: user_id.to_string(),
            }
            .into());
        }
        session.begin_if_needed();

        let handler = self.router.route(&session);
        let schema = handler.required_slots();
        let intent = self.extractor.classify(utterance, &schema).await?;
        let reply = dispatch(handler, &mut session, &intent)?;

        let mut engine_reply = EngineReply {
            message: reply.message().to_string(),
            stage: handler.stage(),
            status: session.current_status(),
            completed_stage: None,
            onboarding_complete: false,
            profile: None,
        };

        if let StageReply::Approved { stage, message } = &reply {
            engine_reply.completed_stage = Some(*stage);
            info!(stage = %stage, user_id, "stage committed");
            match self.router.advance(&mut session)? {
                AdvanceOutcome::NextStage(next) => {
                    let next_handler = self.router.route(&session);
                    engine_reply.message = format!(
                        "{message}\n\nNext up: {}. {}",
                        next.title(),
                        next_handler.prompt(&session)
                    );
                    engine_reply.stage = next;
                    engine_reply.status = session.current_status();
                }
                AdvanceOutcome::Finished => {
                    let profile = self.finalize(&mut session).await?;
                    engine_reply.message = format!(
                        "{message}\n\nThat's everything — your profile is ready."
                    );
                    engine_reply.status = session.current_status();
                    engine_reply.onboarding_complete = true;
                    engine_reply.profile = Some(profile);
                }
            }
        }

        self.persist(&session).await;
        Ok(engine_reply)
    }

    /// Finalize a completed onboarding for a user.
    ///
    /// Fails with `AlreadyComplete` when a locked profile exists, and with
    /// `Incomplete` (listing the missing stage keys) before every stage has
    /// committed. Safe to retry: a failed transaction changes nothing.
    pub async fn complete_onboarding(&self, user_id: &str) -> Result<Profile> {
        if self.store.get_profile(user_id).await?.is_some() {
            return Err(OnboardingError::AlreadyComplete {
                user_id: user_id.to_string(),
            }
            .into());
        }

        let handle = self.session_handle(user_id, false).await?;
        let mut session = handle.lock().await;
        if session.archived {
            return Err(OnboardingError::AlreadyComplete {
                user_id: user_id.to_string(),
            }
            .into());
        }
        let profile = self.finalize(&mut session).await?;
        self.persist(&session).await;
        Ok(profile)
    }

    /// Read-only progress snapshot for a user.
    pub async fn get_progress(&self, user_id: &str) -> Result<Progress> {
        let handle = self.session_handle(user_id, false).await?;
        let session = handle.lock().await;
        Ok(session.progress())
    }

    /// Assemble, then run the store's atomic finalization transaction.
    /// The in-memory session is only archived once the commit succeeds.
    async fn finalize(&self, session: &mut Session) -> Result<Profile> {
        if self.store.get_profile(&session.user_id).await?.is_some() {
            return Err(OnboardingError::AlreadyComplete {
                user_id: session.user_id.clone(),
            }
            .into());
        }

        let profile = ProfileAssembler::assemble(session)?;
        let mut archived = session.clone();
        archived.archived = true;
        self.store
            .commit_profile(&profile, &archived)
            .await
            .map_err(|e| {
                Error::Assembly(AssemblyError::Transaction {
                    reason: e.to_string(),
                })
            })?;
        session.archived = true;
        info!(user_id = %session.user_id, profile_id = %profile.id, "onboarding finalized");
        Ok(profile)
    }

    /// Get (or create) the in-memory handle for a user's session.
    async fn session_handle(
        &self,
        user_id: &str,
        create_missing: bool,
    ) -> Result<Arc<Mutex<Session>>> {
        if let Some(handle) = self.sessions.read().await.get(user_id) {
            return Ok(handle.clone());
        }

        let mut sessions = self.sessions.write().await;
        // Double-check: another task may have created it between locks.
        if let Some(handle) = sessions.get(user_id) {
            return Ok(handle.clone());
        }

        let session = match self.store.load_session(user_id).await? {
            Some(session) => session,
            None if create_missing => Session::new(user_id),
            None => {
                return Err(OnboardingError::SessionNotFound {
                    user_id: user_id.to_string(),
                }
                .into());
            }
        };
        let handle = Arc::new(Mutex::new(session));
        sessions.insert(user_id.to_string(), handle.clone());
        Ok(handle)
    }

    async fn persist(&self, session: &Session) {
        if let Err(e) = self.store.save_session(session).await {
            warn!(session_id = %session.id, "failed to persist session: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::RuleBasedExtractor;
    use crate::store::MemoryStore;

    fn engine() -> OnboardingEngine {
        OnboardingEngine::new(
            EngineConfig::default(),
            Arc::new(RuleBasedExtractor::new()),
            Arc::new(MemoryStore::new()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn first_utterance_creates_a_session() {
        let engine = engine();
        let reply = engine
            .handle_utterance("user-1", "I'm a beginner and I want to build muscle")
            .await
            .unwrap();
        assert_eq!(reply.stage, Stage::FitnessAssessment);
        assert_eq!(reply.status, StageStatus::AwaitingApproval);
    }

    #[tokio::test]
    async fn progress_for_unknown_user_is_an_error() {
        let engine = engine();
        let err = engine.get_progress("nobody").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Onboarding(OnboardingError::SessionNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn complete_onboarding_before_any_stage_lists_all_keys() {
        let engine = engine();
        engine.handle_utterance("user-1", "hello there").await.unwrap();
        let err = engine.complete_onboarding("user-1").await.unwrap_err();
        match err {
            Error::Onboarding(OnboardingError::Incomplete { missing_stages }) => {
                assert_eq!(missing_stages.len(), 4);
            }
            other => panic!("expected Incomplete, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn ambiguous_turns_do_not_advance_state() {
        let engine = engine();
        engine.handle_utterance("user-1", "hello there").await.unwrap();
        let progress = engine.get_progress("user-1").await.unwrap();
        assert_eq!(progress.current_stage_index, 0);
        assert!(progress.completed_stages.is_empty());
    }
}
