//! Stage handlers — one per onboarding stage over a shared state machine.
//!
//! The handler state, not the intent extractor, decides which operation is
//! legal next: `Collecting` merges slots until the stage's required set is
//! present, a successful proposal parks the stage in `AwaitingApproval`,
//! and only an explicit approval commits the stage output.

mod diet;
mod fitness;
mod scheduling;
mod workout;

pub use diet::DietPlanningHandler;
pub use fitness::FitnessAssessmentHandler;
pub use scheduling::SchedulingHandler;
pub use workout::WorkoutPlanningHandler;

use std::collections::BTreeSet;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Error, OnboardingError, Result};
use crate::intent::{Intent, IntentKind, RequiredSlots};

use super::session::Session;
use super::state::{Stage, StageStatus};

/// What a turn produced, for rendering back to the user.
#[derive(Debug, Clone)]
pub enum StageReply {
    /// Still collecting; `missing` lists the required slots not yet filled.
    Prompt {
        message: String,
        missing: Vec<&'static str>,
    },
    /// A fresh proposal awaits approval.
    Proposed { message: String },
    /// The candidate was modified and still awaits approval.
    Modified { message: String },
    /// The stage output was committed.
    Approved { stage: Stage, message: String },
    /// Informational only; no state change.
    Info { message: String },
}

impl StageReply {
    pub fn message(&self) -> &str {
        match self {
            Self::Prompt { message, .. }
            | Self::Proposed { message }
            | Self::Modified { message }
            | Self::Approved { message, .. }
            | Self::Info { message } => message,
        }
    }
}

/// One onboarding stage's behavior over the shared machine.
pub trait StageHandler: Send + Sync {
    fn stage(&self) -> Stage;

    /// Slot schema handed to the intent extractor on every utterance.
    fn required_slots(&self) -> RequiredSlots;

    /// Build this stage's proposal from the completed slots and prior
    /// context. Candidate plans are stored on the session; the returned
    /// string is the user-facing rendering.
    fn propose(&self, session: &mut Session) -> Result<String>;

    /// Apply a modification while awaiting approval. Implementations must
    /// leave the candidate untouched when they fail.
    fn apply_modification(&self, session: &mut Session, slots: &Map<String, Value>)
    -> Result<String>;

    /// Build the stage record and append it to the session context.
    /// `user_approved` must be explicitly true; this is the only write path
    /// into `Session.context`.
    fn commit(&self, session: &mut Session, user_approved: bool) -> Result<()>;

    /// What to ask next while collecting.
    fn prompt(&self, session: &Session) -> String;

    /// Merge recognized slot values into the session draft. Unknown slot
    /// names are dropped.
    fn merge_slots(&self, session: &mut Session, slots: &Map<String, Value>) {
        let schema = self.required_slots();
        for (key, value) in slots {
            if schema.get(key).is_some() {
                session.slots.insert(key.clone(), value.clone());
            }
        }
    }

    /// Required slot names still missing from the draft.
    fn missing_slots(&self, session: &Session) -> Vec<&'static str> {
        self.required_slots()
            .slots
            .iter()
            .filter(|s| s.required && !session.slots.contains_key(s.name))
            .map(|s| s.name)
            .collect()
    }
}

/// Drive one classified utterance through the stage machine.
///
/// User-correctable failures (constraint or modification errors) become
/// informational replies with no state change; everything else propagates.
pub fn dispatch(
    handler: &dyn StageHandler,
    session: &mut Session,
    intent: &Intent,
) -> Result<StageReply> {
    let status = session.current_status();
    debug!(
        stage = %handler.stage(),
        %status,
        kind = %intent.kind,
        "dispatching intent"
    );

    match status {
        StageStatus::Collecting => match intent.kind {
            IntentKind::SlotUpdate | IntentKind::ModificationRequest => {
                handler.merge_slots(session, &intent.slots);
                let missing = handler.missing_slots(session);
                if !missing.is_empty() {
                    return Ok(StageReply::Prompt {
                        message: handler.prompt(session),
                        missing,
                    });
                }
                // Propose before transitioning so a generation failure
                // leaves the stage in Collecting for correction.
                match handler.propose(session) {
                    Ok(message) => {
                        session.transition_current(StageStatus::Proposed)?;
                        session.transition_current(StageStatus::AwaitingApproval)?;
                        Ok(StageReply::Proposed { message })
                    }
                    Err(Error::Constraint(e)) => Ok(StageReply::Info {
                        message: format!("{e}. {}", handler.prompt(session)),
                    }),
                    Err(e) => Err(e),
                }
            }
            IntentKind::Approval => Ok(StageReply::Prompt {
                message: format!(
                    "There's nothing to approve yet. {}",
                    handler.prompt(session)
                ),
                missing: handler.missing_slots(session),
            }),
            IntentKind::Question | IntentKind::Ambiguous => Ok(StageReply::Info {
                message: handler.prompt(session),
            }),
        },
        StageStatus::AwaitingApproval => match intent.kind {
            IntentKind::Approval => {
                if !intent.approval_confirmed {
                    return Err(OnboardingError::ApprovalNotConfirmed.into());
                }
                handler.commit(session, true)?;
                session.transition_current(StageStatus::Complete)?;
                Ok(StageReply::Approved {
                    stage: handler.stage(),
                    message: format!("Locked in — {} is complete.", handler.stage()),
                })
            }
            IntentKind::ModificationRequest | IntentKind::SlotUpdate => {
                match handler.apply_modification(session, &intent.slots) {
                    Ok(message) => {
                        // Self-loop: a new candidate replaces the old one.
                        session.transition_current(StageStatus::Proposed)?;
                        session.transition_current(StageStatus::AwaitingApproval)?;
                        Ok(StageReply::Modified { message })
                    }
                    Err(Error::Modification(e)) => Ok(StageReply::Info {
                        message: format!("{e}. The current proposal is unchanged."),
                    }),
                    Err(Error::Constraint(e)) => Ok(StageReply::Info {
                        message: format!("{e}. The current proposal is unchanged."),
                    }),
                    Err(e) => Err(e),
                }
            }
            IntentKind::Question | IntentKind::Ambiguous => Ok(StageReply::Info {
                message: "The proposal above is still waiting on your approval — say \"yes\" to lock it in, or tell me what to change.".to_string(),
            }),
        },
        // Proposed is transient within a turn; Pending/Complete are engine
        // states the router never routes an utterance into.
        StageStatus::Pending | StageStatus::Proposed | StageStatus::Complete => Err(
            crate::error::SequenceViolation {
                stage: handler.stage().to_string(),
                status: status.to_string(),
            }
            .into(),
        ),
    }
}

/// Read a typed enum slot (stored as its snake_case string form).
pub(crate) fn enum_slot<T: DeserializeOwned>(slots: &Map<String, Value>, name: &str) -> Option<T> {
    slots
        .get(name)
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

/// Read an integer slot.
pub(crate) fn int_slot(slots: &Map<String, Value>, name: &str) -> Option<i64> {
    slots.get(name).and_then(Value::as_i64)
}

/// Read a string-list slot into a set.
pub(crate) fn set_slot(slots: &Map<String, Value>, name: &str) -> BTreeSet<String> {
    slots
        .get(name)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Read a free-text slot.
pub(crate) fn text_slot(slots: &Map<String, Value>, name: &str) -> Option<String> {
    slots
        .get(name)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::intent::Intent;
    use serde_json::json;

    fn collecting_session() -> Session {
        let mut session = Session::new("user-1");
        session.begin_if_needed();
        session
    }

    #[test]
    fn ambiguous_intent_changes_nothing() {
        let handler = FitnessAssessmentHandler::new();
        let mut session = collecting_session();
        let before = session.clone();
        let reply = dispatch(&handler, &mut session, &Intent::ambiguous()).unwrap();
        assert!(matches!(reply, StageReply::Info { .. }));
        assert_eq!(session.current_status(), before.current_status());
        assert_eq!(session.slots, before.slots);
    }

    #[test]
    fn question_intent_changes_nothing() {
        let handler = FitnessAssessmentHandler::new();
        let mut session = collecting_session();
        let reply = dispatch(&handler, &mut session, &Intent::question()).unwrap();
        assert!(matches!(reply, StageReply::Info { .. }));
        assert_eq!(session.current_status(), StageStatus::Collecting);
    }

    #[test]
    fn approval_while_collecting_does_not_commit() {
        let handler = FitnessAssessmentHandler::new();
        let mut session = collecting_session();
        let reply = dispatch(&handler, &mut session, &Intent::approval()).unwrap();
        assert!(matches!(reply, StageReply::Prompt { .. }));
        assert_eq!(session.current_status(), StageStatus::Collecting);
        assert!(!session.context.has(Stage::FitnessAssessment));
    }

    #[test]
    fn partial_slots_keep_collecting() {
        let handler = FitnessAssessmentHandler::new();
        let mut session = collecting_session();
        let mut slots = Map::new();
        slots.insert("fitness_level".into(), json!("beginner"));
        let reply = dispatch(&handler, &mut session, &Intent::slot_update(slots)).unwrap();
        match reply {
            StageReply::Prompt { missing, .. } => {
                assert_eq!(missing, vec!["primary_goal"]);
            }
            other => panic!("expected Prompt, got {other:?}"),
        }
        assert_eq!(session.current_status(), StageStatus::Collecting);
    }

    #[test]
    fn complete_slots_move_to_awaiting_approval() {
        let handler = FitnessAssessmentHandler::new();
        let mut session = collecting_session();
        let mut slots = Map::new();
        slots.insert("fitness_level".into(), json!("beginner"));
        slots.insert("primary_goal".into(), json!("muscle_gain"));
        let reply = dispatch(&handler, &mut session, &Intent::slot_update(slots)).unwrap();
        assert!(matches!(reply, StageReply::Proposed { .. }));
        assert_eq!(session.current_status(), StageStatus::AwaitingApproval);
    }

    #[test]
    fn unconfirmed_approval_is_rejected_and_mutates_nothing() {
        let handler = FitnessAssessmentHandler::new();
        let mut session = collecting_session();
        let mut slots = Map::new();
        slots.insert("fitness_level".into(), json!("intermediate"));
        slots.insert("primary_goal".into(), json!("fat_loss"));
        dispatch(&handler, &mut session, &Intent::slot_update(slots)).unwrap();

        let mut bogus = Intent::approval();
        bogus.approval_confirmed = false;
        let before = session.context.clone();
        let err = dispatch(&handler, &mut session, &bogus).unwrap_err();
        assert!(matches!(
            err,
            Error::Onboarding(OnboardingError::ApprovalNotConfirmed)
        ));
        assert_eq!(session.context, before);
        assert_eq!(session.current_status(), StageStatus::AwaitingApproval);
    }

    #[test]
    fn confirmed_approval_commits_and_completes() {
        let handler = FitnessAssessmentHandler::new();
        let mut session = collecting_session();
        let mut slots = Map::new();
        slots.insert("fitness_level".into(), json!("advanced"));
        slots.insert("primary_goal".into(), json!("general_fitness"));
        dispatch(&handler, &mut session, &Intent::slot_update(slots)).unwrap();

        let reply = dispatch(&handler, &mut session, &Intent::approval()).unwrap();
        assert!(matches!(reply, StageReply::Approved { .. }));
        assert_eq!(session.current_status(), StageStatus::Complete);
        assert!(session.context.has(Stage::FitnessAssessment));
    }

    #[test]
    fn dispatch_into_completed_stage_is_a_sequence_violation() {
        let handler = FitnessAssessmentHandler::new();
        let mut session = collecting_session();
        let mut slots = Map::new();
        slots.insert("fitness_level".into(), json!("beginner"));
        slots.insert("primary_goal".into(), json!("fat_loss"));
        dispatch(&handler, &mut session, &Intent::slot_update(slots)).unwrap();
        dispatch(&handler, &mut session, &Intent::approval()).unwrap();

        let err = dispatch(&handler, &mut session, &Intent::approval()).unwrap_err();
        assert!(matches!(err, Error::Sequence(_)));
    }

    #[test]
    fn generation_failure_keeps_collecting() {
        // An impossible allergy set makes the diet generator fail with a
        // constraint error; the stage must stay correctable.
        let config = EngineConfig::default();
        let handler = DietPlanningHandler::new(&config);
        let mut session = Session::new("user-1");
        seed_prior_stages(&mut session);
        // Walk the session to the diet stage.
        for _ in 0..2 {
            session.transition_current(StageStatus::Proposed).unwrap();
            session
                .transition_current(StageStatus::AwaitingApproval)
                .unwrap();
            session.transition_current(StageStatus::Complete).unwrap();
            session.advance().unwrap();
        }

        let mut slots = Map::new();
        slots.insert("diet_type".into(), json!("vegan"));
        slots.insert("meal_frequency".into(), json!(3));
        slots.insert("meal_prep_level".into(), json!("low"));
        slots.insert(
            "allergies".into(),
            json!([
                "tofu", "oats", "quinoa", "lentils", "beans", "chickpeas", "pasta", "rice",
                "hummus", "almond", "peanut", "edamame", "banana"
            ]),
        );
        let reply = dispatch(&handler, &mut session, &Intent::slot_update(slots)).unwrap();
        assert!(matches!(reply, StageReply::Info { .. }));
        assert_eq!(session.current_status(), StageStatus::Collecting);
    }

    fn seed_prior_stages(session: &mut Session) {
        use crate::onboarding::session::{FitnessAssessmentRecord, WorkoutPlanningRecord};
        use crate::plan::{
            FitnessLevel, Location, PrimaryGoal, WorkoutConstraints, WorkoutPlanGenerator,
        };

        session.begin_if_needed();
        let config = EngineConfig::default();
        let constraints = WorkoutConstraints {
            fitness_level: FitnessLevel::Beginner,
            primary_goal: PrimaryGoal::GeneralFitness,
            frequency: 3,
            duration_minutes: 45,
            location: Location::Home,
            equipment: BTreeSet::new(),
            limitations: BTreeSet::new(),
        };
        let plan = WorkoutPlanGenerator::new(&config)
            .generate(&constraints)
            .unwrap();
        session
            .context
            .insert_fitness_assessment(FitnessAssessmentRecord {
                fitness_level: FitnessLevel::Beginner,
                primary_goal: PrimaryGoal::GeneralFitness,
                limitations: BTreeSet::new(),
                completed_at: chrono::Utc::now(),
            })
            .unwrap();
        session
            .context
            .insert_workout_planning(WorkoutPlanningRecord {
                preferences: constraints,
                proposed_plan: plan,
                user_approved: true,
                completed_at: chrono::Utc::now(),
            })
            .unwrap();
    }
}
