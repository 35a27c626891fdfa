//! Fitness-assessment stage handler.
//!
//! Collects experience level, primary goal, and any limitations. No plan
//! generator here — the proposal is a summary the user confirms, and the
//! committed record seeds both downstream generators.

use chrono::Utc;
use serde_json::{Map, Value};

use crate::error::{ConstraintError, Error, ModificationError, Result};
use crate::intent::{RequiredSlots, SlotKind, SlotSpec};
use crate::onboarding::session::{FitnessAssessmentRecord, Session};
use crate::onboarding::state::Stage;
use crate::plan::{FitnessLevel, PrimaryGoal};

use super::{StageHandler, enum_slot, set_slot};

static LIMITATION_VOCAB: &[&str] = &[
    "knee",
    "shoulder",
    "lower back",
    "back",
    "wrist",
    "hip",
    "elbow",
    "ankle",
    "neck",
];

static SLOTS: [SlotSpec; 3] = [
    SlotSpec {
        name: "fitness_level",
        kind: SlotKind::Enumerated(&["beginner", "intermediate", "advanced"]),
        required: true,
        keywords: &["level", "experience", "trained"],
    },
    SlotSpec {
        name: "primary_goal",
        kind: SlotKind::Enumerated(&["fat_loss", "muscle_gain", "general_fitness"]),
        required: true,
        keywords: &["goal", "want"],
    },
    SlotSpec {
        name: "limitations",
        kind: SlotKind::List(LIMITATION_VOCAB),
        required: false,
        keywords: &["injur", "limitation", "pain", "issue"],
    },
];

pub struct FitnessAssessmentHandler;

impl FitnessAssessmentHandler {
    pub fn new() -> Self {
        Self
    }

    fn summary(&self, session: &Session) -> Result<String> {
        let level: FitnessLevel = enum_slot(&session.slots, "fitness_level")
            .ok_or_else(|| missing_slot("fitness_level"))?;
        let goal: PrimaryGoal =
            enum_slot(&session.slots, "primary_goal").ok_or_else(|| missing_slot("primary_goal"))?;
        let limitations = set_slot(&session.slots, "limitations");
        let (lo, hi) = level.recommended_frequency();

        let limitations_line = if limitations.is_empty() {
            "none declared".to_string()
        } else {
            limitations.iter().cloned().collect::<Vec<_>>().join(", ")
        };
        Ok(format!(
            "Here's your assessment: {level} level, training for {goal}, limitations: {limitations_line}.\n\
             At the {level} level I'd recommend {lo}-{hi} training days per week.\n\
             Does that capture it?"
        ))
    }
}

impl Default for FitnessAssessmentHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl StageHandler for FitnessAssessmentHandler {
    fn stage(&self) -> Stage {
        Stage::FitnessAssessment
    }

    fn required_slots(&self) -> RequiredSlots {
        RequiredSlots {
            stage: "fitness_assessment",
            slots: &SLOTS,
        }
    }

    fn propose(&self, session: &mut Session) -> Result<String> {
        self.summary(session)
    }

    fn apply_modification(
        &self,
        session: &mut Session,
        slots: &Map<String, Value>,
    ) -> Result<String> {
        if !slots.keys().any(|k| SLOTS.iter().any(|s| s.name == k)) {
            return Err(ModificationError::Incompatible {
                reason: "I couldn't find anything in that to change".into(),
            }
            .into());
        }
        self.merge_slots(session, slots);
        self.summary(session)
    }

    fn commit(&self, session: &mut Session, user_approved: bool) -> Result<()> {
        if !user_approved {
            return Err(crate::error::OnboardingError::ApprovalNotConfirmed.into());
        }
        let record = FitnessAssessmentRecord {
            fitness_level: enum_slot(&session.slots, "fitness_level")
                .ok_or_else(|| missing_slot("fitness_level"))?,
            primary_goal: enum_slot(&session.slots, "primary_goal")
                .ok_or_else(|| missing_slot("primary_goal"))?,
            limitations: set_slot(&session.slots, "limitations"),
            completed_at: Utc::now(),
        };
        session.context.insert_fitness_assessment(record)?;
        Ok(())
    }

    fn prompt(&self, session: &Session) -> String {
        match self.missing_slots(session).first() {
            Some(&"fitness_level") => {
                "How experienced are you with training — beginner, intermediate, or advanced?"
                    .to_string()
            }
            Some(&"primary_goal") => {
                "What's your main goal: fat loss, muscle gain, or general fitness?".to_string()
            }
            _ => "Any injuries or limitations I should plan around?".to_string(),
        }
    }
}

fn missing_slot(name: &str) -> Error {
    ConstraintError::invalid(name, "value is missing or unrecognized", "a valid value").into()
}
