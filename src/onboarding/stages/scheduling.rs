//! Scheduling/lifestyle stage handler.
//!
//! The last stage collects hydration and supplement preferences as free
//! text. No generator — an explicit confirmation commits the record.

use chrono::Utc;
use serde_json::{Map, Value};

use crate::error::{ModificationError, OnboardingError, Result};
use crate::intent::{RequiredSlots, SlotKind, SlotSpec};
use crate::onboarding::session::{SchedulingRecord, Session};
use crate::onboarding::state::Stage;

use super::{StageHandler, text_slot};

static SLOTS: [SlotSpec; 2] = [
    SlotSpec {
        name: "hydration_preferences",
        kind: SlotKind::Text,
        required: true,
        keywords: &["water", "hydration", "drink", "litre", "liter"],
    },
    SlotSpec {
        name: "supplement_preferences",
        kind: SlotKind::Text,
        required: true,
        keywords: &["supplement", "creatine", "protein powder", "vitamin"],
    },
];

pub struct SchedulingHandler;

impl SchedulingHandler {
    pub fn new() -> Self {
        Self
    }

    fn summary(&self, session: &Session) -> Result<String> {
        let hydration = text_slot(&session.slots, "hydration_preferences")
            .ok_or_else(|| missing_slot("hydration_preferences"))?;
        let supplements = text_slot(&session.slots, "supplement_preferences")
            .ok_or_else(|| missing_slot("supplement_preferences"))?;
        Ok(format!(
            "Last step — here's what I noted for daily habits:\n\
             Hydration: {hydration}\n\
             Supplements: {supplements}\n\
             Confirm and I'll finish setting up your profile."
        ))
    }
}

impl Default for SchedulingHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl StageHandler for SchedulingHandler {
    fn stage(&self) -> Stage {
        Stage::Scheduling
    }

    fn required_slots(&self) -> RequiredSlots {
        RequiredSlots {
            stage: "scheduling",
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
            return Err(OnboardingError::ApprovalNotConfirmed.into());
        }
        let record = SchedulingRecord {
            hydration_preferences: text_slot(&session.slots, "hydration_preferences")
                .ok_or_else(|| missing_slot("hydration_preferences"))?,
            supplement_preferences: text_slot(&session.slots, "supplement_preferences")
                .ok_or_else(|| missing_slot("supplement_preferences"))?,
            completed_at: Utc::now(),
        };
        session.context.insert_scheduling(record)?;
        Ok(())
    }

    fn prompt(&self, session: &Session) -> String {
        match self.missing_slots(session).first() {
            Some(&"hydration_preferences") => {
                "How much water do you usually drink in a day?".to_string()
            }
            Some(&"supplement_preferences") => {
                "Do you take any supplements, or plan to?".to_string()
            }
            _ => "Anything else about your daily routine?".to_string(),
        }
    }
}

fn missing_slot(name: &str) -> crate::error::Error {
    crate::error::ConstraintError::invalid(name, "value is missing or unrecognized", "a valid value")
        .into()
}
