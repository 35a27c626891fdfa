//! Workout-planning stage handler.
//!
//! Collects schedule and equipment slots, reads the committed fitness
//! assessment for level/goal/limitations, and drives the workout generator.

use chrono::Utc;
use serde_json::{Map, Value};

use crate::config::EngineConfig;
use crate::error::{Error, ModificationError, OnboardingError, Result, SequenceViolation};
use crate::intent::{RequiredSlots, SlotKind, SlotSpec};
use crate::onboarding::session::{CandidatePlan, Session, WorkoutPlanningRecord};
use crate::onboarding::state::Stage;
use crate::plan::{
    Location, TrainingSplit, WorkoutConstraints, WorkoutDelta, WorkoutPlan, WorkoutPlanGenerator,
};

use super::{StageHandler, enum_slot, int_slot, set_slot};

static EQUIPMENT_VOCAB: &[&str] = &[
    "dumbbells",
    "barbell",
    "kettlebell",
    "bench",
    "pull-up bar",
    "resistance bands",
    "cable machine",
    "leg press machine",
    "treadmill",
    "rowing machine",
    "squat rack",
];

static SLOTS: [SlotSpec; 5] = [
    SlotSpec {
        name: "frequency",
        kind: SlotKind::Integer { min: 2, max: 7 },
        required: true,
        keywords: &["day", "time", "session", "week"],
    },
    SlotSpec {
        name: "duration_minutes",
        kind: SlotKind::Integer { min: 20, max: 180 },
        required: true,
        keywords: &["minute", "min", "hour", "long"],
    },
    SlotSpec {
        name: "location",
        kind: SlotKind::Enumerated(&["home", "gym"]),
        required: true,
        keywords: &["train", "location", "workout"],
    },
    SlotSpec {
        name: "equipment",
        kind: SlotKind::List(EQUIPMENT_VOCAB),
        required: false,
        keywords: &["equipment", "gear"],
    },
    SlotSpec {
        name: "training_split",
        kind: SlotKind::Enumerated(&["Full Body", "Upper/Lower", "Push/Pull/Legs", "Body Part Split"]),
        required: false,
        keywords: &["split"],
    },
];

pub struct WorkoutPlanningHandler {
    generator: WorkoutPlanGenerator,
}

impl WorkoutPlanningHandler {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            generator: WorkoutPlanGenerator::new(config),
        }
    }

    /// Constraints from the draft slots plus the committed assessment.
    fn build_constraints(&self, session: &Session) -> Result<WorkoutConstraints> {
        let assessment = session.context.fitness_assessment().ok_or_else(|| {
            Error::Onboarding(OnboardingError::ContextMissing {
                stage: Stage::WorkoutPlanning.to_string(),
                missing: Stage::FitnessAssessment.context_key().to_string(),
            })
        })?;

        let frequency = int_slot(&session.slots, "frequency")
            .ok_or_else(|| missing_slot("frequency"))? as u8;
        let duration_minutes = int_slot(&session.slots, "duration_minutes")
            .ok_or_else(|| missing_slot("duration_minutes"))? as u32;
        let location: Location =
            enum_slot(&session.slots, "location").ok_or_else(|| missing_slot("location"))?;

        Ok(WorkoutConstraints {
            fitness_level: assessment.fitness_level,
            primary_goal: assessment.primary_goal,
            frequency,
            duration_minutes,
            location,
            equipment: set_slot(&session.slots, "equipment"),
            limitations: assessment.limitations.clone(),
        })
    }

    fn candidate(&self, session: &Session) -> Result<WorkoutPlan> {
        match &session.candidate_plan {
            Some(CandidatePlan::Workout(plan)) => Ok(plan.clone()),
            _ => Err(SequenceViolation {
                stage: Stage::WorkoutPlanning.to_string(),
                status: session.current_status().to_string(),
            }
            .into()),
        }
    }

    fn render(&self, plan: &WorkoutPlan) -> String {
        let mut lines = vec![format!(
            "Here's your {} plan — {} days per week, about {} minutes per session:",
            plan.training_split, plan.frequency, plan.duration_minutes
        )];
        for day in &plan.workout_days {
            let exercises: Vec<String> = day
                .exercises
                .iter()
                .map(|e| format!("{} {}x{}", e.name, e.sets, e.reps))
                .collect();
            lines.push(format!("  {}: {}", day.name, exercises.join(", ")));
        }
        lines.push(format!("Progression: {}", plan.progression_strategy));
        lines.push("Happy with this plan?".to_string());
        lines.join("\n")
    }
}

impl StageHandler for WorkoutPlanningHandler {
    fn stage(&self) -> Stage {
        Stage::WorkoutPlanning
    }

    fn required_slots(&self) -> RequiredSlots {
        RequiredSlots {
            stage: "workout_planning",
            slots: &SLOTS,
        }
    }

    fn propose(&self, session: &mut Session) -> Result<String> {
        let constraints = self.build_constraints(session)?;
        let plan = self.generator.generate(&constraints)?;
        let message = self.render(&plan);
        session.candidate_plan = Some(CandidatePlan::Workout(plan));
        Ok(message)
    }

    fn apply_modification(
        &self,
        session: &mut Session,
        slots: &Map<String, Value>,
    ) -> Result<String> {
        let delta = WorkoutDelta {
            frequency: int_slot(slots, "frequency").map(|v| v as u8),
            duration_minutes: int_slot(slots, "duration_minutes").map(|v| v as u32),
            training_split: enum_slot::<TrainingSplit>(slots, "training_split"),
        };
        if delta.is_empty() {
            return Err(ModificationError::Incompatible {
                reason: "I couldn't find anything in that to change".into(),
            }
            .into());
        }

        let constraints = self.build_constraints(session)?;
        let current = self.candidate(session)?;
        let modified = self.generator.modify(&constraints, &current, &delta)?;

        // Keep the draft slots in sync so the committed preferences reflect
        // the modified plan.
        if let Some(frequency) = delta.frequency {
            session
                .slots
                .insert("frequency".into(), Value::from(frequency));
        }
        if let Some(duration) = delta.duration_minutes {
            session
                .slots
                .insert("duration_minutes".into(), Value::from(duration));
        }

        let message = self.render(&modified);
        session.candidate_plan = Some(CandidatePlan::Workout(modified));
        Ok(message)
    }

    fn commit(&self, session: &mut Session, user_approved: bool) -> Result<()> {
        if !user_approved {
            return Err(OnboardingError::ApprovalNotConfirmed.into());
        }
        let record = WorkoutPlanningRecord {
            preferences: self.build_constraints(session)?,
            proposed_plan: self.candidate(session)?,
            user_approved: true,
            completed_at: Utc::now(),
        };
        session.context.insert_workout_planning(record)?;
        Ok(())
    }

    fn prompt(&self, session: &Session) -> String {
        match self.missing_slots(session).first() {
            Some(&"frequency") => "How many days per week can you train?".to_string(),
            Some(&"duration_minutes") => "How long can each session run, in minutes?".to_string(),
            Some(&"location") => {
                "Will you train at home or at a gym? If at home, what equipment do you have?"
                    .to_string()
            }
            _ => "Anything else about your schedule or equipment?".to_string(),
        }
    }
}

fn missing_slot(name: &str) -> Error {
    crate::error::ConstraintError::invalid(name, "value is missing or unrecognized", "a valid value")
        .into()
}
