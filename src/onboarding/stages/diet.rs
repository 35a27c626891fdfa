//! Diet-planning stage handler.
//!
//! Collects diet type, meal cadence, and exclusions; reads training volume
//! from the committed workout plan and the goal from the assessment.

use chrono::Utc;
use serde_json::{Map, Value};

use crate::config::EngineConfig;
use crate::error::{Error, ModificationError, OnboardingError, Result, SequenceViolation};
use crate::intent::{RequiredSlots, SlotKind, SlotSpec};
use crate::onboarding::session::{CandidatePlan, DietPlanningRecord, Session};
use crate::onboarding::state::Stage;
use crate::plan::{DietType, MealConstraints, MealDelta, MealPlan, MealPlanGenerator, MealPrepLevel};

use super::{StageHandler, enum_slot, int_slot, set_slot};

static ALLERGEN_VOCAB: &[&str] = &[
    "peanut", "nuts", "dairy", "gluten", "shellfish", "egg", "soy", "fish", "sesame",
];

static DISLIKE_VOCAB: &[&str] = &[
    "broccoli", "fish", "tofu", "mushroom", "onion", "cilantro", "olives", "beans", "salmon",
    "chicken", "beef", "pasta", "rice", "oats",
];

static SLOTS: [SlotSpec; 9] = [
    SlotSpec {
        name: "diet_type",
        kind: SlotKind::Enumerated(&["omnivore", "vegetarian", "vegan", "pescatarian"]),
        required: true,
        keywords: &["diet", "eat"],
    },
    SlotSpec {
        name: "meal_frequency",
        kind: SlotKind::Integer { min: 2, max: 6 },
        required: true,
        keywords: &["meal", "eat", "feeding"],
    },
    SlotSpec {
        name: "meal_prep_level",
        kind: SlotKind::Enumerated(&["low", "medium", "high"]),
        required: true,
        keywords: &["prep", "cook"],
    },
    SlotSpec {
        name: "allergies",
        kind: SlotKind::List(ALLERGEN_VOCAB),
        required: false,
        keywords: &["allerg"],
    },
    SlotSpec {
        name: "dislikes",
        kind: SlotKind::List(DISLIKE_VOCAB),
        required: false,
        keywords: &["dislike", "hate", "avoid"],
    },
    // Modification-only slots.
    SlotSpec {
        name: "daily_calories",
        kind: SlotKind::Integer { min: 1200, max: 5000 },
        required: false,
        keywords: &["calorie", "kcal"],
    },
    SlotSpec {
        name: "protein_g",
        kind: SlotKind::Integer { min: 40, max: 400 },
        required: false,
        keywords: &["protein"],
    },
    SlotSpec {
        name: "carbs_g",
        kind: SlotKind::Integer { min: 50, max: 700 },
        required: false,
        keywords: &["carb"],
    },
    SlotSpec {
        name: "fats_g",
        kind: SlotKind::Integer { min: 20, max: 250 },
        required: false,
        keywords: &["fat"],
    },
];

pub struct DietPlanningHandler {
    generator: MealPlanGenerator,
}

impl DietPlanningHandler {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            generator: MealPlanGenerator::new(config),
        }
    }

    /// Constraints from the draft slots plus prior stage context.
    fn build_constraints(&self, session: &Session) -> Result<MealConstraints> {
        let assessment = session.context.fitness_assessment().ok_or_else(|| {
            context_missing(Stage::FitnessAssessment)
        })?;
        let workout = session.context.workout_planning().ok_or_else(|| {
            context_missing(Stage::WorkoutPlanning)
        })?;

        let diet_type: DietType =
            enum_slot(&session.slots, "diet_type").ok_or_else(|| missing_slot("diet_type"))?;
        let meal_frequency = int_slot(&session.slots, "meal_frequency")
            .ok_or_else(|| missing_slot("meal_frequency"))? as u8;
        let meal_prep_level: MealPrepLevel = enum_slot(&session.slots, "meal_prep_level")
            .ok_or_else(|| missing_slot("meal_prep_level"))?;

        Ok(MealConstraints {
            diet_type,
            primary_goal: assessment.primary_goal,
            meal_frequency,
            meal_prep_level,
            allergies: set_slot(&session.slots, "allergies"),
            dislikes: set_slot(&session.slots, "dislikes"),
            workout_frequency: workout.proposed_plan.frequency,
        })
    }

    fn candidate(&self, session: &Session) -> Result<MealPlan> {
        match &session.candidate_plan {
            Some(CandidatePlan::Meal(plan)) => Ok(plan.clone()),
            _ => Err(SequenceViolation {
                stage: Stage::DietPlanning.to_string(),
                status: session.current_status().to_string(),
            }
            .into()),
        }
    }

    fn render(&self, plan: &MealPlan) -> String {
        let mut lines = vec![format!(
            "Here's your nutrition plan: {} kcal per day — {}g protein, {}g carbs, {}g fats across {} meals.",
            plan.daily_calories, plan.protein_g, plan.carbs_g, plan.fats_g, plan.meal_frequency
        )];
        lines.push(format!("Timing: {}.", plan.meal_timing_suggestion));
        lines.push("Sample meals:".to_string());
        for meal in &plan.sample_meals {
            lines.push(format!(
                "  {} ({}): {}",
                meal.name,
                meal.meal_type,
                meal.ingredients.join(", ")
            ));
        }
        lines.push("Happy with this plan?".to_string());
        lines.join("\n")
    }
}

impl StageHandler for DietPlanningHandler {
    fn stage(&self) -> Stage {
        Stage::DietPlanning
    }

    fn required_slots(&self) -> RequiredSlots {
        RequiredSlots {
            stage: "diet_planning",
            slots: &SLOTS,
        }
    }

    fn propose(&self, session: &mut Session) -> Result<String> {
        let constraints = self.build_constraints(session)?;
        let plan = self.generator.generate(&constraints)?;
        let message = self.render(&plan);
        session.candidate_plan = Some(CandidatePlan::Meal(plan));
        Ok(message)
    }

    fn apply_modification(
        &self,
        session: &mut Session,
        slots: &Map<String, Value>,
    ) -> Result<String> {
        let delta = MealDelta {
            daily_calories: int_slot(slots, "daily_calories").map(|v| v as u32),
            protein_g: int_slot(slots, "protein_g").map(|v| v as u32),
            carbs_g: int_slot(slots, "carbs_g").map(|v| v as u32),
            fats_g: int_slot(slots, "fats_g").map(|v| v as u32),
            meal_frequency: int_slot(slots, "meal_frequency").map(|v| v as u8),
            diet_type: enum_slot::<DietType>(slots, "diet_type"),
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

        if let Some(frequency) = delta.meal_frequency {
            session
                .slots
                .insert("meal_frequency".into(), Value::from(frequency));
        }
        if let Some(diet_type) = delta.diet_type {
            session
                .slots
                .insert("diet_type".into(), Value::String(diet_type.to_string()));
        }

        let message = self.render(&modified);
        session.candidate_plan = Some(CandidatePlan::Meal(modified));
        Ok(message)
    }

    fn commit(&self, session: &mut Session, user_approved: bool) -> Result<()> {
        if !user_approved {
            return Err(OnboardingError::ApprovalNotConfirmed.into());
        }
        let record = DietPlanningRecord {
            preferences: self.build_constraints(session)?,
            proposed_plan: self.candidate(session)?,
            user_approved: true,
            completed_at: Utc::now(),
        };
        session.context.insert_diet_planning(record)?;
        Ok(())
    }

    fn prompt(&self, session: &Session) -> String {
        match self.missing_slots(session).first() {
            Some(&"diet_type") => {
                "How do you eat — omnivore, vegetarian, vegan, or pescatarian?".to_string()
            }
            Some(&"meal_frequency") => "How many meals a day suit you, between 2 and 6?".to_string(),
            Some(&"meal_prep_level") => {
                "How much meal prep are you up for — low, medium, or high?".to_string()
            }
            _ => "Any allergies or foods you'd rather avoid?".to_string(),
        }
    }
}

fn context_missing(missing: Stage) -> Error {
    Error::Onboarding(OnboardingError::ContextMissing {
        stage: Stage::DietPlanning.to_string(),
        missing: missing.context_key().to_string(),
    })
}

fn missing_slot(name: &str) -> Error {
    crate::error::ConstraintError::invalid(name, "value is missing or unrecognized", "a valid value")
        .into()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use serde_json::json;

    use crate::onboarding::session::{FitnessAssessmentRecord, WorkoutPlanningRecord};
    use crate::onboarding::state::StageStatus;
    use crate::plan::{
        FitnessLevel, Location, PrimaryGoal, WorkoutConstraints, WorkoutPlanGenerator,
    };

    fn session_at_diet_stage(goal: PrimaryGoal, workout_frequency: u8) -> Session {
        let mut session = Session::new("user-1");
        session.begin_if_needed();

        let config = EngineConfig::default();
        let constraints = WorkoutConstraints {
            fitness_level: FitnessLevel::Intermediate,
            primary_goal: goal,
            frequency: workout_frequency,
            duration_minutes: 60,
            location: Location::Gym,
            equipment: BTreeSet::new(),
            limitations: BTreeSet::new(),
        };
        let plan = WorkoutPlanGenerator::new(&config)
            .generate(&constraints)
            .unwrap();

        session
            .context
            .insert_fitness_assessment(FitnessAssessmentRecord {
                fitness_level: FitnessLevel::Intermediate,
                primary_goal: goal,
                limitations: BTreeSet::new(),
                completed_at: Utc::now(),
            })
            .unwrap();
        session
            .context
            .insert_workout_planning(WorkoutPlanningRecord {
                preferences: constraints,
                proposed_plan: plan,
                user_approved: true,
                completed_at: Utc::now(),
            })
            .unwrap();

        for _ in 0..2 {
            session.transition_current(StageStatus::Proposed).unwrap();
            session
                .transition_current(StageStatus::AwaitingApproval)
                .unwrap();
            session.transition_current(StageStatus::Complete).unwrap();
            session.advance().unwrap();
        }
        session
    }

    fn fill_required(session: &mut Session) {
        session.slots.insert("diet_type".into(), json!("omnivore"));
        session.slots.insert("meal_frequency".into(), json!(4));
        session.slots.insert("meal_prep_level".into(), json!("medium"));
    }

    #[test]
    fn constraints_read_training_volume_from_context() {
        let handler = DietPlanningHandler::new(&EngineConfig::default());
        let mut session = session_at_diet_stage(PrimaryGoal::FatLoss, 4);
        fill_required(&mut session);

        let constraints = handler.build_constraints(&session).unwrap();
        assert_eq!(constraints.workout_frequency, 4);
        assert_eq!(constraints.primary_goal, PrimaryGoal::FatLoss);
    }

    #[test]
    fn propose_stores_the_candidate_plan() {
        let handler = DietPlanningHandler::new(&EngineConfig::default());
        let mut session = session_at_diet_stage(PrimaryGoal::FatLoss, 4);
        fill_required(&mut session);

        let message = handler.propose(&mut session).unwrap();
        assert!(message.contains("kcal"));
        match &session.candidate_plan {
            Some(CandidatePlan::Meal(plan)) => {
                // base 2000 × 1.5 − 400
                assert_eq!(plan.daily_calories, 2600);
            }
            other => panic!("expected meal candidate, got {other:?}"),
        }
    }

    #[test]
    fn propose_without_workout_context_fails() {
        let handler = DietPlanningHandler::new(&EngineConfig::default());
        let mut session = Session::new("user-1");
        session.begin_if_needed();
        fill_required(&mut session);

        let err = handler.propose(&mut session).unwrap_err();
        assert!(matches!(
            err,
            Error::Onboarding(OnboardingError::ContextMissing { .. })
        ));
    }

    #[test]
    fn diet_type_modification_regenerates_meals() {
        let handler = DietPlanningHandler::new(&EngineConfig::default());
        let mut session = session_at_diet_stage(PrimaryGoal::GeneralFitness, 3);
        fill_required(&mut session);
        handler.propose(&mut session).unwrap();

        let mut slots = Map::new();
        slots.insert("diet_type".into(), json!("vegan"));
        handler.apply_modification(&mut session, &slots).unwrap();

        assert_eq!(session.slots["diet_type"], "vegan");
        match &session.candidate_plan {
            Some(CandidatePlan::Meal(plan)) => {
                for meal in &plan.sample_meals {
                    assert!(!meal.name.contains("Chicken"));
                    assert!(!meal.name.contains("Salmon"));
                }
            }
            other => panic!("expected meal candidate, got {other:?}"),
        }
    }

    #[test]
    fn commit_writes_preferences_and_plan() {
        let handler = DietPlanningHandler::new(&EngineConfig::default());
        let mut session = session_at_diet_stage(PrimaryGoal::MuscleGain, 5);
        fill_required(&mut session);
        handler.propose(&mut session).unwrap();
        handler.commit(&mut session, true).unwrap();

        let record = session.context.diet_planning().unwrap();
        assert!(record.user_approved);
        assert_eq!(record.preferences.workout_frequency, 5);
        assert_eq!(record.proposed_plan.meal_frequency, 4);
    }

    #[test]
    fn commit_without_approval_writes_nothing() {
        let handler = DietPlanningHandler::new(&EngineConfig::default());
        let mut session = session_at_diet_stage(PrimaryGoal::MuscleGain, 3);
        fill_required(&mut session);
        handler.propose(&mut session).unwrap();

        assert!(handler.commit(&mut session, false).is_err());
        assert!(session.context.diet_planning().is_none());
    }
}
