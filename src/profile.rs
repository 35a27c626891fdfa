//! Profile assembly — the single atomic-commit point of onboarding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::OnboardingError;
use crate::onboarding::session::{
    DietPlanningRecord, FitnessAssessmentRecord, SchedulingRecord, Session, WorkoutPlanningRecord,
};
use crate::onboarding::state::Stage;

/// The locked user profile produced from a fully completed session.
///
/// Created exactly once per user; after assembly it is owned by the
/// post-onboarding system and never mutated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: String,
    pub fitness_assessment: FitnessAssessmentRecord,
    pub workout_planning: WorkoutPlanningRecord,
    pub diet_planning: DietPlanningRecord,
    pub scheduling: SchedulingRecord,
    pub locked: bool,
    pub created_at: DateTime<Utc>,
}

/// Validates stage completeness and builds the profile value.
///
/// Pure with respect to the session: the durable commit (profile insert +
/// session archive, all-or-nothing) happens in the store.
pub struct ProfileAssembler;

impl ProfileAssembler {
    /// Assemble a locked profile from a session whose every stage is
    /// committed and approved.
    pub fn assemble(session: &Session) -> Result<Profile, OnboardingError> {
        let missing = session.context.missing_keys();
        if !missing.is_empty() {
            return Err(OnboardingError::Incomplete {
                missing_stages: missing.iter().map(|s| s.to_string()).collect(),
            });
        }

        let context = &session.context;
        let (Some(fitness), Some(workout), Some(diet), Some(scheduling)) = (
            context.fitness_assessment(),
            context.workout_planning(),
            context.diet_planning(),
            context.scheduling(),
        ) else {
            return Err(OnboardingError::Incomplete {
                missing_stages: context.missing_keys().iter().map(|s| s.to_string()).collect(),
            });
        };

        // Plans only enter the context through an explicit approval, but the
        // flag travels with the record; re-check it before locking.
        let mut unapproved = Vec::new();
        if !workout.user_approved {
            unapproved.push(Stage::WorkoutPlanning.context_key().to_string());
        }
        if !diet.user_approved {
            unapproved.push(Stage::DietPlanning.context_key().to_string());
        }
        if !unapproved.is_empty() {
            return Err(OnboardingError::Incomplete {
                missing_stages: unapproved,
            });
        }

        Ok(Profile {
            id: Uuid::new_v4(),
            user_id: session.user_id.clone(),
            fitness_assessment: fitness.clone(),
            workout_planning: workout.clone(),
            diet_planning: diet.clone(),
            scheduling: scheduling.clone(),
            locked: true,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::config::EngineConfig;
    use crate::plan::{
        FitnessLevel, Location, MealConstraints, MealPlanGenerator, MealPrepLevel, PrimaryGoal,
        WorkoutConstraints, WorkoutPlanGenerator,
    };
    use crate::plan::DietType;

    fn complete_session() -> Session {
        let config = EngineConfig::default();
        let mut session = Session::new("user-1");

        let workout_constraints = WorkoutConstraints {
            fitness_level: FitnessLevel::Intermediate,
            primary_goal: PrimaryGoal::MuscleGain,
            frequency: 4,
            duration_minutes: 60,
            location: Location::Gym,
            equipment: BTreeSet::new(),
            limitations: BTreeSet::new(),
        };
        let workout_plan = WorkoutPlanGenerator::new(&config)
            .generate(&workout_constraints)
            .unwrap();

        let meal_constraints = MealConstraints {
            diet_type: DietType::Omnivore,
            primary_goal: PrimaryGoal::MuscleGain,
            meal_frequency: 4,
            meal_prep_level: MealPrepLevel::Medium,
            allergies: BTreeSet::new(),
            dislikes: BTreeSet::new(),
            workout_frequency: 4,
        };
        let meal_plan = MealPlanGenerator::new(&config)
            .generate(&meal_constraints)
            .unwrap();

        session
            .context
            .insert_fitness_assessment(FitnessAssessmentRecord {
                fitness_level: FitnessLevel::Intermediate,
                primary_goal: PrimaryGoal::MuscleGain,
                limitations: BTreeSet::new(),
                completed_at: Utc::now(),
            })
            .unwrap();
        session
            .context
            .insert_workout_planning(WorkoutPlanningRecord {
                preferences: workout_constraints,
                proposed_plan: workout_plan,
                user_approved: true,
                completed_at: Utc::now(),
            })
            .unwrap();
        session
            .context
            .insert_diet_planning(DietPlanningRecord {
                preferences: meal_constraints,
                proposed_plan: meal_plan,
                user_approved: true,
                completed_at: Utc::now(),
            })
            .unwrap();
        session
            .context
            .insert_scheduling(SchedulingRecord {
                hydration_preferences: "3L per day".into(),
                supplement_preferences: "creatine".into(),
                completed_at: Utc::now(),
            })
            .unwrap();
        session
    }

    #[test]
    fn assembles_a_locked_profile_from_a_complete_session() {
        let session = complete_session();
        let profile = ProfileAssembler::assemble(&session).unwrap();
        assert!(profile.locked);
        assert_eq!(profile.user_id, "user-1");
        assert_eq!(profile.workout_planning.preferences.frequency, 4);
        assert_eq!(profile.scheduling.hydration_preferences, "3L per day");
    }

    #[test]
    fn incomplete_session_lists_exactly_the_missing_keys() {
        let mut session = Session::new("user-1");
        session
            .context
            .insert_fitness_assessment(FitnessAssessmentRecord {
                fitness_level: FitnessLevel::Beginner,
                primary_goal: PrimaryGoal::FatLoss,
                limitations: BTreeSet::new(),
                completed_at: Utc::now(),
            })
            .unwrap();

        let err = ProfileAssembler::assemble(&session).unwrap_err();
        match err {
            OnboardingError::Incomplete { missing_stages } => {
                assert_eq!(
                    missing_stages,
                    vec!["workout_planning", "diet_planning", "scheduling"]
                );
            }
            other => panic!("expected Incomplete, got {other:?}"),
        }
    }

    #[test]
    fn empty_session_lists_all_stage_keys() {
        let session = Session::new("user-1");
        let err = ProfileAssembler::assemble(&session).unwrap_err();
        match err {
            OnboardingError::Incomplete { missing_stages } => {
                assert_eq!(missing_stages.len(), 4);
            }
            other => panic!("expected Incomplete, got {other:?}"),
        }
    }
}
