//! Session model and the append-only stage-output context.
//!
//! A [`Session`] is the only mutable state in the flow. Every handler call
//! receives it explicitly; no component keeps plan state between calls.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{OnboardingError, SequenceViolation};
use crate::plan::{
    FitnessLevel, MealConstraints, MealPlan, PrimaryGoal, WorkoutConstraints, WorkoutPlan,
};

use super::state::{Stage, StageStatus};

/// Output of the fitness-assessment stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessAssessmentRecord {
    pub fitness_level: FitnessLevel,
    pub primary_goal: PrimaryGoal,
    pub limitations: BTreeSet<String>,
    pub completed_at: DateTime<Utc>,
}

/// Output of the workout-planning stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPlanningRecord {
    pub preferences: WorkoutConstraints,
    pub proposed_plan: WorkoutPlan,
    pub user_approved: bool,
    pub completed_at: DateTime<Utc>,
}

/// Output of the diet-planning stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietPlanningRecord {
    pub preferences: MealConstraints,
    pub proposed_plan: MealPlan,
    pub user_approved: bool,
    pub completed_at: DateTime<Utc>,
}

/// Output of the scheduling/lifestyle stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingRecord {
    pub hydration_preferences: String,
    pub supplement_preferences: String,
    pub completed_at: DateTime<Utc>,
}

/// Append-only map of committed stage outputs, keyed by stage name.
///
/// Each entry is written exactly once, on approval; later stages read
/// earlier entries but never write them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fitness_assessment: Option<FitnessAssessmentRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    workout_planning: Option<WorkoutPlanningRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    diet_planning: Option<DietPlanningRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scheduling: Option<SchedulingRecord>,
}

impl SessionContext {
    pub fn fitness_assessment(&self) -> Option<&FitnessAssessmentRecord> {
        self.fitness_assessment.as_ref()
    }

    pub fn workout_planning(&self) -> Option<&WorkoutPlanningRecord> {
        self.workout_planning.as_ref()
    }

    pub fn diet_planning(&self) -> Option<&DietPlanningRecord> {
        self.diet_planning.as_ref()
    }

    pub fn scheduling(&self) -> Option<&SchedulingRecord> {
        self.scheduling.as_ref()
    }

    pub fn insert_fitness_assessment(
        &mut self,
        record: FitnessAssessmentRecord,
    ) -> Result<(), OnboardingError> {
        if self.fitness_assessment.is_some() {
            return Err(OnboardingError::ContextOverwrite {
                stage: Stage::FitnessAssessment.to_string(),
            });
        }
        self.fitness_assessment = Some(record);
        Ok(())
    }

    pub fn insert_workout_planning(
        &mut self,
        record: WorkoutPlanningRecord,
    ) -> Result<(), OnboardingError> {
        if self.workout_planning.is_some() {
            return Err(OnboardingError::ContextOverwrite {
                stage: Stage::WorkoutPlanning.to_string(),
            });
        }
        self.workout_planning = Some(record);
        Ok(())
    }

    pub fn insert_diet_planning(
        &mut self,
        record: DietPlanningRecord,
    ) -> Result<(), OnboardingError> {
        if self.diet_planning.is_some() {
            return Err(OnboardingError::ContextOverwrite {
                stage: Stage::DietPlanning.to_string(),
            });
        }
        self.diet_planning = Some(record);
        Ok(())
    }

    pub fn insert_scheduling(&mut self, record: SchedulingRecord) -> Result<(), OnboardingError> {
        if self.scheduling.is_some() {
            return Err(OnboardingError::ContextOverwrite {
                stage: Stage::Scheduling.to_string(),
            });
        }
        self.scheduling = Some(record);
        Ok(())
    }

    pub fn has(&self, stage: Stage) -> bool {
        match stage {
            Stage::FitnessAssessment => self.fitness_assessment.is_some(),
            Stage::WorkoutPlanning => self.workout_planning.is_some(),
            Stage::DietPlanning => self.diet_planning.is_some(),
            Stage::Scheduling => self.scheduling.is_some(),
        }
    }

    /// Context keys for stages not yet committed, in flow order.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        Stage::ALL
            .iter()
            .filter(|s| !self.has(**s))
            .map(|s| s.context_key())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_keys().is_empty()
    }
}

/// The current stage's candidate plan, pending approval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidatePlan {
    Workout(WorkoutPlan),
    Meal(MealPlan),
}

/// One user's onboarding session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub user_id: String,
    current_stage_index: usize,
    statuses: Vec<StageStatus>,
    /// Working slot values for the current stage; cleared on advance.
    pub slots: Map<String, Value>,
    /// The current stage's proposal awaiting approval, if any.
    pub candidate_plan: Option<CandidatePlan>,
    pub context: SessionContext,
    pub created_at: DateTime<Utc>,
    /// Set by the profile assembler's commit; a terminal session accepts no
    /// further utterances.
    pub archived: bool,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            current_stage_index: 0,
            statuses: vec![StageStatus::Pending; Stage::COUNT],
            slots: Map::new(),
            candidate_plan: None,
            context: SessionContext::default(),
            created_at: Utc::now(),
            archived: false,
        }
    }

    pub fn current_stage_index(&self) -> usize {
        self.current_stage_index
    }

    pub fn current_stage(&self) -> Stage {
        Stage::from_index(self.current_stage_index).expect("stage index in range")
    }

    pub fn status(&self, stage: Stage) -> StageStatus {
        self.statuses[stage.index()]
    }

    pub fn current_status(&self) -> StageStatus {
        self.status(self.current_stage())
    }

    /// Move the first stage out of `Pending` on the first interaction.
    pub fn begin_if_needed(&mut self) {
        if self.current_stage_index == 0 && self.statuses[0] == StageStatus::Pending {
            self.statuses[0] = StageStatus::Collecting;
        }
    }

    /// Transition the current stage's status, enforcing machine legality.
    pub fn transition_current(&mut self, target: StageStatus) -> Result<(), SequenceViolation> {
        let current = self.current_status();
        if !current.can_transition_to(target) {
            return Err(SequenceViolation {
                stage: self.current_stage().to_string(),
                status: current.to_string(),
            });
        }
        self.statuses[self.current_stage_index] = target;
        Ok(())
    }

    /// Advance to the next stage.
    ///
    /// Precondition: the current stage is `Complete`. Returns the newly
    /// entered stage, or `None` when the last stage just completed.
    pub fn advance(&mut self) -> Result<Option<Stage>, SequenceViolation> {
        let current = self.current_status();
        if !current.is_terminal() {
            return Err(SequenceViolation {
                stage: self.current_stage().to_string(),
                status: current.to_string(),
            });
        }
        match self.current_stage().next() {
            Some(next) => {
                self.current_stage_index = next.index();
                self.statuses[next.index()] = StageStatus::Collecting;
                self.clear_draft();
                Ok(Some(next))
            }
            None => {
                self.clear_draft();
                Ok(None)
            }
        }
    }

    /// Drop the working slots and candidate plan for the current stage.
    pub fn clear_draft(&mut self) {
        self.slots = Map::new();
        self.candidate_plan = None;
    }

    /// Read-only progress snapshot.
    pub fn progress(&self) -> Progress {
        let completed_stages: Vec<usize> = Stage::ALL
            .iter()
            .filter(|s| self.status(**s).is_terminal())
            .map(|s| s.index())
            .collect();
        let completion_percentage =
            completed_stages.len() as f32 / Stage::COUNT as f32 * 100.0;
        Progress {
            current_stage_index: self.current_stage_index,
            total_stages: Stage::COUNT,
            completed_stages,
            completion_percentage,
        }
    }
}

/// Read-only onboarding progress, for embedding callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub current_stage_index: usize,
    pub total_stages: usize,
    pub completed_stages: Vec<usize>,
    pub completion_percentage: f32,
}
