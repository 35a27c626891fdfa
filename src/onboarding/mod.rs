//! Onboarding flow: session state, stage handlers, and routing.

pub mod router;
pub mod session;
pub mod stages;
pub mod state;

pub use router::{AdvanceOutcome, StageRouter};
pub use session::{
    CandidatePlan, DietPlanningRecord, FitnessAssessmentRecord, Progress, SchedulingRecord,
    Session, SessionContext, WorkoutPlanningRecord,
};
pub use stages::{StageHandler, StageReply, dispatch};
pub use state::{Stage, StageStatus};
