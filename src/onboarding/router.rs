//! Stage router — maps the session's stage index to its handler and owns
//! the advance precondition.

use tracing::error;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::onboarding::session::Session;
use crate::onboarding::stages::{
    DietPlanningHandler, FitnessAssessmentHandler, SchedulingHandler, StageHandler,
    WorkoutPlanningHandler,
};
use crate::onboarding::state::Stage;

/// Outcome of advancing past a completed stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// The session moved into this stage.
    NextStage(Stage),
    /// The last stage just completed; the profile assembler takes over.
    Finished,
}

/// Deterministic mapping from stage index to handler.
pub struct StageRouter {
    handlers: [Box<dyn StageHandler>; Stage::COUNT],
}

impl StageRouter {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            handlers: [
                Box::new(FitnessAssessmentHandler::new()),
                Box::new(WorkoutPlanningHandler::new(config)),
                Box::new(DietPlanningHandler::new(config)),
                Box::new(SchedulingHandler::new()),
            ],
        }
    }

    /// The handler for the session's current stage. Pure; no side effects.
    pub fn route(&self, session: &Session) -> &dyn StageHandler {
        self.handlers[session.current_stage_index()].as_ref()
    }

    /// Advance past the current stage.
    ///
    /// Precondition: the active handler reported `Complete`. Violations are
    /// programming errors; they are logged and propagated, never shown as a
    /// user prompt.
    pub fn advance(&self, session: &mut Session) -> Result<AdvanceOutcome> {
        match session.advance() {
            Ok(Some(stage)) => Ok(AdvanceOutcome::NextStage(stage)),
            Ok(None) => Ok(AdvanceOutcome::Finished),
            Err(violation) => {
                error!(
                    stage = %violation.stage,
                    status = %violation.status,
                    "advance called on a non-complete stage"
                );
                Err(violation.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::onboarding::state::StageStatus;

    fn router() -> StageRouter {
        StageRouter::new(&EngineConfig::default())
    }

    #[test]
    fn routes_each_index_to_its_stage() {
        let router = router();
        let mut session = Session::new("user-1");
        session.begin_if_needed();
        assert_eq!(router.route(&session).stage(), Stage::FitnessAssessment);

        for expected in [Stage::WorkoutPlanning, Stage::DietPlanning, Stage::Scheduling] {
            session.transition_current(StageStatus::Proposed).unwrap();
            session
                .transition_current(StageStatus::AwaitingApproval)
                .unwrap();
            session.transition_current(StageStatus::Complete).unwrap();
            router.advance(&mut session).unwrap();
            assert_eq!(router.route(&session).stage(), expected);
        }
    }

    #[test]
    fn advance_on_incomplete_stage_is_a_sequence_violation() {
        let router = router();
        let mut session = Session::new("user-1");
        session.begin_if_needed();
        let err = router.advance(&mut session).unwrap_err();
        assert!(matches!(err, Error::Sequence(_)));
    }

    #[test]
    fn last_stage_advance_reports_finished() {
        let router = router();
        let mut session = Session::new("user-1");
        session.begin_if_needed();
        for _ in 0..3 {
            session.transition_current(StageStatus::Proposed).unwrap();
            session
                .transition_current(StageStatus::AwaitingApproval)
                .unwrap();
            session.transition_current(StageStatus::Complete).unwrap();
            assert!(matches!(
                router.advance(&mut session).unwrap(),
                AdvanceOutcome::NextStage(_)
            ));
        }
        session.transition_current(StageStatus::Proposed).unwrap();
        session
            .transition_current(StageStatus::AwaitingApproval)
            .unwrap();
        session.transition_current(StageStatus::Complete).unwrap();
        assert_eq!(
            router.advance(&mut session).unwrap(),
            AdvanceOutcome::Finished
        );
    }
}
