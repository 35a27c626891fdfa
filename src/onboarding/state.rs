//! Stage and stage-status state machines.

use serde::{Deserialize, Serialize};

/// The four onboarding stages, in flow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    FitnessAssessment,
    WorkoutPlanning,
    DietPlanning,
    Scheduling,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::FitnessAssessment,
        Stage::WorkoutPlanning,
        Stage::DietPlanning,
        Stage::Scheduling,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn index(self) -> usize {
        match self {
            Self::FitnessAssessment => 0,
            Self::WorkoutPlanning => 1,
            Self::DietPlanning => 2,
            Self::Scheduling => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Stage> {
        Self::ALL.get(index).copied()
    }

    /// The next stage in the linear progression, if any.
    pub fn next(self) -> Option<Stage> {
        Self::from_index(self.index() + 1)
    }

    /// Key under which this stage's output is stored in the session context.
    pub fn context_key(self) -> &'static str {
        match self {
            Self::FitnessAssessment => "fitness_assessment",
            Self::WorkoutPlanning => "workout_planning",
            Self::DietPlanning => "diet_planning",
            Self::Scheduling => "scheduling",
        }
    }

    /// Human-readable stage name for user-facing messages.
    pub fn title(self) -> &'static str {
        match self {
            Self::FitnessAssessment => "fitness assessment",
            Self::WorkoutPlanning => "workout planning",
            Self::DietPlanning => "diet planning",
            Self::Scheduling => "scheduling",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.context_key())
    }
}

/// Per-stage progress through the shared handler state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// Stage not yet reached.
    Pending,
    /// Gathering required slots.
    Collecting,
    /// Required slots present; a proposal is being generated.
    Proposed,
    /// A candidate proposal exists and needs explicit approval.
    AwaitingApproval,
    /// Output committed to the session context.
    Complete,
}

impl StageStatus {
    /// Check if a transition from `self` to `target` is valid.
    ///
    /// Forward progression plus the modification self-loop between
    /// `AwaitingApproval` and `Proposed`.
    pub fn can_transition_to(&self, target: StageStatus) -> bool {
        use StageStatus::*;
        matches!(
            (self, target),
            (Pending, Collecting)
                | (Collecting, Proposed)
                | (Proposed, AwaitingApproval)
                | (AwaitingApproval, Proposed)
                | (AwaitingApproval, Complete)
        )
    }

    /// Whether this status is terminal for the stage.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl Default for StageStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl std::fmt::Display for StageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Collecting => "collecting",
            Self::Proposed => "proposed",
            Self::AwaitingApproval => "awaiting_approval",
            Self::Complete => "complete",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_walk_in_order() {
        let mut current = Stage::FitnessAssessment;
        let expected = [Stage::WorkoutPlanning, Stage::DietPlanning, Stage::Scheduling];
        for stage in expected {
            let next = current.next().unwrap();
            assert_eq!(next, stage);
            current = next;
        }
        assert!(current.next().is_none());
    }

    #[test]
    fn index_roundtrip() {
        for stage in Stage::ALL {
            assert_eq!(Stage::from_index(stage.index()), Some(stage));
        }
        assert!(Stage::from_index(4).is_none());
    }

    #[test]
    fn context_keys_match_serde() {
        for stage in Stage::ALL {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json, format!("\"{}\"", stage.context_key()));
        }
    }

    #[test]
    fn valid_status_transitions() {
        use StageStatus::*;
        let transitions = [
            (Pending, Collecting),
            (Collecting, Proposed),
            (Proposed, AwaitingApproval),
            (AwaitingApproval, Proposed),
            (AwaitingApproval, Complete),
        ];
        for (from, to) in transitions {
            assert!(from.can_transition_to(to), "{from} should transition to {to}");
        }
    }

    #[test]
    fn invalid_status_transitions() {
        use StageStatus::*;
        // Skip straight to approval
        assert!(!Pending.can_transition_to(AwaitingApproval));
        assert!(!Collecting.can_transition_to(Complete));
        // Backward
        assert!(!Proposed.can_transition_to(Collecting));
        assert!(!Complete.can_transition_to(AwaitingApproval));
        // Self-transition
        assert!(!Collecting.can_transition_to(Collecting));
    }

    #[test]
    fn only_complete_is_terminal() {
        use StageStatus::*;
        assert!(Complete.is_terminal());
        for status in [Pending, Collecting, Proposed, AwaitingApproval] {
            assert!(!status.is_terminal());
        }
    }
}
