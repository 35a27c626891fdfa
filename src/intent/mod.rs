//! Intent extraction boundary.
//!
//! The core never interprets free text itself. Every utterance is handed to
//! an [`IntentExtractor`] together with the active stage's slot schema, and
//! the extractor returns a structured [`Intent`]. Any implementation — a
//! rule-based classifier, embedding similarity, or a hosted LLM call — can
//! satisfy the contract, as long as `approval_confirmed` is only ever set
//! from an explicit affirmative signal.

mod rules;

pub use rules::RuleBasedExtractor;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::IntentError;

/// What kind of message the extractor saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    /// The user supplied one or more constraint values.
    SlotUpdate,
    /// The user explicitly approved the current proposal.
    Approval,
    /// The user asked for a change to the current proposal.
    ModificationRequest,
    /// The user asked a question; no state change.
    Question,
    /// The extractor could not tell; no state change.
    Ambiguous,
}

impl std::fmt::Display for IntentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::SlotUpdate => "slot_update",
            Self::Approval => "approval",
            Self::ModificationRequest => "modification_request",
            Self::Question => "question",
            Self::Ambiguous => "ambiguous",
        };
        write!(f, "{s}")
    }
}

/// Structured result of classifying one utterance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    pub kind: IntentKind,
    /// Slot values recognized in the utterance, keyed by slot name.
    pub slots: Map<String, Value>,
    /// True only when the user gave an explicit affirmative. Never inferred
    /// from silence, partial answers, or a positive adjective inside a
    /// question.
    pub approval_confirmed: bool,
}

impl Intent {
    pub fn slot_update(slots: Map<String, Value>) -> Self {
        Self {
            kind: IntentKind::SlotUpdate,
            slots,
            approval_confirmed: false,
        }
    }

    pub fn approval() -> Self {
        Self {
            kind: IntentKind::Approval,
            slots: Map::new(),
            approval_confirmed: true,
        }
    }

    pub fn modification(slots: Map<String, Value>) -> Self {
        Self {
            kind: IntentKind::ModificationRequest,
            slots,
            approval_confirmed: false,
        }
    }

    pub fn question() -> Self {
        Self {
            kind: IntentKind::Question,
            slots: Map::new(),
            approval_confirmed: false,
        }
    }

    pub fn ambiguous() -> Self {
        Self {
            kind: IntentKind::Ambiguous,
            slots: Map::new(),
            approval_confirmed: false,
        }
    }
}

/// How a slot's value is shaped, for extraction and validation hints.
#[derive(Debug, Clone, Copy)]
pub enum SlotKind {
    /// One of a fixed set of canonical values.
    Enumerated(&'static [&'static str]),
    /// An integer within an inclusive range.
    Integer { min: i64, max: i64 },
    /// Free text, captured whole.
    Text,
    /// A set of items drawn from a recognized vocabulary.
    List(&'static [&'static str]),
}

/// One slot the active stage collects.
#[derive(Debug, Clone, Copy)]
pub struct SlotSpec {
    pub name: &'static str,
    pub kind: SlotKind,
    /// Required slots gate the transition out of `Collecting`.
    pub required: bool,
    /// Hint words that associate free text with this slot.
    pub keywords: &'static [&'static str],
}

/// The slot schema for one stage, passed to the extractor on every call.
#[derive(Debug, Clone, Copy)]
pub struct RequiredSlots {
    pub stage: &'static str,
    pub slots: &'static [SlotSpec],
}

impl RequiredSlots {
    /// Names of the slots that must be present before a proposal.
    pub fn required_names(&self) -> Vec<&'static str> {
        self.slots
            .iter()
            .filter(|s| s.required)
            .map(|s| s.name)
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&SlotSpec> {
        self.slots.iter().find(|s| s.name == name)
    }
}

/// Boundary trait: turns a free-text utterance into a structured [`Intent`].
///
/// This is the only suspension point inside a turn. The core mutates nothing
/// before the call returns, so caller-side cancellation can never leave a
/// stage half-committed.
#[async_trait]
pub trait IntentExtractor: Send + Sync {
    async fn classify(
        &self,
        utterance: &str,
        schema: &RequiredSlots,
    ) -> Result<Intent, IntentError>;
}
