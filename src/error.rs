//! Error types for the onboarding core.

/// Top-level error type for the engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Constraint error: {0}")]
    Constraint(#[from] ConstraintError),

    #[error("Modification error: {0}")]
    Modification(#[from] ModificationError),

    #[error("Intent error: {0}")]
    Intent(#[from] IntentError),

    #[error("Onboarding error: {0}")]
    Onboarding(#[from] OnboardingError),

    #[error("Assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    #[error("{0}")]
    Sequence(#[from] SequenceViolation),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),
}

/// A user-supplied constraint is out of its declared range or conflicts with
/// another declared constraint. User-correctable — re-prompt, never fatal.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConstraintError {
    #[error("Invalid value for {field}: {reason} (allowed: {allowed})")]
    Invalid {
        field: String,
        reason: String,
        allowed: String,
    },
}

impl ConstraintError {
    pub fn invalid(
        field: impl Into<String>,
        reason: impl Into<String>,
        allowed: impl Into<String>,
    ) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
            allowed: allowed.into(),
        }
    }

    /// The offending field name.
    pub fn field(&self) -> &str {
        match self {
            Self::Invalid { field, .. } => field,
        }
    }
}

/// A requested plan delta cannot be applied. The plan is left unchanged.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModificationError {
    #[error("Cannot change {field}: allowed range is {allowed}")]
    OutOfRange { field: String, allowed: String },

    #[error("Modification rejected: {reason}")]
    Incompatible { reason: String },
}

/// Errors from the intent extractor boundary.
#[derive(Debug, thiserror::Error)]
pub enum IntentError {
    #[error("Classification failed: {reason}")]
    ClassificationFailed { reason: String },
}

/// Onboarding flow errors.
#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    #[error("No onboarding session for user {user_id}")]
    SessionNotFound { user_id: String },

    #[error("Onboarding already complete for user {user_id}")]
    AlreadyComplete { user_id: String },

    #[error("Onboarding incomplete; missing stages: {}", missing_stages.join(", "))]
    Incomplete { missing_stages: Vec<String> },

    #[error("Stage {stage} output already written; context is append-only")]
    ContextOverwrite { stage: String },

    #[error("Stage {stage} requires {missing} in context, but it has not been committed")]
    ContextMissing { stage: String, missing: String },

    #[error("Approval was not explicitly confirmed; stage output not written")]
    ApprovalNotConfirmed,
}

/// Finalization transaction failure. Fully rolled back; the session is
/// unchanged and the caller may retry.
#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    #[error("Assembly transaction failed: {reason}")]
    Transaction { reason: String },
}

/// `advance` was requested while the current stage is not `Complete`.
/// A programming error — never reachable through the public API.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Sequence violation: advance requested while stage {stage} is {status}")]
pub struct SequenceViolation {
    pub stage: String,
    pub status: String,
}

/// Persistence backend errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Result type alias for the engine.
pub type Result<T> = std::result::Result<T, Error>;
