use serde::Serialize;

use crate::error::LadderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Success,
    Warning,
    Error,
}

/// What an operator command reports back to the UI layer. Built from the
/// command's `Result` so nothing below this point ever reaches the caller as
/// a raw error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftOutcome {
    pub status: OutcomeStatus,
    pub message: String,
}

impl DraftOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }

    /// Turns a command result into an outcome, rendering the success message
    /// from the returned value.
    pub fn from_result<T>(result: Result<T, LadderError>, on_success: impl FnOnce(&T) -> String) -> Self {
        match result {
            Ok(value) => DraftOutcome::success(on_success(&value)),
            Err(err) => DraftOutcome::from(err),
        }
    }
}

impl From<LadderError> for DraftOutcome {
    fn from(err: LadderError) -> Self {
        match err {
            LadderError::Conflict(msg) => {
                tracing::warn!("Draft command rejected: {msg}");
                DraftOutcome::warning(msg)
            }
            LadderError::Validation(msg) => {
                tracing::warn!("Draft command invalid: {msg}");
                DraftOutcome::error(msg)
            }
            LadderError::NotFound(what) => DraftOutcome::error(format!("{what} not found")),
            LadderError::Invariant(msg) => {
                tracing::error!("Roster invariant violated: {msg}");
                DraftOutcome::error("Internal error: roster left unchanged")
            }
            LadderError::Database(e) => {
                tracing::error!("Database error during draft command: {e}");
                DraftOutcome::error("Internal database error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflicts_become_warnings() {
        let outcome = DraftOutcome::from(LadderError::conflict("Division 3 does not exist, add it first"));
        assert_eq!(outcome.status, OutcomeStatus::Warning);
        assert_eq!(outcome.message, "Division 3 does not exist, add it first");
    }

    #[test]
    fn not_found_and_validation_become_errors() {
        let outcome = DraftOutcome::from(LadderError::NotFound("Membership"));
        assert_eq!(outcome.status, OutcomeStatus::Error);
        assert_eq!(outcome.message, "Membership not found");

        let outcome = DraftOutcome::from(LadderError::validation("already rostered"));
        assert_eq!(outcome.status, OutcomeStatus::Error);
    }

    #[test]
    fn invariant_detail_is_not_exposed() {
        let outcome = DraftOutcome::from(LadderError::invariant("duplicate sort_order 20"));
        assert_eq!(outcome.status, OutcomeStatus::Error);
        assert!(!outcome.message.contains("sort_order"));
    }

    #[test]
    fn success_message_is_rendered_from_value() {
        let outcome = DraftOutcome::from_result(Ok::<_, LadderError>(4), |n| format!("Moved {n} players"));
        assert!(outcome.is_success());
        assert_eq!(outcome.message, "Moved 4 players");
    }
}
