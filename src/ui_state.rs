use crate::types::Repository;

/// What the presentation layer should show.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UiState {
    #[default]
    Idle,
    Loading,
    Success {
        items: Vec<Repository>,
        method_label: String,
    },
    Error {
        message: String,
    },
}

impl UiState {
    pub fn success(items: Vec<Repository>, method_label: impl Into<String>) -> Self {
        UiState::Success {
            items,
            method_label: method_label.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        UiState::Error {
            message: message.into(),
        }
    }

    /// `Success` and `Error` end an invocation.
    pub fn is_terminal(&self) -> bool {
        match self {
            UiState::Idle | UiState::Loading => false,
            UiState::Success { .. } | UiState::Error { .. } => true,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            UiState::Idle => "idle",
            UiState::Loading => "loading",
            UiState::Success { .. } => "success",
            UiState::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_idle() {
        assert_eq!(UiState::default(), UiState::Idle);
    }

    #[test]
    fn only_success_and_error_are_terminal() {
        assert!(!UiState::Idle.is_terminal());
        assert!(!UiState::Loading.is_terminal());
        assert!(UiState::success(vec![], "callback").is_terminal());
        assert!(UiState::error("boom").is_terminal());
    }

    #[test]
    fn names_match_variants() {
        assert_eq!(UiState::Loading.name(), "loading");
        assert_eq!(UiState::error("x").name(), "error");
    }
}
