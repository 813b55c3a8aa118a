//! Invitation state machine
//!
//! The state is derived from the invitation's references and persistence flag,
//! never stored. The machine defines:
//! - Valid states
//! - Events that trigger transitions
//! - Guard conditions for transitions
//! - Terminal states

use roster_common::StateError;
use serde::{Deserialize, Serialize};

/// Derived invitation states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationState {
    /// Missing a user or a team
    Invalid,
    /// Both references present, not yet stored
    Pending,
    /// Stored and the user has been marked invited
    Invited,
}

impl InvitationState {
    /// Compute the state from validity and persistence. Validity wins.
    pub fn derive(is_valid: bool, persisted: bool) -> Self {
        if !is_valid {
            Self::Invalid
        } else if persisted {
            Self::Invited
        } else {
            Self::Pending
        }
    }

    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Invited)
    }

    /// Get all valid next states from current state
    pub fn valid_transitions(&self) -> &'static [InvitationState] {
        match self {
            Self::Invalid => &[],
            Self::Pending => &[Self::Invited],
            Self::Invited => &[],
        }
    }

    /// Uppercase marker rendered into event log statements
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Invalid => "INVALID",
            Self::Pending => "PENDING",
            Self::Invited => "INVITED",
        }
    }
}

impl std::fmt::Display for InvitationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid => write!(f, "invalid"),
            Self::Pending => write!(f, "pending"),
            Self::Invited => write!(f, "invited"),
        }
    }
}

/// Events that trigger invitation state transitions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InvitationEvent {
    /// The invitation is handed to the store
    Save,
}

impl std::fmt::Display for InvitationEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Save => write!(f, "save"),
        }
    }
}

/// Invitation state machine
pub struct InvitationStateMachine;

impl InvitationStateMachine {
    /// Attempt a state transition with guard conditions
    pub fn transition(
        current: InvitationState,
        event: InvitationEvent,
    ) -> Result<InvitationState, StateError> {
        if current.is_terminal() {
            return Err(StateError::TerminalState(current.to_string()));
        }

        let next = match (&current, &event) {
            (InvitationState::Pending, InvitationEvent::Save) => InvitationState::Invited,

            // Guard: both references must be present
            (InvitationState::Invalid, InvitationEvent::Save) => {
                return Err(StateError::GuardFailed(
                    "Cannot save an invitation without both a user and a team".to_string(),
                ));
            }

            _ => {
                return Err(StateError::InvalidTransition {
                    from: current.to_string(),
                    to: "unknown".to_string(),
                    event: event.to_string(),
                });
            }
        };

        Ok(next)
    }

    /// Check if a transition is valid without performing it
    pub fn can_transition(current: InvitationState, event: &InvitationEvent) -> bool {
        Self::transition(current, *event).is_ok()
    }
}
