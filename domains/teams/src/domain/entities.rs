//! Domain entities for the Roster teams domain
//!
//! Users and teams carry their own construction rules. An invitation borrows
//! one of each, decides whether it may be persisted, and marks its user as
//! invited once the store has accepted it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use roster_common::{Error, Result, StateError};
use validator::ValidateEmail;

use crate::domain::state::{InvitationEvent, InvitationState, InvitationStateMachine};
use crate::domain::validation::ValidationError;
use crate::repository::InvitationStore;

/// User entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub invited: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with validation
    pub fn new(id: Uuid, email: String, name: Option<String>) -> Result<Self> {
        // Validate email format (validator crate enforces RFC 5321 including length)
        if !email.validate_email() {
            return Err(Error::Validation("Invalid email format".to_string()));
        }

        if let Some(ref name) = name {
            if name.is_empty() || name.len() > 100 {
                return Err(Error::Validation(
                    "Name must be 1-100 characters".to_string(),
                ));
            }
        }

        let now = Utc::now();
        Ok(User {
            id,
            email,
            name,
            invited: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Flag the user as invited. Repeated calls leave the record untouched.
    pub fn mark_invited(&mut self) {
        if self.invited {
            return;
        }
        self.invited = true;
        self.updated_at = Utc::now();
    }

    pub fn is_invited(&self) -> bool {
        self.invited
    }
}

/// Team entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    /// Create a new team with validation
    pub fn new(name: String) -> Result<Self> {
        if name.trim().is_empty() || name.len() > 100 {
            return Err(Error::Validation(
                "Team name must be 1-100 characters".to_string(),
            ));
        }

        let now = Utc::now();
        Ok(Team {
            id: Uuid::new_v4(),
            name,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Row handed to the invitation store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct InvitationRecord {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Invitation entity - links a prospective user to a team
///
/// The user and team are borrowed. The invitation is valid only while both
/// are present; saving it persists the record through an [`InvitationStore`]
/// and then marks the user as invited.
#[derive(Debug)]
pub struct Invitation<'a> {
    id: Uuid,
    user: Option<&'a mut User>,
    team: Option<&'a Team>,
    persisted: bool,
    created_at: DateTime<Utc>,
}

impl<'a> Invitation<'a> {
    /// Create an unsaved invitation. Either reference may be absent.
    pub fn new(user: Option<&'a mut User>, team: Option<&'a Team>) -> Self {
        Invitation {
            id: Uuid::new_v4(),
            user,
            team,
            persisted: false,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_deref()
    }

    pub fn team(&self) -> Option<&Team> {
        self.team
    }

    /// Replace the user reference. Refused once the invitation is persisted.
    pub fn set_user(&mut self, user: Option<&'a mut User>) -> Result<()> {
        self.ensure_unsaved()?;
        self.user = user;
        Ok(())
    }

    /// Replace the team reference. Refused once the invitation is persisted.
    pub fn set_team(&mut self, team: Option<&'a Team>) -> Result<()> {
        self.ensure_unsaved()?;
        self.team = team;
        Ok(())
    }

    /// Check the presence rules
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        self.references().map(|_| ())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    pub fn is_new_record(&self) -> bool {
        !self.persisted
    }

    /// Get current invitation state
    pub fn state(&self) -> InvitationState {
        InvitationState::derive(self.is_valid(), self.persisted)
    }

    /// Build the row the store persists
    pub fn record(&self) -> std::result::Result<InvitationRecord, ValidationError> {
        let (user, team) = self.references()?;
        Ok(InvitationRecord {
            id: self.id,
            team_id: team.id,
            user_id: user.id,
            created_at: self.created_at,
        })
    }

    /// Persist the invitation, then mark the user as invited.
    ///
    /// Validation failures and store failures are returned as errors and
    /// leave both the invitation and the user untouched. The store commits
    /// the record and the user's `invited` flag as one unit; the in-memory
    /// user is only updated after that commit succeeded.
    pub async fn save(&mut self, store: &dyn InvitationStore) -> Result<()> {
        let record = match self.record() {
            Ok(record) => record,
            Err(reason) => {
                tracing::warn!(
                    invitation_id = %self.id,
                    error = %reason,
                    "Rejected invalid invitation"
                );
                return Err(reason.into());
            }
        };

        let next = self.apply_transition(InvitationEvent::Save)?;

        if let Err(e) = store.create_invitation(&record).await {
            tracing::error!(
                invitation_id = %record.id,
                team_id = %record.team_id,
                user_id = %record.user_id,
                error = %e,
                "Failed to persist invitation"
            );
            return Err(e);
        }

        self.persisted = true;
        if let Some(user) = self.user.as_deref_mut() {
            user.mark_invited();
        }

        tracing::info!(
            invitation_id = %record.id,
            team_id = %record.team_id,
            user_id = %record.user_id,
            state = %next,
            "Invitation saved"
        );
        Ok(())
    }

    /// Human-readable status line, computed fresh on every call
    pub fn event_log_statement(&self) -> String {
        match self.references() {
            Err(reason) => format!(
                "{} invitation {}: {}",
                InvitationState::Invalid.marker(),
                self.id,
                reason
            ),
            Ok((user, team)) if self.persisted => format!("{} invited {}", team.name, user.email),
            Ok((user, team)) => format!(
                "{} invited {} ({})",
                team.name,
                user.email,
                InvitationState::Pending.marker()
            ),
        }
    }

    fn references(&self) -> std::result::Result<(&User, &Team), ValidationError> {
        match (self.user.as_deref(), self.team) {
            (Some(user), Some(team)) => Ok((user, team)),
            (None, Some(_)) => Err(ValidationError::MissingUser),
            (Some(_), None) => Err(ValidationError::MissingTeam),
            (None, None) => Err(ValidationError::MissingUserAndTeam),
        }
    }

    fn ensure_unsaved(&self) -> Result<()> {
        if self.persisted {
            return Err(Error::Conflict(
                "Invitation has already been saved and cannot be changed".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply a state transition using the state machine
    fn apply_transition(&self, event: InvitationEvent) -> Result<InvitationState> {
        InvitationStateMachine::transition(self.state(), event).map_err(|e| match e {
            StateError::TerminalState(state) => Error::Conflict(format!(
                "Invitation is in terminal state '{}' and cannot be saved again",
                state
            )),
            StateError::InvalidTransition { from, event, .. } => Error::Validation(format!(
                "Invalid invitation transition: cannot apply '{}' event from '{}' state",
                event, from
            )),
            StateError::GuardFailed(msg) => Error::Validation(msg),
        })
    }
}
