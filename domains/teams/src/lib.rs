//! Teams domain: users, teams, invitations and their persistence policy

pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::*;
pub use domain::state::{InvitationEvent, InvitationState, InvitationStateMachine};
pub use domain::validation::ValidationError;
// Re-export repository types
pub use repository::{
    create_invitation_tx, mark_user_invited_tx, InMemoryInvitationStore, InvitationStore,
    PgInvitationStore,
};
