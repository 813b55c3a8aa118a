//! Repository implementations for Teams domain

pub mod invitations;
pub mod memory;
pub mod transactions;

use roster_common::Result;
use uuid::Uuid;

use crate::domain::entities::InvitationRecord;

pub use invitations::PgInvitationStore;
pub use memory::InMemoryInvitationStore;
pub use transactions::{create_invitation_tx, mark_user_invited_tx};

/// Persistence collaborator for invitations
///
/// `create_invitation` must store the record and set the referenced user's
/// `invited` flag as one atomic unit: either both happen or neither does.
#[async_trait::async_trait]
pub trait InvitationStore: Send + Sync {
    /// Insert the invitation and flag its user as invited
    async fn create_invitation(&self, record: &InvitationRecord) -> Result<InvitationRecord>;

    /// Find invitation by ID
    async fn get_invitation(&self, invitation_id: Uuid) -> Result<Option<InvitationRecord>>;
}
