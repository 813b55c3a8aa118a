//! In-memory invitation store
//!
//! Keeps invitations and invited users behind a single mutex so the insert and
//! the invited flag change together. Used by tests and by deployments without
//! a configured database.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use roster_common::{RepositoryError, Result};
use uuid::Uuid;

use crate::domain::entities::InvitationRecord;
use crate::repository::InvitationStore;

#[derive(Debug, Default)]
struct StoreState {
    invitations: HashMap<Uuid, InvitationRecord>,
    invited_users: HashSet<Uuid>,
    create_calls: usize,
    fail_next_create: Option<String>,
}

/// In-memory store shared across clones
#[derive(Debug, Clone, Default)]
pub struct InMemoryInvitationStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryInvitationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `create_invitation` call fail with `reason`
    pub fn fail_next_create(&self, reason: impl Into<String>) {
        self.lock().fail_next_create = Some(reason.into());
    }

    /// Number of stored invitations
    pub fn invitation_count(&self) -> usize {
        self.lock().invitations.len()
    }

    /// Number of `create_invitation` calls, failed ones included
    pub fn create_calls(&self) -> usize {
        self.lock().create_calls
    }

    /// Whether the store has flagged this user as invited
    pub fn is_user_invited(&self, user_id: Uuid) -> bool {
        self.lock().invited_users.contains(&user_id)
    }

    /// All stored invitations for a user, oldest first
    pub fn invitations_for_user(&self, user_id: Uuid) -> Vec<InvitationRecord> {
        let mut records: Vec<InvitationRecord> = self
            .lock()
            .invitations
            .values()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.created_at);
        records
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl InvitationStore for InMemoryInvitationStore {
    async fn create_invitation(&self, record: &InvitationRecord) -> Result<InvitationRecord> {
        let mut state = self.lock();
        state.create_calls += 1;

        if let Some(reason) = state.fail_next_create.take() {
            return Err(RepositoryError::Unavailable(reason).into());
        }

        if state.invitations.contains_key(&record.id) {
            return Err(RepositoryError::AlreadyExists.into());
        }

        state.invitations.insert(record.id, record.clone());
        state.invited_users.insert(record.user_id);
        tracing::debug!(invitation_id = %record.id, "Stored invitation in memory");

        Ok(record.clone())
    }

    async fn get_invitation(&self, invitation_id: Uuid) -> Result<Option<InvitationRecord>> {
        Ok(self.lock().invitations.get(&invitation_id).cloned())
    }
}
