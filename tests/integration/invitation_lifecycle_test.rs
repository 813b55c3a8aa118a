//! Invitation lifecycle integration tests
//!
//! Drives invitations through validation, saving, and status rendering
//! against the in-memory store.

mod common;

use roster_common::Error;
use roster_teams::{InMemoryInvitationStore, Invitation, InvitationState, InvitationStore};

use crate::common::{create_new_user, create_team, ROOKIE_EMAIL, TEAM_NAME};

// ============================================================================
// Saving
// ============================================================================

#[test_log::test(tokio::test)]
async fn test_saving_valid_invitation_invites_the_user() {
    let store = InMemoryInvitationStore::new();
    let mut new_user = create_new_user();
    let user_id = new_user.id;
    let team = create_team();

    let mut invitation = Invitation::new(Some(&mut new_user), Some(&team));
    let invitation_id = invitation.id();
    invitation.save(&store).await.unwrap();
    assert!(!invitation.is_new_record());
    drop(invitation);

    assert!(new_user.invited);
    assert!(store.is_user_invited(user_id));

    let stored = store.get_invitation(invitation_id).await.unwrap().unwrap();
    assert_eq!(stored.user_id, user_id);
    assert_eq!(stored.team_id, team.id);
}

#[test_log::test(tokio::test)]
async fn test_invitation_without_team_is_not_saved() {
    let store = InMemoryInvitationStore::new();
    let mut new_user = create_new_user();

    let mut invalid_invitation = Invitation::new(Some(&mut new_user), None);
    let result = invalid_invitation.save(&store).await;

    assert!(matches!(result, Err(Error::Validation(_))));
    assert!(!invalid_invitation.is_valid());
    assert!(invalid_invitation.is_new_record());
    assert_eq!(store.invitation_count(), 0);
}

#[test_log::test(tokio::test)]
async fn test_failed_save_does_not_mark_the_user_as_invited() {
    let store = InMemoryInvitationStore::new();
    let mut new_user = create_new_user();

    let mut invalid_invitation = Invitation::new(Some(&mut new_user), None);
    let _ = invalid_invitation.save(&store).await;
    drop(invalid_invitation);

    assert!(!new_user.invited);
}

#[test_log::test(tokio::test)]
async fn test_store_failure_does_not_mark_the_user_as_invited() {
    let store = InMemoryInvitationStore::new();
    store.fail_next_create("connection reset by peer");
    let mut new_user = create_new_user();
    let user_id = new_user.id;
    let team = create_team();

    let mut invitation = Invitation::new(Some(&mut new_user), Some(&team));
    let result = invitation.save(&store).await;

    assert!(matches!(result, Err(Error::Internal(_))));
    assert!(invitation.is_new_record());
    assert_eq!(invitation.state(), InvitationState::Pending);
    assert!(invitation.event_log_statement().contains("PENDING"));
    drop(invitation);

    assert!(!new_user.invited);
    assert!(!store.is_user_invited(user_id));
}

#[test_log::test(tokio::test)]
async fn test_retry_after_store_failure_succeeds() {
    let store = InMemoryInvitationStore::new();
    store.fail_next_create("timeout");
    let mut new_user = create_new_user();
    let team = create_team();

    let mut invitation = Invitation::new(Some(&mut new_user), Some(&team));
    assert!(invitation.save(&store).await.is_err());
    invitation.save(&store).await.unwrap();
    drop(invitation);

    assert!(new_user.invited);
    assert_eq!(store.invitation_count(), 1);
    assert_eq!(store.create_calls(), 2);
}

#[test_log::test(tokio::test)]
async fn test_second_save_is_a_conflict() {
    let store = InMemoryInvitationStore::new();
    let mut new_user = create_new_user();
    let team = create_team();

    let mut invitation = Invitation::new(Some(&mut new_user), Some(&team));
    invitation.save(&store).await.unwrap();
    let second = invitation.save(&store).await;

    assert!(matches!(second, Err(Error::Conflict(_))));
    assert_eq!(invitation.state(), InvitationState::Invited);
    assert_eq!(store.create_calls(), 1);
}

#[test_log::test(tokio::test)]
async fn test_store_is_usable_as_trait_object() {
    let store: Box<dyn InvitationStore> = Box::new(InMemoryInvitationStore::new());
    let mut new_user = create_new_user();
    let team = create_team();

    let mut invitation = Invitation::new(Some(&mut new_user), Some(&team));
    invitation.save(store.as_ref()).await.unwrap();

    assert!(invitation.is_persisted());
}

// ============================================================================
// Event log statement
// ============================================================================

#[test_log::test(tokio::test)]
async fn test_saved_statement_includes_team_name_and_invitee_email() {
    let store = InMemoryInvitationStore::new();
    let mut new_user = create_new_user();
    let team = create_team();

    let mut invitation = Invitation::new(Some(&mut new_user), Some(&team));
    invitation.save(&store).await.unwrap();

    let log_statement = invitation.event_log_statement();
    assert!(log_statement.contains(TEAM_NAME));
    assert!(log_statement.contains(ROOKIE_EMAIL));
    assert!(!log_statement.contains("PENDING"));
    assert!(!log_statement.contains("INVALID"));
}

#[test]
fn test_unsaved_valid_statement_is_pending() {
    let mut new_user = create_new_user();
    let team = create_team();

    let invitation = Invitation::new(Some(&mut new_user), Some(&team));

    let log_statement = invitation.event_log_statement();
    assert!(log_statement.contains(TEAM_NAME));
    assert!(log_statement.contains(ROOKIE_EMAIL));
    assert!(log_statement.contains("PENDING"));
    assert!(!log_statement.contains("INVITED"));
    assert!(!log_statement.contains("INVALID"));
}

#[test]
fn test_invalid_statement_includes_invalid() {
    let mut new_user = create_new_user();
    let team = create_team();

    let without_team = Invitation::new(Some(&mut new_user), None);
    assert!(without_team.event_log_statement().contains("INVALID"));
    drop(without_team);

    let without_user = Invitation::new(None, Some(&team));
    assert!(without_user.event_log_statement().contains("INVALID"));

    let empty = Invitation::new(None, None);
    assert!(empty.event_log_statement().contains("INVALID"));
}

#[test]
fn test_statement_markers_follow_validity() {
    let mut first_user = create_new_user();
    let mut second_user = create_new_user();
    let team = create_team();

    let cases = [
        Invitation::new(Some(&mut first_user), Some(&team)),
        Invitation::new(Some(&mut second_user), None),
        Invitation::new(None, Some(&team)),
        Invitation::new(None, None),
    ];

    for invitation in &cases {
        let statement = invitation.event_log_statement();
        assert_eq!(statement.contains("INVALID"), !invitation.is_valid());
        assert_eq!(
            statement.contains("PENDING"),
            invitation.is_valid() && invitation.is_new_record()
        );
        if invitation.is_valid() {
            assert!(statement.contains(TEAM_NAME));
            assert!(statement.contains(ROOKIE_EMAIL));
        }
    }
}

#[test]
fn test_statement_reflects_reference_assignment() {
    let mut new_user = create_new_user();
    let team = create_team();

    let mut invitation = Invitation::new(Some(&mut new_user), None);
    assert!(invitation.event_log_statement().contains("INVALID"));

    invitation.set_team(Some(&team)).unwrap();
    assert!(invitation.event_log_statement().contains("PENDING"));

    invitation.set_team(None).unwrap();
    assert!(invitation.event_log_statement().contains("INVALID"));
}
