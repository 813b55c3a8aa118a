//! Transactional free functions for Teams domain (Zero2Prod pattern)

use crate::domain::entities::InvitationRecord;
use roster_common::RepositoryError;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

/// Insert an invitation within an existing transaction.
///
/// A unique-key violation is reported as `RepositoryError::AlreadyExists`.
pub async fn create_invitation_tx(
    transaction: &mut Transaction<'_, Postgres>,
    record: &InvitationRecord,
) -> std::result::Result<InvitationRecord, RepositoryError> {
    let created = sqlx::query_as::<_, InvitationRecord>(
        r#"
        INSERT INTO invitations (id, team_id, user_id, created_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, team_id, user_id, created_at
        "#,
    )
    .bind(record.id)
    .bind(record.team_id)
    .bind(record.user_id)
    .bind(record.created_at)
    .fetch_one(&mut **transaction)
    .await
    .map_err(|e| {
        if e.as_database_error()
            .is_some_and(|db| db.is_unique_violation())
        {
            RepositoryError::AlreadyExists
        } else {
            RepositoryError::Connection(e)
        }
    })?;

    Ok(created)
}

/// Set a user's invited flag within an existing transaction.
///
/// Returns `RepositoryError::NotFound` if the user does not exist. A user who
/// is already invited is left unchanged.
pub async fn mark_user_invited_tx(
    transaction: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> std::result::Result<(), RepositoryError> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)
        "#,
    )
    .bind(user_id)
    .fetch_one(&mut **transaction)
    .await?;

    if !exists {
        return Err(RepositoryError::NotFound);
    }

    sqlx::query(
        r#"
        UPDATE users
        SET invited = TRUE, updated_at = NOW()
        WHERE id = $1 AND invited = FALSE
        "#,
    )
    .bind(user_id)
    .execute(&mut **transaction)
    .await?;

    Ok(())
}
