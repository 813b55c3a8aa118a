//! PostgreSQL invitation store

use roster_common::{Config, Error, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::entities::InvitationRecord;
use crate::repository::transactions::{create_invitation_tx, mark_user_invited_tx};
use crate::repository::InvitationStore;

#[derive(Clone)]
pub struct PgInvitationStore {
    pool: PgPool,
}

impl PgInvitationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect using `DATABASE_URL` and the configured pool size
    pub async fn connect(config: &Config) -> Result<Self> {
        let database_url = config
            .database_url
            .as_deref()
            .ok_or_else(|| Error::Internal("DATABASE_URL is not configured".to_string()))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(database_url)
            .await?;

        tracing::info!(
            max_connections = config.database_max_connections,
            "Database connection established"
        );
        Ok(Self::new(pool))
    }

    /// Begin a new database transaction.
    pub async fn begin(&self) -> std::result::Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }
}

#[async_trait::async_trait]
impl InvitationStore for PgInvitationStore {
    async fn create_invitation(&self, record: &InvitationRecord) -> Result<InvitationRecord> {
        let mut transaction = self.begin().await?;

        // Dropping the transaction on an early return rolls both statements back
        let created = create_invitation_tx(&mut transaction, record).await?;
        mark_user_invited_tx(&mut transaction, record.user_id).await?;

        transaction.commit().await?;
        Ok(created)
    }

    async fn get_invitation(&self, invitation_id: Uuid) -> Result<Option<InvitationRecord>> {
        let row = sqlx::query_as::<_, InvitationRecord>(
            r#"
            SELECT id, team_id, user_id, created_at
            FROM invitations
            WHERE id = $1
            "#,
        )
        .bind(invitation_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
