use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::users::repo_types::{NewUser, User};

/// Name of the partial unique index on `users.email`.
pub const EMAIL_CONSTRAINT: &str = "idx_users_email";

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("record not found")]
    NotFound,
    #[error("duplicate key value violates unique constraint \"idx_users_email\"")]
    EmailTaken,
    #[error(transparent)]
    Database(sqlx::Error),
}

impl RepoError {
    /// Classifies a raw sqlx error, pulling out the cases callers branch on.
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepoError::NotFound,
            sqlx::Error::Database(ref db)
                if db.is_unique_violation() && db.constraint() == Some(EMAIL_CONSTRAINT) =>
            {
                RepoError::EmailTaken
            }
            other => RepoError::Database(other),
        }
    }
}

/// Persistence contract for user records.
///
/// Every read and write is scoped to active rows; soft-deleted rows stay in
/// the table but are invisible through this trait.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User, RepoError>;
    async fn find_by_id(&self, id: i64) -> Result<User, RepoError>;
    /// Writes every mutable column of `user` and refreshes `updated_at`.
    async fn save(&self, user: &User) -> Result<User, RepoError>;
    /// Sets the deletion marker; the row is kept. A row that is already
    /// deleted is left untouched and reported as success.
    async fn soft_delete(&self, user: &User) -> Result<(), RepoError>;
    async fn find_all(&self) -> Result<Vec<User>, RepoError>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, RepoError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, created_at, updated_at)
            VALUES ($1, $2, now(), now())
            RETURNING id, name, email, created_at, updated_at, deleted_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .fetch_one(&self.db)
        .await
        .map_err(RepoError::from_sqlx)?;
        debug!(user_id = user.id, "user row inserted");
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<User, RepoError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, created_at, updated_at, deleted_at
            FROM users
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(RepoError::from_sqlx)?
        .ok_or(RepoError::NotFound)
    }

    async fn save(&self, user: &User) -> Result<User, RepoError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET name = $2, email = $3, updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, name, email, created_at, updated_at, deleted_at
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .fetch_optional(&self.db)
        .await
        .map_err(RepoError::from_sqlx)?
        .ok_or(RepoError::NotFound)
    }

    async fn soft_delete(&self, user: &User) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"
            UPDATE users
               SET deleted_at = now()
             WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(user.id)
        .execute(&self.db)
        .await
        .map_err(RepoError::from_sqlx)?;
        debug!(
            user_id = user.id,
            rows = result.rows_affected(),
            "user row soft-deleted"
        );
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<User>, RepoError> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, created_at, updated_at, deleted_at
            FROM users
            WHERE deleted_at IS NULL
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await
        .map_err(RepoError::from_sqlx)?;
        Ok(rows)
    }
}
