use sqlx::FromRow;
use time::OffsetDateTime;

/// User row in the database.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i64,                              // assigned by the store
    pub name: String,
    pub email: String,                        // unique among active rows
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,           // refreshed on every write
    pub deleted_at: Option<OffsetDateTime>,   // None = active
}

impl User {
    #[cfg(test)]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Values for a user that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}
