use serde::{Deserialize, Serialize};
use time::{format_description::well_known::Rfc3339, Duration, OffsetDateTime};

use crate::users::repo_types::User;

/// Request body for user creation.
#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Request body for a partial update; omitted fields keep their value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// User as exposed to callers. The deletion marker is never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&User> for UserView {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
            created_at: format_timestamp(u.created_at),
            updated_at: format_timestamp(u.updated_at),
        }
    }
}

/// Renders `t` as RFC 3339 with whole seconds, e.g. `2024-05-01T10:20:30Z`.
pub fn format_timestamp(t: OffsetDateTime) -> String {
    let whole = t - Duration::nanoseconds(i64::from(t.nanosecond()));
    whole.format(&Rfc3339).unwrap_or_else(|_| whole.to_string())
}
