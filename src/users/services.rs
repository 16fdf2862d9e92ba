use std::sync::Arc;

use tracing::{error, info, warn};

use crate::envelope::{codes, Envelope, Payload};
use crate::users::{
    dto::UserView,
    repo::{RepoError, UserRepository},
    repo_types::NewUser,
};

/// Validates user requests, drives the repository and folds every outcome
/// into an [`Envelope`].
///
/// Holds nothing but the repository handle. Update and delete read the row
/// and write it back without locking, so concurrent writers to the same id
/// race and the last write wins.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, name: &str, email: &str) -> Envelope {
        let name = name.trim();
        let email = email.trim();

        if name.is_empty() {
            warn!("create rejected: empty name");
            return Envelope::fail(codes::BAD_REQUEST, "Name is required");
        }
        if email.is_empty() {
            warn!("create rejected: empty email");
            return Envelope::fail(codes::BAD_REQUEST, "Email is required");
        }

        let new_user = NewUser {
            name: name.to_string(),
            email: email.to_string(),
        };
        match self.repo.create(new_user).await {
            Ok(user) => {
                info!(user_id = user.id, email = %user.email, "user created");
                Envelope::ok()
            }
            Err(RepoError::EmailTaken) => {
                warn!(%email, "create rejected: email already used");
                Envelope::fail(codes::INTERNAL, "Email existed")
            }
            Err(e) => {
                error!(error = %e, "create user failed");
                Envelope::fail(codes::INTERNAL, e.to_string())
            }
        }
    }

    pub async fn get(&self, id: i64) -> Envelope {
        if id == 0 {
            return Envelope::fail(codes::BAD_REQUEST, "ID is required");
        }

        match self.repo.find_by_id(id).await {
            Ok(user) => Envelope::with_data(Payload::User(UserView::from(&user))),
            Err(RepoError::NotFound) => Envelope::fail(codes::BAD_REQUEST, "User not found"),
            Err(e) => {
                error!(error = %e, user_id = id, "get user failed");
                Envelope::fail(codes::INTERNAL, "Database error")
            }
        }
    }

    /// Replaces `name` and/or `email` with the supplied value as given, unless
    /// it is empty. Unlike create, values are not trimmed.
    pub async fn update(&self, id: i64, name: Option<&str>, email: Option<&str>) -> Envelope {
        if id == 0 {
            return Envelope::fail(codes::BAD_REQUEST, "ID is required");
        }

        let mut user = match self.repo.find_by_id(id).await {
            Ok(user) => user,
            Err(RepoError::NotFound) => {
                return Envelope::fail(codes::BAD_REQUEST, "User not found")
            }
            Err(e) => {
                error!(error = %e, user_id = id, "update lookup failed");
                return Envelope::fail(codes::INTERNAL, e.to_string());
            }
        };

        if let Some(name) = non_empty(name) {
            user.name = name.to_string();
        }
        if let Some(email) = non_empty(email) {
            user.email = email.to_string();
        }

        match self.repo.save(&user).await {
            Ok(_) => {
                info!(user_id = id, "user updated");
                Envelope::ok()
            }
            Err(RepoError::EmailTaken) => {
                warn!(user_id = id, email = %user.email, "update rejected: email already used");
                Envelope::fail(codes::BAD_REQUEST, "Email address existed")
            }
            // deleted between the lookup and the write
            Err(RepoError::NotFound) => Envelope::fail(codes::BAD_REQUEST, "User not found"),
            Err(e) => {
                error!(error = %e, user_id = id, "update user failed");
                Envelope::fail(codes::INTERNAL, e.to_string())
            }
        }
    }

    pub async fn delete(&self, id: i64) -> Envelope {
        if id == 0 {
            return Envelope::fail(codes::DELETE_ID_REQUIRED, "ID is required");
        }

        let user = match self.repo.find_by_id(id).await {
            Ok(user) => user,
            Err(RepoError::NotFound) => {
                return Envelope::fail(codes::DELETE_NOT_FOUND, "User not found")
            }
            Err(e) => {
                error!(error = %e, user_id = id, "delete lookup failed");
                return Envelope::fail(codes::INTERNAL, e.to_string());
            }
        };

        match self.repo.soft_delete(&user).await {
            Ok(()) => {
                info!(user_id = id, "user soft-deleted");
                Envelope::ok()
            }
            Err(e) => {
                error!(error = %e, user_id = id, "delete user failed");
                Envelope::fail(codes::INTERNAL, e.to_string())
            }
        }
    }

    pub async fn list(&self) -> Envelope {
        match self.repo.find_all().await {
            Ok(users) => {
                let views = users.iter().map(UserView::from).collect();
                Envelope::with_data(Payload::Users(views))
            }
            Err(e) => {
                error!(error = %e, "list users failed");
                Envelope::fail(codes::INTERNAL, "Database error")
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
