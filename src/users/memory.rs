//! In-memory [`UserRepository`] for tests.
//!
//! Mirrors the Postgres table closely enough for the service: ids come from a
//! sequence, email is unique among active rows, deletion only sets the marker.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::users::repo::{RepoError, UserRepository};
use crate::users::repo_types::{NewUser, User};

#[derive(Default)]
pub struct InMemoryUserRepository {
    rows: Mutex<Vec<User>>,
    failure: Mutex<Option<String>>,
    save_failure: Mutex<Option<RepoError>>,
    delete_failure: Mutex<Option<RepoError>>,
    calls: AtomicUsize,
}

impl InMemoryUserRepository {
    /// Makes every following call fail with a generic store error.
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    /// Makes the next `save` fail with `err`; other calls are unaffected.
    pub fn fail_next_save(&self, err: RepoError) {
        *self.save_failure.lock().unwrap() = Some(err);
    }

    /// Makes the next `soft_delete` fail with `err`; other calls are unaffected.
    pub fn fail_next_delete(&self, err: RepoError) {
        *self.delete_failure.lock().unwrap() = Some(err);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of stored rows, deleted ones included.
    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    /// Reads a row bypassing the soft-delete scope.
    pub fn raw_row(&self, id: i64) -> Option<User> {
        self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }

    fn begin(&self) -> Result<(), RepoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(RepoError::Database(sqlx::Error::Protocol(message.clone()))),
            None => Ok(()),
        }
    }

    fn email_in_use(rows: &[User], email: &str, except: Option<i64>) -> bool {
        rows.iter()
            .any(|u| !u.is_deleted() && u.email == email && Some(u.id) != except)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, RepoError> {
        self.begin()?;
        let mut rows = self.rows.lock().unwrap();
        if Self::email_in_use(&rows, &user.email, None) {
            return Err(RepoError::EmailTaken);
        }
        let now = OffsetDateTime::now_utc();
        let row = User {
            id: rows.len() as i64 + 1,
            name: user.name,
            email: user.email,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> Result<User, RepoError> {
        self.begin()?;
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id && !u.is_deleted())
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn save(&self, user: &User) -> Result<User, RepoError> {
        self.begin()?;
        if let Some(err) = self.save_failure.lock().unwrap().take() {
            return Err(err);
        }
        let mut rows = self.rows.lock().unwrap();
        if Self::email_in_use(&rows, &user.email, Some(user.id)) {
            return Err(RepoError::EmailTaken);
        }
        let row = rows
            .iter_mut()
            .find(|u| u.id == user.id && !u.is_deleted())
            .ok_or(RepoError::NotFound)?;
        row.name = user.name.clone();
        row.email = user.email.clone();
        row.updated_at = OffsetDateTime::now_utc();
        Ok(row.clone())
    }

    async fn soft_delete(&self, user: &User) -> Result<(), RepoError> {
        self.begin()?;
        if let Some(err) = self.delete_failure.lock().unwrap().take() {
            return Err(err);
        }
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|u| u.id == user.id && !u.is_deleted()) {
            row.deleted_at = Some(OffsetDateTime::now_utc());
        }
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<User>, RepoError> {
        self.begin()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|u| !u.is_deleted())
            .cloned()
            .collect())
    }
}
