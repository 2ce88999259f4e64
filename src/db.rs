use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use tokio::sync::Mutex;

use crate::models::{DrivingLog, User};

// In-memory stand-in for the relational store: a mutex-guarded map per
// table with auto-incrementing ids.

struct Table<T> {
    next_id: i64,
    rows: HashMap<i64, T>,
}

// Not derived: the derive would bound T: Default, which the row types
// don't implement.
impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            rows: HashMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub birthdate: NaiveDate,
}

/// Uniqueness and existence failures surfaced by [`UserStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStoreError {
    UsernameTaken,
    EmailTaken,
    NotFound,
}

#[derive(Clone, Default)]
pub struct UserStore {
    inner: Arc<Mutex<Table<User>>>,
}

impl UserStore {
    /// Insert a new user. Username and email uniqueness are checked
    /// under the same lock as the insert, so concurrent registrations
    /// cannot both slip past the check.
    pub async fn create(&self, new: NewUser) -> Result<User, UserStoreError> {
        let mut table = self.inner.lock().await;
        if table.rows.values().any(|u| u.username == new.username) {
            return Err(UserStoreError::UsernameTaken);
        }
        if table.rows.values().any(|u| u.email == new.email) {
            return Err(UserStoreError::EmailTaken);
        }
        let now = Utc::now();
        let user = User {
            user_id: table.allocate_id(),
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            name: new.name,
            birthdate: new.birthdate,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(user.user_id, user.clone());
        Ok(user)
    }

    pub async fn find_by_id(&self, user_id: i64) -> Option<User> {
        self.inner.lock().await.rows.get(&user_id).cloned()
    }

    pub async fn find_by_username(&self, username: &str) -> Option<User> {
        let table = self.inner.lock().await;
        table.rows.values().find(|u| u.username == username).cloned()
    }

    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        let table = self.inner.lock().await;
        table.rows.values().find(|u| u.email == email).cloned()
    }

    pub async fn update_profile(
        &self,
        user_id: i64,
        name: Option<String>,
        email: Option<String>,
        birthdate: Option<NaiveDate>,
    ) -> Result<User, UserStoreError> {
        let mut table = self.inner.lock().await;
        if let Some(email) = &email {
            if table
                .rows
                .values()
                .any(|u| u.user_id != user_id && &u.email == email)
            {
                return Err(UserStoreError::EmailTaken);
            }
        }
        let user = table
            .rows
            .get_mut(&user_id)
            .ok_or(UserStoreError::NotFound)?;
        if let Some(name) = name {
            user.name = name;
        }
        if let Some(email) = email {
            user.email = email;
        }
        if let Some(birthdate) = birthdate {
            user.birthdate = birthdate;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    pub async fn update_password(&self, user_id: i64, password_hash: String) -> bool {
        let mut table = self.inner.lock().await;
        match table.rows.get_mut(&user_id) {
            Some(user) => {
                user.password_hash = password_hash;
                user.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    pub async fn delete(&self, user_id: i64) -> bool {
        self.inner.lock().await.rows.remove(&user_id).is_some()
    }
}

pub struct NewLog {
    pub user_id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub description: String,
    pub is_nighttime: bool,
}

#[derive(Clone, Default)]
pub struct LogStore {
    inner: Arc<Mutex<Table<DrivingLog>>>,
}

impl LogStore {
    pub async fn create(&self, new: NewLog) -> DrivingLog {
        let mut table = self.inner.lock().await;
        let now = Utc::now();
        let log = DrivingLog {
            log_id: table.allocate_id(),
            user_id: new.user_id,
            start_time: new.start_time,
            end_time: new.end_time,
            description: new.description,
            is_nighttime: new.is_nighttime,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(log.log_id, log.clone());
        log
    }

    pub async fn get(&self, log_id: i64) -> Option<DrivingLog> {
        self.inner.lock().await.rows.get(&log_id).cloned()
    }

    /// Logs for one user, newest start time first.
    pub async fn list_for_user(&self, user_id: i64, limit: usize, offset: usize) -> Vec<DrivingLog> {
        let table = self.inner.lock().await;
        let mut logs: Vec<DrivingLog> = table
            .rows
            .values()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect();
        logs.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        logs.into_iter().skip(offset).take(limit).collect()
    }

    pub async fn list_in_range(
        &self,
        user_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Vec<DrivingLog> {
        let table = self.inner.lock().await;
        let mut logs: Vec<DrivingLog> = table
            .rows
            .values()
            .filter(|l| l.user_id == user_id && l.start_time >= start && l.start_time <= end)
            .cloned()
            .collect();
        logs.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        logs
    }

    pub async fn update(
        &self,
        log_id: i64,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        description: String,
        is_nighttime: bool,
    ) -> Option<DrivingLog> {
        let mut table = self.inner.lock().await;
        let log = table.rows.get_mut(&log_id)?;
        log.start_time = start_time;
        log.end_time = end_time;
        log.description = description;
        log.is_nighttime = is_nighttime;
        log.updated_at = Utc::now();
        Some(log.clone())
    }

    pub async fn delete(&self, log_id: i64) -> bool {
        self.inner.lock().await.rows.remove(&log_id).is_some()
    }

    pub async fn count_for_user(&self, user_id: i64) -> usize {
        let table = self.inner.lock().await;
        table.rows.values().filter(|l| l.user_id == user_id).count()
    }

    /// Total practice time across all of a user's logs, in whole minutes.
    pub async fn total_minutes(&self, user_id: i64) -> i64 {
        let table = self.inner.lock().await;
        table
            .rows
            .values()
            .filter(|l| l.user_id == user_id)
            .map(|l| (l.end_time - l.start_time).num_minutes())
            .sum()
    }
}
