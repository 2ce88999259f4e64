use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored user record. `password_hash` never leaves the server; the
/// outward projection is [`UserPublic`].
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub birthdate: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn to_public(&self) -> UserPublic {
        UserPublic {
            user_id: self.user_id,
            username: self.username.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            birthdate: self.birthdate,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserPublic {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub name: String,
    pub birthdate: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One recorded practice session.
#[derive(Debug, Clone, Serialize)]
pub struct DrivingLog {
    pub log_id: i64,
    pub user_id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub description: String,
    pub is_nighttime: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub name: String,
    pub birthdate: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub birthdate: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateLogRequest {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub description: Option<String>,
    pub is_nighttime: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateLogRequest {
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub description: Option<String>,
    pub is_nighttime: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct LogQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// `data` field of the register/login responses.
#[derive(Debug, Serialize)]
pub struct AuthData {
    pub token: String,
    pub user: UserPublic,
}

#[derive(Debug, Serialize)]
pub struct VerifyData {
    pub valid: bool,
    pub user_id: i64,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct LogListData {
    pub logs: Vec<DrivingLog>,
    pub pagination: Pagination,
    pub stats: LogStats,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

#[derive(Debug, Serialize)]
pub struct LogStats {
    pub total_logs: usize,
    pub total_driving_minutes: i64,
    pub total_driving_hours: f64,
}
