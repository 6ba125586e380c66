//! User domain entity
//!
//! Represents a person who submits devices for recycling, or an administrator
//! who manages the catalog and evaluates orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Access role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Banned,
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Banned => write!(f, "banned"),
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(UserStatus::Active),
            "banned" => Ok(UserStatus::Banned),
            _ => Err(format!("Unknown user status: {}", s)),
        }
    }
}

/// A registered account
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// `salt$digest`, never serialized
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: String,
    pub email: Option<String>,
    pub real_name: Option<String>,
    pub avatar: Option<String>,
    pub role: Role,
    pub status: UserStatus,
    /// SHA-256 of the current bearer token
    #[serde(skip_serializing)]
    pub api_key_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

/// The authenticated identity a request runs as.
///
/// Resolved by the auth middleware before any service call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub id: UserId,
    pub role: Role,
}

impl Caller {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&User> for Caller {
    fn from(user: &User) -> Self {
        Caller {
            id: user.id,
            role: user.role,
        }
    }
}

/// Data needed to create a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub phone: String,
    pub email: Option<String>,
    pub real_name: Option<String>,
    pub role: Role,
    pub api_key_hash: Option<String>,
}

/// Self-service profile changes; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub real_name: Option<String>,
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.phone.is_none()
            && self.email.is_none()
            && self.real_name.is_none()
            && self.avatar.is_none()
    }
}
