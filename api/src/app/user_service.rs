//! User service
//!
//! Handles registration, login, bearer-token authentication and profile management.

use std::sync::{Arc, LazyLock};

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::Rng;
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::domain::entities::{Caller, NewUser, ProfileUpdate, Role, User};
use crate::domain::ports::UserRepository;
use crate::error::{AppError, DomainError};

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{7,20}$").expect("valid phone regex"));
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex")
});

/// Registration input
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub phone: String,
    pub email: Option<String>,
    pub real_name: Option<String>,
}

/// Service for managing users
pub struct UserService<UR>
where
    UR: UserRepository,
{
    users: Arc<UR>,
    password_pepper: String,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    pub fn new(users: Arc<UR>, password_pepper: String) -> Self {
        Self {
            users,
            password_pepper,
        }
    }

    /// Register a new user
    ///
    /// Returns (user, api_key). The API key is only shown once.
    pub async fn register(&self, registration: Registration) -> Result<(User, String), AppError> {
        let username = registration.username.trim();
        let phone = registration.phone.trim();
        let email = normalize_optional(registration.email);

        validate_username(username)?;
        if registration.password.chars().count() < 6 {
            return Err(AppError::validation(
                "Password must be at least 6 characters",
            ));
        }
        validate_phone(phone)?;
        if let Some(email) = &email {
            validate_email(email)?;
        }

        if self.users.find_by_username(username).await?.is_some() {
            return Err(AppError::Domain(DomainError::Conflict(format!(
                "Username '{}' already exists",
                username
            ))));
        }
        if self.users.find_by_phone(phone).await?.is_some() {
            return Err(AppError::Domain(DomainError::Conflict(
                "Phone number already registered".to_string(),
            )));
        }

        let api_key = generate_api_key();
        let new_user = NewUser {
            username: username.to_string(),
            password_hash: hash_password(&registration.password, &self.password_pepper)?,
            phone: phone.to_string(),
            email,
            real_name: normalize_optional(registration.real_name),
            role: Role::User,
            api_key_hash: Some(hash_api_key(&api_key)),
        };

        let user = self.users.create(&new_user).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        Ok((user, api_key))
    }

    /// Check credentials and issue a fresh API key
    pub async fn login(&self, username: &str, password: &str) -> Result<(User, String), AppError> {
        let invalid = || {
            AppError::Domain(DomainError::Unauthorized(
                "Invalid username or password".to_string(),
            ))
        };

        let user = self
            .users
            .find_by_username(username.trim())
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(password, &user.password_hash, &self.password_pepper) {
            return Err(invalid());
        }

        if !user.is_active() {
            return Err(AppError::Domain(DomainError::Forbidden(
                "Account is banned".to_string(),
            )));
        }

        let api_key = generate_api_key();
        self.users
            .set_api_key_hash(&user.id, &hash_api_key(&api_key))
            .await?;
        tracing::debug!(user_id = %user.id, "Issued new API key");

        Ok((user, api_key))
    }

    /// Resolve a bearer token to a user
    pub async fn authenticate(&self, api_key: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .find_by_api_key_hash(&hash_api_key(api_key))
            .await?)
    }

    /// Load the caller's own profile
    pub async fn get_profile(&self, caller: &Caller) -> Result<User, AppError> {
        self.users
            .find_by_id(&caller.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", caller.id)))
    }

    /// Update phone, email, real name or avatar
    pub async fn update_profile(
        &self,
        caller: &Caller,
        update: ProfileUpdate,
    ) -> Result<User, AppError> {
        let current = self.get_profile(caller).await?;

        let update = ProfileUpdate {
            phone: update.phone.map(|p| p.trim().to_string()),
            email: update.email.map(|e| e.trim().to_string()),
            ..update
        };

        if let Some(phone) = &update.phone {
            validate_phone(phone)?;
            if phone != &current.phone {
                if let Some(other) = self.users.find_by_phone(phone).await? {
                    if other.id != current.id {
                        return Err(AppError::Domain(DomainError::Conflict(
                            "Phone number already registered".to_string(),
                        )));
                    }
                }
            }
        }
        if let Some(email) = &update.email {
            validate_email(email)?;
        }

        if update.is_empty() {
            return Ok(current);
        }

        Ok(self.users.update_profile(&caller.id, &update).await?)
    }

    /// Create the configured administrator if the username is free
    pub async fn ensure_admin(
        &self,
        username: &str,
        password: &str,
        phone: &str,
    ) -> Result<Option<User>, AppError> {
        if self.users.find_by_username(username).await?.is_some() {
            return Ok(None);
        }

        let admin = self
            .users
            .create(&NewUser {
                username: username.to_string(),
                password_hash: hash_password(password, &self.password_pepper)?,
                phone: phone.to_string(),
                email: None,
                real_name: None,
                role: Role::Admin,
                api_key_hash: None,
            })
            .await?;
        tracing::info!(user_id = %admin.id, username = %admin.username, "Bootstrapped admin account");

        Ok(Some(admin))
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_username(username: &str) -> Result<(), AppError> {
    let len = username.chars().count();
    if !(3..=20).contains(&len) {
        return Err(AppError::validation(
            "Username must be between 3 and 20 characters",
        ));
    }
    Ok(())
}

fn validate_phone(phone: &str) -> Result<(), AppError> {
    if !PHONE_RE.is_match(phone) {
        return Err(AppError::validation("Invalid phone number"));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), AppError> {
    if !EMAIL_RE.is_match(email) {
        return Err(AppError::validation("Invalid email address"));
    }
    Ok(())
}

/// Generate a random API key
fn generate_api_key() -> String {
    let mut rng = rand::thread_rng();
    let bytes: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
    format!("sk-{}", hex::encode(bytes))
}

/// Hash an API key for storage
pub fn hash_api_key(api_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Argon2id keyed with the server pepper; the pepper never appears in the
/// stored PHC string
fn password_hasher(pepper: &str) -> Result<Argon2<'_>, AppError> {
    Argon2::new_with_secret(
        pepper.as_bytes(),
        Algorithm::Argon2id,
        Version::V0x13,
        Params::default(),
    )
    .map_err(|e| AppError::Internal(format!("Invalid password hasher setup: {}", e)))
}

/// Hash a password into a PHC string
pub fn hash_password(password: &str, pepper: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = password_hasher(pepper)?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC string; unparseable hashes never match
pub fn verify_password(password: &str, stored: &str, pepper: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    password_hasher(pepper)
        .map(|hasher| hasher.verify_password(password.as_bytes(), &parsed).is_ok())
        .unwrap_or(false)
}
