use std::env;

use anyhow::{Context, Result};

use crate::domain::entities::page::DEFAULT_PAGE_SIZE;

/// Administrator account created at startup when it does not exist yet
#[derive(Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub password: String,
    pub phone: String,
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Server-side secret mixed into every password hash
    pub password_pepper: String,
    /// Upper bound for `page_size` on list endpoints
    pub max_page_size: u64,
    pub admin: Option<AdminBootstrap>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let port = match env::var("PORT") {
            Ok(p) => p.parse().with_context(|| format!("PORT is not a valid port: {}", p))?,
            Err(_) => 8080,
        };

        let max_page_size = match env::var("MAX_PAGE_SIZE") {
            Ok(v) => v
                .parse::<u64>()
                .with_context(|| format!("MAX_PAGE_SIZE is not a number: {}", v))?
                .max(DEFAULT_PAGE_SIZE),
            Err(_) => 100,
        };

        let password_pepper = env::var("PASSWORD_PEPPER").unwrap_or_else(|_| {
            tracing::warn!("PASSWORD_PEPPER not set, using development pepper");
            "dev-pepper-not-for-production".to_string()
        });

        let admin = match (env::var("ADMIN_USERNAME"), env::var("ADMIN_PASSWORD")) {
            (Ok(username), Ok(password)) => Some(AdminBootstrap {
                username,
                password,
                phone: env::var("ADMIN_PHONE").unwrap_or_else(|_| "10000000000".to_string()),
            }),
            _ => None,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port,
            password_pepper,
            max_page_size,
            admin,
        })
    }
}
