//! PostgreSQL adapter for UserRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use crate::domain::entities::{
    NewUser, ProfileUpdate, Role, User, UserId, UserStatus,
};
use crate::domain::ports::UserRepository;
use crate::entity::users;
use crate::error::DomainError;

/// PostgreSQL implementation of UserRepository
pub struct PostgresUserRepository {
    db: DatabaseConnection,
}

impl PostgresUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_one_by(
        &self,
        column: users::Column,
        value: &str,
    ) -> Result<Option<User>, DomainError> {
        let result = users::Entity::find()
            .filter(column.eq(value))
            .one(&self.db)
            .await?;

        Ok(result.map(|m| m.into()))
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let result = users::Entity::find_by_id(id.0).one(&self.db).await?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.find_one_by(users::Column::Username, username).await
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, DomainError> {
        self.find_one_by(users::Column::Phone, phone).await
    }

    async fn find_by_api_key_hash(&self, hash: &str) -> Result<Option<User>, DomainError> {
        self.find_one_by(users::Column::ApiKeyHash, hash).await
    }

    async fn create(&self, user: &NewUser) -> Result<User, DomainError> {
        let now = Utc::now().fixed_offset();

        let model = users::ActiveModel {
            username: Set(user.username.clone()),
            password_hash: Set(user.password_hash.clone()),
            phone: Set(user.phone.clone()),
            email: Set(user.email.clone()),
            real_name: Set(user.real_name.clone()),
            avatar: Set(None),
            role: Set(user.role.to_string()),
            status: Set(UserStatus::Active.to_string()),
            api_key_hash: Set(user.api_key_hash.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await?;

        Ok(result.into())
    }

    async fn update_profile(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<User, DomainError> {
        let mut model = users::ActiveModel {
            id: Set(id.0),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };
        if let Some(phone) = &update.phone {
            model.phone = Set(phone.clone());
        }
        if let Some(email) = &update.email {
            model.email = Set(Some(email.clone()));
        }
        if let Some(real_name) = &update.real_name {
            model.real_name = Set(Some(real_name.clone()));
        }
        if let Some(avatar) = &update.avatar {
            model.avatar = Set(Some(avatar.clone()));
        }

        let result = model.update(&self.db).await?;

        Ok(result.into())
    }

    async fn set_api_key_hash(&self, id: &UserId, hash: &str) -> Result<(), DomainError> {
        users::ActiveModel {
            id: Set(id.0),
            api_key_hash: Set(Some(hash.to_string())),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        }
        .update(&self.db)
        .await?;

        Ok(())
    }
}

/// Convert SeaORM model to domain entity
impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        User {
            id: UserId(model.id),
            username: model.username,
            password_hash: model.password_hash,
            phone: model.phone,
            email: model.email,
            real_name: model.real_name,
            avatar: model.avatar,
            role: model.role.parse().unwrap_or(Role::User),
            // an unreadable status must not grant access
            status: model.status.parse().unwrap_or(UserStatus::Banned),
            api_key_hash: model.api_key_hash,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
