//! `users` table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
    #[sea_orm(unique)]
    pub phone: String,
    pub email: Option<String>,
    pub real_name: Option<String>,
    pub avatar: Option<String>,
    pub role: String,
    pub status: String,
    pub api_key_hash: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::recycle_orders::Entity")]
    RecycleOrders,
}

impl Related<super::recycle_orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecycleOrders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
