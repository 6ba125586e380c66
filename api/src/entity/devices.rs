//! `devices` table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "devices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub model: Option<String>,
    pub category: String,
    pub cpu: Option<String>,
    pub memory: Option<String>,
    pub storage: Option<String>,
    pub graphics: Option<String>,
    pub screen: Option<String>,
    pub condition: String,
    pub year_bought: i32,
    pub base_price: f64,
    pub description: Option<String>,
    pub images: Option<String>,
    pub status: String,
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
