//! `evaluations` table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "evaluations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub order_id: i64,
    pub evaluator_id: i64,
    pub appearance_score: i32,
    pub function_score: i32,
    pub performance_score: i32,
    pub overall_score: f64,
    pub market_price: f64,
    pub depreciation_rate: f64,
    pub final_price: f64,
    pub evaluation_report: Option<String>,
    pub images: Option<String>,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::recycle_orders::Entity",
        from = "Column::OrderId",
        to = "super::recycle_orders::Column::Id"
    )]
    RecycleOrder,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::EvaluatorId",
        to = "super::users::Column::Id"
    )]
    Evaluator,
}

impl Related<super::recycle_orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecycleOrder.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
