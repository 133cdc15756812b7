//! `SeaORM` Entity for recorded period-closing runs.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "closing_runs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub period_label: String,
    pub closing_date: Date,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub total_revenue: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub total_expense: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub net_income: Decimal,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
