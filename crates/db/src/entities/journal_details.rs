//! `SeaORM` Entity for journal lines.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_details")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub journal_id: Uuid,
    pub line_no: i32,
    pub account_code: String,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub debit: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub credit: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::journals::Entity",
        from = "Column::JournalId",
        to = "super::journals::Column::Id",
        on_delete = "Cascade"
    )]
    Journals,
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountCode",
        to = "super::accounts::Column::Code"
    )]
    Accounts,
}

impl Related<super::journals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Journals.def()
    }
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
