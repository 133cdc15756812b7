//! `SeaORM` Entity for the chart of accounts.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{AccountType, NormalBalance};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    pub normal_balance: NormalBalance,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::journal_details::Entity")]
    JournalDetails,
}

impl Related<super::journal_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalDetails.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
