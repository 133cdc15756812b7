//! `SeaORM` Entity for journal entry headers.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "journals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub entry_no: String,
    pub date: Date,
    pub description: String,
    pub owner_id: Uuid,
    pub created_at: DateTimeUtc,
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
