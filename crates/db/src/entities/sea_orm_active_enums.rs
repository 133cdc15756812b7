//! String-backed enums shared by the ledger tables.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use neraca_core::account as domain;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum AccountType {
    #[sea_orm(string_value = "asset")]
    Asset,
    #[sea_orm(string_value = "liability")]
    Liability,
    #[sea_orm(string_value = "equity")]
    Equity,
    #[sea_orm(string_value = "revenue")]
    Revenue,
    #[sea_orm(string_value = "expense")]
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
pub enum NormalBalance {
    #[sea_orm(string_value = "debit")]
    Debit,
    #[sea_orm(string_value = "credit")]
    Credit,
}

impl From<domain::AccountType> for AccountType {
    fn from(value: domain::AccountType) -> Self {
        match value {
            domain::AccountType::Asset => Self::Asset,
            domain::AccountType::Liability => Self::Liability,
            domain::AccountType::Equity => Self::Equity,
            domain::AccountType::Revenue => Self::Revenue,
            domain::AccountType::Expense => Self::Expense,
        }
    }
}

impl From<AccountType> for domain::AccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Revenue => Self::Revenue,
            AccountType::Expense => Self::Expense,
        }
    }
}

impl From<domain::NormalBalance> for NormalBalance {
    fn from(value: domain::NormalBalance) -> Self {
        match value {
            domain::NormalBalance::Debit => Self::Debit,
            domain::NormalBalance::Credit => Self::Credit,
        }
    }
}

impl From<NormalBalance> for domain::NormalBalance {
    fn from(value: NormalBalance) -> Self {
        match value {
            NormalBalance::Debit => Self::Debit,
            NormalBalance::Credit => Self::Credit,
        }
    }
}
