//! `SeaORM` entity prelude.

pub use super::accounts::Entity as Accounts;
pub use super::closing_runs::Entity as ClosingRuns;
pub use super::journal_details::Entity as JournalDetails;
pub use super::journals::Entity as Journals;
