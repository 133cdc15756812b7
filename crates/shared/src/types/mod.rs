//! Common types used across the application.

pub mod id;
pub mod money;

pub use id::*;
pub use money::{DEFAULT_TOLERANCE, MAX_AMOUNT, is_negligible, round_money, within_tolerance};
