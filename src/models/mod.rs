//! The domain models of the application.

mod category;
mod money;
mod password;
mod transaction;
mod user;

pub use category::{Category, CategoryName};
pub use money::Amount;
pub use password::{PasswordHash, ValidatedPassword};
pub use transaction::{Transaction, TransactionKind};
pub use user::{User, UserID};

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseID = i64;
