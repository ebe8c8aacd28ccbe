//! The request handlers for the JSON API.

mod auth;
mod category;
mod dashboard;
mod transaction;

pub use auth::{log_in, register_user};
pub use category::{create_category, delete_category, get_categories};
pub use dashboard::get_dashboard;
pub use transaction::{
    create_transaction, delete_transaction, get_transactions, update_transaction,
};
