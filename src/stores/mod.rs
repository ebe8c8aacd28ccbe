//! Contains traits and implementations for objects that store the domain [models](crate::models).

mod category;
mod sql_store;
mod transaction;
mod user;

pub mod sqlite;

pub use category::CategoryStore;
pub use sql_store::{SQLAppState, create_app_state};
pub use transaction::{
    CategorySum, DailySum, Interval, KindTotals, NewTransaction, TransactionQuery,
    TransactionStore,
};
pub use user::UserStore;
