//! Application router configuration.

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::{
    endpoints,
    routes::{
        create_category, create_transaction, delete_category, delete_transaction, get_categories,
        get_dashboard, get_transactions, log_in, register_user, update_transaction,
    },
    state::AppState,
    stores::{CategoryStore, TransactionStore, UserStore},
};

/// Return a router with all the app's routes.
///
/// Protected routes authenticate each request through the bearer token
/// extractor rather than a middleware layer, so an invalid token produces
/// the same JSON error shape as any other failure.
pub fn build_router<C, T, U>(state: AppState<C, T, U>) -> Router
where
    C: CategoryStore,
    T: TransactionStore,
    U: UserStore,
{
    Router::new()
        .route(endpoints::REGISTER, post(register_user::<C, T, U>))
        .route(endpoints::LOG_IN, post(log_in::<C, T, U>))
        .route(
            endpoints::CATEGORIES,
            get(get_categories::<C, T, U>).post(create_category::<C, T, U>),
        )
        .route(endpoints::CATEGORY, delete(delete_category::<C, T, U>))
        .route(endpoints::DASHBOARD, get(get_dashboard::<C, T, U>))
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions::<C, T, U>).post(create_transaction::<C, T, U>),
        )
        .route(
            endpoints::TRANSACTION,
            put(update_transaction::<C, T, U>).delete(delete_transaction::<C, T, U>),
        )
        .with_state(state)
}
