//! Handler for the aggregated dashboard.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::{
    Error,
    auth::Claims,
    dashboard::{DashboardSnapshot, PeriodFilter, assemble_snapshot},
    state::AppState,
    stores::{CategoryStore, TransactionStore, UserStore},
};

/// The month/year filter a client may apply to the dashboard.
///
/// The values are taken as raw strings: anything that does not parse as a
/// valid month or year is ignored rather than rejected.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    /// The requested month (1-12).
    pub month: Option<String>,
    /// The requested year.
    pub year: Option<String>,
}

/// Handler for the logged in user's dashboard: summary totals, the most
/// recent transactions, a daily time series and a category expense
/// breakdown.
pub async fn get_dashboard<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    claims: Claims,
    Query(params): Query<DashboardParams>,
) -> Result<Json<DashboardSnapshot>, Error>
where
    C: CategoryStore,
    T: TransactionStore,
    U: UserStore,
{
    let filter = PeriodFilter::parse_lenient(params.month.as_deref(), params.year.as_deref());

    assemble_snapshot(
        state.transaction_store(),
        claims.user_id(),
        filter,
        state.timezone(),
    )
    .map(Json)
}
