//! Handlers for listing, creating and deleting categories.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::{
    Error,
    auth::Claims,
    models::{Category, CategoryName, DatabaseID},
    state::AppState,
    stores::{CategoryStore, TransactionStore, UserStore},
};

/// The data a client sends to create a category.
#[derive(Debug, Deserialize)]
pub struct CategoryData {
    /// The name of the new category.
    pub name: String,
}

/// Handler for listing the categories visible to the logged in user: their
/// own plus the built-in defaults.
pub async fn get_categories<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    claims: Claims,
) -> Result<Json<Vec<Category>>, Error>
where
    C: CategoryStore,
    T: TransactionStore,
    U: UserStore,
{
    state
        .category_store()
        .get_visible_to(claims.user_id())
        .map(Json)
}

/// Handler for creating a category.
///
/// # Errors
///
/// Returns [Error::EmptyCategoryName] if the name is empty or whitespace,
/// and [Error::DuplicateCategoryName] if the user already has a category
/// with this name.
pub async fn create_category<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    claims: Claims,
    Json(category_data): Json<CategoryData>,
) -> Result<impl IntoResponse, Error>
where
    C: CategoryStore,
    T: TransactionStore,
    U: UserStore,
{
    let name = CategoryName::new(&category_data.name)?;

    let category = state.category_store().create(name, claims.user_id())?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// Handler for deleting a category owned by the logged in user.
///
/// # Errors
///
/// Returns [Error::NotFound] if the category does not exist, belongs to
/// another user or is one of the built-in defaults.
pub async fn delete_category<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    claims: Claims,
    Path(category_id): Path<DatabaseID>,
) -> Result<StatusCode, Error>
where
    C: CategoryStore,
    T: TransactionStore,
    U: UserStore,
{
    state
        .category_store()
        .delete(category_id, claims.user_id())?;

    Ok(StatusCode::NO_CONTENT)
}
