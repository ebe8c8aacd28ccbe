//! Handlers for registering a user and logging in.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    auth::issue_token,
    models::{PasswordHash, User, ValidatedPassword},
    state::AppState,
    stores::{CategoryStore, TransactionStore, UserStore},
};

/// The data a client sends to register a new account.
#[derive(Debug, Deserialize)]
pub struct RegisterData {
    /// The display name of the new user.
    pub name: String,
    /// The email to register with.
    pub email: EmailAddress,
    /// The password in plain text.
    pub password: String,
}

/// The data a client sends to log in.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    /// The email of the account.
    pub email: EmailAddress,
    /// The password in plain text.
    pub password: String,
}

/// The response to a successful log in.
#[derive(Debug, Serialize)]
pub struct LogInResponse {
    /// A signed bearer token for subsequent requests.
    pub token: String,
    /// The logged in user.
    pub user: User,
}

/// Handler for registering a new user.
///
/// # Errors
///
/// Returns [Error::EmptyName] if the name is empty or whitespace,
/// [Error::TooWeak] if the password is too easy to guess, and
/// [Error::DuplicateEmail] if the email is already registered.
pub async fn register_user<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    Json(register_data): Json<RegisterData>,
) -> Result<impl IntoResponse, Error>
where
    C: CategoryStore,
    T: TransactionStore,
    U: UserStore,
{
    let name = register_data.name.trim();

    if name.is_empty() {
        return Err(Error::EmptyName);
    }

    let password = ValidatedPassword::new(&register_data.password)?;
    let password_hash = PasswordHash::new(password, PasswordHash::DEFAULT_COST)?;

    let user = state
        .user_store()
        .create(name, register_data.email, password_hash)?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Handler for logging in a user.
///
/// # Errors
///
/// Returns [Error::InvalidCredentials] if the email is not registered or the
/// password does not match. The two cases are indistinguishable to the
/// client.
pub async fn log_in<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<LogInResponse>, Error>
where
    C: CategoryStore,
    T: TransactionStore,
    U: UserStore,
{
    let user = state
        .user_store()
        .get_by_email(&credentials.email)
        .map_err(|error| match error {
            Error::NotFound => Error::InvalidCredentials,
            error => error,
        })?;

    if !user.password_hash().matches(&credentials.password)? {
        return Err(Error::InvalidCredentials);
    }

    let token = issue_token(user.id(), state.encoding_key())?;

    Ok(Json(LogInResponse { token, user }))
}
