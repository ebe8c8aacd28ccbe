//! Centime is a personal finance tracker.
//!
//! This library provides a JSON REST API for recording income and expense
//! transactions, organising them into categories, and viewing an aggregated
//! dashboard (totals, a zero-filled daily time series and a category expense
//! breakdown).

#![warn(missing_docs)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod auth;
pub mod dashboard;
mod db;
mod endpoints;
pub mod models;
mod routes;
mod routing;
mod state;
pub mod stores;
mod timezone;

pub use db::initialize as initialize_db;
pub use routing::build_router;
pub use state::AppState;
pub use timezone::timezone_is_valid;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an email and password combination that does not
    /// match a registered user.
    ///
    /// An unknown email and a wrong password intentionally produce the same
    /// error so the client cannot probe which emails are registered.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The bearer token was missing, malformed, expired or had a bad
    /// signature.
    #[error("invalid or expired auth token")]
    InvalidToken,

    /// An auth token could not be created.
    ///
    /// The cause should only be logged on the server, the client just sees an
    /// internal server error.
    #[error("could not create auth token")]
    TokenCreation,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An empty string was used for a user's name during registration.
    #[error("name cannot be empty")]
    EmptyName,

    /// The email used during registration already belongs to an account.
    #[error("an account with this email already exists")]
    DuplicateEmail,

    /// An empty string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// The category name already exists for this user.
    #[error("a category with this name already exists")]
    DuplicateCategoryName,

    /// The category ID used to create or update a transaction did not match a
    /// category that is visible to the user.
    #[error("the category ID does not refer to a valid category")]
    InvalidCategory,

    /// A negative amount was used for a transaction.
    ///
    /// Amounts are stored as positive magnitudes, the direction of the money
    /// flow is carried by the transaction kind.
    #[error("transaction amounts must not be negative")]
    NegativeAmount,

    /// An amount could not be parsed as a 2 decimal place number.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// A date string could not be parsed.
    ///
    /// Callers should pass in the string that caused the error.
    #[error("invalid date \"{0}\", expected the format YYYY-MM-DD")]
    InvalidDate(String),

    /// The requested resource was not found.
    ///
    /// The client should check that the parameters (e.g., ID) are correct and
    /// that the resource has been created.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The configured reference timezone is not a valid canonical timezone
    /// string.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("category.") =>
            {
                Error::DuplicateCategoryName
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            Error::InvalidCredentials | Error::InvalidToken => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            Error::TooWeak(_)
            | Error::EmptyName
            | Error::EmptyCategoryName
            | Error::InvalidCategory
            | Error::NegativeAmount
            | Error::InvalidAmount(_)
            | Error::InvalidDate(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            Error::DuplicateEmail | Error::DuplicateCategoryName => {
                (StatusCode::CONFLICT, self.to_string())
            }
            Error::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
