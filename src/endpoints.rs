//! The API endpoint URIs.

/// The route for registering a new user.
pub const REGISTER: &str = "/api/auth/register";
/// The route for logging in a user.
pub const LOG_IN: &str = "/api/auth/login";
/// The route to list and create categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route to delete a category.
pub const CATEGORY: &str = "/api/categories/{category_id}";
/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to update or delete a transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route for the aggregated dashboard.
pub const DASHBOARD: &str = "/api/transactions/dashboard";
