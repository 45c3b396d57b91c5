//! The API endpoints URIs.

/// The route for registering a new user.
pub const REGISTER: &str = "/register";
/// The route for checking a user's email and password.
pub const LOG_IN: &str = "/login";
/// The route for listing the transaction categories.
pub const CATEGORIES: &str = "/categories";
/// The route for creating and listing the current user's transactions.
pub const TRANSACTIONS: &str = "/transactions/";
/// The same as [TRANSACTIONS], for clients that leave off the trailing slash.
pub const TRANSACTIONS_NO_TRAILING_SLASH: &str = "/transactions";
/// The route for summarizing the current user's transactions for one month.
pub const TRANSACTION_SUMMARY: &str = "/transactions/summary";
