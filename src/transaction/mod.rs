//! Transactions record money that was spent or earned by a user.
//!
//! This module contains the transaction model and store, and the route
//! handlers for creating, listing and summarizing transactions.

mod core;
mod create_endpoint;
mod list_endpoint;
mod summary;

pub use self::core::{
    NewTransaction, SQLiteTransactionStore, Transaction, TransactionQuery, TransactionStore,
};
pub use create_endpoint::create_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;
pub use summary::{MonthlySummary, get_summary_endpoint};
