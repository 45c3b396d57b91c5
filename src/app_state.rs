//! Implements a struct that holds the state of the REST server.

use std::{
    marker::{Send, Sync},
    sync::{Arc, Mutex},
};

use rusqlite::Connection;

use crate::{
    Error,
    category::{CategoryStore, SQLiteCategoryStore, seed_categories},
    db::initialize,
    transaction::{SQLiteTransactionStore, TransactionStore},
    user::{SQLiteUserStore, UserStore},
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState<C, T, U>
where
    C: CategoryStore + Send + Sync,
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    /// The store for reading and seeding [categories](crate::Category).
    pub category_store: C,
    /// The store for managing user [transactions](crate::Transaction).
    pub transaction_store: T,
    /// The store for managing [users](crate::User).
    pub user_store: U,
}

impl<C, T, U> AppState<C, T, U>
where
    C: CategoryStore + Send + Sync,
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    /// Create a new [AppState].
    pub fn new(category_store: C, transaction_store: T, user_store: U) -> Self {
        Self {
            category_store,
            transaction_store,
            user_store,
        }
    }
}

/// An [AppState] that uses SQLite for the backing stores.
pub type SQLAppState = AppState<SQLiteCategoryStore, SQLiteTransactionStore, SQLiteUserStore>;

/// Create an [AppState] where every store shares the one SQLite connection.
///
/// This function will initialize the database by adding the tables for the
/// domain models and then make sure the default categories exist.
///
/// # Errors
/// Returns an error if the database cannot be initialized or seeded.
pub fn create_app_state(db_connection: Connection) -> Result<SQLAppState, Error> {
    initialize(&db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));

    let category_store = SQLiteCategoryStore::new(connection.clone());
    let categories = seed_categories(&category_store)?;
    tracing::debug!("Seeded {} categories", categories.len());

    Ok(AppState::new(
        category_store,
        SQLiteTransactionStore::new(connection.clone()),
        SQLiteUserStore::new(connection),
    ))
}
