//! Defines the transaction model, the transaction store trait and its SQLite implementation.

use std::{
    ops::RangeInclusive,
    sync::{Arc, Mutex},
};

use rusqlite::{Connection, Row, ToSql, params_from_iter};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::DatabaseID,
    db::{CreateTable, MapRow},
    user::UserID,
};

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: DatabaseID,
    /// The ID of the user that created the transaction.
    pub user_id: UserID,
    /// The ID of the category the transaction belongs to.
    pub category_id: DatabaseID,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened, serialized as YYYY-MM-DD.
    pub date: Date,
}

/// The details needed to create a new [Transaction].
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The user that owns the transaction.
    pub user_id: UserID,
    /// The category the transaction belongs to. Must refer to an existing category.
    pub category_id: DatabaseID,
    /// The amount of money spent or earned.
    pub amount: f64,
    /// What the transaction was for.
    pub description: String,
    /// When the transaction happened.
    pub date: Date,
}

/// Defines how transactions should be fetched from [TransactionStore::get_query].
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionQuery {
    /// Only include transactions created by this user.
    pub user_id: UserID,
    /// Include transactions within `date_range` (inclusive).
    pub date_range: Option<RangeInclusive<Date>>,
}

impl TransactionQuery {
    /// A query for all of `user_id`'s transactions.
    pub fn for_user(user_id: UserID) -> Self {
        Self {
            user_id,
            date_range: None,
        }
    }
}

/// Handles the creation and retrieval of transactions.
pub trait TransactionStore {
    /// Create a new transaction in the store.
    ///
    /// Returns [Error::InvalidCategory] if the category does not exist.
    fn create(&self, new_transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Retrieve transactions from the store in the way defined by `query`,
    /// in the order they were created.
    fn get_query(&self, query: TransactionQuery) -> Result<Vec<Transaction>, Error>;
}

/// Stores transactions in a SQLite database.
///
/// Note that because a transaction depends on the [User](crate::user::User) and
/// [Category](crate::category::Category) models, these models must be set up in the database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidCategory] if `category_id` does not refer to a valid category,
    /// - [Error::DatabaseLockError] if the connection lock is poisoned,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&self, new_transaction: NewTransaction) -> Result<Transaction, Error> {
        let connection = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        connection
            .prepare(
                "INSERT INTO \"transaction\" (user_id, category_id, amount, description, date)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING id, user_id, category_id, amount, description, date",
            )?
            .query_row(
                (
                    new_transaction.user_id.as_i64(),
                    new_transaction.category_id,
                    new_transaction.amount,
                    &new_transaction.description,
                    new_transaction.date,
                ),
                Self::map_row,
            )
            .map_err(|error| match error {
                // Code 787 occurs when a FOREIGN KEY constraint failed.
                // The user is checked before any transaction is created, so it
                // must be the category that does not exist.
                rusqlite::Error::SqliteFailure(error, Some(_)) if error.extended_code == 787 => {
                    Error::InvalidCategory
                }
                error => error.into(),
            })
    }

    /// Retrieve the transactions in the database that match `query`.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL error.
    fn get_query(&self, query: TransactionQuery) -> Result<Vec<Transaction>, Error> {
        let mut sql = String::from(
            "SELECT id, user_id, category_id, amount, description, date
             FROM \"transaction\" WHERE user_id = ?",
        );
        let mut params: Vec<Box<dyn ToSql>> = vec![Box::new(query.user_id.as_i64())];

        if let Some(date_range) = query.date_range {
            sql.push_str(" AND date BETWEEN ? AND ?");
            let (start, end) = date_range.into_inner();
            params.push(Box::new(start));
            params.push(Box::new(end));
        }

        sql.push_str(" ORDER BY id");

        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(&sql)?
            .query_map(params_from_iter(params.iter()), Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
            .collect()
    }
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                category_id INTEGER NOT NULL,
                amount REAL NOT NULL,
                description TEXT NOT NULL,
                date TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE CASCADE
            )",
            (),
        )?;

        // Ensure the summary's date range lookups are fast.
        connection.execute(
            "CREATE INDEX IF NOT EXISTS idx_transaction_user_date
             ON \"transaction\"(user_id, date)",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let raw_user_id = row.get(offset + 1)?;

        Ok(Transaction {
            id: row.get(offset)?,
            user_id: UserID::new(raw_user_id),
            category_id: row.get(offset + 2)?,
            amount: row.get(offset + 3)?,
            description: row.get(offset + 4)?,
            date: row.get(offset + 5)?,
        })
    }
}
