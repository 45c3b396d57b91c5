//! Categories classify transactions as income or expenses, e.g., 'Salary' or 'Food'.
//!
//! This module defines the category model, the category store trait and its
//! SQLite implementation, the route handler for listing categories, and the
//! default categories that are seeded at start up.

use std::sync::{Arc, Mutex};

use axum::{Json, extract::State};
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    database_id::DatabaseID,
    db::{CreateTable, MapRow},
    transaction::TransactionStore,
    user::UserStore,
};

/// The category type for income. Any other type is treated as an expense.
pub const INCOME: &str = "income";

/// The category type for expenses.
pub const EXPENSE: &str = "expense";

/// The categories that are created when the application starts.
pub const DEFAULT_CATEGORIES: [(&str, &str); 4] = [
    ("Salary", INCOME),
    ("Food", EXPENSE),
    ("Transport", EXPENSE),
    ("Entertainment", EXPENSE),
];

/// A category for expenses and income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The ID of the category.
    pub id: DatabaseID,
    /// The name of the category, unique across all categories.
    pub name: String,
    /// Either [INCOME] or [EXPENSE], although the store does not enforce this.
    #[serde(rename = "type")]
    pub category_type: String,
}

impl Category {
    /// Whether amounts in this category count towards income.
    pub fn is_income(&self) -> bool {
        self.category_type == INCOME
    }
}

/// The details needed to create a new [Category].
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    /// The unique name of the category.
    pub name: String,
    /// Either [INCOME] or [EXPENSE].
    pub category_type: String,
}

/// Creates and retrieves categories for transactions.
pub trait CategoryStore {
    /// Get the category called `name`, creating it if it does not exist.
    ///
    /// An existing category is returned as is, even if its type differs from
    /// the type in `new_category`.
    fn get_or_create(&self, new_category: NewCategory) -> Result<Category, Error>;

    /// Get a category by its ID.
    ///
    /// Returns [Error::NotFound] if the category does not exist.
    fn get(&self, category_id: DatabaseID) -> Result<Category, Error>;

    /// Get all categories.
    fn get_all(&self) -> Result<Vec<Category>, Error>;
}

/// Make sure the [DEFAULT_CATEGORIES] exist in `store`.
///
/// # Errors
/// Returns an error if there is an error accessing the store.
pub fn seed_categories(store: &impl CategoryStore) -> Result<Vec<Category>, Error> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|(name, category_type)| {
            store.get_or_create(NewCategory {
                name: (*name).to_owned(),
                category_type: (*category_type).to_owned(),
            })
        })
        .collect()
}

/// A route handler that lists all categories.
pub async fn get_categories<C, T, U>(
    State(state): State<AppState<C, T, U>>,
) -> Result<Json<Vec<Category>>, Error>
where
    C: CategoryStore + Send + Sync,
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    state
        .category_store
        .get_all()
        .map(Json)
        .map_err(|error| error.into_internal("Could not fetch categories"))
}

/// Creates and retrieves transaction categories to/from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteCategoryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteCategoryStore {
    /// Create a new category store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl CategoryStore for SQLiteCategoryStore {
    /// Get or create a category in the database.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn get_or_create(&self, new_category: NewCategory) -> Result<Category, Error> {
        let connection = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        connection.execute(
            "INSERT INTO category (name, type) VALUES (?1, ?2) ON CONFLICT(name) DO NOTHING",
            (&new_category.name, &new_category.category_type),
        )?;

        connection
            .prepare("SELECT id, name, type FROM category WHERE name = :name")?
            .query_row(&[(":name", &new_category.name)], Self::map_row)
            .map_err(|error| error.into())
    }

    /// Retrieve the category in the database with `category_id`.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn get(&self, category_id: DatabaseID) -> Result<Category, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare("SELECT id, name, type FROM category WHERE id = :id")?
            .query_row(&[(":id", &category_id)], Self::map_row)
            .map_err(|error| error.into())
    }

    /// Retrieve all categories in the database, ordered by ID.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn get_all(&self) -> Result<Vec<Category>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare("SELECT id, name, type FROM category ORDER BY id")?
            .query_map([], Self::map_row)?
            .map(|maybe_category| maybe_category.map_err(|error| error.into()))
            .collect()
    }
}

impl CreateTable for SQLiteCategoryStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS category (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                type TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteCategoryStore {
    type ReturnType = Category;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Category {
            id: row.get(offset)?,
            name: row.get(offset + 1)?,
            category_type: row.get(offset + 2)?,
        })
    }
}
