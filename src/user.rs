//! Defines the user model, the user store trait and its SQLite implementation.

use std::{
    fmt::Display,
    sync::{Arc, Mutex},
};

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    db::{CreateTable, MapRow},
};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered user of the application.
///
/// The password is stored and compared as plain text.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The user's display name.
    pub name: String,
    /// The user's email address, unique across all users.
    pub email: String,
    /// The user's password.
    pub password: String,
}

/// The details needed to create a new [User].
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    /// The user's display name.
    pub name: String,
    /// The user's email address, must not belong to another user.
    pub email: String,
    /// The user's password.
    pub password: String,
}

/// Handles the creation and retrieval of [User] objects.
pub trait UserStore {
    /// Create a new user.
    ///
    /// Returns [Error::DuplicateEmail] if a user with the same email already exists.
    fn create(&self, new_user: NewUser) -> Result<User, Error>;

    /// Get a user by their ID.
    ///
    /// Returns [Error::NotFound] if no user with the given ID exists.
    fn get(&self, id: UserID) -> Result<User, Error>;

    /// Get the user whose email and password both match exactly.
    ///
    /// Returns [Error::NotFound] if no such user exists.
    fn get_by_credentials(&self, email: &str, password: &str) -> Result<User, Error>;
}

/// Creates and retrieves users to/from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteUserStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteUserStore {
    /// Create a new user store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl UserStore for SQLiteUserStore {
    /// Create and insert a new user into the database.
    ///
    /// The email uniqueness check and the insert happen in a single statement,
    /// so two concurrent registrations with the same email cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns a [Error::DuplicateEmail] if the email is already in use,
    /// [Error::DatabaseLockError] if the connection lock is poisoned, or
    /// [Error::SqlError] if an SQL related error occurred.
    fn create(&self, new_user: NewUser) -> Result<User, Error> {
        let connection = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        connection
            .prepare(
                "INSERT INTO user (name, email, password) VALUES (?1, ?2, ?3)
                 RETURNING id, name, email, password",
            )?
            .query_row(
                (&new_user.name, &new_user.email, &new_user.password),
                Self::map_row,
            )
            .map_err(|error| error.into())
    }

    /// Get the user from the database that has the specified `id`.
    ///
    /// # Errors
    ///
    /// Returns a [Error::NotFound] error if there is no user with the specified ID or
    /// [Error::SqlError] if there are SQL related errors.
    fn get(&self, id: UserID) -> Result<User, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare("SELECT id, name, email, password FROM user WHERE id = :id")?
            .query_row(&[(":id", &id.as_i64())], Self::map_row)
            .map_err(|error| error.into())
    }

    /// Get the user from the database that has the specified `email` and `password`.
    ///
    /// # Errors
    ///
    /// Returns a [Error::NotFound] error if no user matches or
    /// [Error::SqlError] if there are SQL related errors.
    fn get_by_credentials(&self, email: &str, password: &str) -> Result<User, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(
                "SELECT id, name, email, password FROM user
                 WHERE email = :email AND password = :password",
            )?
            .query_row(
                &[(":email", email), (":password", password)],
                Self::map_row,
            )
            .map_err(|error| error.into())
    }
}

impl CreateTable for SQLiteUserStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteUserStore {
    type ReturnType = User;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let raw_id = row.get(offset)?;

        Ok(User {
            id: UserID::new(raw_id),
            name: row.get(offset + 1)?,
            email: row.get(offset + 2)?,
            password: row.get(offset + 3)?,
        })
    }
}
