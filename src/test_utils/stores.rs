//! Stores whose every operation fails, for testing how handlers deal with store errors.

use crate::{
    Error,
    category::{Category, CategoryStore, NewCategory},
    database_id::DatabaseID,
    transaction::{NewTransaction, Transaction, TransactionQuery, TransactionStore},
    user::{NewUser, User, UserID, UserStore},
};

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FailingCategoryStore;

impl CategoryStore for FailingCategoryStore {
    fn get_or_create(&self, _new_category: NewCategory) -> Result<Category, Error> {
        Err(Error::DatabaseLockError)
    }

    fn get(&self, _category_id: DatabaseID) -> Result<Category, Error> {
        Err(Error::DatabaseLockError)
    }

    fn get_all(&self) -> Result<Vec<Category>, Error> {
        Err(Error::DatabaseLockError)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FailingTransactionStore;

impl TransactionStore for FailingTransactionStore {
    fn create(&self, _new_transaction: NewTransaction) -> Result<Transaction, Error> {
        Err(Error::DatabaseLockError)
    }

    fn get_query(&self, _query: TransactionQuery) -> Result<Vec<Transaction>, Error> {
        Err(Error::DatabaseLockError)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FailingUserStore;

impl UserStore for FailingUserStore {
    fn create(&self, _new_user: NewUser) -> Result<User, Error> {
        Err(Error::DatabaseLockError)
    }

    fn get(&self, _id: UserID) -> Result<User, Error> {
        Err(Error::DatabaseLockError)
    }

    fn get_by_credentials(&self, _email: &str, _password: &str) -> Result<User, Error> {
        Err(Error::DatabaseLockError)
    }
}
