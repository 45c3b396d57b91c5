//! The route handler for listing the current user's transactions.

use axum::{Extension, Json, extract::State};

use crate::{
    AppState, Error,
    category::CategoryStore,
    transaction::{Transaction, TransactionQuery, TransactionStore},
    user::{UserID, UserStore},
};

/// A route handler that returns all of the current user's transactions in the order they were created.
pub async fn list_transactions_endpoint<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Transaction>>, Error>
where
    C: CategoryStore + Send + Sync,
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    state
        .transaction_store
        .get_query(TransactionQuery::for_user(user_id))
        .map(Json)
        .map_err(|error| error.into_internal("Could not fetch transactions"))
}
