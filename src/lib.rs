//! An expense tracker where users record income and expenses against shared
//! categories and view monthly summaries.
//!
//! This library provides a JSON REST API backed by SQLite. Users register
//! and log in with an email and password, and identify themselves on the
//! `/transactions` routes with the `User-ID` header.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod auth;
mod category;
mod config;
mod database_id;
mod db;
mod endpoints;
mod error;
mod extract;
mod log_in;
mod logging;
mod register_user;
mod routing;
mod transaction;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, SQLAppState, create_app_state};
pub use auth::USER_ID_HEADER;
pub use category::{Category, CategoryStore, NewCategory, SQLiteCategoryStore, seed_categories};
pub use config::Config;
pub use database_id::DatabaseID;
pub use db::initialize as initialize_db;
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::{add_service_layers, build_router};
pub use transaction::{
    MonthlySummary, NewTransaction, SQLiteTransactionStore, Transaction, TransactionQuery,
    TransactionStore,
};
pub use user::{NewUser, SQLiteUserStore, User, UserID, UserStore};

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
