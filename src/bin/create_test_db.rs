use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::sync::{Arc, Mutex};

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use expense_tracker::{
    CategoryStore, NewTransaction, NewUser, SQLiteCategoryStore, SQLiteTransactionStore,
    SQLiteUserStore, TransactionStore, UserStore, initialize_db, seed_categories,
};

/// A utility for creating a test database for the expense tracker API server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let conn = Arc::new(Mutex::new(conn));
    let category_store = SQLiteCategoryStore::new(conn.clone());
    let transaction_store = SQLiteTransactionStore::new(conn.clone());
    let user_store = SQLiteUserStore::new(conn);

    println!("Seeding categories...");
    seed_categories(&category_store)?;

    println!("Creating test user...");
    let user = user_store.create(NewUser {
        name: "Test User".to_owned(),
        email: "test@example.com".to_owned(),
        password: "test".to_owned(),
    })?;

    println!("Creating sample transactions...");
    let today = OffsetDateTime::now_utc().date();
    for (days_ago, category_id, amount, description) in [
        (0, 1, 1000.0, "Pay day"),
        (1, 2, 42.5, "Groceries"),
        (3, 3, 15.0, "Bus pass"),
        (7, 4, 25.0, "Movie tickets"),
    ] {
        let category = category_store.get(category_id)?;

        transaction_store.create(NewTransaction {
            user_id: user.id,
            category_id: category.id,
            amount,
            description: description.to_owned(),
            date: today - Duration::days(days_ago),
        })?;
    }

    println!(
        "Success! Log in with {} and send the header User-ID: {}",
        user.email, user.id
    );

    Ok(())
}
