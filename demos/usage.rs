//! Usage example for session-records
//!
//! Walks through every record operation against a real database.
//!
//! # Running the example
//!
//! 1. Make sure you have a PostgreSQL server running
//! 2. Provide the connection settings, either exported or in a `.env` file:
//!    ```bash
//!    export DB_SERVER=localhost:5432
//!    export DB_USER=postgres
//!    export DB_PASSWORD=password
//!    export DB_NAME=sessions
//!    ```
//! 3. Run the example:
//!    ```bash
//!    cargo run --example usage
//!    ```
//!
//! Pass `--keep` to skip the table reset and keep rows from earlier runs.

use serde_json::json;
use session_records::{Fields, NewSession, SessionClient, SessionStore};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let reset = !std::env::args().any(|arg| arg == "--keep");
    let sessions = SessionClient::from_env(reset).await?;

    let created = sessions
        .create(NewSession::new("Galadriel", 123.456, 123, "1.1.1.1", true))
        .await?;
    info!(session_id = %created.session_id, "Created session");

    let mut query = Fields::new();
    query.insert("customer_id".to_string(), json!("Galadriel"));
    let found = sessions.fetch(&query).await?;
    info!(count = found.len(), "Fetched sessions for Galadriel");

    let all = sessions.fetch_all().await?;
    info!(count = all.len(), "Fetched all sessions");

    let mut changes = Fields::new();
    changes.insert("score".to_string(), json!(0.87));
    let updated = sessions.update(&created.session_id, &changes).await?;
    info!(score = ?updated.score, "Scored session");

    let deleted = sessions.delete(&created.session_id).await?;
    info!(deleted, "Deleted session");

    println!("{}", serde_json::to_string_pretty(&updated)?);

    sessions.close().await;
    Ok(())
}
