//! # Session Records
//!
//! Typed create/fetch/update/delete access to a single, fixed session-record
//! table, built on [Sea-ORM](https://crates.io/crates/sea-orm).
//!
//! The crate has two layers:
//!
//! - [`SqlClient`] owns one database connection for its lifetime and runs
//!   individual statements over it, each committed on its own. It also
//!   creates and drops tables.
//! - [`SessionClient`] owns a [`SqlClient`] and implements [`SessionStore`],
//!   the record operations over the `testSessions` table.
//!
//! All values reach the database as bound statement parameters. Filters and
//! updates may be given as column-name maps ([`Fields`]); every key is checked
//! against the table's columns and every value against the column's type.
//!
//! ## Configuration
//!
//! [`SqlClient::from_env`] and [`SessionClient::from_env`] read `DB_SERVER`,
//! `DB_USER`, `DB_PASSWORD` and `DB_NAME` (plus an optional `DB_SCHEME`,
//! default `postgres`), loading a `.env` file first when one exists.
//!
//! ## Quick Start
//!
//! ```no_run
//! use serde_json::json;
//! use session_records::{Fields, NewSession, SessionClient, SessionStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // `true` drops and recreates the table; pass `false` to keep existing rows.
//! let sessions = SessionClient::from_env(true).await?;
//!
//! let created = sessions
//!     .create(NewSession::new("Galadriel", 123.456, 123, "1.1.1.1", true))
//!     .await?;
//!
//! let mut query = Fields::new();
//! query.insert("customer_id".to_string(), json!("Galadriel"));
//! let found = sessions.fetch(&query).await?;
//! assert_eq!(found, vec![created.clone()]);
//!
//! assert!(sessions.delete(&created.session_id).await?);
//! sessions.close().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! There is exactly one connection and no internal locking beyond it. Use one
//! client per task.

pub mod config;
pub mod entity;
pub mod error;
mod fields;
mod session_client;
mod sql_client;

pub use config::DatabaseConfig;
pub use entity::session::{Model as SessionRecord, NewSession, SESSIONS_TABLE};
pub use error::{SessionError, SqlClientError};
pub use fields::Fields;
pub use session_client::{SessionClient, SessionStore};
pub use sql_client::{Row, SqlClient};
