//! Error types for the connection layer and the session-record layer.

use sea_orm::{DbErr, IdenStatic};
use thiserror::Error;

use crate::entity::session::Column;

/// Errors raised by [`SqlClient`](crate::SqlClient).
///
/// `MissingConfig` and `Connection` are setup-time failures and are fatal for
/// the client being built. `Query` covers every failure of an individual
/// statement. Neither kind is retried.
#[derive(Debug, Error)]
pub enum SqlClientError {
    /// A required configuration variable was not set.
    #[error("database connection error: missing configuration variable `{0}`")]
    MissingConfig(&'static str),

    /// The driver could not establish the connection.
    #[error("database connection error: {0}")]
    Connection(#[source] DbErr),

    /// The driver rejected or failed to run a statement.
    #[error("error executing SQL statement: {0}")]
    Query(#[source] DbErr),
}

impl SqlClientError {
    /// Returns `true` for failures that happened while connecting.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::MissingConfig(_) | Self::Connection(_))
    }
}

/// Errors raised by [`SessionClient`](crate::SessionClient).
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Sql(#[from] SqlClientError),

    /// No session exists with the given id.
    #[error("session not found: {0}")]
    NotFound(String),

    /// A filter or update was given no columns.
    #[error("{0} requires at least one column")]
    EmptyFields(&'static str),

    #[error("unknown column `{0}`")]
    UnknownColumn(String),

    /// A value does not have the type its column stores.
    #[error("invalid value for column `{}`: expected {expected}", column.as_str())]
    InvalidValue {
        column: Column,
        expected: &'static str,
    },

    /// The column is assigned by the client and cannot be written by callers.
    #[error("column `{}` cannot be modified", .0.as_str())]
    ImmutableColumn(Column),

    /// A creation payload could not be decoded from a field mapping.
    #[error("invalid session payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
}

pub type Result<T, E = SessionError> = std::result::Result<T, E>;
