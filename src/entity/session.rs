//! Session entity model for Sea-ORM database interaction.
//!
//! This module defines the typed representation of one row of the
//! `testSessions` table, the payload callers supply to create a row, and the
//! DDL used to (re)create the table.

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{ColumnDef, Table, TableCreateStatement};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Name of the table every session record lives in.
pub const SESSIONS_TABLE: &str = "testSessions";

/// Sea-ORM entity model representing one session record.
///
/// # Database Schema
///
/// | Column          | Type                   | Notes                          |
/// |-----------------|------------------------|--------------------------------|
/// | timestamp       | BIGINT NOT NULL        | Unix seconds                   |
/// | customer_id     | VARCHAR(255) NOT NULL  |                                |
/// | session_id      | VARCHAR(255) PK        | UUID v4, assigned on create    |
/// | typing_speed    | DOUBLE NOT NULL        |                                |
/// | cursor_hops     | INTEGER NOT NULL       |                                |
/// | ip              | VARCHAR(15) NOT NULL   | dotted IPv4                    |
/// | password_pasted | BOOLEAN NOT NULL       |                                |
/// | score           | DOUBLE NULL            |                                |
/// | deleted         | BOOLEAN NOT NULL       | defaults to `false`            |
///
/// The model serializes to a flat JSON object keyed by column name.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "testSessions")]
pub struct Model {
    pub timestamp: i64,
    pub customer_id: String,
    /// Generated by the client on create. Callers never choose it.
    #[sea_orm(primary_key, auto_increment = false)]
    pub session_id: String,
    pub typing_speed: f64,
    pub cursor_hops: i32,
    pub ip: String,
    pub password_pasted: bool,
    pub score: Option<f64>,
    /// Soft-delete marker. [`delete`](crate::SessionStore::delete) removes the
    /// row outright and does not consult it.
    pub deleted: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The record's timestamp as a UTC date-time.
    pub fn recorded_at(&self) -> std::result::Result<OffsetDateTime, time::error::ComponentRange> {
        OffsetDateTime::from_unix_timestamp(self.timestamp)
    }
}

/// The fields a caller supplies to create a session record.
///
/// Every column except `session_id` is present. `score` may be omitted (it is
/// stored as NULL) and `deleted` defaults to `false`. Decoding from a field
/// map rejects keys that are not columns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewSession {
    pub timestamp: i64,
    pub customer_id: String,
    pub typing_speed: f64,
    pub cursor_hops: i32,
    pub ip: String,
    pub password_pasted: bool,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub deleted: bool,
}

impl NewSession {
    /// A new, unscored session stamped with the current time.
    pub fn new(
        customer_id: impl Into<String>,
        typing_speed: f64,
        cursor_hops: i32,
        ip: impl Into<String>,
        password_pasted: bool,
    ) -> Self {
        Self {
            timestamp: OffsetDateTime::now_utc().unix_timestamp(),
            customer_id: customer_id.into(),
            typing_speed,
            cursor_hops,
            ip: ip.into(),
            password_pasted,
            score: None,
            deleted: false,
        }
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Attaches the generated id.
    pub fn into_record(self, session_id: String) -> Model {
        Model {
            timestamp: self.timestamp,
            customer_id: self.customer_id,
            session_id,
            typing_speed: self.typing_speed,
            cursor_hops: self.cursor_hops,
            ip: self.ip,
            password_pasted: self.password_pasted,
            score: self.score,
            deleted: self.deleted,
        }
    }
}

/// `CREATE TABLE testSessions (...)` for the backend in use.
pub fn create_table_statement() -> TableCreateStatement {
    Table::create()
        .table(Entity)
        .col(ColumnDef::new(Column::Timestamp).big_integer().not_null())
        .col(ColumnDef::new(Column::CustomerId).string_len(255).not_null())
        .col(
            ColumnDef::new(Column::SessionId)
                .string_len(255)
                .not_null()
                .primary_key(),
        )
        .col(ColumnDef::new(Column::TypingSpeed).double().not_null())
        .col(ColumnDef::new(Column::CursorHops).integer().not_null())
        .col(ColumnDef::new(Column::Ip).string_len(15).not_null())
        .col(ColumnDef::new(Column::PasswordPasted).boolean().not_null())
        .col(ColumnDef::new(Column::Score).double().null())
        .col(
            ColumnDef::new(Column::Deleted)
                .boolean()
                .not_null()
                .default(false),
        )
        .to_owned()
}
