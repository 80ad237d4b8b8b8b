use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, IdenStatic, QueryFilter, QueryTrait, Set};
use tracing::{debug, info};
use uuid::Uuid;

use crate::entity::session::{
    self, ActiveModel as SessionActiveModel, Column, Entity as SessionEntity,
    Model as SessionRecord, NewSession, SESSIONS_TABLE,
};
use crate::error::{Result, SessionError};
use crate::fields::{self, Fields};
use crate::sql_client::SqlClient;

/// The record operations offered over the session table.
///
/// Each call is one independent round trip; nothing is coordinated across
/// calls.
#[async_trait]
pub trait SessionStore {
    /// Stores a new record under a freshly generated `session_id` and returns
    /// it.
    async fn create(&self, session: NewSession) -> Result<SessionRecord>;

    /// All records matching every `column = value` pair in `query`.
    ///
    /// An empty `query` is rejected with [`SessionError::EmptyFields`]; use
    /// [`fetch_all`](SessionStore::fetch_all) to list every record.
    async fn fetch(&self, query: &Fields) -> Result<Vec<SessionRecord>>;

    async fn fetch_all(&self) -> Result<Vec<SessionRecord>>;

    /// Writes the columns in `data` to the record with `session_id` and
    /// returns the record as stored afterwards.
    ///
    /// Returns [`SessionError::NotFound`] when no such record exists.
    async fn update(&self, session_id: &str, data: &Fields) -> Result<SessionRecord>;

    /// Removes the record with `session_id`.
    ///
    /// Returns `true` once the delete statement has run, whether or not a row
    /// matched. Deleting an unknown or already-deleted id is not an error.
    async fn delete(&self, session_id: &str) -> Result<bool>;
}

/// Session-record operations over a [`SqlClient`].
///
/// The client owns its connection. Like [`SqlClient`] it is meant to be used
/// from one task at a time.
///
/// # Examples
///
/// ```no_run
/// use serde_json::json;
/// use session_records::{NewSession, SessionClient, SessionStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Drops and recreates the table.
/// let sessions = SessionClient::from_env(true).await?;
///
/// let created = sessions
///     .create(NewSession::new("Galadriel", 123.456, 123, "1.1.1.1", true))
///     .await?;
///
/// let mut update = serde_json::Map::new();
/// update.insert("score".to_string(), json!(42.0));
/// let scored = sessions.update(&created.session_id, &update).await?;
/// assert_eq!(scored.score, Some(42.0));
///
/// sessions.close().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SessionClient {
    sql: SqlClient,
}

impl SessionClient {
    /// Wraps an open connection.
    ///
    /// When `reset` is true the session table is dropped (if present) and
    /// recreated empty. Otherwise the table is assumed to exist with a
    /// compatible schema; nothing is checked.
    pub async fn new(sql: SqlClient, reset: bool) -> Result<Self> {
        if reset {
            info!(table = SESSIONS_TABLE, "Resetting session table");
            sql.drop_table(SESSIONS_TABLE).await?;
            sql.create_table(&session::create_table_statement()).await?;
        }
        Ok(Self { sql })
    }

    /// Connects using the `DB_*` environment variables, then behaves like
    /// [`SessionClient::new`].
    pub async fn from_env(reset: bool) -> Result<Self> {
        let sql = SqlClient::from_env().await?;
        Self::new(sql, reset).await
    }

    /// The underlying connection, for statements outside the record API.
    pub fn sql(&self) -> &SqlClient {
        &self.sql
    }

    /// [`create`](SessionStore::create) from a column-name map.
    ///
    /// A `session_id` key in `data` is discarded; the generated id always
    /// wins.
    pub async fn create_from_fields(&self, data: &Fields) -> Result<SessionRecord> {
        let mut data = data.clone();
        data.remove(Column::SessionId.as_str());
        let session: NewSession = serde_json::from_value(data.into())
            .map_err(SessionError::InvalidPayload)?;
        self.create(session).await
    }

    pub async fn fetch_by_id(&self, session_id: &str) -> Result<Option<SessionRecord>> {
        let stmt = SessionEntity::find_by_id(session_id.to_string()).build(self.sql.backend());
        Ok(self
            .sql
            .query_as::<SessionRecord>(stmt)
            .await?
            .into_iter()
            .next())
    }

    /// Closes the underlying connection.
    pub async fn close(self) {
        self.sql.close().await;
    }
}

#[async_trait]
impl SessionStore for SessionClient {
    async fn create(&self, session: NewSession) -> Result<SessionRecord> {
        fields::check_ip(&session.ip)?;
        let record = session.into_record(Uuid::new_v4().to_string());

        let active = SessionActiveModel {
            timestamp: Set(record.timestamp),
            customer_id: Set(record.customer_id.clone()),
            session_id: Set(record.session_id.clone()),
            typing_speed: Set(record.typing_speed),
            cursor_hops: Set(record.cursor_hops),
            ip: Set(record.ip.clone()),
            password_pasted: Set(record.password_pasted),
            score: Set(record.score),
            deleted: Set(record.deleted),
        };
        let stmt = SessionEntity::insert(active).build(self.sql.backend());
        self.sql.execute(stmt).await?;

        debug!(session_id = %record.session_id, "Created session");
        Ok(record)
    }

    async fn fetch(&self, query: &Fields) -> Result<Vec<SessionRecord>> {
        let condition = fields::filter_condition(query)?;
        let stmt = SessionEntity::find()
            .filter(condition)
            .build(self.sql.backend());
        Ok(self.sql.query_as(stmt).await?)
    }

    async fn fetch_all(&self) -> Result<Vec<SessionRecord>> {
        let stmt = SessionEntity::find().build(self.sql.backend());
        Ok(self.sql.query_as(stmt).await?)
    }

    async fn update(&self, session_id: &str, data: &Fields) -> Result<SessionRecord> {
        let stmt = fields::assignments(data)?
            .into_iter()
            .fold(SessionEntity::update_many(), |update, (column, value)| {
                update.col_expr(column, value)
            })
            .filter(Column::SessionId.eq(session_id))
            .build(self.sql.backend());
        self.sql.execute(stmt).await?;

        // Drivers disagree on whether unchanged rows count as affected, so
        // existence is checked by reading the row back.
        self.fetch_by_id(session_id)
            .await?
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))
    }

    async fn delete(&self, session_id: &str) -> Result<bool> {
        let stmt = SessionEntity::delete_many()
            .filter(Column::SessionId.eq(session_id))
            .build(self.sql.backend());
        let removed = self.sql.execute(stmt).await?;

        debug!(session_id, removed, "Deleted session");
        Ok(true)
    }
}
