//! Database entity models.
//!
//! The only entity is [`session`], one row of the fixed session-record table.

pub mod session;
