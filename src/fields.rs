//! Column-name to value maps, the dynamic form of filters and updates.
//!
//! Keys must name a column of the session table. Values are checked against
//! the column's type and bound as statement parameters; nothing from a map is
//! ever spliced into SQL text.

use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, IdenStatic, Iterable, Value};
use serde_json::Value as JsonValue;

use crate::entity::session::Column;
use crate::error::{Result, SessionError};

/// A mapping from column name to value.
pub type Fields = serde_json::Map<String, JsonValue>;

const MAX_IP_LEN: usize = 15;

fn lookup_column(name: &str) -> Result<Column> {
    Column::iter()
        .find(|column| column.as_str() == name)
        .ok_or_else(|| SessionError::UnknownColumn(name.to_string()))
}

fn invalid(column: Column, expected: &'static str) -> SessionError {
    SessionError::InvalidValue { column, expected }
}

pub(crate) fn check_ip(ip: &str) -> Result<()> {
    if ip.chars().count() > MAX_IP_LEN {
        return Err(invalid(Column::Ip, "a string of at most 15 characters"));
    }
    Ok(())
}

/// Converts one JSON value into the SQL value stored in `column`.
fn bind_value(column: Column, raw: &JsonValue) -> Result<Value> {
    match column {
        Column::Timestamp => raw
            .as_i64()
            .map(Value::from)
            .ok_or_else(|| invalid(column, "an integer")),
        Column::CursorHops => raw
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(Value::from)
            .ok_or_else(|| invalid(column, "a 32-bit integer")),
        Column::TypingSpeed => raw
            .as_f64()
            .map(Value::from)
            .ok_or_else(|| invalid(column, "a number")),
        Column::Score => match raw {
            JsonValue::Null => Ok(Value::from(None::<f64>)),
            _ => raw
                .as_f64()
                .map(Value::from)
                .ok_or_else(|| invalid(column, "a number or null")),
        },
        Column::PasswordPasted | Column::Deleted => raw
            .as_bool()
            .map(Value::from)
            .ok_or_else(|| invalid(column, "a boolean")),
        Column::Ip => {
            let ip = raw.as_str().ok_or_else(|| invalid(column, "a string"))?;
            check_ip(ip)?;
            Ok(Value::from(ip.to_string()))
        }
        Column::CustomerId | Column::SessionId => raw
            .as_str()
            .map(|s| Value::from(s.to_string()))
            .ok_or_else(|| invalid(column, "a string")),
    }
}

/// One equality condition per entry, all of which must hold. A `null` score
/// matches rows whose score is NULL.
pub(crate) fn filter_condition(fields: &Fields) -> Result<Condition> {
    if fields.is_empty() {
        return Err(SessionError::EmptyFields("fetch"));
    }

    fields
        .iter()
        .try_fold(Condition::all(), |condition, (name, raw)| {
            let column = lookup_column(name)?;
            let value = bind_value(column, raw)?;
            let expr = if raw.is_null() {
                column.is_null()
            } else {
                column.eq(value)
            };
            Ok(condition.add(expr))
        })
}

/// The `SET` list of an update. `session_id` is assigned on create and can
/// never be rewritten.
pub(crate) fn assignments(fields: &Fields) -> Result<Vec<(Column, SimpleExpr)>> {
    if fields.is_empty() {
        return Err(SessionError::EmptyFields("update"));
    }

    fields
        .iter()
        .map(|(name, raw)| {
            let column = lookup_column(name)?;
            if let Column::SessionId = column {
                return Err(SessionError::ImmutableColumn(column));
            }
            Ok((column, Expr::value(bind_value(column, raw)?)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn fields(value: JsonValue) -> Fields {
        match value {
            JsonValue::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn unknown_column_is_rejected() {
        let err = filter_condition(&fields(json!({ "colour": "green" }))).unwrap_err();
        assert!(matches!(err, SessionError::UnknownColumn(name) if name == "colour"));
    }

    #[test]
    fn empty_maps_are_rejected() {
        assert!(matches!(
            filter_condition(&Fields::new()),
            Err(SessionError::EmptyFields("fetch"))
        ));
        assert!(matches!(
            assignments(&Fields::new()),
            Err(SessionError::EmptyFields("update"))
        ));
    }

    #[test]
    fn values_must_match_column_type() {
        let err = filter_condition(&fields(json!({ "cursor_hops": "12" }))).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidValue { column: Column::CursorHops, .. }
        ));

        let err = assignments(&fields(json!({ "password_pasted": 1 }))).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidValue { column: Column::PasswordPasted, .. }
        ));
    }

    #[test]
    fn cursor_hops_must_fit_in_i32() {
        let err = assignments(&fields(json!({ "cursor_hops": i64::MAX }))).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidValue { column: Column::CursorHops, .. }
        ));
    }

    #[test]
    fn only_score_accepts_null() {
        assert!(assignments(&fields(json!({ "score": null }))).is_ok());

        let err = assignments(&fields(json!({ "ip": null }))).unwrap_err();
        assert!(matches!(err, SessionError::InvalidValue { column: Column::Ip, .. }));
    }

    #[test]
    fn ip_longer_than_column_is_rejected() {
        let err = assignments(&fields(json!({ "ip": "2001:db8::ff00:42:8329" }))).unwrap_err();
        assert!(matches!(err, SessionError::InvalidValue { column: Column::Ip, .. }));
    }

    #[test]
    fn session_id_cannot_be_updated() {
        let err = assignments(&fields(json!({ "session_id": "other" }))).unwrap_err();
        assert!(matches!(err, SessionError::ImmutableColumn(Column::SessionId)));
    }

    #[test]
    fn integer_literals_bind_to_float_columns() {
        let set = assignments(&fields(json!({ "score": 42, "typing_speed": 1 }))).unwrap();
        assert_eq!(set.len(), 2);
    }
}
