//! Named query parameters
//!
//! Statements use `:name` placeholders. Before execution they are rewritten
//! to Postgres positional placeholders (`$1`, `$2`, ...) in order of first
//! appearance; a name used twice binds once. Quoted literals, quoted
//! identifiers, `--` and `/* */` comments, `::type` casts and a `:` right
//! after a word character (`arr[lo:hi]`) are left alone. NULL values are
//! inlined as `NULL` so the server infers the column type.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::Postgres;
use svckit_telemetry::Fields;
use uuid::Uuid;

use crate::{DbError, DbResult};

/// A dynamically-typed bind value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    Json(Value),
}

impl SqlValue {
    /// Map a JSON value: integral numbers become `Int`, other numbers
    /// `Float`, arrays and objects stay `Json`.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => n.as_f64().map_or(Self::Json(Value::Number(n)), Self::Float),
            },
            Value::String(s) => Self::Text(s),
            other => Self::Json(other),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Uuid> for SqlValue {
    fn from(v: Uuid) -> Self {
        Self::Uuid(v)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Timestamp(v)
    }
}

impl From<Value> for SqlValue {
    fn from(v: Value) -> Self {
        Self::from_json(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Named parameters for one statement
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, SqlValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<SqlValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.0.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Build parameters from a JSON object; any other value yields none.
    pub fn from_json_object(value: Value) -> Self {
        match value {
            Value::Object(map) => map.into_iter().collect(),
            _ => Self::default(),
        }
    }

    /// Structured log fields for these parameters.
    pub fn to_fields(&self) -> Fields {
        self.0
            .iter()
            .map(|(name, value)| {
                let rendered = serde_json::to_value(value).unwrap_or(Value::Null);
                (name.clone(), rendered)
            })
            .collect()
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<SqlValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

/// A statement rewritten to positional placeholders with its bind values
#[derive(Debug, Clone, PartialEq)]
pub struct BoundStatement {
    sql: String,
    values: Vec<SqlValue>,
}

#[derive(Clone, Copy, PartialEq)]
enum Scan {
    Code,
    SingleQuoted,
    DoubleQuoted,
    LineComment,
    BlockComment,
}

impl BoundStatement {
    /// Rewrite `:name` placeholders in `query` using `params`.
    ///
    /// Fails with [`DbError::MissingParameter`] when a placeholder has no
    /// value. Parameters that are never referenced are ignored.
    pub fn bind(query: &str, params: &Params) -> DbResult<Self> {
        let bytes = query.as_bytes();
        let mut sql = String::with_capacity(query.len());
        let mut values = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut copied = 0;
        let mut scan = Scan::Code;
        let mut i = 0;

        while i < bytes.len() {
            let byte = bytes[i];
            match scan {
                Scan::SingleQuoted if byte == b'\'' => scan = Scan::Code,
                Scan::DoubleQuoted if byte == b'"' => scan = Scan::Code,
                Scan::LineComment if byte == b'\n' => scan = Scan::Code,
                Scan::BlockComment if byte == b'*' && bytes.get(i + 1) == Some(&b'/') => {
                    scan = Scan::Code;
                    i += 2;
                    continue;
                }
                Scan::Code => match byte {
                    b'\'' => scan = Scan::SingleQuoted,
                    b'"' => scan = Scan::DoubleQuoted,
                    b'-' if bytes.get(i + 1) == Some(&b'-') => scan = Scan::LineComment,
                    b'/' if bytes.get(i + 1) == Some(&b'*') => {
                        scan = Scan::BlockComment;
                        i += 2;
                        continue;
                    }
                    b':' if bytes.get(i + 1) == Some(&b':') => {
                        i += 2;
                        continue;
                    }
                    b':' if i > 0 && (is_ident_continue(bytes[i - 1]) || bytes[i - 1] == b'\\') => {}
                    b':' if bytes.get(i + 1).is_some_and(|b| is_ident_start(*b)) => {
                        let start = i + 1;
                        let mut end = start + 1;
                        while end < bytes.len() && is_ident_continue(bytes[end]) {
                            end += 1;
                        }
                        let name = &query[start..end];
                        let value = params
                            .get(name)
                            .ok_or_else(|| DbError::missing_parameter(name))?;

                        sql.push_str(&query[copied..i]);
                        if value.is_null() {
                            sql.push_str("NULL");
                        } else {
                            let position = *positions.entry(name).or_insert_with(|| {
                                values.push(value.clone());
                                values.len()
                            });
                            sql.push('$');
                            sql.push_str(&position.to_string());
                        }

                        copied = end;
                        i = end;
                        continue;
                    }
                    _ => {}
                },
                _ => {}
            }
            i += 1;
        }
        sql.push_str(&query[copied..]);

        Ok(Self { sql, values })
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    /// Build an sqlx query with every value bound in position order.
    pub fn query(&self) -> Query<'_, Postgres, PgArguments> {
        self.values
            .iter()
            .fold(sqlx::query(&self.sql), |query, value| bind_value(query, value))
    }
}

fn bind_value<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: &SqlValue,
) -> Query<'q, Postgres, PgArguments> {
    match value {
        SqlValue::Null => query.bind(None::<String>),
        SqlValue::Bool(v) => query.bind(*v),
        SqlValue::Int(v) => query.bind(*v),
        SqlValue::Float(v) => query.bind(*v),
        SqlValue::Text(v) => query.bind(v.clone()),
        SqlValue::Uuid(v) => query.bind(*v),
        SqlValue::Timestamp(v) => query.bind(*v),
        SqlValue::Json(v) => query.bind(v.clone()),
    }
}

fn is_ident_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_'
}

fn is_ident_continue(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}
