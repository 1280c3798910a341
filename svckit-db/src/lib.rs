//! svckit-db: PostgreSQL access helper
//!
//! # Design Principles
//!
//! - One lazily created engine (`PgPool`) per client, built at most once
//! - Every statement runs in its own transaction and is committed
//! - Write paths return errors; the health probe returns `false`
//! - No retries, no migrations, no query building

pub mod client;
pub mod error;
pub mod params;
pub mod utils;

pub use client::{ClientOptions, DatabaseClient, HEALTH_CHECK_QUERY};
pub use error::{DbError, DbResult};
pub use params::{BoundStatement, Params, SqlValue};
pub use utils::{DatabaseUtils, DATABASE_URL_ENV};

pub use sqlx::postgres::PgRow;
pub use sqlx::Row;
