//! Connection-string resolution against DATABASE_URL.
//!
//! Everything that touches the environment lives in one test so nothing
//! else in this binary races on the variable.

use svckit_db::{DatabaseClient, DatabaseUtils, DbError, DATABASE_URL_ENV};

const ENV_URL: &str = "postgres://env-user@db.internal:5432/auctions";
const EXPLICIT_URL: &str = "postgres://explicit@localhost:5432/auctions";

#[test]
fn connection_string_resolution() {
    // Absent everywhere: construction and resolution fail fast.
    std::env::remove_var(DATABASE_URL_ENV);

    let err = DatabaseClient::new(None).unwrap_err();
    assert!(err.is_config());
    assert_eq!(
        err.to_string(),
        "Configuration error: DATABASE_URL environment variable not set"
    );
    assert!(matches!(DatabaseClient::from_env(), Err(DbError::Config { .. })));
    assert!(DatabaseUtils::get_connection_string().unwrap_err().is_config());

    // An explicit string needs no environment.
    let client = DatabaseClient::new(Some(EXPLICIT_URL)).expect("explicit url");
    assert_eq!(client.connection_string(), EXPLICIT_URL);

    // An empty variable counts as unset.
    std::env::set_var(DATABASE_URL_ENV, "");
    assert!(DatabaseClient::new(None).unwrap_err().is_config());

    // Environment fallback.
    std::env::set_var(DATABASE_URL_ENV, ENV_URL);
    assert_eq!(DatabaseUtils::get_connection_string().unwrap(), ENV_URL);
    assert_eq!(DatabaseClient::from_env().unwrap().connection_string(), ENV_URL);

    // Explicit wins over the environment; empty explicit falls back to it.
    assert_eq!(
        DatabaseClient::new(Some(EXPLICIT_URL)).unwrap().connection_string(),
        EXPLICIT_URL
    );
    assert_eq!(DatabaseClient::new(Some("")).unwrap().connection_string(), ENV_URL);

    std::env::remove_var(DATABASE_URL_ENV);
}
