//! Migration tests
//!
//! Tests database schema migrations on fresh and existing files.

use coinspace_storage::migrations;
use rusqlite::Connection;
use tempfile::NamedTempFile;

#[test]
fn test_fresh_migration() {
    let file = NamedTempFile::new().unwrap();
    let conn = Connection::open(file.path()).unwrap();

    migrations::run_migrations(&conn).unwrap();

    verify_schema(&conn);
}

#[test]
fn test_migration_idempotency() {
    let file = NamedTempFile::new().unwrap();
    let conn = Connection::open(file.path()).unwrap();

    // Run migrations twice
    migrations::run_migrations(&conn).unwrap();
    migrations::run_migrations(&conn).unwrap();

    verify_schema(&conn);
    assert_eq!(
        migrations::get_schema_version(&conn).unwrap(),
        migrations::SCHEMA_VERSION
    );
}

#[test]
fn test_upgrade_from_v1_keeps_credentials() {
    let file = NamedTempFile::new().unwrap();
    let conn = Connection::open(file.path()).unwrap();

    // Database written by a build that only knew the credentials table
    conn.execute_batch(
        r#"
        CREATE TABLE schema_version (version INTEGER PRIMARY KEY);
        INSERT INTO schema_version (version) VALUES (1);
        CREATE TABLE credentials (
            slot INTEGER PRIMARY KEY CHECK (slot = 0),
            identity TEXT NOT NULL,
            seed TEXT NOT NULL,
            updated_at INTEGER NOT NULL
        );
        INSERT INTO credentials (slot, identity, seed, updated_at) VALUES (0, 'abc', 'ct', 1);
        "#,
    )
    .unwrap();

    migrations::run_migrations(&conn).unwrap();

    verify_schema(&conn);
    let identity: String = conn
        .query_row("SELECT identity FROM credentials", [], |row| row.get(0))
        .unwrap();
    assert_eq!(identity, "abc");
}

#[test]
fn test_single_credentials_slot() {
    let file = NamedTempFile::new().unwrap();
    let conn = Connection::open(file.path()).unwrap();
    migrations::run_migrations(&conn).unwrap();

    let result = conn.execute(
        "INSERT INTO credentials (slot, identity, seed, updated_at) VALUES (1, 'a', 'b', 0)",
        [],
    );

    // Should fail due to the slot check constraint
    assert!(result.is_err());
}

fn verify_schema(conn: &Connection) {
    let tables: Vec<String> = conn
        .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    assert!(tables.contains(&"credentials".to_string()));
    assert!(tables.contains(&"local_store".to_string()));
    assert!(tables.contains(&"schema_version".to_string()));
}
