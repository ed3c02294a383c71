use quotebook_core::db::migrations::latest_version;
use quotebook_core::db::{open_db, open_db_in_memory, DbError};
use quotebook_core::{PreferenceRepository, SqlitePreferenceRepository, SELECTED_CATEGORY_KEY};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "preferences");
}

#[test]
fn open_db_creates_parent_directories_and_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("prefs.sqlite3");

    let first = open_db(&path).unwrap();
    assert_eq!(schema_version(&first), latest_version());
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(schema_version(&second), latest_version());
    assert_table_exists(&second, "preferences");
}

#[test]
fn preferences_table_defaults_updated_at() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO preferences (key, value) VALUES (?1, ?2);",
        [SELECTED_CATEGORY_KEY, "Education"],
    )
    .unwrap();

    let updated_at: i64 = conn
        .query_row(
            "SELECT updated_at FROM preferences WHERE key = ?1;",
            [SELECTED_CATEGORY_KEY],
            |row| row.get(0),
        )
        .unwrap();
    assert!(updated_at > 0);
}

#[test]
fn selected_category_upsert_keeps_one_row_per_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.sqlite3");

    let mut repo = SqlitePreferenceRepository::new(open_db(&path).unwrap());
    repo.set(SELECTED_CATEGORY_KEY, "Motivation").unwrap();
    repo.set(SELECTED_CATEGORY_KEY, "all").unwrap();
    drop(repo);

    let conn = open_db(&path).unwrap();
    let (rows, value, updated_at): (i64, String, i64) = conn
        .query_row(
            "SELECT COUNT(*), MAX(value), MAX(updated_at) FROM preferences WHERE key = ?1;",
            [SELECTED_CATEGORY_KEY],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!(rows, 1);
    assert_eq!(value, "all");
    assert!(updated_at > 0);
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
