//! SQL schema for the Folio SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// `AUTOINCREMENT` keeps ids from ever being reused, so a higher
/// `content_version.id` always means a later insert.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS \"user\" (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    openid_url  TEXT NOT NULL UNIQUE,
    name        TEXT,
    email       TEXT
);

-- `name` is the import natural key. Duplicates are detected, not prevented.
CREATE TABLE IF NOT EXISTS person (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT NOT NULL
);

-- Versions are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS content_version (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    person_id  INTEGER NOT NULL REFERENCES person(id),
    user_id    INTEGER REFERENCES \"user\"(id),
    content    BLOB NOT NULL,   -- compact JSON document
    time       TEXT NOT NULL    -- RFC 3339 UTC, fixed microsecond width
);

CREATE INDEX IF NOT EXISTS person_name_idx
    ON person(name);
CREATE INDEX IF NOT EXISTS content_version_latest_idx
    ON content_version(person_id, time, id);

PRAGMA user_version = 1;
";
