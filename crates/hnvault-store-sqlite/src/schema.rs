//! SQL schema for the hnvault SQLite store.
//!
//! Executed once at connection startup. There are no migrations; the
//! `user_version` pragma marks the layout in case one is ever needed.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Rows are replaced whole on re-fetch (INSERT OR REPLACE).
CREATE TABLE IF NOT EXISTS stories (
    id            INTEGER PRIMARY KEY,
    \"by\"          TEXT,
    score         INTEGER NOT NULL,
    comment_count INTEGER NOT NULL,
    time          INTEGER NOT NULL,   -- unix seconds, as served
    title         TEXT NOT NULL,
    type          TEXT NOT NULL,
    url           TEXT,
    time_str      TEXT NOT NULL,      -- 'YYYY-MM-DD HH:MM:SS' UTC
    synced_at     INTEGER NOT NULL    -- unix seconds of the last write
);

CREATE TABLE IF NOT EXISTS comments (
    id        INTEGER PRIMARY KEY,
    \"by\"      TEXT,
    parent    INTEGER NOT NULL,
    text      TEXT,
    time      INTEGER NOT NULL,
    type      TEXT NOT NULL,
    time_str  TEXT NOT NULL,
    synced_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS stories_synced_idx  ON stories(synced_at);
CREATE INDEX IF NOT EXISTS comments_parent_idx ON comments(parent);

PRAGMA user_version = 1;
";
