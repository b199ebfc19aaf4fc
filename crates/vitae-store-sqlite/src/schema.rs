//! SQL schema for the vitae SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// `foreign_keys = ON` is what makes `ON DELETE CASCADE` effective: deleting
/// a `cv` row removes every child row referencing it. The `ordinal` column
/// on each child table records insertion order within its résumé, so
/// collection order round-trips exactly.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS cv (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    full_name     TEXT NOT NULL,
    email         TEXT NOT NULL,
    phone_number  TEXT NOT NULL,
    address       TEXT NOT NULL,
    profile_photo TEXT,
    created_at    TEXT NOT NULL,   -- RFC 3339 UTC; store-assigned
    updated_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS education (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    cv_id           INTEGER NOT NULL REFERENCES cv(id) ON DELETE CASCADE,
    ordinal         INTEGER NOT NULL,
    institution     TEXT NOT NULL,
    degree          TEXT NOT NULL,
    field_of_study  TEXT NOT NULL,
    graduation_year TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS experience (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    cv_id       INTEGER NOT NULL REFERENCES cv(id) ON DELETE CASCADE,
    ordinal     INTEGER NOT NULL,
    company     TEXT NOT NULL,
    position    TEXT NOT NULL,
    start_date  TEXT NOT NULL,
    end_date    TEXT NOT NULL,
    description TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS project (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    cv_id        INTEGER NOT NULL REFERENCES cv(id) ON DELETE CASCADE,
    ordinal      INTEGER NOT NULL,
    title        TEXT NOT NULL,
    description  TEXT NOT NULL,
    technologies TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS skill (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    cv_id      INTEGER NOT NULL REFERENCES cv(id) ON DELETE CASCADE,
    ordinal    INTEGER NOT NULL,
    skill_name TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS education_cv_idx  ON education(cv_id);
CREATE INDEX IF NOT EXISTS experience_cv_idx ON experience(cv_id);
CREATE INDEX IF NOT EXISTS project_cv_idx    ON project(cv_id);
CREATE INDEX IF NOT EXISTS skill_cv_idx      ON skill(cv_id);
CREATE INDEX IF NOT EXISTS cv_created_idx    ON cv(created_at);

PRAGMA user_version = 1;
";
