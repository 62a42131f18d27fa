//! SQL schema for the roster SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS students (
    id                  TEXT PRIMARY KEY,
    full_name           TEXT NOT NULL,
    birth_date          TEXT NOT NULL,   -- YYYY-MM-DD
    email               TEXT NOT NULL,
    phone               TEXT NOT NULL,
    course              TEXT NOT NULL,
    registration_number TEXT NOT NULL,
    status              TEXT NOT NULL CHECK (status IN ('Ativo', 'Inativo')),
    created_at          TEXT NOT NULL,   -- RFC 3339 UTC, fixed precision
    updated_at          TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    id            TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at    TEXT NOT NULL
);

-- Exactly one row per user. `role` is free text; only 'admin' is privileged.
CREATE TABLE IF NOT EXISTS profiles (
    id   TEXT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
    role TEXT NOT NULL DEFAULT 'member'
);

-- Bearer tokens are never stored; only their SHA-256 digest.
CREATE TABLE IF NOT EXISTS sessions (
    token_digest TEXT PRIMARY KEY,
    user_id      TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at   TEXT NOT NULL,
    expires_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS students_created_idx ON students(created_at);
CREATE INDEX IF NOT EXISTS sessions_user_idx    ON sessions(user_id);

PRAGMA user_version = 1;
";
