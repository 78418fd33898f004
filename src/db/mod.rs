//! Connection pool, shared application state, and schema management.

pub mod from_row;
pub mod queries;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

use crate::email::EmailService;
use crate::error::Result;
use crate::jwt::TokenService;

pub type DbPool = Pool<SqliteConnectionManager>;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub tokens: TokenService,
    pub email: EmailService,
    pub bcrypt_cost: u32,
}

/// Create the schema if it does not exist.
///
/// The UNIQUE index on `users.email` is the storage-level uniqueness
/// guarantee: a concurrent duplicate registration resolves to exactly one
/// winner even if both requests pass the application-level pre-check.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS users (
            id            TEXT PRIMARY KEY,
            email         TEXT NOT NULL UNIQUE,
            name          TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            phone_number  TEXT NOT NULL,
            address       TEXT,
            is_active     INTEGER NOT NULL DEFAULT 1,
            created_at    INTEGER NOT NULL,
            updated_at    INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS user_roles (
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            role    TEXT NOT NULL,
            PRIMARY KEY (user_id, role)
        );

        CREATE INDEX IF NOT EXISTS idx_user_roles_user ON user_roles(user_id);
        "#,
    )?;
    Ok(())
}
