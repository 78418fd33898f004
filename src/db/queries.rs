use std::str::FromStr;

use chrono::Utc;
use rusqlite::{Connection, ErrorCode, params, params_from_iter, types::Value};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{NewUser, Role, UpdateAccountRequest, User};

use super::from_row::{USER_COLS, query_all, query_one};

fn now() -> i64 {
    Utc::now().timestamp()
}

fn gen_id() -> String {
    Uuid::new_v4().to_string()
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

// ============ Users ============

/// Create a user together with its role links in one transaction.
///
/// The uniqueness pre-check gives the common duplicate case a clean error
/// without consuming an insert; the UNIQUE constraint catches the
/// concurrent race, so the loser of two simultaneous registrations sees the
/// same "Email already exists" failure. A failure on the role links rolls
/// the user row back with the transaction.
pub fn create_user(conn: &mut Connection, input: &NewUser) -> Result<User> {
    let tx = conn.transaction()?;

    if get_user_by_email(&tx, &input.email)?.is_some() {
        return Err(AppError::BadRequest("Email already exists".into()));
    }

    let id = gen_id();
    let now = now();

    let inserted = tx.execute(
        "INSERT INTO users (id, email, name, password_hash, phone_number, address, is_active, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?8)",
        params![
            &id,
            &input.email,
            &input.name,
            &input.password_hash,
            &input.phone_number,
            &input.address,
            now,
            now
        ],
    );
    match inserted {
        Err(e) if is_unique_violation(&e) => {
            return Err(AppError::BadRequest("Email already exists".into()));
        }
        other => {
            other?;
        }
    }

    for role in &input.roles {
        tx.execute(
            "INSERT INTO user_roles (user_id, role) VALUES (?1, ?2)",
            params![&id, role.as_ref()],
        )?;
    }

    tx.commit()?;

    Ok(User {
        id,
        email: input.email.clone(),
        name: input.name.clone(),
        password_hash: input.password_hash.clone(),
        phone_number: input.phone_number.clone(),
        address: input.address.clone(),
        is_active: true,
        created_at: now,
        updated_at: now,
    })
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    query_one(
        conn,
        &format!("SELECT {} FROM users WHERE email = ?1", USER_COLS),
        &[&email],
    )
}

pub fn get_user_by_id(conn: &Connection, id: &str) -> Result<Option<User>> {
    query_one(
        conn,
        &format!("SELECT {} FROM users WHERE id = ?1", USER_COLS),
        &[&id],
    )
}

/// All users, newest first.
pub fn list_users(conn: &Connection) -> Result<Vec<User>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM users ORDER BY created_at DESC, id DESC",
            USER_COLS
        ),
        &[],
    )
}

// ============ Roles ============

pub fn get_user_roles(conn: &Connection, user_id: &str) -> Result<Vec<Role>> {
    let mut stmt = conn.prepare("SELECT role FROM user_roles WHERE user_id = ?1 ORDER BY role")?;
    let names = stmt.query_map(params![user_id], |row| row.get::<_, String>(0))?;

    let mut roles = Vec::new();
    for name in names {
        // Only canonical names are ever written; skip anything else.
        if let Ok(role) = Role::from_str(&name?) {
            roles.push(role);
        }
    }
    Ok(roles)
}

// ============ Account lifecycle ============

/// Apply a self-service profile update. Returns whether any column changed.
pub fn update_user_profile(
    conn: &Connection,
    user_id: &str,
    changes: &UpdateAccountRequest,
) -> Result<bool> {
    let mut sets: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(name) = &changes.name {
        sets.push("name = ?");
        values.push(name.clone().into());
    }
    if let Some(phone) = &changes.phone_number {
        sets.push("phone_number = ?");
        values.push(phone.clone().into());
    }
    if let Some(address) = &changes.address {
        sets.push("address = ?");
        values.push(address.clone().into());
    }

    if sets.is_empty() {
        return Ok(false);
    }

    sets.push("updated_at = ?");
    values.push(now().into());
    values.push(user_id.to_string().into());

    let sql = format!("UPDATE users SET {} WHERE id = ?", sets.join(", "));
    let affected = conn.execute(&sql, params_from_iter(values))?;
    Ok(affected > 0)
}

/// Ensure the account is inactive. The contract is "ensure inactive", not
/// "transition active to inactive", so repeat calls succeed identically and
/// a missing row is not an error.
pub fn set_user_inactive(conn: &Connection, user_id: &str) -> Result<()> {
    conn.execute(
        "UPDATE users SET is_active = 0, updated_at = ?1 WHERE id = ?2 AND is_active != 0",
        params![now(), user_id],
    )?;
    Ok(())
}
