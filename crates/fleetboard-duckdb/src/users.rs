use anyhow::Result;
use serde::Serialize;

use crate::backend::{generate_id, optional_row};
use crate::FleetDb;

/// A dashboard operator account. `password_hash` is an Argon2id PHC string
/// and never leaves the server.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: String,
    pub tenant_id: Option<String>,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: String,
    pub role: String,
    pub created_at: String,
}

pub struct CreateUserParams {
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
}

const USER_COLUMNS: &str =
    "id, tenant_id, email, password_hash, display_name, role, CAST(created_at AS VARCHAR)";

fn row_to_user(row: &duckdb::Row<'_>) -> duckdb::Result<User> {
    Ok(User {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        display_name: row.get(4)?,
        role: row.get(5)?,
        created_at: row.get(6)?,
    })
}

impl FleetDb {
    pub async fn create_user(&self, params: CreateUserParams) -> Result<User> {
        let conn = self.conn.lock().await;
        let id = generate_id("usr");

        conn.execute(
            "INSERT INTO users (id, tenant_id, email, password_hash, display_name, role, created_at, updated_at) \
             VALUES (?1, NULL, ?2, ?3, ?4, 'operator', CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)",
            duckdb::params![id, params.email, params.password_hash, params.display_name],
        )?;

        let user = conn
            .prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))?
            .query_row(duckdb::params![id], |row| row_to_user(row))?;
        Ok(user)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn.lock().await;
        let result = optional_row(
            conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"))?
                .query_row(duckdb::params![email], |row| row_to_user(row)),
        )?;
        Ok(result)
    }

    pub async fn get_user(&self, id: &str) -> Result<Option<User>> {
        let conn = self.conn.lock().await;
        let result = optional_row(
            conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))?
                .query_row(duckdb::params![id], |row| row_to_user(row)),
        )?;
        Ok(result)
    }

    pub async fn email_taken(&self, email: &str) -> Result<bool> {
        let conn = self.conn.lock().await;
        let count: i64 = conn
            .prepare("SELECT COUNT(*) FROM users WHERE email = ?1")?
            .query_row(duckdb::params![email], |row| row.get(0))?;
        Ok(count > 0)
    }
}
