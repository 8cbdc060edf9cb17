use anyhow::Result;
use serde::Serialize;

use crate::backend::{generate_id, optional_row};
use crate::FleetDb;

#[derive(Debug, Clone, Serialize)]
pub struct Customer {
    pub id: String,
    pub tenant_id: Option<String>,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

pub struct CreateCustomerParams {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

const CUSTOMER_COLUMNS: &str = "id, tenant_id, name, phone, email, \
     CAST(created_at AS VARCHAR), CAST(updated_at AS VARCHAR)";

fn row_to_customer(row: &duckdb::Row<'_>) -> duckdb::Result<Customer> {
    Ok(Customer {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        name: row.get(2)?,
        phone: row.get(3)?,
        email: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

impl FleetDb {
    pub async fn create_customer(&self, params: CreateCustomerParams) -> Result<Customer> {
        let conn = self.conn.lock().await;
        let id = generate_id("cust");

        conn.execute(
            "INSERT INTO customers (id, tenant_id, name, phone, email, created_at, updated_at) \
             VALUES (?1, NULL, ?2, ?3, ?4, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)",
            duckdb::params![id, params.name, params.phone, params.email],
        )?;

        let customer = conn
            .prepare(&format!(
                "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1"
            ))?
            .query_row(duckdb::params![id], |row| row_to_customer(row))?;
        Ok(customer)
    }

    pub async fn list_customers(&self, limit: i64, offset: i64) -> Result<(Vec<Customer>, i64)> {
        let conn = self.conn.lock().await;

        let total: i64 = conn
            .prepare("SELECT COUNT(*) FROM customers")?
            .query_row([], |row| row.get(0))?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers \
             ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2"
        ))?;
        let rows = stmt.query_map(duckdb::params![limit, offset], |row| row_to_customer(row))?;

        let mut customers = Vec::new();
        for row in rows {
            customers.push(row?);
        }
        Ok((customers, total))
    }

    pub async fn get_customer(&self, id: &str) -> Result<Option<Customer>> {
        let conn = self.conn.lock().await;
        let result = optional_row(
            conn.prepare(&format!(
                "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1"
            ))?
            .query_row(duckdb::params![id], |row| row_to_customer(row)),
        )?;
        Ok(result)
    }
}
