use anyhow::Result;
use serde::Serialize;

use crate::backend::{generate_id, optional_row};
use crate::FleetDb;

#[derive(Debug, Clone, Serialize)]
pub struct Shop {
    pub id: String,
    pub tenant_id: Option<String>,
    pub name: String,
    pub city: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub image_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

pub struct CreateShopParams {
    pub name: String,
    pub city: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

#[derive(Default)]
pub struct UpdateShopParams {
    pub name: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

const SHOP_COLUMNS: &str = "id, tenant_id, name, city, address, phone, image_url, \
     CAST(created_at AS VARCHAR), CAST(updated_at AS VARCHAR)";

fn row_to_shop(row: &duckdb::Row<'_>) -> duckdb::Result<Shop> {
    Ok(Shop {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        name: row.get(2)?,
        city: row.get(3)?,
        address: row.get(4)?,
        phone: row.get(5)?,
        image_url: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

impl FleetDb {
    pub async fn create_shop(&self, params: CreateShopParams) -> Result<Shop> {
        let conn = self.conn.lock().await;
        let id = generate_id("shop");

        conn.execute(
            "INSERT INTO shops (id, tenant_id, name, city, address, phone, created_at, updated_at) \
             VALUES (?1, NULL, ?2, ?3, ?4, ?5, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)",
            duckdb::params![id, params.name, params.city, params.address, params.phone],
        )?;

        let shop = conn
            .prepare(&format!("SELECT {SHOP_COLUMNS} FROM shops WHERE id = ?1"))?
            .query_row(duckdb::params![id], |row| row_to_shop(row))?;
        Ok(shop)
    }

    pub async fn list_shops(&self, limit: i64, offset: i64) -> Result<(Vec<Shop>, i64)> {
        let conn = self.conn.lock().await;

        let total: i64 = conn
            .prepare("SELECT COUNT(*) FROM shops")?
            .query_row([], |row| row.get(0))?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {SHOP_COLUMNS} FROM shops ORDER BY name, id LIMIT ?1 OFFSET ?2"
        ))?;
        let rows = stmt.query_map(duckdb::params![limit, offset], |row| row_to_shop(row))?;

        let mut shops = Vec::new();
        for row in rows {
            shops.push(row?);
        }
        Ok((shops, total))
    }

    pub async fn get_shop(&self, id: &str) -> Result<Option<Shop>> {
        let conn = self.conn.lock().await;
        let result = optional_row(
            conn.prepare(&format!("SELECT {SHOP_COLUMNS} FROM shops WHERE id = ?1"))?
                .query_row(duckdb::params![id], |row| row_to_shop(row)),
        )?;
        Ok(result)
    }

    pub async fn update_shop(&self, id: &str, params: UpdateShopParams) -> Result<Option<Shop>> {
        let conn = self.conn.lock().await;

        let exists: i64 = conn
            .prepare("SELECT COUNT(*) FROM shops WHERE id = ?1")?
            .query_row(duckdb::params![id], |row| row.get(0))?;
        if exists == 0 {
            return Ok(None);
        }

        if let Some(ref name) = params.name {
            conn.execute(
                "UPDATE shops SET name = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
                duckdb::params![name, id],
            )?;
        }
        if let Some(ref city) = params.city {
            conn.execute(
                "UPDATE shops SET city = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
                duckdb::params![city, id],
            )?;
        }
        if let Some(ref address) = params.address {
            conn.execute(
                "UPDATE shops SET address = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
                duckdb::params![address, id],
            )?;
        }
        if let Some(ref phone) = params.phone {
            conn.execute(
                "UPDATE shops SET phone = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
                duckdb::params![phone, id],
            )?;
        }

        let shop = conn
            .prepare(&format!("SELECT {SHOP_COLUMNS} FROM shops WHERE id = ?1"))?
            .query_row(duckdb::params![id], |row| row_to_shop(row))?;
        Ok(Some(shop))
    }

    pub async fn set_shop_image(&self, id: &str, image_url: &str) -> Result<bool> {
        let conn = self.conn.lock().await;
        let rows = conn.execute(
            "UPDATE shops SET image_url = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
            duckdb::params![image_url, id],
        )?;
        Ok(rows > 0)
    }

    /// Delete a shop. Cars remain but are detached from the branch
    /// (DuckDB has no FK cascade; the detach runs in the same transaction).
    pub async fn delete_shop(&self, id: &str) -> Result<bool> {
        let mut conn = self.conn.lock().await;

        let exists: i64 = conn
            .prepare("SELECT COUNT(*) FROM shops WHERE id = ?1")?
            .query_row(duckdb::params![id], |row| row.get(0))?;
        if exists == 0 {
            return Ok(false);
        }

        let tx = conn.transaction()?;
        tx.execute(
            "UPDATE cars SET shop_id = NULL, updated_at = CURRENT_TIMESTAMP WHERE shop_id = ?1",
            duckdb::params![id],
        )?;
        tx.execute("DELETE FROM shops WHERE id = ?1", duckdb::params![id])?;
        tx.commit()?;

        Ok(true)
    }
}
