use anyhow::{anyhow, Result};
use serde::Serialize;

use crate::backend::{generate_id, optional_row};
use crate::FleetDb;

#[derive(Debug, Clone, Serialize)]
pub struct Car {
    pub id: String,
    pub tenant_id: Option<String>,
    pub shop_id: Option<String>,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub sale_price: f64,
    pub status: String,
    pub image_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

pub struct CreateCarParams {
    pub shop_id: Option<String>,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub sale_price: f64,
}

#[derive(Default)]
pub struct UpdateCarParams {
    pub shop_id: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub sale_price: Option<f64>,
    pub status: Option<String>,
}

const CAR_COLUMNS: &str = "id, tenant_id, shop_id, make, model, year, sale_price, status, \
     image_url, CAST(created_at AS VARCHAR), CAST(updated_at AS VARCHAR)";

fn row_to_car(row: &duckdb::Row<'_>) -> duckdb::Result<Car> {
    Ok(Car {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        shop_id: row.get(2)?,
        make: row.get(3)?,
        model: row.get(4)?,
        year: row.get(5)?,
        sale_price: row.get(6)?,
        status: row.get(7)?,
        image_url: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

impl FleetDb {
    pub async fn create_car(&self, params: CreateCarParams) -> Result<Car> {
        let conn = self.conn.lock().await;
        let id = generate_id("car");

        conn.execute(
            "INSERT INTO cars (id, tenant_id, shop_id, make, model, year, sale_price, status, created_at, updated_at) \
             VALUES (?1, NULL, ?2, ?3, ?4, ?5, ?6, 'available', CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)",
            duckdb::params![id, params.shop_id, params.make, params.model, params.year, params.sale_price],
        )?;

        let car = conn
            .prepare(&format!("SELECT {CAR_COLUMNS} FROM cars WHERE id = ?1"))?
            .query_row(duckdb::params![id], |row| row_to_car(row))?;
        Ok(car)
    }

    /// List cars, newest first, optionally filtered by status.
    pub async fn list_cars(
        &self,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Car>, i64)> {
        let conn = self.conn.lock().await;

        let (total, sql, params): (i64, String, Vec<Box<dyn duckdb::types::ToSql>>) =
            if let Some(status) = status {
                let total = conn
                    .prepare("SELECT COUNT(*) FROM cars WHERE status = ?1")?
                    .query_row(duckdb::params![status], |row| row.get(0))?;
                (
                    total,
                    format!(
                        "SELECT {CAR_COLUMNS} FROM cars WHERE status = ?1 \
                         ORDER BY created_at DESC, id DESC LIMIT ?2 OFFSET ?3"
                    ),
                    vec![
                        Box::new(status.to_string()) as Box<dyn duckdb::types::ToSql>,
                        Box::new(limit),
                        Box::new(offset),
                    ],
                )
            } else {
                let total = conn
                    .prepare("SELECT COUNT(*) FROM cars")?
                    .query_row([], |row| row.get(0))?;
                (
                    total,
                    format!(
                        "SELECT {CAR_COLUMNS} FROM cars \
                         ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2"
                    ),
                    vec![
                        Box::new(limit) as Box<dyn duckdb::types::ToSql>,
                        Box::new(offset),
                    ],
                )
            };

        let param_refs: Vec<&dyn duckdb::types::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(param_refs.as_slice(), |row| row_to_car(row))?;

        let mut cars = Vec::new();
        for row in rows {
            cars.push(row?);
        }
        Ok((cars, total))
    }

    pub async fn get_car(&self, id: &str) -> Result<Option<Car>> {
        let conn = self.conn.lock().await;
        let result = optional_row(
            conn.prepare(&format!("SELECT {CAR_COLUMNS} FROM cars WHERE id = ?1"))?
                .query_row(duckdb::params![id], |row| row_to_car(row)),
        )?;
        Ok(result)
    }

    pub async fn update_car(&self, id: &str, params: UpdateCarParams) -> Result<Option<Car>> {
        let conn = self.conn.lock().await;

        let exists: i64 = conn
            .prepare("SELECT COUNT(*) FROM cars WHERE id = ?1")?
            .query_row(duckdb::params![id], |row| row.get(0))?;
        if exists == 0 {
            return Ok(None);
        }

        if let Some(ref status) = params.status {
            if status != "available" && status != "sold" {
                return Err(anyhow!("status must be 'available' or 'sold'"));
            }
        }

        if let Some(ref shop_id) = params.shop_id {
            conn.execute(
                "UPDATE cars SET shop_id = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
                duckdb::params![shop_id, id],
            )?;
        }
        if let Some(ref make) = params.make {
            conn.execute(
                "UPDATE cars SET make = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
                duckdb::params![make, id],
            )?;
        }
        if let Some(ref model) = params.model {
            conn.execute(
                "UPDATE cars SET model = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
                duckdb::params![model, id],
            )?;
        }
        if let Some(year) = params.year {
            conn.execute(
                "UPDATE cars SET year = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
                duckdb::params![year, id],
            )?;
        }
        if let Some(sale_price) = params.sale_price {
            conn.execute(
                "UPDATE cars SET sale_price = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
                duckdb::params![sale_price, id],
            )?;
        }
        if let Some(ref status) = params.status {
            conn.execute(
                "UPDATE cars SET status = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
                duckdb::params![status, id],
            )?;
        }

        let car = conn
            .prepare(&format!("SELECT {CAR_COLUMNS} FROM cars WHERE id = ?1"))?
            .query_row(duckdb::params![id], |row| row_to_car(row))?;
        Ok(Some(car))
    }

    /// Store the public object-storage URL of the car's photo.
    pub async fn set_car_image(&self, id: &str, image_url: &str) -> Result<bool> {
        let conn = self.conn.lock().await;
        let rows = conn.execute(
            "UPDATE cars SET image_url = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
            duckdb::params![image_url, id],
        )?;
        Ok(rows > 0)
    }

    pub async fn delete_car(&self, id: &str) -> Result<bool> {
        let conn = self.conn.lock().await;
        let rows = conn.execute("DELETE FROM cars WHERE id = ?1", duckdb::params![id])?;
        Ok(rows > 0)
    }
}
