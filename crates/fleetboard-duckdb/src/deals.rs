use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::backend::{generate_id, optional_row};
use crate::FleetDb;

/// Deal lifecycle. The only legal transitions are
/// `pending → completed` and `pending → cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealStatus {
    Pending,
    Completed,
    Cancelled,
}

impl DealStatus {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(anyhow!(
                "status must be one of: pending, completed, cancelled"
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Deal {
    pub id: String,
    pub tenant_id: Option<String>,
    pub kind: String,
    pub car_id: Option<String>,
    pub customer_id: String,
    pub provider_id: Option<String>,
    pub amount: f64,
    pub status: String,
    pub destination: Option<String>,
    pub trip_date: Option<String>,
    pub seats: Option<i32>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

pub struct CreateDealParams {
    /// "sale" or "trip".
    pub kind: String,
    pub car_id: Option<String>,
    pub customer_id: String,
    pub provider_id: Option<String>,
    pub amount: f64,
    pub destination: Option<String>,
    pub trip_date: Option<String>,
    pub seats: Option<i32>,
    pub notes: Option<String>,
}

/// Outcome of a status transition attempt. Storage failures stay in the
/// `Err` channel; these are the three business outcomes.
#[derive(Debug)]
pub enum DealStatusChange {
    Updated(Deal),
    NotFound,
    /// The deal has already left `pending`.
    NotPending { current: String },
}

#[derive(Default)]
pub struct UpdateDealParams {
    pub amount: Option<f64>,
    pub destination: Option<String>,
    pub trip_date: Option<String>,
    pub seats: Option<i32>,
    pub notes: Option<String>,
}

const DEAL_COLUMNS: &str = "id, tenant_id, kind, car_id, customer_id, provider_id, amount, \
     status, destination, CAST(trip_date AS VARCHAR), seats, notes, \
     CAST(created_at AS VARCHAR), CAST(updated_at AS VARCHAR)";

fn row_to_deal(row: &duckdb::Row<'_>) -> duckdb::Result<Deal> {
    Ok(Deal {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        kind: row.get(2)?,
        car_id: row.get(3)?,
        customer_id: row.get(4)?,
        provider_id: row.get(5)?,
        amount: row.get(6)?,
        status: row.get(7)?,
        destination: row.get(8)?,
        trip_date: row.get(9)?,
        seats: row.get(10)?,
        notes: row.get(11)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}

impl FleetDb {
    pub async fn create_deal(&self, params: CreateDealParams) -> Result<Deal> {
        if params.kind != "sale" && params.kind != "trip" {
            return Err(anyhow!("kind must be 'sale' or 'trip'"));
        }

        let conn = self.conn.lock().await;
        let id = generate_id("deal");

        conn.execute(
            "INSERT INTO deals (id, tenant_id, kind, car_id, customer_id, provider_id, amount, \
             status, destination, trip_date, seats, notes, created_at, updated_at) \
             VALUES (?1, NULL, ?2, ?3, ?4, ?5, ?6, 'pending', ?7, ?8, ?9, ?10, \
             CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)",
            duckdb::params![
                id,
                params.kind,
                params.car_id,
                params.customer_id,
                params.provider_id,
                params.amount,
                params.destination,
                params.trip_date,
                params.seats,
                params.notes
            ],
        )?;

        let deal = conn
            .prepare(&format!("SELECT {DEAL_COLUMNS} FROM deals WHERE id = ?1"))?
            .query_row(duckdb::params![id], |row| row_to_deal(row))?;
        Ok(deal)
    }

    pub async fn list_deals(
        &self,
        status: Option<DealStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Deal>, i64)> {
        let conn = self.conn.lock().await;

        let (total, sql, params): (i64, String, Vec<Box<dyn duckdb::types::ToSql>>) =
            if let Some(status) = status {
                let total = conn
                    .prepare("SELECT COUNT(*) FROM deals WHERE status = ?1")?
                    .query_row(duckdb::params![status.as_str()], |row| row.get(0))?;
                (
                    total,
                    format!(
                        "SELECT {DEAL_COLUMNS} FROM deals WHERE status = ?1 \
                         ORDER BY created_at DESC, id DESC LIMIT ?2 OFFSET ?3"
                    ),
                    vec![
                        Box::new(status.as_str().to_string()) as Box<dyn duckdb::types::ToSql>,
                        Box::new(limit),
                        Box::new(offset),
                    ],
                )
            } else {
                let total = conn
                    .prepare("SELECT COUNT(*) FROM deals")?
                    .query_row([], |row| row.get(0))?;
                (
                    total,
                    format!(
                        "SELECT {DEAL_COLUMNS} FROM deals \
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
        let rows = stmt.query_map(param_refs.as_slice(), |row| row_to_deal(row))?;

        let mut deals = Vec::new();
        for row in rows {
            deals.push(row?);
        }
        Ok((deals, total))
    }

    pub async fn get_deal(&self, id: &str) -> Result<Option<Deal>> {
        let conn = self.conn.lock().await;
        let result = optional_row(
            conn.prepare(&format!("SELECT {DEAL_COLUMNS} FROM deals WHERE id = ?1"))?
                .query_row(duckdb::params![id], |row| row_to_deal(row)),
        )?;
        Ok(result)
    }

    pub async fn update_deal(&self, id: &str, params: UpdateDealParams) -> Result<Option<Deal>> {
        let conn = self.conn.lock().await;

        let exists: i64 = conn
            .prepare("SELECT COUNT(*) FROM deals WHERE id = ?1")?
            .query_row(duckdb::params![id], |row| row.get(0))?;
        if exists == 0 {
            return Ok(None);
        }

        if let Some(amount) = params.amount {
            conn.execute(
                "UPDATE deals SET amount = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
                duckdb::params![amount, id],
            )?;
        }
        if let Some(ref destination) = params.destination {
            conn.execute(
                "UPDATE deals SET destination = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
                duckdb::params![destination, id],
            )?;
        }
        if let Some(ref trip_date) = params.trip_date {
            conn.execute(
                "UPDATE deals SET trip_date = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
                duckdb::params![trip_date, id],
            )?;
        }
        if let Some(seats) = params.seats {
            conn.execute(
                "UPDATE deals SET seats = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
                duckdb::params![seats, id],
            )?;
        }
        if let Some(ref notes) = params.notes {
            conn.execute(
                "UPDATE deals SET notes = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
                duckdb::params![notes, id],
            )?;
        }

        let deal = conn
            .prepare(&format!("SELECT {DEAL_COLUMNS} FROM deals WHERE id = ?1"))?
            .query_row(duckdb::params![id], |row| row_to_deal(row))?;
        Ok(Some(deal))
    }

    /// Move a deal out of `pending`. Completing a sale deal also marks the
    /// car sold, in the same transaction.
    pub async fn set_deal_status(&self, id: &str, next: DealStatus) -> Result<DealStatusChange> {
        if next == DealStatus::Pending {
            return Err(anyhow!("cannot transition back to pending"));
        }

        let mut conn = self.conn.lock().await;

        let current: Option<(String, Option<String>, String)> = optional_row(
            conn.prepare("SELECT status, car_id, kind FROM deals WHERE id = ?1")?
                .query_row(duckdb::params![id], |row| {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
                }),
        )?;

        let Some((current_status, car_id, kind)) = current else {
            return Ok(DealStatusChange::NotFound);
        };

        if current_status != "pending" {
            return Ok(DealStatusChange::NotPending {
                current: current_status,
            });
        }

        let tx = conn.transaction()?;
        tx.execute(
            "UPDATE deals SET status = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
            duckdb::params![next.as_str(), id],
        )?;
        if next == DealStatus::Completed && kind == "sale" {
            if let Some(ref car_id) = car_id {
                tx.execute(
                    "UPDATE cars SET status = 'sold', updated_at = CURRENT_TIMESTAMP WHERE id = ?1",
                    duckdb::params![car_id],
                )?;
            }
        }
        tx.commit()?;

        let deal = conn
            .prepare(&format!("SELECT {DEAL_COLUMNS} FROM deals WHERE id = ?1"))?
            .query_row(duckdb::params![id], |row| row_to_deal(row))?;
        Ok(DealStatusChange::Updated(deal))
    }

    pub async fn delete_deal(&self, id: &str) -> Result<bool> {
        let conn = self.conn.lock().await;
        let rows = conn.execute("DELETE FROM deals WHERE id = ?1", duckdb::params![id])?;
        Ok(rows > 0)
    }
}
