use anyhow::Result;
use serde::Serialize;

use crate::backend::generate_id;
use crate::FleetDb;

#[derive(Debug, Clone, Serialize)]
pub struct Payout {
    pub id: String,
    pub tenant_id: Option<String>,
    pub provider_id: String,
    pub amount: f64,
    pub method: String,
    pub reference: Option<String>,
    pub created_at: String,
}

pub struct CreatePayoutParams {
    pub provider_id: String,
    pub amount: f64,
    pub method: Option<String>,
    pub reference: Option<String>,
}

/// A provider's running money position: what their completed deals earned,
/// what has been paid out so far, and the open balance.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderBalance {
    pub provider_id: String,
    pub earned: f64,
    pub paid: f64,
    pub balance: f64,
}

const PAYOUT_COLUMNS: &str =
    "id, tenant_id, provider_id, amount, method, reference, CAST(created_at AS VARCHAR)";

fn row_to_payout(row: &duckdb::Row<'_>) -> duckdb::Result<Payout> {
    Ok(Payout {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        provider_id: row.get(2)?,
        amount: row.get(3)?,
        method: row.get(4)?,
        reference: row.get(5)?,
        created_at: row.get(6)?,
    })
}

impl FleetDb {
    pub async fn create_payout(&self, params: CreatePayoutParams) -> Result<Payout> {
        let conn = self.conn.lock().await;
        let id = generate_id("pay");
        let method = params.method.unwrap_or_else(|| "transfer".to_string());

        conn.execute(
            "INSERT INTO payouts (id, tenant_id, provider_id, amount, method, reference, created_at) \
             VALUES (?1, NULL, ?2, ?3, ?4, ?5, CURRENT_TIMESTAMP)",
            duckdb::params![id, params.provider_id, params.amount, method, params.reference],
        )?;

        let payout = conn
            .prepare(&format!("SELECT {PAYOUT_COLUMNS} FROM payouts WHERE id = ?1"))?
            .query_row(duckdb::params![id], |row| row_to_payout(row))?;
        Ok(payout)
    }

    /// List payouts, newest first, optionally for a single provider.
    pub async fn list_payouts(
        &self,
        provider_id: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Payout>, i64)> {
        let conn = self.conn.lock().await;

        let (total, sql, params): (i64, String, Vec<Box<dyn duckdb::types::ToSql>>) =
            if let Some(provider_id) = provider_id {
                let total = conn
                    .prepare("SELECT COUNT(*) FROM payouts WHERE provider_id = ?1")?
                    .query_row(duckdb::params![provider_id], |row| row.get(0))?;
                (
                    total,
                    format!(
                        "SELECT {PAYOUT_COLUMNS} FROM payouts WHERE provider_id = ?1 \
                         ORDER BY created_at DESC, id DESC LIMIT ?2 OFFSET ?3"
                    ),
                    vec![
                        Box::new(provider_id.to_string()) as Box<dyn duckdb::types::ToSql>,
                        Box::new(limit),
                        Box::new(offset),
                    ],
                )
            } else {
                let total = conn
                    .prepare("SELECT COUNT(*) FROM payouts")?
                    .query_row([], |row| row.get(0))?;
                (
                    total,
                    format!(
                        "SELECT {PAYOUT_COLUMNS} FROM payouts \
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
        let rows = stmt.query_map(param_refs.as_slice(), |row| row_to_payout(row))?;

        let mut payouts = Vec::new();
        for row in rows {
            payouts.push(row?);
        }
        Ok((payouts, total))
    }

    /// Aggregate a provider's balance: completed deal amounts minus payouts.
    ///
    /// Cancelled and still-pending deals do not earn; payouts count from the
    /// moment they are recorded.
    pub async fn provider_balance(&self, provider_id: &str) -> Result<ProviderBalance> {
        let conn = self.conn.lock().await;

        let earned: f64 = conn
            .prepare(
                "SELECT COALESCE(SUM(amount), 0) FROM deals \
                 WHERE provider_id = ?1 AND status = 'completed'",
            )?
            .query_row(duckdb::params![provider_id], |row| row.get(0))?;

        let paid: f64 = conn
            .prepare("SELECT COALESCE(SUM(amount), 0) FROM payouts WHERE provider_id = ?1")?
            .query_row(duckdb::params![provider_id], |row| row.get(0))?;

        Ok(ProviderBalance {
            provider_id: provider_id.to_string(),
            earned,
            paid,
            balance: earned - paid,
        })
    }
}
