use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::backend::{generate_id, optional_row};
use crate::FleetDb;

/// Kind of external service business a provider runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Guide,
    Paramedic,
    Security,
    Entertainment,
    Travel,
}

impl ProviderKind {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim() {
            "guide" => Ok(Self::Guide),
            "paramedic" => Ok(Self::Paramedic),
            "security" => Ok(Self::Security),
            "entertainment" => Ok(Self::Entertainment),
            "travel" => Ok(Self::Travel),
            _ => Err(anyhow!(
                "kind must be one of: guide, paramedic, security, entertainment, travel"
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Guide => "guide",
            Self::Paramedic => "paramedic",
            Self::Security => "security",
            Self::Entertainment => "entertainment",
            Self::Travel => "travel",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Provider {
    pub id: String,
    pub tenant_id: Option<String>,
    pub name: String,
    pub kind: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

pub struct CreateProviderParams {
    pub name: String,
    pub kind: ProviderKind,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
}

#[derive(Default)]
pub struct UpdateProviderParams {
    pub name: Option<String>,
    pub kind: Option<ProviderKind>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub active: Option<bool>,
}

const PROVIDER_COLUMNS: &str = "id, tenant_id, name, kind, phone, email, city, active, \
     CAST(created_at AS VARCHAR), CAST(updated_at AS VARCHAR)";

fn row_to_provider(row: &duckdb::Row<'_>) -> duckdb::Result<Provider> {
    Ok(Provider {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        name: row.get(2)?,
        kind: row.get(3)?,
        phone: row.get(4)?,
        email: row.get(5)?,
        city: row.get(6)?,
        active: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

impl FleetDb {
    pub async fn create_provider(&self, params: CreateProviderParams) -> Result<Provider> {
        let conn = self.conn.lock().await;
        let id = generate_id("prov");

        conn.execute(
            "INSERT INTO providers (id, tenant_id, name, kind, phone, email, city, active, created_at, updated_at) \
             VALUES (?1, NULL, ?2, ?3, ?4, ?5, ?6, TRUE, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)",
            duckdb::params![
                id,
                params.name,
                params.kind.as_str(),
                params.phone,
                params.email,
                params.city
            ],
        )?;

        let provider = conn
            .prepare(&format!(
                "SELECT {PROVIDER_COLUMNS} FROM providers WHERE id = ?1"
            ))?
            .query_row(duckdb::params![id], |row| row_to_provider(row))?;
        Ok(provider)
    }

    /// List providers, optionally restricted to one kind.
    pub async fn list_providers(
        &self,
        kind: Option<ProviderKind>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Provider>, i64)> {
        let conn = self.conn.lock().await;

        let (total, sql, params): (i64, String, Vec<Box<dyn duckdb::types::ToSql>>) =
            if let Some(kind) = kind {
                let total = conn
                    .prepare("SELECT COUNT(*) FROM providers WHERE kind = ?1")?
                    .query_row(duckdb::params![kind.as_str()], |row| row.get(0))?;
                (
                    total,
                    format!(
                        "SELECT {PROVIDER_COLUMNS} FROM providers WHERE kind = ?1 \
                         ORDER BY name, id LIMIT ?2 OFFSET ?3"
                    ),
                    vec![
                        Box::new(kind.as_str().to_string()) as Box<dyn duckdb::types::ToSql>,
                        Box::new(limit),
                        Box::new(offset),
                    ],
                )
            } else {
                let total = conn
                    .prepare("SELECT COUNT(*) FROM providers")?
                    .query_row([], |row| row.get(0))?;
                (
                    total,
                    format!(
                        "SELECT {PROVIDER_COLUMNS} FROM providers \
                         ORDER BY name, id LIMIT ?1 OFFSET ?2"
                    ),
                    vec![
                        Box::new(limit) as Box<dyn duckdb::types::ToSql>,
                        Box::new(offset),
                    ],
                )
            };

        let param_refs: Vec<&dyn duckdb::types::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(param_refs.as_slice(), |row| row_to_provider(row))?;

        let mut providers = Vec::new();
        for row in rows {
            providers.push(row?);
        }
        Ok((providers, total))
    }

    pub async fn get_provider(&self, id: &str) -> Result<Option<Provider>> {
        let conn = self.conn.lock().await;
        let result = optional_row(
            conn.prepare(&format!(
                "SELECT {PROVIDER_COLUMNS} FROM providers WHERE id = ?1"
            ))?
            .query_row(duckdb::params![id], |row| row_to_provider(row)),
        )?;
        Ok(result)
    }

    pub async fn update_provider(
        &self,
        id: &str,
        params: UpdateProviderParams,
    ) -> Result<Option<Provider>> {
        let conn = self.conn.lock().await;

        let exists: i64 = conn
            .prepare("SELECT COUNT(*) FROM providers WHERE id = ?1")?
            .query_row(duckdb::params![id], |row| row.get(0))?;
        if exists == 0 {
            return Ok(None);
        }

        if let Some(ref name) = params.name {
            conn.execute(
                "UPDATE providers SET name = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
                duckdb::params![name, id],
            )?;
        }
        if let Some(kind) = params.kind {
            conn.execute(
                "UPDATE providers SET kind = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
                duckdb::params![kind.as_str(), id],
            )?;
        }
        if let Some(ref phone) = params.phone {
            conn.execute(
                "UPDATE providers SET phone = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
                duckdb::params![phone, id],
            )?;
        }
        if let Some(ref email) = params.email {
            conn.execute(
                "UPDATE providers SET email = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
                duckdb::params![email, id],
            )?;
        }
        if let Some(ref city) = params.city {
            conn.execute(
                "UPDATE providers SET city = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
                duckdb::params![city, id],
            )?;
        }
        if let Some(active) = params.active {
            conn.execute(
                "UPDATE providers SET active = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
                duckdb::params![active, id],
            )?;
        }

        let provider = conn
            .prepare(&format!(
                "SELECT {PROVIDER_COLUMNS} FROM providers WHERE id = ?1"
            ))?
            .query_row(duckdb::params![id], |row| row_to_provider(row))?;
        Ok(Some(provider))
    }

    /// Delete a provider together with its payout history. Deals keep their
    /// `provider_id` for bookkeeping; the reference simply dangles (no FKs).
    pub async fn delete_provider(&self, id: &str) -> Result<bool> {
        let mut conn = self.conn.lock().await;

        let exists: i64 = conn
            .prepare("SELECT COUNT(*) FROM providers WHERE id = ?1")?
            .query_row(duckdb::params![id], |row| row.get(0))?;
        if exists == 0 {
            return Ok(false);
        }

        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM payouts WHERE provider_id = ?1",
            duckdb::params![id],
        )?;
        tx.execute("DELETE FROM providers WHERE id = ?1", duckdb::params![id])?;
        tx.commit()?;

        Ok(true)
    }
}
