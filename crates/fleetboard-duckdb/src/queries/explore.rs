//! The "explore" catalog: one multi-table aggregation for the public
//! browse screen — featured available cars with their branch names, the
//! branch list, and a per-kind census of active service providers.

use anyhow::Result;
use serde::Serialize;

use crate::shops::Shop;
use crate::FleetDb;

#[derive(Debug, Clone, Serialize)]
pub struct ExploreCar {
    pub id: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub sale_price: f64,
    pub image_url: Option<String>,
    pub shop_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProviderKindCount {
    pub kind: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExploreOverview {
    pub featured_cars: Vec<ExploreCar>,
    pub shops: Vec<Shop>,
    pub provider_counts: Vec<ProviderKindCount>,
}

impl FleetDb {
    /// Build the explore catalog in one connection hold.
    ///
    /// `featured_limit` caps the car list (newest available cars first).
    pub async fn explore_overview(&self, featured_limit: i64) -> Result<ExploreOverview> {
        let conn = self.conn.lock().await;

        let mut stmt = conn.prepare(
            "SELECT c.id, c.make, c.model, c.year, c.sale_price, c.image_url, s.name \
             FROM cars c LEFT JOIN shops s ON s.id = c.shop_id \
             WHERE c.status = 'available' \
             ORDER BY c.created_at DESC, c.id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(duckdb::params![featured_limit], |row| {
            Ok(ExploreCar {
                id: row.get(0)?,
                make: row.get(1)?,
                model: row.get(2)?,
                year: row.get(3)?,
                sale_price: row.get(4)?,
                image_url: row.get(5)?,
                shop_name: row.get(6)?,
            })
        })?;
        let mut featured_cars = Vec::new();
        for row in rows {
            featured_cars.push(row?);
        }

        let mut stmt = conn.prepare(
            "SELECT id, tenant_id, name, city, address, phone, image_url, \
             CAST(created_at AS VARCHAR), CAST(updated_at AS VARCHAR) \
             FROM shops ORDER BY name, id",
        )?;
        let rows = stmt.query_map([], |row| {
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
        })?;
        let mut shops = Vec::new();
        for row in rows {
            shops.push(row?);
        }

        let mut stmt = conn.prepare(
            "SELECT kind, COUNT(*) FROM providers WHERE active \
             GROUP BY kind ORDER BY kind",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ProviderKindCount {
                kind: row.get(0)?,
                count: row.get(1)?,
            })
        })?;
        let mut provider_counts = Vec::new();
        for row in rows {
            provider_counts.push(row?);
        }

        Ok(ExploreOverview {
            featured_cars,
            shops,
            provider_counts,
        })
    }
}
