use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::postgres::PgPool;
use tracing::{debug, info, warn};

use crate::catalog::{Category, PricingMode, Service};
use crate::price_table::PriceTable;

/// Initialize the database schema
pub async fn init_database_schema(pool: &PgPool) -> Result<()> {
    info!("Initializing database schema...");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS prices (
            key TEXT PRIMARY KEY,
            position SERIAL,
            value DOUBLE PRECISION NOT NULL CHECK (value >= 0),
            description TEXT NOT NULL,
            category TEXT NOT NULL,
            pricing_mode TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create prices table")?;

    info!("Database schema initialized successfully");
    Ok(())
}

/// Insert seed prices. Rows that already exist keep their current values.
pub async fn seed_prices(pool: &PgPool, services: &[Service]) -> Result<u64> {
    let mut inserted = 0;

    for service in services {
        let result = sqlx::query(
            "INSERT INTO prices (key, value, description, category, pricing_mode)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (key) DO NOTHING",
        )
        .bind(&service.key)
        .bind(service.unit_price)
        .bind(&service.description)
        .bind(service.category.as_str())
        .bind(service.pricing_mode.as_str())
        .execute(pool)
        .await
        .with_context(|| format!("Failed to seed price {}", service.key))?;

        inserted += result.rows_affected();
    }

    info!(inserted, total = services.len(), "Seeded price table");
    Ok(inserted)
}

type PriceRow = (String, f64, String, String, String);

fn row_to_service(row: PriceRow) -> Option<Service> {
    let (key, unit_price, description, category, pricing_mode) = row;

    let category = match category.parse::<Category>() {
        Ok(category) => category,
        Err(e) => {
            warn!(key = %key, error = %e, "Skipping price row with bad category");
            return None;
        }
    };
    let pricing_mode = match pricing_mode.parse::<PricingMode>() {
        Ok(mode) => mode,
        Err(e) => {
            warn!(key = %key, error = %e, "Skipping price row with bad pricing mode");
            return None;
        }
    };

    Some(Service {
        key,
        description,
        unit_price,
        category,
        pricing_mode,
    })
}

/// PostgreSQL-backed price table
#[derive(Debug, Clone)]
pub struct PgPriceTable {
    pool: PgPool,
}

impl PgPriceTable {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PriceTable for PgPriceTable {
    async fn get_price(&self, key: &str) -> Result<Option<f64>> {
        let row: Option<(f64,)> = sqlx::query_as("SELECT value FROM prices WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to read price")?;

        Ok(row.map(|(value,)| value))
    }

    async fn get_description(&self, key: &str) -> Result<Option<String>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT description FROM prices WHERE key = $1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await
                .context("Failed to read description")?;

        Ok(row.map(|(description,)| description))
    }

    async fn list_services(&self, category: Category) -> Result<Vec<Service>> {
        let rows: Vec<PriceRow> = sqlx::query_as(
            "SELECT key, value, description, category, pricing_mode
             FROM prices WHERE category = $1 ORDER BY position",
        )
        .bind(category.as_str())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list services")?;

        Ok(rows.into_iter().filter_map(row_to_service).collect())
    }

    async fn list_all(&self) -> Result<Vec<Service>> {
        let rows: Vec<PriceRow> = sqlx::query_as(
            "SELECT key, value, description, category, pricing_mode
             FROM prices ORDER BY position",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list prices")?;

        Ok(rows.into_iter().filter_map(row_to_service).collect())
    }

    async fn update_price(&self, key: &str, value: f64) -> Result<bool> {
        info!(key = %key, value, "Updating price");

        let rows_affected = sqlx::query("UPDATE prices SET value = $1 WHERE key = $2")
            .bind(value)
            .bind(key)
            .execute(&self.pool)
            .await
            .context("Failed to update price")?
            .rows_affected();

        if rows_affected > 0 {
            debug!(key = %key, "Price updated");
            Ok(true)
        } else {
            info!(key = %key, "No price found for key");
            Ok(false)
        }
    }
}
