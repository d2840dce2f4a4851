//! # Price Table Module
//!
//! The price collaborator used by the wizard and the admin commands.
//! [`crate::db::PgPriceTable`] backs it with PostgreSQL; [`InMemoryPriceTable`]
//! keeps everything in process and is used for tests and for running
//! without a database.

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::catalog::{Catalog, Category, Service};

/// Keyed price lookups and updates
#[async_trait]
pub trait PriceTable: Send + Sync {
    /// Unit price for a key, `None` if the key does not exist
    async fn get_price(&self, key: &str) -> Result<Option<f64>>;

    /// Human readable description for a key, `None` if the key does not exist
    async fn get_description(&self, key: &str) -> Result<Option<String>>;

    /// Services of one category, in table order
    async fn list_services(&self, category: Category) -> Result<Vec<Service>>;

    /// Every service in the table, in table order
    async fn list_all(&self) -> Result<Vec<Service>>;

    /// Overwrite the unit price of an existing key.
    /// Returns `false` and leaves the table untouched when the key is unknown.
    async fn update_price(&self, key: &str, value: f64) -> Result<bool>;

    /// Consistent snapshot of the whole table
    async fn snapshot(&self) -> Result<Catalog> {
        Ok(Catalog::new(self.list_all().await?))
    }
}

/// Price table held in memory, lost on restart
#[derive(Debug, Default)]
pub struct InMemoryPriceTable {
    services: RwLock<Vec<Service>>,
}

impl InMemoryPriceTable {
    pub fn new(services: Vec<Service>) -> Self {
        info!(services = services.len(), "Initialized in-memory price table");
        Self {
            services: RwLock::new(services),
        }
    }
}

#[async_trait]
impl PriceTable for InMemoryPriceTable {
    async fn get_price(&self, key: &str) -> Result<Option<f64>> {
        let services = self.services.read().await;
        Ok(services.iter().find(|s| s.key == key).map(|s| s.unit_price))
    }

    async fn get_description(&self, key: &str) -> Result<Option<String>> {
        let services = self.services.read().await;
        Ok(services
            .iter()
            .find(|s| s.key == key)
            .map(|s| s.description.clone()))
    }

    async fn list_services(&self, category: Category) -> Result<Vec<Service>> {
        let services = self.services.read().await;
        Ok(services
            .iter()
            .filter(|s| s.category == category)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Service>> {
        Ok(self.services.read().await.clone())
    }

    async fn update_price(&self, key: &str, value: f64) -> Result<bool> {
        let mut services = self.services.write().await;
        match services.iter_mut().find(|s| s.key == key) {
            Some(service) => {
                debug!(key = %key, old = service.unit_price, new = value, "Updating price");
                service.unit_price = value;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_services;

    #[tokio::test]
    async fn test_lookups_on_seeded_table() -> Result<()> {
        let table = InMemoryPriceTable::new(default_services());

        assert_eq!(table.get_price("general_cleaning").await?, Some(150.0));
        assert_eq!(
            table.get_description("fridge_price").await?.as_deref(),
            Some("Мытье холодильника")
        );
        assert_eq!(table.get_price("missing").await?, None);
        assert_eq!(table.get_description("missing").await?, None);

        let bases = table.list_services(Category::Base).await?;
        let keys: Vec<_> = bases.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["general_cleaning", "after_repair", "support_cleaning"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_unknown_key_leaves_table_unchanged() -> Result<()> {
        let table = InMemoryPriceTable::new(default_services());
        let before = table.list_all().await?;

        assert!(!table.update_price("sauna_price", 10.0).await?);
        assert_eq!(table.list_all().await?, before);

        Ok(())
    }
}
