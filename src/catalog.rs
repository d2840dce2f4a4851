//! # Service Catalog Module
//!
//! Defines the cleaning services offered by the bot, how each one is priced,
//! and an immutable [`Catalog`] snapshot used for a single wizard step or quote.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a service is a primary cleaning type or an optional add-on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Base,
    Addon,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Base => "base",
            Category::Addon => "addon",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base" => Ok(Category::Base),
            "addon" => Ok(Category::Addon),
            other => Err(format!("unknown service category: {other}")),
        }
    }
}

/// How the unit price of a service scales with the room area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingMode {
    /// Unit price is multiplied by the area in m²
    PerArea,
    /// Unit price is charged once regardless of area
    Flat,
}

impl PricingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingMode::PerArea => "per_area",
            PricingMode::Flat => "flat",
        }
    }
}

impl fmt::Display for PricingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PricingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "per_area" => Ok(PricingMode::PerArea),
            "flat" => Ok(PricingMode::Flat),
            other => Err(format!("unknown pricing mode: {other}")),
        }
    }
}

/// A priced entry of the price table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub key: String,
    pub description: String,
    pub unit_price: f64,
    pub category: Category,
    pub pricing_mode: PricingMode,
}

impl Service {
    pub fn new(
        key: &str,
        unit_price: f64,
        description: &str,
        category: Category,
        pricing_mode: PricingMode,
    ) -> Self {
        Self {
            key: key.to_string(),
            description: description.to_string(),
            unit_price,
            category,
            pricing_mode,
        }
    }

    /// Cost of this service for the given area
    pub fn cost_for(&self, area: f64) -> f64 {
        match self.pricing_mode {
            PricingMode::PerArea => self.unit_price * area,
            PricingMode::Flat => self.unit_price,
        }
    }
}

/// Seed rows inserted at startup when missing. Existing rows are never overwritten.
pub fn default_services() -> Vec<Service> {
    vec![
        Service::new("general_cleaning", 150.0, "Генеральная уборка", Category::Base, PricingMode::PerArea),
        Service::new("after_repair", 250.0, "Уборка после ремонта", Category::Base, PricingMode::PerArea),
        Service::new("support_cleaning", 100.0, "Поддерживающая уборка", Category::Base, PricingMode::PerArea),
        Service::new("windows_price", 300.0, "Мытье окон (за м²)", Category::Addon, PricingMode::PerArea),
        Service::new("fridge_price", 1500.0, "Мытье холодильника", Category::Addon, PricingMode::Flat),
        Service::new("oven_price", 1000.0, "Мытье духовки/плиты", Category::Addon, PricingMode::Flat),
    ]
}

/// Point-in-time copy of the price table, in table order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    services: Vec<Service>,
}

impl Catalog {
    pub fn new(services: Vec<Service>) -> Self {
        Self { services }
    }

    pub fn get(&self, key: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.key == key)
    }

    /// Look up a key restricted to one category
    pub fn find(&self, key: &str, category: Category) -> Option<&Service> {
        self.get(key).filter(|s| s.category == category)
    }

    pub fn by_category(&self, category: Category) -> Vec<Service> {
        self.services
            .iter()
            .filter(|s| s.category == category)
            .cloned()
            .collect()
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
