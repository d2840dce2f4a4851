//! # Pricing Engine
//!
//! Turns a finished selection (base type, area, add-ons) into an itemized quote.
//! Values are returned unrounded; rounding for display happens in the UI layer.

use serde::Serialize;

use crate::catalog::{Catalog, Category};
use crate::errors::PricingError;

/// One priced row of a quote
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub key: String,
    pub description: String,
    pub cost: f64,
}

/// Itemized price breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub area: f64,
    pub base_cost: f64,
    pub extras_cost: f64,
    pub total: f64,
    /// Base service first, then add-ons in selection order
    pub line_items: Vec<LineItem>,
}

impl Quote {
    pub fn base_item(&self) -> Option<&LineItem> {
        self.line_items.first()
    }

    pub fn extra_items(&self) -> &[LineItem] {
        self.line_items.get(1..).unwrap_or(&[])
    }
}

/// Price a selection against a catalog snapshot.
///
/// Missing keys are reported as [`PricingError::ServiceNotFound`] rather than
/// priced at zero.
pub fn compute_quote(
    catalog: &Catalog,
    base_type_key: &str,
    area: f64,
    selected_extra_keys: &[String],
) -> Result<Quote, PricingError> {
    let base = catalog
        .get(base_type_key)
        .ok_or_else(|| PricingError::ServiceNotFound(base_type_key.to_string()))?;
    if base.category != Category::Base {
        return Err(PricingError::NotABaseService(base_type_key.to_string()));
    }

    let base_cost = base.unit_price * area;
    let mut line_items = vec![LineItem {
        key: base.key.clone(),
        description: base.description.clone(),
        cost: base_cost,
    }];

    let mut extras_cost = 0.0;
    for key in selected_extra_keys {
        let extra = catalog
            .get(key)
            .ok_or_else(|| PricingError::ServiceNotFound(key.clone()))?;
        if extra.category != Category::Addon {
            return Err(PricingError::NotAnAddon(key.clone()));
        }

        let cost = extra.cost_for(area);
        extras_cost += cost;
        line_items.push(LineItem {
            key: extra.key.clone(),
            description: extra.description.clone(),
            cost,
        });
    }

    Ok(Quote {
        area,
        base_cost,
        extras_cost,
        total: base_cost + extras_cost,
        line_items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_services;

    #[test]
    fn test_base_only_quote() {
        let catalog = Catalog::new(default_services());
        let quote = compute_quote(&catalog, "general_cleaning", 55.0, &[]).unwrap();

        assert_eq!(quote.base_cost, 8250.0);
        assert_eq!(quote.extras_cost, 0.0);
        assert_eq!(quote.total, 8250.0);
        assert_eq!(quote.line_items.len(), 1);
        assert!(quote.extra_items().is_empty());
    }

    #[test]
    fn test_missing_extra_is_not_priced_at_zero() {
        let catalog = Catalog::new(default_services());
        let err = compute_quote(&catalog, "general_cleaning", 10.0, &["sauna".to_string()]);

        assert_eq!(err, Err(PricingError::ServiceNotFound("sauna".to_string())));
    }
}
