//! Administrator-only price management.

use tracing::{info, warn};

use crate::catalog::Service;
use crate::errors::{AdminError, InputError};
use crate::price_table::PriceTable;
use crate::session::UserKey;
use crate::wizard::parse_decimal;

/// Gate for admin operations, holding the single configured administrator id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminGate {
    admin_id: UserKey,
}

impl AdminGate {
    pub fn new(admin_id: UserKey) -> Self {
        Self { admin_id }
    }

    pub fn is_admin(&self, caller: UserKey) -> bool {
        caller == self.admin_id
    }

    pub fn authorize(&self, caller: UserKey) -> Result<(), AdminError> {
        if self.is_admin(caller) {
            Ok(())
        } else {
            warn!(user_id = caller, "Rejected admin operation from non-admin user");
            Err(AdminError::Unauthorized(caller))
        }
    }
}

/// Largest unit price an administrator can set
pub const MAX_PRICE: f64 = 10_000_000.0;

/// Parse a price, which may be zero but never negative or above `MAX_PRICE`
pub fn parse_price(input: &str) -> Result<f64, InputError> {
    let value = parse_decimal(input)?;
    if value < 0.0 {
        return Err(InputError::Negative(value));
    }
    if value > MAX_PRICE {
        return Err(InputError::TooLarge {
            value,
            max: MAX_PRICE,
        });
    }
    Ok(value)
}

/// Update a price on behalf of `caller`.
///
/// Nothing is written unless the caller is the administrator, the value
/// parses as a non-negative number and the key already exists.
pub async fn update_price_as(
    table: &dyn PriceTable,
    gate: &AdminGate,
    caller: UserKey,
    key: &str,
    raw_value: &str,
) -> Result<f64, AdminError> {
    gate.authorize(caller)?;
    let value = parse_price(raw_value)?;

    if table.update_price(key, value).await? {
        info!(user_id = caller, key = %key, value, "Admin updated price");
        Ok(value)
    } else {
        Err(AdminError::UnknownKey(key.to_string()))
    }
}

/// Full price list for the administrator
pub async fn list_prices_as(
    table: &dyn PriceTable,
    gate: &AdminGate,
    caller: UserKey,
) -> Result<Vec<Service>, AdminError> {
    gate.authorize(caller)?;
    Ok(table.list_all().await?)
}
