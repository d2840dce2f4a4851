use anyhow::Result;

use umiclean::admin::{list_prices_as, update_price_as, AdminGate, MAX_PRICE};
use umiclean::catalog::default_services;
use umiclean::errors::{AdminError, InputError};
use umiclean::price_table::{InMemoryPriceTable, PriceTable};
use umiclean::pricing::compute_quote;

const ADMIN: i64 = 1001;
const CUSTOMER: i64 = 2002;

fn setup() -> (InMemoryPriceTable, AdminGate) {
    (
        InMemoryPriceTable::new(default_services()),
        AdminGate::new(ADMIN),
    )
}

#[tokio::test]
async fn test_admin_update_is_reflected_in_quotes() -> Result<()> {
    let (table, gate) = setup();

    let value = update_price_as(&table, &gate, ADMIN, "general_cleaning", "200").await?;
    assert_eq!(value, 200.0);
    assert_eq!(table.get_price("general_cleaning").await?, Some(200.0));

    let catalog = table.snapshot().await?;
    let quote = compute_quote(&catalog, "general_cleaning", 55.0, &[])?;
    assert_eq!(quote.total, 11000.0);

    Ok(())
}

#[tokio::test]
async fn test_update_accepts_decimal_comma() -> Result<()> {
    let (table, gate) = setup();

    update_price_as(&table, &gate, ADMIN, "oven_price", "999,9").await?;
    assert_eq!(table.get_price("oven_price").await?, Some(999.9));

    Ok(())
}

#[tokio::test]
async fn test_unknown_key_reports_failure_and_changes_nothing() -> Result<()> {
    let (table, gate) = setup();
    let before = table.list_all().await?;

    let result = update_price_as(&table, &gate, ADMIN, "sauna_price", "500").await;
    assert!(matches!(result, Err(AdminError::UnknownKey(ref key)) if key == "sauna_price"));
    assert_eq!(table.list_all().await?, before);

    Ok(())
}

#[tokio::test]
async fn test_non_admin_is_rejected() -> Result<()> {
    let (table, gate) = setup();
    let before = table.list_all().await?;

    let result = update_price_as(&table, &gate, CUSTOMER, "fridge_price", "1").await;
    assert!(matches!(result, Err(AdminError::Unauthorized(CUSTOMER))));
    assert_eq!(table.list_all().await?, before);

    let listing = list_prices_as(&table, &gate, CUSTOMER).await;
    assert!(matches!(listing, Err(AdminError::Unauthorized(CUSTOMER))));

    Ok(())
}

#[tokio::test]
async fn test_invalid_values_are_rejected() -> Result<()> {
    let (table, gate) = setup();
    let before = table.list_all().await?;

    for raw in ["-10", "cheap", ""] {
        let result = update_price_as(&table, &gate, ADMIN, "fridge_price", raw).await;
        assert!(matches!(result, Err(AdminError::InvalidValue(_))), "accepted {:?}", raw);
    }
    assert_eq!(table.list_all().await?, before);

    // Zero is a valid price
    update_price_as(&table, &gate, ADMIN, "fridge_price", "0").await?;
    assert_eq!(table.get_price("fridge_price").await?, Some(0.0));

    Ok(())
}

#[tokio::test]
async fn test_huge_price_is_rejected() -> Result<()> {
    let (table, gate) = setup();

    let result = update_price_as(&table, &gate, ADMIN, "general_cleaning", "1e308").await;
    assert!(matches!(
        result,
        Err(AdminError::InvalidValue(InputError::TooLarge { max, .. })) if max == MAX_PRICE
    ));
    assert_eq!(table.get_price("general_cleaning").await?, Some(150.0));

    Ok(())
}

#[tokio::test]
async fn test_admin_can_list_prices() -> Result<()> {
    let (table, gate) = setup();

    let services = list_prices_as(&table, &gate, ADMIN).await?;
    assert_eq!(services.len(), default_services().len());
    assert_eq!(services[0].key, "general_cleaning");

    Ok(())
}
