//! Quote requests driven through the request layer, as the binary runs them.

use std::path::PathBuf;

use comex_cli::commands::{quote_json, render_json, QuoteOptions};
use comex_cli::{ComexConfig, ErrorCode, InMemoryCatalog};
use rust_decimal_macros::dec;

const CATALOG: &str = r#"[
    { "id": "broker", "name": "Customs Broker", "type": "FIXED", "value": "200",
      "prorate": true, "incotermToBeIncluded": { "name": "FOB" } },
    { "id": "ocean", "name": "Ocean Freight", "type": "FREIGHT", "value": "500",
      "incotermToBeIncluded": { "name": "CIF" } }
]"#;

fn write_config(dir: &tempfile::TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("comex.toml");
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn catalog_costs_priced_with_file_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "[pricing]\nduty_basis = \"FOB_GROSS_UP\"\n");
    let config = ComexConfig::from_file(&path).unwrap();
    let catalog = InMemoryCatalog::from_json(CATALOG).unwrap();

    let request = r#"{
        "products": [{
            "productId": "wine-01", "productName": "Malbec Reserva",
            "basePrice": "10.0", "quantity": 100,
            "tariff": { "adValoremRate": "5" }
        }],
        "expenses": [{ "costId": "broker" }, { "costId": "ocean" }],
        "incoterm": "FOB"
    }"#;

    let result = quote_json(request, &catalog, &config, QuoteOptions::default()).unwrap();
    let line = &result.items[0];

    assert_eq!(line.unit_price, dec!(12.63));
    assert_eq!(line.total_price, dec!(1263.00));
    assert_eq!(result.total_expenses, dec!(700.00));
    assert!(!line.breakdown[2].included_in_incoterm);
}

#[test]
fn request_config_overrides_file_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "[pricing]\nprecision = 4\n");
    let config = ComexConfig::from_file(&path).unwrap();

    let request = r#"{
        "products": [{ "productId": "belt", "basePrice": "121", "quantity": 100 }],
        "incoterm": "FOB",
        "config": { "adjustForVAT": true, "vatRate": "21", "precision": 2 }
    }"#;

    let catalog = InMemoryCatalog::new();
    let result = quote_json(request, &catalog, &config, QuoteOptions::default()).unwrap();
    assert_eq!(result.items[0].unit_price.to_string(), "100.00");
    assert_eq!(result.items[0].total_price.to_string(), "10000.00");
    assert_eq!(result.metadata.precision, 2);
}

#[test]
fn missing_catalog_entry_is_not_found() {
    let request = r#"{
        "products": [{ "productId": "p1", "basePrice": "1", "quantity": 1 }],
        "expenses": [{ "costId": "nope" }],
        "incoterm": "FOB"
    }"#;

    let err = quote_json(
        request,
        &InMemoryCatalog::new(),
        &ComexConfig::default(),
        QuoteOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
    assert_eq!(err.to_json(), r#"{"code":"NOT_FOUND","message":"Cost not found: nope"}"#);
}

#[test]
fn invalid_quantity_reports_field_path() {
    let request = r#"{
        "products": [
            { "productId": "p1", "basePrice": "1", "quantity": 1 },
            { "productId": "p2", "basePrice": "1", "quantity": 0 }
        ],
        "incoterm": "FOB"
    }"#;

    let err = quote_json(
        request,
        &InMemoryCatalog::new(),
        &ComexConfig::default(),
        QuoteOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
    assert!(err.message.contains("items[1].quantity"), "{}", err.message);
}

#[test]
fn json_output_is_stable() {
    let catalog = InMemoryCatalog::from_json(CATALOG).unwrap();
    let request = r#"{
        "products": [{ "productId": "p1", "basePrice": "10", "quantity": 10 }],
        "expenses": [{ "costId": "ocean" }],
        "incoterm": "CIF"
    }"#;
    let config = ComexConfig::default();

    let first = quote_json(request, &catalog, &config, QuoteOptions::default()).unwrap();
    let second = quote_json(request, &catalog, &config, QuoteOptions::default()).unwrap();
    let first = render_json(&first, false).unwrap();

    assert_eq!(first, render_json(&second, false).unwrap());
    assert!(first.contains(r#""totalCIF":"600.00""#));
}

#[test]
fn oversized_amounts_fail_as_validation() {
    let request = r#"{
        "products": [{ "productId": "p1", "basePrice": "100000000000000000000",
                       "quantity": 1000000000 }],
        "incoterm": "FOB"
    }"#;

    let err = quote_json(
        request,
        &InMemoryCatalog::new(),
        &ComexConfig::default(),
        QuoteOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
    assert_eq!(err.message, "items[0].basePrice: amount too large");
    assert_eq!(err.code.exit_status(), 4);
}
