use std::fs;
use std::sync::Arc;

use chrono::NaiveDate;
use quotekit_core::{ClientProfile, Outcome, QuotationStore, QuoteBuilder, ServiceId};
use quotekit_storage::{FileCatalogSource, FileStorage, InMemoryStorage};
use rust_decimal::Decimal;
use tempfile::TempDir;

const CATALOG: &str = r#"{
    "servicios": [
        {"id": 1, "nombre": "Audit", "categoria": "ISO 9001", "precio": 100.00},
        {"id": 2, "nombre": "Review", "categoria": "ISO 9001", "precio": 50.00, "descripcion": "Document review"}
    ]
}"#;

fn write_catalog(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("datos.json");
    fs::write(&path, CATALOG).expect("write catalog");
    path
}

#[tokio::test]
async fn file_backed_session_survives_restart() {
    let dir = TempDir::new().expect("temp dir");
    let catalog_path = write_catalog(&dir);
    let state_dir = dir.path().join("state");

    let mut builder =
        QuoteBuilder::new(QuotationStore::load(Arc::new(FileStorage::new(&state_dir))));
    builder.load_catalog(&FileCatalogSource::new(&catalog_path)).await.expect("catalog loads");
    builder.add_service(ServiceId(1)).expect("audit");
    builder.add_service(ServiceId(2)).expect("review");
    builder
        .set_client(ClientProfile::new("Ana", "ana@b.com").with_company("Acme"))
        .expect("valid client");
    let id = builder.save_quotation().expect("save");

    let restarted = QuotationStore::load(Arc::new(FileStorage::new(&state_dir)));

    assert_eq!(restarted.records(), builder.store().records());
    let record = restarted.find_by_id(id).expect("record survives restart");
    assert_eq!(record.total(), Decimal::new(18_150, 2));
    assert_eq!(record.items()[1].description.as_deref(), Some("Document review"));
}

#[tokio::test]
async fn ids_keep_increasing_across_restarts() {
    let dir = TempDir::new().expect("temp dir");
    let catalog_path = write_catalog(&dir);
    let state_dir = dir.path().join("state");
    let now = chrono::Utc::now();

    let mut first_session =
        QuoteBuilder::new(QuotationStore::load(Arc::new(FileStorage::new(&state_dir))));
    first_session.load_catalog(&FileCatalogSource::new(&catalog_path)).await.expect("catalog");
    first_session.add_service(ServiceId(1)).expect("audit");
    first_session.set_client(ClientProfile::new("Ana", "ana@b.com")).expect("client");
    let first = first_session.save_quotation_at(now).expect("first save");

    let mut second_session =
        QuoteBuilder::new(QuotationStore::load(Arc::new(FileStorage::new(&state_dir))));
    second_session.load_catalog(&FileCatalogSource::new(&catalog_path)).await.expect("catalog");
    second_session.add_service(ServiceId(2)).expect("review");
    second_session.set_client(ClientProfile::new("Ana", "ana@b.com")).expect("client");
    let second = second_session.save_quotation_at(now).expect("second save");

    assert!(second > first);
    assert_eq!(second_session.store().len(), 2);
}

#[test]
fn corrupted_file_loads_as_empty_store() {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join("quotations.json"), "[{\"id\": ").expect("write garbage");

    let store = QuotationStore::load(Arc::new(FileStorage::new(dir.path())));

    assert!(store.is_empty());
}

#[test]
fn quota_exhaustion_is_reported_without_losing_the_session() {
    let storage = Arc::new(InMemoryStorage::default().with_quota(Some(64)));
    let catalog = quotekit_core::Catalog::from_document(CATALOG).expect("catalog parses");
    let mut builder = QuoteBuilder::new(QuotationStore::load(storage)).with_catalog(catalog);
    builder.add_service(ServiceId(1)).expect("audit");
    builder.set_client(ClientProfile::new("Ana", "ana@b.com")).expect("client");

    let error = builder.save_quotation().expect_err("quota is too small");

    assert!(matches!(Outcome::from(error), Outcome::PersistenceFailed { .. }));
    assert_eq!(builder.store().len(), 1);
    let export = builder
        .export_quotation(NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date"))
        .expect("export still works");
    assert_eq!(export.totals[2].value, "$121.00");
}
