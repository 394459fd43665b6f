use std::collections::HashSet;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::cpq::pricing::{round_to_cents, MAX_PRICE};
use crate::domain::service::{Service, ServiceId};
use crate::errors::LoadError;

/// Where the catalog document comes from. Fetching is the only suspending operation.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    fn describe(&self) -> String;
    async fn fetch(&self) -> Result<String, LoadError>;
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    servicios: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    id: u64,
    nombre: String,
    categoria: String,
    precio: Decimal,
    #[serde(default)]
    descripcion: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    services: Vec<Service>,
}

impl Catalog {
    pub fn new(services: Vec<Service>) -> Self {
        Self { services }
    }

    pub async fn load(source: &dyn CatalogSource) -> Result<Self, LoadError> {
        let raw = source.fetch().await?;
        Self::from_document(&raw)
    }

    pub fn from_document(raw: &str) -> Result<Self, LoadError> {
        let document = serde_json::from_str::<CatalogDocument>(raw)
            .map_err(|error| LoadError::Malformed(error.to_string()))?;

        let mut seen = HashSet::new();
        let mut services = Vec::with_capacity(document.servicios.len());
        for entry in document.servicios {
            if entry.precio < Decimal::ZERO {
                return Err(LoadError::Malformed(format!(
                    "service {} has a negative price ({})",
                    entry.id, entry.precio
                )));
            }
            if entry.precio > MAX_PRICE {
                return Err(LoadError::Malformed(format!(
                    "service {} has a price above {MAX_PRICE} ({})",
                    entry.id, entry.precio
                )));
            }
            if !seen.insert(entry.id) {
                return Err(LoadError::Malformed(format!("service id {} appears twice", entry.id)));
            }

            services.push(Service {
                id: ServiceId(entry.id),
                name: entry.nombre,
                category: entry.categoria,
                price: round_to_cents(entry.precio),
                description: entry.descripcion.filter(|text| !text.trim().is_empty()),
            });
        }

        Ok(Self { services })
    }

    pub fn find_by_id(&self, id: ServiceId) -> Option<&Service> {
        self.services.iter().find(|service| service.id == id)
    }

    /// Case-insensitive substring match on the service name, catalog order preserved.
    /// A blank query returns everything.
    pub fn filter(&self, query: &str) -> Vec<&Service> {
        if query.trim().is_empty() {
            return self.services.iter().collect();
        }

        let needle = query.to_lowercase();
        self.services
            .iter()
            .filter(|service| service.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use rust_decimal::Decimal;

    use crate::domain::service::ServiceId;
    use crate::errors::LoadError;

    use super::{Catalog, CatalogSource};

    const DOCUMENT: &str = r#"{
        "servicios": [
            {"id": 1, "nombre": "Audit", "categoria": "ISO 9001", "precio": 100.0},
            {"id": 2, "nombre": "Review", "categoria": "ISO 9001", "precio": 50, "descripcion": "Document review"},
            {"id": 3, "nombre": "Internal audit training", "categoria": "Training", "precio": 75.5}
        ]
    }"#;

    struct StaticSource(&'static str);

    #[async_trait]
    impl CatalogSource for StaticSource {
        fn describe(&self) -> String {
            "static".to_string()
        }

        async fn fetch(&self) -> Result<String, LoadError> {
            Ok(self.0.to_string())
        }
    }

    struct UnreachableSource;

    #[async_trait]
    impl CatalogSource for UnreachableSource {
        fn describe(&self) -> String {
            "nowhere".to_string()
        }

        async fn fetch(&self) -> Result<String, LoadError> {
            Err(LoadError::Unreachable {
                origin: self.describe(),
                message: "connection refused".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn load_parses_catalog_document_shape() {
        let catalog = Catalog::load(&StaticSource(DOCUMENT)).await.expect("catalog loads");

        assert_eq!(catalog.len(), 3);
        let review = catalog.find_by_id(ServiceId(2)).expect("review present");
        assert_eq!(review.price, Decimal::new(5_000, 2));
        assert_eq!(review.description.as_deref(), Some("Document review"));
        assert_eq!(review.price.to_string(), "50.00");
    }

    #[tokio::test]
    async fn unreachable_source_surfaces_load_error() {
        let error = Catalog::load(&UnreachableSource).await.expect_err("load should fail");

        assert!(matches!(error, LoadError::Unreachable { .. }));
    }

    #[test]
    fn missing_required_field_is_malformed() {
        let error = Catalog::from_document(r#"{"servicios": [{"id": 1, "nombre": "Audit"}]}"#)
            .expect_err("missing price");

        assert!(matches!(error, LoadError::Malformed(_)));
    }

    #[test]
    fn negative_price_is_malformed() {
        let error = Catalog::from_document(
            r#"{"servicios": [{"id": 1, "nombre": "Audit", "categoria": "x", "precio": -1}]}"#,
        )
        .expect_err("negative price");

        assert!(matches!(error, LoadError::Malformed(ref message) if message.contains("negative")));
    }

    #[test]
    fn duplicate_ids_are_malformed() {
        let error = Catalog::from_document(
            r#"{"servicios": [
                {"id": 1, "nombre": "Audit", "categoria": "x", "precio": 1},
                {"id": 1, "nombre": "Again", "categoria": "x", "precio": 2}
            ]}"#,
        )
        .expect_err("duplicate id");

        assert!(matches!(error, LoadError::Malformed(_)));
    }

    #[test]
    fn filter_is_case_insensitive_and_keeps_catalog_order() {
        let catalog = Catalog::from_document(DOCUMENT).expect("catalog parses");

        let names =
            catalog.filter("AUDIT").iter().map(|service| service.name.as_str()).collect::<Vec<_>>();

        assert_eq!(names, vec!["Audit", "Internal audit training"]);
    }

    #[test]
    fn empty_filter_returns_full_catalog() {
        let catalog = Catalog::from_document(DOCUMENT).expect("catalog parses");

        assert_eq!(catalog.filter("").len(), 3);
        assert_eq!(catalog.filter("   ").len(), 3);
        assert!(catalog.filter("nothing like this").is_empty());
    }

    #[test]
    fn surrounding_whitespace_is_part_of_the_query() {
        let catalog = Catalog::from_document(DOCUMENT).expect("catalog parses");

        let matches = catalog.filter(" audit");
        let names = matches.iter().map(|service| service.name.as_str()).collect::<Vec<_>>();

        assert_eq!(names, vec!["Internal audit training"]);
    }

    #[test]
    fn price_above_ceiling_is_malformed() {
        let error = Catalog::from_document(
            r#"{"servicios": [
                {"id": 1, "nombre": "Audit", "categoria": "x", "precio": 50000000000000000000000000000}
            ]}"#,
        )
        .expect_err("price above ceiling");

        assert!(matches!(error, LoadError::Malformed(ref message) if message.contains("above")));
    }

    #[test]
    fn find_by_id_misses_unknown_ids() {
        let catalog = Catalog::from_document(DOCUMENT).expect("catalog parses");

        assert!(catalog.find_by_id(ServiceId(42)).is_none());
    }
}
