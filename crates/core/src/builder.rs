use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, warn};

use crate::cpq::catalog::{Catalog, CatalogSource};
use crate::cpq::pricing::Totals;
use crate::domain::cart::{Cart, CartItem};
use crate::domain::client::ClientProfile;
use crate::domain::quote::{create_record, QuotationId};
use crate::domain::service::{Service, ServiceId};
use crate::errors::{ApplicationError, Outcome, PreconditionError};
use crate::export::{build_export, ExportDocument};
use crate::ids::RecordIdGenerator;
use crate::store::QuotationStore;
use crate::validation::validate;

/// Application state for one quoting session: catalog, cart, client, saved quotations.
///
/// Presentation code holds one of these and calls into it; nothing lives at process scope.
#[derive(Debug)]
pub struct QuoteBuilder {
    catalog: Catalog,
    cart: Cart,
    client: Option<ClientProfile>,
    store: QuotationStore,
    ids: RecordIdGenerator,
}

impl QuoteBuilder {
    pub fn new(store: QuotationStore) -> Self {
        let ids = RecordIdGenerator::starting_after(store.latest_id());
        Self { catalog: Catalog::default(), cart: Cart::new(), client: None, store, ids }
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Replaces the catalog. A failed load leaves an empty catalog rather than a stale one.
    pub async fn load_catalog(
        &mut self,
        source: &dyn CatalogSource,
    ) -> Result<usize, ApplicationError> {
        match Catalog::load(source).await {
            Ok(catalog) => {
                info!(
                    event_name = "quote.catalog.loaded",
                    source = %source.describe(),
                    service_count = catalog.len(),
                    "catalog loaded"
                );
                self.catalog = catalog;
                Ok(self.catalog.len())
            }
            Err(error) => {
                warn!(
                    event_name = "quote.catalog.load_failed",
                    source = %source.describe(),
                    error = %error,
                    "catalog could not be loaded"
                );
                self.catalog = Catalog::default();
                Err(error.into())
            }
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn filter_catalog(&self, query: &str) -> Vec<&Service> {
        self.catalog.filter(query)
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn client(&self) -> Option<&ClientProfile> {
        self.client.as_ref()
    }

    pub fn store(&self) -> &QuotationStore {
        &self.store
    }

    pub fn add_service(&mut self, id: ServiceId) -> Result<&CartItem, ApplicationError> {
        let service = self.catalog.find_by_id(id).ok_or(ApplicationError::UnknownService(id))?;
        Ok(self.cart.add(service))
    }

    pub fn remove_service(&mut self, id: ServiceId) -> Result<CartItem, ApplicationError> {
        self.cart.remove(id).ok_or(ApplicationError::NotInCart(id))
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    pub fn totals(&self) -> Result<Totals, ApplicationError> {
        Ok(self.cart.totals()?)
    }

    /// Keeps `profile` only if it validates; otherwise the previous profile stays in place.
    pub fn set_client(&mut self, profile: ClientProfile) -> Result<(), ApplicationError> {
        let report = validate(&profile);
        if !report.is_valid() {
            return Err(ApplicationError::Validation(report.into_failures()));
        }
        self.client = Some(profile);
        Ok(())
    }

    pub fn save_quotation(&mut self) -> Result<QuotationId, ApplicationError> {
        self.save_quotation_at(Utc::now())
    }

    /// Snapshots the session into a record and stores it. A storage failure is reported but
    /// the record remains in the in-memory list.
    pub fn save_quotation_at(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<QuotationId, ApplicationError> {
        let client = self.client.clone().unwrap_or_default();
        self.check_ready(&client)?;

        let id = self.ids.next(now)?;
        let record = create_record(&client, &self.cart, id, now)?;
        let total = record.total();
        self.store.append(record)?;

        info!(
            event_name = "quote.record.saved",
            quotation_id = id.0,
            line_count = self.cart.len(),
            total = %total,
            "quotation saved"
        );
        Ok(id)
    }

    /// Saves and reports the result as a named outcome for notification code.
    pub fn save_outcome(&mut self) -> Outcome {
        let saved = self.save_quotation();
        Outcome::of(&saved, |id| format!("quotation {id} saved"))
    }

    /// Builds the export for the live cart. Gated by the same checks as saving.
    pub fn export_quotation(
        &self,
        generated_on: NaiveDate,
    ) -> Result<ExportDocument, ApplicationError> {
        let client = self.client.clone().unwrap_or_default();
        self.check_ready(&client)?;

        let totals = self.cart.totals()?;
        Ok(build_export(&client, self.cart.items(), &totals, generated_on))
    }

    pub fn export_saved(
        &self,
        id: QuotationId,
        generated_on: NaiveDate,
    ) -> Result<ExportDocument, ApplicationError> {
        let record = self.store.find_by_id(id).ok_or(ApplicationError::UnknownQuotation(id))?;
        Ok(ExportDocument::from_record(record, generated_on))
    }

    fn check_ready(&self, client: &ClientProfile) -> Result<(), PreconditionError> {
        if self.cart.is_empty() {
            return Err(PreconditionError::EmptyCart);
        }
        let report = validate(client);
        if !report.is_valid() {
            return Err(PreconditionError::InvalidClient(report.into_failures()));
        }
        Ok(())
    }
}
