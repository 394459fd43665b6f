pub mod builder;
pub mod config;
pub mod cpq;
pub mod domain;
pub mod errors;
pub mod export;
pub mod ids;
pub mod store;
pub mod validation;

pub use builder::QuoteBuilder;
pub use cpq::catalog::{Catalog, CatalogSource};
pub use cpq::pricing::{compute_totals, format_amount, Totals, MAX_PRICE, TAX_RATE};
pub use domain::cart::{Cart, CartItem};
pub use domain::client::{ClientProfile, OBSERVATIONS_MAX_CHARS};
pub use domain::quote::{create_record, QuotationId, QuotationRecord};
pub use domain::service::{Service, ServiceId};
pub use errors::{
    ApplicationError, LoadError, Outcome, PersistenceError, PreconditionError, PricingError,
};
pub use export::{build_export, ExportDocument, ExportItem, ExportLine};
pub use ids::{RecordIdGenerator, MAX_RECORD_ID};
pub use store::{KeyValueStorage, QuotationStore, QuotationSummary, StorageError, QUOTATIONS_KEY};
pub use validation::{validate, ClientField, FieldError, FieldErrorKind, ValidationReport};
