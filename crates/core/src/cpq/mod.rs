pub mod catalog;
pub mod pricing;

pub use catalog::{Catalog, CatalogSource};
pub use pricing::{compute_totals, format_amount, Totals, MAX_PRICE, TAX_RATE};
