use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cpq::pricing::{compute_totals, Totals};
use crate::domain::cart::{Cart, CartItem};
use crate::domain::client::ClientProfile;
use crate::errors::PreconditionError;
use crate::validation::validate;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuotationId(pub i64);

impl fmt::Display for QuotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Saved snapshot of a client, the cart lines and their totals.
///
/// Fields are only readable: a record never changes after [`create_record`] builds it, and
/// its totals are always what the pricing engine yields for its own items.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotationRecord {
    id: QuotationId,
    created_at: DateTime<Utc>,
    client: ClientProfile,
    items: Vec<CartItem>,
    subtotal: Decimal,
    tax: Decimal,
    total: Decimal,
}

impl QuotationRecord {
    pub fn id(&self) -> QuotationId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn client(&self) -> &ClientProfile {
        &self.client
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    pub fn tax(&self) -> Decimal {
        self.tax
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn totals(&self) -> Totals {
        Totals { subtotal: self.subtotal, tax: self.tax, total: self.total }
    }

    /// True when the stored totals equal a fresh computation over the stored items.
    pub fn reconciles(&self) -> bool {
        matches!(compute_totals(&self.items), Ok(totals) if totals == self.totals())
    }
}

pub fn create_record(
    client: &ClientProfile,
    cart: &Cart,
    id: QuotationId,
    created_at: DateTime<Utc>,
) -> Result<QuotationRecord, PreconditionError> {
    if cart.is_empty() {
        return Err(PreconditionError::EmptyCart);
    }

    let report = validate(client);
    if !report.is_valid() {
        return Err(PreconditionError::InvalidClient(report.into_failures()));
    }

    let items = cart.items().to_vec();
    let Totals { subtotal, tax, total } = compute_totals(&items)?;

    Ok(QuotationRecord { id, created_at, client: client.clone(), items, subtotal, tax, total })
}
