use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cpq::pricing::{compute_totals, Totals};
use crate::errors::PricingError;
use crate::domain::service::{Service, ServiceId};

/// Value copy of a [`Service`] taken when it was added to the cart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub service_id: ServiceId,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&Service> for CartItem {
    fn from(service: &Service) -> Self {
        Self {
            service_id: service.id,
            name: service.name.clone(),
            category: service.category.clone(),
            price: service.price,
            description: service.description.clone(),
        }
    }
}

/// Lines in insertion order. Adding the same service twice yields two lines.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, service: &Service) -> &CartItem {
        self.items.push(CartItem::from(service));
        let last = self.items.len() - 1;
        &self.items[last]
    }

    /// Removes the first line for `service_id`. Leaves the cart untouched when absent.
    pub fn remove(&mut self, service_id: ServiceId) -> Option<CartItem> {
        let position = self.items.iter().position(|item| item.service_id == service_id)?;
        Some(self.items.remove(position))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn totals(&self) -> Result<Totals, PricingError> {
        compute_totals(&self.items)
    }
}
