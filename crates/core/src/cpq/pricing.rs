use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::cart::CartItem;
use crate::errors::PricingError;

/// Fixed 21% tax applied to every quotation.
pub const TAX_RATE: Decimal = Decimal::from_parts(21, 0, 0, false, 2);

/// Highest unit price a catalog may carry (one billion).
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl Totals {
    pub fn reconciles(&self) -> bool {
        let expected_tax = self.subtotal.checked_mul(TAX_RATE).map(round_to_cents);
        expected_tax == Some(self.tax) && self.subtotal.checked_add(self.tax) == Some(self.total)
    }
}

/// Sums the lines and applies tax. Fails instead of overflowing on absurd amounts.
pub fn compute_totals(items: &[CartItem]) -> Result<Totals, PricingError> {
    let sum = items
        .iter()
        .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.price))
        .ok_or(PricingError::Overflow)?;
    let subtotal = round_to_cents(sum);
    let tax = subtotal.checked_mul(TAX_RATE).map(round_to_cents).ok_or(PricingError::Overflow)?;
    let total = subtotal.checked_add(tax).ok_or(PricingError::Overflow)?;

    Ok(Totals { subtotal, tax, total })
}

/// Rounds half away from zero and pins the scale to two places (`150` becomes `150.00`).
pub fn round_to_cents(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

pub fn format_amount(amount: Decimal) -> String {
    round_to_cents(amount).to_string()
}
