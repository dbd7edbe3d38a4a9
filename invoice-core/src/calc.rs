use crate::domain::{DiscountKind, DiscountSpec, LineItem, TotalsBreakdown};

/// Derive the totals breakdown for an invoice.
///
/// Nothing is clamped: negative quantities or rates, discounts larger than
/// the subtotal and tax rates outside `0..=100` all flow through as-is, and
/// NaN inputs propagate into every affected field. A flat discount applies
/// even when `items` is empty.
pub fn compute(
    items: &[LineItem],
    tax_rate_percent: f64,
    discount: &DiscountSpec,
) -> TotalsBreakdown {
    let subtotal = items.iter().fold(0.0, |sum, item| sum + item.amount());
    let tax_amount = subtotal * tax_rate_percent / 100.0;
    let discount_amount = match discount.kind {
        DiscountKind::Percentage => subtotal * discount.value / 100.0,
        DiscountKind::Flat => discount.value,
    };
    TotalsBreakdown {
        subtotal,
        tax_amount,
        discount_amount,
        total: subtotal + tax_amount - discount_amount,
    }
}
