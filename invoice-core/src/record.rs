use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::calc::compute;
use crate::domain::{DiscountSpec, LineItem, Party, TotalsBreakdown, nan_if_null};
use crate::draft::InvoiceDraft;
use crate::error::{InvoiceError, Result};
use crate::logo::LogoRef;

/// Immutable snapshot of a saved invoice.
///
/// Field names on the wire match the browser app's `localStorage` layout so
/// both can read the same collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    pub logo: Option<LogoRef>,
    pub company_info: Party,
    pub client_info: Party,
    pub items: Vec<LineItem>,
    #[serde(rename = "tax", deserialize_with = "nan_if_null")]
    pub tax_rate_percent: f64,
    pub discount: DiscountSpec,
    #[serde(rename = "currency")]
    pub currency_label: String,
    /// Save date, `YYYY-MM-DD`.
    #[serde(rename = "date")]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(deserialize_with = "nan_if_null")]
    pub total: f64,
}

impl InvoiceRecord {
    pub fn recompute(&self) -> TotalsBreakdown {
        compute(&self.items, self.tax_rate_percent, &self.discount)
    }

    /// True when the stored `total` is exactly what the inputs produce.
    /// A NaN total matches a NaN recomputation.
    pub fn is_consistent(&self) -> bool {
        let recomputed = self.recompute().total;
        recomputed.to_bits() == self.total.to_bits()
            || (recomputed.is_nan() && self.total.is_nan())
    }

    /// JSON has no NaN or infinity; such a record cannot be persisted.
    pub fn check_finite(&self) -> Result<()> {
        let bad = |field: String, v: f64| InvoiceError::InvalidNumericInput {
            field,
            input: v.to_string(),
        };
        for (i, item) in self.items.iter().enumerate() {
            if !item.quantity.is_finite() {
                return Err(bad(format!("items[{i}].quantity"), item.quantity));
            }
            if !item.rate.is_finite() {
                return Err(bad(format!("items[{i}].rate"), item.rate));
            }
        }
        for (field, v) in [
            ("tax", self.tax_rate_percent),
            ("discount.value", self.discount.value),
            ("total", self.total),
        ] {
            if !v.is_finite() {
                return Err(bad(field.to_string(), v));
            }
        }
        Ok(())
    }
}

/// Snapshot the draft into a record, stamped with today's date.
pub fn build_record(draft: &InvoiceDraft, totals: &TotalsBreakdown) -> InvoiceRecord {
    build_record_at(draft, totals, now())
}

pub fn build_record_at(
    draft: &InvoiceDraft,
    totals: &TotalsBreakdown,
    at: OffsetDateTime,
) -> InvoiceRecord {
    InvoiceRecord {
        logo: draft.logo.clone(),
        company_info: draft.company.clone(),
        client_info: draft.client.clone(),
        items: draft.items.clone(),
        tax_rate_percent: draft.tax_rate_percent,
        discount: draft.discount,
        currency_label: draft.currency.clone(),
        created_at: date_string(at),
        issue_date: Some(draft.issue_date.clone()),
        due_date: Some(draft.due_date.clone()),
        total: totals.total,
    }
}

pub(crate) fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

pub(crate) fn date_string(at: OffsetDateTime) -> String {
    let d = at.date();
    format!("{:04}-{:02}-{:02}", d.year(), u8::from(d.month()), d.day())
}
