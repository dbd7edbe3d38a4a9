use crate::calc::compute;
use crate::domain::{DiscountKind, DiscountSpec, LineItem, Party, TotalsBreakdown};
use crate::error::Result;
use crate::export::Language;
use crate::input::parse_number;
use crate::items::{self, ItemField};
use crate::logo::LogoRef;
use crate::record::{self, InvoiceRecord};

/// Mutable editing state owned by whoever drives the form.
///
/// Records are produced from it by value through [`InvoiceDraft::snapshot`];
/// nothing in a record points back here.
#[derive(Clone, Debug, PartialEq)]
pub struct InvoiceDraft {
    pub logo: Option<LogoRef>,
    pub company: Party,
    pub client: Party,
    pub items: Vec<LineItem>,
    pub tax_rate_percent: f64,
    pub discount: DiscountSpec,
    pub currency: String,
    pub language: Language,
    pub issue_date: String,
    pub due_date: String,
}

impl Default for InvoiceDraft {
    fn default() -> Self {
        let today = record::date_string(record::now());
        Self {
            logo: None,
            company: Party::default(),
            client: Party::default(),
            items: vec![LineItem::default()],
            tax_rate_percent: 10.0,
            discount: DiscountSpec::default(),
            currency: "USD".to_string(),
            language: Language::En,
            issue_date: today.clone(),
            due_date: today,
        }
    }
}

impl InvoiceDraft {
    pub fn totals(&self) -> TotalsBreakdown {
        compute(&self.items, self.tax_rate_percent, &self.discount)
    }

    pub fn add_item(&mut self) {
        self.items = items::add_item(&self.items);
    }

    pub fn remove_item(&mut self, index: usize) {
        self.items = items::remove_item(&self.items, index);
    }

    pub fn update_item(&mut self, index: usize, field: ItemField) -> Result<()> {
        self.items = items::update_field(&self.items, index, field)?;
        Ok(())
    }

    pub fn set_tax_text(&mut self, text: &str) -> Result<()> {
        self.tax_rate_percent = parse_number("tax", text)?;
        Ok(())
    }

    pub fn set_discount_text(&mut self, kind: DiscountKind, text: &str) -> Result<()> {
        self.discount = DiscountSpec {
            kind,
            value: parse_number("discount", text)?,
        };
        Ok(())
    }

    /// Freeze the current state into a record with freshly computed totals.
    pub fn snapshot(&self) -> InvoiceRecord {
        record::build_record(self, &self.totals())
    }

    /// Copy a saved record back into the editor. Language is a view setting
    /// and is left alone; dates are only replaced when the record has them.
    pub fn load_record(&mut self, rec: &InvoiceRecord) {
        self.logo = rec.logo.clone();
        self.company = rec.company_info.clone();
        self.client = rec.client_info.clone();
        self.items = rec.items.clone();
        self.tax_rate_percent = rec.tax_rate_percent;
        self.discount = rec.discount;
        self.currency = rec.currency_label.clone();
        if let Some(d) = &rec.issue_date {
            self.issue_date = d.clone();
        }
        if let Some(d) = &rec.due_date {
            self.due_date = d.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvoiceError;

    #[test]
    fn defaults_match_fresh_form() {
        let d = InvoiceDraft::default();
        assert_eq!(d.items, vec![LineItem::new("", 1.0, 0.0)]);
        assert_eq!(d.tax_rate_percent, 10.0);
        assert_eq!(d.discount, DiscountSpec::percentage(0.0));
        assert_eq!(d.currency, "USD");
        assert_eq!(d.issue_date.len(), 10);
        assert_eq!(d.totals().total, 0.0);
    }

    #[test]
    fn edits_flow_into_totals() {
        let mut d = InvoiceDraft::default();
        d.update_item(0, ItemField::Description("Widget".into())).unwrap();
        d.update_item(0, ItemField::Quantity(2.0)).unwrap();
        d.update_item(0, ItemField::Rate(10.0)).unwrap();
        assert_eq!(d.totals().total, 22.0);

        d.add_item();
        d.update_item(1, ItemField::Rate(5.0)).unwrap();
        d.set_discount_text(DiscountKind::Flat, "3").unwrap();
        assert_eq!(d.totals().subtotal, 25.0);
        assert_eq!(d.totals().total, 24.5);

        d.remove_item(0);
        assert_eq!(d.items.len(), 1);
    }

    #[test]
    fn bad_text_leaves_state_untouched() {
        let mut d = InvoiceDraft::default();
        let err = d.set_tax_text("ten").unwrap_err();
        assert!(matches!(err, InvoiceError::InvalidNumericInput { .. }));
        assert_eq!(d.tax_rate_percent, 10.0);
    }

    #[test]
    fn load_record_restores_fields() {
        let mut src = InvoiceDraft::default();
        src.client.name = "Globex".into();
        src.items = vec![LineItem::new("b", 1.0, 2.0), LineItem::new("a", 3.0, 4.0)];
        src.currency = "INR".into();
        src.due_date = "2026-12-31".into();
        src.logo = Some(LogoRef::Session("blob:1".into()));
        let rec = src.snapshot();

        let mut d = InvoiceDraft {
            language: Language::Es,
            ..InvoiceDraft::default()
        };
        d.load_record(&rec);
        assert_eq!(d.items, src.items);
        assert_eq!(d.client, src.client);
        assert_eq!(d.currency, "INR");
        assert_eq!(d.due_date, "2026-12-31");
        assert_eq!(d.logo, src.logo);
        assert_eq!(d.language, Language::Es);
    }
}
