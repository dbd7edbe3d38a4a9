//! What the core hands to document renderers, plus JSON export/import of
//! the saved collection.

use std::io::Write;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{Party, TotalsBreakdown};
use crate::draft::InvoiceDraft;
use crate::error::{InvoiceError, Result};
use crate::logo::LogoRef;
use crate::record::InvoiceRecord;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
}

impl FromStr for Language {
    type Err = InvoiceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "es" => Ok(Self::Es),
            other => Err(InvoiceError::Format(format!("unknown language {other:?}"))),
        }
    }
}

/// Document captions for one language.
#[derive(Clone, Copy, Debug)]
pub struct Labels {
    pub invoice: &'static str,
    pub invoice_date: &'static str,
    pub due_date: &'static str,
    pub company_info: &'static str,
    pub recipient: &'static str,
    pub description: &'static str,
    pub quantity: &'static str,
    pub rate: &'static str,
    pub amount: &'static str,
    pub subtotal: &'static str,
    pub tax: &'static str,
    pub discount: &'static str,
    pub total: &'static str,
}

const EN: Labels = Labels {
    invoice: "Invoice",
    invoice_date: "Invoice Date",
    due_date: "Due Date",
    company_info: "Company Information",
    recipient: "Billed To",
    description: "Item Description",
    quantity: "Qty",
    rate: "Rate",
    amount: "Amount",
    subtotal: "Sub Total",
    tax: "Tax",
    discount: "Discount",
    total: "Total",
};

const ES: Labels = Labels {
    invoice: "Factura",
    invoice_date: "Fecha de Factura",
    due_date: "Fecha de Vencimiento",
    company_info: "Información de la Empresa",
    recipient: "Facturado A",
    description: "Descripción",
    quantity: "Cant.",
    rate: "Tarifa",
    amount: "Importe",
    subtotal: "Subtotal",
    tax: "Impuesto",
    discount: "Descuento",
    total: "Total",
};

impl Language {
    pub fn labels(self) -> &'static Labels {
        match self {
            Self::En => &EN,
            Self::Es => &ES,
        }
    }
}

/// Two-decimal display form of an amount.
pub fn format_amount(v: f64) -> String {
    format!("{v:.2}")
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExportRow {
    pub description: String,
    pub quantity: f64,
    pub rate: f64,
    pub amount: f64,
}

/// Everything a renderer needs: header text, rows and a totals breakdown
/// that is always recomputed from the rows.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportDocument {
    pub language: Language,
    pub logo: Option<LogoRef>,
    pub company: Party,
    pub client: Party,
    pub currency: String,
    pub date: String,
    pub due_date: Option<String>,
    pub tax_rate_percent: f64,
    pub rows: Vec<ExportRow>,
    pub totals: TotalsBreakdown,
}

impl ExportDocument {
    pub fn from_record(rec: &InvoiceRecord, language: Language) -> Self {
        Self {
            language,
            logo: rec.logo.clone(),
            company: rec.company_info.clone(),
            client: rec.client_info.clone(),
            currency: rec.currency_label.clone(),
            date: rec.issue_date.clone().unwrap_or_else(|| rec.created_at.clone()),
            due_date: rec.due_date.clone(),
            tax_rate_percent: rec.tax_rate_percent,
            rows: rows(&rec.items),
            totals: rec.recompute(),
        }
    }

    pub fn from_draft(draft: &InvoiceDraft) -> Self {
        Self {
            language: draft.language,
            logo: draft.logo.clone(),
            company: draft.company.clone(),
            client: draft.client.clone(),
            currency: draft.currency.clone(),
            date: draft.issue_date.clone(),
            due_date: Some(draft.due_date.clone()),
            tax_rate_percent: draft.tax_rate_percent,
            rows: rows(&draft.items),
            totals: draft.totals(),
        }
    }
}

fn rows(items: &[crate::domain::LineItem]) -> Vec<ExportRow> {
    items
        .iter()
        .map(|i| ExportRow {
            description: i.description.clone(),
            quantity: i.quantity,
            rate: i.rate,
            amount: i.amount(),
        })
        .collect()
}

pub trait DocumentRenderer {
    /// File extension of the produced document, without the dot.
    fn extension(&self) -> &'static str;

    fn render(&self, doc: &ExportDocument) -> Result<Vec<u8>>;
}

/// Plain-text invoice; amounts with two decimals.
pub struct TextRenderer;

impl DocumentRenderer for TextRenderer {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, doc: &ExportDocument) -> Result<Vec<u8>> {
        let l = doc.language.labels();
        let cur = &doc.currency;
        let mut out = Vec::with_capacity(1024);

        writeln!(out, "{}", l.invoice)?;
        writeln!(out, "{}: {}", l.invoice_date, doc.date)?;
        if let Some(due) = &doc.due_date {
            writeln!(out, "{}: {}", l.due_date, due)?;
        }
        writeln!(out)?;
        write_party(&mut out, l.company_info, &doc.company)?;
        write_party(&mut out, l.recipient, &doc.client)?;

        writeln!(
            out,
            "{:<32} {:>8} {:>12} {:>12}",
            l.description, l.quantity, l.rate, l.amount
        )?;
        for r in &doc.rows {
            writeln!(
                out,
                "{:<32} {:>8} {:>12} {:>12}",
                r.description,
                r.quantity,
                format_amount(r.rate),
                format_amount(r.amount)
            )?;
        }
        writeln!(out)?;

        let t = &doc.totals;
        writeln!(out, "{}: {} {cur}", l.subtotal, format_amount(t.subtotal))?;
        writeln!(
            out,
            "{} ({}%): {} {cur}",
            l.tax,
            doc.tax_rate_percent,
            format_amount(t.tax_amount)
        )?;
        writeln!(out, "{}: {} {cur}", l.discount, format_amount(t.discount_amount))?;
        writeln!(out, "{}: {} {cur}", l.total, format_amount(t.total))?;
        Ok(out)
    }
}

fn write_party(out: &mut Vec<u8>, caption: &str, p: &Party) -> Result<()> {
    writeln!(out, "{caption}")?;
    if !p.name.is_empty() {
        writeln!(out, "{}", p.name)?;
    }
    for line in p.details.lines() {
        writeln!(out, "{line}")?;
    }
    writeln!(out)?;
    Ok(())
}

pub fn export_json(records: &[InvoiceRecord]) -> Result<String> {
    serde_json::to_string_pretty(records)
        .map_err(|e| InvoiceError::Format(format!("export json: {e}")))
}

/// Accepts a collection (as written by [`export_json`]) or a single record.
pub fn import_json(text: &str) -> Result<Vec<InvoiceRecord>> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Import {
        Many(Vec<InvoiceRecord>),
        One(Box<InvoiceRecord>),
    }

    let parsed: Import = serde_json::from_str(text)
        .map_err(|e| InvoiceError::Format(format!("import json: {e}")))?;
    Ok(match parsed {
        Import::Many(v) => v,
        Import::One(r) => vec![*r],
    })
}
