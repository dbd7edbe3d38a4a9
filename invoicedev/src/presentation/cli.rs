use clap::{Args, Parser, Subcommand, ValueEnum};
use invoice_core::DiscountKind;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "invoicedev CLI", long_about = None)]
pub struct Cli {
    /// Directory holding the saved collection (invoices.json)
    #[arg(long, global = true, env = "INVOICE_DATA_DIR", default_value = ".invoices")]
    pub data_dir: PathBuf,

    /// Debug logging on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum DiscountArg {
    Percentage,
    Flat,
}

impl From<DiscountArg> for DiscountKind {
    fn from(d: DiscountArg) -> Self {
        match d {
            DiscountArg::Percentage => DiscountKind::Percentage,
            DiscountArg::Flat => DiscountKind::Flat,
        }
    }
}

/// Invoice fields, the command-line stand-in for the form.
#[derive(Args, Clone, Debug)]
pub struct InvoiceArgs {
    /// Line item as description:quantity:rate (repeatable)
    #[arg(long = "item")]
    pub items: Vec<String>,

    /// Tax rate in percent
    #[arg(long, default_value = "10")]
    pub tax: String,

    /// Discount value; percent of subtotal or flat amount per --discount-kind
    #[arg(long, default_value = "0")]
    pub discount: String,

    #[arg(long = "discount-kind", value_enum, default_value_t = DiscountArg::Percentage)]
    pub discount_kind: DiscountArg,

    /// Currency label (display only, never converted)
    #[arg(long, default_value = "USD")]
    pub currency: String,

    #[arg(long = "company-name", default_value = "")]
    pub company_name: String,
    #[arg(long = "company-details", default_value = "")]
    pub company_details: String,
    #[arg(long = "client-name", default_value = "")]
    pub client_name: String,
    #[arg(long = "client-details", default_value = "")]
    pub client_details: String,

    /// Image file to embed as the logo
    #[arg(long, conflicts_with = "logo_ref")]
    pub logo: Option<PathBuf>,

    /// Opaque logo handle, stored as given
    #[arg(long = "logo-ref")]
    pub logo_ref: Option<String>,

    /// Invoice date, YYYY-MM-DD (defaults to today)
    #[arg(long = "issue-date")]
    pub issue_date: Option<String>,

    /// Due date, YYYY-MM-DD (defaults to today)
    #[arg(long = "due-date")]
    pub due_date: Option<String>,

    /// Caption language for printed totals (en, es)
    #[arg(long, default_value = "en")]
    pub lang: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the totals breakdown without saving
    Compute(InvoiceArgs),

    /// Save an invoice to the collection
    Save(InvoiceArgs),

    /// List saved invoices in save order
    List,

    /// Print one saved invoice as JSON
    Show { index: usize },

    /// Load a saved invoice, apply overrides, save it as a new one
    Duplicate {
        index: usize,
        #[arg(long)]
        currency: Option<String>,
        #[arg(long = "client-name")]
        client_name: Option<String>,
        #[arg(long = "due-date")]
        due_date: Option<String>,
    },

    /// Remove a saved invoice
    Rm { index: usize },

    /// Render a saved invoice as a text document
    Export {
        index: usize,
        /// Document language (en, es)
        #[arg(long, default_value = "en")]
        lang: String,
        /// Output file; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Write the whole collection as JSON
    ExportJson {
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Append invoices from a JSON file (collection or single invoice)
    ImportJson { file: PathBuf },

    /// Move a corrupted collection aside and start empty
    Recover,
}
