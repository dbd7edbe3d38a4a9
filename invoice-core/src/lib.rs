#![forbid(unsafe_code)]

pub mod calc;
pub mod domain;
pub mod draft;
pub mod error;
pub mod export;
pub mod input;
pub mod items;
pub mod logo;
pub mod record;

pub mod store {
    pub mod backend;
    pub mod factory;
    pub mod slot;

    pub use backend::{InvoiceStore, STORE_KEY, SlotInvoiceStore};
    pub use factory::{Backend, open_store};
    pub use slot::{FsSlotStorage, MemSlotStorage, SlotStorage};
}

// Re-exports: stable API surface
pub use calc::compute;
pub use domain::{DiscountKind, DiscountSpec, LineItem, Party, TotalsBreakdown};
pub use draft::InvoiceDraft;
pub use export::{DocumentRenderer, ExportDocument, Language, TextRenderer};
pub use items::{ItemField, add_item, remove_item, update_field};
pub use logo::LogoRef;
pub use record::{InvoiceRecord, build_record};
