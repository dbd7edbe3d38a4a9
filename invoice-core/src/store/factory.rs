use std::path::PathBuf;

use crate::error::Result;
use crate::store::backend::{InvoiceStore, SlotInvoiceStore};
use crate::store::slot::{FsSlotStorage, MemSlotStorage};

pub enum Backend {
    /// `<dir>/invoices.json`
    Fs(PathBuf),
    Memory,
}

pub fn open_store(backend: Backend) -> Result<Box<dyn InvoiceStore>> {
    match backend {
        Backend::Fs(dir) => Ok(Box::new(SlotInvoiceStore::new(FsSlotStorage::new(&dir)?))),
        Backend::Memory => Ok(Box::new(SlotInvoiceStore::new(MemSlotStorage::new()))),
    }
}
