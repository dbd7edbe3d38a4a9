use std::sync::{Mutex, MutexGuard};

use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::error::{InvoiceError, Result};
use crate::record::InvoiceRecord;
use crate::store::slot::SlotStorage;

/// Slot holding the whole collection as one JSON array.
pub const STORE_KEY: &str = "invoices";

/// Ordered collection of saved invoices; insertion order is save order.
pub trait InvoiceStore: Send + Sync {
    /// Never-written storage yields an empty collection.
    fn load_all(&self) -> Result<Vec<InvoiceRecord>>;

    /// Add `record` at the end and return the new full collection.
    fn append(&self, record: InvoiceRecord) -> Result<Vec<InvoiceRecord>>;

    fn get_by_index(&self, index: usize) -> Result<InvoiceRecord>;

    /// Remove and return the record at `index`.
    fn remove(&self, index: usize) -> Result<InvoiceRecord>;

    /// Append several records in one write.
    fn extend(&self, records: Vec<InvoiceRecord>) -> Result<Vec<InvoiceRecord>>;

    /// In-memory mirror of the last collection read or written.
    fn cached(&self) -> Result<Vec<InvoiceRecord>>;

    /// Move an undecodable collection aside and start over empty.
    /// Returns the key it was moved to, or `None` if the slot was fine.
    fn quarantine(&self) -> Result<Option<String>>;
}

/// Writes re-read the slot before committing; a slot changed by another
/// process in between is re-applied at most this many times.
const WRITE_ATTEMPTS: usize = 3;

/// [`InvoiceStore`] over any [`SlotStorage`].
///
/// The mirror mutex doubles as the writer lock: it is held for the whole
/// read-modify-write, so overlapping saves through one store are applied one
/// after another. Other processes are detected by comparing the slot text
/// just before the write with what the edit started from. The mirror is
/// filled from the slot on first use and only changes after a write succeeded.
pub struct SlotInvoiceStore<S: SlotStorage> {
    slots: S,
    key: String,
    mirror: Mutex<Option<Vec<InvoiceRecord>>>,
}

impl<S: SlotStorage> SlotInvoiceStore<S> {
    pub fn new(slots: S) -> Self {
        Self::with_key(slots, STORE_KEY)
    }

    pub fn with_key(slots: S, key: &str) -> Self {
        Self {
            slots,
            key: key.to_string(),
            mirror: Mutex::new(None),
        }
    }

    pub fn slots(&self) -> &S {
        &self.slots
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Vec<InvoiceRecord>>>> {
        Ok(self
            .mirror
            .lock()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?)
    }

    fn read_slot(&self) -> Result<Vec<InvoiceRecord>> {
        let text = self.slots.read(&self.key)?;
        self.parse(text.as_deref())
    }

    fn parse(&self, text: Option<&str>) -> Result<Vec<InvoiceRecord>> {
        let Some(text) = text else {
            return Ok(Vec::new());
        };
        let records = decode(&self.key, text)?;
        for (index, rec) in records.iter().enumerate() {
            if !rec.is_consistent() {
                warn!(
                    key = %self.key,
                    index,
                    stored = rec.total,
                    recomputed = rec.recompute().total,
                    "stored total does not match its items"
                );
            }
        }
        debug!(key = %self.key, count = records.len(), "collection loaded");
        Ok(records)
    }

    /// Read-modify-write under the lock; `f` edits a copy, mirror follows on success.
    ///
    /// `f` may run more than once when the slot changes underneath.
    fn update<T>(&self, mut f: impl FnMut(&mut Vec<InvoiceRecord>) -> Result<T>) -> Result<T> {
        let mut mirror = self.lock()?;
        for attempt in 1..=WRITE_ATTEMPTS {
            let base = self.slots.read(&self.key)?;
            let mut records = self.parse(base.as_deref())?;
            let out = f(&mut records)?;
            let text = serde_json::to_string(&records)
                .map_err(|e| InvoiceError::Format(format!("encode {}: {e}", self.key)))?;
            if self.slots.read(&self.key)? != base {
                debug!(key = %self.key, attempt, "collection changed during write, retrying");
                continue;
            }
            self.slots.write(&self.key, &text)?;
            debug!(key = %self.key, count = records.len(), "collection written");
            *mirror = Some(records);
            return Ok(out);
        }
        warn!(key = %self.key, attempts = WRITE_ATTEMPTS, "giving up on a contended write");
        Err(InvoiceError::Conflict {
            key: self.key.clone(),
        })
    }

    /// Slot holding something, decodable or not.
    fn occupied(&self, key: &str) -> Result<bool> {
        match self.slots.read(key) {
            Ok(text) => Ok(text.is_some()),
            Err(InvoiceError::CorruptedStore { .. }) => Ok(true),
            Err(e) => Err(e),
        }
    }

    /// `<key>.corrupt-<unix-ts>`, with `-1`, `-2`, ... appended while taken.
    fn quarantine_key(&self) -> Result<String> {
        let base = format!(
            "{}.corrupt-{}",
            self.key,
            OffsetDateTime::now_utc().unix_timestamp()
        );
        let mut candidate = base.clone();
        let mut n = 0;
        while self.occupied(&candidate)? {
            n += 1;
            candidate = format!("{base}-{n}");
        }
        Ok(candidate)
    }
}

fn decode(key: &str, text: &str) -> Result<Vec<InvoiceRecord>> {
    // a literal `null` is what the browser app leaves behind for "nothing saved"
    let parsed: Option<Vec<InvoiceRecord>> =
        serde_json::from_str(text).map_err(|e| InvoiceError::CorruptedStore {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
    Ok(parsed.unwrap_or_default())
}

impl<S: SlotStorage> InvoiceStore for SlotInvoiceStore<S> {
    fn load_all(&self) -> Result<Vec<InvoiceRecord>> {
        let mut mirror = self.lock()?;
        let records = self.read_slot()?;
        *mirror = Some(records.clone());
        Ok(records)
    }

    fn append(&self, record: InvoiceRecord) -> Result<Vec<InvoiceRecord>> {
        record.check_finite()?;
        self.update(|records| {
            records.push(record.clone());
            Ok(records.clone())
        })
    }

    fn get_by_index(&self, index: usize) -> Result<InvoiceRecord> {
        let records = self.load_all()?;
        let len = records.len();
        records
            .into_iter()
            .nth(index)
            .ok_or(InvoiceError::IndexOutOfRange { index, len })
    }

    fn remove(&self, index: usize) -> Result<InvoiceRecord> {
        self.update(|records| {
            if index >= records.len() {
                return Err(InvoiceError::IndexOutOfRange {
                    index,
                    len: records.len(),
                });
            }
            Ok(records.remove(index))
        })
    }

    fn extend(&self, incoming: Vec<InvoiceRecord>) -> Result<Vec<InvoiceRecord>> {
        for rec in &incoming {
            rec.check_finite()?;
        }
        self.update(|records| {
            records.extend(incoming.iter().cloned());
            Ok(records.clone())
        })
    }

    fn cached(&self) -> Result<Vec<InvoiceRecord>> {
        let mut mirror = self.lock()?;
        if let Some(records) = mirror.as_ref() {
            return Ok(records.clone());
        }
        let records = self.read_slot()?;
        *mirror = Some(records.clone());
        Ok(records)
    }

    fn quarantine(&self) -> Result<Option<String>> {
        let mut mirror = self.lock()?;
        let text = match self.slots.read(&self.key) {
            Ok(Some(text)) => text,
            Ok(None) => return Ok(None),
            Err(InvoiceError::CorruptedStore { .. }) => String::new(),
            Err(e) => return Err(e),
        };
        if !text.is_empty() && decode(&self.key, &text).is_ok() {
            return Ok(None);
        }
        let aside = self.quarantine_key()?;
        self.slots.rename(&self.key, &aside)?;
        *mirror = Some(Vec::new());
        warn!(key = %self.key, moved_to = %aside, "corrupted collection quarantined");
        Ok(Some(aside))
    }
}
