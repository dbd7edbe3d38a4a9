use std::io::Write;
use std::path::PathBuf;

use invoice_core::error::{InvoiceError, Result};
use invoice_core::export::{ExportDocument, Language, export_json, format_amount, import_json};
use invoice_core::input::parse_item_spec;
use invoice_core::store::InvoiceStore;
use invoice_core::{DocumentRenderer, InvoiceDraft, InvoiceRecord, LogoRef, Party, TextRenderer};
use tracing::warn;

use crate::presentation::cli::InvoiceArgs;

fn draft_from_args(args: InvoiceArgs) -> Result<InvoiceDraft> {
    let mut draft = InvoiceDraft::default();
    if !args.items.is_empty() {
        draft.items = args
            .items
            .iter()
            .map(|s| parse_item_spec(s))
            .collect::<Result<_>>()?;
    }
    draft.set_tax_text(&args.tax)?;
    draft.set_discount_text(args.discount_kind.into(), &args.discount)?;
    draft.currency = args.currency;
    draft.language = args.lang.parse()?;
    draft.company = Party {
        name: args.company_name,
        details: args.company_details,
    };
    draft.client = Party {
        name: args.client_name,
        details: args.client_details,
    };
    draft.logo = match (args.logo, args.logo_ref) {
        (Some(path), _) => Some(LogoRef::from_file(&path)?),
        (None, Some(handle)) => Some(LogoRef::Session(handle)),
        (None, None) => None,
    };
    if let Some(d) = args.issue_date {
        draft.issue_date = d;
    }
    if let Some(d) = args.due_date {
        draft.due_date = d;
    }
    Ok(draft)
}

fn print_totals(draft: &InvoiceDraft, out: &mut dyn Write) -> Result<()> {
    let l = draft.language.labels();
    let t = draft.totals();
    let cur = &draft.currency;
    writeln!(out, "{}: {} {cur}", l.subtotal, format_amount(t.subtotal))?;
    writeln!(
        out,
        "{} ({}%): {} {cur}",
        l.tax,
        draft.tax_rate_percent,
        format_amount(t.tax_amount)
    )?;
    writeln!(out, "{}: {} {cur}", l.discount, format_amount(t.discount_amount))?;
    writeln!(out, "{}: {} {cur}", l.total, format_amount(t.total))?;
    Ok(())
}

fn client_label(rec: &InvoiceRecord) -> &str {
    let c = &rec.client_info;
    if !c.name.is_empty() {
        return &c.name;
    }
    c.details.lines().next().filter(|l| !l.is_empty()).unwrap_or("-")
}

fn write_or_print(path: Option<PathBuf>, bytes: &[u8], out: &mut dyn Write) -> Result<()> {
    match path {
        Some(p) => {
            std::fs::write(&p, bytes)?;
            eprintln!("wrote {}", p.display());
        }
        None => out.write_all(bytes)?,
    }
    Ok(())
}

pub fn handle_compute(args: InvoiceArgs, out: &mut dyn Write) -> Result<()> {
    let draft = draft_from_args(args)?;
    print_totals(&draft, out)
}

pub fn handle_save(args: InvoiceArgs, store: &dyn InvoiceStore, out: &mut dyn Write) -> Result<()> {
    let draft = draft_from_args(args)?;
    print_totals(&draft, out)?;
    let all = store.append(draft.snapshot())?;
    eprintln!("save: #{} ({} saved)", all.len() - 1, all.len());
    Ok(())
}

pub fn handle_list(store: &dyn InvoiceStore, out: &mut dyn Write) -> Result<()> {
    let records = match store.load_all() {
        Ok(r) => r,
        Err(e @ InvoiceError::CorruptedStore { .. }) => {
            warn!("{e}");
            eprintln!("list: saved invoices unreadable; run `recover` to reset");
            Vec::new()
        }
        Err(e) => return Err(e),
    };
    for (i, rec) in records.iter().enumerate() {
        writeln!(
            out,
            "#{:<4} {:<10}  {:<24} {:>12} {}",
            i,
            rec.created_at,
            client_label(rec),
            format_amount(rec.total),
            rec.currency_label
        )?;
    }
    Ok(())
}

pub fn handle_show(index: usize, store: &dyn InvoiceStore, out: &mut dyn Write) -> Result<()> {
    let rec = store.get_by_index(index)?;
    let json = serde_json::to_string_pretty(&rec)
        .map_err(|e| InvoiceError::Format(format!("show: {e}")))?;
    writeln!(out, "{json}")?;
    Ok(())
}

pub fn handle_duplicate(
    index: usize,
    currency: Option<String>,
    client_name: Option<String>,
    due_date: Option<String>,
    store: &dyn InvoiceStore,
    out: &mut dyn Write,
) -> Result<()> {
    let rec = store.get_by_index(index)?;
    let mut draft = InvoiceDraft::default();
    draft.load_record(&rec);
    if let Some(c) = currency {
        draft.currency = c;
    }
    if let Some(n) = client_name {
        draft.client.name = n;
    }
    if let Some(d) = due_date {
        draft.due_date = d;
    }
    print_totals(&draft, out)?;
    let all = store.append(draft.snapshot())?;
    eprintln!("duplicate: #{} -> #{}", index, all.len() - 1);
    Ok(())
}

pub fn handle_rm(index: usize, store: &dyn InvoiceStore) -> Result<()> {
    let rec = store.remove(index)?;
    eprintln!("rm: #{} ({})", index, client_label(&rec));
    Ok(())
}

pub fn handle_export(
    index: usize,
    lang: String,
    path: Option<PathBuf>,
    store: &dyn InvoiceStore,
    out: &mut dyn Write,
) -> Result<()> {
    let language: Language = lang.parse()?;
    let rec = store.get_by_index(index)?;
    if rec.logo.as_ref().is_some_and(|l| !l.is_durable()) {
        warn!(index, "logo is a session handle and may no longer resolve");
    }
    let doc = ExportDocument::from_record(&rec, language);
    let bytes = TextRenderer.render(&doc)?;
    write_or_print(path, &bytes, out)
}

pub fn handle_export_json(
    path: Option<PathBuf>,
    store: &dyn InvoiceStore,
    out: &mut dyn Write,
) -> Result<()> {
    let mut json = export_json(&store.load_all()?)?;
    json.push('\n');
    write_or_print(path, json.as_bytes(), out)
}

pub fn handle_import_json(file: PathBuf, store: &dyn InvoiceStore) -> Result<()> {
    let text = std::fs::read_to_string(&file)?;
    let incoming = import_json(&text)?;
    let n = incoming.len();
    let all = store.extend(incoming)?;
    eprintln!("import-json: {} added from {} ({} saved)", n, file.display(), all.len());
    Ok(())
}

pub fn handle_recover(store: &dyn InvoiceStore) -> Result<()> {
    match store.quarantine()? {
        Some(aside) => eprintln!("recover: corrupted collection moved to \"{aside}\""),
        None => eprintln!("recover: collection is healthy, nothing to do"),
    }
    Ok(())
}
