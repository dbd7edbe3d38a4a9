use std::path::Path;

use clap::Parser;
use invoice_core::error::InvoiceError;
use invoice_core::store::{Backend, open_store};
use invoicedev::application::run_to;
use invoicedev::presentation::cli::Cli;

fn run(data_dir: &Path, args: &[&str]) -> Result<String, InvoiceError> {
    let mut argv = vec!["invoicedev", "--data-dir", data_dir.to_str().unwrap()];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).unwrap();
    let mut out = Vec::new();
    run_to(cli, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn compute_prints_breakdown() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(dir.path(), &["compute", "--item", "Widget:2:10"]).unwrap();
    assert_eq!(
        out,
        "Sub Total: 20.00 USD\nTax (10%): 2.00 USD\nDiscount: 0.00 USD\nTotal: 22.00 USD\n"
    );
}

#[test]
fn compute_flat_discount_in_spanish() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(
        dir.path(),
        &[
            "compute",
            "--item",
            "A:1:100",
            "--tax",
            "0",
            "--discount",
            "15",
            "--discount-kind",
            "flat",
            "--currency",
            "EUR",
            "--lang",
            "es",
        ],
    )
    .unwrap();
    assert!(out.ends_with("Total: 85.00 EUR\n"));
    assert!(out.contains("Descuento: 15.00 EUR\n"));
}

#[test]
fn non_numeric_input_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let err = run(dir.path(), &["compute", "--item", "A:1:100", "--tax", "ten"]).unwrap_err();
    assert!(matches!(err, InvoiceError::InvalidNumericInput { field, .. } if field == "tax"));
    let err = run(dir.path(), &["save", "--item", "A:x:100"]).unwrap_err();
    assert!(matches!(err, InvoiceError::InvalidNumericInput { .. }));
    assert!(!dir.path().join("invoices.json").exists());
}

#[test]
fn save_list_show_duplicate_rm() {
    let dir = tempfile::tempdir().unwrap();
    run(
        dir.path(),
        &[
            "save",
            "--item",
            "Design:1:500",
            "--item",
            "Hosting:12:20",
            "--client-name",
            "Globex",
            "--logo-ref",
            "blob:session-1",
        ],
    )
    .unwrap();
    run(dir.path(), &["duplicate", "0", "--currency", "INR", "--client-name", "Initech"]).unwrap();

    let listing = run(dir.path(), &["list"]).unwrap();
    let lines: Vec<_> = listing.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("#0"));
    assert!(lines[0].contains("Globex"));
    assert!(lines[0].ends_with("814.00 USD"));
    assert!(lines[1].contains("Initech"));
    assert!(lines[1].ends_with("814.00 INR"));

    let shown = run(dir.path(), &["show", "1"]).unwrap();
    let v: serde_json::Value = serde_json::from_str(&shown).unwrap();
    assert_eq!(v["currency"], "INR");
    assert_eq!(v["logo"], "blob:session-1");
    assert_eq!(v["items"][1]["description"], "Hosting");

    run(dir.path(), &["rm", "0"]).unwrap();
    let store = open_store(Backend::Fs(dir.path().to_path_buf())).unwrap();
    let all = store.load_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].client_info.name, "Initech");

    let err = run(dir.path(), &["show", "5"]).unwrap_err();
    assert!(matches!(err, InvoiceError::IndexOutOfRange { index: 5, len: 1 }));
}

#[test]
fn embedded_logo_and_text_export() {
    let dir = tempfile::tempdir().unwrap();
    let logo = dir.path().join("logo.png");
    std::fs::write(&logo, [0x89, b'P', b'N', b'G']).unwrap();
    run(
        dir.path(),
        &[
            "save",
            "--item",
            "Widget:2:10",
            "--company-name",
            "Acme",
            "--client-details",
            "Globex\nAccounts",
            "--issue-date",
            "2026-10-01",
            "--due-date",
            "2026-10-31",
            "--logo",
            logo.to_str().unwrap(),
        ],
    )
    .unwrap();

    let text = run(dir.path(), &["export", "0", "--lang", "es"]).unwrap();
    assert!(text.starts_with("Factura\nFecha de Factura: 2026-10-01\n"));
    assert!(text.contains("Facturado A\nGlobex\nAccounts\n"));
    assert!(text.ends_with("Total: 22.00 USD\n"));

    let out_file = dir.path().join("invoice.txt");
    run(
        dir.path(),
        &["export", "0", "--out", out_file.to_str().unwrap()],
    )
    .unwrap();
    assert!(std::fs::read_to_string(&out_file).unwrap().starts_with("Invoice\n"));

    let store = open_store(Backend::Fs(dir.path().to_path_buf())).unwrap();
    let rec = store.get_by_index(0).unwrap();
    assert!(rec.logo.unwrap().is_durable());
}

#[test]
fn json_export_then_import_into_another_dir() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    run(a.path(), &["save", "--item", "A:1:1"]).unwrap();
    run(a.path(), &["save", "--item", "B:2:2"]).unwrap();

    let dump = a.path().join("dump.json");
    run(a.path(), &["export-json", "--out", dump.to_str().unwrap()]).unwrap();
    run(b.path(), &["save", "--item", "Existing:1:9"]).unwrap();
    run(b.path(), &["import-json", dump.to_str().unwrap()]).unwrap();

    let store = open_store(Backend::Fs(b.path().to_path_buf())).unwrap();
    let names: Vec<_> = store
        .load_all()
        .unwrap()
        .into_iter()
        .map(|r| r.items[0].description.clone())
        .collect();
    assert_eq!(names, ["Existing", "A", "B"]);
}

#[test]
fn corrupted_store_lists_empty_then_recovers() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("invoices.json"), "<html>").unwrap();

    assert_eq!(run(dir.path(), &["list"]).unwrap(), "");
    let err = run(dir.path(), &["save", "--item", "A:1:1"]).unwrap_err();
    assert!(matches!(err, InvoiceError::CorruptedStore { .. }));

    run(dir.path(), &["recover"]).unwrap();
    run(dir.path(), &["save", "--item", "A:1:1"]).unwrap();
    assert_eq!(run(dir.path(), &["list"]).unwrap().lines().count(), 1);
}
