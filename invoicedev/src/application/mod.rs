pub mod handlers;

use std::io::Write;

use crate::presentation::cli::{Cli, Commands};
use invoice_core::error::Result;
use invoice_core::store::{Backend, InvoiceStore, open_store};

pub fn run(cli: Cli) -> Result<()> {
    let mut out = std::io::stdout().lock();
    run_to(cli, &mut out)
}

pub fn run_to(cli: Cli, out: &mut dyn Write) -> Result<()> {
    let store = open_store(Backend::Fs(cli.data_dir))?;
    dispatch(cli.command, store.as_ref(), out)
}

pub fn dispatch(command: Commands, store: &dyn InvoiceStore, out: &mut dyn Write) -> Result<()> {
    match command {
        Commands::Compute(args) => handlers::handle_compute(args, out),
        Commands::Save(args) => handlers::handle_save(args, store, out),
        Commands::List => handlers::handle_list(store, out),
        Commands::Show { index } => handlers::handle_show(index, store, out),
        Commands::Duplicate {
            index,
            currency,
            client_name,
            due_date,
        } => handlers::handle_duplicate(index, currency, client_name, due_date, store, out),
        Commands::Rm { index } => handlers::handle_rm(index, store),
        Commands::Export { index, lang, out: path } => {
            handlers::handle_export(index, lang, path, store, out)
        }
        Commands::ExportJson { out: path } => handlers::handle_export_json(path, store, out),
        Commands::ImportJson { file } => handlers::handle_import_json(file, store),
        Commands::Recover => handlers::handle_recover(store),
    }
}
