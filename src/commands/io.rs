//! Import and export command handlers.

use anyhow::{Context, Result, bail};
use boardcsv::config::BoardCsvConfig;
use boardcsv::io::{
    CsvFileSource, DefaultFormatter, DirectorySink, ExportOptions, ExportService, Formatter,
    ImportOptions, ImportService,
};
use boardcsv::storage::{BoardDocument, MemoryRecordStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn formatter(config: &BoardCsvConfig) -> Arc<dyn Formatter> {
    Arc::new(DefaultFormatter::from_settings(&config.export, &config.import))
}

/// Executes the export command.
pub async fn cmd_export(
    config: &BoardCsvConfig,
    document: &Path,
    view_id: &str,
    output_dir: Option<PathBuf>,
    data_uri: bool,
) -> Result<()> {
    let doc = BoardDocument::load(document)
        .await
        .with_context(|| format!("loading board document {}", document.display()))?;

    let Some(view) = doc.view(view_id) else {
        bail!("view '{view_id}' not found in {}", document.display());
    };

    let output_dir = output_dir.unwrap_or_else(|| config.export.output_dir.clone());
    let service = ExportService::new(formatter(config))
        .with_options(ExportOptions::from_settings(&config.export));
    let records = doc.records_for_board();

    let Some(result) = service
        .export_to_sink(&doc.board, Some(view), &records, &DirectorySink::new(&output_dir))
        .await
        .context("exporting view")?
    else {
        println!("Nothing to export.");
        return Ok(());
    };

    println!("Export completed:");
    println!("  Rows:   {}", result.exported);
    println!("  File:   {}", result.output_path.display());
    if data_uri {
        println!();
        println!("{}", result.artifact.data_uri);
    }

    Ok(())
}

/// Executes the import command.
pub async fn cmd_import(config: &BoardCsvConfig, document: &Path, file: &Path) -> Result<()> {
    let mut doc = BoardDocument::load(document)
        .await
        .with_context(|| format!("loading board document {}", document.display()))?;

    let service = ImportService::new(formatter(config))
        .with_options(ImportOptions::from_settings(&config.import));
    let mut store = MemoryRecordStore::with_records(std::mem::take(&mut doc.records));

    let report = service
        .run(&doc.board, &CsvFileSource::new(file), &mut store)
        .await;
    doc.records = store.into_records();

    if let Some(message) = &report.message {
        println!("{message}");
    }

    let result = match report.outcome {
        Ok(result) => result,
        Err(e) => {
            // Records created before a rejection stay unless rollback is configured.
            doc.save(document)
                .await
                .with_context(|| format!("saving board document {}", document.display()))?;
            return Err(e).context("importing CSV");
        },
    };

    if result.has_imports() {
        doc.save(document)
            .await
            .with_context(|| format!("saving board document {}", document.display()))?;
    }

    println!("  Imported:   {}", result.imported());
    println!("  Rows:       {}", result.total_rows);

    if !result.warnings.is_empty() {
        println!();
        println!("Warnings ({}):", result.warnings.len());
        for warning in result.warnings.iter().take(10) {
            println!("  - {warning}");
        }
        if result.warnings.len() > 10 {
            println!("  ... and {} more", result.warnings.len() - 10);
        }
    }

    Ok(())
}
