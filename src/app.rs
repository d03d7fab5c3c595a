use anyhow::{Context, Result};
use std::path::Path;
use std::time::Instant;
use tracing::info;

use crate::exporter::{self, CustomerExporter};
use crate::importer::{CustomerImporter, ImportOptions};
use crate::{utils, Args};

/// Imports `input_path` and writes the report to `output_path`, or to the
/// terminal when no output path is given.
pub fn process_customer_data(
    input_path: &Path,
    output_path: Option<&Path>,
    options: ImportOptions,
) -> Result<()> {
    let total_start_time = Instant::now();
    info!(action = "start", component = "application", input = ?input_path, output = ?output_path, "Processing customer data");

    let data = CustomerImporter::new(input_path)
        .with_options(options)
        .import_domain_data()
        .with_context(|| format!("Failed to import customer data from {}", input_path.display()))?;

    match output_path {
        None => exporter::print_domain_data(&data).context("Failed to print customer data")?,
        Some(path) => CustomerExporter::new(path)
            .export_data(&data)
            .with_context(|| format!("Failed to export data to {}", path.display()))?,
    }

    info!(
        action = "complete",
        component = "application",
        domains = data.len(),
        duration_ms = total_start_time.elapsed().as_millis(),
        "Customer data processed"
    );
    Ok(())
}

pub fn run(args: &Args) -> Result<()> {
    utils::validate_args(args)?;

    let options = ImportOptions {
        workers: utils::resolve_workers(args),
        ..ImportOptions::default()
    };
    process_customer_data(&args.path, args.out.as_deref(), options)
}
