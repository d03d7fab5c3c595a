use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::error::ExportError;
use crate::stats::DomainData;

pub const HEADERS: [&str; 2] = ["domain", "number_of_customers"];

/// Writes domain data to a CSV file.
#[derive(Debug, Clone)]
pub struct CustomerExporter {
    output_path: PathBuf,
}

impl CustomerExporter {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Creates (or truncates) the output file and writes every row to it.
    pub fn export_data(&self, data: &[DomainData]) -> Result<(), ExportError> {
        let file = File::create(&self.output_path).map_err(|source| {
            error!(action = "create", component = "csv_export", path = ?self.output_path, error = %source, "Failed to create output file");
            ExportError::Create {
                path: self.output_path.clone(),
                source,
            }
        })?;

        write_csv(data, file, &self.output_path)?;

        info!(action = "complete", component = "csv_export", path = ?self.output_path, rows = data.len(), "CSV export completed");
        Ok(())
    }
}

/// Writes the header row and one row per entry, then flushes.
///
/// `path` only labels errors.
pub fn write_csv<W: Write>(data: &[DomainData], output: W, path: &Path) -> Result<(), ExportError> {
    let write_error = |source: csv::Error| {
        error!(action = "write", component = "csv_export", path = ?path, error = %source, "Failed to write CSV record");
        ExportError::Write {
            path: path.to_path_buf(),
            source,
        }
    };

    // the header goes out explicitly so an empty report still has one
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(output);

    writer.write_record(HEADERS).map_err(write_error)?;
    for entry in data {
        writer.serialize(entry).map_err(write_error)?;
    }

    writer.flush().map_err(|source| {
        error!(action = "flush", component = "csv_export", path = ?path, error = %source, "CSV writer flush failed");
        ExportError::Flush {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Plain `domain,count` lines for the terminal. Domains are written as the
/// raw input bytes, unquoted.
pub fn render_terminal<W: Write>(data: &[DomainData], mut output: W) -> io::Result<()> {
    writeln!(output, "{}", HEADERS.join(","))?;
    for entry in data {
        output.write_all(&entry.domain)?;
        writeln!(output, ",{}", entry.customer_quantity)?;
    }
    output.flush()
}

/// Renders to stdout through a buffered, locked handle.
pub fn print_domain_data(data: &[DomainData]) -> Result<(), ExportError> {
    let stdout = io::stdout();
    let output = io::BufWriter::new(stdout.lock());
    render_terminal(data, output).map_err(ExportError::Terminal)
}
