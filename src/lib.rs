pub mod app;
pub mod args;
pub mod domain;
pub mod error;
pub mod exporter;
pub mod importer;
pub mod lines;
pub mod stats;
pub mod utils;

pub use app::process_customer_data;
pub use args::Args;
pub use error::{ExportError, ImportError};
pub use exporter::CustomerExporter;
pub use importer::{CustomerImporter, ImportOptions};
pub use stats::{DomainCounts, DomainData};
