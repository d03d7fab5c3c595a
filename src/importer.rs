use rayon::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info};

use crate::error::ImportError;
use crate::lines::{LineReader, DEFAULT_MAX_LINE_BYTES, READ_BUFFER_SIZE};
use crate::stats::{DomainCounts, DomainData};

/// Lines handed to the worker pool at a time in sharded mode.
pub const DEFAULT_BATCH_LINES: usize = 16 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    /// `None` scans on the calling thread; `Some(n)` shards each batch of
    /// lines across a pool of `n` threads.
    pub workers: Option<usize>,
    pub batch_lines: usize,
    pub max_line_bytes: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            workers: None,
            batch_lines: DEFAULT_BATCH_LINES,
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
        }
    }
}

/// Reads a customer file and tallies customers per email domain.
#[derive(Debug, Clone)]
pub struct CustomerImporter {
    path: PathBuf,
    options: ImportOptions,
}

impl CustomerImporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            options: ImportOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ImportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the configured file and returns its domains sorted by name.
    ///
    /// The first line is a header and is skipped unread. Malformed records
    /// are skipped; any I/O failure aborts the import and nothing partial is
    /// returned.
    pub fn import_domain_data(&self) -> Result<Vec<DomainData>, ImportError> {
        if self.path.as_os_str().is_empty() {
            error!(action = "validate", component = "customer_import", reason = "file path is empty", "Import validation failed");
            return Err(ImportError::EmptyPath);
        }

        let file = File::open(&self.path).map_err(|source| {
            error!(action = "open", component = "customer_import", path = ?self.path, error = %source, "Failed to open input file");
            ImportError::Open {
                path: self.path.clone(),
                source,
            }
        })?;

        self.import_reader(file)
    }

    /// Runs the import over an already opened stream. Errors are labelled
    /// with this importer's path.
    pub fn import_reader<R: Read>(&self, reader: R) -> Result<Vec<DomainData>, ImportError> {
        let start_time = Instant::now();
        let mut lines = LineReader::with_max_line_bytes(
            BufReader::with_capacity(READ_BUFFER_SIZE, reader),
            self.options.max_line_bytes,
        );

        self.skip_header(&mut lines)?;

        info!(action = "start", component = "customer_import", path = ?self.path, workers = ?self.options.workers, "Scanning customer records");

        let counts = match self.options.workers {
            None => self.scan_sequential(&mut lines)?,
            Some(workers) => self.scan_sharded(&mut lines, workers)?,
        };

        let data = counts.finalize();

        info!(
            action = "complete",
            component = "customer_import",
            path = ?self.path,
            lines_processed = lines.line_number().saturating_sub(1),
            valid_records = counts.valid_records(),
            invalid_records = counts.invalid_records(),
            unique_domains = data.len(),
            duration_ms = start_time.elapsed().as_millis(),
            "Customer import completed"
        );

        Ok(data)
    }

    fn skip_header<R: BufRead>(&self, lines: &mut LineReader<R>) -> Result<(), ImportError> {
        match lines.next_line() {
            Ok(Some(_)) => Ok(()),
            Ok(None) => {
                error!(action = "read_header", component = "customer_import", path = ?self.path, "Input file is empty");
                Err(ImportError::EmptyInput {
                    path: self.path.clone(),
                })
            }
            Err(source) => Err(self.read_error(1, source)),
        }
    }

    fn scan_sequential<R: BufRead>(
        &self,
        lines: &mut LineReader<R>,
    ) -> Result<DomainCounts, ImportError> {
        let mut counts = DomainCounts::new();
        loop {
            match lines.next_line() {
                Ok(Some(line)) => {
                    counts.record(line);
                }
                Ok(None) => return Ok(counts),
                Err(source) => {
                    let line = lines.line_number() + 1;
                    return Err(self.read_error(line, source));
                }
            }
        }
    }

    fn scan_sharded<R: BufRead>(
        &self,
        lines: &mut LineReader<R>,
        workers: usize,
    ) -> Result<DomainCounts, ImportError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()?;
        let batch_lines = self.options.batch_lines.max(1);

        let mut total = DomainCounts::new();
        let mut batch = LineBatch::with_capacity(batch_lines);
        let mut exhausted = false;

        while !exhausted {
            batch.clear();
            while batch.len() < batch_lines {
                match lines.next_line() {
                    Ok(Some(line)) => batch.push(line),
                    Ok(None) => {
                        exhausted = true;
                        break;
                    }
                    Err(source) => {
                        let line = lines.line_number() + 1;
                        return Err(self.read_error(line, source));
                    }
                }
            }

            if batch.is_empty() {
                break;
            }

            let batch_counts = pool.install(|| batch.count_domains());
            debug!(action = "merge", component = "customer_import", batch_lines = batch.len(), batch_domains = batch_counts.len(), "Merging batch");
            total = total.merge(batch_counts);
        }

        Ok(total)
    }

    fn read_error(&self, line: u64, source: std::io::Error) -> ImportError {
        error!(action = "read", component = "customer_import", path = ?self.path, line, error = %source, "Failed to read input file");
        ImportError::Read {
            path: self.path.clone(),
            line,
            source,
        }
    }
}

/// Data lines packed into one buffer, with the end offset of each line.
struct LineBatch {
    data: Vec<u8>,
    ends: Vec<usize>,
}

impl LineBatch {
    fn with_capacity(lines: usize) -> Self {
        Self {
            data: Vec::new(),
            ends: Vec::with_capacity(lines),
        }
    }

    fn push(&mut self, line: &[u8]) {
        self.data.extend_from_slice(line);
        self.ends.push(self.data.len());
    }

    fn line(&self, index: usize) -> &[u8] {
        let start = if index == 0 { 0 } else { self.ends[index - 1] };
        &self.data[start..self.ends[index]]
    }

    fn len(&self) -> usize {
        self.ends.len()
    }

    fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }

    fn clear(&mut self) {
        self.data.clear();
        self.ends.clear();
    }

    fn count_domains(&self) -> DomainCounts {
        (0..self.len())
            .into_par_iter()
            .fold(
                || DomainCounts::with_capacity(0),
                |mut acc, index| {
                    acc.record(self.line(index));
                    acc
                },
            )
            .reduce(|| DomainCounts::with_capacity(0), DomainCounts::merge)
    }
}
