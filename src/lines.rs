use std::io::{self, BufRead, ErrorKind, Read};

/// Size of the read buffer placed in front of the input stream.
pub const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Longest accepted line, terminator excluded.
pub const DEFAULT_MAX_LINE_BYTES: usize = 64 * 1024;

/// Cursor over the lines of a buffered stream.
///
/// Lines are handed out as borrowed slices of one reused buffer, with the
/// trailing `\n` (and a `\r` right before it) removed.
pub struct LineReader<R> {
    reader: R,
    buf: Vec<u8>,
    max_line_bytes: usize,
    line_number: u64,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_max_line_bytes(reader, DEFAULT_MAX_LINE_BYTES)
    }

    pub fn with_max_line_bytes(reader: R, max_line_bytes: usize) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            max_line_bytes,
            line_number: 0,
        }
    }

    /// Number of lines returned so far.
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    /// Reads the next line. `Ok(None)` means a clean end of stream.
    pub fn next_line(&mut self) -> io::Result<Option<&[u8]>> {
        self.buf.clear();

        // +2 leaves room for "\r\n" on a line of exactly the maximum length
        let limit = (self.max_line_bytes as u64).saturating_add(2);
        let read = (&mut self.reader)
            .take(limit)
            .read_until(b'\n', &mut self.buf)?;
        if read == 0 {
            return Ok(None);
        }

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }

        if self.buf.len() > self.max_line_bytes {
            return Err(io::Error::new(
                ErrorKind::InvalidData,
                format!(
                    "line {} exceeds {} bytes",
                    self.line_number + 1,
                    self.max_line_bytes
                ),
            ));
        }

        self.line_number += 1;
        Ok(Some(self.buf.as_slice()))
    }
}
