//! Record parsing and domain extraction.
//!
//! Both steps work on raw bytes so a line is never copied before we know it
//! carries a usable domain.

use std::fmt;

/// Field delimiter of the customer file.
pub const DELIMITER: u8 = b',';

/// 0-indexed position of the email column.
pub const EMAIL_FIELD: usize = 2;

/// Separator between the local part and the domain of an address.
pub const ADDRESS_SEPARATOR: u8 = b'@';

/// Why a record was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    TooFewFields,
    MissingSeparator,
    EmptyLocalPart,
    EmptyDomain,
}

impl Rejection {
    pub fn as_str(self) -> &'static str {
        match self {
            Rejection::TooFewFields => "too_few_fields",
            Rejection::MissingSeparator => "missing_separator",
            Rejection::EmptyLocalPart => "empty_local_part",
            Rejection::EmptyDomain => "empty_domain",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the email column of a raw line, keeping empty fields in place.
pub fn email_field(line: &[u8]) -> Result<&[u8], Rejection> {
    line.split(|&b| b == DELIMITER)
        .nth(EMAIL_FIELD)
        .ok_or(Rejection::TooFewFields)
}

/// Extracts the domain of an email-like value.
///
/// Only the first `@` counts; everything after it is the domain, used
/// verbatim: no case folding, no trimming, no decoding.
pub fn extract_domain(email: &[u8]) -> Result<&[u8], Rejection> {
    let at = email
        .iter()
        .position(|&b| b == ADDRESS_SEPARATOR)
        .ok_or(Rejection::MissingSeparator)?;

    if at == 0 {
        return Err(Rejection::EmptyLocalPart);
    }
    if at == email.len() - 1 {
        return Err(Rejection::EmptyDomain);
    }

    let domain = &email[at + 1..];
    if domain.is_empty() {
        return Err(Rejection::EmptyDomain);
    }

    Ok(domain)
}

/// Parses one data line down to its domain.
pub fn parse_domain(line: &[u8]) -> Result<&[u8], Rejection> {
    email_field(line).and_then(extract_domain)
}
