use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::trace;

use crate::domain;

/// Starting size of the counter store, enough for typical customer files
/// without rehashing.
pub const DEFAULT_CAPACITY: usize = 1000;

/// One row of the final report.
///
/// The domain keeps the exact bytes found in the input, whatever their
/// encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainData {
    #[serde(with = "raw_bytes")]
    pub domain: Vec<u8>,
    #[serde(rename = "number_of_customers")]
    pub customer_quantity: u64,
}

impl DomainData {
    pub fn new(domain: impl Into<Vec<u8>>, customer_quantity: u64) -> Self {
        Self {
            domain: domain.into(),
            customer_quantity,
        }
    }

    /// The domain as text, with invalid UTF-8 replaced. For display only.
    pub fn domain_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.domain)
    }
}

/// Serializes byte strings as raw fields rather than as sequences of numbers.
mod raw_bytes {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(bytes)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        deserializer.deserialize_byte_buf(BytesVisitor)
    }

    struct BytesVisitor;

    impl<'de> Visitor<'de> for BytesVisitor {
        type Value = Vec<u8>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a byte string")
        }

        fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Vec<u8>, E> {
            Ok(v.to_vec())
        }

        fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Vec<u8>, E> {
            Ok(v)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Vec<u8>, E> {
            Ok(v.as_bytes().to_vec())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Vec<u8>, E> {
            Ok(v.into_bytes())
        }
    }
}

/// Per-domain customer counts accumulated during a scan.
#[derive(Debug, Clone)]
pub struct DomainCounts {
    counts: HashMap<Vec<u8>, u64>,
    valid_records: u64,
    invalid_records: u64,
}

impl Default for DomainCounts {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainCounts {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            counts: HashMap::with_capacity(capacity),
            valid_records: 0,
            invalid_records: 0,
        }
    }

    /// Parses one data line and counts its domain. Returns `false` when the
    /// record was skipped.
    pub fn record(&mut self, line: &[u8]) -> bool {
        match domain::parse_domain(line) {
            Ok(domain) => {
                self.increment(domain);
                self.valid_records += 1;
                true
            }
            Err(reason) => {
                trace!(action = "skip", component = "record_parser", reason = %reason, "Skipping invalid record");
                self.invalid_records += 1;
                false
            }
        }
    }

    /// Increment-or-insert. Only allocates the first time a domain is seen.
    pub fn increment(&mut self, domain: &[u8]) {
        match self.counts.get_mut(domain) {
            Some(count) => *count = count.saturating_add(1),
            None => {
                self.counts.insert(domain.to_vec(), 1);
            }
        }
    }

    /// Folds another store into this one, summing counts of shared domains.
    pub fn merge(mut self, other: DomainCounts) -> Self {
        if self.counts.len() < other.counts.len() {
            return other.merge(self);
        }
        for (domain, count) in other.counts {
            let entry = self.counts.entry(domain).or_insert(0);
            *entry = entry.saturating_add(count);
        }
        self.valid_records += other.valid_records;
        self.invalid_records += other.invalid_records;
        self
    }

    pub fn get(&self, domain: &[u8]) -> Option<u64> {
        self.counts.get(domain).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn valid_records(&self) -> u64 {
        self.valid_records
    }

    pub fn invalid_records(&self) -> u64 {
        self.invalid_records
    }

    /// Produces the report rows ordered by domain (byte-wise, ascending).
    pub fn finalize(&self) -> Vec<DomainData> {
        let mut data = Vec::with_capacity(self.counts.len());
        data.extend(
            self.counts
                .iter()
                .map(|(domain, &count)| DomainData::new(domain.clone(), count)),
        );
        // keys are unique, so an unstable sort is still deterministic
        data.sort_unstable_by(|a, b| a.domain.cmp(&b.domain));
        data
    }
}
