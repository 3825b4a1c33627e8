//! Seed normalization
//!
//! Converts each `start_urls` entry into a canonical [`SeedRecord`]. This is a
//! pure transformation: no network or browser access happens here.

use crate::config::types::{RawSeed, RawSeedRecord, SeedRecord};
use crate::config::validation::json_type_name;
use crate::SeedShapeError;
use serde_json::Value;

/// A normalized seed plus whether it asked for automatic tagging
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSeed {
    pub record: SeedRecord,
    pub automatic_tagging: bool,
}

impl RawSeed {
    /// Resolves a raw JSON entry into its string or record form
    pub fn from_value(index: usize, value: &Value) -> Result<Self, SeedShapeError> {
        match value {
            Value::String(url) => Ok(RawSeed::Url(url.clone())),
            Value::Object(_) => {
                let record: RawSeedRecord = serde_json::from_value(value.clone())
                    .map_err(|e| invalid_field(index, value, e))?;
                Ok(RawSeed::Record(record))
            }
            other => Err(SeedShapeError::InvalidEntry {
                index,
                found: json_type_name(other),
            }),
        }
    }
}

/// Names the offending record field for a serde error
fn invalid_field(index: usize, value: &Value, error: serde_json::Error) -> SeedShapeError {
    const FIELDS: [&str; 5] = [
        "url",
        "tags",
        "page_rank",
        "selectors_key",
        "automatic_tagging",
    ];

    // serde_json does not expose the failing key, so probe each field
    let field = FIELDS
        .iter()
        .copied()
        .find(|field| {
            let mut probe = serde_json::Map::new();
            if let Some(v) = value.get(*field) {
                probe.insert((*field).to_string(), v.clone());
            }
            serde_json::from_value::<RawSeedRecord>(Value::Object(probe)).is_err()
        })
        .unwrap_or("record");

    SeedShapeError::InvalidField {
        index,
        field,
        message: error.to_string(),
    }
}

/// Normalizes a single seed entry
///
/// `default_tagging` is the process-wide automatic tagging switch; a record's
/// own `automatic_tagging` flag takes precedence over it.
pub fn normalize(
    index: usize,
    entry: RawSeed,
    default_tagging: bool,
) -> Result<NormalizedSeed, SeedShapeError> {
    let (record, automatic_tagging) = match entry {
        RawSeed::Url(url) => (SeedRecord::new(url), default_tagging),
        RawSeed::Record(raw) => {
            let url = raw.url.ok_or(SeedShapeError::MissingUrl { index })?;
            let record = SeedRecord {
                url,
                tags: raw.tags.unwrap_or_default(),
                page_rank: raw.page_rank.unwrap_or(0),
                selectors_key: raw.selectors_key,
            };
            (record, raw.automatic_tagging.unwrap_or(default_tagging))
        }
    };

    if record.url.trim().is_empty() {
        return Err(SeedShapeError::EmptyUrl { index });
    }

    Ok(NormalizedSeed {
        record,
        automatic_tagging,
    })
}

/// Normalizes every entry of a validated `start_urls` list, in order
pub fn normalize_all(
    entries: &[Value],
    default_tagging: bool,
) -> Result<Vec<NormalizedSeed>, SeedShapeError> {
    entries
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let entry = RawSeed::from_value(index, value)?;
            normalize(index, entry, default_tagging)
        })
        .collect()
}
