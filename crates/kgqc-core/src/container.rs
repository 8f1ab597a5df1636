//! Report containers: the uniform output-accumulation mechanism of every
//! builder.
//!
//! A container is either a plain sequence of records or a mapping from the
//! value of a designated key field to the record. The mode is fixed at
//! construction. Keyed containers reject records without the key field and
//! records whose key value was already added; they iterate (and serialize) in
//! first-insertion order.

use std::fmt;
use std::str::FromStr;

use ahash::AHashMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::{QcError, Result};

/// A report record: one JSON object.
pub type Record = serde_json::Map<String, Value>;

/// Key field used when none is given at construction.
pub const DEFAULT_KEY_FIELD: &str = "name";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageMode {
    /// Mapping from key-field value to record.
    #[default]
    #[serde(alias = "mapping", alias = "dict")]
    Keyed,
    /// Append-only list of records.
    #[serde(alias = "list")]
    Sequence,
}

impl StorageMode {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageMode::Keyed => "keyed",
            StorageMode::Sequence => "sequence",
        }
    }
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageMode {
    type Err = QcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keyed" | "mapping" | "dict" => Ok(StorageMode::Keyed),
            "sequence" | "list" => Ok(StorageMode::Sequence),
            _ => Err(QcError::InvalidContainerType(s.to_string())),
        }
    }
}

/// Convert a typed summary into a [`Record`].
pub fn to_record<T: Serialize>(value: &T) -> Result<Record> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Err(QcError::NotARecord),
    }
}

fn key_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct KeyedRecords {
    key_field: String,
    entries: Vec<(String, Record)>,
    index: AHashMap<String, usize>,
}

#[derive(Debug, Clone)]
pub enum ReportContainer {
    Sequence(Vec<Record>),
    Keyed(KeyedRecords),
}

impl ReportContainer {
    pub fn new(mode: StorageMode) -> Self {
        Self::with_key_field(mode, DEFAULT_KEY_FIELD)
    }

    /// `key_field` is only consulted in keyed mode.
    pub fn with_key_field(mode: StorageMode, key_field: &str) -> Self {
        match mode {
            StorageMode::Sequence => ReportContainer::Sequence(Vec::new()),
            StorageMode::Keyed => ReportContainer::Keyed(KeyedRecords {
                key_field: key_field.to_string(),
                entries: Vec::new(),
                index: AHashMap::new(),
            }),
        }
    }

    pub fn mode(&self) -> StorageMode {
        match self {
            ReportContainer::Sequence(_) => StorageMode::Sequence,
            ReportContainer::Keyed(_) => StorageMode::Keyed,
        }
    }

    pub fn key_field(&self) -> Option<&str> {
        match self {
            ReportContainer::Sequence(_) => None,
            ReportContainer::Keyed(k) => Some(&k.key_field),
        }
    }

    pub fn add(&mut self, record: Record) -> Result<()> {
        self.add_with_key(record, None)
    }

    /// Add `record`, keying it by `key_override` instead of the container's
    /// key field when given.
    pub fn add_with_key(&mut self, record: Record, key_override: Option<&str>) -> Result<()> {
        match self {
            ReportContainer::Sequence(records) => {
                records.push(record);
                Ok(())
            }
            ReportContainer::Keyed(keyed) => {
                let field = key_override.unwrap_or(keyed.key_field.as_str());
                let key = match record.get(field) {
                    Some(value) => key_string(value),
                    None => return Err(QcError::MissingKeyField(field.to_string())),
                };
                if keyed.index.contains_key(&key) {
                    return Err(QcError::DuplicateKey(key));
                }
                keyed.index.insert(key.clone(), keyed.entries.len());
                keyed.entries.push((key, record));
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ReportContainer::Sequence(records) => records.len(),
            ReportContainer::Keyed(k) => k.entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a record by key value. Always `None` in sequence mode.
    pub fn get(&self, key: &str) -> Option<&Record> {
        match self {
            ReportContainer::Sequence(_) => None,
            ReportContainer::Keyed(k) => k.index.get(key).map(|&i| &k.entries[i].1),
        }
    }

    /// Key values in insertion order. Empty in sequence mode.
    pub fn keys(&self) -> Vec<&str> {
        match self {
            ReportContainer::Sequence(_) => Vec::new(),
            ReportContainer::Keyed(k) => k.entries.iter().map(|(key, _)| key.as_str()).collect(),
        }
    }

    /// Records in insertion order, regardless of mode.
    pub fn records(&self) -> Box<dyn Iterator<Item = &Record> + '_> {
        match self {
            ReportContainer::Sequence(records) => Box::new(records.iter()),
            ReportContainer::Keyed(k) => Box::new(k.entries.iter().map(|(_, r)| r)),
        }
    }
}

impl Serialize for ReportContainer {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ReportContainer::Sequence(records) => {
                let mut seq = serializer.serialize_seq(Some(records.len()))?;
                for record in records {
                    seq.serialize_element(record)?;
                }
                seq.end()
            }
            ReportContainer::Keyed(k) => {
                let mut map = serializer.serialize_map(Some(k.entries.len()))?;
                for (key, record) in &k.entries {
                    map.serialize_entry(key, record)?;
                }
                map.end()
            }
        }
    }
}
