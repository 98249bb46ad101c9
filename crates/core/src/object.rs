//! Storage data model
//!
//! Backend-independent descriptions of buckets, listing entries and object
//! metadata. Listing entries are either files or synthetic directories built
//! from common key prefixes.

use std::collections::BTreeMap;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Delimiter used to group keys into pseudo-directories
pub const DELIMITER: char = '/';

/// A named top-level container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    /// Bucket name
    pub name: String,

    /// Region the bucket lives in, when the backend reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Creation timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<Timestamp>,
}

impl Bucket {
    /// Create a bucket description with only a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            region: None,
            creation_date: None,
        }
    }
}

/// A file object returned by a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Full object key
    pub key: String,

    /// Size in bytes
    pub size: u64,

    /// Last modified timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<Timestamp>,

    /// ETag (usually MD5 for single-part uploads)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    /// Storage class
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
}

impl FileEntry {
    /// Create a file entry with a key and size
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            size,
            last_modified: None,
            etag: None,
            storage_class: None,
        }
    }
}

/// One entry of a one-level listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ObjectEntry {
    /// A real object
    File(FileEntry),

    /// A common prefix; the key always ends with the delimiter
    Directory { key: String },
}

impl ObjectEntry {
    /// Create a directory entry
    pub fn directory(key: impl Into<String>) -> Self {
        ObjectEntry::Directory { key: key.into() }
    }

    /// Full key of the entry
    pub fn key(&self) -> &str {
        match self {
            ObjectEntry::File(file) => &file.key,
            ObjectEntry::Directory { key } => key,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, ObjectEntry::Directory { .. })
    }

    pub fn is_file(&self) -> bool {
        matches!(self, ObjectEntry::File(_))
    }

    /// File details, `None` for directories
    pub fn as_file(&self) -> Option<&FileEntry> {
        match self {
            ObjectEntry::File(file) => Some(file),
            ObjectEntry::Directory { .. } => None,
        }
    }
}

impl From<FileEntry> for ObjectEntry {
    fn from(file: FileEntry) -> Self {
        ObjectEntry::File(file)
    }
}

/// Detailed metadata for a single object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    pub bucket: String,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_hold: Option<String>,

    /// User-defined metadata (`x-amz-meta-*`)
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,

    /// Object tags
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

/// Where a client sends requests for a given bucket
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionParameters {
    pub endpoint: Option<String>,
    pub region: Option<String>,
}
