//! In-memory storage backend
//!
//! A deterministic [`StorageClient`] used by tests and by the demo profile.
//! Buckets are kept sorted by name, objects in insertion order.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use jiff::Timestamp;
use sha2::{Digest, Sha256};

use crate::client::StorageClient;
use crate::error::{Error, Result};
use crate::object::{
    Bucket, ConnectionParameters, DELIMITER, FileEntry, ObjectEntry, ObjectMetadata,
};
use crate::paginator::{MemoryPaginator, Paginator};

const BUCKET_NOT_FOUND: &str = "bucket not found";
const OBJECT_NOT_FOUND: &str = "object not found";
const DEFAULT_STORAGE_CLASS: &str = "STANDARD";

#[derive(Debug, Clone, Default)]
struct MemoryBucket {
    region: String,
    creation_date: Option<Timestamp>,
    objects: Vec<MemoryObject>,
}

#[derive(Debug, Clone)]
struct MemoryObject {
    key: String,
    size: u64,
    last_modified: Timestamp,
    etag: String,
    storage_class: String,
    data: Vec<u8>,
}

impl MemoryObject {
    fn entry(&self) -> FileEntry {
        FileEntry {
            key: self.key.clone(),
            size: self.size,
            last_modified: Some(self.last_modified),
            etag: Some(self.etag.clone()),
            storage_class: Some(self.storage_class.clone()),
        }
    }
}

/// Storage client keeping every bucket and object in process memory
#[derive(Debug, Default)]
pub struct MemoryClient {
    buckets: Mutex<BTreeMap<String, MemoryBucket>>,
}

impl MemoryClient {
    /// Create an empty client
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a client with seeded fixtures
    pub fn builder() -> MemoryClientBuilder {
        MemoryClientBuilder::default()
    }

    /// Client with a small sample namespace for the demo profile
    pub fn demo() -> Self {
        let created = Timestamp::from_second(1_700_000_000).unwrap_or(Timestamp::UNIX_EPOCH);
        let modified = Timestamp::from_second(1_700_086_400).unwrap_or(Timestamp::UNIX_EPOCH);
        Self::builder()
            .with_bucket("demo", "us-east-1", created)
            .with_object("demo", "logs/2023/a.txt", modified, b"first log\n")
            .with_object("demo", "logs/2023/b.txt", modified, b"second log\n")
            .with_object("demo", "readme.txt", modified, b"s3nav demo bucket\n")
            .with_bucket("archive", "eu-west-1", created)
            .with_object("archive", "2022/q4/report.csv", modified, b"month,total\n")
            .build()
    }

    fn state(&self) -> MutexGuard<'_, BTreeMap<String, MemoryBucket>> {
        self.buckets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StorageClient for MemoryClient {
    fn connection_parameters(&self, _bucket: &str) -> ConnectionParameters {
        ConnectionParameters {
            endpoint: Some("memory".to_string()),
            region: None,
        }
    }

    fn list_buckets(&self) -> Box<dyn Paginator<Bucket>> {
        let buckets = self
            .state()
            .iter()
            .map(|(name, bucket)| Bucket {
                name: name.clone(),
                region: Some(bucket.region.clone()).filter(|r| !r.is_empty()),
                creation_date: bucket.creation_date,
            })
            .collect();
        Box::new(MemoryPaginator::new(buckets))
    }

    fn list_objects(&self, bucket: &str, prefix: &str) -> Box<dyn Paginator<ObjectEntry>> {
        let state = self.state();
        let Some(memory_bucket) = state.get(bucket) else {
            return Box::new(MemoryPaginator::not_found(BUCKET_NOT_FOUND));
        };

        let mut directories = Vec::new();
        let mut files = Vec::new();
        for object in &memory_bucket.objects {
            let Some(suffix) = object.key.strip_prefix(prefix) else {
                continue;
            };
            match suffix.split_once(DELIMITER) {
                Some((first, _)) => directories.push(format!("{prefix}{first}{DELIMITER}")),
                None => files.push(ObjectEntry::File(object.entry())),
            }
        }
        directories.sort();
        directories.dedup();

        let mut entries: Vec<ObjectEntry> = directories
            .into_iter()
            .map(ObjectEntry::directory)
            .collect();
        entries.extend(files);
        Box::new(MemoryPaginator::new(entries))
    }

    fn create_bucket(&self, bucket: &str, region: &str) -> Result<()> {
        let mut state = self.state();
        if state.contains_key(bucket) {
            return Err(Error::Conflict("bucket already exists".to_string()));
        }
        state.insert(
            bucket.to_string(),
            MemoryBucket {
                region: region.to_string(),
                creation_date: Some(Timestamp::now()),
                objects: Vec::new(),
            },
        );
        Ok(())
    }

    fn delete_bucket(&self, bucket: &str) -> Result<()> {
        self.state()
            .remove(bucket)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound(BUCKET_NOT_FOUND.to_string()))
    }

    fn upload_file(&self, bucket: &str, key: &str, path: &Path) -> Result<()> {
        let mut state = self.state();
        let memory_bucket = state
            .get_mut(bucket)
            .ok_or_else(|| Error::NotFound(BUCKET_NOT_FOUND.to_string()))?;
        let data = std::fs::read(path)?;

        let object = MemoryObject {
            key: key.to_string(),
            size: data.len() as u64,
            last_modified: Timestamp::now(),
            etag: content_etag(&data),
            storage_class: DEFAULT_STORAGE_CLASS.to_string(),
            data,
        };
        match memory_bucket.objects.iter_mut().find(|o| o.key == key) {
            Some(existing) => *existing = object,
            None => memory_bucket.objects.push(object),
        }
        Ok(())
    }

    fn download_file(&self, bucket: &str, key: &str, path: &Path) -> Result<()> {
        let data = {
            let state = self.state();
            let memory_bucket = state
                .get(bucket)
                .ok_or_else(|| Error::NotFound(BUCKET_NOT_FOUND.to_string()))?;
            memory_bucket
                .objects
                .iter()
                .find(|o| o.key == key)
                .map(|o| o.data.clone())
                .ok_or_else(|| Error::NotFound(OBJECT_NOT_FOUND.to_string()))?
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, data)?;
        Ok(())
    }

    fn get_object_metadata(&self, bucket: &str, key: &str) -> Result<ObjectMetadata> {
        let state = self.state();
        let memory_bucket = state
            .get(bucket)
            .ok_or_else(|| Error::NotFound(BUCKET_NOT_FOUND.to_string()))?;
        let object = memory_bucket
            .objects
            .iter()
            .find(|o| o.key == key)
            .ok_or_else(|| Error::NotFound(OBJECT_NOT_FOUND.to_string()))?;

        Ok(ObjectMetadata {
            bucket: bucket.to_string(),
            key: object.key.clone(),
            region: Some(memory_bucket.region.clone()).filter(|r| !r.is_empty()),
            size: Some(object.size),
            last_modified: Some(object.last_modified),
            content_type: Some("application/octet-stream".to_string()),
            etag: Some(object.etag.clone()),
            owner: Some("memory-user".to_string()),
            storage_class: Some(object.storage_class.clone()),
            legal_hold: Some("OFF".to_string()),
            metadata: BTreeMap::new(),
            tags: BTreeMap::from([("Environment".to_string(), "Test".to_string())]),
        })
    }

    fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        let mut state = self.state();
        let memory_bucket = state
            .get_mut(bucket)
            .ok_or_else(|| Error::NotFound(BUCKET_NOT_FOUND.to_string()))?;
        let index = memory_bucket
            .objects
            .iter()
            .position(|o| o.key == key)
            .ok_or_else(|| Error::NotFound(OBJECT_NOT_FOUND.to_string()))?;
        memory_bucket.objects.remove(index);
        Ok(())
    }
}

fn content_etag(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    hex::encode(&digest[..16])
}

/// Builder seeding a [`MemoryClient`] with fixtures
#[derive(Debug, Default)]
pub struct MemoryClientBuilder {
    buckets: BTreeMap<String, MemoryBucket>,
}

impl MemoryClientBuilder {
    /// Add (or reset) a bucket
    pub fn with_bucket(
        mut self,
        name: impl Into<String>,
        region: impl Into<String>,
        creation_date: Timestamp,
    ) -> Self {
        self.buckets.insert(
            name.into(),
            MemoryBucket {
                region: region.into(),
                creation_date: Some(creation_date),
                objects: Vec::new(),
            },
        );
        self
    }

    /// Add an object with `data` as its content
    ///
    /// Objects for a bucket that was not added first are ignored.
    pub fn with_object(
        mut self,
        bucket: &str,
        key: impl Into<String>,
        last_modified: Timestamp,
        data: &[u8],
    ) -> Self {
        if let Some(memory_bucket) = self.buckets.get_mut(bucket) {
            memory_bucket.objects.push(MemoryObject {
                key: key.into(),
                size: data.len() as u64,
                last_modified,
                etag: content_etag(data),
                storage_class: DEFAULT_STORAGE_CLASS.to_string(),
                data: data.to_vec(),
            });
        }
        self
    }

    pub fn build(self) -> MemoryClient {
        MemoryClient {
            buckets: Mutex::new(self.buckets),
        }
    }
}
