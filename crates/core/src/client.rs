//! StorageClient trait definition
//!
//! This trait defines the operations the browser needs from an object store.
//! Pages only ever talk to a `dyn StorageClient`, so the S3 backend and the
//! in-memory backend are interchangeable.

use std::path::Path;

use crate::error::Result;
use crate::object::{Bucket, ConnectionParameters, ObjectEntry, ObjectMetadata};
use crate::paginator::Paginator;

/// Uniform operation set over a bucket/key namespace
///
/// Listings are prefix-scoped and delimiter-aware: the result for prefix `P`
/// contains only the direct children of `P`. Nothing is cached client-side.
#[cfg_attr(test, mockall::automock)]
pub trait StorageClient: Send + Sync {
    /// Endpoint and region used for requests against `bucket`
    fn connection_parameters(&self, bucket: &str) -> ConnectionParameters;

    /// List all buckets visible to the credentials
    fn list_buckets(&self) -> Box<dyn Paginator<Bucket>>;

    /// List the direct children of `prefix` inside `bucket`
    fn list_objects(&self, bucket: &str, prefix: &str) -> Box<dyn Paginator<ObjectEntry>>;

    /// Create a bucket, optionally in a specific region
    fn create_bucket(&self, bucket: &str, region: &str) -> Result<()>;

    /// Delete an (empty) bucket
    fn delete_bucket(&self, bucket: &str) -> Result<()>;

    /// Upload the local file at `path` as `key`
    fn upload_file(&self, bucket: &str, key: &str, path: &Path) -> Result<()>;

    /// Download `key` into the local file at `path`
    fn download_file(&self, bucket: &str, key: &str, path: &Path) -> Result<()>;

    /// Fetch detailed metadata for a single object
    fn get_object_metadata(&self, bucket: &str, key: &str) -> Result<ObjectMetadata>;

    /// Delete a single object
    fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;
}
