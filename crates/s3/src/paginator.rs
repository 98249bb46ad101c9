//! Continuation-token paginators over the S3 list operations

use std::sync::Arc;

use aws_smithy_types::DateTime;
use jiff::Timestamp;
use s3nav_core::object::DELIMITER;
use s3nav_core::{Bucket, FileEntry, ObjectEntry, Paginator, Result};
use tokio::runtime::Runtime;

use crate::error::map_sdk_error;

pub(crate) fn timestamp(date: &DateTime) -> Option<Timestamp> {
    Timestamp::from_second(date.secs()).ok()
}

/// Pages of `ListBuckets`
pub(crate) struct BucketPaginator {
    client: aws_sdk_s3::Client,
    runtime: Arc<Runtime>,
    token: Option<String>,
    done: bool,
}

impl BucketPaginator {
    pub(crate) fn new(client: aws_sdk_s3::Client, runtime: Arc<Runtime>) -> Self {
        Self {
            client,
            runtime,
            token: None,
            done: false,
        }
    }
}

impl Paginator<Bucket> for BucketPaginator {
    fn has_more_pages(&self) -> bool {
        !self.done
    }

    fn next_page(&mut self) -> Result<Vec<Bucket>> {
        if self.done {
            return Ok(Vec::new());
        }

        let request = self
            .client
            .list_buckets()
            .set_continuation_token(self.token.take());
        let response = match self.runtime.block_on(request.send()) {
            Ok(response) => response,
            Err(e) => {
                self.done = true;
                return Err(map_sdk_error("List Buckets", e));
            }
        };

        self.token = response.continuation_token().map(str::to_string);
        self.done = self.token.is_none();

        Ok(response
            .buckets()
            .iter()
            .map(|b| Bucket {
                name: b.name().unwrap_or_default().to_string(),
                region: b.bucket_region().map(str::to_string),
                creation_date: b.creation_date().and_then(timestamp),
            })
            .collect())
    }
}

/// Pages of a delimited `ListObjectsV2` below one prefix
pub(crate) struct ObjectPaginator {
    client: aws_sdk_s3::Client,
    runtime: Arc<Runtime>,
    bucket: String,
    prefix: String,
    token: Option<String>,
    done: bool,
}

impl ObjectPaginator {
    pub(crate) fn new(
        client: aws_sdk_s3::Client,
        runtime: Arc<Runtime>,
        bucket: &str,
        prefix: &str,
    ) -> Self {
        Self {
            client,
            runtime,
            bucket: bucket.to_string(),
            prefix: prefix.to_string(),
            token: None,
            done: false,
        }
    }
}

impl Paginator<ObjectEntry> for ObjectPaginator {
    fn has_more_pages(&self) -> bool {
        !self.done
    }

    fn next_page(&mut self) -> Result<Vec<ObjectEntry>> {
        if self.done {
            return Ok(Vec::new());
        }

        let request = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(&self.prefix)
            .delimiter(DELIMITER.to_string())
            .set_continuation_token(self.token.take());
        let response = match self.runtime.block_on(request.send()) {
            Ok(response) => response,
            Err(e) => {
                self.done = true;
                return Err(map_sdk_error("List Objects", e));
            }
        };

        self.token = response.next_continuation_token().map(str::to_string);
        self.done = !response.is_truncated().unwrap_or(false) || self.token.is_none();

        let directories = response
            .common_prefixes()
            .iter()
            .filter_map(|p| p.prefix())
            .map(ObjectEntry::directory);

        let files = response.contents().iter().map(|object| {
            ObjectEntry::File(FileEntry {
                key: object.key().unwrap_or_default().to_string(),
                size: object
                    .size()
                    .and_then(|size| u64::try_from(size).ok())
                    .unwrap_or(0),
                last_modified: object.last_modified().and_then(timestamp),
                etag: object.e_tag().map(|etag| etag.trim_matches('"').to_string()),
                storage_class: object.storage_class().map(|sc| sc.as_str().to_string()),
            })
        });

        Ok(directories.chain(files).collect())
    }
}
