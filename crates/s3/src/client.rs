//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the StorageClient trait from s3nav-core.
//! The trait is synchronous, so every request blocks on a shared Tokio
//! runtime. Clients must not be used from inside that runtime.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use s3nav_core::{
    Bucket, ConnectionParameters, Error, ObjectEntry, ObjectMetadata, Paginator, Profile, Result,
    StorageClient,
};
use tokio::runtime::Runtime;

use crate::endpoint::{aws_endpoint, bucket_endpoint};
use crate::error::map_sdk_error;
use crate::paginator::{BucketPaginator, ObjectPaginator, timestamp};

/// Region used when creating a bucket needs no location constraint
const DEFAULT_REGION: &str = "us-east-1";

/// Where the connection settings of a client come from
#[derive(Debug, Clone)]
pub enum ConnectSettings {
    /// A profile stored in the s3nav config file
    Profile(Profile),

    /// A profile of the shared AWS config, resolved by the SDK
    AwsProfile(String),
}

/// S3 client wrapper
pub struct S3Client {
    inner: aws_sdk_s3::Client,
    runtime: Arc<Runtime>,
    endpoint: Option<String>,
    region: Option<String>,
    force_path_style: bool,
}

impl S3Client {
    /// Build a client for `settings`, running requests on `runtime`
    pub fn connect(settings: &ConnectSettings, runtime: Arc<Runtime>) -> Result<Self> {
        let client = match settings {
            ConnectSettings::Profile(profile) => runtime.block_on(from_profile(profile))?,
            ConnectSettings::AwsProfile(name) => runtime.block_on(from_aws_profile(name)),
        };
        let (inner, force_path_style) = client;

        let config = inner.config();
        let region = config.region().map(|r| r.to_string());
        let endpoint = match settings {
            ConnectSettings::Profile(profile) => Some(profile.endpoint.clone()),
            ConnectSettings::AwsProfile(_) => None,
        };
        tracing::debug!(?endpoint, ?region, force_path_style, "created S3 client");

        Ok(Self {
            inner,
            runtime,
            endpoint,
            region,
            force_path_style,
        })
    }

    fn base_endpoint(&self) -> Option<String> {
        self.endpoint
            .clone()
            .or_else(|| self.region.as_deref().map(aws_endpoint))
    }

    fn object_tags(&self, bucket: &str, key: &str) -> Vec<(String, String)> {
        let request = self.inner.get_object_tagging().bucket(bucket).key(key);
        match self.runtime.block_on(request.send()) {
            Ok(response) => response
                .tag_set()
                .iter()
                .map(|tag| (tag.key().to_string(), tag.value().to_string()))
                .collect(),
            Err(e) => {
                // tagging is optional on S3-compatible servers
                let err = map_sdk_error("Object Tags", e);
                tracing::debug!(error = %err, "object tags unavailable");
                Vec::new()
            }
        }
    }

    fn object_owner(&self, bucket: &str, key: &str) -> Option<String> {
        let request = self.inner.get_object_acl().bucket(bucket).key(key);
        let response = self.runtime.block_on(request.send()).ok()?;
        let owner = response.owner()?;
        owner.display_name().or(owner.id()).map(str::to_string)
    }
}

async fn from_profile(profile: &Profile) -> Result<(aws_sdk_s3::Client, bool)> {
    let credentials = aws_credential_types::Credentials::new(
        profile.access_key.clone(),
        profile.secret_key.clone(),
        profile.session_token.clone(),
        None, // expiry
        "s3nav-static-credentials",
    );

    let retry = profile.retry_config();
    let timeout = profile.timeout_config();
    if retry.max_attempts == 0 {
        return Err(Error::Config(format!(
            "profile '{}': retry.max_attempts must be at least 1",
            profile.name
        )));
    }

    let config = aws_config::defaults(BehaviorVersion::latest())
        .credentials_provider(credentials)
        .region(Region::new(profile.region.clone()))
        .endpoint_url(&profile.endpoint)
        .retry_config(
            RetryConfig::standard()
                .with_max_attempts(retry.max_attempts)
                .with_initial_backoff(Duration::from_millis(retry.initial_backoff_ms))
                .with_max_backoff(Duration::from_millis(retry.max_backoff_ms)),
        )
        .timeout_config(
            TimeoutConfig::builder()
                .connect_timeout(Duration::from_millis(timeout.connect_ms))
                .read_timeout(Duration::from_millis(timeout.read_ms))
                .build(),
        )
        .load()
        .await;

    let force_path_style = profile.force_path_style();
    let s3_config = aws_sdk_s3::config::Builder::from(&config)
        .force_path_style(force_path_style)
        .build();

    Ok((aws_sdk_s3::Client::from_conf(s3_config), force_path_style))
}

async fn from_aws_profile(name: &str) -> (aws_sdk_s3::Client, bool) {
    let config = aws_config::defaults(BehaviorVersion::latest())
        .profile_name(name)
        .load()
        .await;
    // an endpoint_url in the profile usually points at an S3-compatible server
    let force_path_style = config.endpoint_url().is_some();
    let s3_config = aws_sdk_s3::config::Builder::from(&config)
        .force_path_style(force_path_style)
        .build();
    (aws_sdk_s3::Client::from_conf(s3_config), force_path_style)
}

impl StorageClient for S3Client {
    fn connection_parameters(&self, bucket: &str) -> ConnectionParameters {
        let endpoint = self.base_endpoint().map(|base| {
            bucket_endpoint(&base, bucket, self.force_path_style).unwrap_or(base)
        });
        ConnectionParameters {
            endpoint,
            region: self.region.clone(),
        }
    }

    fn list_buckets(&self) -> Box<dyn Paginator<Bucket>> {
        Box::new(BucketPaginator::new(self.inner.clone(), Arc::clone(&self.runtime)))
    }

    fn list_objects(&self, bucket: &str, prefix: &str) -> Box<dyn Paginator<ObjectEntry>> {
        Box::new(ObjectPaginator::new(
            self.inner.clone(),
            Arc::clone(&self.runtime),
            bucket,
            prefix,
        ))
    }

    fn create_bucket(&self, bucket: &str, region: &str) -> Result<()> {
        let mut request = self.inner.create_bucket().bucket(bucket);
        if !region.is_empty() && region != DEFAULT_REGION {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(region))
                    .build(),
            );
        }

        self.runtime
            .block_on(request.send())
            .map_err(|e| map_sdk_error("Create Bucket", e))?;
        tracing::info!(bucket, region, "created bucket");
        Ok(())
    }

    fn delete_bucket(&self, bucket: &str) -> Result<()> {
        let request = self.inner.delete_bucket().bucket(bucket);
        self.runtime
            .block_on(request.send())
            .map_err(|e| map_sdk_error("Delete Bucket", e))?;
        Ok(())
    }

    fn upload_file(&self, bucket: &str, key: &str, path: &Path) -> Result<()> {
        let content_type = mime_guess::from_path(key).first_or_octet_stream();
        self.runtime.block_on(async {
            let body = ByteStream::from_path(path)
                .await
                .map_err(|e| Error::Io(std::io::Error::other(e)))?;
            self.inner
                .put_object()
                .bucket(bucket)
                .key(key)
                .content_type(content_type.as_ref())
                .body(body)
                .send()
                .await
                .map_err(|e| map_sdk_error("Upload Object", e))?;
            Ok::<_, Error>(())
        })?;
        tracing::debug!(bucket, key, content_type = %content_type, "uploaded object");
        Ok(())
    }

    fn download_file(&self, bucket: &str, key: &str, path: &Path) -> Result<()> {
        let data = self.runtime.block_on(async {
            let response = self
                .inner
                .get_object()
                .bucket(bucket)
                .key(key)
                .send()
                .await
                .map_err(|e| map_sdk_error("Download Object", e))?;
            let bytes = response
                .body
                .collect()
                .await
                .map_err(|e| Error::Network(e.to_string()))?;
            Ok::<_, Error>(bytes.into_bytes())
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &data)?;
        tracing::debug!(bucket, key, size = data.len(), "downloaded object");
        Ok(())
    }

    fn get_object_metadata(&self, bucket: &str, key: &str) -> Result<ObjectMetadata> {
        let request = self.inner.head_object().bucket(bucket).key(key);
        let response = self
            .runtime
            .block_on(request.send())
            .map_err(|e| map_sdk_error("Object Metadata", e))?;

        Ok(ObjectMetadata {
            bucket: bucket.to_string(),
            key: key.to_string(),
            region: self.region.clone(),
            size: response
                .content_length()
                .and_then(|size| u64::try_from(size).ok()),
            last_modified: response.last_modified().and_then(timestamp),
            content_type: response.content_type().map(str::to_string),
            etag: response.e_tag().map(|etag| etag.trim_matches('"').to_string()),
            owner: self.object_owner(bucket, key),
            storage_class: response.storage_class().map(|sc| sc.as_str().to_string()),
            legal_hold: response
                .object_lock_legal_hold_status()
                .map(|status| status.as_str().to_string()),
            metadata: response
                .metadata()
                .map(|meta| meta.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                .unwrap_or_default(),
            tags: self.object_tags(bucket, key).into_iter().collect(),
        })
    }

    fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        let request = self.inner.delete_object().bucket(bucket).key(key);
        self.runtime
            .block_on(request.send())
            .map_err(|e| map_sdk_error("Delete Object", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runtime() -> Arc<Runtime> {
        Arc::new(
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap(),
        )
    }

    fn profile(bucket_lookup: &str) -> Profile {
        let mut profile = Profile::new("test", "https://s3.us-west-2.amazonaws.com:654", "a", "b");
        profile.region = "us-west-2".to_string();
        profile.bucket_lookup = bucket_lookup.to_string();
        profile
    }

    #[test]
    fn test_path_style_connection_parameters() {
        let client =
            S3Client::connect(&ConnectSettings::Profile(profile("path")), runtime()).unwrap();
        let params = client.connection_parameters("test-bucket");
        assert_eq!(
            params.endpoint.as_deref(),
            Some("https://s3.us-west-2.amazonaws.com:654/test-bucket")
        );
        assert_eq!(params.region.as_deref(), Some("us-west-2"));
    }

    #[test]
    fn test_connect_with_session_token() {
        let mut profile = profile("path");
        profile.session_token = Some("token".to_string());
        let client = S3Client::connect(&ConnectSettings::Profile(profile), runtime());
        assert!(client.is_ok());
    }

    #[test]
    fn test_virtual_host_connection_parameters() {
        let client =
            S3Client::connect(&ConnectSettings::Profile(profile("dns")), runtime()).unwrap();
        let params = client.connection_parameters("test-bucket");
        assert_eq!(
            params.endpoint.as_deref(),
            Some("https://test-bucket.s3.us-west-2.amazonaws.com:654")
        );
    }

    #[test]
    fn test_no_bucket_keeps_endpoint() {
        let client =
            S3Client::connect(&ConnectSettings::Profile(profile("auto")), runtime()).unwrap();
        let params = client.connection_parameters("");
        assert_eq!(
            params.endpoint.as_deref(),
            Some("https://s3.us-west-2.amazonaws.com:654")
        );
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut profile = profile("path");
        profile.retry = Some(s3nav_core::profile::RetryConfig {
            max_attempts: 0,
            ..Default::default()
        });
        let result = S3Client::connect(&ConnectSettings::Profile(profile), runtime());
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
