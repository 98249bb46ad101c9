//! s3nav-s3: S3 SDK adapter for s3nav
//!
//! This crate provides the implementation of the StorageClient trait
//! using the aws-sdk-s3 crate. It is the only crate that directly
//! depends on the AWS SDK.

pub mod client;
pub mod connector;
pub mod endpoint;
mod error;
mod paginator;

pub use client::{ConnectSettings, S3Client};
pub use connector::{AwsProfileConnector, AwsProfileLoader, ProfileConnector, ProfileLoader};
