//! Effective endpoint of a bucket

use s3nav_core::{Error, Result};
use url::Url;

/// Endpoint requests for `bucket` are sent to
///
/// Path style appends the bucket to the path, virtual-hosted style prefixes
/// the host with it. An empty bucket leaves the endpoint untouched.
pub fn bucket_endpoint(endpoint: &str, bucket: &str, path_style: bool) -> Result<String> {
    if bucket.is_empty() {
        return Ok(endpoint.to_string());
    }

    let mut url = Url::parse(endpoint)?;
    if path_style {
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("endpoint cannot carry a bucket path: {endpoint}")))?
            .pop_if_empty()
            .push(bucket);
    } else {
        let host = url
            .host_str()
            .ok_or_else(|| Error::Config(format!("endpoint has no host: {endpoint}")))?;
        let host = format!("{bucket}.{host}");
        url.set_host(Some(&host))?;
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Default AWS endpoint of a region
pub fn aws_endpoint(region: &str) -> String {
    format!("https://s3.{region}.amazonaws.com")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_style_appends_bucket() {
        let endpoint =
            bucket_endpoint("https://s3.us-west-2.amazonaws.com:654", "test-bucket", true);
        assert_eq!(
            endpoint.unwrap(),
            "https://s3.us-west-2.amazonaws.com:654/test-bucket"
        );
    }

    #[test]
    fn test_path_style_keeps_base_path() {
        let endpoint = bucket_endpoint("http://localhost:9000/storage/", "photos", true);
        assert_eq!(endpoint.unwrap(), "http://localhost:9000/storage/photos");
    }

    #[test]
    fn test_virtual_host_prefixes_host() {
        let endpoint = bucket_endpoint("https://asasd:654", "test-bucket", false);
        assert_eq!(endpoint.unwrap(), "https://test-bucket.asasd:654");
    }

    #[test]
    fn test_empty_bucket_keeps_endpoint() {
        let endpoint = bucket_endpoint("https://s3.us-west-2.amazonaws.com:654", "", true);
        assert_eq!(endpoint.unwrap(), "https://s3.us-west-2.amazonaws.com:654");
    }

    #[test]
    fn test_invalid_endpoint() {
        let result = bucket_endpoint("not a url", "bucket", true);
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_aws_endpoint() {
        assert_eq!(
            aws_endpoint("eu-west-1"),
            "https://s3.eu-west-1.amazonaws.com"
        );
    }
}
