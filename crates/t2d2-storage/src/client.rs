//! S3 client wrapper

use std::path::Path;

use aws_config::{retry::RetryConfig, BehaviorVersion, Region};
use aws_sdk_s3::{config::Credentials, primitives::ByteStream, types::ObjectCannedAcl, Client};
use indicatif::ProgressBar;
use tokio::{fs::File, io::AsyncWriteExt};
use tracing::debug;
use url::Url;

use crate::error::{Result, StorageError};
use crate::format::format_size;

/// Region used when none is configured.
const DEFAULT_REGION: &str = "us-east-1";

/// Count and aggregate size of the objects under a key prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SizeSummary {
    /// Number of objects
    pub number: u64,
    /// Human-readable total size
    pub size: String,
}

/// Thin wrapper over the S3 client for moving inspection assets.
pub struct StorageClient {
    s3: Client,
}

impl StorageClient {
    /// Build a client in the default region with credentials from
    /// `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`.
    ///
    /// Missing variables fall back to empty strings; S3 itself then
    /// rejects any call that needs real credentials.
    pub async fn new() -> Self {
        Self::with_region(DEFAULT_REGION).await
    }

    /// Build a client pinned to a region.
    pub async fn with_region(region: impl Into<String>) -> Self {
        let access_key = std::env::var("AWS_ACCESS_KEY_ID").unwrap_or_default();
        let secret_key = std::env::var("AWS_SECRET_ACCESS_KEY").unwrap_or_default();
        let credentials = Credentials::new(access_key, secret_key, None, None, "t2d2-storage");

        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.into()))
            .credentials_provider(credentials)
            .retry_config(RetryConfig::disabled())
            .load()
            .await;

        Self {
            s3: Client::new(&config),
        }
    }

    /// Wrap a pre-configured S3 client.
    pub fn with_client(s3: Client) -> Self {
        Self { s3 }
    }

    /// Download one object into a local file.
    pub async fn download_file(
        &self,
        bucket: &str,
        key: &str,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        debug!("downloading s3://{bucket}/{key}");
        let res = self.s3.get_object().bucket(bucket).key(key).send().await?;

        let mut file = File::create(path.as_ref()).await?;
        let mut body = res.body;
        while let Some(chunk) = body
            .try_next()
            .await
            .map_err(|err| StorageError::ByteStream(err.to_string()))?
        {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        Ok(())
    }

    /// Download the object an `s3://bucket.host/key` style URL points at.
    pub async fn download_url(&self, url: &str, path: impl AsRef<Path>) -> Result<()> {
        let (bucket, key) = parse_object_url(url)?;
        self.download_file(&bucket, &key, path).await
    }

    /// Upload a local file to a bucket/key, defaulting the ACL to
    /// `public-read`.
    pub async fn upload_file(
        &self,
        path: impl AsRef<Path>,
        bucket: &str,
        key: &str,
        acl: Option<ObjectCannedAcl>,
    ) -> Result<()> {
        debug!("uploading {} to s3://{bucket}/{key}", path.as_ref().display());
        let body = ByteStream::from_path(path.as_ref())
            .await
            .map_err(|err| StorageError::ByteStream(err.to_string()))?;

        self.s3
            .put_object()
            .bucket(bucket)
            .key(key)
            .acl(acl.unwrap_or(ObjectCannedAcl::PublicRead))
            .body(body)
            .send()
            .await?;
        Ok(())
    }

    /// Count the objects under a key prefix and sum their sizes.
    pub async fn calculate_sizes(&self, bucket: &str, prefix: &str) -> Result<SizeSummary> {
        let progress = ProgressBar::new_spinner();
        progress.set_message(format!("listing s3://{bucket}/{prefix}"));

        let mut number: u64 = 0;
        let mut total_size: u128 = 0;
        let mut continuation_token: Option<String> = None;

        loop {
            let mut req = self.s3.list_objects_v2().bucket(bucket).prefix(prefix);
            if let Some(token) = continuation_token {
                req = req.continuation_token(token);
            }
            let res = req.send().await?;

            for object in res.contents() {
                number += 1;
                total_size += object.size().unwrap_or(0).max(0) as u128;
                progress.inc(1);
            }

            continuation_token = res.next_continuation_token().map(String::from);
            if continuation_token.is_none() {
                break;
            }
        }

        progress.finish_and_clear();
        debug!("{number} objects under s3://{bucket}/{prefix}");

        Ok(SizeSummary {
            number,
            size: format_size(total_size),
        })
    }
}

/// Split an `s3://bucket.host/key` style URL into bucket and key.
///
/// The bucket is the first dot-separated label of the host; the key is
/// the path without its leading slash.
pub fn parse_object_url(url: &str) -> Result<(String, String)> {
    let parsed =
        Url::parse(url).map_err(|err| StorageError::InvalidUrl(format!("{url}: {err}")))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| StorageError::InvalidUrl(format!("{url}: no host")))?;
    let bucket = host.split('.').next().unwrap_or(host).to_string();
    let key = parsed.path().trim_start_matches('/').to_string();
    Ok((bucket, key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_with_dotted_host_splits_into_bucket_and_key() {
        let (bucket, key) = parse_object_url("s3://bucket1.example.com/path/to/obj").unwrap();
        assert_eq!(bucket, "bucket1");
        assert_eq!(key, "path/to/obj");
    }

    #[test]
    fn url_with_bare_bucket_host() {
        let (bucket, key) = parse_object_url("s3://mybucket/myfile").unwrap();
        assert_eq!(bucket, "mybucket");
        assert_eq!(key, "myfile");
    }

    #[test]
    fn https_virtual_hosted_url() {
        let (bucket, key) =
            parse_object_url("https://assets.s3.us-east-2.amazonaws.com/images/north.jpg").unwrap();
        assert_eq!(bucket, "assets");
        assert_eq!(key, "images/north.jpg");
    }

    #[test]
    fn garbage_url_is_rejected() {
        assert!(matches!(
            parse_object_url("not a url"),
            Err(StorageError::InvalidUrl(_))
        ));
    }
}
