//! Cloud storage output support (S3, R2, GCS, Azure)

use crate::error::{Error, Result};
use bytes::Bytes;
use chrono::{NaiveDate, Utc};
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Build a Hive-style partitioned object key for a file
///
/// Format: `dt={YYYY-MM-DD}/{file_name}`
///
/// Example: `dt=2025-12-14/user_activity_logs.json`
pub fn build_partitioned_path(date: NaiveDate, file_name: &str) -> String {
    format!("dt={}/{file_name}", date.format("%Y-%m-%d"))
}

/// Split `bucket/some/prefix` into the bucket and the prefix
fn split_bucket(without_scheme: &str) -> (&str, String) {
    match without_scheme.find('/') {
        Some(idx) => (
            &without_scheme[..idx],
            without_scheme[idx + 1..].to_string(),
        ),
        None => (without_scheme, String::new()),
    }
}

/// Cloud storage destination parsed from URL
#[derive(Debug, Clone)]
pub struct CloudDestination {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Base path prefix within the bucket/container
    prefix: String,
    /// Bucket, container or local directory for reporting
    location: String,
    /// Original URL scheme for logging
    scheme: String,
}

impl CloudDestination {
    /// Parse a destination URL and create appropriate object store
    ///
    /// Supported formats:
    /// - `s3://bucket/path/` - AWS S3
    /// - `r2://bucket/path/` - Cloudflare R2 (S3-compatible)
    /// - `gs://bucket/path/` - Google Cloud Storage
    /// - `az://container/path/` - Azure Blob Storage
    /// - `/local/path/` or `./path/` - Local filesystem
    ///
    /// Credentials are read from the environment by `object_store`.
    pub fn parse(url: &str) -> Result<Self> {
        if url.starts_with("s3://") {
            Self::parse_s3(url, false)
        } else if url.starts_with("r2://") {
            Self::parse_s3(url, true)
        } else if url.starts_with("gs://") {
            Self::parse_gcs(url)
        } else if url.starts_with("az://") {
            Self::parse_azure(url)
        } else {
            Self::parse_local(url)
        }
    }

    /// Parse S3 or R2 URL
    fn parse_s3(url: &str, is_r2: bool) -> Result<Self> {
        let scheme = if is_r2 { "r2" } else { "s3" };
        let without_scheme = url
            .strip_prefix(&format!("{scheme}://"))
            .ok_or_else(|| Error::config(format!("Invalid {scheme} URL: {url}")))?;
        let (bucket, prefix) = split_bucket(without_scheme);

        let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);

        // R2 endpoint: https://<account_id>.r2.cloudflarestorage.com
        // AWS_ENDPOINT is already read by from_env()
        if is_r2 {
            if let Ok(endpoint) = std::env::var("R2_ENDPOINT_URL") {
                builder = builder.with_endpoint(endpoint);
            }
        }

        let store = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to create {scheme} client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            location: bucket.to_string(),
            scheme: scheme.to_string(),
        })
    }

    /// Parse GCS URL
    fn parse_gcs(url: &str) -> Result<Self> {
        let without_scheme = url
            .strip_prefix("gs://")
            .ok_or_else(|| Error::config(format!("Invalid GCS URL: {url}")))?;
        let (bucket, prefix) = split_bucket(without_scheme);

        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| Error::config(format!("Failed to create GCS client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            location: bucket.to_string(),
            scheme: "gs".to_string(),
        })
    }

    /// Parse Azure Blob URL
    fn parse_azure(url: &str) -> Result<Self> {
        let without_scheme = url
            .strip_prefix("az://")
            .ok_or_else(|| Error::config(format!("Invalid Azure URL: {url}")))?;
        let (container, prefix) = split_bucket(without_scheme);

        let store = MicrosoftAzureBuilder::from_env()
            .with_container_name(container)
            .build()
            .map_err(|e| Error::config(format!("Failed to create Azure client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            location: container.to_string(),
            scheme: "az".to_string(),
        })
    }

    /// Parse local filesystem path
    fn parse_local(path: &str) -> Result<Self> {
        let path = path.strip_prefix("file://").unwrap_or(path);
        if path.is_empty() {
            return Err(Error::config("Empty upload destination"));
        }

        std::fs::create_dir_all(path)
            .map_err(|e| Error::config(format!("Failed to create directory {path}: {e}")))?;

        let store = LocalFileSystem::new_with_prefix(path)
            .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix: String::new(),
            location: path.trim_end_matches('/').to_string(),
            scheme: "file".to_string(),
        })
    }

    /// Check if this is a cloud destination (not local)
    pub fn is_cloud(&self) -> bool {
        self.scheme != "file"
    }

    /// Get the scheme (s3, r2, gs, az, file)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Object key for `filename` under this destination's prefix
    fn object_path(&self, filename: &str) -> ObjectPath {
        let prefix = self.prefix.trim_matches('/');
        if prefix.is_empty() {
            ObjectPath::from(filename)
        } else {
            ObjectPath::from(format!("{prefix}/{filename}"))
        }
    }

    /// Write bytes to a file in the destination, returning its full URL
    pub async fn write(&self, filename: &str, data: Bytes) -> Result<String> {
        let path = self.object_path(filename);

        self.store
            .put(&path, data.into())
            .await
            .map_err(|e| Error::output(format!("Failed to write {path}: {e}")))?;

        Ok(format!("{}://{}/{path}", self.scheme, self.location))
    }

    /// Upload a local file as a single object
    ///
    /// The object keeps the local file name; with `partition_by_date` it
    /// lands under `dt={today}/`.
    pub async fn upload_file(&self, local: &Path, partition_by_date: bool) -> Result<String> {
        let file_name = local
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                Error::output(format!("Not a file path: {}", local.display()))
            })?;

        let key = if partition_by_date {
            build_partitioned_path(Utc::now().date_naive(), file_name)
        } else {
            file_name.to_string()
        };

        let data = tokio::fs::read(local).await.map_err(|e| {
            Error::output(format!("Failed to read {}: {e}", local.display()))
        })?;
        debug!(bytes = data.len(), key = %key, "Uploading activity file");

        let url = self.write(&key, Bytes::from(data)).await?;
        info!(url = %url, "Uploaded activity file");
        Ok(url)
    }
}
