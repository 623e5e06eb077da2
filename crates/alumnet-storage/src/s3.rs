use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};
use std::collections::HashMap;
use std::sync::Mutex;

/// S3 storage implementation
///
/// One `AmazonS3` client is built per bucket on first use and reused for every
/// later `put` to that bucket.
pub struct S3Storage {
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
    stores: Mutex<HashMap<String, AmazonS3>>,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub fn new(region: String, endpoint_url: Option<String>) -> Self {
        S3Storage {
            region,
            endpoint_url,
            stores: Mutex::new(HashMap::new()),
        }
    }

    fn store_for(&self, bucket: &str) -> StorageResult<AmazonS3> {
        let mut stores = self
            .stores
            .lock()
            .map_err(|_| StorageError::ConfigError("S3 client cache poisoned".to_string()))?;

        if let Some(store) = stores.get(bucket) {
            return Ok(store.clone());
        }

        let mut builder = AmazonS3Builder::from_env()
            .with_region(self.region.clone())
            .with_bucket_name(bucket.to_string());

        if let Some(ref endpoint) = self.endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;
        stores.insert(bucket.to_string(), store.clone());
        Ok(store)
    }
}

/// Map an object store error onto the transient/permanent split.
fn classify_error(err: ObjectStoreError) -> StorageError {
    match err {
        ObjectStoreError::PermissionDenied { .. }
        | ObjectStoreError::Unauthenticated { .. }
        | ObjectStoreError::InvalidPath { .. }
        | ObjectStoreError::NotSupported { .. } => StorageError::Rejected(err.to_string()),
        other => StorageError::UploadFailed(other.to_string()),
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<String> {
        validate_key(key)?;
        let store = self.store_for(bucket)?;
        let size = data.len() as u64;
        let location = Path::from(key);

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        let start = std::time::Instant::now();

        store
            .put_opts(&location, PutPayload::from(data), options)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %bucket,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 put failed"
                );
                classify_error(e)
            })?;

        tracing::info!(
            bucket = %bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 put successful"
        );

        Ok(location.to_string())
    }

    /// For AWS S3, uses the standard format: https://{bucket}.s3.{region}.amazonaws.com/{path}
    /// For S3-compatible providers, uses path-style URLs on the endpoint
    fn public_url(&self, bucket: &str, path: &str) -> String {
        if let Some(ref endpoint) = self.endpoint_url {
            let base_url = endpoint.trim_end_matches('/');
            format!("{}/{}/{}", base_url, bucket, path)
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                bucket, self.region, path
            )
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_url_aws() {
        let storage = S3Storage::new("eu-west-1".to_string(), None);
        assert_eq!(
            storage.public_url("media", "images/a.jpg"),
            "https://media.s3.eu-west-1.amazonaws.com/images/a.jpg"
        );
    }

    #[test]
    fn test_public_url_custom_endpoint() {
        let storage = S3Storage::new(
            "us-east-1".to_string(),
            Some("http://localhost:9000/".to_string()),
        );
        assert_eq!(
            storage.public_url("media", "videos/b.mp4"),
            "http://localhost:9000/media/videos/b.mp4"
        );
    }

    #[test]
    fn test_backend_type() {
        let storage = S3Storage::new("us-east-1".to_string(), None);
        assert_eq!(storage.backend_type(), StorageBackend::S3);
    }

    #[tokio::test]
    async fn test_put_rejects_invalid_key_before_network() {
        let storage = S3Storage::new("us-east-1".to_string(), None);
        let result = storage
            .put("media", "../secret", Bytes::new(), "image/jpeg")
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }
}
