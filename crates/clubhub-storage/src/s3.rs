use crate::keys::validate_key;
use crate::traits::{key_under_base, report_progress, ProgressFn, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{MultipartUpload, ObjectStoreExt, PutPayload, Result as ObjectResult};

/// Smallest part S3 accepts for every part of a multipart upload but the last.
pub const MIN_PART_SIZE: usize = 5 * 1024 * 1024;

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
    public_base_url: Option<String>,
    part_size: usize,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    /// * `public_base_url` - Optional CDN or custom domain objects are served from
    /// * `part_size` - Multipart part size; raised to the S3 minimum when smaller
    pub fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        public_base_url: Option<String>,
        part_size: usize,
    ) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage {
            store,
            bucket,
            region,
            endpoint_url,
            public_base_url,
            part_size: part_size.max(MIN_PART_SIZE),
        })
    }

    /// Base every public URL starts with.
    ///
    /// A configured public base URL wins; S3-compatible providers use path-style
    /// `{endpoint}/{bucket}`; AWS uses `https://{bucket}.s3.{region}.amazonaws.com`.
    fn url_base(&self) -> String {
        if let Some(ref base) = self.public_base_url {
            base.trim_end_matches('/').to_string()
        } else if let Some(ref endpoint) = self.endpoint_url {
            format!("{}/{}", endpoint.trim_end_matches('/'), self.bucket)
        } else {
            format!("https://{}.s3.{}.amazonaws.com", self.bucket, self.region)
        }
    }

    async fn put_single(&self, location: &Path, data: Bytes) -> ObjectResult<()> {
        self.store.put(location, PutPayload::from(data)).await?;
        Ok(())
    }

    async fn put_multipart(
        &self,
        location: &Path,
        data: Bytes,
        progress: &ProgressFn,
    ) -> ObjectResult<()> {
        let total = data.len();
        let mut upload = self.store.put_multipart(location).await?;
        let mut sent = 0;

        while sent < total {
            let end = (sent + self.part_size).min(total);
            let part = data.slice(sent..end);
            if let Err(e) = upload.put_part(PutPayload::from(part)).await {
                if let Err(abort_err) = upload.abort().await {
                    tracing::warn!(
                        error = %abort_err,
                        bucket = %self.bucket,
                        location = %location,
                        "Failed to abort S3 multipart upload"
                    );
                }
                return Err(e);
            }
            sent = end;
            if sent < total {
                report_progress(progress, sent, total);
            }
        }

        upload.complete().await?;
        Ok(())
    }
}

/// Request-level failures surface as `Generic`; everything else is a storage answer.
fn map_put_error(err: ObjectStoreError) -> StorageError {
    match err {
        ObjectStoreError::Generic { .. } => StorageError::Transport(err.to_string()),
        other => StorageError::UploadFailed(other.to_string()),
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn upload(
        &self,
        storage_key: &str,
        _content_type: &str,
        data: Bytes,
        progress: ProgressFn,
    ) -> StorageResult<String> {
        validate_key(storage_key)?;
        let size = data.len();
        let location = Path::from(storage_key.to_string());
        let start = std::time::Instant::now();

        progress(0.0);
        let result = if size > self.part_size {
            self.put_multipart(&location, data, &progress).await
        } else {
            self.put_single(&location, data).await
        };

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            map_put_error(e)
        })?;

        report_progress(&progress, size, size);
        let url = self.public_url(storage_key);

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(url)
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        validate_key(storage_key)?;
        let start = std::time::Instant::now();
        let location = Path::from(storage_key.to_string());

        let result: ObjectResult<_> = self.store.delete(&location).await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 delete failed"
            );
            match e {
                ObjectStoreError::NotFound { .. } => StorageError::NotFound(storage_key.to_string()),
                ObjectStoreError::Generic { .. } => StorageError::Transport(e.to_string()),
                other => StorageError::DeleteFailed(other.to_string()),
            }
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        validate_key(storage_key)?;
        let location = Path::from(storage_key.to_string());
        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("{}/{}", self.url_base(), storage_key)
    }

    fn key_from_url(&self, url: &str) -> Option<String> {
        key_under_base(&self.url_base(), url)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
