/// Object storage client for post images
///
/// Uploads go into a fixed bucket under a fixed prefix and are retrieved
/// through a public base URL that is stored verbatim on the post row. Any
/// S3-compatible provider works via the endpoint override.
use crate::config::StorageConfig;
use crate::error::{AppError, Result};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use chrono::Utc;
use uuid::Uuid;

/// Largest accepted image upload.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

pub struct ImageStore {
    client: Client,
    bucket: String,
    key_prefix: String,
    public_base_url: String,
}

impl ImageStore {
    /// Build a store from configuration. Credentials and region come from
    /// the ambient AWS environment; `endpoint` points the client at
    /// S3-compatible providers.
    pub async fn from_config(config: &StorageConfig) -> Self {
        let base = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

        let client = match &config.endpoint {
            Some(endpoint) => {
                let s3_config = aws_sdk_s3::config::Builder::from(&base)
                    .endpoint_url(endpoint)
                    .force_path_style(true)
                    .build();
                Client::from_conf(s3_config)
            }
            None => Client::new(&base),
        };

        Self {
            client,
            bucket: config.bucket.clone(),
            key_prefix: config.key_prefix.clone(),
            public_base_url: config.public_base_url.clone(),
        }
    }

    /// Upload an image and return its public retrieval URL
    ///
    /// Objects are keyed `{prefix}/{owner}-{millis}-{filename}` so uploads
    /// never collide across users or time.
    pub async fn upload_image(
        &self,
        owner_id: Uuid,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String> {
        if !content_type.starts_with("image/") {
            return Err(AppError::Validation(
                "not an image! please upload an image".to_string(),
            ));
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(AppError::Validation(
                "image exceeds the 5 MiB limit".to_string(),
            ));
        }

        let key = format!(
            "{}/{}-{}-{}",
            self.key_prefix,
            owner_id,
            Utc::now().timestamp_millis(),
            sanitize_file_name(file_name),
        );

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|err| {
                tracing::error!("image upload failed: {}", err);
                AppError::Internal("image upload failed".to_string())
            })?;

        Ok(format!("{}/{}", self.public_base_url, key))
    }
}

/// Keep object keys URL-safe: anything outside [A-Za-z0-9._-] becomes '_'.
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_safe_names() {
        assert_eq!(sanitize_file_name("photo-1.jpg"), "photo-1.jpg");
    }

    #[test]
    fn test_sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_file_name("my photo (1).jpg"), "my_photo__1_.jpg");
    }

    #[test]
    fn test_sanitize_empty_name_falls_back() {
        assert_eq!(sanitize_file_name(""), "upload");
    }
}
