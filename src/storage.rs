use anyhow::Context;
use async_trait::async_trait;
use aws_config::{defaults, BehaviorVersion};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::{Builder as S3ConfigBuilder, Region},
    presigning::PresigningConfig,
    Client,
};
use aws_smithy_types::byte_stream::ByteStream;
use bytes::Bytes;
use uuid::Uuid;

use crate::config::StorageConfig;

/// Seconds a presigned photo link stays valid.
pub const PHOTO_URL_TTL_SECS: u64 = 600;

#[async_trait]
pub trait StorageClient: Send + Sync {
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()>;
    async fn presign_get(&self, key: &str, seconds: u64) -> anyhow::Result<String>;
}

#[derive(Clone)]
pub struct Storage {
    client: Client,
    bucket: String,
}

impl Storage {
    pub async fn new(cfg: &StorageConfig) -> anyhow::Result<Self> {
        let shared = defaults(BehaviorVersion::latest())
            .region(Region::new(cfg.region.clone()))
            .credentials_provider(Credentials::new(
                &cfg.access_key,
                &cfg.secret_key,
                None,
                None,
                "static",
            ))
            .endpoint_url(&cfg.endpoint)
            .load()
            .await;

        let conf = S3ConfigBuilder::from(&shared)
            .endpoint_url(&cfg.endpoint)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: Client::from_conf(conf),
            bucket: cfg.bucket.clone(),
        })
    }
}

#[async_trait]
impl StorageClient for Storage {
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .context("s3 put_object")?;
        Ok(())
    }

    async fn presign_get(&self, key: &str, seconds: u64) -> anyhow::Result<String> {
        let req = self.client.get_object().bucket(&self.bucket).key(key);
        let presigned = req
            .presigned(PresigningConfig::expires_in(
                std::time::Duration::from_secs(seconds),
            )?)
            .await
            .context("s3 presign_get")?;
        Ok(presigned.uri().to_string())
    }
}

pub fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

/// Object key for a food photo uploaded by `user_id`.
pub fn photo_key(user_id: Uuid, photo_id: Uuid, content_type: &str) -> String {
    let ext = ext_from_mime(content_type).unwrap_or("bin");
    format!("foods/{}/{}.{}", user_id, photo_id, ext)
}

/// True when `key` has the `photo_key` layout under `user_id`'s prefix.
pub fn is_user_photo_key(user_id: Uuid, key: &str) -> bool {
    let prefix = format!("foods/{}/", user_id);
    match key.strip_prefix(&prefix) {
        Some(name) => {
            !name.is_empty() && !name.starts_with('.') && !name.contains(['/', '\\'])
        }
        None => false,
    }
}

/// Store a food photo and return its key.
pub async fn upload_photo(
    storage: &dyn StorageClient,
    user_id: Uuid,
    body: Bytes,
    content_type: &str,
) -> anyhow::Result<String> {
    anyhow::ensure!(!body.is_empty(), "empty image");
    let key = photo_key(user_id, Uuid::new_v4(), content_type);
    storage
        .put_object(&key, body, content_type)
        .await
        .with_context(|| format!("put_object {}", key))?;
    Ok(key)
}
