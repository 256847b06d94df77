// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::storage::{CompressionType, Location};
use anyhow::{anyhow, Context, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use s3::creds::Credentials;
use s3::Bucket;
use s3::Region;
use std::io::{Read, Write};
use tracing::info;

/// Configuration for S3-compatible storage
#[derive(Debug, Clone)]
pub struct S3Config {
    pub endpoint: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
}

impl S3Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let endpoint = std::env::var("S3_ENDPOINT")
            .map_err(|_| anyhow!("S3_ENDPOINT environment variable not set"))?;
        let access_key = std::env::var("S3_ACCESS_KEY")
            .map_err(|_| anyhow!("S3_ACCESS_KEY environment variable not set"))?;
        let secret_key = std::env::var("S3_SECRET_KEY")
            .map_err(|_| anyhow!("S3_SECRET_KEY environment variable not set"))?;

        let region = std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string());

        Ok(Self {
            endpoint,
            region,
            access_key,
            secret_key,
        })
    }
}

/// Client for URL lists and result files kept in S3-compatible object storage
pub struct StorageClient {
    region: Region,
    credentials: Credentials,
}

impl StorageClient {
    pub fn new(config: S3Config) -> Result<Self> {
        let region = Region::Custom {
            region: config.region,
            endpoint: config.endpoint,
        };

        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| anyhow!("Failed to create S3 credentials: {}", e))?;

        Ok(Self {
            region,
            credentials,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(S3Config::from_env()?)
    }

    fn bucket(&self, name: &str) -> Result<Box<Bucket>> {
        Ok(
            Bucket::new(name, self.region.clone(), self.credentials.clone())
                .map_err(|e| anyhow!("Failed to open S3 bucket {}: {}", name, e))?
                .with_path_style(),
        )
    }

    /// Download an object's raw bytes
    pub async fn get_bytes(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let response = self
            .bucket(bucket)?
            .get_object(key)
            .await
            .map_err(|e| anyhow!("Failed to get s3://{}/{}: {}", bucket, key, e))?;

        Ok(response.bytes().to_vec())
    }

    /// Upload `data` under `key`
    pub async fn put_bytes(
        &self,
        bucket: &str,
        key: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<()> {
        self.bucket(bucket)?
            .put_object_with_content_type(key, data, content_type)
            .await
            .map_err(|e| anyhow!("Failed to upload s3://{}/{}: {}", bucket, key, e))?;

        info!(
            "Uploaded s3://{}/{} ({} bytes, {})",
            bucket,
            key,
            data.len(),
            content_type
        );
        Ok(())
    }
}

/// Read a local file or object as text, gunzipping `.gz` locations
pub async fn read_text(location: &Location) -> Result<String> {
    let raw = match location {
        Location::Local(path) => tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        Location::Object { bucket, key } => {
            StorageClient::from_env()?.get_bytes(bucket, key).await?
        }
    };

    let bytes = match location.compression() {
        CompressionType::Gzip => decompress(&raw)?,
        CompressionType::None => raw,
    };

    String::from_utf8(bytes).map_err(|e| anyhow!("Invalid UTF-8 in {}: {}", location, e))
}

/// Write CSV bytes to a local file or object, gzipping `.gz` locations
pub async fn write_csv(location: &Location, csv: Vec<u8>) -> Result<()> {
    let compression = location.compression();
    let data = match compression {
        CompressionType::Gzip => compress(&csv)?,
        CompressionType::None => csv,
    };

    match location {
        Location::Local(path) => tokio::fs::write(path, &data)
            .await
            .with_context(|| format!("Failed to write {}", path.display())),
        Location::Object { bucket, key } => {
            StorageClient::from_env()?
                .put_bytes(bucket, key, &data, compression.csv_content_type())
                .await
        }
    }
}

/// Compress data using gzip
fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| anyhow!("Failed to compress: {}", e))?;
    encoder
        .finish()
        .map_err(|e| anyhow!("Failed to finish compression: {}", e))
}

/// Decompress gzip data
fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(data);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| anyhow!("Failed to decompress: {}", e))?;
    Ok(decompressed)
}
