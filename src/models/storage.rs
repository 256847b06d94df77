// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// URI schemes that address S3-compatible object storage
const OBJECT_SCHEMES: [&str; 2] = ["s3://", "gs://"];

/// Compression applied to a stored URL list or CSV
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionType {
    /// No compression applied
    None,
    /// Gzip compression
    Gzip,
}

impl CompressionType {
    /// Infer compression from a file name or object key
    pub fn from_name(name: &str) -> Self {
        if name.ends_with(".gz") {
            CompressionType::Gzip
        } else {
            CompressionType::None
        }
    }

    /// Get the content type header for uploaded CSV output
    pub fn csv_content_type(&self) -> &str {
        match self {
            CompressionType::None => "text/csv",
            CompressionType::Gzip => "application/gzip",
        }
    }
}

impl fmt::Display for CompressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionType::None => write!(f, "none"),
            CompressionType::Gzip => write!(f, "gzip"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocationError {
    #[error("Object path must be in format {scheme}bucket/key: {path}")]
    MissingKey { scheme: String, path: String },
    #[error("Object path has an empty bucket name: {0}")]
    EmptyBucket(String),
}

/// Where a URL list is read from or where results are written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Local(PathBuf),
    Object { bucket: String, key: String },
}

impl Location {
    /// Parse `s3://bucket/key`, `gs://bucket/key` or a local path
    pub fn parse(raw: &str) -> Result<Self, LocationError> {
        let Some(scheme) = OBJECT_SCHEMES.iter().find(|s| raw.starts_with(**s)) else {
            return Ok(Location::Local(PathBuf::from(raw)));
        };

        let rest = &raw[scheme.len()..];
        let (bucket, key) = rest
            .split_once('/')
            .filter(|(_, key)| !key.is_empty())
            .ok_or_else(|| LocationError::MissingKey {
                scheme: scheme.to_string(),
                path: raw.to_string(),
            })?;

        if bucket.is_empty() {
            return Err(LocationError::EmptyBucket(raw.to_string()));
        }

        Ok(Location::Object {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }

    pub fn compression(&self) -> CompressionType {
        match self {
            Location::Local(path) => CompressionType::from_name(&path.to_string_lossy()),
            Location::Object { key, .. } => CompressionType::from_name(key),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Local(path) => write!(f, "{}", path.display()),
            Location::Object { bucket, key } => write!(f, "s3://{}/{}", bucket, key),
        }
    }
}
