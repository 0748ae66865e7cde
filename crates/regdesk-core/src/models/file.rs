use std::fmt;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which document of the submission a file is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRole {
    Cv,
    Transcript,
}

impl FileRole {
    /// Tag used in storage names and in logs.
    pub fn tag(&self) -> &'static str {
        match self {
            FileRole::Cv => "cv",
            FileRole::Transcript => "transcript",
        }
    }

    /// Name of the multipart part carrying this file.
    pub fn form_field(&self) -> &'static str {
        self.tag()
    }
}

impl fmt::Display for FileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// An uploaded document held fully in memory.
///
/// `data` is reference counted so each retry attempt can resend it without
/// copying the buffer.
#[derive(Debug, Clone)]
pub struct FilePayload {
    pub role: FileRole,
    pub content_type: String,
    pub data: Bytes,
    /// When the request body finished reading. Feeds the storage name.
    pub created_at: DateTime<Utc>,
}

impl FilePayload {
    pub fn new(role: FileRole, content_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            role,
            content_type: content_type.into(),
            data,
            created_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A file that was stored and made publicly readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    pub object_id: String,
    pub url: String,
}
