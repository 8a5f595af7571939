//! Identifiers for saved schedules
//!
//! ID Format: `s-{7-char-hash}` (e.g., `s-7f2b4c1`)
//!
//! Hash is derived from the schedule content + creation timestamp, so
//! re-running an identical schedule later yields a new ID.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid schedule ID format: expected 's-{{7-char-hash}}', got '{0}'")]
    InvalidScheduleId(String),
}

/// Generates a 7-character hash from content and timestamp
fn generate_hash(content: &[u8], timestamp: DateTime<Utc>) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(content);
    hasher.update(&timestamp.timestamp_nanos_opt().unwrap_or(0).to_le_bytes());
    let hex = hasher.finalize().to_hex();
    hex[..7].to_string()
}

/// Schedule ID in the format `s-{7-char-hash}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScheduleId {
    hash: String,
}

impl ScheduleId {
    /// Creates a new schedule ID from content and timestamp
    pub fn new(content: &[u8], timestamp: DateTime<Utc>) -> Self {
        Self {
            hash: generate_hash(content, timestamp),
        }
    }

    /// Returns the hash portion of the ID
    pub fn hash(&self) -> &str {
        &self.hash
    }
}

impl fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s-{}", self.hash)
    }
}

impl FromStr for ScheduleId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let hash = s
            .strip_prefix("s-")
            .ok_or_else(|| IdError::InvalidScheduleId(s.to_string()))?;

        if hash.len() != 7 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(IdError::InvalidScheduleId(s.to_string()));
        }

        Ok(Self {
            hash: hash.to_ascii_lowercase(),
        })
    }
}

impl TryFrom<String> for ScheduleId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ScheduleId> for String {
    fn from(id: ScheduleId) -> Self {
        id.to_string()
    }
}
