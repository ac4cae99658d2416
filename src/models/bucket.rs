//! Represents a mock storage bucket record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// Suffix appended to every bucket name to form its public domain.
pub const BUCKET_DOMAIN_SUFFIX: &str = ".s3.majestic-cloud.com";

const BUCKET_NAME_MIN_LEN: usize = 3;
const BUCKET_NAME_MAX_LEN: usize = 63;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("bucket `{name}` invalid: {reason}")]
pub struct InvalidBucketName {
    pub name: String,
    pub reason: &'static str,
}

/// A storage bucket as persisted and returned to clients.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq)]
pub struct Bucket {
    /// Unique identifier generated at creation.
    pub id: Uuid,

    /// Globally unique bucket name (DNS-compatible).
    pub bucket: String,

    /// Free-form tag string supplied by the client.
    pub tags: String,

    /// Always `<bucket>.s3.majestic-cloud.com`; never client-supplied.
    pub bucket_domain_name: String,

    /// When this bucket was created (UTC).
    pub created_at: DateTime<Utc>,
}

impl Bucket {
    /// Build a fresh record, stamping identifier, domain and creation time.
    pub fn new(name: impl Into<String>, tags: impl Into<String>) -> Self {
        let bucket = name.into();
        Self {
            id: Uuid::new_v4(),
            bucket_domain_name: domain_name_for(&bucket),
            bucket,
            tags: tags.into(),
            created_at: Utc::now(),
        }
    }
}

/// Derive the public domain name for a bucket.
pub fn domain_name_for(bucket: &str) -> String {
    format!("{}{}", bucket, BUCKET_DOMAIN_SUFFIX)
}

/// Validate a bucket name before it becomes part of a domain name.
///
/// - 3-63 characters
/// - lowercase letters, digits, dots, hyphens only
/// - starts and ends with a letter or digit
/// - no consecutive dots or dot-hyphen pairs
/// - not shaped like an IPv4 address
pub fn validate_bucket_name(name: &str) -> Result<(), InvalidBucketName> {
    let invalid = |reason: &'static str| -> Result<(), InvalidBucketName> {
        Err(InvalidBucketName {
            name: name.to_string(),
            reason,
        })
    };

    if !(BUCKET_NAME_MIN_LEN..=BUCKET_NAME_MAX_LEN).contains(&name.len()) {
        return invalid("must be between 3 and 63 characters");
    }

    if !name
        .chars()
        .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '.' | '-'))
    {
        return invalid("allowed characters are lowercase letters, digits, dots, and hyphens");
    }

    if name.starts_with(['.', '-']) || name.ends_with(['.', '-']) {
        return invalid("must start and end with a lowercase letter or digit");
    }

    if name.contains("..") || name.contains("-.") || name.contains(".-") {
        return invalid("cannot contain consecutive dots or dot-hyphen combinations");
    }

    if is_ipv4_like(name) {
        return invalid("must not be formatted like an IP address");
    }

    Ok(())
}

/// Check if a string matches IPv4-like dotted decimal form.
fn is_ipv4_like(name: &str) -> bool {
    let parts: Vec<&str> = name.split('.').collect();
    parts.len() == 4
        && parts.iter().all(|segment| {
            !segment.is_empty()
                && segment.len() <= 3
                && segment.chars().all(|c| c.is_ascii_digit())
                && segment.parse::<u8>().is_ok()
        })
}
