use std::fmt;

use crate::error::{Error, Result};

/// Root under which Data Pipeline writes one prefix per pipeline id,
/// e.g. `s3://my-bucket/datapipeline-logs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLocation {
    pub bucket: String,
    pub prefix: String,
}

impl LogLocation {
    pub fn parse(uri: &str) -> Result<Self> {
        let rest = uri.strip_prefix("s3://").unwrap_or(uri);
        let (bucket, prefix) = rest.split_once('/').unwrap_or((rest, ""));
        if bucket.is_empty() {
            return Err(Error::InvalidLogDir(uri.to_string()));
        }

        let prefix = prefix
            .split('/')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("/");

        Ok(Self {
            bucket: bucket.to_string(),
            prefix,
        })
    }

    /// Key prefix holding every log directory of `pipeline_id`, always with a
    /// trailing slash.
    pub fn pipeline_prefix(&self, pipeline_id: &str) -> String {
        if self.prefix.is_empty() {
            format!("{}/", pipeline_id)
        } else {
            format!("{}/{}/", self.prefix, pipeline_id)
        }
    }
}

impl fmt::Display for LogLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.prefix.is_empty() {
            write!(f, "s3://{}", self.bucket)
        } else {
            write!(f, "s3://{}/{}", self.bucket, self.prefix)
        }
    }
}

/// Directory part of an object key; empty for keys at the bucket root.
pub fn parent_dir(key: &str) -> &str {
    key.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

pub fn base_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}
