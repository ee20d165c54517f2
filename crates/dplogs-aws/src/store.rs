use std::future::Future;
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use rusoto_s3::{GetObjectRequest, ListObjectsV2Output, ListObjectsV2Request, S3Client, S3};
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::error::{Error, Result};
use crate::utils::write_replacing;

/// A file as seen by one listing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFileEntry {
    pub key: String,
    pub last_modified: DateTime<Utc>,
}

impl RemoteFileEntry {
    pub fn new(key: impl Into<String>, last_modified: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            last_modified,
        }
    }
}

/// Object storage holding pipeline logs, addressed by key within one bucket.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Every file key at or below `prefix`, fetched lazily page by page.
    fn walk<'a>(&'a self, prefix: &'a str) -> BoxStream<'a, Result<String>>;

    /// Files directly inside `dir` (no trailing slash), with their timestamps.
    async fn list_detailed(&self, dir: &str) -> Result<Vec<RemoteFileEntry>>;

    /// Copies `key` to `dest`, replacing an existing file. Returns the byte count.
    async fn download(&self, key: &str, dest: &Path) -> Result<u64>;
}

pub struct S3LogStore {
    client: S3Client,
    bucket: String,
}

impl S3LogStore {
    pub fn new(client: S3Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    async fn list_page(
        &self,
        prefix: &str,
        delimiter: Option<&str>,
        continuation_token: Option<String>,
    ) -> Result<ListObjectsV2Output> {
        let req = ListObjectsV2Request {
            bucket: self.bucket.clone(),
            prefix: Some(prefix.to_string()),
            delimiter: delimiter.map(str::to_string),
            continuation_token,
            ..Default::default()
        };

        Ok(self.client.list_objects_v2(req).await?)
    }
}

pub(crate) fn next_token(page: &ListObjectsV2Output) -> Option<String> {
    if page.is_truncated.unwrap_or(false) {
        page.next_continuation_token.clone()
    } else {
        None
    }
}

/// Object keys of one page, without directory markers.
pub(crate) fn file_keys(page: ListObjectsV2Output) -> Vec<String> {
    page.contents
        .unwrap_or_default()
        .into_iter()
        .filter_map(|obj| obj.key)
        .filter(|key| !key.ends_with('/'))
        .collect()
}

pub(crate) fn detailed_entries(page: ListObjectsV2Output) -> Result<Vec<RemoteFileEntry>> {
    let mut entries = Vec::new();
    for obj in page.contents.unwrap_or_default() {
        let (key, modified) = match (obj.key, obj.last_modified) {
            (Some(key), Some(modified)) if !key.ends_with('/') => (key, modified),
            (key, _) => {
                debug!(?key, "skipping listing entry without key or timestamp");
                continue;
            }
        };
        let last_modified = DateTime::parse_from_rfc3339(&modified)
            .map_err(|source| Error::InvalidTimestamp {
                key: key.clone(),
                value: modified.clone(),
                source,
            })?
            .with_timezone(&Utc);
        entries.push(RemoteFileEntry { key, last_modified });
    }
    Ok(entries)
}

/// Streams the file keys of successive listing pages. `fetch` receives the
/// continuation token of the previous page (`None` for the first one).
pub(crate) fn walk_pages<'a, F, Fut>(mut fetch: F) -> BoxStream<'a, Result<String>>
where
    F: FnMut(Option<String>) -> Fut + Send + 'a,
    Fut: Future<Output = Result<ListObjectsV2Output>> + Send + 'a,
{
    // (token for the next request, whether the listing is exhausted)
    stream::try_unfold((None::<String>, false), move |(token, done)| {
        let request = if done { None } else { Some(fetch(token)) };
        async move {
            let page = match request {
                Some(request) => request.await?,
                None => return Ok::<_, Error>(None),
            };
            let next = next_token(&page);
            let finished = next.is_none();
            Ok(Some((file_keys(page), (next, finished))))
        }
    })
    .map_ok(|keys| stream::iter(keys.into_iter().map(Ok::<_, Error>)))
    .try_flatten()
    .boxed()
}

#[async_trait]
impl LogStore for S3LogStore {
    fn walk<'a>(&'a self, prefix: &'a str) -> BoxStream<'a, Result<String>> {
        walk_pages(move |token| self.list_page(prefix, None, token))
    }

    async fn list_detailed(&self, dir: &str) -> Result<Vec<RemoteFileEntry>> {
        let prefix = format!("{}/", dir.trim_end_matches('/'));
        let mut entries = Vec::new();
        let mut token = None;

        loop {
            let page = self.list_page(&prefix, Some("/"), token).await?;
            token = next_token(&page);
            entries.extend(detailed_entries(page)?);

            if token.is_none() {
                break;
            }
        }

        debug!(dir, files = entries.len(), "listed directory");
        Ok(entries)
    }

    async fn download(&self, key: &str, dest: &Path) -> Result<u64> {
        let req = GetObjectRequest {
            bucket: self.bucket.clone(),
            key: key.to_string(),
            ..Default::default()
        };

        let output = self.client.get_object(req).await?;
        let body = output
            .body
            .ok_or_else(|| Error::MissingBody(key.to_string()))?;

        let mut bytes = Vec::new();
        body.into_async_read().read_to_end(&mut bytes).await?;
        write_replacing(dest, &bytes)?;

        Ok(bytes.len() as u64)
    }
}
