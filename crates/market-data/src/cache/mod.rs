//! Two-tier raw payload cache used by the MEFF provider.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::errors::MarketDataError;
use crate::transport::HttpFetcher;

/// Byte-exact cache of downloaded archives, keyed by request URL.
///
/// Entries live in an in-process map (gone on restart) and as one file per
/// URL — named by the URL's final path segment — under `dir`. Entries are
/// never evicted; staleness is only detected at request time by comparing
/// the disk file's modification time against the remote `Last-Modified`
/// header, and the disk copy wins only when it is strictly newer.
///
/// Disk writes are plain whole-file writes with no temp-file-and-rename
/// step: concurrent processes sharing the directory race last-writer-wins.
///
/// The cache is an explicit object so callers control its scope; tests get
/// a fresh one per case instead of sharing hidden process-wide state.
pub struct PayloadCache {
    dir: PathBuf,
    memory: Mutex<HashMap<String, Bytes>>,
}

impl PayloadCache {
    /// A cache storing its files under `dir`. The directory is created
    /// lazily before the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            memory: Mutex::new(HashMap::new()),
        }
    }

    /// The disk directory backing this cache.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the payload for `url`, downloading it at most once.
    ///
    /// Resolution order: the in-memory map; the disk file when strictly
    /// newer than the remote resource; the network. Whatever wins is stored
    /// in the faster tiers on the way out.
    pub async fn resolve(
        &self,
        fetcher: &HttpFetcher,
        url: &str,
    ) -> Result<Bytes, MarketDataError> {
        if let Some(data) = self.memory.lock().await.get(url) {
            debug!("{url} was found in the memory cache");
            return Ok(data.clone());
        }

        // The request is sent before consulting the disk: the comparison
        // below needs the response's Last-Modified header.
        let response = fetcher.send(url).await?;
        let file = self.dir.join(file_name(url));

        if let Some(data) = read_if_newer(&file, last_modified(&response)) {
            debug!("{url} was found in the disk cache");
            // The connection was opened only to compare timestamps; dropping
            // the response closes it without downloading the body.
            drop(response);

            let data = Bytes::from(data);
            self.memory
                .lock()
                .await
                .insert(url.to_string(), data.clone());
            return Ok(data);
        }

        let data = response
            .bytes()
            .await
            .map_err(|e| MarketDataError::contact(fetcher.provider(), e))?;

        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(&file, &data)?;

        self.memory
            .lock()
            .await
            .insert(url.to_string(), data.clone());
        Ok(data)
    }
}

/// Reads the disk copy when it exists and is strictly newer than the remote
/// resource. A file that cannot be read is treated as absent (the network
/// copy is used instead) rather than failing the request.
fn read_if_newer(file: &Path, remote_modified: Option<DateTime<Utc>>) -> Option<Vec<u8>> {
    let remote_modified = remote_modified?;
    let metadata = std::fs::metadata(file).ok()?;
    let disk_modified: DateTime<Utc> = metadata.modified().ok()?.into();
    if disk_modified <= remote_modified {
        return None;
    }

    match std::fs::read(file) {
        Ok(data) => Some(data),
        Err(e) => {
            warn!(
                "failed to read cached file {}: {e}; falling back to the network",
                file.display()
            );
            None
        }
    }
}

/// `Last-Modified` of the response, when present and well-formed.
fn last_modified(response: &reqwest::Response) -> Option<DateTime<Utc>> {
    let value = response.headers().get(reqwest::header::LAST_MODIFIED)?;
    let value = value.to_str().ok()?;
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Final path segment of the URL, used as the cache file name.
fn file_name(url: &str) -> &str {
    match url.rfind('/') {
        Some(index) => &url[index + 1..],
        None => url,
    }
}
