use crate::client::CommonsClient;
use crate::error::Result;
use std::fs;
use std::path::Path;
use tracing::debug;

/// How an asset ended up on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Destination already held a non-empty file; no request was made.
    Cached,
    /// Fresh download, written to the destination.
    Downloaded,
}

/// Replace every character outside `[A-Za-z0-9_.-]` with an underscore so a
/// Commons title becomes a safe cache file name.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn is_cached(dest: &Path) -> bool {
    fs::metadata(dest).map(|m| m.len() > 0).unwrap_or(false)
}

/// Download `url` to `dest` unless a non-empty copy is already there.
///
/// Zero-byte leftovers from interrupted runs do not count as cached.
pub async fn fetch_asset(client: &CommonsClient, url: &str, dest: &Path) -> Result<FetchOutcome> {
    if is_cached(dest) {
        debug!("cache hit for {}", dest.display());
        return Ok(FetchOutcome::Cached);
    }

    let bytes = client.download_bytes(url).await?;
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(dest, &bytes)?;
    Ok(FetchOutcome::Downloaded)
}
