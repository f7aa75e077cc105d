use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::{MediaError, Result};

/// Download a remote media URL into the cache so it can be probed,
/// thumbnailed, and served locally. Repeated calls for the same URL return
/// the cached file without touching the network.
pub fn cache_remote(url: &str, cache_dir: &Path) -> Result<PathBuf> {
    let path = cache_dir.join(cache_file_name(url));
    if path.exists() {
        return Ok(path);
    }

    std::fs::create_dir_all(cache_dir).map_err(MediaError::Io)?;

    tracing::info!("fetching remote media: {url}");
    let response = reqwest::blocking::get(url)?.error_for_status()?;
    let bytes = response.bytes()?;
    std::fs::write(&path, &bytes).map_err(MediaError::Io)?;

    Ok(path)
}

/// Stable cache file name for a URL: SHA-256 of the URL, keeping the
/// original extension so mime detection keeps working.
fn cache_file_name(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    let digest = hasher.finalize();
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();

    match url_extension(url) {
        Some(ext) => format!("{hex}.{ext}"),
        None => hex,
    }
}

fn url_extension(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let name = path.rsplit('/').next()?;
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() || ext.len() > 5 {
        None
    } else {
        Some(ext)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
