//! Writes fetched bodies to local files.

use std::path::{Path, PathBuf};

/// Local file name for a request path: its last segment, or `index.html`
/// for `/` and other paths without one.
pub fn file_name_for(path: &str) -> &str {
    let path = path.split('?').next().unwrap_or_default();
    match path.rsplit('/').next() {
        Some("" | "." | "..") | None => "index.html",
        Some(name) => name,
    }
}

pub async fn save(dir: &Path, path: &str, body: &[u8]) -> std::io::Result<PathBuf> {
    let file = dir.join(file_name_for(path));
    tokio::fs::write(&file, body).await?;
    Ok(file)
}
