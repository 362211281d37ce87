//! Static file lookup under a fixed root directory.

use std::path::PathBuf;

use tokio::fs;

/// Outcome of resolving a request path.
#[derive(Debug, PartialEq, Eq)]
pub enum Lookup {
    Found {
        content: Vec<u8>,
        content_type: &'static str,
    },
    NotFound,
}

#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves `path` against the root and reads the file as bytes.
    ///
    /// `/` means `/index.html`. Directories and anything that resolves
    /// outside the root are `NotFound`.
    pub async fn lookup(&self, path: &str) -> Lookup {
        let path = if path == "/" { "/index.html" } else { path };
        let relative = path.trim_start_matches('/');

        let Ok(root) = fs::canonicalize(&self.root).await else {
            tracing::warn!(root = %self.root.display(), "serving root not found");
            return Lookup::NotFound;
        };
        let Ok(file) = fs::canonicalize(root.join(relative)).await else {
            return Lookup::NotFound;
        };

        if !file.starts_with(&root) {
            tracing::warn!(path, resolved = %file.display(), "path escapes serving root");
            return Lookup::NotFound;
        }

        match fs::metadata(&file).await {
            Ok(meta) if meta.is_file() => {}
            _ => return Lookup::NotFound,
        }

        match fs::read(&file).await {
            Ok(content) => Lookup::Found {
                content,
                content_type: crate::http::mime::content_type(
                    file.extension().and_then(|e| e.to_str()),
                ),
            },
            Err(e) => {
                tracing::error!(path, error = %e, "failed to read file");
                Lookup::NotFound
            }
        }
    }
}
