//! Resolves `Location` values against the current target.

use anyhow::{Context, bail};
use url::Url;

use crate::config::Target;

/// Returns the target and path a redirect points at.
///
/// Absolute paths keep the current target. Absolute `http://` URLs name a
/// new one; the port defaults to 80.
pub fn resolve(current: &Target, location: &str) -> anyhow::Result<(Target, String)> {
    if location.starts_with('/') {
        return Ok((current.clone(), location.to_string()));
    }

    let Ok(url) = Url::parse(location) else {
        return Ok((current.clone(), format!("/{location}")));
    };
    if url.scheme() != "http" {
        bail!("unsupported redirect scheme in {location:?}");
    }

    let host = url.host_str().context("redirect URL has no host")?;
    let port = url.port_or_known_default().unwrap_or(80);
    let mut path = url.path().to_string();
    if let Some(query) = url.query() {
        path.push('?');
        path.push_str(query);
    }

    Ok((Target::new(host, port), path))
}
