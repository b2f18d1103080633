//! Atomic textfile output for node_exporter-style collection.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use super::MetricsError;
use super::exposition::encode_text;
use super::registry::Registry;

/// Encodes `registry` and writes it to `path`.
///
/// The text goes to a temporary file next to `path` which is then renamed
/// over it, so a scraper never reads a partial file.
pub fn write_textfile(path: &Path, registry: &Registry) -> Result<(), MetricsError> {
    let text = encode_text(registry);

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(text.as_bytes())?;
    tmp.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))?;
    }

    tmp.persist(path).map_err(|e| MetricsError::Io(e.error))?;
    debug!(
        "Wrote {} samples ({} bytes) to {}",
        registry.sample_count(),
        text.len(),
        path.display()
    );
    Ok(())
}
