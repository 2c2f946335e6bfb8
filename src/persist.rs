use crate::error::{Result, TransManifestError};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Replaces `path` with `contents`. The data goes to a temporary file in the
/// same directory first, so readers see either the old file or the new one.
pub fn write_atomic<P: AsRef<Path>>(path: P, contents: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| map_io_error(e, path))?;
    temp.write_all(contents)?;
    temp.flush()?;
    temp.persist(path).map_err(|e| map_io_error(e.error, path))?;

    tracing::debug!(path = %path.display(), bytes = contents.len(), "Wrote file");
    Ok(())
}

fn map_io_error(error: std::io::Error, path: &Path) -> TransManifestError {
    if error.kind() == std::io::ErrorKind::PermissionDenied {
        TransManifestError::Permission {
            path: path.display().to_string(),
        }
    } else {
        TransManifestError::Io(error)
    }
}
