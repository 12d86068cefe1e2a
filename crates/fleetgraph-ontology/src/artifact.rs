//! Whole-file artifact writes shared by the renderers and exporters.

use std::fs;
use std::io;
use std::path::Path;

/// Overwrites `path` with `contents`, creating missing parent directories.
///
/// Not atomic: a failure mid-write can leave a truncated file behind, and the
/// fix is to re-run the step.
pub fn write_artifact(path: &Path, contents: impl AsRef<[u8]>) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}
