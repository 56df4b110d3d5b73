use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::Deadline;
use crate::error::{OkrError, OkrResult, Stage};

/// Replace `path` with `contents` via a sibling temp file and a rename.
///
/// Readers see either the old document or the new one. On any failure, including an
/// expired `deadline`, the temp file is removed and `path` is left as it was.
pub fn write_atomic(path: &Path, contents: &str, deadline: &Deadline) -> OkrResult<()> {
    let persist_err = |source| OkrError::Persist {
        path: path.to_path_buf(),
        source,
    };
    let tmp_path = temp_path(path).map_err(persist_err)?;

    if let Err(source) = write_synced(&tmp_path, contents) {
        let _ = fs::remove_file(&tmp_path);
        return Err(persist_err(source));
    }

    if let Err(e) = deadline.check(Stage::Persist) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    if let Err(source) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(persist_err(source));
    }

    tracing::debug!(path = %path.display(), bytes = contents.len(), "document written");
    Ok(())
}

fn write_synced(path: &Path, contents: &str) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}

/// `okrs.md` -> `okrs.md.tmp` in the same directory, so the rename stays on one filesystem.
fn temp_path(path: &Path) -> io::Result<PathBuf> {
    let mut name = path
        .file_name()
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("document path `{}` has no file name", path.display()),
            )
        })?
        .to_os_string();
    name.push(".tmp");
    Ok(path.with_file_name(name))
}
