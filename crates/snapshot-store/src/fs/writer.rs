//! Snapshot files are staged beside their final name and renamed into place,
//! so a reader of the run directory never sees a half-written capture.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

pub fn write_atomic(path: PathBuf, data: &[u8]) -> io::Result<PathBuf> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let staging = staging_path(&path);
    let written = File::create(&staging).and_then(|mut file| {
        file.write_all(data)?;
        file.sync_all()
    });
    if let Err(err) = written.and_then(|_| fs::rename(&staging, &path)) {
        discard(&staging);
        return Err(err);
    }
    Ok(path)
}

/// `dom/0001.html` stages as `dom/.0001.html.part`
fn staging_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(".part");
    path.with_file_name(name)
}

/// Drop one half of a capture pair whose partner failed to land
pub fn discard(path: &Path) {
    if let Err(err) = fs::remove_file(path) {
        debug!(path = %path.display(), error = %err, "nothing to discard");
    }
}
