use std::path::{Path, PathBuf};

pub const DOM_DIR: &str = "dom";
pub const SCREENS_DIR: &str = "screens";

/// Path relative to the run directory, as recorded in the artifact map
pub fn dom_ref(id: u32) -> String {
    format!("{}/{:04}.html", DOM_DIR, id)
}

pub fn screen_ref(id: u32) -> String {
    format!("{}/{:04}.png", SCREENS_DIR, id)
}

pub fn resolve(root: &Path, path_ref: &str) -> PathBuf {
    root.join(path_ref)
}
