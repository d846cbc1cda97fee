//! Maintenance of the fixed APK work directory.
//!
//! None of these operations are invoked automatically by the patch pipeline:
//! the patched artifact must survive until the user downloads it, so the
//! serving layer clears the directory before the next run instead.

use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::parameters::PatcherParameters;

/// Removes every regular file in the work directory. Failures (missing
/// directory, permissions) are logged and never abort the caller.
pub fn clear_work_dir(apk_dir: &Path) {
    let entries = match std::fs::read_dir(apk_dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("Failed to list work directory {}: {err}", apk_dir.display());
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_file() {
            match std::fs::remove_file(&path) {
                Ok(()) => debug!("Removed {}", path.display()),
                Err(err) => warn!("Failed to remove {}: {err}", path.display()),
            }
        }
    }
}

/// Deletes just the uploaded, unpatched package, e.g. when a new upload
/// replaces it. A file that is already gone is logged and ignored.
pub fn remove_unpatched(parameters: &PatcherParameters) {
    match std::fs::remove_file(&parameters.unpatched_apk) {
        Ok(()) => debug!("Removed {}", parameters.unpatched_apk.display()),
        Err(err) => warn!(
            "Failed to remove {}: {err}",
            parameters.unpatched_apk.display()
        ),
    }
}

/// Where the patched artifact is written; the serving layer offers this file
/// for download after a successful run.
pub fn patched_output(parameters: &PatcherParameters) -> PathBuf {
    parameters.patched_apk.clone()
}
