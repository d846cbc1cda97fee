//! Models used for communication *from the agent back to the serving layer*.

use serde::Serialize;

use crate::inspect::PackageInfo;
use rvb_catalog::models::PatchRecord;

#[derive(Serialize)]
#[serde(tag = "type")]
pub enum Response {
    /// The patches applicable to the requested package/version.
    Patches { patches: Vec<PatchRecord> },
    /// Identity of an inspected package.
    /// `info` is None when the file is not a valid package.
    AppInfo { info: Option<PackageInfo> },
    /// Whether a Java runtime is present. `download_url` is the fixed JDK
    /// build for this platform, supplied when the runtime is missing.
    JavaStatus {
        installed: bool,
        download_url: Option<&'static str>,
    },
    /// The APK work directory was cleared.
    WorkDirCleared,
}
