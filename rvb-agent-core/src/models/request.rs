//! Models used for communication *from the serving layer to the agent*.

use serde::Deserialize;

#[derive(Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    /// Lists the patches applicable to a package. With neither a name nor a
    /// version, lists the whole catalog.
    /// Returns a `Patches` response.
    GetPatches {
        package_name: Option<String>,
        package_version: Option<String>,
    },
    /// Reads the identity (package name, declared version, label and the
    /// recommended target version) of an uploaded package.
    /// Returns an `AppInfo` response; its `info` is null when the file is not
    /// a valid package.
    Inspect {
        /// Defaults to the fixed unpatched-package path when omitted.
        path: Option<String>,
    },
    /// Patches the uploaded package with the given selection, streaming one
    /// Server-Sent-Event frame per runner event to stdout. No JSON response
    /// follows; the frame stream is the whole reply.
    Patch {
        #[serde(default)]
        included_patches: Vec<String>,
        #[serde(default)]
        excluded_patches: Vec<String>,
    },
    /// Reports whether a Java runtime is available, with a download URL for
    /// the current platform when it is not.
    /// Returns a `JavaStatus` response.
    GetJavaStatus,
    /// Removes every file in the APK work directory. The serving layer sends
    /// this before accepting the next upload.
    /// Returns a `WorkDirCleared` response.
    ClearWorkDir,
}
