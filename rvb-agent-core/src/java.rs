//! Probing for a usable Java runtime.

use std::path::Path;
use std::process::Command;

/// Whether the runtime at `java` can be executed. Presence means the probe
/// process spawned and exited zero; a failure to spawn is absence, not an
/// error.
pub fn java_available(java: &Path) -> bool {
    match Command::new(java).arg("--version").output() {
        Ok(output) => output.status.success(),
        Err(_) => false,
    }
}

/// Download URL for a fixed OpenJDK build, keyed by platform. The serving
/// layer offers this to the user when no runtime is present.
pub fn jdk_download_url() -> Option<&'static str> {
    match std::env::consts::OS {
        "windows" => Some(
            "https://download.java.net/java/GA/jdk11/9/GPL/openjdk-11.0.2_windows-x64_bin.zip",
        ),
        "macos" => Some(
            "https://download.java.net/java/GA/jdk11/9/GPL/openjdk-11.0.2_osx-x64_bin.tar.gz",
        ),
        "linux" => Some(
            "https://download.java.net/java/GA/jdk11/9/GPL/openjdk-11.0.2_linux-x64_bin.tar.gz",
        ),
        _ => None,
    }
}
