//! Module containing all of the fixed file paths used by the agent, derived
//! from a configuration-supplied root directory.

use std::path::{Path, PathBuf};
use std::sync::{LazyLock, OnceLock};

#[cfg(windows)]
const JAVA_EXE: &str = "java.exe";
#[cfg(not(windows))]
const JAVA_EXE: &str = "java";

#[cfg(windows)]
const AAPT_EXE: &str = "aapt_64.exe";
#[cfg(not(windows))]
const AAPT_EXE: &str = "aapt_64";

/// The root directory used when [init_parameters] is never called.
const DEFAULT_ROOT: &str = "revanced";

static _PARAMETERS: OnceLock<PatcherParameters> = OnceLock::new();

/// Initializes the parameters for this instance of the agent.
/// To be called once at the start of the program, before [PARAMETERS] is
/// first read.
///
/// Returns true if the parameters were set, false if they were already
/// initialized.
pub fn init_parameters(root: &Path) -> bool {
    _PARAMETERS.set(PatcherParameters::new(root)).is_ok()
}

/// The parameters for this instance of the agent.
pub static PARAMETERS: LazyLock<PatcherParameters> = LazyLock::new(|| {
    _PARAMETERS
        .get_or_init(|| PatcherParameters::new(Path::new(DEFAULT_ROOT)))
        .clone()
});

/// The fixed filesystem layout the agent works in. All paths are derived
/// from the root the serving layer deploys the bundled tools to.
#[derive(Clone, Debug)]
pub struct PatcherParameters {
    pub root: PathBuf,

    /// The bundled Java runtime used for the probe and for running the
    /// patcher CLI.
    pub java: PathBuf,

    /// The patcher CLI jar.
    pub cli_jar: PathBuf,

    /// The patch bundle passed to the CLI with `-b`.
    pub patches_bundle: PathBuf,

    /// The integrations package passed to the CLI with `-m`.
    pub integrations: PathBuf,

    /// The Android packaging-dump tool.
    pub aapt: PathBuf,

    /// Work directory holding the uploaded and patched packages.
    pub apk_dir: PathBuf,

    /// Where the serving layer places an uploaded package.
    pub unpatched_apk: PathBuf,

    /// Where the patcher CLI writes its output.
    pub patched_apk: PathBuf,
}

impl PatcherParameters {
    pub fn new(root: &Path) -> Self {
        let apk_dir = root.join("apk");

        Self {
            java: root.join("jdk").join("bin").join(JAVA_EXE),
            cli_jar: root.join("revanced-cli.jar"),
            patches_bundle: root.join("dependencies").join("patches.jar"),
            integrations: root.join("dependencies").join("integrations.apk"),
            aapt: root.join("aapt").join(AAPT_EXE),
            unpatched_apk: apk_dir.join("unpatched.apk"),
            patched_apk: apk_dir.join("patched.apk"),
            apk_dir,
            root: root.to_path_buf(),
        }
    }
}
