//! Identifies an uploaded package by running the packaging-dump tool over it
//! and parsing the badging output.

use std::fmt::Display;
use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;

use regex::Regex;
use rvb_catalog::catalog::Catalog;
use serde::Serialize;

static PACKAGE_NAME_RE: OnceLock<Regex> = OnceLock::new();
static VERSION_NAME_RE: OnceLock<Regex> = OnceLock::new();

fn package_name_re() -> &'static Regex {
    PACKAGE_NAME_RE.get_or_init(|| Regex::new(r"name='(.+?)'").expect("hardcoded regex"))
}

fn version_name_re() -> &'static Regex {
    VERSION_NAME_RE.get_or_init(|| Regex::new(r"versionName='(.+?)'").expect("hardcoded regex"))
}

/// Version placeholder when the package declares no version, or when no
/// recommendation can be made from the catalog.
pub const ANY_VERSION: &str = "Any";

/// Identity of an inspected package, sent to the consumer before a patch run.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PackageInfo {
    pub package_name: String,
    pub package_version: String,
    /// The newest catalog version compatible with this package, when the
    /// catalog can order them.
    pub recommended_version: String,
    pub app_label: String,
}

/// Why a file was rejected as a package. Every caller treats any of these as
/// "not a valid package file"; the variants exist so the reason can be
/// logged.
#[derive(Debug)]
pub enum InspectError {
    /// The dump tool could not be started.
    Launch(std::io::Error),
    /// The dump tool ran but exited with a failure status.
    ToolFailed(String),
    /// The output carried no parseable package declaration.
    NoPackageLine,
}

impl Display for InspectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Launch(e) => write!(f, "Failed to launch the packaging-dump tool: {e}"),
            Self::ToolFailed(stderr) => {
                write!(f, "Packaging-dump tool rejected the file: {stderr}")
            }
            Self::NoPackageLine => write!(f, "Dump output contained no package declaration"),
        }
    }
}

impl std::error::Error for InspectError {}

/// Runs `<aapt> dump badging <file>` and parses the output into a
/// [PackageInfo]. An `Err` means the file is not a valid package.
pub fn read_package_info(
    catalog: &Catalog,
    aapt: &Path,
    file: &Path,
) -> Result<PackageInfo, InspectError> {
    let output = Command::new(aapt)
        .arg("dump")
        .arg("badging")
        .arg(file)
        .output()
        .map_err(InspectError::Launch)?;

    if !output.status.success() {
        return Err(InspectError::ToolFailed(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    parse_badging(catalog, &String::from_utf8_lossy(&output.stdout))
}

/// Parses badging output. The `package:` line is mandatory; the
/// `application-label:` line is optional and degrades to an empty label.
fn parse_badging(catalog: &Catalog, dump: &str) -> Result<PackageInfo, InspectError> {
    let mut package: Option<(String, String)> = None;
    let mut app_label = String::new();

    for line in dump.lines() {
        if line.starts_with("package:") {
            let name = match package_name_re().captures(line) {
                Some(captures) => captures[1].to_string(),
                None => return Err(InspectError::NoPackageLine),
            };
            let version = match version_name_re().captures(line) {
                Some(captures) => captures[1].to_string(),
                None => ANY_VERSION.to_string(),
            };
            package = Some((name, version));
        } else if line.starts_with("application-label:") {
            app_label = line
                .splitn(2, ':')
                .nth(1)
                .unwrap_or("")
                .trim()
                .trim_matches('\'')
                .to_string();
        }
    }

    let (package_name, package_version) = package.ok_or(InspectError::NoPackageLine)?;

    let recommended_version = catalog
        .all_compatible_versions(&package_name)
        .latest()
        .unwrap_or(ANY_VERSION)
        .to_string();

    Ok(PackageInfo {
        package_name,
        package_version,
        recommended_version,
        app_label,
    })
}
