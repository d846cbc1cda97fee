//! Exercises the inspector and the patch pipeline end-to-end against fake
//! `aapt` and `java` tools installed into a temporary root.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use rvb_agent_core::inspect;
use rvb_agent_core::parameters::PatcherParameters;
use rvb_agent_core::runner::{PatchRun, RunEvent, INVALID_UPLOAD_ERROR, PATCH_FAILED_ERROR};
use rvb_catalog::catalog::Catalog;
use rvb_catalog::models::{CatalogEntry, CompatiblePackage};

const BADGING_SCRIPT: &str = "#!/bin/sh\n\
echo \"package: name='com.example.app' versionCode='120' versionName='2.0'\"\n\
echo \"application-label:'Example App'\"\n";

const REJECTING_SCRIPT: &str = "#!/bin/sh\n\
echo 'not an apk' >&2\n\
exit 1\n";

fn install_tool(path: &Path, script: &str) {
    fs::create_dir_all(path.parent().expect("tool parent")).expect("create tool dir");
    fs::write(path, script).expect("write tool");
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).expect("chmod tool");
}

/// Lays out a patcher root with a fake dump tool, the given fake patcher
/// runtime and an uploaded file.
fn patcher_root(java_script: &str) -> (tempfile::TempDir, PatcherParameters) {
    let dir = tempfile::tempdir().expect("tempdir");
    let parameters = PatcherParameters::new(dir.path());

    install_tool(&parameters.aapt, BADGING_SCRIPT);
    install_tool(&parameters.java, java_script);
    fs::create_dir_all(&parameters.apk_dir).expect("create apk dir");
    fs::write(&parameters.unpatched_apk, b"uploaded bytes").expect("write upload");

    (dir, parameters)
}

fn catalog() -> Catalog {
    Catalog::new(vec![CatalogEntry {
        name: "Scoped patch".to_owned(),
        description: String::new(),
        version: "1.0.0".to_owned(),
        excluded: false,
        compatible_packages: vec![CompatiblePackage {
            name: "com.example.app".to_owned(),
            versions: vec!["1.0".to_owned(), "2.0".to_owned()],
        }],
    }])
}

#[test]
fn inspector_reads_the_dump_tool_output() {
    let (_dir, parameters) = patcher_root("#!/bin/sh\n");

    let info = inspect::read_package_info(&catalog(), &parameters.aapt, &parameters.unpatched_apk)
        .expect("inspection should succeed");
    assert_eq!(info.package_name, "com.example.app");
    assert_eq!(info.package_version, "2.0");
    assert_eq!(info.app_label, "Example App");
    assert_eq!(info.recommended_version, "2.0");
}

#[test]
fn inspector_rejects_what_the_dump_tool_rejects() {
    let (_dir, parameters) = patcher_root("#!/bin/sh\n");
    install_tool(&parameters.aapt, REJECTING_SCRIPT);

    assert!(
        inspect::read_package_info(&catalog(), &parameters.aapt, &parameters.unpatched_apk)
            .is_err()
    );
}

#[test]
fn successful_run_streams_progress_and_no_error() {
    let (_dir, parameters) = patcher_root(
        "#!/bin/sh\n\
echo 'INFO: Loading patch bundle'\n\
echo 'Applying patches...'\n\
echo 'INFO: Writing output'\n\
echo 'Finished: wrote patched.apk'\n",
    );

    let events: Vec<RunEvent> = PatchRun::new(&catalog(), &parameters, Vec::new()).collect();
    assert_eq!(
        events,
        vec![
            RunEvent::Progress("INFO: Loading patch bundle".to_owned()),
            RunEvent::Progress("INFO: Writing output".to_owned()),
        ]
    );
}

#[test]
fn failing_run_ends_with_exactly_one_error_event() {
    let (_dir, parameters) = patcher_root(
        "#!/bin/sh\n\
echo 'INFO: Loading patch bundle'\n\
echo 'PatchResultError: something broke'\n",
    );

    let events: Vec<RunEvent> = PatchRun::new(&catalog(), &parameters, Vec::new()).collect();
    assert_eq!(
        events,
        vec![
            RunEvent::Progress("INFO: Loading patch bundle".to_owned()),
            RunEvent::Failure(PATCH_FAILED_ERROR.to_owned()),
        ]
    );
}

#[test]
fn run_without_a_success_marker_fails() {
    let (_dir, parameters) = patcher_root(
        "#!/bin/sh\n\
echo 'INFO: Loading patch bundle'\n",
    );

    let events: Vec<RunEvent> = PatchRun::new(&catalog(), &parameters, Vec::new()).collect();
    assert_eq!(
        events.last(),
        Some(&RunEvent::Failure(PATCH_FAILED_ERROR.to_owned()))
    );
}

#[test]
fn invalid_upload_is_rejected_before_the_patcher_launches() {
    let (dir, parameters) = patcher_root("#!/bin/sh\n");
    let marker = dir.path().join("java-ran");
    // The fake patcher leaves a marker file; validation failure must prevent
    // it from ever running.
    install_tool(
        &parameters.java,
        &format!("#!/bin/sh\ntouch '{}'\n", marker.display()),
    );
    install_tool(&parameters.aapt, REJECTING_SCRIPT);

    let events: Vec<RunEvent> = PatchRun::new(&catalog(), &parameters, Vec::new()).collect();
    assert_eq!(
        events,
        vec![RunEvent::Failure(INVALID_UPLOAD_ERROR.to_owned())]
    );
    assert!(!marker.exists());
}

#[test]
fn stderr_lines_merge_into_the_event_stream() {
    let (_dir, parameters) = patcher_root(
        "#!/bin/sh\n\
echo 'INFO: reported on stderr' >&2\n\
sleep 1\n\
echo 'Finished'\n",
    );

    let events: Vec<RunEvent> = PatchRun::new(&catalog(), &parameters, Vec::new()).collect();
    assert_eq!(
        events,
        vec![RunEvent::Progress("INFO: reported on stderr".to_owned())]
    );
}
