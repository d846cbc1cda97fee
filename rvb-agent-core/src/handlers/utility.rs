//! Handles inspection, runtime-probe and work-directory requests.

use std::path::PathBuf;

use anyhow::Result;
use log::{info, warn};
use rvb_catalog::catalog::Catalog;

use crate::models::response::Response;
use crate::parameters::PARAMETERS;
use crate::{inspect, java, workdir};

/// Handles `Inspect` [Requests](crate::models::request::Request).
///
/// # Returns
/// The [Response] to the request (variant `AppInfo`). A file that is not a
/// valid package gives `info: None`; the reason is logged, not surfaced.
pub(super) fn handle_inspect(catalog: &Catalog, path: Option<String>) -> Result<Response> {
    let file: PathBuf = match path {
        Some(path) => path.into(),
        None => PARAMETERS.unpatched_apk.clone(),
    };

    let info = match inspect::read_package_info(catalog, &PARAMETERS.aapt, &file) {
        Ok(info) => {
            info!(
                "Inspected {} ({} {})",
                info.app_label, info.package_name, info.package_version
            );
            Some(info)
        }
        Err(err) => {
            warn!("Not a valid package file: {err}");
            None
        }
    };

    Ok(Response::AppInfo { info })
}

/// Handles `GetJavaStatus` [Requests](crate::models::request::Request).
pub(super) fn handle_java_status() -> Result<Response> {
    let installed = java::java_available(&PARAMETERS.java);
    Ok(Response::JavaStatus {
        installed,
        download_url: if installed {
            None
        } else {
            java::jdk_download_url()
        },
    })
}

/// Handles `ClearWorkDir` [Requests](crate::models::request::Request).
pub(super) fn handle_clear_work_dir() -> Result<Response> {
    workdir::clear_work_dir(&PARAMETERS.apk_dir);
    Ok(Response::WorkDirCleared)
}
