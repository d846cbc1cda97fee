//! Responsible for handling all requests sent to the agent by the serving
//! layer.

use std::io::Write;

use anyhow::Result;
use rvb_catalog::catalog::Catalog;

use crate::models::{request::Request, response::Response};

mod patches;
mod patching;
mod utility;

/// Handles a [Request] from the serving layer.
///
/// Most requests produce a [Response] to be written back as JSON. A `Patch`
/// request instead streams its Server-Sent-Event frames to `stream` as the
/// run progresses and produces no JSON response (the `None` variant).
pub fn handle_request<W: Write>(
    catalog: &Catalog,
    request: Request,
    stream: &mut W,
) -> Result<Option<Response>> {
    match request {
        Request::GetPatches {
            package_name,
            package_version,
        } => patches::handle_get_patches(catalog, package_name, package_version).map(Some),
        Request::Inspect { path } => utility::handle_inspect(catalog, path).map(Some),
        Request::Patch {
            included_patches,
            excluded_patches,
        } => patching::handle_patch(catalog, included_patches, excluded_patches, stream)
            .map(|()| None),
        Request::GetJavaStatus => utility::handle_java_status().map(Some),
        Request::ClearWorkDir => utility::handle_clear_work_dir().map(Some),
    }
}
