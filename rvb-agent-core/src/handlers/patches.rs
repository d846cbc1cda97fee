//! Handles requests for the filtered patch catalog.

use anyhow::Result;
use log::info;
use rvb_catalog::catalog::Catalog;

use crate::models::response::Response;

/// Handles `GetPatches` [Requests](crate::models::request::Request).
///
/// # Returns
/// The [Response] to the request (variant `Patches`), containing the patches
/// compatible with the given package and version in catalog order.
pub(super) fn handle_get_patches(
    catalog: &Catalog,
    package_name: Option<String>,
    package_version: Option<String>,
) -> Result<Response> {
    let patches: Vec<_> = catalog
        .compatible_patches(package_name.as_deref(), package_version.as_deref())
        .collect();

    info!(
        "{} patches compatible with {}",
        patches.len(),
        package_name.as_deref().unwrap_or("any package")
    );

    Ok(Response::Patches { patches })
}
