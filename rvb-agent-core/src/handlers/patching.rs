//! Handles requests to run the patcher over the uploaded package.

use std::io::Write;

use anyhow::{Context, Result};
use log::info;
use rvb_catalog::catalog::Catalog;

use crate::args::{selection_args, PatchSelection};
use crate::parameters::PARAMETERS;
use crate::runner::PatchRun;

/// Handles `Patch` [Requests](crate::models::request::Request).
///
/// Streams one Server-Sent-Event frame per runner event to `stream`, flushing
/// after each frame so progress reaches the client while the subprocess is
/// still running. The work directory is deliberately left as-is afterwards:
/// the patched artifact must survive for download, and the serving layer
/// clears the directory with a `ClearWorkDir` request before the next run.
pub(super) fn handle_patch<W: Write>(
    catalog: &Catalog,
    included_patches: Vec<String>,
    excluded_patches: Vec<String>,
    stream: &mut W,
) -> Result<()> {
    let selection = PatchSelection {
        included_patches,
        excluded_patches,
    };
    let extra_args = selection_args(catalog, &selection);
    if !extra_args.is_empty() {
        info!("Overriding patch defaults with: {}", extra_args.join(" "));
    }

    for event in PatchRun::new(catalog, &PARAMETERS, extra_args) {
        stream
            .write_all(event.to_frame().as_bytes())
            .context("Writing event frame")?;
        stream.flush().context("Flushing event frame")?;
    }

    Ok(())
}
