//! The patch pipeline: validates the uploaded package, launches the patcher
//! CLI and streams its output as events.
//!
//! A [PatchRun] is a lazy, single-pass sequence. The consumer pulls one event
//! at a time while the subprocess runs, so progress reaches the client live;
//! buffering the whole sequence before forwarding would break that guarantee.

use std::io::{self, BufRead, BufReader, Read};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use rvb_catalog::catalog::Catalog;
use serde_json::json;

use crate::inspect;
use crate::parameters::PatcherParameters;
use crate::sse;

/// Substring of an output line that signals overall success. Must appear in
/// the last line read for the run to count as succeeded.
const SUCCESS_MARKER: &str = "Finished";
/// Substring that signals a failed patch. Reading stops as soon as it is
/// seen, without waiting for the subprocess to exit.
const ERROR_MARKER: &str = "PatchResultError";
/// Prefix of the informational lines forwarded to the consumer.
const INFO_PREFIX: &str = "INFO:";

/// Error sent when the uploaded file is not a valid package.
pub const INVALID_UPLOAD_ERROR: &str = "Check if you uploaded a valid APK file.";
/// Error sent when the patcher fails or never reports success.
pub const PATCH_FAILED_ERROR: &str = "ERROR: An error occurred while patching the APK file.";

/// One observable event of a patch run.
#[derive(Clone, Debug, PartialEq)]
pub enum RunEvent {
    /// An informational line from the patcher.
    Progress(String),
    /// Terminal failure. Always the last event of a failed run.
    Failure(String),
}

impl RunEvent {
    /// The Server-Sent-Event frame carrying this event.
    pub fn to_frame(&self) -> String {
        let payload = match self {
            RunEvent::Progress(line) => json!({ "data": line }).to_string(),
            RunEvent::Failure(message) => json!({ "error": message }).to_string(),
        };
        sse::frame(&payload)
    }
}

enum RunState {
    Validating,
    Running,
    Succeeded,
    Failed,
}

/// Streaming scan over the patcher's merged output lines.
///
/// Yields a `Progress` event per informational line. Reading stops on the
/// enumerated termination conditions: a line containing the error marker, a
/// read error, or end of input. Whichever applies, if the last line read does
/// not carry the success marker the scan ends with a single `Failure` event.
struct OutputScan<I> {
    lines: I,
    last_line: String,
    finished: bool,
}

impl<I> OutputScan<I> {
    fn new(lines: I) -> Self {
        Self {
            lines,
            last_line: String::new(),
            finished: false,
        }
    }
}

impl<I: Iterator<Item = io::Result<String>>> Iterator for OutputScan<I> {
    type Item = RunEvent;

    fn next(&mut self) -> Option<RunEvent> {
        if self.finished {
            return None;
        }

        loop {
            match self.lines.next() {
                Some(Ok(line)) => {
                    debug!("patcher: {line}");
                    self.last_line = line;
                    if self.last_line.contains(ERROR_MARKER) {
                        break;
                    }
                    if self.last_line.starts_with(INFO_PREFIX) {
                        return Some(RunEvent::Progress(self.last_line.clone()));
                    }
                }
                Some(Err(err)) => {
                    warn!("Failed to read patcher output: {err}");
                    break;
                }
                None => break,
            }
        }

        self.finished = true;
        if self.last_line.contains(SUCCESS_MARKER) {
            None
        } else {
            Some(RunEvent::Failure(PATCH_FAILED_ERROR.to_owned()))
        }
    }
}

type MergedLines = mpsc::IntoIter<io::Result<String>>;

/// One patch run as a lazy, single-pass, non-restartable event sequence,
/// progressing through `Validating -> Running -> Succeeded | Failed`.
///
/// Validation inspects the fixed unpatched-package path and rejects the run
/// before the patcher is launched when the file is not a valid package. A
/// failed run's last event is always a [RunEvent::Failure]; a successful run
/// ends with no terminal event. Cleaning the work directory afterwards is the
/// caller's job (see [crate::workdir]).
pub struct PatchRun<'c> {
    catalog: &'c Catalog,
    parameters: PatcherParameters,
    extra_args: Vec<String>,
    state: RunState,
    child: Option<Child>,
    scan: Option<OutputScan<MergedLines>>,
}

impl<'c> PatchRun<'c> {
    /// Prepares a run over the uploaded package with the given extra CLI
    /// flags (see [crate::args::selection_args]). Nothing happens until the
    /// sequence is polled.
    pub fn new(catalog: &'c Catalog, parameters: &PatcherParameters, extra_args: Vec<String>) -> Self {
        Self {
            catalog,
            parameters: parameters.clone(),
            extra_args,
            state: RunState::Validating,
            child: None,
            scan: None,
        }
    }

    /// Spawns the patcher CLI with stdout and stderr merged into one line
    /// stream.
    fn launch(&mut self) -> Result<()> {
        let mut child = Command::new(&self.parameters.java)
            .arg("-jar")
            .arg(&self.parameters.cli_jar)
            .arg("-a")
            .arg(&self.parameters.unpatched_apk)
            .arg("-o")
            .arg(&self.parameters.patched_apk)
            .arg("-b")
            .arg(&self.parameters.patches_bundle)
            .arg("-m")
            .arg(&self.parameters.integrations)
            .args(&self.extra_args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .context("Launching the patcher CLI")?;

        let (sender, receiver) = mpsc::channel();
        if let Some(stdout) = child.stdout.take() {
            pump_lines(stdout, sender.clone());
        }
        if let Some(stderr) = child.stderr.take() {
            pump_lines(stderr, sender);
        }

        self.child = Some(child);
        self.scan = Some(OutputScan::new(receiver.into_iter()));
        Ok(())
    }

    /// Asks the subprocess to stop. Only called on detected failure; a
    /// consumer that merely stops polling leaves the subprocess running.
    fn request_termination(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(err) = child.kill() {
                warn!("Failed to terminate the patcher: {err}");
            }
            let _ = child.wait();
        }
    }

    fn reap(&mut self) {
        if let Some(mut child) = self.child.take() {
            match child.wait() {
                Ok(status) => debug!("Patcher exited with {status}"),
                Err(err) => warn!("Failed to await the patcher: {err}"),
            }
        }
    }
}

impl Iterator for PatchRun<'_> {
    type Item = RunEvent;

    fn next(&mut self) -> Option<RunEvent> {
        loop {
            match self.state {
                RunState::Validating => {
                    match inspect::read_package_info(
                        self.catalog,
                        &self.parameters.aapt,
                        &self.parameters.unpatched_apk,
                    ) {
                        Ok(package) => {
                            info!(
                                "Patching {} ({} {})",
                                package.app_label, package.package_name, package.package_version
                            );
                        }
                        Err(err) => {
                            warn!("Rejecting patch run: {err}");
                            self.state = RunState::Failed;
                            return Some(RunEvent::Failure(INVALID_UPLOAD_ERROR.to_owned()));
                        }
                    }

                    match self.launch() {
                        Ok(()) => self.state = RunState::Running,
                        Err(err) => {
                            warn!("{err:?}");
                            self.state = RunState::Failed;
                            return Some(RunEvent::Failure(PATCH_FAILED_ERROR.to_owned()));
                        }
                    }
                }
                RunState::Running => {
                    let event = self.scan.as_mut().and_then(|scan| scan.next());
                    return match event {
                        Some(RunEvent::Failure(message)) => {
                            self.state = RunState::Failed;
                            self.request_termination();
                            Some(RunEvent::Failure(message))
                        }
                        Some(progress) => Some(progress),
                        None => {
                            self.state = RunState::Succeeded;
                            self.reap();
                            None
                        }
                    };
                }
                RunState::Succeeded | RunState::Failed => return None,
            }
        }
    }
}

fn pump_lines(stream: impl Read + Send + 'static, sender: mpsc::Sender<io::Result<String>>) {
    thread::spawn(move || {
        for line in BufReader::new(stream).lines() {
            if sender.send(line).is_err() {
                break; // Consumer stopped reading.
            }
        }
    });
}
