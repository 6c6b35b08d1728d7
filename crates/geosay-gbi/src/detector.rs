use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crate::asj::read_asj;
use crate::error::GbiError;
use crate::junction::{build_junctions, Junction};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Something that writes the detection file of an image next to it.
pub trait JunctionDetector {
    /// Detect the junctions of the image at `image_path` and write them to
    /// [`asj_path_for`]`(image_path)`.
    fn detect(&self, image_path: &Path) -> Result<(), GbiError>;
}

/// Path of the detection file of an image: the image path with `.asj` appended.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use geosay_gbi::detector::asj_path_for;
///
/// assert_eq!(asj_path_for(Path::new("data/house.png")), Path::new("data/house.png.asj"));
/// ```
pub fn asj_path_for(image_path: &Path) -> PathBuf {
    let mut path = OsString::from(image_path.as_os_str());
    path.push(".asj");
    PathBuf::from(path)
}

/// Runs an external detector program as `program <image_path>`.
#[derive(Debug, Clone)]
pub struct ProcessDetector {
    program: PathBuf,
    args: Vec<OsString>,
    timeout: Duration,
}

impl ProcessDetector {
    /// Create a detector running `program`, killed after `timeout`.
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout,
        }
    }

    /// Add an argument passed before the image path.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// The program being run.
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl JunctionDetector for ProcessDetector {
    fn detect(&self, image_path: &Path) -> Result<(), GbiError> {
        log::info!(
            "running junction detector {} on {}",
            self.program.display(),
            image_path.display()
        );

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(image_path)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|e| {
                GbiError::DetectorUnavailable(format!(
                    "failed to start {}: {e}",
                    self.program.display()
                ))
            })?;

        let start = Instant::now();
        let status = loop {
            let polled = child.try_wait().map_err(|e| {
                GbiError::DetectorUnavailable(format!("failed to wait for the detector: {e}"))
            })?;

            if let Some(status) = polled {
                break status;
            }

            if start.elapsed() >= self.timeout {
                if let Err(e) = child.kill() {
                    log::warn!("failed to kill the detector: {e}");
                }
                // reap the killed process
                let _ = child.wait();
                return Err(GbiError::DetectorUnavailable(format!(
                    "{} timed out after {:?}",
                    self.program.display(),
                    self.timeout
                )));
            }

            std::thread::sleep(POLL_INTERVAL);
        };

        if !status.success() {
            return Err(GbiError::DetectorUnavailable(format!(
                "{} exited with {status}",
                self.program.display()
            )));
        }

        log::debug!("detector finished in {:?}", start.elapsed());

        Ok(())
    }
}

/// Read the junctions of an image, running `detector` first if its detection file is missing.
///
/// # Errors
///
/// Returns [`GbiError::DetectorUnavailable`] if the detector fails or does not produce the
/// detection file, and parse or validation errors from the file itself.
pub fn load_junctions(
    image_path: &Path,
    detector: &dyn JunctionDetector,
) -> Result<Vec<Junction>, GbiError> {
    let asj_path = asj_path_for(image_path);

    if !asj_path.exists() {
        detector.detect(image_path)?;
        if !asj_path.exists() {
            return Err(GbiError::DetectorUnavailable(format!(
                "detector did not write {}",
                asj_path.display()
            )));
        }
    } else {
        log::debug!("reusing detection file {}", asj_path.display());
    }

    let junctions = build_junctions(&read_asj(&asj_path)?)?;
    log::info!(
        "loaded {} junctions from {}",
        junctions.len(),
        asj_path.display()
    );

    Ok(junctions)
}
