//! External PDF engine: Ghostscript, located at call time and invoked in a
//! scoped temporary directory under a hard wall-clock timeout.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

use crate::errors::{StageError, StageResult};
use crate::types::{EngineStatus, QualityTier};

/// Ordered candidate names/paths probed when no explicit path is
/// configured: bare command name first, then OS installation directories.
const CANDIDATES: &[&str] = &[
    "gs",
    "gswin64c.exe",
    "gswin32c.exe",
    "/usr/local/bin/gs",
    "/usr/bin/gs",
    "/opt/homebrew/bin/gs",
];

/// Handle on the external compression engine.
///
/// Stateless: the binary is re-located on every call, so a transiently
/// missing tool self-heals without a restart. A candidate is trusted only
/// after it answers a version query; an executable at a known path that
/// cannot run is treated as absent.
#[derive(Debug, Clone)]
pub struct GhostscriptEngine {
    override_path: Option<String>,
    run_timeout: Duration,
    probe_timeout: Duration,
}

impl GhostscriptEngine {
    pub fn new(
        override_path: Option<String>,
        run_timeout: Duration,
        probe_timeout: Duration,
    ) -> Self {
        Self {
            override_path,
            run_timeout,
            probe_timeout,
        }
    }

    fn candidates(&self) -> Vec<String> {
        match &self.override_path {
            Some(path) => vec![path.clone()],
            None => CANDIDATES.iter().map(|c| (*c).to_string()).collect(),
        }
    }

    /// Run `<path> --version` under the probe timeout. Success means the
    /// candidate both exists and actually behaves like the engine.
    async fn version_query(&self, path: &str) -> StageResult<String> {
        let child = Command::new(path)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|_| StageError::EngineUnavailable)?;

        match timeout(self.probe_timeout, child.wait_with_output()).await {
            Ok(Ok(output)) if output.status.success() => {
                Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
            }
            Ok(Ok(output)) => Err(StageError::EngineFailed(format!(
                "version query exited with {}",
                output.status
            ))),
            Ok(Err(e)) => Err(StageError::Io(e)),
            // Dropping the future kills the probe process
            Err(_) => Err(StageError::EngineTimeout(self.probe_timeout)),
        }
    }

    /// First candidate that answers the version query, if any.
    async fn locate(&self) -> Option<String> {
        for candidate in self.candidates() {
            if self.version_query(&candidate).await.is_ok() {
                return Some(candidate);
            }
        }
        None
    }

    /// Health probe for diagnostics endpoints. Never cached and never
    /// consulted by the compression path.
    pub async fn probe(&self) -> EngineStatus {
        for candidate in self.candidates() {
            match self.version_query(&candidate).await {
                Ok(version) => {
                    return EngineStatus {
                        available: true,
                        message: format!("Ghostscript {} ready", version),
                    }
                }
                Err(StageError::EngineUnavailable) => continue,
                Err(e) => {
                    return EngineStatus {
                        available: false,
                        message: format!("Ghostscript failed to run: {}", e),
                    }
                }
            }
        }
        EngineStatus {
            available: false,
            message: "Ghostscript not found".to_string(),
        }
    }

    /// Compress PDF bytes with the tier's preset and resolution.
    ///
    /// Any error here, including `EngineUnavailable` and a timeout, is a
    /// routing signal: the caller falls through to the library rewrite
    /// chain without retrying. The scoped working directory is removed on
    /// every exit path when it drops.
    pub async fn compress(&self, data: &[u8], tier: QualityTier) -> StageResult<Vec<u8>> {
        let gs_path = self.locate().await.ok_or(StageError::EngineUnavailable)?;

        let workdir = tempfile::tempdir()?;
        let input_path = workdir.path().join("input.pdf");
        let output_path = workdir.path().join("output.pdf");
        tokio::fs::write(&input_path, data).await?;

        log::debug!(
            "invoking {} with preset {} at {} dpi",
            gs_path,
            tier.pdf_preset(),
            tier.pdf_image_dpi()
        );

        let child = Command::new(&gs_path)
            .args(build_args(tier, &input_path, &output_path))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| StageError::EngineFailed(format!("failed to spawn {}: {}", gs_path, e)))?;

        let output = match timeout(self.run_timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(StageError::Io(e)),
            Err(_) => {
                // kill_on_drop has already terminated the child
                log::warn!("engine exceeded {:?}, killed", self.run_timeout);
                return Err(StageError::EngineTimeout(self.run_timeout));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StageError::EngineFailed(format!(
                "exit {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let compressed = tokio::fs::read(&output_path).await?;
        if compressed.is_empty() {
            return Err(StageError::EngineFailed(
                "engine produced an empty output file".to_string(),
            ));
        }
        Ok(compressed)
    }
}

/// The full flag set: downsample images to the tier DPI, convert CMYK to
/// sRGB, subset and compress fonts, deduplicate images, strip thumbnails
/// and non-essential metadata, disable prompts.
fn build_args(tier: QualityTier, input_path: &Path, output_path: &Path) -> Vec<String> {
    let dpi = tier.pdf_image_dpi();
    vec![
        "-sDEVICE=pdfwrite".to_string(),
        "-dCompatibilityLevel=1.4".to_string(),
        format!("-dPDFSETTINGS={}", tier.pdf_preset()),
        format!("-dColorImageResolution={}", dpi),
        format!("-dGrayImageResolution={}", dpi),
        format!("-dMonoImageResolution={}", dpi),
        "-dColorConversionStrategy=/sRGB".to_string(),
        "-dProcessColorModel=/DeviceRGB".to_string(),
        "-dConvertCMYKImagesToRGB=true".to_string(),
        "-dEmbedAllFonts=true".to_string(),
        "-dSubsetFonts=true".to_string(),
        "-dCompressFonts=true".to_string(),
        "-dAutoRotatePages=/None".to_string(),
        "-dDetectDuplicateImages=true".to_string(),
        "-dCompressPages=true".to_string(),
        "-dDoThumbnails=false".to_string(),
        "-dCreateJobTicket=false".to_string(),
        "-dPreserveEPSInfo=false".to_string(),
        "-dPreserveOPIComments=false".to_string(),
        "-dPreserveOverprintSettings=false".to_string(),
        "-dUCRandBGInfo=/Remove".to_string(),
        "-dUseCIEColor=false".to_string(),
        "-dNOSAFER".to_string(),
        "-dNOPAUSE".to_string(),
        "-dBATCH".to_string(),
        "-dQUIET".to_string(),
        format!("-sOutputFile={}", output_path.to_string_lossy()),
        input_path.to_string_lossy().to_string(),
    ]
}
