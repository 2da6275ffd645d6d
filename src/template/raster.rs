use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::Context as _;
use tracing::{debug, warn};

/// Candidate converter binaries, probed in order.
const CONVERTER_CANDIDATES: &[&str] = &["soffice", "libreoffice"];

/// Poll interval while waiting on the converter process.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Outcome of a rasterization attempt.
///
/// Rasterization is best-effort: every failure mode collapses to
/// [`RasterOutcome::Unavailable`] so callers can downgrade instead of abort.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RasterOutcome {
    /// A full-canvas screenshot of the template's first slide.
    Screenshot(PathBuf),
    /// No converter, or the conversion failed or timed out.
    Unavailable,
}

/// Capability interface for first-slide rasterization.
///
/// The engine only ever holds this seam, so a host without a converter and a
/// test double look identical to it; absence of the capability is expressed
/// as `Option::<&dyn SlideRasterizer>::None`.
pub trait SlideRasterizer {
    /// Render the first slide of `template` to an image under `out_dir`.
    fn rasterize_first_slide(&self, template: &Path, out_dir: &Path) -> RasterOutcome;
}

/// Handle to an external slide-to-image converter.
pub struct RasterBackend {
    binary: &'static str,
    timeout: Duration,
}

impl RasterBackend {
    /// Probe for a usable converter binary.
    ///
    /// Returns `None` when no candidate responds to `--version`, which the
    /// engine treats as "rasterization unavailable on this host".
    pub fn probe(timeout: Duration) -> Option<Self> {
        for binary in CONVERTER_CANDIDATES {
            let probe = Command::new(binary)
                .arg("--version")
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status();
            match probe {
                Ok(status) if status.success() => {
                    debug!(binary, "found slide converter");
                    return Some(RasterBackend { binary, timeout });
                }
                Ok(status) => {
                    debug!(binary, code = ?status.code(), "converter probe rejected");
                }
                Err(e) => {
                    debug!(binary, error = %e, "converter probe failed");
                }
            }
        }
        None
    }

    fn run_convert(&self, template: &Path, out_dir: &Path) -> anyhow::Result<PathBuf> {
        let mut child = Command::new(self.binary)
            .arg("--headless")
            .arg("--convert-to")
            .arg("png")
            .arg("--outdir")
            .arg(out_dir)
            .arg(template)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("spawn {}", self.binary))?;

        // Drain stderr on a side thread so the child can never block on a
        // full pipe while we poll for exit.
        let stderr = child.stderr.take();
        let drain = std::thread::spawn(move || {
            let mut buf = String::new();
            if let Some(mut stderr) = stderr {
                let _ = stderr.read_to_string(&mut buf);
            }
            buf
        });

        let status = wait_with_deadline(&mut child, self.timeout)?;
        let stderr_tail = drain.join().unwrap_or_default();
        if !status.success() {
            anyhow::bail!(
                "{} exited with {status}: {}",
                self.binary,
                stderr_tail.trim()
            );
        }

        let stem = template
            .file_stem()
            .context("template path has no file stem")?;
        let out = out_dir.join(Path::new(stem).with_extension("png"));
        if !out.is_file() {
            anyhow::bail!("converter produced no output at '{}'", out.display());
        }
        Ok(out)
    }
}

impl SlideRasterizer for RasterBackend {
    fn rasterize_first_slide(&self, template: &Path, out_dir: &Path) -> RasterOutcome {
        match self.run_convert(template, out_dir) {
            Ok(path) => RasterOutcome::Screenshot(path),
            Err(e) => {
                warn!(template = %template.display(), error = %e, "rasterization failed");
                RasterOutcome::Unavailable
            }
        }
    }
}

/// Poll the child until it exits or `timeout` elapses, killing it on expiry.
fn wait_with_deadline(
    child: &mut Child,
    timeout: Duration,
) -> anyhow::Result<std::process::ExitStatus> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait().context("wait on converter")? {
            return Ok(status);
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            anyhow::bail!("converter timed out after {:.1}s", timeout.as_secs_f64());
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}
