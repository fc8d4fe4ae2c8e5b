//! Local rendering via the `mmdc` tool (`@mermaid-js/mermaid-cli`).
//!
//! The tool is run through `npx -y` so a global install is not required;
//! the first invocation may download it. Rendering needs a Chromium
//! binary for Puppeteer, which we locate ourselves when the environment
//! does not already say where it is.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crate::error::RenderError;
use crate::format::OutputFormat;
use crate::renderer::DiagramRenderer;

/// Poll interval while waiting for the child process.
const WAIT_POLL: Duration = Duration::from_millis(100);

/// Chromium locations checked when `PUPPETEER_EXECUTABLE_PATH` is unset.
const CHROME_CANDIDATES: &[&str] = &[
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/snap/bin/chromium",
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
];

/// Renderer that shells out to mermaid-cli.
pub struct MmdcRenderer {
    timeout: Duration,
    scale: u32,
    width: u32,
}

impl MmdcRenderer {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            scale: 2,
            width: 1600,
        }
    }

    /// Set the device scale factor passed to mermaid-cli.
    #[must_use]
    pub fn scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    /// Set the page width passed to mermaid-cli.
    #[must_use]
    pub fn width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Run a fully-configured mermaid-cli invocation with a deadline.
    fn run_mmdc(&self, input: &Path, output: &Path) -> Result<(), RenderError> {
        let mut command = Command::new("npx");
        command
            .arg("-y")
            .arg("@mermaid-js/mermaid-cli")
            .arg("-i")
            .arg(input)
            .arg("-o")
            .arg(output)
            .arg("-s")
            .arg(self.scale.to_string())
            .arg("-w")
            .arg(self.width.to_string())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        if std::env::var_os("PUPPETEER_EXECUTABLE_PATH").is_none()
            && let Some(chrome) = find_chrome()
        {
            command.env("PUPPETEER_EXECUTABLE_PATH", chrome);
        }

        let child = command.spawn().map_err(|e| RenderError::ToolNotFound {
            command: String::from("npx"),
            source: e,
        })?;

        let (status, stderr) = wait_with_stderr(child, "npx", self.timeout)?;
        if !status.success() {
            return Err(RenderError::ToolFailed {
                status: status.code().unwrap_or(-1),
                stderr,
            });
        }
        Ok(())
    }
}

/// Wait for the child with a deadline, draining stderr as it runs.
///
/// Stderr is read on its own thread; draining only after exit would stall
/// a child that fills the pipe buffer until the deadline kills it.
fn wait_with_stderr(
    mut child: std::process::Child,
    command: &str,
    timeout: Duration,
) -> Result<(std::process::ExitStatus, String), RenderError> {
    let stderr_reader = child.stderr.take().map(|mut pipe| {
        std::thread::spawn(move || {
            let mut buf = String::new();
            let _ = std::io::Read::read_to_string(&mut pipe, &mut buf);
            buf
        })
    });

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if Instant::now() >= deadline {
                    // Best effort: the process may have exited already.
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(RenderError::Timeout {
                        seconds: timeout.as_secs(),
                    });
                }
                std::thread::sleep(WAIT_POLL);
            }
            Err(e) => {
                return Err(RenderError::ToolNotFound {
                    command: command.to_owned(),
                    source: e,
                });
            }
        }
    };

    let stderr = stderr_reader
        .and_then(|handle| handle.join().ok())
        .map(|buf| buf.trim().to_owned())
        .unwrap_or_default();
    Ok((status, stderr))
}

impl DiagramRenderer for MmdcRenderer {
    fn render(
        &self,
        source: &str,
        output_path: &Path,
        format: OutputFormat,
    ) -> Result<(), RenderError> {
        if source.trim().is_empty() {
            return Err(RenderError::EmptySource);
        }

        // mermaid-cli picks the format from the output extension, so the
        // scratch output carries the requested extension explicitly.
        let scratch = tempfile::tempdir().map_err(|e| RenderError::Io {
            path: output_path.to_path_buf(),
            source: e,
        })?;
        let input = scratch.path().join("diagram.mmd");
        std::fs::write(&input, source).map_err(|e| RenderError::Io {
            path: input.clone(),
            source: e,
        })?;
        let staged = scratch.path().join(format!("diagram.{}", format.as_str()));

        tracing::debug!(output = %output_path.display(), "rendering with mermaid-cli");
        self.run_mmdc(&input, &staged)?;

        let rendered = staged.metadata().map_or(0, |m| m.len());
        if rendered == 0 {
            return Err(RenderError::EmptyOutput {
                path: output_path.to_path_buf(),
            });
        }

        std::fs::copy(&staged, output_path).map_err(|e| RenderError::Io {
            path: output_path.to_path_buf(),
            source: e,
        })?;
        Ok(())
    }
}

/// Locate a Chromium binary for Puppeteer.
fn find_chrome() -> Option<PathBuf> {
    CHROME_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_source_rejected() {
        let renderer = MmdcRenderer::new(Duration::from_secs(30));
        let result = renderer.render("   \n  ", Path::new("out.png"), OutputFormat::Png);
        assert!(matches!(result, Err(RenderError::EmptySource)));
    }

    #[test]
    fn test_builder_settings() {
        let renderer = MmdcRenderer::new(Duration::from_secs(10)).scale(3).width(800);
        assert_eq!(renderer.scale, 3);
        assert_eq!(renderer.width, 800);
    }

    #[cfg(unix)]
    fn spawn_sh(script: &str) -> std::process::Child {
        Command::new("sh")
            .arg("-c")
            .arg(script)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap()
    }

    // A child that writes well past the pipe buffer must still exit and
    // report its real status, not hang until the deadline.
    #[cfg(unix)]
    #[test]
    fn test_large_stderr_does_not_stall() {
        let child = spawn_sh(
            "i=0; while [ $i -lt 4000 ]; do \
             echo mmdc-diagnostic-line-padding-padding-padding >&2; \
             i=$((i+1)); done; exit 3",
        );
        let (status, stderr) = wait_with_stderr(child, "sh", Duration::from_secs(20)).unwrap();
        assert_eq!(status.code(), Some(3));
        assert!(stderr.contains("mmdc-diagnostic-line"));
    }

    #[cfg(unix)]
    #[test]
    fn test_deadline_kills_child() {
        let child = spawn_sh("sleep 30");
        let result = wait_with_stderr(child, "sh", Duration::from_millis(300));
        assert!(matches!(result, Err(RenderError::Timeout { seconds: 0 })));
    }
}
