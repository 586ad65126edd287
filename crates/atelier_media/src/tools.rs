//! External tool invocation and scratch file handling.

use atelier_error::{ProcessingError, ProcessingErrorKind};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use uuid::Uuid;

/// Run an external tool, capturing stdout.
///
/// A missing binary degrades like any other processing failure; video and
/// audio derivative generation must keep working (with placeholders) on
/// hosts without ffmpeg.
pub(crate) async fn run_tool(tool: &str, args: &[&str]) -> Result<Vec<u8>, ProcessingError> {
    tracing::debug!(tool = %tool, ?args, "Running external tool");

    let output = tokio::process::Command::new(tool)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| {
            ProcessingError::new(ProcessingErrorKind::Tool {
                tool: tool.to_string(),
                reason: format!("{}. Make sure it's installed.", e),
            })
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ProcessingError::new(ProcessingErrorKind::Tool {
            tool: tool.to_string(),
            reason: format!("{}: {}", output.status, stderr.trim()),
        }));
    }

    Ok(output.stdout)
}

/// Input bytes written to a temporary file for subprocess consumption,
/// removed on drop.
pub(crate) struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    pub(crate) async fn create(data: &[u8], extension: &str) -> Result<Self, ProcessingError> {
        let path = std::env::temp_dir().join(format!("atelier-{}.{}", Uuid::new_v4(), extension));
        tokio::fs::write(&path, data).await.map_err(|e| {
            ProcessingError::new(ProcessingErrorKind::Scratch(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;
        Ok(Self { path })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn path_str(&self) -> Result<&str, ProcessingError> {
        self.path.to_str().ok_or_else(|| {
            ProcessingError::new(ProcessingErrorKind::Scratch(format!(
                "non-utf8 scratch path: {}",
                self.path.display()
            )))
        })
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_tool_reports_install_hint() {
        let err = run_tool("atelier-definitely-not-a-binary", &["-h"])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Make sure it's installed"));
    }

    #[tokio::test]
    async fn scratch_file_is_removed_on_drop() {
        let path;
        {
            let scratch = ScratchFile::create(b"bytes", "bin").await.unwrap();
            path = scratch.path().to_path_buf();
            assert!(path.exists());
        }
        assert!(!path.exists());
    }
}
