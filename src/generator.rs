//! External word cloud generator.
//!
//! Layout, font sizing and masking are done by the `stylecloud` Python
//! package. `StylecloudGenerator` drives it as a child process: the request is
//! written as JSON to the interpreter's stdin and the image lands at
//! `output_name`.

use crate::params::RenderParameters;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Reads one request from stdin and forwards it to `gen_stylecloud`
const DRIVER: &str = r#"
import json, sys
import stylecloud

request = json.load(sys.stdin)
request["size"] = tuple(request["size"])
stylecloud.gen_stylecloud(**request)
"#;

const STDERR_TAIL_LINES: usize = 3;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("lost track of generator process: {0}")]
    Wait(#[source] std::io::Error),
    #[error("generator exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
    #[error("generator timed out after {}s", .0.as_secs())]
    TimedOut(Duration),
    #[error("render cancelled")]
    Cancelled,
}

/// Keyword arguments for `stylecloud.gen_stylecloud`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateRequest {
    pub text: String,
    pub icon_name: String,
    pub invert_mask: bool,
    pub palette: String,
    pub background_color: String,
    pub size: (u32, u32),
    pub max_font_size: u32,
    pub max_words: u32,
    pub collocations: bool,
    pub output_name: PathBuf,
}

impl GenerateRequest {
    pub fn new(params: &RenderParameters, output: &Path) -> Self {
        Self {
            text: params.text.clone(),
            icon_name: params.icon_spec(),
            invert_mask: params.invert_mask,
            palette: params.palette_id(),
            background_color: params.background.clone(),
            size: (params.width, params.height),
            max_font_size: params.max_font_size,
            max_words: params.max_words,
            collocations: params.collocations,
            output_name: output.to_path_buf(),
        }
    }
}

/// Anything that can turn a request into an image file at `request.output_name`
pub trait WordCloudGenerator: Send + Sync {
    fn generate<'a>(
        &'a self,
        request: &'a GenerateRequest,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<(), GeneratorError>>;
}

pub struct StylecloudGenerator {
    python: String,
    timeout: Duration,
}

impl StylecloudGenerator {
    pub fn new(python: impl Into<String>, timeout: Duration) -> Self {
        Self {
            python: python.into(),
            timeout,
        }
    }

    async fn run(
        &self,
        request: &GenerateRequest,
        cancel: &CancellationToken,
    ) -> Result<(), GeneratorError> {
        if cancel.is_cancelled() {
            return Err(GeneratorError::Cancelled);
        }

        let payload = serde_json::to_vec(request)?;

        debug!(
            program = %self.python,
            palette = %request.palette,
            icon = %request.icon_name,
            width = request.size.0,
            height = request.size.1,
            "Spawning generator"
        );

        // Dropping the child (cancel or timeout) kills it
        let mut child = Command::new(&self.python)
            .arg("-c")
            .arg(DRIVER)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| GeneratorError::Spawn {
                program: self.python.clone(),
                source,
            })?;

        let run = async move {
            if let Some(mut stdin) = child.stdin.take() {
                // A generator that dies before reading reports through its exit status
                let _ = stdin.write_all(&payload).await;
            }
            child.wait_with_output().await
        };

        let output = tokio::select! {
            _ = cancel.cancelled() => return Err(GeneratorError::Cancelled),
            result = tokio::time::timeout(self.timeout, run) => match result {
                Ok(output) => output.map_err(GeneratorError::Wait)?,
                Err(_) => return Err(GeneratorError::TimedOut(self.timeout)),
            },
        };

        if output.status.success() {
            Ok(())
        } else {
            Err(GeneratorError::Failed {
                status: output.status.to_string(),
                stderr: stderr_tail(&output.stderr),
            })
        }
    }
}

impl WordCloudGenerator for StylecloudGenerator {
    fn generate<'a>(
        &'a self,
        request: &'a GenerateRequest,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<(), GeneratorError>> {
        self.run(request, cancel).boxed()
    }
}

/// Last few non-empty stderr lines; for a Python traceback that ends with the exception
fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.is_empty() {
        return "no diagnostic output".to_string();
    }
    lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join(" | ")
}
