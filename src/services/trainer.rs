use crate::compiler::project::TRAIN_FILE;
use crate::domain::models::{SubmitReport, Train};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("training script exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
}

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("no trainer url configured")]
    NoUrl,
    #[error("trainer request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug)]
pub struct TrainOutcome {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Runs `<python> <namespace>/train.py` from `out_dir`, so the script's
/// `./<namespace>/...` paths resolve inside the request namespace.
pub fn run_training(
    python: &str,
    out_dir: &Path,
    namespace: &str,
) -> Result<TrainOutcome, ProcessError> {
    let script = Path::new(namespace).join(TRAIN_FILE);
    tracing::info!(python, script = %script.display(), "starting training script");
    let output = std::process::Command::new(python)
        .arg(&script)
        .current_dir(out_dir)
        .output()
        .map_err(|source| ProcessError::Spawn {
            program: python.to_string(),
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    if !output.status.success() {
        return Err(ProcessError::Failed {
            status: output.status.to_string(),
            stderr,
        });
    }
    Ok(TrainOutcome {
        exit_code: output.status.code(),
        stdout,
        stderr,
    })
}

/// Posts the reduced training view to a remote trainer.
pub fn submit_train(url: Option<&str>, body: &Train, timeout_ms: u64) -> Result<SubmitReport, RemoteError> {
    let url = url.ok_or(RemoteError::NoUrl)?;
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()?;
    let resp = client.post(url).json(body).send()?.error_for_status()?;
    let status = resp.status().as_u16();
    tracing::info!(url, status, user = %body.user_id, "submitted training request");
    Ok(SubmitReport {
        url: url.to_string(),
        status,
        body: resp.text()?,
    })
}
