use crate::compiler::project::{Artifact, CompiledProject, DATASET_FILE};
use crate::domain::models::{ArtifactReport, Project, Settings};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
#[error("cannot write {path}: {source}")]
pub struct PersistenceError {
    pub path: String,
    #[source]
    pub source: std::io::Error,
}

fn config_dir() -> Option<PathBuf> {
    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".config/netforge"))
}

pub fn audit(action: &str, data: serde_json::Value) {
    let Some(dir) = config_dir() else {
        return;
    };
    let path = dir.join("audit.jsonl");
    let _ = std::fs::create_dir_all(&dir);
    let event = serde_json::json!({
        "ts": unix_now(),
        "action": action,
        "data": data
    });
    let line = format!("{}\n", event);
    let _ = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut f| std::io::Write::write_all(&mut f, line.as_bytes()));
}

fn unix_now() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Loads settings from `explicit`, else `~/.config/netforge/settings.toml`.
/// A missing default file yields defaults; a missing explicit file is an error.
pub fn load_settings(explicit: Option<&Path>) -> anyhow::Result<Settings> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match config_dir() {
            Some(dir) => dir.join("settings.toml"),
            None => return Ok(Settings::default()),
        },
    };
    if explicit.is_none() && !path.exists() {
        return Ok(Settings::default());
    }
    let raw = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("cannot read settings {}: {}", path.display(), e))?;
    let settings = toml::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("invalid settings {}: {}", path.display(), e))?;
    tracing::debug!(path = %path.display(), "loaded settings");
    Ok(settings)
}

/// Directory holding every artifact of one request.
pub fn namespace_dir(out_dir: &Path, namespace: &str) -> PathBuf {
    out_dir.join(namespace)
}

fn write_file(path: &Path, contents: &str) -> Result<(), PersistenceError> {
    std::fs::write(path, contents).map_err(|source| PersistenceError {
        path: path.display().to_string(),
        source,
    })
}

fn write_artifact(dir: &Path, artifact: &Artifact) -> Result<ArtifactReport, PersistenceError> {
    let path = dir.join(artifact.name);
    write_file(&path, &artifact.render())?;
    Ok(ArtifactReport {
        name: artifact.name.to_string(),
        path: path.display().to_string(),
        sha256: artifact.sha256(),
        statements: artifact.statements.len(),
    })
}

/// Writes the model and training scripts plus the dataset blob under
/// `<out_dir>/<user_id>/`.
pub fn write_artifacts(
    out_dir: &Path,
    project: &Project,
    compiled: &CompiledProject,
) -> Result<Vec<ArtifactReport>, PersistenceError> {
    let dir = namespace_dir(out_dir, &project.user_id);
    std::fs::create_dir_all(&dir).map_err(|source| PersistenceError {
        path: dir.display().to_string(),
        source,
    })?;

    let reports = vec![
        write_artifact(&dir, &compiled.model)?,
        write_artifact(&dir, &compiled.trainer)?,
    ];
    let dataset = serde_json::to_string(&project.dataset).unwrap_or_else(|_| "null".to_string());
    write_file(&dir.join(DATASET_FILE), &dataset)?;

    tracing::info!(dir = %dir.display(), "wrote artifacts");
    Ok(reports)
}
