use crate::cli::UnreachablePolicy;
use crate::compiler::dialect::Dialect;
use crate::compiler::error::BindError;
use crate::compiler::literal::is_identifier;
use crate::domain::params::Layer;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Serialize)]
pub struct JsonErr {
    pub ok: bool,
    pub error: ErrorBody,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

/// Namespace family a layer type is emitted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Layer,
    Math,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Layer => "Layer",
            Category::Math => "Math",
        }
    }
}

/// Names the generated scripts define themselves; a layer may not shadow them.
pub const RESERVED_NAMES: &[&str] = &[
    "tf",
    "tfa",
    "json",
    "model",
    "dataset",
    "x_train",
    "y_train",
    "early_stopping",
    "reduce_lr",
    "remote_monitor",
];

/// One layer declaration.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawModule")]
pub struct Module {
    pub category: Category,
    pub name: String,
    pub input: Option<String>,
    pub output: Option<String>,
    pub layer: Layer,
}

impl Module {
    pub fn kind(&self) -> &'static str {
        self.layer.kind()
    }

    pub fn is_input(&self) -> bool {
        self.layer.is_input()
    }
}

#[derive(Deserialize)]
struct RawModule {
    category: Category,
    #[serde(rename = "type")]
    kind: String,
    name: String,
    #[serde(default)]
    input: Option<String>,
    #[serde(default)]
    output: Option<String>,
    #[serde(default)]
    param: Option<serde_json::Value>,
}

impl TryFrom<RawModule> for Module {
    type Error = BindError;

    fn try_from(raw: RawModule) -> Result<Self, Self::Error> {
        if !is_identifier(&raw.name) {
            return Err(BindError::InvalidIdentifier(raw.name));
        }
        if RESERVED_NAMES.contains(&raw.name.as_str()) {
            return Err(BindError::ReservedName(raw.name));
        }
        let param = raw
            .param
            .filter(|p| !p.is_null())
            .unwrap_or_else(|| serde_json::json!({}));
        let layer: Layer =
            serde_json::from_value(serde_json::json!({ "type": raw.kind, "param": param }))
                .map_err(|source| BindError::Param {
                    name: raw.name.clone(),
                    source,
                })?;
        if let Layer::Unsupported = layer {
            return Err(BindError::InvalidNodeType {
                name: raw.name,
                kind: raw.kind,
            });
        }
        Ok(Module {
            category: raw.category,
            name: raw.name,
            input: raw.input.filter(|s| !s.is_empty()),
            output: raw.output.filter(|s| !s.is_empty()),
            layer,
        })
    }
}

/// The network graph.
#[derive(Debug, Clone, Deserialize)]
pub struct Content {
    pub input: String,
    pub output: String,
    #[serde(rename = "layers")]
    pub modules: Vec<Module>,
}

fn default_monitor() -> String {
    "val_loss".to_string()
}

fn default_factor() -> f64 {
    0.1
}

fn default_reduce_patience() -> u32 {
    10
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarlyStopping {
    #[serde(default)]
    pub usage: bool,
    #[serde(default = "default_monitor")]
    pub monitor: String,
    #[serde(default)]
    pub patience: u32,
    #[serde(default)]
    pub min_delta: Option<f64>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub restore_best_weights: Option<bool>,
}

impl Default for EarlyStopping {
    fn default() -> Self {
        Self {
            usage: false,
            monitor: default_monitor(),
            patience: 0,
            min_delta: None,
            mode: None,
            restore_best_weights: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningRateReduction {
    #[serde(default)]
    pub usage: bool,
    #[serde(default = "default_monitor")]
    pub monitor: String,
    #[serde(default = "default_factor")]
    pub factor: f64,
    #[serde(default = "default_reduce_patience")]
    pub patience: u32,
    #[serde(default)]
    pub min_lr: Option<f64>,
}

impl Default for LearningRateReduction {
    fn default() -> Self {
        Self {
            usage: false,
            monitor: default_monitor(),
            factor: default_factor(),
            patience: default_reduce_patience(),
            min_lr: None,
        }
    }
}

/// Training configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub optimizer: String,
    pub learning_rate: f64,
    pub loss: String,
    #[serde(default)]
    pub metrics: Vec<String>,
    pub batch_size: u32,
    pub epochs: u32,
    #[serde(default)]
    pub early_stopping: EarlyStopping,
    #[serde(default)]
    pub learning_rate_reduction: LearningRateReduction,
}

/// A bound compile request.
#[derive(Debug, Clone)]
pub struct Project {
    pub user_id: String,
    pub config: Config,
    pub dataset: serde_json::Value,
    pub content: Content,
}

impl Project {
    pub fn train_body(&self) -> Train {
        Train {
            config: self.config.clone(),
            dataset: self.dataset.clone(),
            user_id: self.user_id.clone(),
        }
    }
}

/// Reduced view of a project sent to a remote trainer.
#[derive(Debug, Clone, Serialize)]
pub struct Train {
    pub config: Config,
    pub dataset: serde_json::Value,
    #[serde(rename = "id")]
    pub user_id: String,
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("generated")
}

fn default_python() -> String {
    "python3".to_string()
}

fn default_validation_split() -> f64 {
    0.2
}

fn default_monitor_root() -> String {
    "http://localhost:9000".to_string()
}

/// Settings file (`~/.config/netforge/settings.toml`).
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    #[serde(default = "default_python")]
    pub python: String,
    #[serde(default)]
    pub unreachable: UnreachablePolicy,
    #[serde(default = "default_validation_split")]
    pub validation_split: f64,
    #[serde(default = "default_monitor_root")]
    pub remote_monitor_root: String,
    #[serde(default)]
    pub trainer_url: Option<String>,
    #[serde(default)]
    pub dialect: Dialect,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            python: default_python(),
            unreachable: UnreachablePolicy::default(),
            validation_split: default_validation_split(),
            remote_monitor_root: default_monitor_root(),
            trainer_url: None,
            dialect: Dialect::default(),
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct ArtifactReport {
    pub name: String,
    pub path: String,
    pub sha256: String,
    pub statements: usize,
}

#[derive(Serialize)]
pub struct CompileReport {
    pub namespace: String,
    pub out_dir: String,
    pub artifacts: Vec<ArtifactReport>,
    pub order: Vec<String>,
    pub dropped: Vec<String>,
}

#[derive(Serialize)]
pub struct TrainReport {
    pub compile: CompileReport,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

#[derive(Serialize)]
pub struct EmitReport {
    pub name: String,
    pub sha256: String,
    pub content: String,
}

#[derive(Serialize)]
pub struct OrderReport {
    pub order: Vec<String>,
    pub dropped: Vec<String>,
}

#[derive(Serialize)]
pub struct SubmitReport {
    pub url: String,
    pub status: u16,
    pub body: String,
}
