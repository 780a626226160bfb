use crate::cli::UnreachablePolicy;
use crate::compiler::config::{ConfigCompiler, DATA, LABELS};
use crate::compiler::dialect::Dialect;
use crate::compiler::error::{CompileError, GraphError};
use crate::compiler::graph;
use crate::compiler::literal::quoted;
use crate::compiler::module::ModuleCompiler;
use crate::domain::models::{Config, Content, Project, Settings};
use sha2::{Digest, Sha256};

pub const MODEL_FILE: &str = "model.py";
pub const TRAIN_FILE: &str = "train.py";
pub const DATASET_FILE: &str = "dataset.json";

/// One generated file: an ordered list of statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub name: &'static str,
    pub statements: Vec<String>,
}

impl Artifact {
    pub fn render(&self) -> String {
        let mut text = self.statements.join("\n");
        text.push('\n');
        text
    }

    pub fn sha256(&self) -> String {
        hex::encode(Sha256::digest(self.render().as_bytes()))
    }
}

#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub unreachable: UnreachablePolicy,
    pub validation_split: f64,
    pub remote_monitor_root: String,
}

impl CompileOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            unreachable: settings.unreachable,
            validation_split: settings.validation_split,
            remote_monitor_root: settings.remote_monitor_root.clone(),
        }
    }
}

#[derive(Debug)]
pub struct CompiledProject {
    pub model: Artifact,
    pub trainer: Artifact,
    pub order: Vec<String>,
    pub dropped: Vec<String>,
}

pub struct ProjectCompiler<'d> {
    dialect: &'d Dialect,
    options: CompileOptions,
}

impl<'d> ProjectCompiler<'d> {
    pub fn new(dialect: &'d Dialect, options: CompileOptions) -> Self {
        Self { dialect, options }
    }

    fn config_compiler(&self) -> ConfigCompiler<'d> {
        ConfigCompiler::new(self.dialect, self.options.validation_split)
    }

    /// Emission order for `content`, with both graph endpoints defined by it.
    ///
    /// An endpoint that names no layer is `UnknownEndpoint`; one the
    /// unreachable policy left out is `Unreachable`, whatever the policy.
    pub fn resolve<'c>(&self, content: &'c Content) -> Result<graph::Ordering<'c>, CompileError> {
        let graph = graph::LayerGraph::build(&content.modules)?;
        let endpoints = [("input", &content.input), ("output", &content.output)];
        for (role, name) in endpoints {
            if !graph.contains(name) {
                return Err(GraphError::UnknownEndpoint {
                    role,
                    name: name.to_string(),
                }
                .into());
            }
        }
        let ordering = graph.order(self.options.unreachable)?;
        let missing: Vec<String> = endpoints
            .iter()
            .filter(|(_, name)| ordering.drops(name))
            .map(|(_, name)| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(GraphError::Unreachable(missing).into());
        }
        tracing::debug!(
            root = %graph.root().name,
            order = ?ordering.names(),
            "resolved emission order"
        );
        Ok(ordering)
    }

    /// Model-definition artifact plus the emission order it was built from.
    pub fn compile_model<'c>(
        &self,
        content: &'c Content,
        config: &Config,
    ) -> Result<(Artifact, graph::Ordering<'c>), CompileError> {
        let ordering = self.resolve(content)?;

        let modules = ModuleCompiler::new(self.dialect);
        let mut statements = self.dialect.imports.clone();
        for m in &ordering.modules {
            statements.push(modules.emit(m)?);
        }
        statements.push(modules.emit_model(content));
        statements.extend(self.config_compiler().emit(config));

        Ok((
            Artifact {
                name: MODEL_FILE,
                statements,
            },
            ordering,
        ))
    }

    /// Training artifact: loads the dataset, fits the model defined by the
    /// model artifact and saves it under the user's namespace.
    pub fn compile_trainer(&self, user_id: &str, config: &Config) -> Artifact {
        let configs = self.config_compiler();
        let mut statements = self.dialect.imports.clone();
        statements.push("import json".to_string());
        statements.push(format!("from {} import *", module_name(MODEL_FILE)));
        statements.push(format!(
            "dataset = json.load(open({}))",
            quoted(&format!("./{}/{}", user_id, DATASET_FILE))
        ));
        statements.push(format!("{} = dataset[\"x\"]", DATA));
        statements.push(format!("{} = dataset[\"y\"]", LABELS));
        statements.push(configs.emit_remote_monitor(&self.options.remote_monitor_root));
        statements.push(configs.emit_fit(config));
        statements.push(format!(
            "model.save({})",
            quoted(&format!("./{}/Model", user_id))
        ));
        Artifact {
            name: TRAIN_FILE,
            statements,
        }
    }

    pub fn compile(&self, project: &Project) -> Result<CompiledProject, CompileError> {
        let (model, ordering) = self.compile_model(&project.content, &project.config)?;
        let order = ordering.names();
        let dropped = ordering.dropped_names();
        let trainer = self.compile_trainer(&project.user_id, &project.config);
        tracing::info!(
            user = %project.user_id,
            layers = order.len(),
            dropped = dropped.len(),
            "compiled project"
        );
        Ok(CompiledProject {
            model,
            trainer,
            order,
            dropped,
        })
    }
}

fn module_name(file: &str) -> &str {
    file.strip_suffix(".py").unwrap_or(file)
}
