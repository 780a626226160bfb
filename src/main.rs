use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod compiler;
mod domain;
mod services;

pub use cli::{ArtifactKind, Cli, Commands, Target};
pub use commands::{handle_inspect_commands, handle_runtime_commands};
pub use compiler::project::{CompileOptions, ProjectCompiler};
pub use domain::models::{
    CompileReport, EmitReport, JsonOut, OrderReport, Project, Settings, TrainReport,
};
pub use domain::params::Layer;
pub use services::binder::{bind_project, read_payload};
pub use services::output::{print_error, print_one, print_out};
pub use services::storage::{audit, load_settings, write_artifacts};
pub use services::trainer::{run_training, submit_train};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "netforge=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let settings = load_settings(cli.settings.as_deref())?;
    if handle_inspect_commands(cli, &settings)? {
        return Ok(());
    }
    handle_runtime_commands(cli, &settings)
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        print_error(cli.json, &err);
        std::process::exit(1);
    }
}
