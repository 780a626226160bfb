use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "netforge",
    version,
    about = "Compile declarative neural-network graphs into Keras scripts"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        help = "Settings file (default: ~/.config/netforge/settings.toml)"
    )]
    pub settings: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile a project and write its model and training scripts
    Compile {
        #[command(flatten)]
        target: Target,
        #[arg(long, help = "Root directory for generated artifacts")]
        out_dir: Option<PathBuf>,
    },
    /// Compile, write, then run the training script
    Train {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long, help = "Python interpreter used to run the training script")]
        python: Option<String>,
    },
    /// Print one generated artifact without writing anything
    Emit {
        #[command(flatten)]
        target: Target,
        #[arg(long, value_enum, default_value_t = ArtifactKind::Model)]
        artifact: ArtifactKind,
    },
    /// Print the layer emission order
    Order {
        payload: String,
        #[arg(long, value_enum)]
        unreachable: Option<UnreachablePolicy>,
    },
    /// Print the reduced training request sent to a remote trainer
    TrainBody {
        payload: String,
        #[arg(long)]
        user: Option<String>,
    },
    /// Send the training request to a remote trainer
    Submit {
        payload: String,
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        trainer_url: Option<String>,
    },
    /// List supported layer types and their parameters
    Layers,
}

/// Payload and request identity shared by the compiling commands.
#[derive(clap::Args, Debug, Clone)]
pub struct Target {
    #[arg(help = "Project payload file, or - for stdin")]
    pub payload: String,
    #[arg(long, help = "User id namespacing the generated artifacts")]
    pub user: Option<String>,
    #[arg(long, value_enum, help = "What to do with layers not connected to the input")]
    pub unreachable: Option<UnreachablePolicy>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ArtifactKind {
    Model,
    Train,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UnreachablePolicy {
    #[default]
    Drop,
    Warn,
    Error,
}
