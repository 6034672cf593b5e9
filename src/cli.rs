use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ormgraph",
    version,
    about = "Extract a relationship graph of ORM model classes",
    after_help = r#"Examples:
  ormgraph scan --repo .
  ormgraph scan --repo . --model-dir app/Models --output graph.json --stats
  ormgraph files --repo . --exclude vendor --exclude tests
  ormgraph inspect app/Models/Post.php
"#
)]
pub struct Args {
    /// Log debug output to stderr (overridden by ORMGRAPH_LOG).
    #[arg(long, short, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ScanArgs {
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,
    /// Include files ignored by .gitignore.
    #[arg(long)]
    pub no_ignore: bool,
    /// Directory (relative to repo) holding model classes; repeatable.
    #[arg(long = "model-dir", value_name = "DIR")]
    pub model_dirs: Vec<String>,
    /// Directory name to skip anywhere in the tree; repeatable.
    #[arg(long = "exclude", value_name = "DIR")]
    pub exclude_dirs: Vec<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scan model files and print the relationship graph as JSON.
    Scan {
        #[command(flatten)]
        scan: ScanArgs,
        /// Write the graph to this file instead of stdout.
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Emit single-line JSON.
        #[arg(long)]
        compact: bool,
        /// Print scan statistics as JSON to stderr.
        #[arg(long)]
        stats: bool,
    },
    /// List the files a scan would read.
    Files {
        #[command(flatten)]
        scan: ScanArgs,
    },
    /// Show what is extracted from a single file.
    Inspect {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
}
