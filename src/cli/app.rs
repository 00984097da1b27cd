//! Main CLI application structure

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::output::{Output, OutputFormat};
use super::{edge_cmd, export_cmd, node_cmd, query};
use crate::storage::Project;

#[derive(Parser)]
#[command(name = "wbs")]
#[command(author, version, about = "Work-breakdown structures from the command line")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new wbs project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Manage diagram nodes
    #[command(subcommand)]
    Node(node_cmd::NodeCommands),

    /// Manage parent/child edges
    #[command(subcommand)]
    Edge(edge_cmd::EdgeCommands),

    /// Show the hierarchy with codes
    Tree,

    /// Report structural issues (cycles, multiple parents, uncoded nodes)
    Check,

    /// Show a diagram overview
    Status,

    /// Export the diagram
    #[command(subcommand)]
    Export(export_cmd::ExportCommands),

    /// Restore a diagram from a structured export file
    Import {
        /// Path to a wbs-export JSON file
        file: PathBuf,
    },
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);

    output.verbose("WBS CLI starting");

    match cli.command {
        Commands::Init { path } => {
            output.verbose_ctx("init", &format!("Initializing project at: {}", path));
            let project = Project::init(&path)?;
            output.success(&format!(
                "Initialized wbs project at {}",
                project.root().display()
            ));
        }

        Commands::Node(cmd) => node_cmd::run(cmd, &output)?,
        Commands::Edge(cmd) => edge_cmd::run(cmd, &output)?,

        Commands::Tree => {
            output.verbose("Rendering hierarchy tree");
            query::tree(&output)?
        }
        Commands::Check => {
            output.verbose("Running structural checks");
            query::check(&output)?
        }
        Commands::Status => {
            output.verbose("Gathering diagram status");
            query::status(&output)?
        }

        Commands::Export(cmd) => export_cmd::run(cmd, &output)?,
        Commands::Import { file } => export_cmd::import(&file, &output)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}
