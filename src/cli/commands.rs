use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::generator::{self, lifecycle};
use crate::project::Project;

/// Command-line interface for the Java resource provider generator
#[derive(Debug, Parser)]
#[command(name = "cfn-java-gen")]
#[command(about = "Generate Java resource provider projects from resource schemas", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Project root directory
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Log at debug level
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the project settings and scaffold
    ///
    /// Scaffold files are never overwritten; the command fails on the first
    /// file that already exists.
    Init {
        /// Resource type name, e.g. Vendor::Service::Resource
        #[arg(long)]
        type_name: String,

        /// Java package to use instead of the derived one (e.g. com.example.widget)
        #[arg(long)]
        namespace: Option<String>,
    },
    /// Regenerate the derived sources from the resource schema
    Generate,
    /// Zip the build artifact and sources into a deployable archive
    Package {
        /// Archive path (default: <root>/<hyphenated-type-name>.zip)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Run a parsed command
///
/// # Errors
///
/// Library failures are returned as [`crate::Error`] inside the
/// [`anyhow::Error`], so callers can downcast for the exit code.
pub fn run_cli(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init {
            type_name,
            namespace,
        } => {
            let mut project = Project::new(&cli.root, &type_name)?;
            if let Some(namespace) = namespace.as_deref() {
                project.set_namespace(namespace)?;
            }
            generator::init(&mut project)?;
            println!(
                "Initialized {} in {} (package {})",
                project.type_name(),
                project.root().display(),
                project.namespace()?
            );
            Ok(())
        }
        Commands::Generate => {
            let project = Project::load(&cli.root)?;
            let written = generator::generate(&project)?;
            println!(
                "Generated {} files under {}",
                written.len(),
                lifecycle::generated_root(project.root()).display()
            );
            Ok(())
        }
        Commands::Package { output } => {
            let project = Project::load(&cli.root)?;
            let archive = output.unwrap_or_else(|| {
                project
                    .root()
                    .join(format!("{}.zip", project.hyphenated_name()))
            });
            generator::package(&project, &archive)?;
            info!(archive = %archive.display(), "Wrote archive");
            println!("Packaged {}", archive.display());
            Ok(())
        }
    }
}
