//! Command-line interface implementation for forgekit.
//! Provides argument parsing and help text formatting using clap.

use crate::artifact::ScriptArtifact;
use crate::config::get_config;
use crate::constants::{CONFIG_FILES, MINECRAFT_OUTPUT_SUBDIR};
use crate::error::{Error, Result};
use crate::fs::LocalFileSystem;
use crate::renderer::MiniJinjaRenderer;
use crate::server::{CreateStatus, FailurePolicy};
use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

/// Command-line arguments structure for forgekit.
#[derive(Parser, Debug)]
#[command(author, version, about = "forgekit: generate dockerized Minecraft Forge servers", long_about = None)]
pub struct Args {
    /// Server definition file, or a directory containing server.json/server.yml/server.yaml
    #[arg(value_name = "DEFINITION")]
    pub definition: PathBuf,

    /// Directory holding the server templates
    #[arg(short, long, env = "TEMPLATES_DIR", default_value = "templates")]
    pub templates_dir: PathBuf,

    /// Root output directory, servers are created in <OUTPUT_DIR>/minecraft/<NAME>
    #[arg(short, long, env = "OUTPUT_DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// Override the server name from the definition
    #[arg(short, long)]
    pub name: Option<String>,

    /// Abort on the first artifact that fails instead of reporting partial results
    #[arg(long)]
    pub strict: bool,

    /// Also render recreate_server.sh into the server directory
    #[arg(long)]
    pub with_script: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Returns
/// * `Args` - Parsed command line arguments
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Loads and validates the server definition
/// 2. Builds the server bundle below `<output_dir>/minecraft`
/// 3. Creates the server, skipping it if its directory already exists
/// 4. Optionally renders the recreate script
pub fn run(args: Args) -> Result<()> {
    let engine = MiniJinjaRenderer::new();
    let fs = LocalFileSystem::new();

    let mut definition = get_config(&args.definition, &CONFIG_FILES)?;
    if let Some(name) = args.name {
        definition.name = name;
        definition.validate()?;
    }

    let templates_root = args.templates_dir.to_string_lossy().to_string();
    let base_output_path =
        args.output_dir.join(MINECRAFT_OUTPUT_SUBDIR).to_string_lossy().to_string();
    let policy =
        if args.strict { FailurePolicy::AllOrNothing } else { FailurePolicy::CollectAll };

    let mut server =
        definition.into_bundle(&templates_root, &base_output_path).with_policy(policy);

    let report = match server.create_server(&engine, &fs)? {
        CreateStatus::Skipped { output_dir, .. } => {
            println!("Server '{}' already exists in {}.", server.name(), output_dir.display());
            return Ok(());
        }
        CreateStatus::Created(report) => report,
    };

    for outcome in &report.outcomes {
        println!("{}: {}", outcome.artifact, outcome.reason);
    }

    if args.with_script {
        let script = ScriptArtifact::recreate_server(&templates_root, &server);
        let outcome = script.render_to_file(&engine, &fs);
        println!("{}: {}", outcome.artifact, outcome.reason);
        if !outcome.success {
            return Err(Error::ArtifactFailed { artifact: outcome.artifact, reason: outcome.reason });
        }
    }

    if !report.is_complete() {
        let failed: Vec<String> = report.failures().map(|o| o.artifact.clone()).collect();
        return Err(Error::ArtifactFailed {
            artifact: failed.join(", "),
            reason: format!("server '{}' is incomplete", server.name()),
        });
    }

    println!("Server generation completed successfully in {}.", report.output_dir.display());
    Ok(())
}
