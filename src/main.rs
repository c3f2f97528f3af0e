mod profile;
mod rspec;
mod summary;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::exit;
use tracing::{debug, info};

use profile::store::ProfileStore;
use profile::{hello_world_cluster, ProfileDefinition};
use rspec::Request;

// ======================================================
// CLI
// ======================================================

#[derive(Parser)]
#[command(name = "rspecgen")]
#[command(about = "Build testbed profiles and print them as GENI request RSpecs")]
struct Cli {
    /// Profile store directory [default: ~/.rspecgen/profiles]
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// With no subcommand the built-in profile is rendered to stdout.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a profile as a request RSpec.
    Render {
        /// Definition file or stored profile name. Omit for the built-in profile.
        #[arg(long)]
        profile: Option<String>,

        /// Write to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Check a profile without rendering it.
    Validate {
        #[arg(long)]
        profile: Option<String>,
    },
    /// Summarize a profile's nodes and volumes.
    Show {
        #[arg(long)]
        profile: Option<String>,

        /// Output raw JSON instead of the formatted table.
        #[arg(long)]
        json: bool,
    },
    /// Manage stored profile definitions.
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Print the rspecgen version.
    Version,
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// List stored profile names.
    List,
    /// Store a definition file under a name.
    Import {
        name: String,
        file: PathBuf,
    },
    /// Store the built-in profile under a name, as a starting point.
    Export {
        name: String,
    },
    /// Remove a stored profile.
    Delete {
        name: String,
    },
}

// ======================================================
// MAIN
// ======================================================

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let command = cli.command.unwrap_or(Commands::Render {
        profile: None,
        output: None,
    });

    match command {

        // ==================================================
        // RENDER
        // ==================================================

        Commands::Render { profile, output } => {
            let request = load_request(cli.store, profile.as_deref())?;
            let document = rspec::render(&request).context("profile is not a valid request")?;

            match output {
                Some(path) => {
                    fs::write(&path, &document)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    info!(path = %path.display(), "rspec written");
                }
                None => {
                    let mut stdout = io::stdout().lock();
                    stdout.write_all(document.as_bytes())?;
                    stdout.flush()?;
                }
            }
        }

        // ==================================================
        // VALIDATE
        // ==================================================

        Commands::Validate { profile } => {
            let request = load_request(cli.store, profile.as_deref())?;
            request.validate().context("profile is not a valid request")?;
            println!(
                "Profile OK: {} node(s)",
                request.nodes().len()
            );
        }

        // ==================================================
        // SHOW
        // ==================================================

        Commands::Show { profile, json } => {
            let request = load_request(cli.store, profile.as_deref())?;
            let summary = summary::summarize(&request).context("profile is not a valid request")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                summary::print_summary(&summary);
            }
        }

        // ==================================================
        // PROFILE STORE
        // ==================================================

        Commands::Profile { command } => {
            let store = ProfileStore::open(cli.store)?;

            match command {
                ProfileCommands::List => {
                    let names = store.list()?;
                    if names.is_empty() {
                        println!("No stored profiles in {}.", store.dir().display());
                        println!("Add one with: rspecgen profile import <name> <file>");
                    }
                    for name in names {
                        println!("{}", name);
                    }
                }
                ProfileCommands::Import { name, file } => {
                    let path = store
                        .import(&name, &file)
                        .with_context(|| format!("failed to import profile '{}'", name))?;
                    println!("Profile '{}' stored at {}.", name, path.display());
                }
                ProfileCommands::Export { name } => {
                    let definition = ProfileDefinition::from_request(&hello_world_cluster());
                    let path = store.save(&name, &definition)?;
                    println!("Built-in profile stored as '{}' at {}.", name, path.display());
                }
                ProfileCommands::Delete { name } => {
                    if !store.delete(&name)? {
                        bail!("no stored profile named '{}'", name);
                    }
                    println!("Profile '{}' deleted.", name);
                }
            }
        }

        Commands::Version => {
            println!("rspecgen {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

/// The built-in profile, or the named/pathed definition.
fn load_request(store: Option<PathBuf>, profile: Option<&str>) -> Result<Request> {
    match profile {
        None => {
            debug!("using built-in profile");
            Ok(hello_world_cluster())
        }
        Some(spec) => {
            let store = ProfileStore::open(store)?;
            let definition = store
                .resolve(spec)
                .with_context(|| format!("failed to load profile '{}'", spec))?;
            Ok(definition.into_request())
        }
    }
}
