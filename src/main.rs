//! Parel portal - command-line driver
//!
#![doc = "Parel portal - command-line driver"]
#![doc = "Main entry point for the portal application."]

use anyhow::Result;

use parel_portal::cli::{Cli, Commands};
use parel_portal::commands;
use parel_portal::config::Config;
use parel_portal::logging::{init_tracing, with_bootstrap_logging};
use parel_portal::pages::ProjectFields;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Load configuration; its warnings go to a bootstrap subscriber
    let config_path = cli.config.as_deref().unwrap_or("config/portal.yaml");
    let bootstrap_level = if cli.verbose { "debug" } else { "warn" };
    let config = with_bootstrap_logging(bootstrap_level, || Config::load(config_path, &cli))?;

    // Initialize tracing
    init_tracing(&config.logging)?;

    // Invalid configuration is fatal
    config.validate()?;

    let token = cli.token.clone();
    match cli.command {
        Commands::Open { path } => {
            tracing::info!("Opening {}", path);
            commands::open::run_open(&config, token, &path).await
        }
        Commands::Projects { json } => {
            tracing::info!("Listing projects");
            commands::projects::list_projects(&config, token, json).await
        }
        Commands::Project { id, json } => {
            tracing::info!("Showing project {}", id);
            commands::projects::show_project(&config, token, &id, json).await
        }
        Commands::NewProject {
            name,
            audience,
            values,
        } => {
            tracing::info!("Creating project {}", name);
            let fields = ProjectFields::new(name, audience, values);
            commands::new_project::create_project(&config, token, fields).await
        }
        Commands::Discord => {
            tracing::info!("Checking Discord link status");
            commands::discord::show_link_status(&config, token).await
        }
    }
}
