//! Command-line interface definition for the Parel portal
//!
//! This module defines the CLI structure using clap's derive API. Each
//! command drives the same headless portal the browser front-end uses:
//! the identity session comes from a bearer token and rendered pages are
//! printed to the terminal.

use clap::{Parser, Subcommand};

/// Parel portal - view and create agency projects
#[derive(Parser, Debug, Clone)]
#[command(name = "portal")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/portal.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Session bearer token issued by the identity provider
    #[arg(long, env = "PORTAL_SESSION_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Render the page for a portal URL path (e.g. `/`, `/project/P1`)
    Open {
        /// Path (optionally with query) to open
        path: String,
    },

    /// List the projects you are associated with
    Projects {
        /// Print the raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show one project and its masterplan assets
    Project {
        /// Project identifier
        id: String,

        /// Print the raw JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Create a new project and generate its masterplan
    NewProject {
        /// Project name
        #[arg(long)]
        name: String,

        /// Target audience description
        #[arg(long)]
        audience: String,

        /// Brand core values
        #[arg(long)]
        values: String,
    },

    /// Show whether a Discord account is linked to your profile
    Discord,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/portal.yaml".to_string()),
            verbose: false,
            token: None,
            command: Commands::Open {
                path: "/".to_string(),
            },
        }
    }
}
