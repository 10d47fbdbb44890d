use colored::Colorize;
use prettytable::{format, row, Table};

use super::session_client;
use crate::api::{AssetStatus, Project};
use crate::config::Config;
use crate::error::{PortalError, Result};
use crate::pages::list::EMPTY_STATE;

/// List the projects the session user is associated with
///
/// # Arguments
///
/// * `config` - Validated configuration
/// * `token` - Session token
/// * `json` - Print the projects as JSON instead of a table
///
/// # Errors
///
/// Returns an error if the session is missing or the request fails
pub async fn list_projects(config: &Config, token: Option<String>, json: bool) -> Result<()> {
    let (client, _notifier) = session_client(config, token).await?;
    let projects = client.list_projects().await?;

    if json {
        let out = serde_json::to_string_pretty(&projects).map_err(PortalError::Serialization)?;
        println!("{}", out);
        return Ok(());
    }

    if projects.is_empty() {
        println!("{}", EMPTY_STATE.yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(row!["ID".bold(), "Name".bold(), "Status".bold(), "Lead".bold()]);
    for project in &projects {
        table.add_row(row![
            project.id.cyan(),
            project.display_name(),
            project.display_status(),
            project.manager_tag()
        ]);
    }

    println!("\nMy Projects:");
    table.printstd();
    println!();
    println!("Use {} to see a masterplan.", "portal project <ID>".cyan());
    Ok(())
}

/// Show one project with its masterplan assets
///
/// # Errors
///
/// Returns an error if the session is missing or the request fails
pub async fn show_project(
    config: &Config,
    token: Option<String>,
    id: &str,
    json: bool,
) -> Result<()> {
    let (client, _notifier) = session_client(config, token).await?;
    let project = client.get_project(id).await?;

    if json {
        let out = serde_json::to_string_pretty(&project).map_err(PortalError::Serialization)?;
        println!("{}", out);
        return Ok(());
    }

    print_project(&project);
    Ok(())
}

fn print_project(project: &Project) {
    println!("\n{}", project.display_name().bold());
    println!("ID:     {}", project.id.cyan());
    println!("Status: {}", project.display_status());
    println!("Lead:   {}", project.manager_tag());

    let assets = project.assets();
    if assets.is_empty() {
        println!("\n{}", crate::pages::detail::NO_ASSETS.yellow());
        return;
    }

    let mut table = Table::new();
    table.add_row(row!["#", "Asset", "Type", "Status"]);
    for (index, asset) in assets.iter().enumerate() {
        let status = match asset.status {
            AssetStatus::Completed => "Completed".green(),
            AssetStatus::Pending => "Pending".yellow(),
            AssetStatus::Unknown => "Unknown".dimmed(),
        };
        table.add_row(row![
            index + 1,
            asset.description.as_deref().unwrap_or("-"),
            format!("{:?}", asset.kind).to_lowercase(),
            status
        ]);
    }

    println!("\nMasterplan:");
    table.printstd();
    println!();
}
