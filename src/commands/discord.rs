use colored::Colorize;

use super::session_client;
use crate::config::Config;
use crate::error::Result;

/// Show whether a Discord account is linked to the session user
///
/// # Errors
///
/// Returns an error if the session is missing or the request fails
pub async fn show_link_status(config: &Config, token: Option<String>) -> Result<()> {
    let (client, _notifier) = session_client(config, token).await?;
    let status = client.discord_link_status().await?;

    if status.is_linked {
        println!("{}", "Discord account linked".green());
    } else {
        println!("{}", "No Discord account linked".yellow());
        println!(
            "Use {} in the portal menu to link one.",
            "Link Discord Account".cyan()
        );
    }
    Ok(())
}
