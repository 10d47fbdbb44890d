use colored::Colorize;

use super::{identity, print_notifications};
use crate::config::Config;
use crate::error::{PortalError, Result};
use crate::pages::ProjectFields;
use crate::portal::{Portal, SubmitOutcome};
use crate::router::{Route, NEW_PROJECT_PATH};

/// Submit the new project form
///
/// Opens the form page, submits the three fields and reports the new
/// project's location. The post-creation redirect is not awaited.
///
/// # Errors
///
/// Returns an error if the form cannot be shown or the backend rejects the
/// request
pub async fn create_project(
    config: &Config,
    token: Option<String>,
    fields: ProjectFields,
) -> Result<()> {
    let portal = Portal::new(config, identity(config, token), NEW_PROJECT_PATH)?;
    match portal.start().await? {
        Some(render) => {
            render.finished().await;
        }
        None => {
            print_notifications(portal.notifier());
            return Err(PortalError::Identity(
                "No session token. Pass --token or set PORTAL_SESSION_TOKEN".to_string(),
            )
            .into());
        }
    }

    let outcome = portal.submit_new_project(fields).await;
    print_notifications(portal.notifier());

    match outcome? {
        SubmitOutcome::Created {
            project_id,
            redirect,
        } => {
            redirect.abort();
            println!(
                "{} {}",
                "Created".green(),
                Route::Detail { id: project_id }.path().cyan()
            );
            Ok(())
        }
        SubmitOutcome::Failed(e) => Err(e.into()),
    }
}
