//! New project form
//!
//! The form holds three required text fields. Submitting disables the
//! submit control and swaps its label; a failure restores both. The
//! network round trip and the follow-up redirect are driven by
//! [`crate::portal::Portal::submit_new_project`].

use crate::api::NewProjectRequest;
use crate::error::PortalError;
use crate::view::escape_html;

/// Submit label while idle
pub const SUBMIT_LABEL: &str = "Create Project";

/// Submit label while the request is in flight
pub const BUSY_LABEL: &str = "Creating...";

/// Submit label after success, until the redirect happens
pub const DONE_LABEL: &str = "Redirecting...";

/// Notification shown after a successful creation
pub const CREATED_MESSAGE: &str = "Project created successfully! Redirecting...";

/// User input of the form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectFields {
    /// Project name
    pub name: String,
    /// Target audience
    pub target_audience: String,
    /// Brand core values
    pub core_values: String,
}

impl ProjectFields {
    /// Builds the fields from their three values.
    pub fn new(
        name: impl Into<String>,
        target_audience: impl Into<String>,
        core_values: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            target_audience: target_audience.into(),
            core_values: core_values.into(),
        }
    }

    /// Checks that every field is filled in and builds the request body.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::Form`] naming the first empty field
    pub fn to_request(&self) -> Result<NewProjectRequest, PortalError> {
        let required = [
            ("Project name", &self.name),
            ("Target audience", &self.target_audience),
            ("Core values", &self.core_values),
        ];
        if let Some((label, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(PortalError::Form(format!("{} is required", label)));
        }

        Ok(NewProjectRequest {
            project_name: self.name.trim().to_string(),
            target_audience: self.target_audience.trim().to_string(),
            core_values: self.core_values.trim().to_string(),
        })
    }
}

/// Submission state of the form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitState {
    /// Waiting for input
    #[default]
    Idle,
    /// Request in flight
    Submitting,
    /// Project created; a redirect is scheduled
    Created {
        /// Id of the new project
        project_id: String,
    },
}

/// State of the new project form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewProjectForm {
    /// Current input
    pub fields: ProjectFields,
    /// Submission state
    pub state: SubmitState,
}

impl NewProjectForm {
    /// Whether the submit control is disabled.
    pub fn submit_disabled(&self) -> bool {
        !matches!(self.state, SubmitState::Idle)
    }

    /// Current submit label.
    pub fn submit_label(&self) -> &'static str {
        match self.state {
            SubmitState::Idle => SUBMIT_LABEL,
            SubmitState::Submitting => BUSY_LABEL,
            SubmitState::Created { .. } => DONE_LABEL,
        }
    }

    /// Starts a submission with `fields`.
    ///
    /// Disables the control and returns the request body to post.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::Form`] if a submission is already running or
    /// a field is empty; the form stays idle in the latter case
    pub fn begin(&mut self, fields: ProjectFields) -> Result<NewProjectRequest, PortalError> {
        if self.submit_disabled() {
            return Err(PortalError::Form(
                "a submission is already in progress".to_string(),
            ));
        }
        self.fields = fields;
        let request = self.fields.to_request()?;
        self.state = SubmitState::Submitting;
        Ok(request)
    }

    /// Records a successful creation.
    pub fn succeed(&mut self, project_id: impl Into<String>) {
        self.state = SubmitState::Created {
            project_id: project_id.into(),
        };
    }

    /// Re-enables the control after a failed submission, keeping the input.
    pub fn fail(&mut self) {
        self.state = SubmitState::Idle;
    }

    /// Renders the form markup.
    pub fn markup(&self) -> String {
        let disabled = if self.submit_disabled() { " disabled" } else { "" };
        format!(
            concat!(
                r#"<p><a href="/">&larr; Back to Project Dashboard</a></p>"#,
                "<h2>Create a New Project</h2>",
                r#"<form id="new-project-form">"#,
                r#"<label for="projectName">Project Name</label>"#,
                r#"<input type="text" id="projectName" name="projectName" value="{name}" required>"#,
                r#"<label for="targetAudience">Target Audience</label>"#,
                r#"<input type="text" id="targetAudience" name="targetAudience" value="{audience}" required>"#,
                r#"<label for="coreValues">Core Values</label>"#,
                r#"<input type="text" id="coreValues" name="coreValues" value="{values}" required>"#,
                r#"<button type="submit" id="create-project-btn"{disabled}>{label}</button>"#,
                "</form>"
            ),
            name = escape_html(&self.fields.name),
            audience = escape_html(&self.fields.target_audience),
            values = escape_html(&self.fields.core_values),
            disabled = disabled,
            label = self.submit_label(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ProjectFields {
        ProjectFields::new("Acme Launch", "Small businesses", "Trust, speed")
    }

    #[test]
    fn test_initial_state() {
        let form = NewProjectForm::default();
        assert!(!form.submit_disabled());
        assert_eq!(form.submit_label(), SUBMIT_LABEL);
        assert!(form.markup().contains(">Create Project</button>"));
    }

    #[test]
    fn test_begin_disables_and_builds_body() {
        let mut form = NewProjectForm::default();
        let request = form.begin(filled()).unwrap();

        assert_eq!(request.project_name, "Acme Launch");
        assert_eq!(request.target_audience, "Small businesses");
        assert_eq!(request.core_values, "Trust, speed");
        assert!(form.submit_disabled());
        assert_eq!(form.submit_label(), BUSY_LABEL);
        assert!(form.markup().contains(r#"id="create-project-btn" disabled>Creating...</button>"#));
    }

    #[test]
    fn test_missing_field_keeps_form_idle() {
        let mut form = NewProjectForm::default();
        let err = form
            .begin(ProjectFields::new("Acme", " ", "Trust"))
            .unwrap_err();
        assert!(err.to_string().contains("Target audience is required"));
        assert_eq!(form.state, SubmitState::Idle);
    }

    #[test]
    fn test_double_submit_rejected() {
        let mut form = NewProjectForm::default();
        form.begin(filled()).unwrap();
        assert!(form.begin(filled()).is_err());
    }

    #[test]
    fn test_fail_restores_label() {
        let mut form = NewProjectForm::default();
        form.begin(filled()).unwrap();
        form.fail();
        assert!(!form.submit_disabled());
        assert_eq!(form.submit_label(), SUBMIT_LABEL);
        assert_eq!(form.fields, filled());
    }

    #[test]
    fn test_succeed_keeps_control_disabled() {
        let mut form = NewProjectForm::default();
        form.begin(filled()).unwrap();
        form.succeed("P9");
        assert!(form.submit_disabled());
        assert_eq!(
            form.state,
            SubmitState::Created {
                project_id: "P9".to_string()
            }
        );
    }
}
