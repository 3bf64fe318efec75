//! Backlog Controller - Business Logic
//!
//! Owns the flow of every user intent: local validation, the loading gate,
//! the call through [`BacklogApi`] and the wholesale update of
//! [`SharedState`]. Failures end up as banner text; nothing here panics or
//! retries.

use std::path::PathBuf;
use std::sync::Arc;

use super::commands::Command;
use super::errors::{
    Action, ControllerError, MSG_CAPACITY_RANGE, MSG_EMPTY_REQUIREMENTS, MSG_POINTS_NOT_INTEGER,
};
use super::prompt::{Confirmation, PromptAnswer, VelocityDialog, VelocityStep};
use super::state::{
    ActiveTab, Dialog, FormField, SharedState, MAX_TEAM_CAPACITY, MIN_TEAM_CAPACITY,
};
use crate::api::{
    BacklogApi, ExportFormat, GenerateBacklogRequest, HealthStatus, PlanSprintsRequest,
    UpdateVelocityRequest,
};

const PAGE_SIZE: i32 = 10;

/// Remote operation requested by a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Generate,
    UpdateVelocity {
        sprint: PromptAnswer,
        points: PromptAnswer,
        feedback: Option<String>,
    },
    Export(ExportFormat),
    Clear(Confirmation),
}

/// Result of an operation that the user may back out of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Cancelled,
}

/// Leaves the loading state when dropped
struct LoadingGuard<'a> {
    state: &'a SharedState,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.finish_loading();
    }
}

/// View-state controller over a backlog service
#[derive(Clone)]
pub struct BacklogController {
    api: Arc<dyn BacklogApi>,
    state: SharedState,
    export_dir: PathBuf,
}

impl BacklogController {
    pub fn new(api: Arc<dyn BacklogApi>, state: SharedState, export_dir: PathBuf) -> Self {
        Self {
            api,
            state,
            export_dir,
        }
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn export_dir(&self) -> &std::path::Path {
        &self.export_dir
    }

    fn begin_operation(&self) -> Result<LoadingGuard<'_>, ControllerError> {
        if self.state.try_begin_loading() {
            Ok(LoadingGuard { state: &self.state })
        } else {
            tracing::warn!("Operation refused: another one is in progress");
            Err(ControllerError::Busy)
        }
    }

    /// Put a failure into the error banner
    fn report<T>(&self, result: Result<T, ControllerError>) -> Result<T, ControllerError> {
        if let Err(ref err) = result {
            if err.is_reported() {
                tracing::info!(error = %err, "Operation failed");
                self.state.set_error(err.user_message());
            }
        }
        result
    }

    // ========== Operations ==========

    /// Adopt the service's current backlog if there is one.
    ///
    /// Failures mean "no backlog yet" and are never shown.
    pub async fn initialize(&self) {
        let Ok(_guard) = self.begin_operation() else {
            return;
        };

        match self.api.current().await {
            Ok(backlog) if !backlog.is_empty() => {
                tracing::info!(stories = backlog.user_stories.len(), "Loaded existing backlog");
                self.state.replace_backlog(backlog);
                self.state.select_tab(ActiveTab::Backlog);
            }
            Ok(_) => tracing::debug!("Service has an empty backlog"),
            Err(e) => tracing::debug!(error = %e, "No previous backlog"),
        }
    }

    /// Generate a backlog from the form fields
    pub async fn generate_backlog(&self) -> Result<(), ControllerError> {
        let result = self.generate_inner().await;
        self.report(result)
    }

    async fn generate_inner(&self) -> Result<(), ControllerError> {
        let form = self.state.form();
        if form.requirements.trim().is_empty() {
            return Err(ControllerError::Validation(MSG_EMPTY_REQUIREMENTS.to_string()));
        }
        check_capacity(form.team_capacity)?;

        let request = GenerateBacklogRequest {
            requirements: form.requirements.clone(),
            team_capacity: form.team_capacity,
            additional_context: non_blank(&form.additional_context),
            priority_guidance: non_blank(&form.priority_guidance),
        };

        let _guard = self.begin_operation()?;
        let backlog = self
            .api
            .generate(&request)
            .await
            .map_err(ControllerError::remote(Action::Generate))?;

        tracing::info!(
            stories = backlog.user_stories.len(),
            sprints = backlog.sprints.len(),
            "Backlog generated"
        );
        self.state.replace_backlog(backlog);
        self.state.select_tab(ActiveTab::Backlog);
        self.state.edit_form(|f| f.clear_submitted());
        self.state.set_requirements_flagged(false);
        self.state.set_success("¡Backlog generado exitosamente!");
        Ok(())
    }

    /// Record completed points for a sprint
    pub async fn update_velocity(
        &self,
        sprint: PromptAnswer,
        points: PromptAnswer,
        feedback: Option<String>,
    ) -> Result<Outcome, ControllerError> {
        let result = self.update_velocity_inner(sprint, points, feedback).await;
        self.report(result)
    }

    async fn update_velocity_inner(
        &self,
        sprint: PromptAnswer,
        points: PromptAnswer,
        feedback: Option<String>,
    ) -> Result<Outcome, ControllerError> {
        let (Some(sprint), Some(points)) = (sprint.value(), points.value()) else {
            tracing::debug!("Velocity update cancelled");
            return Ok(Outcome::Cancelled);
        };

        let backlog = self.state.backlog().ok_or(ControllerError::NoBacklog)?;
        let target = sprint
            .parse::<u32>()
            .ok()
            .and_then(|n| backlog.sprint(n))
            .ok_or(ControllerError::SprintNotFound)?;
        let completed_points = points
            .parse::<u32>()
            .map_err(|_| ControllerError::Validation(MSG_POINTS_NOT_INTEGER.to_string()))?;

        let request = UpdateVelocityRequest {
            sprint_number: target.number,
            completed_points,
            total_points: target.total_points,
            feedback: feedback.as_deref().and_then(non_blank),
        };

        let _guard = self.begin_operation()?;
        let updated = self
            .api
            .update_velocity(&request)
            .await
            .map_err(ControllerError::remote(Action::UpdateVelocity))?;

        let message = match updated.current_velocity {
            Some(v) => format!("Velocidad actualizada. Nueva velocidad promedio: {:.1} SP", v),
            None => "Velocidad actualizada".to_string(),
        };
        tracing::info!(sprint = request.sprint_number, completed_points, "Velocity updated");
        self.state.replace_backlog(updated);
        self.state.set_success(message);
        Ok(Outcome::Completed)
    }

    /// Download an export and save it into the export directory
    pub async fn export_backlog(&self, format: ExportFormat) -> Result<PathBuf, ControllerError> {
        let result = self.export_inner(format).await;
        self.report(result)
    }

    async fn export_inner(&self, format: ExportFormat) -> Result<PathBuf, ControllerError> {
        let _guard = self.begin_operation()?;
        let path = self
            .api
            .download(format, &self.export_dir)
            .await
            .map_err(ControllerError::remote(Action::Export))?;

        tracing::info!(%format, path = %path.display(), "Backlog exported");
        self.state
            .set_success(format!("Backlog exportado en formato {}", format));
        Ok(path)
    }

    /// Delete the backlog once the user confirmed
    pub async fn clear_backlog(&self, confirmation: Confirmation) -> Result<Outcome, ControllerError> {
        let result = self.clear_inner(confirmation).await;
        self.report(result)
    }

    async fn clear_inner(&self, confirmation: Confirmation) -> Result<Outcome, ControllerError> {
        if confirmation == Confirmation::Declined {
            return Ok(Outcome::Cancelled);
        }

        let _guard = self.begin_operation()?;
        let response = self
            .api
            .clear()
            .await
            .map_err(ControllerError::remote(Action::Clear))?;

        tracing::info!(message = %response.message, "Backlog cleared");
        self.state.clear_backlog();
        self.state.set_success("Backlog eliminado");
        Ok(Outcome::Completed)
    }

    /// Re-pack the existing stories into sprints
    pub async fn plan_sprints(
        &self,
        team_capacity: u32,
        num_sprints: Option<u32>,
    ) -> Result<(), ControllerError> {
        let result = self.plan_inner(team_capacity, num_sprints).await;
        self.report(result)
    }

    async fn plan_inner(&self, team_capacity: u32, num_sprints: Option<u32>) -> Result<(), ControllerError> {
        check_capacity(team_capacity)?;

        let _guard = self.begin_operation()?;
        let backlog = self
            .api
            .plan_sprints(&PlanSprintsRequest {
                team_capacity,
                num_sprints,
            })
            .await
            .map_err(ControllerError::remote(Action::PlanSprints))?;

        tracing::info!(sprints = backlog.sprints.len(), "Sprints planned");
        self.state.replace_backlog(backlog);
        self.state.set_success("Sprints replanificados");
        Ok(())
    }

    /// Service liveness; leaves the state untouched
    pub async fn health(&self) -> Result<HealthStatus, ControllerError> {
        self.api
            .health()
            .await
            .map_err(ControllerError::remote(Action::Health))
    }

    /// Run an operation produced by [`BacklogController::apply`].
    /// Errors are already in the banner at this point.
    pub async fn execute(&self, operation: Operation) {
        let result = match operation {
            Operation::Generate => self.generate_backlog().await.map(|_| ()),
            Operation::UpdateVelocity {
                sprint,
                points,
                feedback,
            } => self.update_velocity(sprint, points, feedback).await.map(|_| ()),
            Operation::Export(format) => self.export_backlog(format).await.map(|_| ()),
            Operation::Clear(confirmation) => self.clear_backlog(confirmation).await.map(|_| ()),
        };

        if let Err(e) = result {
            tracing::debug!(error = %e, "Operation finished with error");
        }
    }

    // ========== Commands ==========

    /// Apply a command to the state. Commands that need the backlog
    /// service come back as an [`Operation`] for the caller to run.
    pub fn apply(&self, command: Command) -> Option<Operation> {
        let state = &self.state;
        match command {
            Command::Quit => state.set_should_quit(true),
            Command::DismissAlerts => state.dismiss_alerts(),

            Command::SelectTab(tab) => {
                if !state.select_tab(tab) {
                    tracing::debug!(?tab, "Tab not available");
                }
            }
            Command::NextTab => state.cycle_tab(true),
            Command::PrevTab => state.cycle_tab(false),

            Command::FocusNextField => state.set_form_focus(state.form_focus().next()),
            Command::FocusPrevField => state.set_form_focus(state.form_focus().previous()),

            Command::InsertChar(c) => {
                if let Some(Dialog::Velocity(mut dialog)) = state.dialog() {
                    dialog.push(c);
                    state.set_dialog(Some(Dialog::Velocity(dialog)));
                } else {
                    self.edit_focused_text(|text| text.push(c));
                }
            }
            Command::DeleteCharBefore => {
                if let Some(Dialog::Velocity(mut dialog)) = state.dialog() {
                    dialog.backspace();
                    state.set_dialog(Some(Dialog::Velocity(dialog)));
                } else {
                    self.edit_focused_text(|text| {
                        text.pop();
                    });
                }
            }
            Command::InsertNewline => self.edit_focused_text(|text| text.push('\n')),
            Command::IncrementCapacity => state.edit_form(|f| f.increment_capacity()),
            Command::DecrementCapacity => state.edit_form(|f| f.decrement_capacity()),

            Command::SubmitForm => {
                if state.active_tab() == ActiveTab::Form {
                    state.set_requirements_flagged(false);
                    return Some(Operation::Generate);
                }
            }
            Command::FlagMissingRequirements => {
                state.set_requirements_flagged(true);
                state.set_form_focus(FormField::Requirements);
            }

            Command::Export(format) => return Some(Operation::Export(format)),
            Command::BeginVelocityUpdate => {
                state.set_dialog(Some(Dialog::Velocity(VelocityDialog::new())));
            }
            Command::BeginClear => state.set_dialog(Some(Dialog::ConfirmClear)),

            Command::DialogSubmit => match state.take_dialog() {
                Some(Dialog::Velocity(dialog)) => match dialog.submit() {
                    VelocityStep::Next(next) => state.set_dialog(Some(Dialog::Velocity(next))),
                    VelocityStep::Done { sprint, points } => {
                        return Some(Operation::UpdateVelocity {
                            sprint: PromptAnswer::Value(sprint),
                            points: PromptAnswer::Value(points),
                            feedback: None,
                        });
                    }
                    VelocityStep::Cancelled => return Some(velocity_cancelled()),
                },
                Some(Dialog::ConfirmClear) => {
                    return Some(Operation::Clear(Confirmation::Confirmed));
                }
                None => {}
            },
            Command::DialogCancel => match state.take_dialog() {
                Some(Dialog::Velocity(_)) => return Some(velocity_cancelled()),
                Some(Dialog::ConfirmClear) => {
                    return Some(Operation::Clear(Confirmation::Declined));
                }
                None => {}
            },

            Command::ScrollUp => state.scroll_by(-1),
            Command::ScrollDown => state.scroll_by(1),
            Command::PageUp => state.scroll_by(-PAGE_SIZE),
            Command::PageDown => state.scroll_by(PAGE_SIZE),
        }
        None
    }

    fn edit_focused_text(&self, edit: impl FnOnce(&mut String)) {
        if self.state.active_tab() != ActiveTab::Form {
            return;
        }
        let focus = self.state.form_focus();
        let edited = self.state.edit_form(|form| match form.text_mut(focus) {
            Some(text) => {
                edit(text);
                true
            }
            None => false,
        });
        if edited && focus == FormField::Requirements {
            self.state.set_requirements_flagged(false);
        }
    }
}

fn velocity_cancelled() -> Operation {
    Operation::UpdateVelocity {
        sprint: PromptAnswer::Cancelled,
        points: PromptAnswer::Cancelled,
        feedback: None,
    }
}

fn check_capacity(team_capacity: u32) -> Result<(), ControllerError> {
    if (MIN_TEAM_CAPACITY..=MAX_TEAM_CAPACITY).contains(&team_capacity) {
        Ok(())
    } else {
        Err(ControllerError::Validation(MSG_CAPACITY_RANGE.to_string()))
    }
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
