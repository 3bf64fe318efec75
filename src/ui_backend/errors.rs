//! Typed errors for the backlog controller
//!
//! `Display` of every variant is exactly the banner text shown to the user.

use thiserror::Error;

use crate::api::ApiError;

pub const MSG_EMPTY_REQUIREMENTS: &str = "Por favor ingresa los requisitos";
pub const MSG_CAPACITY_RANGE: &str = "La capacidad del equipo debe estar entre 1 y 100";
pub const MSG_POINTS_NOT_INTEGER: &str = "Los story points completados deben ser un número entero";

/// Remote operation that failed, used as the banner prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Load,
    Generate,
    PlanSprints,
    UpdateVelocity,
    Export,
    Clear,
    Health,
}

impl Action {
    pub fn prefix(&self) -> &'static str {
        match self {
            Action::Load => "Error al cargar backlog",
            Action::Generate => "Error al generar backlog",
            Action::PlanSprints => "Error al planificar sprints",
            Action::UpdateVelocity => "Error al actualizar velocidad",
            Action::Export => "Error al exportar",
            Action::Clear => "Error al eliminar backlog",
            Action::Health => "Error al consultar el servicio",
        }
    }
}

/// Errors from BacklogController
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Local input check failed; no request was sent
    #[error("{0}")]
    Validation(String),

    #[error("Sprint no encontrado")]
    SprintNotFound,

    #[error("No hay backlog cargado")]
    NoBacklog,

    /// Another operation is still in flight
    #[error("Ya hay una operación en curso")]
    Busy,

    #[error("{}: {}", .action.prefix(), .source)]
    Remote {
        action: Action,
        #[source]
        source: ApiError,
    },
}

impl ControllerError {
    pub fn remote(action: Action) -> impl FnOnce(ApiError) -> Self {
        move |source| ControllerError::Remote { action, source }
    }

    /// Banner text for this error
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Whether the error is reported in the banner
    pub fn is_reported(&self) -> bool {
        !matches!(self, ControllerError::Busy)
    }
}
