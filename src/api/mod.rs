//! Backlog service client
//!
//! One method per remote operation. Implementations are stateless between
//! calls; every successful call that yields a backlog yields the whole
//! document, already validated.

mod client;
pub mod error;
pub mod export;
pub mod types;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub use client::{HttpBacklogClient, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use types::{
    Backlog, ClearResponse, ExportFormat, GenerateBacklogRequest, HealthStatus,
    PlanSprintsRequest, Priority, Sprint, SprintStatus, SubTask, TestCase,
    UpdateVelocityRequest, UserStory,
};

/// Remote backlog service operations
#[async_trait]
pub trait BacklogApi: Send + Sync {
    /// Generate a new backlog from natural-language requirements
    async fn generate(&self, request: &GenerateBacklogRequest) -> Result<Backlog, ApiError>;

    /// Fetch the current backlog (empty when none exists yet)
    async fn current(&self) -> Result<Backlog, ApiError>;

    /// Re-pack the existing stories into sprints
    async fn plan_sprints(&self, request: &PlanSprintsRequest) -> Result<Backlog, ApiError>;

    /// Record a completed sprint and recompute velocity
    async fn update_velocity(&self, request: &UpdateVelocityRequest) -> Result<Backlog, ApiError>;

    /// Raw export body in the requested format
    async fn export(&self, format: ExportFormat) -> Result<Vec<u8>, ApiError>;

    /// Delete the current backlog
    async fn clear(&self) -> Result<ClearResponse, ApiError>;

    /// Service liveness
    async fn health(&self) -> Result<HealthStatus, ApiError>;

    /// Export and save the body locally, returning the saved path
    async fn download(&self, format: ExportFormat, dir: &Path) -> Result<PathBuf, ApiError> {
        let body = self.export(format).await?;
        export::save_export(dir, format, &body)
    }
}
