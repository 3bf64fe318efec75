//! Wire schemas for the backlog service
//!
//! Every payload returned by the service is decoded into these types and
//! validated with [`Backlog::validate`] before it reaches the controller.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Business priority of a user story
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Alta,
    Media,
    Baja,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Alta => "Alta",
            Priority::Media => "Media",
            Priority::Baja => "Baja",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Technical subtask of a user story
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubTask {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    #[serde(default = "default_subtask_status")]
    pub status: String,
}

fn default_subtask_status() -> String {
    "Pendiente".to_string()
}

/// Test case attached to a user story
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub preconditions: Option<String>,
    #[serde(default)]
    pub steps: Vec<String>,
    pub expected_result: String,
    #[serde(default = "default_test_type")]
    pub test_type: String,
}

fn default_test_type() -> String {
    "functional".to_string()
}

/// A user story as produced by the generation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStory {
    pub id: String,
    pub title: String,
    pub gherkin: String,
    #[serde(default)]
    pub acceptance_criteria: Vec<String>,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
    pub story_points: u32,
    pub priority: Priority,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub subtasks: Vec<SubTask>,
    #[serde(default)]
    pub sprint_assigned: Option<u32>,
    #[serde(default = "default_story_status")]
    pub status: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_story_status() -> String {
    "Backlog".to_string()
}

/// Sprint status token
///
/// The service sends free-form strings; only `Completado` switches the
/// sprint card into its completed rendering.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SprintStatus {
    #[default]
    Planned,
    Completed,
    Other(String),
}

impl SprintStatus {
    pub const PLANNED_TOKEN: &'static str = "Planificado";
    pub const COMPLETED_TOKEN: &'static str = "Completado";

    pub fn is_completed(&self) -> bool {
        matches!(self, SprintStatus::Completed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            SprintStatus::Planned => Self::PLANNED_TOKEN,
            SprintStatus::Completed => Self::COMPLETED_TOKEN,
            SprintStatus::Other(token) => token,
        }
    }
}

impl From<String> for SprintStatus {
    fn from(token: String) -> Self {
        match token.as_str() {
            Self::PLANNED_TOKEN => SprintStatus::Planned,
            Self::COMPLETED_TOKEN => SprintStatus::Completed,
            _ => SprintStatus::Other(token),
        }
    }
}

impl From<SprintStatus> for String {
    fn from(status: SprintStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for SprintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A planned sprint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprint {
    pub number: u32,
    pub name: String,
    pub capacity: u32,
    #[serde(default)]
    pub user_stories: Vec<String>,
    #[serde(default)]
    pub total_points: u32,
    #[serde(default)]
    pub completed_points: u32,
    #[serde(default)]
    pub status: SprintStatus,
    #[serde(default)]
    pub start_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub end_date: Option<NaiveDateTime>,
}

/// The whole product backlog, always exchanged wholesale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backlog {
    #[serde(default)]
    pub user_stories: Vec<UserStory>,
    #[serde(default)]
    pub sprints: Vec<Sprint>,
    #[serde(default = "default_team_capacity")]
    pub team_capacity: u32,
    #[serde(default)]
    pub velocity_history: Vec<u32>,
    #[serde(default)]
    pub current_velocity: Option<f64>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

pub const DEFAULT_TEAM_CAPACITY: u32 = 9;

fn default_team_capacity() -> u32 {
    DEFAULT_TEAM_CAPACITY
}

impl Default for Backlog {
    fn default() -> Self {
        Self {
            user_stories: Vec::new(),
            sprints: Vec::new(),
            team_capacity: DEFAULT_TEAM_CAPACITY,
            velocity_history: Vec::new(),
            current_velocity: None,
            created_at: None,
            updated_at: None,
        }
    }
}

impl Backlog {
    /// Look up a story by id
    pub fn story(&self, id: &str) -> Option<&UserStory> {
        self.user_stories.iter().find(|s| s.id == id)
    }

    /// Look up a sprint by exact number
    pub fn sprint(&self, number: u32) -> Option<&Sprint> {
        self.sprints.iter().find(|s| s.number == number)
    }

    pub fn is_empty(&self) -> bool {
        self.user_stories.is_empty()
    }

    /// Structural checks applied at the API boundary.
    ///
    /// Dangling story/sprint references are tolerated here; renderers skip them.
    pub fn validate(&self) -> Result<(), String> {
        if self.team_capacity == 0 {
            return Err("team_capacity must be positive".to_string());
        }

        let mut ids = HashSet::new();
        for story in &self.user_stories {
            if story.id.trim().is_empty() {
                return Err("user story with empty id".to_string());
            }
            if !ids.insert(story.id.as_str()) {
                return Err(format!("duplicate user story id {}", story.id));
            }
            if story.story_points == 0 {
                return Err(format!("user story {} has zero story points", story.id));
            }
        }

        let mut numbers = HashSet::new();
        for sprint in &self.sprints {
            if sprint.number == 0 {
                return Err(format!("sprint '{}' has number 0", sprint.name));
            }
            if !numbers.insert(sprint.number) {
                return Err(format!("duplicate sprint number {}", sprint.number));
            }
            if sprint.capacity == 0 {
                return Err(format!("sprint {} has zero capacity", sprint.number));
            }
        }

        Ok(())
    }
}

/// Body of `POST /generate-backlog`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateBacklogRequest {
    pub requirements: String,
    pub team_capacity: u32,
    pub additional_context: Option<String>,
    pub priority_guidance: Option<String>,
}

/// Body of `POST /plan-sprints`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSprintsRequest {
    pub team_capacity: u32,
    pub num_sprints: Option<u32>,
}

/// Body of `POST /update-velocity`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateVelocityRequest {
    pub sprint_number: u32,
    pub completed_points: u32,
    pub total_points: u32,
    pub feedback: Option<String>,
}

/// Response of `DELETE /backlog`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClearResponse {
    #[serde(default)]
    pub message: String,
}

/// Response of `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Markdown,
    Csv,
    Json,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Markdown, ExportFormat::Csv, ExportFormat::Json];

    /// Path segment used by the service
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "markdown",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    /// File extension of the saved export
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            other => other.as_str(),
        }
    }

    /// Media type the service answers with
    pub fn media_type(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "text/markdown",
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unsupported export format: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(id: &str, points: u32) -> UserStory {
        UserStory {
            id: id.to_string(),
            title: format!("Story {}", id),
            gherkin: "Como usuario quiero algo para obtener valor".to_string(),
            acceptance_criteria: vec![],
            test_cases: vec![],
            story_points: points,
            priority: Priority::Media,
            dependencies: vec![],
            subtasks: vec![],
            sprint_assigned: None,
            status: "Backlog".to_string(),
            tags: vec![],
        }
    }

    #[test]
    fn test_decode_service_payload_with_defaults() {
        let payload = r#"{
            "user_stories": [{
                "id": "HU1",
                "title": "Registro",
                "gherkin": "Como visitante quiero registrarme",
                "acceptance_criteria": ["El correo es obligatorio"],
                "story_points": 5,
                "priority": "Alta",
                "subtasks": [{"id": "HU1-ST1", "title": "Formulario", "estimated_hours": 4.5}],
                "sprint_assigned": 1
            }],
            "sprints": [{
                "number": 1,
                "name": "Sprint 1",
                "capacity": 9,
                "user_stories": ["HU1"],
                "total_points": 5,
                "status": "Planificado"
            }],
            "team_capacity": 9,
            "current_velocity": null,
            "created_at": "2024-05-01T10:15:30.123456"
        }"#;

        let backlog: Backlog = serde_json::from_str(payload).unwrap();
        assert_eq!(backlog.user_stories.len(), 1);
        let hu = &backlog.user_stories[0];
        assert_eq!(hu.priority, Priority::Alta);
        assert_eq!(hu.status, "Backlog");
        assert_eq!(hu.subtasks[0].status, "Pendiente");
        assert_eq!(hu.subtasks[0].estimated_hours, Some(4.5));
        assert_eq!(backlog.sprints[0].status, SprintStatus::Planned);
        assert_eq!(backlog.sprints[0].completed_points, 0);
        assert!(backlog.created_at.is_some());
        assert!(backlog.validate().is_ok());
    }

    #[test]
    fn test_unknown_priority_is_rejected() {
        let payload = r#"{"id":"HU1","title":"t","gherkin":"g","story_points":3,"priority":"Urgente"}"#;
        assert!(serde_json::from_str::<UserStory>(payload).is_err());
    }

    #[test]
    fn test_sprint_status_tokens() {
        assert!(SprintStatus::from("Completado".to_string()).is_completed());
        assert!(!SprintStatus::from("completado".to_string()).is_completed());
        assert_eq!(
            SprintStatus::from("En curso".to_string()),
            SprintStatus::Other("En curso".to_string())
        );
        let json = serde_json::to_string(&SprintStatus::Completed).unwrap();
        assert_eq!(json, "\"Completado\"");
    }

    #[test]
    fn test_validate_rejects_duplicate_story_ids() {
        let backlog = Backlog {
            user_stories: vec![story("HU1", 3), story("HU1", 5)],
            ..Backlog::default()
        };
        assert!(backlog.validate().unwrap_err().contains("duplicate"));
    }

    #[test]
    fn test_validate_rejects_zero_points_and_capacity() {
        let backlog = Backlog {
            user_stories: vec![story("HU1", 0)],
            ..Backlog::default()
        };
        assert!(backlog.validate().is_err());

        let backlog = Backlog {
            team_capacity: 0,
            ..Backlog::default()
        };
        assert!(backlog.validate().is_err());
    }

    #[test]
    fn test_validate_tolerates_dangling_references() {
        let mut hu = story("HU1", 3);
        hu.dependencies = vec!["HU99".to_string()];
        hu.sprint_assigned = Some(7);
        let backlog = Backlog {
            user_stories: vec![hu],
            sprints: vec![Sprint {
                number: 1,
                name: "Sprint 1".to_string(),
                capacity: 9,
                user_stories: vec!["HU1".to_string(), "HU42".to_string()],
                total_points: 3,
                completed_points: 0,
                status: SprintStatus::Planned,
                start_date: None,
                end_date: None,
            }],
            ..Backlog::default()
        };
        assert!(backlog.validate().is_ok());
    }

    #[test]
    fn test_export_format_extension() {
        assert_eq!(ExportFormat::Markdown.extension(), "md");
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Json.extension(), "json");
        assert_eq!("MD".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert!("xlsx".parse::<ExportFormat>().is_err());
    }
}
