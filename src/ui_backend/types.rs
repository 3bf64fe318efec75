//! View models derived from the backlog document
//!
//! Everything here is recomputed from a [`Backlog`] on demand and never
//! stored next to it.

use crate::api::{Backlog, Sprint, UserStory};

/// Utilization above this percentage is shown as a warning
pub const UTILIZATION_WARNING_THRESHOLD: f64 = 90.0;

/// Summary figures shown above the backlog
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BacklogStats {
    pub total_stories: usize,
    pub total_points: u32,
    pub total_sprints: usize,
    pub velocity: Option<f64>,
}

impl BacklogStats {
    pub fn from_backlog(backlog: &Backlog) -> Self {
        Self {
            total_stories: backlog.user_stories.len(),
            total_points: backlog.user_stories.iter().map(|s| s.story_points).sum(),
            total_sprints: backlog.sprints.len(),
            velocity: backlog.current_velocity,
        }
    }

    /// Velocity with one decimal, `-` when not yet known
    pub fn velocity_label(&self) -> String {
        match self.velocity {
            Some(v) => format!("{:.1}", v),
            None => "-".to_string(),
        }
    }
}

/// Percentages shown on a sprint card
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SprintMetrics {
    /// `total_points / capacity * 100`
    pub utilization: f64,
    /// `completed_points / total_points * 100`, only once points were recorded
    pub completion: Option<f64>,
    /// Bar fill, 0-100
    pub progress: f64,
    pub over_threshold: bool,
}

impl SprintMetrics {
    pub fn for_sprint(sprint: &Sprint) -> Self {
        let utilization = percentage(sprint.total_points, sprint.capacity);
        let completion = if sprint.completed_points > 0 && sprint.total_points > 0 {
            Some(percentage(sprint.completed_points, sprint.total_points))
        } else {
            None
        };
        let progress = if sprint.status.is_completed() {
            completion.unwrap_or(0.0)
        } else {
            utilization
        };

        Self {
            utilization,
            completion,
            progress: progress.clamp(0.0, 100.0),
            over_threshold: utilization > UTILIZATION_WARNING_THRESHOLD,
        }
    }
}

fn percentage(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Stories listed in a sprint, in sprint order; unknown ids are skipped
pub fn resolve_sprint_stories<'a>(backlog: &'a Backlog, sprint: &Sprint) -> Vec<&'a UserStory> {
    sprint
        .user_stories
        .iter()
        .filter_map(|id| {
            let story = backlog.story(id);
            if story.is_none() {
                tracing::debug!(sprint = sprint.number, story = %id, "Skipping unknown story id");
            }
            story
        })
        .collect()
}
