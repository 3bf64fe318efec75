//! Interactive prompts as plain state
//!
//! A prompt never blocks: the frontend collects the text, then hands the
//! controller a [`PromptAnswer`] or [`Confirmation`].

/// Answer to a free-text prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAnswer {
    Value(String),
    Cancelled,
}

impl PromptAnswer {
    /// An empty or whitespace-only answer counts as cancelling the prompt
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            PromptAnswer::Cancelled
        } else {
            PromptAnswer::Value(trimmed.to_string())
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            PromptAnswer::Value(v) => Some(v),
            PromptAnswer::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, PromptAnswer::Cancelled)
    }
}

impl From<Option<String>> for PromptAnswer {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(v) => PromptAnswer::from_input(&v),
            None => PromptAnswer::Cancelled,
        }
    }
}

/// Answer to a yes/no question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl Confirmation {
    /// `s`, `si`, `sí`, `y` and `yes` confirm; anything else declines
    pub fn from_input(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "s" | "si" | "sí" | "y" | "yes" => Confirmation::Confirmed,
            _ => Confirmation::Declined,
        }
    }
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Confirmation::Confirmed
        } else {
            Confirmation::Declined
        }
    }
}

/// Which question the velocity dialog is asking
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VelocityStage {
    SprintNumber,
    CompletedPoints { sprint: String },
}

/// Two-step velocity dialog: sprint number, then completed points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VelocityDialog {
    pub stage: VelocityStage,
    pub input: String,
}

/// Outcome of submitting the current velocity question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VelocityStep {
    /// Ask the next question
    Next(VelocityDialog),
    /// Both answers collected
    Done { sprint: String, points: String },
    Cancelled,
}

impl VelocityDialog {
    pub fn new() -> Self {
        Self {
            stage: VelocityStage::SprintNumber,
            input: String::new(),
        }
    }

    pub fn question(&self) -> &'static str {
        match self.stage {
            VelocityStage::SprintNumber => "Número de sprint completado:",
            VelocityStage::CompletedPoints { .. } => "Story points completados:",
        }
    }

    pub fn push(&mut self, c: char) {
        if !c.is_control() {
            self.input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Submit the current answer
    pub fn submit(self) -> VelocityStep {
        let answer = match PromptAnswer::from_input(&self.input) {
            PromptAnswer::Value(v) => v,
            PromptAnswer::Cancelled => return VelocityStep::Cancelled,
        };

        match self.stage {
            VelocityStage::SprintNumber => VelocityStep::Next(VelocityDialog {
                stage: VelocityStage::CompletedPoints { sprint: answer },
                input: String::new(),
            }),
            VelocityStage::CompletedPoints { sprint } => VelocityStep::Done {
                sprint,
                points: answer,
            },
        }
    }
}

impl Default for VelocityDialog {
    fn default() -> Self {
        Self::new()
    }
}
