//! TUI Controller - Orchestrates BacklogController and TuiRenderer
//!
//! The controller owns both the business logic (BacklogController) and the UI
//! (TuiRenderer). Remote operations run on their own task so the screen keeps
//! drawing the loading state while they are in flight.

use anyhow::Result;
use ratatui::backend::Backend;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::ui_backend::UiRenderer;
use crate::ui_backend::{BacklogController, Command, CommandPipeline};

use super::renderer::TuiRenderer;

/// TUI Controller
///
/// Main event loop coordinator that:
/// 1. Renders UI with current state
/// 2. Polls input from renderer
/// 3. Runs commands through the middleware pipeline
/// 4. Hands remote operations to a background task
pub struct TuiController<B: Backend> {
    /// Business logic
    controller: BacklogController,
    /// UI renderer
    renderer: TuiRenderer<B>,
    /// Middlewares run before each command
    pipeline: CommandPipeline,
}

impl<B: Backend> TuiController<B> {
    /// Create a new TUI controller
    pub fn new(controller: BacklogController, renderer: TuiRenderer<B>) -> Self {
        Self {
            controller,
            renderer,
            pipeline: CommandPipeline::standard(),
        }
    }

    pub fn with_pipeline(mut self, pipeline: CommandPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn controller(&self) -> &BacklogController {
        &self.controller
    }

    pub fn renderer(&self) -> &TuiRenderer<B> {
        &self.renderer
    }

    /// Draw one frame of the current state
    pub fn render(&mut self) -> Result<()> {
        let state = self.controller.state().clone();
        self.renderer.render(&state)
    }

    /// Run the main event loop
    pub async fn run(&mut self) -> Result<()> {
        let state = self.controller.state().clone();

        // Adopt any backlog the service already holds
        let init = self.controller.clone();
        tokio::spawn(async move { init.initialize().await });

        loop {
            // 1. Render current state
            self.renderer.render(&state)?;

            // 2. Poll for user input (waits up to one tick)
            if let Some(command) = self.renderer.poll_command(&state)? {
                self.dispatch(command);
            }

            // 3. Check quit condition
            if state.should_quit() {
                break;
            }

            // Let spawned operations make progress between frames
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        tracing::info!("TUI loop finished");
        Ok(())
    }

    /// Apply one command. When it starts a remote operation the task
    /// handle is returned; the loop itself never waits on it.
    pub fn dispatch(&mut self, command: Command) -> Option<JoinHandle<()>> {
        let command = self.pipeline.process(command, self.controller.state())?;
        let operation = self.controller.apply(command)?;

        let controller = self.controller.clone();
        Some(tokio::spawn(async move {
            controller.execute(operation).await;
        }))
    }
}
