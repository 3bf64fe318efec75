//! CLI transport for direct terminal interaction
//!
//! One-shot commands run the same BacklogController as the TUI over a fresh
//! SharedState, so validation and messages are identical in both surfaces.

use anyhow::{Context, Result};
use colored::Colorize;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tabled::{settings::Style, Table, Tabled};

use crate::api::{Backlog, BacklogApi, ExportFormat, HttpBacklogClient};
use crate::config::Config;
use crate::tui::{EventHandler, Theme, TuiController, TuiRenderer};
use crate::ui_backend::{
    BacklogController, BacklogStats, Confirmation, FormFields, Outcome, PromptAnswer,
    SharedState, SprintMetrics,
};

/// Log file used while the TUI owns the terminal
pub const TUI_LOG_FILE: &str = "scrum-agent.log";

/// Open (append) the TUI log file in the config directory
pub fn open_tui_log() -> Result<std::fs::File> {
    let path = Config::config_dir()?.join(TUI_LOG_FILE);
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

fn build_api(config: &Config) -> Result<Arc<dyn BacklogApi>> {
    let client = HttpBacklogClient::with_timeout(
        &config.service.base_url,
        config.service.request_timeout(),
    )
    .context("Invalid backlog service URL")?;
    tracing::debug!(base_url = %client.base_url(), "Backlog service client ready");
    Ok(Arc::new(client))
}

fn build_controller(config: &Config, export_dir: Option<PathBuf>) -> Result<BacklogController> {
    let api = build_api(config)?;
    let state = SharedState::with_team_capacity(config.initial_team_capacity());
    let export_dir = export_dir.unwrap_or_else(|| config.export.directory.clone());
    Ok(BacklogController::new(api, state, export_dir))
}

/// Run the interactive terminal client
pub async fn run_tui(config: Config) -> Result<()> {
    if !crossterm::tty::IsTty::is_tty(&io::stdout()) {
        anyhow::bail!("The TUI requires a real terminal (TTY).");
    }

    let controller = build_controller(&config, None)?;

    enable_raw_mode().context("Failed to enable terminal raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal backend")?;

    let renderer = TuiRenderer::new(terminal)
        .with_theme(Theme::from_name(&config.tui.theme))
        .with_events(EventHandler::new(Duration::from_millis(config.tui.tick_rate_ms.max(10))))
        .with_service_url(config.service.base_url.clone());

    let mut tui = TuiController::new(controller, renderer);
    let result = tui.run().await;

    // Restore the terminal even when the loop failed
    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();
    crossterm::execute!(stdout, crossterm::cursor::Show).ok();

    result
}

/// Generate a backlog and print it
pub async fn run_generate(
    config: Config,
    requirements: String,
    team_capacity: Option<u32>,
    additional_context: Option<String>,
    priority_guidance: Option<String>,
    format: &str,
) -> Result<()> {
    let controller = build_controller(&config, None)?;
    let state = controller.state();

    state.set_form(FormFields {
        requirements,
        team_capacity: team_capacity.unwrap_or_else(|| config.initial_team_capacity()),
        additional_context: additional_context.unwrap_or_default(),
        priority_guidance: priority_guidance.unwrap_or_default(),
    });

    if format != "json" {
        println!("{}", "Procesando con IA...".yellow());
    }
    controller.generate_backlog().await?;

    let backlog = state.backlog().unwrap_or_default();
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&backlog)?);
    } else {
        print_success(state.success());
        print_backlog(&backlog);
    }
    Ok(())
}

/// Read requirements from a file (`-` for stdin)
pub fn read_requirements(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::Read::read_to_string(&mut io::stdin(), &mut text)
            .context("Failed to read requirements from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read requirements from {}", path.display()))
}

/// Print the current backlog
pub async fn run_show(config: Config, format: &str) -> Result<()> {
    let api = build_api(&config)?;
    let backlog = api.current().await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&backlog)?);
    } else if backlog.is_empty() {
        println!("{}", "No hay backlog generado todavía.".dimmed());
    } else {
        print_backlog(&backlog);
    }
    Ok(())
}

/// Record completed points for a sprint, prompting for missing values
pub async fn run_velocity(
    config: Config,
    sprint: Option<u32>,
    points: Option<u32>,
    feedback: Option<String>,
) -> Result<()> {
    let controller = build_controller(&config, None)?;
    controller.initialize().await;

    let sprint = match sprint {
        Some(n) => PromptAnswer::Value(n.to_string()),
        None => prompt("Número de sprint completado:")?,
    };
    // Nothing else is asked once the first answer was cancelled
    let points = match (points, sprint.is_cancelled()) {
        (_, true) => PromptAnswer::Cancelled,
        (Some(p), false) => PromptAnswer::Value(p.to_string()),
        (None, false) => prompt("Story points completados:")?,
    };

    match controller.update_velocity(sprint, points, feedback).await? {
        Outcome::Completed => print_success(controller.state().success()),
        Outcome::Cancelled => tracing::debug!("Velocity update cancelled by user"),
    }
    Ok(())
}

/// Export the backlog and print the saved path
pub async fn run_export(config: Config, format: &str, dir: Option<PathBuf>) -> Result<()> {
    let format: ExportFormat = format.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let controller = build_controller(&config, dir)?;

    let path = controller.export_backlog(format).await?;
    print_success(controller.state().success());
    println!("{}", path.display());
    Ok(())
}

/// Delete the backlog after confirmation
pub async fn run_clear(config: Config, yes: bool) -> Result<()> {
    let controller = build_controller(&config, None)?;

    let confirmation = if yes {
        Confirmation::Confirmed
    } else {
        confirm("¿Estás seguro de que deseas eliminar el backlog actual? [s/N]")?
    };

    match controller.clear_backlog(confirmation).await? {
        Outcome::Completed => print_success(controller.state().success()),
        Outcome::Cancelled => println!("{}", "Operación cancelada".dimmed()),
    }
    Ok(())
}

/// Re-pack the stories into sprints
pub async fn run_plan(config: Config, team_capacity: Option<u32>, sprints: Option<u32>) -> Result<()> {
    let controller = build_controller(&config, None)?;
    let capacity = team_capacity.unwrap_or_else(|| config.initial_team_capacity());

    controller.plan_sprints(capacity, sprints).await?;
    print_success(controller.state().success());
    if let Some(backlog) = controller.state().backlog() {
        print_sprints(&backlog);
    }
    Ok(())
}

/// Report whether the service answers
pub async fn run_status(config: Config) -> Result<()> {
    let controller = build_controller(&config, None)?;

    println!("{} {}", "Servicio:".bold(), config.service.base_url);
    match controller.health().await {
        Ok(health) => {
            println!("  Estado:  {}", format!("✅ {}", health.status).green());
            Ok(())
        }
        Err(e) => {
            println!("  Estado:  {}", "❌ Sin respuesta".red());
            Err(e.into())
        }
    }
}

// ========== Prompts ==========

fn read_answer(question: &str) -> Result<Option<String>> {
    print!("{} ", question.bold());
    io::stdout().flush()?;

    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    // EOF behaves like dismissing the prompt
    Ok((read > 0).then_some(line))
}

fn prompt(question: &str) -> Result<PromptAnswer> {
    Ok(match read_answer(question)? {
        Some(line) => PromptAnswer::from_input(&line),
        None => PromptAnswer::Cancelled,
    })
}

fn confirm(question: &str) -> Result<Confirmation> {
    Ok(match read_answer(question)? {
        Some(line) => Confirmation::from_input(&line),
        None => Confirmation::Declined,
    })
}

// ========== Output ==========

fn print_success(message: Option<String>) {
    if let Some(message) = message {
        println!("{} {}", "✓".green(), message.green());
    }
}

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Historias")]
    stories: usize,
    #[tabled(rename = "Story Points")]
    points: u32,
    #[tabled(rename = "Sprints")]
    sprints: usize,
    #[tabled(rename = "Velocidad")]
    velocity: String,
}

#[derive(Tabled)]
struct StoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Título")]
    title: String,
    #[tabled(rename = "Prioridad")]
    priority: String,
    #[tabled(rename = "SP")]
    points: u32,
    #[tabled(rename = "Sprint")]
    sprint: String,
}

#[derive(Tabled)]
struct SprintRow {
    #[tabled(rename = "Sprint")]
    name: String,
    #[tabled(rename = "Estado")]
    status: String,
    #[tabled(rename = "Capacidad")]
    capacity: u32,
    #[tabled(rename = "Asignado")]
    assigned: u32,
    #[tabled(rename = "Utilización")]
    utilization: String,
    #[tabled(rename = "Completado")]
    completed: String,
}

fn print_backlog(backlog: &Backlog) {
    let stats = BacklogStats::from_backlog(backlog);
    let mut table = Table::new(vec![StatRow {
        stories: stats.total_stories,
        points: stats.total_points,
        sprints: stats.total_sprints,
        velocity: stats.velocity_label(),
    }]);
    table.with(Style::rounded());
    println!("\n{}", "=== BACKLOG ===".bold().cyan());
    println!("{}", table);

    if !backlog.user_stories.is_empty() {
        let rows: Vec<StoryRow> = backlog
            .user_stories
            .iter()
            .map(|s| StoryRow {
                id: s.id.clone(),
                title: s.title.clone(),
                priority: s.priority.to_string(),
                points: s.story_points,
                sprint: s
                    .sprint_assigned
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("\n{}", "=== HISTORIAS DE USUARIO ===".bold().cyan());
        println!("{}", table);
    }

    print_sprints(backlog);
}

fn print_sprints(backlog: &Backlog) {
    if backlog.sprints.is_empty() {
        return;
    }

    let rows: Vec<SprintRow> = backlog
        .sprints
        .iter()
        .map(|sprint| {
            let metrics = SprintMetrics::for_sprint(sprint);
            let utilization = format!("{:.1}%", metrics.utilization);
            SprintRow {
                name: sprint.name.clone(),
                status: sprint.status.to_string(),
                capacity: sprint.capacity,
                assigned: sprint.total_points,
                utilization: if metrics.over_threshold {
                    utilization.red().to_string()
                } else {
                    utilization
                },
                completed: metrics
                    .completion
                    .map(|c| format!("{} SP ({:.1}%)", sprint.completed_points, c))
                    .unwrap_or_else(|| "-".to_string()),
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("\n{}", "=== SPRINTS ===".bold().cyan());
    println!("{}", table);

    if !backlog.velocity_history.is_empty() {
        let history: Vec<String> = backlog.velocity_history.iter().map(|p| p.to_string()).collect();
        println!(
            "{} {} SP",
            "Historial de velocidad:".dimmed(),
            history.join(" → ").green()
        );
    }
}
