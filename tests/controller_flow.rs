//! BacklogController flow tests
//!
//! Drive the controller (directly and through the TUI command path) against
//! an in-memory backlog service that counts every call.
//!
//! Run: cargo test --test controller_flow

use async_trait::async_trait;
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use scrum_agent::api::{
    ApiError, Backlog, BacklogApi, ClearResponse, ExportFormat, GenerateBacklogRequest,
    HealthStatus, PlanSprintsRequest, Priority, Sprint, SprintStatus, UpdateVelocityRequest,
    UserStory,
};
use scrum_agent::tui::{TuiController, TuiRenderer};
use scrum_agent::ui_backend::{
    ActiveTab, BacklogController, BacklogStats, Command, Confirmation, FormFields, Outcome,
    PromptAnswer, SharedState,
};

// ============================================================================
// FAKE SERVICE
// ============================================================================

#[derive(Default)]
struct FakeService {
    backlog: Mutex<Option<Backlog>>,
    fail_with: Mutex<Option<String>>,
    generate_calls: AtomicUsize,
    velocity_calls: AtomicUsize,
    export_calls: AtomicUsize,
    clear_calls: AtomicUsize,
    plan_calls: AtomicUsize,
    last_generate: Mutex<Option<GenerateBacklogRequest>>,
    last_velocity: Mutex<Option<UpdateVelocityRequest>>,
}

impl FakeService {
    fn with_backlog(backlog: Backlog) -> Self {
        let service = Self::default();
        *service.backlog.lock().unwrap() = Some(backlog);
        service
    }

    fn fail_with(&self, detail: &str) {
        *self.fail_with.lock().unwrap() = Some(detail.to_string());
    }

    fn check_failure(&self) -> Result<(), ApiError> {
        match self.fail_with.lock().unwrap().clone() {
            Some(detail) => Err(ApiError::Service {
                status: 500,
                detail: Some(detail),
            }),
            None => Ok(()),
        }
    }

    fn network_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
            + self.velocity_calls.load(Ordering::SeqCst)
            + self.export_calls.load(Ordering::SeqCst)
            + self.clear_calls.load(Ordering::SeqCst)
            + self.plan_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BacklogApi for FakeService {
    async fn generate(&self, request: &GenerateBacklogRequest) -> Result<Backlog, ApiError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_generate.lock().unwrap() = Some(request.clone());
        self.check_failure()?;
        let mut backlog = sample_backlog();
        backlog.team_capacity = request.team_capacity;
        *self.backlog.lock().unwrap() = Some(backlog.clone());
        Ok(backlog)
    }

    async fn current(&self) -> Result<Backlog, ApiError> {
        self.backlog.lock().unwrap().clone().ok_or(ApiError::Service {
            status: 404,
            detail: Some("No hay backlog".to_string()),
        })
    }

    async fn plan_sprints(&self, request: &PlanSprintsRequest) -> Result<Backlog, ApiError> {
        self.plan_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        let mut backlog = self.current().await?;
        backlog.team_capacity = request.team_capacity;
        Ok(backlog)
    }

    async fn update_velocity(&self, request: &UpdateVelocityRequest) -> Result<Backlog, ApiError> {
        self.velocity_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_velocity.lock().unwrap() = Some(request.clone());
        self.check_failure()?;
        let mut backlog = self.current().await?;
        for sprint in &mut backlog.sprints {
            if sprint.number == request.sprint_number {
                sprint.completed_points = request.completed_points;
                sprint.status = SprintStatus::Completed;
            }
        }
        backlog.velocity_history.push(request.completed_points);
        backlog.current_velocity = Some(request.completed_points as f64);
        *self.backlog.lock().unwrap() = Some(backlog.clone());
        Ok(backlog)
    }

    async fn export(&self, format: ExportFormat) -> Result<Vec<u8>, ApiError> {
        self.export_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(format!("export {}", format).into_bytes())
    }

    async fn clear(&self) -> Result<ClearResponse, ApiError> {
        self.clear_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        *self.backlog.lock().unwrap() = None;
        Ok(ClearResponse {
            message: "Backlog eliminado".to_string(),
        })
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        Ok(HealthStatus {
            status: "healthy".to_string(),
        })
    }
}

fn story(id: &str, points: u32, sprint: u32) -> UserStory {
    UserStory {
        id: id.to_string(),
        title: format!("Historia {}", id),
        gherkin: "Scenario: ejemplo".to_string(),
        acceptance_criteria: vec![],
        test_cases: vec![],
        story_points: points,
        priority: Priority::Alta,
        dependencies: vec![],
        subtasks: vec![],
        sprint_assigned: Some(sprint),
        status: "Backlog".to_string(),
        tags: vec![],
    }
}

fn sample_backlog() -> Backlog {
    Backlog {
        user_stories: vec![story("HU1", 3, 1), story("HU2", 5, 1), story("HU3", 2, 2)],
        sprints: vec![
            Sprint {
                number: 1,
                name: "Sprint 1".to_string(),
                capacity: 9,
                user_stories: vec!["HU1".to_string(), "HU2".to_string()],
                total_points: 8,
                completed_points: 0,
                status: SprintStatus::Planned,
                start_date: None,
                end_date: None,
            },
            Sprint {
                number: 2,
                name: "Sprint 2".to_string(),
                capacity: 9,
                user_stories: vec!["HU3".to_string()],
                total_points: 2,
                completed_points: 0,
                status: SprintStatus::Planned,
                start_date: None,
                end_date: None,
            },
        ],
        team_capacity: 9,
        ..Backlog::default()
    }
}

fn controller_for(service: Arc<FakeService>, export_dir: &Path) -> BacklogController {
    BacklogController::new(service, SharedState::new(), export_dir.to_path_buf())
}

fn fill_form(state: &SharedState, requirements: &str, capacity: u32) {
    state.set_form(FormFields {
        requirements: requirements.to_string(),
        team_capacity: capacity,
        additional_context: "Aplicación móvil".to_string(),
        priority_guidance: String::new(),
    });
}

// ============================================================================
// INITIALIZE
// ============================================================================

#[tokio::test]
async fn test_initialize_adopts_existing_backlog() {
    let dir = tempfile::TempDir::new().unwrap();
    let service = Arc::new(FakeService::with_backlog(sample_backlog()));
    let controller = controller_for(service, dir.path());

    controller.initialize().await;

    let state = controller.state();
    assert!(state.has_backlog());
    assert_eq!(state.active_tab(), ActiveTab::Backlog);
    assert!(!state.loading());
}

#[tokio::test]
async fn test_initialize_without_backlog_stays_on_form_silently() {
    let dir = tempfile::TempDir::new().unwrap();
    let service = Arc::new(FakeService::default());
    let controller = controller_for(service, dir.path());

    controller.initialize().await;

    let state = controller.state();
    assert!(!state.has_backlog());
    assert_eq!(state.active_tab(), ActiveTab::Form);
    assert!(state.error().is_none());
}

#[tokio::test]
async fn test_initialize_ignores_backlog_without_stories() {
    let dir = tempfile::TempDir::new().unwrap();
    let service = Arc::new(FakeService::with_backlog(Backlog::default()));
    let controller = controller_for(service, dir.path());

    controller.initialize().await;

    assert!(!controller.state().has_backlog());
    assert_eq!(controller.state().active_tab(), ActiveTab::Form);
}

// ============================================================================
// GENERATE
// ============================================================================

#[tokio::test]
async fn test_generate_success_switches_tab_and_clears_fields() {
    let dir = tempfile::TempDir::new().unwrap();
    let service = Arc::new(FakeService::default());
    let controller = controller_for(service.clone(), dir.path());
    let state = controller.state();
    fill_form(state, "Como usuario quiero registrarme", 13);

    controller.generate_backlog().await.unwrap();

    assert_eq!(state.active_tab(), ActiveTab::Backlog);
    assert!(state.has_backlog());
    assert_eq!(state.success().as_deref(), Some("¡Backlog generado exitosamente!"));
    assert!(state.error().is_none());
    assert!(!state.loading());

    let form = state.form();
    assert!(form.requirements.is_empty());
    assert!(form.additional_context.is_empty());
    assert_eq!(form.team_capacity, 13);

    let request = service.last_generate.lock().unwrap().clone().unwrap();
    assert_eq!(request.team_capacity, 13);
    assert_eq!(request.additional_context.as_deref(), Some("Aplicación móvil"));
    assert_eq!(request.priority_guidance, None);
}

#[tokio::test]
async fn test_generate_with_blank_requirements_never_calls_service() {
    let dir = tempfile::TempDir::new().unwrap();
    let service = Arc::new(FakeService::default());
    let controller = controller_for(service.clone(), dir.path());

    for blank in ["", "   ", "\n\t"] {
        fill_form(controller.state(), blank, 9);
        assert!(controller.generate_backlog().await.is_err());
        assert_eq!(
            controller.state().error().as_deref(),
            Some("Por favor ingresa los requisitos")
        );
        assert!(!controller.state().loading());
    }

    assert_eq!(service.network_calls(), 0);
}

#[tokio::test]
async fn test_generate_rejects_capacity_out_of_range() {
    let dir = tempfile::TempDir::new().unwrap();
    let service = Arc::new(FakeService::default());
    let controller = controller_for(service.clone(), dir.path());

    fill_form(controller.state(), "Requisitos", 0);
    assert!(controller.generate_backlog().await.is_err());
    fill_form(controller.state(), "Requisitos", 101);
    assert!(controller.generate_backlog().await.is_err());

    assert_eq!(
        controller.state().error().as_deref(),
        Some("La capacidad del equipo debe estar entre 1 y 100")
    );
    assert_eq!(service.network_calls(), 0);
}

#[tokio::test]
async fn test_generate_failure_shows_service_detail() {
    let dir = tempfile::TempDir::new().unwrap();
    let service = Arc::new(FakeService::default());
    service.fail_with("Modelo no disponible");
    let controller = controller_for(service, dir.path());
    fill_form(controller.state(), "Requisitos", 9);

    assert!(controller.generate_backlog().await.is_err());

    let state = controller.state();
    assert_eq!(
        state.error().as_deref(),
        Some("Error al generar backlog: Modelo no disponible")
    );
    assert!(!state.loading());
    assert!(!state.has_backlog());
    assert_eq!(state.active_tab(), ActiveTab::Form);
    assert_eq!(state.form().requirements, "Requisitos");
}

// ============================================================================
// UPDATE VELOCITY
// ============================================================================

async fn loaded(service: Arc<FakeService>, dir: &Path) -> BacklogController {
    let controller = controller_for(service, dir);
    controller.initialize().await;
    controller
}

#[tokio::test]
async fn test_velocity_unknown_sprint_makes_no_call() {
    let dir = tempfile::TempDir::new().unwrap();
    let service = Arc::new(FakeService::with_backlog(sample_backlog()));
    let controller = loaded(service.clone(), dir.path()).await;

    for sprint in ["7", "uno"] {
        let result = controller
            .update_velocity(
                PromptAnswer::Value(sprint.to_string()),
                PromptAnswer::Value("5".to_string()),
                None,
            )
            .await;
        assert!(result.is_err());
        assert_eq!(controller.state().error().as_deref(), Some("Sprint no encontrado"));
    }

    assert_eq!(service.velocity_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_velocity_non_integer_points_makes_no_call() {
    let dir = tempfile::TempDir::new().unwrap();
    let service = Arc::new(FakeService::with_backlog(sample_backlog()));
    let controller = loaded(service.clone(), dir.path()).await;

    let result = controller
        .update_velocity(
            PromptAnswer::Value("1".to_string()),
            PromptAnswer::Value("7.5".to_string()),
            None,
        )
        .await;

    assert!(result.is_err());
    assert_eq!(
        controller.state().error().as_deref(),
        Some("Los story points completados deben ser un número entero")
    );
    assert_eq!(service.velocity_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_velocity_cancelled_leaves_state_unchanged() {
    let dir = tempfile::TempDir::new().unwrap();
    let service = Arc::new(FakeService::with_backlog(sample_backlog()));
    let controller = loaded(service.clone(), dir.path()).await;
    let state = controller.state();
    state.set_success("previo");

    let before = (state.backlog(), state.active_tab(), state.error(), state.success());
    let cases = [
        (PromptAnswer::Cancelled, PromptAnswer::Value("5".to_string())),
        (PromptAnswer::Value("1".to_string()), PromptAnswer::Cancelled),
        (PromptAnswer::from_input("  "), PromptAnswer::Value("5".to_string())),
    ];
    for (sprint, points) in cases {
        let outcome = controller.update_velocity(sprint, points, None).await.unwrap();
        assert_eq!(outcome, Outcome::Cancelled);
        assert!(!state.loading());
    }
    let after = (state.backlog(), state.active_tab(), state.error(), state.success());

    assert_eq!(before, after);
    assert_eq!(service.velocity_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_velocity_success_sends_sprint_total_and_reports_average() {
    let dir = tempfile::TempDir::new().unwrap();
    let service = Arc::new(FakeService::with_backlog(sample_backlog()));
    let controller = loaded(service.clone(), dir.path()).await;
    let revision = controller.state().revision();

    let outcome = controller
        .update_velocity(
            PromptAnswer::Value("1".to_string()),
            PromptAnswer::Value("7".to_string()),
            Some("  ".to_string()),
        )
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Completed);
    let request = service.last_velocity.lock().unwrap().clone().unwrap();
    assert_eq!(request.sprint_number, 1);
    assert_eq!(request.completed_points, 7);
    assert_eq!(request.total_points, 8);
    assert_eq!(request.feedback, None);

    let state = controller.state();
    assert_eq!(
        state.success().as_deref(),
        Some("Velocidad actualizada. Nueva velocidad promedio: 7.0 SP")
    );
    assert_eq!(state.active_tab(), ActiveTab::Backlog);
    assert_eq!(state.revision(), revision + 1);
    assert_eq!(state.backlog().unwrap().velocity_history, vec![7]);
}

#[tokio::test]
async fn test_velocity_without_backlog() {
    let dir = tempfile::TempDir::new().unwrap();
    let service = Arc::new(FakeService::default());
    let controller = controller_for(service.clone(), dir.path());

    let result = controller
        .update_velocity(
            PromptAnswer::Value("1".to_string()),
            PromptAnswer::Value("5".to_string()),
            None,
        )
        .await;

    assert!(result.is_err());
    assert_eq!(controller.state().error().as_deref(), Some("No hay backlog cargado"));
    assert_eq!(service.network_calls(), 0);
}

// ============================================================================
// EXPORT / CLEAR / PLAN
// ============================================================================

#[tokio::test]
async fn test_export_extensions_and_backlog_untouched() {
    let dir = tempfile::TempDir::new().unwrap();
    let service = Arc::new(FakeService::with_backlog(sample_backlog()));
    let controller = loaded(service, dir.path()).await;
    let revision = controller.state().revision();

    for (format, ext) in [
        (ExportFormat::Markdown, "md"),
        (ExportFormat::Csv, "csv"),
        (ExportFormat::Json, "json"),
    ] {
        let path = controller.export_backlog(format).await.unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("backlog_"));
        assert!(name.ends_with(&format!(".{}", ext)), "{} should end with .{}", name, ext);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            format!("export {}", format)
        );
        assert_eq!(
            controller.state().success(),
            Some(format!("Backlog exportado en formato {}", format))
        );
    }

    assert_eq!(controller.state().revision(), revision);
}

#[tokio::test]
async fn test_export_failure_is_prefixed() {
    let dir = tempfile::TempDir::new().unwrap();
    let service = Arc::new(FakeService::with_backlog(sample_backlog()));
    let controller = loaded(service.clone(), dir.path()).await;
    service.fail_with("Formato no soportado");

    assert!(controller.export_backlog(ExportFormat::Csv).await.is_err());
    assert_eq!(
        controller.state().error().as_deref(),
        Some("Error al exportar: Formato no soportado")
    );
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_clear_declined_leaves_state_unchanged() {
    let dir = tempfile::TempDir::new().unwrap();
    let service = Arc::new(FakeService::with_backlog(sample_backlog()));
    let controller = loaded(service.clone(), dir.path()).await;
    let state = controller.state();
    let before = (state.backlog(), state.active_tab(), state.revision());

    let outcome = controller.clear_backlog(Confirmation::Declined).await.unwrap();

    assert_eq!(outcome, Outcome::Cancelled);
    assert_eq!(before, (state.backlog(), state.active_tab(), state.revision()));
    assert_eq!(service.clear_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_clear_confirmed_resets_to_form() {
    let dir = tempfile::TempDir::new().unwrap();
    let service = Arc::new(FakeService::with_backlog(sample_backlog()));
    let controller = loaded(service.clone(), dir.path()).await;
    controller.state().select_tab(ActiveTab::Sprints);

    let outcome = controller.clear_backlog(Confirmation::Confirmed).await.unwrap();

    let state = controller.state();
    assert_eq!(outcome, Outcome::Completed);
    assert!(!state.has_backlog());
    assert_eq!(state.active_tab(), ActiveTab::Form);
    assert_eq!(state.success().as_deref(), Some("Backlog eliminado"));
    assert!(!state.is_tab_available(ActiveTab::Backlog));
}

#[tokio::test]
async fn test_plan_sprints_replaces_backlog() {
    let dir = tempfile::TempDir::new().unwrap();
    let service = Arc::new(FakeService::with_backlog(sample_backlog()));
    let controller = loaded(service.clone(), dir.path()).await;

    controller.plan_sprints(20, Some(2)).await.unwrap();

    assert_eq!(service.plan_calls.load(Ordering::SeqCst), 1);
    assert_eq!(controller.state().backlog().unwrap().team_capacity, 20);
    assert_eq!(controller.state().success().as_deref(), Some("Sprints replanificados"));
}

#[tokio::test]
async fn test_operation_refused_while_loading() {
    let dir = tempfile::TempDir::new().unwrap();
    let service = Arc::new(FakeService::with_backlog(sample_backlog()));
    let controller = loaded(service.clone(), dir.path()).await;
    assert!(controller.state().try_begin_loading());

    assert!(controller.export_backlog(ExportFormat::Json).await.is_err());
    assert!(controller.clear_backlog(Confirmation::Confirmed).await.is_err());

    assert_eq!(service.network_calls(), 0);
    assert!(controller.state().error().is_none());
    assert!(controller.state().has_backlog());
}

// ============================================================================
// DERIVED STATS
// ============================================================================

#[test]
fn test_stats_sum_points() {
    let stats = BacklogStats::from_backlog(&sample_backlog());
    assert_eq!(stats.total_stories, 3);
    assert_eq!(stats.total_points, 10);
    assert_eq!(stats.total_sprints, 2);

    let empty = BacklogStats::from_backlog(&Backlog::default());
    assert_eq!(empty.total_points, 0);
    assert_eq!(empty.velocity_label(), "-");
}

// ============================================================================
// ROUND TRIP
// ============================================================================

#[tokio::test]
async fn test_round_trip_returns_to_initial_state() {
    let dir = tempfile::TempDir::new().unwrap();
    let service = Arc::new(FakeService::default());
    let controller = controller_for(service.clone(), dir.path());
    let state = controller.state();

    controller.initialize().await;
    assert!(!state.has_backlog());
    assert_eq!(state.active_tab(), ActiveTab::Form);

    fill_form(state, "Tienda online con carrito", 9);
    controller.generate_backlog().await.unwrap();
    controller
        .update_velocity(
            PromptAnswer::Value("1".to_string()),
            PromptAnswer::Value("8".to_string()),
            None,
        )
        .await
        .unwrap();
    controller.export_backlog(ExportFormat::Markdown).await.unwrap();
    controller.clear_backlog(Confirmation::Confirmed).await.unwrap();

    assert!(!state.has_backlog());
    assert_eq!(state.active_tab(), ActiveTab::Form);
    assert!(!state.loading());
    assert!(state.error().is_none());
    assert_eq!(service.network_calls(), 4);
}

#[tokio::test]
async fn test_round_trip_through_tui_commands() {
    let dir = tempfile::TempDir::new().unwrap();
    let service = Arc::new(FakeService::default());
    let controller = controller_for(service.clone(), dir.path());
    let state = controller.state().clone();
    let terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    let mut tui = TuiController::new(controller, TuiRenderer::new(terminal));

    // Submitting an empty form only flags the field
    assert!(tui.dispatch(Command::SubmitForm).is_none());
    assert!(state.requirements_flagged());
    assert_eq!(service.network_calls(), 0);

    // Backlog-only commands are ignored without a backlog
    assert!(tui.dispatch(Command::Export(ExportFormat::Csv)).is_none());
    assert!(tui.dispatch(Command::SelectTab(ActiveTab::Sprints)).is_none());
    assert_eq!(state.active_tab(), ActiveTab::Form);

    for c in "Blog personal".chars() {
        tui.dispatch(Command::InsertChar(c));
    }
    tui.dispatch(Command::SubmitForm).unwrap().await.unwrap();
    assert_eq!(state.active_tab(), ActiveTab::Backlog);
    assert!(!state.requirements_flagged());
    tui.render().unwrap();

    // Velocity: sprint number, then points
    assert!(tui.dispatch(Command::BeginVelocityUpdate).is_none());
    tui.dispatch(Command::InsertChar('2'));
    assert!(tui.dispatch(Command::DialogSubmit).is_none());
    tui.dispatch(Command::InsertChar('2'));
    tui.dispatch(Command::DialogSubmit).unwrap().await.unwrap();
    assert!(!state.has_dialog());
    assert_eq!(state.backlog().unwrap().sprint(2).unwrap().completed_points, 2);

    tui.dispatch(Command::Export(ExportFormat::Json)).unwrap().await.unwrap();
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);

    // Declining keeps the backlog, confirming removes it
    tui.dispatch(Command::BeginClear);
    tui.dispatch(Command::DialogCancel).unwrap().await.unwrap();
    assert!(state.has_backlog());
    tui.dispatch(Command::BeginClear);
    tui.dispatch(Command::DialogSubmit).unwrap().await.unwrap();

    assert!(!state.has_backlog());
    assert_eq!(state.active_tab(), ActiveTab::Form);
    assert_eq!(service.network_calls(), 4);
    tui.render().unwrap();
}

#[tokio::test]
async fn test_operations_blocked_while_loading() {
    let dir = tempfile::TempDir::new().unwrap();
    let service = Arc::new(FakeService::with_backlog(sample_backlog()));
    let controller = loaded(service.clone(), dir.path()).await;
    let state = controller.state().clone();
    let terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    let mut tui = TuiController::new(controller, TuiRenderer::new(terminal));

    assert!(state.try_begin_loading());
    assert!(tui.dispatch(Command::Export(ExportFormat::Markdown)).is_none());
    assert!(tui.dispatch(Command::BeginClear).is_none());
    assert!(!state.has_dialog());

    // Navigation still works
    tui.dispatch(Command::SelectTab(ActiveTab::Sprints));
    assert_eq!(state.active_tab(), ActiveTab::Sprints);
    assert_eq!(service.network_calls(), 0);
}
