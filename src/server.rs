use crate::advisor;
use crate::config::Config;
use crate::conflicts;
use crate::data::{
    AccessScope, ConstraintRule, EmergencyRescheduleRequest, EmergencyRescheduleResponse,
    QualityResponse, SimulationRequest, SimulationResponse, SuggestionResponse, TenantQuery,
    TimetableEntry, TimetableGenerateRequest, TimetableGenerateResponse, TimetableRequest, User,
    ValidationResponse,
};
use crate::error::{AppError, AppResult};
use crate::generator;
use crate::quality;
use crate::store::Store;
use axum::extract::{FromRequest, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{debug, info};
use serde_json::{Value, json};
use std::sync::Arc;

/// Shared handler state. The store is the only mutable part.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            store: Arc::new(Store::new()),
            config: Arc::new(config),
        }
    }
}

/// JSON body extractor whose rejections render as `{"detail": ..}`.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/users", post(create_user_handler).get(list_users_handler))
        .route("/access/scope", post(assign_scope_handler).get(list_scopes_handler))
        .route("/constraints", post(create_constraint_handler).get(list_constraints_handler))
        .route("/timetables/generate", post(generate_handler))
        .route("/timetables/validate", post(validate_handler))
        .route("/timetables/quality", post(quality_handler))
        .route("/timetables/suggestions", post(suggestions_handler))
        .route("/simulations", post(simulation_handler))
        .route("/reschedule/emergency", post(emergency_handler))
        .with_state(state)
}

pub async fn run_server(config: Config) -> std::io::Result<()> {
    let addr = config.addr;
    let app = router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn create_user_handler(
    State(state): State<AppState>,
    AppJson(user): AppJson<User>,
) -> AppResult<Json<User>> {
    check_user(&user)?;
    Ok(Json(state.store.create_user(user)?))
}

async fn list_users_handler(
    State(state): State<AppState>,
    Query(query): Query<TenantQuery>,
) -> AppResult<Json<Vec<User>>> {
    Ok(Json(state.store.list_users(query.tenant_id.as_deref())?))
}

async fn assign_scope_handler(
    State(state): State<AppState>,
    AppJson(scope): AppJson<AccessScope>,
) -> AppResult<Json<AccessScope>> {
    require_non_empty(&[
        ("user_id", &scope.user_id),
        ("role_id", &scope.role_id),
        ("tenant_id", &scope.tenant_id),
        ("scope_id", &scope.scope_id),
    ])?;
    Ok(Json(state.store.assign_scope(scope)?))
}

async fn list_scopes_handler(
    State(state): State<AppState>,
    Query(query): Query<TenantQuery>,
) -> AppResult<Json<Vec<AccessScope>>> {
    Ok(Json(state.store.list_scopes(query.tenant_id.as_deref())?))
}

async fn create_constraint_handler(
    State(state): State<AppState>,
    AppJson(rule): AppJson<ConstraintRule>,
) -> AppResult<Json<ConstraintRule>> {
    require_non_empty(&[
        ("rule_id", &rule.rule_id),
        ("tenant_id", &rule.tenant_id),
        ("name", &rule.name),
    ])?;
    Ok(Json(state.store.create_constraint(rule)?))
}

async fn list_constraints_handler(
    State(state): State<AppState>,
    Query(query): Query<TenantQuery>,
) -> AppResult<Json<Vec<ConstraintRule>>> {
    Ok(Json(state.store.list_constraints(query.tenant_id.as_deref())?))
}

async fn generate_handler(
    AppJson(input): AppJson<TimetableGenerateRequest>,
) -> AppResult<Json<TimetableGenerateResponse>> {
    match generator::generate_timetable(&input) {
        Ok(output) => Ok(Json(output)),
        Err(e) => Err(AppError::Validation(e)),
    }
}

async fn validate_handler(
    AppJson(input): AppJson<TimetableRequest>,
) -> AppResult<Json<ValidationResponse>> {
    check_entries(&input.timetable)?;
    let conflicts = conflicts::detect_conflicts(&input.timetable);
    info!(
        "Validated {} entries for tenant {}: {} conflicts.",
        input.timetable.len(),
        input.tenant_id,
        conflicts.len()
    );
    for conflict in &conflicts {
        debug!("{}", conflict);
    }
    Ok(Json(ValidationResponse {
        tenant_id: input.tenant_id,
        valid: conflicts.is_empty(),
        conflict_count: conflicts.len(),
        conflicts,
    }))
}

async fn quality_handler(
    AppJson(input): AppJson<TimetableRequest>,
) -> AppResult<Json<QualityResponse>> {
    check_entries(&input.timetable)?;
    let conflict_count = conflicts::detect_conflicts(&input.timetable).len();
    let response = quality::calculate_quality(&input.tenant_id, &input.timetable, conflict_count);
    info!(
        "Scored timetable for tenant {}: overall {:.2}.",
        input.tenant_id, response.overall_quality
    );
    Ok(Json(response))
}

async fn suggestions_handler(
    AppJson(input): AppJson<TimetableRequest>,
) -> AppResult<Json<SuggestionResponse>> {
    check_entries(&input.timetable)?;
    let conflict_count = conflicts::detect_conflicts(&input.timetable).len();
    let suggestions = advisor::build_suggestions(&input.timetable, conflict_count);
    info!(
        "Suggested {} changes for tenant {}.",
        suggestions.len(),
        input.tenant_id
    );
    Ok(Json(SuggestionResponse {
        tenant_id: input.tenant_id,
        suggestions,
    }))
}

async fn simulation_handler(AppJson(sim): AppJson<SimulationRequest>) -> Json<SimulationResponse> {
    Json(advisor::run_simulation(&sim))
}

/// Pool priority: request, tenant faculty users, configured default.
async fn emergency_handler(
    State(state): State<AppState>,
    AppJson(request): AppJson<EmergencyRescheduleRequest>,
) -> AppResult<Json<EmergencyRescheduleResponse>> {
    require_non_empty(&[
        ("tenant_id", &request.tenant_id),
        ("affected_faculty_id", &request.affected_faculty_id),
        ("section", &request.section),
    ])?;

    let mut pool = request.faculty_pool.clone().unwrap_or_default();
    if pool.is_empty() {
        pool = state.store.faculty_pool(&request.tenant_id)?;
    }
    if pool.is_empty() {
        pool = state.config.default_faculty_pool.clone();
    }

    Ok(Json(advisor::emergency_reschedule(&request, &pool)))
}

fn require_non_empty(fields: &[(&str, &String)]) -> AppResult<()> {
    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((name, _)) => Err(AppError::validation(format!("{} must not be empty", name))),
        None => Ok(()),
    }
}

fn check_user(user: &User) -> AppResult<()> {
    if user.user_id.chars().count() < 2 {
        return Err(AppError::validation("user_id must be at least 2 characters"));
    }
    if user.tenant_id.chars().count() < 2 {
        return Err(AppError::validation("tenant_id must be at least 2 characters"));
    }
    if !is_valid_email(&user.email) {
        return Err(AppError::validation(format!(
            "'{}' is not a valid email address",
            user.email
        )));
    }
    Ok(())
}

// local@domain.tld with no whitespace
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.split('.').count() >= 2
                && domain.split('.').all(|label| !label.is_empty())
        }
        None => false,
    }
}

fn check_entries(timetable: &[TimetableEntry]) -> AppResult<()> {
    for (i, entry) in timetable.iter().enumerate() {
        let blank = [
            ("section", &entry.section),
            ("day", &entry.day),
            ("course", &entry.course),
            ("room", &entry.room),
            ("faculty_id", &entry.faculty_id),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty());
        if let Some((name, _)) = blank {
            return Err(AppError::validation(format!(
                "timetable[{}].{} must not be empty",
                i, name
            )));
        }
        if entry.period == 0 {
            return Err(AppError::validation(format!("timetable[{}].period must be positive", i)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_syntax() {
        assert!(is_valid_email("coord@example.com"));
        assert!(is_valid_email("a.b@dept.uni.edu"));
        assert!(!is_valid_email("coord"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("coord@example"));
        assert!(!is_valid_email("coord@example."));
        assert!(!is_valid_email("co ord@example.com"));
        assert!(!is_valid_email("a@b@example.com"));
    }

    #[test]
    fn rejects_blank_entry_fields_and_zero_period() {
        let mut entry = TimetableEntry {
            section: "CSE-A".to_string(),
            day: "Monday".to_string(),
            period: 1,
            course: "AI".to_string(),
            room: "R101".to_string(),
            faculty_id: "F1".to_string(),
        };
        assert!(check_entries(std::slice::from_ref(&entry)).is_ok());

        entry.room = " ".to_string();
        assert!(check_entries(std::slice::from_ref(&entry)).is_err());

        entry.room = "R101".to_string();
        entry.period = 0;
        assert!(check_entries(&[entry]).is_err());
    }
}
