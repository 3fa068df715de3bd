use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// Type aliases for clarity
pub type TenantId = String;
pub type FacultyId = String;
pub type Period = u32;

/// One scheduled (section, day, period, course, room, faculty) slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct TimetableEntry {
    pub section: String,
    pub day: String,
    pub period: Period,
    pub course: String,
    pub room: String,
    pub faculty_id: FacultyId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConflictType {
    Faculty,
    Room,
    Section,
}

/// A single entry caught in a colliding group.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ConflictRecord {
    pub conflict_type: ConflictType,
    pub message: String,
    pub section: String,
    pub day: String,
    pub period: Period,
}

impl fmt::Display for ConflictRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.conflict_type, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct User {
    pub user_id: String,
    pub tenant_id: TenantId,
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScopeType {
    Tenant,
    Institute,
    Department,
    Program,
    Section,
}

/// Grants a user's role a set of permissions over one organizational unit.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AccessScope {
    pub user_id: String,
    pub role_id: String,
    pub tenant_id: TenantId,
    pub scope_type: ScopeType,
    pub scope_id: String,
    #[serde(default = "default_true")]
    pub can_view: bool,
    #[serde(default)]
    pub can_edit: bool,
    #[serde(default)]
    pub can_approve: bool,
    #[serde(default)]
    pub can_publish: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RuleCategory {
    Hard,
    Soft,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ConstraintRule {
    pub rule_id: String,
    pub tenant_id: TenantId,
    pub name: String,
    pub category: RuleCategory,
    pub weight: u32,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub params: Map<String, Value>,
}

fn default_true() -> bool {
    true
}

/// Tenant filter for the list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TenantQuery {
    pub tenant_id: Option<TenantId>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimetableGenerateRequest {
    pub tenant_id: TenantId,
    pub sections: Vec<String>,
    pub courses: Vec<String>,
    pub rooms: Vec<String>,
    pub faculty_ids: Vec<FacultyId>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimetableGenerateResponse {
    pub tenant_id: TenantId,
    pub generated: bool,
    pub conflict_count: usize,
    pub quality_score: f64,
    pub timetable: Vec<TimetableEntry>,
}

/// Body shared by the validate, quality and suggestions endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimetableRequest {
    pub tenant_id: TenantId,
    pub timetable: Vec<TimetableEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValidationResponse {
    pub tenant_id: TenantId,
    pub valid: bool,
    pub conflict_count: usize,
    pub conflicts: Vec<ConflictRecord>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct QualityResponse {
    pub tenant_id: TenantId,
    pub faculty_load_balance: f64,
    pub student_fatigue: f64,
    pub room_utilization: f64,
    pub clash_risk: f64,
    pub overall_quality: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SuggestionType {
    Swap,
    LoadBalance,
    IdleRoom,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SuggestionRecord {
    pub suggestion_id: String,
    pub suggestion_type: SuggestionType,
    pub description: String,
    pub expected_quality_delta: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SuggestionResponse {
    pub tenant_id: TenantId,
    pub suggestions: Vec<SuggestionRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScenarioType {
    AddSection,
    FacultyLeave,
    Holiday,
    FiveDayWeek,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationRequest {
    pub tenant_id: TenantId,
    pub scenario_name: String,
    pub scenario_type: ScenarioType,
    #[serde(default)]
    pub payload: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SimulationResponse {
    pub tenant_id: TenantId,
    pub scenario_name: String,
    pub impact_summary: String,
    pub estimated_conflicts: u32,
    pub estimated_quality_score: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmergencyRescheduleRequest {
    pub tenant_id: TenantId,
    pub reason: String,
    pub affected_faculty_id: FacultyId,
    pub section: String,
    /// Candidate substitutes; when absent the tenant's faculty users are used.
    #[serde(default)]
    pub faculty_pool: Option<Vec<FacultyId>>,
}

/// `substitute_faculty_id` is `None` and `handled` is false when nobody but
/// the affected faculty is available.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EmergencyRescheduleResponse {
    pub tenant_id: TenantId,
    pub handled: bool,
    pub substitute_faculty_id: Option<FacultyId>,
    pub recommendation: String,
}
