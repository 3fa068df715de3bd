//! Rule-based advice: optimization suggestions, what-if scenario impact and
//! emergency substitute selection.

use crate::data::{
    EmergencyRescheduleRequest, EmergencyRescheduleResponse, FacultyId, ScenarioType,
    SimulationRequest, SimulationResponse, SuggestionRecord, SuggestionType, TimetableEntry,
};
use itertools::{Itertools, MinMaxResult};
use log::{debug, info};

/// Produces suggestions in fixed priority order: swap on conflicts, load
/// balancing on a faculty spread of 2 or more, idle rooms when more than one
/// room is used. Falls back to a single "stable" suggestion, so the result is
/// never empty.
pub fn build_suggestions(
    timetable: &[TimetableEntry],
    conflict_count: usize,
) -> Vec<SuggestionRecord> {
    let mut suggestions = Vec::new();

    if conflict_count > 0 {
        suggestions.push(suggestion(
            "SUG-001",
            SuggestionType::Swap,
            "Swap clashing slots to eliminate faculty/room overlaps.",
            8.5,
        ));
    }

    let faculty_loads = timetable.iter().map(|e| e.faculty_id.as_str()).counts();
    let load_spread = match faculty_loads.into_values().minmax() {
        MinMaxResult::NoElements => 0,
        MinMaxResult::OneElement(_) => 0,
        MinMaxResult::MinMax(min, max) => max - min,
    };
    if load_spread >= 2 {
        suggestions.push(suggestion(
            "SUG-002",
            SuggestionType::LoadBalance,
            "Redistribute sessions from overloaded faculty to available faculty.",
            6.0,
        ));
    }

    if timetable.iter().map(|e| e.room.as_str()).unique().count() > 1 {
        suggestions.push(suggestion(
            "SUG-003",
            SuggestionType::IdleRoom,
            "Move sessions to under-utilized rooms to improve utilization balance.",
            4.0,
        ));
    }

    if suggestions.is_empty() {
        suggestions.push(suggestion(
            "SUG-000",
            SuggestionType::IdleRoom,
            "Timetable is stable; no major optimization needed.",
            0.5,
        ));
    }

    debug!("Built {} suggestions (conflicts: {}).", suggestions.len(), conflict_count);
    suggestions
}

fn suggestion(
    id: &str,
    suggestion_type: SuggestionType,
    description: &str,
    delta: f64,
) -> SuggestionRecord {
    SuggestionRecord {
        suggestion_id: id.to_string(),
        suggestion_type,
        description: description.to_string(),
        expected_quality_delta: delta,
    }
}

/// Placeholder impact estimates per scenario: (summary, conflicts, quality).
pub fn scenario_impact(scenario_type: ScenarioType) -> (&'static str, u32, f64) {
    match scenario_type {
        ScenarioType::AddSection => (
            "New section increases slot pressure; add one room and two faculty blocks.",
            2,
            74.0,
        ),
        ScenarioType::FacultyLeave => (
            "Substitution needed for absent faculty; moderate disruption expected.",
            1,
            78.0,
        ),
        ScenarioType::Holiday => (
            "Compressing week increases fatigue; consider Saturday compensation slots.",
            3,
            70.0,
        ),
        ScenarioType::FiveDayWeek => (
            "Higher daily load concentration; optimize heavy-subject placement.",
            2,
            72.0,
        ),
    }
}

pub fn run_simulation(sim: &SimulationRequest) -> SimulationResponse {
    let (summary, conflicts, score) = scenario_impact(sim.scenario_type);
    info!(
        "Simulated scenario '{}' ({:?}) for tenant {}.",
        sim.scenario_name, sim.scenario_type, sim.tenant_id
    );
    SimulationResponse {
        tenant_id: sim.tenant_id.clone(),
        scenario_name: sim.scenario_name.clone(),
        impact_summary: summary.to_string(),
        estimated_conflicts: conflicts,
        estimated_quality_score: score,
    }
}

/// Picks the first pool member other than the affected faculty. An exhausted
/// pool is reported as unhandled rather than substituting the absent faculty.
pub fn emergency_reschedule(
    request: &EmergencyRescheduleRequest,
    faculty_pool: &[FacultyId],
) -> EmergencyRescheduleResponse {
    let substitute = faculty_pool
        .iter()
        .find(|f| **f != request.affected_faculty_id)
        .cloned();

    let recommendation = match &substitute {
        Some(sub) => format!(
            "Assign substitute faculty {} for section {}; shift one low-priority class to \
             nearest free slot to minimize disruption.",
            sub, request.section
        ),
        None => format!(
            "No substitute faculty available for section {}; \
             reschedule the affected classes manually.",
            request.section
        ),
    };
    info!(
        "Emergency reschedule for tenant {} ({}): {} -> {:?}",
        request.tenant_id, request.reason, request.affected_faculty_id, substitute
    );

    EmergencyRescheduleResponse {
        tenant_id: request.tenant_id.clone(),
        handled: substitute.is_some(),
        substitute_faculty_id: substitute,
        recommendation,
    }
}
