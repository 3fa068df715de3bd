//! Timetable quality scoring.
//!
//! | Sub-score | Definition | Weight |
//! |-----------|-----------|--------|
//! | Faculty load balance | 100 - 10 x mean absolute deviation of per-faculty load | 0.30 |
//! | Student fatigue | 100 - 2 x entries at period 6 or later | 0.25 |
//! | Room utilization | 20 x mean per-room load, capped at 100 | 0.20 |
//! | Clash risk | 100 - 20 x conflict count | 0.25 |
//!
//! Every sub-score is floored at 0 and all values are rounded to 2 decimals.

use crate::data::{QualityResponse, TimetableEntry};
use itertools::Itertools;
use log::debug;

const FACULTY_LOAD_WEIGHT: f64 = 0.30;
const STUDENT_FATIGUE_WEIGHT: f64 = 0.25;
const ROOM_UTILIZATION_WEIGHT: f64 = 0.20;
const CLASH_RISK_WEIGHT: f64 = 0.25;

/// First period counted as a late, fatiguing slot.
const LATE_PERIOD: u32 = 6;

/// Scores a timetable. `conflict_count` comes from the caller and is not
/// re-derived from the entries.
pub fn calculate_quality(
    tenant_id: &str,
    timetable: &[TimetableEntry],
    conflict_count: usize,
) -> QualityResponse {
    let faculty_loads: Vec<f64> = timetable
        .iter()
        .map(|e| e.faculty_id.as_str())
        .counts()
        .into_values()
        .map(|n| n as f64)
        .collect();
    let room_loads: Vec<f64> = timetable
        .iter()
        .map(|e| e.room.as_str())
        .counts()
        .into_values()
        .map(|n| n as f64)
        .collect();

    let faculty_load_balance = match mean(&faculty_loads) {
        Some(avg) => {
            let deviation: f64 = faculty_loads.iter().map(|load| (load - avg).abs()).sum();
            let imbalance = deviation / faculty_loads.len() as f64;
            (100.0 - imbalance * 10.0).max(0.0)
        }
        None => 100.0,
    };

    let late_entries = timetable.iter().filter(|e| e.period >= LATE_PERIOD).count();
    let student_fatigue = (100.0 - late_entries as f64 * 2.0).max(0.0);

    let room_utilization = mean(&room_loads).map_or(0.0, |avg| (avg * 20.0).min(100.0));

    let clash_risk = (100.0 - conflict_count as f64 * 20.0).max(0.0);

    let overall_quality = round2(
        faculty_load_balance * FACULTY_LOAD_WEIGHT
            + student_fatigue * STUDENT_FATIGUE_WEIGHT
            + room_utilization * ROOM_UTILIZATION_WEIGHT
            + clash_risk * CLASH_RISK_WEIGHT,
    );
    debug!(
        "Quality for tenant {}: load={:.2} fatigue={:.2} rooms={:.2} clash={:.2} overall={:.2}",
        tenant_id,
        faculty_load_balance,
        student_fatigue,
        room_utilization,
        clash_risk,
        overall_quality
    );

    QualityResponse {
        tenant_id: tenant_id.to_string(),
        faculty_load_balance: round2(faculty_load_balance),
        student_fatigue: round2(student_fatigue),
        room_utilization: round2(room_utilization),
        clash_risk: round2(clash_risk),
        overall_quality,
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Rounds to 2 decimals, ties to even on the exact binary value.
pub(crate) fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflicts::detect_conflicts;

    fn entry(period: u32, room: &str, faculty: &str) -> TimetableEntry {
        TimetableEntry {
            section: "CSE-A".to_string(),
            day: "Monday".to_string(),
            period,
            course: "AI".to_string(),
            room: room.to_string(),
            faculty_id: faculty.to_string(),
        }
    }

    #[test]
    fn empty_timetable_scores() {
        let q = calculate_quality("t1", &[], 0);
        assert_eq!(q.faculty_load_balance, 100.0);
        assert_eq!(q.student_fatigue, 100.0);
        assert_eq!(q.room_utilization, 0.0);
        assert_eq!(q.clash_risk, 100.0);
        assert_eq!(q.overall_quality, 80.0);
        assert_eq!(q.tenant_id, "t1");
    }

    #[test]
    fn balanced_two_room_timetable() {
        let timetable = vec![entry(1, "R101", "F1"), entry(2, "R102", "F2")];
        let q = calculate_quality("t1", &timetable, 0);
        assert_eq!(q.faculty_load_balance, 100.0);
        assert_eq!(q.student_fatigue, 100.0);
        assert_eq!(q.room_utilization, 20.0);
        assert_eq!(q.clash_risk, 100.0);
        // 30 + 25 + 4 + 25
        assert_eq!(q.overall_quality, 84.0);
    }

    #[test]
    fn imbalance_late_periods_and_conflicts_lower_scores() {
        // F1 carries 3 entries, F2 one: mean 2, deviation 1
        let timetable = vec![
            entry(1, "R101", "F1"),
            entry(6, "R101", "F1"),
            entry(7, "R101", "F1"),
            entry(2, "R101", "F2"),
        ];
        let q = calculate_quality("t1", &timetable, 2);
        assert_eq!(q.faculty_load_balance, 90.0);
        assert_eq!(q.student_fatigue, 96.0);
        assert_eq!(q.room_utilization, 80.0);
        assert_eq!(q.clash_risk, 60.0);
        assert_eq!(q.overall_quality, round2(27.0 + 24.0 + 16.0 + 15.0));
    }

    #[test]
    fn sub_scores_are_floored_and_capped() {
        let timetable: Vec<TimetableEntry> = (0..60).map(|_| entry(8, "R1", "F1")).collect();
        let q = calculate_quality("t1", &timetable, 10);
        assert_eq!(q.student_fatigue, 0.0);
        assert_eq!(q.room_utilization, 100.0);
        assert_eq!(q.clash_risk, 0.0);
        assert!((0.0..=100.0).contains(&q.overall_quality));
    }

    #[test]
    fn rounds_to_two_decimals() {
        // loads 2,1,1: mean 4/3, mean deviation 4/9
        let timetable = vec![
            entry(1, "R1", "F1"),
            entry(2, "R1", "F1"),
            entry(3, "R1", "F2"),
            entry(4, "R1", "F3"),
        ];
        let q = calculate_quality("t1", &timetable, 0);
        assert_eq!(q.faculty_load_balance, 95.56);
    }

    #[test]
    fn exact_tie_rounds_to_even() {
        // one room at one period, F1 teaching four of seven sections
        let timetable: Vec<TimetableEntry> = ["F1", "F1", "F1", "F1", "F2", "F3", "F4"]
            .iter()
            .enumerate()
            .map(|(i, faculty)| TimetableEntry {
                section: format!("S{}", i),
                ..entry(1, "R1", faculty)
            })
            .collect();
        let conflict_count = detect_conflicts(&timetable).len();
        assert_eq!(conflict_count, 11);

        let q = calculate_quality("t1", &timetable, conflict_count);
        assert_eq!(q.faculty_load_balance, 88.75);
        assert_eq!(q.clash_risk, 0.0);
        assert_eq!(q.overall_quality, 71.62);
    }

    #[test]
    fn round2_matches_half_even_on_exact_values() {
        assert_eq!(round2(71.625), 71.62);
        assert_eq!(round2(96.625), 96.62);
        assert_eq!(round2(99.875), 99.88);
        assert_eq!(round2(0.125), 0.12);
        // 2.675 and 1.005 sit just below the tie in binary
        assert_eq!(round2(2.675), 2.67);
        assert_eq!(round2(1.005), 1.0);
    }
}
