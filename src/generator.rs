use crate::data::{TimetableEntry, TimetableGenerateRequest, TimetableGenerateResponse};
use log::{info, trace};

/// Quality reported for every generated timetable.
pub const GENERATED_QUALITY_SCORE: f64 = 82.0;
const GENERATED_DAY: &str = "Monday";

/// Generates a timetable by round-robin assignment.
///
/// Section `i` (1-based) gets period `i` on Monday, with course, room and
/// faculty taken modulo their list lengths. Every section has its own period,
/// so the result is conflict-free.
pub fn generate_timetable(
    input: &TimetableGenerateRequest,
) -> Result<TimetableGenerateResponse, String> {
    if input.courses.is_empty() {
        return Err("At least one course is required to generate a timetable.".to_string());
    }
    if input.rooms.is_empty() {
        return Err("At least one room is required to generate a timetable.".to_string());
    }
    if input.faculty_ids.is_empty() {
        return Err("At least one faculty id is required to generate a timetable.".to_string());
    }

    info!(
        "Generating timetable for tenant {} with {} sections, {} courses, {} rooms, {} faculty...",
        input.tenant_id,
        input.sections.len(),
        input.courses.len(),
        input.rooms.len(),
        input.faculty_ids.len()
    );

    let timetable: Vec<TimetableEntry> = input
        .sections
        .iter()
        .enumerate()
        .map(|(i, section)| TimetableEntry {
            section: section.clone(),
            day: GENERATED_DAY.to_string(),
            period: i as u32 + 1,
            course: input.courses[i % input.courses.len()].clone(),
            room: input.rooms[i % input.rooms.len()].clone(),
            faculty_id: input.faculty_ids[i % input.faculty_ids.len()].clone(),
        })
        .collect();
    trace!("Generated {} entries.", timetable.len());

    Ok(TimetableGenerateResponse {
        tenant_id: input.tenant_id.clone(),
        generated: true,
        conflict_count: 0,
        quality_score: GENERATED_QUALITY_SCORE,
        timetable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflicts::detect_conflicts;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn request(
        sections: &[&str],
        courses: &[&str],
        rooms: &[&str],
        faculty: &[&str],
    ) -> TimetableGenerateRequest {
        TimetableGenerateRequest {
            tenant_id: "t1".to_string(),
            sections: strings(sections),
            courses: strings(courses),
            rooms: strings(rooms),
            faculty_ids: strings(faculty),
        }
    }

    #[test]
    fn round_robin_assignment() {
        let input = request(&["A", "B", "C"], &["Math", "AI"], &["R101"], &["F1", "F2"]);
        let output = generate_timetable(&input).unwrap();
        assert!(output.generated);
        assert_eq!(output.quality_score, 82.0);
        let t = &output.timetable;
        assert_eq!(t.len(), 3);
        let slot = |e: &TimetableEntry| (e.period, e.course.clone(), e.faculty_id.clone());
        assert_eq!(slot(&t[0]), (1, "Math".to_string(), "F1".to_string()));
        assert_eq!(slot(&t[1]), (2, "AI".to_string(), "F2".to_string()));
        assert_eq!(slot(&t[2]), (3, "Math".to_string(), "F1".to_string()));
        assert!(t.iter().all(|e| e.day == "Monday" && e.room == "R101"));
    }

    #[test]
    fn generated_timetable_is_conflict_free() {
        let input = request(
            &["CSE-A", "CSE-B"],
            &["Math", "AI"],
            &["R101", "R102"],
            &["F1", "F2"],
        );
        let output = generate_timetable(&input).unwrap();
        assert_eq!(output.conflict_count, 0);
        assert!(detect_conflicts(&output.timetable).is_empty());
    }

    #[test]
    fn empty_resource_lists_are_rejected() {
        assert!(generate_timetable(&request(&["A"], &[], &["R1"], &["F1"])).is_err());
        assert!(generate_timetable(&request(&["A"], &["C"], &[], &["F1"])).is_err());
        assert!(generate_timetable(&request(&["A"], &["C"], &["R1"], &[])).is_err());
    }

    #[test]
    fn no_sections_yields_empty_timetable() {
        let output = generate_timetable(&request(&[], &["C"], &["R1"], &["F1"])).unwrap();
        assert!(output.timetable.is_empty());
    }
}
