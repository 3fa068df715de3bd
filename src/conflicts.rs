use crate::data::{ConflictRecord, ConflictType, Period, TimetableEntry};
use log::trace;
use std::collections::HashMap;
use std::hash::Hash;

/// Finds every entry that shares a faculty slot, a room period or a section
/// slot with another entry.
///
/// Faculty collisions come first, then room, then section; each pass lists
/// groups in the order their key first appears. An entry caught by two passes
/// is reported twice.
pub fn detect_conflicts(timetable: &[TimetableEntry]) -> Vec<ConflictRecord> {
    let mut conflicts = Vec::new();

    let by_faculty =
        group_in_order(timetable, |e| (e.faculty_id.as_str(), e.day.as_str(), e.period));
    for (_, entries) in by_faculty {
        if entries.len() > 1 {
            conflicts.extend(entries.iter().map(|e| {
                record(
                    ConflictType::Faculty,
                    format!("Faculty {} has multiple classes at same slot", e.faculty_id),
                    e,
                    e.period,
                )
            }));
        }
    }

    // rooms collide on period alone, regardless of day
    for ((_, period), entries) in group_in_order(timetable, |e| (e.room.as_str(), e.period)) {
        if entries.len() > 1 {
            conflicts.extend(entries.iter().map(|e| {
                record(
                    ConflictType::Room,
                    format!("Room {} double-booked at period {}", e.room, period),
                    e,
                    period,
                )
            }));
        }
    }

    let by_section = group_in_order(timetable, |e| (e.section.as_str(), e.day.as_str(), e.period));
    for (_, entries) in by_section {
        if entries.len() > 1 {
            conflicts.extend(entries.iter().map(|e| {
                record(
                    ConflictType::Section,
                    format!("Section {} has overlap at period {}", e.section, e.period),
                    e,
                    e.period,
                )
            }));
        }
    }

    trace!(
        "Checked {} entries, found {} conflict records.",
        timetable.len(),
        conflicts.len()
    );
    conflicts
}

fn record(
    conflict_type: ConflictType,
    message: String,
    entry: &TimetableEntry,
    period: Period,
) -> ConflictRecord {
    ConflictRecord {
        conflict_type,
        message,
        section: entry.section.clone(),
        day: entry.day.clone(),
        period,
    }
}

// like into_group_map, but groups keep first-seen key order
fn group_in_order<'a, K, F>(
    entries: &'a [TimetableEntry],
    key: F,
) -> Vec<(K, Vec<&'a TimetableEntry>)>
where
    K: Eq + Hash + Clone,
    F: Fn(&'a TimetableEntry) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&'a TimetableEntry>)> = Vec::new();
    for entry in entries {
        let k = key(entry);
        match index.get(&k) {
            Some(&i) => groups[i].1.push(entry),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![entry]));
            }
        }
    }
    groups
}
