//! Immutable problem facts.

use chrono::{NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

/// Kind of laboratory a room provides or a course requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabType {
    Core,
    Computer,
}

/// A physical room. Created once at load time; never mutated during search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    /// Display name; also the key used by the course→priority-lab mapping.
    pub name: String,
    /// Physical block/wing ("A", "B", "C", ...).
    pub block: String,
    pub capacity: u32,
    pub is_lab: bool,
    #[serde(default)]
    pub lab_type: Option<LabType>,
}

/// One cell of the weekly grid: a day plus a start/end time.
///
/// Lab slots are longer (~100 minutes) than theory slots (~50 minutes)
/// and are flagged with `is_lab`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: String,
    pub day: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub is_lab: bool,
}

impl TimeSlot {
    /// True when both slots fall on the same day and their time ranges
    /// intersect.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.day == other.day && self.start < other.end && other.start < self.end
    }

    /// True when the slots are on the same day and one ends exactly when
    /// the other starts.
    pub fn is_back_to_back(&self, other: &TimeSlot) -> bool {
        self.day == other.day && (self.end == other.start || other.end == self.start)
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Hour-of-day of the slot start (0-23).
    pub fn start_hour(&self) -> u32 {
        self.start.hour()
    }
}

/// A teacher with a weekly teaching-hour budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: String,
    pub name: String,
    /// Maximum effective teaching hours per week (lab slots count double).
    pub max_weekly_hours: i64,
}

/// A course offered by a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub code: String,
    pub name: String,
    pub department: String,
    pub lecture_hours: u32,
    pub tutorial_hours: u32,
    /// Weekly practical hours; drives how many lab lessons the loader
    /// creates for this course.
    pub practical_hours: u32,
    pub credits: u32,
    #[serde(default)]
    pub lab_type: Option<LabType>,
}

/// A cohort of students that attends lessons together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentGroup {
    pub id: String,
    pub name: String,
    /// Headcount; drives room capacity demand and lab batching.
    pub size: u32,
    pub department: String,
    pub year: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(day: Weekday, start: (u32, u32), end: (u32, u32)) -> TimeSlot {
        TimeSlot {
            id: format!("{day}-{}:{:02}", start.0, start.1),
            day,
            start: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            end: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
            is_lab: false,
        }
    }

    #[test]
    fn overlap_requires_same_day() {
        let mon = slot(Weekday::Mon, (9, 0), (9, 50));
        let tue = slot(Weekday::Tue, (9, 0), (9, 50));
        assert!(!mon.overlaps(&tue));
    }

    #[test]
    fn partial_overlap_detected() {
        let a = slot(Weekday::Mon, (9, 0), (9, 50));
        let b = slot(Weekday::Mon, (9, 30), (10, 20));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn touching_slots_do_not_overlap_but_are_adjacent() {
        let a = slot(Weekday::Mon, (9, 0), (9, 50));
        let b = slot(Weekday::Mon, (9, 50), (10, 40));
        assert!(!a.overlaps(&b));
        assert!(a.is_back_to_back(&b));
        assert!(b.is_back_to_back(&a));
    }

    #[test]
    fn duration_and_start_hour() {
        let lab = TimeSlot {
            id: "lab".into(),
            day: Weekday::Fri,
            start: NaiveTime::from_hms_opt(13, 50, 0).unwrap(),
            end: NaiveTime::from_hms_opt(15, 30, 0).unwrap(),
            is_lab: true,
        };
        assert_eq!(lab.duration_minutes(), 100);
        assert_eq!(lab.start_hour(), 13);
    }
}
