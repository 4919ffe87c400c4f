//! Shared fixtures for constraint and director tests.

use std::collections::BTreeMap;

use chrono::{NaiveTime, Weekday};
use timegrid_config::{PriorityLabs, ProblemConfig};
use timegrid_core::{
    Course, LabBatch, LabType, Lesson, Room, SessionType, StudentGroup, Teacher, TimeSlot,
    Timetable,
};

fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn slot(id: &str, day: Weekday, start: NaiveTime, end: NaiveTime, is_lab: bool) -> TimeSlot {
    TimeSlot {
        id: id.into(),
        day,
        start,
        end,
        is_lab,
    }
}

pub(crate) fn fixture_facts() -> (
    Vec<Room>,
    Vec<TimeSlot>,
    Vec<Teacher>,
    Vec<Course>,
    Vec<StudentGroup>,
) {
    let rooms = vec![
        Room {
            id: "R1".into(),
            name: "Room A1".into(),
            block: "A".into(),
            capacity: 70,
            is_lab: false,
            lab_type: None,
        },
        Room {
            id: "R2".into(),
            name: "Room A2".into(),
            block: "A".into(),
            capacity: 70,
            is_lab: false,
            lab_type: None,
        },
        Room {
            id: "L1".into(),
            name: "Systems Lab".into(),
            block: "A".into(),
            capacity: 35,
            is_lab: true,
            lab_type: Some(LabType::Computer),
        },
        Room {
            id: "L2".into(),
            name: "Networks Lab".into(),
            block: "B".into(),
            capacity: 35,
            is_lab: true,
            lab_type: Some(LabType::Computer),
        },
        Room {
            id: "L3".into(),
            name: "Robotics Lab".into(),
            block: "B".into(),
            capacity: 40,
            is_lab: true,
            lab_type: Some(LabType::Core),
        },
    ];
    let slots = vec![
        slot("MON-T1", Weekday::Mon, at(9, 0), at(9, 50), false),
        slot("MON-T2", Weekday::Mon, at(9, 30), at(10, 20), false),
        slot("MON-T3", Weekday::Mon, at(9, 50), at(10, 40), false),
        slot("TUE-T1", Weekday::Tue, at(9, 0), at(9, 50), false),
        slot("MON-L1", Weekday::Mon, at(9, 0), at(10, 40), true),
        slot("TUE-L1", Weekday::Tue, at(9, 0), at(10, 40), true),
        slot("MON-T4", Weekday::Mon, at(12, 0), at(12, 50), false),
        slot("MON-T5", Weekday::Mon, at(17, 0), at(17, 50), false),
    ];
    let teachers = vec![
        Teacher {
            id: "T1".into(),
            name: "Dr. Iyer".into(),
            max_weekly_hours: 21,
        },
        Teacher {
            id: "T2".into(),
            name: "Dr. Rao".into(),
            max_weekly_hours: 21,
        },
    ];
    let courses = vec![
        Course {
            id: "C1".into(),
            code: "CS101".into(),
            name: "Programming".into(),
            department: "CSE".into(),
            lecture_hours: 3,
            tutorial_hours: 1,
            practical_hours: 0,
            credits: 4,
            lab_type: None,
        },
        Course {
            id: "C2".into(),
            code: "CS301".into(),
            name: "Operating Systems".into(),
            department: "CSE".into(),
            lecture_hours: 3,
            tutorial_hours: 0,
            practical_hours: 2,
            credits: 4,
            lab_type: Some(LabType::Computer),
        },
        Course {
            id: "C3".into(),
            code: "ME101".into(),
            name: "Thermodynamics".into(),
            department: "MECH".into(),
            lecture_hours: 3,
            tutorial_hours: 1,
            practical_hours: 0,
            credits: 4,
            lab_type: None,
        },
    ];
    let groups = vec![
        StudentGroup {
            id: "G1".into(),
            name: "CSE-A".into(),
            size: 70,
            department: "CSE".into(),
            year: 2,
        },
        StudentGroup {
            id: "G2".into(),
            name: "MECH-A".into(),
            size: 30,
            department: "MECH".into(),
            year: 2,
        },
    ];
    (rooms, slots, teachers, courses, groups)
}

pub(crate) fn build(lessons: Vec<Lesson>) -> Timetable {
    let (rooms, slots, teachers, courses, groups) = fixture_facts();
    Timetable::new(rooms, slots, teachers, courses, groups, lessons).unwrap()
}

/// Two unassigned CS101 sessions for teacher T1 and group CSE-A.
pub(crate) fn fixture() -> Timetable {
    build(vec![
        Lesson::new("CS101-LEC-1", 0, 0, 0, SessionType::Lecture, None).unwrap(),
        Lesson::new("CS101-TUT-1", 0, 0, 0, SessionType::Tutorial, None).unwrap(),
    ])
}

/// B1/B2 labs of CS301 plus a full-group CS101 lecture, all for CSE-A.
pub(crate) fn fixture_with_batched_labs() -> Timetable {
    build(vec![
        Lesson::new("CS301-LAB-B1", 0, 1, 0, SessionType::Lab, Some(LabBatch::B1)).unwrap(),
        Lesson::new("CS301-LAB-B2", 1, 1, 0, SessionType::Lab, Some(LabBatch::B2)).unwrap(),
        Lesson::new("CS101-LEC-1", 0, 0, 0, SessionType::Lecture, None).unwrap(),
    ])
}

/// Campus defaults plus a priority-lab mapping for CS301.
pub(crate) fn campus_config() -> ProblemConfig {
    let mut config = ProblemConfig::campus_default();
    config.priority_labs = PriorityLabs::new(BTreeMap::from([(
        "CS301".to_string(),
        vec!["Systems Lab".to_string(), "Networks Lab".to_string()],
    )]));
    config
}
