//! Shared fixtures for solver tests.

use std::collections::BTreeMap;

use chrono::{NaiveTime, Weekday};
use timegrid_config::{PriorityLabs, ProblemConfig};
use timegrid_core::{
    Course, LabBatch, LabType, Lesson, Room, SessionType, StudentGroup, Teacher, TimeSlot,
    Timetable,
};
use timegrid_scoring::{standard_catalogue, TimetableConstraints, TimetableScoreDirector};

fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

pub(crate) fn campus_config() -> ProblemConfig {
    let mut config = ProblemConfig::campus_default();
    config.priority_labs = PriorityLabs::new(BTreeMap::from([(
        "CS301".to_string(),
        vec!["Systems Lab".to_string(), "Networks Lab".to_string()],
    )]));
    config
}

/// Five rooms, eight slots, two CS101 theory sessions (unassigned).
pub(crate) fn small_problem() -> Timetable {
    let room = |id: &str, name: &str, block: &str, capacity, is_lab| Room {
        id: id.into(),
        name: name.into(),
        block: block.into(),
        capacity,
        is_lab,
        lab_type: is_lab.then_some(LabType::Computer),
    };
    let slot = |id: &str, day, start, end, is_lab| TimeSlot {
        id: id.into(),
        day,
        start,
        end,
        is_lab,
    };
    let rooms = vec![
        room("R1", "Room A1", "A", 70, false),
        room("R2", "Room A2", "A", 70, false),
        room("L1", "Systems Lab", "A", 35, true),
        room("L2", "Networks Lab", "B", 35, true),
        room("L3", "Robotics Lab", "C", 40, true),
    ];
    let slots = vec![
        slot("TUE-T1", Weekday::Tue, at(9, 0), at(9, 50), false),
        slot("TUE-T2", Weekday::Tue, at(10, 0), at(10, 50), false),
        slot("WED-T1", Weekday::Wed, at(9, 0), at(9, 50), false),
        slot("WED-T2", Weekday::Wed, at(10, 0), at(10, 50), false),
        slot("TUE-L1", Weekday::Tue, at(9, 0), at(10, 40), true),
        slot("WED-L1", Weekday::Wed, at(9, 0), at(10, 40), true),
        slot("TUE-L2", Weekday::Tue, at(13, 50), at(15, 30), true),
        slot("WED-T3", Weekday::Wed, at(11, 0), at(11, 50), false),
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
            lecture_hours: 2,
            tutorial_hours: 0,
            practical_hours: 0,
            credits: 3,
            lab_type: None,
        },
        Course {
            id: "C2".into(),
            code: "CS301".into(),
            name: "Operating Systems".into(),
            department: "CSE".into(),
            lecture_hours: 1,
            tutorial_hours: 0,
            practical_hours: 2,
            credits: 4,
            lab_type: Some(LabType::Computer),
        },
    ];
    let groups = vec![StudentGroup {
        id: "G1".into(),
        name: "CSE-A".into(),
        size: 70,
        department: "CSE".into(),
        year: 2,
    }];
    let lessons = vec![
        Lesson::new("CS101-LEC-1", 0, 0, 0, SessionType::Lecture, None).unwrap(),
        Lesson::new("CS101-LEC-2", 1, 0, 0, SessionType::Lecture, None).unwrap(),
    ];
    Timetable::new(rooms, slots, teachers, courses, groups, lessons).unwrap()
}

/// `small_problem` extended with the CS301 batched labs and lecture.
pub(crate) fn lab_problem() -> Timetable {
    let mut problem = small_problem();
    problem.lessons.push(
        Lesson::new("CS301-LEC-1", 1, 1, 0, SessionType::Lecture, None).unwrap(),
    );
    problem.lessons.push(
        Lesson::new("CS301-LAB-B1", 0, 1, 0, SessionType::Lab, Some(LabBatch::B1)).unwrap(),
    );
    problem.lessons.push(
        Lesson::new("CS301-LAB-B2", 1, 1, 0, SessionType::Lab, Some(LabBatch::B2)).unwrap(),
    );
    problem
}

pub(crate) fn small_scoring() -> TimetableScoreDirector<TimetableConstraints> {
    TimetableScoreDirector::new(small_problem(), standard_catalogue(&campus_config()))
}
