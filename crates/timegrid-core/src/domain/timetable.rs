//! The `Timetable` aggregate: facts, lessons and the current score.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};
use crate::score::HardSoftScore;

use super::facts::{Course, Room, StudentGroup, Teacher, TimeSlot};
use super::lesson::Lesson;

/// Problem and solution in one: owns the immutable fact lists and the
/// mutable lesson list. Constructed once per run with all lessons
/// unassigned; the solver mutates the lessons' planning variables in place
/// and stamps `score` when it reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timetable {
    pub rooms: Vec<Room>,
    pub slots: Vec<TimeSlot>,
    pub teachers: Vec<Teacher>,
    pub courses: Vec<Course>,
    pub groups: Vec<StudentGroup>,
    pub lessons: Vec<Lesson>,
    #[serde(default)]
    pub score: Option<HardSoftScore>,
}

impl Timetable {
    /// Builds a timetable and fail-fast validates referential integrity:
    /// every lesson's fact references and any pre-set planning values must
    /// point at known facts. Broken references are loader defects, not
    /// solvable states.
    pub fn new(
        rooms: Vec<Room>,
        slots: Vec<TimeSlot>,
        teachers: Vec<Teacher>,
        courses: Vec<Course>,
        groups: Vec<StudentGroup>,
        lessons: Vec<Lesson>,
    ) -> Result<Self> {
        let timetable = Timetable {
            rooms,
            slots,
            teachers,
            courses,
            groups,
            lessons,
            score: None,
        };
        timetable.check_references()?;
        Ok(timetable)
    }

    fn check_references(&self) -> Result<()> {
        fn check(
            lesson: &Lesson,
            field: &'static str,
            index: usize,
            len: usize,
        ) -> Result<()> {
            if index >= len {
                return Err(TimetableError::DanglingReference {
                    lesson: lesson.id().to_string(),
                    field,
                    index,
                    len,
                });
            }
            Ok(())
        }

        for lesson in &self.lessons {
            check(lesson, "teacher", lesson.teacher(), self.teachers.len())?;
            check(lesson, "course", lesson.course(), self.courses.len())?;
            check(lesson, "group", lesson.group(), self.groups.len())?;
            if let Some(room) = lesson.room {
                check(lesson, "room", room, self.rooms.len())?;
            }
            if let Some(slot) = lesson.slot {
                check(lesson, "slot", slot, self.slots.len())?;
            }
        }
        Ok(())
    }

    pub fn room_of(&self, lesson: &Lesson) -> Option<&Room> {
        lesson.room.map(|r| &self.rooms[r])
    }

    pub fn slot_of(&self, lesson: &Lesson) -> Option<&TimeSlot> {
        lesson.slot.map(|s| &self.slots[s])
    }

    pub fn teacher_of(&self, lesson: &Lesson) -> &Teacher {
        &self.teachers[lesson.teacher()]
    }

    pub fn course_of(&self, lesson: &Lesson) -> &Course {
        &self.courses[lesson.course()]
    }

    pub fn group_of(&self, lesson: &Lesson) -> &StudentGroup {
        &self.groups[lesson.group()]
    }

    /// Effective teaching hours of a lesson: 2 in a lab slot, 1 in a theory
    /// slot, 0 while unassigned.
    pub fn effective_hours(&self, lesson: &Lesson) -> i64 {
        match self.slot_of(lesson) {
            None => 0,
            Some(slot) if slot.is_lab => 2,
            Some(_) => 1,
        }
    }

    pub fn unassigned_count(&self) -> usize {
        self.lessons.iter().filter(|l| !l.is_assigned()).count()
    }

    pub fn is_fully_assigned(&self) -> bool {
        self.unassigned_count() == 0
    }
}
