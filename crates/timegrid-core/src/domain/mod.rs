//! Domain model for academic timetabling.
//!
//! The facts (rooms, time slots, teachers, courses, student groups) are
//! immutable after load. `Lesson` is the only planning entity: its `room`
//! and `slot` fields are the planning variables, everything else is fixed
//! at creation. `Timetable` aggregates facts, lessons and the current score.

mod facts;
mod lesson;
mod timetable;

pub use facts::{Course, LabType, Room, StudentGroup, Teacher, TimeSlot};
pub use lesson::{LabBatch, Lesson, SessionType};
pub use timetable::Timetable;
