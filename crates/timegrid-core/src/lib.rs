//! Timegrid Core - domain model and score types for academic timetabling
//!
//! This crate provides the fundamental types of the engine:
//! - `HardSoftScore` for representing solution quality
//! - Immutable problem facts (rooms, time slots, teachers, courses, groups)
//! - The `Lesson` planning entity and the `Timetable` aggregate

pub mod domain;
pub mod error;
pub mod score;

pub use domain::{
    Course, LabBatch, LabType, Lesson, Room, SessionType, StudentGroup, Teacher, TimeSlot,
    Timetable,
};
pub use error::TimetableError;
pub use score::{HardSoftScore, ScoreParseError};
