//! The `Lesson` planning entity.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};

/// What kind of session a lesson is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Lecture,
    Tutorial,
    Lab,
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionType::Lecture => write!(f, "lecture"),
            SessionType::Tutorial => write!(f, "tutorial"),
            SessionType::Lab => write!(f, "lab"),
        }
    }
}

/// Half-group identifier for split lab sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabBatch {
    B1,
    B2,
}

impl fmt::Display for LabBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabBatch::B1 => write!(f, "B1"),
            LabBatch::B2 => write!(f, "B2"),
        }
    }
}

/// One schedulable occurrence of a course for a group (or half-group batch).
///
/// The identity, fact references, session type and batch are fixed for the
/// lesson's lifetime; only the `room` and `slot` planning variables are
/// mutated, and only by the construction heuristic and the local search
/// engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    id: String,
    teacher: usize,
    course: usize,
    group: usize,
    session_type: SessionType,
    lab_batch: Option<LabBatch>,

    /// Planning variable: index into `Timetable::rooms`.
    pub room: Option<usize>,
    /// Planning variable: index into `Timetable::slots`.
    pub slot: Option<usize>,
}

impl Lesson {
    /// Creates an unassigned lesson.
    ///
    /// Rejects batch assignments on lecture/tutorial sessions: a batch id
    /// implies a lab session and full-group sessions never carry one.
    pub fn new(
        id: impl Into<String>,
        teacher: usize,
        course: usize,
        group: usize,
        session_type: SessionType,
        lab_batch: Option<LabBatch>,
    ) -> Result<Self> {
        let id = id.into();
        if lab_batch.is_some() && session_type != SessionType::Lab {
            return Err(TimetableError::DomainModel(format!(
                "lesson {id}: {session_type} session cannot carry batch {}",
                lab_batch.map(|b| b.to_string()).unwrap_or_default()
            )));
        }
        Ok(Lesson {
            id,
            teacher,
            course,
            group,
            session_type,
            lab_batch,
            room: None,
            slot: None,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn teacher(&self) -> usize {
        self.teacher
    }

    pub fn course(&self) -> usize {
        self.course
    }

    pub fn group(&self) -> usize {
        self.group
    }

    pub fn session_type(&self) -> SessionType {
        self.session_type
    }

    pub fn lab_batch(&self) -> Option<LabBatch> {
        self.lab_batch
    }

    /// True for lab sessions, which must land in lab rooms and lab slots.
    pub fn requires_lab_room(&self) -> bool {
        self.session_type == SessionType::Lab
    }

    /// True for lecture/tutorial sessions, which must land in theory rooms
    /// and theory slots.
    pub fn requires_theory_room(&self) -> bool {
        matches!(self.session_type, SessionType::Lecture | SessionType::Tutorial)
    }

    /// True when this lesson covers only half the group.
    pub fn is_split_batch(&self) -> bool {
        self.lab_batch.is_some()
    }

    /// Seats this lesson needs: the batch size for split labs, the full
    /// group headcount otherwise.
    pub fn required_capacity(&self, group_size: u32, lab_batch_size: u32) -> u32 {
        if self.is_split_batch() {
            lab_batch_size
        } else {
            group_size
        }
    }

    /// Both planning variables set.
    pub fn is_assigned(&self) -> bool {
        self.room.is_some() && self.slot.is_some()
    }
}
