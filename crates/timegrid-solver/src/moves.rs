//! Moves over the assignment vector.
//!
//! Two neighborhood shapes: reassigning one lesson's room and/or slot
//! (`ChangeMove`) and exchanging the full assignment of two lessons of
//! compatible session type (`SwapMove`). Applying a move yields the
//! resulting score; undo is applying the inverse captured beforehand.

use timegrid_core::{HardSoftScore, Timetable};
use timegrid_scoring::{ConstraintSet, TimetableScoreDirector};

/// Reassigns one lesson's planning variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeMove {
    pub lesson: usize,
    pub room: Option<usize>,
    pub slot: Option<usize>,
}

impl ChangeMove {
    pub fn new(lesson: usize, room: Option<usize>, slot: Option<usize>) -> Self {
        ChangeMove { lesson, room, slot }
    }
}

/// Exchanges the (room, slot) pairs of two lessons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapMove {
    pub a: usize,
    pub b: usize,
}

impl SwapMove {
    pub fn new(a: usize, b: usize) -> Self {
        SwapMove { a, b }
    }
}

/// A candidate step in the local search neighborhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Change(ChangeMove),
    Swap(SwapMove),
}

impl Move {
    /// True when applying the move would actually change the solution and
    /// the move respects session-type compatibility.
    pub fn is_doable(&self, solution: &Timetable) -> bool {
        match *self {
            Move::Change(ChangeMove { lesson, room, slot }) => {
                let l = &solution.lessons[lesson];
                l.room != room || l.slot != slot
            }
            Move::Swap(SwapMove { a, b }) => {
                if a == b {
                    return false;
                }
                let (la, lb) = (&solution.lessons[a], &solution.lessons[b]);
                // Swapping a lab into a theory placement (or vice versa)
                // only trades one typing violation for another.
                if la.requires_lab_room() != lb.requires_lab_room() {
                    return false;
                }
                la.room != lb.room || la.slot != lb.slot
            }
        }
    }

    /// The move that restores the current state, captured before applying.
    pub fn inverse(&self, solution: &Timetable) -> Move {
        match *self {
            Move::Change(ChangeMove { lesson, .. }) => {
                let l = &solution.lessons[lesson];
                Move::Change(ChangeMove::new(lesson, l.room, l.slot))
            }
            Move::Swap(swap) => Move::Swap(swap),
        }
    }

    /// Applies the move through the director's change protocol and returns
    /// the resulting score.
    pub fn apply<C: ConstraintSet>(
        &self,
        director: &mut TimetableScoreDirector<C>,
    ) -> HardSoftScore {
        match *self {
            Move::Change(ChangeMove { lesson, room, slot }) => director.do_change(lesson, |s| {
                s.lessons[lesson].room = room;
                s.lessons[lesson].slot = slot;
            }),
            Move::Swap(SwapMove { a, b }) => {
                let (room_a, slot_a, room_b, slot_b) = {
                    let solution = director.working();
                    let (la, lb) = (&solution.lessons[a], &solution.lessons[b]);
                    (la.room, la.slot, lb.room, lb.slot)
                };
                director.do_change(a, |s| {
                    s.lessons[a].room = room_b;
                    s.lessons[a].slot = slot_b;
                });
                director.do_change(b, |s| {
                    s.lessons[b].room = room_a;
                    s.lessons[b].slot = slot_a;
                })
            }
        }
    }

    /// Lessons touched by this move.
    pub fn lessons(&self) -> impl Iterator<Item = usize> {
        let (first, second) = match *self {
            Move::Change(ChangeMove { lesson, .. }) => (lesson, None),
            Move::Swap(SwapMove { a, b }) => (a, Some(b)),
        };
        std::iter::once(first).chain(second)
    }
}
