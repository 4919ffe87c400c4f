//! Timegrid Scoring - incremental constraint evaluation
//!
//! The constraint catalogue lives here: every hard and soft rule of the
//! timetabling problem as an [`IncrementalConstraint`], combined into a
//! tuple [`ConstraintSet`] and driven by the [`TimetableScoreDirector`],
//! which keeps a cached score in sync through the
//! retract → mutate → insert protocol.

pub mod analysis;
pub mod constraint;
pub mod director;

#[cfg(test)]
mod test_utils;

pub use analysis::{ConstraintAnalysis, ConstraintMatch, ScoreAnalysis};
pub use constraint::{
    standard_catalogue, ConstraintResult, ConstraintSet, IncrementalConstraint,
    TimetableConstraints,
};
pub use director::TimetableScoreDirector;
