//! Per-constraint score breakdown for diagnostic reporting.
//!
//! External exporters consume this to explain a solution: which constraint
//! fired, how severe it is, which lessons are involved.

use serde::Serialize;
use timegrid_core::HardSoftScore;

/// One violation (or reward) instance: the offending lessons by id and the
/// score contribution of this match.
#[derive(Debug, Clone, Serialize)]
pub struct ConstraintMatch {
    pub lessons: Vec<String>,
    pub score: HardSoftScore,
}

impl ConstraintMatch {
    pub fn of(lessons: Vec<String>, score: HardSoftScore) -> Self {
        ConstraintMatch { lessons, score }
    }
}

/// Aggregated view of a single constraint over a solution.
#[derive(Debug, Clone, Serialize)]
pub struct ConstraintAnalysis {
    pub name: &'static str,
    pub hard: bool,
    pub score: HardSoftScore,
    pub matches: Vec<ConstraintMatch>,
}

impl ConstraintAnalysis {
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }
}

/// Full score explanation: the total plus the per-constraint breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreAnalysis {
    pub score: HardSoftScore,
    pub constraints: Vec<ConstraintAnalysis>,
}

impl ScoreAnalysis {
    /// Constraints that actually contributed, worst hard impact first.
    pub fn violated(&self) -> Vec<&ConstraintAnalysis> {
        let mut violated: Vec<_> = self
            .constraints
            .iter()
            .filter(|c| c.score != HardSoftScore::ZERO)
            .collect();
        violated.sort_by_key(|c| (c.score.hard(), c.score.soft()));
        violated
    }
}
