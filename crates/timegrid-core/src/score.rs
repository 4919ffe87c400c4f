//! HardSoftScore - two-level score with hard and soft constraints

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A score with separate hard and soft constraint levels.
///
/// Hard constraints must be satisfied for a timetable to be feasible.
/// Soft constraints rank feasible timetables against each other.
///
/// When comparing scores:
/// 1. Hard scores are compared first
/// 2. Soft scores are only compared when hard scores are equal
///
/// Constraint violations contribute negative amounts, rewards positive
/// amounts; `0hard/0soft` is a perfect score.
///
/// # Examples
///
/// ```
/// use timegrid_core::HardSoftScore;
///
/// let score1 = HardSoftScore::of(-1, -100); // 1 hard constraint broken
/// let score2 = HardSoftScore::of(0, -200);  // feasible but poor soft score
///
/// // Feasible solutions are always better than infeasible ones
/// assert!(score2 > score1);
///
/// let score3 = HardSoftScore::of(0, -50);
/// assert!(score3 > score2);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct HardSoftScore {
    hard: i64,
    soft: i64,
}

impl HardSoftScore {
    /// The zero score.
    pub const ZERO: HardSoftScore = HardSoftScore { hard: 0, soft: 0 };

    /// One hard constraint point.
    pub const ONE_HARD: HardSoftScore = HardSoftScore { hard: 1, soft: 0 };

    /// One soft constraint point.
    pub const ONE_SOFT: HardSoftScore = HardSoftScore { hard: 0, soft: 1 };

    /// Creates a new HardSoftScore.
    #[inline]
    pub const fn of(hard: i64, soft: i64) -> Self {
        HardSoftScore { hard, soft }
    }

    /// Creates a score with only a hard component.
    #[inline]
    pub const fn of_hard(hard: i64) -> Self {
        HardSoftScore { hard, soft: 0 }
    }

    /// Creates a score with only a soft component.
    #[inline]
    pub const fn of_soft(soft: i64) -> Self {
        HardSoftScore { hard: 0, soft }
    }

    /// Returns the hard score component.
    #[inline]
    pub const fn hard(&self) -> i64 {
        self.hard
    }

    /// Returns the soft score component.
    #[inline]
    pub const fn soft(&self) -> i64 {
        self.soft
    }

    /// Returns true if all hard constraints are satisfied.
    #[inline]
    pub const fn is_feasible(&self) -> bool {
        self.hard >= 0
    }

    /// Multiplies both components by an integer weight.
    #[inline]
    pub const fn multiply(&self, multiplicand: i64) -> Self {
        HardSoftScore {
            hard: self.hard * multiplicand,
            soft: self.soft * multiplicand,
        }
    }
}

impl Ord for HardSoftScore {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.hard.cmp(&other.hard) {
            Ordering::Equal => self.soft.cmp(&other.soft),
            other => other,
        }
    }
}

impl PartialOrd for HardSoftScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Add for HardSoftScore {
    type Output = HardSoftScore;

    #[inline]
    fn add(self, rhs: HardSoftScore) -> HardSoftScore {
        HardSoftScore::of(self.hard + rhs.hard, self.soft + rhs.soft)
    }
}

impl Sub for HardSoftScore {
    type Output = HardSoftScore;

    #[inline]
    fn sub(self, rhs: HardSoftScore) -> HardSoftScore {
        HardSoftScore::of(self.hard - rhs.hard, self.soft - rhs.soft)
    }
}

impl Neg for HardSoftScore {
    type Output = HardSoftScore;

    #[inline]
    fn neg(self) -> HardSoftScore {
        HardSoftScore::of(-self.hard, -self.soft)
    }
}

impl std::iter::Sum for HardSoftScore {
    fn sum<I: Iterator<Item = HardSoftScore>>(iter: I) -> HardSoftScore {
        iter.fold(HardSoftScore::ZERO, |acc, s| acc + s)
    }
}

impl fmt::Debug for HardSoftScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HardSoftScore({}, {})", self.hard, self.soft)
    }
}

impl fmt::Display for HardSoftScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}hard/{}soft", self.hard, self.soft)
    }
}

/// Error when parsing a score from its string representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreParseError {
    pub message: String,
}

impl fmt::Display for ScoreParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "score parse error: {}", self.message)
    }
}

impl std::error::Error for ScoreParseError {}

impl FromStr for HardSoftScore {
    type Err = ScoreParseError;

    /// Parses the `{hard}hard/{soft}soft` form produced by `Display`.
    fn from_str(s: &str) -> Result<Self, ScoreParseError> {
        let mut parts = s.splitn(2, '/');
        let hard_part = parts.next().unwrap_or_default().trim();
        let soft_part = parts.next().unwrap_or_default().trim();

        let parse_level = |part: &str, suffix: &str| -> Result<i64, ScoreParseError> {
            let number = part.strip_suffix(suffix).ok_or_else(|| ScoreParseError {
                message: format!("expected '{suffix}' suffix in '{part}'"),
            })?;
            number.parse::<i64>().map_err(|e| ScoreParseError {
                message: format!("invalid number '{number}': {e}"),
            })
        };

        Ok(HardSoftScore::of(
            parse_level(hard_part, "hard")?,
            parse_level(soft_part, "soft")?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feasibility() {
        assert!(HardSoftScore::ZERO.is_feasible());
        assert!(HardSoftScore::of(0, -500).is_feasible());
        assert!(!HardSoftScore::of(-1, 0).is_feasible());
    }

    #[test]
    fn lexicographic_ordering() {
        let infeasible = HardSoftScore::of(-1, 0);
        let poor_soft = HardSoftScore::of(0, -9999);
        let good = HardSoftScore::of(0, -1);
        assert!(poor_soft > infeasible);
        assert!(good > poor_soft);
        assert_eq!(good.cmp(&good), Ordering::Equal);
    }

    #[test]
    fn arithmetic() {
        let a = HardSoftScore::of(-2, -30);
        let b = HardSoftScore::of(-1, 10);
        assert_eq!(a + b, HardSoftScore::of(-3, -20));
        assert_eq!(a - b, HardSoftScore::of(-1, -40));
        assert_eq!(-b, HardSoftScore::of(1, -10));
        assert_eq!(HardSoftScore::ONE_SOFT.multiply(-5), HardSoftScore::of(0, -5));
    }

    #[test]
    fn sum_of_contributions() {
        let total: HardSoftScore = [
            HardSoftScore::of_hard(-2),
            HardSoftScore::of_soft(-7),
            HardSoftScore::of(1, 1),
        ]
        .into_iter()
        .sum();
        assert_eq!(total, HardSoftScore::of(-1, -6));
    }

    #[test]
    fn display_round_trip() {
        let score = HardSoftScore::of(-3, -120);
        assert_eq!(score.to_string(), "-3hard/-120soft");
        assert_eq!("-3hard/-120soft".parse::<HardSoftScore>().unwrap(), score);
        assert_eq!("0hard/0soft".parse::<HardSoftScore>().unwrap(), HardSoftScore::ZERO);
    }

    #[test]
    fn serde_round_trip() {
        let score = HardSoftScore::of(-2, -7);
        let json = serde_json::to_string(&score).unwrap();
        let back: HardSoftScore = serde_json::from_str(&json).unwrap();
        assert_eq!(back, score);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("0hard".parse::<HardSoftScore>().is_err());
        assert!("0/0".parse::<HardSoftScore>().is_err());
        assert!("xhard/0soft".parse::<HardSoftScore>().is_err());
    }
}
