//! Teacher workload and timing constraints.
//!
//! The aggregate constraints (weekly hours, workday span, daily load) book
//! one score per teacher or teacher-day key and re-derive that key's
//! penalty from its bucket members on every change.

use chrono::Weekday;
use timegrid_core::{HardSoftScore, Timetable};

use super::index::{AggregateIndex, LessonScores};

/// Longest tolerated first-start to last-end stretch per teacher-day.
const WORKDAY_SPAN_LIMIT_MINUTES: i64 = 480;

/// Effective hours a teacher may take per day before the balance penalty.
const DAILY_LOAD_LIMIT_HOURS: i64 = 6;

/// Teaching assumed to be preferred before this hour.
const MORNING_CUTOFF_HOUR: u32 = 12;

const AFTERNOON_PENALTY: i64 = 5;

/// Classes at or after this hour are late classes.
const LATE_HOUR: u32 = 17;

/// A teacher's effective weekly hours must stay within their budget; the
/// penalty is the excess.
#[derive(Debug, Clone, Default)]
pub struct TeacherWeeklyHours {
    index: AggregateIndex<usize>,
}

impl TeacherWeeklyHours {
    pub fn new() -> Self {
        Self::default()
    }

    fn key_of(&self, solution: &Timetable, lesson: usize) -> Option<usize> {
        let l = &solution.lessons[lesson];
        l.slot?;
        Some(l.teacher())
    }

    fn key_penalty(&self, solution: &Timetable, members: &[usize]) -> HardSoftScore {
        let Some(&first) = members.first() else {
            return HardSoftScore::ZERO;
        };
        let budget = solution.teacher_of(&solution.lessons[first]).max_weekly_hours;
        let total: i64 = members
            .iter()
            .map(|&l| solution.effective_hours(&solution.lessons[l]))
            .sum();
        if total > budget {
            HardSoftScore::of_soft(-(total - budget))
        } else {
            HardSoftScore::ZERO
        }
    }
}

impl_aggregate_constraint!(TeacherWeeklyHours, "Teacher max weekly hours", soft);

/// A teacher's day from first start to last end should fit in eight
/// hours; every excess minute costs a soft point.
#[derive(Debug, Clone, Default)]
pub struct TeacherWorkdaySpan {
    index: AggregateIndex<(usize, Weekday)>,
}

impl TeacherWorkdaySpan {
    pub fn new() -> Self {
        Self::default()
    }

    fn key_of(&self, solution: &Timetable, lesson: usize) -> Option<(usize, Weekday)> {
        let l = &solution.lessons[lesson];
        let slot = &solution.slots[l.slot?];
        Some((l.teacher(), slot.day))
    }

    fn key_penalty(&self, solution: &Timetable, members: &[usize]) -> HardSoftScore {
        let mut first_start = None;
        let mut last_end = None;
        for &member in members {
            let Some(slot) = solution.slot_of(&solution.lessons[member]) else {
                continue;
            };
            first_start = Some(first_start.map_or(slot.start, |s: chrono::NaiveTime| s.min(slot.start)));
            last_end = Some(last_end.map_or(slot.end, |e: chrono::NaiveTime| e.max(slot.end)));
        }
        let (Some(start), Some(end)) = (first_start, last_end) else {
            return HardSoftScore::ZERO;
        };
        let span = (end - start).num_minutes();
        if span > WORKDAY_SPAN_LIMIT_MINUTES {
            HardSoftScore::of_soft(-(span - WORKDAY_SPAN_LIMIT_MINUTES))
        } else {
            HardSoftScore::ZERO
        }
    }
}

impl_aggregate_constraint!(TeacherWorkdaySpan, "Teacher workday span too long", soft);

/// Balance teacher daily load: effective hours over the daily limit are
/// penalized per excess hour.
#[derive(Debug, Clone, Default)]
pub struct TeacherDailyLoad {
    index: AggregateIndex<(usize, Weekday)>,
}

impl TeacherDailyLoad {
    pub fn new() -> Self {
        Self::default()
    }

    fn key_of(&self, solution: &Timetable, lesson: usize) -> Option<(usize, Weekday)> {
        let l = &solution.lessons[lesson];
        let slot = &solution.slots[l.slot?];
        Some((l.teacher(), slot.day))
    }

    fn key_penalty(&self, solution: &Timetable, members: &[usize]) -> HardSoftScore {
        let total: i64 = members
            .iter()
            .map(|&l| solution.effective_hours(&solution.lessons[l]))
            .sum();
        if total > DAILY_LOAD_LIMIT_HOURS {
            HardSoftScore::of_soft(-(total - DAILY_LOAD_LIMIT_HOURS))
        } else {
            HardSoftScore::ZERO
        }
    }
}

impl_aggregate_constraint!(TeacherDailyLoad, "Balance teacher daily load", soft);

/// Morning preference: afternoon starts cost a flat soft penalty.
#[derive(Debug, Clone, Default)]
pub struct TeacherTimePreference {
    state: LessonScores,
}

impl TeacherTimePreference {
    pub fn new() -> Self {
        Self::default()
    }

    fn penalty(&self, solution: &Timetable, lesson: usize) -> HardSoftScore {
        match solution.slot_of(&solution.lessons[lesson]) {
            Some(slot) if slot.start_hour() >= MORNING_CUTOFF_HOUR => {
                HardSoftScore::of_soft(-AFTERNOON_PENALTY)
            }
            _ => HardSoftScore::ZERO,
        }
    }
}

impl_uni_constraint!(TeacherTimePreference, "Teacher time preference", soft);

/// Evening teaching is discouraged.
#[derive(Debug, Clone, Default)]
pub struct LateClass {
    state: LessonScores,
}

impl LateClass {
    pub fn new() -> Self {
        Self::default()
    }

    fn penalty(&self, solution: &Timetable, lesson: usize) -> HardSoftScore {
        match solution.slot_of(&solution.lessons[lesson]) {
            Some(slot) if slot.start_hour() >= LATE_HOUR => -HardSoftScore::ONE_SOFT,
            _ => HardSoftScore::ZERO,
        }
    }
}

impl_uni_constraint!(LateClass, "Late class", soft);
