//! Weekly slot-grid builder.
//!
//! Loaders can use this to materialize the standard campus grid instead of
//! listing every `TimeSlot` by hand: hourly 50-minute theory periods from
//! 08:00 to 18:50 and six 100-minute lab periods per day.

use chrono::{NaiveTime, Weekday};
use timegrid_core::TimeSlot;

/// Period templates that expand into one `TimeSlot` per (day, period).
#[derive(Debug, Clone)]
pub struct SlotGrid {
    theory_periods: Vec<(NaiveTime, NaiveTime)>,
    lab_periods: Vec<(NaiveTime, NaiveTime)>,
}

fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

fn day_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MON",
        Weekday::Tue => "TUE",
        Weekday::Wed => "WED",
        Weekday::Thu => "THU",
        Weekday::Fri => "FRI",
        Weekday::Sat => "SAT",
        Weekday::Sun => "SUN",
    }
}

impl SlotGrid {
    /// The standard campus grid.
    pub fn standard() -> Self {
        SlotGrid {
            theory_periods: (8..=18).map(|h| (at(h, 0), at(h, 50))).collect(),
            lab_periods: vec![
                (at(8, 0), at(9, 40)),
                (at(9, 50), at(11, 30)),
                (at(11, 50), at(13, 30)),
                (at(13, 50), at(15, 30)),
                (at(15, 50), at(17, 30)),
                (at(17, 30), at(19, 10)),
            ],
        }
    }

    /// Expands the templates over the given days.
    pub fn build(&self, days: &[Weekday]) -> Vec<TimeSlot> {
        let mut slots = Vec::with_capacity(days.len() * (self.theory_periods.len() + self.lab_periods.len()));
        for &day in days {
            for (i, &(start, end)) in self.theory_periods.iter().enumerate() {
                slots.push(TimeSlot {
                    id: format!("{}-T{}", day_code(day), i + 1),
                    day,
                    start,
                    end,
                    is_lab: false,
                });
            }
            for (i, &(start, end)) in self.lab_periods.iter().enumerate() {
                slots.push(TimeSlot {
                    id: format!("{}-L{}", day_code(day), i + 1),
                    day,
                    start,
                    end,
                    is_lab: true,
                });
            }
        }
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_grid_shape() {
        let grid = SlotGrid::standard();
        let days = [Weekday::Mon, Weekday::Tue];
        let slots = grid.build(&days);
        // 11 theory + 6 lab periods per day
        assert_eq!(slots.len(), 2 * 17);

        let theory: Vec<_> = slots.iter().filter(|s| !s.is_lab).collect();
        let labs: Vec<_> = slots.iter().filter(|s| s.is_lab).collect();
        assert!(theory.iter().all(|s| s.duration_minutes() == 50));
        assert!(labs.iter().all(|s| s.duration_minutes() == 100));
    }

    #[test]
    fn slot_ids_are_unique() {
        let slots = SlotGrid::standard().build(&[Weekday::Mon, Weekday::Sat]);
        let mut ids: Vec<_> = slots.iter().map(|s| s.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), slots.len());
    }
}
