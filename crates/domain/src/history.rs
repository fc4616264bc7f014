use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::Workout;

/// Number of weeks kept per exercise.
pub const HISTORY_WEEKS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedSet {
    pub reps: u32,
    /// Kilograms
    pub weight: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSets {
    /// Rotating between 1 and 3
    pub week_number: u32,
    pub start_date: NaiveDate,
    pub sets: Vec<LoggedSet>,
    pub program_week: u32,
}

impl WeekSets {
    #[must_use]
    pub fn new(program_week: u32, start_date: NaiveDate) -> Self {
        let program_week = program_week.max(1);
        Self {
            week_number: (program_week - 1) % 3 + 1,
            start_date,
            sets: vec![],
            program_week,
        }
    }
}

/// The sets of the last three program weeks for each exercise.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetHistory(BTreeMap<String, VecDeque<WeekSets>>);

impl SetHistory {
    pub fn record(
        &mut self,
        exercise: &str,
        program_week: u32,
        week_start: NaiveDate,
        set: LoggedSet,
    ) {
        let weeks = self.0.entry(exercise.to_string()).or_default();
        let program_week = program_week.max(1);

        if !weeks
            .back()
            .is_some_and(|week| week.program_week == program_week)
        {
            if weeks.len() == HISTORY_WEEKS {
                weeks.pop_front();
            }
            weeks.push_back(WeekSets::new(program_week, week_start));
        }

        if let Some(week) = weeks.back_mut() {
            week.sets.push(set);
        }
    }

    /// Oldest week first.
    pub fn weeks(&self, exercise: &str) -> impl DoubleEndedIterator<Item = &WeekSets> {
        self.0.get(exercise).into_iter().flatten()
    }

    #[must_use]
    pub fn last_week_sets(&self, exercise: &str, week_number: u32) -> Option<&WeekSets> {
        self.weeks(exercise)
            .rev()
            .find(|week| week.week_number == week_number)
    }

    pub fn exercises(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    #[must_use]
    pub fn has_sets(&self, exercise: &str) -> bool {
        self.weeks(exercise).any(|week| !week.sets.is_empty())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalBest {
    pub exercise: String,
    pub weight: f64,
    pub reps: u32,
    pub achieved_at: DateTime<Utc>,
}

impl PersonalBest {
    #[allow(clippy::float_cmp)]
    fn beats(&self, weight: f64, reps: u32) -> bool {
        weight > self.weight || (weight == self.weight && reps > self.reps)
    }

    #[must_use]
    pub fn from_workouts(workouts: &[Workout], exercise: &str) -> Option<PersonalBest> {
        let mut best: Option<PersonalBest> = None;
        for workout in workouts {
            for set in workout
                .exercises
                .iter()
                .filter(|e| e.name == exercise)
                .flat_map(|e| &e.sets)
            {
                if best.as_ref().is_none_or(|b| b.beats(set.weight, set.reps)) {
                    best = Some(PersonalBest {
                        exercise: exercise.to_string(),
                        weight: set.weight,
                        reps: set.reps,
                        achieved_at: workout.timestamp,
                    });
                }
            }
        }
        best
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalBests(BTreeMap<String, PersonalBest>);

impl PersonalBests {
    /// Returns true if the set is a new personal best.
    pub fn offer(&mut self, exercise: &str, weight: f64, reps: u32, at: DateTime<Utc>) -> bool {
        if self
            .0
            .get(exercise)
            .is_some_and(|best| !best.beats(weight, reps))
        {
            return false;
        }
        self.0.insert(
            exercise.to_string(),
            PersonalBest {
                exercise: exercise.to_string(),
                weight,
                reps,
                achieved_at: at,
            },
        );
        true
    }

    #[must_use]
    pub fn get(&self, exercise: &str) -> Option<&PersonalBest> {
        self.0.get(exercise)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PersonalBest> {
        self.0.values()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
