use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

use crate::Workout;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutDay {
    ChestBiceps,
    BackTriceps,
    Shoulders,
    Legs,
}

impl WorkoutDay {
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            WorkoutDay::ChestBiceps => "chest_biceps",
            WorkoutDay::BackTriceps => "back_triceps",
            WorkoutDay::Shoulders => "shoulders",
            WorkoutDay::Legs => "legs",
        }
    }

    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        WorkoutDay::iter().find(|day| day.id() == id)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            WorkoutDay::ChestBiceps => "Chest & Biceps",
            WorkoutDay::BackTriceps => "Back & Triceps",
            WorkoutDay::Shoulders => "Shoulders",
            WorkoutDay::Legs => "Legs",
        }
    }

    #[must_use]
    pub fn exercises(self) -> &'static [&'static str] {
        match self {
            WorkoutDay::ChestBiceps => &[
                "Incline Dumbbell Press",
                "Flat Barbell Bench Press",
                "Decline Machine Press",
                "Cable Crossovers",
                "Barbell Curls",
                "Dumbbell Hammer Curls",
                "Preacher Curls",
            ],
            WorkoutDay::BackTriceps => &[
                "Pull-ups",
                "Bent-over Rows",
                "Lat Pulldowns",
                "T-bar Rows",
                "Close-grip Bench Press",
                "Tricep Pushdowns",
                "Skull Crushers",
            ],
            WorkoutDay::Shoulders => &[
                "Overhead Press",
                "Dumbbell Lateral Raises",
                "Face Pulls",
                "Arnold Press",
                "Upright Rows",
            ],
            WorkoutDay::Legs => &[
                "Barbell Squats",
                "Leg Press",
                "Romanian Deadlifts",
                "Leg Extensions",
                "Hamstring Curls",
                "Calf Raises",
            ],
        }
    }

    #[must_use]
    pub fn available_exercises(self) -> Vec<String> {
        self.exercises().iter().map(ToString::to_string).collect()
    }

    fn nth(index: usize) -> Self {
        match index % 4 {
            0 => WorkoutDay::ChestBiceps,
            1 => WorkoutDay::BackTriceps,
            2 => WorkoutDay::Shoulders,
            _ => WorkoutDay::Legs,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisciplineMode {
    /// Four training days from Monday to Thursday
    Intense,
    /// The four training days rotate without rest days
    #[default]
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramDay {
    /// Starting at 1
    pub day: u32,
    /// Starting at 1
    pub week: u32,
    pub workout: Option<WorkoutDay>,
}

#[must_use]
pub fn program_day(start: NaiveDate, today: NaiveDate, mode: DisciplineMode) -> Option<ProgramDay> {
    let index = usize::try_from((today - start).num_days()).ok()?;
    let workout = match mode {
        DisciplineMode::Normal => Some(WorkoutDay::nth(index)),
        DisciplineMode::Intense => match today.weekday() {
            Weekday::Mon => Some(WorkoutDay::ChestBiceps),
            Weekday::Tue => Some(WorkoutDay::BackTriceps),
            Weekday::Wed => Some(WorkoutDay::Shoulders),
            Weekday::Thu => Some(WorkoutDay::Legs),
            Weekday::Fri | Weekday::Sat | Weekday::Sun => None,
        },
    };
    let day = u32::try_from(index).ok()? + 1;
    Some(ProgramDay {
        day,
        week: (day - 1) / 7 + 1,
        workout,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Performance {
    pub weight: f64,
    pub reps: u32,
}

/// The heaviest set of the most recent workout containing sets of the exercise.
#[must_use]
pub fn previous_performance(workouts: &[Workout], exercise: &str) -> Option<Performance> {
    workouts.iter().rev().find_map(|workout| {
        let sets = &workout
            .exercises
            .iter()
            .find(|e| e.name == exercise)?
            .sets;
        sets.iter()
            .fold(None::<Performance>, |best, set| match best {
                Some(best) if best.weight >= set.weight => Some(best),
                _ => Some(Performance {
                    weight: set.weight,
                    reps: set.reps,
                }),
            })
    })
}

/// Length of the program in weeks.
pub const PROGRAM_WEEKS: u32 = 38;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramProgress {
    /// Full weeks since the start of the program
    pub weeks_completed: u32,
    /// Number of completed cycles of four workouts
    pub discipline_streak: u32,
    /// Workout days trained since Monday of the current week
    pub done_this_week: Vec<WorkoutDay>,
    pub next_workout: WorkoutDay,
}

impl ProgramProgress {
    #[must_use]
    pub fn new(start: Option<NaiveDate>, workouts: &[Workout], today: NaiveDate) -> Self {
        let next_workout = WorkoutDay::nth(workouts.len());
        let Some(start) = start else {
            return Self {
                weeks_completed: 0,
                discipline_streak: 0,
                done_this_week: vec![],
                next_workout,
            };
        };

        let week_start = today
            .checked_sub_days(Days::new(u64::from(
                today.weekday().num_days_from_monday(),
            )))
            .unwrap_or(today);
        let done_this_week = WorkoutDay::iter()
            .filter(|day| {
                workouts.iter().any(|workout| {
                    workout.category == *day && workout.timestamp.date_naive() >= week_start
                })
            })
            .collect();

        Self {
            weeks_completed: u32::try_from((today - start).num_weeks()).unwrap_or(0),
            discipline_streak: u32::try_from(workouts.len() / 4).unwrap_or(u32::MAX),
            done_this_week,
            next_workout,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.weeks_completed >= PROGRAM_WEEKS
    }
}
