use chrono::{DateTime, Days, NaiveDate, Utc};
use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::{
    DisciplineMode, LoggedSet, PersonalBest, PersonalBests, ProgramDay, ProgramProgress, ReadError,
    SetHistory, SetRecord, StorageError, UpdateError, UserID, UserMetrics, Workout, WorkoutID,
    program_day,
};

#[allow(async_fn_in_trait)]
pub trait AppStateRepository {
    async fn read_state(&self, user: &UserID) -> Result<Option<AppState>, ReadError>;
    async fn write_state(&self, user: &UserID, state: &AppState) -> Result<(), UpdateError>;
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppState {
    pub is_onboarded: bool,
    pub discipline_mode: DisciplineMode,
    pub user_metrics: UserMetrics,
    pub start_date: Option<NaiveDate>,
    pub workouts: Vec<Workout>,
    pub set_history: SetHistory,
    pub personal_bests: PersonalBests,
}

/// Holds the state of the signed-in user and writes every change through to the repository.
///
/// Changes are applied locally first. A failed write is logged and the local state is kept.
pub struct Store<R> {
    repository: R,
    user: Option<UserID>,
    state: AppState,
}

impl<R: AppStateRepository> Store<R> {
    #[must_use]
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            user: None,
            state: AppState::default(),
        }
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserID> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Loads the state of the user, or the initial state for a new user.
    pub async fn sign_in(&mut self, user: UserID) -> Result<(), ReadError> {
        if self.user.as_ref() == Some(&user) {
            return Ok(());
        }
        let state = match self.repository.read_state(&user).await {
            Ok(state) => state,
            Err(err) => {
                error!("failed to read state of {user}: {err}");
                return Err(err);
            }
        };
        if state.is_none() {
            debug!("no stored state for {user}, starting fresh");
        }
        self.state = state.unwrap_or_default();
        self.user = Some(user);
        Ok(())
    }

    pub fn sign_out(&mut self) {
        self.user = None;
        self.state = AppState::default();
    }

    #[must_use]
    pub fn program_day(&self, today: NaiveDate) -> Option<ProgramDay> {
        program_day(self.state.start_date?, today, self.state.discipline_mode)
    }

    pub async fn complete_onboarding(
        &mut self,
        metrics: UserMetrics,
        mode: DisciplineMode,
        today: NaiveDate,
    ) {
        self.state.is_onboarded = true;
        self.state.user_metrics = metrics;
        self.state.discipline_mode = mode;
        self.state.start_date = Some(today);
        self.save().await;
    }

    #[must_use]
    pub fn progress(&self, today: NaiveDate) -> ProgramProgress {
        ProgramProgress::new(self.state.start_date, &self.state.workouts, today)
    }

    /// Appends the workout with a new ID and the given timestamp. `today` is the local date of
    /// the user.
    pub async fn log_workout(
        &mut self,
        mut workout: Workout,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> WorkoutID {
        workout.id = WorkoutID::new();
        workout.timestamp = now;
        let id = workout.id;
        self.state.start_date.get_or_insert(today);
        self.state.workouts.push(workout);
        self.save().await;
        id
    }

    /// Records the sets in the set history and returns the personal best if one was set.
    pub async fn log_sets(
        &mut self,
        exercise: &str,
        sets: &[SetRecord],
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Option<PersonalBest> {
        let start = *self.state.start_date.get_or_insert(today);
        let week = self.program_day(today).map_or(1, |day| day.week);
        let week_start = start
            .checked_add_days(Days::new(u64::from(week - 1) * 7))
            .unwrap_or(today);

        let mut new_best = false;
        for set in sets {
            self.state.set_history.record(
                exercise,
                week,
                week_start,
                LoggedSet {
                    reps: set.reps,
                    weight: set.weight,
                    timestamp: now,
                },
            );
            new_best |= self
                .state
                .personal_bests
                .offer(exercise, set.weight, set.reps, now);
        }
        self.save().await;

        if new_best {
            self.state.personal_bests.get(exercise).cloned()
        } else {
            None
        }
    }

    /// Clears all progress but keeps the onboarding, metrics and discipline mode.
    pub async fn reset_progress(&mut self) {
        self.state = AppState {
            is_onboarded: true,
            discipline_mode: self.state.discipline_mode,
            user_metrics: self.state.user_metrics,
            ..AppState::default()
        };
        self.save().await;
    }

    async fn save(&self) {
        let Some(user) = &self.user else {
            debug!("not signed in, skipping save");
            return;
        };
        match self.repository.write_state(user, &self.state).await {
            Ok(()) => {}
            Err(UpdateError::Storage(StorageError::NoConnection)) => {
                debug!("failed to save state: no connection");
            }
            Err(err) => {
                error!("failed to save state: {err}");
            }
        }
    }
}
