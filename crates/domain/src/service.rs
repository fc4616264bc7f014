use log::{debug, error};

use crate::{
    CoachingError, CoachingService, ExerciseAnalysis, GenerateError, ParseResult, SetHistory,
    TextGenerator, UserMetrics, VoiceLogService, WorkoutDay, coaching, voice_log,
};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

macro_rules! log_on_error {
    ($func: expr, $action: literal, $subject: expr) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                CoachingError::NotEnoughData
                | CoachingError::Generate(
                    GenerateError::MissingApiKey | GenerateError::Transport(_),
                ) => {
                    debug!("failed to {} {}: {err}", $action, $subject);
                }
                CoachingError::Generate(_) => {
                    error!("failed to {} {}: {err}", $action, $subject);
                }
            },
        }
        result
    }};
}

impl<R: TextGenerator> VoiceLogService for Service<R> {
    async fn parse_voice_log(&self, transcript: &str, available: &[String]) -> ParseResult {
        voice_log::parse_voice_log(&self.repository, transcript, available).await
    }
}

impl<R: TextGenerator> CoachingService for Service<R> {
    async fn analyze_exercise(
        &self,
        exercise: &str,
        history: &SetHistory,
        metrics: &UserMetrics,
        goals: &str,
    ) -> Result<ExerciseAnalysis, CoachingError> {
        log_on_error!(
            coaching::analyze_exercise(&self.repository, exercise, history, metrics, goals),
            "analyze",
            exercise
        )
    }

    async fn analyze_day(
        &self,
        day: WorkoutDay,
        history: &SetHistory,
        metrics: &UserMetrics,
        goals: &str,
    ) -> Result<Vec<ExerciseAnalysis>, CoachingError> {
        log_on_error!(
            coaching::analyze_day(&self.repository, day, history, metrics, goals),
            "analyze",
            day.name()
        )
    }
}
