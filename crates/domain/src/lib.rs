#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod coaching;
mod decode;
mod error;
mod heuristic;
mod history;
mod matcher;
mod plan;
mod service;
mod store;
mod tips;
mod units;
mod voice_log;
mod workout;

pub use coaching::{
    CoachingService, DEFAULT_GOALS, ExerciseAnalysis, FailureSet, PlannedSet, RepTarget,
    analyze_day, analyze_exercise, day_analysis, day_analysis_prompt, exercise_analysis,
    exercise_analysis_prompt,
};
pub use decode::decode;
pub use error::{CoachingError, GenerateError, ReadError, StorageError, UpdateError};
pub use heuristic::{extract_sets, spoken_exercises};
pub use history::{HISTORY_WEEKS, LoggedSet, PersonalBest, PersonalBests, SetHistory, WeekSets};
pub use matcher::match_exercise;
pub use plan::{
    DisciplineMode, PROGRAM_WEEKS, Performance, ProgramDay, ProgramProgress, WorkoutDay,
    previous_performance, program_day,
};
pub use service::Service;
pub use store::{AppState, AppStateRepository, Store};
pub use tips::{FormTips, exercise_tips};
pub use units::{KG_PER_POUND, NumberToken, Unit, normalize};
pub use voice_log::{
    ParseResult, ParsedSet, TextGenerator, Ticket, VoiceLogService, VoiceLogSession, model_sets,
    parse_voice_log, parse_with_model, suggestion, voice_log_prompt,
};
pub use workout::{
    ExerciseLog, Rating, RatingError, RepsError, SetRecord, SetRecordError, UserID, UserIDError,
    UserMetrics, WeightError, Workout, WorkoutID,
};
