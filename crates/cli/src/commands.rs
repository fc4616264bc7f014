use anyhow::{Context, bail};
use chrono::{DateTime, NaiveDate, Utc};
use club38_domain as domain;
use domain::{AppStateRepository, CoachingService, Store, VoiceLogService, WorkoutDay};
use log::{debug, info};
use strum::IntoEnumIterator;

#[derive(clap::Args, Debug, Clone)]
pub struct LogArgs {
    /// Spoken description of the performed sets
    pub transcript: String,
    /// Workout day (chest_biceps, back_triceps, shoulders, legs), defaults to today's
    #[arg(long, value_parser = parse_day)]
    pub day: Option<WorkoutDay>,
    /// Mood from 1 to 10
    #[arg(long, default_value = "5", value_parser = parse_rating)]
    pub mood: domain::Rating,
    /// Pain level from 1 to 10
    #[arg(long, default_value = "1", value_parser = parse_rating)]
    pub pain: domain::Rating,
    /// Mental discipline from 1 to 10
    #[arg(long, default_value = "5", value_parser = parse_rating)]
    pub discipline: domain::Rating,
    #[arg(long)]
    pub notes: Option<String>,
    /// Trained despite being sick
    #[arg(long)]
    pub sick: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct OnboardArgs {
    /// Body weight in kg
    #[arg(long)]
    pub weight: f64,
    /// Body fat in percent
    #[arg(long)]
    pub body_fat: f64,
    /// Height in cm
    #[arg(long)]
    pub height: f64,
    /// Maintenance calories per day
    #[arg(long)]
    pub calories: u32,
    /// Goal weight in kg
    #[arg(long)]
    pub goal_weight: Option<f64>,
    /// Discipline mode (normal, intense)
    #[arg(long, default_value = "normal", value_parser = parse_mode)]
    pub mode: domain::DisciplineMode,
}

pub fn parse_day(value: &str) -> Result<WorkoutDay, String> {
    WorkoutDay::from_id(value).ok_or_else(|| {
        format!(
            "unknown workout day, expected one of: {}",
            WorkoutDay::iter()
                .map(WorkoutDay::id)
                .collect::<Vec<_>>()
                .join(", ")
        )
    })
}

pub fn parse_rating(value: &str) -> Result<domain::Rating, String> {
    let value = value
        .parse::<u8>()
        .map_err(|_| "rating must be an integer".to_string())?;
    domain::Rating::new(value).map_err(|err| err.to_string())
}

pub fn parse_mode(value: &str) -> Result<domain::DisciplineMode, String> {
    match value {
        "normal" => Ok(domain::DisciplineMode::Normal),
        "intense" => Ok(domain::DisciplineMode::Intense),
        _ => Err("discipline mode must be normal or intense".to_string()),
    }
}

pub async fn parse(
    service: &impl VoiceLogService,
    transcript: &str,
    day: Option<WorkoutDay>,
) -> anyhow::Result<String> {
    let sets = parse_sets(service, transcript, &available(day)).await?;
    Ok(sets
        .iter()
        .map(|set| format!("{}: {} kg x {}", set.name, kg(set.weight), set.reps))
        .collect::<Vec<_>>()
        .join("\n"))
}

pub fn today<R: AppStateRepository>(store: &Store<R>, today: NaiveDate) -> String {
    let Some(program_day) = store.program_day(today) else {
        return "No training program started. Run `club38 onboard` to begin.".to_string();
    };
    let progress = store.progress(today);
    let mut lines = vec![];
    if progress.is_complete() {
        lines.push(format!(
            "{} weeks of discipline completed. You have been reborn.",
            domain::PROGRAM_WEEKS
        ));
    }

    let heading = format!("Day {}, week {}", program_day.day, program_day.week);
    match program_day.workout {
        Some(workout) => {
            lines.push(format!("{heading}: {}", workout.name()));
            for exercise in workout.exercises() {
                match domain::previous_performance(&store.state().workouts, exercise) {
                    Some(previous) => lines.push(format!(
                        "  {exercise} (last: {} kg x {})",
                        kg(previous.weight),
                        previous.reps
                    )),
                    None => lines.push(format!("  {exercise}")),
                }
            }
        }
        None => lines.push(format!("{heading}: rest day")),
    }

    lines.extend(format_progress(&progress));
    lines.join("\n")
}

pub async fn log<V: VoiceLogService, R: AppStateRepository>(
    service: &V,
    store: &mut Store<R>,
    args: LogArgs,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> anyhow::Result<String> {
    let day = resolve_day(args.day, store, today)?;
    let sets = parse_sets(service, &args.transcript, &day.available_exercises()).await?;
    for set in &sets {
        domain::SetRecord::new(set.weight, set.reps)
            .with_context(|| format!("invalid set of {}", set.name))?;
    }

    let exercises = domain::ExerciseLog::from_parsed_sets(&sets);
    let workout = domain::Workout {
        id: domain::WorkoutID::nil(),
        timestamp: now,
        category: day,
        exercises: exercises.clone(),
        notes: args.notes.filter(|notes| !notes.trim().is_empty()),
        sick_but_consistent: args.sick,
        mood: args.mood,
        pain_level: args.pain,
        mental_discipline: args.discipline,
    };
    let id = store.log_workout(workout, today, now).await;
    info!("logged workout {}", *id);

    let mut lines = vec![format!("Logged {} sets ({})", sets.len(), day.name())];
    let mut bests = vec![];
    for exercise in &exercises {
        lines.push(format!(
            "  {}: {}",
            exercise.name,
            exercise
                .sets
                .iter()
                .map(|set| format!("{} kg x {}", kg(set.weight), set.reps))
                .collect::<Vec<_>>()
                .join(", ")
        ));
        if let Some(best) = store.log_sets(&exercise.name, &exercise.sets, today, now).await {
            bests.push(format!(
                "New personal best: {} {} kg x {}",
                best.exercise,
                kg(best.weight),
                best.reps
            ));
        }
    }
    lines.extend(bests);
    Ok(lines.join("\n"))
}

pub fn history<R: AppStateRepository>(store: &Store<R>, exercise: &str) -> String {
    let history = &store.state().set_history;
    if !history.has_sets(exercise) {
        return format!("No sets logged for {exercise}.");
    }

    let mut lines = vec![exercise.to_string()];
    for week in history.weeks(exercise) {
        lines.push(format!(
            "  Week {} (program week {}, from {})",
            week.week_number, week.program_week, week.start_date
        ));
        for set in &week.sets {
            lines.push(format!("    {} kg x {}", kg(set.weight), set.reps));
        }
    }
    lines.join("\n")
}

pub fn best<R: AppStateRepository>(store: &Store<R>, exercise: Option<&str>) -> String {
    let bests = &store.state().personal_bests;
    let selected = match exercise {
        Some(exercise) => bests.get(exercise).into_iter().collect::<Vec<_>>(),
        None => bests.iter().collect(),
    };
    if selected.is_empty() {
        return "No personal bests yet.".to_string();
    }
    selected
        .into_iter()
        .map(|best| {
            format!(
                "{}: {} kg x {} ({})",
                best.exercise,
                kg(best.weight),
                best.reps,
                best.achieved_at.date_naive()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn analyze<C: CoachingService, R: AppStateRepository>(
    service: &C,
    store: &Store<R>,
    exercise: Option<&str>,
    day: Option<WorkoutDay>,
    today: NaiveDate,
) -> anyhow::Result<String> {
    let state = store.state();
    let analyses = match exercise {
        Some(exercise) => vec![
            service
                .analyze_exercise(
                    exercise,
                    &state.set_history,
                    &state.user_metrics,
                    domain::DEFAULT_GOALS,
                )
                .await?,
        ],
        None => {
            let day = resolve_day(day, store, today)?;
            service
                .analyze_day(
                    day,
                    &state.set_history,
                    &state.user_metrics,
                    domain::DEFAULT_GOALS,
                )
                .await?
        }
    };
    if analyses.is_empty() {
        bail!("the analysis could not be interpreted, try again later");
    }
    Ok(analyses
        .iter()
        .map(format_analysis)
        .collect::<Vec<_>>()
        .join("\n\n"))
}

pub async fn onboard<R: AppStateRepository>(
    store: &mut Store<R>,
    args: OnboardArgs,
    today: NaiveDate,
) -> String {
    let metrics = domain::UserMetrics {
        weight: args.weight,
        body_fat: args.body_fat,
        height: args.height,
        maintenance_calories: args.calories,
        goal_weight: args.goal_weight,
    };
    store.complete_onboarding(metrics, args.mode, today).await;
    format!("Welcome to the 38 Club. Day 1 starts on {today}.")
}

pub async fn reset<R: AppStateRepository>(
    store: &mut Store<R>,
    confirmed: bool,
) -> anyhow::Result<String> {
    if !confirmed {
        bail!("resetting deletes all workouts and history, pass --yes to confirm");
    }
    store.reset_progress().await;
    Ok("Progress reset.".to_string())
}

async fn parse_sets(
    service: &impl VoiceLogService,
    transcript: &str,
    available: &[String],
) -> anyhow::Result<Vec<domain::ParsedSet>> {
    match service.parse_voice_log(transcript, available).await.into_sets() {
        Ok(sets) => Ok(sets),
        Err(suggestion) => bail!("{suggestion}"),
    }
}

fn available(day: Option<WorkoutDay>) -> Vec<String> {
    match day {
        Some(day) => day.available_exercises(),
        None => WorkoutDay::iter()
            .flat_map(WorkoutDay::available_exercises)
            .collect(),
    }
}

fn resolve_day<R: AppStateRepository>(
    day: Option<WorkoutDay>,
    store: &Store<R>,
    today: NaiveDate,
) -> anyhow::Result<WorkoutDay> {
    if let Some(day) = day {
        return Ok(day);
    }
    let day = store
        .program_day(today)
        .and_then(|program_day| program_day.workout)
        .context("no workout is scheduled for today, pass --day")?;
    debug!("using scheduled workout day {}", day.id());
    Ok(day)
}

fn format_progress(progress: &domain::ProgramProgress) -> [String; 3] {
    let done = if progress.done_this_week.is_empty() {
        "nothing yet".to_string()
    } else {
        progress
            .done_this_week
            .iter()
            .map(|day| day.name())
            .collect::<Vec<_>>()
            .join(", ")
    };
    [
        format!(
            "Weeks completed: {} of {}, discipline streak: {} weeks",
            progress.weeks_completed,
            domain::PROGRAM_WEEKS,
            progress.discipline_streak
        ),
        format!("Done this week: {done}"),
        format!("Next workout: {}", progress.next_workout.name()),
    ]
}

fn format_analysis(analysis: &domain::ExerciseAnalysis) -> String {
    let mut lines = vec![
        analysis.name.clone().unwrap_or_else(|| "Analysis".to_string()),
        format!("  Mental failure: {}", analysis.mental_failure_rep),
        format!("  True failure: {}", analysis.true_rep),
    ];
    if !analysis.recommended_plan.is_empty() {
        lines.push("  Plan:".to_string());
        for set in &analysis.recommended_plan {
            lines.push(format!(
                "    Set {}: {} kg x {}{}",
                set.set,
                kg(set.weight),
                set.reps,
                note(set.note.as_deref())
            ));
        }
    }
    if let Some(set) = &analysis.failure_set {
        lines.push(format!(
            "  Failure set: {} kg x {}{}",
            kg(set.weight),
            set.reps,
            note(set.note.as_deref())
        ));
    }
    lines.push(format!("  {}", analysis.explanation));
    if let Some(tips) = analysis.name.as_deref().and_then(domain::exercise_tips) {
        lines.extend([
            "  Form tips:".to_string(),
            format!("    Setup: {}", tips.setup),
            format!("    Execution: {}", tips.execution),
            format!("    Breathing: {}", tips.breathing),
            format!("    Avoid: {}", tips.common_mistakes.join(", ")),
        ]);
    }
    lines.join("\n")
}

fn note(note: Option<&str>) -> String {
    note.map(|note| format!(" ({note})")).unwrap_or_default()
}

fn kg(weight: f64) -> String {
    let value = format!("{weight:.1}");
    match value.strip_suffix(".0") {
        Some(value) => value.to_string(),
        None => value,
    }
}
