use std::fmt;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{CoachingError, SetHistory, TextGenerator, UserMetrics, WorkoutDay, decode};

pub const DEFAULT_GOALS: &str = "Maximize strength and muscle growth while avoiding overtraining";

#[allow(async_fn_in_trait)]
pub trait CoachingService {
    async fn analyze_exercise(
        &self,
        exercise: &str,
        history: &SetHistory,
        metrics: &UserMetrics,
        goals: &str,
    ) -> Result<ExerciseAnalysis, CoachingError>;
    async fn analyze_day(
        &self,
        day: WorkoutDay,
        history: &SetHistory,
        metrics: &UserMetrics,
        goals: &str,
    ) -> Result<Vec<ExerciseAnalysis>, CoachingError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Where the user usually stops for mental rather than physical reasons
    pub mental_failure_rep: String,
    /// What the user could achieve with proper coaching
    pub true_rep: String,
    #[serde(default)]
    pub recommended_plan: Vec<PlannedSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_set: Option<FailureSet>,
    pub explanation: String,
}

impl ExerciseAnalysis {
    fn placeholder(explanation: &str) -> Self {
        Self {
            name: None,
            mental_failure_rep: "Analysis shows mental barriers exist".to_string(),
            true_rep: "True potential identified".to_string(),
            recommended_plan: vec![],
            failure_set: None,
            explanation: explanation.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedSet {
    pub set: u32,
    pub weight: f64,
    pub reps: RepTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureSet {
    pub weight: f64,
    pub reps: RepTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A number of reps or an instruction such as "to failure".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RepTarget {
    Count(u32),
    Text(String),
}

impl fmt::Display for RepTarget {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RepTarget::Count(reps) => write!(f, "{reps}"),
            RepTarget::Text(text) => write!(f, "{text}"),
        }
    }
}

const GUIDELINES: &str = "This user prefers high-rep training with supersets and burnout techniques. Provide SPECIFIC recommendations:

1. Mental Barrier: Where they typically stop due to mental limitations (use 10-30 rep range)
2. True Potential: Maximum weight they can achieve with proper coaching (use 8-15 rep range for strength focus)
3. Recommended Plan: 4 progressive sets + 1 failure set for maximum burnout
4. Failure Set: A final burnout set with reduced weight to complete muscle exhaustion";

const PLAN_FORMAT: &str = r#""recommendedPlan": [
    {"set": 1, "weight": [calculated_weight], "reps": [calculated_reps], "note": "Warm-up set"},
    {"set": 2, "weight": [calculated_weight], "reps": [calculated_reps], "note": "Build intensity"},
    {"set": 3, "weight": [calculated_weight], "reps": [calculated_reps], "note": "Working weight"},
    {"set": 4, "weight": [calculated_weight], "reps": [calculated_reps], "note": "Peak intensity"}
  ],
  "failureSet": {"weight": [reduced_weight], "reps": "to failure", "note": "Drop weight, push to complete muscle failure for maximum burn"},"#;

#[must_use]
pub fn exercise_analysis_prompt(
    exercise: &str,
    history: &SetHistory,
    metrics: &UserMetrics,
    goals: &str,
) -> String {
    let weeks = history.weeks(exercise).collect::<Vec<_>>();
    format!(
        r#"You are an expert strength coach specializing in high-volume training. Analyze the workout data for '{exercise}' over the last 3 weeks.

User Data: {data}
User Goals: {goals}
User Metrics: {metrics}

{GUIDELINES}

IMPORTANT: Analyze the actual user data and respond with ONLY valid JSON in this exact format:
{{
  "mentalFailureRep": "[weight]kg x [reps] reps",
  "trueRep": "[heavier_weight]kg x [8-15_reps] reps",
  {PLAN_FORMAT}
  "explanation": "Professional analysis based on the actual progression data, identifying specific mental barriers and true strength potential with scientific reasoning."
}}"#,
        data = json!(weeks),
        metrics = json!(metrics),
    )
}

#[must_use]
pub fn day_analysis_prompt(
    day: WorkoutDay,
    history: &SetHistory,
    metrics: &UserMetrics,
    goals: &str,
) -> String {
    let exercises = day
        .exercises()
        .iter()
        .map(|name| {
            json!({
                "name": name,
                "history": history.weeks(name).collect::<Vec<_>>(),
            })
        })
        .collect::<Vec<_>>();
    format!(
        r#"You are an expert strength coach specializing in high-volume training. Analyze the workout data of the {day} day for multiple exercises over the last 3 weeks.

User Data: {data}
User Goals: {goals}
User Metrics: {metrics}

{GUIDELINES}

IMPORTANT: Analyze the actual user data for each exercise and respond with ONLY valid JSON in this exact format:
[
  {{
  "name": "[actual_exercise_name]",
  "mentalFailureRep": "[calculated_weight]kg x [calculated_reps] reps",
  "trueRep": "[heavier_calculated_weight]kg x [8-15_calculated_reps] reps",
  {PLAN_FORMAT}
  "explanation": "Professional analysis based on actual progression data with scientific reasoning for this specific exercise."
  }}
]"#,
        day = day.name(),
        data = json!(exercises),
        metrics = json!(metrics),
    )
}

/// Decodes a single analysis, keeping unstructured output as explanation.
#[must_use]
pub fn exercise_analysis(output: &str) -> ExerciseAnalysis {
    decode(output, |_: &ExerciseAnalysis| true).unwrap_or_else(|| {
        warn!("failed to decode exercise analysis, keeping raw output");
        ExerciseAnalysis::placeholder(output)
    })
}

#[must_use]
pub fn day_analysis(output: &str) -> Vec<ExerciseAnalysis> {
    decode(output, |analyses: &Vec<ExerciseAnalysis>| !analyses.is_empty()).unwrap_or_else(|| {
        warn!("failed to decode day analysis");
        vec![]
    })
}

pub async fn analyze_exercise<G: TextGenerator>(
    generator: &G,
    exercise: &str,
    history: &SetHistory,
    metrics: &UserMetrics,
    goals: &str,
) -> Result<ExerciseAnalysis, CoachingError> {
    if !history.has_sets(exercise) {
        return Err(CoachingError::NotEnoughData);
    }
    debug!("requesting analysis of {exercise}");
    let output = generator
        .generate_text(&exercise_analysis_prompt(exercise, history, metrics, goals))
        .await?;
    let mut analysis = exercise_analysis(&output);
    analysis.name.get_or_insert_with(|| exercise.to_string());
    Ok(analysis)
}

pub async fn analyze_day<G: TextGenerator>(
    generator: &G,
    day: WorkoutDay,
    history: &SetHistory,
    metrics: &UserMetrics,
    goals: &str,
) -> Result<Vec<ExerciseAnalysis>, CoachingError> {
    if !day.exercises().iter().any(|name| history.has_sets(name)) {
        return Err(CoachingError::NotEnoughData);
    }
    debug!("requesting analysis of {}", day.name());
    let output = generator
        .generate_text(&day_analysis_prompt(day, history, metrics, goals))
        .await?;
    Ok(day_analysis(&output))
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, sync::LazyLock};

    use chrono::{NaiveDate, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{GenerateError, LoggedSet};

    struct FakeGenerator {
        response: Result<String, GenerateError>,
        prompts: RefCell<Vec<String>>,
    }

    impl FakeGenerator {
        fn new(response: Result<&str, GenerateError>) -> Self {
            Self {
                response: response.map(ToString::to_string),
                prompts: RefCell::new(vec![]),
            }
        }
    }

    impl TextGenerator for FakeGenerator {
        async fn generate_text(&self, prompt: &str) -> Result<String, GenerateError> {
            self.prompts.borrow_mut().push(prompt.to_string());
            match &self.response {
                Ok(text) => Ok(text.clone()),
                Err(GenerateError::Http { status, message }) => Err(GenerateError::Http {
                    status: *status,
                    message: message.clone(),
                }),
                Err(_) => Err(GenerateError::MissingApiKey),
            }
        }
    }

    static HISTORY: LazyLock<SetHistory> = LazyLock::new(|| {
        let mut history = SetHistory::default();
        for (week, weight) in [(1, 30.0), (2, 32.5)] {
            history.record(
                "Barbell Curls",
                week,
                NaiveDate::from_ymd_opt(2024, 1, week * 7 - 6).unwrap(),
                LoggedSet {
                    reps: 15,
                    weight,
                    timestamp: Utc.with_ymd_and_hms(2024, 1, week * 7 - 6, 18, 0, 0).unwrap(),
                },
            );
        }
        history
    });

    const ANALYSIS: &str = r#"```json
{
  "mentalFailureRep": "30kg x 15 reps",
  "trueRep": "37.5kg x 10 reps",
  "recommendedPlan": [
    {"set": 1, "weight": 20, "reps": 20, "note": "Warm-up set"},
    {"set": 2, "weight": 30, "reps": 15}
  ],
  "failureSet": {"weight": 15, "reps": "to failure"},
  "explanation": "Steady progression."
}
```"#;

    #[tokio::test]
    async fn test_analyze_exercise() {
        let generator = FakeGenerator::new(Ok(ANALYSIS));
        let analysis = analyze_exercise(
            &generator,
            "Barbell Curls",
            &HISTORY,
            &UserMetrics::default(),
            DEFAULT_GOALS,
        )
        .await
        .unwrap();

        assert_eq!(
            analysis,
            ExerciseAnalysis {
                name: Some("Barbell Curls".to_string()),
                mental_failure_rep: "30kg x 15 reps".to_string(),
                true_rep: "37.5kg x 10 reps".to_string(),
                recommended_plan: vec![
                    PlannedSet {
                        set: 1,
                        weight: 20.0,
                        reps: RepTarget::Count(20),
                        note: Some("Warm-up set".to_string()),
                    },
                    PlannedSet {
                        set: 2,
                        weight: 30.0,
                        reps: RepTarget::Count(15),
                        note: None,
                    },
                ],
                failure_set: Some(FailureSet {
                    weight: 15.0,
                    reps: RepTarget::Text("to failure".to_string()),
                    note: None,
                }),
                explanation: "Steady progression.".to_string(),
            }
        );

        let prompts = generator.prompts.borrow();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Analyze the workout data for 'Barbell Curls'"));
        assert!(prompts[0].contains("\"weekNumber\":2"));
        assert!(prompts[0].contains("\"maintenanceCalories\":2500"));
        assert!(prompts[0].contains(DEFAULT_GOALS));
    }

    #[tokio::test]
    async fn test_analyze_exercise_without_sets() {
        let generator = FakeGenerator::new(Ok(ANALYSIS));
        let result = analyze_exercise(
            &generator,
            "Preacher Curls",
            &HISTORY,
            &UserMetrics::default(),
            DEFAULT_GOALS,
        )
        .await;

        assert!(matches!(result, Err(CoachingError::NotEnoughData)));
        assert!(generator.prompts.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_analyze_exercise_keeps_unstructured_output() {
        let generator = FakeGenerator::new(Ok("Keep pushing, you are doing great."));
        let analysis = analyze_exercise(
            &generator,
            "Barbell Curls",
            &HISTORY,
            &UserMetrics::default(),
            DEFAULT_GOALS,
        )
        .await
        .unwrap();

        assert_eq!(analysis.explanation, "Keep pushing, you are doing great.");
        assert_eq!(analysis.mental_failure_rep, "Analysis shows mental barriers exist");
        assert!(analysis.recommended_plan.is_empty());
    }

    #[tokio::test]
    async fn test_analyze_exercise_generator_error() {
        let generator = FakeGenerator::new(Err(GenerateError::Http {
            status: 429,
            message: "quota exceeded".to_string(),
        }));
        let result = analyze_exercise(
            &generator,
            "Barbell Curls",
            &HISTORY,
            &UserMetrics::default(),
            DEFAULT_GOALS,
        )
        .await;

        assert!(matches!(
            result,
            Err(CoachingError::Generate(GenerateError::Http { status: 429, .. }))
        ));
    }

    #[tokio::test]
    async fn test_analyze_day() {
        let generator = FakeGenerator::new(Ok(r#"Here is the analysis:
[{"name": "Barbell Curls", "mentalFailureRep": "30kg x 15 reps", "trueRep": "37.5kg x 10 reps", "explanation": "Good."}]"#));
        let analyses = analyze_day(
            &generator,
            WorkoutDay::ChestBiceps,
            &HISTORY,
            &UserMetrics::default(),
            DEFAULT_GOALS,
        )
        .await
        .unwrap();

        assert_eq!(analyses.len(), 1);
        assert_eq!(analyses[0].name.as_deref(), Some("Barbell Curls"));
        assert_eq!(analyses[0].failure_set, None);

        let prompts = generator.prompts.borrow();
        assert!(prompts[0].contains("Chest & Biceps"));
        assert!(prompts[0].contains("\"name\":\"Preacher Curls\""));
    }

    #[tokio::test]
    async fn test_analyze_day_without_sets() {
        let generator = FakeGenerator::new(Ok("[]"));
        let result = analyze_day(
            &generator,
            WorkoutDay::Legs,
            &HISTORY,
            &UserMetrics::default(),
            DEFAULT_GOALS,
        )
        .await;

        assert!(matches!(result, Err(CoachingError::NotEnoughData)));
        assert!(generator.prompts.borrow().is_empty());
    }

    #[test]
    fn test_day_analysis_unusable_output() {
        assert!(day_analysis("I cannot analyze this.").is_empty());
        assert!(day_analysis("[]").is_empty());
    }

    #[test]
    fn test_rep_target_display() {
        assert_eq!(RepTarget::Count(12).to_string(), "12");
        assert_eq!(RepTarget::Text("to failure".to_string()).to_string(), "to failure");
    }
}
