use std::{
    fmt::Write,
    sync::atomic::{AtomicU64, Ordering},
};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{GenerateError, decode, extract_sets};

#[allow(async_fn_in_trait)]
pub trait VoiceLogService {
    async fn parse_voice_log(&self, transcript: &str, available: &[String]) -> ParseResult;
}

#[allow(async_fn_in_trait)]
pub trait TextGenerator {
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerateError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedSet {
    pub name: String,
    /// Kilograms
    pub weight: f64,
    pub reps: u32,
}

impl ParsedSet {
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(name: &str, weight: f64, reps: f64) -> Option<Self> {
        if !weight.is_finite() || weight < 0.0 || !reps.is_finite() || reps < 0.0 {
            return None;
        }
        let reps = reps.round();
        if reps > f64::from(u32::MAX) {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            weight,
            reps: reps as u32,
        })
    }
}

/// Either a non-empty list of sets or a failure carrying a suggestion for the user.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult(Outcome);

#[derive(Debug, Clone, PartialEq)]
enum Outcome {
    Sets(Vec<ParsedSet>),
    Failure(String),
}

impl ParseResult {
    /// A failure with a suggestion matching the transcript is returned if `sets` is empty.
    #[must_use]
    pub fn new(sets: Vec<ParsedSet>, transcript: &str) -> Self {
        if sets.is_empty() {
            return Self::failure(suggestion(transcript));
        }
        Self(Outcome::Sets(sets))
    }

    #[must_use]
    pub fn failure(suggestion: String) -> Self {
        Self(Outcome::Failure(suggestion))
    }

    #[must_use]
    pub fn sets(&self) -> &[ParsedSet] {
        match &self.0 {
            Outcome::Sets(sets) => sets,
            Outcome::Failure(_) => &[],
        }
    }

    #[must_use]
    pub fn suggestion(&self) -> Option<&str> {
        match &self.0 {
            Outcome::Sets(_) => None,
            Outcome::Failure(suggestion) => Some(suggestion.as_str()),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.0, Outcome::Sets(_))
    }

    pub fn into_sets(self) -> Result<Vec<ParsedSet>, String> {
        match self.0 {
            Outcome::Sets(sets) => Ok(sets),
            Outcome::Failure(suggestion) => Err(suggestion),
        }
    }
}

const SUGGESTIONS: &[(&str, &str)] = &[
    ("bench", "bench 40kg 15 reps"),
    ("curl", "barbell curls 20kg 12 reps"),
    ("row", "seated rows 50kg 10 reps"),
    ("pulldown", "lat pulldown 50kg 10 reps"),
    ("press", "shoulder press 30kg 10 reps"),
    ("fly", "chest fly 15kg 12 reps"),
];

const GENERIC_SUGGESTION: &str = "I did bench press 40kg for 15 reps";

#[must_use]
pub fn suggestion(transcript: &str) -> String {
    let transcript = transcript.to_lowercase();
    let example = SUGGESTIONS
        .iter()
        .find(|(keyword, _)| transcript.contains(keyword))
        .map_or(GENERIC_SUGGESTION, |(_, example)| *example);
    format!("Could not parse workout data. Try saying: \"{example}\"")
}

#[must_use]
pub fn voice_log_prompt<S: AsRef<str>>(transcript: &str, available: &[S]) -> String {
    let mut exercises = String::new();
    for exercise in available {
        let _ = writeln!(exercises, "- {}", exercise.as_ref());
    }

    format!(
        r#"You are an expert workout log parser with error correction abilities. Extract the sets from a voice transcript and match them to the exercises of today's workout plan.

AVAILABLE EXERCISES TODAY:
{exercises}
INSTRUCTIONS:
1. Find the exercise name, the weight and the number of reps in the transcript.
2. Use the EXACT exercise name from the list above. Never invent a name.
3. Accept natural language like "I did", "I just finished" or "completed".
4. Weight units: "kg", "kgs", "kilos", "pounds", "lbs". Convert pounds to kg (x 0.453592).
5. Rep units: "reps", "rep", "times", "laps".
6. Correct common speech recognition errors.

COMMON VARIATIONS:
- "bench", "flat bench", "venture", "branch" -> a bench exercise
- "curl", "girls", "bicep curl", "arm curl" -> a curl exercise
- "press", "shoulder press", "overhead press" -> a press exercise that is not a bench press
- "row", "rowing", "lat pulldown", "pulldown" -> a row or pulldown exercise
- "fly", "flies", "chest fly" -> a fly exercise
- "extension", "tricep extension", "pushdown" -> a tricep exercise
- "raise", "lateral raise", "side raise" -> a raise exercise
- "squat", "leg press", "legs" -> a leg exercise
- "shrug" -> a shrug exercise

EXAMPLES:
- "venture 70kg 10 reps" -> bench, 70 kg, 10 reps
- "I just did a set of girls with 20kg for 15 laps" -> curls, 20 kg, 15 reps
- "completed bench for 45 kilos 12 times" -> bench, 45 kg, 12 reps

Voice transcript: "{transcript}"

RESPOND WITH ONLY VALID JSON in this format:
[{{"name": "Exact exercise name from the list", "weight": number_in_kg, "reps": number}}]

If nothing matches or the transcript is unclear, return an empty array: []"#
    )
}

#[derive(Deserialize)]
struct ModelSet {
    name: String,
    weight: f64,
    reps: f64,
}

/// Decodes the model output and keeps only sets naming an available exercise.
#[must_use]
pub fn model_sets<S: AsRef<str>>(output: &str, available: &[S]) -> Vec<ParsedSet> {
    let Some(decoded) = decode(output, |sets: &Vec<ModelSet>| !sets.is_empty()) else {
        debug!("model output contains no sets");
        return vec![];
    };

    decoded
        .into_iter()
        .filter_map(|set| {
            let Some(name) = canonical_name(&set.name, available) else {
                warn!("dropping set of unknown exercise \"{}\"", set.name);
                return None;
            };
            let parsed = ParsedSet::new(name, set.weight, set.reps);
            if parsed.is_none() {
                warn!(
                    "dropping invalid set of {name}: {} kg x {} reps",
                    set.weight, set.reps
                );
            }
            parsed
        })
        .collect()
}

fn canonical_name<'a, S: AsRef<str>>(name: &str, available: &'a [S]) -> Option<&'a str> {
    let name = name.trim();
    let names = || available.iter().map(AsRef::<str>::as_ref);
    names()
        .find(|a| *a == name)
        .or_else(|| names().find(|a| a.eq_ignore_ascii_case(name)))
}

pub async fn parse_with_model<G: TextGenerator, S: AsRef<str>>(
    generator: &G,
    transcript: &str,
    available: &[S],
) -> Vec<ParsedSet> {
    match generator
        .generate_text(&voice_log_prompt(transcript, available))
        .await
    {
        Ok(output) => model_sets(&output, available),
        Err(err) => {
            warn!("failed to parse voice log using model: {err}");
            vec![]
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum ParseState {
    AwaitingInput,
    TryModel,
    TryHeuristic,
    Done(ParseResult),
}

/// Parses a voice transcript, asking the model first and falling back to the heuristic
/// extractor.
pub async fn parse_voice_log<G: TextGenerator, S: AsRef<str>>(
    generator: &G,
    transcript: &str,
    available: &[S],
) -> ParseResult {
    let transcript = transcript.trim().to_lowercase();
    let mut state = ParseState::AwaitingInput;

    loop {
        state = match state {
            ParseState::AwaitingInput => ParseState::TryModel,
            ParseState::TryModel => {
                let sets = parse_with_model(generator, &transcript, available).await;
                if sets.is_empty() {
                    ParseState::TryHeuristic
                } else {
                    ParseState::Done(ParseResult::new(sets, &transcript))
                }
            }
            ParseState::TryHeuristic => {
                let sets = extract_sets(&transcript, available);
                if !sets.is_empty() {
                    debug!("parsed voice log using heuristics");
                }
                ParseState::Done(ParseResult::new(sets, &transcript))
            }
            ParseState::Done(result) => return result,
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Hands out tickets for voice captures so that results of superseded captures can be
/// discarded.
#[derive(Debug, Default)]
pub struct VoiceLogSession {
    latest: AtomicU64,
}

impl VoiceLogSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Parses the transcript unless a newer capture started in the meantime.
    pub async fn parse<V: VoiceLogService>(
        &self,
        service: &V,
        transcript: &str,
        available: &[String],
    ) -> Option<ParseResult> {
        let ticket = self.begin();
        let result = service.parse_voice_log(transcript, available).await;
        if self.is_current(ticket) {
            Some(result)
        } else {
            debug!("discarding result of superseded voice capture");
            None
        }
    }
}
