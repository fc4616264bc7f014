use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::{NumberToken, ParsedSet, match_exercise, normalize};

const CATEGORY_PATTERNS: &[(&str, &str)] = &[
    (
        "bench",
        r"bench|venture|branch|bench press|flat bench|incline bench|chest press",
    ),
    (
        "curl",
        r"curl|girls|bicep curl|hammer curl|preacher curl|arm curl",
    ),
    ("press", r"press|shoulder press|overhead press"),
    ("row", r"row|rowing|lat pulldown|pulldown|seated row"),
    ("fly", r"fly|flies|chest fly|dumbbell fly"),
    (
        "extension",
        r"extension|tricep extension|pushdown|skull crusher",
    ),
    ("raise", r"raise|lateral raise|side raise"),
    ("leg", r"squat|leg press|leg extension|hamstring"),
    ("shrug", r"shrug|trap shrug"),
];

static CATEGORIES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    CATEGORY_PATTERNS
        .iter()
        .map(|(category, pattern)| {
            (
                *category,
                Regex::new(&format!("(?i)(?:{pattern})")).expect("valid category pattern"),
            )
        })
        .collect()
});

/// Returns the first mentioned phrase of each exercise category, in category order.
#[must_use]
pub fn spoken_exercises(transcript: &str) -> Vec<String> {
    CATEGORIES
        .iter()
        .filter_map(|(category, regex)| {
            let found = regex.find(transcript)?;
            debug!("transcript mentions {category}: \"{}\"", found.as_str());
            Some(found.as_str().to_lowercase())
        })
        .collect()
}

/// Extracts sets from a transcript without any external help.
///
/// All weight/reps pairs of an utterance are attributed to the exercise of the first matching
/// category. Saying "bench 40kg 15 reps then curls 20kg 12 reps" therefore yields two bench sets.
#[must_use]
pub fn extract_sets<S: AsRef<str>>(transcript: &str, available: &[S]) -> Vec<ParsedSet> {
    let transcript = transcript.to_lowercase();
    let spoken = spoken_exercises(&transcript);
    let numbers = normalize(&transcript);

    let Some(first_spoken) = spoken.first() else {
        debug!("no exercise mentioned in transcript");
        return vec![];
    };

    if numbers.len() < 2 {
        debug!("too few quantities in transcript ({})", numbers.len());
        return vec![];
    }

    let Some(name) = match_exercise(first_spoken, available) else {
        debug!("\"{first_spoken}\" does not match any available exercise");
        return vec![];
    };

    let weights = numbers.iter().filter_map(|n| match n {
        NumberToken::Weight(value) => Some(*value),
        NumberToken::Reps(_) => None,
    });
    let reps = numbers.iter().filter_map(|n| match n {
        NumberToken::Reps(value) => Some(*value),
        NumberToken::Weight(_) => None,
    });

    weights
        .zip(reps)
        .filter_map(|(weight, reps)| ParsedSet::new(name, weight, reps))
        .collect()
}
