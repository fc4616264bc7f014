use std::sync::LazyLock;

use regex::Regex;

pub const KG_PER_POUND: f64 = 0.453_592;

static QUANTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\d+(?:\.\d+)?)\s*(kilograms?|kilos?|kgs?|pounds?|lbs?|reps?|laps?|times?)",
    )
    .expect("valid quantity pattern")
});

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberToken {
    /// Kilograms
    Weight(f64),
    Reps(f64),
}

impl NumberToken {
    #[must_use]
    pub fn value(self) -> f64 {
        match self {
            NumberToken::Weight(value) | NumberToken::Reps(value) => value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Kilogram,
    Pound,
    Rep,
}

impl Unit {
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        let word = word.to_lowercase();
        if word.starts_with("kg") || word.starts_with("kilo") {
            Some(Unit::Kilogram)
        } else if word.starts_with("pound") || word.starts_with("lb") {
            Some(Unit::Pound)
        } else if word.starts_with("rep") || word.starts_with("lap") || word.starts_with("time") {
            Some(Unit::Rep)
        } else {
            None
        }
    }

    #[must_use]
    pub fn token(self, value: f64) -> NumberToken {
        match self {
            Unit::Kilogram => NumberToken::Weight(value),
            Unit::Pound => NumberToken::Weight(value * KG_PER_POUND),
            Unit::Rep => NumberToken::Reps(value),
        }
    }
}

/// Extracts all quantities with a known unit in the order they appear in the transcript.
///
/// Numbers without a recognizable unit are dropped.
#[must_use]
pub fn normalize(transcript: &str) -> Vec<NumberToken> {
    QUANTITY
        .captures_iter(transcript)
        .filter_map(|captures| {
            let value = captures.get(1)?.as_str().parse::<f64>().ok()?;
            let unit = Unit::from_word(captures.get(2)?.as_str())?;
            Some(unit.token(value))
        })
        .collect()
}
