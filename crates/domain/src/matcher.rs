//! Resolution of loosely spoken exercise names to the exercises planned for the day.
//!
//! Speech recognition frequently mishears gym vocabulary. Some of the synonym rules below
//! therefore map seemingly unrelated words to exercise categories: "venture" and "branch" are
//! heard instead of "bench", "girls" instead of "curls".

struct SynonymRule {
    spoken: &'static [&'static str],
    required: &'static [&'static str],
    excluded: &'static [&'static str],
}

impl SynonymRule {
    fn applies(&self, spoken: &str, available: &str) -> bool {
        self.spoken.iter().any(|s| spoken.contains(s))
            && self.required.iter().any(|r| available.contains(r))
            && !self.excluded.iter().any(|e| available.contains(e))
    }
}

const SYNONYM_RULES: &[SynonymRule] = &[
    SynonymRule {
        spoken: &["bench", "venture", "branch"],
        required: &["bench"],
        excluded: &[],
    },
    SynonymRule {
        spoken: &["curl", "girls"],
        required: &["curl"],
        excluded: &[],
    },
    SynonymRule {
        spoken: &["press"],
        required: &["press"],
        excluded: &["bench"],
    },
    SynonymRule {
        spoken: &["row", "pulldown"],
        required: &["row", "pulldown"],
        excluded: &[],
    },
    SynonymRule {
        spoken: &["fly"],
        required: &["fly"],
        excluded: &[],
    },
    SynonymRule {
        spoken: &["extension", "pushdown"],
        required: &["extension", "pushdown", "tricep"],
        excluded: &[],
    },
    SynonymRule {
        spoken: &["raise"],
        required: &["raise"],
        excluded: &[],
    },
    SynonymRule {
        spoken: &["squat", "leg"],
        required: &["squat", "leg"],
        excluded: &[],
    },
    SynonymRule {
        spoken: &["shrug"],
        required: &["shrug"],
        excluded: &[],
    },
];

fn contains_either_way(spoken: &str, available: &str) -> bool {
    available.contains(spoken)
        || available
            .split_whitespace()
            .next()
            .is_some_and(|first_word| spoken.contains(first_word))
}

/// Returns the first available exercise that the spoken phrase refers to.
///
/// The available exercises are checked in order. For each of them, plain containment is tried
/// before the synonym rules, so the order of `available` decides between several candidates.
#[must_use]
pub fn match_exercise<'a, S: AsRef<str>>(spoken: &str, available: &'a [S]) -> Option<&'a str> {
    let spoken = spoken.trim().to_lowercase();
    if spoken.is_empty() {
        return None;
    }
    available.iter().map(AsRef::<str>::as_ref).find(|name| {
        let name_lower = name.to_lowercase();
        contains_either_way(&spoken, &name_lower)
            || SYNONYM_RULES
                .iter()
                .any(|rule| rule.applies(&spoken, &name_lower))
    })
}
