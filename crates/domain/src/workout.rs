use chrono::{DateTime, Utc};
use derive_more::{Deref, Display};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ParsedSet, WorkoutDay};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: WorkoutID,
    pub timestamp: DateTime<Utc>,
    pub category: WorkoutDay,
    pub exercises: Vec<ExerciseLog>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub sick_but_consistent: bool,
    pub mood: Rating,
    pub pain_level: Rating,
    pub mental_discipline: Rating,
}

impl Workout {
    #[must_use]
    pub fn num_sets(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }

    #[must_use]
    pub fn volume_load(&self) -> f64 {
        self.exercises
            .iter()
            .flat_map(|e| &e.sets)
            .map(|s| s.weight * f64::from(s.reps))
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseLog {
    pub name: String,
    pub sets: Vec<SetRecord>,
}

impl ExerciseLog {
    /// Groups parsed sets by exercise, keeping the order of first appearance.
    #[must_use]
    pub fn from_parsed_sets(sets: &[ParsedSet]) -> Vec<ExerciseLog> {
        let mut logs: Vec<ExerciseLog> = vec![];
        for set in sets {
            let record = SetRecord {
                weight: set.weight,
                reps: set.reps,
            };
            match logs.iter_mut().find(|log| log.name == set.name) {
                Some(log) => log.sets.push(record),
                None => logs.push(ExerciseLog {
                    name: set.name.clone(),
                    sets: vec![record],
                }),
            }
        }
        logs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetRecord {
    /// Kilograms
    pub weight: f64,
    pub reps: u32,
}

impl SetRecord {
    pub fn new(weight: f64, reps: u32) -> Result<Self, SetRecordError> {
        Ok(Self {
            weight: validate_weight(weight)?,
            reps: validate_reps(reps)?,
        })
    }
}

impl TryFrom<(&str, &str)> for SetRecord {
    type Error = SetRecordError;

    fn try_from((weight, reps): (&str, &str)) -> Result<Self, Self::Error> {
        let weight = weight
            .trim()
            .parse::<f64>()
            .map_err(|_| WeightError::ParseError)?;
        let reps = reps
            .trim()
            .parse::<u32>()
            .map_err(|_| RepsError::ParseError)?;
        SetRecord::new(weight, reps)
    }
}

fn validate_weight(value: f64) -> Result<f64, WeightError> {
    if !(0.0..1000.0).contains(&value) {
        return Err(WeightError::OutOfRange);
    }
    Ok(value)
}

fn validate_reps(value: u32) -> Result<u32, RepsError> {
    if !(1..1000).contains(&value) {
        return Err(RepsError::OutOfRange);
    }
    Ok(value)
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SetRecordError {
    #[error(transparent)]
    Weight(#[from] WeightError),
    #[error(transparent)]
    Reps(#[from] RepsError),
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WeightError {
    #[error("Weight must be in the range 0 to 999.9 kg")]
    OutOfRange,
    #[error("Weight must be a decimal")]
    ParseError,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RepsError {
    #[error("Reps must be in the range 1 to 999")]
    OutOfRange,
    #[error("Reps must be an integer")]
    ParseError,
}

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkoutID(Uuid);

impl WorkoutID {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

/// Self-assessment on a scale from 1 to 10.
#[derive(Deref, Display, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: u8) -> Result<Self, RatingError> {
        if !(1..=10).contains(&value) {
            return Err(RatingError::OutOfRange(value));
        }
        Ok(Self(value))
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RatingError {
    #[error("Rating must be in the range 1 to 10 ({0})")]
    OutOfRange(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMetrics {
    /// Kilograms
    pub weight: f64,
    /// Percent
    pub body_fat: f64,
    /// Centimeters
    pub height: f64,
    pub maintenance_calories: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_weight: Option<f64>,
}

impl Default for UserMetrics {
    fn default() -> Self {
        Self {
            weight: 70.0,
            body_fat: 15.0,
            height: 175.0,
            maintenance_calories: 2500,
            goal_weight: None,
        }
    }
}

#[derive(Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserID(String);

impl UserID {
    pub fn new(id: &str) -> Result<Self, UserIDError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(UserIDError::Empty);
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(UserIDError::InvalidCharacter);
        }
        Ok(Self(id.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum UserIDError {
    #[error("User ID must not be empty")]
    Empty,
    #[error("User ID may only contain letters, digits, '-' and '_'")]
    InvalidCharacter,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_workout_serialization() {
        let workout = Workout {
            id: WorkoutID::nil(),
            timestamp: DateTime::<Utc>::default(),
            category: WorkoutDay::Legs,
            exercises: vec![ExerciseLog {
                name: "Leg Press".to_string(),
                sets: vec![SetRecord {
                    weight: 100.0,
                    reps: 12,
                }],
            }],
            notes: None,
            sick_but_consistent: true,
            mood: Rating(7),
            pain_level: Rating(2),
            mental_discipline: Rating(9),
        };

        let value = serde_json::to_value(&workout).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "00000000-0000-0000-0000-000000000000",
                "timestamp": "1970-01-01T00:00:00Z",
                "category": "legs",
                "exercises": [{ "name": "Leg Press", "sets": [{ "weight": 100.0, "reps": 12 }] }],
                "sickButConsistent": true,
                "mood": 7,
                "painLevel": 2,
                "mentalDiscipline": 9
            })
        );
        assert_eq!(serde_json::from_value::<Workout>(value).unwrap(), workout);
    }

    #[rstest]
    #[case(0, Err(RatingError::OutOfRange(0)))]
    #[case(1, Ok(Rating(1)))]
    #[case(10, Ok(Rating(10)))]
    #[case(11, Err(RatingError::OutOfRange(11)))]
    fn test_rating_new(#[case] value: u8, #[case] expected: Result<Rating, RatingError>) {
        assert_eq!(Rating::new(value), expected);
    }

    #[rstest]
    #[case("40", "15", Ok(SetRecord { weight: 40.0, reps: 15 }))]
    #[case(" 22.5 ", "8", Ok(SetRecord { weight: 22.5, reps: 8 }))]
    #[case("0", "1", Ok(SetRecord { weight: 0.0, reps: 1 }))]
    #[case("-1", "10", Err(SetRecordError::Weight(WeightError::OutOfRange)))]
    #[case("1000", "10", Err(SetRecordError::Weight(WeightError::OutOfRange)))]
    #[case("heavy", "10", Err(SetRecordError::Weight(WeightError::ParseError)))]
    #[case("40", "0", Err(SetRecordError::Reps(RepsError::OutOfRange)))]
    #[case("40", "1000", Err(SetRecordError::Reps(RepsError::OutOfRange)))]
    #[case("40", "7.5", Err(SetRecordError::Reps(RepsError::ParseError)))]
    fn test_set_record_try_from(
        #[case] weight: &str,
        #[case] reps: &str,
        #[case] expected: Result<SetRecord, SetRecordError>,
    ) {
        assert_eq!(SetRecord::try_from((weight, reps)), expected);
    }

    #[test]
    fn test_rating_deserialization() {
        assert_eq!(serde_json::from_str::<Rating>("7").unwrap(), Rating(7));
        assert!(serde_json::from_str::<Rating>("0").is_err());
    }

    #[rstest]
    #[case("1cgG4XVYB8RYxsoUfkGaoJr2mBe2", Ok(UserID("1cgG4XVYB8RYxsoUfkGaoJr2mBe2".to_string())))]
    #[case("  alice_1  ", Ok(UserID("alice_1".to_string())))]
    #[case("", Err(UserIDError::Empty))]
    #[case("../etc", Err(UserIDError::InvalidCharacter))]
    fn test_user_id_new(#[case] id: &str, #[case] expected: Result<UserID, UserIDError>) {
        assert_eq!(UserID::new(id), expected);
    }

    #[test]
    fn test_exercise_log_from_parsed_sets() {
        let sets = [
            ParsedSet {
                name: "Leg Press".to_string(),
                weight: 100.0,
                reps: 12,
            },
            ParsedSet {
                name: "Leg Extensions".to_string(),
                weight: 40.0,
                reps: 15,
            },
            ParsedSet {
                name: "Leg Press".to_string(),
                weight: 110.0,
                reps: 10,
            },
        ];
        assert_eq!(
            ExerciseLog::from_parsed_sets(&sets),
            vec![
                ExerciseLog {
                    name: "Leg Press".to_string(),
                    sets: vec![
                        SetRecord {
                            weight: 100.0,
                            reps: 12
                        },
                        SetRecord {
                            weight: 110.0,
                            reps: 10
                        }
                    ],
                },
                ExerciseLog {
                    name: "Leg Extensions".to_string(),
                    sets: vec![SetRecord {
                        weight: 40.0,
                        reps: 15
                    }],
                },
            ]
        );
    }

    #[test]
    fn test_workout_volume_load() {
        let workout = Workout {
            id: WorkoutID::new(),
            timestamp: DateTime::<Utc>::default(),
            category: WorkoutDay::Legs,
            exercises: ExerciseLog::from_parsed_sets(&[ParsedSet {
                name: "Leg Press".to_string(),
                weight: 100.0,
                reps: 12,
            }]),
            notes: None,
            sick_but_consistent: true,
            mood: Rating(5),
            pain_level: Rating(2),
            mental_discipline: Rating(8),
        };
        assert!(!workout.id.is_nil());
        assert_eq!(workout.num_sets(), 1);
        assert_eq!(workout.volume_load(), 1200.0);
    }

    #[test]
    fn test_user_metrics_serialization() {
        assert_eq!(
            serde_json::to_value(UserMetrics::default()).unwrap(),
            serde_json::json!({
                "weight": 70.0,
                "bodyFat": 15.0,
                "height": 175.0,
                "maintenanceCalories": 2500
            })
        );
    }
}
