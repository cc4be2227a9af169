//! JSON representations of the persisted data.
//!
//! Field names are part of the artifact format read by other tools and must not change.

use gymminder_domain::{self as domain, Property};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    pub id: String,
    pub date: String,
    pub split_type: String,
    pub estimated_time: u32,
    pub exercises: Vec<Exercise>,
}

impl From<&domain::Routine> for Routine {
    fn from(value: &domain::Routine) -> Self {
        Self {
            id: value.id.to_string(),
            date: value.date.clone(),
            split_type: value.split_type.name().to_string(),
            estimated_time: value.estimated_minutes,
            exercises: value.exercises.iter().map(Exercise::from).collect(),
        }
    }
}

impl TryFrom<Routine> for domain::Routine {
    type Error = domain::ValidationError;

    fn try_from(value: Routine) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            date: value.date,
            split_type: split_type(&value.split_type)?,
            estimated_minutes: value.estimated_time,
            exercises: value
                .exercises
                .into_iter()
                .map(domain::GeneratedExercise::try_from)
                .collect::<Result<_, _>>()?,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub name: String,
    pub sets: u32,
    pub reps: String,
    pub muscle: String,
    pub difficulty: String,
    pub difficulty_text: String,
}

impl From<&domain::GeneratedExercise> for Exercise {
    fn from(value: &domain::GeneratedExercise) -> Self {
        Self {
            name: value.name.clone(),
            sets: value.sets,
            reps: value.reps.clone(),
            muscle: value.muscle_name().to_string(),
            difficulty: value.difficulty.as_ref().to_string(),
            difficulty_text: value.difficulty_name().to_string(),
        }
    }
}

impl TryFrom<Exercise> for domain::GeneratedExercise {
    type Error = domain::ValidationError;

    fn try_from(value: Exercise) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value.name,
            sets: value.sets,
            reps: value.reps,
            muscle_group: domain::MuscleGroup::from_name(&value.muscle)
                .map_or_else(|| domain::MuscleGroup::parse(&value.muscle), Ok)?,
            difficulty: domain::Difficulty::parse(&value.difficulty)?,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub date: String,
    pub split_type: String,
    pub exercise_count: u32,
    pub estimated_time: u32,
    pub file_name: String,
}

impl From<&domain::HistoryEntry> for HistoryEntry {
    fn from(value: &domain::HistoryEntry) -> Self {
        Self {
            id: value.id.to_string(),
            date: value.date.clone(),
            split_type: value.split_type.name().to_string(),
            exercise_count: value.exercise_count,
            estimated_time: value.estimated_minutes,
            file_name: value.file_name.clone(),
        }
    }
}

impl TryFrom<HistoryEntry> for domain::HistoryEntry {
    type Error = domain::ValidationError;

    fn try_from(value: HistoryEntry) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            date: value.date,
            split_type: split_type(&value.split_type)?,
            exercise_count: value.exercise_count,
            estimated_minutes: value.estimated_time,
            file_name: value.file_name,
        })
    }
}

/// Accepts the display name as written by the application and the identifier.
fn split_type(value: &str) -> Result<domain::SplitType, domain::ValidationError> {
    domain::SplitType::from_name(value).map_or_else(|| domain::SplitType::parse(value), Ok)
}
