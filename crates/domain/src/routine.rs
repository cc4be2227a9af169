use std::{fmt::Write, path::Path, path::PathBuf};

use chrono::{Local, NaiveDate};
use derive_more::Display;
use rand::{Rng, rngs::StdRng};
use uuid::Uuid;

use crate::{
    CreateError, DeleteError, Difficulty, MuscleGroup, Property, ReadError, SplitType,
    ValidationError,
};

pub const MINUTES_PER_EXERCISE: u32 = 5;
pub const DEFAULT_DATE_FORMAT: &str = "%Y. %-m. %-d.";

#[allow(async_fn_in_trait)]
pub trait ArtifactRepository {
    async fn write_artifact(&self, file_name: &str, routine: &Routine) -> Result<(), CreateError>;
    async fn read_artifact(&self, file_name: &str) -> Result<Routine, ReadError>;
    /// Returns `false` if there was no such artifact.
    async fn delete_artifact(&self, file_name: &str) -> Result<bool, DeleteError>;
    async fn list_artifacts(&self) -> Result<Vec<String>, ReadError>;
    async fn export_artifact(&self, path: &Path, routine: &Routine) -> Result<(), CreateError>;
}

#[allow(async_fn_in_trait)]
pub trait ExportDialog {
    /// Returns `None` if the user cancelled.
    async fn choose_destination(&self, default_file_name: &str) -> Option<PathBuf>;
}

pub trait RandomSource {
    /// Returns an index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

/// Random source backed by the thread-local generator.
pub struct Entropy;

impl RandomSource for Entropy {
    fn pick(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

impl RandomSource for StdRng {
    fn pick(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

#[derive(Display, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoutineID(String);

impl RoutineID {
    #[must_use]
    pub fn new() -> Self {
        Self::from(Uuid::now_v7())
    }
}

impl AsRef<str> for RoutineID {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Default for RoutineID {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for RoutineID {
    fn from(value: Uuid) -> Self {
        Self(value.simple().to_string())
    }
}

impl From<&str> for RoutineID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RoutineID {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineRequest {
    pub split_type: SplitType,
    pub yesterday_muscles: Vec<MuscleGroup>,
    pub sore_muscles: Vec<MuscleGroup>,
}

impl RoutineRequest {
    pub fn parse<S: AsRef<str>>(
        split_type: &str,
        yesterday_muscles: &[S],
        sore_muscles: &[S],
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            split_type: SplitType::parse(split_type)?,
            yesterday_muscles: yesterday_muscles
                .iter()
                .map(|m| MuscleGroup::parse(m.as_ref()))
                .collect::<Result<_, _>>()?,
            sore_muscles: sore_muscles
                .iter()
                .map(|m| MuscleGroup::parse(m.as_ref()))
                .collect::<Result<_, _>>()?,
        })
    }

    /// Target muscles of the split without the excluded ones, or the fallback group if nothing
    /// remains.
    #[must_use]
    pub fn available_muscles(&self) -> Vec<MuscleGroup> {
        let available = self
            .split_type
            .target_muscles()
            .iter()
            .filter(|m| !self.yesterday_muscles.contains(m) && !self.sore_muscles.contains(m))
            .copied()
            .collect::<Vec<_>>();
        if available.is_empty() {
            vec![MuscleGroup::FALLBACK]
        } else {
            available
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedExercise {
    pub name: String,
    pub sets: u32,
    pub reps: String,
    pub muscle_group: MuscleGroup,
    pub difficulty: Difficulty,
}

impl GeneratedExercise {
    #[must_use]
    pub fn muscle_name(&self) -> &'static str {
        self.muscle_group.name()
    }

    #[must_use]
    pub fn difficulty_name(&self) -> &'static str {
        self.difficulty.name()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routine {
    pub id: RoutineID,
    pub date: String,
    pub split_type: SplitType,
    pub estimated_minutes: u32,
    pub exercises: Vec<GeneratedExercise>,
}

impl Routine {
    /// Selects one random exercise for every available muscle group of the request.
    pub fn generate(
        request: &RoutineRequest,
        random: &mut impl RandomSource,
        date_format: &str,
    ) -> Self {
        let exercises = request
            .available_muscles()
            .into_iter()
            .map(|muscle_group| {
                let definitions = muscle_group.exercises();
                let definition = &definitions[random.pick(definitions.len()) % definitions.len()];
                GeneratedExercise {
                    name: definition.name.to_string(),
                    sets: definition.sets,
                    reps: definition.reps.to_string(),
                    muscle_group,
                    difficulty: definition.difficulty,
                }
            })
            .collect::<Vec<_>>();

        Self {
            id: RoutineID::new(),
            date: format_date(Local::now().date_naive(), date_format),
            split_type: request.split_type,
            estimated_minutes: estimated_minutes(exercises.len()),
            exercises,
        }
    }

    /// Name of the artifact file a saved routine is written to.
    #[must_use]
    pub fn artifact_file_name(&self) -> String {
        format!(
            "routine_{}_{}.json",
            sanitize_file_name(&self.date),
            Uuid::new_v4().simple()
        )
    }

    #[must_use]
    pub fn export_file_name(&self) -> String {
        format!("gymminder_routine_{}.json", sanitize_file_name(&self.date))
    }
}

#[must_use]
pub fn estimated_minutes(num_exercises: usize) -> u32 {
    u32::try_from(num_exercises)
        .unwrap_or(u32::MAX)
        .saturating_mul(MINUTES_PER_EXERCISE)
}

/// Formats a date with a strftime-like format, falling back to [`DEFAULT_DATE_FORMAT`] if the
/// format is invalid.
#[must_use]
pub fn format_date(date: NaiveDate, format: &str) -> String {
    let mut result = String::new();
    if write!(result, "{}", date.format(format)).is_ok() {
        result
    } else {
        date.format(DEFAULT_DATE_FORMAT).to_string()
    }
}

fn sanitize_file_name(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c => c,
        })
        .collect()
}
