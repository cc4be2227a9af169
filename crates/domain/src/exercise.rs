use std::{slice::Iter, str::FromStr};

use strum::{AsRefStr, EnumString, VariantArray};

use crate::{ValidationError, catalog};

/// Static attributes that are shown to the user under a localized label.
pub trait Property: Clone + Copy + Sized + 'static {
    fn iter() -> Iter<'static, Self>;
    fn name(self) -> &'static str;

    /// Reverse lookup of [`Property::name`].
    fn from_name(name: &str) -> Option<Self> {
        Self::iter().copied().find(|p| p.name() == name)
    }
}

#[derive(
    AsRefStr, EnumString, VariantArray, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[strum(serialize_all = "lowercase")]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Biceps,
    Triceps,
    Legs,
    Abs,
}

impl Property for MuscleGroup {
    fn iter() -> Iter<'static, MuscleGroup> {
        MuscleGroup::VARIANTS.iter()
    }

    fn name(self) -> &'static str {
        match self {
            MuscleGroup::Chest => "가슴",
            MuscleGroup::Back => "등",
            MuscleGroup::Shoulders => "어깨",
            MuscleGroup::Biceps => "이두근",
            MuscleGroup::Triceps => "삼두근",
            MuscleGroup::Legs => "하체",
            MuscleGroup::Abs => "복근",
        }
    }
}

impl MuscleGroup {
    /// Group that is trained when every targeted group has been excluded.
    pub const FALLBACK: MuscleGroup = MuscleGroup::Abs;

    #[must_use]
    pub fn exercises(self) -> &'static [catalog::ExerciseDefinition] {
        catalog::exercises_for(self)
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        MuscleGroup::from_str(value.trim())
            .map_err(|_| ValidationError::MuscleGroup(value.to_string()))
    }
}

#[derive(
    AsRefStr, EnumString, VariantArray, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Property for Difficulty {
    fn iter() -> Iter<'static, Difficulty> {
        Difficulty::VARIANTS.iter()
    }

    fn name(self) -> &'static str {
        match self {
            Difficulty::Beginner => "초급",
            Difficulty::Intermediate => "중급",
            Difficulty::Advanced => "고급",
        }
    }
}

impl Difficulty {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        Difficulty::from_str(value.trim())
            .map_err(|_| ValidationError::Difficulty(value.to_string()))
    }
}
