use std::{slice::Iter, str::FromStr};

use strum::{AsRefStr, EnumString, VariantArray};

use crate::{MuscleGroup, Property, ValidationError};

#[derive(
    AsRefStr, EnumString, VariantArray, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[strum(serialize_all = "lowercase")]
pub enum SplitType {
    FullBody,
    UpperLower,
    PushPullLegs,
    Bro,
}

impl Property for SplitType {
    fn iter() -> Iter<'static, SplitType> {
        SplitType::VARIANTS.iter()
    }

    fn name(self) -> &'static str {
        match self {
            SplitType::FullBody => "전신",
            SplitType::UpperLower => "상하체 분할",
            SplitType::PushPullLegs => "푸시/풀/레그",
            SplitType::Bro => "브로 분할",
        }
    }
}

impl SplitType {
    /// Muscle groups trained by this split, in selection order.
    #[must_use]
    pub fn target_muscles(self) -> &'static [MuscleGroup] {
        match self {
            SplitType::FullBody => &[
                MuscleGroup::Chest,
                MuscleGroup::Back,
                MuscleGroup::Shoulders,
                MuscleGroup::Biceps,
                MuscleGroup::Triceps,
                MuscleGroup::Legs,
                MuscleGroup::Abs,
            ],
            SplitType::UpperLower => &[
                MuscleGroup::Chest,
                MuscleGroup::Back,
                MuscleGroup::Shoulders,
                MuscleGroup::Biceps,
                MuscleGroup::Triceps,
            ],
            SplitType::PushPullLegs => &[
                MuscleGroup::Chest,
                MuscleGroup::Shoulders,
                MuscleGroup::Triceps,
            ],
            SplitType::Bro => &[MuscleGroup::Chest, MuscleGroup::Triceps, MuscleGroup::Abs],
        }
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        SplitType::from_str(value.trim()).map_err(|_| ValidationError::SplitType(value.to_string()))
    }
}
