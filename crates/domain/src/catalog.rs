use crate::{Difficulty, MuscleGroup};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExerciseDefinition {
    pub name: &'static str,
    pub sets: u32,
    pub reps: &'static str,
    pub difficulty: Difficulty,
}

impl ExerciseDefinition {
    const fn new(name: &'static str, sets: u32, reps: &'static str, difficulty: Difficulty) -> Self {
        Self {
            name,
            sets,
            reps,
            difficulty,
        }
    }
}

/// Returns the exercises of a muscle group in catalog order.
#[must_use]
pub fn exercises_for(muscle_group: MuscleGroup) -> &'static [ExerciseDefinition] {
    match muscle_group {
        MuscleGroup::Chest => &CHEST,
        MuscleGroup::Back => &BACK,
        MuscleGroup::Shoulders => &SHOULDERS,
        MuscleGroup::Biceps => &BICEPS,
        MuscleGroup::Triceps => &TRICEPS,
        MuscleGroup::Legs => &LEGS,
        MuscleGroup::Abs => &ABS,
    }
}

const CHEST: [ExerciseDefinition; 4] = [
    ExerciseDefinition::new("벤치프레스", 4, "8-12", Difficulty::Intermediate),
    ExerciseDefinition::new("인클라인 덤벨프레스", 3, "10-15", Difficulty::Intermediate),
    ExerciseDefinition::new("딥스", 3, "8-12", Difficulty::Beginner),
    ExerciseDefinition::new("케이블 플라이", 3, "12-15", Difficulty::Beginner),
];

const BACK: [ExerciseDefinition; 4] = [
    ExerciseDefinition::new("데드리프트", 4, "5-8", Difficulty::Advanced),
    ExerciseDefinition::new("풀업", 3, "8-12", Difficulty::Intermediate),
    ExerciseDefinition::new("랫풀다운", 3, "10-15", Difficulty::Beginner),
    ExerciseDefinition::new("바벨 로우", 3, "8-12", Difficulty::Intermediate),
];

const SHOULDERS: [ExerciseDefinition; 4] = [
    ExerciseDefinition::new("오버헤드 프레스", 4, "8-12", Difficulty::Intermediate),
    ExerciseDefinition::new("사이드 레터럴 레이즈", 3, "12-15", Difficulty::Beginner),
    ExerciseDefinition::new("리어 델트 플라이", 3, "12-15", Difficulty::Beginner),
    ExerciseDefinition::new("페이스 풀", 3, "12-15", Difficulty::Beginner),
];

const BICEPS: [ExerciseDefinition; 3] = [
    ExerciseDefinition::new("바벨 컬", 3, "8-12", Difficulty::Beginner),
    ExerciseDefinition::new("해머 컬", 3, "10-15", Difficulty::Beginner),
    ExerciseDefinition::new("프리처 컬", 3, "8-12", Difficulty::Intermediate),
];

const TRICEPS: [ExerciseDefinition; 3] = [
    ExerciseDefinition::new("클로즈그립 벤치프레스", 3, "8-12", Difficulty::Intermediate),
    ExerciseDefinition::new("오버헤드 익스텐션", 3, "10-15", Difficulty::Beginner),
    ExerciseDefinition::new("트라이셉 딥스", 3, "8-12", Difficulty::Intermediate),
];

const LEGS: [ExerciseDefinition; 4] = [
    ExerciseDefinition::new("스쿼트", 4, "8-12", Difficulty::Intermediate),
    ExerciseDefinition::new("루마니안 데드리프트", 3, "8-12", Difficulty::Intermediate),
    ExerciseDefinition::new("레그 프레스", 3, "12-15", Difficulty::Beginner),
    ExerciseDefinition::new("런지", 3, "10-12", Difficulty::Beginner),
];

const ABS: [ExerciseDefinition; 3] = [
    ExerciseDefinition::new("플랭크", 3, "30-60초", Difficulty::Beginner),
    ExerciseDefinition::new("크런치", 3, "15-20", Difficulty::Beginner),
    ExerciseDefinition::new("러시안 트위스트", 3, "20-25", Difficulty::Beginner),
];
