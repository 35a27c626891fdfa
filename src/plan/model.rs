//! Plan and constraint data models.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ConstraintError;

/// Declared training experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl FitnessLevel {
    /// Recommended weekly training-frequency band for this level.
    pub fn recommended_frequency(&self) -> (u8, u8) {
        match self {
            Self::Beginner => (2, 4),
            Self::Intermediate => (3, 5),
            Self::Advanced => (4, 6),
        }
    }
}

impl std::fmt::Display for FitnessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        };
        write!(f, "{s}")
    }
}

/// What the user is training for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryGoal {
    FatLoss,
    MuscleGain,
    GeneralFitness,
}

impl std::fmt::Display for PrimaryGoal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::FatLoss => "fat_loss",
            Self::MuscleGain => "muscle_gain",
            Self::GeneralFitness => "general_fitness",
        };
        write!(f, "{s}")
    }
}

/// Where training happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Home,
    Gym,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Home => write!(f, "home"),
            Self::Gym => write!(f, "gym"),
        }
    }
}

/// Dietary pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietType {
    Omnivore,
    Vegetarian,
    Vegan,
    Pescatarian,
}

impl std::fmt::Display for DietType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Omnivore => "omnivore",
            Self::Vegetarian => "vegetarian",
            Self::Vegan => "vegan",
            Self::Pescatarian => "pescatarian",
        };
        write!(f, "{s}")
    }
}

/// How much meal preparation the user is willing to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealPrepLevel {
    Low,
    Medium,
    High,
}

/// Validated inputs for workout plan generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutConstraints {
    pub fitness_level: FitnessLevel,
    pub primary_goal: PrimaryGoal,
    /// Training days per week.
    pub frequency: u8,
    /// Session length budget.
    pub duration_minutes: u32,
    pub location: Location,
    pub equipment: BTreeSet<String>,
    /// Declared injuries or movement restrictions (free text).
    pub limitations: BTreeSet<String>,
}

impl WorkoutConstraints {
    pub fn validate(&self) -> Result<(), ConstraintError> {
        if !(2..=7).contains(&self.frequency) {
            return Err(ConstraintError::invalid(
                "frequency",
                format!("{} days per week", self.frequency),
                "2-7",
            ));
        }
        if !(20..=180).contains(&self.duration_minutes) {
            return Err(ConstraintError::invalid(
                "duration_minutes",
                format!("{} minutes", self.duration_minutes),
                "20-180",
            ));
        }
        Ok(())
    }
}

/// Validated inputs for meal plan generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealConstraints {
    pub diet_type: DietType,
    pub primary_goal: PrimaryGoal,
    /// Eating occasions per day.
    pub meal_frequency: u8,
    pub meal_prep_level: MealPrepLevel,
    pub allergies: BTreeSet<String>,
    pub dislikes: BTreeSet<String>,
    /// Training days per week, read from the workout-planning stage.
    pub workout_frequency: u8,
}

impl MealConstraints {
    pub fn validate(&self) -> Result<(), ConstraintError> {
        if !(2..=6).contains(&self.meal_frequency) {
            return Err(ConstraintError::invalid(
                "meal_frequency",
                format!("{} meals per day", self.meal_frequency),
                "2-6",
            ));
        }
        if !(2..=7).contains(&self.workout_frequency) {
            return Err(ConstraintError::invalid(
                "workout_frequency",
                format!("{} days per week", self.workout_frequency),
                "2-7",
            ));
        }
        Ok(())
    }
}

/// How training days are divided across the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainingSplit {
    #[serde(rename = "Full Body")]
    FullBody,
    #[serde(rename = "Upper/Lower")]
    UpperLower,
    #[serde(rename = "Push/Pull/Legs")]
    PushPullLegs,
    #[serde(rename = "Body Part Split")]
    BodyPartSplit,
}

impl std::fmt::Display for TrainingSplit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::FullBody => "Full Body",
            Self::UpperLower => "Upper/Lower",
            Self::PushPullLegs => "Push/Pull/Legs",
            Self::BodyPartSplit => "Body Part Split",
        };
        write!(f, "{s}")
    }
}

/// Movement category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    Compound,
    Isolation,
    Cardio,
    Flexibility,
}

/// One prescribed exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    pub exercise_type: ExerciseType,
    pub sets: u8,
    /// Rep prescription, e.g. `"8-12"` or `"15"`.
    pub reps: String,
    pub rest_seconds: u32,
}

impl Exercise {
    /// Estimated time to complete all sets.
    pub fn estimated_seconds(&self, seconds_per_rep: u32) -> u32 {
        let work = (rep_midpoint(&self.reps) * seconds_per_rep as f64).round() as u32;
        u32::from(self.sets) * (work + self.rest_seconds)
    }
}

/// Midpoint of a rep prescription. `"8-12"` → 10, `"15"` → 15.
pub fn rep_midpoint(reps: &str) -> f64 {
    let parts: Vec<f64> = reps
        .split('-')
        .filter_map(|p| p.trim().parse::<f64>().ok())
        .collect();
    match parts.as_slice() {
        [single] => *single,
        [low, high] => (low + high) / 2.0,
        _ => 10.0,
    }
}

/// One training day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDay {
    pub name: String,
    pub exercises: Vec<Exercise>,
}

impl WorkoutDay {
    pub fn estimated_seconds(&self, seconds_per_rep: u32) -> u32 {
        self.exercises
            .iter()
            .map(|e| e.estimated_seconds(seconds_per_rep))
            .sum()
    }
}

/// Generated workout plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub frequency: u8,
    pub duration_minutes: u32,
    pub location: Location,
    pub equipment: BTreeSet<String>,
    pub training_split: TrainingSplit,
    pub workout_days: Vec<WorkoutDay>,
    pub progression_strategy: String,
}

impl WorkoutPlan {
    /// Check every plan invariant: ranges, one day per frequency slot,
    /// non-empty days, and the per-day time budget.
    pub fn validate(&self, seconds_per_rep: u32) -> Result<(), ConstraintError> {
        if !(2..=7).contains(&self.frequency) {
            return Err(ConstraintError::invalid(
                "frequency",
                format!("{}", self.frequency),
                "2-7",
            ));
        }
        if !(20..=180).contains(&self.duration_minutes) {
            return Err(ConstraintError::invalid(
                "duration_minutes",
                format!("{}", self.duration_minutes),
                "20-180",
            ));
        }
        if self.workout_days.len() != usize::from(self.frequency) {
            return Err(ConstraintError::invalid(
                "workout_days",
                format!(
                    "{} days for frequency {}",
                    self.workout_days.len(),
                    self.frequency
                ),
                "one day per frequency slot",
            ));
        }
        for day in &self.workout_days {
            if day.exercises.is_empty() {
                return Err(ConstraintError::invalid(
                    "workout_days",
                    format!("day {} has no exercises", day.name),
                    "at least one exercise per day",
                ));
            }
            let seconds = day.estimated_seconds(seconds_per_rep);
            if seconds > self.duration_minutes * 60 {
                return Err(ConstraintError::invalid(
                    "duration_minutes",
                    format!("day {} runs {}s", day.name, seconds),
                    format!("{}s per day", self.duration_minutes * 60),
                ));
            }
        }
        Ok(())
    }
}

/// One example meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleMeal {
    pub name: String,
    /// Eating occasion, e.g. "breakfast".
    pub meal_type: String,
    pub ingredients: Vec<String>,
}

/// Generated meal plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    pub daily_calories: u32,
    pub protein_g: u32,
    pub carbs_g: u32,
    pub fats_g: u32,
    pub meal_frequency: u8,
    pub sample_meals: Vec<SampleMeal>,
    pub meal_timing_suggestion: String,
}

impl MealPlan {
    /// Calories implied by the macro split at 4/4/9 kcal per gram.
    pub fn macro_calories(&self) -> u32 {
        self.protein_g * 4 + self.carbs_g * 4 + self.fats_g * 9
    }

    /// Check every plan invariant: ranges, the sample-meal floor, and the
    /// macro-calorie tolerance.
    pub fn validate(&self, tolerance: f64, min_sample_meals: usize) -> Result<(), ConstraintError> {
        if !(1200..=5000).contains(&self.daily_calories) {
            return Err(ConstraintError::invalid(
                "daily_calories",
                format!("{}", self.daily_calories),
                "1200-5000",
            ));
        }
        if !(2..=6).contains(&self.meal_frequency) {
            return Err(ConstraintError::invalid(
                "meal_frequency",
                format!("{}", self.meal_frequency),
                "2-6",
            ));
        }
        if self.sample_meals.len() < min_sample_meals {
            return Err(ConstraintError::invalid(
                "sample_meals",
                format!("{} meals", self.sample_meals.len()),
                format!("at least {min_sample_meals}"),
            ));
        }
        let target = self.daily_calories as f64;
        let deviation = (self.macro_calories() as f64 - target).abs() / target;
        if deviation > tolerance {
            return Err(ConstraintError::invalid(
                "macros",
                format!(
                    "macro calories {} deviate {:.0}% from {}",
                    self.macro_calories(),
                    deviation * 100.0,
                    self.daily_calories
                ),
                format!("within {:.0}%", tolerance * 100.0),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rep_midpoint_handles_ranges_and_singles() {
        assert_eq!(rep_midpoint("8-12"), 10.0);
        assert_eq!(rep_midpoint("15"), 15.0);
        assert_eq!(rep_midpoint("12-15"), 13.5);
        assert_eq!(rep_midpoint("garbage"), 10.0);
    }

    #[test]
    fn exercise_time_estimate() {
        let ex = Exercise {
            name: "Squat".into(),
            exercise_type: ExerciseType::Compound,
            sets: 3,
            reps: "8-12".into(),
            rest_seconds: 60,
        };
        // 3 × (10 reps × 4s + 60s rest) = 300s
        assert_eq!(ex.estimated_seconds(4), 300);
    }

    #[test]
    fn training_split_serde_uses_spec_strings() {
        let json = serde_json::to_string(&TrainingSplit::PushPullLegs).unwrap();
        assert_eq!(json, "\"Push/Pull/Legs\"");
        let parsed: TrainingSplit = serde_json::from_str("\"Full Body\"").unwrap();
        assert_eq!(parsed, TrainingSplit::FullBody);
    }

    #[test]
    fn workout_constraints_range_checks() {
        let mut constraints = WorkoutConstraints {
            fitness_level: FitnessLevel::Beginner,
            primary_goal: PrimaryGoal::GeneralFitness,
            frequency: 3,
            duration_minutes: 45,
            location: Location::Home,
            equipment: BTreeSet::new(),
            limitations: BTreeSet::new(),
        };
        assert!(constraints.validate().is_ok());

        constraints.frequency = 8;
        let err = constraints.validate().unwrap_err();
        assert_eq!(err.field(), "frequency");

        constraints.frequency = 3;
        constraints.duration_minutes = 10;
        let err = constraints.validate().unwrap_err();
        assert_eq!(err.field(), "duration_minutes");
    }

    #[test]
    fn meal_plan_macro_tolerance() {
        let mut plan = MealPlan {
            daily_calories: 2000,
            protein_g: 150,
            carbs_g: 200,
            fats_g: 62,
            meal_frequency: 4,
            sample_meals: vec![
                SampleMeal {
                    name: "A".into(),
                    meal_type: "breakfast".into(),
                    ingredients: vec!["oats".into()],
                },
                SampleMeal {
                    name: "B".into(),
                    meal_type: "lunch".into(),
                    ingredients: vec!["rice".into()],
                },
                SampleMeal {
                    name: "C".into(),
                    meal_type: "dinner".into(),
                    ingredients: vec!["beans".into()],
                },
            ],
            meal_timing_suggestion: String::new(),
        };
        // 150*4 + 200*4 + 62*9 = 1958 — within 10% of 2000
        assert!(plan.validate(0.10, 3).is_ok());

        plan.fats_g = 150;
        assert!(plan.validate(0.10, 3).is_err());
    }

    #[test]
    fn frequency_recommendation_bands() {
        assert_eq!(FitnessLevel::Beginner.recommended_frequency(), (2, 4));
        assert_eq!(FitnessLevel::Intermediate.recommended_frequency(), (3, 5));
        assert_eq!(FitnessLevel::Advanced.recommended_frequency(), (4, 6));
    }
}
