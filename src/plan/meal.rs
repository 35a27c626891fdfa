//! Meal plan generation.
//!
//! Calories come from a baseline expenditure scaled by a training-volume
//! multiplier plus a goal adjustment; macros are derived at 4/4/9 kcal per
//! gram. The proportional rescale runs on every generation and every
//! modification, so the macro-calorie invariant holds no matter which field
//! a delta touched.

use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{ConstraintError, Error, ModificationError};

use super::catalog::{CatalogMeal, MEALS, diet_tags};
use super::model::{DietType, MealConstraints, MealPlan, PrimaryGoal, SampleMeal};

const MEAL_TYPE_CYCLE: [&str; 4] = ["breakfast", "lunch", "dinner", "snack"];

/// Deterministic meal plan generator.
pub struct MealPlanGenerator {
    avg_weight_kg: f64,
    base_tdee_kcal: u32,
    macro_tolerance: f64,
    min_sample_meals: usize,
}

/// A requested change to an existing meal plan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MealDelta {
    pub daily_calories: Option<u32>,
    pub protein_g: Option<u32>,
    pub carbs_g: Option<u32>,
    pub fats_g: Option<u32>,
    pub meal_frequency: Option<u8>,
    pub diet_type: Option<DietType>,
}

impl MealDelta {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl MealPlanGenerator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            avg_weight_kg: config.avg_weight_kg,
            base_tdee_kcal: config.base_tdee_kcal,
            macro_tolerance: config.macro_tolerance,
            min_sample_meals: config.min_sample_meals,
        }
    }

    /// Generate a plan from validated constraints.
    pub fn generate(&self, constraints: &MealConstraints) -> Result<MealPlan, ConstraintError> {
        constraints.validate()?;

        let daily_calories = self.daily_calories(constraints);
        let (protein_g, carbs_g, fats_g) = self.macros(daily_calories, constraints.primary_goal);
        let sample_meals = self.select_meals(constraints)?;

        let plan = MealPlan {
            daily_calories,
            protein_g,
            carbs_g,
            fats_g,
            meal_frequency: constraints.meal_frequency,
            sample_meals,
            meal_timing_suggestion: timing_suggestion(constraints.meal_frequency).to_string(),
        };
        plan.validate(self.macro_tolerance, self.min_sample_meals)?;
        debug!(
            daily_calories = plan.daily_calories,
            protein_g = plan.protein_g,
            meals = plan.sample_meals.len(),
            "generated meal plan"
        );
        Ok(plan)
    }

    /// Apply a delta to an existing plan.
    ///
    /// An empty delta returns a plan equal to the input. A diet-type change
    /// regenerates the sample meals; calorie or macro changes patch the
    /// field and then run the proportional rescale.
    pub fn modify(
        &self,
        constraints: &MealConstraints,
        plan: &MealPlan,
        delta: &MealDelta,
    ) -> Result<MealPlan, Error> {
        if delta.is_empty() {
            return Ok(plan.clone());
        }

        if let Some(calories) = delta.daily_calories
            && !(1200..=5000).contains(&calories)
        {
            return Err(ModificationError::OutOfRange {
                field: "daily_calories".into(),
                allowed: "1200-5000".into(),
            }
            .into());
        }
        if let Some(frequency) = delta.meal_frequency
            && !(2..=6).contains(&frequency)
        {
            return Err(ModificationError::OutOfRange {
                field: "meal_frequency".into(),
                allowed: "2-6".into(),
            }
            .into());
        }

        let mut updated_constraints = constraints.clone();
        let mut patched = plan.clone();

        if let Some(diet_type) = delta.diet_type {
            updated_constraints.diet_type = diet_type;
        }
        if let Some(frequency) = delta.meal_frequency {
            updated_constraints.meal_frequency = frequency;
            patched.meal_frequency = frequency;
            patched.meal_timing_suggestion = timing_suggestion(frequency).to_string();
        }
        if delta.diet_type.is_some() || delta.meal_frequency.is_some() {
            patched.sample_meals = self.select_meals(&updated_constraints).map_err(|e| {
                Error::Modification(ModificationError::Incompatible {
                    reason: e.to_string(),
                })
            })?;
        }

        if let Some(calories) = delta.daily_calories {
            patched.daily_calories = calories;
        }
        if let Some(protein) = delta.protein_g {
            patched.protein_g = protein;
        }
        if let Some(carbs) = delta.carbs_g {
            patched.carbs_g = carbs;
        }
        if let Some(fats) = delta.fats_g {
            patched.fats_g = fats;
        }

        self.rescale_macros(&mut patched);
        patched.validate(self.macro_tolerance, self.min_sample_meals)?;
        Ok(patched)
    }

    /// `round(base_tdee × activity_multiplier) + goal_adjustment`, clamped
    /// to the plan's calorie range.
    fn daily_calories(&self, constraints: &MealConstraints) -> u32 {
        let tdee = (f64::from(self.base_tdee_kcal)
            * activity_multiplier(constraints.workout_frequency))
        .round() as i64;
        let adjusted = tdee + i64::from(goal_adjustment(constraints.primary_goal));
        adjusted.clamp(1200, 5000) as u32
    }

    /// Protein from body weight and goal; fats at ~28% of calories; carbs
    /// take the remainder.
    fn macros(&self, daily_calories: u32, goal: PrimaryGoal) -> (u32, u32, u32) {
        let protein_g = (self.avg_weight_kg * protein_factor(goal)).round() as u32;
        let fats_g = (f64::from(daily_calories) * 0.28 / 9.0).round() as u32;
        let remainder = i64::from(daily_calories) - i64::from(protein_g) * 4 - i64::from(fats_g) * 9;
        let carbs_g = (remainder.max(0) as f64 / 4.0).round() as u32;

        let mut scratch = MealPlan {
            daily_calories,
            protein_g,
            carbs_g,
            fats_g,
            meal_frequency: 3,
            sample_meals: Vec::new(),
            meal_timing_suggestion: String::new(),
        };
        self.rescale_macros(&mut scratch);
        (scratch.protein_g, scratch.carbs_g, scratch.fats_g)
    }

    /// Close any out-of-tolerance gap between macro calories and the daily
    /// target by scaling all three macros proportionally. Runs on every
    /// generation and modification.
    fn rescale_macros(&self, plan: &mut MealPlan) {
        let target = f64::from(plan.daily_calories);
        let sum = f64::from(plan.macro_calories());
        if sum <= 0.0 {
            return;
        }
        let deviation = (sum - target).abs() / target;
        if deviation <= self.macro_tolerance {
            return;
        }
        let factor = target / sum;
        plan.protein_g = (f64::from(plan.protein_g) * factor).round() as u32;
        plan.carbs_g = (f64::from(plan.carbs_g) * factor).round() as u32;
        plan.fats_g = (f64::from(plan.fats_g) * factor).round() as u32;
        debug!(factor, "rescaled macros to close calorie gap");
    }

    /// Pick sample meals cycling breakfast → lunch → dinner → snack, from
    /// the catalog filtered by diet-type exclusions and declared
    /// allergies/dislikes.
    fn select_meals(&self, constraints: &MealConstraints) -> Result<Vec<SampleMeal>, ConstraintError> {
        let avoid: Vec<String> = constraints
            .allergies
            .iter()
            .chain(constraints.dislikes.iter())
            .map(|a| a.to_lowercase())
            .collect();

        let allowed: Vec<&CatalogMeal> = MEALS
            .iter()
            .filter(|m| !excluded_by_diet(m, constraints.diet_type))
            .filter(|m| !conflicts_with(m, &avoid))
            .collect();

        if allowed.len() < self.min_sample_meals {
            return Err(ConstraintError::invalid(
                "allergies",
                format!(
                    "only {} meals satisfy the {} diet with the declared allergies and dislikes",
                    allowed.len(),
                    constraints.diet_type
                ),
                format!("at least {} compatible meals", self.min_sample_meals),
            ));
        }

        let want = usize::from(constraints.meal_frequency).max(self.min_sample_meals);
        let mut selected: Vec<SampleMeal> = Vec::with_capacity(want);
        let mut offsets = [0usize; MEAL_TYPE_CYCLE.len()];
        while selected.len() < want {
            let mut picked_any = false;
            for (slot, meal_type) in MEAL_TYPE_CYCLE.iter().enumerate() {
                if selected.len() >= want {
                    break;
                }
                let next = allowed
                    .iter()
                    .filter(|m| m.meal_type == *meal_type)
                    .nth(offsets[slot]);
                if let Some(meal) = next {
                    offsets[slot] += 1;
                    picked_any = true;
                    selected.push(SampleMeal {
                        name: meal.name.to_string(),
                        meal_type: meal.meal_type.to_string(),
                        ingredients: meal.ingredients.iter().map(|i| i.to_string()).collect(),
                    });
                }
            }
            if !picked_any {
                break;
            }
        }
        Ok(selected)
    }
}

/// Monotonic step function of weekly training frequency.
fn activity_multiplier(workout_frequency: u8) -> f64 {
    match workout_frequency {
        2 => 1.20,
        3 => 1.35,
        4 => 1.50,
        5 => 1.65,
        6 => 1.80,
        _ => 1.90,
    }
}

fn goal_adjustment(goal: PrimaryGoal) -> i32 {
    match goal {
        PrimaryGoal::MuscleGain => 400,
        PrimaryGoal::FatLoss => -400,
        PrimaryGoal::GeneralFitness => 0,
    }
}

/// Grams of protein per kilogram of body weight.
fn protein_factor(goal: PrimaryGoal) -> f64 {
    match goal {
        PrimaryGoal::MuscleGain => 2.0,
        PrimaryGoal::FatLoss => 1.8,
        PrimaryGoal::GeneralFitness => 1.6,
    }
}

fn excluded_by_diet(meal: &CatalogMeal, diet_type: DietType) -> bool {
    let excluded: &[&str] = match diet_type {
        DietType::Omnivore => &[],
        DietType::Vegetarian => &[diet_tags::MEAT, diet_tags::FISH],
        DietType::Vegan => &[
            diet_tags::MEAT,
            diet_tags::FISH,
            diet_tags::DAIRY,
            diet_tags::EGGS,
            diet_tags::HONEY,
        ],
        DietType::Pescatarian => &[diet_tags::MEAT],
    };
    meal.tags.iter().any(|tag| excluded.contains(tag))
}

/// An avoided token matches an ingredient by substring in either direction,
/// so "peanut" knocks out "peanut butter" and "nuts" knocks out "walnuts".
fn conflicts_with(meal: &CatalogMeal, avoid: &[String]) -> bool {
    meal.ingredients.iter().any(|ingredient| {
        avoid
            .iter()
            .any(|a| ingredient.contains(a.as_str()) || a.contains(ingredient))
    })
}

/// Meal-timing suggestion keyed by eating occasions per day.
fn timing_suggestion(meal_frequency: u8) -> &'static str {
    match meal_frequency {
        2 => "Two larger meals, late morning and early evening, roughly eight hours apart",
        3 => "Three meals spaced 4-5 hours apart: breakfast, lunch, and dinner",
        4 => "Three meals plus a protein-focused snack; keep the snack near your training window",
        5 => "Three meals and two snacks, eating roughly every three hours",
        _ => "Six small feedings, one every 2-3 hours; anchor the largest around training",
    }
}
