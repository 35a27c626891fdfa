//! Plan generation — deterministic workout and meal plan construction.

pub mod catalog;
pub mod meal;
pub mod model;
pub mod workout;

pub use meal::{MealDelta, MealPlanGenerator};
pub use model::{
    DietType, Exercise, ExerciseType, FitnessLevel, Location, MealConstraints, MealPlan,
    MealPrepLevel, PrimaryGoal, SampleMeal, TrainingSplit, WorkoutConstraints, WorkoutDay,
    WorkoutPlan,
};
pub use workout::{WorkoutDelta, WorkoutPlanGenerator};
