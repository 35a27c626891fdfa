//! Static exercise and sample-meal catalogs.
//!
//! Both generators draw from these tables so that identical constraints
//! always produce identical plans. Catalog order is significant: selection
//! walks entries front to back.

use super::model::ExerciseType;

/// One exercise the workout generator can prescribe.
#[derive(Debug, Clone, Copy)]
pub struct CatalogExercise {
    pub name: &'static str,
    pub exercise_type: ExerciseType,
    /// Muscle groups this exercise targets.
    pub muscles: &'static [&'static str],
    /// Equipment required; empty means bodyweight.
    pub equipment: &'static [&'static str],
    /// Joints/regions that rule this exercise out when a limitation matches.
    pub contraindications: &'static [&'static str],
}

impl CatalogExercise {
    pub fn is_bodyweight(&self) -> bool {
        self.equipment.is_empty()
    }
}

/// Equipment assumed present at any gym, merged with whatever the user
/// declares when `location = gym`.
pub static GYM_STANDARD_EQUIPMENT: &[&str] = &[
    "barbell",
    "dumbbells",
    "bench",
    "squat rack",
    "pull-up bar",
    "cable machine",
    "leg press machine",
    "treadmill",
    "rowing machine",
    "kettlebell",
];

pub static EXERCISES: &[CatalogExercise] = &[
    // ── Compound ────────────────────────────────────────────────────
    CatalogExercise {
        name: "Barbell Back Squat",
        exercise_type: ExerciseType::Compound,
        muscles: &["legs"],
        equipment: &["barbell", "squat rack"],
        contraindications: &["knee", "lower back"],
    },
    CatalogExercise {
        name: "Goblet Squat",
        exercise_type: ExerciseType::Compound,
        muscles: &["legs"],
        equipment: &["dumbbells"],
        contraindications: &["knee"],
    },
    CatalogExercise {
        name: "Bodyweight Squat",
        exercise_type: ExerciseType::Compound,
        muscles: &["legs"],
        equipment: &[],
        contraindications: &["knee"],
    },
    CatalogExercise {
        name: "Deadlift",
        exercise_type: ExerciseType::Compound,
        muscles: &["back", "legs"],
        equipment: &["barbell"],
        contraindications: &["lower back"],
    },
    CatalogExercise {
        name: "Romanian Deadlift",
        exercise_type: ExerciseType::Compound,
        muscles: &["legs"],
        equipment: &["dumbbells"],
        contraindications: &["lower back"],
    },
    CatalogExercise {
        name: "Walking Lunge",
        exercise_type: ExerciseType::Compound,
        muscles: &["legs"],
        equipment: &[],
        contraindications: &["knee"],
    },
    CatalogExercise {
        name: "Glute Bridge",
        exercise_type: ExerciseType::Compound,
        muscles: &["legs"],
        equipment: &[],
        contraindications: &[],
    },
    CatalogExercise {
        name: "Leg Press",
        exercise_type: ExerciseType::Compound,
        muscles: &["legs"],
        equipment: &["leg press machine"],
        contraindications: &["knee"],
    },
    CatalogExercise {
        name: "Bench Press",
        exercise_type: ExerciseType::Compound,
        muscles: &["chest"],
        equipment: &["barbell", "bench"],
        contraindications: &["shoulder"],
    },
    CatalogExercise {
        name: "Dumbbell Bench Press",
        exercise_type: ExerciseType::Compound,
        muscles: &["chest"],
        equipment: &["dumbbells", "bench"],
        contraindications: &["shoulder"],
    },
    CatalogExercise {
        name: "Push-Up",
        exercise_type: ExerciseType::Compound,
        muscles: &["chest"],
        equipment: &[],
        contraindications: &["wrist", "shoulder"],
    },
    CatalogExercise {
        name: "Incline Push-Up",
        exercise_type: ExerciseType::Compound,
        muscles: &["chest"],
        equipment: &[],
        contraindications: &["wrist"],
    },
    CatalogExercise {
        name: "Overhead Press",
        exercise_type: ExerciseType::Compound,
        muscles: &["shoulders"],
        equipment: &["barbell"],
        contraindications: &["shoulder"],
    },
    CatalogExercise {
        name: "Dumbbell Shoulder Press",
        exercise_type: ExerciseType::Compound,
        muscles: &["shoulders"],
        equipment: &["dumbbells"],
        contraindications: &["shoulder"],
    },
    CatalogExercise {
        name: "Pike Push-Up",
        exercise_type: ExerciseType::Compound,
        muscles: &["shoulders"],
        equipment: &[],
        contraindications: &["wrist", "shoulder"],
    },
    CatalogExercise {
        name: "Pull-Up",
        exercise_type: ExerciseType::Compound,
        muscles: &["back"],
        equipment: &["pull-up bar"],
        contraindications: &["shoulder", "elbow"],
    },
    CatalogExercise {
        name: "Bent-Over Row",
        exercise_type: ExerciseType::Compound,
        muscles: &["back"],
        equipment: &["barbell"],
        contraindications: &["lower back"],
    },
    CatalogExercise {
        name: "Dumbbell Row",
        exercise_type: ExerciseType::Compound,
        muscles: &["back"],
        equipment: &["dumbbells"],
        contraindications: &[],
    },
    CatalogExercise {
        name: "Seated Cable Row",
        exercise_type: ExerciseType::Compound,
        muscles: &["back"],
        equipment: &["cable machine"],
        contraindications: &[],
    },
    CatalogExercise {
        name: "Inverted Row",
        exercise_type: ExerciseType::Compound,
        muscles: &["back"],
        equipment: &[],
        contraindications: &["shoulder"],
    },
    CatalogExercise {
        name: "Band Row",
        exercise_type: ExerciseType::Compound,
        muscles: &["back"],
        equipment: &["resistance bands"],
        contraindications: &[],
    },
    // ── Isolation ───────────────────────────────────────────────────
    CatalogExercise {
        name: "Bicep Curl",
        exercise_type: ExerciseType::Isolation,
        muscles: &["arms"],
        equipment: &["dumbbells"],
        contraindications: &["elbow"],
    },
    CatalogExercise {
        name: "Band Curl",
        exercise_type: ExerciseType::Isolation,
        muscles: &["arms"],
        equipment: &["resistance bands"],
        contraindications: &["elbow"],
    },
    CatalogExercise {
        name: "Bench Dip",
        exercise_type: ExerciseType::Isolation,
        muscles: &["arms"],
        equipment: &["bench"],
        contraindications: &["shoulder", "elbow"],
    },
    CatalogExercise {
        name: "Overhead Tricep Extension",
        exercise_type: ExerciseType::Isolation,
        muscles: &["arms"],
        equipment: &["dumbbells"],
        contraindications: &["elbow", "shoulder"],
    },
    CatalogExercise {
        name: "Lateral Raise",
        exercise_type: ExerciseType::Isolation,
        muscles: &["shoulders"],
        equipment: &["dumbbells"],
        contraindications: &["shoulder"],
    },
    CatalogExercise {
        name: "Band Pull-Apart",
        exercise_type: ExerciseType::Isolation,
        muscles: &["shoulders"],
        equipment: &["resistance bands"],
        contraindications: &[],
    },
    CatalogExercise {
        name: "Dumbbell Fly",
        exercise_type: ExerciseType::Isolation,
        muscles: &["chest"],
        equipment: &["dumbbells", "bench"],
        contraindications: &["shoulder"],
    },
    CatalogExercise {
        name: "Calf Raise",
        exercise_type: ExerciseType::Isolation,
        muscles: &["legs"],
        equipment: &[],
        contraindications: &["ankle"],
    },
    CatalogExercise {
        name: "Band Leg Curl",
        exercise_type: ExerciseType::Isolation,
        muscles: &["legs"],
        equipment: &["resistance bands"],
        contraindications: &["knee"],
    },
    CatalogExercise {
        name: "Plank",
        exercise_type: ExerciseType::Isolation,
        muscles: &["core"],
        equipment: &[],
        contraindications: &["shoulder"],
    },
    CatalogExercise {
        name: "Crunch",
        exercise_type: ExerciseType::Isolation,
        muscles: &["core"],
        equipment: &[],
        contraindications: &["lower back"],
    },
    CatalogExercise {
        name: "Russian Twist",
        exercise_type: ExerciseType::Isolation,
        muscles: &["core"],
        equipment: &[],
        contraindications: &["lower back"],
    },
    CatalogExercise {
        name: "Hanging Knee Raise",
        exercise_type: ExerciseType::Isolation,
        muscles: &["core"],
        equipment: &["pull-up bar"],
        contraindications: &[],
    },
    // ── Cardio / conditioning ───────────────────────────────────────
    CatalogExercise {
        name: "Jumping Jacks",
        exercise_type: ExerciseType::Cardio,
        muscles: &["cardio"],
        equipment: &[],
        contraindications: &["knee", "ankle"],
    },
    CatalogExercise {
        name: "Burpee",
        exercise_type: ExerciseType::Cardio,
        muscles: &["cardio"],
        equipment: &[],
        contraindications: &["knee", "wrist"],
    },
    CatalogExercise {
        name: "Mountain Climbers",
        exercise_type: ExerciseType::Cardio,
        muscles: &["cardio", "core"],
        equipment: &[],
        contraindications: &["wrist"],
    },
    CatalogExercise {
        name: "High Knees",
        exercise_type: ExerciseType::Cardio,
        muscles: &["cardio"],
        equipment: &[],
        contraindications: &["knee"],
    },
    CatalogExercise {
        name: "Kettlebell Swing",
        exercise_type: ExerciseType::Cardio,
        muscles: &["cardio", "legs"],
        equipment: &["kettlebell"],
        contraindications: &["lower back"],
    },
    CatalogExercise {
        name: "Treadmill Intervals",
        exercise_type: ExerciseType::Cardio,
        muscles: &["cardio"],
        equipment: &["treadmill"],
        contraindications: &["knee"],
    },
    CatalogExercise {
        name: "Rowing Machine Intervals",
        exercise_type: ExerciseType::Cardio,
        muscles: &["cardio", "back"],
        equipment: &["rowing machine"],
        contraindications: &["lower back"],
    },
    // ── Flexibility ─────────────────────────────────────────────────
    CatalogExercise {
        name: "Standing Hamstring Stretch",
        exercise_type: ExerciseType::Flexibility,
        muscles: &["legs"],
        equipment: &[],
        contraindications: &[],
    },
    CatalogExercise {
        name: "World's Greatest Stretch",
        exercise_type: ExerciseType::Flexibility,
        muscles: &["core", "legs"],
        equipment: &[],
        contraindications: &[],
    },
];

/// Dietary tags a meal can carry. Diet-type exclusion works on tags, not on
/// ingredient substrings, so "almond milk" never reads as dairy.
pub mod diet_tags {
    pub const MEAT: &str = "meat";
    pub const FISH: &str = "fish";
    pub const DAIRY: &str = "dairy";
    pub const EGGS: &str = "eggs";
    pub const HONEY: &str = "honey";
}

/// One meal the meal generator can suggest.
#[derive(Debug, Clone, Copy)]
pub struct CatalogMeal {
    pub name: &'static str,
    /// Eating occasion: "breakfast", "lunch", "dinner", or "snack".
    pub meal_type: &'static str,
    pub ingredients: &'static [&'static str],
    /// Dietary tags from [`diet_tags`].
    pub tags: &'static [&'static str],
}

pub static MEALS: &[CatalogMeal] = &[
    // ── Breakfast ───────────────────────────────────────────────────
    CatalogMeal {
        name: "Overnight Oats",
        meal_type: "breakfast",
        ingredients: &["oats", "almond milk", "chia seeds", "banana"],
        tags: &[],
    },
    CatalogMeal {
        name: "Greek Yogurt Parfait",
        meal_type: "breakfast",
        ingredients: &["greek yogurt", "berries", "granola", "honey"],
        tags: &[diet_tags::DAIRY, diet_tags::HONEY],
    },
    CatalogMeal {
        name: "Veggie Omelette",
        meal_type: "breakfast",
        ingredients: &["eggs", "spinach", "peppers", "cheese"],
        tags: &[diet_tags::EGGS, diet_tags::DAIRY],
    },
    CatalogMeal {
        name: "Tofu Scramble",
        meal_type: "breakfast",
        ingredients: &["tofu", "turmeric", "spinach", "tomatoes"],
        tags: &[],
    },
    CatalogMeal {
        name: "Peanut Butter Banana Toast",
        meal_type: "breakfast",
        ingredients: &["wholegrain bread", "peanut butter", "banana"],
        tags: &[],
    },
    // ── Lunch ───────────────────────────────────────────────────────
    CatalogMeal {
        name: "Grilled Chicken Salad",
        meal_type: "lunch",
        ingredients: &["chicken breast", "lettuce", "tomatoes", "olive oil"],
        tags: &[diet_tags::MEAT],
    },
    CatalogMeal {
        name: "Tuna Wrap",
        meal_type: "lunch",
        ingredients: &["tuna", "tortilla", "lettuce", "greek yogurt"],
        tags: &[diet_tags::FISH, diet_tags::DAIRY],
    },
    CatalogMeal {
        name: "Quinoa Buddha Bowl",
        meal_type: "lunch",
        ingredients: &["quinoa", "chickpeas", "avocado", "kale", "tahini"],
        tags: &[],
    },
    CatalogMeal {
        name: "Lentil Soup",
        meal_type: "lunch",
        ingredients: &["lentils", "carrots", "celery", "onion"],
        tags: &[],
    },
    CatalogMeal {
        name: "Turkey Sandwich",
        meal_type: "lunch",
        ingredients: &["turkey", "wholegrain bread", "lettuce", "mustard"],
        tags: &[diet_tags::MEAT],
    },
    CatalogMeal {
        name: "Black Bean Burrito",
        meal_type: "lunch",
        ingredients: &["black beans", "rice", "tortilla", "salsa"],
        tags: &[],
    },
    // ── Dinner ──────────────────────────────────────────────────────
    CatalogMeal {
        name: "Baked Salmon with Vegetables",
        meal_type: "dinner",
        ingredients: &["salmon", "broccoli", "olive oil", "lemon"],
        tags: &[diet_tags::FISH],
    },
    CatalogMeal {
        name: "Beef Stir-Fry",
        meal_type: "dinner",
        ingredients: &["beef", "rice", "peppers", "soy sauce"],
        tags: &[diet_tags::MEAT],
    },
    CatalogMeal {
        name: "Chicken Burrito Bowl",
        meal_type: "dinner",
        ingredients: &["chicken breast", "rice", "black beans", "corn"],
        tags: &[diet_tags::MEAT],
    },
    CatalogMeal {
        name: "Chickpea Curry",
        meal_type: "dinner",
        ingredients: &["chickpeas", "coconut milk", "tomatoes", "rice"],
        tags: &[],
    },
    CatalogMeal {
        name: "Tofu Stir-Fry",
        meal_type: "dinner",
        ingredients: &["tofu", "rice", "broccoli", "soy sauce"],
        tags: &[],
    },
    CatalogMeal {
        name: "Shrimp Pasta",
        meal_type: "dinner",
        ingredients: &["shrimp", "pasta", "garlic", "olive oil"],
        tags: &[diet_tags::FISH],
    },
    CatalogMeal {
        name: "Vegetable Pasta",
        meal_type: "dinner",
        ingredients: &["pasta", "tomatoes", "zucchini", "olive oil"],
        tags: &[],
    },
    // ── Snacks ──────────────────────────────────────────────────────
    CatalogMeal {
        name: "Protein Shake",
        meal_type: "snack",
        ingredients: &["whey protein", "milk", "banana"],
        tags: &[diet_tags::DAIRY],
    },
    CatalogMeal {
        name: "Trail Mix",
        meal_type: "snack",
        ingredients: &["almonds", "walnuts", "raisins", "dark chocolate"],
        tags: &[],
    },
    CatalogMeal {
        name: "Hummus and Veggies",
        meal_type: "snack",
        ingredients: &["hummus", "carrots", "cucumber"],
        tags: &[],
    },
    CatalogMeal {
        name: "Cottage Cheese Bowl",
        meal_type: "snack",
        ingredients: &["cottage cheese", "pineapple"],
        tags: &[diet_tags::DAIRY],
    },
    CatalogMeal {
        name: "Apple with Almond Butter",
        meal_type: "snack",
        ingredients: &["apple", "almond butter"],
        tags: &[],
    },
    CatalogMeal {
        name: "Edamame",
        meal_type: "snack",
        ingredients: &["edamame", "sea salt"],
        tags: &[],
    },
];
