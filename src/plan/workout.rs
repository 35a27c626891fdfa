//! Workout plan generation.
//!
//! `generate` is a pure function over a [`WorkoutConstraints`] value: the
//! same constraints always yield the same plan. `modify` applies a delta;
//! structural deltas (frequency, training split) cascade-regenerate the
//! training days rather than patching them, so the split/day invariant can
//! never drift.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{ConstraintError, Error, ModificationError};

use super::catalog::{CatalogExercise, EXERCISES, GYM_STANDARD_EQUIPMENT};
use super::model::{
    Exercise, ExerciseType, FitnessLevel, Location, PrimaryGoal, TrainingSplit, WorkoutConstraints,
    WorkoutDay, WorkoutPlan,
};

const DAY_LETTERS: [&str; 7] = ["A", "B", "C", "D", "E", "F", "G"];

const FULL_BODY_TARGETS: &[&str] = &["legs", "chest", "back", "shoulders", "core"];
const UPPER_TARGETS: &[&str] = &["chest", "back", "shoulders", "arms"];
const LOWER_TARGETS: &[&str] = &["legs", "core"];
const PUSH_TARGETS: &[&str] = &["chest", "shoulders", "arms"];
const PULL_TARGETS: &[&str] = &["back", "arms"];
const LEG_DAY_TARGETS: &[&str] = &["legs", "core"];
const CONDITIONING_TARGETS: &[&str] = &["cardio", "core"];

/// Which equipment mix a day's selection must favor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MixPreference {
    Bodyweight,
    Equipped,
}

/// Deterministic workout plan generator.
pub struct WorkoutPlanGenerator {
    seconds_per_rep: u32,
}

/// A requested change to an existing workout plan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutDelta {
    pub frequency: Option<u8>,
    pub duration_minutes: Option<u32>,
    pub training_split: Option<TrainingSplit>,
}

impl WorkoutDelta {
    pub fn is_empty(&self) -> bool {
        self.frequency.is_none()
            && self.duration_minutes.is_none()
            && self.training_split.is_none()
    }

    /// Structural deltas invalidate the day layout and force regeneration.
    pub fn is_structural(&self) -> bool {
        self.frequency.is_some() || self.training_split.is_some()
    }
}

impl WorkoutPlanGenerator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            seconds_per_rep: config.seconds_per_rep,
        }
    }

    /// Generate a plan from validated constraints.
    pub fn generate(&self, constraints: &WorkoutConstraints) -> Result<WorkoutPlan, ConstraintError> {
        constraints.validate()?;
        let split = select_split(constraints.fitness_level, constraints.frequency);
        let workout_days = self.generate_days(split, constraints)?;

        let plan = WorkoutPlan {
            frequency: constraints.frequency,
            duration_minutes: constraints.duration_minutes,
            location: constraints.location,
            equipment: constraints.equipment.clone(),
            training_split: split,
            workout_days,
            progression_strategy: progression_strategy(
                constraints.fitness_level,
                constraints.primary_goal,
            ),
        };
        plan.validate(self.seconds_per_rep)?;
        debug!(
            split = %plan.training_split,
            days = plan.workout_days.len(),
            "generated workout plan"
        );
        Ok(plan)
    }

    /// Apply a delta to an existing plan.
    ///
    /// An empty delta returns a plan equal to the input. Structural deltas
    /// re-run split selection and day generation in full; a duration change
    /// patches the field and re-trims every day to the new budget.
    pub fn modify(
        &self,
        constraints: &WorkoutConstraints,
        plan: &WorkoutPlan,
        delta: &WorkoutDelta,
    ) -> Result<WorkoutPlan, Error> {
        if delta.is_empty() {
            return Ok(plan.clone());
        }

        if let Some(frequency) = delta.frequency
            && !(2..=7).contains(&frequency)
        {
            return Err(ModificationError::OutOfRange {
                field: "frequency".into(),
                allowed: "2-7".into(),
            }
            .into());
        }
        if let Some(duration) = delta.duration_minutes
            && !(20..=180).contains(&duration)
        {
            return Err(ModificationError::OutOfRange {
                field: "duration_minutes".into(),
                allowed: "20-180".into(),
            }
            .into());
        }

        let mut updated = constraints.clone();
        if let Some(frequency) = delta.frequency {
            updated.frequency = frequency;
        }
        if let Some(duration) = delta.duration_minutes {
            updated.duration_minutes = duration;
        }

        let plan = if delta.is_structural() {
            let split = delta
                .training_split
                .unwrap_or_else(|| select_split(updated.fitness_level, updated.frequency));
            let workout_days = self.generate_days(split, &updated)?;
            WorkoutPlan {
                frequency: updated.frequency,
                duration_minutes: updated.duration_minutes,
                location: updated.location,
                equipment: updated.equipment.clone(),
                training_split: split,
                workout_days,
                progression_strategy: plan.progression_strategy.clone(),
            }
        } else {
            let mut patched = plan.clone();
            patched.duration_minutes = updated.duration_minutes;
            for day in &mut patched.workout_days {
                self.trim_to_budget(day, updated.duration_minutes);
            }
            patched
        };

        plan.validate(self.seconds_per_rep)?;
        Ok(plan)
    }

    /// Build one day per split slot, insert the fat-loss conditioning block
    /// when missing, and trim every day to the session budget.
    fn generate_days(
        &self,
        split: TrainingSplit,
        constraints: &WorkoutConstraints,
    ) -> Result<Vec<WorkoutDay>, ConstraintError> {
        let available = available_equipment(constraints);
        let mut days = Vec::with_capacity(usize::from(constraints.frequency));

        for (name, targets) in day_templates(split, constraints.frequency) {
            let day = self.build_day(&name, targets, constraints, &available)?;
            days.push(day);
        }

        if constraints.primary_goal == PrimaryGoal::FatLoss {
            self.ensure_weekly_cardio(&mut days, constraints, &available);
        }

        for day in &mut days {
            self.trim_to_budget(day, constraints.duration_minutes);
        }
        Ok(days)
    }

    fn build_day(
        &self,
        name: &str,
        targets: &[&str],
        constraints: &WorkoutConstraints,
        available: &BTreeSet<String>,
    ) -> Result<WorkoutDay, ConstraintError> {
        let candidates: Vec<&CatalogExercise> = ordered_candidates(targets, constraints, available);
        if candidates.is_empty() {
            return Err(ConstraintError::invalid(
                "limitations",
                format!("no safe exercises remain for the {name} day"),
                "fewer limitations, or more equipment",
            ));
        }

        let count = exercise_count(constraints.duration_minutes);
        let preference = mix_preference(constraints);
        let mut selected = select_exercises(&candidates, count, preference);
        enforce_mix(&mut selected, preference);

        let mut exercises: Vec<Exercise> = selected
            .iter()
            .map(|e| self.prescribe(e, constraints))
            .collect();

        // Cool-down stretch; sits last so the budget trim drops it first.
        if let Some(stretch) = cooldown(constraints, available)
            && !exercises.iter().any(|e| e.name == stretch.name)
        {
            exercises.push(self.prescribe(stretch, constraints));
        }

        Ok(WorkoutDay {
            name: name.to_string(),
            exercises,
        })
    }

    /// Fat-loss plans carry at least one cardio/conditioning block per week.
    fn ensure_weekly_cardio(
        &self,
        days: &mut [WorkoutDay],
        constraints: &WorkoutConstraints,
        available: &BTreeSet<String>,
    ) {
        let has_cardio = days.iter().any(|d| {
            d.exercises
                .iter()
                .any(|e| e.exercise_type == ExerciseType::Cardio)
        });
        if has_cardio {
            return;
        }

        let cardio = EXERCISES.iter().find(|e| {
            e.exercise_type == ExerciseType::Cardio
                && equipment_ok(e, available)
                && !contraindicated(e, &constraints.limitations)
        });
        if let (Some(cardio), Some(day)) = (cardio, days.first_mut()) {
            let position = day.exercises.len().min(2);
            day.exercises
                .insert(position, self.prescribe(cardio, constraints));
        }
    }

    fn prescribe(&self, exercise: &CatalogExercise, constraints: &WorkoutConstraints) -> Exercise {
        let (sets, reps, rest_seconds) = prescription(
            constraints.fitness_level,
            constraints.primary_goal,
            exercise.exercise_type,
        );
        Exercise {
            name: exercise.name.to_string(),
            exercise_type: exercise.exercise_type,
            sets,
            reps: reps.to_string(),
            rest_seconds,
        }
    }

    /// Shrink a day until its estimated time fits the session budget:
    /// first strip sets from the tail exercise, then drop it entirely.
    fn trim_to_budget(&self, day: &mut WorkoutDay, duration_minutes: u32) {
        let budget = duration_minutes * 60;
        while day.estimated_seconds(self.seconds_per_rep) > budget {
            let Some(last_sets) = day.exercises.last().map(|e| e.sets) else {
                return;
            };
            if last_sets > 2 {
                day.exercises.last_mut().unwrap().sets -= 1;
            } else if day.exercises.len() > 1 {
                day.exercises.pop();
            } else if last_sets > 1 {
                day.exercises.last_mut().unwrap().sets -= 1;
            } else {
                return;
            }
        }
    }
}

/// Training-split lookup keyed by `(fitness_level, frequency)`.
fn select_split(level: FitnessLevel, frequency: u8) -> TrainingSplit {
    match level {
        FitnessLevel::Beginner => {
            if frequency <= 3 {
                TrainingSplit::FullBody
            } else {
                TrainingSplit::UpperLower
            }
        }
        FitnessLevel::Intermediate => match frequency {
            ..=3 => TrainingSplit::FullBody,
            4 => TrainingSplit::UpperLower,
            _ => TrainingSplit::PushPullLegs,
        },
        FitnessLevel::Advanced => match frequency {
            ..=3 => TrainingSplit::FullBody,
            4 => TrainingSplit::UpperLower,
            5 => TrainingSplit::PushPullLegs,
            _ => TrainingSplit::BodyPartSplit,
        },
    }
}

/// One `(day name, target muscles)` pair per frequency slot.
fn day_templates(split: TrainingSplit, frequency: u8) -> Vec<(String, &'static [&'static str])> {
    let cycle: Vec<(&str, &'static [&'static str])> = match split {
        TrainingSplit::FullBody => {
            return (0..usize::from(frequency))
                .map(|i| (format!("Full Body {}", DAY_LETTERS[i]), FULL_BODY_TARGETS))
                .collect();
        }
        TrainingSplit::UpperLower => vec![
            ("Upper Body", UPPER_TARGETS),
            ("Lower Body", LOWER_TARGETS),
        ],
        TrainingSplit::PushPullLegs => vec![
            ("Push", PUSH_TARGETS),
            ("Pull", PULL_TARGETS),
            ("Legs", LEG_DAY_TARGETS),
        ],
        TrainingSplit::BodyPartSplit => vec![
            ("Chest", &["chest"] as &[&str]),
            ("Back", &["back"]),
            ("Legs", LEG_DAY_TARGETS),
            ("Shoulders", &["shoulders"]),
            ("Arms", &["arms"]),
            ("Conditioning", CONDITIONING_TARGETS),
            ("Core & Mobility", &["core"]),
        ],
    };

    (0..usize::from(frequency))
        .map(|i| {
            let (base, targets) = cycle[i % cycle.len()];
            let round = i / cycle.len();
            let name = if round == 0 {
                base.to_string()
            } else {
                format!("{base} {}", round + 1)
            };
            (name, targets)
        })
        .collect()
}

fn available_equipment(constraints: &WorkoutConstraints) -> BTreeSet<String> {
    let mut available: BTreeSet<String> = constraints
        .equipment
        .iter()
        .map(|e| e.to_lowercase())
        .collect();
    if constraints.location == Location::Gym {
        available.extend(GYM_STANDARD_EQUIPMENT.iter().map(|e| e.to_string()));
    }
    available
}

fn equipment_ok(exercise: &CatalogExercise, available: &BTreeSet<String>) -> bool {
    exercise
        .equipment
        .iter()
        .all(|required| available.contains(*required))
}

/// A limitation rules an exercise out when it names (or shares a word stem
/// with) one of the exercise's contraindicated joints/regions.
fn contraindicated(exercise: &CatalogExercise, limitations: &BTreeSet<String>) -> bool {
    exercise.contraindications.iter().any(|contra| {
        limitations.iter().any(|lim| {
            let lim = lim.to_lowercase();
            lim.contains(contra)
                || lim.split_whitespace().any(|word| {
                    contra
                        .split_whitespace()
                        .any(|cw| word.starts_with(cw) || cw.starts_with(word))
                })
        })
    })
}

fn mix_preference(constraints: &WorkoutConstraints) -> Option<MixPreference> {
    match constraints.location {
        Location::Home if constraints.equipment.len() < 3 => Some(MixPreference::Bodyweight),
        Location::Gym => Some(MixPreference::Equipped),
        Location::Home => None,
    }
}

fn matches_preference(exercise: &CatalogExercise, preference: MixPreference) -> bool {
    match preference {
        MixPreference::Bodyweight => exercise.is_bodyweight(),
        MixPreference::Equipped => !exercise.is_bodyweight(),
    }
}

/// Candidates for a day: on-target, equipped, safe — compounds first,
/// catalog order within each type.
fn ordered_candidates<'a>(
    targets: &[&str],
    constraints: &WorkoutConstraints,
    available: &BTreeSet<String>,
) -> Vec<&'a CatalogExercise> {
    let mut candidates: Vec<&CatalogExercise> = EXERCISES
        .iter()
        .filter(|e| e.exercise_type != ExerciseType::Flexibility)
        .filter(|e| e.muscles.iter().any(|m| targets.contains(m)))
        .filter(|e| equipment_ok(e, available))
        .filter(|e| !contraindicated(e, &constraints.limitations))
        .collect();
    candidates.sort_by_key(|e| type_rank(e.exercise_type));
    candidates
}

fn type_rank(exercise_type: ExerciseType) -> u8 {
    match exercise_type {
        ExerciseType::Compound => 0,
        ExerciseType::Isolation => 1,
        ExerciseType::Cardio => 2,
        ExerciseType::Flexibility => 3,
    }
}

/// How many working exercises a session of this length carries.
fn exercise_count(duration_minutes: u32) -> usize {
    ((duration_minutes / 8) as usize).clamp(3, 8)
}

/// Pick `count` exercises: first fill the mix quota from the preferred
/// pool, then round out the day, capping each primary muscle at two picks
/// while alternatives remain.
fn select_exercises<'a>(
    candidates: &[&'a CatalogExercise],
    count: usize,
    preference: Option<MixPreference>,
) -> Vec<&'a CatalogExercise> {
    let quota = match preference {
        Some(_) => (count * 3).div_ceil(5), // ceil(0.6 * count)
        None => 0,
    };
    let quota = quota.min(count);

    let mut selected: Vec<&CatalogExercise> = Vec::with_capacity(count);
    let mut muscle_counts: BTreeMap<&str, usize> = BTreeMap::new();

    let pick = |pool_filter: &dyn Fn(&CatalogExercise) -> bool,
                    cap_muscles: bool,
                    limit: usize,
                    selected: &mut Vec<&'a CatalogExercise>,
                    muscle_counts: &mut BTreeMap<&str, usize>| {
        for &candidate in candidates {
            if selected.len() >= limit {
                break;
            }
            if !pool_filter(candidate) || selected.iter().any(|s| s.name == candidate.name) {
                continue;
            }
            let primary = candidate.muscles[0];
            if cap_muscles && muscle_counts.get(primary).copied().unwrap_or(0) >= 2 {
                continue;
            }
            *muscle_counts.entry(primary).or_insert(0) += 1;
            selected.push(candidate);
        }
    };

    if let Some(preference) = preference {
        pick(
            &|e| matches_preference(e, preference),
            true,
            quota,
            &mut selected,
            &mut muscle_counts,
        );
    }
    pick(&|_| true, true, count, &mut selected, &mut muscle_counts);
    // Relax the muscle cap if the pool was too narrow to fill the day.
    pick(&|_| true, false, count, &mut selected, &mut muscle_counts);

    selected
}

/// Drop trailing off-preference picks until the mix rule holds.
fn enforce_mix(selected: &mut Vec<&CatalogExercise>, preference: Option<MixPreference>) {
    let Some(preference) = preference else { return };
    loop {
        let preferred = selected
            .iter()
            .filter(|e| matches_preference(e, preference))
            .count();
        if selected.len() <= 1 || preferred * 5 >= selected.len() * 3 {
            return;
        }
        let Some(pos) = selected
            .iter()
            .rposition(|e| !matches_preference(e, preference))
        else {
            return;
        };
        selected.remove(pos);
    }
}

fn cooldown<'a>(
    constraints: &WorkoutConstraints,
    available: &BTreeSet<String>,
) -> Option<&'a CatalogExercise> {
    EXERCISES.iter().find(|e| {
        e.exercise_type == ExerciseType::Flexibility
            && equipment_ok(e, available)
            && !contraindicated(e, &constraints.limitations)
    })
}

/// Sets/reps/rest by goal and movement type; beginners drop one working set.
fn prescription(
    level: FitnessLevel,
    goal: PrimaryGoal,
    exercise_type: ExerciseType,
) -> (u8, &'static str, u32) {
    let (sets, reps, rest): (u8, &'static str, u32) = match exercise_type {
        ExerciseType::Cardio => (3, "15-20", 30),
        ExerciseType::Flexibility => (2, "10", 20),
        ExerciseType::Compound => match goal {
            PrimaryGoal::MuscleGain => (4, "8-12", 90),
            PrimaryGoal::FatLoss => (3, "12-15", 45),
            PrimaryGoal::GeneralFitness => (3, "10-12", 60),
        },
        ExerciseType::Isolation => match goal {
            PrimaryGoal::MuscleGain => (3, "8-12", 60),
            PrimaryGoal::FatLoss => (3, "12-15", 45),
            PrimaryGoal::GeneralFitness => (3, "10-12", 60),
        },
    };
    let sets = if level == FitnessLevel::Beginner
        && matches!(
            exercise_type,
            ExerciseType::Compound | ExerciseType::Isolation
        ) {
        sets.saturating_sub(1).max(2)
    } else {
        sets
    };
    (sets, reps, rest)
}

/// Progression strategy keyed by `(fitness_level, primary_goal)`.
fn progression_strategy(level: FitnessLevel, goal: PrimaryGoal) -> String {
    let strategy = match (level, goal) {
        (FitnessLevel::Beginner, PrimaryGoal::FatLoss) => {
            "Add one rep per set each week; once the top of the range feels easy, shorten rest by 5 seconds"
        }
        (FitnessLevel::Beginner, PrimaryGoal::MuscleGain) => {
            "Master form first, then add a small load or one rep per week on the main lifts"
        }
        (FitnessLevel::Beginner, PrimaryGoal::GeneralFitness) => {
            "Add one rep per set each week and retest your baseline every four weeks"
        }
        (FitnessLevel::Intermediate, PrimaryGoal::FatLoss) => {
            "Hold loads steady while trimming rest 5-10 seconds per week, then rebuild loads"
        }
        (FitnessLevel::Intermediate, PrimaryGoal::MuscleGain) => {
            "Double progression: climb from the bottom to the top of the rep range, then add weight"
        }
        (FitnessLevel::Intermediate, PrimaryGoal::GeneralFitness) => {
            "Rotate rep ranges every three weeks between 8-10 and 12-15"
        }
        (FitnessLevel::Advanced, PrimaryGoal::FatLoss) => {
            "Run density blocks: same work in less time, plus one conditioning finisher per week"
        }
        (FitnessLevel::Advanced, PrimaryGoal::MuscleGain) => {
            "Periodize in four-week waves: accumulate volume, intensify, then deload"
        }
        (FitnessLevel::Advanced, PrimaryGoal::GeneralFitness) => {
            "Alternate strength-focused and conditioning-focused weeks; deload every fifth week"
        }
    };
    strategy.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> WorkoutPlanGenerator {
        WorkoutPlanGenerator::new(&EngineConfig::default())
    }

    fn constraints(
        level: FitnessLevel,
        goal: PrimaryGoal,
        frequency: u8,
        duration_minutes: u32,
        location: Location,
        equipment: &[&str],
    ) -> WorkoutConstraints {
        WorkoutConstraints {
            fitness_level: level,
            primary_goal: goal,
            frequency,
            duration_minutes,
            location,
            equipment: equipment.iter().map(|e| e.to_string()).collect(),
            limitations: BTreeSet::new(),
        }
    }

    #[test]
    fn split_lookup_matches_table() {
        use FitnessLevel::*;
        use TrainingSplit::*;
        let cases = [
            (Beginner, 2, FullBody),
            (Beginner, 3, FullBody),
            (Beginner, 4, UpperLower),
            (Beginner, 7, UpperLower),
            (Intermediate, 3, FullBody),
            (Intermediate, 4, UpperLower),
            (Intermediate, 5, PushPullLegs),
            (Intermediate, 7, PushPullLegs),
            (Advanced, 3, FullBody),
            (Advanced, 4, UpperLower),
            (Advanced, 5, PushPullLegs),
            (Advanced, 6, BodyPartSplit),
            (Advanced, 7, BodyPartSplit),
        ];
        for (level, frequency, expected) in cases {
            assert_eq!(
                select_split(level, frequency),
                expected,
                "{level} at {frequency} days"
            );
        }
    }

    #[test]
    fn beginner_muscle_gain_gym_scenario() {
        let c = constraints(
            FitnessLevel::Beginner,
            PrimaryGoal::MuscleGain,
            3,
            60,
            Location::Gym,
            &["dumbbells", "barbell"],
        );
        let plan = generator().generate(&c).unwrap();

        assert_eq!(plan.training_split, TrainingSplit::FullBody);
        assert_eq!(plan.workout_days.len(), 3);

        for day in &plan.workout_days {
            let working: Vec<&Exercise> = day
                .exercises
                .iter()
                .filter(|e| {
                    matches!(
                        e.exercise_type,
                        ExerciseType::Compound | ExerciseType::Isolation
                    )
                })
                .collect();
            let compounds = working
                .iter()
                .filter(|e| e.exercise_type == ExerciseType::Compound)
                .count();
            assert!(
                compounds * 5 >= working.len() * 3,
                "day {} has {compounds}/{} compounds",
                day.name,
                working.len()
            );
            // Muscle-gain resistance work is prescribed at 8-12.
            for exercise in &working {
                assert_eq!(exercise.reps, "8-12");
            }
        }
    }

    #[test]
    fn fat_loss_plan_includes_cardio() {
        let c = constraints(
            FitnessLevel::Intermediate,
            PrimaryGoal::FatLoss,
            4,
            45,
            Location::Gym,
            &[],
        );
        let plan = generator().generate(&c).unwrap();
        let has_cardio = plan.workout_days.iter().any(|d| {
            d.exercises
                .iter()
                .any(|e| e.exercise_type == ExerciseType::Cardio)
        });
        assert!(has_cardio);
    }

    #[test]
    fn home_with_little_equipment_is_mostly_bodyweight() {
        let c = constraints(
            FitnessLevel::Beginner,
            PrimaryGoal::GeneralFitness,
            3,
            45,
            Location::Home,
            &["resistance bands"],
        );
        let plan = generator().generate(&c).unwrap();
        let bodyweight_names: BTreeSet<&str> = EXERCISES
            .iter()
            .filter(|e| e.is_bodyweight())
            .map(|e| e.name)
            .collect();
        for day in &plan.workout_days {
            let bodyweight = day
                .exercises
                .iter()
                .filter(|e| bodyweight_names.contains(e.name.as_str()))
                .count();
            assert!(
                bodyweight * 5 >= day.exercises.len() * 3,
                "day {} is only {bodyweight}/{} bodyweight",
                day.name,
                day.exercises.len()
            );
        }
    }

    #[test]
    fn gym_plan_is_mostly_equipped() {
        let c = constraints(
            FitnessLevel::Intermediate,
            PrimaryGoal::MuscleGain,
            4,
            60,
            Location::Gym,
            &[],
        );
        let plan = generator().generate(&c).unwrap();
        let equipped_names: BTreeSet<&str> = EXERCISES
            .iter()
            .filter(|e| !e.is_bodyweight())
            .map(|e| e.name)
            .collect();
        for day in &plan.workout_days {
            let working = day
                .exercises
                .iter()
                .filter(|e| e.exercise_type != ExerciseType::Flexibility)
                .count();
            let equipped = day
                .exercises
                .iter()
                .filter(|e| equipped_names.contains(e.name.as_str()))
                .count();
            assert!(
                equipped * 5 >= working * 3,
                "day {} is only {equipped}/{working} equipped",
                day.name
            );
        }
    }

    #[test]
    fn limitation_excludes_contraindicated_exercises() {
        let mut c = constraints(
            FitnessLevel::Intermediate,
            PrimaryGoal::GeneralFitness,
            3,
            60,
            Location::Gym,
            &[],
        );
        c.limitations.insert("bad knees".into());
        let plan = generator().generate(&c).unwrap();

        let knee_risky: BTreeSet<&str> = EXERCISES
            .iter()
            .filter(|e| e.contraindications.contains(&"knee"))
            .map(|e| e.name)
            .collect();
        for day in &plan.workout_days {
            for exercise in &day.exercises {
                assert!(
                    !knee_risky.contains(exercise.name.as_str()),
                    "{} prescribed despite knee limitation",
                    exercise.name
                );
            }
        }
    }

    #[test]
    fn every_day_fits_the_time_budget() {
        let config = EngineConfig::default();
        let c = constraints(
            FitnessLevel::Advanced,
            PrimaryGoal::MuscleGain,
            6,
            20,
            Location::Gym,
            &[],
        );
        let plan = generator().generate(&c).unwrap();
        for day in &plan.workout_days {
            assert!(
                day.estimated_seconds(config.seconds_per_rep) <= 20 * 60,
                "day {} over budget",
                day.name
            );
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let c = constraints(
            FitnessLevel::Intermediate,
            PrimaryGoal::FatLoss,
            5,
            50,
            Location::Home,
            &["dumbbells", "bench", "resistance bands"],
        );
        let a = generator().generate(&c).unwrap();
        let b = generator().generate(&c).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_delta_returns_equal_plan() {
        let c = constraints(
            FitnessLevel::Beginner,
            PrimaryGoal::GeneralFitness,
            3,
            45,
            Location::Home,
            &[],
        );
        let plan = generator().generate(&c).unwrap();
        let modified = generator()
            .modify(&c, &plan, &WorkoutDelta::default())
            .unwrap();
        assert_eq!(plan, modified);
    }

    #[test]
    fn frequency_delta_cascades_to_split_and_days() {
        let c = constraints(
            FitnessLevel::Intermediate,
            PrimaryGoal::MuscleGain,
            4,
            60,
            Location::Gym,
            &[],
        );
        let plan = generator().generate(&c).unwrap();
        assert_eq!(plan.training_split, TrainingSplit::UpperLower);

        let delta = WorkoutDelta {
            frequency: Some(3),
            ..Default::default()
        };
        let modified = generator().modify(&c, &plan, &delta).unwrap();
        assert_eq!(modified.training_split, TrainingSplit::FullBody);
        assert_eq!(modified.workout_days.len(), 3);
    }

    #[test]
    fn duration_delta_retrims_days() {
        let config = EngineConfig::default();
        let c = constraints(
            FitnessLevel::Advanced,
            PrimaryGoal::MuscleGain,
            4,
            90,
            Location::Gym,
            &[],
        );
        let plan = generator().generate(&c).unwrap();
        let delta = WorkoutDelta {
            duration_minutes: Some(30),
            ..Default::default()
        };
        let modified = generator().modify(&c, &plan, &delta).unwrap();
        assert_eq!(modified.duration_minutes, 30);
        assert_eq!(modified.training_split, plan.training_split);
        for day in &modified.workout_days {
            assert!(day.estimated_seconds(config.seconds_per_rep) <= 30 * 60);
        }
    }

    #[test]
    fn out_of_range_delta_is_rejected() {
        let c = constraints(
            FitnessLevel::Beginner,
            PrimaryGoal::GeneralFitness,
            3,
            45,
            Location::Home,
            &[],
        );
        let plan = generator().generate(&c).unwrap();
        let delta = WorkoutDelta {
            frequency: Some(9),
            ..Default::default()
        };
        let err = generator().modify(&c, &plan, &delta).unwrap_err();
        assert!(matches!(
            err,
            Error::Modification(ModificationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn split_override_regenerates_days() {
        let c = constraints(
            FitnessLevel::Intermediate,
            PrimaryGoal::MuscleGain,
            4,
            60,
            Location::Gym,
            &[],
        );
        let plan = generator().generate(&c).unwrap();
        let delta = WorkoutDelta {
            training_split: Some(TrainingSplit::PushPullLegs),
            ..Default::default()
        };
        let modified = generator().modify(&c, &plan, &delta).unwrap();
        assert_eq!(modified.training_split, TrainingSplit::PushPullLegs);
        assert_eq!(modified.workout_days.len(), 4);
        assert!(modified.workout_days[0].name.starts_with("Push"));
    }

    #[test]
    fn invalid_constraints_name_the_field() {
        let c = constraints(
            FitnessLevel::Beginner,
            PrimaryGoal::GeneralFitness,
            1,
            45,
            Location::Home,
            &[],
        );
        let err = generator().generate(&c).unwrap_err();
        assert_eq!(err.field(), "frequency");
    }
}
