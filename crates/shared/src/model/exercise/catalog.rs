#[cfg(feature = "backend")]
use {
    super::{Exercise, NewExercise},
    rusqlite::Connection,
    tracing::{info, warn},
};

/// `(name, muscle group, description)` of the exercises a fresh install starts
/// with
pub const STOCK_EXERCISES: [(&str, &str, &str); 10] = [
    (
        "Bench press",
        "Chest",
        "Basic movement for the chest, shoulders and triceps.",
    ),
    (
        "Barbell squat",
        "Legs",
        "Builds the quadriceps, glutes and hamstrings.",
    ),
    (
        "Deadlift",
        "Back",
        "Works the whole posterior chain: back, glutes, legs.",
    ),
    (
        "Standing barbell press",
        "Shoulders",
        "Builds the deltoids and triceps.",
    ),
    ("Pull-ups", "Back", "Works the lats and biceps."),
    (
        "Bent-over barbell row",
        "Back",
        "Strengthens the middle back and rear delts.",
    ),
    ("Biceps curl", "Arms", "Isolation movement for the biceps."),
    (
        "Triceps extension",
        "Arms",
        "Isolation movement for the triceps.",
    ),
    (
        "Dumbbell lunges",
        "Legs",
        "Builds the glutes, quadriceps and balance.",
    ),
    ("Plank", "Core", "Isometric hold that strengthens the core."),
];

/// Inserts the stock exercises, leaving any that already exist by name alone.
/// Returns how many were added
#[cfg(feature = "backend")]
pub fn seed_exercise_catalog(conn: &mut Connection) -> Result<usize, rusqlite::Error> {
    let tx = conn.transaction()?;
    let mut added = 0;

    for (name, muscle_group, description) in STOCK_EXERCISES {
        if Exercise::fetch_by_name(&tx, name)?.is_some() {
            warn!("Exercise already exists: {name}");
            continue;
        }

        Exercise::create(
            &tx,
            NewExercise {
                name: name.to_string(),
                muscle_group: muscle_group.to_string(),
                description: description.to_string(),
                equipment: String::new(),
                technique: String::new(),
            },
        )?;
        info!("Added exercise: {name}");
        added += 1;
    }

    tx.commit()?;
    Ok(added)
}
