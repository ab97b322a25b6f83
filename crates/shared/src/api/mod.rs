use const_format::concatcp;
pub mod error;
pub mod payloads;
pub mod response_errors;

pub const API_BASE_PATH: &str = "/api/";

/// Header the authenticating front proxy sets to the caller's user id
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Object {
    Ping,
    User,
    IsAdmin,
    Exercise,
    ExerciseId,
    Workout,
    WorkoutId,
    WorkoutPlan,
    WorkoutPlanId,
    WorkoutPlanOccurrences,
}

impl Object {
    pub const fn path(&self) -> &str {
        use Object::*;
        match self {
            Ping => concatcp!(API_BASE_PATH, "ping"),
            User => concatcp!(API_BASE_PATH, "user"),
            IsAdmin => concatcp!(API_BASE_PATH, "is_admin"),
            Exercise => concatcp!(API_BASE_PATH, "exercises"),
            ExerciseId => concatcp!(API_BASE_PATH, "exercises/:id"),
            Workout => concatcp!(API_BASE_PATH, "workouts"),
            WorkoutId => concatcp!(API_BASE_PATH, "workouts/:id"),
            WorkoutPlan => concatcp!(API_BASE_PATH, "workout-plans"),
            WorkoutPlanId => concatcp!(API_BASE_PATH, "workout-plans/:id"),
            WorkoutPlanOccurrences => concatcp!(API_BASE_PATH, "workout-plans/:id/occurrences"),
        }
    }

    /// Fills in the `:id` segment of an id path
    pub fn id_path<T: std::fmt::Display>(&self, id: T) -> String {
        self.path().replace(":id", &id.to_string())
    }
}
