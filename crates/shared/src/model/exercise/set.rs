use serde::{Deserialize, Serialize};
#[cfg(feature = "backend")]
use {
    exemplar::Model,
    rusqlite::Connection,
    sea_query::{enum_def, Alias, Expr, Order, Query, SelectStatement, SqliteQueryBuilder},
    sea_query_rusqlite::RusqliteBinder,
};

use crate::{
    api::{error::ValidationError, payloads::SetRequest},
    model::ValidateModel,
    types::{ExerciseId, SetId, WorkoutId},
};

/// One logged set of an exercise within a workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("workout_set"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct WorkoutSet {
    pub id: SetId,
    pub workout_id: WorkoutId,
    pub exercise_id: ExerciseId,
    pub repetitions: i64,
    /// Kilograms
    pub weight: f64,
}

impl ValidateModel for SetRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();
        if self.repetitions < 0 {
            errors.push("repetitions can't be negative");
        }
        if !self.weight.is_finite() || self.weight < 0.0 {
            errors.push("weight must be a non-negative number");
        }
        errors.into_result()
    }
}

#[cfg(feature = "backend")]
impl WorkoutSet {
    fn select() -> SelectStatement {
        Query::select()
            .columns([
                WorkoutSetIden::Id,
                WorkoutSetIden::WorkoutId,
                WorkoutSetIden::ExerciseId,
                WorkoutSetIden::Repetitions,
                WorkoutSetIden::Weight,
            ])
            .from(WorkoutSetIden::Table)
            .to_owned()
    }

    pub fn fetch_for_workout(
        conn: &Connection,
        workout_id: &WorkoutId,
    ) -> Result<Vec<WorkoutSet>, rusqlite::Error> {
        let (sql, values) = Self::select()
            .and_where(Expr::col(WorkoutSetIden::WorkoutId).eq(workout_id))
            .order_by(Alias::new("rowid"), Order::Asc)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let res = stmt
            .query_map(&*values.as_params(), WorkoutSet::from_row)?
            .collect::<Result<_, _>>()?;
        Ok(res)
    }

    /// Appends sets to a workout in request order
    pub fn insert_for_workout(
        conn: &Connection,
        workout_id: &WorkoutId,
        requests: &[SetRequest],
    ) -> Result<Vec<WorkoutSet>, rusqlite::Error> {
        let mut sets = Vec::with_capacity(requests.len());
        for request in requests {
            let set = WorkoutSet {
                id: SetId::new_v4(),
                workout_id: *workout_id,
                exercise_id: request.exercise,
                repetitions: request.repetitions,
                weight: request.weight,
            };
            set.insert(conn)?;
            sets.push(set);
        }
        Ok(sets)
    }
}
