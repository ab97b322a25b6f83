use chrono::{DateTime, Utc};
use exemplar::Model;
use rusqlite::{Connection, TransactionBehavior};
use tracing::instrument;

use super::{
    upsert_plan, CreatePlanError, NewWorkoutPlan, PlanStore, PlanSubmission, UpsertError,
    Upserted, WorkoutPlan,
};
use crate::{
    api::{error::ServerError, response_errors::PlanError},
    model::{is_unique_violation, Exercise},
    types::{ExerciseId, PlanId, UserId},
};

/// [`PlanStore`] over a SQLite connection. The `workout_plan` table's unique
/// (user_id, exercise_id) index is what reports conflicts
pub struct SqlitePlanStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqlitePlanStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl PlanStore for SqlitePlanStore<'_> {
    type Error = rusqlite::Error;

    fn exercise_exists(&mut self, exercise_id: &ExerciseId) -> Result<bool, Self::Error> {
        Exercise::exists(self.conn, exercise_id)
    }

    fn find_plan(
        &mut self,
        user_id: &UserId,
        exercise_id: &ExerciseId,
    ) -> Result<Option<WorkoutPlan>, Self::Error> {
        WorkoutPlan::fetch_by_user_and_exercise(self.conn, user_id, exercise_id)
    }

    fn create_plan(
        &mut self,
        plan: NewWorkoutPlan,
    ) -> Result<WorkoutPlan, CreatePlanError<Self::Error>> {
        let plan = plan.into_plan(PlanId::new_v4());
        match plan.insert(self.conn) {
            Ok(_) => Ok(plan),
            Err(e) if is_unique_violation(&e) => Err(CreatePlanError::Conflict),
            Err(e) => Err(CreatePlanError::Store(e)),
        }
    }

    fn update_plan(&mut self, plan: &WorkoutPlan) -> Result<(), Self::Error> {
        if plan.update(self.conn)? {
            Ok(())
        } else {
            Err(rusqlite::Error::QueryReturnedNoRows)
        }
    }
}

/// Runs [`upsert_plan`] inside an immediate transaction, so concurrent writers
/// are serialised by SQLite
#[instrument(skip(conn))]
pub fn upsert_plan_sqlite(
    conn: &mut Connection,
    user_id: &UserId,
    submission: PlanSubmission,
    now: DateTime<Utc>,
) -> Result<Upserted, UpsertError<rusqlite::Error>> {
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(UpsertError::Store)?;

    let upserted = upsert_plan(&mut SqlitePlanStore::new(&tx), user_id, submission, now)?;
    tx.commit().map_err(UpsertError::Store)?;

    Ok(upserted)
}

impl From<UpsertError<rusqlite::Error>> for ServerError<PlanError> {
    fn from(err: UpsertError<rusqlite::Error>) -> Self {
        match err {
            UpsertError::Validation(inner) => Self::Validation { inner },
            UpsertError::Conflict => PlanError::ConcurrentModification.into(),
            UpsertError::Store(e) => e.into(),
        }
    }
}
