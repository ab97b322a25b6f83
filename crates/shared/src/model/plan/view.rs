use serde::{Deserialize, Serialize};
#[cfg(feature = "backend")]
use {
    crate::types::{PlanId, UserId},
    rusqlite::Connection,
};

use super::WorkoutPlan;
use crate::model::Exercise;

/// A plan as presented to clients: its fields, the exercise it trains and
/// its projected dates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPlanView {
    #[serde(flatten)]
    pub plan: WorkoutPlan,
    pub exercise_name: String,
    pub exercise_muscle_group: String,
    pub next_dates: Vec<String>,
}

impl WorkoutPlanView {
    pub fn new(plan: WorkoutPlan, exercise: &Exercise) -> Self {
        let next_dates = plan.next_dates();
        Self {
            plan,
            exercise_name: exercise.name.clone(),
            exercise_muscle_group: exercise.muscle_group.clone(),
            next_dates,
        }
    }
}

#[cfg(feature = "backend")]
impl WorkoutPlanView {
    pub fn load(conn: &Connection, plan: WorkoutPlan) -> Result<Self, rusqlite::Error> {
        let exercise = Exercise::fetch_by_id(conn, &plan.exercise_id)?
            .ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        Ok(Self::new(plan, &exercise))
    }

    pub fn fetch_active_for_user(
        conn: &Connection,
        user_id: &UserId,
        id: &PlanId,
    ) -> Result<Option<Self>, rusqlite::Error> {
        WorkoutPlan::fetch_active_for_user(conn, user_id, id)?
            .map(|p| Self::load(conn, p))
            .transpose()
    }

    /// Newest first
    pub fn fetch_all_active_for_user(
        conn: &Connection,
        user_id: &UserId,
    ) -> Result<Vec<Self>, rusqlite::Error> {
        let plans = WorkoutPlan::fetch_all_active_for_user(conn, user_id)?;
        let exercises = Exercise::fetch_by_ids(conn, plans.iter().map(|p| &p.exercise_id))?;

        plans
            .into_iter()
            .map(|p| {
                let exercise = exercises
                    .get(&p.exercise_id)
                    .ok_or(rusqlite::Error::QueryReturnedNoRows)?;
                Ok(Self::new(p, exercise))
            })
            .collect()
    }
}
