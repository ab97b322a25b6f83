use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "backend")]
use {
    exemplar::Model,
    rusqlite::{Connection, OptionalExtension},
    sea_query::{enum_def, Expr, Order, Query, SelectStatement, SqliteQueryBuilder},
    sea_query_rusqlite::RusqliteBinder,
};

use super::{
    format_occurrences, FrequencyDays, Occurrences, PlanSubmission, PROJECTION_OCCURRENCE_COUNT,
};
use crate::types::{ExerciseId, PlanId, UserId};

/// A recurring workout: one exercise, repeated every `frequency_days` from
/// `start_date`. A user has at most one plan per exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("workout_plan"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct WorkoutPlan {
    pub id: PlanId,
    pub user_id: UserId,
    pub exercise_id: ExerciseId,
    pub start_date: NaiveDate,
    pub frequency_days: FrequencyDays,
    /// Inactive plans are kept but left out of listings
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields of a plan that doesn't exist yet. The store picks the id
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkoutPlan {
    pub user_id: UserId,
    pub exercise_id: ExerciseId,
    pub start_date: NaiveDate,
    pub frequency_days: FrequencyDays,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl NewWorkoutPlan {
    pub fn into_plan(self, id: PlanId) -> WorkoutPlan {
        let NewWorkoutPlan {
            user_id,
            exercise_id,
            start_date,
            frequency_days,
            is_active,
            created_at,
        } = self;

        WorkoutPlan {
            id,
            user_id,
            exercise_id,
            start_date,
            frequency_days,
            is_active,
            created_at,
        }
    }
}

impl WorkoutPlan {
    pub fn occurrences(&self, count: usize) -> Occurrences {
        Occurrences::new(self.start_date, self.frequency_days, count)
    }

    /// The projection presented with every plan
    pub fn next_dates(&self) -> Vec<String> {
        format_occurrences(self.occurrences(PROJECTION_OCCURRENCE_COUNT))
    }

    /// Applies a resubmission to an existing plan. Omitted dates and
    /// frequencies keep their current value, omitted activity reactivates
    pub fn merge(&mut self, submission: &PlanSubmission) {
        if let Some(start_date) = submission.start_date {
            self.start_date = start_date;
        }
        if let Some(frequency_days) = submission.frequency_days {
            self.frequency_days = frequency_days;
        }
        self.is_active = submission.is_active.unwrap_or(true);
    }
}

#[cfg(feature = "backend")]
impl WorkoutPlan {
    fn select() -> SelectStatement {
        Query::select()
            .columns([
                WorkoutPlanIden::Id,
                WorkoutPlanIden::UserId,
                WorkoutPlanIden::ExerciseId,
                WorkoutPlanIden::StartDate,
                WorkoutPlanIden::FrequencyDays,
                WorkoutPlanIden::IsActive,
                WorkoutPlanIden::CreatedAt,
            ])
            .from(WorkoutPlanIden::Table)
            .to_owned()
    }

    pub fn fetch_by_user_and_exercise(
        conn: &Connection,
        user_id: &UserId,
        exercise_id: &ExerciseId,
    ) -> Result<Option<WorkoutPlan>, rusqlite::Error> {
        let (sql, values) = Self::select()
            .and_where(Expr::col(WorkoutPlanIden::UserId).eq(user_id))
            .and_where(Expr::col(WorkoutPlanIden::ExerciseId).eq(exercise_id))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let res = stmt.query_row(&*values.as_params(), WorkoutPlan::from_row).optional()?;
        Ok(res)
    }

    /// Fetches one of the user's active plans
    pub fn fetch_active_for_user(
        conn: &Connection,
        user_id: &UserId,
        id: &PlanId,
    ) -> Result<Option<WorkoutPlan>, rusqlite::Error> {
        let (sql, values) = Self::select()
            .and_where(Expr::col(WorkoutPlanIden::Id).eq(id))
            .and_where(Expr::col(WorkoutPlanIden::UserId).eq(user_id))
            .and_where(Expr::col(WorkoutPlanIden::IsActive).eq(true))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let res = stmt.query_row(&*values.as_params(), WorkoutPlan::from_row).optional()?;
        Ok(res)
    }

    /// The user's active plans, newest first
    pub fn fetch_all_active_for_user(
        conn: &Connection,
        user_id: &UserId,
    ) -> Result<Vec<WorkoutPlan>, rusqlite::Error> {
        let (sql, values) = Self::select()
            .and_where(Expr::col(WorkoutPlanIden::UserId).eq(user_id))
            .and_where(Expr::col(WorkoutPlanIden::IsActive).eq(true))
            .order_by(WorkoutPlanIden::CreatedAt, Order::Desc)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let res = stmt
            .query_map(&*values.as_params(), WorkoutPlan::from_row)?
            .collect::<Result<_, _>>()?;
        Ok(res)
    }

    /// Writes the mutable fields back. `created_at`, the owner and the exercise
    /// never change
    pub fn update(&self, conn: &Connection) -> Result<bool, rusqlite::Error> {
        let (sql, values) = Query::update()
            .table(WorkoutPlanIden::Table)
            .values([
                (WorkoutPlanIden::StartDate, self.start_date.into()),
                (WorkoutPlanIden::FrequencyDays, self.frequency_days.into()),
                (WorkoutPlanIden::IsActive, self.is_active.into()),
            ])
            .and_where(Expr::col(WorkoutPlanIden::Id).eq(&self.id))
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        Ok(stmt.execute(&*values.as_params())? > 0)
    }

    /// Returns false if the user has no such plan
    pub fn delete_for_user(
        conn: &Connection,
        user_id: &UserId,
        id: &PlanId,
    ) -> Result<bool, rusqlite::Error> {
        let (sql, values) = Query::delete()
            .from_table(WorkoutPlanIden::Table)
            .and_where(Expr::col(WorkoutPlanIden::Id).eq(id))
            .and_where(Expr::col(WorkoutPlanIden::UserId).eq(user_id))
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        Ok(stmt.execute(&*values.as_params())? > 0)
    }
}
