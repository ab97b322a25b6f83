//! Create-or-update of a user's plan for an exercise.
//!
//! There is at most one plan per (user, exercise). Submitting a plan for a
//! pair that already has one merges the submission into it instead of
//! creating a second record.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, instrument, warn};

use super::{FrequencyDays, NewWorkoutPlan, WorkoutPlan, OCCURRENCE_DATE_FORMAT};
use crate::{
    api::{error::ValidationError, payloads::UpsertPlanRequest},
    types::{ExerciseId, UserId},
};

/// A validated plan submission. `None` fields were omitted by the caller
#[derive(Debug, Clone, PartialEq)]
pub struct PlanSubmission {
    pub exercise_id: ExerciseId,
    pub start_date: Option<NaiveDate>,
    pub frequency_days: Option<FrequencyDays>,
    pub is_active: Option<bool>,
}

impl TryFrom<UpsertPlanRequest> for PlanSubmission {
    type Error = ValidationError;

    fn try_from(request: UpsertPlanRequest) -> Result<Self, Self::Error> {
        let mut errors = ValidationError::default();

        let start_date = match request.start_date.as_deref() {
            None => None,
            Some(s) => match NaiveDate::parse_from_str(s, OCCURRENCE_DATE_FORMAT) {
                Ok(d) => Some(d),
                Err(_) => {
                    errors.push(format!(
                        "start_date must be a calendar date formatted as YYYY-MM-DD, got {s:?}"
                    ));
                    None
                }
            },
        };

        let frequency_days = match request.frequency_days.map(FrequencyDays::try_from) {
            None => None,
            Some(Ok(f)) => Some(f),
            Some(Err(e)) => {
                errors.error_messages.extend(e.error_messages);
                None
            }
        };

        errors.into_result()?;

        Ok(Self {
            exercise_id: request.exercise,
            start_date,
            frequency_days,
            is_active: request.is_active,
        })
    }
}

/// Failure of [`PlanStore::create_plan`]
#[derive(Debug)]
pub enum CreatePlanError<E> {
    /// The user already has a plan for this exercise
    Conflict,
    Store(E),
}

impl<E> From<E> for CreatePlanError<E> {
    fn from(err: E) -> Self {
        Self::Store(err)
    }
}

/// Persistence needed by [`upsert_plan`]. Each call is expected to be atomic
pub trait PlanStore {
    type Error;

    fn exercise_exists(&mut self, exercise_id: &ExerciseId) -> Result<bool, Self::Error>;

    fn find_plan(
        &mut self,
        user_id: &UserId,
        exercise_id: &ExerciseId,
    ) -> Result<Option<WorkoutPlan>, Self::Error>;

    /// Must report [`CreatePlanError::Conflict`] instead of storing a second
    /// plan for the same user and exercise
    fn create_plan(
        &mut self,
        plan: NewWorkoutPlan,
    ) -> Result<WorkoutPlan, CreatePlanError<Self::Error>>;

    fn update_plan(&mut self, plan: &WorkoutPlan) -> Result<(), Self::Error>;
}

#[derive(Debug)]
pub enum UpsertError<E> {
    Validation(ValidationError),
    /// A create collided with another plan which then couldn't be found
    Conflict,
    Store(E),
}

impl<E> From<ValidationError> for UpsertError<E> {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl<E: fmt::Display> fmt::Display for UpsertError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpsertError::Validation(e) => write!(f, "Validation failed: {e}"),
            UpsertError::Conflict => write!(f, "Plan was modified concurrently"),
            UpsertError::Store(e) => write!(f, "Store error: {e}"),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for UpsertError<E> {}

/// The plan as stored by [`upsert_plan`]
#[derive(Debug, Clone, PartialEq)]
pub struct Upserted {
    pub plan: WorkoutPlan,
    /// False when the submission was merged into an existing plan
    pub created: bool,
}

/// Creates the user's plan for the submitted exercise, or merges the
/// submission into the plan they already have
#[instrument(skip(store))]
pub fn upsert_plan<S: PlanStore>(
    store: &mut S,
    user_id: &UserId,
    submission: PlanSubmission,
    now: DateTime<Utc>,
) -> Result<Upserted, UpsertError<S::Error>> {
    let exercise_id = submission.exercise_id;
    if !store
        .exercise_exists(&exercise_id)
        .map_err(UpsertError::Store)?
    {
        return Err(ValidationError::new(format!("Exercise {exercise_id} doesn't exist")).into());
    }

    if let Some(existing) = store
        .find_plan(user_id, &exercise_id)
        .map_err(UpsertError::Store)?
    {
        return merge_into(store, existing, &submission);
    }

    let Some(start_date) = submission.start_date else {
        return Err(ValidationError::new("start_date is required when creating a plan").into());
    };

    let new_plan = NewWorkoutPlan {
        user_id: *user_id,
        exercise_id,
        start_date,
        frequency_days: submission.frequency_days.unwrap_or_default(),
        is_active: submission.is_active.unwrap_or(true),
        created_at: now,
    };

    match store.create_plan(new_plan) {
        Ok(plan) => {
            debug!("Created plan {}", plan.id);
            Ok(Upserted {
                plan,
                created: true,
            })
        }
        Err(CreatePlanError::Store(e)) => Err(UpsertError::Store(e)),
        Err(CreatePlanError::Conflict) => {
            warn!("Plan for {exercise_id} was created concurrently, retrying as an update");
            match store
                .find_plan(user_id, &exercise_id)
                .map_err(UpsertError::Store)?
            {
                Some(existing) => merge_into(store, existing, &submission),
                None => Err(UpsertError::Conflict),
            }
        }
    }
}

fn merge_into<S: PlanStore>(
    store: &mut S,
    mut plan: WorkoutPlan,
    submission: &PlanSubmission,
) -> Result<Upserted, UpsertError<S::Error>> {
    plan.merge(submission);
    store.update_plan(&plan).map_err(UpsertError::Store)?;
    debug!("Updated plan {}", plan.id);
    Ok(Upserted {
        plan,
        created: false,
    })
}
