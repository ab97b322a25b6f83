use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "backend")]
use {
    crate::model::WriteError,
    exemplar::Model,
    rusqlite::{Connection, OptionalExtension},
    sea_query::{enum_def, Expr, Order, Query, SelectStatement, SqliteQueryBuilder},
    sea_query_rusqlite::RusqliteBinder,
    tracing::instrument,
};

use super::WorkoutSet;
use crate::{
    api::{error::ValidationError, payloads::WorkoutRequest},
    model::{check_max_len, Exercise, ValidateModel},
    types::{ExerciseId, UserId, WorkoutId},
};

const NAME_MAX_LEN: usize = 30;

/// A training session logged by a user. The date is fixed on creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("workout"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct Workout {
    pub id: WorkoutId,
    pub user_id: UserId,
    pub name: Option<String>,
    pub date: NaiveDate,
}

/// A workout with its sets and the muscle groups they hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDetail {
    #[serde(flatten)]
    pub workout: Workout,
    pub sets: Vec<WorkoutSet>,
    pub muscles_involved: Vec<String>,
}

impl WorkoutDetail {
    /// Sets referencing exercises missing from `exercises` don't contribute a
    /// muscle group
    pub fn new(
        workout: Workout,
        sets: Vec<WorkoutSet>,
        exercises: &HashMap<ExerciseId, Exercise>,
    ) -> Self {
        let muscles_involved = sets
            .iter()
            .filter_map(|s| exercises.get(&s.exercise_id))
            .map(|e| e.muscle_group.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Self {
            workout,
            sets,
            muscles_involved,
        }
    }
}

impl ValidateModel for WorkoutRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();
        if let Some(name) = &self.name {
            check_max_len(&mut errors, "name", name, NAME_MAX_LEN);
        }
        for (i, set) in self.sets.iter().enumerate() {
            if let Err(e) = set.validate() {
                for message in e.error_messages {
                    errors.push(format!("sets[{i}]: {message}"));
                }
            }
        }
        errors.into_result()
    }
}

#[cfg(feature = "backend")]
impl Workout {
    fn select() -> SelectStatement {
        Query::select()
            .columns([
                WorkoutIden::Id,
                WorkoutIden::UserId,
                WorkoutIden::Name,
                WorkoutIden::Date,
            ])
            .from(WorkoutIden::Table)
            .to_owned()
    }

    /// Fetches a workout only if it belongs to `user_id`
    pub fn fetch_for_user(
        conn: &Connection,
        user_id: &UserId,
        id: &WorkoutId,
    ) -> Result<Option<Workout>, rusqlite::Error> {
        let (sql, values) = Self::select()
            .and_where(Expr::col(WorkoutIden::Id).eq(id))
            .and_where(Expr::col(WorkoutIden::UserId).eq(user_id))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let res = stmt.query_row(&*values.as_params(), Workout::from_row).optional()?;
        Ok(res)
    }

    /// Newest first
    pub fn fetch_all_for_user(
        conn: &Connection,
        user_id: &UserId,
    ) -> Result<Vec<Workout>, rusqlite::Error> {
        let (sql, values) = Self::select()
            .and_where(Expr::col(WorkoutIden::UserId).eq(user_id))
            .order_by(WorkoutIden::Date, Order::Desc)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let res = stmt
            .query_map(&*values.as_params(), Workout::from_row)?
            .collect::<Result<_, _>>()?;
        Ok(res)
    }

    #[instrument(skip(conn))]
    pub fn create(
        conn: &mut Connection,
        user_id: &UserId,
        request: WorkoutRequest,
        date: NaiveDate,
    ) -> Result<WorkoutDetail, WriteError> {
        request.validate()?;

        let tx = conn.transaction()?;
        check_exercises_exist(&tx, &request)?;

        let workout = Workout {
            id: WorkoutId::new_v4(),
            user_id: *user_id,
            name: request.name,
            date,
        };
        workout.insert(&tx)?;
        WorkoutSet::insert_for_workout(&tx, &workout.id, &request.sets)?;

        let detail = WorkoutDetail::load(&tx, workout)?;
        tx.commit()?;

        Ok(detail)
    }

    /// Replaces the name if one is given and appends any sets. Returns `None`
    /// if the user has no such workout
    #[instrument(skip(conn))]
    pub fn update(
        conn: &mut Connection,
        user_id: &UserId,
        id: &WorkoutId,
        request: WorkoutRequest,
    ) -> Result<Option<WorkoutDetail>, WriteError> {
        request.validate()?;

        let tx = conn.transaction()?;
        let Some(mut workout) = Workout::fetch_for_user(&tx, user_id, id)? else {
            return Ok(None);
        };
        check_exercises_exist(&tx, &request)?;

        if let Some(name) = request.name {
            let (sql, values) = Query::update()
                .table(WorkoutIden::Table)
                .values([(WorkoutIden::Name, name.clone().into())])
                .and_where(Expr::col(WorkoutIden::Id).eq(id))
                .build_rusqlite(SqliteQueryBuilder);
            tx.prepare_cached(&sql)?.execute(&*values.as_params())?;
            workout.name = Some(name);
        }
        WorkoutSet::insert_for_workout(&tx, id, &request.sets)?;

        let detail = WorkoutDetail::load(&tx, workout)?;
        tx.commit()?;

        Ok(Some(detail))
    }

    /// Deletes the workout and its sets. Returns false if the user has no such
    /// workout
    pub fn delete_for_user(
        conn: &Connection,
        user_id: &UserId,
        id: &WorkoutId,
    ) -> Result<bool, rusqlite::Error> {
        let (sql, values) = Query::delete()
            .from_table(WorkoutIden::Table)
            .and_where(Expr::col(WorkoutIden::Id).eq(id))
            .and_where(Expr::col(WorkoutIden::UserId).eq(user_id))
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        Ok(stmt.execute(&*values.as_params())? > 0)
    }
}

#[cfg(feature = "backend")]
fn check_exercises_exist(conn: &Connection, request: &WorkoutRequest) -> Result<(), WriteError> {
    let ids: BTreeSet<ExerciseId> = request.sets.iter().map(|s| s.exercise).collect();
    if ids.is_empty() {
        return Ok(());
    }

    let found = Exercise::fetch_by_ids(conn, &ids)?;
    let mut errors = ValidationError::default();
    for id in ids.iter().filter(|id| !found.contains_key(*id)) {
        errors.push(format!("Exercise {id} doesn't exist"));
    }
    Ok(errors.into_result()?)
}

#[cfg(feature = "backend")]
impl WorkoutDetail {
    pub fn load(conn: &Connection, workout: Workout) -> Result<WorkoutDetail, rusqlite::Error> {
        let sets = WorkoutSet::fetch_for_workout(conn, &workout.id)?;
        let exercises = Exercise::fetch_by_ids(conn, sets.iter().map(|s| &s.exercise_id))?;
        Ok(WorkoutDetail::new(workout, sets, &exercises))
    }

    pub fn fetch_all_for_user(
        conn: &Connection,
        user_id: &UserId,
    ) -> Result<Vec<WorkoutDetail>, rusqlite::Error> {
        Workout::fetch_all_for_user(conn, user_id)?
            .into_iter()
            .map(|w| WorkoutDetail::load(conn, w))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{api::payloads::SetRequest, types::SetId};

    fn exercise(muscle_group: &str) -> Exercise {
        Exercise {
            id: ExerciseId::new_v4(),
            name: format!("{muscle_group} exercise"),
            muscle_group: muscle_group.to_string(),
            description: String::new(),
            equipment: String::new(),
            technique: String::new(),
        }
    }

    fn set_of(workout: &Workout, exercise: &Exercise) -> WorkoutSet {
        WorkoutSet {
            id: SetId::new_v4(),
            workout_id: workout.id,
            exercise_id: exercise.id,
            repetitions: 8,
            weight: 60.0,
        }
    }

    #[test]
    fn muscles_involved_are_deduplicated() {
        let workout = Workout {
            id: WorkoutId::new_v4(),
            user_id: UserId::new_v4(),
            name: Some("Push".to_string()),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };
        let chest = exercise("Chest");
        let arms = exercise("Arms");
        let sets = vec![
            set_of(&workout, &chest),
            set_of(&workout, &arms),
            set_of(&workout, &chest),
        ];
        let exercises = [chest, arms].into_iter().map(|e| (e.id, e)).collect();

        let detail = WorkoutDetail::new(workout, sets, &exercises);

        assert_eq!(detail.sets.len(), 3);
        assert_eq!(detail.muscles_involved, vec!["Arms", "Chest"]);
    }

    #[test]
    fn long_names_and_bad_sets_are_reported_together() {
        let request = WorkoutRequest {
            name: Some("a very long workout name indeed!".to_string()),
            sets: vec![SetRequest {
                exercise: ExerciseId::new_v4(),
                repetitions: -3,
                weight: 10.0,
            }],
        };

        let err = request.validate().unwrap_err();
        assert_eq!(err.error_messages.len(), 2);
        assert!(err.error_messages[1].starts_with("sets[0]: "));
    }

    #[test]
    fn detail_flattens_the_workout_fields() {
        let workout = Workout {
            id: WorkoutId::new_v4(),
            user_id: UserId::new_v4(),
            name: None,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };
        let detail = WorkoutDetail::new(workout, Vec::new(), &HashMap::new());
        let json = serde_json::to_value(&detail).unwrap();

        assert_eq!(json["date"], "2024-03-01");
        assert_eq!(json["muscles_involved"], serde_json::json!([]));
    }
}
