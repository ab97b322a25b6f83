use serde::{Deserialize, Serialize};
#[cfg(feature = "backend")]
use {
    exemplar::Model,
    rusqlite::{Connection, OptionalExtension},
    sea_query::{enum_def, Expr, Order, Query, SelectStatement, SqliteQueryBuilder},
    sea_query_rusqlite::RusqliteBinder,
    std::collections::HashMap,
};

use crate::{
    api::error::ValidationError,
    model::{check_max_len, check_not_blank, ValidateModel},
    types::ExerciseId,
};

const NAME_MAX_LEN: usize = 100;
const MUSCLE_GROUP_MAX_LEN: usize = 100;
const EQUIPMENT_MAX_LEN: usize = 200;

/// An entry in the global exercise catalog. Shared by all users, only admins
/// can change it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("exercise"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct Exercise {
    pub id: ExerciseId,
    pub name: String,
    pub muscle_group: String,
    pub description: String,
    /// Equipment needed to perform the exercise
    pub equipment: String,
    /// How to perform the exercise
    pub technique: String,
}

/// Body of exercise create and update requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExercise {
    pub name: String,
    pub muscle_group: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub equipment: String,
    #[serde(default)]
    pub technique: String,
}

impl NewExercise {
    pub fn into_exercise(self, id: ExerciseId) -> Exercise {
        let NewExercise {
            name,
            muscle_group,
            description,
            equipment,
            technique,
        } = self;

        Exercise {
            id,
            name,
            muscle_group,
            description,
            equipment,
            technique,
        }
    }
}

impl ValidateModel for NewExercise {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();
        check_not_blank(&mut errors, "name", &self.name);
        check_max_len(&mut errors, "name", &self.name, NAME_MAX_LEN);
        check_not_blank(&mut errors, "muscle_group", &self.muscle_group);
        check_max_len(&mut errors, "muscle_group", &self.muscle_group, MUSCLE_GROUP_MAX_LEN);
        check_max_len(&mut errors, "equipment", &self.equipment, EQUIPMENT_MAX_LEN);
        errors.into_result()
    }
}

#[cfg(feature = "backend")]
impl Exercise {
    fn select() -> SelectStatement {
        Query::select()
            .columns([
                ExerciseIden::Id,
                ExerciseIden::Name,
                ExerciseIden::MuscleGroup,
                ExerciseIden::Description,
                ExerciseIden::Equipment,
                ExerciseIden::Technique,
            ])
            .from(ExerciseIden::Table)
            .to_owned()
    }

    pub fn fetch_by_id(
        conn: &Connection,
        id: &ExerciseId,
    ) -> Result<Option<Exercise>, rusqlite::Error> {
        let (sql, values) = Self::select()
            .and_where(Expr::col(ExerciseIden::Id).eq(id))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let res = stmt.query_row(&*values.as_params(), Exercise::from_row).optional()?;
        Ok(res)
    }

    pub fn fetch_by_name<S: AsRef<str>>(
        conn: &Connection,
        name: S,
    ) -> Result<Option<Exercise>, rusqlite::Error> {
        let (sql, values) = Self::select()
            .and_where(Expr::col(ExerciseIden::Name).eq(name.as_ref()))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let res = stmt.query_row(&*values.as_params(), Exercise::from_row).optional()?;
        Ok(res)
    }

    pub fn fetch_all(conn: &Connection) -> Result<Vec<Exercise>, rusqlite::Error> {
        let (sql, values) = Self::select()
            .order_by(ExerciseIden::Name, Order::Asc)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let res = stmt
            .query_map(&*values.as_params(), Exercise::from_row)?
            .collect::<Result<_, _>>()?;
        Ok(res)
    }

    pub fn fetch_by_ids<'a, I>(
        conn: &Connection,
        ids: I,
    ) -> Result<HashMap<ExerciseId, Exercise>, rusqlite::Error>
    where
        I: IntoIterator<Item = &'a ExerciseId>,
    {
        let (sql, values) = Self::select()
            .and_where(Expr::col(ExerciseIden::Id).is_in(ids.into_iter().copied()))
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let res = stmt
            .query_map(&*values.as_params(), Exercise::from_row)?
            .map(|r| r.map(|e| (e.id, e)))
            .collect::<Result<_, _>>()?;
        Ok(res)
    }

    pub fn exists(conn: &Connection, id: &ExerciseId) -> Result<bool, rusqlite::Error> {
        let (sql, values) = Query::select()
            .expr(Expr::val(1))
            .from(ExerciseIden::Table)
            .and_where(Expr::col(ExerciseIden::Id).eq(id))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        stmt.exists(&*values.as_params())
    }

    pub fn create(conn: &Connection, new_exercise: NewExercise) -> Result<Exercise, rusqlite::Error> {
        let exercise = new_exercise.into_exercise(ExerciseId::new_v4());
        exercise.insert(conn)?;
        Ok(exercise)
    }

    /// Overwrites every field except the id. Returns false if there was no
    /// exercise with this id
    pub fn update(&self, conn: &Connection) -> Result<bool, rusqlite::Error> {
        let (sql, values) = Query::update()
            .table(ExerciseIden::Table)
            .values([
                (ExerciseIden::Name, self.name.clone().into()),
                (ExerciseIden::MuscleGroup, self.muscle_group.clone().into()),
                (ExerciseIden::Description, self.description.clone().into()),
                (ExerciseIden::Equipment, self.equipment.clone().into()),
                (ExerciseIden::Technique, self.technique.clone().into()),
            ])
            .and_where(Expr::col(ExerciseIden::Id).eq(&self.id))
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        Ok(stmt.execute(&*values.as_params())? > 0)
    }

    /// Deletes the exercise. Sets and plans referencing it go with it
    pub fn delete(conn: &Connection, id: &ExerciseId) -> Result<bool, rusqlite::Error> {
        let (sql, values) = Query::delete()
            .from_table(ExerciseIden::Table)
            .and_where(Expr::col(ExerciseIden::Id).eq(id))
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        Ok(stmt.execute(&*values.as_params())? > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bench_press() -> NewExercise {
        NewExercise {
            name: "Bench press".to_string(),
            muscle_group: "Chest".to_string(),
            description: String::new(),
            equipment: "Barbell, bench".to_string(),
            technique: String::new(),
        }
    }

    #[test]
    fn valid_exercise_passes() {
        assert!(bench_press().validate().is_ok());
    }

    #[test]
    fn every_problem_is_reported() {
        let exercise = NewExercise {
            name: "   ".to_string(),
            muscle_group: "m".repeat(101),
            equipment: "e".repeat(201),
            ..bench_press()
        };

        let err = exercise.validate().unwrap_err();
        assert_eq!(err.error_messages.len(), 3);
    }

    #[test]
    fn optional_text_defaults_to_empty() {
        let exercise: NewExercise =
            serde_json::from_str(r#"{"name":"Plank","muscle_group":"Core"}"#).unwrap();
        assert_eq!(exercise.description, "");
        assert_eq!(exercise.technique, "");
    }
}
