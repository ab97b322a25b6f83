use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "backend")]
use {
    crate::model::NewUser,
    exemplar::Model,
    rusqlite::{Connection, OptionalExtension},
    sea_query::{enum_def, Expr, Query, SqliteQueryBuilder},
    sea_query_rusqlite::RusqliteBinder,
};

use crate::types::UserId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("user"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub is_admin: bool,
    pub registration_date: DateTime<Utc>,
}

#[cfg(feature = "backend")]
impl User {
    pub fn fetch_by_id(conn: &Connection, id: &UserId) -> Result<Option<User>, rusqlite::Error> {
        let (sql, values) = Query::select()
            .columns([
                UserIden::Id,
                UserIden::Username,
                UserIden::IsAdmin,
                UserIden::RegistrationDate,
            ])
            .from(UserIden::Table)
            .and_where(Expr::col(UserIden::Id).eq(id))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let user = stmt.query_row(&*values.as_params(), User::from_row).optional()?;
        Ok(user)
    }

    pub fn fetch_by_username<S: AsRef<str>>(
        conn: &Connection,
        username: S,
    ) -> Result<Option<User>, rusqlite::Error> {
        let (sql, values) = Query::select()
            .columns([
                UserIden::Id,
                UserIden::Username,
                UserIden::IsAdmin,
                UserIden::RegistrationDate,
            ])
            .from(UserIden::Table)
            .and_where(Expr::col(UserIden::Username).eq(username.as_ref()))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let user = stmt.query_row(&*values.as_params(), User::from_row).optional()?;
        Ok(user)
    }

    pub fn create(
        conn: &mut Connection,
        new_user: NewUser,
        registration_date: DateTime<Utc>,
    ) -> Result<User, rusqlite::Error> {
        let user = new_user.into_user(registration_date);

        let tx = conn.transaction()?;
        user.insert(&tx)?;
        tx.commit()?;

        Ok(user)
    }

    /// Flags an existing user as an admin. Returns false if the user doesn't
    /// exist
    pub fn promote_to_admin(conn: &Connection, id: &UserId) -> Result<bool, rusqlite::Error> {
        let (sql, values) = Query::update()
            .table(UserIden::Table)
            .values([(UserIden::IsAdmin, true.into())])
            .and_where(Expr::col(UserIden::Id).eq(id))
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        Ok(stmt.execute(&*values.as_params())? > 0)
    }
}
