use std::ops::{Deref, DerefMut};

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use deadpool_sqlite::{Object, Pool};
use shared::api::error::{Nothing, ServerError};

/// Handler argument giving the request its own pooled SQLite connection.
///
/// Queries must go through [`Object::interact`] so they run on the pool's
/// blocking threads. The connection goes back to the pool when the handler
/// returns. An exhausted or broken pool rejects the request with a 500
/// before the handler runs.
#[derive(Debug)]
pub struct DatabaseConnection(pub Object);

impl Deref for DatabaseConnection {
    type Target = Object;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DatabaseConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for DatabaseConnection
where
    S: Send + Sync,
    Pool: FromRef<S>,
{
    type Rejection = ServerError<Nothing>;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let conn = Pool::from_ref(state).get().await?;
        Ok(Self(conn))
    }
}
