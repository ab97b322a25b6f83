use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use deadpool_sqlite::Pool;
use shared::{
    api::{
        error::{Nothing, ServerError},
        USER_ID_HEADER,
    },
    model::User,
    types::UserId,
};
use tracing::debug;

/// The caller of a request. Authentication happens in front of this server,
/// which only sees the user id header it sets
#[derive(Debug, Clone)]
pub struct UserState {
    pub user: User,
}

impl UserState {
    pub fn id(&self) -> &UserId {
        &self.user.id
    }
}

fn unauthorized<S: Into<String>>(message: S) -> ServerError<Nothing> {
    ServerError::Unauthorized {
        message: message.into(),
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for UserState
where
    S: Send + Sync,
    Pool: FromRef<S>,
{
    type Rejection = ServerError<Nothing>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| unauthorized(format!("Missing {USER_ID_HEADER} header")))?;
        let id: UserId = header
            .to_str()
            .ok()
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| unauthorized(format!("Invalid {USER_ID_HEADER} header")))?;

        let conn = Pool::from_ref(state).get().await?;
        let user = conn
            .interact(move |conn| User::fetch_by_id(conn, &id))
            .await??;

        match user {
            Some(user) => Ok(Self { user }),
            None => {
                debug!("Request for unknown user {id}");
                Err(unauthorized("Unknown user"))
            }
        }
    }
}

/// A caller allowed to change the exercise catalog
#[derive(Debug, Clone)]
pub struct AdminUser(pub UserState);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    Pool: FromRef<S>,
{
    type Rejection = ServerError<Nothing>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user_state = UserState::from_request_parts(parts, state).await?;
        if !user_state.user.is_admin {
            return Err(ServerError::Forbidden {
                message: "Admin access required".to_string(),
            });
        }
        Ok(Self(user_state))
    }
}
