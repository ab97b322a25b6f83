use std::fmt;

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
#[cfg(feature = "backend")]
use {
    crate::model::WriteError,
    axum::{
        response::{IntoResponse, Response},
        Json,
    },
    tracing::{debug, error},
};

/// Builds a [`ServerError::Other`] from format args
#[macro_export]
macro_rules! other_error {
    ($($arg:tt)*) => {
        $crate::api::error::ServerError::Other { message: format!($($arg)*) }
    };
}

/// Placeholder for routes that don't have any specific errors of their own
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("Nothing")]
pub struct Nothing;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Error)]
pub struct ValidationError {
    pub error_messages: Vec<String>,
}

impl ValidationError {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            error_messages: vec![message.into()],
        }
    }

    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.error_messages.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.error_messages.is_empty()
    }

    /// Collapses an accumulator into `Ok` if nothing was pushed
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error_messages.join("; "))
    }
}

/// Error returned by every route. `T` carries the route specific errors,
/// everything else is shared across routes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ServerError<T> {
    Inner {
        #[serde(with = "http_serde::status_code")]
        code: StatusCode,
        inner: T,
    },
    Validation {
        inner: ValidationError,
    },
    Unauthorized {
        message: String,
    },
    Forbidden {
        message: String,
    },
    NotFound {
        message: String,
    },
    Other {
        message: String,
    },
}

impl<T> ServerError<T> {
    pub fn status_code(&self) -> StatusCode {
        use ServerError::*;
        match self {
            Inner { code, .. } => *code,
            Validation { .. } => StatusCode::BAD_REQUEST,
            Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Forbidden { .. } => StatusCode::FORBIDDEN,
            NotFound { .. } => StatusCode::NOT_FOUND,
            Other { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }
}

impl<T: fmt::Debug> fmt::Display for ServerError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ServerError::*;
        match self {
            Inner { code, inner } => write!(f, "{code}: {inner:?}"),
            Validation { inner } => write!(f, "Validation failed: {inner}"),
            Unauthorized { message }
            | Forbidden { message }
            | NotFound { message }
            | Other { message } => write!(f, "{}: {message}", self.status_code()),
        }
    }
}

impl<T> From<ValidationError> for ServerError<T> {
    fn from(inner: ValidationError) -> Self {
        Self::Validation { inner }
    }
}

#[cfg(feature = "backend")]
impl<T> From<rusqlite::Error> for ServerError<T> {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::QueryReturnedNoRows => Self::NotFound {
                message: "No matching record".to_string(),
            },
            other => Self::Other {
                message: format!("Database error: {other:?}"),
            },
        }
    }
}

#[cfg(feature = "backend")]
impl<T> From<WriteError> for ServerError<T> {
    fn from(err: WriteError) -> Self {
        match err {
            WriteError::Validation(inner) => Self::Validation { inner },
            WriteError::Database(inner) => inner.into(),
        }
    }
}

#[cfg(feature = "backend")]
impl<T> From<deadpool_sqlite::InteractError> for ServerError<T> {
    fn from(err: deadpool_sqlite::InteractError) -> Self {
        Self::Other {
            message: format!("Database interact error: {err:?}"),
        }
    }
}

#[cfg(feature = "backend")]
impl<T> From<deadpool_sqlite::PoolError> for ServerError<T> {
    fn from(err: deadpool_sqlite::PoolError) -> Self {
        Self::Other {
            message: format!("Database pool error: {err:?}"),
        }
    }
}

#[cfg(feature = "backend")]
impl<T: Serialize + fmt::Debug> IntoResponse for ServerError<T> {
    fn into_response(self) -> Response {
        let code = self.status_code();
        if code.is_server_error() {
            error!(%code, "{}", self);
        } else {
            debug!(%code, "{}", self);
        }
        (code, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_accumulator_only_fails_with_messages() {
        let mut errors = ValidationError::default();
        assert!(errors.clone().into_result().is_ok());

        errors.push("frequency_days must be at least 1");
        errors.push("start_date is required");
        let err = errors.into_result().unwrap_err();
        assert_eq!(
            err.to_string(),
            "frequency_days must be at least 1; start_date is required"
        );
    }

    #[test]
    fn errors_round_trip_with_status_codes() {
        let err: ServerError<Nothing> = ServerError::Inner {
            code: StatusCode::CONFLICT,
            inner: Nothing,
        };
        let json = serde_json::to_string(&err).unwrap();
        let back: ServerError<Nothing> = serde_json::from_str(&json).unwrap();

        assert_eq!(back.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ServerError::<Nothing>::from(ValidationError::new("bad")).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
