use std::{fmt, ops::Deref, str::FromStr};

use serde::{Deserialize, Serialize};
pub use uuid::Error as UuidError;

/// Declares a uuid backed primary key type. Each table gets its own id type so
/// a plan id can't be handed to something expecting an exercise id
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            pub fn new_v4() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            pub fn parse(value: &str) -> Result<Self, UuidError> {
                uuid::Uuid::parse_str(value).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(self.0.as_hyphenated(), f)
            }
        }

        impl From<uuid::Uuid> for $name {
            fn from(value: uuid::Uuid) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = UuidError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl Deref for $name {
            type Target = uuid::Uuid;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        #[cfg(feature = "exemplar-model")]
        impl rusqlite::ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
                Ok(rusqlite::types::ToSqlOutput::Owned(self.to_string().into()))
            }
        }

        #[cfg(feature = "exemplar-model")]
        impl rusqlite::types::FromSql for $name {
            fn column_result(
                value: rusqlite::types::ValueRef<'_>,
            ) -> rusqlite::types::FromSqlResult<Self> {
                uuid::Uuid::from_str(value.as_str()?)
                    .map(Self)
                    .map_err(|e| rusqlite::types::FromSqlError::Other(Box::new(e)))
            }
        }

        #[cfg(feature = "sea-query-enum")]
        impl From<&$name> for sea_query::Value {
            fn from(value: &$name) -> Self {
                value.to_string().into()
            }
        }

        #[cfg(feature = "sea-query-enum")]
        impl From<$name> for sea_query::Value {
            fn from(value: $name) -> Self {
                value.to_string().into()
            }
        }
    };
}

uuid_id!(UserId);
uuid_id!(ExerciseId);
uuid_id!(WorkoutId);
uuid_id!(SetId);
uuid_id!(
    /// Key of a recurring workout plan
    PlanId
);
