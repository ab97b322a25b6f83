use std::{fmt, num::NonZeroU32};

#[cfg(feature = "backend")]
use rusqlite::{
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
    ToSql,
};
use serde::{Deserialize, Serialize};

use crate::api::error::ValidationError;

/// Days between two occurrences of a plan. Can't be zero, so a recurrence
/// always moves forward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrequencyDays(NonZeroU32);

impl FrequencyDays {
    pub const DAILY: FrequencyDays = FrequencyDays(NonZeroU32::MIN);

    pub fn new(days: u32) -> Option<Self> {
        NonZeroU32::new(days).map(Self)
    }

    pub fn get(&self) -> u32 {
        self.0.get()
    }
}

impl Default for FrequencyDays {
    fn default() -> Self {
        Self::DAILY
    }
}

impl fmt::Display for FrequencyDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<i64> for FrequencyDays {
    type Error = ValidationError;

    fn try_from(days: i64) -> Result<Self, Self::Error> {
        u32::try_from(days)
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| {
                ValidationError::new(format!(
                    "frequency_days must be between 1 and {}, got {days}",
                    u32::MAX
                ))
            })
    }
}

#[cfg(feature = "backend")]
impl ToSql for FrequencyDays {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(i64::from(self.get())))
    }
}

#[cfg(feature = "backend")]
impl FromSql for FrequencyDays {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let days = value.as_i64()?;
        u32::try_from(days)
            .ok()
            .and_then(Self::new)
            .ok_or(FromSqlError::OutOfRange(days))
    }
}

#[cfg(feature = "sea-query-enum")]
impl From<FrequencyDays> for sea_query::Value {
    fn from(value: FrequencyDays) -> Self {
        value.get().into()
    }
}
