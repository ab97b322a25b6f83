use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    api::error::ValidationError,
    model::{check_max_len, check_not_blank, User, ValidateModel},
    types::UserId,
};

const USERNAME_MAX_LEN: usize = 150;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
}

impl NewUser {
    pub fn new<T: Into<String>>(username: T) -> Self {
        Self {
            username: username.into(),
        }
    }

    pub fn into_user(self, registration_date: DateTime<Utc>) -> User {
        User {
            id: UserId::new_v4(),
            username: self.username,
            is_admin: false,
            registration_date,
        }
    }
}

impl ValidateModel for NewUser {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();
        check_not_blank(&mut errors, "username", &self.username);
        check_max_len(&mut errors, "username", &self.username, USERNAME_MAX_LEN);

        if !self
            .username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
        {
            errors.push("username may only contain letters, digits and @/./+/-/_");
        }

        errors.into_result()
    }
}
