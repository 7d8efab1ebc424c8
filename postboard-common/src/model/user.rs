use crate::{model::Id, util::NonEmptyString};
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{Error, Unexpected},
};
use std::fmt::{Debug, Display, Formatter};
use thiserror::Error;

pub const EMAIL_MAX_LEN: usize = 254;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct UserMarker;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[serde(alias = "professor")]
    Teacher,
    #[default]
    #[serde(alias = "aluno")]
    Student,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
pub struct User {
    pub id: Id<UserMarker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<NonEmptyString>,
    pub email: Email,
    pub role: Role,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
pub struct CreateUser {
    #[serde(default)]
    pub name: Option<NonEmptyString>,
    pub email: Email,
    pub password: Password,
    #[serde(default)]
    pub role: Role,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
pub struct Credentials {
    pub email: Email,
    pub password: Password,
}

/// An email address, trimmed and lower-cased.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize)]
#[serde(transparent)]
pub struct Email(String);

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("Endereço de e-mail inválido: {0}")]
pub struct InvalidEmailError(String);

impl Email {
    pub fn new(email: &str) -> Result<Self, InvalidEmailError> {
        let normalized = email.trim().to_lowercase();

        let valid = normalized.chars().count() <= EMAIL_MAX_LEN
            && !normalized.chars().any(char::is_whitespace)
            && normalized
                .split_once('@')
                .is_some_and(|(local, domain)| {
                    !local.is_empty() && !domain.is_empty() && !domain.contains('@')
                });

        if valid {
            Ok(Self(normalized))
        } else {
            Err(InvalidEmailError(email.to_owned()))
        }
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<'de> Deserialize<'de> for Email {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        Email::new(&inner).map_err(|err| Error::invalid_value(Unexpected::Str(&err.0), &"Email"))
    }
}

/// A plaintext password as submitted by a client. Never printed.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Password(NonEmptyString);

impl Password {
    #[must_use]
    pub fn new(password: NonEmptyString) -> Self {
        Self(password)
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.get()
    }
}

impl Debug for Password {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Password").field(&"[redacted]").finish()
    }
}

impl<'de> Deserialize<'de> for Password {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        NonEmptyString::deserialize(deserializer).map(Password)
    }
}
