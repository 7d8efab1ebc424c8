use postboard_common::{
    model::{
        Id,
        auth::{PasswordHash, UserCredentials},
        user::{Email, Role, User, UserMarker},
    },
    util::NonEmptyString,
};

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub(crate) struct UserRecord {
    pub id: Id<UserMarker>,
    pub name: Option<NonEmptyString>,
    pub email: Email,
    pub password_hash: PasswordHash,
    pub role: Role,
}

impl From<&UserRecord> for User {
    fn from(value: &UserRecord) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
            email: value.email.clone(),
            role: value.role,
        }
    }
}

impl From<&UserRecord> for UserCredentials {
    fn from(value: &UserRecord) -> Self {
        Self {
            user: value.into(),
            password_hash: value.password_hash.clone(),
        }
    }
}
