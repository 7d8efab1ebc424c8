use crate::{client::DbError, record::UserRecord};
use postboard_common::{
    model::{
        Id,
        auth::PasswordHash,
        user::{CreateUser, Email, User, UserMarker},
    },
    sequence::IdSequence,
};

#[derive(Clone, Debug, Default)]
pub(crate) struct UserTable {
    users: Vec<UserRecord>,
    ids: IdSequence<UserMarker>,
}

impl UserTable {
    pub fn create(
        &mut self,
        user: &CreateUser,
        password_hash: PasswordHash,
    ) -> Result<User, DbError> {
        if self.by_email(&user.email).is_some() {
            return Err(DbError::EmailTaken(user.email.clone()));
        }

        let record = UserRecord {
            id: self.ids.generate()?,
            name: user.name.clone(),
            email: user.email.clone(),
            password_hash,
            role: user.role,
        };
        let user = User::from(&record);
        self.users.push(record);

        Ok(user)
    }

    pub fn by_id(&self, id: Id<UserMarker>) -> Option<&UserRecord> {
        self.users.iter().find(|user| user.id == id)
    }

    pub fn by_email(&self, email: &Email) -> Option<&UserRecord> {
        self.users.iter().find(|user| &user.email == email)
    }
}
