use crate::{posts::PostTable, seed::SEED_POSTS, users::UserTable};
use postboard_common::{
    model::{
        Id,
        auth::{PasswordHash, UserCredentials},
        post::{CreatePost, Post, PostMarker, PostSearch, UpdatePost},
        user::{CreateUser, Email, User, UserMarker},
    },
    sequence::SequenceExhaustedError,
    util::{EmptyStringError, NonEmptyString},
};
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub type Result<T, E = DbError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("An object in the database was invalid: {0}")]
    Data(#[from] EmptyStringError),
    #[error("No more ids can be assigned: {0}")]
    Sequence(#[from] SequenceExhaustedError),
    #[error("E-mail já registrado: {0}")]
    EmailTaken(Email),
}

/// Process-local storage for posts and users.
///
/// Each table sits behind its own mutex, so writes to a table are serialized and the
/// id sequence advances together with the collection it numbers.
#[derive(Debug, Default)]
pub struct DbClient {
    posts: Mutex<PostTable>,
    users: Mutex<UserTable>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl DbClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A client whose post table already holds [`SEED_POSTS`].
    pub fn seeded() -> Result<Self> {
        let client = Self::new();

        {
            let mut posts = lock(&client.posts);
            for (title, content) in SEED_POSTS {
                posts.insert(
                    NonEmptyString::try_from(title)?,
                    NonEmptyString::try_from(content)?,
                    None,
                )?;
            }
        }

        Ok(client)
    }

    pub fn fetch_post(&self, post_id: Id<PostMarker>) -> Option<Post> {
        lock(&self.posts).get(post_id).cloned()
    }

    pub fn fetch_posts(&self) -> Vec<Post> {
        lock(&self.posts).list().to_vec()
    }

    pub fn fetch_posts_by_author(&self, author: &str) -> Vec<Post> {
        lock(&self.posts).list_by_author(author)
    }

    pub fn create_post(&self, post: &CreatePost) -> Result<Post> {
        Ok(lock(&self.posts).create(post)?)
    }

    pub fn update_post(&self, post_id: Id<PostMarker>, update: UpdatePost) -> Option<Post> {
        lock(&self.posts).update(post_id, update).cloned()
    }

    pub fn delete_post(&self, post_id: Id<PostMarker>) -> Option<Post> {
        lock(&self.posts).delete(post_id)
    }

    pub fn search_posts(&self, search: &PostSearch) -> Vec<Post> {
        lock(&self.posts).search(search)
    }

    pub fn fetch_user(&self, user_id: Id<UserMarker>) -> Option<User> {
        lock(&self.users).by_id(user_id).map(User::from)
    }

    pub fn fetch_user_credentials(&self, email: &Email) -> Option<UserCredentials> {
        lock(&self.users).by_email(email).map(UserCredentials::from)
    }

    pub fn create_user(&self, user: &CreateUser, password_hash: PasswordHash) -> Result<User> {
        lock(&self.users).create(user, password_hash)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        client::{DbClient, DbError},
        seed::SEED_POSTS,
    };
    use postboard_common::{
        model::{
            Id,
            auth::PasswordHash,
            post::{CreatePost, PostSearch},
            user::{CreateUser, Email, Password, Role},
        },
        util::NonEmptyString,
    };

    fn text(value: &str) -> NonEmptyString {
        NonEmptyString::try_from(value).unwrap()
    }

    fn create_user(email: &str) -> CreateUser {
        CreateUser {
            name: Some(text("Ana")),
            email: Email::new(email).unwrap(),
            password: Password::new(text("segredo")),
            role: Role::Teacher,
        }
    }

    #[test]
    fn seeded_posts() {
        let db = DbClient::seeded().unwrap();
        let posts = db.fetch_posts();

        assert_eq!(posts.len(), SEED_POSTS.len());
        for (index, (post, (title, content))) in posts.iter().zip(SEED_POSTS).enumerate() {
            assert_eq!(post.id.get(), index as u64 + 1);
            assert_eq!(post.title.get(), title);
            assert_eq!(post.content.get(), content);
            assert_eq!(post.author, None);
        }

        let created = db
            .create_post(&CreatePost {
                title: text("Novo"),
                content: text("Conteúdo"),
                author: text("Autor"),
            })
            .unwrap();
        assert_eq!(created.id, Id::from(5));
    }

    #[test]
    fn seeded_search() {
        let db = DbClient::seeded().unwrap();
        let ids = |title: Option<&str>, content: Option<&str>| -> Vec<u64> {
            db.search_posts(&PostSearch::new(title, content).unwrap())
                .into_iter()
                .map(|post| post.id.get())
                .collect()
        };

        assert_eq!(ids(Some("Tutorial"), None), [3]);
        assert_eq!(ids(None, Some("node")), [3, 4]);
        assert_eq!(ids(Some("Node"), Some("Avançado")), [4]);
        assert_eq!(ids(Some("tut"), None), [3]);
        assert!(ids(Some("Inexistente"), None).is_empty());
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let db = DbClient::new();
        let hash = PasswordHash::generate(&Password::new(text("segredo"))).unwrap();

        let user = db.create_user(&create_user("ana@example.com"), hash.clone()).unwrap();
        assert_eq!(user.id, Id::from(1));
        assert_eq!(db.fetch_user(user.id), Some(user.clone()));

        let duplicate = db.create_user(&create_user("ANA@example.com"), hash);
        assert!(matches!(duplicate, Err(DbError::EmailTaken(_))));

        let credentials = db
            .fetch_user_credentials(&Email::new("ana@example.com").unwrap())
            .unwrap();
        assert_eq!(credentials.user, user);
        assert!(credentials.password_hash.verify(&Password::new(text("segredo"))).unwrap());
    }

    #[test]
    fn unknown_users() {
        let db = DbClient::new();

        assert!(db.fetch_user(Id::from(1)).is_none());
        assert!(
            db.fetch_user_credentials(&Email::new("nobody@example.com").unwrap())
                .is_none()
        );
    }
}
