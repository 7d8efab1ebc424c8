use postboard_common::{
    model::{
        Id,
        post::{CreatePost, Post, PostMarker, PostSearch, UpdatePost},
    },
    sequence::{IdSequence, SequenceExhaustedError},
    util::NonEmptyString,
};

/// Posts in insertion order plus the sequence their ids are drawn from.
#[derive(Clone, Debug, Default)]
pub(crate) struct PostTable {
    posts: Vec<Post>,
    ids: IdSequence<PostMarker>,
}

impl PostTable {
    pub fn insert(
        &mut self,
        title: NonEmptyString,
        content: NonEmptyString,
        author: Option<NonEmptyString>,
    ) -> Result<Post, SequenceExhaustedError> {
        let post = Post {
            id: self.ids.generate()?,
            title,
            content,
            author,
        };
        self.posts.push(post.clone());

        Ok(post)
    }

    pub fn create(&mut self, post: &CreatePost) -> Result<Post, SequenceExhaustedError> {
        self.insert(
            post.title.clone(),
            post.content.clone(),
            Some(post.author.clone()),
        )
    }

    pub fn get(&self, id: Id<PostMarker>) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == id)
    }

    pub fn list(&self) -> &[Post] {
        &self.posts
    }

    pub fn list_by_author(&self, author: &str) -> Vec<Post> {
        self.posts
            .iter()
            .filter(|post| post.is_authored_by(author))
            .cloned()
            .collect()
    }

    pub fn update(&mut self, id: Id<PostMarker>, update: UpdatePost) -> Option<&Post> {
        let post = self.posts.iter_mut().find(|post| post.id == id)?;
        post.apply(update);

        Some(post)
    }

    pub fn delete(&mut self, id: Id<PostMarker>) -> Option<Post> {
        let index = self.posts.iter().position(|post| post.id == id)?;

        Some(self.posts.remove(index))
    }

    pub fn search(&self, search: &PostSearch) -> Vec<Post> {
        self.posts
            .iter()
            .filter(|post| search.matches(post))
            .cloned()
            .collect()
    }
}
