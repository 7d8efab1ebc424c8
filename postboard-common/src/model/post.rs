use crate::{model::Id, util::NonEmptyString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct PostMarker;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
pub struct Post {
    pub id: Id<PostMarker>,
    pub title: NonEmptyString,
    pub content: NonEmptyString,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<NonEmptyString>,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
pub struct CreatePost {
    #[serde(alias = "titulo")]
    pub title: NonEmptyString,
    #[serde(alias = "conteudo")]
    pub content: NonEmptyString,
    #[serde(alias = "autor")]
    pub author: NonEmptyString,
}

/// Partial update of a [`Post`]. Absent and empty fields leave the stored value untouched.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct UpdatePost {
    #[serde(alias = "titulo")]
    pub title: Option<String>,
    #[serde(alias = "conteudo")]
    pub content: Option<String>,
    #[serde(alias = "autor")]
    pub author: Option<String>,
}

impl Post {
    pub fn apply(&mut self, update: UpdatePost) {
        if let Some(title) = non_empty(update.title) {
            self.title = title;
        }
        if let Some(content) = non_empty(update.content) {
            self.content = content;
        }
        if let Some(author) = non_empty(update.author) {
            self.author = Some(author);
        }
    }

    #[must_use]
    pub fn is_authored_by(&self, author: &str) -> bool {
        self.author
            .as_ref()
            .is_some_and(|post_author| post_author.get() == author)
    }
}

fn non_empty(value: Option<String>) -> Option<NonEmptyString> {
    value.and_then(|value| NonEmptyString::new(value).ok())
}

/// Raw search parameters as they arrive in a query string.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct PostSearchQuery {
    #[serde(alias = "titulo")]
    pub title: Option<String>,
    #[serde(alias = "conteudo")]
    pub content: Option<String>,
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("É necessário fornecer pelo menos um parâmetro de busca (titulo ou conteudo)")]
pub struct EmptySearchError;

/// Validated search over posts.
///
/// Every supplied term has to occur, ignoring case, in the title or in the content of a
/// post. A term that was not supplied places no constraint on the post.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct PostSearch {
    title_term: Option<String>,
    content_term: Option<String>,
}

impl PostSearch {
    pub fn new(
        title_term: Option<&str>,
        content_term: Option<&str>,
    ) -> Result<Self, EmptySearchError> {
        let title_term = normalize_term(title_term);
        let content_term = normalize_term(content_term);

        if title_term.is_none() && content_term.is_none() {
            return Err(EmptySearchError);
        }

        Ok(Self {
            title_term,
            content_term,
        })
    }

    #[must_use]
    pub fn matches(&self, post: &Post) -> bool {
        let title = post.title.get().to_lowercase();
        let content = post.content.get().to_lowercase();

        [&self.title_term, &self.content_term]
            .into_iter()
            .flatten()
            .all(|term| title.contains(term.as_str()) || content.contains(term.as_str()))
    }
}

fn normalize_term(term: Option<&str>) -> Option<String> {
    term.filter(|term| !term.is_empty())
        .map(str::to_lowercase)
}

impl TryFrom<&PostSearchQuery> for PostSearch {
    type Error = EmptySearchError;

    fn try_from(value: &PostSearchQuery) -> Result<Self, Self::Error> {
        Self::new(value.title.as_deref(), value.content.as_deref())
    }
}
