//! Post data model.
//!
//! A post is the only persisted entity: an identifier issued by the store and
//! a free-form text body. Serialises as `{"id": <int>, "body": <string>}`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Store-issued post identifier.
///
/// Identifiers are never minted by clients; repositories construct them from
/// the sequence value returned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(i32);

impl PostId {
    /// Wrap a raw identifier value.
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Access the raw identifier value.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PostId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// A persisted post.
///
/// # Examples
/// ```
/// use backend::domain::{Post, PostId};
///
/// let post = Post::new(PostId::new(3), "Hello, world!");
/// let edited = post.with_body("Hello again");
/// assert_eq!(edited.id(), PostId::new(3));
/// assert_eq!(edited.body(), "Hello again");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    id: PostId,
    body: String,
}

impl Post {
    /// Pair a store-issued identifier with a body.
    pub fn new(id: PostId, body: impl Into<String>) -> Self {
        Self {
            id,
            body: body.into(),
        }
    }

    /// Identifier issued when the post was created.
    pub fn id(&self) -> PostId {
        self.id
    }

    /// Current body text.
    pub fn body(&self) -> &str {
        self.body.as_str()
    }

    /// Replace the body, keeping the identifier.
    #[must_use]
    pub fn with_body(self, body: impl Into<String>) -> Self {
        Self {
            id: self.id,
            body: body.into(),
        }
    }
}
