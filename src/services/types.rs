//! Typed models for World Anvil resources.

use serde::Deserialize;
use std::fmt;

/// Detail level for a read.
///
/// The upstream encodes granularity as a small integer; it changes the
/// response shape and is therefore part of every cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    /// Identifier and title only
    Minimal,
    /// The common display fields
    #[default]
    Standard,
    /// Everything the API will return
    Full,
}

impl Granularity {
    /// The wire-level granularity value.
    pub fn level(self) -> i8 {
        match self {
            Granularity::Minimal => -1,
            Granularity::Standard => 0,
            Granularity::Full => 2,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level())
    }
}

/// The authenticated user.
#[derive(Debug, Clone, Deserialize)]
pub struct Identity {
    /// User identifier
    pub id: String,
    /// Display name
    pub username: String,
    /// Opaque user hash
    #[serde(default)]
    pub userhash: Option<String>,
}

/// A reference to another resource by id.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ResourceRef {
    /// Referenced resource identifier
    pub id: String,
}

/// A world.
#[derive(Debug, Clone, Deserialize)]
pub struct World {
    /// World identifier
    pub id: String,
    /// World title
    pub title: String,
    /// URL slug
    #[serde(default)]
    pub slug: Option<String>,
    /// Public URL
    #[serde(default)]
    pub url: Option<String>,
    /// Description, present at standard granularity and above
    #[serde(default)]
    pub description: Option<String>,
}

/// An article within a world.
#[derive(Debug, Clone, Deserialize)]
pub struct Article {
    /// Article identifier
    pub id: String,
    /// Article title
    pub title: String,
    /// URL slug
    #[serde(default)]
    pub slug: Option<String>,
    /// Owning world
    #[serde(default)]
    pub world: Option<ResourceRef>,
    /// Body content, present at full granularity
    #[serde(default)]
    pub content: Option<String>,
}

/// A category grouping articles within a world.
#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    /// Category identifier
    pub id: String,
    /// Category title
    pub title: String,
    /// URL slug
    #[serde(default)]
    pub slug: Option<String>,
}

/// Envelope for list responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ListEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub entities: Vec<T>,
}
