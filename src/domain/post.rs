use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Server-assigned post identifier
///
/// This is the mapping key for detail lookups and the de-duplication key of the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub i64);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PostId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Who can see a post
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Draft,
    Anonymous,
}

impl Visibility {
    /// The next variant in declaration order, wrapping around
    pub fn next(self) -> Self {
        let mut all = Visibility::iter().cycle();
        all.find(|v| *v == self);
        all.next().unwrap_or_default()
    }
}

/// Treats an explicit JSON `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A blog post as returned by the blog API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub visibility: Visibility,
    #[serde(default)]
    pub main_image_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sub_images: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, rename = "user_id")]
    pub author_id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_deleted: bool,
}

impl Post {
    /// Create a public post with the given id and title and no other content
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id: PostId(id),
            title: title.into(),
            content: String::new(),
            tags: vec![],
            visibility: Visibility::Public,
            main_image_url: None,
            sub_images: vec![],
            created_at: None,
            author_id: None,
            is_deleted: false,
        }
    }

    /// Parse `created_at`
    ///
    /// The API emits either RFC 3339 timestamps or naive ISO 8601 timestamps without an offset;
    /// the latter are interpreted as UTC.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.created_at.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|_| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.and_utc())
            })
            .ok()
    }

    /// Resolve the main image against the blog API base URL
    ///
    /// Returns `None` when there is no image. The API uses the literal `"string"` as a
    /// placeholder for posts created without an image.
    pub fn image_url(&self, base_url: &str) -> Option<String> {
        let url = self.main_image_url.as_deref()?.trim();
        if url.is_empty() || url == "string" {
            return None;
        }
        if url.starts_with("http://") || url.starts_with("https://") {
            Some(url.to_string())
        } else {
            Some(format!(
                "{}/{}",
                base_url.trim_end_matches('/'),
                url.trim_start_matches('/')
            ))
        }
    }
}

/// Request body for creating a post
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub visibility: Visibility,
    pub tags: Vec<String>,
    pub main_image_url: Option<String>,
    pub sub_images: Vec<String>,
}

/// Server-side filter applied to the listing endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedFilter {
    pub visibility: Option<Visibility>,
    pub tags: Vec<String>,
}

impl FeedFilter {
    pub fn with_visibility(visibility: Visibility) -> Self {
        Self {
            visibility: Some(visibility),
            tags: vec![],
        }
    }

    /// Query parameters for `GET /blogs`, excluding paging
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(visibility) = self.visibility {
            pairs.push(("visibility", visibility.to_string()));
        }
        if !self.tags.is_empty() {
            pairs.push(("tags", self.tags.join(",")));
        }
        pairs
    }
}

impl fmt::Display for FeedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.visibility {
            Some(visibility) => write!(f, "{visibility}")?,
            None => write!(f, "all")?,
        }
        if !self.tags.is_empty() {
            write!(f, " #{}", self.tags.join(" #"))?;
        }
        Ok(())
    }
}
