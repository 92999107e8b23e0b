//! Harvest provider wire types.
//!
//! The provider's post schema is loosely specified and changes without
//! notice, so every field is optional and deserialized leniently: a field
//! that is present but mis-shaped becomes `None` rather than failing the
//! whole record.

use serde::{Deserialize, Deserializer};

/// Deserialize a field into `Option<T>`, mapping any shape mismatch to `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// One raw post record as returned by the provider's dataset endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPost {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub linkedin_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub posted_at: Option<RawPostedAt>,
    #[serde(default, deserialize_with = "lenient")]
    pub engagement: Option<RawEngagement>,
    #[serde(default, deserialize_with = "lenient")]
    pub post_images: Option<Vec<RawImage>>,
    /// Attachment metadata naming companies and members. Carried on the wire
    /// type so company-mention extraction can be built later; the normalizer
    /// does not read it yet.
    #[serde(default, deserialize_with = "lenient")]
    pub content_attributes: Option<Vec<RawContentAttribute>>,
}

/// Nested date object: `{"date": "2025-01-15T10:00:00.000Z"}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPostedAt {
    #[serde(default, deserialize_with = "lenient")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEngagement {
    #[serde(default, deserialize_with = "lenient")]
    pub likes: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub comments: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub shares: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawImage {
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContentAttribute {
    #[serde(default, deserialize_with = "lenient")]
    pub r#type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub company: Option<RawCompanyRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCompanyRef {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}
