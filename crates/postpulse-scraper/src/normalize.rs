//! Normalization of raw provider records into canonical posts.

use chrono::{DateTime, NaiveDateTime, Utc};
use postpulse_core::CanonicalPost;

use crate::types::RawPost;

/// Convert a raw provider record into a [`CanonicalPost`].
///
/// Total function: every field has a defined default, so partial or malformed
/// input degrades to empty/zero values instead of failing. Deterministic and
/// side-effect free.
#[must_use]
pub fn normalize(raw: &RawPost) -> CanonicalPost {
    let engagement = raw.engagement.clone().unwrap_or_default();

    let posted_at = raw
        .posted_at
        .as_ref()
        .and_then(|p| p.date.as_deref())
        .and_then(parse_posted_at);

    let image_count = raw.post_images.as_ref().map_or(0, Vec::len);
    let image_count = i64::try_from(image_count).unwrap_or(i64::MAX);

    CanonicalPost {
        external_id: raw.id.clone().unwrap_or_default(),
        url: raw.linkedin_url.clone().unwrap_or_default(),
        content: raw.content.clone().unwrap_or_default(),
        posted_at,
        likes: engagement.likes.unwrap_or(0).max(0),
        comments: engagement.comments.unwrap_or(0).max(0),
        reposts: engagement.shares.unwrap_or(0).max(0),
        has_images: image_count > 0,
        image_count,
    }
}

/// Parse the provider's date string, returning `None` when unparseable.
///
/// Dataset exports carry RFC 3339 timestamps; older exports use a plain
/// `YYYY-MM-DD HH:MM:SS` form without an offset, which is treated as UTC.
fn parse_posted_at(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
