//! Canonical post and analysis types shared across the workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalized representation of one scraped social post.
///
/// Produced exactly once per raw provider record by the normalizer and never
/// mutated afterwards. Every field has a defined default so partial provider
/// payloads degrade to empty/zero values rather than failing.
///
/// Invariant: `has_images == (image_count > 0)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalPost {
    /// Provider-side post identifier; empty string when the provider omits it.
    pub external_id: String,
    pub url: String,
    pub content: String,
    /// Publication time, `None` when absent or unparseable.
    pub posted_at: Option<DateTime<Utc>>,
    pub likes: i64,
    pub comments: i64,
    pub reposts: i64,
    pub has_images: bool,
    pub image_count: i64,
}

/// Structured signals derived from a [`CanonicalPost`]'s content.
///
/// Pure function of the post text; created once, never mutated.
///
/// Invariant: `topic_category == TopicCategory::Unknown` iff the content
/// was empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostAnalysis {
    /// Lead sentence of the post, truncated to 200 chars with an ellipsis.
    pub hook: String,
    pub word_count: i64,
    pub has_list_format: bool,
    pub topic_category: TopicCategory,
    /// Companies named in attachment metadata. Extraction from the provider's
    /// content attributes is not implemented yet, so this is always empty.
    pub mentioned_companies: Vec<String>,
    pub call_to_action: String,
}

/// Coarse content classification derived from ordered keyword matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicCategory {
    CompanyBreakdown,
    Announcement,
    Insight,
    CaseStudy,
    Tips,
    Personal,
    General,
    Unknown,
}

impl TopicCategory {
    /// Stable string form used for storage and the HTTP API.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TopicCategory::CompanyBreakdown => "company_breakdown",
            TopicCategory::Announcement => "announcement",
            TopicCategory::Insight => "insight",
            TopicCategory::CaseStudy => "case_study",
            TopicCategory::Tips => "tips",
            TopicCategory::Personal => "personal",
            TopicCategory::General => "general",
            TopicCategory::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for TopicCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TopicCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "company_breakdown" => Ok(TopicCategory::CompanyBreakdown),
            "announcement" => Ok(TopicCategory::Announcement),
            "insight" => Ok(TopicCategory::Insight),
            "case_study" => Ok(TopicCategory::CaseStudy),
            "tips" => Ok(TopicCategory::Tips),
            "personal" => Ok(TopicCategory::Personal),
            "general" => Ok(TopicCategory::General),
            "unknown" => Ok(TopicCategory::Unknown),
            _ => Err(()),
        }
    }
}

/// Scrape lifecycle state stored on the profile row.
///
/// Transitions: `Pending -> Scraping -> {Completed | Failed}`. The status
/// outlives individual runs; a completed or failed profile can be re-scraped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeStatus {
    Pending,
    Scraping,
    Completed,
    Failed,
}

impl ScrapeStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ScrapeStatus::Pending => "pending",
            ScrapeStatus::Scraping => "scraping",
            ScrapeStatus::Completed => "completed",
            ScrapeStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ScrapeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ScrapeStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ScrapeStatus::Pending),
            "scraping" => Ok(ScrapeStatus::Scraping),
            "completed" => Ok(ScrapeStatus::Completed),
            "failed" => Ok(ScrapeStatus::Failed),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_category_round_trips_through_strings() {
        let all = [
            TopicCategory::CompanyBreakdown,
            TopicCategory::Announcement,
            TopicCategory::Insight,
            TopicCategory::CaseStudy,
            TopicCategory::Tips,
            TopicCategory::Personal,
            TopicCategory::General,
            TopicCategory::Unknown,
        ];
        for topic in all {
            let parsed: TopicCategory = topic.as_str().parse().expect("should parse back");
            assert_eq!(parsed, topic);
        }
    }

    #[test]
    fn topic_category_serializes_snake_case() {
        let json = serde_json::to_string(&TopicCategory::CompanyBreakdown).unwrap();
        assert_eq!(json, "\"company_breakdown\"");
    }

    #[test]
    fn scrape_status_round_trips_through_strings() {
        let all = [
            ScrapeStatus::Pending,
            ScrapeStatus::Scraping,
            ScrapeStatus::Completed,
            ScrapeStatus::Failed,
        ];
        for status in all {
            let parsed: ScrapeStatus = status.as_str().parse().expect("should parse back");
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn unknown_topic_string_is_rejected() {
        assert!("clickbait".parse::<TopicCategory>().is_err());
    }
}
