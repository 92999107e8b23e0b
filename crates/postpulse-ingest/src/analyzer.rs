//! Content analysis of canonical post text.
//!
//! Everything here is a pure function of the post content: no I/O, no
//! failures. Empty content yields the empty analysis rather than an error,
//! since scraped text is inherently noisy.

use std::sync::LazyLock;

use postpulse_core::{PostAnalysis, TopicCategory};
use regex::Regex;

/// Hooks longer than this are truncated and marked with an ellipsis.
const MAX_HOOK_CHARS: usize = 200;

/// A numbered list line: digits then `.` or `)` then whitespace, immediately
/// after a newline. Anchoring on `\n` keeps mid-sentence matches out.
static NUMBERED_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\d+[.)]\s").expect("numbered list pattern is valid"));

/// A bulleted list line: hyphen or a common bullet/arrow/checkmark glyph then
/// whitespace, immediately after a newline. Mid-sentence hyphens
/// ("state-of-the-art") never match because they are not preceded by `\n`.
static BULLETED_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[-•→✓✅⚡🔥]\s").expect("bulleted list pattern is valid"));

/// Topic keyword table, scanned in declaration order.
///
/// The first topic with any keyword appearing in the lower-cased content
/// wins; this is a fixed scanning-order policy, not a scoring system, and the
/// order is load-bearing for downstream analytics.
const TOPIC_KEYWORDS: &[(TopicCategory, &[&str])] = &[
    (
        TopicCategory::CompanyBreakdown,
        &[
            "here's what stands out",
            "breakdown",
            "what they do",
            "playbook",
        ],
    ),
    (
        TopicCategory::Announcement,
        &[
            "congrats",
            "announcing",
            "excited to",
            "launched",
            "raised",
            "funding",
        ],
    ),
    (
        TopicCategory::Insight,
        &[
            "here's why",
            "the truth",
            "hot take",
            "unpopular opinion",
            "most people",
        ],
    ),
    (
        TopicCategory::CaseStudy,
        &["case study", "results", "how they", "what happened"],
    ),
    (
        TopicCategory::Tips,
        &["tips", "how to", "ways to", "steps to", "mistakes"],
    ),
    (
        TopicCategory::Personal,
        &["i learned", "my experience", "when i", "my journey"],
    ),
];

/// Closing-line phrases that mark a call to action, checked in order per line.
const CTA_PHRASES: &[&str] = &[
    "follow",
    "comment",
    "share",
    "check out",
    "link in",
    "dm me",
    "reach out",
    "subscribe",
    "join",
    "learn more",
    "what do you think",
    "agree?",
    "thoughts?",
];

/// Derive structured signals from post content.
///
/// Pure, deterministic, and total: empty content yields
/// `{hook: "", word_count: 0, has_list_format: false,
///   topic_category: Unknown, call_to_action: ""}`.
#[must_use]
pub fn analyze(content: &str) -> PostAnalysis {
    PostAnalysis {
        hook: extract_hook(content),
        word_count: count_words(content),
        has_list_format: has_list_format(content),
        topic_category: categorize_topic(content),
        // Company extraction from the provider's attachment metadata is not
        // implemented yet; the field is kept so stored rows carry it.
        mentioned_companies: Vec::new(),
        call_to_action: extract_cta(content),
    }
}

/// First line of the content, trimmed, truncated to [`MAX_HOOK_CHARS`] chars
/// (UTF-8 safe) with a trailing `"..."` when it overflows.
fn extract_hook(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or("").trim();
    if first_line.chars().count() > MAX_HOOK_CHARS {
        let truncated: String = first_line.chars().take(MAX_HOOK_CHARS).collect();
        format!("{truncated}...")
    } else {
        first_line.to_string()
    }
}

/// Number of maximal non-whitespace runs in the content.
fn count_words(content: &str) -> i64 {
    i64::try_from(content.split_whitespace().count()).unwrap_or(i64::MAX)
}

/// True when any line starts as a numbered or bulleted list entry.
fn has_list_format(content: &str) -> bool {
    NUMBERED_LIST.is_match(content) || BULLETED_LIST.is_match(content)
}

/// First topic in declaration order with a keyword present in the content.
///
/// Empty content is `Unknown`; non-empty content with no keyword match is
/// `General`.
fn categorize_topic(content: &str) -> TopicCategory {
    if content.is_empty() {
        return TopicCategory::Unknown;
    }
    let lower = content.to_lowercase();
    for &(topic, keywords) in TOPIC_KEYWORDS {
        for keyword in keywords {
            if lower.contains(keyword) {
                return topic;
            }
        }
    }
    TopicCategory::General
}

/// Scan the last 3 non-empty lines for a CTA phrase and return the first
/// matching line, trimmed. Earlier lines are never inspected: a CTA buried in
/// the body of a post is not a closing ask.
fn extract_cta(content: &str) -> String {
    let lines: Vec<&str> = content
        .trim()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let start = lines.len().saturating_sub(3);
    for line in &lines[start..] {
        let lower = line.to_lowercase();
        for phrase in CTA_PHRASES {
            if lower.contains(phrase) {
                return (*line).to_string();
            }
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_yields_empty_analysis() {
        let analysis = analyze("");
        assert_eq!(analysis.hook, "");
        assert_eq!(analysis.word_count, 0);
        assert!(!analysis.has_list_format);
        assert_eq!(analysis.topic_category, TopicCategory::Unknown);
        assert!(analysis.mentioned_companies.is_empty());
        assert_eq!(analysis.call_to_action, "");
    }

    #[test]
    fn unknown_topic_only_for_empty_content() {
        assert_eq!(analyze("").topic_category, TopicCategory::Unknown);
        assert_eq!(
            analyze("nothing matching here").topic_category,
            TopicCategory::General
        );
    }

    #[test]
    fn word_count_is_whitespace_runs() {
        assert_eq!(analyze("one two three").word_count, 3);
        assert_eq!(analyze("  leading   and\ttrailing  \n").word_count, 3);
        assert_eq!(analyze("single").word_count, 1);
    }

    #[test]
    fn hook_is_trimmed_first_line() {
        let analysis = analyze("  The opening line.  \nSecond line here.");
        assert_eq!(analysis.hook, "The opening line.");
    }

    #[test]
    fn short_hook_is_unchanged() {
        let line = "a".repeat(50);
        assert_eq!(analyze(&line).hook, line);
    }

    #[test]
    fn long_hook_truncates_at_200_chars_with_ellipsis() {
        let line = "x".repeat(250);
        let hook = analyze(&line).hook;
        assert_eq!(hook.chars().count(), 203);
        assert_eq!(hook, format!("{}...", "x".repeat(200)));
    }

    #[test]
    fn hook_truncation_counts_chars_not_bytes() {
        let line = "é".repeat(250);
        let hook = analyze(&line).hook;
        assert_eq!(hook, format!("{}...", "é".repeat(200)));
    }

    #[test]
    fn numbered_list_is_detected() {
        assert!(analyze("My top picks:\n1. First\n2. Second").has_list_format);
        assert!(analyze("Steps:\n1) one\n2) two").has_list_format);
    }

    #[test]
    fn bulleted_list_is_detected() {
        assert!(analyze("Check this:\n- item one\n- item two").has_list_format);
        assert!(analyze("Highlights:\n• speed\n• cost").has_list_format);
        assert!(analyze("Wins:\n✅ shipped\n✅ hired").has_list_format);
    }

    #[test]
    fn mid_sentence_hyphen_is_not_a_list() {
        assert!(!analyze("We built a state-of-the-art solution last year.").has_list_format);
    }

    #[test]
    fn list_marker_needs_a_preceding_newline() {
        // A list marker on the very first line has no preceding newline and
        // does not count.
        assert!(!analyze("1) only item on a single line").has_list_format);
        assert!(!analyze("- a lone leading hyphen line").has_list_format);
    }

    #[test]
    fn topic_tie_break_uses_declaration_order() {
        // "congrats" (announcement) declares before "tips".
        let analysis = analyze("Congrats on the launch! Here are some tips.");
        assert_eq!(analysis.topic_category, TopicCategory::Announcement);

        // "playbook" (company_breakdown) declares before "excited to".
        let analysis = analyze("Excited to share their playbook.");
        assert_eq!(analysis.topic_category, TopicCategory::CompanyBreakdown);
    }

    #[test]
    fn topic_keywords_match_case_insensitively() {
        assert_eq!(
            analyze("UNPOPULAR OPINION: meetings work.").topic_category,
            TopicCategory::Insight
        );
    }

    #[test]
    fn personal_topic_matches() {
        assert_eq!(
            analyze("When I started out, nobody told me this.").topic_category,
            TopicCategory::Personal
        );
    }

    #[test]
    fn cta_found_in_last_line() {
        let content = "Some insight here.\n\nMore detail.\n\nFollow me for more.";
        assert_eq!(analyze(content).call_to_action, "Follow me for more.");
    }

    #[test]
    fn cta_ignores_lines_before_the_last_three() {
        // "subscribe" sits on the 4th-from-last non-empty line and must not
        // be picked up.
        let content = "Intro line.\nPlease subscribe now.\nBody one.\nBody two.\nClosing line.";
        assert_eq!(analyze(content).call_to_action, "");
    }

    #[test]
    fn cta_returns_first_matching_line_in_order() {
        // Both of the last two lines contain CTA phrases; line order wins
        // over phrase order.
        let content = "Body.\nWhat do you think?\nFollow for more.";
        assert_eq!(analyze(content).call_to_action, "What do you think?");
    }

    #[test]
    fn cta_matches_case_insensitively() {
        let content = "Point made.\n\nDM ME if you want the template.";
        assert_eq!(
            analyze(content).call_to_action,
            "DM ME if you want the template."
        );
    }

    #[test]
    fn mentioned_companies_is_always_empty() {
        let analysis = analyze("Acme Corp and Globex both shipped this week.");
        assert!(analysis.mentioned_companies.is_empty());
    }

    #[test]
    fn analysis_of_typical_post() {
        let content = "Here's why most founders fail.\n\nDM me for more.";
        let analysis = analyze(content);
        assert_eq!(analysis.hook, "Here's why most founders fail.");
        assert_eq!(analysis.word_count, 9);
        assert!(!analysis.has_list_format);
        assert_eq!(analysis.topic_category, TopicCategory::Insight);
        assert_eq!(analysis.call_to_action, "DM me for more.");
    }

    #[test]
    fn analyze_is_deterministic() {
        let content = "Hot take:\n- meetings\n- standups\n\nAgree?";
        assert_eq!(analyze(content), analyze(content));
    }
}
