//! Paragraph-level boilerplate detection shared by the conventional-selector
//! and raw-text extraction strategies.

use regex::Regex;
use std::sync::OnceLock;

static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

fn patterns() -> &'static [Regex] {
    PATTERNS
        .get_or_init(|| {
            [
                r"(?i)^\s*(share|save|comment|subscribe|follow|newsletter)\b",
                r"(?i)advertisement|sponsored|promoted",
                r"(?i)\d+\s*(minutes?|hours?|days?)\s*ago",
                r"(?i)read more|related(\s+articles?)?|you may like|more from",
                r"(?i)image\s*(caption|source)|getty images",
                r"(?i)cookie|privacy policy|terms of (service|use)",
            ]
            .iter()
            .map(|p| Regex::new(p).expect("static boilerplate pattern"))
            .collect()
        })
        .as_slice()
}

/// True if `text` matches any of the design-stable boilerplate patterns, or
/// is too short to be a real paragraph.
pub fn is_boilerplate(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.chars().count() < 30 {
        return true;
    }
    patterns().iter().any(|re| re.is_match(trimmed))
}

/// Regexes applied against an element's class/id attributes to identify
/// non-content subtrees (`nav`, share widgets, ads, etc.) ahead of text
/// collection, since `scraper`'s DOM has no node-removal API.
static SUBTREE_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

fn subtree_patterns() -> &'static [Regex] {
    SUBTREE_PATTERNS
        .get_or_init(|| {
            [
                r"(?i)\bnav\b|navigation",
                r"(?i)social|share",
                r"(?i)newsletter|subscribe",
                r"(?i)\bad[s-]|advert|sponsor",
                r"(?i)related",
                r"(?i)comment",
                r"(?i)promo",
                r"(?i)banner",
                r"(?i)\bmeta\b",
            ]
            .iter()
            .map(|p| Regex::new(p).expect("static subtree pattern"))
            .collect()
        })
        .as_slice()
}

/// True if the element's combined `class`/`id` attribute text identifies a
/// non-content subtree that extraction should skip.
pub fn is_non_content_subtree(class_and_id: &str) -> bool {
    subtree_patterns().iter().any(|re| re.is_match(class_and_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_paragraph_is_boilerplate() {
        assert!(is_boilerplate("Share"));
    }

    #[test]
    fn leading_subscribe_is_boilerplate() {
        assert!(is_boilerplate(
            "Subscribe to our newsletter for more stories like this one."
        ));
    }

    #[test]
    fn ordinary_paragraph_is_not_boilerplate() {
        assert!(!is_boilerplate(
            "The city council voted Tuesday to approve the new zoning plan after months of debate."
        ));
    }

    #[test]
    fn relative_timestamp_is_boilerplate() {
        assert!(is_boilerplate("Published 12 minutes ago by staff writer covering this beat closely."));
    }

    #[test]
    fn social_share_class_is_non_content() {
        assert!(is_non_content_subtree("social-share-bar"));
    }

    #[test]
    fn article_body_class_is_content() {
        assert!(!is_non_content_subtree("article-body"));
    }
}
