//! Content Extractor (§4.4): converts fetched HTML into cleaned plain text
//! with paragraph structure preserved, trying each strategy in order until
//! one produces at least 100 characters of content.

use chrono::{DateTime, Utc};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::sync::OnceLock;

use crate::boilerplate::{is_boilerplate, is_non_content_subtree};
use crate::language::detect_language;
use gazette_core::model::Language;

const MIN_CONTENT_LEN: usize = 100;
const RAW_TEXT_FALLBACK_CHARS: usize = 5000;

#[derive(Debug, Clone)]
pub struct ExtractedContent {
    pub title: String,
    pub content: String,
    pub author: Option<String>,
    pub publication_date: Option<DateTime<Utc>>,
    pub language: Language,
}

macro_rules! cached_selector {
    ($fn_name:ident, $selector:expr) => {
        fn $fn_name() -> &'static Selector {
            static CELL: OnceLock<Selector> = OnceLock::new();
            CELL.get_or_init(|| Selector::parse($selector).expect("static selector"))
        }
    };
}

cached_selector!(sel_json_ld, r#"script[type="application/ld+json"]"#);
cached_selector!(sel_itemprop_body, r#"[itemprop="articleBody"]"#);
cached_selector!(sel_article_body_class, r#"article [class*="body"]"#);
cached_selector!(sel_main_story_body, r#"main [class*="story-body"]"#);
cached_selector!(sel_article_text, r#".article-text"#);
cached_selector!(sel_story_content, r#".story-content"#);
cached_selector!(sel_paragraph, "p");
cached_selector!(sel_og_title, r#"meta[property="og:title"]"#);
cached_selector!(sel_og_description, r#"meta[property="og:description"]"#);
cached_selector!(sel_article_published, r#"meta[property="article:published_time"]"#);
cached_selector!(sel_meta_author, r#"meta[name="author"]"#);
cached_selector!(sel_body, "body");

fn sentence_split_regex() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    CELL.get_or_init(|| Regex::new(r"(?:[.!?])\s+(?=[A-Z])").expect("static sentence split regex"))
}

fn newline_collapse_regex() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    CELL.get_or_init(|| Regex::new(r"\n{3,}").expect("static newline collapse regex"))
}

/// Run every strategy in order and return the first whose content passes
/// the minimum-length check. `None` means extraction failed outright.
pub fn extract(html: &str) -> Option<ExtractedContent> {
    let document = Html::parse_document(html);

    if let Some(result) = from_json_ld(&document) {
        if result.content.len() >= MIN_CONTENT_LEN {
            return Some(finish(result));
        }
    }
    if let Some(result) = from_conventional_selectors(&document) {
        if result.content.len() >= MIN_CONTENT_LEN {
            return Some(finish(result));
        }
    }
    if let Some(result) = from_meta_fallback(&document) {
        if result.content.len() >= MIN_CONTENT_LEN {
            return Some(finish(result));
        }
    }
    if let Some(result) = from_raw_text(&document) {
        if result.content.len() >= MIN_CONTENT_LEN {
            return Some(finish(result));
        }
    }
    None
}

fn finish(mut result: ExtractedContent) -> ExtractedContent {
    result.language = detect_language(&result.content);
    result
}

fn element_identity(el: &ElementRef) -> String {
    let class = el.value().attr("class").unwrap_or_default();
    let id = el.value().attr("id").unwrap_or_default();
    format!("{class} {id}")
}

/// Collects `<p>` text within `container`, skipping descendants whose own
/// class/id marks them as a non-content subtree, and discarding paragraphs
/// that are themselves boilerplate.
fn collect_paragraphs(container: ElementRef) -> Vec<String> {
    container
        .select(sel_paragraph())
        .filter(|p| {
            p.ancestors()
                .filter_map(ElementRef::wrap)
                .take_while(|a| a.id() != container.id())
                .all(|a| !is_non_content_subtree(&element_identity(&a)))
        })
        .map(|p| p.text().collect::<Vec<_>>().join(" ").trim().to_string())
        .filter(|text| !text.is_empty() && !is_boilerplate(text))
        .collect()
}

fn join_paragraphs(paragraphs: Vec<String>) -> String {
    let joined = paragraphs.join("\n\n");
    newline_collapse_regex().replace_all(&joined, "\n\n").into_owned()
}

fn from_json_ld(document: &Html) -> Option<ExtractedContent> {
    for script in document.select(sel_json_ld()) {
        let raw = script.text().collect::<String>();
        let Ok(value) = serde_json::from_str::<Value>(&raw) else { continue };

        for candidate in flatten_json_ld(&value) {
            if !is_article_type(&candidate) {
                continue;
            }
            let headline = candidate.get("headline").and_then(Value::as_str);
            let body = candidate.get("articleBody").and_then(Value::as_str);
            let (Some(headline), Some(body)) = (headline, body) else { continue };

            let content = join_paragraphs(
                body.split("\n\n")
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty() && !is_boilerplate(p))
                    .collect(),
            );
            if content.is_empty() {
                continue;
            }

            let author = candidate.get("author").and_then(json_ld_author);
            let publication_date = candidate
                .get("datePublished")
                .and_then(Value::as_str)
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| dt.with_timezone(&Utc));

            return Some(ExtractedContent {
                title: headline.trim().to_string(),
                content,
                author,
                publication_date,
                language: Language::En,
            });
        }
    }
    None
}

/// JSON-LD payloads may be a single object, an array of objects, or wrapped
/// in `@graph`; this yields every candidate object regardless of shape.
fn flatten_json_ld(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().flat_map(flatten_json_ld).collect(),
        Value::Object(map) => {
            if let Some(graph) = map.get("@graph") {
                flatten_json_ld(graph)
            } else {
                vec![value]
            }
        }
        _ => Vec::new(),
    }
}

fn is_article_type(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(s)) => s == "NewsArticle" || s == "Article",
        Some(Value::Array(items)) => items
            .iter()
            .any(|v| v.as_str() == Some("NewsArticle") || v.as_str() == Some("Article")),
        _ => false,
    }
}

fn json_ld_author(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map.get("name").and_then(Value::as_str).map(str::to_string),
        Value::Array(items) => items.iter().find_map(json_ld_author),
        _ => None,
    }
}

fn from_conventional_selectors(document: &Html) -> Option<ExtractedContent> {
    let selectors: [&Selector; 5] = [
        sel_itemprop_body(),
        sel_article_body_class(),
        sel_main_story_body(),
        sel_article_text(),
        sel_story_content(),
    ];

    for selector in selectors {
        for container in document.select(selector) {
            let identity = element_identity(&container);
            if is_non_content_subtree(&identity) {
                continue;
            }

            let mut paragraphs = collect_paragraphs(container);
            if paragraphs.is_empty() {
                let text = container.text().collect::<Vec<_>>().join(" ");
                paragraphs = sentence_fallback(&text);
            }
            let content = join_paragraphs(paragraphs);
            if content.len() < MIN_CONTENT_LEN {
                continue;
            }

            return Some(ExtractedContent {
                title: meta_title(document).unwrap_or_default(),
                content,
                author: meta_author(document),
                publication_date: meta_published(document),
                language: Language::En,
            });
        }
    }
    None
}

fn from_meta_fallback(document: &Html) -> Option<ExtractedContent> {
    let title = meta_title(document)?;
    let content = meta_description(document)?;
    if content.len() < MIN_CONTENT_LEN {
        return None;
    }
    Some(ExtractedContent {
        title,
        content,
        author: meta_author(document),
        publication_date: meta_published(document),
        language: Language::En,
    })
}

fn from_raw_text(document: &Html) -> Option<ExtractedContent> {
    let body = document.select(sel_body()).next()?;
    let text = body.text().collect::<Vec<_>>().join(" ");
    let truncated: String = text.chars().take(RAW_TEXT_FALLBACK_CHARS).collect();
    let paragraphs = sentence_fallback(&truncated);
    let content = join_paragraphs(paragraphs);
    if content.len() < MIN_CONTENT_LEN {
        return None;
    }
    Some(ExtractedContent {
        title: meta_title(document).unwrap_or_else(|| "Untitled".to_string()),
        content,
        author: meta_author(document),
        publication_date: meta_published(document),
        language: Language::En,
    })
}

/// Splits div-level text on sentence boundaries when no `<p>` content
/// survives, keeping parts at least 30 characters long.
fn sentence_fallback(text: &str) -> Vec<String> {
    sentence_split_regex()
        .split(text)
        .map(|s| s.trim().to_string())
        .filter(|s| s.chars().count() >= 30 && !is_boilerplate(s))
        .collect()
}

fn meta_title(document: &Html) -> Option<String> {
    document
        .select(sel_og_title())
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn meta_description(document: &Html) -> Option<String> {
    document
        .select(sel_og_description())
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn meta_author(document: &Html) -> Option<String> {
    document
        .select(sel_meta_author())
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn meta_published(document: &Html) -> Option<DateTime<Utc>> {
    document
        .select(sel_article_published())
        .next()
        .and_then(|el| el.value().attr("content"))
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_paragraphs_and_strips_social_share() {
        let html = r#"
            <html><head><meta property="og:title" content="Test Title"></head>
            <body><article>
                <div class="body">
                    <p>This is the first real paragraph with enough length to survive filtering easily.</p>
                    <div class="social-share"><p>Share this article on social media now</p></div>
                    <p>This is the second real paragraph, also long enough to survive the filter.</p>
                </div>
            </article></body></html>
        "#;
        let result = extract(html).expect("extraction should succeed");
        assert!(result.content.contains("first real paragraph"));
        assert!(result.content.contains("second real paragraph"));
        assert!(!result.content.contains("Share this article"));
    }

    #[test]
    fn json_ld_news_article_is_preferred() {
        let html = r#"
            <html><head>
            <script type="application/ld+json">
            {"@type": "NewsArticle", "headline": "Breaking News Today",
             "articleBody": "This is the full article body text which is long enough to pass the minimum content length check easily.",
             "author": {"name": "Jane Reporter"}, "datePublished": "2026-01-15T12:00:00Z"}
            </script>
            </head><body><p>fallback content that should not be used here</p></body></html>
        "#;
        let result = extract(html).expect("extraction should succeed");
        assert_eq!(result.title, "Breaking News Today");
        assert_eq!(result.author.as_deref(), Some("Jane Reporter"));
        assert!(result.publication_date.is_some());
    }

    #[test]
    fn json_ld_graph_wrapper_is_flattened() {
        let html = r#"
            <html><head>
            <script type="application/ld+json">
            {"@graph": [{"@type": "WebSite"}, {"@type": "Article",
             "headline": "Graph Wrapped Headline",
             "articleBody": "Body content long enough to pass the minimum length threshold for a successful extraction."}]}
            </script>
            </head><body></body></html>
        "#;
        let result = extract(html).expect("extraction should succeed");
        assert_eq!(result.title, "Graph Wrapped Headline");
    }

    #[test]
    fn meta_fallback_used_when_no_structured_content() {
        let html = r#"
            <html><head>
            <meta property="og:title" content="Meta Only Title">
            <meta property="og:description" content="A description long enough to pass the one hundred character minimum content length threshold for this fallback strategy to succeed on its own merits.">
            </head><body></body></html>
        "#;
        let result = extract(html).expect("extraction should succeed");
        assert_eq!(result.title, "Meta Only Title");
    }

    #[test]
    fn insufficient_content_is_a_failure() {
        let html = r#"<html><head><title>x</title></head><body><p>Too short.</p></body></html>"#;
        assert!(extract(html).is_none());
    }

    #[test]
    fn raw_text_fallback_splits_on_sentence_boundaries() {
        let html = r#"
            <html><body>
            <div>First sentence about the topic runs on for a while here. Second sentence continues the story here too.</div>
            </body></html>
        "#;
        let result = extract(html).expect("extraction should succeed");
        assert!(result.content.contains("First sentence"));
    }
}
