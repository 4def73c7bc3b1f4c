//! Duplicate-suppression hash (§4.4, §4.5).

use sha2::{Digest, Sha256};

/// `sha256(title + ":" + content[:1000])`, hex-encoded.
pub fn content_hash(title: &str, content: &str) -> String {
    let prefix_end = content
        .char_indices()
        .map(|(i, _)| i)
        .nth(1000)
        .unwrap_or(content.len());

    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hasher.update(b":");
    hasher.update(content[..prefix_end].as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_title_and_content_hash_equal() {
        assert_eq!(
            content_hash("Headline", "Body text"),
            content_hash("Headline", "Body text")
        );
    }

    #[test]
    fn different_title_hashes_differ() {
        assert_ne!(
            content_hash("Headline A", "Body text"),
            content_hash("Headline B", "Body text")
        );
    }

    #[test]
    fn hashing_long_content_does_not_panic_on_utf8_boundary() {
        let content: String = std::iter::repeat('א').take(2000).collect();
        let _ = content_hash("Title", &content);
    }
}
