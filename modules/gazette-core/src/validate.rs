//! Boundary validation for Source fields (§4.2). Never trust the store —
//! re-validate shapes on every write path, not just on create.

use std::sync::OnceLock;

use regex::Regex;

fn domain_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?i)[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?(\.[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?)+$")
            .unwrap()
    })
}

pub fn is_valid_domain(domain: &str) -> bool {
    !domain.is_empty() && domain.len() <= 253 && domain_re().is_match(domain)
}

pub fn is_valid_rss_url(rss_url: &str) -> bool {
    match url::Url::parse(rss_url) {
        Ok(u) => matches!(u.scheme(), "http" | "https") && u.host_str().is_some(),
        Err(_) => false,
    }
}

pub fn is_valid_name(name: &str) -> bool {
    let len = name.chars().count();
    (1..=200).contains(&len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_domains() {
        assert!(is_valid_domain("bbc.co.uk"));
        assert!(is_valid_domain("npr.org"));
    }

    #[test]
    fn rejects_domains_with_scheme_or_path() {
        assert!(!is_valid_domain("https://bbc.co.uk"));
        assert!(!is_valid_domain("bbc.co.uk/news"));
        assert!(!is_valid_domain(""));
    }

    #[test]
    fn rss_url_requires_http_scheme_and_host() {
        assert!(is_valid_rss_url("https://feeds.bbci.co.uk/news/rss.xml"));
        assert!(!is_valid_rss_url("ftp://example.com/feed.xml"));
        assert!(!is_valid_rss_url("not a url"));
    }

    #[test]
    fn name_length_bounds() {
        assert!(!is_valid_name(""));
        assert!(is_valid_name("BBC News"));
        assert!(!is_valid_name(&"x".repeat(201)));
    }
}
