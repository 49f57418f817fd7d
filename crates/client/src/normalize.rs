//! URL canonicalization for consistent archive queries and cache keys.

use regex::Regex;
use url::Url;
use wayback_core::Error;

/// Canonicalize a URL or bare host for archive queries.
///
/// Strips a leading `http:`/`https:` scheme, a protocol-relative `//`, and a
/// leading `www.`, then reparses under `https://`. Idempotent on its own
/// output.
pub fn canonicalize(input: &str) -> Result<Url, Error> {
    let trimmed = input.trim();
    let prefix = Regex::new(r"^(https?:)?(//)?(www\.)?").unwrap();
    let stripped = prefix.replace(trimmed, "");

    Url::parse(&format!("https://{stripped}")).map_err(|e| Error::InvalidUrl(format!("{input}: {e}")))
}

/// Last `levels` dot-separated labels of a hostname.
///
/// `domain_suffix("deep.a.example.com", 2)` is `"example.com"`; hosts with
/// fewer labels come back whole. Level 2 derives the apex domain, level 5
/// keeps up to 4 labels of subdomain structure.
pub fn domain_suffix(host: &str, levels: usize) -> String {
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() <= levels {
        host.to_string()
    } else {
        labels[labels.len() - levels..].join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_bare_host() {
        let url = canonicalize("example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn test_canonicalize_strips_scheme() {
        assert_eq!(canonicalize("http://example.com").unwrap().as_str(), "https://example.com/");
        assert_eq!(canonicalize("https://example.com").unwrap().as_str(), "https://example.com/");
    }

    #[test]
    fn test_canonicalize_strips_protocol_relative() {
        let url = canonicalize("//example.com/page").unwrap();
        assert_eq!(url.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_canonicalize_strips_www() {
        assert_eq!(canonicalize("www.example.com").unwrap().as_str(), "https://example.com/");
        assert_eq!(
            canonicalize("https://www.example.com/a?b=1").unwrap().as_str(),
            "https://example.com/a?b=1"
        );
    }

    #[test]
    fn test_canonicalize_no_www_after_scheme() {
        for input in ["example.com", "www.example.com", "https://www.example.com"] {
            let url = canonicalize(input).unwrap();
            assert!(url.as_str().starts_with("https://"));
            assert!(!url.as_str().starts_with("https://www."));
        }
    }

    #[test]
    fn test_canonicalize_idempotent() {
        let once = canonicalize("http://www.example.com/path").unwrap();
        let twice = canonicalize(once.as_str()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_canonicalize_keeps_inner_www() {
        // only a leading www. is stripped
        let url = canonicalize("www.www2.example.com").unwrap();
        assert_eq!(url.host_str(), Some("www2.example.com"));
    }

    #[test]
    fn test_canonicalize_empty_fails() {
        assert!(matches!(canonicalize(""), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_domain_suffix_apex() {
        assert_eq!(domain_suffix("deep.sub.example.com", 2), "example.com");
        assert_eq!(domain_suffix("example.com", 2), "example.com");
        assert_eq!(domain_suffix("localhost", 2), "localhost");
    }

    #[test]
    fn test_domain_suffix_keeps_short_hosts_whole() {
        assert_eq!(domain_suffix("a.b.example.com", 5), "a.b.example.com");
        assert_eq!(domain_suffix("x.a.b.c.example.com", 5), "a.b.c.example.com");
    }
}
