//! Content-addressed cache keys for raw capture bodies.

use sha2::{Digest, Sha256};

/// Compute the cache key for a resolved exact-capture URL.
pub fn body_cache_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_stability() {
        let key1 = body_cache_key("https://web.archive.org/web/20230101000000id_/https://example.com/");
        let key2 = body_cache_key("https://web.archive.org/web/20230101000000id_/https://example.com/");
        assert_eq!(key1, key2);
    }

    #[test]
    fn test_key_different_urls() {
        let key1 = body_cache_key("https://web.archive.org/web/20230101000000id_/https://example.com/");
        let key2 = body_cache_key("https://web.archive.org/web/20240101000000id_/https://example.com/");
        assert_ne!(key1, key2);
    }

    #[test]
    fn test_key_format() {
        let key = body_cache_key("https://example.com");
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
