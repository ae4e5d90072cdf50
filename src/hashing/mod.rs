//! Hash utilities for cache document ids.
//!
//! Uses BLAKE3. The cache document id is derived from the [`DedupKey`] so that repeated writes
//! for the same key land on the same document.

use blake3::Hasher;

use crate::query::DedupKey;

/// Hashes a dedup key to a 32-byte BLAKE3 digest.
///
/// The query type is hashed first with a separator so `("ab", "c")`-style splits cannot collide.
#[inline]
pub fn hash_dedup_key(key: &DedupKey) -> [u8; 32] {
    let mut hasher = Hasher::new();
    hasher.update(key.query_type().as_str().as_bytes());
    hasher.update(b"|");
    hasher.update(key.query().as_str().as_bytes());
    *hasher.finalize().as_bytes()
}

/// Lowercase hex document id for a dedup key.
#[inline]
pub fn cache_document_id(key: &DedupKey) -> String {
    blake3::Hash::from_bytes(hash_dedup_key(key))
        .to_hex()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryType;
    use std::collections::HashSet;

    #[test]
    fn test_hash_dedup_key_determinism() {
        let key = DedupKey::from_raw("red shoes", QueryType::Search);

        let hash1 = hash_dedup_key(&key);
        let hash2 = hash_dedup_key(&key);

        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_hash_dedup_key_follows_normalization() {
        let a = DedupKey::from_raw("  Red Shoes", QueryType::Search);
        let b = DedupKey::from_raw("red shoes", QueryType::Search);

        assert_eq!(hash_dedup_key(&a), hash_dedup_key(&b));
    }

    #[test]
    fn test_hash_dedup_key_uniqueness() {
        let keys = [
            DedupKey::from_raw("red shoes", QueryType::Search),
            DedupKey::from_raw("red shoes", QueryType::Recommendations),
            DedupKey::from_raw("blue shoes", QueryType::Search),
            DedupKey::from_raw("red  shoes", QueryType::Search),
        ];

        let hashes: HashSet<_> = keys.iter().map(hash_dedup_key).collect();
        assert_eq!(hashes.len(), keys.len());
    }

    #[test]
    fn test_cache_document_id_is_hex() {
        let id = cache_document_id(&DedupKey::from_raw("watch", QueryType::Search));

        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
