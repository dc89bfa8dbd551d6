//! Storage contracts of the engine and their default hash map implementations.
//!
//! The engine only talks to the traits below, so an embedder can swap any of the
//! tables (for example for a concurrent map, or a narrower hash) by providing
//! another [`Backend`].

use ahash::AHashMap;

#[cfg(not(all(target_feature = "aes", target_feature = "sse2")))]
use ahash::RandomState;
#[cfg(not(all(target_feature = "aes", target_feature = "sse2")))]
use std::sync::LazyLock;

/// Lexicon: term to frequency count.
pub trait FrequencyStore {
    fn get(&self, term: &str) -> Option<u64>;
    fn put(&mut self, term: &str, count: u64);
    fn remove(&mut self, term: &str) -> Option<u64>;
    fn contains(&self, term: &str) -> bool {
        self.get(term).is_some()
    }
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// All entries, in no particular order.
    fn entries(&self) -> Box<dyn Iterator<Item = (&str, u64)> + '_>;
}

/// Bigram table keyed by the ordered word pair.
pub trait BigramStore {
    fn get(&self, first: &str, second: &str) -> Option<u64>;
    fn put(&mut self, first: &str, second: &str, count: u64);
    fn contains(&self, first: &str, second: &str) -> bool {
        self.get(first, second).is_some()
    }
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &str, u64)> + '_>;
}

/// Delete index: hashed delete variant to the lexicon terms it was derived from.
///
/// Hash collisions are tolerated, unrelated terms sharing a key are rejected later
/// by the edit distance check.
pub trait DeleteStore {
    fn get(&self, key: u64) -> Option<&[Box<str>]>;
    fn put(&mut self, key: u64, terms: Vec<Box<str>>);
    /// Removes and returns the terms stored under `key`.
    fn take(&mut self, key: u64) -> Option<Vec<Box<str>>>;
    fn push(&mut self, key: u64, term: Box<str>) {
        let mut terms = self.take(key).unwrap_or_default();
        terms.push(term);
        self.put(key, terms);
    }
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Maps a delete variant to its index key. Must be deterministic.
pub trait StringHasher {
    fn hash(&self, term: &str) -> u64;
}

#[cfg(not(all(target_feature = "aes", target_feature = "sse2")))]
static HASHER_64: LazyLock<RandomState> =
    LazyLock::new(|| RandomState::with_seeds(805272099, 242851902, 646123436, 591410655));

/// gxhash where the CPU has AES + SSE2, fixed-seed ahash otherwise.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultStringHasher;

impl StringHasher for DefaultStringHasher {
    // stable hash, faster, but not available on all platforms
    // https://github.com/ogxd/gxhash
    #[inline]
    #[cfg(all(target_feature = "aes", target_feature = "sse2"))]
    fn hash(&self, term: &str) -> u64 {
        gxhash::gxhash64(term.as_bytes(), 1234)
    }

    // slower, but available on all platforms
    // https://github.com/tkaitchuck/aHash
    #[inline]
    #[cfg(not(all(target_feature = "aes", target_feature = "sse2")))]
    fn hash(&self, term: &str) -> u64 {
        HASHER_64.hash_one(term.as_bytes())
    }
}

#[derive(Debug, Default, Clone)]
pub struct HashFrequencyStore(AHashMap<Box<str>, u64>);

impl FrequencyStore for HashFrequencyStore {
    fn get(&self, term: &str) -> Option<u64> {
        self.0.get(term).copied()
    }

    fn put(&mut self, term: &str, count: u64) {
        match self.0.get_mut(term) {
            Some(entry) => *entry = count,
            None => {
                self.0.insert(term.into(), count);
            }
        }
    }

    fn remove(&mut self, term: &str) -> Option<u64> {
        self.0.remove(term)
    }

    fn contains(&self, term: &str) -> bool {
        self.0.contains_key(term)
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&str, u64)> + '_> {
        Box::new(self.0.iter().map(|(term, count)| (term.as_ref(), *count)))
    }
}

#[derive(Debug, Default, Clone)]
pub struct HashBigramStore {
    pairs: AHashMap<Box<str>, AHashMap<Box<str>, u64>>,
    len: usize,
}

impl BigramStore for HashBigramStore {
    fn get(&self, first: &str, second: &str) -> Option<u64> {
        self.pairs.get(first)?.get(second).copied()
    }

    fn put(&mut self, first: &str, second: &str, count: u64) {
        let followers = self.pairs.entry(first.into()).or_default();
        if followers.insert(second.into(), count).is_none() {
            self.len += 1;
        }
    }

    fn len(&self) -> usize {
        self.len
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &str, u64)> + '_> {
        Box::new(self.pairs.iter().flat_map(|(first, followers)| {
            followers
                .iter()
                .map(move |(second, count)| (first.as_ref(), second.as_ref(), *count))
        }))
    }
}

#[derive(Debug, Default, Clone)]
pub struct HashDeleteStore(AHashMap<u64, Vec<Box<str>>>);

impl DeleteStore for HashDeleteStore {
    fn get(&self, key: u64) -> Option<&[Box<str>]> {
        self.0.get(&key).map(Vec::as_slice)
    }

    fn put(&mut self, key: u64, terms: Vec<Box<str>>) {
        self.0.insert(key, terms);
    }

    fn take(&mut self, key: u64) -> Option<Vec<Box<str>>> {
        self.0.remove(&key)
    }

    fn push(&mut self, key: u64, term: Box<str>) {
        self.0.entry(key).or_default().push(term);
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

/// One choice of store for each table plus the delete-key hash.
pub trait Backend {
    type Words: FrequencyStore;
    type Bigrams: BigramStore;
    type Deletes: DeleteStore;
    type Hasher: StringHasher;
}

/// `AHashMap` tables with [`DefaultStringHasher`].
#[derive(Debug, Default, Clone, Copy)]
pub struct HashBackend;

impl Backend for HashBackend {
    type Words = HashFrequencyStore;
    type Bigrams = HashBigramStore;
    type Deletes = HashDeleteStore;
    type Hasher = DefaultStringHasher;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hasher_is_deterministic() {
        let hasher = DefaultStringHasher;
        assert_eq!(hasher.hash("abcd"), hasher.hash("abcd"));
        assert_ne!(hasher.hash("abcd"), hasher.hash("abce"));
    }

    #[test]
    fn frequency_store_overwrites() {
        let mut words = HashFrequencyStore::default();
        words.put("house", 10);
        words.put("house", 12);
        assert_eq!(Some(12), words.get("house"));
        assert_eq!(1, words.len());
        assert_eq!(Some(12), words.remove("house"));
        assert!(words.is_empty());
    }

    #[test]
    fn bigram_store_is_ordered_pair() {
        let mut bigrams = HashBigramStore::default();
        bigrams.put("not", "mine", 7);
        bigrams.put("not", "mine", 9);
        bigrams.put("mine", "not", 1);
        assert_eq!(Some(9), bigrams.get("not", "mine"));
        assert_eq!(Some(1), bigrams.get("mine", "not"));
        assert!(!bigrams.contains("not", "yours"));
        assert_eq!(2, bigrams.len());
        assert_eq!(2, bigrams.entries().count());
    }

    #[test]
    fn delete_store_push_appends() {
        let mut deletes = HashDeleteStore::default();
        deletes.push(1, "abcde".into());
        deletes.push(1, "abcdef".into());
        let expected: [Box<str>; 2] = ["abcde".into(), "abcdef".into()];
        assert_eq!(Some(&expected[..]), deletes.get(1));
        assert_eq!(2, deletes.take(1).map_or(0, |terms| terms.len()));
        assert!(deletes.get(1).is_none());
    }
}
