//! Bulk-build buffer for the delete index.
//!
//! Adding terms one by one to the permanent index reallocates a key's term list on every
//! append. During a corpus load the `(delete key, term)` pairs are first collected here as
//! linked lists in chunked storage, then committed with one exactly sized append per key.

use std::mem;

use ahash::AHashMap;

use crate::store::DeleteStore;

const CHUNK_SIZE: usize = 4096; // 2^SHIFT
const SHIFT: usize = 12;
const MASK: usize = CHUNK_SIZE - 1;

/// Append-only array growing in fixed-size chunks, so growth never moves existing elements.
#[derive(Debug)]
pub(crate) struct ChunkArray<T> {
    chunks: Vec<Vec<T>>,
    len: usize,
}

impl<T> ChunkArray<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let chunk_count = capacity.div_ceil(CHUNK_SIZE).max(1);
        let mut chunks = Vec::with_capacity(chunk_count);
        chunks.push(Vec::with_capacity(CHUNK_SIZE));
        Self { chunks, len: 0 }
    }

    /// Appends `value` and returns its index.
    pub(crate) fn push(&mut self, value: T) -> usize {
        let index = self.len;
        if index >> SHIFT == self.chunks.len() {
            self.chunks.push(Vec::with_capacity(CHUNK_SIZE));
        }
        self.chunks[index >> SHIFT].push(value);
        self.len += 1;
        index
    }

    #[cfg(test)]
    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        self.chunks.get(index >> SHIFT)?.get(index & MASK)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.chunks.get_mut(index >> SHIFT)?.get_mut(index & MASK)
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }
}

#[derive(Debug)]
struct Node {
    term: Box<str>,
    next: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    count: usize,
    first: Option<usize>,
}

/// Staged delete key to term associations, drained into a [`DeleteStore`] by [`commit_to`](Self::commit_to).
#[derive(Debug)]
pub(crate) struct SuggestionStage {
    deletes: AHashMap<u64, Entry>,
    nodes: ChunkArray<Node>,
}

impl SuggestionStage {
    /// `capacity` is the expected number of delete keys; nodes get twice as much.
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            deletes: AHashMap::with_capacity(capacity),
            nodes: ChunkArray::with_capacity(capacity * 2),
        }
    }

    pub(crate) fn delete_count(&self) -> usize {
        self.deletes.len()
    }

    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn add(&mut self, key: u64, term: &str) {
        let entry = self.deletes.entry(key).or_insert(Entry {
            count: 0,
            first: None,
        });
        let next = entry.first;
        entry.count += 1;
        entry.first = Some(self.nodes.push(Node {
            term: term.into(),
            next,
        }));
    }

    /// Appends every staged list to the matching key of `permanent`, keeping existing terms.
    pub(crate) fn commit_to<D: DeleteStore>(mut self, permanent: &mut D) {
        for (key, entry) in self.deletes.drain() {
            let mut terms = permanent.take(key).unwrap_or_default();
            terms.reserve_exact(entry.count);

            let mut next = entry.first;
            while let Some(index) = next {
                let Some(node) = self.nodes.get_mut(index) else {
                    break;
                };
                terms.push(mem::take(&mut node.term));
                next = node.next;
            }

            permanent.put(key, terms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::HashDeleteStore;

    #[test]
    fn chunk_array_grows_past_one_chunk() {
        let mut array = ChunkArray::with_capacity(16);
        for i in 0..CHUNK_SIZE * 2 + 3 {
            assert_eq!(i, array.push(i));
        }
        assert_eq!(CHUNK_SIZE * 2 + 3, array.len());
        assert_eq!(Some(&(CHUNK_SIZE + 1)), array.get(CHUNK_SIZE + 1));
        assert_eq!(None, array.get(CHUNK_SIZE * 2 + 3));
        if let Some(value) = array.get_mut(5) {
            *value = 50;
        }
        assert_eq!(Some(&50), array.get(5));
    }

    #[test]
    fn commit_appends_to_existing_entries() {
        let mut permanent = HashDeleteStore::default();
        permanent.push(7, "existing".into());

        let mut stage = SuggestionStage::new(4);
        stage.add(7, "first");
        stage.add(7, "second");
        stage.add(9, "other");
        assert_eq!(2, stage.delete_count());
        assert_eq!(3, stage.node_count());

        stage.commit_to(&mut permanent);

        let terms = permanent.get(7).unwrap_or_default();
        assert_eq!(3, terms.len());
        assert_eq!("existing", &*terms[0]);
        assert!(terms.iter().any(|t| &**t == "first"));
        assert!(terms.iter().any(|t| &**t == "second"));
        assert_eq!(1, permanent.get(9).map_or(0, <[Box<str>]>::len));
    }

    #[test]
    fn commit_preserves_total_count() {
        let mut stage = SuggestionStage::new(16);
        for i in 0..10_000u64 {
            stage.add(i % 37, &format!("term{i}"));
        }
        let mut permanent = HashDeleteStore::default();
        stage.commit_to(&mut permanent);

        let total: usize = (0..37).map(|k| permanent.get(k).map_or(0, <[Box<str>]>::len)).sum();
        assert_eq!(10_000, total);
        assert_eq!(37, permanent.len());
    }
}
