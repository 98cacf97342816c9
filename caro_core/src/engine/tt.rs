use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TTFlag {
    Exact,
    LowerBound, // Beta cutoff (fail-high)
    UpperBound, // Alpha cutoff (fail-low)
}

impl TTFlag {
    /// Bound type of `score` relative to the window the node was searched with.
    pub const fn classify(score: i32, alpha: i32, beta: i32) -> Self {
        if score <= alpha {
            Self::UpperBound
        } else if score >= beta {
            Self::LowerBound
        } else {
            Self::Exact
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TTEntry {
    pub key: u32,
    pub score: i32,
    pub depth: u8,
    pub flag: TTFlag,
}

/// Direct-mapped table, one slot per index. Keys are the full 32-bit
/// position hash, so two positions with the same hash share an entry.
pub struct TranspositionTable {
    entries: Vec<Option<TTEntry>>,
    mask: usize,
}

impl TranspositionTable {
    pub fn new(size_mb: usize) -> Self {
        let entry_size = std::mem::size_of::<Option<TTEntry>>();
        let num_entries = size_mb.saturating_mul(1024 * 1024) / entry_size;

        // Power of 2 size for efficient masking
        let mut size = 1;
        while size <= num_entries {
            size *= 2;
        }
        size /= 2; // Keep it within memory limit

        if size < 1024 {
            size = 1024; // Minimum size
        }

        Self {
            entries: vec![None; size],
            mask: size - 1,
        }
    }

    const fn index(&self, key: u32) -> usize {
        (key as usize) & self.mask
    }

    pub fn probe(&self, key: u32) -> Option<TTEntry> {
        self.entries
            .get(self.index(key))
            .copied()
            .flatten()
            .filter(|entry| entry.key == key)
    }

    pub fn store(&mut self, key: u32, score: i32, depth: u8, flag: TTFlag) {
        let idx = self.index(key);
        if let Some(slot) = self.entries.get_mut(idx) {
            // Replace on collision, or when the new result is at least as deep.
            let replace = slot.map_or(true, |entry| entry.key != key || depth >= entry.depth);
            if replace {
                *slot = Some(TTEntry {
                    key,
                    score,
                    depth,
                    flag,
                });
            }
        }
    }

    pub fn clear(&mut self) {
        for entry in &mut self.entries {
            *entry = None;
        }
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }
}

/// Leaf evaluations keyed by position hash. No depth or bound: a static
/// score does not depend on how the position was reached.
pub struct EvalCache {
    scores: HashMap<u32, i32>,
    limit: usize,
}

impl EvalCache {
    pub fn new(limit: usize) -> Self {
        Self {
            scores: HashMap::new(),
            limit,
        }
    }

    pub fn get(&self, key: u32) -> Option<i32> {
        self.scores.get(&key).copied()
    }

    pub fn insert(&mut self, key: u32, score: i32) {
        if self.scores.len() >= self.limit {
            self.scores.clear();
        }
        self.scores.insert(key, score);
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_probe() {
        let mut tt = TranspositionTable::new(1);
        assert_eq!(tt.probe(12345), None);

        tt.store(12345, 77, 4, TTFlag::Exact);
        let entry = tt.probe(12345).unwrap();
        assert_eq!(entry.score, 77);
        assert_eq!(entry.depth, 4);
        assert_eq!(entry.flag, TTFlag::Exact);
    }

    #[test]
    fn test_shallower_result_does_not_replace_same_key() {
        let mut tt = TranspositionTable::new(1);
        tt.store(9, 10, 6, TTFlag::LowerBound);
        tt.store(9, -5, 2, TTFlag::UpperBound);
        assert_eq!(tt.probe(9).unwrap().score, 10);

        tt.store(9, 30, 6, TTFlag::Exact);
        assert_eq!(tt.probe(9).unwrap().flag, TTFlag::Exact);
    }

    #[test]
    fn test_index_collision_replaces_and_misses_old_key() {
        let mut tt = TranspositionTable::new(1);
        let stride = u32::try_from(tt.capacity()).unwrap();
        tt.store(5, 1, 8, TTFlag::Exact);
        tt.store(5 + stride, 2, 1, TTFlag::Exact);
        assert_eq!(tt.probe(5), None);
        assert_eq!(tt.probe(5 + stride).unwrap().score, 2);
    }

    #[test]
    fn test_zero_hash_is_a_valid_key() {
        let mut tt = TranspositionTable::new(1);
        assert_eq!(tt.probe(0), None);
        tt.store(0, 3, 1, TTFlag::Exact);
        assert_eq!(tt.probe(0).unwrap().score, 3);
        tt.clear();
        assert_eq!(tt.probe(0), None);
    }

    #[test]
    fn test_classify_bounds() {
        assert_eq!(TTFlag::classify(-10, -10, 10), TTFlag::UpperBound);
        assert_eq!(TTFlag::classify(10, -10, 10), TTFlag::LowerBound);
        assert_eq!(TTFlag::classify(0, -10, 10), TTFlag::Exact);
    }

    #[test]
    fn test_eval_cache_resets_when_full() {
        let mut cache = EvalCache::new(2);
        cache.insert(1, 10);
        cache.insert(2, 20);
        assert_eq!(cache.get(2), Some(20));
        cache.insert(3, 30);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(1), None);
        assert_eq!(cache.get(3), Some(30));
    }
}
