use std::collections::{HashSet, VecDeque};
use std::num::NonZeroUsize;

use tilestream_common::TileCoord;

/// Result of [`EvictionCache::insert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    /// Now the newest member. `evicted` lists the members pushed out to get
    /// back under capacity, oldest first; the caller must tear them down.
    Added { evicted: Vec<TileCoord> },
    /// Already a member; order and size are unchanged.
    AlreadyResident,
}

/// Bounded FIFO of hidden-but-materialized tiles, by coordinate.
///
/// Eviction follows insertion order only. A member that is removed and
/// inserted again goes to the back. Capacity is enforced on insertion, never
/// when it is changed.
#[derive(Debug, Clone)]
pub struct EvictionCache {
    capacity: NonZeroUsize,
    order: VecDeque<TileCoord>,
    members: HashSet<TileCoord>,
}

impl EvictionCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity.get()),
            members: HashSet::with_capacity(capacity.get()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Change the maximum resident count. Members over the new limit stay
    /// until the next insertion.
    pub fn set_capacity(&mut self, capacity: NonZeroUsize) {
        tracing::debug!(old = self.capacity.get(), new = capacity.get(), "cache capacity changed");
        self.capacity = capacity;
    }

    /// Add `coord` as the newest member, evicting the oldest ones while the
    /// cache is over capacity.
    pub fn insert(&mut self, coord: TileCoord) -> Insertion {
        if !self.members.insert(coord) {
            tracing::warn!(%coord, "tile already cached, insert ignored");
            return Insertion::AlreadyResident;
        }
        self.order.push_back(coord);

        let mut evicted = Vec::new();
        while self.order.len() > self.capacity.get() {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.members.remove(&oldest);
            evicted.push(oldest);
        }
        Insertion::Added { evicted }
    }

    /// Remove `coord` if present. Returns whether it was a member.
    pub fn remove(&mut self, coord: TileCoord) -> bool {
        if !self.members.remove(&coord) {
            return false;
        }
        if let Some(pos) = self.order.iter().position(|c| *c == coord) {
            self.order.remove(pos);
        }
        true
    }

    pub fn contains(&self, coord: TileCoord) -> bool {
        self.members.contains(&coord)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Members, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.order.iter().copied()
    }

    /// Empty the cache, yielding members oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = TileCoord> + '_ {
        self.members.clear();
        self.order.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cap(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn t(i: i32) -> TileCoord {
        TileCoord::new(i, 0)
    }

    #[test]
    fn size_never_exceeds_capacity() {
        for capacity in 1..6 {
            let mut cache = EvictionCache::new(cap(capacity));
            for i in 0..20 {
                cache.insert(t(i));
                assert!(cache.len() <= capacity);
            }
            assert_eq!(cache.len(), capacity);
        }
    }

    #[test]
    fn overflow_evicts_exactly_the_oldest() {
        let mut cache = EvictionCache::new(cap(3));
        for i in 1..=3 {
            assert_eq!(cache.insert(t(i)), Insertion::Added { evicted: vec![] });
        }
        assert_eq!(cache.insert(t(4)), Insertion::Added { evicted: vec![t(1)] });
        assert!(!cache.contains(t(1)));
        for i in 2..=4 {
            assert!(cache.contains(t(i)));
        }
    }

    #[test]
    fn double_insert_is_noop() {
        let mut cache = EvictionCache::new(cap(2));
        cache.insert(t(1));
        assert_eq!(cache.insert(t(1)), Insertion::AlreadyResident);
        assert_eq!(cache.len(), 1);
        cache.insert(t(2));
        // A duplicate entry would have pushed t(1) out here.
        assert_eq!(cache.insert(t(3)), Insertion::Added { evicted: vec![t(1)] });
        assert_eq!(cache.iter().collect::<Vec<_>>(), vec![t(2), t(3)]);
    }

    #[test]
    fn remove_keeps_relative_order() {
        let mut cache = EvictionCache::new(cap(4));
        for i in 1..=4 {
            cache.insert(t(i));
        }
        assert!(cache.remove(t(2)));
        assert_eq!(cache.iter().collect::<Vec<_>>(), vec![t(1), t(3), t(4)]);
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut cache = EvictionCache::new(cap(2));
        cache.insert(t(1));
        assert!(!cache.remove(t(9)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn reinserted_member_goes_to_the_back() {
        let mut cache = EvictionCache::new(cap(2));
        cache.insert(t(1));
        cache.insert(t(2));
        cache.remove(t(1));
        cache.insert(t(1));
        assert_eq!(cache.insert(t(3)), Insertion::Added { evicted: vec![t(2)] });
    }

    #[test]
    fn shrinking_is_lazy_until_next_insert() {
        let mut cache = EvictionCache::new(cap(4));
        for i in 1..=4 {
            cache.insert(t(i));
        }
        cache.set_capacity(cap(2));
        assert_eq!(cache.len(), 4);
        assert_eq!(cache.capacity(), 2);

        assert_eq!(
            cache.insert(t(5)),
            Insertion::Added {
                evicted: vec![t(1), t(2), t(3)]
            }
        );
        assert_eq!(cache.iter().collect::<Vec<_>>(), vec![t(4), t(5)]);
    }

    #[test]
    fn growing_keeps_members() {
        let mut cache = EvictionCache::new(cap(1));
        cache.insert(t(1));
        cache.set_capacity(cap(3));
        assert_eq!(cache.insert(t(2)), Insertion::Added { evicted: vec![] });
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn drain_empties_oldest_first() {
        let mut cache = EvictionCache::new(cap(3));
        cache.insert(t(1));
        cache.insert(t(2));
        assert_eq!(cache.drain().collect::<Vec<_>>(), vec![t(1), t(2)]);
        assert!(cache.is_empty());
        assert!(!cache.contains(t(1)));
    }
}
