use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::config::TableConfig;
use crate::hash_table::Entry;
use crate::hash_table::HashTable;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// Hasher builder used when none is named: foldhash's seeded
        /// `RandomState`.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// Hasher builder used when none is named: the standard library's
        /// SipHash `RandomState`.
        pub type DefaultHashBuilder = std::hash::RandomState;
    } else {
        /// Hasher builder used when none is named: the crate's own
        /// [`BuildMicroHasher`](crate::hasher::BuildMicroHasher). Unkeyed.
        pub type DefaultHashBuilder = crate::hasher::BuildMicroHasher;
    }
}

/// A hash set implemented using the linear-probing [`HashTable`] as the
/// underlying storage.
///
/// `HashSet<T, S>` stores values of type `T` where `T` implements `Hash + Eq`
/// and uses a configurable hasher builder `S` to hash values. Equal values
/// are stored once. Removal leaves a tombstone in the table; tombstones are
/// reused by later insertions and dropped when the set grows.
///
/// # Examples
///
/// ```rust
/// use micro_hash::HashSet;
/// use micro_hash::hasher::BuildMicroHasher;
///
/// let mut seen: HashSet<u32, BuildMicroHasher> = HashSet::default();
/// assert!(seen.insert(69));
/// assert!(!seen.insert(69));
/// assert!(seen.contains(&69));
/// assert!(seen.remove(&69));
/// assert!(seen.is_empty());
/// ```
#[derive(Clone)]
pub struct HashSet<T, S = DefaultHashBuilder> {
    table: HashTable<T>,
    hash_builder: S,
}

impl<T, S> PartialEq for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|v| other.contains(v))
    }
}

impl<T, S> Eq for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
}

impl<T, S> Debug for HashSet<T, S>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.table.iter()).finish()
    }
}

impl<T, S> HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a new hash set with the given hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use micro_hash::hash_set::HashSet;
    /// use micro_hash::hasher::BuildMicroHasher;
    ///
    /// let set: HashSet<i32, _> = HashSet::with_hasher(BuildMicroHasher::default());
    /// assert!(set.is_empty());
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_config_and_hasher(TableConfig::default(), hash_builder)
    }

    /// Creates a new hash set sized and grown according to `config`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use micro_hash::HashSet;
    /// use micro_hash::TableConfig;
    /// use micro_hash::hasher::BuildMicroHasher;
    ///
    /// let config = TableConfig::new(1024, 0.5).unwrap();
    /// let set: HashSet<u64, _> = HashSet::with_config_and_hasher(config, BuildMicroHasher::default());
    /// assert_eq!(set.capacity(), 1024);
    /// ```
    pub fn with_config_and_hasher(config: TableConfig, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_config(config),
            hash_builder,
        }
    }

    /// Creates a new hash set that holds at least `capacity` elements
    /// without resizing.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
            hash_builder,
        }
    }

    /// Returns the number of elements in the set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use micro_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = HashSet::new();
    /// assert_eq!(set.len(), 0);
    /// set.insert(1);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the underlying table.
    ///
    /// This is not the number of elements the set holds before it grows:
    /// the table doubles once an insertion would exceed the configured load
    /// factor.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use micro_hash::HashSet;
    ///
    /// let mut set: HashSet<u32> = HashSet::new();
    /// assert_eq!(set.capacity(), 16);
    ///
    /// set.extend(0..12);
    /// assert_eq!(set.capacity(), 32);
    /// ```
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns a reference to the set's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Removes all elements from the set.
    ///
    /// This operation preserves the set's allocated capacity.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Reserves capacity for at least `additional` more elements.
    pub fn reserve(&mut self, additional: usize) {
        self.table
            .reserve(additional, |k| self.hash_builder.hash_one(k));
    }

    /// Adds a value to the set.
    ///
    /// Returns whether the value was newly inserted. That is:
    ///
    /// - If the set did not previously contain this value, `true` is returned.
    /// - If the set already contained this value, `false` is returned and the
    ///   set is unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use micro_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = HashSet::new();
    /// assert_eq!(set.insert(37), true);
    /// assert_eq!(set.insert(37), false);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        let hash = self.hash_builder.hash_one(&value);
        match self
            .table
            .entry(hash, |v| v == &value, |v| self.hash_builder.hash_one(v))
        {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(value);
                true
            }
        }
    }

    /// Returns `true` if the set contains a value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use micro_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = HashSet::new();
    /// set.insert(1);
    /// assert!(set.contains(&1));
    /// assert!(!set.contains(&2));
    /// ```
    pub fn contains(&self, value: &T) -> bool {
        let hash = self.hash_builder.hash_one(value);
        self.table.find(hash, |v| v == value).is_some()
    }

    /// Removes a value from the set. Returns whether the value was
    /// present in the set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use micro_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = HashSet::new();
    /// set.insert(1);
    /// assert_eq!(set.remove(&1), true);
    /// assert_eq!(set.remove(&1), false);
    /// ```
    pub fn remove(&mut self, value: &T) -> bool {
        let hash = self.hash_builder.hash_one(value);
        self.table.remove(hash, |v| v == value).is_some()
    }

    /// Adds a value to the set, replacing the existing value, if any, that is
    /// equal to the given one. Returns the replaced value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use micro_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = HashSet::new();
    /// set.insert(1);
    /// assert_eq!(set.replace(1), Some(1));
    /// assert_eq!(set.replace(2), None);
    /// assert_eq!(set.len(), 2);
    /// ```
    pub fn replace(&mut self, value: T) -> Option<T> {
        let hash = self.hash_builder.hash_one(&value);
        match self
            .table
            .entry(hash, |v| v == &value, |v| self.hash_builder.hash_one(v))
        {
            Entry::Occupied(mut entry) => Some(core::mem::replace(entry.get_mut(), value)),
            Entry::Vacant(entry) => {
                entry.insert(value);
                None
            }
        }
    }

    /// Removes and returns the value in the set, if any, that is equal to the
    /// given one.
    pub fn take(&mut self, value: &T) -> Option<T> {
        let hash = self.hash_builder.hash_one(value);
        self.table.remove(hash, |v| v == value)
    }

    /// Returns a reference to the value in the set, if any, that is equal to
    /// the given value.
    pub fn get(&self, value: &T) -> Option<&T> {
        let hash = self.hash_builder.hash_one(value);
        self.table.find(hash, |v| v == value)
    }

    /// Returns an iterator over the values of the set, in slot order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator that removes and yields all values from the
    /// set.
    ///
    /// After calling `drain()`, the set will be empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use micro_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = HashSet::new();
    /// set.insert(1);
    /// set.insert(2);
    ///
    /// let values: Vec<_> = set.drain().collect();
    /// assert!(set.is_empty());
    /// assert_eq!(values.len(), 2);
    /// ```
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Retains only the elements specified by the predicate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use micro_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = (1..=4).collect();
    /// set.retain(|&x| x % 2 == 0);
    /// assert_eq!(set.len(), 2);
    /// assert!(set.contains(&2));
    /// assert!(set.contains(&4));
    /// ```
    pub fn retain(&mut self, f: impl FnMut(&T) -> bool) {
        self.table.retain(f);
    }

    /// Returns slot usage statistics of the underlying table.
    ///
    /// Only available with the `stats` feature or in tests.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> crate::hash_table::DebugStats {
        self.table.debug_stats()
    }

    /// Returns the probe distance histogram of the underlying table.
    ///
    /// Only available with the `stats` feature or in tests.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> crate::hash_table::ProbeHistogram {
        self.table
            .probe_histogram(|k| self.hash_builder.hash_one(k))
    }
}

impl<T, S> HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates a new hash set using the default hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use micro_hash::HashSet;
    ///
    /// let set: HashSet<i32> = HashSet::new();
    /// assert!(set.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates a new hash set with the specified capacity using the default
    /// hasher builder.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }
}

impl<T, S> Default for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

/// An iterator over the values of a `HashSet`.
pub struct Iter<'a, T> {
    inner: crate::hash_table::Iter<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// A draining iterator over the values of a `HashSet`.
pub struct Drain<'a, T> {
    inner: crate::hash_table::Drain<'a, T>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// A consuming iterator over the values of a `HashSet`.
pub struct IntoIter<T> {
    inner: crate::hash_table::IntoIter<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T, S> IntoIterator for HashSet<T, S> {
    type IntoIter = IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, T, S> IntoIterator for &'a HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, S> FromIterator<T> for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T, S> Extend<T> for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.reserve(lower);
        for value in iter {
            self.insert(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::hash::BuildHasher;
    use core::hash::Hasher;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;
    use crate::hasher::BuildMicroHasher;

    #[derive(Clone)]
    struct SipHashBuilder {
        k1: u64,
        k2: u64,
    }

    impl BuildHasher for SipHashBuilder {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(self.k1, self.k2)
        }
    }

    impl Default for SipHashBuilder {
        fn default() -> Self {
            Self {
                k1: OsRng.try_next_u64().unwrap_or(0),
                k2: OsRng.try_next_u64().unwrap_or(0),
            }
        }
    }

    /// Hashes every value to zero, so all values share one probe chain.
    #[derive(Clone, Default)]
    struct ZeroHashBuilder;

    struct ZeroHasher;

    impl Hasher for ZeroHasher {
        fn finish(&self) -> u64 {
            0
        }

        fn write(&mut self, _bytes: &[u8]) {}
    }

    impl BuildHasher for ZeroHashBuilder {
        type Hasher = ZeroHasher;

        fn build_hasher(&self) -> Self::Hasher {
            ZeroHasher
        }
    }

    #[test]
    fn test_new_and_with_hasher() {
        let set: HashSet<i32, SipHashBuilder> = HashSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert_eq!(set.capacity(), 16);

        let set2 = HashSet::<i32, _>::with_hasher(SipHashBuilder::default());
        assert!(set2.is_empty());
        assert_eq!(set2.len(), 0);
    }

    #[test]
    fn test_with_config_and_capacity() {
        let config = TableConfig::new(64, 0.5).unwrap();
        let set = HashSet::<i32, _>::with_config_and_hasher(config, SipHashBuilder::default());
        assert_eq!(set.capacity(), 64);

        let set2: HashSet<i32, SipHashBuilder> = HashSet::with_capacity(200);
        assert!(200.0 / set2.capacity() as f64 <= 0.7);
        assert!(set2.is_empty());
    }

    #[test]
    fn test_insert_and_contains() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());

        assert!(set.insert(1));
        assert_eq!(set.len(), 1);
        assert!(!set.is_empty());
        assert!(set.contains(&1));

        assert!(!set.insert(1));
        assert_eq!(set.len(), 1);
        assert!(set.contains(&1));

        assert!(set.insert(2));
        assert_eq!(set.len(), 2);
        assert!(set.contains(&1));
        assert!(set.contains(&2));
        assert!(!set.contains(&3));
    }

    #[test]
    fn test_remove() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());
        set.insert(1);
        set.insert(2);
        set.insert(3);

        assert!(set.remove(&2));
        assert_eq!(set.len(), 2);
        assert!(set.contains(&1));
        assert!(!set.contains(&2));
        assert!(set.contains(&3));

        assert!(!set.remove(&2));
        assert!(!set.remove(&4));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_remove_from_empty() {
        let mut set: HashSet<u32, BuildMicroHasher> = HashSet::default();
        assert!(!set.remove(&7));
        assert!(!set.contains(&7));
        assert!(set.is_empty());
    }

    #[test]
    fn test_take() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());
        set.insert(1);
        set.insert(2);

        assert_eq!(set.take(&1), Some(1));
        assert_eq!(set.len(), 1);
        assert!(!set.contains(&1));
        assert!(set.contains(&2));

        assert_eq!(set.take(&1), None);
        assert_eq!(set.take(&3), None);
    }

    #[test]
    fn test_get_and_replace() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());
        set.insert(42);

        assert_eq!(set.get(&42), Some(&42));
        assert_eq!(set.get(&1), None);

        assert_eq!(set.replace(42), Some(42));
        assert_eq!(set.replace(43), None);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());
        set.insert(1);
        set.insert(2);
        set.insert(3);
        set.remove(&3);

        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.debug_stats().tombstones, 0);
        assert!(!set.contains(&1));
        assert!(!set.contains(&2));
    }

    #[test]
    fn test_reserve() {
        let mut set = HashSet::<i32, _>::with_hasher(SipHashBuilder::default());
        set.reserve(1000);
        let capacity = set.capacity();
        assert!(1000.0 / capacity as f64 <= 0.7);

        for i in 0..1000 {
            set.insert(i);
        }
        assert_eq!(set.capacity(), capacity);
    }

    #[test]
    fn test_growth_follows_load_factor() {
        let mut set: HashSet<u32, BuildMicroHasher> = HashSet::default();
        for i in 0..11 {
            set.insert(i);
        }
        assert_eq!(set.capacity(), 16);
        set.insert(11);
        assert_eq!(set.capacity(), 32);
        for i in 0..12 {
            assert!(set.contains(&i));
        }
    }

    #[test]
    fn test_tombstone_chain() {
        let mut set = HashSet::<u32, _>::with_hasher(ZeroHashBuilder);
        for i in 0..5 {
            assert!(set.insert(i));
        }

        // Removing from the middle of a chain keeps the tail reachable.
        assert!(set.remove(&2));
        for i in [0, 1, 3, 4] {
            assert!(set.contains(&i), "{i} lost behind a tombstone");
        }

        // Re-inserting an element stored past the tombstone is a no-op.
        assert!(!set.insert(4));
        assert_eq!(set.len(), 4);

        // A new element reuses the tombstone.
        assert!(set.insert(9));
        assert_eq!(set.debug_stats().tombstones, 0);
        assert_eq!(set.len(), 5);
        assert_eq!(set.probe_histogram().counts(), &[1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_iter() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());
        set.insert(1);
        set.insert(2);
        set.insert(3);

        let mut values: Vec<_> = set.iter().cloned().collect();
        values.sort();
        assert_eq!(values, vec![1, 2, 3]);

        let mut by_ref: Vec<_> = (&set).into_iter().copied().collect();
        by_ref.sort();
        assert_eq!(by_ref, values);
    }

    #[test]
    fn test_drain() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());
        set.insert(1);
        set.insert(2);
        set.insert(3);

        let mut drained: Vec<_> = set.drain().collect();
        drained.sort();
        assert_eq!(drained, vec![1, 2, 3]);
        assert!(set.is_empty());

        assert!(set.insert(2));
        assert!(set.contains(&2));
    }

    #[test]
    fn test_into_iter() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());
        set.insert(1);
        set.insert(2);
        set.insert(3);

        let mut values: Vec<_> = set.into_iter().collect();
        values.sort();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn test_from_iter_and_extend() {
        let mut set: HashSet<i32, SipHashBuilder> = vec![1, 2, 3, 2, 1].into_iter().collect();
        assert_eq!(set.len(), 3);

        set.extend(vec![3, 4, 5]);
        assert_eq!(set.len(), 5);
        for i in 1..=5 {
            assert!(set.contains(&i));
        }
    }

    #[test]
    fn test_retain() {
        let mut set: HashSet<i32, SipHashBuilder> = (0..100).collect();
        set.retain(|&x| x % 3 == 0);
        assert_eq!(set.len(), 34);
        for i in 0..100 {
            assert_eq!(set.contains(&i), i % 3 == 0);
        }
    }

    #[test]
    fn test_equality() {
        let a: HashSet<i32, SipHashBuilder> = (0..10).collect();
        let mut b: HashSet<i32, SipHashBuilder> = (0..10).rev().collect();
        assert_eq!(a, b);

        b.remove(&5);
        assert_ne!(a, b);
        b.insert(50);
        assert_ne!(a, b);
    }

    #[test]
    fn test_clone() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());
        set.insert("hello".to_string());
        set.insert("world".to_string());

        let cloned = set.clone();
        set.remove(&"hello".to_string());

        assert!(cloned.contains(&"hello".to_string()));
        assert!(cloned.contains(&"world".to_string()));
        assert_eq!(cloned.len(), 2);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_debug() {
        let mut set = HashSet::<u32, _>::with_hasher(ZeroHashBuilder);
        set.insert(1);
        set.insert(2);
        assert_eq!(alloc::format!("{set:?}"), "{1, 2}");
    }

    #[test]
    fn test_string_elements() {
        let mut set: HashSet<String, BuildMicroHasher> = HashSet::default();
        for i in 0..500 {
            assert!(set.insert(alloc::format!("{i}")));
        }
        assert_eq!(set.len(), 500);
        assert!(set.contains(&"499".to_string()));
        assert!(!set.contains(&"500".to_string()));
    }

    #[test]
    fn test_default_hash_builder() {
        let mut set: HashSet<u64> = HashSet::new();
        for i in 0..1000 {
            set.insert(i);
        }
        assert_eq!(set.len(), 1000);
        assert!(set.contains(&999));
    }
}
