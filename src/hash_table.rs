use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::mem::MaybeUninit;

use crate::config::TableConfig;

/// Occupancy of a single slot.
///
/// `Deleted` is a tombstone: probes walk past it, insertions may reuse it,
/// and a resize drops it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
enum SlotState {
    Empty,
    Used,
    Deleted,
}

/// Outcome of walking the probe sequence of a hash.
enum Probe {
    /// A used slot whose value satisfied the predicate.
    Found(usize),
    /// No match. Holds the first tombstone passed, or else the empty slot
    /// that ended the walk.
    Vacant(usize),
    /// No match, and every slot is used.
    Full,
}

#[cold]
#[inline(never)]
fn table_full(capacity: usize) -> ! {
    panic!("linear probe cycled through all {capacity} slots of a full table; the load factor guard was bypassed")
}

/// Slot arrays being emptied by a resize. Values at or after `next` have
/// not been moved yet and are dropped with the guard.
struct Unmoved<V> {
    slots: Box<[MaybeUninit<V>]>,
    states: Box<[SlotState]>,
    next: usize,
}

impl<V> Drop for Unmoved<V> {
    fn drop(&mut self) {
        for index in self.next..self.states.len() {
            if self.states[index] == SlotState::Used {
                // SAFETY: Used slots at or after `next` still hold their
                // initialized values.
                unsafe { self.slots[index].assume_init_drop() };
            }
        }
    }
}

/// Statistics about a table's slot usage.
///
/// Only available with the `stats` feature or in tests.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of values currently in the table
    pub populated: usize,
    /// Total number of slots allocated
    pub capacity: usize,
    /// Number of tombstones left by removals since the last resize
    pub tombstones: usize,
    /// Number of never-used slots
    pub empty_slots: usize,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// Share of slots that end no probe walk ((populated + tombstones) / capacity)
    pub slot_utilization: f64,
    /// Total memory in bytes used by the slot and state arrays
    pub total_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Slot Usage: {} used, {} tombstones, {} empty ({:.2}% utilization)",
            self.populated,
            self.tombstones,
            self.empty_slots,
            self.slot_utilization * 100.0
        );
        println!("Total Allocated: {} bytes", self.total_bytes);
    }
}

/// Histogram of probe distances: entry `i` counts the values stored `i`
/// slots past their home slot.
///
/// Only available with the `stats` feature or in tests.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeHistogram {
    counts: Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl ProbeHistogram {
    /// Per-distance counts. Trailing zero bins are not stored.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Longest probe distance of any stored value.
    pub fn max_distance(&self) -> Option<usize> {
        self.counts.len().checked_sub(1)
    }

    /// Mean probe distance over all stored values.
    pub fn mean_distance(&self) -> f64 {
        let total: usize = self.counts.iter().sum();
        if total == 0 {
            return 0.0;
        }
        let weighted: usize = self.counts.iter().enumerate().map(|(d, c)| d * c).sum();
        weighted as f64 / total as f64
    }

    /// Pretty-prints the histogram horizontally using stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.counts.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        println!(
            "probe histogram ({} entries, mean distance {:.3}):",
            self.counts.iter().sum::<usize>(),
            self.mean_distance()
        );
        for (distance, &count) in self.counts.iter().enumerate() {
            let width = (count * max_bar).div_ceil(max);
            println!("{:>3} | {} ({})", distance, "█".repeat(width), count);
        }
    }
}

/// An open-addressing hash table with linear probing and tombstone deletion.
///
/// `HashTable<V>` stores values of type `V` in a power-of-two array of
/// slots with a parallel array of slot states. Hashes are not stored, so
/// every operation takes the value's hash and an equality predicate, and
/// operations that may resize also take a function re-hashing stored
/// values.
///
/// A value lives at the first free slot of the sequence `hash & mask`,
/// `hash + 1 & mask`, ... Removal leaves a tombstone so later values on the
/// same sequence stay reachable; tombstones are reused by insertions and
/// discarded when the table grows. The table doubles before an insertion
/// would push `len / capacity` past the configured maximum load factor.
///
/// ## Example
///
/// ```rust
/// use micro_hash::hash_fns::int64_wang;
/// use micro_hash::hash_table::Entry;
/// use micro_hash::hash_table::HashTable;
///
/// #[derive(Debug, PartialEq)]
/// struct Person {
///     id: u64,
///     name: String,
/// }
///
/// let mut table = HashTable::new();
/// let hash = int64_wang(123);
///
/// match table.entry(hash, |p: &Person| p.id == 123, |p| int64_wang(p.id)) {
///     Entry::Vacant(entry) => {
///         entry.insert(Person {
///             id: 123,
///             name: "Alice".to_string(),
///         });
///     }
///     Entry::Occupied(_) => {
///         println!("Person already exists");
///     }
/// }
///
/// assert_eq!(table.find(hash, |p| p.id == 123).unwrap().name, "Alice");
/// ```
pub struct HashTable<V> {
    slots: Box<[MaybeUninit<V>]>,
    states: Box<[SlotState]>,
    populated: usize,
    tombstones: usize,
    config: TableConfig,
}

impl<V> Debug for HashTable<V>
where
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashTable")
            .field("len", &self.populated)
            .field("capacity", &self.capacity())
            .field("tombstones", &self.tombstones)
            .field("values", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

impl<V> Clone for HashTable<V>
where
    V: Clone,
{
    fn clone(&self) -> Self {
        let mut slots = Box::new_uninit_slice(self.capacity());
        for (index, state) in self.states.iter().enumerate() {
            if *state == SlotState::Used {
                // SAFETY: Used slots hold initialized values.
                let value = unsafe { self.slots[index].assume_init_ref() };
                slots[index].write(value.clone());
            }
        }

        Self {
            slots,
            states: self.states.clone(),
            populated: self.populated,
            tombstones: self.tombstones,
            config: self.config,
        }
    }
}

impl<V> Drop for HashTable<V> {
    fn drop(&mut self) {
        self.drop_values();
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table with the default configuration: 16 slots and
    /// a maximum load factor of 0.7.
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    /// Creates an empty table sized and grown according to `config`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use micro_hash::HashTable;
    /// use micro_hash::TableConfig;
    ///
    /// let table: HashTable<u32> = HashTable::with_config(TableConfig::new(64, 0.5).unwrap());
    /// assert_eq!(table.capacity(), 64);
    /// ```
    pub fn with_config(config: TableConfig) -> Self {
        Self::allocate(config.initial_capacity(), config)
    }

    /// Creates an empty table that can hold at least `capacity` values
    /// without resizing, under the default load factor.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use micro_hash::HashTable;
    ///
    /// let table: HashTable<String> = HashTable::with_capacity(100);
    /// // 100 values in 128 slots would exceed the 0.7 load limit.
    /// assert_eq!(table.capacity(), 256);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        let config = TableConfig::default();
        let mut slots = config.initial_capacity();
        while config.exceeds_load(capacity, slots) {
            slots = slots
                .checked_mul(2)
                .expect("multiplication by 2 overflows a usize");
        }
        Self::allocate(slots, config)
    }

    fn allocate(capacity: usize, config: TableConfig) -> Self {
        debug_assert!(capacity.is_power_of_two());
        Self {
            slots: Box::new_uninit_slice(capacity),
            states: vec![SlotState::Empty; capacity].into_boxed_slice(),
            populated: 0,
            tombstones: 0,
            config,
        }
    }

    /// Returns the number of values in the table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use micro_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// assert_eq!(table.len(), 0);
    ///
    /// table.entry(1, |&n: &u64| n == 1, |&n| n).or_insert(1);
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table contains no values.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of slots. Always a power of two.
    pub fn capacity(&self) -> usize {
        self.states.len()
    }

    /// Returns the number of tombstones left by removals since the last
    /// resize or clear.
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Returns the configuration the table grows by.
    pub fn config(&self) -> TableConfig {
        self.config
    }

    /// Removes all values from the table, keeping its capacity.
    ///
    /// Tombstones are cleared as well.
    pub fn clear(&mut self) {
        self.drop_values();
        self.states.fill(SlotState::Empty);
        self.populated = 0;
        self.tombstones = 0;
    }

    fn drop_values(&mut self) {
        if core::mem::needs_drop::<V>() && self.populated > 0 {
            for (slot, state) in self.slots.iter_mut().zip(self.states.iter()) {
                if *state == SlotState::Used {
                    // SAFETY: Used slots hold initialized values. Callers
                    // either reset the states afterwards or are dropping the
                    // table, so no value is dropped twice.
                    unsafe { slot.assume_init_drop() };
                }
            }
        }
    }

    /// Walks the probe sequence of `hash` until `eq` matches a used slot, an
    /// empty slot ends the walk, or the walk returns to its start.
    #[inline]
    fn probe(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Probe {
        let mask = self.states.len() - 1;
        let start = hash as usize & mask;
        let mut index = start;
        let mut first_tombstone = None;

        loop {
            match self.states[index] {
                SlotState::Empty => return Probe::Vacant(first_tombstone.unwrap_or(index)),
                SlotState::Used => {
                    // SAFETY: Used slots hold initialized values.
                    if eq(unsafe { self.slots[index].assume_init_ref() }) {
                        return Probe::Found(index);
                    }
                }
                SlotState::Deleted => {
                    first_tombstone.get_or_insert(index);
                }
            }

            index = (index + 1) & mask;
            if index == start {
                return match first_tombstone {
                    Some(tombstone) => Probe::Vacant(tombstone),
                    None => Probe::Full,
                };
            }
        }
    }

    /// Returns a reference to the value matching `eq`, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use micro_hash::HashTable;
    /// use micro_hash::hash_fns::int64_wang;
    ///
    /// let mut table = HashTable::new();
    /// table
    ///     .entry(int64_wang(7), |&n: &u64| n == 7, |&n| int64_wang(n))
    ///     .or_insert(7);
    ///
    /// assert_eq!(table.find(int64_wang(7), |&n| n == 7), Some(&7));
    /// assert_eq!(table.find(int64_wang(8), |&n| n == 8), None);
    /// ```
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        if self.populated == 0 {
            return None;
        }

        match self.probe(hash, eq) {
            // SAFETY: `probe` only reports used slots as found.
            Probe::Found(index) => Some(unsafe { self.slots[index].assume_init_ref() }),
            Probe::Vacant(_) | Probe::Full => None,
        }
    }

    /// Returns a mutable reference to the value matching `eq`, if any.
    ///
    /// The caller must not change the value in a way that changes its hash.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        if self.populated == 0 {
            return None;
        }

        match self.probe(hash, eq) {
            // SAFETY: `probe` only reports used slots as found.
            Probe::Found(index) => Some(unsafe { self.slots[index].assume_init_mut() }),
            Probe::Vacant(_) | Probe::Full => None,
        }
    }

    /// Removes and returns the value matching `eq`, if any.
    ///
    /// The slot becomes a tombstone; nothing is shifted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use micro_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// table.entry(42, |&n: &u64| n == 42, |&n| n).or_insert(42);
    ///
    /// assert_eq!(table.remove(42, |&n| n == 42), Some(42));
    /// assert!(table.is_empty());
    /// assert_eq!(table.tombstones(), 1);
    ///
    /// assert_eq!(table.remove(99, |&n| n == 99), None);
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<V> {
        if self.populated == 0 {
            return None;
        }

        match self.probe(hash, eq) {
            Probe::Found(index) => Some(self.take_slot(index)),
            Probe::Vacant(_) | Probe::Full => None,
        }
    }

    fn take_slot(&mut self, index: usize) -> V {
        debug_assert_eq!(self.states[index], SlotState::Used);
        self.states[index] = SlotState::Deleted;
        self.populated -= 1;
        self.tombstones += 1;
        // SAFETY: The slot was used, so it holds an initialized value. Its
        // state is now `Deleted`, so the value is never read again.
        unsafe { self.slots[index].assume_init_read() }
    }

    /// Gets the entry for the value matching `eq`.
    ///
    /// If one more value would push the load factor past the configured
    /// maximum, the table first doubles until it fits, re-hashing every
    /// stored value with `hasher` and discarding tombstones. A vacant entry
    /// reuses the first tombstone on the probe sequence of `hash` when there
    /// is one.
    ///
    /// # Panics
    ///
    /// Panics if the probe sequence finds neither a match nor a free slot,
    /// which the growth policy rules out.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use micro_hash::hash_fns::bytes_jenkins;
    /// use micro_hash::hash_table::Entry;
    /// use micro_hash::hash_table::HashTable;
    ///
    /// let hash_str = |s: &str| bytes_jenkins(s.as_bytes()) as u64;
    ///
    /// let mut table = HashTable::new();
    /// let hash = hash_str("hello");
    ///
    /// match table.entry(hash, |s: &String| s == "hello", |s| hash_str(s.as_str())) {
    ///     Entry::Vacant(entry) => {
    ///         entry.insert("hello".to_string());
    ///     }
    ///     Entry::Occupied(_) => unreachable!(),
    /// }
    ///
    /// let existing = table
    ///     .entry(hash, |s: &String| s == "hello", |s| hash_str(s.as_str()))
    ///     .or_insert("world".to_string());
    /// assert_eq!(existing, "hello");
    /// ```
    pub fn entry(
        &mut self,
        hash: u64,
        eq: impl Fn(&V) -> bool,
        hasher: impl Fn(&V) -> u64,
    ) -> Entry<'_, V> {
        self.reserve(1, hasher);

        match self.probe(hash, eq) {
            Probe::Found(index) => Entry::Occupied(OccupiedEntry { table: self, index }),
            Probe::Vacant(index) => Entry::Vacant(VacantEntry { table: self, index }),
            Probe::Full => table_full(self.capacity()),
        }
    }

    /// Keeps only the values for which `f` returns `true`.
    ///
    /// Removed values leave tombstones, exactly as [`remove`](Self::remove)
    /// does.
    pub fn retain(&mut self, mut f: impl FnMut(&V) -> bool) {
        for index in 0..self.states.len() {
            if self.states[index] != SlotState::Used {
                continue;
            }

            // SAFETY: Used slots hold initialized values.
            if !f(unsafe { self.slots[index].assume_init_ref() }) {
                drop(self.take_slot(index));
            }
        }
    }

    /// Makes room for at least `additional` more values without resizing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use micro_hash::HashTable;
    ///
    /// let mut table: HashTable<u64> = HashTable::new();
    /// table.reserve(100, |&n| n);
    /// assert_eq!(table.capacity(), 256);
    /// ```
    pub fn reserve(&mut self, additional: usize, hasher: impl Fn(&V) -> u64) {
        let required = self.populated.saturating_add(additional);
        let mut capacity = self.capacity();
        while self.config.exceeds_load(required, capacity) {
            capacity = capacity
                .checked_mul(2)
                .expect("multiplication by 2 overflows a usize");
        }

        if capacity != self.capacity() {
            self.resize(capacity, hasher);
        }
    }

    /// Moves every used slot into a fresh pair of arrays of `new_capacity`
    /// slots. Tombstones are not carried over.
    ///
    /// If `hasher` panics, the values moved so far stay in the table and the
    /// rest are dropped.
    fn resize(&mut self, new_capacity: usize, hasher: impl Fn(&V) -> u64) {
        log::trace!(
            "resizing hash table from {} to {} slots ({} values, {} tombstones dropped)",
            self.capacity(),
            new_capacity,
            self.populated,
            self.tombstones
        );

        let mut old = Unmoved {
            slots: core::mem::replace(&mut self.slots, Box::new_uninit_slice(new_capacity)),
            states: core::mem::replace(
                &mut self.states,
                vec![SlotState::Empty; new_capacity].into_boxed_slice(),
            ),
            next: 0,
        };
        self.populated = 0;
        self.tombstones = 0;

        let mask = new_capacity - 1;
        while old.next < old.states.len() {
            let from = old.next;
            old.next += 1;
            if old.states[from] != SlotState::Used {
                continue;
            }

            // SAFETY: Used slots hold initialized values. `next` is already
            // past `from`, so neither the guard nor a later iteration reads
            // this slot again.
            let value = unsafe { old.slots[from].assume_init_read() };

            // Values in the old table were unique, so no equality check is
            // needed to place them.
            let mut index = hasher(&value) as usize & mask;
            while self.states[index] != SlotState::Empty {
                index = (index + 1) & mask;
            }
            self.slots[index].write(value);
            self.states[index] = SlotState::Used;
            self.populated += 1;
        }
    }

    /// Returns an iterator over all values in the table, in slot order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use micro_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// table.entry(1, |&n: &u64| n == 1, |&n| n).or_insert(1);
    /// table.entry(2, |&n: &u64| n == 2, |&n| n).or_insert(2);
    ///
    /// let values: Vec<u64> = table.iter().copied().collect();
    /// assert_eq!(values, vec![1, 2]);
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            table: self,
            index: 0,
        }
    }

    /// Returns an iterator that removes and yields all values from the table.
    ///
    /// After the iterator is dropped the table is empty and holds no
    /// tombstones.
    pub fn drain(&mut self) -> Drain<'_, V> {
        Drain {
            table: self,
            index: 0,
        }
    }

    /// Returns slot usage statistics.
    ///
    /// Only available with the `stats` feature or in tests.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let capacity = self.capacity();
        let empty_slots = self
            .states
            .iter()
            .filter(|state| **state == SlotState::Empty)
            .count();

        DebugStats {
            populated: self.populated,
            capacity,
            tombstones: self.tombstones,
            empty_slots,
            load_factor: self.populated as f64 / capacity as f64,
            slot_utilization: (capacity - empty_slots) as f64 / capacity as f64,
            total_bytes: capacity
                * (core::mem::size_of::<V>() + core::mem::size_of::<SlotState>()),
        }
    }

    /// Computes how far each stored value sits from its home slot
    /// `hasher(value) & mask`.
    ///
    /// Only available with the `stats` feature or in tests.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self, hasher: impl Fn(&V) -> u64) -> ProbeHistogram {
        let mask = self.capacity() - 1;
        let mut counts: Vec<usize> = Vec::new();

        for (index, state) in self.states.iter().enumerate() {
            if *state != SlotState::Used {
                continue;
            }

            // SAFETY: Used slots hold initialized values.
            let value = unsafe { self.slots[index].assume_init_ref() };
            let home = hasher(value) as usize & mask;
            let distance = index.wrapping_sub(home) & mask;
            if counts.len() <= distance {
                counts.resize(distance + 1, 0);
            }
            counts[distance] += 1;
        }

        ProbeHistogram { counts }
    }
}

/// A view into a single entry in the hash table, which may be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, V> {
    /// A vacant entry - no stored value matches
    Vacant(VacantEntry<'a, V>),
    /// An occupied entry - a stored value matches
    Occupied(OccupiedEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value in the entry.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value in the entry.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Applies `f` to the value if the entry is occupied.
    pub fn and_modify(mut self, f: impl FnOnce(&mut V)) -> Self {
        if let Entry::Occupied(entry) = &mut self {
            f(entry.get_mut());
        }
        self
    }

    /// Returns `true` if a stored value matched.
    pub fn is_occupied(&self) -> bool {
        matches!(self, Entry::Occupied(_))
    }
}

impl<'a, V> Entry<'a, V>
where
    V: Default,
{
    /// Inserts `V::default()` if the entry is vacant and returns a mutable
    /// reference to the value in the entry.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(V::default)
    }
}

/// A vacant slot on the probe sequence: either the first tombstone passed or
/// the empty slot that ended the probe.
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    index: usize,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Stores `value` in the slot and returns a mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        let VacantEntry { table, index } = self;
        if table.states[index] == SlotState::Deleted {
            table.tombstones -= 1;
        }
        table.states[index] = SlotState::Used;
        table.populated += 1;
        table.slots[index].write(value)
    }
}

/// A used slot whose value matched the entry's predicate.
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    index: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Returns a reference to the stored value.
    pub fn get(&self) -> &V {
        // SAFETY: Occupied entries point at used slots.
        unsafe { self.table.slots[self.index].assume_init_ref() }
    }

    /// Returns a mutable reference to the stored value.
    pub fn get_mut(&mut self) -> &mut V {
        // SAFETY: Occupied entries point at used slots.
        unsafe { self.table.slots[self.index].assume_init_mut() }
    }

    /// Converts the entry into a mutable reference bound to the table's
    /// borrow.
    pub fn into_mut(self) -> &'a mut V {
        let OccupiedEntry { table, index } = self;
        // SAFETY: Occupied entries point at used slots.
        unsafe { table.slots[index].assume_init_mut() }
    }

    /// Removes the value, leaving a tombstone, and returns it.
    pub fn remove(self) -> V {
        let OccupiedEntry { table, index } = self;
        table.take_slot(index)
    }
}

/// An iterator over the values of a [`HashTable`].
pub struct Iter<'a, V> {
    table: &'a HashTable<V>,
    index: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.table.states.len() {
            let index = self.index;
            self.index += 1;
            if self.table.states[index] == SlotState::Used {
                // SAFETY: Used slots hold initialized values.
                return Some(unsafe { self.table.slots[index].assume_init_ref() });
            }
        }
        None
    }
}

/// A draining iterator over the values of a [`HashTable`].
pub struct Drain<'a, V> {
    table: &'a mut HashTable<V>,
    index: usize,
}

impl<V> Iterator for Drain<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.table.states.len() {
            let index = self.index;
            self.index += 1;
            if self.table.states[index] == SlotState::Used {
                self.table.states[index] = SlotState::Empty;
                self.table.populated -= 1;
                // SAFETY: The slot was used and is now marked empty, so the
                // value is moved out exactly once.
                return Some(unsafe { self.table.slots[index].assume_init_read() });
            }
        }
        None
    }
}

impl<V> Drop for Drain<'_, V> {
    fn drop(&mut self) {
        for _ in &mut *self {}
        self.table.states.fill(SlotState::Empty);
        self.table.tombstones = 0;
    }
}

/// A consuming iterator over the values of a [`HashTable`].
pub struct IntoIter<V> {
    inner: alloc::vec::IntoIter<V>,
}

impl<V> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> IntoIterator for HashTable<V> {
    type IntoIter = IntoIter<V>;
    type Item = V;

    fn into_iter(mut self) -> Self::IntoIter {
        let values: Vec<V> = self.drain().collect();
        IntoIter {
            inner: values.into_iter(),
        }
    }
}

impl<'a, V> IntoIterator for &'a HashTable<V> {
    type IntoIter = Iter<'a, V>;
    type Item = &'a V;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
