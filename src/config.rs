use crate::error::Error;
use crate::error::ErrorKind;

/// Slot count a new table starts with.
pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

/// Load factor a table may not exceed after an insertion.
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.7;

/// Number of keys a benchmark run draws from its generator.
///
/// Memory used by a run grows linearly with this value, since every distinct
/// hash is kept in a set.
pub const DEFAULT_ITERATIONS: u64 = 10_000_000;

/// Number of low hash bits kept for the uniformity estimate.
pub const DEFAULT_PRECISION: u32 = 12;

/// Largest accepted precision. Bucket counters scale with `2^precision`.
pub const MAX_PRECISION: u32 = 24;

/// Seed of the key generator used by the reference benchmark table.
pub const DEFAULT_SEED: u64 = 6969;

/// Sizing policy for a [`HashTable`](crate::HashTable).
///
/// # Examples
///
/// ```rust
/// use micro_hash::TableConfig;
///
/// let config = TableConfig::new(64, 0.5).unwrap();
/// assert_eq!(config.initial_capacity(), 64);
///
/// assert!(TableConfig::new(48, 0.5).is_err());
/// assert!(TableConfig::new(64, 1.5).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableConfig {
    initial_capacity: usize,
    max_load_factor: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
        }
    }
}

impl TableConfig {
    /// Creates a table configuration.
    ///
    /// `initial_capacity` must be a non-zero power of two so slot indices can
    /// be computed with a mask, and `max_load_factor` must lie in `(0, 1]`.
    pub fn new(initial_capacity: usize, max_load_factor: f64) -> Result<Self, Error> {
        if !initial_capacity.is_power_of_two() {
            return Err(Error::new(
                ErrorKind::ConfigInvalid,
                "initial capacity must be a non-zero power of two",
            )
            .with_context("initial_capacity", initial_capacity));
        }

        if !(max_load_factor > 0.0 && max_load_factor <= 1.0) {
            return Err(Error::new(
                ErrorKind::ConfigInvalid,
                "max load factor must be in (0, 1]",
            )
            .with_context("max_load_factor", max_load_factor));
        }

        Ok(Self {
            initial_capacity,
            max_load_factor,
        })
    }

    /// Slot count of a freshly created table.
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Highest `len / capacity` ratio a table holds after an insertion.
    pub fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    /// Whether holding `len` values in `capacity` slots breaks the load limit.
    #[inline]
    pub(crate) fn exceeds_load(&self, len: usize, capacity: usize) -> bool {
        len as f64 / capacity as f64 > self.max_load_factor
    }
}

/// Parameters of one collision benchmark run.
///
/// # Examples
///
/// ```rust
/// use micro_hash::BenchConfig;
///
/// let config = BenchConfig::new(1000, 4).unwrap().with_seed(42);
/// assert_eq!(config.bucket_count(), 16);
/// assert_eq!(config.expected_count(), 62);
/// assert_eq!(config.seed(), 42);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BenchConfig {
    iterations: u64,
    precision: u32,
    seed: u64,
    table: TableConfig,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            precision: DEFAULT_PRECISION,
            seed: DEFAULT_SEED,
            table: TableConfig::default(),
        }
    }
}

impl BenchConfig {
    /// Creates a benchmark configuration with the default seed and table
    /// sizing.
    pub fn new(iterations: u64, precision: u32) -> Result<Self, Error> {
        if iterations == 0 {
            return Err(Error::new(
                ErrorKind::ConfigInvalid,
                "a benchmark needs at least one iteration",
            ));
        }

        if precision > MAX_PRECISION {
            return Err(Error::new(
                ErrorKind::ConfigInvalid,
                "precision would allocate too many bucket counters",
            )
            .with_context("precision", precision)
            .with_context("max_precision", MAX_PRECISION));
        }

        Ok(Self {
            iterations,
            precision,
            ..Self::default()
        })
    }

    /// Sets the generator seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the sizing policy of the set that records seen hashes.
    #[must_use]
    pub fn with_table(mut self, table: TableConfig) -> Self {
        self.table = table;
        self
    }

    /// Number of keys drawn per run.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Number of low hash bits used to pick a bucket.
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Generator seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Sizing policy of the seen-hash set.
    pub fn table(&self) -> TableConfig {
        self.table
    }

    /// Number of uniformity buckets, `2^precision`.
    pub fn bucket_count(&self) -> usize {
        1 << self.precision
    }

    /// Per-bucket count of a perfectly uniform hash.
    ///
    /// Integer division: any remainder of `iterations / bucket_count` is
    /// dropped.
    pub fn expected_count(&self) -> u64 {
        self.iterations >> self.precision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let table = TableConfig::default();
        assert_eq!(table.initial_capacity(), 16);
        assert_eq!(table.max_load_factor(), 0.7);

        let bench = BenchConfig::default();
        assert_eq!(bench.iterations(), 10_000_000);
        assert_eq!(bench.precision(), 12);
        assert_eq!(bench.bucket_count(), 4096);
        assert_eq!(bench.seed(), 6969);
        assert_eq!(bench.expected_count(), 2441);
    }

    #[test]
    fn table_config_rejects_bad_values() {
        assert!(TableConfig::new(0, 0.7).is_err());
        assert!(TableConfig::new(24, 0.7).is_err());
        assert!(TableConfig::new(16, 0.0).is_err());
        assert!(TableConfig::new(16, f64::NAN).is_err());
        assert!(TableConfig::new(16, 1.01).is_err());
        assert!(TableConfig::new(1, 1.0).is_ok());
    }

    #[test]
    fn load_check_is_strictly_greater() {
        let table = TableConfig::default();
        assert!(!table.exceeds_load(11, 16));
        assert!(table.exceeds_load(12, 16));

        let full = TableConfig::new(4, 1.0).unwrap();
        assert!(!full.exceeds_load(4, 4));
        assert!(full.exceeds_load(5, 4));
    }

    #[test]
    fn bench_config_rejects_bad_values() {
        assert_eq!(
            BenchConfig::new(0, 4).unwrap_err().kind(),
            ErrorKind::ConfigInvalid
        );
        assert!(BenchConfig::new(10, MAX_PRECISION + 1).is_err());
        assert!(BenchConfig::new(10, MAX_PRECISION).is_ok());
    }
}
