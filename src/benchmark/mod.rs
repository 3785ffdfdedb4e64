//! Collision and uniformity benchmark for the functions in
//! [`hash_fns`](crate::hash_fns).
//!
//! A run draws [`BenchConfig::iterations`] keys from an LCG, hashes each one
//! and offers the result to a [`HashSet`]. A hash the set already holds is a
//! collision. Every new hash increments the bucket given by its low
//! [`BenchConfig::precision`] bits, and the run reports the mean absolute
//! difference between those bucket counts and a perfectly even split.
//!
//! Runs share nothing, so [`run_all`] executes them in parallel.

use core::fmt::Write;
use core::hash::Hash;

use rayon::prelude::*;

use crate::config::BenchConfig;
use crate::hash_fns::HashFunction;
use crate::hash_fns::bytes_curl;
use crate::hash_fns::bytes_jenkins;
use crate::hash_fns::int6432_wang;
use crate::hash_fns::int32_rob;
use crate::hash_fns::int32_wang;
use crate::hash_fns::int32_wang2;
use crate::hash_fns::int64_wang;
use crate::hash_fns::str_djb2;
use crate::hash_fns::str_sdbm;
use crate::hash_fns::str_stb;
use crate::hash_set::HashSet;
use crate::hasher::BuildMicroHasher;

mod lcg;
mod report;

pub use lcg::Lcg32;
pub use lcg::Lcg64;
pub use lcg::NarrowLcg64;
pub use report::ReportTable;

/// Raw outcome of feeding a key stream through a hash function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tally {
    /// Hashes that were already in the seen set.
    pub collisions: u64,
    /// Number of distinct hashes that fell into each bucket.
    pub counts: Vec<u64>,
}

impl Tally {
    /// Mean absolute deviation of the bucket counts from an even split of
    /// `iterations` keys. See [`mean_deviation`].
    pub fn mean_deviation(&self, iterations: u64) -> f64 {
        mean_deviation(&self.counts, iterations)
    }
}

/// One row of the benchmark report.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchReport {
    /// Name of the benchmarked hash.
    pub name: &'static str,
    /// Hashes seen more than once.
    pub collisions: u64,
    /// Mean absolute deviation from a uniform bucket distribution. Lower is
    /// better.
    pub mean_deviation: f64,
}

/// Hashes the first `config.iterations()` keys and tallies collisions and
/// bucket counts.
///
/// Colliding hashes are not counted in any bucket.
///
/// # Examples
///
/// ```rust
/// use micro_hash::BenchConfig;
/// use micro_hash::benchmark::Lcg32;
/// use micro_hash::benchmark::count_collisions;
///
/// let config = BenchConfig::new(1000, 4).unwrap();
/// let tally = count_collisions(&config, Lcg32::new(config.seed() as u32), |_: u32| 0u32);
/// assert_eq!(tally.collisions, 999);
/// assert_eq!(tally.counts[0], 1);
/// ```
pub fn count_collisions<K, H>(
    config: &BenchConfig,
    keys: impl IntoIterator<Item = K>,
    mut hash: impl FnMut(K) -> H,
) -> Tally
where
    H: Copy + Eq + Hash + Into<u64>,
{
    let mask = config.bucket_count() as u64 - 1;
    let iterations = usize::try_from(config.iterations()).unwrap_or(usize::MAX);

    let mut seen: HashSet<H, BuildMicroHasher> =
        HashSet::with_config_and_hasher(config.table(), BuildMicroHasher::default());
    let mut counts = vec![0u64; config.bucket_count()];
    let mut collisions = 0u64;

    for key in keys.into_iter().take(iterations) {
        let h = hash(key);
        if !seen.insert(h) {
            collisions += 1;
            continue;
        }
        counts[(h.into() & mask) as usize] += 1;
    }

    Tally { collisions, counts }
}

/// Mean over all buckets of `|count - expected|`, where `expected` is
/// `iterations / counts.len()` rounded down.
///
/// Returns `0.0` for an empty bucket array.
///
/// # Examples
///
/// ```rust
/// use micro_hash::benchmark::mean_deviation;
///
/// assert_eq!(mean_deviation(&[4, 4, 4, 4], 16), 0.0);
/// assert_eq!(mean_deviation(&[16, 0, 0, 0], 16), 6.0);
/// ```
pub fn mean_deviation(counts: &[u64], iterations: u64) -> f64 {
    if counts.is_empty() {
        return 0.0;
    }

    let expected = iterations / counts.len() as u64;
    let total: u64 = counts.iter().map(|&c| c.abs_diff(expected)).sum();
    total as f64 / counts.len() as f64
}

/// Runs one named benchmark: tallies `keys` under `hash` and reduces the
/// tally to a report row.
///
/// # Examples
///
/// ```rust
/// use micro_hash::BenchConfig;
/// use micro_hash::benchmark::Lcg32;
/// use micro_hash::benchmark::run;
///
/// let config = BenchConfig::new(1000, 4).unwrap();
/// let report = run("identity", &config, Lcg32::new(config.seed() as u32), |k: u32| k);
/// assert_eq!(report.collisions, 0);
/// assert_eq!(report.mean_deviation, 0.5);
/// ```
pub fn run<K, H>(
    name: &'static str,
    config: &BenchConfig,
    keys: impl IntoIterator<Item = K>,
    hash: impl FnMut(K) -> H,
) -> BenchReport
where
    H: Copy + Eq + Hash + Into<u64>,
{
    log::debug!(
        "benchmarking {name}: {} keys, {} buckets, seed {}",
        config.iterations(),
        config.bucket_count(),
        config.seed()
    );

    let tally = count_collisions(config, keys, hash);
    let report = BenchReport {
        name,
        collisions: tally.collisions,
        mean_deviation: tally.mean_deviation(config.iterations()),
    };

    log::debug!(
        "finished {name}: {} collisions, mean deviation {}",
        report.collisions,
        report.mean_deviation
    );
    report
}

/// Hashes the decimal rendering of each key, reusing one buffer.
fn decimal<H>(mut hash: impl FnMut(&str) -> H) -> impl FnMut(u64) -> H {
    let mut buf = String::with_capacity(20);
    move |key| {
        buf.clear();
        write!(buf, "{key}").expect("formatting into a String cannot fail");
        hash(&buf)
    }
}

impl HashFunction {
    /// Benchmarks this function under `config`.
    ///
    /// 32-bit functions hash an [`Lcg32`] stream, 64-bit functions an
    /// [`Lcg64`] stream, and `int6432_wang` the [`NarrowLcg64`] stream. Byte
    /// functions hash the little-endian bytes of [`Lcg64`] keys and string
    /// functions their decimal rendering; `str_stb` is seeded with the
    /// generator seed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use micro_hash::BenchConfig;
    /// use micro_hash::hash_fns::HashFunction;
    ///
    /// let config = BenchConfig::new(100_000, 8).unwrap();
    /// let report = HashFunction::Int32Wang.benchmark(&config);
    /// assert_eq!(report.name, "int32_wang");
    /// assert_eq!(report.collisions, 0);
    /// assert_eq!(report.mean_deviation, 15.5625);
    /// ```
    pub fn benchmark(self, config: &BenchConfig) -> BenchReport {
        let name = self.name();
        let seed = config.seed();
        let lcg32 = || Lcg32::new(seed as u32);
        let lcg64 = || Lcg64::new(seed);

        match self {
            HashFunction::Int32Wang => run(name, config, lcg32(), int32_wang),
            HashFunction::Int32Wang2 => run(name, config, lcg32(), int32_wang2),
            HashFunction::Int32Rob => run(name, config, lcg32(), int32_rob),
            HashFunction::Int64Wang => run(name, config, lcg64(), int64_wang),
            HashFunction::Int6432Wang => run(
                name,
                config,
                NarrowLcg64::new(seed as u32),
                |k: u32| int6432_wang(k as u64),
            ),
            HashFunction::BytesCurl => {
                run(name, config, lcg64(), |k: u64| bytes_curl(&k.to_le_bytes()))
            }
            HashFunction::BytesJenkins => run(name, config, lcg64(), |k: u64| {
                bytes_jenkins(&k.to_le_bytes())
            }),
            HashFunction::StrStb => {
                run(name, config, lcg64(), decimal(|s| str_stb(s, seed)))
            }
            HashFunction::StrDjb2 => run(name, config, lcg64(), decimal(|s| str_djb2(s))),
            HashFunction::StrSdbm => run(name, config, lcg64(), decimal(|s| str_sdbm(s))),
        }
    }
}

/// Benchmarks every function in `functions` on its own thread-pool task.
///
/// Reports come back in the order of `functions`.
///
/// # Examples
///
/// ```rust
/// use micro_hash::BenchConfig;
/// use micro_hash::benchmark::run_all;
/// use micro_hash::hash_fns::HashFunction;
///
/// let config = BenchConfig::new(10_000, 6).unwrap();
/// let reports = run_all(&config, &HashFunction::INTEGER);
/// let names: Vec<_> = reports.iter().map(|r| r.name).collect();
/// assert_eq!(
///     names,
///     ["int32_wang", "int32_wang2", "int32_rob", "int64_wang", "int6432_wang"]
/// );
/// ```
pub fn run_all(config: &BenchConfig, functions: &[HashFunction]) -> Vec<BenchReport> {
    functions
        .par_iter()
        .map(|function| function.benchmark(config))
        .collect()
}
