//! Linear congruential key generators.
//!
//! Each generator is an endless [`Iterator`]. The first key it yields is one
//! step past the seed, and the seed itself is never yielded.

/// 32-bit LCG with the Numerical Recipes constants.
///
/// # Examples
///
/// ```rust
/// use micro_hash::benchmark::Lcg32;
///
/// let keys: Vec<u32> = Lcg32::new(6969).take(2).collect();
/// assert_eq!(keys, [4_024_044_356, 1_688_378_835]);
/// ```
#[derive(Clone, Debug)]
pub struct Lcg32 {
    state: u32,
}

impl Lcg32 {
    /// Multiplier of the recurrence.
    pub const MULTIPLIER: u32 = 1_664_525;
    /// Increment of the recurrence.
    pub const INCREMENT: u32 = 1_013_904_223;

    /// Creates a generator whose first key is `step(seed)`.
    pub const fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// One step of the recurrence.
    #[inline]
    pub const fn step(state: u32) -> u32 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }
}

impl Iterator for Lcg32 {
    type Item = u32;

    #[inline]
    fn next(&mut self) -> Option<u32> {
        self.state = Self::step(self.state);
        Some(self.state)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

/// 64-bit LCG with Knuth's MMIX constants.
#[derive(Clone, Debug)]
pub struct Lcg64 {
    state: u64,
}

impl Lcg64 {
    /// Multiplier of the recurrence.
    pub const MULTIPLIER: u64 = 6_364_136_223_846_793_005;
    /// Increment of the recurrence.
    pub const INCREMENT: u64 = 1_442_695_040_888_963_407;

    /// Creates a generator whose first key is `step(seed)`.
    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// One step of the recurrence.
    #[inline]
    pub const fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }
}

impl Iterator for Lcg64 {
    type Item = u64;

    #[inline]
    fn next(&mut self) -> Option<u64> {
        self.state = Self::step(self.state);
        Some(self.state)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

/// The 64-bit recurrence run on a 32-bit state.
///
/// Every step widens the state, applies [`Lcg64::step`] and keeps the low 32
/// bits. Low bits of an LCG modulo `2^64` depend only on low bits of the
/// state, so the keys equal those of [`Lcg64`] truncated to `u32`. The
/// reference `int6432_wang` numbers were measured on these zero-extended
/// keys.
///
/// # Examples
///
/// ```rust
/// use micro_hash::benchmark::NarrowLcg64;
///
/// let keys: Vec<u32> = NarrowLcg64::new(6969).take(3).collect();
/// assert_eq!(keys, [3_373_961_556, 84_916_499, 67_794_598]);
/// ```
#[derive(Clone, Debug)]
pub struct NarrowLcg64 {
    state: u32,
}

impl NarrowLcg64 {
    /// Creates a generator whose first key is the truncated `step(seed)`.
    pub const fn new(seed: u32) -> Self {
        Self { state: seed }
    }
}

impl Iterator for NarrowLcg64 {
    type Item = u32;

    #[inline]
    fn next(&mut self) -> Option<u32> {
        self.state = Lcg64::step(self.state as u64) as u32;
        Some(self.state)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_keys_follow_seed() {
        let keys: Vec<u32> = Lcg32::new(6969).take(3).collect();
        assert_eq!(keys, [4_024_044_356, 1_688_378_835, 2_368_604_438]);

        let keys: Vec<u64> = Lcg64::new(6969).take(3).collect();
        assert_eq!(
            keys,
            [
                7_135_285_831_427_330_388,
                7_812_338_313_696_622_867,
                9_660_642_485_529_638_566
            ]
        );
    }

    #[test]
    fn narrow_generator_is_truncated_wide_stream() {
        let wide = Lcg64::new(6969).map(|k| k as u32);
        let narrow = NarrowLcg64::new(6969);
        assert!(wide.zip(narrow).take(1000).all(|(w, n)| w == n));
    }

    #[test]
    fn generators_are_deterministic() {
        let a: Vec<u32> = Lcg32::new(1).take(100).collect();
        let b: Vec<u32> = Lcg32::new(1).take(100).collect();
        assert_eq!(a, b);

        let c: Vec<u32> = Lcg32::new(2).take(100).collect();
        assert_ne!(a, c);
    }
}
