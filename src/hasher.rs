//! A [`Hasher`] backed by the integer and byte hashes of this crate.

use core::hash::BuildHasherDefault;
use core::hash::Hasher;

use crate::hash_fns::bytes_jenkins;
use crate::hash_fns::int32_wang;
use crate::hash_fns::int64_wang;

/// Hasher that feeds each written word through a [`hash_fns`] mix.
///
/// `u32` words go through [`int32_wang`], `u64` and `usize` words through
/// [`int64_wang`], and byte slices through [`bytes_jenkins`]. Successive
/// words are combined by rotating the running state, so a key that writes a
/// single word hashes to exactly that word's mix. A `HashSet<u32,
/// BuildMicroHasher>` therefore places `k` at slot `int32_wang(k) & mask`.
///
/// Not keyed: an adversary can pick colliding keys.
///
/// [`hash_fns`]: crate::hash_fns
///
/// # Examples
///
/// ```rust
/// use core::hash::BuildHasher;
///
/// use micro_hash::hash_fns::int32_wang;
/// use micro_hash::hasher::BuildMicroHasher;
///
/// let build = BuildMicroHasher::default();
/// assert_eq!(build.hash_one(69u32), int32_wang(69) as u64);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct MicroHasher {
    hash: u64,
}

impl MicroHasher {
    #[inline(always)]
    fn add_word(&mut self, word: u64) {
        self.hash = self.hash.rotate_left(5) ^ word;
    }
}

impl Hasher for MicroHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.add_word(bytes_jenkins(bytes) as u64);
    }

    #[inline]
    fn write_u8(&mut self, i: u8) {
        self.write_u32(i as u32);
    }

    #[inline]
    fn write_u16(&mut self, i: u16) {
        self.write_u32(i as u32);
    }

    #[inline]
    fn write_u32(&mut self, i: u32) {
        self.add_word(int32_wang(i) as u64);
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.add_word(int64_wang(i));
    }

    #[inline]
    fn write_u128(&mut self, i: u128) {
        self.write_u64(i as u64);
        self.write_u64((i >> 64) as u64);
    }

    #[inline]
    fn write_usize(&mut self, i: usize) {
        self.write_u64(i as u64);
    }
}

/// [`BuildHasher`](core::hash::BuildHasher) producing [`MicroHasher`]s.
pub type BuildMicroHasher = BuildHasherDefault<MicroHasher>;
