//! Fixed-formula integer, byte and string hashes.
//!
//! Every function here is pure and total: no seed state, no allocation, no
//! failure. Arithmetic wraps at the width of the argument, so results are
//! identical on every platform.
//!
//! These functions are NOT cryptographically secure.

use core::fmt;
use core::str::FromStr;

use crate::error::Error;
use crate::error::ErrorKind;

// Integer
// -------

/// Thomas Wang's 32-bit integer mix.
///
/// # Examples
///
/// ```rust
/// use micro_hash::hash_fns::int32_wang;
///
/// assert_eq!(int32_wang(69), 0x76f9_5f6c);
/// ```
#[inline]
pub const fn int32_wang(key: u32) -> u32 {
    let mut a = (key ^ 61) ^ (key >> 16);
    a = a.wrapping_add(a << 3);
    a ^= a >> 4;
    a = a.wrapping_mul(0x27d4_eb2d);
    a ^= a >> 15;
    a
}

/// Thomas Wang's alternative 32-bit integer mix.
#[inline]
pub const fn int32_wang2(key: u32) -> u32 {
    // (key << 15) - key - 1
    let mut key = (!key).wrapping_add(key << 15);
    key ^= key >> 12;
    key = key.wrapping_add(key << 2);
    key ^= key >> 4;
    // (key + (key << 3)) + (key << 11)
    key = key.wrapping_mul(2057);
    key ^= key >> 16;
    key
}

/// Robert Jenkins' six-step 32-bit integer mix.
#[inline]
pub const fn int32_rob(key: u32) -> u32 {
    let mut a = key.wrapping_add(0x7ed5_5d16).wrapping_add(key << 12);
    a = (a ^ 0xc761_c23c) ^ (a >> 19);
    a = a.wrapping_add(0x1656_67b1).wrapping_add(a << 5);
    a = a.wrapping_add(0xd3a2_646c) ^ (a << 9);
    a = a.wrapping_add(0xfd70_46c5).wrapping_add(a << 3);
    a = (a ^ 0xb55a_4f09) ^ (a >> 16);
    a
}

/// Thomas Wang's 64-bit integer mix.
#[inline]
pub const fn int64_wang(key: u64) -> u64 {
    // (key << 21) - key - 1
    let mut key = (!key).wrapping_add(key << 21);
    key ^= key >> 24;
    // key * 265
    key = key.wrapping_add(key << 3).wrapping_add(key << 8);
    key ^= key >> 14;
    // key * 21
    key = key.wrapping_add(key << 2).wrapping_add(key << 4);
    key ^= key >> 28;
    key = key.wrapping_add(key << 31);
    key
}

/// Thomas Wang's 64-bit to 32-bit mix. The result is the low 32 bits of the
/// mixed key.
#[inline]
pub const fn int6432_wang(key: u64) -> u32 {
    // (key << 18) - key - 1
    let mut key = (!key).wrapping_add(key << 18);
    key ^= key >> 31;
    key = key.wrapping_mul(21);
    key ^= key >> 11;
    key = key.wrapping_add(key << 6);
    key ^= key >> 22;
    key as u32
}

// Bytes
// -----

/// The byte hash used by curl's `lib/hash.c`, seeded with 5381.
///
/// Bytes enter the accumulator sign-extended, the way a signed `char` is
/// widened, so bytes `>= 0x80` flip every high bit.
///
/// # Examples
///
/// ```rust
/// use micro_hash::hash_fns::bytes_curl;
///
/// assert_eq!(bytes_curl(b""), 5381);
/// assert_eq!(bytes_curl(b"hello"), 0x31_0a9c_ede7);
/// ```
#[inline]
pub fn bytes_curl(bytes: &[u8]) -> u64 {
    bytes.iter().fold(5381u64, |h, &byte| {
        h.wrapping_add(h << 5) ^ (byte as i8 as i64 as u64)
    })
}

/// Bob Jenkins' one-at-a-time hash.
#[inline]
pub fn bytes_jenkins(bytes: &[u8]) -> u32 {
    let mut hash = 0u32;
    for &byte in bytes {
        hash = hash.wrapping_add(byte as u32);
        hash = hash.wrapping_add(hash << 10);
        hash ^= hash >> 6;
    }
    hash = hash.wrapping_add(hash << 3);
    hash ^= hash >> 11;
    hash = hash.wrapping_add(hash << 15);
    hash
}

// Strings
// -------
//
// String hashes treat their input as a NUL-terminated string: hashing stops
// at the first zero byte, or at the end of the slice if there is none.

#[inline(always)]
fn c_str(s: &[u8]) -> impl Iterator<Item = u8> + '_ {
    s.iter().copied().take_while(|&c| c != 0)
}

/// The string hash from `stb_ds.h`: a rotate-and-add accumulation followed
/// by a Wang-style 64-bit finaliser that folds `seed` back in.
///
/// The finaliser runs even for the empty string.
#[inline]
pub fn str_stb(s: impl AsRef<[u8]>, seed: u64) -> u64 {
    let mut hash = seed;
    for c in c_str(s.as_ref()) {
        hash = hash.rotate_left(9).wrapping_add(c as u64);
    }

    hash ^= seed;
    hash = (!hash).wrapping_add(hash << 18);
    hash = hash.rotate_right(31);
    hash = hash.wrapping_mul(21);
    hash = hash.rotate_right(11);
    hash = hash.wrapping_add(hash << 6);
    hash ^= hash.rotate_right(22);
    hash.wrapping_add(seed)
}

/// Dan Bernstein's djb2: `hash * 33 + c`, seeded with 5381.
///
/// # Examples
///
/// ```rust
/// use micro_hash::hash_fns::str_djb2;
///
/// assert_eq!(str_djb2(""), 5381);
/// assert_eq!(str_djb2("a"), 5381 * 33 + 97);
/// // Hashing stops at the terminator.
/// assert_eq!(str_djb2(b"a\0bc"), str_djb2("a"));
/// ```
#[inline]
pub fn str_djb2(s: impl AsRef<[u8]>) -> u64 {
    c_str(s.as_ref()).fold(5381u64, |hash, c| {
        (hash << 5).wrapping_add(hash).wrapping_add(c as u64)
    })
}

/// The sdbm hash, in the shift-and-subtract form used by gawk:
/// `hash * 65599 + c`.
#[inline]
pub fn str_sdbm(s: impl AsRef<[u8]>) -> u64 {
    c_str(s.as_ref()).fold(0u64, |hash, c| {
        (c as u64)
            .wrapping_add(hash << 6)
            .wrapping_add(hash << 16)
            .wrapping_sub(hash)
    })
}

/// Shape of the key a [`HashFunction`] accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// A `u32` key.
    Int32,
    /// A `u64` key.
    Int64,
    /// An arbitrary byte slice.
    Bytes,
    /// A NUL-terminated string.
    Str,
}

/// The catalogue of hash functions in this module.
///
/// # Examples
///
/// ```rust
/// use micro_hash::hash_fns::HashFunction;
///
/// let f: HashFunction = "int32_rob".parse().unwrap();
/// assert_eq!(f, HashFunction::Int32Rob);
/// assert_eq!(f.name(), "int32_rob");
/// assert!(f.is_integer());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HashFunction {
    /// [`int32_wang`]
    Int32Wang,
    /// [`int32_wang2`]
    Int32Wang2,
    /// [`int32_rob`]
    Int32Rob,
    /// [`int64_wang`]
    Int64Wang,
    /// [`int6432_wang`]
    Int6432Wang,
    /// [`bytes_curl`]
    BytesCurl,
    /// [`bytes_jenkins`]
    BytesJenkins,
    /// [`str_stb`]
    StrStb,
    /// [`str_djb2`]
    StrDjb2,
    /// [`str_sdbm`]
    StrSdbm,
}

impl HashFunction {
    /// Every function in the catalogue.
    pub const ALL: [HashFunction; 10] = [
        HashFunction::Int32Wang,
        HashFunction::Int32Wang2,
        HashFunction::Int32Rob,
        HashFunction::Int64Wang,
        HashFunction::Int6432Wang,
        HashFunction::BytesCurl,
        HashFunction::BytesJenkins,
        HashFunction::StrStb,
        HashFunction::StrDjb2,
        HashFunction::StrSdbm,
    ];

    /// The integer functions, the default benchmark selection.
    pub const INTEGER: [HashFunction; 5] = [
        HashFunction::Int32Wang,
        HashFunction::Int32Wang2,
        HashFunction::Int32Rob,
        HashFunction::Int64Wang,
        HashFunction::Int6432Wang,
    ];

    /// Name of the function, as it is spelled in this module.
    pub const fn name(self) -> &'static str {
        match self {
            HashFunction::Int32Wang => "int32_wang",
            HashFunction::Int32Wang2 => "int32_wang2",
            HashFunction::Int32Rob => "int32_rob",
            HashFunction::Int64Wang => "int64_wang",
            HashFunction::Int6432Wang => "int6432_wang",
            HashFunction::BytesCurl => "bytes_curl",
            HashFunction::BytesJenkins => "bytes_jenkins",
            HashFunction::StrStb => "str_stb",
            HashFunction::StrDjb2 => "str_djb2",
            HashFunction::StrSdbm => "str_sdbm",
        }
    }

    /// The kind of key the function takes.
    pub const fn key_kind(self) -> KeyKind {
        match self {
            HashFunction::Int32Wang | HashFunction::Int32Wang2 | HashFunction::Int32Rob => {
                KeyKind::Int32
            }
            HashFunction::Int64Wang | HashFunction::Int6432Wang => KeyKind::Int64,
            HashFunction::BytesCurl | HashFunction::BytesJenkins => KeyKind::Bytes,
            HashFunction::StrStb | HashFunction::StrDjb2 | HashFunction::StrSdbm => KeyKind::Str,
        }
    }

    /// Whether the function takes an integer key.
    pub const fn is_integer(self) -> bool {
        matches!(self.key_kind(), KeyKind::Int32 | KeyKind::Int64)
    }
}

impl fmt::Display for HashFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashFunction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HashFunction::ALL
            .iter()
            .copied()
            .find(|f| f.name() == s)
            .ok_or_else(|| {
                Error::new(ErrorKind::ConfigInvalid, "unknown hash function")
                    .with_context("name", s)
            })
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn int32_known_values() {
        assert_eq!(int32_wang(0), 0xc0a9_496a);
        assert_eq!(int32_wang(1), 0x2792_2c9d);
        assert_eq!(int32_wang(69), 0x76f9_5f6c);
        assert_eq!(int32_wang(u32::MAX), 0x70f4_99d3);

        assert_eq!(int32_wang2(0), 0xcaa3_caa3);
        assert_eq!(int32_wang2(1), 0x12d6_0bf6);
        assert_eq!(int32_wang2(69), 0x3b76_f6a6);
        assert_eq!(int32_wang2(u32::MAX), 0xbd55_fc18);

        assert_eq!(int32_rob(0), 0x6b4e_d927);
        assert_eq!(int32_rob(1), 0xb486_81b6);
        assert_eq!(int32_rob(69), 0xd1dd_fc68);
        assert_eq!(int32_rob(u32::MAX), 0xfe64_c182);
    }

    #[test]
    fn int64_known_values() {
        assert_eq!(int64_wang(0), 0x77cf_a1ee_f01b_ca90);
        assert_eq!(int64_wang(1), 0x5bca_7c69_b794_f8ce);
        assert_eq!(int64_wang(69), 0xc037_0de5_806e_1a54);
        assert_eq!(int64_wang(u64::MAX), 0x1f89_206e_3f8e_c794);

        assert_eq!(int6432_wang(0), 0x2aea_a2ab);
        assert_eq!(int6432_wang(1), 0x1551_5fbc);
        assert_eq!(int6432_wang(69), 0xbeec_ab86);
        assert_eq!(int6432_wang(u64::MAX), 0x1fbb_f8ea);
    }

    #[test]
    fn integer_hashes_are_const() {
        const HASHED: u32 = int32_wang(69);
        const HASHED_64: u64 = int64_wang(69);
        assert_eq!(HASHED, int32_wang(69));
        assert_eq!(HASHED_64, int64_wang(69));
    }

    #[test]
    fn bytes_known_values() {
        assert_eq!(bytes_curl(b""), 5381);
        assert_eq!(bytes_curl(b"a"), 0x2_b5c4);
        assert_eq!(bytes_curl(b"hello"), 0x31_0a9c_ede7);
        assert_eq!(bytes_curl(b"hello world"), 0xbf16_9756_f8c6_5345);
        assert_eq!(bytes_curl(&[0x80, 0xff, 0x00, 0x7f]), 0x1_7c7a_a7c5);

        assert_eq!(bytes_jenkins(b""), 0);
        assert_eq!(bytes_jenkins(b"a"), 0xca2e_9442);
        assert_eq!(bytes_jenkins(b"hello"), 0xc8fd_181b);
        assert_eq!(bytes_jenkins(b"hello world"), 0x3e4a_5a57);
        assert_eq!(bytes_jenkins(&[0x80, 0xff, 0x00, 0x7f]), 0x8536_2dcc);
    }

    #[test]
    fn byte_hashes_do_not_stop_at_nul() {
        assert_ne!(bytes_jenkins(b"ab\0cd"), bytes_jenkins(b"ab"));
        assert_ne!(bytes_curl(b"ab\0cd"), bytes_curl(b"ab"));
    }

    #[test]
    fn str_known_values() {
        assert_eq!(str_stb("", 0), 0xa281_028a_0000_0040);
        assert_eq!(str_stb("", 69), 0xa281_028a_0000_0085);
        assert_eq!(str_stb("a", 0), 0x0205_3475_4951_f576);
        assert_eq!(str_stb("hello", 0), 0xb4c6_fb3a_85c0_a7d3);
        assert_eq!(str_stb("hello", 69), 0x6771_f099_e85a_b0f4);
        assert_eq!(str_stb("hello world", 0), 0xc9e2_49ee_944b_6612);

        assert_eq!(str_djb2(""), 5381);
        assert_eq!(str_djb2("a"), 0x2_b606);
        assert_eq!(str_djb2("hello"), 0x31_0f92_3099);
        assert_eq!(str_djb2("hello world"), 0xc094_3fd4_3551_c8c1);

        assert_eq!(str_sdbm(""), 0);
        assert_eq!(str_sdbm("a"), 0x61);
        assert_eq!(str_sdbm("hello"), 0x66eb_1bb3_28d1_9932);
        assert_eq!(str_sdbm("hello world"), 0x2d47_94ce_19ae_84c4);
    }

    #[test]
    fn str_hashes_stop_at_nul() {
        assert_eq!(str_stb(b"ab\0cd", 0), str_stb("ab", 0));
        assert_eq!(str_djb2(b"ab\0cd"), 0x59_7728);
        assert_eq!(str_sdbm(b"ab\0cd"), 0x61_1841);
        assert_eq!(str_djb2(c"ab".to_bytes()), str_djb2("ab"));
    }

    #[test]
    fn catalogue_names_round_trip() {
        for f in HashFunction::ALL {
            assert_eq!(f.name().parse::<HashFunction>().unwrap(), f);
            assert_eq!(f.to_string(), f.name());
        }
        assert!("int128_wang".parse::<HashFunction>().is_err());
    }

    #[test]
    fn integer_selection_matches_key_kind() {
        for f in HashFunction::ALL {
            assert_eq!(HashFunction::INTEGER.contains(&f), f.is_integer(), "{f}");
        }
        assert_eq!(HashFunction::Int6432Wang.key_kind(), KeyKind::Int64);
        assert_eq!(HashFunction::StrSdbm.key_kind(), KeyKind::Str);
    }
}
