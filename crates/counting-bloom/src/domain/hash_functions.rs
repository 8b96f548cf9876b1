//! Hash slot functions for the counting Bloom filter
//!
//! Slot function `h_i` maps an element to a counter index:
//!
//! 1. take the element's canonical bytes ([`FilterKey`])
//! 2. append salt `i` (20 bytes: `i` as big-endian i32, then zeros)
//! 3. SHA-1 the result
//! 4. read the first 4 digest bytes as a big-endian i32 and take its magnitude
//! 5. reduce modulo the array size `m`
//!
//! Salts derive from the slot ordinal alone, so two filters with the same
//! `(m, k)` hash identically and a reloaded filter keeps answering queries.

use std::borrow::Cow;

use sha1::{Digest, Sha1};

/// Output length of the slot digest (SHA-1).
pub const DIGEST_LEN: usize = 20;

/// Length of a slot salt in bytes.
pub const SALT_LEN: usize = 20;

/// Canonical byte representation of a filter element.
///
/// Two values must produce the same bytes iff they are the same element.
/// Fixed-width integers encode big-endian; `usize`/`isize` widen to 64 bits
/// so the encoding does not depend on the target.
pub trait FilterKey {
    fn key_bytes(&self) -> Cow<'_, [u8]>;
}

impl FilterKey for [u8] {
    fn key_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self)
    }
}

impl<const N: usize> FilterKey for [u8; N] {
    fn key_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self)
    }
}

impl FilterKey for Vec<u8> {
    fn key_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self)
    }
}

impl FilterKey for str {
    fn key_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl FilterKey for String {
    fn key_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl FilterKey for char {
    fn key_bytes(&self) -> Cow<'_, [u8]> {
        let mut buf = [0u8; 4];
        Cow::Owned(self.encode_utf8(&mut buf).as_bytes().to_vec())
    }
}

impl FilterKey for bool {
    fn key_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Owned(vec![u8::from(*self)])
    }
}

macro_rules! impl_filter_key_for_int {
    ($($ty:ty),*) => {
        $(
            impl FilterKey for $ty {
                fn key_bytes(&self) -> Cow<'_, [u8]> {
                    Cow::Owned(self.to_be_bytes().to_vec())
                }
            }
        )*
    };
}

impl_filter_key_for_int!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128);

impl FilterKey for usize {
    fn key_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Owned((*self as u64).to_be_bytes().to_vec())
    }
}

impl FilterKey for isize {
    fn key_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Owned((*self as i64).to_be_bytes().to_vec())
    }
}

impl<K: FilterKey + ?Sized> FilterKey for &K {
    fn key_bytes(&self) -> Cow<'_, [u8]> {
        (**self).key_bytes()
    }
}

impl<K: FilterKey + ?Sized> FilterKey for Box<K> {
    fn key_bytes(&self) -> Cow<'_, [u8]> {
        (**self).key_bytes()
    }
}

/// Per-slot salt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Salt([u8; SALT_LEN]);

impl Salt {
    /// Salt for slot function `slot`.
    pub fn for_slot(slot: u32) -> Self {
        let mut bytes = [0u8; SALT_LEN];
        bytes[..4].copy_from_slice(&slot.to_be_bytes());
        Salt(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// One slot function `h_i`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotHasher {
    salt: Salt,
}

impl SlotHasher {
    pub fn new(slot: u32) -> Self {
        Self {
            salt: Salt::for_slot(slot),
        }
    }

    pub fn salt(&self) -> &Salt {
        &self.salt
    }

    /// Magnitude of the first four digest bytes read as a big-endian i32.
    ///
    /// A fresh digest context is created per call; nothing is shared.
    pub fn digest_value(&self, key: &[u8]) -> u32 {
        let mut hasher = Sha1::new();
        hasher.update(key);
        hasher.update(self.salt.as_bytes());
        let digest = hasher.finalize();

        i32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]).unsigned_abs()
    }

    /// Counter index in `[0, m)`. `m` must be non-zero.
    pub fn slot(&self, key: &[u8], m: usize) -> usize {
        (u64::from(self.digest_value(key)) % m as u64) as usize
    }
}

/// The `k` slot functions of a filter.
///
/// Slot functions are fully determined by their ordinal, so the set only
/// records `k` and materializes each hasher on demand. It never changes
/// after construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HashSlotSet {
    k: usize,
}

impl HashSlotSet {
    pub fn new(k: usize) -> Self {
        Self { k }
    }

    pub fn len(&self) -> usize {
        self.k
    }

    pub fn is_empty(&self) -> bool {
        self.k == 0
    }

    /// Slot function `h_i`, `None` when `i >= k`.
    pub fn get(&self, i: usize) -> Option<SlotHasher> {
        (i < self.k).then(|| SlotHasher::new(i as u32))
    }

    /// Lazily yields the `k` counter indices of `key` in slot order.
    pub fn slots<'a>(&self, key: &'a [u8], m: usize) -> impl Iterator<Item = usize> + 'a {
        (0..self.k).map(move |i| SlotHasher::new(i as u32).slot(key, m))
    }
}
