//! Persisted filter layout
//!
//! ```text
//! [k: i32 BE][m: i32 BE][counter_0: i32 BE] ... [counter_{m-1}: i32 BE]
//! ```
//!
//! Slot salts are not stored. They derive from slot ordinals, so a decoded
//! filter answers queries exactly like the one that was encoded.
//!
//! The serde surface carries the same state as a [`FilterSnapshot`].

use std::io::{Read, Write};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::domain::counting_bloom::{validate_dimensions, CountingBloomFilter, MAX_COUNTER};
use crate::error::FilterError;

/// Size of the `k` + `m` header.
pub const HEADER_LEN: usize = 8;

/// Bytes per encoded counter.
pub const COUNTER_LEN: usize = 4;

/// Counters reserved up front by `read_from`; the rest grow as they arrive.
const READ_PREALLOC: usize = 1 << 16;

/// Serializable filter state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSnapshot {
    pub hash_count: usize,
    pub counters: Vec<u32>,
}

impl<T: ?Sized> CountingBloomFilter<T> {
    /// Encoded length for this filter.
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + COUNTER_LEN * self.size()
    }

    /// Encode as `k`, `m`, then every counter (big-endian i32).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        // Dimensions and counters are bounded by i32::MAX at construction.
        out.extend_from_slice(&(self.hash_count() as i32).to_be_bytes());
        out.extend_from_slice(&(self.size() as i32).to_be_bytes());
        for counter in self.counters() {
            out.extend_from_slice(&(counter as i32).to_be_bytes());
        }
        out
    }

    /// Decode the layout written by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FilterError> {
        if bytes.len() < HEADER_LEN {
            return Err(FilterError::Truncated {
                expected: HEADER_LEN,
                actual: bytes.len(),
            });
        }

        let (k, m) = decode_header(&bytes[..HEADER_LEN])?;
        let expected = HEADER_LEN + COUNTER_LEN * m;
        if bytes.len() < expected {
            return Err(FilterError::Truncated {
                expected,
                actual: bytes.len(),
            });
        }
        if bytes.len() > expected {
            return Err(FilterError::TrailingBytes {
                extra: bytes.len() - expected,
            });
        }

        let counters = bytes[HEADER_LEN..]
            .chunks_exact(COUNTER_LEN)
            .enumerate()
            .map(|(index, chunk)| decode_counter(index, chunk))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(size = m, hash_count = k, "Counting Bloom filter decoded");
        Ok(Self::from_parts(counters, k))
    }

    /// Stream the encoded filter into `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), FilterError> {
        writer.write_all(&self.to_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Read exactly one encoded filter from `reader`.
    ///
    /// Bytes after the last counter are left unread. Counters are read one
    /// at a time, so a header claiming more counters than the stream holds
    /// fails with `Io` once the stream runs dry.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self, FilterError> {
        let mut header = [0u8; HEADER_LEN];
        reader.read_exact(&mut header)?;
        let (k, m) = decode_header(&header)?;

        let mut counters = Vec::with_capacity(m.min(READ_PREALLOC));
        let mut chunk = [0u8; COUNTER_LEN];
        for index in 0..m {
            reader.read_exact(&mut chunk)?;
            counters.push(decode_counter(index, &chunk)?);
        }

        debug!(size = m, hash_count = k, "Counting Bloom filter read");
        Ok(Self::from_parts(counters, k))
    }

    pub fn snapshot(&self) -> FilterSnapshot {
        FilterSnapshot {
            hash_count: self.hash_count(),
            counters: self.counters(),
        }
    }

    pub fn from_snapshot(snapshot: FilterSnapshot) -> Result<Self, FilterError> {
        validate_dimensions(snapshot.counters.len(), snapshot.hash_count)?;
        if let Some((index, &value)) = snapshot
            .counters
            .iter()
            .enumerate()
            .find(|(_, c)| **c > MAX_COUNTER)
        {
            return Err(FilterError::CorruptCounter {
                index,
                value: value as i32,
            });
        }
        Ok(Self::from_parts(snapshot.counters, snapshot.hash_count))
    }
}

fn decode_header(header: &[u8]) -> Result<(usize, usize), FilterError> {
    let k = i32::from_be_bytes([header[0], header[1], header[2], header[3]]);
    let m = i32::from_be_bytes([header[4], header[5], header[6], header[7]]);

    if k <= 0 {
        return Err(FilterError::invalid("hash_count", format!("{k} is not positive")));
    }
    if m <= 0 {
        return Err(FilterError::invalid("size", format!("{m} is not positive")));
    }
    let (k, m) = (k as usize, m as usize);
    validate_dimensions(m, k)?;
    Ok((k, m))
}

fn decode_counter(index: usize, chunk: &[u8]) -> Result<u32, FilterError> {
    let value = i32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    u32::try_from(value).map_err(|_| FilterError::CorruptCounter { index, value })
}

impl<T: ?Sized> Serialize for CountingBloomFilter<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.snapshot().serialize(serializer)
    }
}

impl<'de, T: ?Sized> Deserialize<'de> for CountingBloomFilter<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let snapshot = FilterSnapshot::deserialize(deserializer)?;
        Self::from_snapshot(snapshot).map_err(D::Error::custom)
    }
}
