//! Canonical block identity
//!
//! A block is identified by the unsigned big-endian integer its bytes spell.
//! Leading zero bytes carry no weight, so they are stripped on construction and
//! two blocks are equal exactly when their integers are equal.

use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Largest power of ten below 2^32, used to convert in 9-digit chunks
const DECIMAL_CHUNK: u64 = 1_000_000_000;
const DECIMAL_CHUNK_DIGITS: usize = 9;

/// Identity of a block: its bytes read as an unsigned big-endian integer
///
/// # Example
///
/// ```
/// use blockfreq::block::BlockId;
///
/// let short = BlockId::from_be_bytes(&[0x01, 0x00]);
/// let padded = BlockId::from_be_bytes(&[0x00, 0x00, 0x01, 0x00]);
///
/// assert_eq!(short, padded);
/// assert_eq!(short.to_string(), "256");
/// assert_eq!("256".parse::<BlockId>().unwrap(), short);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BlockId {
    /// Big-endian magnitude without leading zero bytes; empty for zero
    bytes: Vec<u8>,
}

impl BlockId {
    /// Canonicalize raw block bytes
    pub fn from_be_bytes(bytes: &[u8]) -> Self {
        let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
        Self {
            bytes: bytes[start..].to_vec(),
        }
    }

    /// The zero block
    pub fn zero() -> Self {
        Self::default()
    }

    /// Canonical big-endian bytes, empty for the zero block
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_zero(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<u64> for BlockId {
    fn from(value: u64) -> Self {
        Self::from_be_bytes(&value.to_be_bytes())
    }
}

impl From<u128> for BlockId {
    fn from(value: u128) -> Self {
        Self::from_be_bytes(&value.to_be_bytes())
    }
}

impl Ord for BlockId {
    fn cmp(&self, other: &Self) -> Ordering {
        // No leading zeros, so a longer magnitude is a larger integer
        self.bytes
            .len()
            .cmp(&other.bytes.len())
            .then_with(|| self.bytes.cmp(&other.bytes))
    }
}

impl PartialOrd for BlockId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }

        // Repeatedly divide the magnitude by 10^9, collecting remainders
        let mut quotient = self.bytes.clone();
        let mut chunks = Vec::new();
        while !quotient.is_empty() {
            let mut rem = 0u64;
            for byte in quotient.iter_mut() {
                let acc = (rem << 8) | u64::from(*byte);
                *byte = (acc / DECIMAL_CHUNK) as u8;
                rem = acc % DECIMAL_CHUNK;
            }
            chunks.push(rem as u32);

            let start = quotient
                .iter()
                .position(|&b| b != 0)
                .unwrap_or(quotient.len());
            quotient.drain(..start);
        }

        let mut iter = chunks.iter().rev();
        if let Some(first) = iter.next() {
            write!(f, "{}", first)?;
        }
        for chunk in iter {
            write!(f, "{:0width$}", chunk, width = DECIMAL_CHUNK_DIGITS)?;
        }
        Ok(())
    }
}

/// Error parsing a decimal block identity
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid block id {0:?}: expected a non-negative decimal integer")]
pub struct ParseBlockIdError(String);

impl FromStr for BlockId {
    type Err = ParseBlockIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseBlockIdError(s.to_owned()));
        }

        // Little-endian accumulator, reversed at the end
        let mut magnitude: Vec<u8> = Vec::new();
        for chunk in s.as_bytes().chunks(DECIMAL_CHUNK_DIGITS) {
            let scale = 10u64.pow(chunk.len() as u32);
            let mut carry = chunk
                .iter()
                .fold(0u64, |acc, &d| acc * 10 + u64::from(d - b'0'));

            for byte in magnitude.iter_mut() {
                let acc = u64::from(*byte) * scale + carry;
                *byte = (acc & 0xff) as u8;
                carry = acc >> 8;
            }
            while carry > 0 {
                magnitude.push((carry & 0xff) as u8);
                carry >>= 8;
            }
        }

        magnitude.reverse();
        Ok(Self::from_be_bytes(&magnitude))
    }
}

impl Serialize for BlockId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BlockId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct BlockIdVisitor;

        impl<'de> Visitor<'de> for BlockIdVisitor {
            type Value = BlockId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a decimal block id")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<BlockId, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<BlockId, E> {
                Ok(BlockId::from(v))
            }
        }

        deserializer.deserialize_any(BlockIdVisitor)
    }
}
