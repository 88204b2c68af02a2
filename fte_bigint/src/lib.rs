//! Arbitrary-precision non-negative integer arithmetic.
//!
//! This is a thin, purpose-built wrapper around [`num_bigint::BigUint`]: it
//! exposes exactly the operations the rank/unrank engine and record codec
//! need (construction from big-endian bytes, zero-padded serialization,
//! shifts, and [`BigUint::peel_off`]) so that callers outside this crate
//! never reach for `num_bigint` directly.

use num_bigint::BigUint as Inner;
use num_traits::Zero;
use std::{
    fmt,
    ops::{
        Add,
        Sub,
    },
};

/// A non-negative arbitrary-precision integer.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BigUint(Inner);

impl BigUint {
    /// The value zero.
    pub fn zero() -> Self {
        Self(Inner::zero())
    }

    /// True if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Construct from a big-endian byte string. An empty slice is zero.
    pub fn from_be_bytes(bytes: &[u8]) -> Self {
        Self(Inner::from_bytes_be(bytes))
    }

    /// Serialize to a big-endian byte string of at least `min_len` bytes,
    /// left-padded with zero bytes.
    pub fn to_be_bytes_min_len(&self, min_len: usize) -> Vec<u8> {
        let mut bytes = self.0.to_bytes_be();
        if bytes.len() < min_len {
            let mut padded = vec![0u8; min_len - bytes.len()];
            padded.append(&mut bytes);
            padded
        } else {
            bytes
        }
    }

    /// Number of bits required to represent this value (`0` for zero).
    pub fn bit_length(&self) -> u64 {
        self.0.bits()
    }

    /// `self + other`.
    pub fn add(&self, other: &Self) -> Self {
        Self(&self.0 + &other.0)
    }

    /// `self - other`. The caller guarantees `self >= other`; violating this
    /// is a programmer error and panics, matching the non-negativity
    /// contract in spec.md's `4.1 BigInt` section.
    pub fn sub(&self, other: &Self) -> Self {
        assert!(
            self.0 >= other.0,
            "BigUint::sub underflow: {} - {}",
            self.0,
            other.0
        );
        Self(&self.0 - &other.0)
    }

    /// `self << bits`.
    pub fn shl(&self, bits: u64) -> Self {
        Self(&self.0 << bits)
    }

    /// `self >> bits`.
    pub fn shr(&self, bits: u64) -> Self {
        Self(&self.0 >> bits)
    }

    /// Returns the low `keep_low_bits` bits as a new value, together with
    /// the remaining high bits.
    ///
    /// `peel_off(keep_low_bits, C)` returns `(high, low)` with
    /// `C = (high << keep_low_bits) | low`, `0 <= low < 2^keep_low_bits`.
    pub fn peel_off(&self, keep_low_bits: u64) -> (Self, Self) {
        let high = self.shr(keep_low_bits);
        let low = if keep_low_bits == 0 {
            Self::zero()
        } else {
            let mask = (&Inner::from(1u8) << keep_low_bits) - Inner::from(1u8);
            Self(&self.0 & mask)
        };
        (high, low)
    }

}

impl From<u64> for BigUint {
    fn from(value: u64) -> Self {
        Self(Inner::from(value))
    }
}

impl From<u32> for BigUint {
    fn from(value: u32) -> Self {
        Self(Inner::from(value))
    }
}

impl fmt::Display for BigUint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Add for &BigUint {
    type Output = BigUint;

    fn add(self, rhs: &BigUint) -> BigUint {
        BigUint::add(self, rhs)
    }
}

impl Sub for &BigUint {
    type Output = BigUint;

    fn sub(self, rhs: &BigUint) -> BigUint {
        BigUint::sub(self, rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_bytes() {
        let value = BigUint::from_be_bytes(&[0x01, 0x23, 0x45]);
        assert_eq!(value.to_be_bytes_min_len(3), vec![0x01, 0x23, 0x45]);
        assert_eq!(
            value.to_be_bytes_min_len(5),
            vec![0x00, 0x00, 0x01, 0x23, 0x45]
        );
    }

    #[test]
    fn peel_off_matches_definition() {
        let value = BigUint::from(0b1011_0110u64);
        let (high, low) = value.peel_off(4);
        assert_eq!(low, BigUint::from(0b0110u64));
        assert_eq!(high, BigUint::from(0b1011u64));
        assert_eq!(high.shl(4).add(&low), value);
    }

    #[test]
    fn peel_off_zero_keep_bits() {
        let value = BigUint::from(42u64);
        let (high, low) = value.peel_off(0);
        assert_eq!(low, BigUint::zero());
        assert_eq!(high, value);
    }

    #[test]
    fn bit_length_of_zero_is_zero() {
        assert_eq!(BigUint::zero().bit_length(), 0);
        assert_eq!(BigUint::from(1u64).bit_length(), 1);
        assert_eq!(BigUint::from(16u64).bit_length(), 5);
    }

    #[test]
    #[should_panic(expected = "underflow")]
    fn sub_underflow_panics() {
        let _ = BigUint::from(1u64).sub(&BigUint::from(2u64));
    }

    #[test]
    fn ordering_is_numeric() {
        assert!(BigUint::from(2u64) > BigUint::from(1u64));
        assert!(BigUint::from(1u64) < BigUint::from(2u64));
        assert_eq!(BigUint::from(5u64), BigUint::from(5u64));
    }
}
