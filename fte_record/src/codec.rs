//! Record-layer framing: capacity negotiation, the AE tail, and the
//! encrypted covertext header (spec.md §4.3).

use crate::{
    error::{
        DecodeReason,
        Error,
    },
    header::{
        fresh_padding,
        AeadHeader,
    },
};
use fte_bigint::BigUint;
use fte_language::Language;
use std::sync::Arc;

/// Per-record-layer configuration (spec.md §6's `runtime.fte.record_layer`).
#[derive(Debug, Clone, Copy)]
pub struct RecordConfig {
    /// Upper bound on the AE tail's byte length; a decoded header claiming
    /// more is treated as corrupt rather than trusted.
    pub max_cell_size: usize,
}

/// Encodes and decodes records against one [`Language`], using `H` as the
/// header permutation. Holds one keyed `H` instance for its whole lifetime.
pub struct Codec<H> {
    language: Arc<Language>,
    header: H,
    config: RecordConfig,
}

impl<H: AeadHeader> Codec<H> {
    pub fn new(language: Arc<Language>, header: H, config: RecordConfig) -> Self {
        Self {
            language,
            header,
            config,
        }
    }

    /// Encode `payload` (an `msb`-bit non-negative integer) into a record.
    ///
    /// Returns `(record_bytes, bits_encoded, remainder)`. `remainder` is
    /// zero whenever every bit of `payload` was carried either in the body
    /// or the AE tail; it is the discarded high bits of `payload` when the
    /// language forbids an AE tail and `msb` exceeds capacity, per spec.md
    /// §9's Open Question (resolved in DESIGN.md: such inputs are not
    /// rejected, the caller must resubmit `remainder`).
    pub fn encode(
        &self,
        msb: u64,
        payload: BigUint,
        _partition: &str,
    ) -> Result<(Vec<u8>, u64, BigUint), Error> {
        let cap = self.capacity_bits();
        let using_tail = msb > cap && self.language.allow_ae_bits();

        let (high, low) = payload.peel_off(cap);
        let tail_bits = if using_tail { msb - cap } else { 0 };
        let remainder = if using_tail {
            BigUint::zero()
        } else {
            high.clone()
        };
        let bits_encoded = if using_tail { msb } else { cap };

        let tail_byte_len = ((tail_bits + 7) / 8) as usize;
        let tail_bytes = if tail_bits == 0 {
            Vec::new()
        } else {
            high.to_be_bytes_min_len(tail_byte_len)
        };

        let mut plaintext = [0u8; 16];
        plaintext[.. 8].copy_from_slice(&fresh_padding());
        plaintext[8 ..].copy_from_slice(&tail_bits.to_be_bytes());
        let ciphertext = self.header.encrypt_header(plaintext);
        let h = BigUint::from_be_bytes(&ciphertext);

        let folded = h.shl(cap).add(&low);
        let mut covertext = self.language.unrank(folded)?;
        if covertext.len() != self.language.mtu() {
            return Err(Error::InvalidInput(format!(
                "language produced a {}-byte word, expected exactly mtu ({}); variable-length \
                 languages used as record carriers must accept only mtu-length words for every \
                 value actually unranked",
                covertext.len(),
                self.language.mtu()
            )));
        }

        covertext.extend_from_slice(&tail_bytes);
        Ok((covertext, bits_encoded, remainder))
    }

    /// Recover `(bits_decoded, payload, leftover)` from a buffer that begins
    /// with a record. `leftover` is whatever trailing bytes follow the
    /// record in `x`.
    pub fn decode(&self, x: &[u8], _partition: &str) -> Result<(u64, BigUint, Vec<u8>), Error> {
        let mtu = self.language.mtu();
        if x.len() < mtu {
            log::warn!("decode failure: buffer shorter than mtu ({} < {mtu})", x.len());
            return Err(Error::DecodeFailure(None));
        }

        let c_prime = self.language.rank(&x[.. mtu]).map_err(|_| {
            log::warn!("decode failure: first {mtu} bytes did not rank to a valid word");
            Error::DecodeFailure(Some(DecodeReason::Rank))
        })?;

        let cap = self.capacity_bits();
        let (h, low) = c_prime.peel_off(cap);
        let header_bytes = h.to_be_bytes_min_len(16);
        if header_bytes.len() != 16 {
            log::warn!("decode failure: header did not round-trip to 16 bytes");
            return Err(Error::DecodeFailure(Some(DecodeReason::Header)));
        }
        let mut ciphertext = [0u8; 16];
        ciphertext.copy_from_slice(&header_bytes);
        let plaintext = self.header.decrypt_header(ciphertext);

        let mut tail_bits_buf = [0u8; 8];
        tail_bits_buf.copy_from_slice(&plaintext[8 ..]);
        let tail_bits = u64::from_be_bytes(tail_bits_buf);
        let tail_byte_len = ((tail_bits + 7) / 8) as usize;
        if tail_byte_len > self.config.max_cell_size {
            log::warn!(
                "decode failure: declared tail length {tail_byte_len} exceeds max_cell_size {}",
                self.config.max_cell_size
            );
            return Err(Error::DecodeFailure(Some(DecodeReason::Header)));
        }
        if x.len() < mtu + tail_byte_len {
            log::warn!(
                "decode failure: buffer too short for declared tail ({} < {})",
                x.len(),
                mtu + tail_byte_len
            );
            return Err(Error::DecodeFailure(Some(DecodeReason::AeBytes)));
        }

        let payload = if tail_bits == 0 {
            low
        } else {
            let tail_value = BigUint::from_be_bytes(&x[mtu .. mtu + tail_byte_len]);
            tail_value.shl(cap).add(&low)
        };

        let bits_decoded = cap + tail_bits;
        let leftover = x[mtu + tail_byte_len ..].to_vec();
        Ok((bits_decoded, payload, leftover))
    }

    /// The total on-wire length of the record at the start of `x`, without
    /// reconstructing its payload.
    pub fn get_msg_len(&self, x: &[u8], _partition: &str) -> Result<usize, Error> {
        let mtu = self.language.mtu();
        if x.len() < mtu {
            log::warn!("decode failure: buffer shorter than mtu ({} < {mtu})", x.len());
            return Err(Error::DecodeFailure(None));
        }

        let c_prime = self.language.rank(&x[.. mtu]).map_err(|_| {
            log::warn!("decode failure: first {mtu} bytes did not rank to a valid word");
            Error::DecodeFailure(Some(DecodeReason::Rank))
        })?;

        let cap = self.capacity_bits();
        let (h, _low) = c_prime.peel_off(cap);
        let header_bytes = h.to_be_bytes_min_len(16);
        if header_bytes.len() != 16 {
            log::warn!("decode failure: header did not round-trip to 16 bytes");
            return Err(Error::DecodeFailure(Some(DecodeReason::Header)));
        }
        let mut ciphertext = [0u8; 16];
        ciphertext.copy_from_slice(&header_bytes);
        let plaintext = self.header.decrypt_header(ciphertext);

        let mut tail_bits_buf = [0u8; 8];
        tail_bits_buf.copy_from_slice(&plaintext[8 ..]);
        let tail_bits = u64::from_be_bytes(tail_bits_buf);
        let tail_byte_len = ((tail_bits + 7) / 8) as usize;
        if tail_byte_len > self.config.max_cell_size {
            log::warn!(
                "decode failure: declared tail length {tail_byte_len} exceeds max_cell_size {}",
                self.config.max_cell_size
            );
            return Err(Error::DecodeFailure(Some(DecodeReason::Header)));
        }

        Ok(mtu + tail_byte_len)
    }

    /// The underlying language's maximum word length.
    pub fn mtu(&self) -> usize {
        self.language.mtu()
    }

    fn capacity_bits(&self) -> u64 {
        let cap = self.language.capacity();
        debug_assert!(cap >= 1, "Language::build guarantees capacity >= 1");
        cap as u64
    }
}
