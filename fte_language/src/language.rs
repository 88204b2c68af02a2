//! The loaded language: precomputed suffix-count table plus rank/unrank.

use crate::{
    dfa::DfaSource,
    error::Error,
};
use fte_bigint::BigUint;
use std::sync::Arc;

/// Configuration for loading a language, read from `languages.regex.<name>.*`
/// by a caller (see spec.md §6); this crate is config-format-agnostic.
#[derive(Debug, Clone, Copy)]
pub struct LanguageSpec {
    /// Maximum word length, the MTU.
    pub mtu: usize,
    /// Restrict the language to words of length exactly `mtu`.
    pub fixed_slice: bool,
    /// Whether the record codec may append an AE tail for this language.
    pub allow_ae_bits: bool,
}

/// A DFA loaded for a fixed maximum word length, with its suffix-count
/// table and derived rank-space parameters. Immutable once built; safe to
/// share across threads without locking.
pub struct Language {
    dfa: Arc<dyn DfaSource + Send + Sync>,
    spec: LanguageSpec,
    /// `table[q][i]` = number of strings of length exactly `i` accepted
    /// starting from state `q`.
    table: Vec<Vec<BigUint>>,
    num_words: BigUint,
    offset: BigUint,
    capacity: i64,
}

impl Language {
    /// Build the suffix-count table and derive `num_words`/`offset`/
    /// `capacity` per spec.md §3/§4.2.
    pub fn build(
        spec: LanguageSpec,
        dfa: Arc<dyn DfaSource + Send + Sync>,
    ) -> Result<Self, Error> {
        let n = spec.mtu;
        let num_states = dfa.num_states();

        // table[q][i], built bottom-up: column 0 is the base case, each
        // later column derived from the one before it.
        let mut table: Vec<Vec<BigUint>> = vec![Vec::with_capacity(n + 1); num_states];
        for q in 0 .. num_states {
            table[q].push(if dfa.is_accepting(q as u32) {
                BigUint::from(1u64)
            } else {
                BigUint::zero()
            });
        }
        for i in 0 .. n {
            let mut next_column = vec![BigUint::zero(); num_states];
            for (q, slot) in next_column.iter_mut().enumerate() {
                let mut sum = BigUint::zero();
                for byte in 0u16 .. 256 {
                    if let Some(next) = dfa.step(q as u32, byte as u8) {
                        sum = sum.add(&table[next as usize][i]);
                    }
                }
                *slot = sum;
            }
            for (q, value) in next_column.into_iter().enumerate() {
                table[q].push(value);
            }
        }

        let q0 = dfa.start_state() as usize;

        let num_words = if spec.fixed_slice {
            table[q0][n].clone()
        } else {
            let mut sum = BigUint::zero();
            for i in 0 ..= n {
                sum = sum.add(&table[q0][i]);
            }
            sum
        };

        if num_words.is_zero() {
            return Err(Error::LanguageIsEmptySet);
        }

        let offset = if spec.fixed_slice {
            let mut sum = BigUint::zero();
            for i in 0 .. n {
                sum = sum.add(&table[q0][i]);
            }
            sum
        } else {
            BigUint::zero()
        };

        // capacity = floor(log2(num_words)) - 128 = bit_length(num_words) - 1 - 128
        let capacity = num_words.bit_length() as i64 - 1 - 128;

        if capacity < 1 {
            return Err(Error::InvalidInput(format!(
                "language capacity {capacity} is below the minimum of 1 bit"
            )));
        }

        Ok(Self {
            dfa,
            spec,
            table,
            num_words,
            offset,
            capacity,
        })
    }

    /// Payload bits available per record.
    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    /// Maximum word length.
    pub fn mtu(&self) -> usize {
        self.spec.mtu
    }

    /// Whether this language only accepts length-`mtu` words.
    pub fn fixed_slice(&self) -> bool {
        self.spec.fixed_slice
    }

    /// Whether the record codec may use an AE tail with this language.
    pub fn allow_ae_bits(&self) -> bool {
        self.spec.allow_ae_bits
    }

    /// Number of words accepted in the configured rank space.
    pub fn num_words(&self) -> &BigUint {
        &self.num_words
    }

    /// Number of DFA states. Exposed for diagnostics, mirroring
    /// `fte.encoder.RegexEncoderObject.getNumStates`.
    pub fn num_states(&self) -> usize {
        self.dfa.num_states()
    }

    /// `table[q][i]`. Exposed for diagnostics, mirroring
    /// `fte.encoder.RegexEncoderObject.getT`.
    pub fn table_cell(&self, state: u32, i: usize) -> &BigUint {
        &self.table[state as usize][i]
    }

    /// The DFA's start state. Exposed for diagnostics, mirroring
    /// `fte.encoder.RegexEncoderObject.getStart`.
    pub fn start_state(&self) -> u32 {
        self.dfa.start_state()
    }

    /// `delta(state, byte)`. Exposed for diagnostics, mirroring
    /// `fte.encoder.RegexEncoderObject.delta`.
    pub fn step(&self, state: u32, byte: u8) -> Option<u32> {
        self.dfa.step(state, byte)
    }

    /// Rank an accepted word to its position in `[0, num_words)`.
    pub fn rank(&self, word: &[u8]) -> Result<BigUint, Error> {
        let r = word.len();
        let mut c = BigUint::zero();
        let q0 = self.dfa.start_state();
        let mut q = q0;

        if !self.spec.fixed_slice {
            for j in 0 .. r {
                c = c.add(&self.table[q0 as usize][j]);
            }
        }

        for (i, &a) in word.iter().enumerate() {
            let remaining = r - i - 1;
            for b in 0u16 .. a as u16 {
                if let Some(next) = self.dfa.step(q, b as u8) {
                    c = c.add(&self.table[next as usize][remaining]);
                }
            }
            q = self.dfa.step(q, a).ok_or(Error::RankFailure)?;
        }

        if !self.dfa.is_accepting(q) {
            return Err(Error::RankFailure);
        }

        if self.spec.fixed_slice {
            c = c.sub(&self.offset);
        }

        Ok(c)
    }

    /// Unrank an integer in `[0, num_words)` to its accepted word.
    pub fn unrank(&self, c: BigUint) -> Result<Vec<u8>, Error> {
        let mut c = if self.spec.fixed_slice {
            c.add(&self.offset)
        } else {
            c
        };

        let n = self.spec.mtu;
        let q0 = self.dfa.start_state();

        let r = if self.spec.fixed_slice {
            n
        } else {
            let mut found = None;
            for j in 0 ..= n {
                let slab = &self.table[q0 as usize][j];
                if &c < slab {
                    found = Some(j);
                    break;
                }
                c = c.sub(slab);
            }
            found.ok_or(Error::UnrankFailure)?
        };

        let mut word = Vec::with_capacity(r);
        let mut q = q0;
        for i in 0 .. r {
            let remaining = r - i - 1;
            let mut chosen = None;
            for b in 0u16 .. 256 {
                if let Some(next) = self.dfa.step(q, b as u8) {
                    let s = &self.table[next as usize][remaining];
                    if &c < s {
                        chosen = Some((b as u8, next));
                        break;
                    }
                    c = c.sub(s);
                }
            }
            let (byte, next) = chosen.ok_or(Error::UnrankFailure)?;
            word.push(byte);
            q = next;
        }

        if !self.dfa.is_accepting(q) {
            return Err(Error::UnrankFailure);
        }

        Ok(word)
    }
}
