//! Deterministic sample-data generator.
//!
//! The travel catalog returns plausible but fabricated data. Values are
//! derived from a SHA-256 counter stream keyed by the call arguments, so the
//! same call always yields the same answer.

use sha2::{Digest, Sha256};

/// Pseudo-random stream seeded from string parts.
#[derive(Debug, Clone)]
pub struct SampleRng {
    seed: Vec<u8>,
    counter: u64,
}

impl SampleRng {
    /// Creates a stream keyed by `parts`.
    #[must_use]
    pub fn seeded(parts: &[&str]) -> Self {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part.as_bytes());
            hasher.update([0_u8]);
        }
        Self {
            seed: hasher.finalize().to_vec(),
            counter: 0,
        }
    }

    /// Returns the next 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        let mut hasher = Sha256::new();
        hasher.update(&self.seed);
        hasher.update(self.counter.to_string().as_bytes());
        self.counter = self.counter.saturating_add(1);
        hasher
            .finalize()
            .iter()
            .take(8)
            .fold(0_u64, |acc, byte| (acc << 8) | u64::from(*byte))
    }

    /// Returns a value in `0..bound`, or `0` when `bound` is zero.
    pub fn below(&mut self, bound: u64) -> u64 {
        self.next_u64().checked_rem(bound).unwrap_or(0)
    }

    /// Returns a value in `low..low + span`.
    pub fn between(&mut self, low: u64, span: u64) -> u64 {
        low.saturating_add(self.below(span))
    }

    /// Returns `true` with the given percentage probability.
    pub fn chance(&mut self, percent: u64) -> bool {
        self.below(100) < percent
    }

    /// Picks one element of `items`.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        let length = u64::try_from(items.len()).ok()?;
        let position = usize::try_from(self.below(length)).ok()?;
        items.get(position)
    }

    /// Returns a one-decimal rating between 3.0 and 4.9 rendered as text.
    pub fn rating(&mut self) -> String {
        let tenths = self.between(30, 20);
        let whole = tenths.checked_div(10).unwrap_or(0);
        let fraction = tenths.checked_rem(10).unwrap_or(0);
        format!("{whole}.{fraction}")
    }
}
