//! Random sources.
//!
//! The engine never seeds or owns a global generator. Callers pass a
//! [`RandomSource`] into every roll: any `rand::Rng` in production, or a
//! [`ScriptedRolls`] sequence when the draws must be known in advance.

use rand::Rng;

/// A capability producing uniform integers in an inclusive range.
pub trait RandomSource {
    /// Draw a uniform integer in `low..=high`.
    fn range(&mut self, low: u32, high: u32) -> u32;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn range(&mut self, low: u32, high: u32) -> u32 {
        self.random_range(low..=high)
    }
}

/// A fixed sequence of draws, replayed in order.
///
/// Each value is clamped into the requested range, and the sequence cycles
/// once exhausted. Every requested range is recorded so callers can verify
/// how many draws a roll consumed.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRolls {
    values: Vec<u32>,
    cursor: usize,
    requests: Vec<(u32, u32)>,
}

impl ScriptedRolls {
    /// Create a script from the draws to return, in order.
    pub fn new(values: impl Into<Vec<u32>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
            requests: Vec::new(),
        }
    }

    /// The ranges requested so far, in order.
    pub fn requests(&self) -> &[(u32, u32)] {
        &self.requests
    }

    /// Number of draws taken so far.
    pub fn draws(&self) -> usize {
        self.requests.len()
    }
}

impl RandomSource for ScriptedRolls {
    fn range(&mut self, low: u32, high: u32) -> u32 {
        self.requests.push((low, high));
        if self.values.is_empty() {
            return low;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value.clamp(low, high)
    }
}
