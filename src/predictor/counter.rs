//! Implementation of saturating counters.

use bitvec::prelude::*;

use crate::Outcome;
use crate::error::ConfigError;
use crate::predictor::{ StatefulPredictor, table_entries };

/// The highest value predicting 'not-taken' for an 'n'-bit counter.
/// Widths with no such value (zero, or too wide to shift) give 0 and are
/// rejected later by `validate()`.
const fn weakly_not_taken(bits: usize) -> usize {
    if bits == 0 || bits >= usize::BITS as usize {
        return 0;
    }
    (1 << bits) / 2 - 1
}

/// Configuration for building a [`SaturatingCounter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaturatingCounterConfig {
    /// Width of the counter
    pub bits: usize,

    /// Value of the counter after a reset
    pub init: usize,
}
impl SaturatingCounterConfig {
    /// The widest supported counter.
    pub const MAX_BITS: usize = usize::BITS as usize - 1;

    /// An 'n'-bit counter starting at the weakly not-taken midpoint.
    pub const fn new(bits: usize) -> Self {
        Self { bits, init: weakly_not_taken(bits) }
    }

    /// Use some other reset value.
    pub const fn with_init(self, init: usize) -> Self {
        Self { bits: self.bits, init }
    }

    pub fn max(&self) -> usize { (1 << self.bits) - 1 }

    pub fn storage_bits(&self) -> usize { self.bits }

    pub fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        if self.bits == 0 || self.bits > Self::MAX_BITS {
            return Err(ConfigError::InvalidGeometry {
                name,
                reason: format!("{}-bit counter", self.bits),
            });
        }
        if self.init > self.max() {
            return Err(ConfigError::InvalidGeometry {
                name,
                reason: format!("counter init {} exceeds {}", self.init, self.max()),
            });
        }
        Ok(())
    }

    pub fn build(self) -> SaturatingCounter {
        SaturatingCounter {
            cfg: self,
            val: self.init,
        }
    }
}
impl Default for SaturatingCounterConfig {
    fn default() -> Self { Self::new(2) }
}

/// An N-bit saturating counter used to follow the behavior of a branch.
#[derive(Clone, Copy, Debug)]
pub struct SaturatingCounter {
    cfg: SaturatingCounterConfig,
    val: usize,
}
impl SaturatingCounter {
    pub fn increment(&mut self) {
        if self.val < self.cfg.max() {
            self.val += 1;
        }
    }

    pub fn decrement(&mut self) {
        self.val = self.val.saturating_sub(1);
    }

    pub fn val(&self) -> usize { self.val }

    pub fn storage_bits(&self) -> usize { self.cfg.storage_bits() }

    /// Returns 'true' when the counter is above its midpoint.
    pub fn is_taken(&self) -> bool {
        self.val > (1 << self.cfg.bits) / 2 - 1
    }
}

impl StatefulPredictor for SaturatingCounter {
    fn name(&self) -> &'static str { "SaturatingCounter" }
    fn predict(&self) -> Outcome { self.is_taken().into() }
    fn reset(&mut self) {
        self.val = self.cfg.init;
    }
    fn update(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::T => self.increment(),
            Outcome::N => self.decrement(),
        }
    }
}


/// Configuration for building a set of [`SharedHysteresisCounters`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SharedHysteresisConfig {
    /// log2 of the number of counters
    pub index_bits: usize,

    /// Width of each logical counter (direction bits plus hysteresis)
    pub bits: usize,

    /// Number of consecutive counters sharing a single hysteresis bit
    pub group: usize,

    /// Reset value for each logical counter
    pub init: usize,
}
impl SharedHysteresisConfig {
    pub const fn new(index_bits: usize, bits: usize, group: usize) -> Self {
        Self { index_bits, bits, group, init: weakly_not_taken(bits) }
    }

    /// Number of hysteresis bits.
    pub fn num_groups(&self) -> usize {
        (1 << self.index_bits) / self.group
    }

    /// Get the number of storage bits.
    pub fn storage_bits(&self) -> usize {
        (1 << self.index_bits) * self.bits.saturating_sub(1) + self.num_groups()
    }

    pub fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        let size = table_entries(name, self.index_bits)?;
        if self.bits < 2 || self.bits > SaturatingCounterConfig::MAX_BITS {
            return Err(ConfigError::InvalidGeometry {
                name,
                reason: format!("{}-bit counter with hysteresis", self.bits),
            });
        }
        if !self.group.is_power_of_two() || self.group > size {
            return Err(ConfigError::InvalidGeometry {
                name,
                reason: format!("hysteresis group of {} over {} entries",
                    self.group, size),
            });
        }
        if self.init >= (1 << self.bits) {
            return Err(ConfigError::InvalidGeometry {
                name,
                reason: format!("counter init {} out of range", self.init),
            });
        }
        Ok(())
    }

    pub fn build(self) -> SharedHysteresisCounters {
        let size = 1 << self.index_bits;
        let mut res = SharedHysteresisCounters {
            cfg: self,
            val: vec![0; size],
            hyst: bitvec![usize, Lsb0; 0; self.num_groups()],
        };
        for idx in 0..size {
            res.reset(idx);
        }
        res
    }
}

/// A table of saturating counters where groups of entries share the
/// low-order "hysteresis" bit.
///
/// Each entry keeps its own direction bits, so this approximates a table of
/// N-bit counters with `(N - 1) + 1/group` bits per entry.
#[derive(Clone, Debug)]
pub struct SharedHysteresisCounters {
    cfg: SharedHysteresisConfig,
    val: Vec<usize>,
    hyst: BitVec<usize, Lsb0>,
}
impl SharedHysteresisCounters {
    fn max(&self) -> usize { (1 << (self.cfg.bits - 1)) - 1 }

    fn group(&self, idx: usize) -> usize { idx / self.cfg.group }

    /// Number of logical counters.
    pub fn size(&self) -> usize { self.val.len() }

    pub fn storage_bits(&self) -> usize { self.cfg.storage_bits() }

    pub fn increment(&mut self, idx: usize) {
        let g = self.group(idx);
        if !self.hyst[g] {
            self.hyst.set(g, true);
        } else if self.val[idx] < self.max() {
            self.val[idx] += 1;
            self.hyst.set(g, false);
        }
    }

    pub fn decrement(&mut self, idx: usize) {
        let g = self.group(idx);
        if self.hyst[g] {
            self.hyst.set(g, false);
        } else if self.val[idx] > 0 {
            self.val[idx] -= 1;
            self.hyst.set(g, true);
        }
    }

    pub fn reset(&mut self, idx: usize) {
        let g = self.group(idx);
        self.val[idx] = self.cfg.init >> 1;
        self.hyst.set(g, self.cfg.init & 1 != 0);
    }

    /// Direction bits of a single entry.
    pub fn val(&self, idx: usize) -> usize { self.val[idx] }

    /// Hysteresis bit shared by the group containing this entry.
    pub fn hysteresis(&self, idx: usize) -> bool { self.hyst[self.group(idx)] }

    pub fn is_taken(&self, idx: usize) -> bool {
        self.val[idx] > (1 << (self.cfg.bits - 1)) / 2 - 1
    }

    pub fn predict(&self, idx: usize) -> Outcome {
        self.is_taken(idx).into()
    }

    pub fn update(&mut self, idx: usize, outcome: Outcome) {
        match outcome {
            Outcome::T => self.increment(idx),
            Outcome::N => self.decrement(idx),
        }
    }
}
