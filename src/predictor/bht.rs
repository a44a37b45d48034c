//! Branch history tables (BHT) indexed directly by the program counter.

use crate::Outcome;
use crate::error::ConfigError;
use crate::hash::truncate;
use crate::predictor::*;

/// Configuration for a [`BhtPredictor`].
#[derive(Clone, Copy, Debug)]
pub struct BhtConfig {
    /// log2 of the number of entries
    pub index_bits: usize,

    /// Parameters for the saturating counters
    pub ctr: SaturatingCounterConfig,
}
impl BhtConfig {
    pub fn new(index_bits: usize) -> Self {
        Self { index_bits, ctr: SaturatingCounterConfig::new(2) }
    }

    /// Get the number of storage bits.
    pub fn storage_bits(&self) -> usize {
        CounterTable::storage_bits_for(self.index_bits, self.ctr)
    }

    /// Use this configuration to create a new [`BhtPredictor`].
    pub fn build(self) -> Result<BhtPredictor, ConfigError> {
        table_entries("BhtPredictor", self.index_bits)?;
        self.ctr.validate("BhtPredictor")?;
        check_budget("BhtPredictor", self.storage_bits())?;
        Ok(BhtPredictor {
            table: CounterTable::new(self.index_bits, self.ctr),
            cfg: self,
        })
    }
}

/// A table of saturating counters indexed by the low bits of the program
/// counter.
pub struct BhtPredictor {
    cfg: BhtConfig,
    table: CounterTable,
}
impl BhtPredictor {
    fn index(&self, pc: usize) -> usize {
        truncate(pc, self.cfg.index_bits)
    }
}
impl BranchPredictor for BhtPredictor {
    fn name(&self) -> &'static str { "BhtPredictor" }

    fn predict(&self, pc: usize) -> Outcome {
        self.table.predict(self.index(pc))
    }

    fn update(&mut self, pc: usize, _predicted: Outcome, actual: Outcome) {
        let idx = self.index(pc);
        self.table.update(idx, actual);
    }

    fn storage_bits(&self) -> usize { self.table.storage_bits() }
}


/// Configuration for a [`BhtHysteresisPredictor`].
#[derive(Clone, Copy, Debug)]
pub struct BhtHysteresisConfig {
    /// log2 of the number of entries
    pub index_bits: usize,

    /// Number of consecutive entries sharing one hysteresis bit
    pub hysteresis_group: usize,
}
impl BhtHysteresisConfig {
    pub fn new(index_bits: usize, hysteresis_group: usize) -> Self {
        Self { index_bits, hysteresis_group }
    }

    fn counters(&self) -> SharedHysteresisConfig {
        SharedHysteresisConfig::new(self.index_bits, 2, self.hysteresis_group)
    }

    /// Get the number of storage bits.
    pub fn storage_bits(&self) -> usize {
        self.counters().storage_bits()
    }

    /// Use this configuration to create a new [`BhtHysteresisPredictor`].
    pub fn build(self) -> Result<BhtHysteresisPredictor, ConfigError> {
        let counters = self.counters();
        counters.validate("BhtHysteresisPredictor")?;
        check_budget("BhtHysteresisPredictor", self.storage_bits())?;
        Ok(BhtHysteresisPredictor {
            cfg: self,
            data: counters.build(),
        })
    }
}

/// A branch history table with one direction bit per entry, where groups of
/// entries share a single hysteresis bit.
pub struct BhtHysteresisPredictor {
    cfg: BhtHysteresisConfig,
    data: SharedHysteresisCounters,
}
impl BhtHysteresisPredictor {
    fn index(&self, pc: usize) -> usize {
        truncate(pc, self.cfg.index_bits)
    }
}
impl BranchPredictor for BhtHysteresisPredictor {
    fn name(&self) -> &'static str { "BhtHysteresisPredictor" }

    fn predict(&self, pc: usize) -> Outcome {
        self.data.predict(self.index(pc))
    }

    fn update(&mut self, pc: usize, _predicted: Outcome, actual: Outcome) {
        let idx = self.index(pc);
        self.data.update(idx, actual);
    }

    fn storage_bits(&self) -> usize { self.data.storage_bits() }
}
