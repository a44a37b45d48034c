//! A predictor indexed by global history.

use crate::Outcome;
use crate::error::ConfigError;
use crate::hash::*;
use crate::history::ShiftRegister;
use crate::predictor::*;

/// Configuration for a [`GlobalHistoryPredictor`].
#[derive(Clone, Copy, Debug)]
pub struct GlobalHistoryConfig {
    /// log2 of the number of counters
    pub index_bits: usize,

    /// Length of global history
    pub history_bits: usize,

    /// Function combining the program counter and global history
    pub hash: HashFn,

    /// Parameters for the saturating counters
    pub ctr: SaturatingCounterConfig,
}
impl GlobalHistoryConfig {
    pub fn new(index_bits: usize, history_bits: usize, hash: HashFn) -> Self {
        Self {
            index_bits,
            history_bits,
            hash,
            ctr: SaturatingCounterConfig::new(2),
        }
    }

    /// The usual "gshare" arrangement: XOR the program counter with global
    /// history.
    pub fn gshare(index_bits: usize, history_bits: usize) -> Self {
        Self::new(index_bits, history_bits, f_xor)
    }

    pub fn with_counter(self, ctr: SaturatingCounterConfig) -> Self {
        Self { ctr, ..self }
    }

    /// Get the number of storage bits.
    pub fn storage_bits(&self) -> usize {
        CounterTable::storage_bits_for(self.index_bits, self.ctr)
            + self.history_bits
    }

    /// Use this configuration to create a new [`GlobalHistoryPredictor`].
    pub fn build(self) -> Result<GlobalHistoryPredictor, ConfigError> {
        table_entries("GlobalHistoryPredictor", self.index_bits)?;
        check_history_bits("GlobalHistoryPredictor", self.history_bits)?;
        self.ctr.validate("GlobalHistoryPredictor")?;
        check_budget("GlobalHistoryPredictor", self.storage_bits())?;
        Ok(GlobalHistoryPredictor {
            table: CounterTable::new(self.index_bits, self.ctr),
            ghr: ShiftRegister::new(self.history_bits),
            cfg: self,
        })
    }
}

/// A table of saturating counters indexed by some hash of the program
/// counter and a global history register.
pub struct GlobalHistoryPredictor {
    cfg: GlobalHistoryConfig,
    table: CounterTable,
    ghr: ShiftRegister,
}
impl GlobalHistoryPredictor {
    fn index(&self, pc: usize) -> usize {
        truncate((self.cfg.hash)(pc, self.ghr.val()), self.cfg.index_bits)
    }

    /// Return the current value of global history.
    pub fn history(&self) -> usize { self.ghr.val() }
}
impl BranchPredictor for GlobalHistoryPredictor {
    fn name(&self) -> &'static str { "GlobalHistoryPredictor" }

    fn predict(&self, pc: usize) -> Outcome {
        self.table.predict(self.index(pc))
    }

    fn update(&mut self, pc: usize, _predicted: Outcome, actual: Outcome) {
        let idx = self.index(pc);
        self.table.update(idx, actual);
        self.ghr.shift_in(actual);
    }

    fn storage_bits(&self) -> usize {
        self.table.storage_bits() + self.ghr.storage_bits()
    }
}
