//! A predictor indexed by per-branch ("local") history.

use crate::Outcome;
use crate::error::ConfigError;
use crate::hash::*;
use crate::history::ShiftRegister;
use crate::predictor::*;

/// Configuration for a [`LocalHistoryPredictor`].
#[derive(Clone, Copy, Debug)]
pub struct LocalHistoryConfig {
    /// log2 of the number of counters
    pub index_bits: usize,

    /// Length of each local history register
    pub history_bits: usize,

    /// log2 of the number of local history registers
    pub history_index_bits: usize,

    /// Function combining the program counter and local history
    pub hash: HashFn,

    /// Parameters for the saturating counters
    pub ctr: SaturatingCounterConfig,
}
impl LocalHistoryConfig {
    pub fn new(index_bits: usize, history_bits: usize,
        history_index_bits: usize, hash: HashFn) -> Self
    {
        Self {
            index_bits,
            history_bits,
            history_index_bits,
            hash,
            ctr: SaturatingCounterConfig::new(2),
        }
    }

    pub fn with_counter(self, ctr: SaturatingCounterConfig) -> Self {
        Self { ctr, ..self }
    }

    /// Get the number of storage bits.
    pub fn storage_bits(&self) -> usize {
        CounterTable::storage_bits_for(self.index_bits, self.ctr)
            + (1 << self.history_index_bits) * self.history_bits
    }

    /// Use this configuration to create a new [`LocalHistoryPredictor`].
    pub fn build(self) -> Result<LocalHistoryPredictor, ConfigError> {
        let name = "LocalHistoryPredictor";
        table_entries(name, self.index_bits)?;
        let num_hist = table_entries(name, self.history_index_bits)?;
        check_history_bits(name, self.history_bits)?;
        self.ctr.validate(name)?;
        check_budget(name, self.storage_bits())?;
        Ok(LocalHistoryPredictor {
            table: CounterTable::new(self.index_bits, self.ctr),
            hist: vec![ShiftRegister::new(self.history_bits); num_hist],
            cfg: self,
        })
    }
}

/// A table of saturating counters indexed by some hash of the program
/// counter and a history register selected by the program counter.
pub struct LocalHistoryPredictor {
    cfg: LocalHistoryConfig,
    table: CounterTable,
    hist: Vec<ShiftRegister>,
}
impl LocalHistoryPredictor {
    fn history_index(&self, pc: usize) -> usize {
        truncate(pc, self.cfg.history_index_bits)
    }

    fn index(&self, pc: usize) -> usize {
        let hist = self.hist[self.history_index(pc)].val();
        truncate((self.cfg.hash)(pc, hist), self.cfg.index_bits)
    }

    /// Return the local history associated with the program counter.
    pub fn history(&self, pc: usize) -> usize {
        self.hist[self.history_index(pc)].val()
    }
}
impl BranchPredictor for LocalHistoryPredictor {
    fn name(&self) -> &'static str { "LocalHistoryPredictor" }

    fn predict(&self, pc: usize) -> Outcome {
        self.table.predict(self.index(pc))
    }

    fn update(&mut self, pc: usize, _predicted: Outcome, actual: Outcome) {
        let idx = self.index(pc);
        self.table.update(idx, actual);
        let hidx = self.history_index(pc);
        self.hist[hidx].shift_in(actual);
    }

    fn storage_bits(&self) -> usize {
        self.table.storage_bits()
            + self.hist.iter().map(|h| h.storage_bits()).sum::<usize>()
    }
}
