//! Types for implementing a table of predictors.

use crate::Outcome;
use crate::predictor::*;

/// Interface to a table of predictors.
pub trait PredictorTable {
    /// The type of input to the table used to form an index.
    type Input;

    /// The type of entry in the table.
    type Entry;

    /// Returns the number of entries in the table.
    fn size(&self) -> usize;

    /// Given some input, return the corresponding index into the table.
    fn get_index(&self, input: Self::Input) -> usize;

    /// Returns a reference to an entry in the table.
    fn get_entry(&self, idx: usize) -> &Self::Entry;

    /// Returns a mutable reference to an entry in the table.
    fn get_entry_mut(&mut self, idx: usize) -> &mut Self::Entry;

    /// Returns a bitmask corresponding to the number of entries in the table.
    fn index_mask(&self) -> usize {
        assert!(self.size().is_power_of_two());
        self.size() - 1
    }
}

/// Interface to a *tagged* table of predictors.
pub trait TaggedPredictorTable: PredictorTable {
    fn get_tag(&self, input: Self::Input) -> usize;
}


/// A table of [`SaturatingCounter`]s.
///
/// The input is some value which has already been hashed; only the low bits
/// are used to select an entry.
#[derive(Clone, Debug)]
pub struct CounterTable {
    /// Saturating counter configuration
    cfg: SaturatingCounterConfig,

    /// Table of counters
    data: Vec<SaturatingCounter>,
}
impl CounterTable {
    /// Get the number of storage bits for a table with `2^index_bits`
    /// counters.
    pub fn storage_bits_for(index_bits: usize, cfg: SaturatingCounterConfig)
        -> usize
    {
        (1 << index_bits) * cfg.storage_bits()
    }

    pub fn new(index_bits: usize, cfg: SaturatingCounterConfig) -> Self {
        Self {
            cfg,
            data: vec![cfg.build(); 1 << index_bits],
        }
    }

    pub fn storage_bits(&self) -> usize {
        self.data.len() * self.cfg.storage_bits()
    }

    /// Return the prediction from the entry selected by `input`.
    pub fn predict(&self, input: usize) -> Outcome {
        let idx = self.get_index(input);
        self.get_entry(idx).predict()
    }

    /// Train the entry selected by `input` toward `outcome`.
    pub fn update(&mut self, input: usize, outcome: Outcome) {
        let idx = self.get_index(input);
        self.get_entry_mut(idx).update(outcome);
    }
}

impl PredictorTable for CounterTable {
    type Input = usize;
    type Entry = SaturatingCounter;

    fn size(&self) -> usize { self.data.len() }

    fn get_index(&self, input: usize) -> usize {
        input & self.index_mask()
    }

    fn get_entry(&self, idx: usize) -> &SaturatingCounter {
        let index = idx & self.index_mask();
        &self.data[index]
    }

    fn get_entry_mut(&mut self, idx: usize) -> &mut SaturatingCounter {
        let index = idx & self.index_mask();
        &mut self.data[index]
    }
}
