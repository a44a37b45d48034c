//! Predictors matching repeated patterns in per-branch outcome history.

use crate::Outcome;
use crate::error::ConfigError;
use crate::hash::truncate;
use crate::history::ShiftRegister;
use crate::predictor::*;

/// Configuration for a [`BpatPredictor`].
#[derive(Clone, Copy, Debug)]
pub struct BpatConfig {
    /// Length of the pattern being matched. Each history register holds
    /// twice this many outcomes.
    pub pattern_bits: usize,

    /// log2 of the number of history registers and override counters
    pub index_bits: usize,
}
impl BpatConfig {
    pub fn new(pattern_bits: usize, index_bits: usize) -> Self {
        Self { pattern_bits, index_bits }
    }

    fn ctr(&self) -> SaturatingCounterConfig {
        SaturatingCounterConfig::new(2)
    }

    /// Get the number of storage bits, not counting the alternate predictor.
    pub fn storage_bits(&self) -> usize {
        (1 << self.index_bits) * 2 * self.pattern_bits
            + CounterTable::storage_bits_for(self.index_bits, self.ctr())
    }

    /// Use this configuration to create a new [`BpatPredictor`] falling back
    /// on the provided predictor.
    pub fn build<A: BranchPredictor>(self, alt: A)
        -> Result<BpatPredictor<A>, ConfigError>
    {
        let name = "BpatPredictor";
        let size = table_entries(name, self.index_bits)?;
        check_history_bits(name, 2 * self.pattern_bits)?;
        check_budget(name, self.storage_bits() + alt.storage_bits())?;
        Ok(BpatPredictor {
            hist: vec![ShiftRegister::new(2 * self.pattern_bits); size],
            distrust: CounterTable::new(self.index_bits, self.ctr()),
            alt,
            cfg: self,
        })
    }

    /// Create a new [`BpatGShare`] whose alternate is a gshare predictor.
    pub fn build_gshare(self, index_bits: usize, history_bits: usize)
        -> Result<BpatGShare, ConfigError>
    {
        let alt = GlobalHistoryConfig::gshare(index_bits, history_bits)
            .build()?;
        self.build(alt)
    }
}

/// A pattern-matching predictor falling back on some other predictor.
///
/// Each entry keeps the last `2N` outcomes for the branches mapped onto it.
/// The most-recent `N` outcomes are searched for in older history; when they
/// occurred before, the outcome that followed them is predicted. A per-entry
/// counter learns when the alternate predictor should be used instead.
pub struct BpatPredictor<A: BranchPredictor> {
    cfg: BpatConfig,
    hist: Vec<ShiftRegister>,
    distrust: CounterTable,
    alt: A,
}

/// A [`BpatPredictor`] over any boxed predictor.
pub type NaiveBpat = BpatPredictor<Box<dyn BranchPredictor>>;

/// A [`BpatPredictor`] over a gshare predictor.
pub type BpatGShare = BpatPredictor<GlobalHistoryPredictor>;

impl <A: BranchPredictor> BpatPredictor<A> {
    fn index(&self, pc: usize) -> usize {
        truncate(pc, self.cfg.index_bits)
    }

    /// Look for the most recent repeat of the current pattern and return the
    /// outcome that followed it.
    pub fn pattern_prediction(&self, pc: usize) -> Option<Outcome> {
        let n = self.cfg.pattern_bits;
        let mut haystack = self.hist[self.index(pc)].val();
        let needle = truncate(haystack, n);
        for _ in 0..n {
            let pred = Outcome::from(haystack & 1 != 0);
            haystack >>= 1;
            if truncate(haystack, n) == needle {
                return Some(pred);
            }
        }
        None
    }

    /// Returns 'true' when the pattern match for `pc` is not being used.
    pub fn distrusts_pattern(&self, pc: usize) -> bool {
        self.distrust.predict(self.index(pc)).is_taken()
    }

    pub fn alternate(&self) -> &A { &self.alt }
}

impl <A: BranchPredictor> BranchPredictor for BpatPredictor<A> {
    fn name(&self) -> &'static str { "BpatPredictor" }

    fn predict(&self, pc: usize) -> Outcome {
        match self.pattern_prediction(pc) {
            Some(pred) if !self.distrusts_pattern(pc) => pred,
            _ => self.alt.predict(pc),
        }
    }

    fn update(&mut self, pc: usize, _predicted: Outcome, actual: Outcome) {
        let idx = self.index(pc);
        let alt_pred = self.alt.predict(pc);
        self.alt.update(pc, alt_pred, actual);

        match self.pattern_prediction(pc) {
            Some(pred) => {
                if pred == actual && alt_pred != actual {
                    self.distrust.update(idx, Outcome::N);
                } else if pred != actual && alt_pred == actual {
                    self.distrust.update(idx, Outcome::T);
                }
            },
            None => {
                if alt_pred == actual {
                    self.distrust.update(idx, Outcome::T);
                }
            },
        }

        self.hist[idx].shift_in(actual);
    }

    fn storage_bits(&self) -> usize {
        self.alt.storage_bits()
            + self.hist.iter().map(|h| h.storage_bits()).sum::<usize>()
            + self.distrust.storage_bits()
    }
}
