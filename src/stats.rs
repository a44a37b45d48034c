//! Counters for recording how well a predictor performs.

use std::collections::BTreeMap;
use std::io::{self, Write};

use bitvec::prelude::*;
use itertools::*;

use crate::Outcome;

/// Global prediction counts, split by the predicted direction and whether
/// the prediction was correct.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PredictionStats {
    pub taken_correct: usize,
    pub taken_incorrect: usize,
    pub not_taken_correct: usize,
    pub not_taken_incorrect: usize,
}
impl PredictionStats {
    pub fn new() -> Self { Self::default() }

    /// Record a single prediction. Counts are split by the predicted
    /// direction.
    pub fn record(&mut self, predicted: Outcome, actual: Outcome) {
        match (predicted, predicted == actual) {
            (Outcome::T, true)  => self.taken_correct += 1,
            (Outcome::T, false) => self.taken_incorrect += 1,
            (Outcome::N, true)  => self.not_taken_correct += 1,
            (Outcome::N, false) => self.not_taken_incorrect += 1,
        }
    }

    pub fn hits(&self) -> usize {
        self.taken_correct + self.not_taken_correct
    }

    pub fn misses(&self) -> usize {
        self.taken_incorrect + self.not_taken_incorrect
    }

    pub fn total(&self) -> usize { self.hits() + self.misses() }

    /// Fraction of correct predictions, or zero when nothing was recorded.
    pub fn hit_rate(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            n => self.hits() as f64 / n as f64,
        }
    }
}

impl std::fmt::Display for PredictionStats {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f,
            "takenCorrect {} takenIncorrect {} notTakenCorrect {} notTakenIncorrect {}",
            self.taken_correct, self.taken_incorrect,
            self.not_taken_correct, self.not_taken_incorrect)
    }
}

/// Write the result line for a finished run.
pub fn write_results<W: Write>(mut w: W, stats: &PredictionStats)
    -> io::Result<()>
{
    writeln!(w, "{}", stats)?;
    w.flush()
}

/// Per-branch counts.
#[derive(Clone, Debug, Default)]
pub struct BranchData {
    /// Number of times this branch occurred
    pub occ: usize,

    /// Number of correct predictions
    pub hits: usize,

    /// Number of times this branch was taken
    pub taken: usize,

    /// Outcomes for the first [`BranchData::PATTERN_LEN`] occurrences
    pub pat: BitVec,
}
impl BranchData {
    pub const PATTERN_LEN: usize = 64;

    pub fn hit_rate(&self) -> f64 {
        match self.occ {
            0 => 0.0,
            n => self.hits as f64 / n as f64,
        }
    }

    pub fn misses(&self) -> usize { self.occ - self.hits }

    fn record(&mut self, predicted: Outcome, actual: Outcome) {
        self.occ += 1;
        if predicted == actual { self.hits += 1; }
        if actual.is_taken() { self.taken += 1; }
        if self.pat.len() < Self::PATTERN_LEN {
            self.pat.push(actual.into());
        }
    }
}

/// Global and per-branch statistics.
#[derive(Clone, Debug, Default)]
pub struct BranchStats {
    pub global: PredictionStats,
    pub data: BTreeMap<usize, BranchData>,
}
impl BranchStats {
    pub fn new() -> Self { Self::default() }

    /// Record a prediction for the branch at `pc`.
    pub fn update(&mut self, pc: usize, predicted: Outcome, actual: Outcome) {
        self.global.record(predicted, actual);
        self.get_mut(pc).record(predicted, actual);
    }

    pub fn get(&self, pc: usize) -> Option<&BranchData> {
        self.data.get(&pc)
    }

    pub fn get_mut(&mut self, pc: usize) -> &mut BranchData {
        self.data.entry(pc).or_default()
    }

    pub fn num_unique_branches(&self) -> usize { self.data.len() }

    /// The `n` most frequent branches, most frequent first.
    pub fn get_common_branches(&self, n: usize) -> Vec<(usize, &BranchData)> {
        self.data.iter()
            .sorted_by(|x, y| y.1.occ.cmp(&x.1.occ).then(x.0.cmp(y.0)))
            .take(n)
            .map(|(pc, d)| (*pc, d))
            .collect()
    }

    /// The `n` branches with the most mispredictions, worst first.
    pub fn get_low_rate_branches(&self, n: usize) -> Vec<(usize, &BranchData)> {
        self.data.iter()
            .filter(|(_, d)| d.misses() > 0)
            .sorted_by(|x, y| {
                y.1.misses().cmp(&x.1.misses()).then(x.0.cmp(y.0))
            })
            .take(n)
            .map(|(pc, d)| (*pc, d))
            .collect()
    }
}
