//! Drives a predictor over a sequence of branches.

use crate::{ BranchRecord, Outcome };
use crate::predictor::BranchPredictor;
use crate::stats::{ BranchStats, PredictionStats };

/// Owns a predictor and records how well it does.
pub struct Simulator<P: BranchPredictor> {
    predictor: P,
    stats: BranchStats,
}
impl <P: BranchPredictor> Simulator<P> {
    pub fn new(predictor: P) -> Self {
        log::info!("{} uses {} bits of storage",
            predictor.name(), predictor.storage_bits());
        Self { predictor, stats: BranchStats::new() }
    }

    /// Predict the branch at `pc`, train the predictor with the resolved
    /// outcome, and record the result. Returns the prediction.
    pub fn handle_branch(&mut self, pc: usize, actual: Outcome) -> Outcome {
        let predicted = self.predictor.predict(pc);
        self.predictor.update(pc, predicted, actual);
        self.stats.update(pc, predicted, actual);
        predicted
    }

    /// Handle each record in order.
    pub fn run<'a, I>(&mut self, records: I)
        where I: IntoIterator<Item = &'a BranchRecord>
    {
        for r in records {
            self.handle_branch(r.pc, r.outcome);
        }
    }

    pub fn stats(&self) -> &PredictionStats { &self.stats.global }

    pub fn branch_stats(&self) -> &BranchStats { &self.stats }

    pub fn predictor(&self) -> &P { &self.predictor }

    pub fn into_predictor(self) -> P { self.predictor }

    pub fn storage_bits(&self) -> usize { self.predictor.storage_bits() }
}
