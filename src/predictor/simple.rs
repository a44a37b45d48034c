
use crate::Outcome;
use crate::predictor::BranchPredictor;

/// A simple predictor with no state: always predict 'not-taken'.
///
/// This is the default behavior of every [`BranchPredictor`].
pub struct NotTakenPredictor;
impl BranchPredictor for NotTakenPredictor {
    fn name(&self) -> &'static str { "NotTakenPredictor" }
}

/// A simple predictor with no state: always predict 'taken'.
pub struct TakenPredictor;
impl BranchPredictor for TakenPredictor {
    fn name(&self) -> &'static str { "TakenPredictor" }
    fn predict(&self, _pc: usize) -> Outcome { Outcome::T }
}
