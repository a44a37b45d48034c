//! Implementations of different branch predictors.

pub mod table;
pub mod simple;
pub mod counter;
pub mod bht;
pub mod global;
pub mod local;
pub mod tournament;
pub mod bpat;
pub mod tage;

pub use table::*;
pub use simple::*;
pub use counter::*;
pub use bht::*;
pub use global::*;
pub use local::*;
pub use tournament::*;
pub use bpat::*;
pub use tage::*;

use crate::Outcome;
use crate::error::ConfigError;

/// The amount of storage [in bits] available to any single predictor.
pub const STORAGE_BUDGET_BITS: usize = 33_792;

/// The widest table index we are willing to allocate for.
pub const MAX_INDEX_BITS: usize = 32;

/// Interface to a predictor with some internal state which is only subject to
/// change by the correct branch outcome.
pub trait StatefulPredictor {
    fn name(&self) -> &'static str;

    /// Reset the internal state of the predictor.
    fn reset(&mut self);

    /// Return the current predicted outcome.
    fn predict(&self) -> Outcome;

    /// Update the internal state of the predictor with the correct outcome.
    fn update(&mut self, outcome: Outcome);
}

/// Interface to a branch direction predictor indexed by program counter.
///
/// For each branch, [`BranchPredictor::predict`] is called once, followed by
/// exactly one call to [`BranchPredictor::update`] for the same program
/// counter value once the outcome is known.
pub trait BranchPredictor {
    fn name(&self) -> &'static str;

    /// Return the predicted outcome for the branch at `pc`.
    /// This must not change any state.
    fn predict(&self, _pc: usize) -> Outcome { Outcome::N }

    /// Train the predictor with the resolved outcome of the branch at `pc`.
    /// `predicted` is the value returned by the preceding call to `predict`.
    fn update(&mut self, _pc: usize, _predicted: Outcome, _actual: Outcome) {}

    /// Return the number of bits of state used by this predictor.
    fn storage_bits(&self) -> usize { 0 }
}

impl <P: BranchPredictor + ?Sized> BranchPredictor for Box<P> {
    fn name(&self) -> &'static str { (**self).name() }
    fn predict(&self, pc: usize) -> Outcome { (**self).predict(pc) }
    fn update(&mut self, pc: usize, predicted: Outcome, actual: Outcome) {
        (**self).update(pc, predicted, actual)
    }
    fn storage_bits(&self) -> usize { (**self).storage_bits() }
}

/// Fail when some predictor needs more storage than the budget allows.
pub fn check_budget(name: &'static str, bits: usize)
    -> Result<(), ConfigError>
{
    log::debug!("{} uses {} storage bits", name, bits);
    if bits > STORAGE_BUDGET_BITS {
        return Err(ConfigError::StorageBudgetExceeded {
            name,
            bits,
            budget: STORAGE_BUDGET_BITS,
        });
    }
    Ok(())
}

/// Return the number of entries in a table indexed by `index_bits` bits.
pub fn table_entries(name: &'static str, index_bits: usize)
    -> Result<usize, ConfigError>
{
    if index_bits > MAX_INDEX_BITS {
        return Err(ConfigError::InvalidGeometry {
            name,
            reason: format!("{}-bit table index", index_bits),
        });
    }
    Ok(1 << index_bits)
}

/// Fail when a history register cannot hold `bits` bits.
pub fn check_history_bits(name: &'static str, bits: usize)
    -> Result<(), ConfigError>
{
    if bits == 0 || bits > crate::ShiftRegister::MAX_LEN {
        return Err(ConfigError::InvalidGeometry {
            name,
            reason: format!("{}-bit history register", bits),
        });
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    struct Silent;
    impl BranchPredictor for Silent {
        fn name(&self) -> &'static str { "Silent" }
    }

    #[test]
    fn default_contract() {
        let mut p: Box<dyn BranchPredictor> = Box::new(Silent);
        assert_eq!(p.predict(0x1000), Outcome::N);
        p.update(0x1000, Outcome::N, Outcome::T);
        assert_eq!(p.predict(0x1000), Outcome::N);
        assert_eq!(p.storage_bits(), 0);
        assert_eq!(p.name(), "Silent");
    }

    #[test]
    fn budget_is_inclusive() {
        assert!(check_budget("p", STORAGE_BUDGET_BITS).is_ok());
        assert_eq!(check_budget("p", STORAGE_BUDGET_BITS + 1),
            Err(ConfigError::StorageBudgetExceeded {
                name: "p",
                bits: STORAGE_BUDGET_BITS + 1,
                budget: STORAGE_BUDGET_BITS,
            })
        );
    }

    #[test]
    fn oversized_index_is_rejected() {
        assert!(table_entries("p", 64).is_err());
        assert_eq!(table_entries("p", 10), Ok(1024));
    }
}
