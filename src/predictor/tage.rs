//! Implementation of a "TAgged GEometric history length" (TAGE) predictor.

pub mod component;
pub mod stat;
pub mod config;

pub use component::*;
pub use stat::*;
pub use config::*;

use rand::distributions::{ WeightedIndex, Distribution };
use rand::rngs::StdRng;

use crate::Outcome;
use crate::history::ShiftRegister;
use crate::predictor::*;

/// Identifies a particular component in a [`TagePredictor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TageProvider {
    /// The base component
    Base,

    /// A tagged component
    Tagged(usize),
}

/// Container for output from [`TagePredictor::lookup`], including the
/// predicted outcome and other metadata about how the prediction was made.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagePrediction {
    /// The component providing the prediction
    pub provider: TageProvider,

    /// A predicted direction
    pub outcome: Outcome,

    /// Alternate component used to provide a prediction
    pub alt_provider: TageProvider,

    /// Predicted direction from the alternate component
    pub alt_outcome: Outcome,
}


/// The "TAgged GEometric history length" predictor.
///
/// Tagged components are ordered by increasing history length, so the
/// provider is the matching component with the largest index.
///
/// See the following:
///  - "A case for (partially) TAgged GEometric history length branch prediction"
///  (Seznec, 2006).
pub struct TagePredictor {
    /// The configuration used to create this object
    pub cfg: TageConfig,

    pub stat: TageStats,

    /// Base component
    pub base: TageBaseComponent,

    /// Tagged components
    pub comp: Vec<TageComponent>,

    /// Global history
    pub(crate) ghr: ShiftRegister,

    /// Source of randomness for picking where allocation starts
    pub(crate) rng: StdRng,

    /// Branches since the last reset of all 'useful' counters
    pub(crate) ctr: usize,
}
impl TagePredictor {
    fn inputs(&self, pc: usize) -> TageInputs {
        TageInputs { pc, ghist: self.ghr.val() }
    }

    /// Pick how far into the list of candidate components allocation starts.
    ///
    /// Farther offsets are favored: offset 'k' is twice as likely as 'k-1'.
    fn alloc_offset(&mut self, num_candidates: usize) -> usize {
        let weights: Vec<u64> = (0..num_candidates).map(|k| 1 << k).collect();
        match WeightedIndex::new(&weights) {
            Ok(dist) => dist.sample(&mut self.rng),
            Err(_) => 0,
        }
    }

    /// Given the provider of an incorrect prediction, try to allocate an entry
    /// in one of the components with a longer history length.
    ///
    /// When every candidate entry is still useful, all of them are aged
    /// instead.
    fn alloc(&mut self, input: TageInputs, provider: TageProvider,
        actual: Outcome)
    {
        let first = match provider {
            TageProvider::Base => 0,
            TageProvider::Tagged(idx) => idx + 1,
        };
        let num_candidates = self.comp.len() - first;
        if num_candidates == 0 {
            return;
        }

        let offset = self.alloc_offset(num_candidates);
        for k in 0..num_candidates {
            let idx = first + (k + offset) % num_candidates;
            if self.comp[idx].allocate(input, actual) {
                log::trace!("allocated {:#x} in component {}", input.pc, idx);
                self.stat.alcs += 1;
                return;
            }
        }

        self.stat.failed_alcs += 1;
        for comp in self.comp[first..].iter_mut() {
            comp.decrement_useful(input);
        }
    }

    /// Reset the 'useful' counters in all tagged components.
    fn reset_useful_bits(&mut self) {
        log::info!("resetting 'useful' counters after {} updates",
            self.stat.clk);
        self.stat.resets += 1;
        for comp in self.comp.iter_mut() {
            comp.reset_useful_bits();
        }
    }
}

/// The public interface to a [`TagePredictor`].
impl TagePredictor {
    /// Return the number of tagged components.
    pub fn num_tagged_components(&self) -> usize {
        self.comp.len()
    }

    /// Return the current value of global history.
    pub fn history(&self) -> usize {
        self.ghr.val()
    }

    /// Find the provider and alternate predictions for the branch at `pc`.
    pub fn lookup(&self, pc: usize) -> TagePrediction {
        let input = self.inputs(pc);
        let base = (TageProvider::Base, self.base.predict(pc));

        // Search from the longest history length down
        let mut hits = self.comp.iter().enumerate().rev()
            .filter_map(|(idx, c)| {
                c.lookup(input).map(|o| (TageProvider::Tagged(idx), o))
            });

        let (provider, outcome) = hits.next().unwrap_or(base);
        let (alt_provider, alt_outcome) = match provider {
            TageProvider::Base => (provider, outcome),
            TageProvider::Tagged(_) => hits.next().unwrap_or(base),
        };
        TagePrediction { provider, outcome, alt_provider, alt_outcome }
    }
}

impl BranchPredictor for TagePredictor {
    fn name(&self) -> &'static str { "TagePredictor" }

    fn predict(&self, pc: usize) -> Outcome {
        self.lookup(pc).outcome
    }

    /// Given the prediction and the resolved outcome, update the state of
    /// the predictor.
    ///
    /// Panics if the prediction no longer matches the one given by
    /// [`TagePredictor::predict`].
    fn update(&mut self, pc: usize, predicted: Outcome, actual: Outcome) {
        self.stat.clk += 1;
        self.ctr += 1;
        if self.ctr >= self.cfg.reset_interval {
            self.ctr = 0;
            self.reset_useful_bits();
        }

        let input = self.inputs(pc);
        let p = self.lookup(pc);
        assert_eq!(p.outcome, predicted,
            "TAGE prediction for {:#x} changed before update", pc);

        let hit = p.outcome == actual;
        match p.provider {
            TageProvider::Base => {
                self.base.update(pc, p.outcome, actual);
                if hit { self.stat.base_hits += 1; }
                else { self.stat.base_miss += 1; }
            },
            TageProvider::Tagged(idx) => {
                self.comp[idx].update(input, p.outcome, actual, p.alt_outcome);
                if hit { self.stat.comp_hits[idx] += 1; }
                else { self.stat.comp_miss[idx] += 1; }
            },
        }

        if !hit {
            self.alloc(input, p.provider, actual);
        }

        self.ghr.shift_in(actual);
    }

    fn storage_bits(&self) -> usize {
        self.ghr.storage_bits()
            + self.base.storage_bits()
            + self.comp.iter().map(|c| c.storage_bits()).sum::<usize>()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hash::*;
    use Outcome::*;

    /// Components that ignore global history.
    fn pc_only_tage(num_comp: usize) -> TagePredictor {
        let mut cfg = TageConfig::new(8, TageBaseConfig {
            index_bits: 4,
            hysteresis_group: 1,
        });
        for _ in 0..num_comp {
            cfg.add_component(TageComponentConfig {
                index_bits: 4,
                tag_bits: 8,
                index_hash: f_a,
                tag_hash: f_folded_xor::<8, 32, 0>,
            });
        }
        cfg.build().unwrap()
    }

    fn history_tage() -> TagePredictor {
        let mut cfg = TageConfig::new(16, TageBaseConfig {
            index_bits: 6,
            hysteresis_group: 1,
        });
        cfg.add_component(TageComponentConfig {
            index_bits: 6,
            tag_bits: 8,
            index_hash: f_folded_xor::<6, 6, 4>,
            tag_hash: f_folded_xor::<8, 16, 4>,
        });
        cfg.add_component(TageComponentConfig {
            index_bits: 6,
            tag_bits: 8,
            index_hash: f_folded_xor::<6, 6, 8>,
            tag_hash: f_folded_xor::<8, 16, 8>,
        });
        cfg.build().unwrap()
    }

    fn step(p: &mut TagePredictor, pc: usize, actual: Outcome) -> Outcome {
        let pred = p.predict(pc);
        p.update(pc, pred, actual);
        pred
    }

    #[test]
    fn base_provides_when_no_tag_matches() {
        let p = pc_only_tage(2);
        let res = p.lookup(0x10);
        assert_eq!(res.provider, TageProvider::Base);
        assert_eq!(res.alt_provider, TageProvider::Base);
        assert_eq!(res.outcome, N);
        assert_eq!(res.alt_outcome, N);
    }

    #[test]
    fn misprediction_allocates_tagged_entry() {
        let mut p = pc_only_tage(2);
        assert_eq!(step(&mut p, 0x10, T), N);
        assert_eq!(p.stat.alcs, 1);

        let res = p.lookup(0x10);
        assert!(matches!(res.provider, TageProvider::Tagged(_)));
        assert_eq!(res.outcome, T);
        assert_eq!(res.alt_provider, TageProvider::Base);
        assert_eq!(p.predict(0x10), T);
    }

    #[test]
    fn longest_matching_component_provides() {
        let mut p = pc_only_tage(3);
        let input = p.inputs(0x20);
        assert!(p.comp[0].allocate(input, N));
        assert!(p.comp[2].allocate(input, T));

        let res = p.lookup(0x20);
        assert_eq!(res.provider, TageProvider::Tagged(2));
        assert_eq!(res.outcome, T);
        assert_eq!(res.alt_provider, TageProvider::Tagged(0));
        assert_eq!(res.alt_outcome, N);
    }

    #[test]
    fn allocation_only_targets_longer_histories() {
        let mut p = pc_only_tage(3);
        let input = p.inputs(0x30);
        assert!(p.comp[1].allocate(input, N));

        // Provider is component 1; mispredict so that only component 2 is a
        // candidate
        assert_eq!(step(&mut p, 0x30, T), N);
        assert_eq!(p.comp[0].lookup(input), None);
        assert_eq!(p.comp[2].lookup(input), Some(T));
        assert_eq!(p.lookup(0x30).provider, TageProvider::Tagged(2));
    }

    #[test]
    fn failed_allocation_ages_candidates() {
        let mut p = pc_only_tage(1);
        let input = p.inputs(0x5);
        assert!(p.comp[0].allocate(input, T));
        p.comp[0].update(input, T, T, N);
        p.comp[0].update(input, T, T, N);

        // A different branch aliasing onto the useful entry
        let alias = 0x5 | 0x100;
        assert_eq!(p.lookup(alias).provider, TageProvider::Base);
        step(&mut p, alias, T);
        assert_eq!(p.stat.failed_alcs, 1);
        assert_eq!(p.comp[0].get_entry(5).useful.val(), 1);

        // The base predicts the alias correctly now
        assert_eq!(step(&mut p, alias, T), T);
        assert_eq!(p.stat.failed_alcs, 1);
        assert_eq!(p.comp[0].get_entry(5).useful.val(), 1);
    }

    #[test]
    fn useful_counters_reset_periodically() {
        let mut cfg = TageConfig::new(8, TageBaseConfig {
            index_bits: 4,
            hysteresis_group: 1,
        });
        cfg.reset_interval = 10;
        cfg.add_component(TageComponentConfig {
            index_bits: 4,
            tag_bits: 8,
            index_hash: f_a,
            tag_hash: f_a,
        });
        let mut p = cfg.build().unwrap();
        let input = p.inputs(0x1);
        assert!(p.comp[0].allocate(input, T));
        p.comp[0].update(input, T, T, N);
        assert_eq!(p.comp[0].num_useful_entries(), 1);

        for i in 0..25 {
            step(&mut p, 0x2, Outcome::from(i % 2 == 0));
        }
        assert_eq!(p.stat.resets, 2);
        assert_eq!(p.comp[0].get_entry(1).useful.val(), 0);
    }

    #[test]
    fn learns_history_correlated_pattern() {
        let mut p = history_tage();
        let pat = [T, T, N];
        for i in 0..600 {
            step(&mut p, 0x1234, pat[i % 3]);
        }
        let mut misses = 0;
        for i in 600..900 {
            // The base always predicts 'taken' here, so the not-taken slot
            // must come from a tagged component
            if pat[i % 3] == N {
                let res = p.lookup(0x1234);
                assert!(matches!(res.provider, TageProvider::Tagged(_)));
                assert_eq!(res.outcome, N);
            }
            if step(&mut p, 0x1234, pat[i % 3]) != pat[i % 3] {
                misses += 1;
            }
        }
        assert_eq!(misses, 0);
        assert!(p.stat.alcs > 0);
    }

    #[test]
    #[should_panic]
    fn stale_prediction_is_fatal() {
        let mut p = pc_only_tage(1);
        let pred = p.predict(0x10);
        p.update(0x10, !pred, T);
    }

    #[test]
    fn storage_and_budget() {
        let p = pc_only_tage(2);
        assert_eq!(p.storage_bits(), 8 + (16 + 16) + 2 * 16 * 13);
        assert_eq!(p.storage_bits(), p.cfg.storage_bits());

        let mut cfg = TageConfig::new(40, TageBaseConfig {
            index_bits: 11,
            hysteresis_group: 1,
        });
        for _ in 0..5 {
            cfg.add_component(TageComponentConfig {
                index_bits: 9,
                tag_bits: 9,
                index_hash: f_xor,
                tag_hash: f_xor,
            });
        }
        assert!(matches!(cfg.build(),
            Err(crate::error::ConfigError::StorageBudgetExceeded { .. })));
    }
}
