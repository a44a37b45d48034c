
use crate::Outcome;
use crate::hash::truncate;
use crate::predictor::*;

/// Container for inputs passed to the components of a [`TagePredictor`].
#[derive(Clone, Copy, Debug)]
pub struct TageInputs {
    /// Program counter associated with a predicted branch
    pub pc: usize,

    /// Value of global history
    pub ghist: usize,
}

/// A base component in the TAGE predictor.
///
/// This always provides a prediction when none of the tagged components
/// have a matching entry.
pub struct TageBaseComponent {
    pub(crate) bht: BhtHysteresisPredictor,
}
impl TageBaseComponent {
    pub fn predict(&self, pc: usize) -> Outcome {
        self.bht.predict(pc)
    }

    pub fn update(&mut self, pc: usize, predicted: Outcome, actual: Outcome) {
        self.bht.update(pc, predicted, actual);
    }

    pub fn storage_bits(&self) -> usize { self.bht.storage_bits() }
}


/// An entry in some [`TageComponent`].
#[derive(Clone, Debug)]
pub struct TageEntry {
    /// State machine tracking a branch outcome
    pub ctr: SaturatingCounter,

    /// The 'useful' counter, used to determine when the entry is
    /// eligible to be invalidated and replaced
    pub useful: SaturatingCounter,

    /// Tag associated with this entry
    pub tag: Option<usize>,
}
impl TageEntry {
    pub fn new(ctr: SaturatingCounter, useful: SaturatingCounter) -> Self {
        Self { ctr, useful, tag: None }
    }

    /// Get the current predicted outcome.
    pub fn predict(&self) -> Outcome {
        self.ctr.predict()
    }

    /// Returns true if the provided tag matches this entry.
    pub fn tag_matches(&self, tag: usize) -> bool {
        self.tag == Some(tag)
    }

    /// Returns true if this entry can be replaced.
    pub fn is_evictable(&self) -> bool {
        self.useful.val() == 0
    }
}

/// A tagged component in the TAGE predictor.
pub struct TageComponent {
    pub(crate) cfg: TageComponentConfig,

    /// Table of entries
    pub(crate) data: Vec<TageEntry>,
}
impl TageComponent {
    pub fn num_useful_entries(&self) -> usize {
        self.data.iter().filter(|e| !e.is_evictable()).count()
    }

    /// Calculate what percentage of entries have been allocated.
    pub fn utilization(&self) -> f64 {
        let used = self.data.iter().filter(|e| e.tag.is_some()).count();
        used as f64 / self.data.len() as f64 * 100.0
    }

    pub fn storage_bits(&self) -> usize { self.cfg.storage_bits() }

    /// Return the predicted outcome when this component has an entry with a
    /// matching tag.
    pub fn lookup(&self, input: TageInputs) -> Option<Outcome> {
        let entry = self.get_entry(self.get_index(input));
        if entry.tag_matches(self.get_tag(input)) {
            Some(entry.predict())
        } else {
            None
        }
    }

    /// Update the matching entry after it provided a prediction.
    ///
    /// The 'useful' counter only moves when the alternate prediction differs
    /// from the prediction made by this entry.
    pub fn update(&mut self,
        input: TageInputs,
        predicted: Outcome,
        actual: Outcome,
        alt: Outcome
    )
    {
        let idx = self.get_index(input);
        let entry = self.get_entry_mut(idx);
        if alt != predicted {
            if actual == predicted {
                entry.useful.increment();
            } else {
                entry.useful.decrement();
            }
        }
        entry.ctr.update(actual);
    }

    /// Try to claim the entry for this input.
    ///
    /// Fails when the entry is still marked as useful. Otherwise the new entry
    /// is weakly biased toward the resolved outcome.
    pub fn allocate(&mut self, input: TageInputs, actual: Outcome) -> bool {
        let idx = self.get_index(input);
        let tag = self.get_tag(input);
        let entry = self.get_entry_mut(idx);
        if !entry.is_evictable() {
            return false;
        }
        entry.ctr.reset();
        if actual == Outcome::T {
            entry.ctr.increment();
        }
        entry.tag = Some(tag);
        true
    }

    /// Age the entry for this input.
    pub fn decrement_useful(&mut self, input: TageInputs) {
        let idx = self.get_index(input);
        self.get_entry_mut(idx).useful.decrement();
    }

    /// Reset the 'useful' counter for all entries in this component.
    pub fn reset_useful_bits(&mut self) {
        for entry in self.data.iter_mut() {
            entry.useful.reset();
        }
    }
}

impl PredictorTable for TageComponent {
    type Input = TageInputs;
    type Entry = TageEntry;

    fn size(&self) -> usize { self.data.len() }

    fn get_index(&self, input: TageInputs) -> usize {
        let res = (self.cfg.index_hash)(input.pc, input.ghist);
        truncate(res, self.cfg.index_bits)
    }

    fn get_entry(&self, idx: usize) -> &TageEntry {
        let index = idx & self.index_mask();
        &self.data[index]
    }

    fn get_entry_mut(&mut self, idx: usize) -> &mut TageEntry {
        let index = idx & self.index_mask();
        &mut self.data[index]
    }
}

impl TaggedPredictorTable for TageComponent {
    fn get_tag(&self, input: TageInputs) -> usize {
        let res = (self.cfg.tag_hash)(input.pc, input.ghist);
        truncate(res, self.cfg.tag_bits)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hash::*;

    fn component() -> TageComponent {
        TageComponentConfig {
            index_bits: 4,
            tag_bits: 8,
            index_hash: f_xor,
            tag_hash: f_folded_xor::<8, 32, 8>,
        }.build().unwrap()
    }

    #[test]
    fn miss_until_allocated() {
        let mut c = component();
        let input = TageInputs { pc: 0x1234, ghist: 0b1011 };
        assert_eq!(c.lookup(input), None);

        assert!(c.allocate(input, Outcome::T));
        assert_eq!(c.lookup(input), Some(Outcome::T));
        assert_eq!(c.utilization(), 100.0 / 16.0);

        // Same index, different tag
        let other = TageInputs { pc: 0x1234 ^ 0x10_0000, ghist: 0b1011 };
        assert_eq!(c.get_index(other), c.get_index(input));
        assert_eq!(c.lookup(other), None);
    }

    #[test]
    fn new_entries_are_weak() {
        let mut c = component();
        let input = TageInputs { pc: 0x40, ghist: 0 };
        assert!(c.allocate(input, Outcome::N));
        assert_eq!(c.lookup(input), Some(Outcome::N));
        c.update(input, Outcome::N, Outcome::T, Outcome::N);
        assert_eq!(c.lookup(input), Some(Outcome::T));
    }

    #[test]
    fn useful_entries_resist_allocation() {
        let mut c = component();
        let input = TageInputs { pc: 0x8, ghist: 0x3 };
        assert!(c.allocate(input, Outcome::T));

        // Correct where the alternate was wrong: the entry becomes useful
        c.update(input, Outcome::T, Outcome::T, Outcome::N);
        assert_eq!(c.num_useful_entries(), 1);

        // Agreement with the alternate leaves 'useful' alone
        c.update(input, Outcome::T, Outcome::T, Outcome::T);
        assert_eq!(c.get_entry(c.get_index(input)).useful.val(), 1);

        let conflict = TageInputs { pc: 0x8 ^ 0x100, ghist: 0x3 ^ 0x100 };
        assert_eq!(c.get_index(conflict), c.get_index(input));
        assert!(!c.allocate(conflict, Outcome::N));

        c.decrement_useful(conflict);
        assert!(c.allocate(conflict, Outcome::N));
        assert_eq!(c.lookup(conflict), Some(Outcome::N));
        assert_eq!(c.lookup(input), None);
    }

    #[test]
    fn reset_clears_useful() {
        let mut c = component();
        let input = TageInputs { pc: 0x8, ghist: 0x3 };
        assert!(c.allocate(input, Outcome::T));
        c.update(input, Outcome::T, Outcome::T, Outcome::N);
        c.update(input, Outcome::T, Outcome::T, Outcome::N);
        c.reset_useful_bits();
        assert_eq!(c.num_useful_entries(), 0);
    }

    #[test]
    fn storage() {
        let cfg = TageComponentConfig {
            index_bits: 9,
            tag_bits: 9,
            index_hash: f_folded_xor::<9, 9, 5>,
            tag_hash: f_folded_xor::<9, 64, 5>,
        };
        assert_eq!(cfg.storage_bits(), 512 * (3 + 2 + 9));
        let cfg = TageComponentConfig { index_bits: 12, ..cfg };
        assert!(cfg.build().is_err());
    }
}
