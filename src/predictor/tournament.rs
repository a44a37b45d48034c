//! Predictors choosing between two component predictors.

use crate::Outcome;
use crate::error::ConfigError;
use crate::hash::*;
use crate::predictor::*;

/// Configuration for a [`TournamentPredictor`].
#[derive(Clone, Copy, Debug)]
pub struct TournamentConfig {
    /// log2 of the number of chooser counters
    pub index_bits: usize,

    /// Parameters for the chooser counters
    pub ctr: SaturatingCounterConfig,
}
impl TournamentConfig {
    pub fn new(index_bits: usize) -> Self {
        Self { index_bits, ctr: SaturatingCounterConfig::new(2) }
    }

    /// Use this configuration to create a new [`TournamentPredictor`] from
    /// two component predictors.
    pub fn build(self,
        p0: Box<dyn BranchPredictor>,
        p1: Box<dyn BranchPredictor>,
    ) -> Result<TournamentPredictor, ConfigError>
    {
        table_entries("TournamentPredictor", self.index_bits)?;
        self.ctr.validate("TournamentPredictor")?;
        let bits = p0.storage_bits() + p1.storage_bits()
            + CounterTable::storage_bits_for(self.index_bits, self.ctr);
        check_budget("TournamentPredictor", bits)?;
        Ok(TournamentPredictor {
            chooser: CounterTable::new(self.index_bits, self.ctr),
            comp: [p0, p1],
            cfg: self,
        })
    }
}

/// Select between two predictors with a table of saturating counters
/// indexed by the program counter.
///
/// When the selected counter predicts 'taken', the second component provides
/// the prediction. Both components are trained on every branch.
pub struct TournamentPredictor {
    cfg: TournamentConfig,
    chooser: CounterTable,
    comp: [Box<dyn BranchPredictor>; 2],
}
impl TournamentPredictor {
    fn index(&self, pc: usize) -> usize {
        truncate(pc, self.cfg.index_bits)
    }

    /// Return the index of the component that would be used for `pc`.
    pub fn selected(&self, pc: usize) -> usize {
        let idx = self.index(pc);
        self.chooser.predict(idx).is_taken() as usize
    }
}
impl BranchPredictor for TournamentPredictor {
    fn name(&self) -> &'static str { "TournamentPredictor" }

    fn predict(&self, pc: usize) -> Outcome {
        self.comp[self.selected(pc)].predict(pc)
    }

    fn update(&mut self, pc: usize, _predicted: Outcome, actual: Outcome) {
        let idx = self.index(pc);
        let pred0 = self.comp[0].predict(pc);
        let pred1 = self.comp[1].predict(pc);

        // Only move the chooser when exactly one component was correct
        if pred0 != actual && pred1 == actual {
            self.chooser.update(idx, Outcome::T);
        } else if pred0 == actual && pred1 != actual {
            self.chooser.update(idx, Outcome::N);
        }

        // Each component is trained with its own prediction
        self.comp[0].update(pc, pred0, actual);
        self.comp[1].update(pc, pred1, actual);
    }

    fn storage_bits(&self) -> usize {
        self.comp[0].storage_bits() + self.comp[1].storage_bits()
            + self.chooser.storage_bits()
    }
}


/// Configuration for an [`Alpha21264Predictor`].
#[derive(Clone, Copy, Debug)]
pub struct Alpha21264Config {
    /// log2 of the number of chooser counters, and the length of global
    /// history
    pub index_bits: usize,
}
impl Alpha21264Config {
    pub fn new(index_bits: usize) -> Self {
        Self { index_bits }
    }

    fn global(&self) -> GlobalHistoryConfig {
        GlobalHistoryConfig::gshare(self.index_bits, self.index_bits)
    }

    fn local(&self) -> LocalHistoryConfig {
        LocalHistoryConfig::new(10, 10, 10, f_b)
            .with_counter(SaturatingCounterConfig::new(3))
    }

    fn chooser(&self) -> SaturatingCounterConfig {
        SaturatingCounterConfig::new(2)
    }

    /// Get the number of storage bits.
    pub fn storage_bits(&self) -> usize {
        self.global().storage_bits() + self.local().storage_bits()
            + CounterTable::storage_bits_for(self.index_bits, self.chooser())
    }

    /// Use this configuration to create a new [`Alpha21264Predictor`].
    pub fn build(self) -> Result<Alpha21264Predictor, ConfigError> {
        let global = self.global().build()?;
        let local = self.local().build()?;
        check_budget("Alpha21264Predictor", self.storage_bits())?;
        Ok(Alpha21264Predictor {
            chooser: CounterTable::new(self.index_bits, self.chooser()),
            global,
            local,
            cfg: self,
        })
    }
}

/// A tournament between a global history predictor and a local history
/// predictor, modeled after the Alpha 21264.
///
/// Unlike [`TournamentPredictor`], the chooser is indexed by global history.
/// When the selected counter predicts 'taken', the global predictor provides
/// the prediction.
pub struct Alpha21264Predictor {
    cfg: Alpha21264Config,
    chooser: CounterTable,
    global: GlobalHistoryPredictor,
    local: LocalHistoryPredictor,
}
impl Alpha21264Predictor {
    fn index(&self) -> usize {
        truncate(self.global.history(), self.cfg.index_bits)
    }

    /// Returns 'true' when the global predictor would be used.
    pub fn uses_global(&self) -> bool {
        self.chooser.predict(self.index()).is_taken()
    }
}
impl BranchPredictor for Alpha21264Predictor {
    fn name(&self) -> &'static str { "Alpha21264Predictor" }

    fn predict(&self, pc: usize) -> Outcome {
        if self.uses_global() {
            self.global.predict(pc)
        } else {
            self.local.predict(pc)
        }
    }

    fn update(&mut self, pc: usize, _predicted: Outcome, actual: Outcome) {
        let idx = self.index();
        let global_pred = self.global.predict(pc);
        let local_pred = self.local.predict(pc);
        if global_pred != actual && local_pred == actual {
            self.chooser.update(idx, Outcome::N);
        } else if global_pred == actual && local_pred != actual {
            self.chooser.update(idx, Outcome::T);
        }
        self.global.update(pc, global_pred, actual);
        self.local.update(pc, local_pred, actual);
    }

    fn storage_bits(&self) -> usize {
        self.global.storage_bits() + self.local.storage_bits()
            + self.chooser.storage_bits()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn tournament(p0: Box<dyn BranchPredictor>, p1: Box<dyn BranchPredictor>)
        -> TournamentPredictor
    {
        TournamentConfig::new(4).build(p0, p1).unwrap()
    }

    #[test]
    fn chooser_converges_to_correct_component() {
        // Every branch is taken: the 'taken' component is always right and
        // the 'not-taken' component is always wrong.
        let mut p = tournament(Box::new(TakenPredictor),
            Box::new(NotTakenPredictor));
        for _ in 0..4 {
            let pred = p.predict(0x8);
            p.update(0x8, pred, Outcome::T);
        }
        assert_eq!(p.selected(0x8), 0);
        assert_eq!(p.predict(0x8), Outcome::T);

        let mut p = tournament(Box::new(NotTakenPredictor),
            Box::new(TakenPredictor));
        for _ in 0..4 {
            let pred = p.predict(0x8);
            p.update(0x8, pred, Outcome::T);
        }
        assert_eq!(p.selected(0x8), 1);
        assert_eq!(p.predict(0x8), Outcome::T);
    }

    #[test]
    fn chooser_ignores_ties() {
        let mut p = tournament(Box::new(TakenPredictor),
            Box::new(TakenPredictor));
        for _ in 0..8 {
            p.update(0x3, Outcome::T, Outcome::N);
        }
        assert_eq!(p.selected(0x3), 0);
    }

    #[test]
    fn both_components_are_trained() {
        let p0 = BhtConfig::new(4).build().unwrap();
        let p1 = BhtConfig::new(4).build().unwrap();
        let mut p = tournament(Box::new(p0), Box::new(p1));
        p.update(0x1, Outcome::N, Outcome::T);
        assert_eq!(p.comp[0].predict(0x1), Outcome::T);
        assert_eq!(p.comp[1].predict(0x1), Outcome::T);
    }

    #[test]
    fn tournament_budget_counts_components() {
        let p0 = BhtConfig::new(14).build().unwrap();
        let p1 = BhtConfig::new(4).build().unwrap();
        let res = TournamentConfig::new(12).build(Box::new(p0), Box::new(p1));
        assert!(matches!(res,
            Err(ConfigError::StorageBudgetExceeded { .. })));
    }

    #[test]
    fn alpha_storage() {
        let p = Alpha21264Config::new(12).build().unwrap();
        assert_eq!(p.storage_bits(), 8204 + 13312 + 8192);
        assert!(Alpha21264Config::new(13).build().is_err());
    }

    #[test]
    fn alpha_learns_biased_branches() {
        let mut p = Alpha21264Config::new(8).build().unwrap();
        let mut misses = 0;
        for i in 0..2000 {
            let pc = 0x400 + (i % 4) * 4;
            let actual = Outcome::from(pc & 0x4 == 0);
            let pred = p.predict(pc);
            if i >= 1000 && pred != actual { misses += 1; }
            p.update(pc, pred, actual);
        }
        assert_eq!(misses, 0);
    }
}
