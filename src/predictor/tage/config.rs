
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::error::ConfigError;
use crate::hash::HashFn;
use crate::history::ShiftRegister;
use crate::predictor::*;

/// Configuration for a [`TageBaseComponent`].
#[derive(Clone, Copy, Debug)]
pub struct TageBaseConfig {
    /// log2 of the number of entries
    pub index_bits: usize,

    /// Number of consecutive entries sharing a hysteresis bit
    pub hysteresis_group: usize,
}
impl TageBaseConfig {
    fn table(&self) -> BhtHysteresisConfig {
        BhtHysteresisConfig::new(self.index_bits, self.hysteresis_group)
    }

    /// Get the number of storage bits.
    pub fn storage_bits(&self) -> usize {
        self.table().storage_bits()
    }

    /// Use this configuration to create a new [`TageBaseComponent`].
    pub fn build(self) -> Result<TageBaseComponent, ConfigError> {
        Ok(TageBaseComponent {
            bht: self.table().build()?,
        })
    }
}

/// Configuration for a [`TageComponent`].
#[derive(Clone, Copy, Debug)]
pub struct TageComponentConfig {
    /// log2 of the number of entries
    pub index_bits: usize,

    /// Number of tag bits
    pub tag_bits: usize,

    /// Function combining the program counter and global history into an
    /// index
    pub index_hash: HashFn,

    /// Function combining the program counter and global history into a tag
    pub tag_hash: HashFn,
}
impl TageComponentConfig {
    /// Parameters for the saturating counters
    pub const CTR: SaturatingCounterConfig = SaturatingCounterConfig::new(3);

    /// Parameters for the 'useful' counters
    pub const USEFUL: SaturatingCounterConfig =
        SaturatingCounterConfig::new(2).with_init(0);

    /// Get the number of storage bits.
    pub fn storage_bits(&self) -> usize {
        let entry_size = Self::CTR.storage_bits()
            + Self::USEFUL.storage_bits()
            + self.tag_bits;
        entry_size * (1 << self.index_bits)
    }

    /// Use this configuration to create a new [`TageComponent`].
    pub fn build(self) -> Result<TageComponent, ConfigError> {
        let name = "TageComponent";
        let size = table_entries(name, self.index_bits)?;
        if self.tag_bits == 0 || self.tag_bits >= usize::BITS as usize {
            return Err(ConfigError::InvalidGeometry {
                name,
                reason: format!("{}-bit tag", self.tag_bits),
            });
        }
        check_budget(name, self.storage_bits())?;
        let entry = TageEntry::new(Self::CTR.build(), Self::USEFUL.build());
        Ok(TageComponent {
            cfg: self,
            data: vec![entry; size],
        })
    }
}

/// Configuration for a [`TagePredictor`].
#[derive(Clone, Debug)]
pub struct TageConfig {
    /// Length of global history
    pub history_bits: usize,

    /// Base component configuration
    pub base: TageBaseConfig,

    /// Tagged component configurations, ordered from the shortest to the
    /// longest associated history length
    pub comp: Vec<TageComponentConfig>,

    /// Number of branches between resets of all 'useful' counters
    pub reset_interval: usize,

    /// Seed for choosing where to allocate new entries
    pub seed: u64,
}
impl TageConfig {
    /// The most tagged components we support.
    pub const MAX_COMPONENTS: usize = 32;

    pub fn new(history_bits: usize, base: TageBaseConfig) -> Self {
        Self {
            history_bits,
            base,
            comp: Vec::new(),
            reset_interval: 256_000,
            seed: 0,
        }
    }

    pub fn total_entries(&self) -> usize {
        let c: usize = self.comp.iter().map(|c| 1 << c.index_bits).sum();
        (1 << self.base.index_bits) + c
    }

    /// Get the number of storage bits.
    pub fn storage_bits(&self) -> usize {
        let c: usize = self.comp.iter().map(|c| c.storage_bits()).sum();
        self.history_bits + self.base.storage_bits() + c
    }

    /// Add a tagged component to the predictor. Components must be added in
    /// order of increasing history length.
    pub fn add_component(&mut self, c: TageComponentConfig) {
        self.comp.push(c);
    }

    /// Use this configuration to create a new [`TagePredictor`].
    pub fn build(self) -> Result<TagePredictor, ConfigError> {
        let name = "TagePredictor";
        check_history_bits(name, self.history_bits)?;
        if self.comp.len() > Self::MAX_COMPONENTS {
            return Err(ConfigError::InvalidGeometry {
                name,
                reason: format!("{} tagged components", self.comp.len()),
            });
        }
        if self.reset_interval == 0 {
            return Err(ConfigError::InvalidGeometry {
                name,
                reason: "zero 'useful' reset interval".to_string(),
            });
        }

        let base = self.base.build()?;
        let comp = self.comp.iter().map(|c| c.build())
            .collect::<Result<Vec<TageComponent>, ConfigError>>()?;
        check_budget(name, self.storage_bits())?;

        log::debug!("TAGE entries (in total): {}", self.total_entries());
        Ok(TagePredictor {
            stat: TageStats::new(comp.len()),
            ghr: ShiftRegister::new(self.history_bits),
            rng: StdRng::seed_from_u64(self.seed),
            ctr: 0,
            cfg: self,
            base,
            comp,
        })
    }
}
