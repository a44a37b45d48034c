//! Named predictor configurations.

use crate::error::ConfigError;
use crate::hash::*;
use crate::predictor::*;

/// Names accepted by [`build_predictor`].
pub const PRESETS: &[&str] = &[
    "not-taken",
    "taken",
    "bht",
    "bht-hysteresis",
    "gshare",
    "local",
    "tournament",
    "alpha21264",
    "tage",
    "bpat-gshare",
    "bpat",
];

/// A tagged component whose index and tag fold in `H` bits of history.
fn tage_component<const H: usize>() -> TageComponentConfig {
    TageComponentConfig {
        index_bits: 9,
        tag_bits: 9,
        index_hash: f_folded_xor::<9, 9, H>,
        tag_hash: f_folded_xor::<9, 64, H>,
    }
}

/// TAGE with four tagged components over 5, 10, 20 and 40 bits of history.
pub fn tage() -> Result<TagePredictor, ConfigError> {
    let mut cfg = TageConfig::new(40, TageBaseConfig {
        index_bits: 11,
        hysteresis_group: 1,
    });
    cfg.add_component(tage_component::<5>());
    cfg.add_component(tage_component::<10>());
    cfg.add_component(tage_component::<20>());
    cfg.add_component(tage_component::<40>());
    cfg.build()
}

fn tournament() -> Result<TournamentPredictor, ConfigError> {
    let global = GlobalHistoryConfig::gshare(12, 12).build()?;
    let local = LocalHistoryConfig::new(10, 10, 10, f_b)
        .with_counter(SaturatingCounterConfig::new(3))
        .build()?;
    TournamentConfig::new(12).build(Box::new(global), Box::new(local))
}

fn naive_bpat() -> Result<NaiveBpat, ConfigError> {
    let alt: Box<dyn BranchPredictor> =
        Box::new(Alpha21264Config::new(10).build()?);
    BpatConfig::new(4, 10).build(alt)
}

/// Build one of the predictors listed in [`PRESETS`].
pub fn build_predictor(name: &str)
    -> Result<Box<dyn BranchPredictor>, ConfigError>
{
    let p: Box<dyn BranchPredictor> = match name {
        "not-taken" => Box::new(NotTakenPredictor),
        "taken" => Box::new(TakenPredictor),
        "bht" => Box::new(BhtConfig::new(14).build()?),
        "bht-hysteresis" => Box::new(BhtHysteresisConfig::new(14, 4).build()?),
        "gshare" => Box::new(GlobalHistoryConfig::gshare(14, 14).build()?),
        "local" => Box::new(LocalHistoryConfig::new(14, 14, 6, f_xor).build()?),
        "tournament" => Box::new(tournament()?),
        "alpha21264" => Box::new(Alpha21264Config::new(12).build()?),
        "tage" => Box::new(tage()?),
        "bpat-gshare" => Box::new(BpatConfig::new(12, 10).build_gshare(11, 12)?),
        "bpat" => Box::new(naive_bpat()?),
        _ => return Err(ConfigError::UnknownPredictor(name.to_string())),
    };
    log::debug!("built preset '{}' ({})", name, p.name());
    Ok(p)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn every_preset_fits_the_budget() {
        for name in PRESETS {
            let p = build_predictor(name).unwrap();
            assert!(p.storage_bits() <= STORAGE_BUDGET_BITS, "{}", name);
        }
    }

    #[test]
    fn preset_storage() {
        let bits = |name: &str| build_predictor(name).unwrap().storage_bits();
        assert_eq!(bits("not-taken"), 0);
        assert_eq!(bits("bht"), 32768);
        assert_eq!(bits("bht-hysteresis"), 16384 + 4096);
        assert_eq!(bits("gshare"), 32768 + 14);
        assert_eq!(bits("tournament"), 29708);
        assert_eq!(bits("alpha21264"), 29708);
        assert_eq!(bits("tage"), 32808);
        assert_eq!(bits("bpat-gshare"), 24576 + 2048 + 4096 + 12);
    }

    #[test]
    fn tage_preset_shape() {
        let p = tage().unwrap();
        assert_eq!(p.num_tagged_components(), 4);
        assert_eq!(p.cfg.history_bits, 40);
        assert_eq!(p.cfg.total_entries(), 2048 + 4 * 512);
    }

    #[test]
    fn unknown_preset() {
        assert!(matches!(build_predictor("perceptron"),
            Err(ConfigError::UnknownPredictor(n)) if n == "perceptron"));
    }
}
