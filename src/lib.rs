//! A library for simulating branch predictors over recorded traces.

pub mod branch;
pub mod error;
pub mod hash;
pub mod history;
pub mod predictor;
pub mod preset;
pub mod sim;
pub mod stats;
pub mod trace;

pub use branch::*;
pub use error::*;
pub use history::*;
pub use predictor::*;
pub use sim::*;
pub use stats::*;
pub use trace::*;
