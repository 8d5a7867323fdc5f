//! # Gas Simulation
//!
//! Frame-driven models built on `gas-physics`: the ideal-gas model with its
//! thermodynamic readouts, histograms, pressure gauge and hold-constant
//! modes, and the diffusion experiment.

pub mod collision_counter;
pub mod diffusion;
pub mod error;
pub mod flow_rate;
pub mod histograms;
pub mod hold_constant;
pub mod model;
pub mod params;
pub mod pressure_gauge;
pub mod thermodynamics;
pub mod time;

pub use collision_counter::*;
pub use diffusion::*;
pub use error::*;
pub use flow_rate::*;
pub use histograms::*;
pub use hold_constant::*;
pub use model::*;
pub use params::*;
pub use pressure_gauge::*;
pub use time::*;
