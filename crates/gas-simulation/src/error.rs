use gas_physics::{ConfigError, Species};
use thiserror::Error;

/// Requests the simulation refuses.
///
/// Physical inconsistencies that arise while the model runs are not errors;
/// they are reported as [`crate::Oops`] values and the model recovers on its own.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("pressure cannot be held constant while it is zero")]
    ZeroPressure,

    #[error("invalid time step: {0}")]
    InvalidTimeStep(f64),

    #[error("cannot have {count} {species:?} particles, at most {max} are allowed")]
    CountOutOfRange { species: Species, count: usize, max: usize },

    #[error("{0:?} particles are not part of this model")]
    InvalidSpecies(Species),

    #[error("{name} {value} is outside [{min}, {max}]")]
    ValueOutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_convert() {
        let err: SimulationError = ConfigError::InvalidRegionLength(-1.0).into();
        assert_eq!(err.to_string(), "invalid region length: -1");
    }

    #[test]
    fn count_message_names_the_limit() {
        let msg = SimulationError::CountOutOfRange {
            species: Species::Heavy,
            count: 1001,
            max: 1000,
        }
        .to_string();
        assert!(msg.contains("1001"));
        assert!(msg.contains("Heavy"));
    }

    #[test]
    fn invalid_species_names_the_species() {
        let msg = SimulationError::InvalidSpecies(Species::Diffusion2).to_string();
        assert_eq!(msg, "Diffusion2 particles are not part of this model");
    }
}
