//! Simulation parameters

use gas_physics::{ContainerConfig, DividedContainerConfig, RegionConfig};

use crate::error::SimulationError;

/// Inclusive range with a default value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64, default: f64) -> Self {
        Self { min, max, default }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Returns `value` if it is in range, otherwise an error naming the setting
    pub fn check(&self, name: &'static str, value: f64) -> Result<f64, SimulationError> {
        if self.contains(value) {
            Ok(value)
        } else {
            Err(SimulationError::ValueOutOfRange {
                name,
                value,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Parameters of the ideal-gas model
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParams {
    // Geometry
    pub container: ContainerConfig,
    pub regions: RegionConfig,

    // Thermodynamics
    /// Pressure above which the lid blows off, kPa
    pub max_pressure: f64,
    /// Heat/cool scales velocities by 1 + factor / heat_cool_scale each step
    pub heat_cool_scale: f64,
    /// Temperature used for new particles when it is user-controlled, K
    pub initial_temperature: ValueRange,

    // Particles
    pub max_particles_per_species: usize,
    /// Spread of directions for pumped particles, centered on -x, radians
    pub pump_dispersion_angle: f64,
    pub particle_particle_collisions_enabled: bool,

    /// Seed for the random source. None seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            container: ContainerConfig::default(),
            regions: RegionConfig::default(),

            max_pressure: 20000.0,
            heat_cool_scale: 100.0,
            initial_temperature: ValueRange::new(50.0, 1000.0, 300.0),

            max_particles_per_species: 1000,
            pump_dispersion_angle: std::f64::consts::FRAC_PI_2,
            particle_particle_collisions_enabled: true,

            seed: None,
        }
    }
}

impl SimulationParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Explore/energy style: particles only collide with the walls
    pub fn without_particle_collisions(mut self) -> Self {
        self.particle_particle_collisions_enabled = false;
        self
    }

    /// Work style: the moving left wall transfers energy
    pub fn with_working_wall(mut self) -> Self {
        self.container.left_wall_does_work = true;
        self
    }
}

/// Parameters of the diffusion experiment
#[derive(Debug, Clone, PartialEq)]
pub struct DiffusionParams {
    pub container: DividedContainerConfig,
    /// Collision regions. None uses a quarter of the container height
    /// with the default overlap.
    pub regions: Option<RegionConfig>,

    // Per-species settings
    pub number_of_particles: (usize, usize),
    pub max_particles_per_species: usize,
    pub mass: ValueRange,
    pub radius: ValueRange,
    pub initial_temperature: ValueRange,

    /// Window over which divider crossings are averaged, ps
    pub flow_rate_averaging_period: f64,

    pub seed: Option<u64>,
}

impl Default for DiffusionParams {
    fn default() -> Self {
        Self {
            container: DividedContainerConfig::default(),
            regions: None,

            number_of_particles: (0, 0),
            max_particles_per_species: 200,
            mass: ValueRange::new(4.0, 32.0, 28.0),
            radius: ValueRange::new(35.0, 235.0, 125.0),
            initial_temperature: ValueRange::new(50.0, 500.0, 300.0),

            flow_rate_averaging_period: 2.0,

            seed: None,
        }
    }
}

impl DiffusionParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Region configuration actually used for the divided container
    pub fn region_config(&self) -> Result<RegionConfig, SimulationError> {
        match self.regions {
            Some(regions) => {
                regions.validate()?;
                Ok(regions)
            }
            None => Ok(RegionConfig::new(
                self.container.height / 4.0,
                RegionConfig::default().overlap,
            )?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_check_reports_bounds() {
        let range = ValueRange::new(4.0, 32.0, 28.0);
        assert_eq!(range.check("mass", 10.0), Ok(10.0));
        assert_eq!(
            range.check("mass", 40.0),
            Err(SimulationError::ValueOutOfRange {
                name: "mass",
                value: 40.0,
                min: 4.0,
                max: 32.0,
            })
        );
        assert_eq!(range.clamp(1.0), 4.0);
    }

    #[test]
    fn diffusion_regions_follow_container_height() {
        let params = DiffusionParams::default();
        let regions = params.region_config().unwrap();
        assert_eq!(regions.length, 8750.0 / 4.0);
        assert_eq!(regions.overlap, RegionConfig::default().overlap);
    }

    #[test]
    fn builders_adjust_defaults() {
        let params = SimulationParams::default()
            .with_seed(7)
            .without_particle_collisions()
            .with_working_wall();
        assert_eq!(params.seed, Some(7));
        assert!(!params.particle_particle_collisions_enabled);
        assert!(params.container.left_wall_does_work);
    }
}
