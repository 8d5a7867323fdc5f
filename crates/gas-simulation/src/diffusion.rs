//! Diffusion experiment
//!
//! Two species start on opposite sides of a divider. Removing the divider
//! lets them mix; the model tracks how far that has progressed.

use gas_physics::{
    ensemble, rms_speed, Bounds, CollisionCounts, CollisionDetector, DividedContainer, Particle,
    ParticleInstance, Species,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::SimulationError;
use crate::flow_rate::ParticleFlowRate;
use crate::params::DiffusionParams;
use crate::time::TimeControls;

/// User-tunable settings for one species
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffusionSettings {
    pub number_of_particles: usize,
    /// AMU
    pub mass: f64,
    /// pm
    pub radius: f64,
    /// K
    pub initial_temperature: f64,
}

/// Readouts derived from the particles after every step or change
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DiffusionData {
    pub center_x_of_mass1: Option<f64>,
    pub center_x_of_mass2: Option<f64>,
    pub left_number_of_particles1: usize,
    pub right_number_of_particles1: usize,
    pub left_number_of_particles2: usize,
    pub right_number_of_particles2: usize,
    /// K, None when the left side is empty
    pub left_average_temperature: Option<f64>,
    /// K, None when the right side is empty
    pub right_average_temperature: Option<f64>,
}

pub struct DiffusionModel {
    params: DiffusionParams,
    container: DividedContainer,
    collision_detector: CollisionDetector,
    time_controls: TimeControls,
    rng: StdRng,
    settings1: DiffusionSettings,
    settings2: DiffusionSettings,
    particles1: Vec<Particle>,
    particles2: Vec<Particle>,
    flow_rate1: ParticleFlowRate,
    flow_rate2: ParticleFlowRate,
    data: DiffusionData,
}

impl DiffusionModel {
    pub fn new(params: DiffusionParams) -> Result<Self, SimulationError> {
        let container = DividedContainer::new(params.container)?;
        let collision_detector = CollisionDetector::new(params.region_config()?)?;
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let divider_x = container.divider_x();
        let period = params.flow_rate_averaging_period;

        let mut model = Self {
            settings1: default_settings(&params),
            settings2: default_settings(&params),
            flow_rate1: ParticleFlowRate::new(divider_x, period),
            flow_rate2: ParticleFlowRate::new(divider_x, period),
            params,
            container,
            collision_detector,
            time_controls: TimeControls::default(),
            rng,
            particles1: Vec::new(),
            particles2: Vec::new(),
            data: DiffusionData::default(),
        };
        let (n1, n2) = model.params.number_of_particles;
        model.set_number_of_particles(Species::Diffusion1, n1)?;
        model.set_number_of_particles(Species::Diffusion2, n2)?;

        log::info!("✓ Diffusion model created ({n1} + {n2} particles)");
        Ok(model)
    }

    pub fn reset(&mut self) {
        self.container.reset();
        self.collision_detector.reset();
        self.time_controls.reset();
        self.settings1 = default_settings(&self.params);
        self.settings2 = default_settings(&self.params);
        self.particles1.clear();
        self.particles2.clear();
        self.flow_rate1.reset();
        self.flow_rate2.reset();
        self.update_data();
        log::info!("Diffusion model reset");
    }

    pub fn container(&self) -> &DividedContainer {
        &self.container
    }

    pub fn collision_detector(&self) -> &CollisionDetector {
        &self.collision_detector
    }

    pub fn time_controls_mut(&mut self) -> &mut TimeControls {
        &mut self.time_controls
    }

    pub fn particles(&self, species: Species) -> &[Particle] {
        match species {
            Species::Diffusion2 => &self.particles2,
            _ => &self.particles1,
        }
    }

    pub fn settings(&self, species: Species) -> Result<&DiffusionSettings, SimulationError> {
        match species {
            Species::Diffusion1 => Ok(&self.settings1),
            Species::Diffusion2 => Ok(&self.settings2),
            _ => Err(SimulationError::InvalidSpecies(species)),
        }
    }

    pub fn data(&self) -> &DiffusionData {
        &self.data
    }

    pub fn flow_rate(&self, species: Species) -> &ParticleFlowRate {
        match species {
            Species::Diffusion2 => &self.flow_rate2,
            _ => &self.flow_rate1,
        }
    }

    pub fn instances(&self) -> Vec<ParticleInstance> {
        self.particles1
            .iter()
            .chain(&self.particles2)
            .map(Particle::instance)
            .collect()
    }

    fn species_mut(&mut self, species: Species) -> Result<(&mut DiffusionSettings, &mut Vec<Particle>), SimulationError> {
        match species {
            Species::Diffusion1 => Ok((&mut self.settings1, &mut self.particles1)),
            Species::Diffusion2 => Ok((&mut self.settings2, &mut self.particles2)),
            _ => Err(SimulationError::InvalidSpecies(species)),
        }
    }

    /// Adds particles at random positions in the species' half, or removes
    /// them from the end.
    pub fn set_number_of_particles(&mut self, species: Species, count: usize) -> Result<(), SimulationError> {
        let max = self.params.max_particles_per_species;
        if count > max {
            return Err(SimulationError::CountOutOfRange { species, count, max });
        }
        let (settings, particles, bounds) = match species {
            Species::Diffusion1 => (&mut self.settings1, &mut self.particles1, self.container.left_bounds()),
            Species::Diffusion2 => (&mut self.settings2, &mut self.particles2, self.container.right_bounds()),
            _ => return Err(SimulationError::InvalidSpecies(species)),
        };
        settings.number_of_particles = count;
        let current = particles.len();
        if count > current {
            add_particles(&mut self.rng, species, settings, bounds, count - current, particles);
        } else {
            ensemble::remove_particles(particles, current - count);
        }
        log::debug!("{species:?}: {current} -> {count} particles");
        self.update_data();
        Ok(())
    }

    /// Changes the mass of every particle of `species`, resetting speeds to
    /// match the species' initial temperature.
    pub fn set_mass(&mut self, species: Species, mass: f64) -> Result<(), SimulationError> {
        let mass = self.params.mass.check("mass", mass)?;
        let (settings, particles) = self.species_mut(species)?;
        settings.mass = mass;
        update_mass_and_temperature(settings, particles);
        self.update_data();
        Ok(())
    }

    /// Changes the radius of every particle of `species`
    pub fn set_radius(&mut self, species: Species, radius: f64) -> Result<(), SimulationError> {
        let radius = self.params.radius.check("radius", radius)?;
        let (settings, particles) = self.species_mut(species)?;
        settings.radius = radius;
        for particle in particles.iter_mut() {
            particle.radius = radius;
        }
        self.update_data();
        Ok(())
    }

    /// Changes the temperature of `species`, resetting particle speeds
    pub fn set_initial_temperature(&mut self, species: Species, temperature: f64) -> Result<(), SimulationError> {
        let temperature = self.params.initial_temperature.check("initial temperature", temperature)?;
        let (settings, particles) = self.species_mut(species)?;
        settings.initial_temperature = temperature;
        update_mass_and_temperature(settings, particles);
        self.update_data();
        Ok(())
    }

    pub fn has_divider(&self) -> bool {
        self.container.has_divider()
    }

    /// Removing the divider starts the experiment. Restoring it puts a fresh
    /// set of each species back on its own side.
    pub fn set_has_divider(&mut self, has_divider: bool) -> Result<(), SimulationError> {
        if !self.container.set_has_divider(has_divider) || !has_divider {
            return Ok(());
        }
        let n1 = self.settings1.number_of_particles;
        let n2 = self.settings2.number_of_particles;
        self.set_number_of_particles(Species::Diffusion1, 0)?;
        self.set_number_of_particles(Species::Diffusion1, n1)?;
        self.set_number_of_particles(Species::Diffusion2, 0)?;
        self.set_number_of_particles(Species::Diffusion2, n2)?;
        self.flow_rate1.reset();
        self.flow_rate2.reset();
        Ok(())
    }

    /// Advances by `seconds` of real time, stepping only while playing
    pub fn advance(&mut self, seconds: f64) -> Result<Option<CollisionCounts>, SimulationError> {
        if !(seconds.is_finite() && seconds > 0.0) {
            return Err(SimulationError::InvalidTimeStep(seconds));
        }
        match self.time_controls.step_time(seconds) {
            Some(dt) => self.step(dt).map(Some),
            None => Ok(None),
        }
    }

    pub fn single_step(&mut self) -> Result<CollisionCounts, SimulationError> {
        self.step(self.time_controls.single_step_time())
    }

    /// Steps model time by `dt` ps
    pub fn step(&mut self, dt: f64) -> Result<CollisionCounts, SimulationError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SimulationError::InvalidTimeStep(dt));
        }

        ensemble::step_particles(&mut self.particles1, dt);
        ensemble::step_particles(&mut self.particles2, dt);

        if !self.container.has_divider() {
            self.flow_rate1.step(&self.particles1, dt);
            self.flow_rate2.step(&self.particles2, dt);
        }

        let counts = self
            .collision_detector
            .update(&self.container, &mut [&mut self.particles1[..], &mut self.particles2[..]]);

        self.update_data();
        Ok(counts)
    }

    fn update_data(&mut self) {
        let left_bounds = self.container.left_bounds();
        let (left1, right1) = left_right_counts(&self.particles1, &left_bounds);
        let (left2, right2) = left_right_counts(&self.particles2, &left_bounds);

        let (mut left_energy, mut right_energy) = (0.0, 0.0);
        for particle in self.particles1.iter().chain(&self.particles2) {
            if left_bounds.contains_point(particle.position) {
                left_energy += particle.kinetic_energy();
            } else {
                right_energy += particle.kinetic_energy();
            }
        }

        self.data = DiffusionData {
            center_x_of_mass1: ensemble::center_x_of_mass(&self.particles1),
            center_x_of_mass2: ensemble::center_x_of_mass(&self.particles2),
            left_number_of_particles1: left1,
            right_number_of_particles1: right1,
            left_number_of_particles2: left2,
            right_number_of_particles2: right2,
            left_average_temperature: average_temperature(left_energy, left1 + left2),
            right_average_temperature: average_temperature(right_energy, right1 + right2),
        };
    }
}

fn default_settings(params: &DiffusionParams) -> DiffusionSettings {
    DiffusionSettings {
        number_of_particles: 0,
        mass: params.mass.default,
        radius: params.radius.default,
        initial_temperature: params.initial_temperature.default,
    }
}

fn add_particles(
    rng: &mut StdRng,
    species: Species,
    settings: &DiffusionSettings,
    bounds: Bounds,
    n: usize,
    particles: &mut Vec<Particle>,
) {
    let speed = rms_speed(settings.initial_temperature, settings.mass);
    let radius = settings.radius;
    for _ in 0..n {
        let mut particle = Particle::new(species, settings.mass, radius);
        let x = random_between(rng, bounds.min_x() + radius, bounds.max_x() - radius);
        let y = random_between(rng, bounds.min_y() + radius, bounds.max_y() - radius);
        particle.set_position(x, y);
        particle.set_velocity_polar(speed, rng.random::<f64>() * std::f64::consts::TAU);
        particles.push(particle);
    }
}

/// Uniform in [min, max), or `min` when the range is empty
fn random_between(rng: &mut StdRng, min: f64, max: f64) -> f64 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}

fn update_mass_and_temperature(settings: &DiffusionSettings, particles: &mut [Particle]) {
    let speed = rms_speed(settings.initial_temperature, settings.mass);
    for particle in particles {
        particle.mass = settings.mass;
        particle.set_speed(speed);
    }
}

fn left_right_counts(particles: &[Particle], left_bounds: &Bounds) -> (usize, usize) {
    let left = particles
        .iter()
        .filter(|p| left_bounds.contains_point(p.position))
        .count();
    (left, particles.len() - left)
}

fn average_temperature(total_kinetic_energy: f64, count: usize) -> Option<f64> {
    (count > 0).then(|| gas_physics::temperature_from_kinetic_energy(total_kinetic_energy / count as f64))
}
