//! Particle types and kinematic state for the gas simulation

use bytemuck::{Pod, Zeroable};
use glam::DVec2;

use crate::constants::{
    HEAVY_PARTICLE_MASS, HEAVY_PARTICLE_RADIUS, LIGHT_PARTICLE_MASS, LIGHT_PARTICLE_RADIUS,
};
use crate::error::ConfigError;

/// Particle species
///
/// Heavy and light particles live in the ideal-gas container. The two
/// diffusion species share the divided container and have user-tunable
/// mass and radius.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    Heavy = 0,
    Light = 1,
    Diffusion1 = 2,
    Diffusion2 = 3,
}

impl Species {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Species::Heavy),
            1 => Some(Species::Light),
            2 => Some(Species::Diffusion1),
            3 => Some(Species::Diffusion2),
            _ => None,
        }
    }

    /// Default mass and radius for this species
    pub fn default_config(self) -> SpeciesConfig {
        match self {
            Species::Heavy => SpeciesConfig {
                mass: HEAVY_PARTICLE_MASS,
                radius: HEAVY_PARTICLE_RADIUS,
            },
            Species::Light => SpeciesConfig {
                mass: LIGHT_PARTICLE_MASS,
                radius: LIGHT_PARTICLE_RADIUS,
            },
            Species::Diffusion1 | Species::Diffusion2 => SpeciesConfig {
                mass: HEAVY_PARTICLE_MASS,
                radius: HEAVY_PARTICLE_RADIUS,
            },
        }
    }
}

/// Mass (AMU) and radius (pm) shared by every particle of a species
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeciesConfig {
    pub mass: f64,
    pub radius: f64,
}

impl SpeciesConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(ConfigError::InvalidMass(self.mass));
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(ConfigError::InvalidRadius(self.radius));
        }
        Ok(())
    }
}

/// A hard disk moving freely between collisions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Center, pm
    pub position: DVec2,
    /// Center before the most recent `step`, pm
    pub previous_position: DVec2,
    /// Velocity, pm/ps
    pub velocity: DVec2,
    /// Mass, AMU
    pub mass: f64,
    /// Radius, pm
    pub radius: f64,
    pub species: Species,
}

impl Particle {
    /// Create a particle at rest at the origin. Callers guarantee a positive
    /// mass and radius.
    pub fn new(species: Species, mass: f64, radius: f64) -> Self {
        debug_assert!(mass > 0.0, "invalid mass: {mass}");
        debug_assert!(radius > 0.0, "invalid radius: {radius}");
        Self {
            position: DVec2::ZERO,
            previous_position: DVec2::ZERO,
            velocity: DVec2::ZERO,
            mass,
            radius,
            species,
        }
    }

    /// Create a particle using the species' default mass and radius
    pub fn of_species(species: Species) -> Self {
        let config = species.default_config();
        Self::new(species, config.mass, config.radius)
    }

    pub fn new_heavy() -> Self {
        Self::of_species(Species::Heavy)
    }

    pub fn new_light() -> Self {
        Self::of_species(Species::Light)
    }

    /// Builder-style position setter, mostly for tests and setup code
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.set_position(x, y);
        self
    }

    /// Builder-style velocity setter
    pub fn moving(mut self, vx: f64, vy: f64) -> Self {
        self.set_velocity(vx, vy);
        self
    }

    /// Moves the particle without recording a previous position
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.position = DVec2::new(x, y);
        self.previous_position = self.position;
    }

    pub fn set_velocity(&mut self, vx: f64, vy: f64) {
        self.velocity = DVec2::new(vx, vy);
    }

    /// Sets velocity from a magnitude (pm/ps) and an angle (radians from +x)
    pub fn set_velocity_polar(&mut self, magnitude: f64, angle: f64) {
        self.velocity = DVec2::from_angle(angle) * magnitude;
    }

    /// Changes the speed while preserving direction. A particle at rest has
    /// no direction, so it stays at rest.
    pub fn set_speed(&mut self, speed: f64) {
        debug_assert!(speed >= 0.0 && speed.is_finite(), "invalid speed: {speed}");
        let current = self.velocity.length();
        if current > 0.0 {
            self.velocity *= speed / current;
        }
    }

    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    /// Kinetic energy, AMU * pm² / ps²
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.length_squared()
    }

    pub fn momentum(&self) -> DVec2 {
        self.velocity * self.mass
    }

    /// Free flight for `dt` ps
    pub fn step(&mut self, dt: f64) {
        self.previous_position = self.position;
        self.position += self.velocity * dt;
    }

    /// Scales both velocity components, used for heating and cooling
    pub fn scale_velocity(&mut self, scale: f64) {
        self.velocity *= scale;
    }

    pub fn left(&self) -> f64 {
        self.position.x - self.radius
    }

    pub fn right(&self) -> f64 {
        self.position.x + self.radius
    }

    pub fn bottom(&self) -> f64 {
        self.position.y - self.radius
    }

    pub fn top(&self) -> f64 {
        self.position.y + self.radius
    }

    /// Whether the two disks overlap
    pub fn overlaps(&self, other: &Particle) -> bool {
        let reach = self.radius + other.radius;
        self.position.distance_squared(other.position) < reach * reach
    }

    /// Snapshot for a renderer
    pub fn instance(&self) -> ParticleInstance {
        ParticleInstance {
            position: self.position.as_vec2().to_array(),
            radius: self.radius as f32,
            species: self.species as u32,
        }
    }
}

/// Render-facing particle record
/// Tightly packed so a slice can be uploaded as an instance buffer as-is.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    /// Center, pm
    pub position: [f32; 2],
    /// Radius, pm
    pub radius: f32,
    /// Species (as u32, maps to Species enum)
    pub species: u32,
}
