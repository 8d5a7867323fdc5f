//! Spatial partitioning for collision detection
//!
//! The collision bounds are tiled with square regions that overlap their
//! neighbors. Each step every particle is placed in every region that contains
//! its center, so a pair of particles close to a seam is seen together in at
//! least one region. Only pairs within the same region are tested, which keeps
//! the pair count near O(n·k) instead of O(n²).

use crate::bounds::Bounds;
use crate::error::ConfigError;
use crate::particle::Particle;

/// Square region size and overlap, pm
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionConfig {
    /// Length of one side of a region
    pub length: f64,
    /// Width of the band shared by adjacent regions
    pub overlap: f64,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            length: 2000.0,
            overlap: 500.0,
        }
    }
}

impl RegionConfig {
    pub fn new(length: f64, overlap: f64) -> Result<Self, ConfigError> {
        let config = Self { length, overlap };
        config.validate()?;
        Ok(config)
    }

    /// The overlap must stay below half the length, otherwise a region would
    /// reach past its neighbor and the stride between regions breaks down.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.length.is_finite() && self.length > 0.0) {
            return Err(ConfigError::InvalidRegionLength(self.length));
        }
        if !(self.overlap.is_finite() && self.overlap > 0.0) {
            return Err(ConfigError::InvalidRegionOverlap(self.overlap));
        }
        if self.overlap >= self.length / 2.0 {
            return Err(ConfigError::OverlapTooLarge {
                length: self.length,
                overlap: self.overlap,
            });
        }
        Ok(())
    }

    /// Distance between the origins of adjacent regions
    pub fn stride(&self) -> f64 {
        self.length - self.overlap
    }
}

/// Identifies a particle as (particle set, index within that set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParticleKey {
    pub set: usize,
    pub index: usize,
}

/// One cell of the partition
#[derive(Debug, Clone)]
pub struct Region {
    pub bounds: Bounds,
    particles: Vec<ParticleKey>,
}

impl Region {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            particles: Vec::new(),
        }
    }

    pub fn particles(&self) -> &[ParticleKey] {
        &self.particles
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    fn add(&mut self, key: ParticleKey) {
        self.particles.push(key);
    }
}

/// Overlapping regions covering a set of bounds
#[derive(Debug, Clone)]
pub struct RegionGrid {
    config: RegionConfig,
    bounds: Option<Bounds>,
    regions: Vec<Region>,
}

impl RegionGrid {
    pub fn new(config: RegionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            bounds: None,
            regions: Vec::new(),
        })
    }

    pub fn config(&self) -> &RegionConfig {
        &self.config
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Bounds the regions currently cover, if they have been built
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Rebuilds the regions if `bounds` differs from what they cover.
    /// Returns whether a rebuild happened.
    pub fn ensure_bounds(&mut self, bounds: Bounds) -> bool {
        if self.bounds == Some(bounds) {
            return false;
        }
        self.rebuild(bounds);
        true
    }

    /// Tiles `bounds` with overlapping squares, column by column from the
    /// bottom-left corner. The last row and column may extend past the bounds.
    pub fn rebuild(&mut self, bounds: Bounds) {
        let stride = self.config.stride();
        let mut regions = Vec::new();
        let mut min_x = bounds.min_x();
        while min_x < bounds.max_x() {
            let mut min_y = bounds.min_y();
            while min_y < bounds.max_y() {
                regions.push(Region::new(Bounds::new(
                    min_x,
                    min_y,
                    min_x + self.config.length,
                    min_y + self.config.length,
                )));
                min_y += stride;
            }
            min_x += stride;
        }
        log::debug!(
            "Rebuilt {} collision regions for bounds {:?}",
            regions.len(),
            bounds
        );
        self.regions = regions;
        self.bounds = Some(bounds);
    }

    pub fn clear(&mut self) {
        for region in &mut self.regions {
            region.clear();
        }
    }

    /// Clears every region, then adds each particle to every region that
    /// contains its center. Particles seen near a seam land in several
    /// regions; callers tolerate testing the same pair more than once.
    pub fn assign(&mut self, particle_sets: &[&[Particle]]) {
        self.clear();
        for (set, particles) in particle_sets.iter().enumerate() {
            for (index, particle) in particles.iter().enumerate() {
                for region in &mut self.regions {
                    if region.bounds.contains_point(particle.position) {
                        region.add(ParticleKey { set, index });
                    }
                }
            }
        }
    }
}
